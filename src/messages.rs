//! User-facing strings. The application speaks French; failures are always one of these static
//! messages and never the underlying error.

// Validation
pub const AMOUNT_MUST_BE_POSITIVE: &str = "Le montant doit être positif";
pub const CATEGORY_REQUIRED: &str = "Sélectionnez une catégorie";
pub const DATE_REQUIRED: &str = "La date est requise";
pub const CATEGORY_NAME_REQUIRED: &str = "Le nom de la catégorie ne peut pas être vide";
pub const CATEGORY_ALREADY_EXISTS: &str = "Cette catégorie existe déjà";
pub const NAME_REQUIRED: &str = "Le nom est requis";
pub const EMAIL_REQUIRED: &str = "L'email est requis";
pub const PASSWORD_REQUIRED: &str = "Le mot de passe est requis";

// Mutation failures
pub const CATEGORY_CREATE_FAILED: &str = "Erreur lors de la création de la catégorie";
pub const TRANSACTION_CREATE_FAILED: &str = "Erreur lors de la création";
pub const TRANSACTION_UPDATE_FAILED: &str = "Erreur lors de la modification";
pub const DELETE_FAILED: &str = "Erreur lors de la suppression";
pub const LOGIN_FAILED: &str = "Email ou mot de passe incorrect";
pub const REGISTER_FAILED: &str = "Email ou mot de passe incorrect";

// Empty states
pub const NO_TRANSACTIONS: &str = "Aucune transaction";
pub const NO_TRANSACTIONS_HINT: &str = "Créez votre première transaction pour commencer 💰";
pub const NO_CATEGORIES: &str = "Aucune catégorie créée";

// Confirmation prompts
pub const CONFIRM_DELETE_TRANSACTION: &str =
    "Êtes-vous sûr de vouloir supprimer cette transaction ?";
pub const CONFIRM_DELETE_CATEGORY: &str = "Êtes-vous sûr de vouloir supprimer cette catégorie ?";

// Buttons
pub const CREATE: &str = "Créer";
pub const CREATING: &str = "Création...";
pub const SAVE: &str = "Enregistrer";
pub const SAVING: &str = "Enregistrement...";
pub const DELETE: &str = "Supprimer";
pub const DELETING: &str = "Suppression...";
pub const LOGIN: &str = "Se connecter";
pub const LOGGING_IN: &str = "Connexion...";
pub const REGISTER: &str = "S'inscrire";
pub const REGISTERING: &str = "Inscription...";

pub const WELCOME: &str = "Bienvenue !";
