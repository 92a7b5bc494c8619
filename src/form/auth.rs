use crate::form::{Field, FieldErrors, Validate};
use crate::messages;
use crate::model::{Credentials, Registration};

/// The login form.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct LoginDraft {
    email: String,
    password: String,
}

impl LoginDraft {
    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn set_email(&mut self, value: impl Into<String>) {
        self.email = value.into();
    }

    pub fn set_password(&mut self, value: impl Into<String>) {
        self.password = value.into();
    }

    pub fn clear_password(&mut self) {
        self.password.clear();
    }

    pub fn has_password(&self) -> bool {
        !self.password.is_empty()
    }

    pub fn to_credentials(&self) -> Credentials {
        Credentials::new(self.email.trim(), self.password.clone())
    }
}

impl Validate for LoginDraft {
    fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        require(&mut errors, Field::Email, &self.email, messages::EMAIL_REQUIRED);
        if self.password.is_empty() {
            errors.insert(Field::Password, messages::PASSWORD_REQUIRED);
        }
        errors
    }
}

/// The registration form.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct RegisterDraft {
    name: String,
    email: String,
    password: String,
}

impl RegisterDraft {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn set_name(&mut self, value: impl Into<String>) {
        self.name = value.into();
    }

    pub fn set_email(&mut self, value: impl Into<String>) {
        self.email = value.into();
    }

    pub fn set_password(&mut self, value: impl Into<String>) {
        self.password = value.into();
    }

    pub fn clear_password(&mut self) {
        self.password.clear();
    }

    pub fn has_password(&self) -> bool {
        !self.password.is_empty()
    }

    pub fn to_registration(&self) -> Registration {
        Registration::new(self.name.trim(), self.email.trim(), self.password.clone())
    }
}

impl Validate for RegisterDraft {
    fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        require(&mut errors, Field::Name, &self.name, messages::NAME_REQUIRED);
        require(&mut errors, Field::Email, &self.email, messages::EMAIL_REQUIRED);
        // Passwords are taken as typed, spaces included.
        if self.password.is_empty() {
            errors.insert(Field::Password, messages::PASSWORD_REQUIRED);
        }
        errors
    }
}

fn require(errors: &mut FieldErrors, field: Field, value: &str, message: &str) {
    if value.trim().is_empty() {
        errors.insert(field, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_requires_both_fields() {
        let draft = LoginDraft::default();
        let errors = draft.validate();
        assert_eq!(errors.get(Field::Email), Some(messages::EMAIL_REQUIRED));
        assert_eq!(errors.get(Field::Password), Some(messages::PASSWORD_REQUIRED));
    }

    #[test]
    fn test_login_credentials_trim_email_only() {
        let mut draft = LoginDraft::default();
        draft.set_email("  a@example.com ");
        draft.set_password(" secret ");
        assert!(draft.is_valid());
        let creds = draft.to_credentials();
        assert_eq!(creds.email(), "a@example.com");
        assert_eq!(creds.password(), " secret ");
    }

    #[test]
    fn test_register_requires_name() {
        let mut draft = RegisterDraft::default();
        draft.set_email("a@example.com");
        draft.set_password("pw");
        let errors = draft.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get(Field::Name), Some(messages::NAME_REQUIRED));
    }

    #[test]
    fn test_clear_password() {
        let mut draft = RegisterDraft::default();
        draft.set_password("pw");
        assert!(draft.has_password());
        draft.clear_password();
        assert!(!draft.has_password());
    }
}
