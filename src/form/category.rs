use crate::form::{Field, FieldErrors};
use crate::messages;
use crate::model::{Category, NewCategory};

/// The "new category" input of the category picker.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct CategoryDraft {
    name: String,
    color: Option<String>,
    icon: Option<String>,
}

impl CategoryDraft {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, value: impl Into<String>) {
        self.name = value.into();
    }

    pub fn set_color(&mut self, value: Option<String>) {
        self.color = value;
    }

    pub fn set_icon(&mut self, value: Option<String>) {
        self.icon = value;
    }

    pub fn is_blank(&self) -> bool {
        self.name.trim().is_empty()
    }

    /// Checks the draft against the categories currently loaded. See `validate_category_name`.
    pub fn validate_against(&self, existing: &[Category]) -> FieldErrors {
        validate_category_name(&self.name, existing)
    }

    pub fn to_new_category(&self) -> NewCategory {
        NewCategory::new(self.name.clone())
            .with_color(self.color.clone())
            .with_icon(self.icon.clone())
    }
}

/// A category name must not be blank and must not match, ignoring case, any category in
/// `existing`. `existing` is whatever the client has loaded, so passing this check does not mean
/// the server will accept the name.
pub fn validate_category_name(name: &str, existing: &[Category]) -> FieldErrors {
    let mut errors = FieldErrors::new();
    if name.trim().is_empty() {
        errors.insert(Field::Name, messages::CATEGORY_NAME_REQUIRED);
    } else if existing.iter().any(|c| c.has_name(name)) {
        errors.insert(Field::Name, messages::CATEGORY_ALREADY_EXISTS);
    }
    errors
}
