//! Draft state for the forms of the application, and the field-local validation rules that guard
//! each submission.
//!
//! Validation is a pure function of the draft: calling it any number of times on the same draft
//! yields the same `FieldErrors`. No rule looks at more than one field.

mod auth;
mod category;
mod transaction;

pub use auth::{LoginDraft, RegisterDraft};
pub use category::{validate_category_name, CategoryDraft};
pub use transaction::TransactionDraft;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The fields that can carry a validation error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Type,
    Amount,
    Category,
    Date,
    Description,
    Name,
    Email,
    Password,
}

serde_plain::derive_display_from_serialize!(Field);
serde_plain::derive_fromstr_from_deserialize!(Field);

/// A mapping from field to error message. A field that is absent has no error.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldErrors(BTreeMap<Field, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `message` for `field`, replacing any previous message.
    pub fn insert(&mut self, field: Field, message: impl Into<String>) {
        let _ = self.0.insert(field, message.into());
    }

    /// Removes the error for `field`. Returns true if there was one.
    pub fn remove(&mut self, field: Field) -> bool {
        self.0.remove(&field).is_some()
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.0.contains_key(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn clear(&mut self) {
        self.0.clear()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.0.iter().map(|(f, m)| (*f, m.as_str()))
    }

    /// Joins all messages into one line, in field order. Used where errors cannot be shown next
    /// to their field, such as on the command line.
    pub fn summary(&self) -> String {
        self.iter()
            .map(|(field, message)| format!("{field}: {message}"))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

impl<S: Into<String>> FromIterator<(Field, S)> for FieldErrors {
    fn from_iter<T: IntoIterator<Item = (Field, S)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(f, m)| (f, m.into())).collect())
    }
}

/// A draft that can check itself before it is submitted.
pub trait Validate {
    /// Returns the errors of the current draft. Must not have side effects.
    fn validate(&self) -> FieldErrors;

    fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_errors_basic() {
        let mut errors = FieldErrors::new();
        assert!(errors.is_empty());
        errors.insert(Field::Amount, "bad");
        errors.insert(Field::Amount, "worse");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get(Field::Amount), Some("worse"));
        assert!(errors.remove(Field::Amount));
        assert!(!errors.remove(Field::Amount));
        assert!(errors.is_empty());
    }

    #[test]
    fn test_summary_is_in_field_order() {
        let errors: FieldErrors = [(Field::Date, "d"), (Field::Amount, "a")]
            .into_iter()
            .collect();
        assert_eq!(errors.summary(), "amount: a; date: d");
    }

    #[test]
    fn test_field_display() {
        assert_eq!(Field::Password.to_string(), "password");
    }
}
