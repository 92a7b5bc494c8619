use crate::form::{Field, FieldErrors, Validate};
use crate::messages;
use crate::model::{Amount, NewTransaction, Transaction, TransactionType};
use crate::{utils, Result};
use anyhow::Context;
use std::str::FromStr;

/// The draft of the transaction form. Values are kept as typed by the user; they are only
/// converted when the draft is turned into a `NewTransaction`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionDraft {
    r#type: TransactionType,
    amount: String,
    category: String,
    date: String,
    description: String,
}

impl Default for TransactionDraft {
    /// An expense dated today with every other field empty.
    fn default() -> Self {
        Self {
            r#type: TransactionType::Expense,
            amount: String::new(),
            category: String::new(),
            date: utils::today_iso(),
            description: String::new(),
        }
    }
}

impl From<&Transaction> for TransactionDraft {
    fn from(txn: &Transaction) -> Self {
        Self {
            r#type: txn.r#type(),
            amount: txn.amount().value().normalize().to_string(),
            category: txn.category().to_string(),
            date: txn.date().to_string(),
            description: txn.description().unwrap_or_default().to_string(),
        }
    }
}

impl TransactionDraft {
    pub fn r#type(&self) -> TransactionType {
        self.r#type
    }

    pub fn amount(&self) -> &str {
        &self.amount
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn set_type(&mut self, value: TransactionType) {
        self.r#type = value;
    }

    pub fn set_amount(&mut self, value: impl Into<String>) {
        self.amount = value.into();
    }

    pub fn set_category(&mut self, value: impl Into<String>) {
        self.category = value.into();
    }

    pub fn set_date(&mut self, value: impl Into<String>) {
        self.date = value.into();
    }

    pub fn set_description(&mut self, value: impl Into<String>) {
        self.description = value.into();
    }

    /// Converts the draft into the payload sent to the API. An empty description is sent as
    /// absent.
    ///
    /// # Errors
    /// Returns an error if the amount is not a number. Call `validate` first to get a message
    /// suitable for the user.
    pub fn to_new_transaction(&self) -> Result<NewTransaction> {
        let amount = Amount::from_str(&self.amount)
            .with_context(|| format!("'{}' is not a valid amount", self.amount))?;
        let description = if self.description.is_empty() {
            None
        } else {
            Some(self.description.clone())
        };
        Ok(NewTransaction::new(
            self.r#type,
            amount,
            self.category.trim(),
            self.date.trim(),
            description,
        ))
    }
}

impl Validate for TransactionDraft {
    fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();

        let positive = Amount::from_str(&self.amount)
            .map(|a| a.is_positive())
            .unwrap_or(false);
        if !positive {
            errors.insert(Field::Amount, messages::AMOUNT_MUST_BE_POSITIVE);
        }

        if self.category.trim().is_empty() {
            errors.insert(Field::Category, messages::CATEGORY_REQUIRED);
        }

        if self.date.trim().is_empty() {
            errors.insert(Field::Date, messages::DATE_REQUIRED);
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_draft() -> TransactionDraft {
        let mut draft = TransactionDraft::default();
        draft.set_amount("150.50");
        draft.set_category("Groceries");
        draft.set_date("2025-10-20");
        draft
    }

    #[test]
    fn test_default_draft() {
        let draft = TransactionDraft::default();
        assert_eq!(draft.r#type(), TransactionType::Expense);
        assert_eq!(draft.amount(), "");
        assert_eq!(draft.category(), "");
        assert_eq!(draft.date(), utils::today_iso());
        assert_eq!(draft.description(), "");
    }

    #[test]
    fn test_empty_draft_errors() {
        let mut draft = TransactionDraft::default();
        draft.set_date("");
        let errors = draft.validate();
        assert_eq!(errors.get(Field::Amount), Some(messages::AMOUNT_MUST_BE_POSITIVE));
        assert_eq!(errors.get(Field::Category), Some(messages::CATEGORY_REQUIRED));
        assert_eq!(errors.get(Field::Date), Some(messages::DATE_REQUIRED));
        assert!(!draft.is_valid());
    }

    #[test]
    fn test_negative_amount_is_rejected() {
        let mut draft = valid_draft();
        draft.set_amount("-5");
        let errors = draft.validate();
        assert_eq!(errors.len(), 1);
        assert!(errors.contains(Field::Amount));
    }

    #[test]
    fn test_zero_and_garbage_amounts_are_rejected() {
        let mut draft = valid_draft();
        draft.set_amount("0");
        assert!(draft.validate().contains(Field::Amount));
        draft.set_amount("abc");
        assert!(draft.validate().contains(Field::Amount));
    }

    #[test]
    fn test_decimal_amount_passes() {
        let draft = valid_draft();
        let errors = draft.validate();
        assert!(!errors.contains(Field::Amount));
        assert!(errors.is_empty());
    }

    #[test]
    fn test_validate_is_idempotent() {
        let mut draft = valid_draft();
        draft.set_amount("-1");
        draft.set_category("");
        let before = draft.clone();
        assert_eq!(draft.validate(), draft.validate());
        assert_eq!(draft, before);
    }

    #[test]
    fn test_to_new_transaction() {
        let mut draft = valid_draft();
        draft.set_type(TransactionType::Income);
        let new = draft.to_new_transaction().unwrap();
        assert_eq!(new.r#type(), TransactionType::Income);
        assert_eq!(new.amount().to_string(), "150.50");
        assert_eq!(new.category(), "Groceries");
        assert_eq!(new.description(), None);

        draft.set_description("weekly shop");
        let new = draft.to_new_transaction().unwrap();
        assert_eq!(new.description(), Some("weekly shop"));
    }

    #[test]
    fn test_to_new_transaction_rejects_bad_amount() {
        let mut draft = valid_draft();
        draft.set_amount("twelve");
        assert!(draft.to_new_transaction().is_err());
    }

    #[test]
    fn test_draft_from_transaction() {
        let new = valid_draft().to_new_transaction().unwrap();
        let txn = Transaction::new("t1", new);
        let draft = TransactionDraft::from(&txn);
        assert_eq!(draft.amount(), "150.5");
        assert_eq!(draft.category(), "Groceries");
        assert_eq!(draft.date(), "2025-10-20");
        assert!(draft.is_valid());
    }
}
