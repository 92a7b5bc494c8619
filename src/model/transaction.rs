use crate::model::Amount;
use serde::{Deserialize, Serialize};

/// Whether a transaction brings money in or takes it out.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    #[default]
    Expense,
}

serde_plain::derive_display_from_serialize!(TransactionType);
serde_plain::derive_fromstr_from_deserialize!(TransactionType);

impl TransactionType {
    /// The sign shown in front of amounts of this type.
    pub fn sign(&self) -> char {
        match self {
            TransactionType::Income => '+',
            TransactionType::Expense => '-',
        }
    }

    /// The label shown next to the amount in lists.
    pub fn label(&self) -> &'static str {
        match self {
            TransactionType::Income => "💰 Revenu",
            TransactionType::Expense => "🛒 Dépense",
        }
    }
}

/// A transaction as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub(crate) id: String,
    pub(crate) amount: Amount,
    #[serde(rename = "type")]
    pub(crate) r#type: TransactionType,
    pub(crate) category: String,
    /// An ISO date, `YYYY-MM-DD`.
    pub(crate) date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) description: Option<String>,
}

impl Transaction {
    pub fn new(id: impl Into<String>, new: NewTransaction) -> Self {
        Self {
            id: id.into(),
            amount: new.amount,
            r#type: new.r#type,
            category: new.category,
            date: new.date,
            description: new.description,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn r#type(&self) -> TransactionType {
        self.r#type
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// The fields of this transaction without its id. Edits submit this back as a full
    /// replacement.
    pub fn to_new(&self) -> NewTransaction {
        NewTransaction {
            amount: self.amount,
            r#type: self.r#type,
            category: self.category.clone(),
            date: self.date.clone(),
            description: self.description.clone(),
        }
    }
}

/// The payload for creating a transaction, or replacing one when editing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTransaction {
    pub(crate) amount: Amount,
    #[serde(rename = "type")]
    pub(crate) r#type: TransactionType,
    pub(crate) category: String,
    pub(crate) date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) description: Option<String>,
}

impl NewTransaction {
    pub fn new(
        r#type: TransactionType,
        amount: Amount,
        category: impl Into<String>,
        date: impl Into<String>,
        description: Option<String>,
    ) -> Self {
        Self {
            amount,
            r#type,
            category: category.into(),
            date: date.into(),
            description,
        }
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn r#type(&self) -> TransactionType {
        self.r#type
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_transaction_type_plain_strings() {
        assert_eq!(TransactionType::Income.to_string(), "income");
        assert_eq!(
            TransactionType::from_str("expense").unwrap(),
            TransactionType::Expense
        );
        assert!(TransactionType::from_str("transfer").is_err());
    }

    #[test]
    fn test_transaction_wire_format() {
        let json = r#"{"id":"t1","amount":87.43,"type":"expense","category":"Groceries","date":"2025-10-20"}"#;
        let txn: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(txn.id(), "t1");
        assert_eq!(txn.r#type(), TransactionType::Expense);
        assert_eq!(txn.amount().to_string(), "87.43");
        assert_eq!(txn.description(), None);

        let value = serde_json::to_value(txn.to_new()).unwrap();
        assert_eq!(value["type"], "expense");
        assert_eq!(value["category"], "Groceries");
        assert!(value.get("description").is_none());
        assert!(value.get("id").is_none());
    }

    #[test]
    fn test_to_new_round_trips_fields() {
        let new = NewTransaction::new(
            TransactionType::Income,
            Amount::from_str("1200").unwrap(),
            "Salary",
            "2025-10-01",
            Some("October".into()),
        );
        let txn = Transaction::new("t9", new.clone());
        assert_eq!(txn.to_new(), new);
    }
}
