use crate::api::BudgetApi;
use crate::messages;
use crate::model::{Category, Transaction};
use crate::mutation::{ConfirmGate, Mutation, MutationState, Outcome};
use chrono::NaiveDate;
use serde::Serialize;
use tracing::trace;

/// One line of the transaction list, ready to be shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionRow {
    pub id: String,
    pub date: String,
    pub kind: &'static str,
    pub category: String,
    pub amount: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Shows the transactions handed in by the caller and deletes them one at a time, after
/// confirmation.
#[derive(Debug)]
pub struct TransactionList {
    transactions: Vec<Transaction>,
    categories: Vec<Category>,
    has_more: bool,
    delete: Mutation,
    confirm: ConfirmGate<String>,
}

impl TransactionList {
    pub fn new(transactions: Vec<Transaction>, has_more: bool) -> Self {
        Self {
            transactions,
            categories: Vec::new(),
            has_more,
            delete: Mutation::new("delete_transaction", messages::DELETE_FAILED),
            confirm: ConfirmGate::default(),
        }
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn set_transactions(&mut self, transactions: Vec<Transaction>, has_more: bool) {
        self.transactions = transactions;
        self.has_more = has_more;
    }

    /// Appends the next page.
    pub fn extend(&mut self, transactions: Vec<Transaction>, has_more: bool) {
        self.transactions.extend(transactions);
        self.has_more = has_more;
    }

    /// The categories used to show names instead of ids.
    pub fn set_categories(&mut self, categories: Vec<Category>) {
        self.categories = categories;
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// The title and hint shown when there is nothing to list.
    pub fn empty_message(&self) -> Option<(&'static str, &'static str)> {
        self.is_empty()
            .then_some((messages::NO_TRANSACTIONS, messages::NO_TRANSACTIONS_HINT))
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn can_load_more(&self) -> bool {
        self.has_more && !self.is_empty()
    }

    pub fn rows(&self) -> Vec<TransactionRow> {
        self.transactions
            .iter()
            .map(|t| TransactionRow {
                id: t.id().to_string(),
                date: format_date(t.date()),
                kind: t.r#type().label(),
                category: self.category_label(t.category()),
                amount: format_amount(t),
                description: t.description().map(str::to_string),
            })
            .collect()
    }

    fn category_label(&self, category: &str) -> String {
        self.categories
            .iter()
            .find(|c| c.id() == category)
            .map(Category::label)
            .unwrap_or_else(|| category.to_string())
    }

    pub fn delete_label(&self) -> &'static str {
        self.delete.label(messages::DELETE, messages::DELETING)
    }

    pub fn delete_state(&self) -> MutationState {
        self.delete.state()
    }

    pub fn delete_mutation(&self) -> &Mutation {
        &self.delete
    }

    /// Asks for confirmation before deleting transaction `id`. Ignored while a delete is running.
    pub fn request_delete(&mut self, id: impl Into<String>) {
        if self.delete.is_busy() {
            trace!("Ignoring delete request while deleting");
            return;
        }
        self.confirm.open(id.into());
    }

    /// Withdraws the pending delete. Ignored while the delete is running.
    pub fn cancel_delete(&mut self) {
        if self.delete.is_busy() {
            trace!("Ignoring cancel while deleting");
            return;
        }
        self.confirm.close();
    }

    pub fn pending_delete(&self) -> Option<&str> {
        self.confirm.target().map(String::as_str)
    }

    pub fn confirm_message(&self) -> Option<&'static str> {
        self.confirm
            .is_open()
            .then_some(messages::CONFIRM_DELETE_TRANSACTION)
    }

    /// Deletes the transaction waiting for confirmation and drops it from the list. On failure
    /// the confirmation stays open.
    pub async fn confirm_delete(&mut self, api: &dyn BudgetApi) -> Outcome {
        let target = self.confirm.target().cloned();
        let outcome = self
            .delete
            .submit_confirmed(&mut self.confirm, |id| async move {
                api.delete_transaction(&id).await
            })
            .await;

        if let (true, Some(id)) = (outcome.is_success(), target) {
            self.transactions.retain(|t| t.id() != id);
        }
        outcome
    }
}

impl Drop for TransactionList {
    fn drop(&mut self) {
        self.delete.cancel();
    }
}

/// Formats an ISO date as `dd/mm/yy`. Anything that does not start with a `YYYY-MM-DD` date is
/// returned unchanged.
pub fn format_date(iso: &str) -> String {
    iso.get(..10)
        .and_then(|day| NaiveDate::parse_from_str(day, "%Y-%m-%d").ok())
        .map(|date| date.format("%d/%m/%y").to_string())
        .unwrap_or_else(|| iso.to_string())
}

/// Formats the amount of a transaction with its sign and two decimals, e.g. `+150.50€`.
pub fn format_amount(transaction: &Transaction) -> String {
    format!(
        "{}{}€",
        transaction.r#type().sign(),
        transaction.amount().abs_2dp()
    )
}
