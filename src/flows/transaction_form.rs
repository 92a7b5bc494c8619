use crate::api::BudgetApi;
use crate::form::{Field, FieldErrors, TransactionDraft, Validate};
use crate::messages;
use crate::model::{Transaction, TransactionType};
use crate::mutation::{Mutation, MutationState, Outcome};
use std::str::FromStr;
use tracing::{debug, trace};

/// Creates a transaction, or edits an existing one.
#[derive(Debug)]
pub struct TransactionForm {
    /// The id of the transaction being edited, `None` when creating.
    editing: Option<String>,
    draft: TransactionDraft,
    mutation: Mutation,
    saved: Option<Transaction>,
}

impl TransactionForm {
    /// A form for a new transaction, starting from an empty expense dated today.
    pub fn create() -> Self {
        Self {
            editing: None,
            draft: TransactionDraft::default(),
            mutation: Mutation::new("create_transaction", messages::TRANSACTION_CREATE_FAILED),
            saved: None,
        }
    }

    /// A form pre-filled with `transaction`. Submitting replaces all of its fields.
    pub fn update(transaction: &Transaction) -> Self {
        Self {
            editing: Some(transaction.id().to_string()),
            draft: TransactionDraft::from(transaction),
            mutation: Mutation::new("update_transaction", messages::TRANSACTION_UPDATE_FAILED),
            saved: None,
        }
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    pub fn draft(&self) -> &TransactionDraft {
        &self.draft
    }

    pub fn state(&self) -> MutationState {
        self.mutation.state()
    }

    pub fn mutation(&self) -> &Mutation {
        &self.mutation
    }

    /// The transaction returned by the last successful submit.
    pub fn saved(&self) -> Option<&Transaction> {
        self.saved.as_ref()
    }

    /// Updates one field of the draft and forgets its error. Fields that do not belong to a
    /// transaction are ignored, as is a type that is neither `income` nor `expense`.
    pub fn edit(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        match field {
            Field::Type => match TransactionType::from_str(&value) {
                Ok(t) => self.draft.set_type(t),
                Err(_) => {
                    debug!("Ignoring unknown transaction type '{value}'");
                    return;
                }
            },
            Field::Amount => self.draft.set_amount(value),
            Field::Category => self.draft.set_category(value),
            Field::Date => self.draft.set_date(value),
            Field::Description => self.draft.set_description(value),
            Field::Name | Field::Email | Field::Password => {
                trace!("Field '{field}' is not part of a transaction");
                return;
            }
        }
        self.mutation.clear_field_error(field);
    }

    pub fn set_type(&mut self, value: TransactionType) {
        self.draft.set_type(value);
        self.mutation.clear_field_error(Field::Type);
    }

    /// The errors of the draft as it is now. Does not change the displayed errors.
    pub fn validate(&self) -> FieldErrors {
        self.draft.validate()
    }

    pub fn can_submit(&self) -> bool {
        !self.mutation.is_busy()
    }

    pub fn submit_label(&self) -> &'static str {
        if self.is_editing() {
            self.mutation.label(messages::SAVE, messages::SAVING)
        } else {
            self.mutation.label(messages::CREATE, messages::CREATING)
        }
    }

    /// Sends the draft. A new transaction is created, an edited one is replaced as a whole.
    ///
    /// After a successful create the draft goes back to its initial values. After a successful
    /// edit the draft keeps the saved values.
    pub async fn submit(&mut self, api: &dyn BudgetApi) -> Outcome {
        let editing = self.editing.clone();
        let mut saved = None;
        let slot = &mut saved;
        let outcome = self
            .mutation
            .submit(
                self.draft.clone(),
                |draft| draft.validate(),
                |draft| async move {
                    let payload = draft.to_new_transaction()?;
                    let transaction = match editing {
                        Some(id) => api.update_transaction(&id, &payload).await?,
                        None => api.create_transaction(&payload).await?,
                    };
                    *slot = Some(transaction);
                    Ok(())
                },
            )
            .await;

        if outcome.is_success() {
            if !self.is_editing() {
                self.draft = TransactionDraft::default();
            }
            self.saved = saved;
        }
        outcome
    }
}

impl Drop for TransactionForm {
    fn drop(&mut self) {
        self.mutation.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{SessionStore, TestApi};

    fn api() -> TestApi {
        TestApi::new(SessionStore::in_memory())
    }

    fn filled(form: &mut TransactionForm) {
        form.edit(Field::Amount, "150.50");
        form.edit(Field::Category, "c-food");
        form.edit(Field::Date, "2025-10-20");
        form.edit(Field::Description, "Courses");
    }

    #[tokio::test]
    async fn test_invalid_amount_is_not_sent() {
        let api = api();
        let mut form = TransactionForm::create();
        filled(&mut form);
        form.edit(Field::Amount, "-5");

        let outcome = form.submit(&api).await;

        assert!(matches!(outcome, Outcome::Invalid(_)));
        assert_eq!(api.calls(), 0);
        assert_eq!(
            form.state().field_error(Field::Amount),
            Some(messages::AMOUNT_MUST_BE_POSITIVE)
        );

        form.edit(Field::Amount, "150.50");
        assert_eq!(form.state().field_error(Field::Amount), None);
    }

    #[tokio::test]
    async fn test_abandoned_submit_frees_the_form() {
        let api = api();
        let mut form = TransactionForm::create();
        filled(&mut form);

        api.stall_next();
        let stalled =
            tokio::time::timeout(std::time::Duration::from_millis(20), form.submit(&api)).await;
        assert!(stalled.is_err());
        assert!(!form.state().is_busy());
        assert!(form.can_submit());
        assert_eq!(form.submit_label(), messages::CREATE);

        let outcome = form.submit(&api).await;
        assert_eq!(outcome, Outcome::Succeeded);
        assert!(form.saved().is_some());
    }

    #[tokio::test]
    async fn test_drop_cancels_shared_mutation() {
        let form = TransactionForm::create();
        let mutation = form.mutation().clone();
        drop(form);
        assert_eq!(mutation.state().generation(), 1);
        assert!(!mutation.is_busy());
    }

    #[tokio::test]
    async fn test_create_resets_draft() {
        let api = api();
        let before = api.transactions().len();
        let mut form = TransactionForm::create();
        filled(&mut form);
        form.set_type(TransactionType::Income);

        let outcome = form.submit(&api).await;

        assert_eq!(outcome, Outcome::Succeeded);
        assert_eq!(form.draft(), &TransactionDraft::default());
        assert_eq!(api.transactions().len(), before + 1);
        let saved = form.saved().unwrap();
        assert_eq!(saved.r#type(), TransactionType::Income);
        assert_eq!(saved.description(), Some("Courses"));
    }

    #[tokio::test]
    async fn test_edit_replaces_and_keeps_draft() {
        let api = api();
        let original = api.transactions()[0].clone();
        let mut form = TransactionForm::update(&original);
        assert_eq!(form.submit_label(), messages::SAVE);
        form.edit(Field::Amount, "99");
        form.edit(Field::Description, "");

        let outcome = form.submit(&api).await;

        assert_eq!(outcome, Outcome::Succeeded);
        assert_eq!(form.draft().amount(), "99");
        let stored = api
            .transactions()
            .into_iter()
            .find(|t| t.id() == original.id())
            .unwrap();
        assert_eq!(stored.amount().to_string(), "99.00");
        assert_eq!(stored.description(), None);
        assert_eq!(stored.category(), original.category());
    }

    #[tokio::test]
    async fn test_failure_keeps_draft_and_sets_message() {
        let api = api();
        api.fail_next();
        let mut form = TransactionForm::create();
        filled(&mut form);
        let draft = form.draft().clone();

        let outcome = form.submit(&api).await;

        assert_eq!(outcome, Outcome::Failed);
        assert_eq!(form.draft(), &draft);
        assert_eq!(
            form.state().error(),
            Some(messages::TRANSACTION_CREATE_FAILED)
        );
        assert!(form.can_submit());
        assert_eq!(form.submit_label(), messages::CREATE);
    }

    #[test]
    fn test_edit_ignores_foreign_fields() {
        let mut form = TransactionForm::create();
        let draft = form.draft().clone();
        form.edit(Field::Email, "a@example.com");
        form.edit(Field::Type, "transfer");
        assert_eq!(form.draft(), &draft);
        form.edit(Field::Type, "income");
        assert_eq!(form.draft().r#type(), TransactionType::Income);
    }

    #[test]
    fn test_validate_twice() {
        let form = TransactionForm::create();
        assert_eq!(form.validate(), form.validate());
        assert!(form.validate().contains(Field::Amount));
    }
}
