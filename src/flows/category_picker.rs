use crate::api::BudgetApi;
use crate::form::{CategoryDraft, Field};
use crate::messages;
use crate::model::Category;
use crate::mutation::{ConfirmGate, Mutation, MutationState, Outcome};
use tracing::trace;

/// Picks the category of a transaction, and creates or deletes categories on the way.
#[derive(Debug)]
pub struct CategoryPicker {
    categories: Vec<Category>,
    selected: Option<String>,
    draft: CategoryDraft,
    create: Mutation,
    delete: Mutation,
    confirm: ConfirmGate<String>,
}

impl CategoryPicker {
    pub fn new(categories: Vec<Category>) -> Self {
        Self {
            categories,
            selected: None,
            draft: CategoryDraft::default(),
            create: Mutation::new("create_category", messages::CATEGORY_CREATE_FAILED),
            delete: Mutation::new("delete_category", messages::DELETE_FAILED),
            confirm: ConfirmGate::default(),
        }
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Replaces the list, e.g. after the caller re-fetched it.
    pub fn set_categories(&mut self, categories: Vec<Category>) {
        self.categories = categories;
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn empty_message(&self) -> Option<&'static str> {
        self.is_empty().then_some(messages::NO_CATEGORIES)
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn select(&mut self, id: impl Into<String>) {
        self.selected = Some(id.into());
    }

    pub fn draft(&self) -> &CategoryDraft {
        &self.draft
    }

    /// Updates the name of the new category and forgets the error shown for it.
    pub fn edit_name(&mut self, value: impl Into<String>) {
        self.draft.set_name(value);
        self.create.clear_field_error(Field::Name);
        self.create.clear_error();
    }

    pub fn set_color(&mut self, value: Option<String>) {
        self.draft.set_color(value);
    }

    pub fn set_icon(&mut self, value: Option<String>) {
        self.draft.set_icon(value);
    }

    pub fn can_create(&self) -> bool {
        !self.draft.is_blank() && !self.create.is_busy()
    }

    pub fn create_label(&self) -> &'static str {
        self.create.label(messages::CREATE, messages::CREATING)
    }

    pub fn delete_label(&self) -> &'static str {
        self.delete.label(messages::DELETE, messages::DELETING)
    }

    pub fn create_state(&self) -> MutationState {
        self.create.state()
    }

    pub fn delete_state(&self) -> MutationState {
        self.delete.state()
    }

    pub fn create_mutation(&self) -> &Mutation {
        &self.create
    }

    pub fn delete_mutation(&self) -> &Mutation {
        &self.delete
    }

    /// Creates a category from the draft. The name must not be blank and must not already be in
    /// the list, ignoring case. On success the new category is appended, selected, and the draft
    /// is emptied.
    pub async fn create(&mut self, api: &dyn BudgetApi) -> Outcome {
        let mut created = None;
        let slot = &mut created;
        let outcome = self
            .create
            .submit(
                self.draft.to_new_category(),
                |_| self.draft.validate_against(&self.categories),
                |new| async move {
                    *slot = Some(api.create_category(&new).await?);
                    Ok(())
                },
            )
            .await;

        if let (true, Some(category)) = (outcome.is_success(), created) {
            self.selected = Some(category.id().to_string());
            self.categories.push(category);
            self.draft = CategoryDraft::default();
        }
        outcome
    }

    /// Asks for confirmation before deleting category `id`. Ignored while a delete is running.
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

    /// The category waiting for confirmation, if any.
    pub fn pending_delete(&self) -> Option<&str> {
        self.confirm.target().map(String::as_str)
    }

    pub fn confirm_message(&self) -> Option<&'static str> {
        self.confirm
            .is_open()
            .then_some(messages::CONFIRM_DELETE_CATEGORY)
    }

    /// Deletes the category waiting for confirmation. On failure the confirmation stays open so
    /// the user can retry or cancel.
    pub async fn confirm_delete(&mut self, api: &dyn BudgetApi) -> Outcome {
        let target = self.confirm.target().cloned();
        let outcome = self
            .delete
            .submit_confirmed(&mut self.confirm, |id| async move {
                api.delete_category(&id).await
            })
            .await;

        if let (true, Some(id)) = (outcome.is_success(), target) {
            self.categories.retain(|c| c.id() != id);
            if self.selected.as_deref() == Some(id.as_str()) {
                self.selected = None;
            }
        }
        outcome
    }
}

impl Drop for CategoryPicker {
    fn drop(&mut self) {
        self.create.cancel();
        self.delete.cancel();
    }
}
