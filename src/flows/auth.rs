//! Sign-in and sign-up forms.
//!
//! Both forms leave the session token to the collaborator. What they keep after a successful
//! submit is the user that was signed in; the password is wiped from the draft.

use crate::api::BudgetApi;
use crate::form::{Field, LoginDraft, RegisterDraft, Validate};
use crate::messages;
use crate::model::User;
use crate::mutation::{Mutation, MutationState, Outcome};

#[derive(Debug)]
pub struct LoginForm {
    draft: LoginDraft,
    mutation: Mutation,
    user: Option<User>,
}

impl Default for LoginForm {
    fn default() -> Self {
        Self {
            draft: LoginDraft::default(),
            mutation: Mutation::new("login", messages::LOGIN_FAILED),
            user: None,
        }
    }
}

impl LoginForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draft(&self) -> &LoginDraft {
        &self.draft
    }

    pub fn state(&self) -> MutationState {
        self.mutation.state()
    }

    pub fn mutation(&self) -> &Mutation {
        &self.mutation
    }

    /// The user signed in by the last successful submit.
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn edit_email(&mut self, value: impl Into<String>) {
        self.draft.set_email(value);
        self.mutation.clear_field_error(Field::Email);
        self.mutation.clear_error();
    }

    pub fn edit_password(&mut self, value: impl Into<String>) {
        self.draft.set_password(value);
        self.mutation.clear_field_error(Field::Password);
        self.mutation.clear_error();
    }

    pub fn submit_label(&self) -> &'static str {
        self.mutation.label(messages::LOGIN, messages::LOGGING_IN)
    }

    pub async fn submit(&mut self, api: &dyn BudgetApi) -> Outcome {
        let mut signed_in = None;
        let slot = &mut signed_in;
        let outcome = self
            .mutation
            .submit(
                self.draft.clone(),
                |draft| draft.validate(),
                |draft| async move {
                    let auth = api.login(&draft.to_credentials()).await?;
                    *slot = Some(auth.user().clone());
                    Ok(())
                },
            )
            .await;

        if outcome.is_success() {
            self.draft.clear_password();
            self.user = signed_in;
        }
        outcome
    }
}

impl Drop for LoginForm {
    fn drop(&mut self) {
        self.mutation.cancel();
    }
}

#[derive(Debug)]
pub struct RegisterForm {
    draft: RegisterDraft,
    mutation: Mutation,
    user: Option<User>,
}

impl Default for RegisterForm {
    fn default() -> Self {
        Self {
            draft: RegisterDraft::default(),
            mutation: Mutation::new("register", messages::REGISTER_FAILED),
            user: None,
        }
    }
}

impl RegisterForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draft(&self) -> &RegisterDraft {
        &self.draft
    }

    pub fn state(&self) -> MutationState {
        self.mutation.state()
    }

    pub fn mutation(&self) -> &Mutation {
        &self.mutation
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn edit_name(&mut self, value: impl Into<String>) {
        self.draft.set_name(value);
        self.mutation.clear_field_error(Field::Name);
        self.mutation.clear_error();
    }

    pub fn edit_email(&mut self, value: impl Into<String>) {
        self.draft.set_email(value);
        self.mutation.clear_field_error(Field::Email);
        self.mutation.clear_error();
    }

    pub fn edit_password(&mut self, value: impl Into<String>) {
        self.draft.set_password(value);
        self.mutation.clear_field_error(Field::Password);
        self.mutation.clear_error();
    }

    pub fn submit_label(&self) -> &'static str {
        self.mutation.label(messages::REGISTER, messages::REGISTERING)
    }

    pub async fn submit(&mut self, api: &dyn BudgetApi) -> Outcome {
        let mut signed_in = None;
        let slot = &mut signed_in;
        let outcome = self
            .mutation
            .submit(
                self.draft.clone(),
                |draft| draft.validate(),
                |draft| async move {
                    let auth = api.register(&draft.to_registration()).await?;
                    *slot = Some(auth.user().clone());
                    Ok(())
                },
            )
            .await;

        if outcome.is_success() {
            self.draft.clear_password();
            self.user = signed_in;
        }
        outcome
    }
}

impl Drop for RegisterForm {
    fn drop(&mut self) {
        self.mutation.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{SessionStore, TestApi};

    #[tokio::test]
    async fn test_login_success_clears_password() {
        let api = TestApi::new(SessionStore::in_memory());
        let mut form = LoginForm::new();
        form.edit_email("demo@example.com");
        form.edit_password("demo1234");

        let outcome = form.submit(&api).await;

        assert_eq!(outcome, Outcome::Succeeded);
        assert!(!form.draft().has_password());
        assert_eq!(form.draft().email(), "demo@example.com");
        assert_eq!(form.user().map(User::id), Some("u-demo"));
        assert!(api.session().is_authenticated());
    }

    #[tokio::test]
    async fn test_login_failure_shows_generic_message() {
        let api = TestApi::new(SessionStore::in_memory());
        let mut form = LoginForm::new();
        form.edit_email("demo@example.com");
        form.edit_password("wrong");

        let outcome = form.submit(&api).await;

        assert_eq!(outcome, Outcome::Failed);
        assert_eq!(form.state().error(), Some(messages::LOGIN_FAILED));
        assert!(form.draft().has_password());
        assert!(!api.session().is_authenticated());

        form.edit_password("again");
        assert_eq!(form.state().error(), None);
    }

    #[tokio::test]
    async fn test_login_requires_fields() {
        let api = TestApi::new(SessionStore::in_memory());
        let mut form = LoginForm::new();

        let outcome = form.submit(&api).await;

        assert!(matches!(outcome, Outcome::Invalid(ref e) if e.len() == 2));
        assert_eq!(api.calls(), 0);
        assert_eq!(form.submit_label(), messages::LOGIN);
    }

    #[tokio::test]
    async fn test_register() {
        let api = TestApi::empty(SessionStore::in_memory());
        let mut form = RegisterForm::new();
        form.edit_name("Léa");
        form.edit_email("lea@example.com");

        assert!(matches!(form.submit(&api).await, Outcome::Invalid(_)));
        assert_eq!(
            form.state().field_error(Field::Password),
            Some(messages::PASSWORD_REQUIRED)
        );

        form.edit_password("secret");
        assert_eq!(form.submit(&api).await, Outcome::Succeeded);
        assert_eq!(form.user().map(User::name), Some("Léa"));
        assert!(!form.draft().has_password());
        assert!(api.session().is_authenticated());
    }
}
