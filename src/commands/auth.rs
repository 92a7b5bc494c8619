//! Session command handlers.
//!
//! This module implements the CLI commands for:
//! - `budget login` - sign in and save the session
//! - `budget register` - create an account and sign in
//! - `budget logout` - forget the session
//! - `budget whoami` - show the signed-in user

use crate::api::BudgetApi;
use crate::commands::{finish, Out};
use crate::flows::{LoginForm, RegisterForm};
use crate::messages;
use crate::model::User;
use crate::Result;
use anyhow::Context;

/// Handles `budget login`.
pub async fn login(api: &dyn BudgetApi, email: &str, password: &str) -> Result<Out<User>> {
    let mut form = LoginForm::new();
    form.edit_email(email);
    form.edit_password(password);
    let outcome = form.submit(api).await;
    finish(outcome, &form.state())?;
    let user = form.user().cloned().unwrap_or_default();
    Ok(Out::new(greeting(&user), user))
}

/// Handles `budget register`.
pub async fn register(
    api: &dyn BudgetApi,
    name: &str,
    email: &str,
    password: &str,
) -> Result<Out<User>> {
    let mut form = RegisterForm::new();
    form.edit_name(name);
    form.edit_email(email);
    form.edit_password(password);
    let outcome = form.submit(api).await;
    finish(outcome, &form.state())?;
    let user = form.user().cloned().unwrap_or_default();
    Ok(Out::new(greeting(&user), user))
}

/// Handles `budget logout`.
pub async fn logout(api: &dyn BudgetApi) -> Result<Out<()>> {
    api.logout().await.context("Unable to sign out")?;
    Ok("Signed out".into())
}

/// Handles `budget whoami`.
pub async fn whoami(api: &dyn BudgetApi) -> Result<Out<User>> {
    let user = api
        .current_user()
        .await
        .context("Not signed in, run 'budget login' first")?;
    Ok(Out::new(greeting(&user), user))
}

fn greeting(user: &User) -> String {
    format!("{} {}", messages::WELCOME, user.name())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::TestEnv;

    #[tokio::test]
    async fn test_login_then_whoami_then_logout() {
        let env = TestEnv::new().await;
        let api = env.api();

        let out = login(&api, "demo@example.com", "demo1234").await.unwrap();
        assert_eq!(out.message(), "Bienvenue ! Camille Martin");
        assert!(env.config().session_path().is_file());

        let out = whoami(&api).await.unwrap();
        assert_eq!(out.structure().map(User::id), Some("u-demo"));

        logout(&api).await.unwrap();
        assert!(!env.config().session_path().exists());
        assert!(whoami(&api).await.is_err());
    }

    #[tokio::test]
    async fn test_login_failure_message() {
        let env = TestEnv::new().await;
        let err = login(&env.api(), "demo@example.com", "nope")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), messages::LOGIN_FAILED);
    }

    #[tokio::test]
    async fn test_register_validation_message() {
        let env = TestEnv::new().await;
        let err = register(&env.api(), "", "x@example.com", "pw")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), format!("name: {}", messages::NAME_REQUIRED));
    }
}
