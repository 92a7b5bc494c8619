//! Handlers for `budget categories ...`.

use crate::api::BudgetApi;
use crate::args::{AddCategoryArgs, DeleteArgs};
use crate::commands::{finish, Confirm, Out};
use crate::flows::CategoryPicker;
use crate::messages;
use crate::model::Category;
use crate::Result;
use anyhow::Context;

async fn picker(api: &dyn BudgetApi) -> Result<CategoryPicker> {
    let categories = api
        .list_categories()
        .await
        .context("Unable to fetch categories")?;
    Ok(CategoryPicker::new(categories))
}

/// Handles `budget categories list`.
pub async fn list_categories(api: &dyn BudgetApi) -> Result<Out<Vec<Category>>> {
    let picker = picker(api).await?;
    let message = match picker.empty_message() {
        Some(empty) => empty.to_string(),
        None => picker
            .categories()
            .iter()
            .map(|c| format!("{:<24}  [{}]", c.label(), c.id()))
            .collect::<Vec<_>>()
            .join("\n"),
    };
    Ok(Out::new(message, picker.categories().to_vec()))
}

/// Handles `budget categories add`. The name is checked against the categories that exist now.
pub async fn add_category(api: &dyn BudgetApi, args: &AddCategoryArgs) -> Result<Out<Category>> {
    let mut picker = picker(api).await?;
    picker.edit_name(args.name());
    picker.set_color(args.color().map(str::to_string));
    picker.set_icon(args.icon().map(str::to_string));

    let outcome = picker.create(api).await;
    finish(outcome, &picker.create_state())?;

    let created = picker
        .selected()
        .and_then(|id| picker.categories().iter().find(|c| c.id() == id))
        .cloned()
        .context("The created category is missing")?;
    Ok(Out::new(
        format!("Created category {} [{}]", created.label(), created.id()),
        created,
    ))
}

/// Handles `budget categories delete`. Asks for confirmation unless `--yes` was given.
pub async fn delete_category(
    api: &dyn BudgetApi,
    args: &DeleteArgs,
    confirm: &mut dyn Confirm,
) -> Result<Out<()>> {
    let mut picker = CategoryPicker::new(Vec::new());
    picker.request_delete(args.id());
    let question = picker
        .confirm_message()
        .unwrap_or(messages::CONFIRM_DELETE_CATEGORY);
    if !args.yes() && !confirm.confirm(question)? {
        picker.cancel_delete();
        return Ok("Cancelled".into());
    }
    let outcome = picker.confirm_delete(api).await;
    finish(outcome, &picker.delete_state())?;
    Ok(format!("Deleted category {}", args.id()).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::TestEnv;

    #[tokio::test]
    async fn test_list_categories() {
        let env = TestEnv::new().await;
        let out = list_categories(&env.api()).await.unwrap();
        assert_eq!(out.structure().unwrap().len(), 5);
        assert!(out.message().contains("🏠 Loyer"));
    }

    #[tokio::test]
    async fn test_add_category() {
        let env = TestEnv::new().await;
        let args = AddCategoryArgs::new("Santé", Some("#ef4444".to_string()), None);
        let out = add_category(&env.api(), &args).await.unwrap();
        assert_eq!(out.structure().unwrap().name(), "Santé");
        assert_eq!(env.api().categories().len(), 6);
    }

    #[tokio::test]
    async fn test_add_duplicate_category_is_not_sent() {
        let env = TestEnv::new().await;
        let args = AddCategoryArgs::new("loyer", None, None);
        let err = add_category(&env.api(), &args).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            format!("name: {}", messages::CATEGORY_ALREADY_EXISTS)
        );
        // Only the list was fetched.
        assert_eq!(env.api().calls(), 1);
    }

    #[tokio::test]
    async fn test_delete_category() {
        let env = TestEnv::new().await;
        let mut accept = |_: &str| true;
        delete_category(&env.api(), &DeleteArgs::new("c-leisure", false), &mut accept)
            .await
            .unwrap();
        assert_eq!(env.api().categories().len(), 4);

        let err = delete_category(&env.api(), &DeleteArgs::new("c-leisure", true), &mut accept)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), messages::DELETE_FAILED);
    }
}
