//! Handlers for `budget transactions ...`.

use crate::api::{BudgetApi, Page};
use crate::args::{AddTransactionArgs, DeleteArgs, EditTransactionArgs};
use crate::commands::{finish, Confirm, Out};
use crate::flows::{TransactionForm, TransactionList, TransactionRow};
use crate::form::Field;
use crate::messages;
use crate::model::Transaction;
use crate::{Config, Result};
use anyhow::{bail, Context};
use serde::Serialize;
use tracing::debug;

/// One page of the transaction list.
#[derive(Debug, Clone, Serialize)]
pub struct TransactionPage {
    pub page: u32,
    pub has_more: bool,
    pub rows: Vec<TransactionRow>,
}

/// Handles `budget transactions list`.
pub async fn list_transactions(
    api: &dyn BudgetApi,
    config: &Config,
    page: u32,
) -> Result<Out<TransactionPage>> {
    let page = page.max(1);
    let size = config.page_size();
    let transactions = api
        .list_transactions(Page::number(page, size))
        .await
        .context("Unable to fetch transactions")?;
    let categories = api
        .list_categories()
        .await
        .context("Unable to fetch categories")?;

    // A full page means there may be more.
    let has_more = transactions.len() as u32 == size;
    let mut list = TransactionList::new(transactions, has_more);
    list.set_categories(categories);

    let rows = list.rows();
    let message = match list.empty_message() {
        Some((title, hint)) => format!("{title}\n{hint}"),
        None => {
            let mut lines: Vec<String> = rows.iter().map(row_line).collect();
            if list.can_load_more() {
                lines.push(format!("More with --page {}", page + 1));
            }
            lines.join("\n")
        }
    };
    Ok(Out::new(
        message,
        TransactionPage {
            page,
            has_more,
            rows,
        },
    ))
}

fn row_line(row: &TransactionRow) -> String {
    let mut line = format!(
        "{}  {}  {:<20}  {:>12}  [{}]",
        row.date, row.kind, row.category, row.amount, row.id
    );
    if let Some(description) = &row.description {
        line.push_str("  ");
        line.push_str(description);
    }
    line
}

/// Handles `budget transactions add`.
pub async fn add_transaction(
    api: &dyn BudgetApi,
    args: &AddTransactionArgs,
) -> Result<Out<Transaction>> {
    let mut form = TransactionForm::create();
    form.set_type(args.kind());
    form.edit(Field::Amount, args.amount());
    form.edit(Field::Category, args.category());
    if let Some(date) = args.date() {
        form.edit(Field::Date, date);
    }
    if let Some(description) = args.description() {
        form.edit(Field::Description, description);
    }
    submit(api, form).await
}

/// Handles `budget transactions edit`. Options that are not given keep their current value.
pub async fn edit_transaction(
    api: &dyn BudgetApi,
    config: &Config,
    args: &EditTransactionArgs,
) -> Result<Out<Transaction>> {
    let existing = find_transaction(api, args.id(), config.page_size()).await?;
    let mut form = TransactionForm::update(&existing);
    if let Some(kind) = args.kind() {
        form.set_type(kind);
    }
    let fields = [
        (Field::Amount, args.amount()),
        (Field::Category, args.category()),
        (Field::Date, args.date()),
        (Field::Description, args.description()),
    ];
    for (field, value) in fields {
        if let Some(value) = value {
            form.edit(field, value);
        }
    }
    submit(api, form).await
}

async fn submit(api: &dyn BudgetApi, mut form: TransactionForm) -> Result<Out<Transaction>> {
    let outcome = form.submit(api).await;
    finish(outcome, &form.state())?;
    let saved = form
        .saved()
        .cloned()
        .context("The server did not return the saved transaction")?;
    let verb = if form.is_editing() { "Updated" } else { "Created" };
    Ok(Out::new(
        format!("{verb} transaction {}", saved.id()),
        saved,
    ))
}

/// There is no endpoint for a single transaction, so pages are walked until `id` shows up.
async fn find_transaction(api: &dyn BudgetApi, id: &str, page_size: u32) -> Result<Transaction> {
    let mut page = Page::new(0, page_size);
    loop {
        debug!("Looking for transaction {id} at offset {}", page.offset());
        let batch = api
            .list_transactions(page)
            .await
            .context("Unable to fetch transactions")?;
        let done = (batch.len() as u32) < page_size;
        if let Some(found) = batch.into_iter().find(|t| t.id() == id) {
            return Ok(found);
        }
        if done {
            bail!("There is no transaction with id '{id}'");
        }
        page = page.next();
    }
}

/// Handles `budget transactions delete`. Asks for confirmation unless `--yes` was given.
pub async fn delete_transaction(
    api: &dyn BudgetApi,
    args: &DeleteArgs,
    confirm: &mut dyn Confirm,
) -> Result<Out<()>> {
    let mut list = TransactionList::new(Vec::new(), false);
    list.request_delete(args.id());
    let question = list
        .confirm_message()
        .unwrap_or(messages::CONFIRM_DELETE_TRANSACTION);
    if !args.yes() && !confirm.confirm(question)? {
        list.cancel_delete();
        return Ok("Cancelled".into());
    }
    let outcome = list.confirm_delete(api).await;
    finish(outcome, &list.delete_state())?;
    Ok(format!("Deleted transaction {}", args.id()).into())
}
