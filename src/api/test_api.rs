//! Implements the `BudgetApi` trait using in-memory data for testing purposes.
//!
//! Note: this is compiled even in the "production" version of this app so that we can run the whole
//! app, top-to-bottom, without a budget server.

use crate::api::{BudgetApi, Page};
use crate::model::{
    Amount, AuthResponse, Category, Credentials, NewCategory, NewTransaction, Registration,
    Transaction, TransactionType, User,
};
use crate::{Result, SessionStore, Token};
use anyhow::{bail, ensure, Context};
use parking_lot::Mutex;
use std::io::Cursor;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{debug, error};
use uuid::Uuid;

/// An implementation of `BudgetApi` that does not use a server. It holds its data in memory and,
/// by default, is seeded with a demo account, some categories and some transactions.
///
/// Cloning yields a handle to the same data, which lets a test inspect what a flow did.
#[derive(Debug, Clone)]
pub struct TestApi {
    session: SessionStore,
    state: Arc<Mutex<TestState>>,
    fail_next: Arc<AtomicBool>,
    stall_next: Arc<AtomicBool>,
    calls: Arc<AtomicUsize>,
}

#[derive(Debug, Default, Clone)]
struct TestState {
    accounts: Vec<Account>,
    transactions: Vec<Transaction>,
    categories: Vec<Category>,
}

#[derive(Debug, Clone)]
struct Account {
    user: User,
    password: String,
}

impl TestApi {
    /// Create a `TestApi` with the seed data of this module.
    pub fn new(session: SessionStore) -> Self {
        // The seed constants are checked by the tests of this module.
        let state = or_empty(seed_state());
        Self::with_state(session, state)
    }

    /// Create a `TestApi` with no accounts, transactions or categories.
    pub fn empty(session: SessionStore) -> Self {
        Self::with_state(session, TestState::default())
    }

    fn with_state(session: SessionStore, state: TestState) -> Self {
        Self {
            session,
            state: Arc::new(Mutex::new(state)),
            fail_next: Arc::new(AtomicBool::new(false)),
            stall_next: Arc::new(AtomicBool::new(false)),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Makes the next call fail, whatever it is.
    pub fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    /// Makes the next call never answer.
    pub fn stall_next(&self) {
        self.stall_next.store(true, Ordering::SeqCst);
    }

    /// The number of calls made so far, failed ones included.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// All transactions currently held, most recent first.
    pub fn transactions(&self) -> Vec<Transaction> {
        sorted(self.state.lock().transactions.clone())
    }

    pub fn categories(&self) -> Vec<Category> {
        self.state.lock().categories.clone()
    }

    /// Counts the call and consumes a pending `fail_next` or `stall_next`.
    async fn enter(&self, operation: &str) -> Result<()> {
        let _ = self.calls.fetch_add(1, Ordering::SeqCst);
        debug!("TestApi: {operation}");
        if self.stall_next.swap(false, Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        if self.fail_next.swap(false, Ordering::SeqCst) {
            bail!("TestApi: {operation} failed on request");
        }
        Ok(())
    }

    async fn sign_in(&self, user: User) -> Result<AuthResponse> {
        let token = token_for(&user);
        self.session.set(Token::new(&token)).await?;
        Ok(AuthResponse::new(token, user))
    }
}

#[async_trait::async_trait]
impl BudgetApi for TestApi {
    async fn login(&self, credentials: &Credentials) -> Result<AuthResponse> {
        self.enter("login").await?;
        let user = {
            let state = self.state.lock();
            let account = state
                .accounts
                .iter()
                .find(|a| a.user.email() == credentials.email())
                .filter(|a| a.password == credentials.password());
            match account {
                Some(account) => account.user.clone(),
                None => bail!("401 Unauthorized: invalid email or password"),
            }
        };
        self.sign_in(user).await
    }

    async fn register(&self, registration: &Registration) -> Result<AuthResponse> {
        self.enter("register").await?;
        let user = {
            let mut state = self.state.lock();
            ensure!(
                !state
                    .accounts
                    .iter()
                    .any(|a| a.user.email() == registration.email()),
                "409 Conflict: '{}' is already registered",
                registration.email()
            );
            let user = User::new(
                Uuid::new_v4().to_string(),
                registration.name(),
                registration.email(),
            );
            state.accounts.push(Account {
                user: user.clone(),
                password: registration.password().to_string(),
            });
            user
        };
        self.sign_in(user).await
    }

    async fn logout(&self) -> Result<()> {
        self.enter("logout").await?;
        self.session.clear().await
    }

    async fn current_user(&self) -> Result<User> {
        self.enter("current_user").await?;
        let token = self
            .session
            .token()
            .context("401 Unauthorized: not signed in")?;
        let state = self.state.lock();
        state
            .accounts
            .iter()
            .map(|a| &a.user)
            .find(|u| token_for(u) == token.as_str())
            .cloned()
            .context("401 Unauthorized: unknown session")
    }

    async fn list_transactions(&self, page: Page) -> Result<Vec<Transaction>> {
        self.enter("list_transactions").await?;
        Ok(self
            .transactions()
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .collect())
    }

    async fn create_transaction(&self, transaction: &NewTransaction) -> Result<Transaction> {
        self.enter("create_transaction").await?;
        let created = Transaction::new(Uuid::new_v4().to_string(), transaction.clone());
        self.state.lock().transactions.push(created.clone());
        Ok(created)
    }

    async fn update_transaction(
        &self,
        id: &str,
        transaction: &NewTransaction,
    ) -> Result<Transaction> {
        self.enter("update_transaction").await?;
        let mut state = self.state.lock();
        let existing = state
            .transactions
            .iter_mut()
            .find(|t| t.id() == id)
            .with_context(|| format!("404 Not Found: no transaction '{id}'"))?;
        *existing = Transaction::new(id, transaction.clone());
        Ok(existing.clone())
    }

    async fn delete_transaction(&self, id: &str) -> Result<()> {
        self.enter("delete_transaction").await?;
        let mut state = self.state.lock();
        let before = state.transactions.len();
        state.transactions.retain(|t| t.id() != id);
        ensure!(
            state.transactions.len() < before,
            "404 Not Found: no transaction '{id}'"
        );
        Ok(())
    }

    async fn list_categories(&self) -> Result<Vec<Category>> {
        self.enter("list_categories").await?;
        Ok(self.categories())
    }

    async fn create_category(&self, category: &NewCategory) -> Result<Category> {
        self.enter("create_category").await?;
        let created = Category::new(Uuid::new_v4().to_string(), category.clone());
        self.state.lock().categories.push(created.clone());
        Ok(created)
    }

    async fn delete_category(&self, id: &str) -> Result<()> {
        self.enter("delete_category").await?;
        let mut state = self.state.lock();
        let before = state.categories.len();
        state.categories.retain(|c| c.id() != id);
        ensure!(
            state.categories.len() < before,
            "404 Not Found: no category '{id}'"
        );
        Ok(())
    }
}

/// Tokens are derived from the user id so that a session saved by one process is recognized by
/// the next one.
fn token_for(user: &User) -> String {
    format!("test-token-{}", user.id())
}

/// Most recent first. Dates are ISO strings so they sort lexically.
fn sorted(mut transactions: Vec<Transaction>) -> Vec<Transaction> {
    transactions.sort_by(|a, b| b.date().cmp(a.date()));
    transactions
}

/// A broken seed is logged and replaced by an empty backend.
fn or_empty(seed: Result<TestState>) -> TestState {
    seed.unwrap_or_else(|e| {
        error!("Unable to load the seed data, starting empty: {e:#}");
        TestState::default()
    })
}

/// Provides the seed data from this module.
fn seed_state() -> Result<TestState> {
    let accounts = load_csv(ACCOUNT_DATA)?
        .into_iter()
        .map(|row| match row.as_slice() {
            [id, name, email, password] => Ok(Account {
                user: User::new(id, name, email),
                password: password.clone(),
            }),
            _ => bail!("Bad account row {row:?}"),
        })
        .collect::<Result<Vec<_>>>()?;

    let categories = load_csv(CATEGORY_DATA)?
        .into_iter()
        .map(|row| match row.as_slice() {
            [id, name, color, icon] => Ok(Category::new(
                id,
                NewCategory::new(name)
                    .with_color(non_empty(color))
                    .with_icon(non_empty(icon)),
            )),
            _ => bail!("Bad category row {row:?}"),
        })
        .collect::<Result<Vec<_>>>()?;

    let transactions = load_csv(TRANSACTION_DATA)?
        .into_iter()
        .map(|row| match row.as_slice() {
            [id, kind, amount, category, date, description] => {
                let kind = TransactionType::from_str(kind)
                    .with_context(|| format!("Bad transaction type '{kind}'"))?;
                let amount = Amount::from_str(amount)
                    .with_context(|| format!("Bad amount '{amount}'"))?;
                Ok(Transaction::new(
                    id,
                    NewTransaction::new(kind, amount, category, date, non_empty(description)),
                ))
            }
            _ => bail!("Bad transaction row {row:?}"),
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(TestState {
        accounts,
        transactions,
        categories,
    })
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

/// Loads data from a CSV-formatted string, skipping the header row.
fn load_csv(csv_data: &str) -> Result<Vec<Vec<String>>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(Cursor::new(csv_data.as_bytes()));

    let mut rows: Vec<Vec<String>> = Vec::new();
    for result in rdr.records() {
        let record = result.context("Bad seed data")?;
        rows.push(record.iter().map(|field| field.to_string()).collect());
    }
    Ok(rows)
}

/// Seed accounts.
const ACCOUNT_DATA: &str = r##"id,name,email,password
u-demo,Camille Martin,demo@example.com,demo1234
"##;

/// Seed category data.
const CATEGORY_DATA: &str = r##"id,name,color,icon
c-food,Alimentation,#f97316,🛒
c-rent,Loyer,#6366f1,🏠
c-transport,Transport,#0ea5e9,🚆
c-salary,Salaire,#22c55e,💼
c-leisure,Loisirs,,
"##;

/// Seed transaction data.
const TRANSACTION_DATA: &str = r##"id,type,amount,category,date,description
t-001,income,2450.00,c-salary,2025-10-01,Salaire octobre
t-002,expense,850.00,c-rent,2025-10-02,Loyer octobre
t-003,expense,87.43,c-food,2025-10-04,Courses de la semaine
t-004,expense,75.00,c-transport,2025-10-05,Pass Navigo
t-005,expense,14.85,c-leisure,2025-10-08,
t-006,expense,63.21,c-food,2025-10-11,Marché
t-007,income,120.00,c-leisure,2025-10-12,Remboursement concert
t-008,expense,52.30,c-transport,2025-10-15,Essence
"##;
