//! The collaborator that persists writes and answers reads.
//!
//! `BudgetApi` is the seam between the flows and the outside world. `HttpApi` talks to the budget
//! server over HTTP. `TestApi` keeps everything in memory so that the whole program, and its
//! tests, can run without a server.

mod http;
mod test_api;

pub use http::HttpApi;
pub use test_api::TestApi;

use crate::model::{
    AuthResponse, Category, Credentials, NewCategory, NewTransaction, Registration, Transaction,
    User,
};
use crate::{Config, Result, SessionStore};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// When this environment variable is set and not empty, `Mode::from_env` returns `Mode::Test`.
pub const TEST_MODE_VAR: &str = "BUDGET_IN_TEST_MODE";

/// The persistence operations the client relies on. Every method either succeeds or returns an
/// error; callers only branch on which.
#[async_trait::async_trait]
pub trait BudgetApi: Send + Sync {
    /// Signs in and stores the session token.
    async fn login(&self, credentials: &Credentials) -> Result<AuthResponse>;

    /// Creates an account, signs in and stores the session token.
    async fn register(&self, registration: &Registration) -> Result<AuthResponse>;

    /// Forgets the session token.
    async fn logout(&self) -> Result<()>;

    /// The user the session token belongs to.
    async fn current_user(&self) -> Result<User>;

    /// Transactions, most recent first.
    async fn list_transactions(&self, page: Page) -> Result<Vec<Transaction>>;

    async fn create_transaction(&self, transaction: &NewTransaction) -> Result<Transaction>;

    /// Replaces every field of the transaction `id`.
    async fn update_transaction(&self, id: &str, transaction: &NewTransaction)
        -> Result<Transaction>;

    async fn delete_transaction(&self, id: &str) -> Result<()>;

    async fn list_categories(&self) -> Result<Vec<Category>>;

    async fn create_category(&self, category: &NewCategory) -> Result<Category>;

    async fn delete_category(&self, id: &str) -> Result<()>;
}

/// A window over a list, expressed as an offset and a number of items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    offset: u32,
    limit: u32,
}

impl Page {
    pub fn new(offset: u32, limit: u32) -> Self {
        Self { offset, limit }
    }

    /// The one-based page `number` when pages hold `size` items. Page 0 is treated as page 1.
    pub fn number(number: u32, size: u32) -> Self {
        Self::new(number.saturating_sub(1).saturating_mul(size), size)
    }

    pub fn offset(&self) -> u32 {
        self.offset
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// The page that follows this one.
    pub fn next(&self) -> Self {
        Self::new(self.offset.saturating_add(self.limit), self.limit)
    }
}

/// Which `BudgetApi` implementation to use.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Http,
    Test,
}

impl Mode {
    /// Returns `Mode::Test` if `BUDGET_IN_TEST_MODE` is set to something non-empty, otherwise
    /// `Mode::Http`.
    pub fn from_env() -> Self {
        match std::env::var(TEST_MODE_VAR) {
            Ok(value) if !value.is_empty() => Mode::Test,
            _ => Mode::Http,
        }
    }
}

/// Creates the collaborator for `mode`. The session is shared with the collaborator, which is the
/// only thing that writes to it.
pub fn connect(config: &Config, mode: Mode, session: SessionStore) -> Result<Box<dyn BudgetApi>> {
    debug!("Connecting in {mode:?} mode");
    match mode {
        Mode::Http => Ok(Box::new(HttpApi::new(config.api_url().clone(), session)?)),
        Mode::Test => Ok(Box::new(TestApi::new(session))),
    }
}
