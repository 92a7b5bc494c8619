//! These structs provide the CLI interface for the budget CLI.

use crate::model::TransactionType;
use clap::{Parser, Subcommand};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing::level_filters::LevelFilter;

/// budget: A command-line client for your personal budget tracker.
///
/// Record income and expenses, organize them in categories and review them page by page. The data
/// lives on a budget server; point the client at it with `budget init --api-url URL`, then sign
/// in with `budget login`.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the data directory and the configuration file.
    ///
    /// This is the first command you should run. By default the data directory is $HOME/budget;
    /// pass --budget-home (or set BUDGET_HOME) to put it somewhere else.
    Init(InitArgs),
    /// Sign in. The session is saved in the data directory until you log out.
    Login(LoginArgs),
    /// Create an account and sign in.
    Register(RegisterArgs),
    /// Sign out and forget the saved session.
    Logout,
    /// Show who is signed in.
    Whoami,
    /// List, add, edit or delete transactions.
    Transactions(TransactionsArgs),
    /// List, add or delete categories.
    Categories(CategoriesArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where budget configuration and session data is held. Defaults to ~/budget
    #[arg(long, env = "BUDGET_HOME", default_value_t = default_budget_home())]
    budget_home: DisplayPath,
}

impl Common {
    pub fn new(log_level: LevelFilter, budget_home: PathBuf) -> Self {
        Self {
            log_level,
            budget_home: budget_home.into(),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn budget_home(&self) -> &DisplayPath {
        &self.budget_home
    }
}

/// (Not shown): Args for the `budget init` command.
#[derive(Debug, Parser, Clone)]
pub struct InitArgs {
    /// The base URL of the budget server, e.g. http://localhost:3000/api
    #[arg(long)]
    api_url: String,
}

impl InitArgs {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
        }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }
}

/// (Not shown): Args for the `budget login` command.
#[derive(Debug, Parser, Clone)]
pub struct LoginArgs {
    #[arg(long)]
    email: String,

    /// Your password. Can also be given with BUDGET_PASSWORD.
    #[arg(long, env = "BUDGET_PASSWORD", hide_env_values = true)]
    password: String,
}

impl LoginArgs {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

/// (Not shown): Args for the `budget register` command.
#[derive(Debug, Parser, Clone)]
pub struct RegisterArgs {
    #[arg(long)]
    name: String,

    #[arg(long)]
    email: String,

    /// The password of the new account. Can also be given with BUDGET_PASSWORD.
    #[arg(long, env = "BUDGET_PASSWORD", hide_env_values = true)]
    password: String,
}

impl RegisterArgs {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

#[derive(Debug, Parser, Clone)]
pub struct TransactionsArgs {
    #[command(subcommand)]
    command: TransactionsCommand,
}

impl TransactionsArgs {
    pub fn new(command: TransactionsCommand) -> Self {
        Self { command }
    }

    pub fn command(&self) -> &TransactionsCommand {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum TransactionsCommand {
    /// List transactions, most recent first.
    List(ListTransactionsArgs),
    /// Record a new transaction.
    Add(AddTransactionArgs),
    /// Change a transaction. Options that are not given keep their current value.
    Edit(EditTransactionArgs),
    /// Delete a transaction.
    Delete(DeleteArgs),
}

/// (Not shown): Args for the `budget transactions list` command.
#[derive(Debug, Parser, Clone)]
pub struct ListTransactionsArgs {
    /// The page to show, starting at 1.
    #[arg(long, default_value_t = 1)]
    page: u32,
}

impl ListTransactionsArgs {
    pub fn new(page: u32) -> Self {
        Self { page }
    }

    pub fn page(&self) -> u32 {
        self.page
    }
}

/// (Not shown): Args for the `budget transactions add` command.
#[derive(Debug, Parser, Clone)]
pub struct AddTransactionArgs {
    /// Whether money comes in or goes out.
    #[arg(long = "type", value_enum, default_value_t = TransactionType::Expense)]
    kind: TransactionType,

    /// A positive amount, e.g. 12.50
    #[arg(long)]
    amount: String,

    /// The id of the category.
    #[arg(long)]
    category: String,

    /// The date as YYYY-MM-DD. Defaults to today.
    #[arg(long)]
    date: Option<String>,

    #[arg(long)]
    description: Option<String>,
}

impl AddTransactionArgs {
    pub fn new(
        kind: TransactionType,
        amount: impl Into<String>,
        category: impl Into<String>,
        date: Option<String>,
        description: Option<String>,
    ) -> Self {
        Self {
            kind,
            amount: amount.into(),
            category: category.into(),
            date,
            description,
        }
    }

    pub fn kind(&self) -> TransactionType {
        self.kind
    }

    pub fn amount(&self) -> &str {
        &self.amount
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn date(&self) -> Option<&str> {
        self.date.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// (Not shown): Args for the `budget transactions edit` command.
#[derive(Debug, Parser, Clone)]
pub struct EditTransactionArgs {
    /// The id of the transaction to change.
    id: String,

    #[arg(long = "type", value_enum)]
    kind: Option<TransactionType>,

    #[arg(long)]
    amount: Option<String>,

    #[arg(long)]
    category: Option<String>,

    #[arg(long)]
    date: Option<String>,

    /// The new description. Pass an empty string to remove it.
    #[arg(long)]
    description: Option<String>,
}

impl EditTransactionArgs {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: None,
            amount: None,
            category: None,
            date: None,
            description: None,
        }
    }

    pub fn with_kind(mut self, kind: TransactionType) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn with_amount(mut self, amount: impl Into<String>) -> Self {
        self.amount = Some(amount.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> Option<TransactionType> {
        self.kind
    }

    pub fn amount(&self) -> Option<&str> {
        self.amount.as_deref()
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn date(&self) -> Option<&str> {
        self.date.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// (Not shown): Args for the `delete` subcommands.
#[derive(Debug, Parser, Clone)]
pub struct DeleteArgs {
    /// The id of the item to delete.
    id: String,

    /// Do not ask for confirmation.
    #[arg(long, short)]
    yes: bool,
}

impl DeleteArgs {
    pub fn new(id: impl Into<String>, yes: bool) -> Self {
        Self { id: id.into(), yes }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn yes(&self) -> bool {
        self.yes
    }
}

#[derive(Debug, Parser, Clone)]
pub struct CategoriesArgs {
    #[command(subcommand)]
    command: CategoriesCommand,
}

impl CategoriesArgs {
    pub fn new(command: CategoriesCommand) -> Self {
        Self { command }
    }

    pub fn command(&self) -> &CategoriesCommand {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum CategoriesCommand {
    /// List categories.
    List,
    /// Create a category. Names are unique, ignoring case.
    Add(AddCategoryArgs),
    /// Delete a category.
    Delete(DeleteArgs),
}

/// (Not shown): Args for the `budget categories add` command.
#[derive(Debug, Parser, Clone)]
pub struct AddCategoryArgs {
    name: String,

    /// A display color, e.g. #f97316
    #[arg(long)]
    color: Option<String>,

    /// An emoji shown before the name.
    #[arg(long)]
    icon: Option<String>,
}

impl AddCategoryArgs {
    pub fn new(name: impl Into<String>, color: Option<String>, icon: Option<String>) -> Self {
        Self {
            name: name.into(),
            color,
            icon,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }

    pub fn icon(&self) -> Option<&str> {
        self.icon.as_deref()
    }
}

fn default_budget_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("budget"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --budget-home or BUDGET_HOME instead of relying on the default \
                budget home directory.",
            );
            PathBuf::from("budget")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn path(&self) -> &Path {
        &self.0
    }
}
