use budget_client::args::{Args, CategoriesCommand, Command, TransactionsCommand};
use budget_client::commands::{self, Prompt};
use budget_client::{connect, Config, Mode, Result, SessionStore};
use clap::Parser;
use std::process::ExitCode;
use tracing::{debug, error, trace};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = args.common().log_level();
    init_logger(log_level);
    debug!("Log level set to {}", log_level.to_string().to_lowercase());

    match main_inner(args).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with error: {e}");
            ExitCode::FAILURE
        }
    }
}

pub async fn main_inner(args: Args) -> Result<()> {
    trace!("{args:?}");
    let home = args.common().budget_home().path();

    if let Command::Init(init_args) = args.command() {
        commands::init(home, init_args.api_url()).await?.print();
        return Ok(());
    }

    // This allows for running the program without a budget server. When BUDGET_IN_TEST_MODE is
    // set and non-zero in length, then the mode will be Mode::Test, otherwise it will be
    // Mode::Http.
    let mode = Mode::from_env();
    let config = Config::load(home).await?;
    let session = SessionStore::load(config.session_path()).await?;
    let api = connect(&config, mode, session)?;
    let api = api.as_ref();

    // Route to appropriate command handler
    let _: () = match args.command() {
        Command::Init(_) => {}
        Command::Login(a) => commands::login(api, a.email(), a.password())
            .await?
            .print(),
        Command::Register(a) => commands::register(api, a.name(), a.email(), a.password())
            .await?
            .print(),
        Command::Logout => commands::logout(api).await?.print(),
        Command::Whoami => commands::whoami(api).await?.print(),

        Command::Transactions(t) => match t.command() {
            TransactionsCommand::List(a) => commands::list_transactions(api, &config, a.page())
                .await?
                .print(),
            TransactionsCommand::Add(a) => commands::add_transaction(api, a).await?.print(),
            TransactionsCommand::Edit(a) => commands::edit_transaction(api, &config, a)
                .await?
                .print(),
            TransactionsCommand::Delete(a) => commands::delete_transaction(api, a, &mut Prompt)
                .await?
                .print(),
        },

        Command::Categories(c) => match c.command() {
            CategoriesCommand::List => commands::list_categories(api).await?.print(),
            CategoriesCommand::Add(a) => commands::add_category(api, a).await?.print(),
            CategoriesCommand::Delete(a) => commands::delete_category(api, a, &mut Prompt)
                .await?
                .print(),
        },
    };
    Ok(())
}

/// Initializes the tracing subscriber.
pub fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => {
            // RUST_LOG exists; use it.
            EnvFilter::from_default_env()
        }
        None => {
            // RUST_LOG does not exist; use default log level for this crate only.
            EnvFilter::new(format!(
                "{}={},{}={}",
                env!("CARGO_CRATE_NAME"),
                level,
                "budget_client",
                level
            ))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
