use budget_tracker::args::{Args, Command};
use budget_tracker::{commands, Config, Result};
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
            error!("Exiting with error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

pub async fn main_inner(args: Args) -> Result<()> {
    trace!("{args:?}");
    let home = args.common().budget_home().path();

    if let Command::Init = args.command() {
        commands::init(home).await?.print();
        return Ok(());
    }

    let config = Config::load(home).await?;
    let mut store = config.open_store();

    // Route to appropriate command handler
    let result = match args.command() {
        Command::Init => Ok(()),
        Command::Add(add_args) => commands::add(&mut store, add_args).map(|out| out.print()),
        Command::List(filter_args) => commands::list(&store, filter_args).map(|out| out.print()),
        Command::Totals(filter_args) => {
            commands::totals(&store, filter_args).map(|out| out.print())
        }
        Command::Update(update_args) => {
            commands::update(&mut store, update_args).map(|out| out.print())
        }
        Command::Delete(delete_args) => {
            commands::delete(&mut store, delete_args).map(|out| out.print())
        }
    };

    // Give any background sync a chance to finish before the runtime shuts down.
    if let Some(syncer) = store.syncer() {
        syncer.drain(config.sync().drain_timeout()).await;
    }
    result
}

/// Initializes the tracing subscriber.
pub fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => {
            // RUST_LOG exists; use it.
            EnvFilter::from_default_env()
        }
        None => {
            // RUST_LOG does not exist; use default log level for the library and binary only.
            EnvFilter::new(format!(
                "budget_tracker={},{}={}",
                level,
                env!("CARGO_CRATE_NAME"),
                level
            ))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
