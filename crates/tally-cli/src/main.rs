use anyhow::Context;
use clap::Parser;
use owo_colors::{OwoColorize, Style};
use std::sync::Arc;
use tally_core::db;
use tally_core::engine::RecurringEngine;
use tally_core::error::CoreError;
use tally_core::store::SqliteStore;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

mod cli;
mod commands;
mod config;
mod notifier;
mod parser;
mod util;
mod views;

use cli::{Cli, Commands};
use notifier::LogNotifier;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    setup_logging(matches!(cli.command, Commands::Watch));

    if let Err(e) = run(cli).await {
        handle_error(e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = config::Config::new().context("Failed to load configuration")?;
    let pool = db::establish_connection(&config.database_path).await?;
    let store = Arc::new(SqliteStore::new(pool));
    let engine = Arc::new(RecurringEngine::with_notifier(
        store,
        config.engine,
        Arc::new(LogNotifier),
    ));

    match cli.command {
        Commands::Add(command) => commands::add::add_transaction(&engine, command).await,
        Commands::List(command) => commands::list::list_transactions(&engine, command).await,
        Commands::Pay(command) => commands::pay::pay_transaction(&engine, command).await,
        Commands::Edit(command) => commands::edit::edit_transaction(&engine, command).await,
        Commands::Cancel(command) => commands::cancel::cancel_series(&engine, command).await,
        Commands::Reschedule(command) => {
            commands::reschedule::reschedule_series(&engine, command).await
        }
        Commands::Renew => commands::renew::renew(&engine).await,
        Commands::Watch => commands::watch::watch(engine).await,
    }
}

/// Logs go to stderr so table output on stdout stays clean. `RUST_LOG`
/// overrides the default filter.
fn setup_logging(verbose: bool) {
    let default_filter = if verbose {
        "tally=info,tally_core=info"
    } else {
        "tally=warn,tally_core=warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_filter(filter),
        )
        .init();
}

fn handle_error(err: anyhow::Error) {
    let error_style = Style::new().red().bold();

    if let Some(core_error) = err.downcast_ref::<CoreError>() {
        match core_error {
            CoreError::NotFound(s) => {
                eprintln!("{} Not found: {}", "Error:".style(error_style), s);
            }
            CoreError::AmbiguousId(candidates) => {
                eprintln!("{}", "Error: Ambiguous ID.".style(error_style));
                eprintln!("Did you mean one of these?");
                for (id, description) in candidates {
                    eprintln!("  {} ({})", id.yellow(), description);
                }
            }
            CoreError::InvalidInput(s) => {
                eprintln!("{} Invalid input: {}", "Error:".style(error_style), s);
            }
            CoreError::InvalidRecurrence(s) => {
                eprintln!("{} Invalid recurrence: {}", "Error:".style(error_style), s);
            }
            _ => eprintln!("{} {:#}", "Error:".style(error_style), err),
        }
    } else {
        eprintln!("{} {:#}", "Error:".style(error_style), err);
    }
}
