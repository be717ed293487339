//! vattend library root.
//! Exposes the attendance engine, the SQLite authority, the CLI parser and
//! the high-level `run()` entry point.

pub mod api;
pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod logging;
pub mod models;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;
use models::OperationKind;

/// Central command dispatcher
pub async fn dispatch(cli: &Cli, cfg: &Config) -> AppResult<()> {
    use cli::commands::{attendance, decode, init, log, roster, status, user};

    match &cli.command {
        Commands::Init => init::handle(cli).await,
        Commands::Config { print_config } => cli::commands::config::handle(*print_config, cfg).await,
        Commands::Decode { token } => decode::handle(token).await,
        Commands::User { action } => user::handle(action, cfg).await,
        Commands::Roster { dept, user, json } => roster::handle(*dept, *user, *json, cfg).await,
        Commands::Checkin(args) => attendance::handle(OperationKind::CheckIn, args, cfg).await,
        Commands::Checkout(args) => attendance::handle(OperationKind::CheckOut, args, cfg).await,
        Commands::Status { user_id } => status::handle(*user_id, cfg).await,
        Commands::Log { print, limit } => log::handle(*print, *limit, cfg).await,
    }
}

/// Entry point used by main.rs
pub async fn run() -> AppResult<()> {
    let cli = Cli::parse();

    let mut cfg = Config::load()?;
    if let Some(custom_db) = &cli.db {
        cfg.database = custom_db.clone();
    }

    logging::init(cli.verbose, &cfg.log_filter);
    tracing::debug!(database = %cfg.database, "configuration loaded");

    dispatch(&cli, &cfg).await
}
