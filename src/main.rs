mod cmd;
mod config;
mod context;
mod domain;
mod error;
mod infra;
mod services;
mod workflow;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cmd::config::{self as config_cmd, ConfigArgs};
use crate::cmd::line::{self, LineArgs};
use crate::cmd::repair::{self, RepairArgs};
use crate::cmd::ticket::{self, TicketArgs};
use crate::cmd::user::{self, UserArgs};
use crate::config::AppConfig;
use crate::context::AppContext;
use crate::error::{AppError, AppResult};
use crate::infra::helpdesk_api::HttpHelpdesk;
use crate::infra::http::ApiClient;
use crate::infra::line::LineSdk;
use crate::services::{MessagingSdk, StaticToken};

#[derive(Parser)]
#[command(name = "helpdesk", author, version, about = "IT helpdesk and repair-ticket client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage repair tickets as IT staff or administrator.
    Tickets(TicketArgs),
    /// Manage helpdesk users.
    Users(UserArgs),
    /// Submit and track repair requests as an employee.
    Repair(RepairArgs),
    /// Inspect the LINE identity for this session.
    Line(LineArgs),
    /// Manage CLI configuration.
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() {
    init_tracing();

    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        if let AppError::Http { status: 401, .. } = error {
            eprintln!("Sign in with `helpdesk config login --token <TOKEN>`.");
        }
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

async fn run() -> AppResult<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Config(args) => config_cmd::run(args.command),
        Commands::Tickets(args) => ticket::run(&load_context()?, args.command).await,
        Commands::Users(args) => user::run(&load_context()?, args.command).await,
        Commands::Repair(args) => repair::run(&load_context()?, args.command).await,
        Commands::Line(args) => line::run(&load_context()?, args.command).await,
    }
}

fn load_context() -> AppResult<AppContext> {
    Ok(build_context(AppConfig::load()?))
}

fn build_context(config: AppConfig) -> AppContext {
    if config.token.is_none() {
        info!("no API token configured; requests are sent without authorization");
    }

    let credentials = Arc::new(StaticToken::new(config.token.clone()));
    let helpdesk = Arc::new(HttpHelpdesk::new(
        ApiClient::new(config.api_base_url.clone()),
        credentials,
    ));

    let messaging: Option<Arc<dyn MessagingSdk>> = if config.line_sdk_enabled {
        Some(Arc::new(LineSdk::new(
            config.line_access_token.clone(),
            config.line_in_client,
        )))
    } else {
        None
    };

    AppContext::new(config, helpdesk, messaging)
}
