use std::io::IsTerminal;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use clap::Parser;
use lifeos_core::api::{ApiClient, HttpBackend};
use lifeos_core::error::CoreError;
use owo_colors::{OwoColorize, Style};
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod config;
mod parser;
mod session;
mod util;
mod views;

#[tokio::main]
async fn main() {
    let cli = cli::Cli::parse();

    let config = match config::Config::new() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} Invalid configuration: {}", "Error:".red().bold(), e);
            std::process::exit(2);
        }
    };
    if let Err(e) = init_tracing(&config.log_level) {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(2);
    }

    if let Err(e) = run(cli, &config).await {
        handle_error(e);
        std::process::exit(1);
    }
}

fn init_tracing(default_level: &str) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| anyhow!("invalid RUST_LOG / log_level filter: {e}"))?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .try_init()
        .map_err(|e| anyhow!("failed to install log subscriber: {e}"))
}

/// Run one command with the stored session, then write back whatever
/// cookies the backend set or cleared along the way.
async fn run(cli: cli::Cli, config: &config::Config) -> Result<()> {
    let session = session::load(&config.session_file)?;
    let client = ApiClient::with_session(&config.api_url, Arc::clone(&session))?;
    let backend = HttpBackend::new(client);

    let result = dispatch(cli.command, backend, config).await;

    if is_expired(&result) {
        session.clear();
    }
    session::save(&config.session_file, &session)?;
    result
}

async fn dispatch(command: cli::Commands, backend: HttpBackend, config: &config::Config) -> Result<()> {
    use cli::Commands;
    use commands::*;

    match command {
        Commands::Login(command) => auth::login(&backend, command).await,
        Commands::Logout => auth::logout(&backend).await,
        Commands::Calendar(command) => {
            calendar::calendar_command(backend, command, config.calendar.week_start).await
        }
        Commands::Project(command) => project::project_command(backend, command).await,
        Commands::Task(command) => task::task_command(backend, command).await,
        Commands::Capture(command) => {
            capture::capture_command(backend, command, &config.default_capture_source).await
        }
        Commands::Journal(command) => journal::journal_command(backend, command).await,
        Commands::Fitness(command) => fitness::fitness_command(backend, command).await,
    }
}

fn core_error(err: &anyhow::Error) -> Option<&CoreError> {
    err.chain().find_map(|cause| cause.downcast_ref::<CoreError>())
}

fn is_expired(result: &Result<()>) -> bool {
    matches!(
        result.as_ref().err().and_then(core_error),
        Some(CoreError::SessionExpired)
    )
}

fn handle_error(err: anyhow::Error) {
    let error_style = Style::new().red().bold();

    // context added on top of a core error, e.g. "The board was restored"
    let note = core_error(&err)
        .filter(|core| core.to_string() != err.to_string())
        .map(|_| err.to_string());

    match core_error(&err) {
        Some(CoreError::SessionExpired) => {
            eprintln!("{} Session expired.", "Error:".style(error_style));
            eprintln!("Run {} to sign in again.", "lifeos login".yellow());
        }
        Some(CoreError::Validation(errors)) => {
            eprintln!("{} Please fix the following:", "Error:".style(error_style));
            for (field, message) in errors.iter() {
                eprintln!("  {}: {}", field.yellow(), message);
            }
        }
        Some(CoreError::Failed { context, source }) => {
            eprintln!("{} {}", "Error:".style(error_style), context);
            eprintln!("  {}", source.to_string().bright_black());
        }
        Some(CoreError::Api { status, detail, .. }) => {
            eprintln!("{} {} ({})", "Error:".style(error_style), detail, status.bright_black());
        }
        Some(CoreError::Http(e)) => {
            eprintln!("{} Could not reach the Life OS backend: {}", "Error:".style(error_style), e);
        }
        Some(CoreError::InvalidInput(s)) => {
            eprintln!("{} Invalid input: {}", "Error:".style(error_style), s);
        }
        Some(CoreError::NotFound(s)) => {
            eprintln!("{} {}", "Error:".style(error_style), s);
        }
        _ => eprintln!("{} {}", "Error:".style(error_style), err),
    }

    if let Some(note) = note {
        eprintln!("{}", note.bright_black());
    }
}
