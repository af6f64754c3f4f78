mod cli;
mod config;
mod error;
mod gemini;
mod ui;
mod view;

use clap::Parser;
use cli::{Cli, Commands};
use config::{Config, LogFormat};
use error::{ExitStatus, GuruError};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    ui::set_quiet_mode(cli.quiet);

    // Run command
    let result = run_command(cli).await;

    match result {
        Ok(status) => status.into(),
        Err(e) => {
            tracing::debug!(error = ?e, "command failed");
            ui::print_error(&e.to_string());
            e.exit_status().into()
        }
    }
}

async fn run_command(cli: Cli) -> Result<ExitStatus, GuruError> {
    let config_override = cli.config.clone();

    // Init must work even when the existing config is unreadable
    let config = match cli.command {
        Some(Commands::Init { .. }) => Config::default(),
        _ => load_effective_config(&cli)?,
    };

    // Set up logging based on verbosity
    setup_logging(
        cli.verbose,
        cli.quiet,
        cli.log_format.as_deref(),
        config.settings.log_format,
    );
    tracing::debug!(model = %config.gemini.model, "configuration loaded");

    match cli.command {
        Some(Commands::Task { json }) => cli::run_task(&config, json).await,

        Some(Commands::Verify { quote, json }) => cli::run_verify(&config, quote, json).await,

        Some(Commands::Session) => cli::run_session(&config).await,

        Some(Commands::Config { command }) => {
            cli::run_config(command, &config, config_override.as_deref())?;
            Ok(ExitStatus::Success)
        }

        Some(Commands::Init { force }) => {
            cli::run_init(force, config_override.as_deref())?;
            Ok(ExitStatus::Success)
        }

        None => {
            // No command - open a session on a terminal, otherwise print one task
            if ui::is_interactive() {
                cli::run_session(&config).await
            } else {
                cli::run_task(&config, false).await
            }
        }
    }
}

fn load_effective_config(cli: &Cli) -> Result<Config, GuruError> {
    let mut config = config::load_config_or_default(cli.config.as_deref())?;
    if let Some(model) = cli.model.as_ref().filter(|m| !m.trim().is_empty()) {
        config.gemini.model = model.trim().to_string();
    }
    Ok(config)
}

fn setup_logging(verbose: u8, quiet: bool, format: Option<&str>, configured: LogFormat) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level));

    let json = match format {
        Some(f) => f.eq_ignore_ascii_case("json"),
        None => configured == LogFormat::Json,
    };

    // Logs go to stderr so JSON results on stdout stay clean
    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().without_time().with_target(false).with_writer(std::io::stderr))
            .init();
    }
}
