mod config_cmd;
mod init;
mod session;
mod task;
mod verify;

pub use config_cmd::run_config;
pub use init::run_init;
pub use session::run_session;
pub use task::run_task;
pub use verify::run_verify;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "moralguru")]
#[command(author, version, about = "Daily moral tasks and quote positivity checks from a Gemini-powered guru")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (can repeat: -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors and results
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Log format: text (default) or json
    #[arg(long, value_name = "FORMAT", global = true)]
    pub log_format: Option<String>,

    /// Use alternate config file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Override the Gemini model for this run
    #[arg(long, value_name = "NAME", global = true)]
    pub model: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Ask the guru for a new moral task
    Task {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check whether a quote is positive
    Verify {
        /// The quote to verify ("-" or omitted reads stdin when not interactive)
        quote: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Interactive session: browse tasks and verify quotes
    Session,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show effective config (secrets redacted)
    Show,

    /// Validate config file
    Validate,

    /// Print config file path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_verify_with_global_flags() {
        let cli = Cli::parse_from(["moralguru", "verify", "Be kind.", "--json", "-vv", "--model", "gemini-2.0-flash"]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.model.as_deref(), Some("gemini-2.0-flash"));
        match cli.command {
            Some(Commands::Verify { quote, json }) => {
                assert_eq!(quote.as_deref(), Some("Be kind."));
                assert!(json);
            }
            _ => panic!("expected verify command"),
        }
    }

    #[test]
    fn test_parse_no_command() {
        let cli = Cli::parse_from(["moralguru", "--quiet"]);
        assert!(cli.quiet);
        assert!(cli.command.is_none());
    }
}
