use crate::cli::ConfigCommands;
use crate::config::{self, Config};
use crate::error::{GuruError, Result};
use crate::ui;
use std::path::Path;

/// Run config subcommands
pub fn run_config(command: ConfigCommands, config: &Config, override_path: Option<&Path>) -> Result<()> {
    match command {
        ConfigCommands::Show => show_config(config),
        ConfigCommands::Validate => validate_config(config, override_path),
        ConfigCommands::Path => print_path(override_path),
    }
}

fn show_config(config: &Config) -> Result<()> {
    let redacted = config::redact_config(config);
    let content = toml::to_string_pretty(&redacted)
        .map_err(|e| GuruError::Config(format!("Failed to serialize config: {}", e)))?;
    println!("{}", content);
    Ok(())
}

fn validate_config(config: &Config, override_path: Option<&Path>) -> Result<()> {
    let path = config::config_path(override_path)?;
    if !path.exists() {
        ui::print_info(&format!(
            "No config file at {}; validating built-in defaults",
            path.display()
        ));
    }

    match config.validate() {
        Ok(warnings) => {
            for warning in warnings {
                ui::print_warning(&warning);
            }
            ui::print_success("Config is valid");
            Ok(())
        }
        Err(errors) => {
            for error in errors {
                ui::print_error(&error);
            }
            Err(GuruError::ConfigInvalid("Config validation failed".to_string()))
        }
    }
}

fn print_path(override_path: Option<&Path>) -> Result<()> {
    let path = config::config_path(override_path)?;
    println!("{}", path.display());
    Ok(())
}
