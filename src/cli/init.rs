use crate::config::{self, Config};
use crate::error::Result;
use crate::ui;
use std::path::Path;

/// Run the init command
pub fn run_init(force: bool, override_path: Option<&Path>) -> Result<()> {
    let config_path = config::config_path(override_path)?;

    // Check if config already exists
    if config_path.exists() && !force {
        ui::print_warning(&format!(
            "Config file already exists at {}",
            config_path.display()
        ));
        ui::print_info("Use --force to overwrite");
        return Ok(());
    }

    config::save_config_to(&Config::default(), &config_path)?;

    ui::print_success(&format!(
        "Created config file at {}",
        config_path.display()
    ));
    ui::print_info("Export GEMINI_API_KEY or set gemini.api_key_command to authenticate");

    Ok(())
}
