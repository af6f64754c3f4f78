mod types;

pub use types::*;

use crate::error::{GuruError, Result};
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};

/// Get the XDG-compliant config directory
pub fn config_dir() -> Result<PathBuf> {
    ProjectDirs::from("", "", "moralguru")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| GuruError::Config("Could not determine config directory".to_string()))
}

/// Get the config file path, honouring an explicit override
pub fn config_path(override_path: Option<&Path>) -> Result<PathBuf> {
    match override_path {
        Some(path) => Ok(path.to_path_buf()),
        None => Ok(config_dir()?.join("config.toml")),
    }
}

/// Load config from a specific path
pub fn load_config_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Err(GuruError::ConfigNotFound(path.display().to_string()));
    }

    let content = fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    Ok(config)
}

/// Load config, falling back to defaults when the file does not exist
pub fn load_config_or_default(override_path: Option<&Path>) -> Result<Config> {
    let path = config_path(override_path)?;
    if path.exists() {
        tracing::debug!(path = %path.display(), "loading config");
        load_config_from(&path)
    } else if override_path.is_some() {
        // An explicitly requested file must exist
        Err(GuruError::ConfigNotFound(path.display().to_string()))
    } else {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        Ok(Config::default())
    }
}

/// Save config to a specific path
pub fn save_config_to(config: &Config, path: &Path) -> Result<()> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let content = toml::to_string_pretty(config)?;
    fs::write(path, content)?;
    Ok(())
}

/// Redact sensitive information from config for display
pub fn redact_config(config: &Config) -> Config {
    let mut redacted = config.clone();
    if redacted.gemini.api_key_command.is_some() {
        redacted.gemini.api_key_command = Some("[REDACTED]".to_string());
    }
    redacted
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert_eq!(config.gemini.model, "gemini-2.5-flash");
        assert_eq!(config.gemini.base_url, DEFAULT_BASE_URL);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
[gemini]
model = "gemini-2.0-flash"
"#,
        )
        .unwrap();
        assert_eq!(config.gemini.model, "gemini-2.0-flash");
        assert_eq!(config.gemini.timeout_seconds, 30);
        assert_eq!(config.gemini.api_key_env, "GEMINI_API_KEY");
        assert_eq!(config.settings.log_format, LogFormat::Text);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.gemini.temperature = 0.4;
        config.settings.log_format = LogFormat::Json;
        save_config_to(&config, &path).unwrap();

        let loaded = load_config_from(&path).unwrap();
        assert_eq!(loaded.gemini.temperature, 0.4);
        assert_eq!(loaded.settings.log_format, LogFormat::Json);
    }

    #[test]
    fn test_missing_override_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let result = load_config_or_default(Some(&path));
        assert!(matches!(result, Err(GuruError::ConfigNotFound(_))));
    }

    #[test]
    fn test_validation_errors() {
        let mut config = Config::default();
        config.gemini.base_url = "ftp://example.com".to_string();
        config.gemini.timeout_seconds = 0;
        config.gemini.temperature = 3.5;
        config.gemini.model = " ".to_string();

        let errors = config.validate().unwrap_err();
        assert_eq!(errors.len(), 4);
    }

    #[test]
    fn test_http_base_url_warns() {
        let mut config = Config::default();
        config.gemini.base_url = "http://localhost:8080/v1beta".to_string();
        let warnings = config.validate().unwrap();
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_redact_config() {
        let mut config = Config::default();
        config.gemini.api_key_command = Some("pass show gemini".to_string());
        let redacted = redact_config(&config);
        assert_eq!(redacted.gemini.api_key_command.as_deref(), Some("[REDACTED]"));
    }
}
