use serde::{Deserialize, Serialize};
use url::Url;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub gemini: GeminiConfig,
    #[serde(default)]
    pub settings: Settings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    /// Command to execute to retrieve the API key (takes precedence over the environment)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key_command: Option<String>,
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_api_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_temperature() -> f32 {
    0.9
}

impl Default for GeminiConfig {
    fn default() -> Self {
        GeminiConfig {
            model: default_model(),
            base_url: default_base_url(),
            api_key_env: default_api_key_env(),
            api_key_command: None,
            timeout_seconds: default_timeout(),
            temperature: default_temperature(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl Config {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<Vec<String>, Vec<String>> {
        let mut warnings = Vec::new();
        let mut errors = Vec::new();

        let gemini = &self.gemini;

        if gemini.model.trim().is_empty() {
            errors.push("Gemini model is required".to_string());
        }

        match Url::parse(&gemini.base_url) {
            Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {
                if url.scheme() == "http" {
                    warnings.push(format!(
                        "Gemini base_url '{}' is not using https",
                        gemini.base_url
                    ));
                }
            }
            Ok(url) => errors.push(format!(
                "Gemini base_url must be http or https, got '{}'",
                url.scheme()
            )),
            Err(e) => errors.push(format!("Gemini base_url is not a valid URL: {}", e)),
        }

        if gemini.timeout_seconds == 0 {
            errors.push("Gemini timeout_seconds must be greater than zero".to_string());
        }

        if !(0.0..=2.0).contains(&gemini.temperature) {
            errors.push(format!(
                "Gemini temperature must be between 0.0 and 2.0, got {}",
                gemini.temperature
            ));
        }

        if gemini.api_key_command.is_none() && gemini.api_key_env.trim().is_empty() {
            warnings.push("No api_key_env configured; only API_KEY will be consulted".to_string());
        }

        if errors.is_empty() {
            Ok(warnings)
        } else {
            Err(errors)
        }
    }
}
