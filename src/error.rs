use std::process::ExitCode;
use thiserror::Error;

/// Process exit codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitStatus {
    Success = 0,
    GeneralError = 1,
    ServiceFailed = 2,
    MalformedResponse = 3,
    Timeout = 4,
    InvalidInput = 5,
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        ExitCode::from(status as u8)
    }
}

#[derive(Error, Debug)]
pub enum GuruError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration file not found at {0}")]
    ConfigNotFound(String),

    #[error("Invalid configuration: {0}")]
    ConfigInvalid(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Gemini error: {0}")]
    Gemini(String),

    #[error("Gemini timeout after {0} seconds")]
    GeminiTimeout(u64),

    #[error("No Gemini API key found (set {0}, API_KEY, or gemini.api_key_command)")]
    MissingApiKey(String),

    #[error("API key command failed: {0}")]
    ApiKeyCommand(String),

    #[error("Malformed response from the guru: {0}")]
    MalformedResponse(String),

    #[error("Please enter a quote to verify.")]
    EmptyQuote,

    #[error("User cancelled operation")]
    UserCancelled,
}

impl GuruError {
    /// Convert error to appropriate exit status
    pub fn exit_status(&self) -> ExitStatus {
        match self {
            GuruError::Config(_)
            | GuruError::ConfigNotFound(_)
            | GuruError::ConfigInvalid(_)
            | GuruError::Io(_)
            | GuruError::TomlParse(_)
            | GuruError::TomlSerialize(_)
            | GuruError::Json(_)
            | GuruError::MissingApiKey(_)
            | GuruError::ApiKeyCommand(_)
            | GuruError::UserCancelled => ExitStatus::GeneralError,

            GuruError::Gemini(_) => ExitStatus::ServiceFailed,

            GuruError::MalformedResponse(_) => ExitStatus::MalformedResponse,

            GuruError::GeminiTimeout(_) => ExitStatus::Timeout,

            GuruError::EmptyQuote => ExitStatus::InvalidInput,
        }
    }
}

impl GuruError {
    /// Message for display, or `fallback` when the error carries no detail
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            GuruError::Gemini(detail)
            | GuruError::MalformedResponse(detail)
            | GuruError::Config(detail)
                if detail.trim().is_empty() =>
            {
                fallback.to_string()
            }
            _ => self.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, GuruError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_status_mapping() {
        assert_eq!(GuruError::GeminiTimeout(30).exit_status(), ExitStatus::Timeout);
        assert_eq!(
            GuruError::MalformedResponse("missing field".to_string()).exit_status(),
            ExitStatus::MalformedResponse
        );
        assert_eq!(GuruError::EmptyQuote.exit_status(), ExitStatus::InvalidInput);
        assert_eq!(
            GuruError::Gemini("boom".to_string()).exit_status(),
            ExitStatus::ServiceFailed
        );
        assert_eq!(
            GuruError::MissingApiKey("GEMINI_API_KEY".to_string()).exit_status(),
            ExitStatus::GeneralError
        );
    }

    #[test]
    fn test_user_message_fallback() {
        assert_eq!(GuruError::Gemini(" ".to_string()).user_message("try again"), "try again");
        assert_eq!(
            GuruError::Gemini("quota".to_string()).user_message("try again"),
            "Gemini error: quota"
        );
        assert_eq!(GuruError::GeminiTimeout(5).user_message("try again"), "Gemini timeout after 5 seconds");
    }

    #[test]
    fn test_empty_quote_message() {
        assert_eq!(GuruError::EmptyQuote.to_string(), "Please enter a quote to verify.");
    }
}
