use crate::config::GeminiConfig;
use crate::error::{GuruError, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::process::Command;
use std::time::Duration;

/// Fallback environment variable consulted after the configured one
const FALLBACK_API_KEY_ENV: &str = "API_KEY";

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "responseMimeType")]
    response_mime_type: &'static str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(rename = "promptFeedback")]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
    #[serde(rename = "finishReason")]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PromptFeedback {
    #[serde(rename = "blockReason")]
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Thin client over the Gemini generateContent endpoint
pub struct GeminiClient {
    http: Client,
    api_key: String,
    endpoint: String,
    temperature: f32,
    timeout_seconds: u64,
}

impl GeminiClient {
    /// Build a client, resolving the API key up front
    pub fn new(config: &GeminiConfig) -> Result<Self> {
        let api_key = resolve_api_key(config)?;
        Self::with_api_key(config, api_key)
    }

    fn with_api_key(config: &GeminiConfig, api_key: String) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| GuruError::Gemini(format!("Failed to create HTTP client: {}", e)))?;

        let endpoint = format!(
            "{}/models/{}:generateContent",
            config.base_url.trim_end_matches('/'),
            config.model
        );

        Ok(GeminiClient {
            http,
            api_key,
            endpoint,
            temperature: config.temperature,
            timeout_seconds: config.timeout_seconds,
        })
    }

    /// Send a single-turn prompt and return the model's text
    pub async fn generate(&self, prompt: &str) -> Result<String> {
        let request = GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: self.temperature,
                response_mime_type: "application/json",
            },
        };

        tracing::debug!(endpoint = %self.endpoint, prompt_len = prompt.len(), "calling Gemini");

        let response = self
            .http
            .post(&self.endpoint)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GuruError::GeminiTimeout(self.timeout_seconds)
                } else {
                    GuruError::Gemini(format!("Request failed: {}", e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ErrorEnvelope>(&body)
                .map(|envelope| envelope.error.message)
                .unwrap_or(body);
            tracing::warn!(%status, "Gemini returned an error status");
            return Err(GuruError::Gemini(format!(
                "API returned status {}: {}",
                status,
                detail.trim()
            )));
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| GuruError::Gemini(format!("Failed to parse response: {}", e)))?;

        let text = extract_text(body)?;
        tracing::debug!(response_len = text.len(), "Gemini responded");
        Ok(text)
    }
}

fn extract_text(body: GenerateResponse) -> Result<String> {
    let candidate = match body.candidates.into_iter().next() {
        Some(candidate) => candidate,
        None => {
            let reason = body
                .prompt_feedback
                .and_then(|f| f.block_reason)
                .map(|r| format!("prompt blocked ({})", r))
                .unwrap_or_else(|| "no candidates returned".to_string());
            return Err(GuruError::Gemini(format!("No response content: {}", reason)));
        }
    };

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        let detail = candidate
            .finish_reason
            .map(|r| format!(" (finish reason {})", r))
            .unwrap_or_default();
        return Err(GuruError::Gemini(format!("Empty response{}", detail)));
    }

    Ok(text)
}

/// Resolve the API key: command, then configured env var, then API_KEY
fn resolve_api_key(config: &GeminiConfig) -> Result<String> {
    if let Some(command) = config.api_key_command.as_deref().filter(|c| !c.trim().is_empty()) {
        return run_api_key_command(command);
    }

    let from_env = |name: &str| {
        if name.is_empty() {
            return None;
        }
        std::env::var(name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    from_env(config.api_key_env.as_str())
        .or_else(|| from_env(FALLBACK_API_KEY_ENV))
        .ok_or_else(|| GuruError::MissingApiKey(config.api_key_env.clone()))
}

/// Get API key by executing the configured command
fn run_api_key_command(command: &str) -> Result<String> {
    let output = if cfg!(target_os = "windows") {
        Command::new("cmd").args(["/C", command]).output()
    } else {
        Command::new("sh").args(["-c", command]).output()
    };
    let output = output
        .map_err(|e| GuruError::ApiKeyCommand(format!("Failed to execute API key command: {}", e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(GuruError::ApiKeyCommand(format!(
            "API key command failed: {}",
            stderr.trim()
        )));
    }

    let api_key = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if api_key.is_empty() {
        return Err(GuruError::ApiKeyCommand(
            "API key command returned empty result".to_string(),
        ));
    }

    Ok(api_key)
}
