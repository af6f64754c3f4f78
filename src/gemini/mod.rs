mod client;
mod prompt;
mod response;

use client::GeminiClient;
pub use prompt::*;
pub use response::*;

use crate::config::GeminiConfig;
use crate::error::{GuruError, Result};

/// Ask the guru for a new moral task
pub async fn generate_moral_task(config: &GeminiConfig) -> Result<MoralTask> {
    let client = GeminiClient::new(config)?;
    let raw = client.generate(&build_task_prompt()).await?;
    let task = parse_moral_task(&raw)?;
    tracing::info!(categories = task.categories.len(), "received moral task");
    Ok(task)
}

/// Ask the guru whether a quote is positive
pub async fn verify_quote_positive(config: &GeminiConfig, quote: &str) -> Result<QuoteVerification> {
    let quote = quote.trim();
    if quote.is_empty() {
        return Err(GuruError::EmptyQuote);
    }

    let client = GeminiClient::new(config)?;
    let raw = client.generate(&build_verify_prompt(quote)).await?;
    let verification = parse_quote_verification(&raw)?;
    tracing::info!(is_positive = verification.is_positive, "received quote verification");
    Ok(verification)
}
