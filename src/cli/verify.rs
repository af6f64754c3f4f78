use crate::config::Config;
use crate::error::{ExitStatus, GuruError, Result};
use crate::gemini;
use crate::ui;
use crate::view::{self, App};

/// Run the verify command
pub async fn run_verify(config: &Config, quote: Option<String>, json_output: bool) -> Result<ExitStatus> {
    let input = match quote.as_deref() {
        Some("-") => ui::read_stdin()?,
        Some(q) => q.to_string(),
        None if ui::is_interactive() => ui::prompt_text_with_placeholder(
            "Quote to verify:",
            "Type or paste a quote here...",
            "",
        )?,
        None => ui::read_stdin()?,
    };

    let mut app = App::new();
    app.set_quote_input(input);
    let quote = app.begin_verify().ok_or(GuruError::EmptyQuote)?;

    let spinner = ui::Spinner::new("Verifying...");
    let result = gemini::verify_quote_positive(&config.gemini, &quote).await;
    spinner.finish_and_clear();
    let verification = result?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&verification)?);
    } else {
        println!("{}", view::render_verification_card(&verification));
    }

    Ok(ExitStatus::Success)
}
