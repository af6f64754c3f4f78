//! View state for the two independent guru actions: task generation and
//! quote verification. Each action is in exactly one state at a time.

use crate::error::{GuruError, Result};
use crate::gemini::{MoralTask, QuoteVerification};
use chrono::{DateTime, Local, Utc};
use console::style;

pub const TASK_FALLBACK_ERROR: &str =
    "An unknown error occurred. The guru may be meditating. Please try again later.";
pub const VERIFY_FALLBACK_ERROR: &str = "Failed to verify quote. Please try again.";

#[derive(Debug, Clone, PartialEq)]
pub enum ViewState<T> {
    Idle,
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> ViewState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading)
    }

    #[cfg(test)]
    pub fn value(&self) -> Option<&T> {
        match self {
            ViewState::Ready(value) => Some(value),
            _ => None,
        }
    }

    #[cfg(test)]
    pub fn error(&self) -> Option<&str> {
        match self {
            ViewState::Failed(message) => Some(message.as_str()),
            _ => None,
        }
    }

    /// Settle a finished request, substituting `fallback` for blank error text
    fn settle(result: Result<T>, fallback: &str) -> Self {
        match result {
            Ok(value) => ViewState::Ready(value),
            Err(e) => ViewState::Failed(e.user_message(fallback)),
        }
    }
}

/// A value together with the moment it arrived
#[derive(Debug, Clone, PartialEq)]
pub struct Loaded<T> {
    pub value: T,
    pub received_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct App {
    pub task: ViewState<Loaded<MoralTask>>,
    pub quote_input: String,
    pub verification: ViewState<QuoteVerification>,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    /// A task is fetched on startup, so the task view begins loading
    pub fn new() -> Self {
        App {
            task: ViewState::Loading,
            quote_input: String::new(),
            verification: ViewState::Idle,
        }
    }

    pub fn is_task_busy(&self) -> bool {
        self.task.is_loading()
    }

    pub fn is_verify_busy(&self) -> bool {
        self.verification.is_loading()
    }

    /// Drops the previous task or error
    pub fn begin_task_fetch(&mut self) {
        self.task = ViewState::Loading;
    }

    pub fn finish_task_fetch(&mut self, result: Result<MoralTask>) {
        let loaded = result.map(|value| Loaded {
            value,
            received_at: Utc::now(),
        });
        self.task = ViewState::settle(loaded, TASK_FALLBACK_ERROR);
    }

    pub fn set_quote_input(&mut self, input: impl Into<String>) {
        self.quote_input = input.into();
    }

    /// Returns the trimmed quote to verify, or `None` when the input is blank
    /// or a verification is already in flight
    pub fn begin_verify(&mut self) -> Option<String> {
        if self.is_verify_busy() {
            return None;
        }
        let quote = self.quote_input.trim();
        if quote.is_empty() {
            self.verification = ViewState::Failed(GuruError::EmptyQuote.to_string());
            return None;
        }
        let quote = quote.to_string();
        self.verification = ViewState::Loading;
        Some(quote)
    }

    pub fn finish_verify(&mut self, result: Result<QuoteVerification>) {
        self.verification = ViewState::settle(result, VERIFY_FALLBACK_ERROR);
    }

    pub fn clear_quote(&mut self) {
        self.quote_input.clear();
        self.verification = ViewState::Idle;
    }
}

/// Render the task section
pub fn render_task(app: &App) -> String {
    match &app.task {
        ViewState::Idle => String::new(),
        ViewState::Loading => format!("{}", style("Contemplating...").dim()),
        ViewState::Failed(message) => format!("{} {}", style("✗").red(), style(message).red()),
        ViewState::Ready(loaded) => render_task_card(loaded),
    }
}

fn render_task_card(loaded: &Loaded<MoralTask>) -> String {
    let task = &loaded.value;
    let mut lines = vec![
        format!("{}", style("Today's moral task").bold().magenta()),
        String::new(),
        format!("  {}", style(&task.task).bold()),
    ];
    if !task.categories.is_empty() {
        lines.push(String::new());
        lines.push(format!(
            "  {} {}",
            style("Categories:").dim(),
            task.categories.join(", ")
        ));
    }
    lines.push(format!(
        "  {} {}",
        style("Received:").dim(),
        loaded.received_at.with_timezone(&Local).format("%Y-%m-%d %H:%M")
    ));
    lines.join("\n")
}

/// Render the quote verification section
pub fn render_verification(app: &App) -> String {
    match &app.verification {
        ViewState::Idle => String::new(),
        ViewState::Loading => format!("{}", style("Verifying...").dim()),
        ViewState::Failed(message) => format!("{} {}", style("✗").red(), style(message).red()),
        ViewState::Ready(result) => render_verification_card(result),
    }
}

pub fn render_verification_card(result: &QuoteVerification) -> String {
    let verdict = if result.is_positive {
        style("Positive").green().bold()
    } else {
        style("Not Positive").red().bold()
    };
    let mut lines = vec![format!("Result: {}", verdict)];
    if !result.categories.is_empty() {
        lines.push(format!("Categories: {}", result.categories.join(", ")));
    }
    lines.push(format!("Reason: {}", result.reason));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_task() -> MoralTask {
        MoralTask {
            task: "Write a thank-you note.".to_string(),
            categories: vec!["gratitude".to_string()],
        }
    }

    fn sample_verification(is_positive: bool, categories: Vec<&str>) -> QuoteVerification {
        QuoteVerification {
            is_positive,
            categories: categories.into_iter().map(String::from).collect(),
            reason: "Because.".to_string(),
        }
    }

    #[test]
    fn test_new_app_is_loading_task() {
        let app = App::new();
        assert!(app.is_task_busy());
        assert!(!app.is_verify_busy());
        assert_eq!(app.verification, ViewState::Idle);
    }

    #[test]
    fn test_task_fetch_cycle() {
        let mut app = App::new();
        app.finish_task_fetch(Ok(sample_task()));
        assert_eq!(app.task.value().map(|l| &l.value), Some(&sample_task()));

        app.begin_task_fetch();
        assert!(app.task.value().is_none());
        assert!(app.task.error().is_none());
        assert!(app.is_task_busy());

        app.finish_task_fetch(Err(GuruError::Gemini("quota exceeded".to_string())));
        assert_eq!(app.task.error(), Some("Gemini error: quota exceeded"));
        assert!(!app.is_task_busy());
    }

    #[test]
    fn test_blank_errors_use_fallback() {
        let mut app = App::new();
        app.finish_task_fetch(Err(GuruError::Gemini("  ".to_string())));
        assert_eq!(app.task.error(), Some(TASK_FALLBACK_ERROR));

        app.set_quote_input("Be well.");
        app.begin_verify();
        app.finish_verify(Err(GuruError::Gemini(String::new())));
        assert_eq!(app.verification.error(), Some(VERIFY_FALLBACK_ERROR));
    }

    #[test]
    fn test_blank_quote_fails_without_request() {
        let mut app = App::new();
        app.verification = ViewState::Ready(sample_verification(true, vec![]));
        app.set_quote_input("   ");
        assert_eq!(app.begin_verify(), None);
        assert_eq!(app.verification.error(), Some("Please enter a quote to verify."));
        assert!(app.verification.value().is_none());
    }

    #[test]
    fn test_verify_cycle_and_clear() {
        let mut app = App::new();
        app.set_quote_input("  Kindness is free.  ");
        assert_eq!(app.begin_verify().as_deref(), Some("Kindness is free."));
        assert!(app.is_verify_busy());

        app.finish_verify(Ok(sample_verification(true, vec!["kindness"])));
        assert!(app.verification.value().unwrap().is_positive);

        app.clear_quote();
        assert!(app.quote_input.is_empty());
        assert_eq!(app.verification, ViewState::Idle);
    }

    #[test]
    fn test_second_verify_refused_while_in_flight() {
        let mut app = App::new();
        app.set_quote_input("Kindness is free.");
        assert!(app.begin_verify().is_some());

        app.set_quote_input("Another quote.");
        assert_eq!(app.begin_verify(), None);
        assert!(app.is_verify_busy());
        assert!(app.verification.error().is_none());
    }

    #[test]
    fn test_actions_are_independent() {
        let mut app = App::new();
        app.set_quote_input("Hope springs eternal.");
        app.begin_verify();
        app.finish_task_fetch(Err(GuruError::GeminiTimeout(30)));
        assert!(app.is_verify_busy());
        assert!(app.task.error().is_some());
    }

    #[test]
    fn test_render_states() {
        console::set_colors_enabled(false);
        let mut app = App::new();
        assert_eq!(render_task(&app), "Contemplating...");
        assert_eq!(render_verification(&app), "");

        app.finish_task_fetch(Ok(sample_task()));
        let card = render_task(&app);
        assert!(card.contains("Write a thank-you note."));
        assert!(card.contains("Categories: gratitude"));

        app.set_quote_input("x");
        app.begin_verify();
        assert_eq!(render_verification(&app), "Verifying...");

        app.finish_verify(Err(GuruError::EmptyQuote));
        assert!(render_verification(&app).contains("Please enter a quote to verify."));
    }

    #[test]
    fn test_render_verification_card() {
        console::set_colors_enabled(false);
        let positive = render_verification_card(&sample_verification(true, vec!["hope", "joy"]));
        assert_eq!(positive, "Result: Positive\nCategories: hope, joy\nReason: Because.");

        let negative = render_verification_card(&sample_verification(false, vec![]));
        assert_eq!(negative, "Result: Not Positive\nReason: Because.");
    }
}
