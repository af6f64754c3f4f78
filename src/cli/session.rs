use crate::config::Config;
use crate::error::{ExitStatus, GuruError, Result};
use crate::gemini::{self, MoralTask};
use crate::ui;
use crate::view::{self, App};
use console::{style, Term};
use std::fmt;
use tokio::task::JoinHandle;

type TaskFetch = JoinHandle<Result<MoralTask>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionAction {
    GenerateTask,
    WaitForTask,
    VerifyQuote,
    ClearQuote,
    Refresh,
    Quit,
}

impl fmt::Display for SessionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionAction::GenerateTask => write!(f, "Generate new task"),
            SessionAction::WaitForTask => write!(f, "Wait for the guru"),
            SessionAction::VerifyQuote => write!(f, "Verify a quote"),
            SessionAction::ClearQuote => write!(f, "Clear quote"),
            SessionAction::Refresh => write!(f, "Refresh"),
            SessionAction::Quit => write!(f, "Quit"),
        }
    }
}

/// Menu entries for the current view; a busy action is swapped for waiting on it
fn menu_options(app: &App) -> Vec<SessionAction> {
    let mut options = Vec::with_capacity(5);
    if app.is_task_busy() {
        options.push(SessionAction::WaitForTask);
    } else {
        options.push(SessionAction::GenerateTask);
    }
    if !app.is_verify_busy() {
        options.push(SessionAction::VerifyQuote);
    }
    if !app.quote_input.is_empty() || app.verification != view::ViewState::Idle {
        options.push(SessionAction::ClearQuote);
    }
    if app.is_task_busy() {
        options.push(SessionAction::Refresh);
    }
    options.push(SessionAction::Quit);
    options
}

/// Run the interactive session
pub async fn run_session(config: &Config) -> Result<ExitStatus> {
    if !ui::is_interactive() {
        return Err(GuruError::Config(
            "Interactive mode required for a session. Use 'moralguru task' or 'moralguru verify' instead."
                .to_string(),
        ));
    }

    let term = Term::stdout();
    let mut app = App::new();
    // The task fetch runs in the background so quotes can be verified meanwhile
    let mut pending: Option<TaskFetch> = Some(spawn_task_fetch(config));

    loop {
        if pending.as_ref().is_some_and(|h| h.is_finished()) {
            if let Some(handle) = pending.take() {
                app.finish_task_fetch(join_fetch(handle).await);
            }
        }

        render(&term, &app)?;

        let options = menu_options(&app);
        let action = match blocking_prompt(move || ui::prompt_select("What next?", options)).await {
            Ok(action) => action,
            Err(GuruError::UserCancelled) => SessionAction::Quit,
            Err(e) => return Err(e),
        };
        tracing::debug!(?action, "session action");

        match action {
            SessionAction::GenerateTask => {
                if app.is_task_busy() {
                    ui::print_warning("The guru is still contemplating");
                } else {
                    app.begin_task_fetch();
                    pending = Some(spawn_task_fetch(config));
                }
            }
            SessionAction::WaitForTask => {
                if let Some(handle) = pending.take() {
                    let spinner = ui::Spinner::new("Contemplating...");
                    let result = join_fetch(handle).await;
                    spinner.finish_and_clear();
                    app.finish_task_fetch(result);
                }
            }
            SessionAction::VerifyQuote => {
                let initial = app.quote_input.clone();
                let input = match blocking_prompt(move || {
                    ui::prompt_text_with_placeholder("Quote:", "Type or paste a quote here...", &initial)
                })
                .await
                {
                    Ok(input) => input,
                    Err(GuruError::UserCancelled) => continue,
                    Err(e) => return Err(e),
                };
                app.set_quote_input(input);

                if let Some(quote) = app.begin_verify() {
                    render(&term, &app)?;
                    let spinner = ui::Spinner::new("Verifying...");
                    let result = gemini::verify_quote_positive(&config.gemini, &quote).await;
                    spinner.finish_and_clear();
                    if let Err(ref e) = result {
                        tracing::warn!(error = %e, "quote verification failed");
                    }
                    app.finish_verify(result);
                }
            }
            SessionAction::ClearQuote => app.clear_quote(),
            SessionAction::Refresh => {}
            SessionAction::Quit => break,
        }
    }

    if let Some(handle) = pending {
        handle.abort();
    }

    Ok(ExitStatus::Success)
}

fn spawn_task_fetch(config: &Config) -> TaskFetch {
    let gemini_config = config.gemini.clone();
    tokio::spawn(async move {
        let result = gemini::generate_moral_task(&gemini_config).await;
        if let Err(ref e) = result {
            tracing::warn!(error = %e, "task generation failed");
        }
        result
    })
}

async fn join_fetch(handle: TaskFetch) -> Result<MoralTask> {
    handle
        .await
        .map_err(|e| GuruError::Gemini(format!("Task join error: {}", e)))?
}

/// Run a blocking inquire prompt off the async workers
async fn blocking_prompt<T, F>(prompt: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(prompt)
        .await
        .map_err(|e| GuruError::Config(format!("Prompt task failed: {}", e)))?
}

fn render(term: &Term, app: &App) -> Result<()> {
    term.clear_screen()?;

    println!("{}", style("The Moral Guru").bold().cyan());
    println!("{}", style("One small good deed at a time").dim());
    println!();

    ui::print_section("Moral task", &view::render_task(app));

    let mut quote_section = Vec::new();
    if !app.quote_input.is_empty() {
        quote_section.push(format!("{} {}", style("Quote:").dim(), app.quote_input));
    }
    let verification = view::render_verification(app);
    if !verification.is_empty() {
        quote_section.push(verification);
    }
    if quote_section.is_empty() {
        quote_section.push(style("No quote entered yet").dim().to_string());
    }
    ui::print_section("Verify a quote's positivity", &quote_section.join("\n"));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::ViewState;

    #[test]
    fn test_menu_while_task_loading() {
        let app = App::new();
        let options = menu_options(&app);
        assert_eq!(
            options,
            vec![
                SessionAction::WaitForTask,
                SessionAction::VerifyQuote,
                SessionAction::Refresh,
                SessionAction::Quit
            ]
        );
    }

    #[test]
    fn test_menu_after_task_and_quote() {
        let mut app = App::new();
        app.finish_task_fetch(Ok(MoralTask {
            task: "Return a borrowed book.".to_string(),
            categories: vec![],
        }));
        app.set_quote_input("Be kind.");
        let options = menu_options(&app);
        assert_eq!(
            options,
            vec![
                SessionAction::GenerateTask,
                SessionAction::VerifyQuote,
                SessionAction::ClearQuote,
                SessionAction::Quit
            ]
        );
    }

    #[test]
    fn test_clear_offered_after_failed_verify() {
        let mut app = App::new();
        app.task = ViewState::Failed("offline".to_string());
        app.begin_verify();
        assert!(menu_options(&app).contains(&SessionAction::ClearQuote));
    }

    #[test]
    fn test_verify_hidden_while_in_flight() {
        let mut app = App::new();
        app.set_quote_input("Hope springs eternal.");
        app.begin_verify();
        let options = menu_options(&app);
        assert!(!options.contains(&SessionAction::VerifyQuote));
        assert!(options.contains(&SessionAction::ClearQuote));
    }

    #[tokio::test]
    async fn test_join_fetch_reports_panics() {
        let handle: TaskFetch = tokio::spawn(async { panic!("boom") });
        let err = join_fetch(handle).await.unwrap_err();
        assert!(err.to_string().contains("Task join error"));
    }
}
