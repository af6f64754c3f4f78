use crate::config::Config;
use crate::error::{ExitStatus, Result};
use crate::gemini;
use crate::ui;
use crate::view::{self, App};

/// Run the task command
pub async fn run_task(config: &Config, json_output: bool) -> Result<ExitStatus> {
    let mut app = App::new();

    let spinner = ui::Spinner::new("Contemplating...");
    let result = gemini::generate_moral_task(&config.gemini).await;
    spinner.finish_and_clear();

    // Errors propagate so main can pick the exit status
    let task = result?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&task)?);
    } else {
        app.finish_task_fetch(Ok(task));
        println!("{}", view::render_task(&app));
    }

    Ok(ExitStatus::Success)
}
