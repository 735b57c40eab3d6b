use super::{list_tasks, task_descriptions, Context, TaskPlugin};
use crate::config::Config;
use crate::utils::{render_columns, TaskResult};

const DESCRIPTION: &str = "List the available commands";

pub struct HelpTask;

pub type TaskInstance = HelpTask;

/// Usage banner followed by every registered task and its description.
pub fn render() -> String {
    let rows: Vec<(&str, &str)> = list_tasks()
        .into_iter()
        .map(|task| (task, task_descriptions(task)))
        .collect();

    let mut out = format!("{} - repository tasks\n\n", env!("CARGO_PKG_NAME"));
    out.push_str(&format!("Usage: {} <command> [options]\n\n", env!("CARGO_PKG_NAME")));
    out.push_str("Commands:\n");
    out.push_str(&render_columns(&rows));
    out.push_str(&format!(
        "\nUse `{} <command> --help` for the options of a command.\n",
        env!("CARGO_PKG_NAME")
    ));
    out
}

impl TaskPlugin for HelpTask {
    fn new(_args: &[String], _config: &Config) -> TaskResult<Self> {
        Ok(HelpTask)
    }

    fn description() -> &'static str {
        DESCRIPTION
    }

    fn execute(&self, _ctx: &Context<'_>) -> TaskResult<()> {
        print!("{}", render());
        Ok(())
    }
}
