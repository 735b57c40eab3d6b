use clap::Parser;

use super::{parse_options, Context, TaskPlugin};
use crate::config::Config;
use crate::exec::Invocation;
use crate::utils::{elapsed_since, TaskError, TaskResult};

const DESCRIPTION: &str = "Format and lint-fix the whole repository";

#[derive(Debug, Parser)]
#[command(about = DESCRIPTION)]
struct FormatOptions {
    /// Print the commands instead of running them
    #[arg(short = 'n', long)]
    dry_run: bool,
}

/// Runs the configured formatter steps once over the repository root.
pub struct FormatTask {
    options: FormatOptions,
    commands: Vec<Vec<String>>,
}

pub type TaskInstance = FormatTask;

impl TaskPlugin for FormatTask {
    fn new(args: &[String], config: &Config) -> TaskResult<Self> {
        let options: FormatOptions = parse_options("format", args)?;
        config.format.validate()?;
        Ok(FormatTask {
            options,
            commands: config.format.commands.clone(),
        })
    }

    fn description() -> &'static str {
        DESCRIPTION
    }

    fn execute(&self, ctx: &Context<'_>) -> TaskResult<()> {
        let started = chrono::Local::now();
        let executor = ctx.executor_for(self.options.dry_run);

        info!("==> Formatting {}", ctx.root.display());
        for template in &self.commands {
            let invocation = Invocation::from_template(template, ctx.root, &[])?;
            info!("    {}", invocation);

            let status = executor.run(&invocation)?;
            if !status.success() {
                return Err(TaskError::ToolFailed {
                    tool: invocation.program.clone(),
                    code: status.exit_code(),
                });
            }
        }

        info!("    Finished in {}", elapsed_since(started));
        Ok(())
    }
}
