use std::path::Path;

use clap::error::ErrorKind;

use crate::config::Config;
use crate::exec::{DryRunExecutor, Executor};
use crate::utils::{TaskError, TaskResult};

/// What a task needs from the outside world while it runs.
pub struct Context<'a> {
    pub root: &'a Path,
    pub executor: &'a dyn Executor,
}

impl<'a> Context<'a> {
    /// The executor to use, or one that only logs when `dry_run` is set.
    pub fn executor_for(&self, dry_run: bool) -> &'a dyn Executor {
        if dry_run {
            &DryRunExecutor
        } else {
            self.executor
        }
    }
}

pub trait TaskPlugin {
    fn new(args: &[String], config: &Config) -> TaskResult<Self>
    where
        Self: Sized;
    fn description() -> &'static str
    where
        Self: Sized;
    fn execute(&self, ctx: &Context<'_>) -> TaskResult<()>;
}

/// Options shared by the per-package tasks.
#[derive(Debug, Default, clap::Args)]
pub struct Selection {
    /// Only run for the named package (repeatable)
    #[arg(short = 'p', long = "package", value_name = "NAME")]
    pub packages: Vec<String>,
    /// Print the commands instead of running them
    #[arg(short = 'n', long)]
    pub dry_run: bool,
}

impl Selection {
    pub fn executor<'a>(&self, ctx: &Context<'a>) -> &'a dyn Executor {
        ctx.executor_for(self.dry_run)
    }
}

/// Parse a task's own arguments. `--help` prints usage and ends the run
/// successfully.
pub fn parse_options<T: clap::Parser>(task: &str, args: &[String]) -> TaskResult<T> {
    let argv = std::iter::once(task.to_string()).chain(args.iter().cloned());
    T::try_parse_from(argv).map_err(|e| match e.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            let _ = e.print();
            TaskError::Ok
        }
        _ => TaskError::Args(e),
    })
}

// Include all generated plugin modules
include!(concat!(env!("OUT_DIR"), "/generated_tasks.rs"));

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::{Invocation, ToolStatus};
    use std::cell::Cell;

    struct Counter(Cell<usize>);

    impl Executor for Counter {
        fn run(&self, _invocation: &Invocation) -> TaskResult<ToolStatus> {
            self.0.set(self.0.get() + 1);
            Ok(ToolStatus::SUCCESS)
        }
    }

    #[test]
    fn test_executor_for_dry_run() {
        let counter = Counter(Cell::new(0));
        let ctx = Context {
            root: Path::new("."),
            executor: &counter,
        };
        let inv = Invocation::from_template(&["ruff".to_string()], ctx.root, &[]).unwrap();

        ctx.executor_for(true).run(&inv).unwrap();
        assert_eq!(counter.0.get(), 0);

        let selection = Selection {
            packages: Vec::new(),
            dry_run: false,
        };
        selection.executor(&ctx).run(&inv).unwrap();
        assert_eq!(counter.0.get(), 1);
    }
}
