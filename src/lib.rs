//! Repository task runner for monorepos whose sub-packages live under
//! `packages/`.
//!
//! Each task is a plugin under `src/plugins/`; the build script turns that
//! directory into the task registry used by [`plugins::fetch_task`] and the
//! `help` listing.

#[macro_use]
extern crate log;

pub mod config;
pub mod exec;
pub mod plugins;
pub mod utils;
pub mod workspace;

use config::Config;
use exec::ProcessExecutor;
use plugins::Context;
use utils::{project_root, TaskResult};

/// Run a task from command-line arguments (program name excluded).
pub fn run(mut args: Vec<String>) -> TaskResult<()> {
    // Help never depends on the repository or its config
    if args.is_empty() || matches!(args[0].as_str(), "help" | "-h" | "--help") {
        print!("{}", plugins::help::render());
        return Ok(());
    }

    let task_name = args.remove(0);

    // Load config before resolving the task
    let root = project_root()?;
    let config = Config::load(&root)?;
    debug!("Repository root: {}", root.display());

    let plugin = plugins::fetch_task(&task_name, &args, &config)?;
    plugin.execute(&Context {
        root: &root,
        executor: &ProcessExecutor,
    })
}
