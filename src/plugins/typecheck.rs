//! Type-check every package that has a source directory.
//!
//! Diagnostics are reported but never fail the run: type checking is
//! advisory while packages are still being brought up to a clean state.

use std::path::PathBuf;

use clap::Parser;

use super::{parse_options, Context, Selection, TaskPlugin};
use crate::config::Config;
use crate::exec::Invocation;
use crate::utils::{elapsed_since, TaskResult};
use crate::workspace::Workspace;

const DESCRIPTION: &str = "Run the type checker on each package's sources (never fails)";

#[derive(Debug, Parser)]
#[command(about = DESCRIPTION)]
struct TypecheckOptions {
    #[command(flatten)]
    selection: Selection,
}

pub struct TypecheckTask {
    options: TypecheckOptions,
    packages_dir: PathBuf,
    source_dir: String,
    command: Vec<String>,
}

pub type TaskInstance = TypecheckTask;

impl TaskPlugin for TypecheckTask {
    fn new(args: &[String], config: &Config) -> TaskResult<Self> {
        let options: TypecheckOptions = parse_options("typecheck", args)?;
        config.typecheck.validate()?;
        Ok(TypecheckTask {
            options,
            packages_dir: config.packages_dir.clone(),
            source_dir: config.typecheck.source_dir.clone(),
            command: config.typecheck.command.clone(),
        })
    }

    fn description() -> &'static str {
        DESCRIPTION
    }

    fn execute(&self, ctx: &Context<'_>) -> TaskResult<()> {
        let started = chrono::Local::now();
        let workspace = match Workspace::discover(ctx.root, &self.packages_dir) {
            Ok(workspace) => workspace,
            Err(e) => {
                warn!("==> Type-checking skipped, cannot read packages: {}", e);
                return Ok(());
            }
        };
        let selected = workspace.select(&self.options.selection.packages)?;
        let executor = self.options.selection.executor(ctx);

        info!("==> Type-checking packages:");
        let targets = workspace.with_subdir(&selected, &self.source_dir);
        let mut flagged = Vec::new();

        for (package, dir) in &targets {
            let dir = dir.to_string_lossy().into_owned();
            info!("    {}: {}", package.name(), dir);
            let invocation = Invocation::from_template(
                &self.command,
                ctx.root,
                &[("dir", dir.as_str()), ("package", package.name())],
            )?;

            match executor.run(&invocation) {
                Ok(status) if status.success() => {}
                Ok(status) => {
                    warn!("    {}: type checker reported problems ({})", package.name(), status);
                    flagged.push(package.name());
                }
                Err(e) => {
                    warn!("    {}: type checker could not run: {}", package.name(), e);
                    flagged.push(package.name());
                }
            }
        }

        if flagged.is_empty() {
            info!("==> Type-checked {} package(s), no problems", targets.len());
        } else {
            warn!(
                "==> Type-checked {} package(s), problems in: {} (not failing the run)",
                targets.len(),
                flagged.join(", ")
            );
        }
        info!("    Finished in {}", elapsed_since(started));

        Ok(())
    }
}
