use std::path::PathBuf;

use clap::Parser;

use super::{parse_options, Context, TaskPlugin};
use crate::config::Config;
use crate::utils::{render_columns, TaskResult};
use crate::workspace::Workspace;

const DESCRIPTION: &str = "List discovered packages and what each one provides";

#[derive(Debug, Parser)]
#[command(about = DESCRIPTION)]
struct PackagesOptions {}

pub struct PackagesTask {
    packages_dir: PathBuf,
    source_dir: String,
    tests_dir: String,
}

pub type TaskInstance = PackagesTask;

impl PackagesTask {
    pub fn render(&self, workspace: &Workspace) -> String {
        let rows: Vec<(String, String)> = workspace
            .packages()
            .iter()
            .map(|package| {
                let mut has = Vec::new();
                for sub in [&self.source_dir, &self.tests_dir] {
                    if package.subdir(workspace.root(), sub).is_some() {
                        has.push(sub.as_str());
                    }
                }
                let detail = if has.is_empty() {
                    "-".to_string()
                } else {
                    has.join(", ")
                };
                (package.name().to_string(), detail)
            })
            .collect();
        render_columns(&rows)
    }
}

impl TaskPlugin for PackagesTask {
    fn new(args: &[String], config: &Config) -> TaskResult<Self> {
        let PackagesOptions {} = parse_options("packages", args)?;
        Ok(PackagesTask {
            packages_dir: config.packages_dir.clone(),
            source_dir: config.typecheck.source_dir.clone(),
            tests_dir: config.test.tests_dir.clone(),
        })
    }

    fn description() -> &'static str {
        DESCRIPTION
    }

    fn execute(&self, ctx: &Context<'_>) -> TaskResult<()> {
        let workspace = Workspace::discover(ctx.root, &self.packages_dir)?;
        if workspace.packages().is_empty() {
            info!("No packages under {}", ctx.root.join(&self.packages_dir).display());
            return Ok(());
        }
        print!("{}", self.render(&workspace));
        Ok(())
    }
}
