use std::env;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::config::{CONFIG_FILE, DEFAULT_PACKAGES_DIR};

/// Environment variable that pins the repository root.
pub const ROOT_ENV: &str = "PKGTASK_ROOT";

#[derive(thiserror::Error, Debug)]
pub enum TaskError {
    #[error("Command not found: {0}")]
    CmdNotFound(String),
    #[error("Task not found: {0}")]
    TaskNotFound(String),
    #[error("Package not found: {0}")]
    PackageNotFound(String),
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
    #[error("{tool} exited with status {code}")]
    ToolFailed { tool: String, code: i32 },
    #[error(transparent)]
    Args(#[from] clap::Error),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("figment: {0}")]
    Figment(#[from] figment::Error),
    #[error("toml: {0}")]
    Toml(#[from] toml::ser::Error),
    #[error("Ok")]
    Ok,
}

impl TaskError {
    /// Process exit status for this error. Tool failures keep the tool's code.
    pub fn exit_code(&self) -> i32 {
        match self {
            TaskError::Ok => 0,
            TaskError::ToolFailed { code, .. } if *code != 0 => *code,
            TaskError::Args(e) => e.exit_code(),
            _ => 1,
        }
    }
}

pub type TaskResult<T> = Result<T, TaskError>;

/// Repository root: `$PKGTASK_ROOT` if set, else searched upward from the
/// current directory.
pub fn project_root() -> TaskResult<PathBuf> {
    if let Some(root) = env::var_os(ROOT_ENV) {
        return Ok(PathBuf::from(root));
    }
    let cwd = env::current_dir()?;
    Ok(find_root(&cwd))
}

/// Nearest ancestor holding `pkgtask.toml`, then nearest holding a
/// `packages` directory, then `start` itself.
pub fn find_root(start: &Path) -> PathBuf {
    start
        .ancestors()
        .find(|dir| dir.join(CONFIG_FILE).is_file())
        .or_else(|| {
            start
                .ancestors()
                .find(|dir| dir.join(DEFAULT_PACKAGES_DIR).is_dir())
        })
        .unwrap_or(start)
        .to_path_buf()
}

/// Two-column listing with the left column padded to its widest entry.
pub fn render_columns<L: AsRef<str>, R: AsRef<str>>(rows: &[(L, R)]) -> String {
    let width = rows
        .iter()
        .map(|(left, _)| left.as_ref().chars().count())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for (left, right) in rows {
        let line = format!("  {:<width$}  {}", left.as_ref(), right.as_ref(), width = width);
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

/// Human readable time since `started`, e.g. `1.25s`.
pub fn elapsed_since(started: DateTime<Local>) -> String {
    let millis = (Local::now() - started).num_milliseconds().max(0);
    format!("{}.{:02}s", millis / 1000, (millis % 1000) / 10)
}
