use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;

use crate::utils::{TaskError, TaskResult};

/// A fully expanded external tool call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
}

impl Invocation {
    /// Expand an argv template, replacing `{name}` placeholders from `vars`.
    pub fn from_template(template: &[String], cwd: &Path, vars: &[(&str, &str)]) -> TaskResult<Self> {
        let mut words = template.iter().map(|word| {
            vars.iter().fold(word.clone(), |acc, (name, value)| {
                acc.replace(&format!("{{{}}}", name), value)
            })
        });

        let program = words
            .next()
            .ok_or_else(|| TaskError::InvalidConfig("empty command template".to_string()))?;

        Ok(Invocation {
            program,
            args: words.collect(),
            cwd: cwd.to_path_buf(),
        })
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " '{}'", arg)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

/// Exit status of a finished tool. `code` is `None` when killed by a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolStatus {
    code: Option<i32>,
}

impl ToolStatus {
    pub const SUCCESS: ToolStatus = ToolStatus { code: Some(0) };

    pub fn from_code(code: i32) -> Self {
        ToolStatus { code: Some(code) }
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    pub fn code(&self) -> Option<i32> {
        self.code
    }

    /// Code to propagate as our own exit status.
    pub fn exit_code(&self) -> i32 {
        match self.code {
            Some(0) | None => 1,
            Some(code) => code,
        }
    }
}

impl From<ExitStatus> for ToolStatus {
    fn from(status: ExitStatus) -> Self {
        ToolStatus {
            code: status.code(),
        }
    }
}

impl fmt::Display for ToolStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "exit status {}", code),
            None => write!(f, "terminated by signal"),
        }
    }
}

pub trait Executor {
    /// Run to completion. A non-zero exit is reported in the status, not as
    /// an error; errors mean the tool could not be run at all.
    fn run(&self, invocation: &Invocation) -> TaskResult<ToolStatus>;
}

/// Spawns the tool with inherited stdio and waits for it.
pub struct ProcessExecutor;

impl Executor for ProcessExecutor {
    fn run(&self, invocation: &Invocation) -> TaskResult<ToolStatus> {
        debug!("    $ {}", invocation);
        let output = duct::cmd(invocation.program.as_str(), &invocation.args)
            .dir(&invocation.cwd)
            .unchecked()
            .run()
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => TaskError::CmdNotFound(invocation.program.clone()),
                _ => TaskError::Io(e),
            })?;
        Ok(output.status.into())
    }
}

/// Logs what would run and reports success.
pub struct DryRunExecutor;

impl Executor for DryRunExecutor {
    fn run(&self, invocation: &Invocation) -> TaskResult<ToolStatus> {
        info!("    (dry run) {}", invocation);
        Ok(ToolStatus::SUCCESS)
    }
}
