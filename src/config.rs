//! Layered configuration: built-in defaults, then `pkgtask.toml` at the
//! repository root, then `PKGTASK_*` environment variables.
//!
//! Command templates are argv lists. `{dir}` expands to the package
//! subdirectory (relative to the root) and `{package}` to the package name.

use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::utils::{TaskError, TaskResult};

pub const CONFIG_FILE: &str = "pkgtask.toml";
pub const ENV_PREFIX: &str = "PKGTASK_";
pub const DEFAULT_PACKAGES_DIR: &str = "packages";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub packages_dir: PathBuf,
    pub typecheck: TypecheckConfig,
    pub test: TestConfig,
    pub format: FormatConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypecheckConfig {
    pub source_dir: String,
    pub command: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TestConfig {
    pub tests_dir: String,
    pub command: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatConfig {
    pub commands: Vec<Vec<String>>,
}

fn argv(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            packages_dir: PathBuf::from(DEFAULT_PACKAGES_DIR),
            typecheck: TypecheckConfig::default(),
            test: TestConfig::default(),
            format: FormatConfig::default(),
        }
    }
}

impl Default for TypecheckConfig {
    fn default() -> Self {
        TypecheckConfig {
            source_dir: "src".to_string(),
            command: argv(&[
                "uv",
                "run",
                "--with",
                "mypy",
                "mypy",
                "{dir}",
                "--ignore-missing-imports",
            ]),
        }
    }
}

impl Default for TestConfig {
    fn default() -> Self {
        TestConfig {
            tests_dir: "tests".to_string(),
            command: argv(&["uv", "run", "pytest", "{dir}", "-v"]),
        }
    }
}

impl Default for FormatConfig {
    fn default() -> Self {
        FormatConfig {
            commands: vec![
                argv(&["ruff", "format", "."]),
                argv(&["ruff", "check", "--fix", "."]),
            ],
        }
    }
}

impl Config {
    /// The provider stack for a repository rooted at `root`.
    pub fn figment(root: &Path) -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(root.join(CONFIG_FILE)))
            .merge(Env::prefixed(ENV_PREFIX).ignore(&["root"]).split("__"))
    }

    /// Extract the merged configuration. Each task validates the sections
    /// it reads when it is constructed.
    pub fn load(root: &Path) -> TaskResult<Config> {
        Ok(Self::figment(root).extract()?)
    }
}

fn require_command(key: &str, command: &[String]) -> TaskResult<()> {
    if command.is_empty() {
        return Err(TaskError::InvalidConfig(format!("{} is empty", key)));
    }
    Ok(())
}

fn require_dir(key: &str, dir: &str) -> TaskResult<()> {
    if dir.trim().is_empty() {
        return Err(TaskError::InvalidConfig(format!("{} is empty", key)));
    }
    Ok(())
}

impl TypecheckConfig {
    pub fn validate(&self) -> TaskResult<()> {
        require_command("typecheck.command", &self.command)?;
        require_dir("typecheck.source_dir", &self.source_dir)
    }
}

impl TestConfig {
    pub fn validate(&self) -> TaskResult<()> {
        require_command("test.command", &self.command)?;
        require_dir("test.tests_dir", &self.tests_dir)
    }
}

impl FormatConfig {
    pub fn validate(&self) -> TaskResult<()> {
        for (i, command) in self.commands.iter().enumerate() {
            require_command(&format!("format.commands[{}]", i), command)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_defaults_without_config_file() {
        Jail::expect_with(|jail| {
            let config = Config::load(jail.directory()).map_err(|e| e.to_string())?;
            assert_eq!(config, Config::default());
            assert_eq!(config.format.commands.len(), 2);
            assert!(config
                .typecheck
                .command
                .contains(&"--ignore-missing-imports".to_string()));
            assert!(config.test.command.contains(&"-v".to_string()));
            Ok(())
        });
    }

    #[test]
    fn test_file_overrides_defaults() {
        Jail::expect_with(|jail| {
            jail.create_file(
                CONFIG_FILE,
                r#"
                packages_dir = "libs"

                [test]
                command = ["cargo", "test", "--manifest-path", "{dir}"]
                "#,
            )?;
            let config = Config::load(jail.directory()).map_err(|e| e.to_string())?;
            assert_eq!(config.packages_dir, PathBuf::from("libs"));
            assert_eq!(config.test.command[0], "cargo");
            // untouched keys keep their defaults
            assert_eq!(config.test.tests_dir, "tests");
            assert_eq!(config.typecheck, TypecheckConfig::default());
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file(CONFIG_FILE, "[typecheck]\nsource_dir = \"lib\"\n")?;
            jail.set_env("PKGTASK_TYPECHECK__SOURCE_DIR", "source");
            jail.set_env("PKGTASK_ROOT", "/somewhere");
            let config = Config::load(jail.directory()).map_err(|e| e.to_string())?;
            assert_eq!(config.typecheck.source_dir, "source");
            Ok(())
        });
    }

    #[test]
    fn test_empty_command_rejected() {
        Jail::expect_with(|jail| {
            jail.create_file(CONFIG_FILE, "[format]\ncommands = [[\"ruff\"], []]\n")?;
            let config = Config::load(jail.directory()).map_err(|e| e.to_string())?;
            match config.format.validate() {
                Err(TaskError::InvalidConfig(msg)) => assert!(msg.contains("format.commands[1]")),
                other => panic!("expected invalid config, got {:?}", other),
            }
            Ok(())
        });
    }

    #[test]
    fn test_sections_validate_independently() {
        Jail::expect_with(|jail| {
            jail.create_file(CONFIG_FILE, "[test]\ncommand = []\n")?;
            let config = Config::load(jail.directory()).map_err(|e| e.to_string())?;
            assert!(config.typecheck.validate().is_ok());
            assert!(config.format.validate().is_ok());
            assert!(matches!(
                config.test.validate(),
                Err(TaskError::InvalidConfig(msg)) if msg == "test.command is empty"
            ));
            Ok(())
        });
    }
}
