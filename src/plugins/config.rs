use clap::Parser;

use super::{parse_options, Context, TaskPlugin};
use crate::config::Config;
use crate::utils::TaskResult;

const DESCRIPTION: &str = "Print the effective configuration as TOML";

#[derive(Debug, Parser)]
#[command(about = DESCRIPTION)]
struct ConfigOptions {}

pub struct ConfigTask {
    config: Config,
}

pub type TaskInstance = ConfigTask;

impl TaskPlugin for ConfigTask {
    fn new(args: &[String], config: &Config) -> TaskResult<Self> {
        let ConfigOptions {} = parse_options("config", args)?;
        Ok(ConfigTask {
            config: config.clone(),
        })
    }

    fn description() -> &'static str {
        DESCRIPTION
    }

    fn execute(&self, ctx: &Context<'_>) -> TaskResult<()> {
        println!("# root: {}", ctx.root.display());
        print!("{}", toml::to_string_pretty(&self.config)?);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_config_round_trips() {
        let config = Config::default();
        let text = toml::to_string_pretty(&config).unwrap();
        assert!(text.contains("packages_dir = \"packages\""));
        let back: Config = toml::from_str(&text).unwrap();
        assert_eq!(back, config);
    }
}
