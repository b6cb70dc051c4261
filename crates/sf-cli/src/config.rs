//! Configuration types and parsing for schemaflow.yml

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::cli::OutputFormat;
use sf_core::PlanOptions;

/// Optional project configuration. Every field has a default so an absent
/// file and an empty file behave identically; CLI flags override.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Per-statement timeout in milliseconds
    #[serde(default = "default_statement_timeout_ms")]
    pub statement_timeout_ms: u64,

    /// Per-statement lock timeout in milliseconds
    #[serde(default = "default_lock_timeout_ms")]
    pub lock_timeout_ms: u64,

    /// Default output format when no `--format` flag is given
    #[serde(default = "default_output_format")]
    pub output: OutputFormat,
}

fn default_statement_timeout_ms() -> u64 {
    3000
}

fn default_lock_timeout_ms() -> u64 {
    1500
}

fn default_output_format() -> OutputFormat {
    OutputFormat::Text
}

impl Default for Config {
    fn default() -> Self {
        Self {
            statement_timeout_ms: default_statement_timeout_ms(),
            lock_timeout_ms: default_lock_timeout_ms(),
            output: default_output_format(),
        }
    }
}

impl Config {
    /// Load from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_yaml::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Planner options after applying CLI overrides.
    pub fn plan_options(
        &self,
        statement_timeout_ms: Option<u64>,
        lock_timeout_ms: Option<u64>,
    ) -> PlanOptions {
        PlanOptions {
            default_statement_timeout: Duration::from_millis(
                statement_timeout_ms.unwrap_or(self.statement_timeout_ms),
            ),
            default_lock_timeout: Duration::from_millis(
                lock_timeout_ms.unwrap_or(self.lock_timeout_ms),
            ),
        }
    }

    /// Output format after applying the CLI override.
    pub fn output_format(&self, flag: Option<OutputFormat>) -> OutputFormat {
        flag.unwrap_or(self.output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_planner_defaults() {
        let options = Config::default().plan_options(None, None);
        assert_eq!(options, PlanOptions::default());
    }

    #[test]
    fn cli_overrides_win() {
        let config = Config {
            statement_timeout_ms: 10_000,
            lock_timeout_ms: 2_000,
            output: OutputFormat::Json,
        };
        let options = config.plan_options(Some(60_000), None);
        assert_eq!(
            options.default_statement_timeout,
            Duration::from_millis(60_000)
        );
        assert_eq!(options.default_lock_timeout, Duration::from_millis(2_000));
        assert_eq!(config.output_format(Some(OutputFormat::Text)), OutputFormat::Text);
    }

    #[test]
    fn parses_yaml() {
        let config: Config = serde_yaml::from_str(
            "statement_timeout_ms: 5000\nlock_timeout_ms: 750\noutput: json\n",
        )
        .unwrap();
        assert_eq!(config.statement_timeout_ms, 5000);
        assert_eq!(config.lock_timeout_ms, 750);
        assert_eq!(config.output, OutputFormat::Json);
    }

    #[test]
    fn empty_yaml_uses_defaults() {
        let config: Config = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.statement_timeout_ms, 3000);
        assert_eq!(config.output, OutputFormat::Text);
    }

    #[test]
    fn config_output_applies_when_no_flag_is_given() {
        let config: Config = serde_yaml::from_str("output: json").unwrap();
        assert_eq!(config.output_format(None), OutputFormat::Json);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result: Result<Config, _> = serde_yaml::from_str("statement_timeout: 5");
        assert!(result.is_err());
    }
}
