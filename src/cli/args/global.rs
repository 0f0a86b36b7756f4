//! Global CLI options shared across all commands

use std::path::PathBuf;

use crate::cli::{Cli, OutputFormat};
use crate::config::Config;

/// Global CLI options passed to all command handlers.
///
/// # Precedence
///
/// CLI flag > environment variable > config file > default. This struct
/// captures the CLI/env layer; [`GlobalOptions::apply`] lays it over a loaded
/// config.
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Output format for list commands
    pub format: OutputFormat,

    /// Dashboard API key override
    pub api_key: Option<String>,

    /// Organization (name or ID) override
    pub org: Option<String>,

    /// Output directory override
    pub output_dir: Option<PathBuf>,

    /// Custom config file path (defaults to ~/.merakiform/config.yaml)
    pub config: Option<String>,

    /// Custom dashboard API base URL
    pub api_host: Option<String>,
}

impl GlobalOptions {
    /// Create GlobalOptions from a parsed CLI struct.
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            format: cli.format,
            api_key: cli.api_key.clone(),
            org: cli.org.clone(),
            output_dir: cli.output_dir.clone(),
            config: cli.config.clone(),
            api_host: cli.api_host.clone(),
        }
    }

    /// Get config path as `Option<&str>`.
    pub fn config_ref(&self) -> Option<&str> {
        self.config.as_deref()
    }

    /// Overlay the CLI/env values on a loaded config.
    pub fn apply(&self, mut config: Config) -> Config {
        if let Some(key) = &self.api_key {
            config.api_key = Some(key.clone());
        }
        if let Some(org) = &self.org {
            config.org = Some(org.clone());
        }
        if let Some(dir) = &self.output_dir {
            config.output_dir = Some(dir.clone());
        }
        if let Some(host) = &self.api_host {
            config.api_host = Some(host.clone());
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_options_accessors() {
        let opts = GlobalOptions {
            config: Some("/custom/path".to_string()),
            api_host: Some("http://localhost:8080".to_string()),
            ..GlobalOptions::default()
        };

        assert_eq!(opts.config_ref(), Some("/custom/path"));
        assert_eq!(opts.api_host.as_deref(), Some("http://localhost:8080"));
        assert_eq!(opts.format, OutputFormat::Table);
    }

    #[test]
    fn test_flags_override_config() {
        let config = Config {
            api_key: Some("from-file".to_string()),
            org: Some("Acme HQ".to_string()),
            ..Config::default()
        };
        let opts = GlobalOptions {
            api_key: Some("from-flag".to_string()),
            output_dir: Some(PathBuf::from("/tmp/tf")),
            ..GlobalOptions::default()
        };

        let merged = opts.apply(config);

        assert_eq!(merged.api_key.as_deref(), Some("from-flag"));
        assert_eq!(merged.org.as_deref(), Some("Acme HQ"));
        assert_eq!(merged.output_dir(), PathBuf::from("/tmp/tf"));
        assert!(merged.api_host.is_none());
    }
}
