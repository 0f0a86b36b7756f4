//! Command execution context
//!
//! Provides a unified context for command execution: config loading with CLI
//! overrides, credential validation, and client initialization.

use std::sync::Arc;

use log::debug;

use crate::cli::{GlobalOptions, OutputFormat};
use crate::client::MerakiClient;
use crate::config::Config;
use crate::error::{ConfigError, Result};
use crate::inventory::Fetcher;

/// Context for command execution containing config, client, and runtime options.
pub struct CommandContext {
    /// Loaded configuration with CLI/env overrides applied
    pub config: Config,
    /// Dashboard API client
    pub client: Arc<MerakiClient>,
    /// Output format preference
    pub format: OutputFormat,
}

impl CommandContext {
    /// Create a context for a command that talks to the dashboard.
    ///
    /// # Errors
    /// Returns error if config cannot be loaded or no API key is available.
    pub fn new(opts: &GlobalOptions) -> Result<Self> {
        let config = Self::load_config(opts)?;
        config.validate_auth()?;

        let api_key = config.api_key.clone().ok_or(ConfigError::MissingApiKey)?;
        let client = MerakiClient::with_host(api_key, config.api_host.as_deref())?;
        debug!("Using dashboard API at {}", client.base_url());

        Ok(Self {
            config,
            client: Arc::new(client),
            format: opts.format,
        })
    }

    /// Load the config file and apply CLI/env overrides, without requiring
    /// a credential.
    pub fn load_config(opts: &GlobalOptions) -> Result<Config> {
        let config = Config::load_at(opts.config_ref())?;
        Ok(opts.apply(config))
    }

    /// Get the organization, returning an error if not set.
    pub fn require_org(&self) -> Result<&str> {
        self.config.require_org()
    }

    /// Inventory fetcher over this context's client and fetch settings
    pub fn fetcher(&self) -> Fetcher<'_> {
        Fetcher::new(self.client.as_ref(), &self.config.fetch)
    }
}
