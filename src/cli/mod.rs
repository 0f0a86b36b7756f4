//! CLI command definitions and handlers

use std::path::PathBuf;

use clap::{Parser, Subcommand};
pub use clap_complete::Shell;

pub mod args;
pub mod context;
pub mod fetch;
pub mod generate;
pub mod imports;
pub mod init;
pub mod network;
pub mod org;

pub use args::{GlobalOptions, OutputFormat};
pub use context::CommandContext;

/// Merakiform - scaffold a Terraform project from a Meraki dashboard inventory
#[derive(Parser, Debug)]
#[command(name = "merakiform")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Meraki Dashboard API key
    #[arg(
        long,
        global = true,
        env = "MERAKI_DASHBOARD_API_KEY",
        hide_env_values = true
    )]
    pub api_key: Option<String>,

    /// Organization name or ID
    #[arg(long, global = true, env = "MERAKIFORM_ORG", hide_env = true)]
    pub org: Option<String>,

    /// Directory the Terraform project is generated in
    #[arg(long, global = true, env = "MERAKIFORM_OUTPUT_DIR", hide_env = true)]
    pub output_dir: Option<PathBuf>,

    /// Override config file location
    #[arg(long, global = true, env = "MERAKIFORM_CONFIG", hide_env = true)]
    pub config: Option<String>,

    /// Override the dashboard API base URL
    #[arg(long, global = true, env = "MERAKIFORM_API_HOST", hide_env = true)]
    pub api_host: Option<String>,

    /// Output format for list commands (table, json)
    #[arg(
        long,
        global = true,
        env = "MERAKIFORM_FORMAT",
        default_value = "table",
        hide_env = true
    )]
    pub format: OutputFormat,

    /// Enable debug logging
    #[arg(long, global = true, env = "MERAKIFORM_DEBUG", hide_env = true)]
    pub debug: bool,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Interactively create the configuration file
    Init,

    /// List accessible organizations
    Orgs,

    /// List the organization's networks with their resolved keys
    Networks,

    /// Fetch the inventory and write its data files
    Fetch,

    /// Fetch the inventory and generate the Terraform project and import scripts
    Generate {
        /// Do not run terraform init/fmt/validate/workspace new
        #[arg(long)]
        skip_terraform: bool,
    },

    /// Regenerate import scripts from previously fetched data, offline
    Imports,

    /// Generate shell completions
    #[command(after_help = "\
Examples:
  bash:   merakiform completion bash > /etc/bash_completion.d/merakiform
  zsh:    merakiform completion zsh > \"${fpath[1]}/_merakiform\"
  fish:   merakiform completion fish > ~/.config/fish/completions/merakiform.fish")]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Display version information
    Version,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_generate_with_globals() {
        let cli = Cli::try_parse_from([
            "merakiform",
            "generate",
            "--skip-terraform",
            "--org",
            "Acme HQ",
            "--output-dir",
            "out",
            "--format",
            "json",
        ])
        .unwrap();

        assert!(matches!(
            cli.command,
            Commands::Generate {
                skip_terraform: true
            }
        ));
        assert_eq!(cli.org.as_deref(), Some("Acme HQ"));
        assert_eq!(cli.output_dir, Some(PathBuf::from("out")));
        assert_eq!(cli.format, OutputFormat::Json);
    }
}
