//! Merakiform CLI - scaffold a Terraform project from a Meraki dashboard inventory

use clap::{CommandFactory, Parser};

mod cli;
mod client;
mod config;
mod error;
mod imports;
mod inventory;
mod models;
mod naming;
mod output;
mod resource;
mod scaffold;
mod terraform;

use cli::{Cli, Commands, GlobalOptions};
use error::Result;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.debug);

    if let Err(err) = run(cli).await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

/// `--debug` raises this crate to debug; otherwise `RUST_LOG` or `warn`.
fn init_logging(debug: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if debug {
        builder.filter_module(env!("CARGO_PKG_NAME"), log::LevelFilter::Debug);
    }
    builder.format_timestamp(None).init();
}

async fn run(cli: Cli) -> Result<()> {
    let opts = GlobalOptions::from_cli(&cli);

    match cli.command {
        Commands::Init => cli::init::run(&opts).await,
        Commands::Orgs => cli::org::list(&opts).await,
        Commands::Networks => cli::network::list(&opts).await,
        Commands::Fetch => cli::fetch::run(&opts).await,
        Commands::Generate { skip_terraform } => cli::generate::run(&opts, skip_terraform).await,
        Commands::Imports => cli::imports::run(&opts),
        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "merakiform", &mut std::io::stdout());
            Ok(())
        }
        Commands::Version => {
            println!("merakiform version {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
