//! Init command implementation

use std::path::PathBuf;

use colored::Colorize;
use dialoguer::{Input, Password, Select, theme::ColorfulTheme};

use crate::cli::GlobalOptions;
use crate::client::{DashboardApi, MerakiClient};
use crate::config::Config;
use crate::error::Result;

/// Run the init command
pub async fn run(opts: &GlobalOptions) -> Result<()> {
    println!("{}", "Welcome to Merakiform!".bold().green());
    println!("Let's set up your Meraki Dashboard configuration.\n");

    let mut config = Config::load_at(opts.config_ref()).unwrap_or_default();

    let api_key = match &opts.api_key {
        Some(key) => key.clone(),
        None => Password::with_theme(&ColorfulTheme::default())
            .with_prompt("Enter your Meraki Dashboard API key")
            .interact()?,
    };

    let api_host = opts.api_host.clone().or_else(|| config.api_host.clone());
    let client = MerakiClient::with_host(api_key.clone(), api_host.as_deref())?;

    println!("\n{}", "Fetching your organizations...".cyan());
    let orgs = client.list_organizations().await?;
    println!("{}", "✓ Authentication successful!".green());

    let org = if orgs.is_empty() {
        println!("{}", "⚠ No organizations found.".yellow());
        None
    } else if orgs.len() == 1 {
        let org = &orgs[0];
        println!("Found organization: {}", org.name.bold());
        let use_org = dialoguer::Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt("Set this as your default organization?")
            .default(true)
            .interact()?;

        if use_org { Some(org.name.clone()) } else { None }
    } else {
        let org_names: Vec<String> = orgs
            .iter()
            .map(|o| format!("{} ({})", o.name, o.id))
            .collect();

        println!("Found {} organizations.", orgs.len());
        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("Select your default organization")
            .items(&org_names)
            .default(0)
            .interact_opt()?;

        selection.map(|idx| orgs[idx].name.clone())
    };

    let default_dir = opts
        .output_dir
        .clone()
        .unwrap_or_else(|| config.output_dir())
        .display()
        .to_string();
    let output_dir: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Output directory for the Terraform project")
        .default(default_dir)
        .interact_text()?;

    config.api_key = Some(api_key);
    config.org = org;
    config.api_host = api_host;
    config.output_dir = Some(PathBuf::from(output_dir));

    let config_path = config.save_at(opts.config_ref())?;
    println!(
        "\n{} Configuration saved to: {}",
        "✓".green(),
        config_path.display()
    );

    if let Some(org) = &config.org {
        println!("  Default organization: {}", org.bold());
    }

    println!("\n{}", "You're all set! Try running:".bold());
    println!("  {} - List networks and their keys", "merakiform networks".cyan());
    println!(
        "  {} - Build the Terraform project",
        "merakiform generate".cyan()
    );

    Ok(())
}
