//! Generate command implementation

use colored::Colorize;
use log::warn;

use crate::cli::fetch::{collect, print_degraded};
use crate::cli::imports::write_import_scripts;
use crate::cli::{CommandContext, GlobalOptions};
use crate::error::Result;
use crate::imports::script_name;
use crate::scaffold::{self, write_files};
use crate::terraform::Terraform;

/// Run the full pipeline: fetch, store, scaffold, import scripts, Terraform.
pub async fn run(opts: &GlobalOptions, skip_terraform: bool) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let fetched = collect(&ctx).await?;
    let root = fetched.root();
    let inventory = &fetched.inventory;
    let network_ids = inventory.network_ids();

    let plan = scaffold::plan(&inventory.org_key, &network_ids);
    let files = plan.render(
        &ctx.config.terraform,
        &ctx.config.import_keys,
        ctx.config.api_key.as_deref(),
    );
    write_files(&root, &files)?;
    println!(
        "{} Generated {} Terraform files for {} networks",
        "✓".green(),
        files.len(),
        network_ids.len()
    );

    let imports = write_import_scripts(&root, &inventory.networks, &ctx.config)?;
    println!(
        "{} Wrote {} import scripts with {} directives",
        "✓".green(),
        imports.scripts,
        imports.directives
    );
    if imports.skipped > 0 {
        println!(
            "{} Skipped {} records without an identifier",
            "⚠".yellow(),
            imports.skipped
        );
    }

    if skip_terraform {
        println!("{}", "Skipping Terraform initialization".dimmed());
    } else {
        println!("\n{}", "Initializing Terraform...".cyan());
        let workspaces: Vec<String> = network_ids.iter().map(|(key, _)| key.clone()).collect();
        let mut terraform = Terraform::new(&ctx.config.terraform.binary, &root);
        match terraform.provision(&workspaces).await {
            Ok(report) if report.failure_count() == 0 => {
                println!(
                    "{} Terraform initialized with {} workspaces",
                    "✓".green(),
                    workspaces.len()
                );
            }
            Ok(report) => {
                for failure in report.failures() {
                    println!(
                        "{} `{}`: {}",
                        "⚠".yellow(),
                        failure.command,
                        failure.summary()
                    );
                }
            }
            Err(e) => {
                warn!("Terraform step skipped: {}", e);
                println!("{} Terraform step skipped: {}", "⚠".yellow(), e);
            }
        }
    }

    println!();
    print_degraded(inventory);
    print_next_steps(&root.display().to_string(), network_ids.first().map(|(k, _)| k.as_str()));

    Ok(())
}

fn print_next_steps(root: &str, example_key: Option<&str>) {
    let Some(key) = example_key else {
        println!("{}", "No networks with an ID were found; nothing to apply.".yellow());
        return;
    };

    println!("\n{}", "Next steps:".bold());
    println!("  cd {}", root);
    println!(
        "  ./{}  {}",
        script_name(key),
        "# adopt existing resources into the workspace".dimmed()
    );
    println!("  terraform workspace select {}", key);
    println!("  terraform apply -target=module.{}", key);
}
