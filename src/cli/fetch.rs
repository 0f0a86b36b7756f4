//! Fetch command implementation
//!
//! [`collect`] is the fetch half of every pipeline run. The organization and
//! network listing and the output root are checked before anything is
//! written, so a fatal error never leaves a partial tree behind.

use std::path::PathBuf;

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use log::debug;

use crate::cli::{CommandContext, GlobalOptions};
use crate::error::{Error, Result};
use crate::inventory::{Inventory, InventoryStore};
use crate::models::DiagnosticDisplay;
use crate::naming::NameRegistry;
use crate::output::table;
use crate::scaffold::RESERVED_MODULE_NAMES;

/// Inventory persisted under an output root
pub struct FetchRun {
    pub inventory: Inventory,
    pub store: InventoryStore,
    pub files_written: usize,
}

impl FetchRun {
    pub fn root(&self) -> PathBuf {
        self.store.root().to_path_buf()
    }
}

fn progress_bar(len: u64) -> ProgressBar {
    let style = ProgressStyle::with_template("{spinner:.cyan} [{bar:30.cyan/blue}] {pos}/{len} networks")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> ");
    ProgressBar::new(len).with_style(style)
}

/// Resolve the organization, fetch every network and write the data files.
pub async fn collect(ctx: &CommandContext) -> Result<FetchRun> {
    let query = ctx.require_org()?;
    let fetcher = ctx.fetcher();

    println!("{} {}", "Resolving organization".cyan(), query.bold());
    let org = fetcher.resolve_org(query).await?;
    let networks = fetcher.list_networks(&org.id).await?;
    println!(
        "Found {} networks in {} ({})",
        networks.len().to_string().bold(),
        org.name.bold(),
        org.id
    );

    let root = ctx.config.output_dir();
    std::fs::create_dir_all(&root).map_err(|source| Error::OutputDir {
        path: root.clone(),
        source,
    })?;

    let pb = progress_bar(networks.len() as u64);
    let mut registry = NameRegistry::with_reserved(RESERVED_MODULE_NAMES);
    let inventory = fetcher
        .with_progress(pb.clone())
        .fetch_inventory(org, networks, &mut registry)
        .await;
    pb.finish_and_clear();

    let store = InventoryStore::new(&root);
    let mut files_written = 0;
    for network in &inventory.networks {
        files_written += store.write_network(&inventory.org_key, network)?.len();
    }
    debug!("Wrote {} data files under {}", files_written, root.display());

    Ok(FetchRun {
        inventory,
        store,
        files_written,
    })
}

/// Print the degraded-fetch count and, when there are any, their details.
pub fn print_degraded(inventory: &Inventory) {
    let count = inventory.diagnostics.len();
    if count == 0 {
        println!("{} All sub-resources fetched", "✓".green());
        return;
    }

    println!(
        "{} {} sub-resource fetches degraded to empty collections",
        "⚠".yellow(),
        count.to_string().bold()
    );
    let rows: Vec<DiagnosticDisplay> = inventory
        .diagnostics
        .iter()
        .map(DiagnosticDisplay::from)
        .collect();
    println!("{}", table::format_table(&rows));
}

/// Run the fetch command
pub async fn run(opts: &GlobalOptions) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let run = collect(&ctx).await?;

    println!(
        "\n{} Wrote {} data files for {} networks of {} to {}",
        "✓".green(),
        run.files_written,
        run.inventory.networks.len(),
        run.inventory.org.name.bold(),
        run.root().join(&run.inventory.org_key).display()
    );
    print_degraded(&run.inventory);

    Ok(())
}
