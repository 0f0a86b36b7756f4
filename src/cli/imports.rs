//! Import script commands

use std::path::Path;

use colored::Colorize;
use log::debug;

use crate::cli::{CommandContext, GlobalOptions};
use crate::config::Config;
use crate::error::{ConfigError, Result};
use crate::imports::{directives_for, load_network_map, script_file};
use crate::inventory::{InventoryStore, NetworkInventory};
use crate::naming::sanitize;
use crate::scaffold::write_files;

/// Totals of one import-script pass
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub scripts: usize,
    pub directives: usize,
    pub skipped: usize,
}

/// Write one import script per network under `root`.
pub fn write_import_scripts(
    root: &Path,
    networks: &[NetworkInventory],
    config: &Config,
) -> Result<ImportSummary> {
    let mut summary = ImportSummary::default();
    let mut files = Vec::with_capacity(networks.len());

    for network in networks {
        let imports = directives_for(network, &config.import_keys);
        summary.directives += imports.directives.len();
        summary.skipped += imports.skipped;
        files.push(script_file(&imports, &config.terraform.binary));
    }

    summary.scripts = write_files(root, &files)?.len();
    Ok(summary)
}

/// Organization directory for offline runs: the configured org when its
/// directory exists, otherwise the single directory holding `network_key`.
fn resolve_org_key(store: &InventoryStore, org: Option<&str>, network_key: &str) -> Result<String> {
    if let Some(org) = org {
        let key = sanitize(org);
        if store.root().join(&key).is_dir() {
            return Ok(key);
        }
        debug!("No data directory for org key {}; discovering", key);
    }

    store.discover_org_key(network_key)?.ok_or_else(|| {
        ConfigError::Invalid(format!(
            "Cannot determine the organization directory under {}. Pass --org with the organization name.",
            store.root().display()
        ))
        .into()
    })
}

/// Regenerate import scripts from an existing output directory.
pub fn regenerate(config: &Config) -> Result<ImportSummary> {
    let root = config.output_dir();
    let pairs = load_network_map(&root)?;
    let store = InventoryStore::new(&root);

    // load_network_map never returns an empty map
    let first_key = pairs.first().map(|(key, _)| key.as_str()).unwrap_or_default();
    let org_key = resolve_org_key(&store, config.org.as_deref(), first_key)?;
    debug!("Regenerating imports for {} networks in {}", pairs.len(), org_key);

    let networks = pairs
        .iter()
        .map(|(key, id)| store.load_network(&org_key, key, id))
        .collect::<Result<Vec<_>>>()?;

    write_import_scripts(&root, &networks, config)
}

/// Run the imports command
pub fn run(opts: &GlobalOptions) -> Result<()> {
    let config = CommandContext::load_config(opts)?;
    let summary = regenerate(&config)?;

    println!(
        "{} Wrote {} import scripts with {} directives to {}",
        "✓".green(),
        summary.scripts,
        summary.directives,
        config.output_dir().display()
    );
    if summary.skipped > 0 {
        println!(
            "{} Skipped {} records without an identifier",
            "⚠".yellow(),
            summary.skipped
        );
    }

    Ok(())
}
