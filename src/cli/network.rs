//! Network command implementations

use log::debug;

use crate::cli::{CommandContext, GlobalOptions};
use crate::error::Result;
use crate::inventory::Fetcher;
use crate::inventory::fetcher::assign_keys;
use crate::models::NetworkDisplay;
use crate::naming::NameRegistry;
use crate::output;
use crate::scaffold::RESERVED_MODULE_NAMES;

/// Resolve the organization and list its networks with the keys a fetch
/// would assign them.
pub async fn network_rows(fetcher: &Fetcher<'_>, org: &str) -> Result<Vec<NetworkDisplay>> {
    let org = fetcher.resolve_org(org).await?;
    let networks = fetcher.list_networks(&org.id).await?;
    debug!("Fetched {} networks for org {}", networks.len(), org.id);

    let mut registry = NameRegistry::with_reserved(RESERVED_MODULE_NAMES);
    let rows = assign_keys(networks, &mut registry)
        .into_iter()
        .map(|keyed| NetworkDisplay::new(keyed.key, keyed.id, &keyed.network))
        .collect();

    Ok(rows)
}

/// Run the networks command
pub async fn list(opts: &GlobalOptions) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let org = ctx.require_org()?;

    let rows = network_rows(&ctx.fetcher(), org).await?;
    output::print(rows.as_slice(), ctx.format)
}
