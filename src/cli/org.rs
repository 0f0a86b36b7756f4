//! Organization command implementations

use log::debug;

use crate::cli::{CommandContext, GlobalOptions};
use crate::client::DashboardApi;
use crate::error::Result;
use crate::models::OrgDisplay;
use crate::output;

/// Run the orgs command
pub async fn list(opts: &GlobalOptions) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let orgs = ctx.client.list_organizations().await?;

    debug!("Fetched {} organizations", orgs.len());

    let rows: Vec<OrgDisplay> = orgs.into_iter().map(OrgDisplay::from).collect();
    output::print(rows.as_slice(), ctx.format)
}
