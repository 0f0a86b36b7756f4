//! Inventory fetcher
//!
//! Organization and network enumeration are fatal when they fail. Every
//! sub-resource query below that is best-effort: a failure becomes an empty
//! collection plus a [`Diagnostic`], and never affects another query.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use indicatif::ProgressBar;
use log::{debug, warn};

use super::{DegradedCause, Diagnostic, FetchOutcome, Inventory, NetworkInventory};
use crate::client::parallel::run_bounded;
use crate::client::{DashboardApi, Network, Organization};
use crate::config::FetchSettings;
use crate::error::{Error, Result};
use crate::naming::{NameRegistry, sanitize};
use crate::resource::ResourceKind;

/// A network with its resolved key, ready to fetch
#[derive(Debug, Clone)]
pub(crate) struct KeyedNetwork {
    pub id: String,
    pub key: String,
    pub network: Network,
}

/// Fetches one organization's inventory through a [`DashboardApi`].
pub struct Fetcher<'a> {
    api: &'a dyn DashboardApi,
    max_concurrent: usize,
    deadline: Option<Instant>,
    progress: Option<ProgressBar>,
}

impl<'a> Fetcher<'a> {
    /// Create a fetcher; the deadline clock starts now.
    pub fn new(api: &'a dyn DashboardApi, settings: &FetchSettings) -> Self {
        Self {
            api,
            max_concurrent: settings.max_concurrent,
            deadline: settings
                .deadline_secs
                .map(|secs| Instant::now() + Duration::from_secs(secs)),
            progress: None,
        }
    }

    /// Override the run deadline.
    #[cfg(test)]
    pub fn with_deadline(mut self, deadline: Option<Instant>) -> Self {
        self.deadline = deadline;
        self
    }

    /// Report per-network progress on a bar.
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Resolve an organization by name (case-insensitive) or ID.
    pub async fn resolve_org(&self, query: &str) -> Result<Organization> {
        let orgs = self.api.list_organizations().await?;

        if let Some(org) = orgs.iter().find(|o| o.matches(query)) {
            return Ok(org.clone());
        }

        let available = orgs
            .iter()
            .map(|o| format!("  - {} (ID: {})", o.name, o.id))
            .collect::<Vec<_>>()
            .join("\n");

        Err(Error::OrgNotFound {
            query: query.to_string(),
            available,
        })
    }

    /// List an organization's networks. Failure aborts the run.
    pub async fn list_networks(&self, org_id: &str) -> Result<Vec<Network>> {
        self.api
            .list_networks(org_id)
            .await
            .map_err(|e| Error::NetworkEnumeration {
                org_id: org_id.to_string(),
                source: Box::new(e),
            })
    }

    /// Query one sub-resource, degrading any failure.
    pub async fn fetch_resource(&self, kind: ResourceKind, network_id: &str) -> FetchOutcome {
        if self.deadline_passed() {
            return FetchOutcome::DeadlineExceeded;
        }

        match kind.fetch(self.api, network_id).await {
            Ok(value) => FetchOutcome::from_value(value),
            Err(e) => FetchOutcome::Failed(e.to_string()),
        }
    }

    /// Assign keys and fetch every sub-resource of every network.
    ///
    /// Networks without an identifier are skipped. Output order follows the
    /// order the dashboard listed the networks in.
    pub async fn fetch_inventory(
        &self,
        org: Organization,
        networks: Vec<Network>,
        registry: &mut NameRegistry,
    ) -> Inventory {
        let pending = assign_keys(networks, registry);

        if let Some(pb) = &self.progress {
            pb.set_length(pending.len() as u64);
        }

        let results = run_bounded(
            pending,
            |network| self.fetch_network(network),
            self.max_concurrent,
        )
        .await;

        let mut networks = Vec::with_capacity(results.len());
        let mut diagnostics = Vec::new();
        for (network, degraded) in results {
            networks.push(network);
            diagnostics.extend(degraded);
        }

        Inventory {
            org_key: sanitize(&org.name),
            org,
            networks,
            diagnostics,
        }
    }

    async fn fetch_network(&self, network: KeyedNetwork) -> (NetworkInventory, Vec<Diagnostic>) {
        debug!("Fetching sub-resources for {} ({})", network.key, network.id);

        let mut collections = BTreeMap::new();
        let mut diagnostics = Vec::new();

        for kind in ResourceKind::ALL {
            let outcome = self.fetch_resource(kind, &network.id).await;

            if outcome.is_degraded() {
                let cause = match &outcome {
                    FetchOutcome::Failed(msg) => DegradedCause::Failed(msg.clone()),
                    _ => DegradedCause::DeadlineExceeded,
                };
                let diagnostic = Diagnostic {
                    network_id: network.id.clone(),
                    network_key: network.key.clone(),
                    kind,
                    cause,
                };
                warn!("Degraded: {}", diagnostic);
                diagnostics.push(diagnostic);
            }

            collections.insert(kind, outcome.into_records(kind));
        }

        if let Some(pb) = &self.progress {
            pb.inc(1);
        }

        let inventory = NetworkInventory {
            id: network.id,
            key: network.key,
            name: network.network.name,
            collections,
        };
        (inventory, diagnostics)
    }

    fn deadline_passed(&self) -> bool {
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }
}

/// Resolve keys for every network with an identifier, in listing order.
///
/// Every caller that shows or uses network keys goes through here.
pub(crate) fn assign_keys(networks: Vec<Network>, registry: &mut NameRegistry) -> Vec<KeyedNetwork> {
    networks
        .into_iter()
        .filter_map(|network| {
            let Some(id) = network.id.clone().filter(|id| !id.is_empty()) else {
                warn!("Skipping network '{}' without an ID", network.name);
                return None;
            };
            let key = registry.assign(&id, &network.name);
            Some(KeyedNetwork { id, key, network })
        })
        .collect()
}
