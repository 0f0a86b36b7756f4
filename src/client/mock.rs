//! Mock dashboard client for testing
//!
//! Provides a mock implementation of [`DashboardApi`] for unit testing
//! without making real API calls.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;

use super::{DashboardApi, Network, Organization};
use crate::error::{ApiError, Result};
use crate::resource::ResourceKind;

/// Mock API client for testing.
///
/// Configure expected responses via builder methods, then use in tests.
///
/// # Example
/// ```ignore
/// let mock = MockDashboardClient::new()
///     .with_networks(vec![NetworkBuilder::new("N1").name("Branch A").build()])
///     .await
///     .with_records("N1", ResourceKind::Ssids, json!([{"number": 0}]))
///     .await
///     .failing("N1", ResourceKind::VlansMx)
///     .await;
/// ```
#[derive(Default)]
pub struct MockDashboardClient {
    /// Organizations to return from list_organizations
    orgs: Arc<Mutex<Vec<Organization>>>,
    /// Networks to return from list_networks
    networks: Arc<Mutex<Vec<Network>>>,
    /// Raw payloads keyed by (network id, kind)
    records: Arc<Mutex<HashMap<(String, ResourceKind), Value>>>,
    /// Sub-resource queries that fail with a transport error
    failures: Arc<Mutex<HashSet<(String, ResourceKind)>>>,
    /// Whether list_networks fails
    fail_networks: Arc<Mutex<bool>>,
    /// Track number of calls for verification
    call_count: Arc<Mutex<CallCounts>>,
}

/// Tracks API call counts for test verification
#[derive(Default, Debug, Clone)]
pub struct CallCounts {
    pub list_organizations: usize,
    pub list_networks: usize,
    pub sub_resources: HashMap<ResourceKind, usize>,
}

impl CallCounts {
    /// Get total number of API calls made.
    pub fn total(&self) -> usize {
        self.list_organizations + self.list_networks + self.sub_resources.values().sum::<usize>()
    }
}

impl MockDashboardClient {
    /// Create a new mock client with default (empty) responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure organizations to return from list_organizations.
    pub async fn with_orgs(self, orgs: Vec<Organization>) -> Self {
        *self.orgs.lock().await = orgs;
        self
    }

    /// Configure networks to return from list_networks.
    pub async fn with_networks(self, networks: Vec<Network>) -> Self {
        *self.networks.lock().await = networks;
        self
    }

    /// Configure the raw payload for one network's sub-resource.
    pub async fn with_records(self, network_id: &str, kind: ResourceKind, value: Value) -> Self {
        self.records
            .lock()
            .await
            .insert((network_id.to_string(), kind), value);
        self
    }

    /// Make one network's sub-resource query fail.
    pub async fn failing(self, network_id: &str, kind: ResourceKind) -> Self {
        self.failures
            .lock()
            .await
            .insert((network_id.to_string(), kind));
        self
    }

    /// Make list_networks fail.
    pub async fn failing_networks(self) -> Self {
        *self.fail_networks.lock().await = true;
        self
    }

    /// Get a snapshot of call counts.
    pub async fn call_counts(&self) -> CallCounts {
        self.call_count.lock().await.clone()
    }

    async fn sub_resource(&self, network_id: &str, kind: ResourceKind) -> Result<Value> {
        *self
            .call_count
            .lock()
            .await
            .sub_resources
            .entry(kind)
            .or_default() += 1;

        let key = (network_id.to_string(), kind);
        if self.failures.lock().await.contains(&key) {
            return Err(ApiError::Network(format!("connection reset fetching {kind}")).into());
        }

        Ok(self
            .records
            .lock()
            .await
            .get(&key)
            .cloned()
            .unwrap_or(Value::Null))
    }
}

#[async_trait]
impl DashboardApi for MockDashboardClient {
    async fn list_organizations(&self) -> Result<Vec<Organization>> {
        self.call_count.lock().await.list_organizations += 1;
        Ok(self.orgs.lock().await.clone())
    }

    async fn list_networks(&self, _org_id: &str) -> Result<Vec<Network>> {
        self.call_count.lock().await.list_networks += 1;
        if *self.fail_networks.lock().await {
            return Err(ApiError::ServerError("upstream unavailable".to_string()).into());
        }
        Ok(self.networks.lock().await.clone())
    }

    async fn get_ssids(&self, network_id: &str) -> Result<Value> {
        self.sub_resource(network_id, ResourceKind::Ssids).await
    }

    async fn get_firewall_rules(&self, network_id: &str) -> Result<Value> {
        self.sub_resource(network_id, ResourceKind::FirewallRules)
            .await
    }

    async fn get_webhook_servers(&self, network_id: &str) -> Result<Value> {
        self.sub_resource(network_id, ResourceKind::WebhookServers)
            .await
    }

    async fn get_alert_settings(&self, network_id: &str) -> Result<Value> {
        self.sub_resource(network_id, ResourceKind::Alerts).await
    }

    async fn get_vlans_mx(&self, network_id: &str) -> Result<Value> {
        self.sub_resource(network_id, ResourceKind::VlansMx).await
    }

    async fn get_devices(&self, network_id: &str) -> Result<Value> {
        self.sub_resource(network_id, ResourceKind::Devices).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::fixtures::NetworkBuilder;
    use serde_json::json;

    #[tokio::test]
    async fn test_mock_returns_configured_records() {
        let mock = MockDashboardClient::new()
            .with_records("N1", ResourceKind::Ssids, json!([{"number": 0}]))
            .await;

        assert_eq!(mock.get_ssids("N1").await.unwrap(), json!([{"number": 0}]));
        assert_eq!(mock.get_ssids("N2").await.unwrap(), Value::Null);
        assert_eq!(mock.call_counts().await.total(), 2);
    }

    #[tokio::test]
    async fn test_mock_failures_are_scoped() {
        let mock = MockDashboardClient::new()
            .failing("N2", ResourceKind::VlansMx)
            .await;

        assert!(mock.get_vlans_mx("N2").await.is_err());
        assert!(mock.get_vlans_mx("N1").await.is_ok());
        assert!(mock.get_ssids("N2").await.is_ok());
    }

    #[tokio::test]
    async fn test_mock_network_listing() {
        let mock = MockDashboardClient::new()
            .with_networks(vec![NetworkBuilder::new("N1").build()])
            .await;
        assert_eq!(mock.list_networks("o").await.unwrap().len(), 1);

        let failing = MockDashboardClient::new().failing_networks().await;
        assert!(failing.list_networks("o").await.is_err());
    }
}
