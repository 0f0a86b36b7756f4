//! Meraki Dashboard API client

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;

#[cfg(test)]
pub mod fixtures;
pub mod meraki;
#[cfg(test)]
pub mod mock;
pub mod parallel;

pub use meraki::MerakiClient;
#[cfg(test)]
pub use mock::MockDashboardClient;

/// Inventory source.
///
/// Authentication, rate limiting and transport live behind this trait; the
/// rest of the crate only sees organizations, networks, and raw records.
#[async_trait]
pub trait DashboardApi: Send + Sync {
    /// List all organizations the credential can access
    async fn list_organizations(&self) -> Result<Vec<Organization>>;

    /// List all networks in an organization
    async fn list_networks(&self, org_id: &str) -> Result<Vec<Network>>;

    /// Wireless SSIDs of a network
    async fn get_ssids(&self, network_id: &str) -> Result<Value>;

    /// MX L3 firewall rules of a network (`{"rules": [...]}`)
    async fn get_firewall_rules(&self, network_id: &str) -> Result<Value>;

    /// Webhook HTTP servers of a network
    async fn get_webhook_servers(&self, network_id: &str) -> Result<Value>;

    /// Alert settings of a network
    async fn get_alert_settings(&self, network_id: &str) -> Result<Value>;

    /// MX appliance VLANs of a network
    async fn get_vlans_mx(&self, network_id: &str) -> Result<Value>;

    /// Devices claimed into a network
    async fn get_devices(&self, network_id: &str) -> Result<Value>;
}

/// Organization resource
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organization {
    /// Organization ID
    pub id: String,

    /// Organization name
    pub name: String,

    /// Dashboard URL (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Network resource
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Network {
    /// Network ID (absent on malformed records)
    #[serde(default)]
    pub id: Option<String>,

    /// Display name
    #[serde(default)]
    pub name: String,

    /// Owning organization ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<String>,

    /// Product types enabled on the network (appliance, wireless, switch, ...)
    #[serde(default)]
    pub product_types: Vec<String>,

    /// Time zone
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,

    /// Tags
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Organization {
    /// Whether a user-supplied name or ID refers to this organization
    pub fn matches(&self, query: &str) -> bool {
        self.id == query || self.name.eq_ignore_ascii_case(query)
    }
}
