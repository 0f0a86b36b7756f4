//! Sub-resource kinds collected per network
//!
//! Every per-network collection is one [`ResourceKind`] variant. A variant
//! knows how to fetch itself, what its data file is called, which shared
//! Terraform module provisions it, and how its instances are imported. Adding
//! a kind means adding a variant here and a template in `scaffold::templates`.

use std::fmt;

use serde_json::Value;

use crate::client::DashboardApi;
use crate::error::Result;

/// A per-network sub-resource collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceKind {
    /// Wireless SSIDs, keyed by slot number
    Ssids,
    /// MX L3 firewall rule set, one instance per network
    FirewallRules,
    /// Webhook HTTP receivers, keyed by id
    WebhookServers,
    /// Alert settings, singleton per network
    Alerts,
    /// MX appliance VLANs, keyed by id
    VlansMx,
    /// Device inventory, stored only
    Devices,
}

/// How instances of a kind map onto Terraform state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportMode {
    /// One instance per record, addressed by the record's local identifier
    Keyed,
    /// Exactly one instance per network
    Singleton,
}

impl ResourceKind {
    /// All kinds, in fetch order.
    pub const ALL: [ResourceKind; 6] = [
        ResourceKind::Ssids,
        ResourceKind::FirewallRules,
        ResourceKind::WebhookServers,
        ResourceKind::Alerts,
        ResourceKind::VlansMx,
        ResourceKind::Devices,
    ];

    /// Kinds backed by a shared Terraform module, in scaffold order.
    pub const SERVICES: [ResourceKind; 5] = [
        ResourceKind::Ssids,
        ResourceKind::FirewallRules,
        ResourceKind::WebhookServers,
        ResourceKind::Alerts,
        ResourceKind::VlansMx,
    ];

    /// Kinds that produce import directives, in emission order.
    pub const IMPORT_ORDER: [ResourceKind; 4] = [
        ResourceKind::Ssids,
        ResourceKind::WebhookServers,
        ResourceKind::Alerts,
        ResourceKind::VlansMx,
    ];

    /// Name used in data file names (`<network>_<storage_name>.yaml`)
    pub fn storage_name(self) -> &'static str {
        match self {
            ResourceKind::Ssids => "ssids",
            ResourceKind::FirewallRules => "firewall_rules",
            ResourceKind::WebhookServers => "webhook_servers",
            ResourceKind::Alerts => "alerts",
            ResourceKind::VlansMx => "vlans_mx",
            ResourceKind::Devices => "devices",
        }
    }

    /// Shared module name, `None` for kinds that are only stored
    pub fn service_name(self) -> Option<&'static str> {
        match self {
            ResourceKind::Ssids => Some("ssids"),
            ResourceKind::FirewallRules => Some("firewall"),
            ResourceKind::WebhookServers => Some("webhooks"),
            ResourceKind::Alerts => Some("alerts"),
            ResourceKind::VlansMx => Some("vlans_mx"),
            ResourceKind::Devices => None,
        }
    }

    /// Terraform resource type provisioned by the shared module
    pub fn resource_type(self) -> Option<&'static str> {
        match self {
            ResourceKind::Ssids => Some("meraki_networks_wireless_ssids"),
            ResourceKind::FirewallRules => {
                Some("meraki_networks_appliance_firewall_l3_firewall_rules")
            }
            ResourceKind::WebhookServers => Some("meraki_networks_webhooks_http_servers"),
            ResourceKind::Alerts => Some("meraki_networks_alerts_settings"),
            ResourceKind::VlansMx => Some("meraki_networks_appliance_vlans"),
            ResourceKind::Devices => None,
        }
    }

    /// Import mode, `None` for kinds that are never imported
    pub fn import_mode(self) -> Option<ImportMode> {
        match self {
            ResourceKind::Ssids | ResourceKind::WebhookServers | ResourceKind::VlansMx => {
                Some(ImportMode::Keyed)
            }
            ResourceKind::Alerts => Some(ImportMode::Singleton),
            ResourceKind::FirewallRules | ResourceKind::Devices => None,
        }
    }

    /// Value stored when the collection could not be fetched
    pub fn empty(self) -> Value {
        match self {
            ResourceKind::Alerts => Value::Object(Default::default()),
            _ => Value::Array(Vec::new()),
        }
    }

    /// Fetch this collection for one network.
    pub async fn fetch(self, api: &dyn DashboardApi, network_id: &str) -> Result<Value> {
        let value = match self {
            ResourceKind::Ssids => api.get_ssids(network_id).await?,
            ResourceKind::FirewallRules => {
                extract_rules(api.get_firewall_rules(network_id).await?)
            }
            ResourceKind::WebhookServers => api.get_webhook_servers(network_id).await?,
            ResourceKind::Alerts => api.get_alert_settings(network_id).await?,
            ResourceKind::VlansMx => api.get_vlans_mx(network_id).await?,
            ResourceKind::Devices => api.get_devices(network_id).await?,
        };

        Ok(if value.is_null() { self.empty() } else { value })
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.storage_name())
    }
}

/// The L3 rules endpoint wraps the list in `{"rules": [...]}`.
fn extract_rules(value: Value) -> Value {
    match value {
        Value::Object(mut map) => map
            .remove("rules")
            .unwrap_or_else(|| Value::Array(Vec::new())),
        other => other,
    }
}
