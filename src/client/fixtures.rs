//! Test fixtures and builders for dashboard data
//!
//! Provides builder patterns for creating test data with sensible defaults.
//! Import via `use crate::client::fixtures::*` in test modules.

#![allow(dead_code)]

use serde_json::{Value, json};

use super::{Network, Organization};

// ============================================================================
// OrganizationBuilder
// ============================================================================

/// Builder for creating test Organization instances.
#[derive(Debug, Clone)]
pub struct OrganizationBuilder {
    id: String,
    name: String,
}

impl OrganizationBuilder {
    /// Create a new builder with the given ID.
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: format!("Organization {}", &id),
            id,
        }
    }

    /// Set the organization name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Build the Organization.
    pub fn build(self) -> Organization {
        Organization {
            id: self.id,
            name: self.name,
            url: None,
        }
    }
}

// ============================================================================
// NetworkBuilder
// ============================================================================

/// Builder for creating test Network instances.
///
/// # Example
/// ```ignore
/// let net = NetworkBuilder::new("N1")
///     .name("Branch A")
///     .product_types(&["appliance", "wireless"])
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct NetworkBuilder {
    id: Option<String>,
    name: String,
    product_types: Vec<String>,
}

impl NetworkBuilder {
    /// Create a new builder with the given ID.
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: format!("Network {}", &id),
            id: Some(id),
            product_types: vec!["appliance".to_string(), "wireless".to_string()],
        }
    }

    /// Set the display name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Drop the identifier, simulating a malformed record.
    pub fn without_id(mut self) -> Self {
        self.id = None;
        self
    }

    /// Set the product types.
    pub fn product_types(mut self, types: &[&str]) -> Self {
        self.product_types = types.iter().map(|t| t.to_string()).collect();
        self
    }

    /// Build the Network.
    pub fn build(self) -> Network {
        Network {
            id: self.id,
            name: self.name,
            organization_id: None,
            product_types: self.product_types,
            time_zone: None,
            tags: Vec::new(),
        }
    }
}

// ============================================================================
// Record helpers
// ============================================================================

/// An SSID record in the dashboard's shape.
pub fn ssid(number: u32, name: &str) -> Value {
    json!({
        "number": number,
        "name": name,
        "enabled": true,
        "authMode": "psk",
        "encryptionMode": "wpa",
    })
}

/// A webhook HTTP server record.
pub fn webhook(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "url": format!("https://hooks.example.com/{id}"),
        "payloadTemplate": {"payloadTemplateId": "wpt_00001", "name": "Meraki (included)"},
    })
}

/// An MX VLAN record.
pub fn vlan(id: u32, subnet: &str) -> Value {
    json!({
        "id": id,
        "name": format!("VLAN {id}"),
        "subnet": subnet,
        "applianceIp": subnet.replace(".0/24", ".1"),
    })
}

/// Alert settings in the dashboard's shape.
pub fn alert_settings() -> Value {
    json!({
        "defaultDestinations": {"emails": ["noc@example.com"], "allAdmins": false},
        "alerts": [{"type": "gatewayDown", "enabled": true}],
    })
}
