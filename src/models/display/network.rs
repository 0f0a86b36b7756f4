//! Network display model

use serde::Serialize;
use tabled::Tabled;

use crate::client::Network;

/// Network display model for table/JSON output.
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct NetworkDisplay {
    /// Resolved network key (module and workspace name)
    #[tabled(rename = "KEY")]
    pub key: String,

    /// Network ID
    #[tabled(rename = "NETWORK ID")]
    pub id: String,

    /// Display name
    #[tabled(rename = "NAME")]
    pub name: String,

    /// Enabled product types
    #[tabled(rename = "PRODUCTS")]
    pub products: String,
}

impl NetworkDisplay {
    pub fn new(key: impl Into<String>, id: impl Into<String>, network: &Network) -> Self {
        Self {
            key: key.into(),
            id: id.into(),
            name: network.name.clone(),
            products: network.product_types.join(", "),
        }
    }
}
