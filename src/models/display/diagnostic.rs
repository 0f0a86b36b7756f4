//! Degraded fetch display model

use serde::Serialize;
use tabled::Tabled;

use crate::inventory::Diagnostic;

/// One degraded sub-resource fetch
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct DiagnosticDisplay {
    #[tabled(rename = "NETWORK")]
    pub network: String,

    #[tabled(rename = "NETWORK ID")]
    pub network_id: String,

    #[tabled(rename = "RESOURCE")]
    pub resource: String,

    #[tabled(rename = "CAUSE")]
    pub cause: String,
}

impl From<&Diagnostic> for DiagnosticDisplay {
    fn from(diag: &Diagnostic) -> Self {
        Self {
            network: diag.network_key.clone(),
            network_id: diag.network_id.clone(),
            resource: diag.kind.storage_name().to_string(),
            cause: diag.cause.to_string(),
        }
    }
}
