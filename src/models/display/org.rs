//! Organization display model

use serde::Serialize;
use tabled::Tabled;

use crate::client::Organization;

/// Organization display model for table/JSON output.
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct OrgDisplay {
    /// Organization ID
    #[tabled(rename = "ORG ID")]
    pub id: String,

    /// Organization name
    #[tabled(rename = "NAME")]
    pub name: String,

    /// Directory key the organization's data is stored under
    #[tabled(rename = "KEY")]
    pub key: String,
}

impl From<Organization> for OrgDisplay {
    fn from(org: Organization) -> Self {
        Self {
            key: crate::naming::sanitize(&org.name),
            id: org.id,
            name: org.name,
        }
    }
}
