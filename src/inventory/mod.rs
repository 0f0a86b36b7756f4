//! Per-network inventory snapshots
//!
//! A run fetches every network's sub-resources ([`fetcher`]) and persists
//! them under a deterministic layout ([`store`]). Failures below the network
//! level degrade to empty collections and are reported as [`Diagnostic`]s.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;

use crate::client::Organization;
use crate::resource::ResourceKind;

pub mod fetcher;
pub mod store;

pub use fetcher::Fetcher;
pub use store::InventoryStore;

/// Result of one sub-resource query
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// Records were returned
    Fetched(Value),
    /// The query succeeded with nothing in it
    Empty,
    /// The query failed; the collection is treated as empty
    Failed(String),
    /// The run deadline passed before the query was issued
    DeadlineExceeded,
}

impl FetchOutcome {
    /// Classify a successful payload
    pub fn from_value(value: Value) -> Self {
        let empty = match &value {
            Value::Null => true,
            Value::Array(items) => items.is_empty(),
            Value::Object(map) => map.is_empty(),
            _ => false,
        };
        if empty {
            FetchOutcome::Empty
        } else {
            FetchOutcome::Fetched(value)
        }
    }

    /// Collection to persist for this outcome
    pub fn into_records(self, kind: ResourceKind) -> Value {
        match self {
            FetchOutcome::Fetched(value) => value,
            _ => kind.empty(),
        }
    }

    /// Whether this outcome counts as degraded
    pub fn is_degraded(&self) -> bool {
        matches!(
            self,
            FetchOutcome::Failed(_) | FetchOutcome::DeadlineExceeded
        )
    }
}

/// Why a collection was degraded
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DegradedCause {
    Failed(String),
    DeadlineExceeded,
}

impl fmt::Display for DegradedCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DegradedCause::Failed(msg) => f.write_str(msg),
            DegradedCause::DeadlineExceeded => f.write_str("fetch deadline exceeded"),
        }
    }
}

/// A degraded sub-resource fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub network_id: String,
    pub network_key: String,
    pub kind: ResourceKind,
    pub cause: DegradedCause,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} for network {} ({}): {}",
            self.kind, self.network_key, self.network_id, self.cause
        )
    }
}

/// One network's collections, keyed by kind
#[derive(Debug, Clone)]
pub struct NetworkInventory {
    pub id: String,
    pub key: String,
    pub name: String,
    pub collections: BTreeMap<ResourceKind, Value>,
}

impl NetworkInventory {
    /// Collection for a kind, if one was gathered
    pub fn records(&self, kind: ResourceKind) -> Option<&Value> {
        self.collections.get(&kind)
    }
}

/// Everything gathered for one organization in one run
#[derive(Debug, Clone)]
pub struct Inventory {
    pub org: Organization,
    pub org_key: String,
    pub networks: Vec<NetworkInventory>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Inventory {
    /// `(network key, network id)` pairs in fetch order
    pub fn network_ids(&self) -> Vec<(String, String)> {
        self.networks
            .iter()
            .map(|n| (n.key.clone(), n.id.clone()))
            .collect()
    }
}
