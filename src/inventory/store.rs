//! Inventory store
//!
//! Data files live at `<root>/<org>/<network>/<network>_<kind>.yaml`. There
//! is no index: readers re-derive the same path from the same keys through
//! [`data_file`], which is the only place the layout is spelled out.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use log::debug;
use serde_json::Value;

use super::NetworkInventory;
use crate::error::Result;
use crate::resource::ResourceKind;

/// Data file extension
pub const DATA_EXTENSION: &str = "yaml";

/// Directories under the output root that never hold inventory data
const RESERVED_DIRS: [&str; 2] = ["modules", ".terraform"];

/// Path of a data file relative to the output root
pub fn data_file(org_key: &str, network_key: &str, kind: ResourceKind) -> PathBuf {
    PathBuf::from(org_key)
        .join(network_key)
        .join(format!("{}_{}.{}", network_key, kind.storage_name(), DATA_EXTENSION))
}

/// Reads and writes inventory data files under an output root
#[derive(Debug, Clone)]
pub struct InventoryStore {
    root: PathBuf,
}

impl InventoryStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute location of a data file
    pub fn path_for(&self, org_key: &str, network_key: &str, kind: ResourceKind) -> PathBuf {
        self.root.join(data_file(org_key, network_key, kind))
    }

    /// Write one collection, replacing any previous file.
    pub fn write(
        &self,
        org_key: &str,
        network_key: &str,
        kind: ResourceKind,
        records: &Value,
    ) -> Result<PathBuf> {
        let path = self.path_for(org_key, network_key, kind);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = serde_yaml::to_string(records)?;
        std::fs::write(&path, contents)?;

        debug!("Wrote {}", path.display());
        Ok(path)
    }

    /// Write every collection of a network.
    pub fn write_network(&self, org_key: &str, network: &NetworkInventory) -> Result<Vec<PathBuf>> {
        network
            .collections
            .iter()
            .map(|(kind, records)| self.write(org_key, &network.key, *kind, records))
            .collect()
    }

    /// Read one collection; `None` when the file does not exist.
    pub fn read(
        &self,
        org_key: &str,
        network_key: &str,
        kind: ResourceKind,
    ) -> Result<Option<Value>> {
        let path = self.path_for(org_key, network_key, kind);
        if !path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&path)?;
        let value: Value = serde_yaml::from_str(&contents)?;
        Ok(Some(value))
    }

    /// Load a network's collections back from disk.
    pub fn load_network(
        &self,
        org_key: &str,
        network_key: &str,
        network_id: &str,
    ) -> Result<NetworkInventory> {
        let mut collections = BTreeMap::new();
        for kind in ResourceKind::ALL {
            if let Some(value) = self.read(org_key, network_key, kind)? {
                collections.insert(kind, value);
            }
        }

        Ok(NetworkInventory {
            id: network_id.to_string(),
            key: network_key.to_string(),
            name: network_key.to_string(),
            collections,
        })
    }

    /// Find the organization directory holding data for `network_key`.
    ///
    /// Returns `None` unless exactly one candidate exists.
    pub fn discover_org_key(&self, network_key: &str) -> Result<Option<String>> {
        if !self.root.is_dir() {
            return Ok(None);
        }

        let mut candidates = Vec::new();
        for entry in std::fs::read_dir(&self.root)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if RESERVED_DIRS.contains(&name.as_str()) {
                continue;
            }
            if entry.path().join(network_key).is_dir() {
                candidates.push(name);
            }
        }

        Ok(match candidates.len() {
            1 => candidates.pop(),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    fn sample_network() -> NetworkInventory {
        let mut collections = BTreeMap::new();
        collections.insert(ResourceKind::Ssids, json!([{"number": 0, "name": "Corp"}]));
        collections.insert(ResourceKind::Alerts, json!({}));
        collections.insert(ResourceKind::VlansMx, json!([]));
        NetworkInventory {
            id: "N1".to_string(),
            key: "branch_a".to_string(),
            name: "Branch A".to_string(),
            collections,
        }
    }

    #[test]
    fn test_data_file_layout() {
        assert_eq!(
            data_file("acme_hq", "branch_a", ResourceKind::Ssids),
            PathBuf::from("acme_hq/branch_a/branch_a_ssids.yaml")
        );
        assert_eq!(
            data_file("acme_hq", "branch_a_N2", ResourceKind::WebhookServers),
            PathBuf::from("acme_hq/branch_a_N2/branch_a_N2_webhook_servers.yaml")
        );
    }

    #[test]
    fn test_write_creates_directories_and_overwrites() {
        let dir = tempdir().unwrap();
        let store = InventoryStore::new(dir.path());

        let first = store
            .write("acme_hq", "branch_a", ResourceKind::Ssids, &json!([{"number": 0}]))
            .unwrap();
        let second = store
            .write("acme_hq", "branch_a", ResourceKind::Ssids, &json!([]))
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(first, dir.path().join("acme_hq/branch_a/branch_a_ssids.yaml"));
        assert_eq!(
            store.read("acme_hq", "branch_a", ResourceKind::Ssids).unwrap(),
            Some(json!([]))
        );
    }

    #[test]
    fn test_write_path_matches_derived_path_for_every_kind() {
        let dir = tempdir().unwrap();
        let store = InventoryStore::new(dir.path());

        for kind in ResourceKind::ALL {
            let written = store
                .write("acme_hq", "branch_a_N2", kind, &kind.empty())
                .unwrap();
            assert_eq!(written, dir.path().join(data_file("acme_hq", "branch_a_N2", kind)));
            assert!(written.exists());
        }
    }

    #[test]
    fn test_write_network_and_load_back() {
        let dir = tempdir().unwrap();
        let store = InventoryStore::new(dir.path());
        let network = sample_network();

        let paths = store.write_network("acme_hq", &network).unwrap();
        assert_eq!(paths.len(), 3);

        let loaded = store.load_network("acme_hq", "branch_a", "N1").unwrap();
        assert_eq!(loaded.id, "N1");
        assert_eq!(
            loaded.records(ResourceKind::Ssids),
            Some(&json!([{"number": 0, "name": "Corp"}]))
        );
        assert_eq!(loaded.records(ResourceKind::Alerts), Some(&json!({})));
        assert!(loaded.records(ResourceKind::Devices).is_none());
    }

    #[test]
    fn test_read_missing_file_is_none() {
        let dir = tempdir().unwrap();
        let store = InventoryStore::new(dir.path());
        assert!(store.read("x", "y", ResourceKind::Alerts).unwrap().is_none());
    }

    #[test]
    fn test_discover_org_key() {
        let dir = tempdir().unwrap();
        let store = InventoryStore::new(dir.path());
        store
            .write("acme_hq", "branch_a", ResourceKind::Ssids, &json!([]))
            .unwrap();
        std::fs::create_dir_all(dir.path().join("modules/branch_a")).unwrap();

        assert_eq!(
            store.discover_org_key("branch_a").unwrap().as_deref(),
            Some("acme_hq")
        );
        assert_eq!(store.discover_org_key("unknown").unwrap(), None);
    }
}
