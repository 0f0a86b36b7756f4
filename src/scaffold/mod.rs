//! Terraform module scaffold
//!
//! [`plan`] turns the run's `(network key, network id)` pairs into three
//! layers of module descriptors:
//!
//! - a root module holding the credential and the network id map
//! - one shared module per service kind, parameterized only by variables
//! - one module per network instantiating every shared module
//!
//! The plan depends on network membership only. A network with no records for
//! a kind still instantiates that kind's shared module.

use std::path::{Path, PathBuf};

use log::debug;

use crate::inventory::store::data_file;
use crate::resource::ResourceKind;

pub mod address;
pub mod render;
pub mod templates;

pub use render::{FileMode, GeneratedFile, write_files};

/// Directory holding per-network modules, relative to the output root
pub const MODULES_DIR: &str = "modules";

/// Name of the directory holding shared modules under [`MODULES_DIR`]
pub const SHARED_MODULES: &str = "shared_modules";

/// Keys a network may not take because they name scaffold directories
pub const RESERVED_MODULE_NAMES: &[&str] = &[SHARED_MODULES];

pub const API_KEY_VAR: &str = "meraki_api_key";
pub const NETWORK_MAP_VAR: &str = "network_id_map";
pub const NETWORK_ID_VAR: &str = "network_id";
pub const DATA_FILE_VAR: &str = "yaml_file";

/// Layer a module belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleKind {
    Root,
    SharedService(ResourceKind),
    PerNetwork,
}

/// Right-hand side of a module argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Binding {
    /// `var.<name>`
    Variable(String),
    /// `var.<map>["<key>"]`
    MapLookup { map: String, key: String },
    /// Data file relative to the root module directory
    FilePath(PathBuf),
}

/// A `variable` block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariableDecl {
    pub name: &'static str,
    pub type_expr: &'static str,
    pub description: &'static str,
    pub sensitive: bool,
}

const API_KEY_DECL: VariableDecl = VariableDecl {
    name: API_KEY_VAR,
    type_expr: "string",
    description: "Meraki Dashboard API key",
    sensitive: true,
};

const NETWORK_MAP_DECL: VariableDecl = VariableDecl {
    name: NETWORK_MAP_VAR,
    type_expr: "map(string)",
    description: "Network ID for each network module",
    sensitive: false,
};

const NETWORK_ID_DECL: VariableDecl = VariableDecl {
    name: NETWORK_ID_VAR,
    type_expr: "string",
    description: "Meraki network ID",
    sensitive: false,
};

const DATA_FILE_DECL: VariableDecl = VariableDecl {
    name: DATA_FILE_VAR,
    type_expr: "string",
    description: "Path to the YAML data file for this network",
    sensitive: false,
};

/// A `module` block inside a module
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleCall {
    pub name: String,
    pub source: String,
    pub arguments: Vec<(&'static str, Binding)>,
}

impl ModuleCall {
    /// Bound value of an argument
    #[cfg(test)]
    pub fn argument(&self, name: &str) -> Option<&Binding> {
        self.arguments
            .iter()
            .find(|(arg, _)| *arg == name)
            .map(|(_, binding)| binding)
    }
}

/// One generated Terraform module
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleDescriptor {
    pub name: String,
    pub kind: ModuleKind,
    /// Directory relative to the output root; empty for the root module
    pub dir: PathBuf,
    pub variables: Vec<VariableDecl>,
    pub calls: Vec<ModuleCall>,
}

impl ModuleDescriptor {
    #[cfg(test)]
    pub fn call(&self, name: &str) -> Option<&ModuleCall> {
        self.calls.iter().find(|c| c.name == name)
    }
}

/// The full module tree for one organization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scaffold {
    pub org_key: String,
    pub root: ModuleDescriptor,
    pub shared: Vec<ModuleDescriptor>,
    pub networks: Vec<ModuleDescriptor>,
    /// `(network key, network id)` in listing order
    pub network_id_map: Vec<(String, String)>,
}

#[cfg(test)]
impl Scaffold {
    pub fn network(&self, key: &str) -> Option<&ModuleDescriptor> {
        self.networks.iter().find(|m| m.name == key)
    }

    /// Module path of a service instantiation inside a network module,
    /// as declared by the plan.
    pub fn service_module_path(&self, network_key: &str, kind: ResourceKind) -> Option<String> {
        let root_call = self.root.call(network_key)?;
        let network = self.network(network_key)?;
        let service_call = network.call(kind.service_name()?)?;
        Some(address::module_address(&[&root_call.name, &service_call.name]))
    }
}

fn shared_dir(service: &str) -> PathBuf {
    Path::new(MODULES_DIR).join(SHARED_MODULES).join(service)
}

fn network_dir(network_key: &str) -> PathBuf {
    Path::new(MODULES_DIR).join(network_key)
}

/// Derive the module tree for an organization's networks.
pub fn plan(org_key: &str, network_ids: &[(String, String)]) -> Scaffold {
    let services: Vec<(ResourceKind, &'static str)> = ResourceKind::SERVICES
        .iter()
        .filter_map(|kind| kind.service_name().map(|svc| (*kind, svc)))
        .collect();

    let shared = services
        .iter()
        .map(|(kind, service)| ModuleDescriptor {
            name: service.to_string(),
            kind: ModuleKind::SharedService(*kind),
            dir: shared_dir(service),
            variables: vec![NETWORK_ID_DECL, DATA_FILE_DECL, API_KEY_DECL],
            calls: Vec::new(),
        })
        .collect();

    let networks = network_ids
        .iter()
        .map(|(key, _)| ModuleDescriptor {
            name: key.clone(),
            kind: ModuleKind::PerNetwork,
            dir: network_dir(key),
            variables: vec![NETWORK_ID_DECL, API_KEY_DECL],
            calls: services
                .iter()
                .map(|(kind, service)| ModuleCall {
                    name: service.to_string(),
                    source: format!("../{SHARED_MODULES}/{service}"),
                    arguments: vec![
                        (NETWORK_ID_VAR, Binding::Variable(NETWORK_ID_VAR.to_string())),
                        (DATA_FILE_VAR, Binding::FilePath(data_file(org_key, key, *kind))),
                        (API_KEY_VAR, Binding::Variable(API_KEY_VAR.to_string())),
                    ],
                })
                .collect(),
        })
        .collect();

    let root = ModuleDescriptor {
        name: "root".to_string(),
        kind: ModuleKind::Root,
        dir: PathBuf::new(),
        variables: vec![API_KEY_DECL, NETWORK_MAP_DECL],
        calls: network_ids
            .iter()
            .map(|(key, _)| ModuleCall {
                name: key.clone(),
                source: format!("./{MODULES_DIR}/{key}"),
                arguments: vec![
                    (
                        NETWORK_ID_VAR,
                        Binding::MapLookup {
                            map: NETWORK_MAP_VAR.to_string(),
                            key: key.clone(),
                        },
                    ),
                    (API_KEY_VAR, Binding::Variable(API_KEY_VAR.to_string())),
                ],
            })
            .collect(),
    };

    debug!(
        "Planned scaffold for {}: {} networks, {} shared modules",
        org_key,
        network_ids.len(),
        services.len()
    );

    Scaffold {
        org_key: org_key.to_string(),
        root,
        shared,
        networks,
        network_id_map: network_ids.to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::naming::NameRegistry;
    use crate::resource::ImportMode;

    fn acme_pairs() -> Vec<(String, String)> {
        let mut registry = NameRegistry::with_reserved(RESERVED_MODULE_NAMES);
        [("N1", "Branch A"), ("N2", "Branch A")]
            .iter()
            .map(|(id, name)| (registry.assign(id, name), id.to_string()))
            .collect()
    }

    #[test]
    fn test_duplicate_names_yield_distinct_network_modules() {
        let scaffold = plan("acme_hq", &acme_pairs());

        let names: Vec<_> = scaffold.networks.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["branch_a", "branch_a_N2"]);
        assert_eq!(
            scaffold.network_id_map,
            vec![
                ("branch_a".to_string(), "N1".to_string()),
                ("branch_a_N2".to_string(), "N2".to_string()),
            ]
        );

        let call = scaffold.root.call("branch_a_N2").unwrap();
        assert_eq!(call.source, "./modules/branch_a_N2");
        assert_eq!(
            call.argument(NETWORK_ID_VAR),
            Some(&Binding::MapLookup {
                map: NETWORK_MAP_VAR.to_string(),
                key: "branch_a_N2".to_string(),
            })
        );
    }

    #[test]
    fn test_root_declares_credential_and_map() {
        let scaffold = plan("acme_hq", &acme_pairs());
        let vars: Vec<_> = scaffold.root.variables.iter().map(|v| v.name).collect();
        assert_eq!(vars, vec![API_KEY_VAR, NETWORK_MAP_VAR]);
        assert!(scaffold.root.variables[0].sensitive);
    }

    #[test]
    fn test_one_shared_module_per_service() {
        let scaffold = plan("acme_hq", &acme_pairs());
        let names: Vec<_> = scaffold.shared.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["ssids", "firewall", "webhooks", "alerts", "vlans_mx"]);

        for module in &scaffold.shared {
            assert!(module.calls.is_empty());
            assert!(module.dir.starts_with("modules/shared_modules"));
            let vars: Vec<_> = module.variables.iter().map(|v| v.name).collect();
            assert_eq!(vars, vec![NETWORK_ID_VAR, DATA_FILE_VAR, API_KEY_VAR]);
        }
    }

    #[test]
    fn test_every_network_instantiates_every_service() {
        // Data content never shapes the plan, so a network with no SSIDs
        // still gets the SSID instantiation.
        let pairs = vec![("empty_site".to_string(), "N9".to_string())];
        let scaffold = plan("acme_hq", &pairs);
        let network = scaffold.network("empty_site").unwrap();

        assert_eq!(network.calls.len(), ResourceKind::SERVICES.len());
        let ssids = network.call("ssids").unwrap();
        assert_eq!(ssids.source, "../shared_modules/ssids");
        assert_eq!(
            ssids.argument(NETWORK_ID_VAR),
            Some(&Binding::Variable(NETWORK_ID_VAR.to_string()))
        );
    }

    #[test]
    fn test_data_paths_match_store_layout() {
        let scaffold = plan("acme_hq", &acme_pairs());

        for network in &scaffold.networks {
            for kind in ResourceKind::SERVICES {
                let call = network.call(kind.service_name().unwrap()).unwrap();
                assert_eq!(
                    call.argument(DATA_FILE_VAR),
                    Some(&Binding::FilePath(data_file("acme_hq", &network.name, kind)))
                );
            }
        }
    }

    #[test]
    fn test_import_addresses_target_planned_modules() {
        let scaffold = plan("acme_hq", &acme_pairs());

        for (key, _) in &scaffold.network_id_map {
            for kind in ResourceKind::IMPORT_ORDER {
                let module_path = scaffold.service_module_path(key, kind).unwrap();
                let local = match kind.import_mode() {
                    Some(ImportMode::Keyed) => Some("0"),
                    _ => None,
                };
                let target = address::resource_address(
                    key,
                    kind.service_name().unwrap(),
                    kind.resource_type().unwrap(),
                    local,
                );
                assert!(
                    target.starts_with(&format!("{module_path}.")),
                    "{target} not under {module_path}"
                );
            }
        }
    }

    #[test]
    fn test_empty_network_set() {
        let scaffold = plan("acme_hq", &[]);
        assert!(scaffold.networks.is_empty());
        assert!(scaffold.root.calls.is_empty());
        assert_eq!(scaffold.shared.len(), ResourceKind::SERVICES.len());
    }
}
