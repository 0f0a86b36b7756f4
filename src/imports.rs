//! Import directives and per-network import scripts
//!
//! Kinds are visited in [`ResourceKind::IMPORT_ORDER`]. Keyed kinds yield one
//! directive per record carrying its identifier field; records without one
//! are skipped and counted. Alert settings yield a single directive when the
//! network has them.

use std::fmt;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde_json::Value;

use crate::config::ImportKeys;
use crate::error::{ConfigError, Result};
use crate::inventory::NetworkInventory;
use crate::resource::{ImportMode, ResourceKind};
use crate::scaffold::address::resource_address;
use crate::scaffold::render::{TFVARS_FILE, parse_hcl_string};
use crate::scaffold::{FileMode, GeneratedFile, NETWORK_MAP_VAR};

/// Binds a live resource to a state address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportDirective {
    pub address: String,
    pub network_id: String,
    /// Resource-local identifier; `None` for singletons
    pub local_id: Option<String>,
}

impl ImportDirective {
    /// Provider import id: `<network_id>[,<local_id>]`
    pub fn external_id(&self) -> String {
        match &self.local_id {
            Some(local) => format!("{},{}", self.network_id, local),
            None => self.network_id.clone(),
        }
    }
}

impl fmt::Display for ImportDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <- {}", self.address, self.external_id())
    }
}

/// Directives for one network
#[derive(Debug, Clone, Default)]
pub struct NetworkImports {
    pub network_key: String,
    pub network_id: String,
    /// Display name, shown in the script header
    pub network_name: String,
    pub directives: Vec<ImportDirective>,
    /// Records dropped for lacking their identifier field
    pub skipped: usize,
}

/// Identifier of a record as an import key.
///
/// Strings and numbers qualify; anything else, including an empty string,
/// does not.
fn local_id(record: &Value, field: &str) -> Option<String> {
    match record.get(field)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Derive the import directives of one network.
pub fn directives_for(network: &NetworkInventory, keys: &ImportKeys) -> NetworkImports {
    let mut imports = NetworkImports {
        network_key: network.key.clone(),
        network_id: network.id.clone(),
        network_name: network.name.clone(),
        ..Default::default()
    };

    for kind in ResourceKind::IMPORT_ORDER {
        let (Some(service), Some(resource_type), Some(mode)) =
            (kind.service_name(), kind.resource_type(), kind.import_mode())
        else {
            continue;
        };
        let address = |key: Option<&str>| resource_address(&network.key, service, resource_type, key);

        match mode {
            ImportMode::Singleton => {
                // The shared module always declares `.this`, so a network whose
                // settings came back empty (or degraded) gets no directive and
                // `terraform plan` proposes a create over the live settings.
                let present = network
                    .records(kind)
                    .and_then(Value::as_object)
                    .is_some_and(|settings| !settings.is_empty());
                if present {
                    imports.directives.push(ImportDirective {
                        address: address(None),
                        network_id: network.id.clone(),
                        local_id: None,
                    });
                }
            }
            ImportMode::Keyed => {
                let Some(field) = keys.field_for(kind) else {
                    continue;
                };
                let records = network
                    .records(kind)
                    .and_then(Value::as_array)
                    .map(Vec::as_slice)
                    .unwrap_or_default();

                for record in records {
                    match local_id(record, field) {
                        Some(id) => imports.directives.push(ImportDirective {
                            address: address(Some(&id)),
                            network_id: network.id.clone(),
                            local_id: Some(id),
                        }),
                        None => {
                            warn!(
                                "Skipping {} record without '{}' in network {} ({})",
                                kind, field, network.key, network.id
                            );
                            imports.skipped += 1;
                        }
                    }
                }
            }
        }
    }

    debug!(
        "{} import directives for {}",
        imports.directives.len(),
        network.key
    );
    imports
}

/// Quote a shell word unless it is plainly safe.
fn shell_word(word: &str) -> String {
    let safe = !word.is_empty()
        && word
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "_-.,:/@=+".contains(c));
    if safe {
        word.to_string()
    } else {
        format!("'{}'", word.replace('\'', r"'\''"))
    }
}

/// Script file name for a network
pub fn script_name(network_key: &str) -> String {
    format!("import_{network_key}.sh")
}

/// Render a network's import script.
pub fn render_script(imports: &NetworkImports, terraform_binary: &str) -> String {
    let binary = shell_word(terraform_binary);
    let mut out = format!(
        "#!/usr/bin/env bash\n# Import script for network: {} ({})\nset -euo pipefail\n\n{} workspace select {}\n\n",
        imports.network_name.replace(['\r', '\n'], " "),
        imports.network_id,
        binary,
        shell_word(&imports.network_key)
    );

    for directive in &imports.directives {
        out.push_str(&format!(
            "{} import '{}' {}\n",
            binary,
            directive.address.replace('\'', r"'\''"),
            shell_word(&directive.external_id())
        ));
    }
    out
}

/// Executable import script for a network, placed at the output root
pub fn script_file(imports: &NetworkImports, terraform_binary: &str) -> GeneratedFile {
    GeneratedFile {
        path: PathBuf::from(script_name(&imports.network_key)),
        contents: render_script(imports, terraform_binary),
        mode: FileMode::Executable,
    }
}

/// Read the `network_id_map` block of a `terraform.tfvars` file.
pub fn parse_network_map(contents: &str) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    let mut in_map = false;

    for line in contents.lines() {
        let line = line.trim();
        if !in_map {
            if let Some(rest) = line.strip_prefix(NETWORK_MAP_VAR) {
                in_map = rest.trim_start().starts_with('=') && line.ends_with('{');
            }
            continue;
        }
        if line.starts_with('}') {
            break;
        }

        let Some((key, id)) = line.split_once('=') else {
            continue;
        };
        if let (Some(key), Some(id)) = (parse_hcl_string(key.trim()), parse_hcl_string(id.trim())) {
            pairs.push((key, id));
        }
    }

    pairs
}

/// Load the network map from the root `terraform.tfvars` of an output directory.
pub fn load_network_map(root: &Path) -> Result<Vec<(String, String)>> {
    let path = root.join(TFVARS_FILE);
    if !path.exists() {
        return Err(ConfigError::NotFound(path.display().to_string()).into());
    }

    let contents = std::fs::read_to_string(&path)?;
    let pairs = parse_network_map(&contents);
    if pairs.is_empty() {
        return Err(ConfigError::Invalid(format!(
            "No {} entries in {}",
            NETWORK_MAP_VAR,
            path.display()
        ))
        .into());
    }
    Ok(pairs)
}
