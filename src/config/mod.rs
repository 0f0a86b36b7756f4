//! Configuration management for Merakiform

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Result};
use crate::resource::ResourceKind;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Meraki Dashboard API key
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Default organization (name or ID)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub org: Option<String>,

    /// Directory the Terraform project is generated in
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,

    /// Dashboard API base URL override
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_host: Option<String>,

    /// Inventory fetch tuning
    #[serde(default)]
    pub fetch: FetchSettings,

    /// Terraform binary and provider pinning
    #[serde(default)]
    pub terraform: TerraformSettings,

    /// Resource-local identifier field per importable kind
    #[serde(default)]
    pub import_keys: ImportKeys,
}

/// Inventory fetch tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchSettings {
    /// Networks fetched concurrently
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,

    /// Overall fetch deadline; once passed no new sub-resource queries are issued
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline_secs: Option<u64>,
}

fn default_max_concurrent() -> usize {
    4
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            max_concurrent: default_max_concurrent(),
            deadline_secs: None,
        }
    }
}

/// Terraform binary and provider pinning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerraformSettings {
    #[serde(default = "default_binary")]
    pub binary: String,

    #[serde(default = "default_provider_source")]
    pub provider_source: String,

    #[serde(default = "default_provider_version")]
    pub provider_version: String,
}

fn default_binary() -> String {
    "terraform".to_string()
}

fn default_provider_source() -> String {
    "cisco-open/meraki".to_string()
}

fn default_provider_version() -> String {
    "1.1.3-beta".to_string()
}

impl Default for TerraformSettings {
    fn default() -> Self {
        Self {
            binary: default_binary(),
            provider_source: default_provider_source(),
            provider_version: default_provider_version(),
        }
    }
}

/// Field holding the resource-local identifier of each keyed kind.
///
/// The same field feeds the shared module's `for_each` key and the import
/// address, so both always agree on what identifies a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportKeys {
    #[serde(default = "default_ssid_key")]
    pub ssids: String,

    #[serde(default = "default_id_key")]
    pub webhooks: String,

    #[serde(default = "default_id_key")]
    pub vlans_mx: String,
}

fn default_ssid_key() -> String {
    "number".to_string()
}

fn default_id_key() -> String {
    "id".to_string()
}

impl Default for ImportKeys {
    fn default() -> Self {
        Self {
            ssids: default_ssid_key(),
            webhooks: default_id_key(),
            vlans_mx: default_id_key(),
        }
    }
}

impl ImportKeys {
    /// Identifier field for a keyed kind, `None` for kinds without per-record keys
    pub fn field_for(&self, kind: ResourceKind) -> Option<&str> {
        match kind {
            ResourceKind::Ssids => Some(&self.ssids),
            ResourceKind::WebhookServers => Some(&self.webhooks),
            ResourceKind::VlansMx => Some(&self.vlans_mx),
            ResourceKind::FirewallRules | ResourceKind::Alerts | ResourceKind::Devices => None,
        }
    }

    /// Reject fields that are not bare HCL identifiers; they are spliced
    /// into attribute access in the shared modules.
    pub fn validate(&self) -> Result<()> {
        for (kind, field) in [
            ("ssids", &self.ssids),
            ("webhooks", &self.webhooks),
            ("vlans_mx", &self.vlans_mx),
        ] {
            if !is_identifier(field) {
                return Err(ConfigError::Invalid(format!(
                    "import_keys.{kind} must match [A-Za-z_][A-Za-z0-9_]*, got '{field}'"
                ))
                .into());
            }
        }
        Ok(())
    }
}

fn is_identifier(field: &str) -> bool {
    let mut chars = field.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

impl Config {
    /// Get the default config file path
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or(ConfigError::Invalid(
            "Could not determine home directory".to_string(),
        ))?;

        Ok(home.join(".merakiform").join("config.yaml"))
    }

    /// Load configuration from an explicit path, or the default location.
    ///
    /// A missing file at the default location yields defaults; a missing file
    /// at an explicit path is an error.
    pub fn load_at(path: Option<&str>) -> Result<Self> {
        match path {
            Some(p) => Self::load_from(Path::new(p)),
            None => {
                let path = Self::default_path()?;
                if path.exists() {
                    Self::load_from(&path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()).into());
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents).map_err(ConfigError::from)?;
        config.import_keys.validate()?;

        Ok(config)
    }

    /// Save configuration to an explicit path, or the default location
    pub fn save_at(&self, path: Option<&str>) -> Result<PathBuf> {
        let path = match path {
            Some(p) => PathBuf::from(p),
            None => Self::default_path()?,
        };
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents =
            serde_yaml::to_string(self).map_err(|e| ConfigError::SaveError(e.to_string()))?;

        std::fs::write(path, contents)?;
        restrict_permissions(path)?;

        Ok(())
    }

    /// Validate that a credential is present
    pub fn validate_auth(&self) -> Result<()> {
        if self.api_key.as_deref().is_none_or(str::is_empty) {
            return Err(ConfigError::MissingApiKey.into());
        }
        Ok(())
    }

    /// Get the organization, returning an error if not set
    pub fn require_org(&self) -> Result<&str> {
        self.org
            .as_deref()
            .ok_or_else(|| ConfigError::MissingOrg.into())
    }

    /// Output directory, defaulting to `./meraki_tf_project`
    pub fn output_dir(&self) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("meraki_tf_project"))
    }
}

/// Set file permissions to 600 on Unix systems
pub fn restrict_permissions(path: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = std::fs::metadata(path)?.permissions();
        perms.set_mode(0o600);
        std::fs::set_permissions(path, perms)?;
    }
    #[cfg(not(unix))]
    let _ = path;

    Ok(())
}
