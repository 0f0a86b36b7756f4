//! HCL rendering and file output for a [`Scaffold`]

use std::fmt::Write as _;
use std::path::{Component, Path, PathBuf};

use log::debug;

use super::templates::{provider_block, required_providers, service_body};
use super::{
    API_KEY_VAR, Binding, ModuleCall, ModuleDescriptor, ModuleKind, NETWORK_MAP_VAR, Scaffold,
    VariableDecl,
};
use crate::config::{ImportKeys, TerraformSettings, restrict_permissions};
use crate::error::Result;

/// Root variable-values file
pub const TFVARS_FILE: &str = "terraform.tfvars";

/// Permissions applied to a generated file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileMode {
    Default,
    /// Owner read/write only
    Private,
    Executable,
}

/// A file ready to be written under the output root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    /// Path relative to the output root
    pub path: PathBuf,
    pub contents: String,
    pub mode: FileMode,
}

impl GeneratedFile {
    fn new(path: impl Into<PathBuf>, contents: String) -> Self {
        Self {
            path: path.into(),
            contents,
            mode: FileMode::Default,
        }
    }
}

/// Quote a string as an HCL literal.
pub fn hcl_string(value: &str) -> String {
    let escaped = value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace("${", "$${")
        .replace("%{", "%%{");
    format!("\"{escaped}\"")
}

/// Reverse of [`hcl_string`] for a quoted literal; `None` if not quoted.
pub fn parse_hcl_string(literal: &str) -> Option<String> {
    let inner = literal.strip_prefix('"')?.strip_suffix('"')?;
    Some(
        inner
            .replace("$${", "${")
            .replace("%%{", "%{")
            .replace("\\\"", "\"")
            .replace("\\\\", "\\"),
    )
}

/// Forward-slash form of a relative path, independent of the host separator
fn slash_path(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

fn render_binding(binding: &Binding) -> String {
    match binding {
        Binding::Variable(name) => format!("var.{name}"),
        Binding::MapLookup { map, key } => format!("var.{map}[{}]", hcl_string(key)),
        Binding::FilePath(rel) => format!("\"${{path.root}}/{}\"", slash_path(rel)),
    }
}

fn render_call(call: &ModuleCall) -> String {
    let width = call
        .arguments
        .iter()
        .map(|(name, _)| name.len())
        .chain(std::iter::once("source".len()))
        .max()
        .unwrap_or(0);

    let mut out = format!("module \"{}\" {{\n", call.name);
    let _ = writeln!(out, "  {:width$} = {}", "source", hcl_string(&call.source));
    for (name, binding) in &call.arguments {
        let _ = writeln!(out, "  {:width$} = {}", name, render_binding(binding));
    }
    out.push_str("}\n");
    out
}

fn render_variable(var: &VariableDecl) -> String {
    let mut out = format!("variable \"{}\" {{\n", var.name);
    let _ = writeln!(out, "  description = {}", hcl_string(var.description));
    let _ = writeln!(out, "  type        = {}", var.type_expr);
    if var.sensitive {
        out.push_str("  sensitive   = true\n");
    }
    out.push_str("}\n");
    out
}

/// `variables.tf` for a module
pub fn render_variables(module: &ModuleDescriptor) -> String {
    module
        .variables
        .iter()
        .map(render_variable)
        .collect::<Vec<_>>()
        .join("\n")
}

/// `main.tf` for a module.
///
/// Child modules carry only `required_providers`; provider configuration
/// stays in the root.
pub fn render_main(
    module: &ModuleDescriptor,
    terraform: &TerraformSettings,
    import_keys: &ImportKeys,
) -> String {
    let calls = module
        .calls
        .iter()
        .map(render_call)
        .collect::<Vec<_>>()
        .join("\n");

    match module.kind {
        ModuleKind::Root => calls,
        ModuleKind::PerNetwork => format!(
            "{}\n{}",
            required_providers(&terraform.provider_source, &terraform.provider_version),
            calls
        ),
        ModuleKind::SharedService(kind) => format!(
            "{}\n{}",
            required_providers(&terraform.provider_source, &terraform.provider_version),
            service_body(kind, import_keys.field_for(kind)).unwrap_or_default()
        ),
    }
}

/// Root `provider.tf`
pub fn render_provider(terraform: &TerraformSettings) -> String {
    format!(
        "{}\n{}",
        required_providers(&terraform.provider_source, &terraform.provider_version),
        provider_block()
    )
}

/// Root `terraform.tfvars` with the network map and, when known, the credential
pub fn render_tfvars(network_id_map: &[(String, String)], api_key: Option<&str>) -> String {
    let mut out = String::new();
    if let Some(key) = api_key {
        let _ = writeln!(out, "{API_KEY_VAR} = {}\n", hcl_string(key));
    }

    let _ = writeln!(out, "{NETWORK_MAP_VAR} = {{");
    for (key, id) in network_id_map {
        let _ = writeln!(out, "  {} = {}", hcl_string(key), hcl_string(id));
    }
    out.push_str("}\n");
    out
}

impl Scaffold {
    /// Every file of the project, in a stable order.
    pub fn render(
        &self,
        terraform: &TerraformSettings,
        import_keys: &ImportKeys,
        api_key: Option<&str>,
    ) -> Vec<GeneratedFile> {
        let mut files = vec![
            GeneratedFile::new("main.tf", render_main(&self.root, terraform, import_keys)),
            GeneratedFile::new("variables.tf", render_variables(&self.root)),
            GeneratedFile::new("provider.tf", render_provider(terraform)),
            GeneratedFile {
                path: PathBuf::from(TFVARS_FILE),
                contents: render_tfvars(&self.network_id_map, api_key),
                mode: FileMode::Private,
            },
        ];

        for module in self.shared.iter().chain(&self.networks) {
            files.push(GeneratedFile::new(
                module.dir.join("main.tf"),
                render_main(module, terraform, import_keys),
            ));
            files.push(GeneratedFile::new(
                module.dir.join("variables.tf"),
                render_variables(module),
            ));
        }

        files
    }
}

/// Write generated files under `root`, replacing existing ones.
pub fn write_files(root: &Path, files: &[GeneratedFile]) -> Result<Vec<PathBuf>> {
    files
        .iter()
        .map(|file| {
            let path = root.join(&file.path);
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, &file.contents)?;

            match file.mode {
                FileMode::Default => {}
                FileMode::Private => restrict_permissions(&path)?,
                FileMode::Executable => make_executable(&path)?,
            }

            debug!("Wrote {}", path.display());
            Ok(path)
        })
        .collect()
}

/// Set file permissions to 755 on Unix systems
fn make_executable(path: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = std::fs::metadata(path)?.permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(path, perms)?;
    }
    #[cfg(not(unix))]
    let _ = path;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scaffold::plan;
    use tempfile::tempdir;

    fn pairs() -> Vec<(String, String)> {
        vec![
            ("branch_a".to_string(), "N1".to_string()),
            ("branch_a_N2".to_string(), "N2".to_string()),
        ]
    }

    fn rendered() -> Vec<GeneratedFile> {
        plan("acme_hq", &pairs()).render(
            &TerraformSettings::default(),
            &ImportKeys::default(),
            Some("secret"),
        )
    }

    fn contents<'a>(files: &'a [GeneratedFile], path: &str) -> &'a str {
        &files
            .iter()
            .find(|f| f.path == Path::new(path))
            .unwrap_or_else(|| panic!("{path} not generated"))
            .contents
    }

    #[test]
    fn test_hcl_string_escapes() {
        assert_eq!(hcl_string("plain"), "\"plain\"");
        assert_eq!(hcl_string("a\"b"), "\"a\\\"b\"");
        assert_eq!(hcl_string("${x}"), "\"$${x}\"");
        for value in ["plain", "a\"b\\c", "${x} %{y}"] {
            assert_eq!(parse_hcl_string(&hcl_string(value)).as_deref(), Some(value));
        }
        assert_eq!(parse_hcl_string("bare"), None);
    }

    #[test]
    fn test_project_layout() {
        let files = rendered();
        let paths: Vec<_> = files.iter().map(|f| slash_path(&f.path)).collect();

        for expected in [
            "main.tf",
            "variables.tf",
            "provider.tf",
            "terraform.tfvars",
            "modules/shared_modules/ssids/main.tf",
            "modules/shared_modules/vlans_mx/variables.tf",
            "modules/branch_a/main.tf",
            "modules/branch_a_N2/variables.tf",
        ] {
            assert!(paths.iter().any(|p| p == expected), "missing {expected}");
        }
        // 4 root files plus main/variables for 5 shared and 2 network modules
        assert_eq!(files.len(), 4 + 2 * (5 + 2));
    }

    #[test]
    fn test_root_main_wires_network_modules() {
        let files = rendered();
        let main = contents(&files, "main.tf");

        assert!(main.contains("module \"branch_a_N2\" {"));
        assert!(main.contains("source         = \"./modules/branch_a_N2\""));
        assert!(main.contains("network_id     = var.network_id_map[\"branch_a_N2\"]"));
        assert!(main.contains("meraki_api_key = var.meraki_api_key"));
        assert!(!main.contains("provider \"meraki\""));
    }

    #[test]
    fn test_network_module_passes_data_paths() {
        let files = rendered();
        let main = contents(&files, "modules/branch_a/main.tf");

        assert!(main.contains("required_providers"));
        assert!(!main.contains("provider \"meraki\""));
        assert!(main.contains("source         = \"../shared_modules/ssids\""));
        assert!(
            main.contains("yaml_file      = \"${path.root}/acme_hq/branch_a/branch_a_ssids.yaml\"")
        );
        assert!(main.contains("module \"vlans_mx\""));
    }

    #[test]
    fn test_shared_module_has_no_network_literals() {
        let files = rendered();
        let main = contents(&files, "modules/shared_modules/ssids/main.tf");
        assert!(main.contains("resource \"meraki_networks_wireless_ssids\" \"this\""));
        assert!(!main.contains("branch_a"));
        assert!(!main.contains("N1"));
    }

    #[test]
    fn test_tfvars_lists_networks_and_credential() {
        let files = rendered();
        let tfvars = files.iter().find(|f| f.path == Path::new(TFVARS_FILE)).unwrap();

        assert_eq!(tfvars.mode, FileMode::Private);
        assert!(tfvars.contents.contains("meraki_api_key = \"secret\""));
        assert!(tfvars.contents.contains("  \"branch_a\" = \"N1\"\n"));
        assert!(tfvars.contents.contains("  \"branch_a_N2\" = \"N2\"\n"));
    }

    #[test]
    fn test_tfvars_without_credential() {
        let tfvars = render_tfvars(&pairs(), None);
        assert!(!tfvars.contains(API_KEY_VAR));
        assert!(tfvars.starts_with("network_id_map = {"));
    }

    #[test]
    fn test_variables_mark_credential_sensitive() {
        let scaffold = plan("acme_hq", &pairs());
        let vars = render_variables(&scaffold.root);
        assert!(vars.contains("variable \"meraki_api_key\" {"));
        assert!(vars.contains("sensitive   = true"));
        assert!(vars.contains("type        = map(string)"));
    }

    #[test]
    fn test_write_files_overwrites_and_sets_modes() {
        let dir = tempdir().unwrap();
        let files = rendered();

        write_files(dir.path(), &files).unwrap();
        let paths = write_files(dir.path(), &files).unwrap();
        assert_eq!(paths.len(), files.len());
        assert!(dir.path().join("modules/shared_modules/alerts/main.tf").exists());

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(dir.path().join(TFVARS_FILE))
                .unwrap()
                .permissions()
                .mode();
            assert_eq!(mode & 0o777, 0o600);

            let script = GeneratedFile {
                path: PathBuf::from("run.sh"),
                contents: "#!/usr/bin/env bash\n".to_string(),
                mode: FileMode::Executable,
            };
            write_files(dir.path(), &[script]).unwrap();
            let mode = std::fs::metadata(dir.path().join("run.sh"))
                .unwrap()
                .permissions()
                .mode();
            assert_eq!(mode & 0o777, 0o755);
        }
    }
}
