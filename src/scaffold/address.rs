//! Terraform state addresses
//!
//! Module and resource addresses are only ever built here. The scaffold names
//! its module blocks with the same segments and the import generator formats
//! its targets with [`resource_address`], so an import always lands on a
//! resource the scaffold declares.

/// Local name of the single resource block in every shared module
pub const RESOURCE_NAME: &str = "this";

/// `module.<a>.module.<b>...` for a chain of module block names
pub fn module_address(path: &[&str]) -> String {
    path.iter()
        .map(|segment| format!("module.{segment}"))
        .collect::<Vec<_>>()
        .join(".")
}

/// Address of a shared-module resource instance inside a network module.
///
/// `key` selects a `for_each` instance; `None` addresses a singleton.
pub fn resource_address(
    network_key: &str,
    service: &str,
    resource_type: &str,
    key: Option<&str>,
) -> String {
    let base = format!(
        "{}.{}.{}",
        module_address(&[network_key, service]),
        resource_type,
        RESOURCE_NAME
    );
    match key {
        Some(key) => format!("{base}[\"{key}\"]"),
        None => base,
    }
}
