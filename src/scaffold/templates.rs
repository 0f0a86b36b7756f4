//! HCL bodies for the shared service modules
//!
//! Each body decodes the module's YAML data file and declares exactly one
//! resource block named [`RESOURCE_NAME`]. Keyed kinds index `for_each` by
//! the configured identifier field and drop records that lack it; an empty
//! data file provisions nothing.

use super::address::RESOURCE_NAME;
use crate::resource::ResourceKind;

/// `terraform { required_providers { ... } }` pinning the Meraki provider.
///
/// Every module needs this block because the provider lives outside the
/// `hashicorp/` namespace.
pub fn required_providers(source: &str, version: &str) -> String {
    format!(
        r#"terraform {{
  required_providers {{
    meraki = {{
      source  = "{source}"
      version = "{version}"
    }}
  }}
}}
"#
    )
}

/// Root provider configuration
pub fn provider_block() -> &'static str {
    r#"provider "meraki" {
  meraki_dashboard_api_key = var.meraki_api_key
}
"#
}

/// `for_each` expression over a decoded list, keyed by `field`
fn keyed_for_each(list: &str, item: &str, field: &str) -> String {
    format!(
        "{{ for {item} in local.{list} : tostring({item}.{field}) => {item} if try({item}.{field}, null) != null }}"
    )
}

/// Resource body for a service kind, `None` for kinds without a module.
///
/// `key_field` is the identifier field for keyed kinds and is ignored for
/// the others.
pub fn service_body(kind: ResourceKind, key_field: Option<&str>) -> Option<String> {
    let resource_type = kind.resource_type()?;
    let field = key_field.unwrap_or("id");

    let body = match kind {
        ResourceKind::Ssids => format!(
            r#"locals {{
  ssids = yamldecode(file(var.yaml_file))
}}

resource "{resource_type}" "{RESOURCE_NAME}" {{
  for_each        = {for_each}
  network_id      = var.network_id
  number          = each.value.number
  name            = each.value.name
  enabled         = each.value.enabled
  auth_mode       = lookup(each.value, "authMode", null)
  encryption_mode = lookup(each.value, "encryptionMode", null)
  psk             = lookup(each.value, "psk", null)
}}
"#,
            for_each = keyed_for_each("ssids", "s", field),
        ),
        ResourceKind::FirewallRules => format!(
            r#"locals {{
  rules = yamldecode(file(var.yaml_file))
}}

resource "{resource_type}" "{RESOURCE_NAME}" {{
  count      = length(local.rules) > 0 ? 1 : 0
  network_id = var.network_id
  rules      = local.rules
}}
"#
        ),
        ResourceKind::WebhookServers => format!(
            r#"locals {{
  webhooks = yamldecode(file(var.yaml_file))
}}

resource "{resource_type}" "{RESOURCE_NAME}" {{
  for_each         = {for_each}
  network_id       = var.network_id
  name             = each.value.name
  url              = each.value.url
  shared_secret    = lookup(each.value, "sharedSecret", null)
  payload_template = lookup(each.value, "payloadTemplate", null)
}}
"#,
            for_each = keyed_for_each("webhooks", "w", field),
        ),
        ResourceKind::Alerts => format!(
            r#"locals {{
  data = yamldecode(file(var.yaml_file))
}}

resource "{resource_type}" "{RESOURCE_NAME}" {{
  network_id           = var.network_id
  default_destinations = try(local.data.defaultDestinations, null)
  alerts               = try(local.data.alerts, null)
}}
"#
        ),
        ResourceKind::VlansMx => format!(
            r#"locals {{
  vlans = yamldecode(file(var.yaml_file))
}}

resource "{resource_type}" "{RESOURCE_NAME}" {{
  for_each     = {for_each}
  network_id   = var.network_id
  id           = each.value.id
  name         = each.value.name
  subnet       = lookup(each.value, "subnet", null)
  appliance_ip = lookup(each.value, "applianceIp", null)
}}
"#,
            for_each = keyed_for_each("vlans", "v", field),
        ),
        ResourceKind::Devices => return None,
    };

    Some(body)
}
