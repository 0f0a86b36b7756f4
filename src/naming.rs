//! Stable identifiers for organizations and networks
//!
//! A network's key is used verbatim as its storage directory, its Terraform
//! module name, and its workspace name. Keys are computed once per run by a
//! [`NameRegistry`] and looked up everywhere else.

use std::collections::{HashMap, HashSet};

/// Prefix applied when a sanitized name would start with a digit
pub const DIGIT_PREFIX: &str = "net_";

/// Key used when a name is empty
pub const EMPTY_NAME_KEY: &str = "unnamed";

/// Normalize a display name into an identifier.
///
/// Runs of characters outside `[A-Za-z0-9_]` collapse to a single `_`, the
/// result is lowercased, and a leading digit gets [`DIGIT_PREFIX`]. The
/// function is total and idempotent.
pub fn sanitize(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_run = false;

    for c in name.chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            out.push(c.to_ascii_lowercase());
            in_run = false;
        } else if !in_run {
            out.push('_');
            in_run = true;
        }
    }

    if out.is_empty() {
        return EMPTY_NAME_KEY.to_string();
    }

    if out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert_str(0, DIGIT_PREFIX);
    }

    out
}

/// Per-run assignment of network keys.
///
/// Collisions are resolved by appending the network's raw identifier. Keys
/// that differ only in case collide, since they become directory names. The
/// registry lives for one run only; a fresh one is created per organization.
#[derive(Debug, Default)]
pub struct NameRegistry {
    /// Assigned and reserved keys, lowercased
    taken: HashSet<String>,
    by_id: HashMap<String, String>,
}

impl NameRegistry {
    #[cfg(test)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry where `reserved` keys count as already taken.
    pub fn with_reserved(reserved: &[&str]) -> Self {
        Self {
            taken: reserved.iter().map(|k| k.to_ascii_lowercase()).collect(),
            by_id: HashMap::new(),
        }
    }

    /// Assign a key to a network, or return the key it already has.
    pub fn assign(&mut self, network_id: &str, name: &str) -> String {
        if let Some(existing) = self.by_id.get(network_id) {
            return existing.clone();
        }

        let base = sanitize(name);
        let mut key = base.clone();

        if self.is_taken(&key) {
            key = format!("{base}_{network_id}");
            // A display name can itself look like a suffixed key.
            let mut n = 2;
            while self.is_taken(&key) {
                key = format!("{base}_{network_id}_{n}");
                n += 1;
            }
        }

        self.taken.insert(key.to_ascii_lowercase());
        self.by_id.insert(network_id.to_string(), key.clone());
        key
    }

    fn is_taken(&self, key: &str) -> bool {
        self.taken.contains(&key.to_ascii_lowercase())
    }

    /// Key previously assigned to a network
    #[cfg(test)]
    pub fn key_for(&self, network_id: &str) -> Option<&str> {
        self.by_id.get(network_id).map(String::as_str)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.by_id.len()
    }
}
