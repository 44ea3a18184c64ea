//! Namespace mapping (spec §4.13, §6): an injected URI→module-path dictionary takes priority;
//! unmapped URIs are auto-derived by stripping the scheme/`www.`/`urn:` prefix and splitting the
//! remainder on `/`, `:` and `.` into `seg1::seg2::...`.

use std::collections::HashMap;

#[derive(Clone, Debug, Default)]
pub struct NamespaceMap {
    explicit: HashMap<String, String>,
}

impl NamespaceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an explicit `-n <uri>=<namespace-path>` mapping (spec §6).
    pub fn insert(&mut self, uri: impl Into<String>, path: impl Into<String>) {
        self.explicit.insert(uri.into(), path.into());
    }

    /// The module path for `uri`: the explicit mapping if one was registered, otherwise a
    /// derived path.
    pub fn resolve(&self, uri: &str) -> String {
        match self.explicit.get(uri) {
            Some(path) => path.clone(),
            None => derive(uri),
        }
    }
}

fn derive(uri: &str) -> String {
    let stripped = uri
        .strip_prefix("https://")
        .or_else(|| uri.strip_prefix("http://"))
        .or_else(|| uri.strip_prefix("urn:"))
        .unwrap_or(uri);
    let stripped = stripped.strip_prefix("www.").unwrap_or(stripped);

    let segments: Vec<&str> = stripped.split(['/', ':', '.']).filter(|s| !s.is_empty()).collect();
    if segments.is_empty() {
        "schema".to_string()
    } else {
        segments.join("::")
    }
}
