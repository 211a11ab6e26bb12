//! Per-file namespace alias registry.
//!
//! Every generated output file owns one [`Scope`]. Namespaces referenced by the
//! file's types are imported under an alias that is unique within the file.
//! The same namespace may get different aliases in different files.

use crate::ident::leading_ident;
use crate::type_name::TypeName;
use std::collections::HashMap;

/// Alias used when a namespace's last segment has no leading identifier.
const FALLBACK_ALIAS: &str = "pkg";

/// Alias emitted for imported but unused namespaces.
pub const DISCARD_ALIAS: &str = "_";

#[derive(Debug, Default, Clone)]
pub struct Scope {
    /// namespace -> alias
    aliases: HashMap<String, String>,
    /// alias -> used
    used: HashMap<String, bool>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Import `namespace` without marking it used, returning its alias.
    ///
    /// Importing the same namespace again returns the same alias. The empty
    /// namespace (built-ins) has the empty alias.
    pub fn import(&mut self, namespace: &str) -> String {
        if namespace.is_empty() {
            return String::new();
        }
        if let Some(alias) = self.aliases.get(namespace) {
            return alias.clone();
        }

        let last = namespace.rsplit('/').next().unwrap_or(namespace);
        let base = leading_ident(last)
            .map(str::to_ascii_lowercase)
            .unwrap_or_else(|| FALLBACK_ALIAS.to_string());

        let mut alias = base.clone();
        let mut n = 0;
        while self.used.contains_key(&alias) {
            n += 1;
            alias = format!("{}_{}", base, n);
        }

        log::debug!("scope: import {} as {}", namespace, alias);
        self.aliases.insert(namespace.to_string(), alias.clone());
        self.used.insert(alias.clone(), false);
        alias
    }

    /// Import `namespace` (if not yet) and mark it used.
    pub fn use_namespace(&mut self, namespace: &str) -> String {
        let alias = self.import(namespace);
        if !alias.is_empty() {
            self.used.insert(alias.clone(), true);
        }
        alias
    }

    /// Render `type_name` as it must be written inside this scope, marking its
    /// namespace used: `alias.Name`, or just `Name` for built-ins.
    pub fn render(&mut self, type_name: &TypeName) -> String {
        let alias = self.use_namespace(&type_name.namespace);
        if alias.is_empty() {
            type_name.name.clone()
        } else {
            format!("{}.{}", alias, type_name.name)
        }
    }

    /// `(namespace, alias)` pairs sorted by namespace. Unused imports are
    /// listed with [`DISCARD_ALIAS`].
    pub fn list(&self) -> Vec<(String, String)> {
        let mut out: Vec<(String, String)> = self
            .aliases
            .iter()
            .map(|(namespace, alias)| {
                let shown = if self.used.get(alias).copied().unwrap_or(false) {
                    alias.clone()
                } else {
                    DISCARD_ALIAS.to_string()
                };
                (namespace.clone(), shown)
            })
            .collect();
        out.sort();
        out
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}

#[cfg(test)]
#[path = "scope_test.rs"]
mod tests;
