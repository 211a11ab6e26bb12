//! Collision-free identifiers within one generated type.

use std::collections::HashSet;
use sw_core::ident::pascal_case;

/// Placeholder for names that convert to nothing, e.g. `COUNT(*)`.
pub const NO_NAME_FIELD: &str = "NoNameField";

/// Allocates PascalCase names, appending `1`, `2`, ... on collision.
#[derive(Debug, Default)]
pub struct UniqueNames {
    used: HashSet<String>,
}

impl UniqueNames {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, raw: &str) -> String {
        let mut base = pascal_case(raw);
        if base.is_empty() {
            base = NO_NAME_FIELD.to_string();
        }

        let mut name = base.clone();
        let mut n = 1;
        while !self.used.insert(name.clone()) {
            name = format!("{}{}", base, n);
            n += 1;
        }
        name
    }
}
