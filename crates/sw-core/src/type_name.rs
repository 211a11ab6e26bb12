//! Target-language type names.

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A type in the generated language: a namespace (import path) plus a local
/// name. Built-in types have an empty namespace.
///
/// A `TypeName` carries no alias. The alias under which its namespace is
/// imported depends on the output file and is resolved by a [`Scope`](crate::Scope).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TypeName {
    pub namespace: String,
    pub name: String,
}

impl TypeName {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    /// A built-in type such as `int64` or `[]byte`.
    pub fn builtin(name: impl Into<String>) -> Self {
        Self::new("", name)
    }

    /// Parse a dot-separated spec `[namespace.]name`, splitting at the last `.`.
    ///
    /// ```
    /// use sw_core::TypeName;
    /// let tn = TypeName::from_spec("github.com/go-sql-driver/mysql.NullTime").unwrap();
    /// assert_eq!(tn.namespace, "github.com/go-sql-driver/mysql");
    /// assert_eq!(tn.name, "NullTime");
    /// assert!(TypeName::from_spec("int64").unwrap().is_builtin());
    /// ```
    pub fn from_spec(spec: &str) -> CoreResult<Self> {
        let spec = spec.trim();
        let bad = |reason: &str| CoreError::BadTypeSpec {
            spec: spec.to_string(),
            reason: reason.to_string(),
        };
        if spec.is_empty() {
            return Err(bad("empty spec"));
        }
        match spec.rfind('.') {
            Some(pos) => {
                let (namespace, name) = (&spec[..pos], &spec[pos + 1..]);
                if namespace.is_empty() {
                    return Err(bad("empty namespace"));
                }
                if name.is_empty() {
                    return Err(bad("empty type name"));
                }
                Ok(Self::new(namespace, name))
            }
            None => Ok(Self::builtin(spec)),
        }
    }

    pub fn is_builtin(&self) -> bool {
        self.namespace.is_empty()
    }

    /// The spec form accepted by [`from_spec`](Self::from_spec).
    pub fn spec(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_builtin() {
            f.write_str(&self.name)
        } else {
            write!(f, "{}.{}", self.namespace, self.name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_round_trip() {
        for spec in ["int64", "[]byte", "database/sql.NullInt64", "a.b.C"] {
            assert_eq!(TypeName::from_spec(spec).unwrap().spec(), spec);
        }
    }

    #[test]
    fn test_split_at_last_dot() {
        let tn = TypeName::from_spec("github.com/pingcap/tidb/mysql.dot.SQLError").unwrap();
        assert_eq!(tn.namespace, "github.com/pingcap/tidb/mysql.dot");
        assert_eq!(tn.name, "SQLError");
    }

    #[test]
    fn test_bad_specs() {
        assert!(TypeName::from_spec("").is_err());
        assert!(TypeName::from_spec("pkg.").is_err());
        assert!(TypeName::from_spec(".Name").is_err());
    }
}
