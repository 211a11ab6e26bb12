//! Mapping from SQL column types to target-language types.

use crate::column_type::{ColumnType, TypeClass, TypeCode};
use crate::error::{CoreError, CoreResult};
use crate::type_name::TypeName;

/// An override consulted before the default rules. Returning `None` passes
/// the column on to earlier hooks and finally to the defaults.
pub type AdapterHook = Box<dyn Fn(&ColumnType) -> Option<TypeName>>;

const SQL: &str = "database/sql";
const TIME: &str = "time";
const MYSQL_DRIVER: &str = "github.com/go-sql-driver/mysql";

/// Chooses a target type able to hold a column's values.
#[derive(Default)]
pub struct TypeAdapter {
    hooks: Vec<AdapterHook>,
}

impl TypeAdapter {
    /// An adapter using only the default rules.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an override. Hooks are tried last-registered first.
    pub fn add_hook(&mut self, hook: AdapterHook) {
        self.hooks.push(hook);
    }

    /// Register an override mapping every column whose base type name equals
    /// `sql_type` (case-insensitive) to `target`.
    pub fn add_override(&mut self, sql_type: &str, target: TypeName) {
        let sql_type = sql_type.trim().to_ascii_uppercase();
        self.add_hook(Box::new(move |column: &ColumnType| {
            (column.base_name() == sql_type).then(|| target.clone())
        }));
    }

    pub fn hook_count(&self) -> usize {
        self.hooks.len()
    }

    /// Adapt `column` to a target type.
    pub fn adapt(&self, column: &ColumnType) -> CoreResult<TypeName> {
        for hook in self.hooks.iter().rev() {
            if let Some(type_name) = hook(column) {
                log::debug!("type adapter: hook maps {} to {}", column.raw, type_name);
                return Ok(type_name);
            }
        }
        default_rules(column).ok_or_else(|| CoreError::UnsupportedType {
            type_name: column.raw.clone(),
        })
    }
}

/// Hook mapping DATE/DATETIME/TIMESTAMP to `time.Time`, or the MySQL driver's
/// `NullTime` when the column is nullable.
pub fn temporal_hook() -> AdapterHook {
    Box::new(|column: &ColumnType| {
        if !column.code.is_temporal() {
            return None;
        }
        Some(if column.nullable {
            TypeName::new(MYSQL_DRIVER, "NullTime")
        } else {
            TypeName::new(TIME, "Time")
        })
    })
}

fn builtin(name: &str) -> Option<TypeName> {
    Some(TypeName::builtin(name))
}

fn sql(name: &str) -> Option<TypeName> {
    Some(TypeName::new(SQL, name))
}

fn default_rules(column: &ColumnType) -> Option<TypeName> {
    let nullable = column.nullable;
    let unsigned = column.unsigned;
    let width = column.width;

    match column.code.class() {
        TypeClass::Int => match column.code {
            TypeCode::Bit | TypeCode::Tiny if width == Some(1) => {
                if nullable {
                    sql("NullBool")
                } else {
                    builtin("bool")
                }
            }
            TypeCode::Year => builtin("uint16"),
            _ if nullable => sql("NullInt64"),
            TypeCode::Bit => match width.unwrap_or(1) {
                0..=8 => builtin("uint8"),
                9..=16 => builtin("uint16"),
                17..=32 => builtin("uint32"),
                _ => builtin("uint64"),
            },
            TypeCode::Tiny => builtin(if unsigned { "uint8" } else { "int8" }),
            TypeCode::Short => builtin(if unsigned { "uint16" } else { "int16" }),
            TypeCode::Medium | TypeCode::Long => builtin(if unsigned { "uint32" } else { "int32" }),
            TypeCode::LongLong => builtin(if unsigned { "uint64" } else { "int64" }),
            _ => None,
        },
        TypeClass::Real => {
            if nullable {
                sql("NullFloat64")
            } else if column.code == TypeCode::Float {
                builtin("float32")
            } else {
                builtin("float64")
            }
        }
        // Lossy: callers wanting exact decimals register an override.
        TypeClass::Decimal => {
            if nullable {
                sql("NullFloat64")
            } else {
                builtin("float64")
            }
        }
        TypeClass::String => {
            if column.binary {
                builtin("[]byte")
            } else if nullable {
                sql("NullString")
            } else {
                builtin("string")
            }
        }
        TypeClass::Other => None,
    }
}

#[cfg(test)]
#[path = "type_adapter_test.rs"]
mod tests;
