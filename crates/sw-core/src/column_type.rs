//! SQL column type descriptors.
//!
//! The oracle reports column types as strings (`INTEGER`, `DECIMAL(18,3)`,
//! `ENUM('a', 'b')`, `tinyint(1) unsigned`, ...). [`ColumnType::parse`] turns
//! them into a [`ColumnType`] the type adapter can switch on.

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};

/// Base SQL type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeCode {
    Bit,
    Tiny,
    Short,
    Medium,
    Long,
    LongLong,
    Year,
    Float,
    Double,
    Decimal,
    Date,
    Datetime,
    Timestamp,
    Time,
    Char,
    VarChar,
    Blob,
    Json,
    Uuid,
    Enum,
    Set,
    /// Recognized but without a default mapping (HUGEINT, INTERVAL, LIST, ...).
    Other,
}

/// Coarse class used by the default adaptation rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeClass {
    Int,
    Real,
    Decimal,
    String,
    Other,
}

impl TypeCode {
    pub fn class(self) -> TypeClass {
        match self {
            TypeCode::Bit
            | TypeCode::Tiny
            | TypeCode::Short
            | TypeCode::Medium
            | TypeCode::Long
            | TypeCode::LongLong
            | TypeCode::Year => TypeClass::Int,
            TypeCode::Float | TypeCode::Double => TypeClass::Real,
            TypeCode::Decimal => TypeClass::Decimal,
            TypeCode::Date
            | TypeCode::Datetime
            | TypeCode::Timestamp
            | TypeCode::Time
            | TypeCode::Char
            | TypeCode::VarChar
            | TypeCode::Blob
            | TypeCode::Json
            | TypeCode::Uuid
            | TypeCode::Enum
            | TypeCode::Set => TypeClass::String,
            TypeCode::Other => TypeClass::Other,
        }
    }

    /// Date-like types that a temporal hook may map to a time type.
    pub fn is_temporal(self) -> bool {
        matches!(
            self,
            TypeCode::Date | TypeCode::Datetime | TypeCode::Timestamp
        )
    }
}

/// A column's SQL type together with the flags the adapter needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnType {
    /// Type string as reported by the database.
    pub raw: String,
    pub code: TypeCode,
    /// Declared width or precision, e.g. 1 in `tinyint(1)`.
    pub width: Option<u32>,
    pub unsigned: bool,
    pub binary: bool,
    pub nullable: bool,
    /// Members of an ENUM or SET.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub elems: Vec<String>,
}

impl ColumnType {
    /// Parse a type string. Columns are nullable unless the string ends in
    /// `NOT NULL`; use [`with_nullable`](Self::with_nullable) to apply the
    /// nullability reported separately by the database.
    pub fn parse(raw: &str) -> CoreResult<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(bad_type(raw));
        }

        let mut rest = raw;
        let mut nullable = true;
        let mut unsigned = false;
        loop {
            if let Some(r) = strip_suffix_ci(rest, "not null") {
                nullable = false;
                rest = r;
            } else if let Some(r) = strip_suffix_ci(rest, "null") {
                rest = r;
            } else if let Some(r) = strip_suffix_ci(rest, "unsigned") {
                unsigned = true;
                rest = r;
            } else if let Some(r) = strip_suffix_ci(rest, "zerofill") {
                rest = r;
            } else {
                break;
            }
        }

        if rest.ends_with(']') {
            return Ok(Self::new(raw, TypeCode::Other).with_nullable(nullable));
        }

        let (base, args) = match rest.find('(') {
            Some(open) => {
                let close = rest.rfind(')').ok_or_else(|| bad_type(raw))?;
                if close < open {
                    return Err(bad_type(raw));
                }
                (rest[..open].trim(), Some(&rest[open + 1..close]))
            }
            None => (rest.trim(), None),
        };
        if base.is_empty() {
            return Err(bad_type(raw));
        }

        let base_upper = base.to_ascii_uppercase();
        let (code, implied_unsigned, binary, implied_width) = classify(&base_upper);

        let mut column = Self::new(raw, code);
        column.unsigned = unsigned || implied_unsigned;
        column.binary = binary;
        column.nullable = nullable;
        column.width = implied_width;

        if let Some(args) = args {
            match code {
                TypeCode::Enum | TypeCode::Set => column.elems = parse_elems(args, raw)?,
                TypeCode::Other => {}
                _ => {
                    let first = args.split(',').next().unwrap_or("").trim();
                    let width = first.parse::<u32>().map_err(|_| bad_type(raw))?;
                    column.width = Some(width);
                }
            }
        }

        Ok(column)
    }

    fn new(raw: &str, code: TypeCode) -> Self {
        Self {
            raw: raw.to_string(),
            code,
            width: None,
            unsigned: false,
            binary: false,
            nullable: true,
            elems: Vec::new(),
        }
    }

    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    pub fn is_enum(&self) -> bool {
        self.code == TypeCode::Enum
    }

    pub fn is_set(&self) -> bool {
        self.code == TypeCode::Set
    }

    /// Upper-cased base type name without arguments, e.g. `DECIMAL` for
    /// `decimal(10,2)`. Used to match type overrides.
    pub fn base_name(&self) -> String {
        let upper = self.raw.to_ascii_uppercase();
        let end = upper.find(['(', '[']).unwrap_or(upper.len());
        let base = upper[..end].trim();
        let base = base.strip_suffix("NOT NULL").unwrap_or(base).trim();
        base.strip_suffix("UNSIGNED").unwrap_or(base).trim().to_string()
    }
}

fn bad_type(raw: &str) -> CoreError {
    CoreError::BadColumnType {
        type_name: raw.to_string(),
    }
}

fn strip_suffix_ci<'a>(s: &'a str, suffix: &str) -> Option<&'a str> {
    let trimmed = s.trim_end();
    if trimmed.len() <= suffix.len() {
        return None;
    }
    let split = trimmed.len() - suffix.len();
    if !trimmed.is_char_boundary(split) {
        return None;
    }
    let (head, tail) = trimmed.split_at(split);
    if tail.eq_ignore_ascii_case(suffix) && head.ends_with(char::is_whitespace) {
        Some(head.trim_end())
    } else {
        None
    }
}

/// Map a base type name to `(code, unsigned, binary, width)`.
fn classify(base: &str) -> (TypeCode, bool, bool, Option<u32>) {
    match base {
        "BOOLEAN" | "BOOL" | "LOGICAL" => (TypeCode::Tiny, false, false, Some(1)),
        "BIT" => (TypeCode::Bit, true, false, Some(1)),
        "TINYINT" | "INT1" => (TypeCode::Tiny, false, false, None),
        "UTINYINT" => (TypeCode::Tiny, true, false, None),
        "SMALLINT" | "INT2" | "SHORT" => (TypeCode::Short, false, false, None),
        "USMALLINT" => (TypeCode::Short, true, false, None),
        "MEDIUMINT" => (TypeCode::Medium, false, false, None),
        "INTEGER" | "INT" | "INT4" | "SIGNED" => (TypeCode::Long, false, false, None),
        "UINTEGER" => (TypeCode::Long, true, false, None),
        "BIGINT" | "INT8" | "LONG" => (TypeCode::LongLong, false, false, None),
        "UBIGINT" => (TypeCode::LongLong, true, false, None),
        "YEAR" => (TypeCode::Year, true, false, None),
        "FLOAT" | "REAL" | "FLOAT4" => (TypeCode::Float, false, false, None),
        "DOUBLE" | "DOUBLE PRECISION" | "FLOAT8" => (TypeCode::Double, false, false, None),
        "DECIMAL" | "NUMERIC" | "DEC" => (TypeCode::Decimal, false, false, None),
        "DATE" => (TypeCode::Date, false, false, None),
        "DATETIME" => (TypeCode::Datetime, false, false, None),
        "TIMESTAMP"
        | "TIMESTAMP_S"
        | "TIMESTAMP_MS"
        | "TIMESTAMP_NS"
        | "TIMESTAMP_US"
        | "TIMESTAMPTZ"
        | "TIMESTAMP WITH TIME ZONE" => (TypeCode::Timestamp, false, false, None),
        "TIME" | "TIMETZ" | "TIME WITH TIME ZONE" => (TypeCode::Time, false, false, None),
        "CHAR" | "CHARACTER" | "BPCHAR" => (TypeCode::Char, false, false, None),
        "VARCHAR" | "CHARACTER VARYING" | "TEXT" | "STRING" | "TINYTEXT" | "MEDIUMTEXT"
        | "LONGTEXT" => (TypeCode::VarChar, false, false, None),
        "BLOB" | "BYTEA" | "BINARY" | "VARBINARY" | "TINYBLOB" | "MEDIUMBLOB" | "LONGBLOB" => {
            (TypeCode::Blob, false, true, None)
        }
        "JSON" => (TypeCode::Json, false, false, None),
        "UUID" => (TypeCode::Uuid, false, false, None),
        "ENUM" => (TypeCode::Enum, false, false, None),
        "SET" => (TypeCode::Set, false, false, None),
        _ => (TypeCode::Other, false, false, None),
    }
}

/// Parse `'a', 'b''c'` into `["a", "b'c"]`.
fn parse_elems(args: &str, raw: &str) -> CoreResult<Vec<String>> {
    let mut elems = Vec::new();
    let mut chars = args.chars().peekable();
    loop {
        while chars.next_if(|c| c.is_whitespace()).is_some() {}
        match chars.next() {
            None => break,
            Some('\'') => {}
            Some(_) => return Err(bad_type(raw)),
        }
        let mut elem = String::new();
        loop {
            match chars.next() {
                Some('\'') if chars.peek() == Some(&'\'') => {
                    chars.next();
                    elem.push('\'');
                }
                Some('\'') => break,
                Some(c) => elem.push(c),
                None => return Err(bad_type(raw)),
            }
        }
        elems.push(elem);
        while chars.next_if(|c| c.is_whitespace()).is_some() {}
        match chars.next() {
            None => break,
            Some(',') => {}
            Some(_) => return Err(bad_type(raw)),
        }
    }
    Ok(elems)
}

#[cfg(test)]
#[path = "column_type_test.rs"]
mod tests;
