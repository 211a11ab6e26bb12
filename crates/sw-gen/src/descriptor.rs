//! Descriptors handed to templates and printed by `describe`.

use crate::error::{GenError, GenResult};
use crate::names::UniqueNames;
use serde::Serialize;
use sw_annot::{ReturnStyle, WrapperDescriptor};
use sw_core::ident::pascal_case;
use sw_core::{ColumnType, TypeAdapter};
use sw_db::TableColumn;
use sw_sql::{FieldList, TableRefs};

/// A table column with its adapted target type.
#[derive(Debug, Clone, Serialize)]
pub struct ColumnDescriptor {
    pub name: String,
    /// Field name in the table struct.
    pub pascal_name: String,
    pub sql_type: String,
    pub column_type: ColumnType,
    /// Adapted target type, `[namespace.]Name`.
    pub type_spec: String,
    pub nullable: bool,
    pub primary_key: bool,
    pub auto_increment: bool,
    /// Generated type for ENUM and SET columns.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_type: Option<String>,
}

impl ColumnDescriptor {
    pub fn is_enum(&self) -> bool {
        self.column_type.is_enum()
    }

    pub fn is_set(&self) -> bool {
        self.column_type.is_set()
    }
}

/// A table of the loaded schema.
#[derive(Debug, Clone, Serialize)]
pub struct TableDescriptor {
    pub schema: String,
    pub name: String,
    /// Name used in FROM clauses: schema-qualified outside the default schema.
    pub ref_name: String,
    pub pascal_name: String,
    pub columns: Vec<ColumnDescriptor>,
    pub primary_columns: Vec<ColumnDescriptor>,
    pub non_primary_columns: Vec<ColumnDescriptor>,
    pub auto_increment_column: Option<ColumnDescriptor>,
}

impl TableDescriptor {
    pub fn build(
        schema: &str,
        name: &str,
        default_schema: &str,
        columns: &[TableColumn],
        adapter: &TypeAdapter,
    ) -> GenResult<Self> {
        let ref_name = if schema == default_schema {
            name.to_string()
        } else {
            format!("{}.{}", schema, name)
        };
        let pascal_name = pascal_case(&ref_name);

        let mut names = UniqueNames::new();
        let columns = columns
            .iter()
            .map(|column| {
                let column_type = parse_column_type(&column.name, &column.sql_type, column.nullable)?;
                let type_spec = adapt(adapter, &column.name, &column_type)?;
                let pascal = names.add(&column.name);
                let local_type = (column_type.is_enum() || column_type.is_set())
                    .then(|| format!("{}{}", pascal_name, pascal));
                Ok(ColumnDescriptor {
                    name: column.name.clone(),
                    pascal_name: pascal,
                    sql_type: column.sql_type.clone(),
                    column_type,
                    type_spec,
                    nullable: column.nullable,
                    primary_key: column.primary_key,
                    auto_increment: column.is_auto_increment(),
                    local_type,
                })
            })
            .collect::<GenResult<Vec<_>>>()?;

        let auto_increment_columns: Vec<&ColumnDescriptor> =
            columns.iter().filter(|c| c.auto_increment).collect();
        if auto_increment_columns.len() > 1 {
            log::warn!(
                "table {} has {} sequence-backed columns; only {} is treated as auto-increment",
                ref_name,
                auto_increment_columns.len(),
                auto_increment_columns[0].name
            );
        }
        let auto_increment_column = auto_increment_columns.first().map(|c| (*c).clone());

        let (primary_columns, non_primary_columns): (Vec<_>, Vec<_>) =
            columns.iter().cloned().partition(|c| c.primary_key);

        Ok(Self {
            schema: schema.to_string(),
            name: name.to_string(),
            ref_name,
            pascal_name,
            columns,
            primary_columns,
            non_primary_columns,
            auto_increment_column,
        })
    }

    pub fn column(&self, name: &str) -> Option<&ColumnDescriptor> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .or_else(|| self.columns.iter().find(|c| c.name.eq_ignore_ascii_case(name)))
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }
}

/// The base-table column a result field reads.
#[derive(Debug, Clone, Serialize)]
pub struct ColumnOrigin {
    pub table_ref: String,
    /// Reference name of the base table.
    pub table: String,
    pub column: String,
    pub table_type: String,
    pub column_field: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_type: Option<String>,
}

/// Position of a result field inside a wildcard expansion.
#[derive(Debug, Clone, Serialize)]
pub struct WildcardPosition {
    pub table_ref: String,
    pub index: usize,
    pub base_table: bool,
    /// The reference is on the nullable side of an outer join.
    pub outer_joined: bool,
}

/// One result column of a SELECT.
#[derive(Debug, Clone, Serialize)]
pub struct ResultFieldDescriptor {
    pub name: String,
    pub sql_type: String,
    pub column_type: ColumnType,
    pub type_spec: String,
    pub nullable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<ColumnOrigin>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wildcard: Option<WildcardPosition>,
}

/// How a result struct field is typed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StructFieldKind {
    /// Pointer to an embedded table struct.
    Embed,
    /// Type generated in a table file (ENUM, SET).
    Local,
    /// Type spec resolved through the file's scope.
    Spec,
}

#[derive(Debug, Clone, Serialize)]
pub struct StructField {
    pub name: String,
    pub kind: StructFieldKind,
    #[serde(rename = "type")]
    pub type_ref: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// The `<Func>Result` struct of a SELECT wrapper.
#[derive(Debug, Clone, Serialize)]
pub struct ResultStruct {
    pub name: String,
    pub fields: Vec<StructField>,
    /// Scan destinations relative to the struct, one per result field.
    pub scan_targets: Vec<String>,
}

impl ResultStruct {
    /// Lay out the result struct. Each wildcard span over a base table
    /// becomes one embedded table struct unless the table is outer joined;
    /// other fields are flat.
    pub fn build(function_name: &str, fields: &[ResultFieldDescriptor]) -> GenResult<Self> {
        let mut names = UniqueNames::new();
        let mut struct_fields = Vec::new();
        let mut scan_targets = Vec::with_capacity(fields.len());
        let mut embedded: Option<String> = None;

        for field in fields {
            match (&field.wildcard, &field.origin) {
                (Some(wildcard), Some(origin)) if wildcard.base_table && !wildcard.outer_joined => {
                    if wildcard.index == 0 {
                        let name = names.add(&wildcard.table_ref);
                        struct_fields.push(StructField {
                            name: name.clone(),
                            kind: StructFieldKind::Embed,
                            type_ref: origin.table_type.clone(),
                            comment: Some(format!("{}.*", wildcard.table_ref)),
                        });
                        embedded = Some(name);
                    }
                    let owner = embedded.as_ref().ok_or_else(|| {
                        GenError::Internal(format!(
                            "wildcard field {:?} precedes the start of its span",
                            field.name
                        ))
                    })?;
                    scan_targets.push(format!("{}.{}", owner, origin.column_field));
                }
                _ => {
                    let name = names.add(&field.name);
                    let local = field.origin.as_ref().and_then(|o| o.local_type.clone());
                    let (kind, type_ref) = match local {
                        Some(local) => (StructFieldKind::Local, local),
                        None => (StructFieldKind::Spec, field.type_spec.clone()),
                    };
                    struct_fields.push(StructField {
                        name: name.clone(),
                        kind,
                        type_ref,
                        comment: None,
                    });
                    scan_targets.push(name);
                }
            }
        }

        Ok(Self {
            name: format!("{}Result", function_name),
            fields: struct_fields,
            scan_targets,
        })
    }
}

/// A SELECT statement ready for rendering.
#[derive(Debug, Clone, Serialize)]
pub struct SelectDescriptor {
    /// Wrapper of the statement with its wildcards expanded.
    pub wrapper: WrapperDescriptor,
    /// Statement source before wildcard expansion.
    pub original_source: String,
    pub table_refs: TableRefs,
    pub field_list: FieldList,
    pub fields: Vec<ResultFieldDescriptor>,
    pub result: ResultStruct,
}

/// Kind of data-changing statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecKind {
    Insert,
    Update,
    Delete,
}

/// An INSERT, UPDATE or DELETE statement ready for rendering.
#[derive(Debug, Clone, Serialize)]
pub struct ExecDescriptor {
    pub wrapper: WrapperDescriptor,
    pub kind: ExecKind,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "statement", rename_all = "lowercase")]
pub enum StatementDescriptor {
    Select(SelectDescriptor),
    Exec(ExecDescriptor),
}

impl StatementDescriptor {
    pub fn wrapper(&self) -> &WrapperDescriptor {
        match self {
            StatementDescriptor::Select(s) => &s.wrapper,
            StatementDescriptor::Exec(e) => &e.wrapper,
        }
    }
}

/// All statements of one DML file.
#[derive(Debug, Clone, Serialize)]
pub struct DmlFile {
    pub path: String,
    /// Output file stem.
    pub stem: String,
    pub statements: Vec<StatementDescriptor>,
}

/// Function argument as templates see it.
#[derive(Debug, Clone, Serialize)]
pub struct ArgView {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_spec: Option<String>,
}

/// Wrapper function as templates see it.
#[derive(Debug, Clone, Serialize)]
pub struct FuncView {
    pub name: String,
    pub text: String,
    pub source_lines: Vec<String>,
    pub args: Vec<ArgView>,
    pub has_in_binding: bool,
    pub return_style: ReturnStyle,
}

impl FuncView {
    /// `unknown_style` replaces [`ReturnStyle::Unknown`].
    pub fn new(wrapper: &WrapperDescriptor, unknown_style: ReturnStyle) -> Self {
        let return_style = match wrapper.return_style {
            ReturnStyle::Unknown => unknown_style,
            style => style,
        };
        Self {
            name: wrapper.function_name.clone(),
            text: wrapper.text.clone(),
            source_lines: wrapper
                .source_text
                .lines()
                .map(str::trim_end)
                .filter(|line| !line.trim().is_empty())
                .map(String::from)
                .collect(),
            args: wrapper
                .args
                .iter()
                .map(|arg| ArgView {
                    name: arg.name.clone(),
                    type_spec: arg.type_name.as_ref().map(|t| t.spec()),
                })
                .collect(),
            has_in_binding: wrapper.has_in_binding(),
            return_style,
        }
    }
}

pub(crate) fn parse_column_type(column: &str, sql_type: &str, nullable: bool) -> GenResult<ColumnType> {
    ColumnType::parse(sql_type)
        .map(|t| t.with_nullable(nullable))
        .map_err(|source| GenError::ColumnType {
            column: column.to_string(),
            source,
        })
}

pub(crate) fn adapt(adapter: &TypeAdapter, column: &str, column_type: &ColumnType) -> GenResult<String> {
    adapter
        .adapt(column_type)
        .map(|t| t.spec())
        .map_err(|source| GenError::ColumnType {
            column: column.to_string(),
            source,
        })
}

#[cfg(test)]
#[path = "descriptor_test.rs"]
mod tests;
