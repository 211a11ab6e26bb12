//! Table references of a SELECT's FROM clause.
//!
//! The join tree is flattened depth-first, left before right, into uniquely
//! named references. Reference names must be unique across the whole FROM
//! clause, base tables and subqueries alike, so that `name.*` is never
//! ambiguous.

use crate::error::{SqlError, SqlResult};
use serde::Serialize;
use sqlparser::ast::{
    Ident, JoinConstraint, JoinOperator, ObjectName, Query, Select, SetExpr, TableAlias, TableFactor,
    TableWithJoins,
};
use std::collections::HashMap;

/// Kind of FROM source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TableRefKind {
    Base,
    Derived,
}

/// A schema-qualified base table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct QualifiedTable {
    pub schema: String,
    pub table: String,
}

/// One source in a FROM clause.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableRef {
    /// Alias, or for an unaliased base table its name (schema-qualified
    /// unless in the default schema).
    pub name: String,
    pub kind: TableRefKind,
    /// Underlying table of a base reference.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<QualifiedTable>,
    /// SQL of a derived reference's subquery (or CTE body).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subquery: Option<String>,
    /// On the optional side of an outer join, so its columns may be NULL.
    pub outer_joined: bool,
}

impl TableRef {
    pub fn is_base(&self) -> bool {
        self.kind == TableRefKind::Base
    }

    pub fn is_derived(&self) -> bool {
        self.kind == TableRefKind::Derived
    }
}

/// Ordered, uniquely named table references.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TableRefs {
    refs: Vec<TableRef>,
    /// Some join has a USING or NATURAL constraint, so the engine merges the
    /// join columns of both sides in an unqualified `*`.
    merged_join_columns: bool,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl TableRefs {
    fn push(&mut self, table_ref: TableRef) -> SqlResult<()> {
        if self.index.contains_key(&table_ref.name) {
            return Err(SqlError::DuplicateTableRef {
                name: table_ref.name,
            });
        }
        self.index.insert(table_ref.name.clone(), self.refs.len());
        self.refs.push(table_ref);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&TableRef> {
        self.index.get(name).map(|&i| &self.refs[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &TableRef> {
        self.refs.iter()
    }

    pub fn len(&self) -> usize {
        self.refs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.refs.is_empty()
    }

    pub fn is_base_table(&self, name: &str) -> bool {
        self.get(name).is_some_and(TableRef::is_base)
    }

    pub fn has_merged_join_columns(&self) -> bool {
        self.merged_join_columns
    }

    pub fn is_derived_table(&self, name: &str) -> bool {
        self.get(name).is_some_and(TableRef::is_derived)
    }
}

/// Normalize an identifier: unquoted names are case-insensitive and lowered.
pub fn normalize_ident(ident: &Ident) -> String {
    if ident.quote_style.is_some() {
        ident.value.clone()
    } else {
        ident.value.to_lowercase()
    }
}

/// Split an object name into `(schema, table)`, using `default_schema` when
/// the name is unqualified. Catalog parts stay in the schema part.
pub fn qualify_object_name(name: &ObjectName, default_schema: &str) -> SqlResult<QualifiedTable> {
    let parts = name
        .0
        .iter()
        .map(|part| {
            part.as_ident()
                .map(normalize_ident)
                .ok_or_else(|| SqlError::UnsupportedTableSource(name.to_string()))
        })
        .collect::<SqlResult<Vec<_>>>()?;

    match parts.split_last() {
        Some((table, [])) => Ok(QualifiedTable {
            schema: default_schema.to_string(),
            table: table.clone(),
        }),
        Some((table, schema)) => Ok(QualifiedTable {
            schema: schema.join("."),
            table: table.clone(),
        }),
        None => Err(SqlError::UnsupportedTableSource(name.to_string())),
    }
}

/// Reference name of an unaliased base table.
pub fn unique_name(table: &QualifiedTable, default_schema: &str) -> String {
    if table.schema == default_schema {
        table.table.clone()
    } else {
        format!("{}.{}", table.schema, table.table)
    }
}

/// Resolve the FROM clause of `select`.
pub fn resolve_table_refs(select: &Select, default_schema: &str) -> SqlResult<TableRefs> {
    let mut refs = TableRefs::default();
    for table_with_joins in &select.from {
        collect_table_with_joins(table_with_joins, default_schema, &mut refs)?;
    }
    Ok(refs)
}

/// Resolve the FROM clause of the leftmost SELECT of `query`. Base references
/// naming one of the query's CTEs become derived references over the CTE body.
pub fn resolve_query_table_refs(query: &Query, default_schema: &str) -> SqlResult<TableRefs> {
    let select = leftmost_select(query).ok_or_else(|| {
        SqlError::UnsupportedStatement(format!("query without SELECT: {}", query))
    })?;
    let mut refs = resolve_table_refs(select, default_schema)?;

    if let Some(with) = &query.with {
        let ctes: HashMap<String, String> = with
            .cte_tables
            .iter()
            .map(|cte| (normalize_ident(&cte.alias.name), cte.query.to_string()))
            .collect();
        for table_ref in &mut refs.refs {
            let Some(table) = &table_ref.table else {
                continue;
            };
            if table.schema != default_schema {
                continue;
            }
            if let Some(body) = ctes.get(&table.table) {
                log::debug!("table reference {} names a CTE", table_ref.name);
                table_ref.kind = TableRefKind::Derived;
                table_ref.subquery = Some(body.clone());
                table_ref.table = None;
            }
        }
    }
    Ok(refs)
}

/// The SELECT whose projection determines the result columns of `query`.
pub fn leftmost_select(query: &Query) -> Option<&Select> {
    let mut body = query.body.as_ref();
    loop {
        match body {
            SetExpr::Select(select) => return Some(select),
            SetExpr::SetOperation { left, .. } => body = left.as_ref(),
            SetExpr::Query(inner) => body = inner.body.as_ref(),
            _ => return None,
        }
    }
}

fn collect_table_with_joins(
    table_with_joins: &TableWithJoins,
    default_schema: &str,
    refs: &mut TableRefs,
) -> SqlResult<()> {
    let first = refs.len();
    collect_table_factor(&table_with_joins.relation, default_schema, refs)?;
    for join in &table_with_joins.joins {
        let before = refs.len();
        collect_table_factor(&join.relation, default_schema, refs)?;
        if matches!(
            join_constraint(&join.join_operator),
            Some(JoinConstraint::Using(_) | JoinConstraint::Natural)
        ) {
            refs.merged_join_columns = true;
        }
        let outer = match outer_side(&join.join_operator) {
            Some(OuterSide::Right) => before..refs.len(),
            Some(OuterSide::Left) => first..before,
            Some(OuterSide::Both) => first..refs.len(),
            None => continue,
        };
        for table_ref in &mut refs.refs[outer] {
            table_ref.outer_joined = true;
        }
    }
    Ok(())
}

enum OuterSide {
    Left,
    Right,
    Both,
}

/// Which side of a join may be NULL-extended.
fn outer_side(operator: &JoinOperator) -> Option<OuterSide> {
    match operator {
        JoinOperator::Left(_) | JoinOperator::LeftOuter(_) => Some(OuterSide::Right),
        JoinOperator::Right(_) | JoinOperator::RightOuter(_) => Some(OuterSide::Left),
        JoinOperator::FullOuter(_) => Some(OuterSide::Both),
        _ => None,
    }
}

fn join_constraint(operator: &JoinOperator) -> Option<&JoinConstraint> {
    match operator {
        JoinOperator::Join(c)
        | JoinOperator::Inner(c)
        | JoinOperator::Left(c)
        | JoinOperator::LeftOuter(c)
        | JoinOperator::Right(c)
        | JoinOperator::RightOuter(c)
        | JoinOperator::FullOuter(c)
        | JoinOperator::CrossJoin(c)
        | JoinOperator::StraightJoin(c) => Some(c),
        JoinOperator::AsOf { constraint, .. } => Some(constraint),
        _ => None,
    }
}

fn alias_name(alias: &Option<TableAlias>) -> Option<String> {
    alias.as_ref().map(|a| normalize_ident(&a.name))
}

fn collect_table_factor(
    factor: &TableFactor,
    default_schema: &str,
    refs: &mut TableRefs,
) -> SqlResult<()> {
    match factor {
        TableFactor::Table {
            name, alias, args, ..
        } => {
            if args.is_some() {
                return Err(SqlError::UnsupportedTableSource(format!(
                    "table function {}",
                    factor
                )));
            }
            let table = qualify_object_name(name, default_schema)?;
            let ref_name = alias_name(alias).unwrap_or_else(|| unique_name(&table, default_schema));
            refs.push(TableRef {
                name: ref_name,
                kind: TableRefKind::Base,
                table: Some(table),
                subquery: None,
                outer_joined: false,
            })
        }
        TableFactor::Derived {
            subquery, alias, ..
        } => {
            let ref_name = alias_name(alias).ok_or_else(|| {
                SqlError::UnsupportedTableSource(format!("subquery without alias: ({})", subquery))
            })?;
            refs.push(TableRef {
                name: ref_name,
                kind: TableRefKind::Derived,
                table: None,
                subquery: Some(subquery.to_string()),
                outer_joined: false,
            })
        }
        TableFactor::NestedJoin {
            table_with_joins,
            alias,
        } => {
            if alias.is_some() {
                return Err(SqlError::UnsupportedTableSource(format!(
                    "aliased join {}",
                    factor
                )));
            }
            collect_table_with_joins(table_with_joins, default_schema, refs)
        }
        other => Err(SqlError::UnsupportedTableSource(other.to_string())),
    }
}

#[cfg(test)]
#[path = "table_refs_test.rs"]
mod tests;
