//! Wildcard expansion.
//!
//! [`expand_wildcards`] attributes the oracle's flat result fields to the
//! projection items that produced them: one field per expression, and one
//! contiguous [`WildcardSpan`] per table reference a wildcard covers.
//! [`rewrite_wildcards`] then replaces each wildcard in the statement text
//! with the explicit column list it stands for.

use crate::dialect::SqlDialect;
use crate::error::{SqlError, SqlResult};
use crate::table_refs::{
    leftmost_select, normalize_ident, qualify_object_name, unique_name, TableRefs,
};
use serde::Serialize;
use sqlparser::ast::{
    Expr, Query, Select, SelectItem, SelectItemQualifiedWildcardKind, Spanned,
    WildcardAdditionalOptions,
};
use sqlparser::keywords::{ALL_KEYWORDS, ALL_KEYWORDS_INDEX, RESERVED_FOR_COLUMN_ALIAS};
use sqlparser::tokenizer::Location;
use std::collections::HashMap;
use sw_core::ident::is_ident;

/// A run of result fields contributed by one wildcard for one table reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WildcardSpan {
    pub table_ref: String,
    /// Index of the first field in the result.
    pub offset: usize,
    pub count: usize,
    /// Index of the projection item holding the wildcard.
    pub item: usize,
}

impl WildcardSpan {
    pub fn end(&self) -> usize {
        self.offset + self.count
    }
}

/// A plain column reference in the projection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnRef {
    pub table_ref: String,
    pub column: String,
}

/// Where one result field comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldOrigin {
    Expr {
        item: usize,
        #[serde(skip_serializing_if = "Option::is_none")]
        column_ref: Option<ColumnRef>,
    },
    Wildcard {
        span: usize,
        /// Position within the span.
        index: usize,
    },
}

/// Result fields of a SELECT attributed to its projection.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FieldList {
    pub spans: Vec<WildcardSpan>,
    pub origins: Vec<FieldOrigin>,
}

impl FieldList {
    pub fn len(&self) -> usize {
        self.origins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.origins.is_empty()
    }

    pub fn has_wildcards(&self) -> bool {
        !self.spans.is_empty()
    }

    /// Table reference and position within its span of a field produced by a
    /// wildcard.
    pub fn wildcard_for(&self, field: usize) -> Option<(&str, usize)> {
        match self.origins.get(field)? {
            FieldOrigin::Wildcard { span, index } => {
                Some((self.spans[*span].table_ref.as_str(), *index))
            }
            FieldOrigin::Expr { .. } => None,
        }
    }

    /// Column reference of a field produced by a plain column expression.
    pub fn column_ref_for(&self, field: usize) -> Option<&ColumnRef> {
        match self.origins.get(field)? {
            FieldOrigin::Expr { column_ref, .. } => column_ref.as_ref(),
            FieldOrigin::Wildcard { .. } => None,
        }
    }
}

/// Attribute `total` result fields to `projection`.
///
/// `counts` holds the number of result fields each table reference yields for
/// a wildcard. A field count that does not add up to `total` is an internal
/// error: the oracle and the resolution disagree about the statement.
pub fn expand_wildcards(
    projection: &[SelectItem],
    refs: &TableRefs,
    counts: &HashMap<String, usize>,
    default_schema: &str,
    total: usize,
) -> SqlResult<FieldList> {
    let mut fields = FieldList::default();

    for (item_index, item) in projection.iter().enumerate() {
        match item {
            SelectItem::UnnamedExpr(expr) | SelectItem::ExprWithAlias { expr, .. } => {
                fields.origins.push(FieldOrigin::Expr {
                    item: item_index,
                    column_ref: column_ref(expr, refs),
                });
            }
            SelectItem::QualifiedWildcard(kind, options) => {
                check_options(item, options)?;
                let ref_name = wildcard_ref_name(kind, default_schema)?;
                if refs.get(&ref_name).is_none() {
                    return Err(SqlError::Internal(format!(
                        "wildcard {} names unknown table reference {:?}",
                        item, ref_name
                    )));
                }
                push_span(&mut fields, &ref_name, counts, item_index)?;
            }
            SelectItem::Wildcard(options) => {
                check_options(item, options)?;
                if refs.has_merged_join_columns() {
                    return Err(SqlError::WildcardOverMergedJoin(item.to_string()));
                }
                for table_ref in refs.iter() {
                    push_span(&mut fields, &table_ref.name, counts, item_index)?;
                }
            }
        }
    }

    if fields.len() != total {
        return Err(SqlError::Internal(format!(
            "projection yields {} fields but the query returns {}",
            fields.len(),
            total
        )));
    }
    Ok(fields)
}

fn push_span(
    fields: &mut FieldList,
    ref_name: &str,
    counts: &HashMap<String, usize>,
    item: usize,
) -> SqlResult<()> {
    let count = counts.get(ref_name).copied().unwrap_or(0);
    if count == 0 {
        return Err(SqlError::Internal(format!(
            "table reference {:?} has no result fields",
            ref_name
        )));
    }

    // Spans are appended at the end of the field list, so they never overlap.
    let offset = fields.origins.len();
    debug_assert!(fields.spans.last().into_iter().all(|prev| prev.end() <= offset));

    let span = fields.spans.len();
    fields.spans.push(WildcardSpan {
        table_ref: ref_name.to_string(),
        offset,
        count,
        item,
    });
    fields
        .origins
        .extend((0..count).map(|index| FieldOrigin::Wildcard { span, index }));
    Ok(())
}

fn check_options(item: &SelectItem, options: &WildcardAdditionalOptions) -> SqlResult<()> {
    if options.opt_ilike.is_some()
        || options.opt_exclude.is_some()
        || options.opt_except.is_some()
        || options.opt_replace.is_some()
        || options.opt_rename.is_some()
    {
        return Err(SqlError::UnsupportedWildcard(item.to_string()));
    }
    Ok(())
}

/// Reference name a qualified wildcard expands: a single-part qualifier is
/// the reference name itself, `schema.table.*` names a base table.
fn wildcard_ref_name(
    kind: &SelectItemQualifiedWildcardKind,
    default_schema: &str,
) -> SqlResult<String> {
    match kind {
        SelectItemQualifiedWildcardKind::ObjectName(name) => {
            if let [part] = name.0.as_slice() {
                if let Some(ident) = part.as_ident() {
                    return Ok(normalize_ident(ident));
                }
            }
            let table = qualify_object_name(name, default_schema)?;
            Ok(unique_name(&table, default_schema))
        }
        SelectItemQualifiedWildcardKind::Expr(expr) => Err(SqlError::UnsupportedWildcard(
            format!("{}.*", expr),
        )),
    }
}

fn column_ref(expr: &Expr, refs: &TableRefs) -> Option<ColumnRef> {
    match expr {
        Expr::Identifier(column) if refs.len() == 1 => {
            let table_ref = refs.iter().next()?;
            Some(ColumnRef {
                table_ref: table_ref.name.clone(),
                column: normalize_ident(column),
            })
        }
        Expr::CompoundIdentifier(parts) if parts.len() == 2 => {
            let table_ref = normalize_ident(&parts[0]);
            refs.get(&table_ref)?;
            Some(ColumnRef {
                table_ref,
                column: normalize_ident(&parts[1]),
            })
        }
        Expr::Nested(inner) => column_ref(inner, refs),
        _ => None,
    }
}

/// Replace every wildcard of `select` in `source` with the explicit columns
/// of the table references it covers.
///
/// `select` must have been parsed from `parsed`, a copy of `source` with the
/// same byte layout (such as the comment-blanked text). Positions are
/// resolved in `parsed`, whose characters are what the parser counted, and
/// the edits are applied to `source`. `columns` holds the column names of
/// every table reference named by a span in `fields`.
pub fn rewrite_wildcards(
    source: &str,
    parsed: &str,
    select: &Select,
    fields: &FieldList,
    columns: &HashMap<String, Vec<String>>,
    dialect: &dyn SqlDialect,
) -> SqlResult<String> {
    if !fields.has_wildcards() {
        return Ok(source.to_string());
    }
    if source.len() != parsed.len() {
        return Err(SqlError::Internal(format!(
            "parsed text has {} bytes but the source has {}",
            parsed.len(),
            source.len()
        )));
    }

    // (start, end, replacement) per wildcard item, in text order.
    let mut edits: Vec<(usize, usize, String)> = Vec::new();
    let mut spans = fields.spans.iter().peekable();
    while let Some(first) = spans.next() {
        let mut group = vec![first];
        while let Some(next) = spans.next_if(|s| s.item == first.item) {
            group.push(next);
        }

        let item = select.projection.get(first.item).ok_or_else(|| {
            SqlError::Internal(format!("wildcard item {} out of range", first.item))
        })?;
        let (start, end) = item_range(parsed, item)?;

        let mut list = Vec::new();
        for span in group {
            let names = columns.get(&span.table_ref).ok_or_else(|| {
                SqlError::Internal(format!("no columns for table reference {:?}", span.table_ref))
            })?;
            if names.len() != span.count {
                return Err(SqlError::Internal(format!(
                    "table reference {:?} has {} columns but its span has {}",
                    span.table_ref,
                    names.len(),
                    span.count
                )));
            }
            let qualifier = qualifier(&span.table_ref, dialect);
            list.extend(
                names
                    .iter()
                    .map(|name| format!("{}.{}", qualifier, quote_if_needed(name, dialect))),
            );
        }
        edits.push((start, end, list.join(", ")));
    }

    edits.sort_by_key(|(start, _, _)| *start);
    let mut out = String::with_capacity(source.len());
    let mut cursor = 0;
    for (start, end, replacement) in edits {
        if start < cursor {
            return Err(SqlError::Internal(format!(
                "overlapping wildcards at byte {}",
                start
            )));
        }
        out.push_str(&source[cursor..start]);
        out.push_str(&replacement);
        cursor = end;
    }
    out.push_str(&source[cursor..]);
    Ok(out)
}

/// Byte range of a wildcard item in `text`, checked against the item's own
/// spelling.
fn item_range(text: &str, item: &SelectItem) -> SqlResult<(usize, usize)> {
    let span = item.span();
    let start = byte_offset(text, span.start)
        .ok_or_else(|| SqlError::Internal(format!("no source location for {}", item)))?;
    let end = byte_offset(text, span.end)
        .ok_or_else(|| SqlError::Internal(format!("no source location for {}", item)))?;

    let expected = match item {
        SelectItem::QualifiedWildcard(SelectItemQualifiedWildcardKind::ObjectName(name), _) => {
            name.0
                .first()
                .and_then(|part| part.as_ident())
                .map(|ident| ident.value.clone())
                .unwrap_or_default()
        }
        _ => "*".to_string(),
    };

    let found = text.get(start..end).unwrap_or_default();
    let matches_start = found
        .trim_start_matches(['"', '`', '['])
        .starts_with(expected.as_str());
    if end <= start || !matches_start || !found.ends_with('*') {
        return Err(SqlError::Internal(format!(
            "wildcard {} not found at byte {} (found {:?})",
            item, start, found
        )));
    }
    Ok((start, end))
}

/// Convert a 1-based line and character column into a byte offset.
fn byte_offset(text: &str, location: Location) -> Option<usize> {
    if location.line == 0 || location.column == 0 {
        return None;
    }
    let mut line_start = 0;
    for _ in 1..location.line {
        line_start += text[line_start..].find('\n')? + 1;
    }
    let column = usize::try_from(location.column - 1).ok()?;
    let line = &text[line_start..];
    let within = line
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(line.len()))
        .nth(column)?;
    Some(line_start + within)
}

/// A table reference name as a column qualifier, e.g. `other.t` or `"T"`.
fn qualifier(ref_name: &str, dialect: &dyn SqlDialect) -> String {
    ref_name
        .split('.')
        .map(|part| quote_if_needed(part, dialect))
        .collect::<Vec<_>>()
        .join(".")
}

/// A query returning exactly the columns `ref_name.*` yields in `query`:
/// `[WITH ...] SELECT ref.* FROM <FROM clause of the leftmost SELECT>`.
///
/// The reference is resolved in the query's own context, so CTEs it depends
/// on and column alias lists apply.
pub fn ref_columns_sql(
    query: &Query,
    ref_name: &str,
    dialect: &dyn SqlDialect,
) -> SqlResult<String> {
    let select = leftmost_select(query)
        .ok_or_else(|| SqlError::Internal(format!("query without SELECT: {}", query)))?;
    if select.from.is_empty() {
        return Err(SqlError::Internal(format!(
            "table reference {:?} outside a FROM clause",
            ref_name
        )));
    }
    let with = query
        .with
        .as_ref()
        .map(|with| format!("{} ", with))
        .unwrap_or_default();
    let from = select
        .from
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    Ok(format!(
        "{}SELECT {}.* FROM {}",
        with,
        qualifier(ref_name, dialect),
        from
    ))
}

fn quote_if_needed(name: &str, dialect: &dyn SqlDialect) -> String {
    let upper = name.to_ascii_uppercase();
    let reserved = ALL_KEYWORDS
        .binary_search_by(|kw| (*kw).cmp(upper.as_str()))
        .is_ok_and(|i| RESERVED_FOR_COLUMN_ALIAS.contains(&ALL_KEYWORDS_INDEX[i]));
    if is_ident(name) && !reserved && name == name.to_lowercase() {
        name.to_string()
    } else {
        dialect.quote_ident(name)
    }
}

#[cfg(test)]
#[path = "wildcard_test.rs"]
mod tests;
