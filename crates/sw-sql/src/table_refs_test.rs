use super::*;
use crate::parser::SqlParser;
use sqlparser::ast::Statement;

fn query(sql: &str) -> Box<Query> {
    match SqlParser::duckdb().parse_single(sql).unwrap() {
        Statement::Query(q) => q,
        other => panic!("not a query: {other}"),
    }
}

fn refs(sql: &str) -> SqlResult<TableRefs> {
    resolve_query_table_refs(&query(sql), "main")
}

fn names(refs: &TableRefs) -> Vec<&str> {
    refs.iter().map(|r| r.name.as_str()).collect()
}

#[test]
fn test_single_table() {
    let refs = refs("SELECT * FROM users").unwrap();
    assert_eq!(names(&refs), vec!["users"]);
    let users = refs.get("users").unwrap();
    assert!(users.is_base());
    assert_eq!(
        users.table,
        Some(QualifiedTable {
            schema: "main".to_string(),
            table: "users".to_string()
        })
    );
}

#[test]
fn test_alias_wins_over_table_name() {
    let refs = refs("SELECT u.* FROM users AS u").unwrap();
    assert_eq!(names(&refs), vec!["u"]);
    assert!(refs.get("users").is_none());
}

#[test]
fn test_schema_qualified_outside_default() {
    let refs = refs("SELECT * FROM other.users, main.orders").unwrap();
    assert_eq!(names(&refs), vec!["other.users", "orders"]);
}

#[test]
fn test_join_order_is_left_to_right() {
    let refs = refs(
        "SELECT * FROM a JOIN (b JOIN c ON b.id = c.id) ON a.id = b.id LEFT JOIN d ON d.id = a.id",
    )
    .unwrap();
    assert_eq!(names(&refs), vec!["a", "b", "c", "d"]);
}

#[test]
fn test_unquoted_names_are_lowercased() {
    let refs = refs("SELECT * FROM Users AS U, \"Mixed\"").unwrap();
    assert_eq!(names(&refs), vec!["u", "Mixed"]);
}

#[test]
fn test_derived_table() {
    let refs = refs("SELECT * FROM (SELECT id FROM users) AS sub").unwrap();
    let sub = refs.get("sub").unwrap();
    assert!(sub.is_derived());
    assert!(refs.is_derived_table("sub"));
    assert!(!refs.is_base_table("sub"));
    assert_eq!(sub.subquery.as_deref(), Some("SELECT id FROM users"));
}

#[test]
fn test_duplicate_reference_rejected() {
    let err = refs("SELECT * FROM users, other.x AS users").unwrap_err();
    assert!(matches!(err, SqlError::DuplicateTableRef { ref name } if name == "users"));
}

#[test]
fn test_self_join_needs_aliases() {
    assert!(refs("SELECT * FROM users JOIN users ON true").is_err());
    let ok = refs("SELECT * FROM users a JOIN users b ON a.id = b.id").unwrap();
    assert_eq!(names(&ok), vec!["a", "b"]);
}

#[test]
fn test_cte_becomes_derived() {
    let refs = refs("WITH recent AS (SELECT id FROM users) SELECT * FROM recent").unwrap();
    let recent = refs.get("recent").unwrap();
    assert!(recent.is_derived());
    assert_eq!(recent.subquery.as_deref(), Some("SELECT id FROM users"));
}

#[test]
fn test_set_operation_uses_left_select() {
    let refs = refs("SELECT * FROM a UNION ALL SELECT * FROM b").unwrap();
    assert_eq!(names(&refs), vec!["a"]);
}

#[test]
fn test_no_from_clause() {
    let refs = refs("SELECT 1").unwrap();
    assert!(refs.is_empty());
}

#[test]
fn test_table_function_unsupported() {
    let err = refs("SELECT * FROM range(10)").unwrap_err();
    assert!(matches!(err, SqlError::UnsupportedTableSource(_)));
}

#[test]
fn test_outer_join_sides() {
    let joined = refs("SELECT * FROM a LEFT JOIN b ON a.id = b.id JOIN c ON c.id = a.id").unwrap();
    let outer: Vec<bool> = joined.iter().map(|r| r.outer_joined).collect();
    assert_eq!(outer, vec![false, true, false]);

    let joined = refs("SELECT * FROM a JOIN b ON a.id = b.id RIGHT JOIN c ON c.id = a.id").unwrap();
    let outer: Vec<bool> = joined.iter().map(|r| r.outer_joined).collect();
    assert_eq!(outer, vec![true, true, false]);

    let joined = refs("SELECT * FROM a FULL OUTER JOIN b ON a.id = b.id").unwrap();
    assert!(joined.iter().all(|r| r.outer_joined));
}

#[test]
fn test_merged_join_columns() {
    assert!(!refs("SELECT * FROM a JOIN b ON a.id = b.id").unwrap().has_merged_join_columns());
    assert!(refs("SELECT * FROM a JOIN b USING (id)").unwrap().has_merged_join_columns());
    assert!(refs("SELECT * FROM a NATURAL JOIN b").unwrap().has_merged_join_columns());
    assert!(refs("SELECT * FROM a LEFT JOIN b USING (id)").unwrap().has_merged_join_columns());
}

#[test]
fn test_unaliased_subquery_unsupported() {
    let err = refs("SELECT * FROM (SELECT 1)").unwrap_err();
    assert!(matches!(err, SqlError::UnsupportedTableSource(_)));
}
