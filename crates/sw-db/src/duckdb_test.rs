use super::*;

fn oracle_with(ddl: &str) -> DuckDbOracle {
    let db = DuckDbOracle::in_memory().unwrap();
    db.execute_batch(ddl).unwrap();
    db
}

#[test]
fn test_in_memory() {
    let db = DuckDbOracle::new(":memory:").unwrap();
    assert_eq!(db.engine(), "duckdb");
}

#[test]
fn test_from_path() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("schema.duckdb");
    let db = DuckDbOracle::from_path(&path).unwrap();
    db.execute_batch("CREATE TABLE t (id INTEGER)").unwrap();
    assert_eq!(db.list_tables().unwrap().len(), 1);
}

#[test]
fn test_execute_reports_rows() {
    let db = oracle_with("CREATE TABLE t (id INTEGER)");
    assert_eq!(db.execute("INSERT INTO t VALUES (1), (2)").unwrap(), 2);
}

#[test]
fn test_execute_batch_error() {
    let db = DuckDbOracle::in_memory().unwrap();
    let err = db.execute_batch("CREATE TABLE (").unwrap_err();
    assert!(matches!(err, DbError::ExecutionError(_)));
}

#[test]
fn test_compile_describes_query() {
    let db = oracle_with("CREATE TABLE users (id INTEGER PRIMARY KEY, name VARCHAR NOT NULL)");
    let fields = db
        .compile("SELECT id, name, 1.5::DOUBLE AS ratio FROM users")
        .unwrap();
    let shape: Vec<(&str, &str)> = fields
        .iter()
        .map(|f| (f.name.as_str(), f.sql_type.as_str()))
        .collect();
    assert_eq!(
        shape,
        vec![("id", "INTEGER"), ("name", "VARCHAR"), ("ratio", "DOUBLE")]
    );
}

#[test]
fn test_compile_expands_star() {
    let db = oracle_with("CREATE TABLE a (x INTEGER, y INTEGER); CREATE TABLE b (z VARCHAR)");
    let fields = db.compile("SELECT * FROM a, b").unwrap();
    assert_eq!(fields.len(), 3);
}

#[test]
fn test_compile_unknown_table() {
    let db = DuckDbOracle::in_memory().unwrap();
    let err = db.compile("SELECT * FROM missing").unwrap_err();
    assert!(matches!(err, DbError::DescribeFailed { .. }));
}

#[test]
fn test_table_columns() {
    let db = oracle_with(
        "CREATE SEQUENCE user_ids;
         CREATE TABLE users (
             id INTEGER PRIMARY KEY DEFAULT nextval('user_ids'),
             email VARCHAR NOT NULL,
             nickname VARCHAR
         );",
    );
    let columns = db.table_columns("main", "users").unwrap();
    let names: Vec<&str> = columns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["id", "email", "nickname"]);

    assert!(columns[0].primary_key);
    assert!(columns[0].is_auto_increment());
    assert!(!columns[1].primary_key);
    assert!(!columns[1].nullable);
    assert!(columns[2].nullable);
    assert!(!columns[2].is_auto_increment());
}

#[test]
fn test_table_columns_composite_key() {
    let db = oracle_with("CREATE TABLE m (a INTEGER, b INTEGER, c INTEGER, PRIMARY KEY (a, b))");
    let columns = db.table_columns("main", "m").unwrap();
    let pk: Vec<&str> = columns
        .iter()
        .filter(|c| c.primary_key)
        .map(|c| c.name.as_str())
        .collect();
    assert_eq!(pk, vec!["a", "b"]);
}

#[test]
fn test_table_columns_missing_table() {
    let db = DuckDbOracle::in_memory().unwrap();
    let err = db.table_columns("main", "nope").unwrap_err();
    assert!(matches!(err, DbError::TableNotFound(_)));
}

#[test]
fn test_list_tables_sorted_without_views() {
    let db = oracle_with(
        "CREATE SCHEMA extra;
         CREATE TABLE zeta (id INTEGER);
         CREATE TABLE alpha (id INTEGER);
         CREATE TABLE extra.beta (id INTEGER);
         CREATE VIEW v AS SELECT * FROM alpha;",
    );
    let tables: Vec<(String, String)> = db
        .list_tables()
        .unwrap()
        .into_iter()
        .map(|t| (t.schema, t.name))
        .collect();
    assert_eq!(
        tables,
        vec![
            ("extra".to_string(), "beta".to_string()),
            ("main".to_string(), "alpha".to_string()),
            ("main".to_string(), "zeta".to_string()),
        ]
    );
}

#[test]
fn test_parse_uses_duckdb_dialect() {
    let db = DuckDbOracle::in_memory().unwrap();
    let statements = db.parse("SELECT 1; SELECT 2").unwrap();
    assert_eq!(statements.len(), 2);
    assert!(matches!(db.parse("SELEC"), Err(DbError::Sql(_))));
}
