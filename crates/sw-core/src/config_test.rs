use super::*;
use crate::column_type::ColumnType;

#[test]
fn test_parse_minimal_config() {
    let config: Config = serde_yaml::from_str("{}").unwrap();
    assert_eq!(config.ddl, vec!["ddl/*.sql"]);
    assert_eq!(config.dml, vec!["dml/*.sql"]);
    assert_eq!(config.default_schema, "main");
    assert_eq!(config.bind_name_prefix, ":");
    assert_eq!(config.annotation_marker, "$");
    assert_eq!(config.dialect, Dialect::DuckDb);
    assert!(config.use_null_time);
    assert_eq!(config.package_name().unwrap(), "generated");
}

#[test]
fn test_parse_full_config() {
    let yaml = r#"
ddl: ["schema/*.sql"]
dml: ["queries/*.sql", "more/*.sql"]
output_dir: out/models
dialect: mysql
default_schema: app
bind_name_prefix: "@"
use_null_time: false
type_overrides:
  decimal: github.com/shopspring/decimal.Decimal
template_dirs: [templates]
"#;
    let config: Config = serde_yaml::from_str(yaml).unwrap();
    config.validate().unwrap();
    assert_eq!(config.dml.len(), 2);
    assert_eq!(config.dialect, Dialect::MySql);
    assert_eq!(config.package_name().unwrap(), "models");
    assert_eq!(
        config.output_dir_absolute(Path::new("/p")),
        PathBuf::from("/p/out/models")
    );
}

#[test]
fn test_unknown_field_rejected() {
    let result: Result<Config, _> = serde_yaml::from_str("bogus: 1");
    assert!(result.is_err());
}

#[test]
fn test_package_must_be_ident() {
    let config = Config {
        output_dir: "gen-code".to_string(),
        ..Config::default()
    };
    assert!(matches!(
        config.validate(),
        Err(CoreError::ConfigInvalid { .. })
    ));

    let config = Config {
        package: Some("models".to_string()),
        ..config
    };
    assert_eq!(config.package_name().unwrap(), "models");
}

#[test]
fn test_bad_override_spec_rejected() {
    let mut config = Config::default();
    config
        .type_overrides
        .insert("decimal".to_string(), "pkg.".to_string());
    assert!(matches!(
        config.validate(),
        Err(CoreError::BadTypeSpec { .. })
    ));
}

#[test]
fn test_type_adapter_from_config() {
    let mut config = Config::default();
    config
        .type_overrides
        .insert("hugeint".to_string(), "math/big.Int".to_string());
    let adapter = config.type_adapter().unwrap();
    assert_eq!(adapter.hook_count(), 2);

    let ts = ColumnType::parse("TIMESTAMP NOT NULL").unwrap();
    assert_eq!(adapter.adapt(&ts).unwrap().spec(), "time.Time");
    let big = ColumnType::parse("HUGEINT").unwrap();
    assert_eq!(adapter.adapt(&big).unwrap().spec(), "math/big.Int");

    config.use_null_time = false;
    let adapter = config.type_adapter().unwrap();
    assert_eq!(adapter.adapt(&ts).unwrap().spec(), "string");
}

#[test]
fn test_load_from_dir() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::load_from_dir(dir.path()).unwrap();
    assert_eq!(config.output_dir, "generated");

    std::fs::write(dir.path().join("sqlwrap.yaml"), "output_dir: dao\n").unwrap();
    let config = Config::load_from_dir(dir.path()).unwrap();
    assert_eq!(config.package_name().unwrap(), "dao");
}

#[test]
fn test_load_missing_file() {
    let err = Config::load(Path::new("/nonexistent/sqlwrap.yml")).unwrap_err();
    assert!(matches!(err, CoreError::ConfigNotFound { .. }));
}
