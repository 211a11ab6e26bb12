use super::*;
use minijinja::context;
use tempfile::TempDir;

fn renderer() -> Renderer {
    Renderer::new("models", &[]).unwrap()
}

#[test]
fn test_go_quote() {
    assert_eq!(go_quote("plain".to_string()), "\"plain\"");
    assert_eq!(
        go_quote("a \"b\"\n\tc\\".to_string()),
        "\"a \\\"b\\\"\\n\\tc\\\\\""
    );
    assert_eq!(go_quote("\u{1}".to_string()), "\"\\u0001\"");
    assert_eq!(go_quote("é".to_string()), "\"é\"");
}

#[test]
fn test_standalone_file_layout() {
    let out = renderer().render_file(&[("standalone", context! {})]).unwrap();
    let expected_start = format!(
        "{}\n\npackage models\n\nimport (\n\tcontext \"context\"\n\tsql \"database/sql\"\n\tsqlx \"github.com/jmoiron/sqlx\"\n)\n",
        GENERATED_HEADER
    );
    assert!(out.starts_with(&expected_start), "got:\n{}", out);
    assert!(out.contains("var BindType = sqlx.QUESTION"));
    assert!(out.ends_with("}\n"));
}

#[test]
fn test_each_file_gets_a_fresh_scope() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("standalone.go.j2"),
        "var X {{ type_name(\"github.com/x/time.T\") }}\nvar Y {{ type_name(\"time.Time\") }}\n",
    )
    .unwrap();
    let renderer = Renderer::new("models", &[dir.path().to_path_buf()]).unwrap();
    let first = renderer.render_file(&[("standalone", context! {})]).unwrap();
    assert!(first.contains("var X time.T"), "got:\n{}", first);
    assert!(first.contains("\ttime \"github.com/x/time\"\n"));
    assert!(first.contains("\ttime_1 \"time\"\n"));
    assert!(first.contains("var Y time_1.Time"));

    let second = renderer.render_file(&[("standalone", context! {})]).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_later_template_dir_wins() {
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();
    std::fs::write(first.path().join("standalone.go.j2"), "// first\n").unwrap();
    std::fs::write(second.path().join("standalone.go.j2"), "// second\n").unwrap();
    let renderer = Renderer::new(
        "models",
        &[first.path().to_path_buf(), second.path().to_path_buf()],
    )
    .unwrap();
    let out = renderer.render_file(&[("standalone", context! {})]).unwrap();
    assert_eq!(
        out,
        format!("{}\n\npackage models\n\n// second\n", GENERATED_HEADER)
    );
}

#[test]
fn test_bad_type_spec_is_a_template_error() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("standalone.go.j2"),
        "{{ type_name(\"\") }}",
    )
    .unwrap();
    let renderer = Renderer::new("models", &[dir.path().to_path_buf()]).unwrap();
    let err = renderer
        .render_file(&[("standalone", context! {})])
        .unwrap_err();
    assert!(matches!(err, GenError::Template { ref name, .. } if name == "standalone"));
}

#[test]
fn test_filters() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("standalone.go.j2"),
        "// {{ \"user_id\" | pascal }} {{ \"user_id\" | camel }} {{ \"a\\\"b\" | go_quote }}\n",
    )
    .unwrap();
    let renderer = Renderer::new("models", &[dir.path().to_path_buf()]).unwrap();
    let out = renderer.render_file(&[("standalone", context! {})]).unwrap();
    assert!(out.contains("// UserId userId \"a\\\"b\""), "got:\n{}", out);
}

fn poison(scope: &SharedScope) {
    let scope = Arc::clone(scope);
    std::thread::spawn(move || {
        let _guard = scope.lock().unwrap();
        panic!("render panicked");
    })
    .join()
    .unwrap_err();
}

#[test]
fn test_poisoned_scope_is_an_internal_error() {
    let renderer = renderer();
    poison(&renderer.scope);
    let err = renderer.render_file(&[("standalone", context! {})]).unwrap_err();
    assert!(matches!(err, GenError::Internal(_)));
    assert!(err.is_internal());
}

#[test]
fn test_template_functions_report_poisoned_scope() {
    let scope: SharedScope = Arc::new(Mutex::new(Scope::new()));
    poison(&scope);
    assert!(make_imp_fn(Arc::clone(&scope))("time".to_string()).is_err());
    assert!(make_type_name_fn(scope)("time.Time".to_string()).is_err());
}
