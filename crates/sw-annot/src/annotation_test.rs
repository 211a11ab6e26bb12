use super::*;

fn registry() -> AnnotationRegistry {
    AnnotationRegistry::builtin().unwrap()
}

#[test]
fn test_parse_func() {
    let annot = registry().parse("func:GetUser return:one").unwrap();
    assert_eq!(
        annot,
        Annotation::Func(FuncAnnotation {
            name: "GetUser".to_string(),
            return_style: ReturnStyle::One,
        })
    );
}

#[test]
fn test_parse_arg_and_param_alias() {
    let reg = registry();
    let arg = reg.parse("arg:id type:database/sql.NullInt64").unwrap();
    let param = reg.parse("param:id type:database/sql.NullInt64").unwrap();
    assert_eq!(arg, param);
    match arg {
        Annotation::Arg(a) => {
            assert_eq!(a.name, "id");
            assert_eq!(a.type_name.unwrap().namespace, "database/sql");
        }
        other => panic!("expected arg, got {other:?}"),
    }
}

#[test]
fn test_parse_bind_flag() {
    let annot = registry().parse("bind:ids in").unwrap();
    assert_eq!(
        annot,
        Annotation::Bind(BindAnnotation {
            name: "ids".to_string(),
            multi: true,
        })
    );
}

#[test]
fn test_parse_setting() {
    let annot = registry().parse("setting bindNamePrefix:@").unwrap();
    assert_eq!(
        annot,
        Annotation::Setting(SettingAnnotation {
            bind_name_prefix: Some("@".to_string()),
        })
    );
    assert!(registry().parse("setting:x").is_err());
    assert!(registry().parse("setting bindNamePrefix").is_err());
}

#[test]
fn test_escape_fidelity() {
    let reg = registry();
    let subs = |src: &str| match reg.parse(src).unwrap() {
        Annotation::Subs(s) => s.content,
        other => panic!("expected subs, got {other:?}"),
    };
    assert_eq!(subs(r#"subs:"a\cb""#), "acb");
    assert_eq!(subs(r#"subs:"a\nb""#), "a\nb");
    assert_eq!(subs(r#"subs:"tab\there \"q\" \\""#), "tab\there \"q\" \\");
    assert_eq!(subs(r#"subs:"a:b c""#), "a:b c");
    assert_eq!(subs("subs"), "");
}

#[test]
fn test_whitespace_between_pairs() {
    let annot = registry().parse("  func:F \t\n return:many  ").unwrap();
    assert!(matches!(
        annot,
        Annotation::Func(FuncAnnotation {
            return_style: ReturnStyle::Many,
            ..
        })
    ));
}

#[test]
fn test_unknown_annotation() {
    let err = registry().parse("select:x").unwrap_err();
    assert!(matches!(err, AnnotError::UnknownAnnotation { ref key } if key == "select"));
}

#[test]
fn test_unknown_option() {
    let err = registry().parse("func:F colour:red").unwrap_err();
    assert_eq!(err.to_string(), r#"[A005] func: unknown option "colour""#);

    let err = registry().parse("bind:x slice").unwrap_err();
    assert!(err.to_string().contains("bind: unknown option"));
}

#[test]
fn test_invalid_values() {
    let reg = registry();
    assert_eq!(
        reg.parse("func").unwrap_err().to_string(),
        "[A005] func: missing func name"
    );
    assert!(reg.parse("func:1abc").is_err());
    assert!(reg.parse("func:F return:all").is_err());
    assert!(reg.parse("arg:x type:pkg.").is_err());
    assert!(reg.parse("bind:\"a b\"").is_err());
}

#[test]
fn test_illegal_format() {
    let reg = registry();
    assert!(matches!(
        reg.parse("func:F:G"),
        Err(AnnotError::IllegalFormat { .. })
    ));
    assert!(matches!(
        reg.parse(r#"subs:"unterminated"#),
        Err(AnnotError::IllegalFormat { .. })
    ));
    assert!(matches!(reg.parse(""), Err(AnnotError::IllegalFormat { .. })));
    assert!(matches!(
        reg.parse("_x"),
        Err(AnnotError::IllegalFormat { ref near }) if near == "_x"
    ));
}

#[test]
fn test_duplicate_registration() {
    let mut reg = registry();
    let err = reg.register("func", boxed::<FuncAnnotation>).unwrap_err();
    assert!(matches!(err, AnnotError::DuplicateRegistration { .. }));
}

#[test]
fn test_custom_registry() {
    let mut reg = AnnotationRegistry::new();
    reg.register("fn", boxed::<FuncAnnotation>).unwrap();
    assert!(matches!(reg.parse("fn:Short").unwrap(), Annotation::Func(_)));
    assert!(reg.parse("func:Long").is_err());
    assert_eq!(reg.keys().collect::<Vec<_>>(), vec!["fn"]);
}

#[test]
fn test_format_then_parse_is_idempotent() {
    let reg = registry();
    let sources = [
        "func:GetUser",
        "func:ListUsers return:many",
        "arg:limit type:int64",
        "param:at type:github.com/go-sql-driver/mysql.NullTime",
        "bind:ids in",
        r#"subs:"ORDER BY id DESC""#,
        r#"subs:"line\none \"q\"""#,
        "subs",
        "setting bindNamePrefix:@",
        "setting",
    ];
    for src in sources {
        let parsed = reg.parse(src).unwrap();
        let formatted = parsed.to_string();
        let reparsed = reg.parse(&formatted).unwrap();
        assert_eq!(parsed, reparsed, "{src} -> {formatted}");
    }
}
