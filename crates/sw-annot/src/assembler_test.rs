use super::*;

fn registry() -> AnnotationRegistry {
    AnnotationRegistry::builtin().unwrap()
}

#[test]
fn test_get_user_wrapper() {
    let reg = registry();
    let mut asm = Assembler::new(&reg, "$", ":");
    let src = "/* $func:GetUser */ SELECT id FROM users WHERE id = /* $bind:id */ ? /* */";
    let desc = asm.assemble(src).unwrap();
    assert_eq!(desc.text, "SELECT id FROM users WHERE id = :id");
    assert_eq!(desc.function_name, "GetUser");
    assert!(desc.named);
    assert_eq!(desc.bindings, vec!["id"]);
    assert!(desc.in_bindings.is_empty());
    assert_eq!(desc.return_style, ReturnStyle::Unknown);
    assert_eq!(desc.source_text, src);
    assert_eq!(desc.comments.len(), 3);
}

#[test]
fn test_only_enclosed_placeholder_is_replaced() {
    let reg = registry();
    let mut asm = Assembler::new(&reg, "$", ":");
    let desc = asm
        .assemble("/* $func:GetUser */ SELECT id, /* $bind:id */ ? /* */ FROM users WHERE id = ?")
        .unwrap();
    assert_eq!(desc.text, "SELECT id, :id FROM users WHERE id = ?");
}

#[test]
fn test_args_subs_and_in_bindings() {
    let reg = registry();
    let mut asm = Assembler::new(&reg, "$", ":");
    let src = "\
-- $func:ListUsers return:many
-- $arg:ids type:[]int64
-- $arg:status
SELECT * FROM users
WHERE id IN (/* $bind:ids in */ 1 /* */)
  AND status = /* $bind:status */ 'x' /* */
  AND id IN (/* $bind:ids in */ 2 /* */)
/* $subs:\"ORDER BY id\" */;
";
    let desc = asm.assemble(src).unwrap();
    assert_eq!(desc.function_name, "ListUsers");
    assert_eq!(desc.return_style, ReturnStyle::Many);
    assert_eq!(desc.args.len(), 2);
    assert_eq!(desc.args[0].type_name.as_ref().unwrap().spec(), "[]int64");
    assert!(desc.args[1].type_name.is_none());
    assert_eq!(desc.bindings, vec!["ids", "status", "ids"]);
    assert_eq!(desc.in_bindings, vec![0, 2]);
    assert!(desc.has_in_binding());
    assert_eq!(
        desc.text,
        "SELECT * FROM users\nWHERE id IN (:ids)\n  AND status = :status\n  AND id IN (:ids)\nORDER BY id"
    );
}

#[test]
fn test_plain_comments_are_dropped() {
    let reg = registry();
    let mut asm = Assembler::new(&reg, "$", ":");
    let desc = asm.assemble("SELECT 1 /* just a note */ + 2 # tail\n").unwrap();
    assert_eq!(desc.text, "SELECT 1  + 2");
}

#[test]
fn test_missing_enclosure() {
    let reg = registry();
    let mut asm = Assembler::new(&reg, "$", ":");
    let err = asm
        .assemble("SELECT * FROM t WHERE id = /* $bind:id */ 1")
        .unwrap_err();
    assert!(matches!(err, AnnotError::MissingEnclosure { ref bind } if bind == "id"));
    assert_eq!(err.to_string(), r#"[A006] bind: "id" missing enclosure"#);
}

#[test]
fn test_anonymous_statements_are_numbered_per_assembler() {
    let reg = registry();
    let mut asm = Assembler::new(&reg, "$", ":");
    assert_eq!(asm.assemble("SELECT 1").unwrap().function_name, "NoName1");
    let second = asm.assemble("SELECT 2").unwrap();
    assert_eq!(second.function_name, "NoName2");
    assert!(!second.named);
    assert_eq!(asm.assemble("/* $func:F */ SELECT 3").unwrap().function_name, "F");
    assert_eq!(asm.assemble("SELECT 4").unwrap().function_name, "NoName3");

    let mut fresh = Assembler::new(&reg, "$", ":");
    assert_eq!(fresh.assemble("SELECT 1").unwrap().function_name, "NoName1");
}

#[test]
fn test_setting_changes_prefix_for_later_binds() {
    let reg = registry();
    let mut asm = Assembler::new(&reg, "$", ":");
    let desc = asm
        .assemble("SELECT /* $bind:a */ 1 /* */, /* $setting bindNamePrefix:@ */ /* $bind:b */ 2 /* */")
        .unwrap();
    assert_eq!(desc.text, "SELECT :a,  @b");
    assert_eq!(asm.bind_name_prefix(), "@");

    let desc = asm.assemble("SELECT /* $bind:c */ 3 /* */").unwrap();
    assert_eq!(desc.text, "SELECT @c");
}

#[test]
fn test_duplicate_func_rejected() {
    let reg = registry();
    let mut asm = Assembler::new(&reg, "$", ":");
    let err = asm.assemble("/* $func:A */ /* $func:B */ SELECT 1").unwrap_err();
    assert!(matches!(err, AnnotError::DuplicateFunc { .. }));
}

#[test]
fn test_custom_marker() {
    let reg = registry();
    let mut asm = Assembler::new(&reg, "@@", ":");
    let desc = asm.assemble("/* @@func:F */ /* $func:G */ SELECT 1").unwrap();
    assert_eq!(desc.function_name, "F");
}

#[test]
fn test_descriptor_serializes() {
    let reg = registry();
    let mut asm = Assembler::new(&reg, "$", ":");
    let desc = asm.assemble("/* $func:F return:one */ SELECT 1").unwrap();
    let json = serde_json::to_value(&desc).unwrap();
    assert_eq!(json["function_name"], "F");
    assert_eq!(json["return_style"], "one");
    assert_eq!(json["comments"][0]["annotation"]["kind"], "func");
}

#[test]
fn test_settings_only_statement() {
    let reg = registry();
    let mut asm = Assembler::new(&reg, "$", ":");
    let src = "/* $setting bindNamePrefix:@ */";
    let comments = asm.scan(src).unwrap();
    assert_eq!(comments.len(), 1);
    asm.apply_settings(&comments);
    assert_eq!(asm.bind_name_prefix(), "@");

    // Scanning alone does not consume an anonymous name.
    let desc = asm.assemble("SELECT 1").unwrap();
    assert_eq!(desc.function_name, "NoName1");
}
