use super::*;

fn plain(offset: usize, length: usize, content: &str) -> Comment {
    Comment {
        offset,
        length,
        content: content.to_string(),
        annotation: None,
    }
}

#[test]
fn test_hash_comment_includes_newline() {
    let comments = scan_comments("# abc \nx").unwrap();
    assert_eq!(comments, vec![plain(0, 7, "abc")]);
}

#[test]
fn test_block_comment() {
    let comments = scan_comments("/* abc * */").unwrap();
    assert_eq!(comments, vec![plain(0, 11, "abc *")]);

    let comments = scan_comments("/**/").unwrap();
    assert_eq!(comments, vec![plain(0, 4, "")]);
}

#[test]
fn test_dash_comment_needs_whitespace() {
    let comments = scan_comments("SELECT 1 -- note\n").unwrap();
    assert_eq!(comments, vec![plain(9, 8, "note")]);

    let comments = scan_comments("SELECT 1--2").unwrap();
    assert!(comments.is_empty());

    let comments = scan_comments("SELECT 1 --").unwrap();
    assert_eq!(comments, vec![plain(9, 2, "")]);
}

#[test]
fn test_comment_at_end_without_newline() {
    let comments = scan_comments("x # tail").unwrap();
    assert_eq!(comments, vec![plain(2, 6, "tail")]);
}

#[test]
fn test_unterminated_block() {
    assert!(matches!(
        scan_comments("/*"),
        Err(AnnotError::MissingBlockEnd { offset: 0 })
    ));
    assert!(matches!(
        scan_comments("x /*/"),
        Err(AnnotError::MissingBlockEnd { offset: 2 })
    ));
    assert!(matches!(
        scan_comments("/* a *"),
        Err(AnnotError::MissingBlockEnd { .. })
    ));
}

#[test]
fn test_string_literals_are_skipped() {
    assert!(scan_comments("'/* x */'").unwrap().is_empty());
    assert!(scan_comments(r#"SELECT "a -- b", 'c # d'"#).unwrap().is_empty());
    assert!(scan_comments(r"SELECT 'it\'s /* no */'").unwrap().is_empty());

    let comments = scan_comments("SELECT '#' /* yes */").unwrap();
    assert_eq!(comments, vec![plain(11, 9, "yes")]);
}

#[test]
fn test_unterminated_string() {
    assert!(matches!(
        scan_comments("SELECT 'abc"),
        Err(AnnotError::BadStringLiteral { offset: 7 })
    ));
    assert!(matches!(
        scan_comments(r#"SELECT "abc\""#),
        Err(AnnotError::BadStringLiteral { .. })
    ));
}

#[test]
fn test_multiple_comments_in_order() {
    let src = "/* $func:A */ SELECT 1 # one\n-- two\n";
    let comments = scan_comments(src).unwrap();
    let contents: Vec<&str> = comments.iter().map(|c| c.content.as_str()).collect();
    assert_eq!(contents, vec!["$func:A", "one", "two"]);
    assert_eq!(comments[1].end(), comments[2].offset);
}

#[test]
fn test_scan_annotated() {
    let registry = AnnotationRegistry::builtin().unwrap();
    let comments = scan_annotated("/* $func:GetUser */ SELECT 1 /* plain */", &registry, "$")
        .unwrap();
    assert!(matches!(comments[0].annotation, Some(Annotation::Func(_))));
    assert!(comments[1].annotation.is_none());

    let err = scan_annotated("/* $nope */", &registry, "$").unwrap_err();
    assert!(matches!(err, AnnotError::UnknownAnnotation { .. }));
}

#[test]
fn test_split_statements() {
    let src = "SELECT 1;\n/* ; */ SELECT ';' ;\n-- trailing ;\n  \n;";
    let statements = split_statements(src).unwrap();
    assert_eq!(statements.len(), 3);
    assert_eq!(statements[0], "SELECT 1");
    assert_eq!(statements[1], "\n/* ; */ SELECT ';' ");
    assert_eq!(statements[2], "\n-- trailing ;\n  \n");
}

#[test]
fn test_split_without_trailing_semicolon() {
    let statements = split_statements("SELECT 1; SELECT 2").unwrap();
    assert_eq!(statements, vec!["SELECT 1", " SELECT 2"]);
    assert!(split_statements("  ").unwrap().is_empty());
}

#[test]
fn test_blank_comments_keeps_positions() {
    let src = "SELECT a, # x\n b /* é */ FROM t";
    let comments = scan_comments(src).unwrap();
    let blanked = blank_comments(src, &comments);
    assert_eq!(blanked.len(), src.len());
    assert_eq!(blanked.lines().count(), src.lines().count());
    assert!(!blanked.contains('#'));
    assert!(!blanked.contains("/*"));
    assert_eq!(blanked.find("FROM"), src.find("FROM"));
}

fn engine(src: &str) -> String {
    let registry = AnnotationRegistry::builtin().unwrap();
    let comments = scan_annotated(src, &registry, "$").unwrap();
    engine_text(src, &comments)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[test]
fn test_engine_text_nulls_placeholders() {
    assert_eq!(
        engine("SELECT id FROM users /* é */ WHERE id = /* $bind:id */ ? /* */"),
        "SELECT id FROM users WHERE id = NULL"
    );
    assert_eq!(
        engine("SELECT 1 WHERE a = /* $bind:a */ :a /* */ AND b = /* $bind:b */ $2 /* */"),
        "SELECT 1 WHERE a = NULL AND b = NULL"
    );
    assert_eq!(
        engine("SELECT 1 WHERE id IN (/* $bind:ids in */ ?, ? /* */)"),
        "SELECT 1 WHERE id IN ( NULL )"
    );
}

#[test]
fn test_engine_text_keeps_literal_enclosures() {
    assert_eq!(
        engine("SELECT /* $bind:n */ 42 /* */ AS n, /* $bind:s */ 'x' /* */ AS s"),
        "SELECT 42 AS n, 'x' AS s"
    );
}

#[test]
fn test_engine_text_without_enclosure() {
    assert_eq!(engine("SELECT 1 /* $bind:id */"), "SELECT 1");
}
