//! End-to-end translation tests.
//!
//! Each test feeds a dump through [`translate`] and checks the generated
//! Kotlin and the diagnostics list together.

use std::collections::HashSet;
use swiftkt_translate::input::{constructor_for, constructors};
use swiftkt_translate::{
    KotlinWriter, NodeTag, Severity, SourceKind, TranslateConfig, Translation, parse_dump, translate,
};

fn run(dump: &str) -> Translation {
    translate(dump, "main.swift", &TranslateConfig::default()).expect("dump should parse")
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_minimal_function() {
    let translation = run(r#"(source_file (func_decl name="foo" (brace_stmt)))"#);
    assert_eq!(translation.kotlin, "fun foo() {\n}\n");
    assert!(translation.diagnostics.is_empty());
}

#[test]
fn test_unknown_construct_is_kept_as_comment() {
    let translation = run(
        r#"(source_file
             (func_decl name="f"
               (brace_stmt
                 (call_expr (declref_expr name="a"))
                 (FutureConstruct)
                 (call_expr (declref_expr name="b")))))"#,
    );
    assert_eq!(translation.diagnostics.len(), 1);
    let diagnostic = &translation.diagnostics.as_slice()[0];
    assert_eq!(diagnostic.severity, Severity::Warning);
    assert!(diagnostic.message.contains("FutureConstruct"));
    assert!(!translation.has_errors());

    assert!(translation.kotlin.contains("/* unrecognized construct: FutureConstruct */"));
    assert!(translation.kotlin.contains("    a()\n"));
    assert!(translation.kotlin.contains("    b()\n"));
}

#[test]
fn test_unbalanced_dump() {
    let dump = r#"(source_file (func_decl name="foo" (brace_stmt))"#;
    let err = translate(dump, "main.swift", &TranslateConfig::default()).unwrap_err();
    assert_eq!(err.offset, dump.len());
    assert_eq!(err.line, 1);
}

#[test]
fn test_malformed_node_is_contained() {
    let translation = run(
        r#"(source_file
             (func_decl name="a" (brace_stmt))
             (func_decl (brace_stmt))
             (func_decl name="c" (brace_stmt)))"#,
    );
    assert_eq!(translation.diagnostics.len(), 1);
    assert_eq!(translation.diagnostics.error_count(), 1);

    let SourceKind::File(items) = &translation.source_ast.kind else {
        panic!("expected a file");
    };
    let tags: Vec<NodeTag> = items.iter().map(|item| item.tag()).collect();
    assert_eq!(tags, vec![NodeTag::Function, NodeTag::Invalid, NodeTag::Function]);

    assert!(translation.kotlin.contains("fun a() {"));
    assert!(translation.kotlin.contains("invalid `func_decl`"));
    assert!(translation.kotlin.contains("fun c() {"));
}

#[test]
fn test_identifier_is_consistent() {
    let translation = run(
        r#"(source_file
             (func_decl name="when" (brace_stmt))
             (call_expr (declref_expr name="when")))"#,
    );
    assert!(translation.diagnostics.is_empty());
    assert_eq!(translation.kotlin.matches("`when`").count(), 2);
    assert!(translation.kotlin.contains("fun `when`() {"));
    assert!(translation.kotlin.contains("`when`()\n"));
}

#[test]
fn test_struct_becomes_data_class() {
    let translation = run(
        r#"(source_file
             (struct_decl name="Point"
               (var_decl name="x" type="Int" let)
               (var_decl name="y" type="Int")))"#,
    );
    assert!(translation.diagnostics.is_empty());
    assert_eq!(translation.kotlin, "data class Point(val x: Int, var y: Int)\n");
}

#[test]
fn test_untranslatable_is_an_error_with_placeholder() {
    let translation = run(
        r#"(source_file
             (func_decl name="f"
               (brace_stmt
                 (defer_stmt (brace_stmt))
                 (call_expr (declref_expr name="g")))))"#,
    );
    assert!(translation.has_errors());
    assert_eq!(translation.diagnostics.error_count(), 1);
    assert!(translation.kotlin.contains("/* no Kotlin equivalent for defer"));
    assert!(translation.kotlin.contains("    g()\n"));
}

// ============================================================================
// Properties
// ============================================================================

#[test]
fn test_generation_is_deterministic() {
    let dump = r#"(source_file
                    (func_decl name="f"
                      (brace_stmt
                        (binary_expr operator="*"
                          (paren_expr (binary_expr operator="+"
                            (declref_expr name="a")
                            (declref_expr name="b")))
                          (declref_expr name="c")))))"#;
    let first = run(dump);
    let second = run(dump);
    assert_eq!(first.kotlin, second.kotlin);
    assert_eq!(first.diagnostics, second.diagnostics);
    assert_eq!(KotlinWriter::emit(&first.target_ast), first.kotlin);
    assert_eq!(
        KotlinWriter::emit(&first.target_ast),
        KotlinWriter::emit(&first.target_ast)
    );
}

#[test]
fn test_reparse_is_idempotent() {
    let dump = r#"(source_file [main.swift:1:1 - line:3:1]
                    (var_decl name="greeting" type="String" let
                      (string_literal_expr value="hi \"there\"")))"#;
    let first = parse_dump(dump, "main.swift").unwrap();
    let second = parse_dump(dump, "main.swift").unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_every_tag_has_one_constructor() {
    let mut seen = HashSet::new();
    for constructor in constructors() {
        assert!(seen.insert(constructor.kind), "duplicate entry for {}", constructor.kind);
    }

    for &tag in NodeTag::ALL {
        if tag.is_placeholder() {
            assert!(tag.dump_kinds().is_empty());
            continue;
        }
        assert!(!tag.dump_kinds().is_empty(), "{tag:?} has no dump kind");
        for kind in tag.dump_kinds() {
            let constructor = constructor_for(kind).unwrap_or_else(|| panic!("no constructor for {kind}"));
            assert_eq!(constructor.tag, Some(tag), "{kind} builds the wrong tag");
        }
    }

    for constructor in constructors() {
        if let Some(tag) = constructor.tag {
            assert!(tag.dump_kinds().contains(&constructor.kind));
        }
    }
}
