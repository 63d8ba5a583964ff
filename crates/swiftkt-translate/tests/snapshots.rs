//! Snapshot tests for generated Kotlin.
//!
//! Each case translates a small dump and pins the full output.
//! Run `cargo insta review` to update snapshots after intentional changes.

use swiftkt_translate::{TranslateConfig, Translation, translate};

fn run(dump: &str) -> Translation {
    translate(dump, "main.swift", &TranslateConfig::default()).expect("dump should parse")
}

fn kotlin(dump: &str) -> String {
    let translation = run(dump);
    assert!(
        translation.diagnostics.is_empty(),
        "unexpected diagnostics: {:?}",
        translation.diagnostics
    );
    translation.kotlin
}

// ============================================================================
// Declarations
// ============================================================================

mod declarations {
    use super::*;

    #[test]
    fn raw_value_enum_and_switch() {
        insta::assert_snapshot!(kotlin(
            r#"(source_file
                 (enum_decl name="Direction" inherits="Int"
                   (enum_element_decl name="north")
                   (enum_element_decl name="south"))
                 (func_decl name="describe" result="String"
                   (parameter_list (parameter name="d" type="Direction" label="_"))
                   (brace_stmt
                     (switch_stmt (declref_expr name="d")
                       (case_stmt (implicit_member_expr name="north")
                         (brace_stmt (return_stmt (string_literal_expr value="up"))))
                       (case_stmt default
                         (brace_stmt (return_stmt (string_literal_expr value="down"))))))))"#
        ), @r#"
        enum class Direction(val rawValue: Int) {
            NORTH(0),
            SOUTH(1)
        }

        fun describe(d: Direction): String {
            when (d) {
                Direction.NORTH -> {
                    return "up"
                }
                else -> {
                    return "down"
                }
            }
        }
        "#);
    }

    #[test]
    fn associated_values_become_sealed_class() {
        insta::assert_snapshot!(kotlin(
            r#"(source_file
                 (enum_decl name="Shape"
                   (enum_element_decl name="circle"
                     (parameter_list (parameter name="radius" type="Double")))
                   (enum_element_decl name="empty")))"#
        ), @r#"
        sealed class Shape {
            data class Circle(val radius: Double) : Shape()

            object Empty : Shape()
        }
        "#);
    }

    #[test]
    fn struct_values_are_copied() {
        insta::assert_snapshot!(kotlin(
            r#"(source_file
                 (struct_decl name="Point" (var_decl name="x" type="Int"))
                 (var_decl name="a" type="Point"
                   (call_expr (declref_expr name="Point")
                     (argument label="x" (integer_literal_expr value=1))))
                 (var_decl name="b" let (declref_expr name="a")))"#
        ), @r#"
        data class Point(var x: Int)

        var a: Point = Point(x = 1)
        val b = a.copy()
        "#);
    }

    #[test]
    fn constructor_arguments_use_parameter_names() {
        insta::assert_snapshot!(kotlin(
            r#"(source_file
                 (class_decl name="Foo"
                   (var_decl name="value" type="Int")
                   (constructor_decl
                     (parameter_list (parameter name="value" label="from" type="Int"))
                     (brace_stmt)))
                 (var_decl name="f" let
                   (call_expr (declref_expr name="Foo")
                     (argument label="from" (integer_literal_expr value=1))))
                 (var_decl name="g" let
                   (call_expr (declref_expr name="Foo")
                     (argument label="bogus" (integer_literal_expr value=2)))))"#
        ), @r#"
        class Foo {
            var value: Int

            constructor(value: Int) {
            }
        }

        val f = Foo(value = 1)
        val g = Foo(2)
        "#);
    }

    #[test]
    fn case_arguments_use_field_names() {
        insta::assert_snapshot!(kotlin(
            r#"(source_file
                 (enum_decl name="Shape"
                   (enum_element_decl name="rect"
                     (parameter_list
                       (parameter name="w" label="width" type="Double")
                       (parameter name="h" label="_" type="Double"))))
                 (var_decl name="s" let
                   (call_expr (member_ref_expr name="rect" (declref_expr name="Shape"))
                     (argument label="width" (float_literal_expr value=2.0))
                     (argument (float_literal_expr value=3.0)))))"#
        ), @r#"
        sealed class Shape {
            data class Rect(val width: Double, val h: Double) : Shape()
        }

        val s = Shape.Rect(width = 2.0, h = 3.0)
        "#);
    }

    #[test]
    fn extension_methods_get_a_receiver() {
        insta::assert_snapshot!(kotlin(
            r#"(source_file
                 (extension_decl type="Int"
                   (func_decl name="doubled" result="Int"
                     (brace_stmt
                       (return_stmt
                         (binary_expr operator="*"
                           (declref_expr name="self")
                           (integer_literal_expr value=2)))))))"#
        ), @r#"
        fun Int.doubled(): Int {
            return this * 2
        }
        "#);
    }

    #[test]
    fn local_types_stay_in_their_function() {
        insta::assert_snapshot!(kotlin(
            r#"(source_file
                 (func_decl name="a"
                   (parameter_list (parameter name="s" type="String" label="_"))
                   (brace_stmt
                     (call_expr (declref_expr name="print")
                       (member_ref_expr name="count" (declref_expr name="s")))))
                 (func_decl name="b"
                   (brace_stmt
                     (call_expr (declref_expr name="print")
                       (member_ref_expr name="count" (declref_expr name="s")))))
                 (func_decl name="c"
                   (parameter_list (parameter name="s" type="String" label="_"))
                   (brace_stmt
                     (if_stmt (declref_expr name="flag")
                       (brace_stmt
                         (var_decl name="s" let (call_expr (declref_expr name="load")))
                         (call_expr (declref_expr name="print")
                           (member_ref_expr name="count" (declref_expr name="s")))))
                     (call_expr (declref_expr name="print")
                       (member_ref_expr name="count" (declref_expr name="s"))))))"#
        ), @r#"
        fun a(s: String) {
            println(s.length)
        }

        fun b() {
            println(s.size)
        }

        fun c(s: String) {
            if (flag) {
                val s = load()
                println(s.size)
            }
            println(s.length)
        }
        "#);
    }
}

// ============================================================================
// Statements
// ============================================================================

mod statements {
    use super::*;

    #[test]
    fn guard_let_and_interpolation() {
        insta::assert_snapshot!(kotlin(
            r#"(source_file
                 (func_decl name="greet"
                   (parameter_list (parameter name="name" type="String?" label="_"))
                   (brace_stmt
                     (guard_stmt
                       (optional_binding name="n" (declref_expr name="name"))
                       (brace_stmt (return_stmt)))
                     (call_expr (declref_expr name="print")
                       (interpolated_string_literal_expr
                         (string_literal_expr value="Hello, ")
                         (declref_expr name="n")
                         (string_literal_expr value="!"))))))"#
        ), @r#"
        fun greet(name: String?) {
            val n = name
            if (n == null) {
                return
            }
            println("Hello, $n!")
        }
        "#);
    }

    #[test]
    fn anonymous_closure_arguments() {
        insta::assert_snapshot!(kotlin(
            r#"(source_file
                 (var_decl name="doubled" let
                   (call_expr
                     (member_ref_expr name="map" (declref_expr name="numbers"))
                     (argument
                       (closure_expr
                         (binary_expr operator="*"
                           (declref_expr name="$0")
                           (integer_literal_expr value=2)))))))"#
        ), @"val doubled = numbers.map { it * 2 }");
    }

    #[test]
    fn do_catch_and_try() {
        insta::assert_snapshot!(kotlin(
            r#"(source_file
                 (func_decl name="load"
                   (brace_stmt
                     (do_catch_stmt
                       (brace_stmt
                         (var_decl name="data" let
                           (try_expr (call_expr (declref_expr name="read"))))
                         (call_expr (declref_expr name="print") (declref_expr name="data")))
                       (catch_stmt name="e" type="ParseError"
                         (brace_stmt
                           (call_expr (declref_expr name="print") (declref_expr name="e"))))
                       (catch_stmt
                         (brace_stmt
                           (call_expr (declref_expr name="print") (declref_expr name="error"))))))))"#
        ), @r#"
        fun load() {
            try {
                val data = read()
                println(data)
            } catch (e: ParseError) {
                println(e)
            } catch (error: Exception) {
                println(error)
            }
        }
        "#);
    }

    #[test]
    fn for_each_element_types() {
        insta::assert_snapshot!(kotlin(
            r#"(source_file
                 (func_decl name="total" result="Int"
                   (parameter_list (parameter name="words" type="[String]" label="_"))
                   (brace_stmt
                     (var_decl name="sum" (integer_literal_expr value=0))
                     (for_each_stmt variable="word" (declref_expr name="words")
                       (brace_stmt
                         (binary_expr operator="+="
                           (declref_expr name="sum")
                           (member_ref_expr name="count" (declref_expr name="word")))))
                     (return_stmt (declref_expr name="sum")))))"#
        ), @r#"
        fun total(words: MutableList<String>): Int {
            var sum = 0
            for (word in words) {
                sum += word.length
            }
            return sum
        }
        "#);
    }

    #[test]
    fn while_and_repeat_while() {
        insta::assert_snapshot!(kotlin(
            r#"(source_file
                 (func_decl name="countdown"
                   (parameter_list (parameter name="start" type="Int" label="_"))
                   (brace_stmt
                     (var_decl name="n" (declref_expr name="start"))
                     (while_stmt
                       (binary_expr operator=">" (declref_expr name="n") (integer_literal_expr value=0))
                       (brace_stmt
                         (binary_expr operator="-=" (declref_expr name="n") (integer_literal_expr value=1))))
                     (repeat_while_stmt
                       (brace_stmt
                         (binary_expr operator="+=" (declref_expr name="n") (integer_literal_expr value=1)))
                       (binary_expr operator="<" (declref_expr name="n") (integer_literal_expr value=3))))))"#
        ), @r#"
        fun countdown(start: Int) {
            var n = start
            while (n > 0) {
                n -= 1
            }
            do {
                n += 1
            } while (n < 3)
        }
        "#);
    }

    #[test]
    fn if_let_rebinding_smart_casts() {
        insta::assert_snapshot!(kotlin(
            r#"(source_file
                 (func_decl name="show"
                   (parameter_list (parameter name="name" type="String?" label="_"))
                   (brace_stmt
                     (if_stmt
                       (optional_binding name="name" (declref_expr name="name"))
                       (brace_stmt
                         (call_expr (declref_expr name="print")
                           (member_ref_expr name="count" (declref_expr name="name"))))
                       (brace_stmt
                         (call_expr (declref_expr name="print") (string_literal_expr value="none")))))))"#
        ), @r#"
        fun show(name: String?) {
            if (name != null) {
                println(name.length)
            } else {
                println("none")
            }
        }
        "#);
    }

    #[test]
    fn if_let_without_else_uses_safe_call() {
        insta::assert_snapshot!(kotlin(
            r#"(source_file
                 (func_decl name="greet"
                   (parameter_list (parameter name="user" type="String?" label="_"))
                   (brace_stmt
                     (if_stmt
                       (optional_binding name="u" (declref_expr name="user"))
                       (brace_stmt
                         (call_expr (declref_expr name="print") (declref_expr name="u")))))))"#
        ), @r#"
        fun greet(user: String?) {
            user?.let { u -> println(u) }
        }
        "#);
    }

    #[test]
    fn if_let_with_early_exit_binds_in_when() {
        insta::assert_snapshot!(kotlin(
            r#"(source_file
                 (func_decl name="pick" result="Int"
                   (brace_stmt
                     (if_stmt
                       (optional_binding name="v" (call_expr (declref_expr name="first")))
                       (brace_stmt (return_stmt (declref_expr name="v"))))
                     (if_stmt
                       (optional_binding name="v" (call_expr (declref_expr name="second")))
                       (brace_stmt (return_stmt (declref_expr name="v")))
                       (brace_stmt (call_expr (declref_expr name="print") (string_literal_expr value="none"))))
                     (return_stmt (integer_literal_expr value=0)))))"#
        ), @r#"
        fun pick(): Int {
            when (val v = first()) {
                null -> {
                }
                else -> {
                    return v
                }
            }
            when (val v = second()) {
                null -> {
                    println("none")
                }
                else -> {
                    return v
                }
            }
            return 0
        }
        "#);
    }

    #[test]
    fn guard_let_rebinding_smart_casts() {
        insta::assert_snapshot!(kotlin(
            r#"(source_file
                 (func_decl name="size" result="Int"
                   (parameter_list (parameter name="text" type="String?" label="_"))
                   (brace_stmt
                     (guard_stmt
                       (optional_binding name="text" (declref_expr name="text"))
                       (brace_stmt (return_stmt (integer_literal_expr value=0))))
                     (return_stmt (member_ref_expr name="count" (declref_expr name="text"))))))"#
        ), @r#"
        fun size(text: String?): Int {
            if (text == null) {
                return 0
            }
            return text.length
        }
        "#);
    }

    #[test]
    fn redeclared_guard_binding_is_renamed() {
        insta::assert_snapshot!(kotlin(
            r#"(source_file
                 (func_decl name="f" result="Int"
                   (brace_stmt
                     (var_decl name="x" let (integer_literal_expr value=1))
                     (guard_stmt
                       (optional_binding name="x" (call_expr (declref_expr name="maybe")))
                       (brace_stmt (return_stmt (integer_literal_expr value=0))))
                     (return_stmt (declref_expr name="x")))))"#
        ), @r#"
        fun f(): Int {
            val x = 1
            val x2 = maybe()
            if (x2 == null) {
                return 0
            }
            return x2
        }
        "#);
    }

    #[test]
    fn break_in_a_loop_inside_a_case_is_kept() {
        insta::assert_snapshot!(kotlin(
            r#"(source_file
                 (func_decl name="spin"
                   (parameter_list (parameter name="n" type="Int" label="_"))
                   (brace_stmt
                     (switch_stmt (declref_expr name="n")
                       (case_stmt (integer_literal_expr value=1)
                         (brace_stmt
                           (while_stmt (boolean_literal_expr value=true)
                             (brace_stmt (break_stmt)))
                           (break_stmt)))
                       (case_stmt default (brace_stmt (break_stmt)))))))"#
        ), @r#"
        fun spin(n: Int) {
            when (n) {
                1 -> {
                    while (true) {
                        break
                    }
                }
                else -> {
                }
            }
        }
        "#);
    }
}

// ============================================================================
// Expressions
// ============================================================================

mod expressions {
    use super::*;

    #[test]
    fn ternary_and_optional_try() {
        insta::assert_snapshot!(kotlin(
            r#"(source_file
                 (var_decl name="label" let
                   (ternary_expr
                     (declref_expr name="ok")
                     (string_literal_expr value="yes")
                     (string_literal_expr value="no")))
                 (var_decl name="parsed" let
                   (optional_try_expr (call_expr (declref_expr name="parse")))))"#
        ), @r#"
        val label = if (ok) "yes" else "no"
        val parsed = runCatching { parse() }.getOrNull()
        "#);
    }

    #[test]
    fn collection_literals_and_tuples() {
        insta::assert_snapshot!(kotlin(
            r#"(source_file
                 (var_decl name="ages" let
                   (dictionary_expr
                     (string_literal_expr value="ann") (integer_literal_expr value=31)
                     (string_literal_expr value="bo") (integer_literal_expr value=4)))
                 (var_decl name="pair" let
                   (tuple_expr (integer_literal_expr value=1) (string_literal_expr value="one")))
                 (var_decl name="triple" let
                   (tuple_expr
                     (integer_literal_expr value=1)
                     (integer_literal_expr value=2)
                     (integer_literal_expr value=3))))"#
        ), @r#"
        val ages = mutableMapOf("ann" to 31, "bo" to 4)
        val pair = Pair(1, "one")
        val triple = Triple(1, 2, 3)
        "#);
    }

    #[test]
    fn subscripts() {
        insta::assert_snapshot!(kotlin(
            r#"(source_file
                 (var_decl name="head" let
                   (subscript_expr (declref_expr name="items") (integer_literal_expr value=0)))
                 (var_decl name="entry" let
                   (optional_evaluation_expr
                     (subscript_expr
                       (bind_optional_expr (declref_expr name="table"))
                       (string_literal_expr value="k")))))"#
        ), @r#"
        val head = items[0]
        val entry = table?.get("k")
        "#);
    }

    #[test]
    fn casts() {
        insta::assert_snapshot!(kotlin(
            r#"(source_file
                 (var_decl name="a" let (coerce_expr type="Double" (declref_expr name="x")))
                 (var_decl name="b" let (conditional_checked_cast_expr type="String" (declref_expr name="x")))
                 (var_decl name="c" let (forced_checked_cast_expr type="[Int]" (declref_expr name="x")))
                 (var_decl name="d" let (is_expr type="Bool" (declref_expr name="x"))))"#
        ), @r#"
        val a = x as Double
        val b = x as? String
        val c = x as MutableList<Int>
        val d = x is Boolean
        "#);
    }
}

// ============================================================================
// Diagnostics
// ============================================================================

mod diagnostics {
    use super::*;

    #[test]
    fn untranslatable_defer() {
        let translation = run(
            r#"(source_file
                 (func_decl name="f"
                   (brace_stmt
                     (defer_stmt [main.swift:3:5 - line:3:20] (brace_stmt)))))"#,
        );
        insta::assert_json_snapshot!(translation.diagnostics, @r#"
        [
          {
            "severity": "error",
            "kind": "untranslatable_construct",
            "message": "no Kotlin equivalent for defer: Kotlin has no scope-exit statement; use try/finally",
            "range": {
              "file": "main.swift",
              "start_line": 3,
              "start_column": 5,
              "end_line": 3,
              "end_column": 20
            }
          }
        ]
        "#);
    }

    #[test]
    fn early_break_in_a_case() {
        let translation = run(
            r#"(source_file
                 (func_decl name="check"
                   (parameter_list (parameter name="n" type="Int" label="_"))
                   (brace_stmt
                     (switch_stmt (declref_expr name="n")
                       (case_stmt (integer_literal_expr value=0)
                         (brace_stmt
                           (if_stmt (declref_expr name="quiet")
                             (brace_stmt (break_stmt [main.swift:5:11 - line:5:15])))
                           (call_expr (declref_expr name="print") (string_literal_expr value="zero"))
                           (break_stmt)))))))"#,
        );
        insta::assert_snapshot!(translation.kotlin, @r#"
        fun check(n: Int) {
            when (n) {
                0 -> {
                    if (quiet) {
                        /* no Kotlin equivalent for `break` before the end of a switch case: a Kotlin `when` branch cannot be left early */
                    }
                    println("zero")
                }
            }
        }
        "#);
        insta::assert_json_snapshot!(translation.diagnostics, @r#"
        [
          {
            "severity": "error",
            "kind": "untranslatable_construct",
            "message": "no Kotlin equivalent for `break` before the end of a switch case: a Kotlin `when` branch cannot be left early",
            "range": {
              "file": "main.swift",
              "start_line": 5,
              "start_column": 11,
              "end_line": 5,
              "end_column": 15
            }
          }
        ]
        "#);
    }

    #[test]
    fn deeply_nested_dump_is_rejected() {
        let depth = 10_000;
        let dump = format!(
            "(source_file {}(integer_literal_expr value=1){})",
            "(paren_expr ".repeat(depth),
            ")".repeat(depth)
        );
        let err = translate(&dump, "main.swift", &TranslateConfig::default()).unwrap_err();
        assert!(err.message.contains("nested more than"));
    }
}
