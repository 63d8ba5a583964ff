//! Translation of Swift AST dumps into Kotlin source.
//!
//! `swiftkt-translate` reads the S-expression dump printed by the Swift
//! front end (`swiftc -dump-ast`), rebuilds it as a typed Swift AST, rewrites
//! that into a Kotlin AST and prints it. Nothing here touches the file
//! system; the `swiftkt` CLI does that.
//!
//! # Architecture
//!
//! ```text
//!  dump text        RawNode        SourceNode         TargetNode        Kotlin
//! ───────────    ────────────    ─────────────    ──────────────    ──────────
//!  (a (b c))  ─>  input::dump ─>  input::builder ─>  translate  ─>  output::kotlin
//!                      │                │                 │
//!                      └── DumpSyntaxError (fatal)        │
//!                                       └──── Diagnostics ┘
//! ```
//!
//! Every stage after parsing recovers locally: unknown or malformed nodes and
//! constructs with no Kotlin form become placeholders plus a [`Diagnostic`].
//!
//! # Example
//!
//! ```
//! use swiftkt_translate::{TranslateConfig, translate};
//!
//! let dump = r#"(source_file (func_decl name="foo" (brace_stmt)))"#;
//! let translation = translate(dump, "main.swift", &TranslateConfig::default()).unwrap();
//! assert_eq!(translation.kotlin, "fun foo() {\n}\n");
//! assert!(translation.diagnostics.is_empty());
//! ```
//!
//! Every tree type implements [`PrintableAsTree`], so any stage can be
//! inspected with [`render_tree`].

pub mod config;
pub mod diagnostics;
pub mod input;
pub mod kotlin;
pub mod output;
pub mod pipeline;
pub mod range;
pub mod swift;
pub mod translate;
pub mod tree;

pub use config::{OutputConfig, TranslateConfig, TranslateOptions, TreeConfig};
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics, Severity};
pub use input::{DumpParser, DumpSyntaxError, RawNode, build_ast, parse_dump};
pub use kotlin::{TargetKind, TargetNode};
pub use output::KotlinWriter;
pub use pipeline::{Translation, translate};
pub use range::SourceRange;
pub use swift::{NodeTag, SourceKind, SourceNode};
pub use translate::translate_ast;
pub use tree::{PrintableAsTree, PrintableTree, render_tree, render_tree_with_limit};
