//! End-to-end translation of one dump.

use crate::config::TranslateConfig;
use crate::diagnostics::Diagnostics;
use crate::input::{DumpSyntaxError, build_ast, parse_dump};
use crate::kotlin::TargetNode;
use crate::output::KotlinWriter;
use crate::swift::SourceNode;
use crate::translate::translate_ast;
use serde::Serialize;

/// Everything produced for one file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Translation {
    pub kotlin: String,
    pub diagnostics: Diagnostics,
    pub source_ast: SourceNode,
    pub target_ast: TargetNode,
}

impl Translation {
    /// Output with errors is advisory only.
    pub fn has_errors(&self) -> bool {
        self.diagnostics.has_errors()
    }
}

/// Parse, build, translate and print a dump.
///
/// Only a malformed dump is fatal. Every other problem is recorded in
/// [`Translation::diagnostics`] and the affected construct is replaced by a
/// placeholder.
pub fn translate(
    text: &str,
    file: &str,
    config: &TranslateConfig,
) -> Result<Translation, DumpSyntaxError> {
    let span = tracing::debug_span!("translate", file);
    let _guard = span.enter();

    let raw = parse_dump(text, file)?;
    tracing::debug!(kind = %raw.kind, children = raw.children.len(), "parsed dump");

    let mut diagnostics = Diagnostics::new();
    let source_ast = build_ast(raw, &mut diagnostics);
    tracing::debug!(diagnostics = diagnostics.len(), "built Swift AST");

    let target_ast = translate_ast(&source_ast, &config.translate, &mut diagnostics);
    tracing::debug!(diagnostics = diagnostics.len(), "translated to Kotlin AST");

    let kotlin = KotlinWriter::emit_with(&target_ast, &config.output);
    tracing::debug!(
        bytes = kotlin.len(),
        errors = diagnostics.error_count(),
        warnings = diagnostics.warning_count(),
        "generated Kotlin"
    );

    Ok(Translation {
        kotlin,
        diagnostics,
        source_ast,
        target_ast,
    })
}
