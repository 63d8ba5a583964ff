//! Diagnostics threaded through the builder and translator.
//!
//! A [`Diagnostics`] list is owned by exactly one stage at a time: the
//! pipeline creates it, moves it into the builder, takes it back, moves it
//! into the translator, and finally hands it to the caller. Entries are only
//! ever appended, so discovery order is preserved end to end.

use crate::range::SourceRange;
use crate::tree::{PrintableAsTree, PrintableTree};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => f.write_str("warning"),
            Severity::Error => f.write_str("error"),
        }
    }
}

/// Which recoverable failure class a diagnostic belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// The dump contained a node kind the builder does not know.
    UnrecognizedConstruct,
    /// A known node kind had the wrong arity or attributes.
    MalformedConstruct,
    /// A Swift construct has no Kotlin equivalent.
    UntranslatableConstruct,
    /// The Kotlin output is valid but behaves differently from the Swift code.
    SemanticMismatch,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub kind: DiagnosticKind,
    pub message: String,
    pub range: Option<SourceRange>,
}

impl Diagnostic {
    pub fn new(
        severity: Severity,
        kind: DiagnosticKind,
        message: impl Into<String>,
        range: Option<SourceRange>,
    ) -> Self {
        Self {
            severity,
            kind,
            message: message.into(),
            range,
        }
    }

    pub fn unrecognized(node_kind: &str, range: Option<SourceRange>) -> Self {
        Self::new(
            Severity::Warning,
            DiagnosticKind::UnrecognizedConstruct,
            format!("unrecognized construct `{node_kind}`"),
            range,
        )
    }

    pub fn malformed(node_kind: &str, reason: &str, range: Option<SourceRange>) -> Self {
        Self::new(
            Severity::Error,
            DiagnosticKind::MalformedConstruct,
            format!("malformed `{node_kind}`: {reason}"),
            range,
        )
    }

    pub fn untranslatable(construct: &str, reason: &str, range: Option<SourceRange>) -> Self {
        Self::new(
            Severity::Error,
            DiagnosticKind::UntranslatableConstruct,
            format!("no Kotlin equivalent for {construct}: {reason}"),
            range,
        )
    }

    pub fn mismatch(message: impl Into<String>, range: Option<SourceRange>) -> Self {
        Self::new(
            Severity::Warning,
            DiagnosticKind::SemanticMismatch,
            message,
            range,
        )
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.range {
            Some(range) => write!(f, "{}: {}: {}", range, self.severity, self.message),
            None => write!(f, "{}: {}", self.severity, self.message),
        }
    }
}

/// Ordered, append-only list of diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        match diagnostic.severity {
            Severity::Error => tracing::warn!(%diagnostic, "translation error"),
            Severity::Warning => tracing::debug!(%diagnostic, "translation warning"),
        }
        self.items.push(diagnostic);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[Diagnostic] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Output with at least one error should be reviewed before use.
    pub fn has_errors(&self) -> bool {
        self.items.iter().any(Diagnostic::is_error)
    }

    pub fn error_count(&self) -> usize {
        self.items.iter().filter(|d| d.is_error()).count()
    }

    pub fn warning_count(&self) -> usize {
        self.items.len() - self.error_count()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.items
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl PrintableAsTree for Diagnostics {
    fn tree_label(&self) -> String {
        "Diagnostics".to_string()
    }

    fn printable_subtrees(&self) -> Vec<Option<PrintableTree>> {
        self.items
            .iter()
            .map(|d| Some(PrintableTree::leaf(d.to_string())))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range() -> Option<SourceRange> {
        Some(SourceRange::new("main.swift", 3, 5, 3, 9))
    }

    #[test]
    fn test_order_is_preserved() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.push(Diagnostic::unrecognized("a", None));
        diagnostics.push(Diagnostic::malformed("b", "missing `name`", None));
        diagnostics.push(Diagnostic::unrecognized("a", None));

        let messages: Vec<_> = diagnostics.iter().map(|d| d.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "unrecognized construct `a`",
                "malformed `b`: missing `name`",
                "unrecognized construct `a`",
            ]
        );
    }

    #[test]
    fn test_warnings_alone_are_usable() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.push(Diagnostic::unrecognized("FutureConstruct", range()));
        assert!(!diagnostics.has_errors());
        assert_eq!(diagnostics.warning_count(), 1);

        diagnostics.push(Diagnostic::untranslatable("defer", "no scope exit hook", range()));
        assert!(diagnostics.has_errors());
        assert_eq!(diagnostics.error_count(), 1);
    }

    #[test]
    fn test_display_with_and_without_range() {
        let with = Diagnostic::malformed("func_decl", "missing `name`", range());
        assert_eq!(
            with.to_string(),
            "main.swift:3:5: error: malformed `func_decl`: missing `name`"
        );

        let without = Diagnostic::unrecognized("FutureConstruct", None);
        assert_eq!(
            without.to_string(),
            "warning: unrecognized construct `FutureConstruct`"
        );
    }

    #[test]
    fn test_serializes_as_plain_list() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.push(Diagnostic::unrecognized("x", None));
        let json = serde_json::to_value(&diagnostics).unwrap();
        assert_eq!(json[0]["severity"], "warning");
        assert_eq!(json[0]["kind"], "unrecognized_construct");
    }
}
