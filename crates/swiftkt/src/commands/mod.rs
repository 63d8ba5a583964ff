//! CLI command implementations - one command per file.

pub mod translate;
pub mod tree;
pub mod update;

use swiftkt_translate::Diagnostics;

/// Print diagnostics to stderr, one per line.
pub(crate) fn report_diagnostics(diagnostics: &Diagnostics) {
    for diagnostic in diagnostics {
        eprintln!("{diagnostic}");
    }
}
