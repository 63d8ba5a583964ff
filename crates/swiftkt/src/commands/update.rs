//! Update command - regenerate stale Kotlin files in place.

use super::report_diagnostics;
use crate::staleness;
use anyhow::Context;
use clap::Args;
use std::path::{Path, PathBuf};
use swiftkt_translate::{TranslateConfig, translate};

/// Update command arguments
#[derive(Args)]
pub struct UpdateArgs {
    /// Folders holding `.swiftASTDump` files
    #[arg(required = true)]
    pub folders: Vec<PathBuf>,
}

/// Run the update command
pub fn run(args: UpdateArgs, config: &TranslateConfig) -> i32 {
    let mut failed = false;
    for folder in &args.folders {
        match update_folder(folder, config) {
            Ok(clean) => failed |= !clean,
            Err(e) => {
                eprintln!("error: {e:#}");
                failed = true;
            }
        }
    }
    i32::from(failed)
}

/// Returns whether every file in the folder is now up to date and error free.
fn update_folder(folder: &Path, config: &TranslateConfig) -> anyhow::Result<bool> {
    let plan = staleness::plan(folder)
        .with_context(|| format!("failed to scan {}", folder.display()))?;
    let mut clean = true;

    for swift in &plan.needs_dump {
        eprintln!(
            "{} needs a new dump: run `swiftc -dump-ast` to update {}",
            swift.display(),
            staleness::change_extension(&swift.to_string_lossy(), staleness::DUMP_EXTENSION)
        );
        clean = false;
    }

    for (dump, kotlin) in &plan.outdated {
        println!("Updating {}...", kotlin.display());
        let text = std::fs::read_to_string(dump)
            .with_context(|| format!("failed to read {}", dump.display()))?;
        let file = dump.display().to_string();
        match translate(&text, &file, config) {
            Ok(translation) => {
                std::fs::write(kotlin, &translation.kotlin)
                    .with_context(|| format!("failed to write {}", kotlin.display()))?;
                report_diagnostics(&translation.diagnostics);
                clean &= !translation.has_errors();
            }
            Err(err) => {
                eprintln!("{file}: {err}");
                clean = false;
            }
        }
    }
    Ok(clean)
}
