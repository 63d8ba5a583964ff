//! Translate command - one dump to Kotlin.

use super::report_diagnostics;
use anyhow::Context;
use clap::Args;
use std::path::PathBuf;
use swiftkt_translate::{TranslateConfig, translate};

/// Translate command arguments
#[derive(Args)]
pub struct TranslateArgs {
    /// Swift AST dump to translate
    pub dump: PathBuf,

    /// Output file (stdout if not specified)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print a JSON report with the Kotlin and all diagnostics
    #[arg(long)]
    pub json: bool,
}

/// Run the translate command
pub fn run(args: TranslateArgs, config: &TranslateConfig) -> i32 {
    match translate_file(&args, config) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            1
        }
    }
}

fn translate_file(args: &TranslateArgs, config: &TranslateConfig) -> anyhow::Result<i32> {
    let text = std::fs::read_to_string(&args.dump)
        .with_context(|| format!("failed to read {}", args.dump.display()))?;
    let file = args.dump.display().to_string();

    let translation = match translate(&text, &file, config) {
        Ok(translation) => translation,
        Err(err) => {
            eprintln!("{file}: {err}");
            return Ok(1);
        }
    };
    let has_errors = translation.has_errors();

    if let Some(path) = &args.output {
        std::fs::write(path, &translation.kotlin)
            .with_context(|| format!("failed to write {}", path.display()))?;
    }

    if args.json {
        let report = serde_json::json!({
            "file": file,
            "kotlin": &translation.kotlin,
            "errors": translation.diagnostics.error_count(),
            "warnings": translation.diagnostics.warning_count(),
            "diagnostics": &translation.diagnostics,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        if args.output.is_none() {
            print!("{}", translation.kotlin);
        }
        report_diagnostics(&translation.diagnostics);
    }

    Ok(i32::from(has_errors))
}
