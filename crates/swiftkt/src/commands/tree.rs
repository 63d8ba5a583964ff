//! Tree command - print one stage of the pipeline as a tree.

use super::report_diagnostics;
use crate::labels::expand_kinds;
use anyhow::Context;
use clap::{Args, ValueEnum};
use std::path::PathBuf;
use swiftkt_translate::{
    Diagnostics, PrintableAsTree, TranslateConfig, build_ast, parse_dump, render_tree,
    render_tree_with_limit, translate,
};

/// Tree command arguments
#[derive(Args)]
pub struct TreeArgs {
    /// Swift AST dump to read
    pub dump: PathBuf,

    /// Which tree to print
    #[arg(long, value_enum, default_value = "swift")]
    pub stage: Stage,

    /// Spell out abbreviated dump kinds (`func_decl` -> `Function Declaration`)
    #[arg(long)]
    pub expand: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Stage {
    /// The dump as parsed, before any interpretation
    Raw,
    /// The typed Swift AST
    Swift,
    /// The Kotlin AST
    Kotlin,
}

/// Run the tree command
pub fn run(args: TreeArgs, config: &TranslateConfig) -> i32 {
    match print_tree(&args, config) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            1
        }
    }
}

fn print_tree(args: &TreeArgs, config: &TranslateConfig) -> anyhow::Result<i32> {
    let text = std::fs::read_to_string(&args.dump)
        .with_context(|| format!("failed to read {}", args.dump.display()))?;
    let file = args.dump.display().to_string();

    let rendered = match args.stage {
        Stage::Raw | Stage::Swift => {
            let raw = match parse_dump(&text, &file) {
                Ok(raw) => raw,
                Err(err) => {
                    eprintln!("{file}: {err}");
                    return Ok(1);
                }
            };
            if args.stage == Stage::Raw {
                let raw = if args.expand { expand_kinds(raw) } else { raw };
                render(&raw, config)
            } else {
                let mut diagnostics = Diagnostics::new();
                let ast = build_ast(raw, &mut diagnostics);
                report_diagnostics(&diagnostics);
                render(&ast, config)
            }
        }
        Stage::Kotlin => match translate(&text, &file, config) {
            Ok(translation) => {
                report_diagnostics(&translation.diagnostics);
                render(&translation.target_ast, config)
            }
            Err(err) => {
                eprintln!("{file}: {err}");
                return Ok(1);
            }
        },
    };
    print!("{rendered}");
    Ok(0)
}

fn render(node: &dyn PrintableAsTree, config: &TranslateConfig) -> String {
    match config.tree.limit() {
        Some(limit) => render_tree_with_limit(node, limit),
        None => render_tree(node),
    }
}
