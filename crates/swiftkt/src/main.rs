use clap::{Parser, Subcommand};
use std::path::PathBuf;
use swiftkt::commands::{translate, tree, update};
use swiftkt::config;
use tracing_subscriber::EnvFilter;

/// Translate Swift AST dumps into Kotlin source.
#[derive(Parser)]
#[command(name = "swiftkt", version, about)]
struct Cli {
    /// Log pipeline stages to stderr (overrides SWIFTKT_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Project root holding `.swiftkt/config.toml`
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Translate one dump to Kotlin
    Translate(translate::TranslateArgs),
    /// Print the raw, Swift or Kotlin tree for a dump
    Tree(tree::TreeArgs),
    /// Regenerate outdated `.kt` files next to their dumps
    Update(update::UpdateArgs),
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("SWIFTKT_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match config::load(&cli.root) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {:#}", anyhow::Error::from(e));
            std::process::exit(1);
        }
    };

    let code = match cli.command {
        Command::Translate(args) => translate::run(args, &config),
        Command::Tree(args) => tree::run(args, &config),
        Command::Update(args) => update::run(args, &config),
    };
    std::process::exit(code);
}
