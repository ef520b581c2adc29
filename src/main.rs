//! Thin CLI wrapper: validate a JSON container snapshot of a kana state.

use anyhow::Context;
use clap::Parser;
use colored::Colorize;
use kanacheck::core::snapshot;
use kanacheck::core::version::FormatVersion;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[clap(
    name = "kanacheck",
    version = env!("CARGO_PKG_VERSION"),
    about = "Validate a kana analysis state snapshot against its format schema"
)]
struct Cli {
    /// Path to a JSON container snapshot of the analysis state.
    snapshot: PathBuf,

    /// Format version of the state, e.g. "3.0.0".
    #[clap(long, default_value = "3.0.0")]
    format_version: String,

    /// Treat input file records as embedded (byte-offset addressed).
    #[clap(long)]
    embedded: bool,
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let version = FormatVersion::parse(&cli.format_version)
        .with_context(|| format!("invalid --format-version '{}'", cli.format_version))?;
    let text = fs::read_to_string(&cli.snapshot)
        .with_context(|| format!("failed to read {}", cli.snapshot.display()))?;
    let state = snapshot::parse_snapshot(&text)
        .with_context(|| format!("failed to parse {}", cli.snapshot.display()))?;
    kanacheck::validate(&state, cli.embedded, version.encoded())
        .context("state is not schema-valid")?;
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => {
            println!(
                "{} {} conforms to format version {}",
                "ok:".green().bold(),
                cli.snapshot.display(),
                cli.format_version
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{} {:#}", "error:".red().bold(), err);
            ExitCode::FAILURE
        }
    }
}
