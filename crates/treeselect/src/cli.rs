//! Command line entry point for replaying selection scripts.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};

use crate::app::replay::{self, ReplayFormat, Replayer};
use crate::app::selection::SelectionOptions;
use crate::infra::config::Config;
use crate::infra::outline::load_outline;

#[derive(Debug, Parser)]
#[command(author, version, about = "Replay tree selection scripts against an outline", long_about = None)]
pub struct Cli {
    /// Indented outline describing the tree.
    pub outline: PathBuf,
    /// Selection script to replay.
    pub script: PathBuf,
    /// Report format; falls back to the configured format.
    #[arg(long, value_enum)]
    pub format: Option<ReplayFormat>,
    /// Configuration file layered over the global and workspace files.
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Validate every selection invariant after each step.
    #[arg(long)]
    pub verify: bool,
    /// Increase log verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Load the outline and script, replay it, and print the report to stdout.
pub fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?;
    let mut options = SelectionOptions::from_config(&config);
    options.verify_invariants |= cli.verify;
    let format = match cli.format {
        Some(format) => format,
        None => config.replay.format().parse()?,
    };

    let tree = load_outline(&cli.outline)?;
    let script = fs::read_to_string(&cli.script)
        .with_context(|| format!("failed to read script file: {}", cli.script.display()))?;
    let steps = replay::parse_script(&script)
        .with_context(|| format!("invalid script file: {}", cli.script.display()))?;
    tracing::info!(steps = steps.len(), nodes = tree.node_count(), "replaying script");

    let mut replayer = Replayer::new(tree, options);
    let report = replayer.run(&steps)?;
    let rendered = replay::render(&report, format)?;

    let mut stdout = io::stdout().lock();
    write!(stdout, "{rendered}")?;
    if !rendered.ends_with('\n') {
        writeln!(stdout)?;
    }
    Ok(())
}
