//! Command-line plumbing shared by the binaries

use crate::blockchain::{evaluate_blocks, ConsensusParams, OrphanPolicy, SelectionPolicy};
use crate::config::{load_config, KeyEncoding, OutputFormat};
use crate::error::Result;
use crate::persistence::load_block_files;
use crate::report;
use clap::Parser;
use log::info;
use std::path::PathBuf;

/// Reads block files and prints the balance of every public key on the
/// longest valid chain.
#[derive(Debug, Parser)]
#[command(name = "balances", author, version, about, long_about = None)]
pub struct BalancesArgs {
    /// Block files, one encoded block each
    #[arg(required = true, value_name = "BLOCK_FILES")]
    pub files: Vec<PathBuf>,

    /// Configuration file (defaults to ./chainbalances.toml when present)
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// How the longest chain is chosen
    #[arg(long, value_enum)]
    pub selection: Option<SelectionPolicy>,

    /// What happens to blocks with an unknown parent
    #[arg(long, value_enum)]
    pub orphans: Option<OrphanPolicy>,

    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    #[arg(long, value_enum)]
    pub key_encoding: Option<KeyEncoding>,

    /// Increase log verbosity (repeatable)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Initialises `env_logger` on stderr. `RUST_LOG` wins over `verbose`.
pub fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

/// Loads config and blocks, runs the engine, and renders the report.
pub fn run_balances(args: &BalancesArgs, params: &ConsensusParams) -> Result<String> {
    let config = load_config(args.config.as_deref())?;

    let mut options = config.engine_options();
    if let Some(selection) = args.selection {
        options.selection = selection;
    }
    if let Some(orphans) = args.orphans {
        options.orphans = orphans;
    }
    let format = args.format.unwrap_or(config.output.format);
    let key_encoding = args.key_encoding.unwrap_or(config.output.key_encoding);

    let blocks = load_block_files(&args.files)?;
    info!("Loaded {} block files", blocks.len());

    let evaluation = evaluate_blocks(blocks, params, &options)?;
    report::render(&evaluation, format, key_encoding)
}
