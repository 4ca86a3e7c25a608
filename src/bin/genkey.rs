#![forbid(unsafe_code)]
//! Usage: genkey FILENAME
//!
//! Generates a secp256k1 key and writes it to FILENAME.

use chainbalances::cli::init_logging;
use chainbalances::crypto::KeyPair;
use chainbalances::keyfile::KeyFile;
use clap::Parser;
use log::info;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "genkey", author, version, about, long_about = None)]
struct Cli {
    /// Where to write the key file
    file: PathBuf,

    /// Replace the file if it already exists
    #[arg(long)]
    force: bool,

    /// Increase log verbosity (repeatable)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let keypair = KeyPair::generate();
    let key_file = KeyFile::from_keypair(&keypair);
    key_file.save(&cli.file, cli.force)?;
    info!("Wrote key to {}", cli.file.display());

    println!("{}", key_file.public_key.x);
    println!("{}", key_file.public_key.y);
    Ok(())
}
