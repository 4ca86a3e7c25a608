#![forbid(unsafe_code)]
//! Usage: balances *.blk
//!
//! Reads block files and prints each public key's balance on the longest
//! valid chain.

use chainbalances::blockchain::ConsensusParams;
use chainbalances::cli::{init_logging, run_balances, BalancesArgs};
use clap::Parser;
use std::io::Write;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = BalancesArgs::parse();
    init_logging(args.verbose);

    let params = ConsensusParams::default();
    match run_balances(&args, &params) {
        Ok(report) => {
            let mut stdout = std::io::stdout().lock();
            if let Err(e) = stdout.write_all(report.as_bytes()) {
                eprintln!("balances: {}", e);
                return ExitCode::FAILURE;
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("balances: {}", e);
            ExitCode::FAILURE
        }
    }
}
