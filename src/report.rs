//! Balance report rendering

use crate::blockchain::Evaluation;
use crate::config::{KeyEncoding, OutputFormat};
use crate::crypto::Pubkey;
use crate::error::Result;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct JsonReport {
    chain_height: u32,
    tip_hash: String,
    balances: Vec<JsonBalance>,
}

#[derive(Debug, Serialize)]
struct JsonBalance {
    public_key: String,
    balance: i64,
}

fn encode_key(pubkey: &Pubkey, encoding: KeyEncoding) -> String {
    match encoding {
        KeyEncoding::X => pubkey.x_hex(),
        KeyEncoding::Xy => pubkey.xy_hex(),
    }
}

/// Renders the ledger, one entry per key that was credited or debited.
pub fn render(evaluation: &Evaluation, format: OutputFormat, encoding: KeyEncoding) -> Result<String> {
    let entries = evaluation.ledger.sorted();
    match format {
        OutputFormat::Text => Ok(entries
            .iter()
            .map(|(key, balance)| format!("{} {}\n", encode_key(key, encoding), balance))
            .collect()),
        OutputFormat::Json => {
            let report = JsonReport {
                chain_height: evaluation.chain_height,
                tip_hash: hex::encode(evaluation.tip_hash),
                balances: entries
                    .iter()
                    .map(|(key, balance)| JsonBalance {
                        public_key: encode_key(key, encoding),
                        balance: *balance,
                    })
                    .collect(),
            };
            let mut out = serde_json::to_string_pretty(&report)?;
            out.push('\n');
            Ok(out)
        }
    }
}
