//! Error types for chainbalances

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Process-level failures. Anything in here stops the run.
#[derive(Debug, Error)]
pub enum ChainError {
    #[error("could not read {}: {reason}", .path.display())]
    Load { path: PathBuf, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Codec error: {0}")]
    Codec(#[from] bincode::Error),

    #[error("Cryptographic error: {0}")]
    Crypto(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Key file error: {0}")]
    KeyFile(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no valid chain: none of the {admitted} admitted blocks completes a fully valid path to genesis")]
    NoValidChain { admitted: usize },

    #[error("Invalid chain: {0}")]
    InvalidChain(String),
}

impl From<toml::de::Error> for ChainError {
    fn from(err: toml::de::Error) -> Self {
        ChainError::Config(err.to_string())
    }
}

/// Convenience alias used across the crate
pub type Result<T> = std::result::Result<T, ChainError>;

/// Why a single block was kept out of every candidate chain.
///
/// Faults never abort a run; they only narrow the set of blocks a chain may
/// be built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockFault {
    GenesisHashMismatch,
    AboveTarget,
    TransactionHeightMismatch { block: u32, transaction: u32 },
    RewardHasInput,
    RewardSigned,
    Orphan,
    HeightGap { parent: u32, child: u32 },
    SpentOutputNotFound,
    BadSignature,
    DoubleSpend,
}

impl fmt::Display for BlockFault {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BlockFault::GenesisHashMismatch => write!(f, "height 0 but not the genesis block"),
            BlockFault::AboveTarget => write!(f, "block hash is not below the target"),
            BlockFault::TransactionHeightMismatch { block, transaction } => write!(
                f,
                "transaction height {} does not match block height {}",
                transaction, block
            ),
            BlockFault::RewardHasInput => write!(f, "reward transaction references an input"),
            BlockFault::RewardSigned => write!(f, "reward transaction carries a signature"),
            BlockFault::Orphan => write!(f, "parent block is unknown"),
            BlockFault::HeightGap { parent, child } => {
                write!(f, "height {} does not follow parent height {}", child, parent)
            }
            BlockFault::SpentOutputNotFound => {
                write!(f, "spent transaction is not in any ancestor block")
            }
            BlockFault::BadSignature => write!(f, "spend signature does not verify"),
            BlockFault::DoubleSpend => write!(f, "output already spent by an ancestor block"),
        }
    }
}

impl std::error::Error for BlockFault {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_error_names_the_file() {
        let err = ChainError::Load {
            path: PathBuf::from("blocks/7.blk"),
            reason: "unexpected end of file".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "could not read blocks/7.blk: unexpected end of file"
        );
    }

    #[test]
    fn test_no_valid_chain_is_distinct_from_load() {
        let err = ChainError::NoValidChain { admitted: 0 };
        assert!(err.to_string().starts_with("no valid chain"));
    }

    #[test]
    fn test_fault_display() {
        let fault = BlockFault::HeightGap { parent: 1, child: 4 };
        assert_eq!(fault.to_string(), "height 4 does not follow parent height 1");
    }
}
