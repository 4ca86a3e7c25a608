// Thin re-export module: the engine lives in `blockchain/core.rs`, split by
// phase (structural validation, tree building, ancestry validation, chain
// selection, ledger replay).

pub mod core;
pub use self::core::*;
