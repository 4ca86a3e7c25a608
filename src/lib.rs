//! chainbalances - longest-valid-chain balance computation over block files
//!
//! # Architecture
//!
//! ## Engine
//! - [`blockchain`] - Block model, structural and ancestry validation, block
//!   tree, chain selection and ledger replay
//! - [`transaction`] - Transaction record and its checks
//!
//! ## Primitives
//! - [`crypto`] - SHA-256 digests and secp256k1 ECDSA
//! - [`codec`] - Fixed-layout binary encoding
//!
//! ## Surfaces
//! - [`persistence`] - Block files
//! - [`keyfile`] - Key files written by `genkey`
//! - [`report`] - Text and JSON balance reports
//! - [`config`] - Configuration management
//! - [`cli`] - CLI utilities
//! - [`error`] - Error types

#![forbid(unsafe_code)]

// ============================================================================
// Engine
// ============================================================================
pub mod blockchain;
pub mod transaction;

// ============================================================================
// Primitives
// ============================================================================
pub mod codec;
pub mod crypto;

// ============================================================================
// Surfaces
// ============================================================================
pub mod cli;
pub mod config;
pub mod error;
pub mod keyfile;
pub mod persistence;
pub mod report;

#[cfg(test)]
pub(crate) mod test_utils;
