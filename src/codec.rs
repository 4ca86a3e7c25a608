//! Fixed-layout binary encoding shared by hashing and block files.
//!
//! Records are encoded with bincode using big-endian, fixed-width integers.
//! Byte arrays have no length prefix, so every block encodes to exactly
//! [`BLOCK_ENCODED_LEN`] bytes and every transaction to
//! [`TRANSACTION_ENCODED_LEN`].

use crate::error::Result;
use bincode::Options;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// height + prev hash + dest x + dest y + sig r + sig s
pub const TRANSACTION_ENCODED_LEN: usize = 4 + 32 * 5;

/// height + prev block hash + nonce + two transactions
pub const BLOCK_ENCODED_LEN: usize = 4 + 32 * 2 + TRANSACTION_ENCODED_LEN * 2;

fn options() -> impl Options {
    bincode::DefaultOptions::new()
        .with_big_endian()
        .with_fixint_encoding()
        .reject_trailing_bytes()
}

pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    Ok(options().serialize(value)?)
}

/// Decodes exactly one record; short or trailing input is an error.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    Ok(options().deserialize(bytes)?)
}
