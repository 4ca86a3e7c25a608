//! Block file persistence for chainbalances
//!
//! Each file holds exactly one encoded block. Loading is all-or-nothing: the
//! first file that cannot be read or decoded aborts the whole load.

use crate::blockchain::Block;
use crate::error::{ChainError, Result};
use log::debug;
use std::fs;
use std::path::Path;

pub fn load_block_file(path: &Path) -> Result<Block> {
    let bytes = fs::read(path).map_err(|e| ChainError::Load {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let block = Block::decode(&bytes).map_err(|e| ChainError::Load {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    debug!(
        "Loaded block {} at height {} from {}",
        block.hash_str(),
        block.height,
        path.display()
    );
    Ok(block)
}

/// Loads every file in order, failing on the first bad one.
pub fn load_block_files<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<Block>> {
    paths
        .iter()
        .map(|path| load_block_file(path.as_ref()))
        .collect()
}

pub fn save_block_file(path: &Path, block: &Block) -> Result<()> {
    fs::write(path, block.encode())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestNet;
    use tempfile::TempDir;

    #[test]
    fn test_save_and_load_block() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("genesis.blk");
        let net = TestNet::new();

        save_block_file(&path, &net.genesis).unwrap();
        let loaded = load_block_file(&path).unwrap();
        assert_eq!(loaded, net.genesis);
        assert_eq!(loaded.hash(), net.genesis.hash());
    }

    #[test]
    fn test_missing_file_is_a_load_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.blk");

        match load_block_file(&path) {
            Err(ChainError::Load { path: failed, .. }) => assert_eq!(failed, path),
            other => panic!("Expected load error, got {:?}", other),
        }
    }

    #[test]
    fn test_truncated_file_aborts_the_whole_load() {
        let dir = TempDir::new().unwrap();
        let net = TestNet::new();
        let good = dir.path().join("0.blk");
        let bad = dir.path().join("1.blk");
        save_block_file(&good, &net.genesis).unwrap();
        fs::write(&bad, &net.genesis.encode()[..100]).unwrap();

        let err = load_block_files(&[good, bad.clone()]).unwrap_err();
        assert!(err.to_string().contains("1.blk"));
        assert!(matches!(err, ChainError::Load { path, .. } if path == bad));
    }
}
