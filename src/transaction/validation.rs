/// Validation logic for transactions separated from type definitions
use crate::crypto::{self, verify_signature};
use crate::error::BlockFault;
use crate::transaction::types::Transaction;

impl Transaction {
    /// A reward transaction has no input and no signature.
    pub fn validate_reward_shape(&self) -> Result<(), BlockFault> {
        if self.has_input() {
            return Err(BlockFault::RewardHasInput);
        }
        if !crypto::is_zero(&self.src_signature.r) || !crypto::is_zero(&self.src_signature.s) {
            return Err(BlockFault::RewardSigned);
        }
        Ok(())
    }

    pub fn validate_height(&self, block_height: u32) -> Result<(), BlockFault> {
        if self.height != block_height {
            return Err(BlockFault::TransactionHeightMismatch {
                block: block_height,
                transaction: self.height,
            });
        }
        Ok(())
    }

    /// Checks that this transaction was signed by the owner of `spent`'s output.
    pub fn validate_spend_signature(&self, spent: &Transaction) -> Result<(), BlockFault> {
        if verify_signature(&self.signing_digest(), &self.src_signature, &spent.dest_pubkey) {
            Ok(())
        } else {
            Err(BlockFault::BadSignature)
        }
    }
}
