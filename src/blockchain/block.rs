use chrono::{DateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

use std::sync::atomic::{AtomicBool, Ordering};

use super::transaction::Transaction;

/// Errors that can occur while mining a block
#[derive(Debug, Error)]
pub enum BlockError {
    #[error("Mining cancelled after {attempts} attempts")]
    Cancelled { attempts: u64 },
}

/// Represents a block in the blockchain
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    /// Hash of the previous block
    pub previous_hash: String,

    /// Timestamp when the block was created
    pub timestamp: DateTime<Utc>,

    /// List of transactions included in this block
    pub transactions: Vec<Transaction>,

    /// Proof of work counter
    pub nonce: u64,

    /// Hash of the current block (calculated)
    pub hash: String,
}

impl Block {
    /// Creates a new, unmined block
    ///
    /// # Arguments
    ///
    /// * `transactions` - The list of transactions to include in the block
    /// * `timestamp` - The creation time of the block
    /// * `previous_hash` - The hash of the previous block
    ///
    /// # Returns
    ///
    /// A new Block instance with nonce 0 and its hash filled in
    pub fn new(transactions: Vec<Transaction>, timestamp: DateTime<Utc>, previous_hash: String) -> Self {
        let block = Block {
            previous_hash,
            timestamp,
            transactions,
            nonce: 0,
            hash: String::new(),
        };

        let hash = block.calculate_hash();

        Block { hash, ..block }
    }

    /// Calculates the hash of the block
    ///
    /// # Returns
    ///
    /// The SHA-256 hash of the block as a hexadecimal string
    pub fn calculate_hash(&self) -> String {
        let mut hasher = Sha256::new();

        // Transactions go in as compact JSON with sorted keys
        let transactions = serde_json::json!(self.transactions).to_string();

        hasher.update(self.previous_hash.as_bytes());
        hasher.update(self.timestamp.to_rfc3339().as_bytes());
        hasher.update(transactions.as_bytes());
        hasher.update(self.nonce.to_string().as_bytes());

        format!("{:x}", hasher.finalize())
    }

    /// Whether the stored hash starts with `difficulty` zero characters
    pub fn meets_difficulty(&self, difficulty: usize) -> bool {
        self.hash.len() >= difficulty && self.hash.bytes().take(difficulty).all(|b| b == b'0')
    }

    /// Searches for a nonce whose hash meets `difficulty`. Blocks until found.
    pub fn mine(&mut self, difficulty: usize) {
        let never = AtomicBool::new(false);

        // The flag is never raised, so this only returns Ok
        let _attempts = self.mine_with_cancel(difficulty, &never);
    }

    /// Searches for a nonce whose hash meets `difficulty`, giving up as soon
    /// as `cancel` is set.
    ///
    /// # Returns
    ///
    /// The number of hashes computed, or `BlockError::Cancelled`
    pub fn mine_with_cancel(&mut self, difficulty: usize, cancel: &AtomicBool) -> Result<u64, BlockError> {
        let mut attempts = 0u64;

        while !self.meets_difficulty(difficulty) {
            if cancel.load(Ordering::Relaxed) {
                debug!("Mining cancelled at nonce {}", self.nonce);
                return Err(BlockError::Cancelled { attempts });
            }

            self.nonce = self.nonce.wrapping_add(1);
            self.hash = self.calculate_hash();
            attempts += 1;
        }

        debug!(
            "Mined block {} with nonce {} after {} attempts",
            self.hash, self.nonce, attempts
        );

        Ok(attempts)
    }

    /// Checks every transaction in the block, stopping at the first bad one
    pub fn has_valid_transactions(&self) -> bool {
        self.transactions
            .iter()
            .all(|transaction| matches!(transaction.is_valid(), Ok(true)))
    }
}
