use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use thiserror::Error;

use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::config::LedgerConfig;

use super::block::{Block, BlockError};
use super::crypto::Address;
use super::transaction::{Transaction, TransactionError};

/// Previous-hash value carried by the genesis block
pub const GENESIS_PREVIOUS_HASH: &str = "0";

/// Errors that can occur during blockchain operations
#[derive(Debug, Error)]
pub enum BlockchainError {
    #[error("No address found: {0}")]
    InvalidAddress(String),

    #[error("Invalid transaction")]
    InvalidTransaction,

    #[error("Transaction error: {0}")]
    Transaction(#[from] TransactionError),

    #[error("Block error: {0}")]
    Block(#[from] BlockError),
}

/// Chain and pending pool, guarded together so a block is always assembled
/// and appended against a consistent view.
#[derive(Debug)]
struct LedgerState {
    chain: Vec<Block>,
    pending_transactions: Vec<Transaction>,
}

impl LedgerState {
    fn last_block(&self) -> &Block {
        // The genesis block is pushed on construction and never removed
        &self.chain[self.chain.len() - 1]
    }
}

/// Represents the blockchain
#[derive(Debug, Clone)]
pub struct Blockchain {
    state: Arc<Mutex<LedgerState>>,

    /// Mining difficulty (number of leading zeros required in hash)
    difficulty: usize,

    /// Mining reward
    mining_reward: f64,
}

impl Blockchain {
    /// Creates a new blockchain with a genesis block and default settings
    pub fn new() -> Self {
        Self::with_config(&LedgerConfig::default())
    }

    /// Creates a new blockchain with a genesis block
    ///
    /// # Arguments
    ///
    /// * `config` - Difficulty and mining reward
    pub fn with_config(config: &LedgerConfig) -> Self {
        let state = LedgerState {
            chain: vec![Self::genesis_block()],
            pending_transactions: Vec::new(),
        };

        info!(
            "Created blockchain with difficulty {} and mining reward {}",
            config.difficulty, config.mining_reward
        );

        Blockchain {
            state: Arc::new(Mutex::new(state)),
            difficulty: config.difficulty,
            mining_reward: config.mining_reward,
        }
    }

    /// The genesis block is identical for every ledger
    fn genesis_block() -> Block {
        Block::new(
            Vec::new(),
            DateTime::<Utc>::default(),
            GENESIS_PREVIOUS_HASH.to_string(),
        )
    }

    fn state(&self) -> MutexGuard<'_, LedgerState> {
        // Every mutation happens after its last fallible step, so a poisoned
        // lock still holds consistent state.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn difficulty(&self) -> usize {
        self.difficulty
    }

    pub fn mining_reward(&self) -> f64 {
        self.mining_reward
    }

    /// Number of blocks, genesis included
    pub fn len(&self) -> usize {
        self.state().chain.len()
    }

    /// Always false: the genesis block is never removed
    pub fn is_empty(&self) -> bool {
        self.state().chain.is_empty()
    }

    /// Gets the last block in the chain
    pub fn get_last_block(&self) -> Block {
        self.state().last_block().clone()
    }

    /// Gets the entire blockchain
    pub fn get_chain(&self) -> Vec<Block> {
        self.state().chain.clone()
    }

    /// Gets all pending transactions
    pub fn get_pending_transactions(&self) -> Vec<Transaction> {
        self.state().pending_transactions.clone()
    }

    /// Adds a new transaction to the pending transactions
    ///
    /// Balances are not checked: a sender may spend more than they hold.
    ///
    /// # Arguments
    ///
    /// * `transaction` - The signed transfer to add
    ///
    /// # Returns
    ///
    /// Result with the index of the block that will include this transaction
    pub fn add_transaction(&self, transaction: Transaction) -> Result<usize, BlockchainError> {
        let from = match transaction.from_address() {
            Some(from) if !from.is_empty() => from,
            Some(_) => return Err(BlockchainError::InvalidAddress("empty sender".to_string())),
            None => return Err(BlockchainError::InvalidAddress("missing sender".to_string())),
        };

        if transaction.to.is_empty() {
            return Err(BlockchainError::InvalidAddress("empty recipient".to_string()));
        }

        if !transaction.has_valid_amount() {
            warn!("Rejected transaction from {} with amount {}", from, transaction.amount);
            return Err(BlockchainError::InvalidTransaction);
        }

        if !transaction.is_valid()? {
            warn!("Rejected transaction from {} with a bad signature", from);
            return Err(BlockchainError::InvalidTransaction);
        }

        debug!(
            "Accepted transaction {} from {} to {} for {}",
            transaction.calculate_hash(),
            from,
            transaction.to,
            transaction.amount
        );

        let mut state = self.state();
        state.pending_transactions.push(transaction);

        Ok(state.chain.len())
    }

    /// Mines a new block with the pending transactions
    ///
    /// # Arguments
    ///
    /// * `miner_address` - The address of the miner (to receive mining reward)
    ///
    /// # Returns
    ///
    /// Result with the newly mined block
    pub fn mine_pending_transactions(&self, miner_address: &Address) -> Result<Block, BlockchainError> {
        let never = AtomicBool::new(false);
        self.mine_pending_transactions_with_cancel(miner_address, &never)
    }

    /// Same as [`Blockchain::mine_pending_transactions`], but stops when
    /// `cancel` is raised. A cancelled call leaves the ledger untouched.
    pub fn mine_pending_transactions_with_cancel(
        &self,
        miner_address: &Address,
        cancel: &AtomicBool,
    ) -> Result<Block, BlockchainError> {
        let mut state = self.state();

        let mut block = Block::new(
            state.pending_transactions.clone(),
            Utc::now(),
            state.last_block().hash.clone(),
        );

        let attempts = block.mine_with_cancel(self.difficulty, cancel)?;

        state.chain.push(block.clone());

        // The reward is paid out in the next block, not this one
        state.pending_transactions = vec![Transaction::new_issuance(
            miner_address.clone(),
            self.mining_reward,
        )];

        info!(
            "Mined block {} at height {} with {} transactions after {} attempts",
            block.hash,
            state.chain.len() - 1,
            block.transactions.len(),
            attempts
        );

        Ok(block)
    }

    /// Computes the balance of an address by replaying every confirmed transaction
    pub fn get_balance(&self, address: &Address) -> f64 {
        let state = self.state();
        let mut balance = 0.0;

        for block in &state.chain {
            for transaction in &block.transactions {
                if transaction.from_address() == Some(address) {
                    balance -= transaction.amount;
                }

                if &transaction.to == address {
                    balance += transaction.amount;
                }
            }
        }

        balance
    }

    /// Validates the blockchain
    ///
    /// # Returns
    ///
    /// true if the blockchain is valid, false otherwise
    pub fn is_valid(&self) -> bool {
        let state = self.state();

        for (i, pair) in state.chain.windows(2).enumerate() {
            let previous_block = &pair[0];
            let current_block = &pair[1];

            if !current_block.has_valid_transactions() {
                warn!("Block {} contains an invalid transaction", i + 1);
                return false;
            }

            // Check if the hash is correct
            if current_block.hash != current_block.calculate_hash() {
                warn!("Block {} hash does not match its contents", i + 1);
                return false;
            }

            // Check if the previous hash is correct
            if current_block.previous_hash != previous_block.hash {
                warn!("Block {} is not linked to block {}", i + 1, i);
                return false;
            }
        }

        true
    }
}

impl Default for Blockchain {
    fn default() -> Self {
        Self::new()
    }
}
