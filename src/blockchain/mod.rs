// Blockchain module
//
// This module contains the core ledger implementation including:
// - Transaction structure (issuances and signed transfers)
// - Block structure and proof of work
// - Blockchain structure
// - Cryptography utilities (secp256k1 keys, addresses, signatures)

pub mod block;
pub mod chain;
pub mod crypto;
pub mod transaction;

// Re-export main components for easier access
pub use block::Block;
pub use chain::{Blockchain, BlockchainError};
pub use crypto::{Address, KeyPair, Wallet};
pub use transaction::Transaction;
