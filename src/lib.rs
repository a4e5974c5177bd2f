//! A minimal single-process proof-of-work ledger.
//!
//! Signed transfers are collected into a pending pool, bundled into blocks,
//! mined to a leading-zero difficulty target and appended to an in-memory
//! chain whose integrity can be re-checked at any time.
//!
//! ```no_run
//! use pow_ledger::blockchain::{Address, Blockchain, KeyPair, Transaction, Wallet};
//!
//! let ledger = Blockchain::new();
//! let wallet = Wallet::new();
//!
//! let mut transfer = Transaction::new(wallet.address().clone(), Address::from("bob"), 2.0);
//! transfer.sign(&wallet).unwrap();
//! ledger.add_transaction(transfer).unwrap();
//! ledger.mine_pending_transactions(wallet.address()).unwrap();
//!
//! assert!(ledger.is_valid());
//! ```

pub mod blockchain;
pub mod config;
