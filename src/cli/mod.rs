use clap::{Args, Parser, Subcommand};

use std::path::PathBuf;

pub mod commands;

/// Command line interface for the proof-of-work ledger
#[derive(Debug, Parser)]
#[command(name = "pow-ledger", version, about)]
pub struct Cli {
    #[command(flatten)]
    pub ledger: LedgerArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Ledger settings shared by every command
#[derive(Debug, Args)]
pub struct LedgerArgs {
    /// JSON file with `difficulty` and `mining_reward`
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Leading zero hex characters required in a block hash
    #[arg(long, global = true)]
    pub difficulty: Option<usize>,

    /// Amount issued to the miner of each block
    #[arg(long, global = true)]
    pub reward: Option<f64>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a new secp256k1 key pair
    Keygen,

    /// Print the address belonging to a private key
    Address {
        /// Hex encoded 32-byte private key
        #[arg(long)]
        private_key: String,
    },

    /// Build a ledger, send a few transfers and mine them
    Demo(DemoArgs),
}

#[derive(Debug, Args)]
pub struct DemoArgs {
    /// Hex encoded private key of the sending wallet (random if omitted)
    #[arg(long)]
    pub private_key: Option<String>,

    /// Address receiving the transfers
    #[arg(long, default_value = "someone else's wallet address")]
    pub recipient: String,

    /// Number of transfer-and-mine rounds
    #[arg(long, default_value_t = 3)]
    pub rounds: usize,

    /// Amount sent in each transfer
    #[arg(long, default_value_t = 2.0)]
    pub amount: f64,

    /// Print the final chain as JSON
    #[arg(long)]
    pub show_chain: bool,
}
