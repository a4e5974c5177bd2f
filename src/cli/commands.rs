use anyhow::{Context, Result};
use log::info;

use pow_ledger::blockchain::{Address, Blockchain, KeyPair, Transaction, Wallet};
use pow_ledger::config::LedgerConfig;

use super::{DemoArgs, LedgerArgs};

/// Outcome of a demo run
#[derive(Debug)]
pub struct DemoReport {
    pub sender: Address,
    pub sender_balance: f64,
    pub recipient_balance: f64,
    pub blocks: usize,
    pub is_valid: bool,
}

/// Resolves ledger settings: defaults, then the config file, then flags
pub fn load_config(args: &LedgerArgs) -> Result<LedgerConfig> {
    let mut config = match &args.config {
        Some(path) => LedgerConfig::from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => LedgerConfig::default(),
    };

    if let Some(difficulty) = args.difficulty {
        config.difficulty = difficulty;
    }

    if let Some(reward) = args.reward {
        config.mining_reward = reward;
    }

    config.validate()?;
    Ok(config)
}

pub fn keygen() {
    let wallet = Wallet::new();

    println!("Public: {}", wallet.address());
    println!("Private: {}", hex::encode(wallet.export_secret_key()));
}

pub fn address(private_key: &str) -> Result<()> {
    let wallet = Wallet::from_secret_hex(private_key).context("reading private key")?;
    println!("{}", wallet.address());
    Ok(())
}

/// Sends `rounds` signed transfers from one wallet, mining a block after each
pub fn demo(ledger: &Blockchain, args: &DemoArgs) -> Result<DemoReport> {
    let wallet = match &args.private_key {
        Some(key) => Wallet::from_secret_hex(key).context("reading private key")?,
        None => Wallet::new(),
    };
    let recipient = Address::from(args.recipient.as_str());

    info!("Sending from {}", wallet.address());

    for round in 1..=args.rounds {
        let mut transfer = Transaction::new(wallet.address().clone(), recipient.clone(), args.amount);
        transfer.sign(&wallet)?;
        ledger.add_transaction(transfer)?;

        let block = ledger.mine_pending_transactions(wallet.address())?;
        println!("Round {}: mined block {} (nonce {})", round, block.hash, block.nonce);
    }

    let report = DemoReport {
        sender: wallet.address().clone(),
        sender_balance: ledger.get_balance(wallet.address()),
        recipient_balance: ledger.get_balance(&recipient),
        blocks: ledger.len(),
        is_valid: ledger.is_valid(),
    };

    println!("My balance: {}", report.sender_balance);
    println!("Recipient balance: {}", report.recipient_balance);
    println!("Blocks: {}, chain valid: {}", report.blocks, report.is_valid);

    if args.show_chain {
        println!("{}", serde_json::to_string_pretty(&ledger.get_chain())?);
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demo_args(rounds: usize) -> DemoArgs {
        DemoArgs {
            private_key: Some(
                "9c5ec56adbd8870aa81782046bc47376e27181e7bcbfd38b05f236ba18c6eea8".to_string(),
            ),
            recipient: "someone else's wallet address".to_string(),
            rounds,
            amount: 2.0,
            show_chain: false,
        }
    }

    #[test]
    fn test_flags_override_defaults() {
        let args = LedgerArgs {
            config: None,
            difficulty: Some(1),
            reward: Some(5.0),
        };

        let config = load_config(&args).unwrap();
        assert_eq!(config.difficulty, 1);
        assert_eq!(config.mining_reward, 5.0);
    }

    #[test]
    fn test_invalid_flags_are_rejected() {
        let args = LedgerArgs {
            config: None,
            difficulty: Some(65),
            reward: None,
        };

        assert!(load_config(&args).is_err());
    }

    #[test]
    fn test_demo() {
        let ledger = Blockchain::with_config(&LedgerConfig {
            difficulty: 1,
            mining_reward: 100.0,
        });

        let report = demo(&ledger, &demo_args(3)).unwrap();

        assert_eq!(report.blocks, 4);
        assert_eq!(report.sender_balance, 194.0);
        assert_eq!(report.recipient_balance, 6.0);
        assert!(report.is_valid);
    }

    #[test]
    fn test_demo_rejects_bad_key() {
        let ledger = Blockchain::with_config(&LedgerConfig {
            difficulty: 1,
            mining_reward: 100.0,
        });
        let mut args = demo_args(1);
        args.private_key = Some("not hex".to_string());

        assert!(demo(&ledger, &args).is_err());
        assert_eq!(ledger.len(), 1);
    }
}
