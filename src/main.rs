use anyhow::Result;
use clap::Parser;
use log::info;

use pow_ledger::blockchain::Blockchain;

mod cli;

use cli::{commands, Cli, Command};

fn main() -> Result<()> {
    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let cli = Cli::parse();

    match &cli.command {
        Command::Keygen => commands::keygen(),
        Command::Address { private_key } => commands::address(private_key)?,
        Command::Demo(args) => {
            let config = commands::load_config(&cli.ledger)?;
            let ledger = Blockchain::with_config(&config);

            let report = commands::demo(&ledger, args)?;
            info!("Demo finished for {}", report.sender);
        }
    }

    Ok(())
}
