// bots/mint/src/main.rs

use anyhow::Result;
use common::{connect, init_logging, load_config, run_mint, SystemClock, CONFIG_EXIT_CODE};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    init_logging()?;

    // Load .env (PRIVATE_KEY, CONTRACT_ADDRESS, optional RPC_URL / MINT_START_TIME / ABI_PATH)
    let cfg = match load_config() {
        Ok(cfg) => cfg,
        Err(err) => {
            error!("{err}");
            std::process::exit(CONFIG_EXIT_CODE);
        }
    };
    info!("Config loaded, minting from {}", cfg.contract_address);

    // Nothing has been sent over the network before this point
    let contract = match connect(&cfg) {
        Ok(contract) => contract,
        Err(err) => {
            error!("{err}");
            std::process::exit(CONFIG_EXIT_CODE);
        }
    };

    // A failed mint is logged by the runner; the process still exits cleanly
    run_mint(&contract, &SystemClock, &cfg.plan()).await;

    Ok(())
}
