use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;
use alloy::transports::http::reqwest::Url;
use dotenv::dotenv;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// Hex private key of the minting account.
pub const PRIVATE_KEY: &str = "PRIVATE_KEY";
/// Address of the contract to mint from.
pub const CONTRACT_ADDRESS: &str = "CONTRACT_ADDRESS";
/// JSON-RPC endpoint.
pub const RPC_URL: &str = "RPC_URL";
/// Optional mint start override, in Unix seconds.
pub const MINT_START_TIME: &str = "MINT_START_TIME";
/// Location of the contract ABI file.
pub const ABI_PATH: &str = "ABI_PATH";

pub const DEFAULT_RPC_URL: &str = "http://localhost:8545";
pub const DEFAULT_ABI_PATH: &str = "abi.json";

pub const MINT_QUANTITY: u64 = 1;
pub const MINT_GAS_LIMIT: u64 = 300_000;

/// Exit status used when the bot cannot start because of bad configuration.
pub const CONFIG_EXIT_CODE: i32 = 1;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Please fill in {0} in .env")]
    Missing(&'static str),
    #[error("Invalid PRIVATE_KEY: {0}")]
    InvalidPrivateKey(String),
    #[error("Invalid CONTRACT_ADDRESS {0:?}: {1}")]
    InvalidAddress(String, String),
    #[error("Invalid RPC_URL {0:?}: {1}")]
    InvalidRpcUrl(String, String),
    #[error("Invalid MINT_START_TIME {0:?}: expected Unix seconds")]
    InvalidStartTime(String),
}

/// What to send once the start time is reached.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MintPlan {
    pub quantity: u64,
    pub gas_limit: u64,
    pub start_override: Option<u64>,
}

/// Everything the bot needs, read once at startup.
#[derive(Clone)]
pub struct Config {
    pub signer: PrivateKeySigner,
    pub contract_address: Address,
    pub rpc_url: Url,
    pub abi_path: PathBuf,
    pub mint_start_override: Option<u64>,
}

impl Config {
    /// Build a config from an arbitrary variable lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        // Both required values are checked before either is parsed.
        let private_key = var(PRIVATE_KEY).ok_or(ConfigError::Missing(PRIVATE_KEY))?;
        let contract_address =
            var(CONTRACT_ADDRESS).ok_or(ConfigError::Missing(CONTRACT_ADDRESS))?;

        let signer = PrivateKeySigner::from_str(private_key.trim())
            .map_err(|err| ConfigError::InvalidPrivateKey(err.to_string()))?;
        let contract_address = Address::from_str(contract_address.trim())
            .map_err(|err| ConfigError::InvalidAddress(contract_address.clone(), err.to_string()))?;

        let rpc_url = var(RPC_URL).unwrap_or_else(|| DEFAULT_RPC_URL.to_string());
        let rpc_url = Url::parse(rpc_url.trim())
            .map_err(|err| ConfigError::InvalidRpcUrl(rpc_url.clone(), err.to_string()))?;

        let abi_path = var(ABI_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_ABI_PATH));

        let mint_start_override = var(MINT_START_TIME)
            .map(|raw| {
                raw.trim()
                    .parse::<u64>()
                    .map_err(|_| ConfigError::InvalidStartTime(raw.clone()))
            })
            .transpose()?;

        Ok(Config {
            signer,
            contract_address,
            rpc_url,
            abi_path,
            mint_start_override,
        })
    }

    pub fn plan(&self) -> MintPlan {
        MintPlan {
            quantity: MINT_QUANTITY,
            gas_limit: MINT_GAS_LIMIT,
            start_override: self.mint_start_override,
        }
    }
}

/// Load `.env` (if any) and read the config from the process environment.
pub fn load_config() -> Result<Config, ConfigError> {
    dotenv().ok();
    Config::from_lookup(|key| env::var(key).ok())
}
