use crate::config::Config;
use alloy::contract::{ContractInstance, Interface};
use alloy::dyn_abi::DynSolValue;
use alloy::json_abi::JsonAbi;
use alloy::network::{Ethereum, EthereumWallet, ReceiptResponse};
use alloy::primitives::{Address, TxHash, U256};
use alloy::providers::{PendingTransactionBuilder, Provider, ProviderBuilder};
use alloy::transports::http::{Client, Http};
use alloy::transports::{RpcError, Transport, TransportErrorKind};
use async_trait::async_trait;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Read-only accessor some drops expose for their public sale start.
pub const MINT_START_FN: &str = "publicMintStart";
pub const MINT_FN: &str = "mint";

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    ContractError(#[from] alloy::contract::Error),
    #[error(transparent)]
    RpcError(#[from] RpcError<TransportErrorKind>),
    #[error(transparent)]
    PendingTransactionError(#[from] alloy::providers::PendingTransactionError),
    #[error("Could not read ABI file {path:?}: {source}")]
    AbiRead {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Could not parse ABI file {path:?}: {source}")]
    AbiParse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("{0}() returned no uint value")]
    UnexpectedOutput(&'static str),
    #[error("Start time {0} does not fit in 64 bits")]
    StartTimeOverflow(U256),
    #[error("Transaction {0:?} reverted")]
    Reverted(TxHash),
}

// An ABI file is either the bare array or a compiler artifact wrapping it.
#[derive(Deserialize)]
#[serde(untagged)]
enum AbiFile {
    Bare(JsonAbi),
    Artifact { abi: JsonAbi },
}

impl From<AbiFile> for JsonAbi {
    fn from(file: AbiFile) -> Self {
        match file {
            AbiFile::Bare(abi) | AbiFile::Artifact { abi } => abi,
        }
    }
}

pub fn parse_abi(raw: &str) -> Result<JsonAbi, serde_json::Error> {
    serde_json::from_str::<AbiFile>(raw).map(JsonAbi::from)
}

/// Load the contract interface description from disk.
pub fn load_abi(path: &Path) -> Result<JsonAbi, Error> {
    let raw = fs::read_to_string(path).map_err(|source| Error::AbiRead {
        path: path.to_path_buf(),
        source,
    })?;
    let abi = parse_abi(&raw).map_err(|source| Error::AbiParse {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(
        "Loaded ABI from {path:?} with {} functions",
        abi.functions.len()
    );
    Ok(abi)
}

/// Extract the start timestamp from the raw `publicMintStart()` output.
pub fn decode_start(output: &[DynSolValue]) -> Result<u64, Error> {
    let value = output
        .first()
        .and_then(DynSolValue::as_uint)
        .map(|(value, _)| value)
        .ok_or(Error::UnexpectedOutput(MINT_START_FN))?;
    u64::try_from(value).map_err(|_| Error::StartTimeOverflow(value))
}

/// Inclusion record for a submitted mint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MintReceipt {
    pub tx_hash: TxHash,
    pub block_number: Option<u64>,
    pub success: bool,
}

/// The calls the bot makes against the drop contract.
#[async_trait]
pub trait MintContract: Send + Sync {
    /// Whether the interface exposes [`MINT_START_FN`].
    fn has_mint_start(&self) -> bool;

    async fn mint_start(&self) -> Result<u64, Error>;

    /// Submit the mint and return once the node has accepted it.
    async fn send_mint(&self, quantity: u64, gas_limit: u64) -> Result<TxHash, Error>;

    /// Block until the transaction is included. There is no timeout.
    async fn wait_for_receipt(&self, tx_hash: TxHash) -> Result<MintReceipt, Error>;
}

pub struct MintContractClient<T: Transport + Clone, P: Provider<T, Ethereum>> {
    pub contract: ContractInstance<T, P, Ethereum>,
}

impl<T, P> MintContractClient<T, P>
where
    T: Transport + Clone,
    P: Provider<T, Ethereum>,
{
    pub fn new(contract_address: Address, provider: P, abi: JsonAbi) -> Self {
        let contract = ContractInstance::new(contract_address, provider, Interface::new(abi));
        MintContractClient { contract }
    }
}

#[async_trait]
impl<T, P> MintContract for MintContractClient<T, P>
where
    T: Transport + Clone,
    P: Provider<T, Ethereum>,
{
    fn has_mint_start(&self) -> bool {
        self.contract.abi().function(MINT_START_FN).is_some()
    }

    async fn mint_start(&self) -> Result<u64, Error> {
        debug!("Calling {MINT_START_FN}() on {}", self.contract.address());
        let output = self
            .contract
            .function(MINT_START_FN, &[])?
            .call()
            .await
            .inspect_err(|err| debug!("Error calling {MINT_START_FN}(): {err:?}"))?;

        decode_start(&output)
    }

    async fn send_mint(&self, quantity: u64, gas_limit: u64) -> Result<TxHash, Error> {
        debug!("Sending {MINT_FN}({quantity}) with gas limit {gas_limit}");
        let args = [DynSolValue::Uint(U256::from(quantity), 256)];
        let pending_tx_builder = self
            .contract
            .function(MINT_FN, &args)?
            .gas(gas_limit)
            .send()
            .await
            .inspect_err(|err| debug!("Error sending {MINT_FN}({quantity}): {err:?}"))?;

        Ok(*pending_tx_builder.tx_hash())
    }

    async fn wait_for_receipt(&self, tx_hash: TxHash) -> Result<MintReceipt, Error> {
        let root = self.contract.provider().root().clone();
        let receipt = PendingTransactionBuilder::new(root, tx_hash)
            .get_receipt()
            .await
            .inspect_err(|err| debug!("Error watching mint tx with hash {tx_hash:?}: {err:?}"))?;

        debug!("Receipt for {tx_hash:?} found: {receipt:?}");
        Ok(MintReceipt {
            tx_hash,
            block_number: receipt.block_number(),
            success: receipt.status(),
        })
    }
}

/// Build the signing provider and bind it to the configured contract.
pub fn connect(
    config: &Config,
) -> Result<MintContractClient<Http<Client>, impl Provider<Http<Client>, Ethereum>>, Error> {
    let abi = load_abi(&config.abi_path)?;
    let wallet = EthereumWallet::from(config.signer.clone());
    let provider = ProviderBuilder::new()
        .with_recommended_fillers()
        .wallet(wallet)
        .on_http(config.rpc_url.clone());

    info!(
        "Connected to {} as {}",
        config.rpc_url,
        config.signer.address()
    );
    Ok(MintContractClient::new(
        config.contract_address,
        provider,
        abi,
    ))
}
