use crate::config::MintPlan;
use crate::contract::{Error, MintContract};
use crate::schedule::{resolve_start_time, wait_until, Clock};
use alloy::primitives::TxHash;
use std::fmt;

/// Step at which a mint attempt gave up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Submit,
    Confirm,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Submit => write!(f, "submit"),
            Stage::Confirm => write!(f, "confirm"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MintOutcome {
    Confirmed {
        tx_hash: TxHash,
        block_number: Option<u64>,
    },
    Failed {
        stage: Stage,
        tx_hash: Option<TxHash>,
        reason: String,
    },
}

impl MintOutcome {
    pub fn is_confirmed(&self) -> bool {
        matches!(self, MintOutcome::Confirmed { .. })
    }
}

/// Resolve the start time, wait for it, then submit one mint and await its receipt.
///
/// Failures after startup are logged and returned, never retried.
pub async fn run_mint<C, K>(contract: &C, clock: &K, plan: &MintPlan) -> MintOutcome
where
    C: MintContract + ?Sized,
    K: Clock + ?Sized,
{
    let start = resolve_start_time(contract, plan.start_override).await;
    if let Some(target) = start.timestamp() {
        wait_until(clock, target).await;
    }

    info!("Sending mint transaction...");
    let tx_hash = match contract.send_mint(plan.quantity, plan.gas_limit).await {
        Ok(tx_hash) => tx_hash,
        Err(err) => return failed(Stage::Submit, None, err),
    };
    info!("Mint tx sent: {tx_hash:?}");

    match contract.wait_for_receipt(tx_hash).await {
        Ok(receipt) if receipt.success => {
            match receipt.block_number {
                Some(block) => info!("Mint confirmed in block {block}"),
                None => info!("Mint confirmed"),
            }
            MintOutcome::Confirmed {
                tx_hash,
                block_number: receipt.block_number,
            }
        }
        Ok(_) => failed(Stage::Confirm, Some(tx_hash), Error::Reverted(tx_hash)),
        Err(err) => failed(Stage::Confirm, Some(tx_hash), err),
    }
}

fn failed(stage: Stage, tx_hash: Option<TxHash>, err: Error) -> MintOutcome {
    error!("Mint failed at {stage} stage: {err}");
    MintOutcome::Failed {
        stage,
        tx_hash,
        reason: err.to_string(),
    }
}
