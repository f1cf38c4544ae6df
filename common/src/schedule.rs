use crate::contract::{MintContract, MINT_START_FN};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Source of wall-clock time, in whole Unix seconds.
pub trait Clock: Send + Sync {
    fn now_unix(&self) -> u64;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_unix(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs())
            .unwrap_or(0)
    }
}

/// Where the mint start time came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StartTime {
    Contract(u64),
    Override(u64),
    Unset,
}

impl StartTime {
    pub fn timestamp(&self) -> Option<u64> {
        match self {
            StartTime::Contract(ts) | StartTime::Override(ts) => Some(*ts),
            StartTime::Unset => None,
        }
    }
}

/// Ask the contract first, then fall back to the configured override.
///
/// A contract value of `0` is an unscheduled sale and falls through to the
/// override. An override of `0` is taken literally and never causes a wait.
pub async fn resolve_start_time<C: MintContract + ?Sized>(
    contract: &C,
    start_override: Option<u64>,
) -> StartTime {
    if contract.has_mint_start() {
        match contract.mint_start().await {
            Ok(0) => info!("Contract {MINT_START_FN}() is not set"),
            Ok(ts) => {
                info!("Contract mint start time: {ts}");
                return StartTime::Contract(ts);
            }
            Err(err) => warn!("Could not read start time from contract: {err}"),
        }
    } else {
        debug!("Contract interface has no {MINT_START_FN}()");
    }

    match start_override {
        Some(ts) => {
            info!("Using configured mint start time: {ts}");
            StartTime::Override(ts)
        }
        None => {
            info!("No mint start time configured, minting immediately");
            StartTime::Unset
        }
    }
}

/// Time left until `target`, or `None` once it has been reached.
pub fn time_until(target: u64, now: u64) -> Option<Duration> {
    match target.saturating_sub(now) {
        0 => None,
        secs => Some(Duration::from_secs(secs)),
    }
}

/// Sleep until the clock reads at least `target`.
pub async fn wait_until<K: Clock + ?Sized>(clock: &K, target: u64) {
    if let Some(remaining) = time_until(target, clock.now_unix()) {
        info!("Waiting {} seconds until mint time...", remaining.as_secs());
        tokio::time::sleep(remaining).await;
    }
}
