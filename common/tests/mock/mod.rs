#![allow(dead_code)]

use alloy::primitives::TxHash;
use alloy::transports::TransportErrorKind;
use async_trait::async_trait;
use common::contract::{Error, MintContract, MintReceipt, MINT_START_FN};
use common::Clock;
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;

pub const NOW: u64 = 1_700_000_000;
pub const TX_HASH: TxHash = TxHash::repeat_byte(0xab);

/// Wall clock that starts at [`NOW`] and follows tokio's (possibly paused) time.
pub struct TestClock {
    base: u64,
    started: Instant,
}

impl TestClock {
    pub fn new() -> Self {
        TestClock {
            base: NOW,
            started: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

impl Clock for TestClock {
    fn now_unix(&self) -> u64 {
        self.base + self.started.elapsed().as_secs()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Call {
    MintStart,
    SendMint {
        quantity: u64,
        gas_limit: u64,
        after: Duration,
    },
    WaitForReceipt(TxHash),
}

pub enum StartRead {
    /// Interface has no start time accessor.
    Absent,
    Value(u64),
    Fails,
}

pub enum Inclusion {
    Block(u64),
    Reverted,
    Fails,
}

/// Scripted contract that records every call made against it.
pub struct MockContract {
    start: StartRead,
    send_fails: bool,
    inclusion: Inclusion,
    started: Instant,
    calls: Mutex<Vec<Call>>,
}

impl MockContract {
    pub fn new(start: StartRead) -> Self {
        MockContract {
            start,
            send_fails: false,
            inclusion: Inclusion::Block(19_000_000),
            started: Instant::now(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_send(mut self) -> Self {
        self.send_fails = true;
        self
    }

    pub fn with_inclusion(mut self, inclusion: Inclusion) -> Self {
        self.inclusion = inclusion;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn sends(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|call| matches!(call, Call::SendMint { .. }))
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl MintContract for MockContract {
    fn has_mint_start(&self) -> bool {
        !matches!(self.start, StartRead::Absent)
    }

    async fn mint_start(&self) -> Result<u64, Error> {
        self.record(Call::MintStart);
        match self.start {
            StartRead::Value(ts) => Ok(ts),
            StartRead::Fails => Err(Error::UnexpectedOutput(MINT_START_FN)),
            StartRead::Absent => panic!("mint_start called without the capability"),
        }
    }

    async fn send_mint(&self, quantity: u64, gas_limit: u64) -> Result<TxHash, Error> {
        self.record(Call::SendMint {
            quantity,
            gas_limit,
            after: self.started.elapsed(),
        });
        if self.send_fails {
            return Err(Error::RpcError(TransportErrorKind::custom_str(
                "insufficient funds for gas * price + value",
            )));
        }
        Ok(TX_HASH)
    }

    async fn wait_for_receipt(&self, tx_hash: TxHash) -> Result<MintReceipt, Error> {
        self.record(Call::WaitForReceipt(tx_hash));
        // inclusion takes a couple of blocks
        tokio::time::sleep(Duration::from_secs(24)).await;
        match self.inclusion {
            Inclusion::Block(block) => Ok(MintReceipt {
                tx_hash,
                block_number: Some(block),
                success: true,
            }),
            Inclusion::Reverted => Ok(MintReceipt {
                tx_hash,
                block_number: Some(19_000_000),
                success: false,
            }),
            Inclusion::Fails => Err(Error::RpcError(TransportErrorKind::custom_str(
                "connection reset",
            ))),
        }
    }
}
