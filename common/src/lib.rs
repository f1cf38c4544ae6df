// common/src/lib.rs
#[macro_use]
extern crate tracing;

// ─────────────────── Configuration ───────────────────
pub mod config;
pub mod logging;

// ─────────────────── Contract & Mint Flow (start time -> wait -> mint -> receipt) ───────────────────
pub mod contract;
pub mod runner;
pub mod schedule;

pub use config::{load_config, Config, ConfigError, MintPlan, CONFIG_EXIT_CODE};
pub use contract::{connect, MintContract, MintContractClient, MintReceipt};
pub use logging::init_logging;
pub use runner::{run_mint, MintOutcome, Stage};
pub use schedule::{Clock, StartTime, SystemClock};
