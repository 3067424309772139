//! Application constants
//!
//! Centralized location for magic strings and simulation defaults.

use std::time::Duration;

/// Minimum number of pending tips before a batch auto-flushes
pub const DEFAULT_MIN_BATCH_SIZE: usize = 5;

/// Delay between reaching the batch threshold and the automatic flush
pub const AUTO_FLUSH_DELAY: Duration = Duration::from_secs(2);

/// Shortest simulated wait for wallet approval
pub const APPROVAL_WAIT_MIN: Duration = Duration::from_secs(5);

/// Longest simulated wait for wallet approval
pub const APPROVAL_WAIT_MAX: Duration = Duration::from_secs(10);

/// Probability that a simulated wallet approval succeeds
pub const APPROVAL_SUCCESS_RATE: f64 = 0.8;

/// How long a rejected connection is shown before reverting to idle
pub const REJECTED_COOLDOWN: Duration = Duration::from_secs(3);

/// Cool-down after the user cancels a pending connection themselves
pub const CANCELLED_COOLDOWN: Duration = Duration::from_secs(2);

/// Simulated faucet balance granted to newly registered tokens
pub const NEW_TOKEN_SEED_BALANCE: f64 = 1000.0;

/// Cadence at which the demo loop re-fetches ledger snapshots
pub const SNAPSHOT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Prefix for fabricated transaction identifiers
pub const TXN_ID_PREFIX: &str = "txn_rdx1";

/// Prefix for fabricated wallet account addresses
pub const ACCOUNT_ID_PREFIX: &str = "account_rdx1";

/// Application name
#[allow(dead_code)]
pub const APP_NAME: &str = "tipbatch";

/// Application version
#[allow(dead_code)]
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
