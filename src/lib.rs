//! # tipbatch
//!
//! A console demo of a batched creator-tipping concept: viewers send token
//! tips to streamers, tips accumulate in a pending batch, and once a
//! threshold is reached the batch is flushed into history as a simulated
//! on-chain settlement.
//!
//! Everything is an in-memory mock. No wallet, ledger network, or signing
//! exists; the wallet-approval round trip is a timed state machine with a
//! randomized verdict.
//!
//! ## Architecture
//! Actor-based with channels:
//! - Ledger layer - pure state plus a command-loop actor owning the
//!   scheduled auto-flush
//! - Wallet layer - the approval state machine actor
//! - Demo driver - wires channels, drives traffic, polls snapshots

pub mod constants;
pub mod demo;
pub mod ledger;
pub mod messages;
pub mod models;
pub mod wallet;

// Re-export commonly used types
pub use ledger::{Ledger, LedgerActor, RandomTxIds, SequentialTxIds, TokenRemovalPolicy, TxIdSource};
pub use messages::{FlushTrigger, LedgerCommand, LedgerEvent, WalletCommand, WalletEvent};
pub use models::{short_address, LedgerSnapshot, PendingTip, Streamer, TipRecord, Token};
pub use wallet::{ApprovalOracle, ConnectionState, RandomOracle, Verdict, WalletActor};
