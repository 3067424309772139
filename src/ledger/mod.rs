//! Ledger layer - the in-memory contract stand-in and its actor
//!
//! `Ledger` is pure data with synchronous mutations; `LedgerActor` wraps it
//! in a command loop and owns the scheduled auto-flush.

pub mod actor;
pub mod idgen;
pub mod state;

pub use actor::LedgerActor;
pub use idgen::{RandomTxIds, SequentialTxIds, TxIdSource};
pub use state::{Ledger, TokenRemovalPolicy};
