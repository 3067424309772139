//! Message types for inter-layer communication in the actor-based architecture.
//!
//! This module defines all messages that flow between the demo driver and
//! the ledger/wallet actors.

pub mod commands;
pub mod events;

pub use commands::{LedgerCommand, WalletCommand};
pub use events::{FlushTrigger, LedgerEvent, WalletEvent};
