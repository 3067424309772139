//! Wallet layer - the simulated wallet-approval round trip
//!
//! No real wallet is involved anywhere: approval latency, the verdict, and
//! the connected account address are all fabricated by an injectable oracle.

pub mod connection;
pub mod oracle;

pub use connection::{ConnectionState, WalletActor};
pub use oracle::{ApprovalOracle, RandomOracle, Verdict};
