//! Commands sent from the driving layer to the ledger and wallet actors

/// Mutation commands for the ledger actor.
///
/// Every mutation resolves to a [`crate::messages::LedgerEvent`] on the
/// actor's event channel; there are no error codes beyond success/failure.
#[derive(Debug, Clone)]
pub enum LedgerCommand {
    /// Accept a tip into the pending batch
    SendTip {
        tipper_address: String,
        streamer_address: String,
        token_address: String,
        amount: f64,
    },
    /// Settle the pending batch immediately
    ForceFlush,
    /// Register a streamer
    AddStreamer { address: String, name: String },
    /// Remove a streamer and purge their pending tips
    RemoveStreamer { address: String },
    /// Register a supported token
    AddToken {
        address: String,
        symbol: String,
        name: String,
    },
    /// Remove a supported token
    RemoveToken { address: String },
    /// Change the batch threshold (must stay >= 1)
    SetMinBatchSize(usize),
    /// Restore the seeded state, cancelling any scheduled auto-flush
    Reset,
    /// Shut down the ledger actor
    Shutdown,
}

/// Commands for the simulated wallet-connection actor
#[derive(Debug, Clone)]
pub enum WalletCommand {
    /// Start a connection attempt (ignored while one is already pending)
    Connect,
    /// Cancel the pending attempt, forcing an immediate rejection
    Cancel,
    /// Drop an established connection and return to idle
    Disconnect,
    /// Shut down the wallet actor
    Shutdown,
}
