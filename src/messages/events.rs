//! Events emitted by the ledger and wallet actors

/// What caused a batch flush
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushTrigger {
    /// An explicit force-flush command
    Manual,
    /// The pending batch reached the threshold and the scheduled flush fired
    Threshold,
}

/// Outcomes reported by the ledger actor.
///
/// The driving layer turns these into transient user notifications; the
/// authoritative state always comes from polled snapshots.
#[derive(Debug, Clone)]
pub enum LedgerEvent {
    TipAccepted {
        streamer_address: String,
        token_address: String,
        amount: f64,
    },
    TipRejected {
        streamer_address: String,
        token_address: String,
        amount: f64,
    },
    /// An auto-flush was scheduled because the batch threshold was reached
    FlushScheduled { pending: usize },
    BatchFlushed { count: usize, trigger: FlushTrigger },
    /// A flush found nothing pending
    FlushSkipped { trigger: FlushTrigger },
    /// Outcome of a registry/admin mutation
    AdminCompleted { op: &'static str, success: bool },
    ResetDone,
}

impl LedgerEvent {
    /// Whether this event reports a failed operation
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            LedgerEvent::TipRejected { .. }
                | LedgerEvent::FlushSkipped { .. }
                | LedgerEvent::AdminCompleted { success: false, .. }
        )
    }
}

/// Transitions reported by the wallet-connection actor
#[derive(Debug, Clone)]
pub enum WalletEvent {
    /// A connection attempt started; approval is awaited
    ConnectPending,
    /// The simulated wallet approved; a fabricated account address is attached
    Connected { account_address: String },
    /// The attempt failed, either by simulated rejection or by user cancel
    Rejected { cancelled: bool },
    /// The rejected cool-down elapsed; a new attempt may start
    BackToIdle,
    /// An established connection was dropped by the user
    Disconnected,
}

impl WalletEvent {
    /// Whether this event ends a connection attempt
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            WalletEvent::Connected { .. } | WalletEvent::Rejected { .. }
        )
    }
}
