//! Connection simulator - the fake wallet-approval state machine
//!
//! One attempt at a time: idle -> pending -> connected | rejected, with
//! rejected auto-reverting to idle after a cool-down. A connect while an
//! attempt is already pending is ignored.

use tokio::sync::mpsc;
use tokio::time::{self, Instant};

use crate::constants::{CANCELLED_COOLDOWN, REJECTED_COOLDOWN};
use crate::messages::{WalletCommand, WalletEvent};
use crate::wallet::oracle::{ApprovalOracle, Verdict};

/// Where a connection attempt currently stands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    /// No attempt in progress
    Idle,
    /// Waiting on the simulated external approval
    Pending,
    /// Approved; terminal until an explicit disconnect
    Connected { account_address: String },
    /// Failed; auto-reverts to idle after a cool-down
    Rejected,
}

/// Sleep until an optional deadline; no deadline means wait forever
async fn deadline(at: Option<Instant>) {
    match at {
        Some(at) => time::sleep_until(at).await,
        None => std::future::pending().await,
    }
}

/// Actor running the wallet-approval state machine
pub struct WalletActor {
    state: ConnectionState,
    oracle: Box<dyn ApprovalOracle>,
    event_tx: mpsc::UnboundedSender<WalletEvent>,
    /// Armed while pending: when the simulated user reacts
    resolve_at: Option<Instant>,
    /// Armed while rejected: when the state reverts to idle
    revert_at: Option<Instant>,
}

impl WalletActor {
    pub fn new(
        oracle: Box<dyn ApprovalOracle>,
        event_tx: mpsc::UnboundedSender<WalletEvent>,
    ) -> Self {
        WalletActor {
            state: ConnectionState::Idle,
            oracle,
            event_tx,
            resolve_at: None,
            revert_at: None,
        }
    }

    /// Run the actor message loop
    pub async fn run(mut self, mut cmd_rx: mpsc::UnboundedReceiver<WalletCommand>) {
        loop {
            let resolve_at = self.resolve_at;
            let revert_at = self.revert_at;
            tokio::select! {
                cmd = cmd_rx.recv() => {
                    match cmd {
                        Some(WalletCommand::Connect) => self.connect(),
                        Some(WalletCommand::Cancel) => self.cancel(),
                        Some(WalletCommand::Disconnect) => self.disconnect(),
                        Some(WalletCommand::Shutdown) | None => break,
                    }
                }
                _ = deadline(resolve_at) => self.resolve(),
                _ = deadline(revert_at) => self.revert(),
            }
        }
    }

    fn connect(&mut self) {
        match self.state {
            ConnectionState::Idle => {
                let delay = self.oracle.approval_delay();
                self.state = ConnectionState::Pending;
                self.resolve_at = Some(Instant::now() + delay);
                tracing::info!(delay_ms = delay.as_millis() as u64, "connection attempt started");
                let _ = self.event_tx.send(WalletEvent::ConnectPending);
            }
            // Only one attempt may be in flight; repeat connects are no-ops
            _ => tracing::warn!(state = ?self.state, "connect ignored"),
        }
    }

    fn resolve(&mut self) {
        self.resolve_at = None;
        match self.oracle.decide() {
            Verdict::Approved { account_address } => {
                tracing::info!(account = %account_address, "wallet approved connection");
                self.state = ConnectionState::Connected {
                    account_address: account_address.clone(),
                };
                let _ = self.event_tx.send(WalletEvent::Connected { account_address });
            }
            Verdict::Rejected => {
                tracing::info!("wallet rejected connection");
                self.reject(false, REJECTED_COOLDOWN);
            }
        }
    }

    fn cancel(&mut self) {
        if self.state == ConnectionState::Pending {
            tracing::info!("connection attempt cancelled");
            self.resolve_at = None;
            self.reject(true, CANCELLED_COOLDOWN);
        } else {
            tracing::warn!(state = ?self.state, "cancel ignored");
        }
    }

    fn reject(&mut self, cancelled: bool, cooldown: std::time::Duration) {
        self.state = ConnectionState::Rejected;
        self.revert_at = Some(Instant::now() + cooldown);
        let _ = self.event_tx.send(WalletEvent::Rejected { cancelled });
    }

    fn revert(&mut self) {
        self.revert_at = None;
        self.state = ConnectionState::Idle;
        let _ = self.event_tx.send(WalletEvent::BackToIdle);
    }

    fn disconnect(&mut self) {
        if matches!(self.state, ConnectionState::Connected { .. }) {
            tracing::info!("wallet disconnected");
            self.state = ConnectionState::Idle;
            let _ = self.event_tx.send(WalletEvent::Disconnected);
        } else {
            tracing::warn!(state = ?self.state, "disconnect ignored");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::time::Duration;

    /// Deterministic oracle with a fixed delay and scripted verdicts
    struct ScriptedOracle {
        delay: Duration,
        verdicts: VecDeque<Verdict>,
    }

    impl ScriptedOracle {
        fn new(delay: Duration, verdicts: Vec<Verdict>) -> Self {
            ScriptedOracle {
                delay,
                verdicts: verdicts.into(),
            }
        }
    }

    impl ApprovalOracle for ScriptedOracle {
        fn approval_delay(&mut self) -> Duration {
            self.delay
        }

        fn decide(&mut self) -> Verdict {
            self.verdicts.pop_front().expect("verdict scripted")
        }
    }

    fn approved(account: &str) -> Verdict {
        Verdict::Approved {
            account_address: account.into(),
        }
    }

    fn spawn_actor(
        oracle: ScriptedOracle,
    ) -> (
        mpsc::UnboundedSender<WalletCommand>,
        mpsc::UnboundedReceiver<WalletEvent>,
    ) {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        tokio::spawn(WalletActor::new(Box::new(oracle), event_tx).run(cmd_rx));
        (cmd_tx, event_rx)
    }

    #[tokio::test(start_paused = true)]
    async fn test_approved_attempt_connects() {
        let oracle = ScriptedOracle::new(
            Duration::from_secs(7),
            vec![approved("account_rdx1demo")],
        );
        let (cmd_tx, mut event_rx) = spawn_actor(oracle);

        cmd_tx.send(WalletCommand::Connect).unwrap();
        assert!(matches!(
            event_rx.recv().await,
            Some(WalletEvent::ConnectPending)
        ));
        match event_rx.recv().await {
            Some(WalletEvent::Connected { account_address }) => {
                assert_eq!(account_address, "account_rdx1demo");
            }
            other => panic!("expected Connected, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejection_cools_down_to_idle_and_allows_retry() {
        let oracle = ScriptedOracle::new(
            Duration::from_secs(5),
            vec![Verdict::Rejected, approved("account_rdx1retry")],
        );
        let (cmd_tx, mut event_rx) = spawn_actor(oracle);

        cmd_tx.send(WalletCommand::Connect).unwrap();
        assert!(matches!(
            event_rx.recv().await,
            Some(WalletEvent::ConnectPending)
        ));
        assert!(matches!(
            event_rx.recv().await,
            Some(WalletEvent::Rejected { cancelled: false })
        ));
        assert!(matches!(
            event_rx.recv().await,
            Some(WalletEvent::BackToIdle)
        ));

        cmd_tx.send(WalletCommand::Connect).unwrap();
        assert!(matches!(
            event_rx.recv().await,
            Some(WalletEvent::ConnectPending)
        ));
        assert!(matches!(
            event_rx.recv().await,
            Some(WalletEvent::Connected { .. })
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_preempts_pending_timer() {
        // Long delay; the verdict must never be consulted
        let oracle = ScriptedOracle::new(Duration::from_secs(600), vec![]);
        let (cmd_tx, mut event_rx) = spawn_actor(oracle);

        cmd_tx.send(WalletCommand::Connect).unwrap();
        cmd_tx.send(WalletCommand::Cancel).unwrap();

        assert!(matches!(
            event_rx.recv().await,
            Some(WalletEvent::ConnectPending)
        ));
        assert!(matches!(
            event_rx.recv().await,
            Some(WalletEvent::Rejected { cancelled: true })
        ));
        assert!(matches!(
            event_rx.recv().await,
            Some(WalletEvent::BackToIdle)
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_connect_while_pending_is_ignored() {
        let oracle = ScriptedOracle::new(
            Duration::from_secs(5),
            vec![approved("account_rdx1only")],
        );
        let (cmd_tx, mut event_rx) = spawn_actor(oracle);

        cmd_tx.send(WalletCommand::Connect).unwrap();
        cmd_tx.send(WalletCommand::Connect).unwrap();
        cmd_tx.send(WalletCommand::Connect).unwrap();

        assert!(matches!(
            event_rx.recv().await,
            Some(WalletEvent::ConnectPending)
        ));
        // Exactly one attempt resolves; the repeats produced no events
        assert!(matches!(
            event_rx.recv().await,
            Some(WalletEvent::Connected { .. })
        ));
        cmd_tx.send(WalletCommand::Shutdown).unwrap();
        assert!(event_rx.recv().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_connected_is_terminal_until_disconnect() {
        let oracle = ScriptedOracle::new(
            Duration::from_secs(5),
            vec![approved("account_rdx1a"), approved("account_rdx1b")],
        );
        let (cmd_tx, mut event_rx) = spawn_actor(oracle);

        cmd_tx.send(WalletCommand::Connect).unwrap();
        assert!(matches!(
            event_rx.recv().await,
            Some(WalletEvent::ConnectPending)
        ));
        assert!(matches!(
            event_rx.recv().await,
            Some(WalletEvent::Connected { .. })
        ));

        // Further connects bounce off the established connection
        cmd_tx.send(WalletCommand::Connect).unwrap();
        cmd_tx.send(WalletCommand::Disconnect).unwrap();
        assert!(matches!(
            event_rx.recv().await,
            Some(WalletEvent::Disconnected)
        ));

        cmd_tx.send(WalletCommand::Connect).unwrap();
        assert!(matches!(
            event_rx.recv().await,
            Some(WalletEvent::ConnectPending)
        ));
    }
}
