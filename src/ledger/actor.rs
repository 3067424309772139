//! Ledger actor - command loop around the ledger state
//!
//! Owns the one scheduled auto-flush: when a tip pushes the pending batch
//! to the threshold, a deadline is armed inside the select loop instead of
//! spawning a detached timer, so a reset can cancel it and no ghost flush
//! fires against re-seeded state.

use tokio::sync::mpsc;
use tokio::time::{self, Instant};

use crate::constants::AUTO_FLUSH_DELAY;
use crate::ledger::state::Ledger;
use crate::messages::{FlushTrigger, LedgerCommand, LedgerEvent};
use crate::models::LedgerSnapshot;

/// Sleep until an optional deadline; no deadline means wait forever
async fn deadline(at: Option<Instant>) {
    match at {
        Some(at) => time::sleep_until(at).await,
        None => std::future::pending().await,
    }
}

/// Actor owning the ledger and its scheduled auto-flush
pub struct LedgerActor {
    ledger: Ledger,
    event_tx: mpsc::UnboundedSender<LedgerEvent>,
    snapshot_tx: mpsc::UnboundedSender<LedgerSnapshot>,
    flush_at: Option<Instant>,
}

impl LedgerActor {
    pub fn new(
        ledger: Ledger,
        event_tx: mpsc::UnboundedSender<LedgerEvent>,
        snapshot_tx: mpsc::UnboundedSender<LedgerSnapshot>,
    ) -> Self {
        LedgerActor {
            ledger,
            event_tx,
            snapshot_tx,
            flush_at: None,
        }
    }

    /// Run the actor message loop
    pub async fn run(mut self, mut cmd_rx: mpsc::UnboundedReceiver<LedgerCommand>) {
        // Publish the initial state before any command arrives
        self.publish_snapshot();

        loop {
            let flush_at = self.flush_at;
            tokio::select! {
                cmd = cmd_rx.recv() => {
                    match cmd {
                        Some(cmd) => {
                            if self.handle_command(cmd) {
                                break;
                            }
                            self.publish_snapshot();
                        }
                        None => break,
                    }
                }
                _ = deadline(flush_at) => {
                    self.fire_auto_flush();
                    self.publish_snapshot();
                }
            }
        }
    }

    /// Handle one command, returns true if shutdown was requested
    fn handle_command(&mut self, cmd: LedgerCommand) -> bool {
        match cmd {
            LedgerCommand::SendTip {
                tipper_address,
                streamer_address,
                token_address,
                amount,
            } => {
                let accepted =
                    self.ledger
                        .send_tip(&tipper_address, &streamer_address, &token_address, amount);
                let event = if accepted {
                    LedgerEvent::TipAccepted {
                        streamer_address,
                        token_address,
                        amount,
                    }
                } else {
                    LedgerEvent::TipRejected {
                        streamer_address,
                        token_address,
                        amount,
                    }
                };
                let _ = self.event_tx.send(event);

                if accepted && self.ledger.batch_ready() && self.flush_at.is_none() {
                    self.flush_at = Some(Instant::now() + AUTO_FLUSH_DELAY);
                    tracing::info!(
                        pending = self.ledger.pending_count(),
                        delay_ms = AUTO_FLUSH_DELAY.as_millis() as u64,
                        "batch threshold reached, flush scheduled"
                    );
                    let _ = self.event_tx.send(LedgerEvent::FlushScheduled {
                        pending: self.ledger.pending_count(),
                    });
                }
            }

            LedgerCommand::ForceFlush => {
                let count = self.ledger.pending_count();
                let event = if self.ledger.force_flush() {
                    // The scheduled flush has nothing left to settle
                    self.flush_at = None;
                    LedgerEvent::BatchFlushed {
                        count,
                        trigger: FlushTrigger::Manual,
                    }
                } else {
                    LedgerEvent::FlushSkipped {
                        trigger: FlushTrigger::Manual,
                    }
                };
                let _ = self.event_tx.send(event);
            }

            LedgerCommand::AddStreamer { address, name } => {
                let success = self.ledger.add_streamer(&address, &name);
                let _ = self
                    .event_tx
                    .send(LedgerEvent::AdminCompleted { op: "add_streamer", success });
            }

            LedgerCommand::RemoveStreamer { address } => {
                let success = self.ledger.remove_streamer(&address);
                let _ = self
                    .event_tx
                    .send(LedgerEvent::AdminCompleted { op: "remove_streamer", success });
            }

            LedgerCommand::AddToken {
                address,
                symbol,
                name,
            } => {
                let success = self.ledger.add_token(&address, &symbol, &name);
                let _ = self
                    .event_tx
                    .send(LedgerEvent::AdminCompleted { op: "add_token", success });
            }

            LedgerCommand::RemoveToken { address } => {
                let success = self.ledger.remove_token(&address);
                let _ = self
                    .event_tx
                    .send(LedgerEvent::AdminCompleted { op: "remove_token", success });
            }

            LedgerCommand::SetMinBatchSize(size) => {
                let success = self.ledger.set_min_batch_size(size);
                let _ = self
                    .event_tx
                    .send(LedgerEvent::AdminCompleted { op: "set_min_batch_size", success });
            }

            LedgerCommand::Reset => {
                self.flush_at = None;
                self.ledger.reset();
                let _ = self.event_tx.send(LedgerEvent::ResetDone);
            }

            LedgerCommand::Shutdown => return true,
        }

        false
    }

    fn fire_auto_flush(&mut self) {
        self.flush_at = None;
        let count = self.ledger.pending_count();
        // The batch can have emptied since scheduling (e.g. a streamer
        // removal purged it); a threshold flush on nothing is a skip
        let event = if self.ledger.force_flush() {
            LedgerEvent::BatchFlushed {
                count,
                trigger: FlushTrigger::Threshold,
            }
        } else {
            LedgerEvent::FlushSkipped {
                trigger: FlushTrigger::Threshold,
            }
        };
        let _ = self.event_tx.send(event);
    }

    fn publish_snapshot(&self) {
        let _ = self.snapshot_tx.send(self.ledger.snapshot());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::AUTO_FLUSH_DELAY;
    use crate::ledger::idgen::SequentialTxIds;
    use std::time::Duration;

    const STREAMER: &str = "component_rdx1cxyz123streamer1";
    const TOKEN: &str = "resource_rdx1t4xrd";

    struct Harness {
        cmd_tx: mpsc::UnboundedSender<LedgerCommand>,
        event_rx: mpsc::UnboundedReceiver<LedgerEvent>,
        snapshot_rx: mpsc::UnboundedReceiver<LedgerSnapshot>,
    }

    /// Spawn an actor around a two-tip-threshold ledger
    fn spawn_actor() -> Harness {
        let mut ledger = Ledger::new(Box::new(SequentialTxIds::new()));
        assert!(ledger.add_streamer(STREAMER, "Neymar Jr"));
        assert!(ledger.add_token(TOKEN, "XRD", "Radix"));
        assert!(ledger.set_min_batch_size(2));

        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (snapshot_tx, snapshot_rx) = mpsc::unbounded_channel();
        tokio::spawn(LedgerActor::new(ledger, event_tx, snapshot_tx).run(cmd_rx));

        Harness {
            cmd_tx,
            event_rx,
            snapshot_rx,
        }
    }

    fn tip(amount: f64) -> LedgerCommand {
        LedgerCommand::SendTip {
            tipper_address: "account_rdx1tipper1".into(),
            streamer_address: STREAMER.into(),
            token_address: TOKEN.into(),
            amount,
        }
    }

    async fn latest_snapshot(h: &mut Harness) -> LedgerSnapshot {
        let mut snapshot = h.snapshot_rx.recv().await.expect("snapshot");
        while let Ok(next) = h.snapshot_rx.try_recv() {
            snapshot = next;
        }
        snapshot
    }

    #[tokio::test(start_paused = true)]
    async fn test_auto_flush_fires_after_threshold() {
        let mut h = spawn_actor();
        h.cmd_tx.send(tip(1.0)).unwrap();
        h.cmd_tx.send(tip(2.0)).unwrap();

        let mut saw_scheduled = false;
        loop {
            match h.event_rx.recv().await.expect("event") {
                LedgerEvent::FlushScheduled { pending } => {
                    saw_scheduled = true;
                    assert_eq!(pending, 2);
                }
                LedgerEvent::BatchFlushed { count, trigger } => {
                    assert_eq!(count, 2);
                    assert_eq!(trigger, FlushTrigger::Threshold);
                    break;
                }
                LedgerEvent::TipAccepted { .. } => {}
                other => panic!("unexpected event: {other:?}"),
            }
        }
        assert!(saw_scheduled);

        let snapshot = latest_snapshot(&mut h).await;
        assert!(snapshot.pending_tips.is_empty());
        assert_eq!(snapshot.tip_history.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_cancels_scheduled_flush() {
        let mut h = spawn_actor();
        h.cmd_tx.send(tip(1.0)).unwrap();
        h.cmd_tx.send(tip(2.0)).unwrap();
        h.cmd_tx.send(LedgerCommand::Reset).unwrap();

        // Give the cancelled deadline plenty of simulated time to misfire
        tokio::time::sleep(AUTO_FLUSH_DELAY + Duration::from_secs(5)).await;
        h.cmd_tx.send(LedgerCommand::Shutdown).unwrap();

        let mut saw_reset = false;
        while let Some(event) = h.event_rx.recv().await {
            match event {
                LedgerEvent::BatchFlushed { .. } | LedgerEvent::FlushSkipped { .. } => {
                    panic!("flush fired after reset")
                }
                LedgerEvent::ResetDone => saw_reset = true,
                _ => {}
            }
        }
        assert!(saw_reset);
    }

    #[tokio::test(start_paused = true)]
    async fn test_manual_flush_disarms_schedule() {
        let mut h = spawn_actor();
        h.cmd_tx.send(tip(1.0)).unwrap();
        h.cmd_tx.send(tip(2.0)).unwrap();
        h.cmd_tx.send(LedgerCommand::ForceFlush).unwrap();

        tokio::time::sleep(AUTO_FLUSH_DELAY + Duration::from_secs(5)).await;
        h.cmd_tx.send(LedgerCommand::Shutdown).unwrap();

        let mut flushes = 0;
        let mut skips = 0;
        while let Some(event) = h.event_rx.recv().await {
            match event {
                LedgerEvent::BatchFlushed { trigger, .. } => {
                    assert_eq!(trigger, FlushTrigger::Manual);
                    flushes += 1;
                }
                LedgerEvent::FlushSkipped { .. } => skips += 1,
                _ => {}
            }
        }
        assert_eq!(flushes, 1, "exactly one settlement");
        assert_eq!(skips, 0, "disarmed deadline must not fire");
    }

    #[tokio::test(start_paused = true)]
    async fn test_admin_commands_report_outcome() {
        let mut h = spawn_actor();
        h.cmd_tx
            .send(LedgerCommand::AddStreamer {
                address: STREAMER.into(),
                name: "Duplicate".into(),
            })
            .unwrap();
        h.cmd_tx.send(LedgerCommand::SetMinBatchSize(0)).unwrap();
        h.cmd_tx.send(LedgerCommand::Shutdown).unwrap();

        let mut outcomes = Vec::new();
        while let Some(event) = h.event_rx.recv().await {
            if let LedgerEvent::AdminCompleted { op, success } = event {
                outcomes.push((op, success));
            }
        }
        assert_eq!(
            outcomes,
            vec![("add_streamer", false), ("set_min_batch_size", false)]
        );

        let snapshot = latest_snapshot(&mut h).await;
        assert_eq!(snapshot.min_batch_size, 2);
    }
}
