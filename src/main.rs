//! tipbatch - console demo of the batched tipping ledger
//!
//! Flow: round-trip the simulated wallet approval (retrying through
//! rejections), register extra demo streamers, then stream random tips
//! while polling ledger snapshots on a fixed cadence until a few batches
//! have settled. Finishes with a force-flush and a JSON dump of the final
//! state.

use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::mpsc;
use tokio::time;

use tipbatch::constants::SNAPSHOT_POLL_INTERVAL;
use tipbatch::demo;
use tipbatch::{
    short_address, FlushTrigger, Ledger, LedgerActor, LedgerCommand, LedgerEvent, LedgerSnapshot,
    RandomOracle, RandomTxIds, WalletActor, WalletCommand, WalletEvent,
};

/// Stop the demo once this many batches have settled
const TARGET_BATCHES: usize = 3;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_target(false).init();

    // Create channels
    let (ledger_tx, ledger_rx) = mpsc::unbounded_channel::<LedgerCommand>();
    let (ledger_event_tx, mut ledger_event_rx) = mpsc::unbounded_channel::<LedgerEvent>();
    let (snapshot_tx, mut snapshot_rx) = mpsc::unbounded_channel::<LedgerSnapshot>();
    let (wallet_tx, wallet_rx) = mpsc::unbounded_channel::<WalletCommand>();
    let (wallet_event_tx, mut wallet_event_rx) = mpsc::unbounded_channel::<WalletEvent>();

    // Spawn the ledger actor around the seeded demo ledger
    let ledger = Ledger::seeded(Box::new(RandomTxIds::new()));
    tokio::spawn(LedgerActor::new(ledger, ledger_event_tx, snapshot_tx).run(ledger_rx));

    // Spawn the wallet actor with the reference random behavior
    let wallet = WalletActor::new(Box::new(RandomOracle::new()), wallet_event_tx);
    tokio::spawn(wallet.run(wallet_rx));

    let account = connect_wallet(&wallet_tx, &mut wallet_event_rx).await?;
    tracing::info!(account = %short_address(&account), "tipping as connected account");

    // One scripted tip from the connected account, then the random crowd
    ledger_tx.send(LedgerCommand::SendTip {
        tipper_address: account,
        streamer_address: "component_rdx1cxyz123streamer1".into(),
        token_address: "resource_rdx1t4xrd".into(),
        amount: 12.34,
    })?;
    for cmd in demo::register_extra_streamers() {
        ledger_tx.send(cmd)?;
    }

    let final_snapshot =
        run_demo_loop(&ledger_tx, &mut ledger_event_rx, &mut snapshot_rx).await?;
    println!("{}", serde_json::to_string_pretty(&final_snapshot)?);

    // Wind down
    wallet_tx.send(WalletCommand::Disconnect)?;
    wallet_tx.send(WalletCommand::Shutdown)?;
    ledger_tx.send(LedgerCommand::Shutdown)?;
    Ok(())
}

/// Drive the wallet state machine until an attempt is approved
async fn connect_wallet(
    wallet_tx: &mpsc::UnboundedSender<WalletCommand>,
    wallet_event_rx: &mut mpsc::UnboundedReceiver<WalletEvent>,
) -> anyhow::Result<String> {
    wallet_tx.send(WalletCommand::Connect)?;
    loop {
        match wallet_event_rx.recv().await {
            Some(WalletEvent::ConnectPending) => {
                tracing::info!("open your wallet app to approve the connection...");
            }
            Some(WalletEvent::Connected { account_address }) => return Ok(account_address),
            Some(WalletEvent::Rejected { cancelled }) => {
                tracing::warn!(cancelled, "connection rejected, retrying after cool-down");
            }
            Some(WalletEvent::BackToIdle) => {
                wallet_tx.send(WalletCommand::Connect)?;
            }
            Some(WalletEvent::Disconnected) => {}
            None => anyhow::bail!("wallet actor stopped before connecting"),
        }
    }
}

/// Poll snapshots and feed random tips until enough batches settle,
/// then settle the remainder and return the final state
async fn run_demo_loop(
    ledger_tx: &mpsc::UnboundedSender<LedgerCommand>,
    ledger_event_rx: &mut mpsc::UnboundedReceiver<LedgerEvent>,
    snapshot_rx: &mut mpsc::UnboundedReceiver<LedgerSnapshot>,
) -> anyhow::Result<LedgerSnapshot> {
    let mut rng = StdRng::from_entropy();
    let mut poll = time::interval(SNAPSHOT_POLL_INTERVAL);
    let mut current = LedgerSnapshot::default();
    let mut settled = 0;

    loop {
        tokio::select! {
            _ = poll.tick() => {
                while let Ok(snapshot) = snapshot_rx.try_recv() {
                    current = snapshot;
                }
                tracing::info!(
                    pending = current.pending_tips.len(),
                    history = current.tip_history.len(),
                    busy_streamers = current.streamers_with_pending_tips.len(),
                    "ledger poll"
                );
                let busy: Vec<&str> = current
                    .streamers_with_pending_tips
                    .iter()
                    .map(|addr| current.streamer_name(addr))
                    .collect();
                tracing::debug!(?busy, "streamers awaiting settlement");
                if let Some(cmd) = demo::random_tip(&current, &mut rng) {
                    ledger_tx.send(cmd)?;
                }
            }
            event = ledger_event_rx.recv() => {
                let Some(event) = event else {
                    anyhow::bail!("ledger actor stopped mid-demo");
                };
                notify(&event);
                if matches!(event, LedgerEvent::BatchFlushed { .. }) {
                    settled += 1;
                    if settled >= TARGET_BATCHES {
                        break;
                    }
                }
            }
        }
    }

    // Settle whatever is still pending before the final report
    ledger_tx.send(LedgerCommand::ForceFlush)?;
    loop {
        match ledger_event_rx.recv().await {
            Some(LedgerEvent::BatchFlushed { trigger: FlushTrigger::Manual, count }) => {
                tracing::info!(count, "final batch settled");
                break;
            }
            Some(LedgerEvent::FlushSkipped { trigger: FlushTrigger::Manual }) => break,
            Some(event) => notify(&event),
            None => anyhow::bail!("ledger actor stopped mid-demo"),
        }
    }

    let mut latest = snapshot_rx.recv().await.unwrap_or(current);
    while let Ok(snapshot) = snapshot_rx.try_recv() {
        latest = snapshot;
    }
    for (token_address, total) in latest.settled_totals() {
        tracing::info!(
            token = %latest.token_symbol(&token_address),
            total,
            "settled to date"
        );
    }
    Ok(latest)
}

/// Surface ledger outcomes as transient user notifications.
///
/// Successful mutations already log from the ledger itself; the driver's
/// job is the failure toasts and settlement confirmations.
fn notify(event: &LedgerEvent) {
    match event {
        LedgerEvent::TipRejected {
            streamer_address,
            token_address,
            amount,
        } => tracing::warn!(
            streamer = %short_address(streamer_address),
            token = %token_address,
            amount,
            "tip rejected"
        ),
        LedgerEvent::FlushSkipped { trigger } => {
            tracing::warn!(?trigger, "flush skipped, nothing pending");
        }
        LedgerEvent::BatchFlushed { count, trigger } => {
            tracing::info!(count, ?trigger, "settlement confirmed");
        }
        LedgerEvent::AdminCompleted { op, success: false } => {
            tracing::warn!(op, "admin operation failed");
        }
        _ => {}
    }
}
