//! Ledger state - pure in-memory stand-in for the tipping contract
//!
//! All mutation operations are synchronous, atomic, and report success as a
//! plain boolean: a failed operation leaves no partial effect and surfaces
//! no error detail, keeping the simulated contract "always available".

use std::collections::{BTreeSet, HashMap};

use chrono::{Duration, Utc};

use crate::constants::{DEFAULT_MIN_BATCH_SIZE, NEW_TOKEN_SEED_BALANCE};
use crate::ledger::idgen::TxIdSource;
use crate::models::{LedgerSnapshot, PendingTip, Streamer, TipRecord, Token};

/// What happens to outstanding pending tips when their token is removed.
///
/// Streamer removal always purges; token removal is left open by the
/// product, so both behaviors exist as explicit policies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TokenRemovalPolicy {
    /// Leave pending tips in place even though their token is gone
    #[default]
    KeepPendingTips,
    /// Purge pending tips referencing the removed token
    PurgePendingTips,
}

/// In-memory mock of the tip-aggregator contract state
pub struct Ledger {
    streamers: Vec<Streamer>,
    supported_tokens: HashMap<String, Token>,
    pending_tips: Vec<PendingTip>,
    tip_history: Vec<TipRecord>,
    /// Derived from `pending_tips`; recomputed on every pending mutation
    streamers_with_pending_tips: Vec<String>,
    min_batch_size: usize,
    token_removal: TokenRemovalPolicy,
    tx_ids: Box<dyn TxIdSource>,
}

impl Ledger {
    /// An empty ledger with no registered streamers or tokens
    pub fn new(tx_ids: Box<dyn TxIdSource>) -> Self {
        Ledger {
            streamers: Vec::new(),
            supported_tokens: HashMap::new(),
            pending_tips: Vec::new(),
            tip_history: Vec::new(),
            streamers_with_pending_tips: Vec::new(),
            min_batch_size: DEFAULT_MIN_BATCH_SIZE,
            token_removal: TokenRemovalPolicy::default(),
            tx_ids,
        }
    }

    /// The demo ledger: seeded roster, token balances, and a little
    /// pre-existing activity so the first snapshot is not empty
    pub fn seeded(tx_ids: Box<dyn TxIdSource>) -> Self {
        let mut ledger = Self::new(tx_ids);
        ledger.apply_seed();
        ledger.seed_demo_activity();
        ledger
    }

    pub fn with_token_removal_policy(mut self, policy: TokenRemovalPolicy) -> Self {
        self.token_removal = policy;
        self
    }

    fn apply_seed(&mut self) {
        self.streamers = vec![
            Streamer::new("component_rdx1cxyz123streamer1", "Neymar Jr"),
            Streamer::new("component_rdx1cxyz123streamer2", "xQc"),
            Streamer::new("component_rdx1cxyz123streamer3", "Pokimane"),
            Streamer::new("component_rdx1cxyz123streamer4", "Ninja"),
            Streamer::new("component_rdx1cxyz123streamer5", "Shroud"),
            Streamer::new("component_rdx1cxyz123streamer6", "Amouranth"),
            Streamer::new("component_rdx1cxyz123streamer7", "HasanAbi"),
            Streamer::new("component_rdx1cxyz123streamer8", "Ludwig"),
        ];
        self.supported_tokens = HashMap::from([
            (
                "resource_rdx1t4xrd".to_string(),
                Token::new("XRD", "Radix", 1000.0),
            ),
            (
                "resource_rdx1t4usdt".to_string(),
                Token::new("USDT", "Tether USD (Radix)", 500.0),
            ),
        ]);
        self.pending_tips = Vec::new();
        self.tip_history = Vec::new();
        self.streamers_with_pending_tips = Vec::new();
        self.min_batch_size = DEFAULT_MIN_BATCH_SIZE;
    }

    /// Pre-existing pending tips and history shown on first load
    fn seed_demo_activity(&mut self) {
        let now = Utc::now();
        self.pending_tips = vec![
            PendingTip {
                tipper_address: "account_rdx1tipper1".into(),
                streamer_address: "component_rdx1cxyz123streamer1".into(),
                token_address: "resource_rdx1t4xrd".into(),
                amount: 10.5,
                timestamp: now - Duration::hours(1),
            },
            PendingTip {
                tipper_address: "account_rdx1tipper2".into(),
                streamer_address: "component_rdx1cxyz123streamer1".into(),
                token_address: "resource_rdx1t4usdt".into(),
                amount: 5.0,
                timestamp: now - Duration::minutes(30),
            },
            PendingTip {
                tipper_address: "account_rdx1tipper3".into(),
                streamer_address: "component_rdx1cxyz123streamer2".into(),
                token_address: "resource_rdx1t4xrd".into(),
                amount: 25.0,
                timestamp: now - Duration::minutes(15),
            },
        ];
        self.recompute_pending_streamers();

        self.tip_history = vec![
            TipRecord {
                tipper_address: "account_rdx1tipper4".into(),
                streamer_address: "component_rdx1cxyz123streamer3".into(),
                token_address: "resource_rdx1t4usdt".into(),
                amount: 15.0,
                timestamp: now - Duration::days(1),
                transaction_id: "txn_rdx1abc123".into(),
            },
            TipRecord {
                tipper_address: "account_rdx1tipper5".into(),
                streamer_address: "component_rdx1cxyz123streamer4".into(),
                token_address: "resource_rdx1t4xrd".into(),
                amount: 30.0,
                timestamp: now - Duration::days(2),
                transaction_id: "txn_rdx1def456".into(),
            },
        ];
    }

    /// Recompute the derived set of streamers with pending tips.
    ///
    /// Always a full recomputation from the pending list, never an
    /// incremental update, so the derived set cannot drift.
    fn recompute_pending_streamers(&mut self) {
        let distinct: BTreeSet<&str> = self
            .pending_tips
            .iter()
            .map(|tip| tip.streamer_address.as_str())
            .collect();
        self.streamers_with_pending_tips = distinct.into_iter().map(String::from).collect();
    }

    /// Accept a tip into the pending batch.
    ///
    /// Validates the addresses, the amount, and the simulated token
    /// balance; on any failure nothing changes and `false` comes back.
    pub fn send_tip(
        &mut self,
        tipper_address: &str,
        streamer_address: &str,
        token_address: &str,
        amount: f64,
    ) -> bool {
        if tipper_address.is_empty() || streamer_address.is_empty() || token_address.is_empty() {
            return false;
        }
        // NaN fails this comparison too
        if !(amount > 0.0) {
            return false;
        }
        if !self.streamers.iter().any(|s| s.address == streamer_address) {
            return false;
        }
        let Some(token) = self.supported_tokens.get_mut(token_address) else {
            return false;
        };
        if token.balance < amount {
            return false;
        }

        token.balance -= amount;
        self.pending_tips.push(PendingTip {
            tipper_address: tipper_address.to_string(),
            streamer_address: streamer_address.to_string(),
            token_address: token_address.to_string(),
            amount,
            timestamp: Utc::now(),
        });
        self.recompute_pending_streamers();

        tracing::info!(
            tipper = %tipper_address,
            streamer = %streamer_address,
            token = %token_address,
            amount,
            pending = self.pending_tips.len(),
            "tip accepted"
        );
        true
    }

    /// Whether the pending batch has reached the flush threshold
    pub fn batch_ready(&self) -> bool {
        self.pending_tips.len() >= self.min_batch_size
    }

    /// Settle every pending tip into history under fresh transaction ids.
    ///
    /// This is the only write path into history. Fails on an empty batch.
    pub fn force_flush(&mut self) -> bool {
        if self.pending_tips.is_empty() {
            return false;
        }

        let batch = std::mem::take(&mut self.pending_tips);
        let count = batch.len();
        for tip in batch {
            let txn_id = self.tx_ids.next_transaction_id();
            self.tip_history.push(TipRecord::settle(tip, txn_id));
        }
        self.recompute_pending_streamers();

        tracing::info!(count, history = self.tip_history.len(), "batch settled");
        true
    }

    /// Register a streamer; fails if the address is already registered
    pub fn add_streamer(&mut self, address: &str, name: &str) -> bool {
        if address.is_empty() || self.streamers.iter().any(|s| s.address == address) {
            return false;
        }
        self.streamers.push(Streamer::new(address, name));
        tracing::info!(streamer = %address, name = %name, "streamer registered");
        true
    }

    /// Remove a streamer and purge their pending tips.
    ///
    /// History entries referencing the streamer are left untouched.
    pub fn remove_streamer(&mut self, address: &str) -> bool {
        let Some(index) = self.streamers.iter().position(|s| s.address == address) else {
            return false;
        };
        self.streamers.remove(index);
        self.pending_tips.retain(|tip| tip.streamer_address != address);
        self.recompute_pending_streamers();
        tracing::info!(streamer = %address, "streamer removed");
        true
    }

    /// Register a token; new tokens start with a simulated faucet balance
    pub fn add_token(&mut self, address: &str, symbol: &str, name: &str) -> bool {
        if address.is_empty() || self.supported_tokens.contains_key(address) {
            return false;
        }
        self.supported_tokens.insert(
            address.to_string(),
            Token::new(symbol, name, NEW_TOKEN_SEED_BALANCE),
        );
        tracing::info!(token = %address, symbol = %symbol, "token registered");
        true
    }

    /// Remove a token; outstanding pending tips follow the removal policy
    pub fn remove_token(&mut self, address: &str) -> bool {
        if self.supported_tokens.remove(address).is_none() {
            return false;
        }
        if self.token_removal == TokenRemovalPolicy::PurgePendingTips {
            self.pending_tips.retain(|tip| tip.token_address != address);
            self.recompute_pending_streamers();
        }
        tracing::info!(token = %address, policy = ?self.token_removal, "token removed");
        true
    }

    /// Change the batch threshold; anything below 1 is rejected
    pub fn set_min_batch_size(&mut self, size: usize) -> bool {
        if size < 1 {
            return false;
        }
        self.min_batch_size = size;
        tracing::info!(min_batch_size = size, "batch threshold changed");
        true
    }

    /// Defensive copy of the full state for read-only consumption
    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            streamers: self.streamers.clone(),
            supported_tokens: self.supported_tokens.clone(),
            pending_tips: self.pending_tips.clone(),
            tip_history: self.tip_history.clone(),
            streamers_with_pending_tips: self.streamers_with_pending_tips.clone(),
            min_batch_size: self.min_batch_size,
        }
    }

    /// Restore the original seeded roster and balances, clearing all
    /// pending tips and history
    pub fn reset(&mut self) {
        self.apply_seed();
        tracing::info!("ledger reset to seeded state");
    }

    pub fn pending_count(&self) -> usize {
        self.pending_tips.len()
    }

    /// Total pending amount for one streamer in one token
    pub fn pending_amount_for(&self, streamer_address: &str, token_address: &str) -> f64 {
        self.pending_tips
            .iter()
            .filter(|tip| {
                tip.streamer_address == streamer_address && tip.token_address == token_address
            })
            .map(|tip| tip.amount)
            .sum()
    }

    pub fn streamers_with_pending_tips(&self) -> &[String] {
        &self.streamers_with_pending_tips
    }

    pub fn min_batch_size(&self) -> usize {
        self.min_batch_size
    }

    pub fn token_balance(&self, token_address: &str) -> Option<f64> {
        self.supported_tokens.get(token_address).map(|t| t.balance)
    }
}
