use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A token supported by the mock contract.
///
/// The balance simulates the funds the contract holds on behalf of tippers;
/// it is decremented when a tip is accepted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub symbol: String,
    pub name: String,
    pub balance: f64,
}

impl Token {
    pub fn new(symbol: impl Into<String>, name: impl Into<String>, balance: f64) -> Self {
        Token {
            symbol: symbol.into(),
            name: name.into(),
            balance,
        }
    }
}

/// A registered tip recipient (termed "creator" in parts of the UI)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Streamer {
    pub address: String,
    pub name: String,
}

impl Streamer {
    pub fn new(address: impl Into<String>, name: impl Into<String>) -> Self {
        Streamer {
            address: address.into(),
            name: name.into(),
        }
    }
}

/// A tip accepted by the ledger but not yet settled into history
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PendingTip {
    pub tipper_address: String,
    pub streamer_address: String,
    pub token_address: String,
    pub amount: f64,
    pub timestamp: DateTime<Utc>,
}

/// A settled tip. Append-only; history entries are never mutated or removed
/// outside a wholesale reset.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TipRecord {
    pub tipper_address: String,
    pub streamer_address: String,
    pub token_address: String,
    pub amount: f64,
    pub timestamp: DateTime<Utc>,
    /// Fabricated transaction identifier, assigned at flush time
    pub transaction_id: String,
}

impl TipRecord {
    /// Settle a pending tip under the given fabricated transaction id
    pub fn settle(tip: PendingTip, transaction_id: String) -> Self {
        TipRecord {
            tipper_address: tip.tipper_address,
            streamer_address: tip.streamer_address,
            token_address: tip.token_address,
            amount: tip.amount,
            timestamp: tip.timestamp,
            transaction_id,
        }
    }
}

/// Defensive copy of the full ledger state, for read-only consumption.
///
/// Callers poll this on a fixed cadence; there is no push mechanism.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub streamers: Vec<Streamer>,
    pub supported_tokens: HashMap<String, Token>,
    pub pending_tips: Vec<PendingTip>,
    pub tip_history: Vec<TipRecord>,
    /// Distinct streamer addresses with at least one pending tip, sorted
    pub streamers_with_pending_tips: Vec<String>,
    pub min_batch_size: usize,
}

impl LedgerSnapshot {
    /// Look up a streamer's display name, falling back to the raw address
    pub fn streamer_name<'a>(&'a self, address: &'a str) -> &'a str {
        self.streamers
            .iter()
            .find(|s| s.address == address)
            .map(|s| s.name.as_str())
            .unwrap_or(address)
    }

    /// Look up a token's symbol, falling back to the raw address
    pub fn token_symbol<'a>(&'a self, address: &'a str) -> &'a str {
        self.supported_tokens
            .get(address)
            .map(|t| t.symbol.as_str())
            .unwrap_or(address)
    }

    /// Total amount ever settled per token address
    pub fn settled_totals(&self) -> HashMap<String, f64> {
        let mut totals = HashMap::new();
        for record in &self.tip_history {
            *totals.entry(record.token_address.clone()).or_insert(0.0) += record.amount;
        }
        totals
    }
}

/// Abbreviate a long bech32-style address for display: `account_rdx1...ab12cd34`
pub fn short_address(address: &str) -> String {
    if address.len() <= 20 {
        return address.to_string();
    }
    format!("{}...{}", &address[..12], &address[address.len() - 8..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_address_truncates_long() {
        let addr = "account_rdx1qwertyuiopasdfghjklzxcvbnm";
        let short = short_address(addr);
        assert_eq!(short, "account_rdx1...lzxcvbnm");
    }

    #[test]
    fn test_short_address_keeps_short() {
        assert_eq!(short_address("txn_rdx1abc"), "txn_rdx1abc");
    }

    #[test]
    fn test_settle_carries_tip_fields() {
        let tip = PendingTip {
            tipper_address: "account_rdx1tipper1".into(),
            streamer_address: "component_rdx1streamer1".into(),
            token_address: "resource_rdx1t4xrd".into(),
            amount: 12.5,
            timestamp: Utc::now(),
        };
        let record = TipRecord::settle(tip.clone(), "txn_rdx1abc123".into());
        assert_eq!(record.tipper_address, tip.tipper_address);
        assert_eq!(record.amount, 12.5);
        assert_eq!(record.transaction_id, "txn_rdx1abc123");
    }
}
