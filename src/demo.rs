//! Demo workload helpers
//!
//! Fabricated tippers and randomized tip traffic for the console demo, so
//! the ledger has something to batch without a real audience behind it.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::messages::LedgerCommand;
use crate::models::LedgerSnapshot;

/// The recurring cast of demo tippers
pub const DEMO_TIPPERS: [&str; 5] = [
    "account_rdx1tipper1",
    "account_rdx1tipper2",
    "account_rdx1tipper3",
    "account_rdx1tipper4",
    "account_rdx1tipper5",
];

/// Extra streamers the demo registers on top of the seeded roster
pub const EXTRA_STREAMERS: [(&str, &str); 3] = [
    ("component_rdx1test1", "Valkyrae"),
    ("component_rdx1test2", "TimTheTatman"),
    ("component_rdx1test3", "DrDisrespect"),
];

/// Commands registering the extra demo streamers
pub fn register_extra_streamers() -> Vec<LedgerCommand> {
    EXTRA_STREAMERS
        .iter()
        .map(|(address, name)| LedgerCommand::AddStreamer {
            address: (*address).to_string(),
            name: (*name).to_string(),
        })
        .collect()
}

/// A random tip against the rosters in the given snapshot.
///
/// Amounts land in 1.00..=51.00 rounded to cents. Returns `None` when the
/// snapshot has no streamers or no tokens to tip with.
pub fn random_tip(snapshot: &LedgerSnapshot, rng: &mut StdRng) -> Option<LedgerCommand> {
    let tipper = DEMO_TIPPERS.choose(rng)?;
    let streamer = snapshot.streamers.choose(rng)?;
    let tokens: Vec<&String> = snapshot.supported_tokens.keys().collect();
    let token = tokens.choose(rng)?;
    let amount = (rng.gen_range(1.0..51.0) * 100.0_f64).round() / 100.0;

    Some(LedgerCommand::SendTip {
        tipper_address: (*tipper).to_string(),
        streamer_address: streamer.address.clone(),
        token_address: (*token).to_string(),
        amount,
    })
}

/// A burst of random tips against one snapshot
pub fn random_tips(
    snapshot: &LedgerSnapshot,
    rng: &mut StdRng,
    count: usize,
) -> Vec<LedgerCommand> {
    (0..count)
        .filter_map(|_| random_tip(snapshot, rng))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{Ledger, SequentialTxIds};
    use rand::SeedableRng;

    #[test]
    fn test_random_tip_targets_known_parties() {
        let ledger = Ledger::seeded(Box::new(SequentialTxIds::new()));
        let snapshot = ledger.snapshot();
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..100 {
            let Some(LedgerCommand::SendTip {
                tipper_address,
                streamer_address,
                token_address,
                amount,
            }) = random_tip(&snapshot, &mut rng)
            else {
                panic!("seeded snapshot must yield a tip");
            };
            assert!(DEMO_TIPPERS.contains(&tipper_address.as_str()));
            assert!(snapshot
                .streamers
                .iter()
                .any(|s| s.address == streamer_address));
            assert!(snapshot.supported_tokens.contains_key(&token_address));
            assert!((1.0..=51.0).contains(&amount));
        }
    }

    #[test]
    fn test_random_tip_on_empty_roster_is_none() {
        let ledger = Ledger::new(Box::new(SequentialTxIds::new()));
        let mut rng = StdRng::seed_from_u64(42);
        assert!(random_tip(&ledger.snapshot(), &mut rng).is_none());
    }

    #[test]
    fn test_random_tips_burst_size() {
        let ledger = Ledger::seeded(Box::new(SequentialTxIds::new()));
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(random_tips(&ledger.snapshot(), &mut rng, 8).len(), 8);
    }
}
