//! Fabricated transaction identifiers.
//!
//! The mock settles batches under made-up `txn_rdx1...` identifiers. The
//! source of those identifiers is a trait so tests can inject a
//! deterministic sequence instead of random suffixes.

use rand::distributions::Alphanumeric;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::constants::TXN_ID_PREFIX;

/// Length of the random suffix on fabricated transaction ids
const TXN_SUFFIX_LEN: usize = 13;

/// Source of fabricated transaction identifiers
pub trait TxIdSource: Send {
    /// Produce the identifier for the next settled transaction
    fn next_transaction_id(&mut self) -> String;
}

/// Random `txn_rdx1...` identifiers, the normal mode of the simulation
pub struct RandomTxIds {
    rng: StdRng,
}

impl RandomTxIds {
    pub fn new() -> Self {
        RandomTxIds {
            rng: StdRng::from_entropy(),
        }
    }

    /// Seeded variant so demo runs are reproducible
    pub fn seeded(seed: u64) -> Self {
        RandomTxIds {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomTxIds {
    fn default() -> Self {
        Self::new()
    }
}

impl TxIdSource for RandomTxIds {
    fn next_transaction_id(&mut self) -> String {
        let suffix: String = (&mut self.rng)
            .sample_iter(&Alphanumeric)
            .take(TXN_SUFFIX_LEN)
            .map(|b| (b as char).to_ascii_lowercase())
            .collect();
        format!("{}{}", TXN_ID_PREFIX, suffix)
    }
}

/// Deterministic `txn_rdx1seq0`, `txn_rdx1seq1`, ... identifiers for tests
pub struct SequentialTxIds {
    next: u64,
}

impl SequentialTxIds {
    pub fn new() -> Self {
        SequentialTxIds { next: 0 }
    }
}

impl Default for SequentialTxIds {
    fn default() -> Self {
        Self::new()
    }
}

impl TxIdSource for SequentialTxIds {
    fn next_transaction_id(&mut self) -> String {
        let id = format!("{}seq{}", TXN_ID_PREFIX, self.next);
        self.next += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_ids_have_prefix_and_length() {
        let mut source = RandomTxIds::seeded(7);
        let id = source.next_transaction_id();
        assert!(id.starts_with(TXN_ID_PREFIX));
        assert_eq!(id.len(), TXN_ID_PREFIX.len() + TXN_SUFFIX_LEN);
    }

    #[test]
    fn test_random_ids_are_distinct() {
        let mut source = RandomTxIds::seeded(7);
        let a = source.next_transaction_id();
        let b = source.next_transaction_id();
        assert_ne!(a, b);
    }

    #[test]
    fn test_sequential_ids() {
        let mut source = SequentialTxIds::new();
        assert_eq!(source.next_transaction_id(), "txn_rdx1seq0");
        assert_eq!(source.next_transaction_id(), "txn_rdx1seq1");
    }
}
