//! Approval oracle - the source of simulated wallet behavior
//!
//! The connection actor asks the oracle how long the "user" takes to react
//! and what they decide. Tests inject a scripted oracle; the demo uses the
//! random one.

use std::time::Duration;

use rand::distributions::Alphanumeric;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::constants::{
    ACCOUNT_ID_PREFIX, APPROVAL_SUCCESS_RATE, APPROVAL_WAIT_MAX, APPROVAL_WAIT_MIN,
};

/// Length of the random suffix on fabricated account addresses
const ACCOUNT_SUFFIX_LEN: usize = 26;

/// Outcome of a simulated approval round trip
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The wallet approved and reports a fabricated account address
    Approved { account_address: String },
    /// The user rejected the request
    Rejected,
}

/// Simulated external wallet approval
pub trait ApprovalOracle: Send {
    /// How long the approval round trip takes
    fn approval_delay(&mut self) -> Duration;

    /// The verdict reached once the delay elapses
    fn decide(&mut self) -> Verdict;
}

/// The reference behavior: 5-10 s wait, 80 % approval, random account id
pub struct RandomOracle {
    rng: StdRng,
}

impl RandomOracle {
    pub fn new() -> Self {
        RandomOracle {
            rng: StdRng::from_entropy(),
        }
    }

    /// Seeded variant so demo runs are reproducible
    pub fn seeded(seed: u64) -> Self {
        RandomOracle {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomOracle {
    fn default() -> Self {
        Self::new()
    }
}

impl ApprovalOracle for RandomOracle {
    fn approval_delay(&mut self) -> Duration {
        let millis = self
            .rng
            .gen_range(APPROVAL_WAIT_MIN.as_millis()..=APPROVAL_WAIT_MAX.as_millis());
        Duration::from_millis(millis as u64)
    }

    fn decide(&mut self) -> Verdict {
        if self.rng.gen_bool(APPROVAL_SUCCESS_RATE) {
            let suffix: String = (&mut self.rng)
                .sample_iter(&Alphanumeric)
                .take(ACCOUNT_SUFFIX_LEN)
                .map(|b| (b as char).to_ascii_lowercase())
                .collect();
            Verdict::Approved {
                account_address: format!("{}{}", ACCOUNT_ID_PREFIX, suffix),
            }
        } else {
            Verdict::Rejected
        }
    }
}
