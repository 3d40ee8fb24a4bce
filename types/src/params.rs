//! Protocol parameters shared by the ledger and the consensus engine.
//!
//! These are injected at startup (never process-wide state). Every voter in
//! a network must run with identical values or their ledgers diverge.

use serde::{Deserialize, Serialize};

use crate::ArbiterError;

/// Denominator for basis-point thresholds.
pub const BPS_DENOMINATOR: u64 = 10_000;

/// Default fee debited from each party of an initiation or encounter.
pub const DEFAULT_TRANSACTION_FEE: u64 = 360;

/// Scale factor of the logistic skill update.
pub const SKILL_K: i64 = 1000;

/// Default per-round thresholds. Round 0 collects, the last round finalizes.
pub const DEFAULT_ROUND_THRESHOLDS_BPS: [u32; 5] = [0, 5000, 6000, 7000, 8000];

/// Default round timer interval.
pub const DEFAULT_ROUND_DURATION_MS: u64 = 1000;

/// All protocol parameters stored by every voter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolParams {
    /// Fee debited from each participant of an initiation or encounter.
    #[serde(default = "default_fee")]
    pub transaction_fee: u64,

    /// Support threshold per round, in basis points of the stake seen.
    /// Index 0 must be 0 (collection round); the last entry is the final round.
    #[serde(default = "default_thresholds")]
    pub round_thresholds_bps: Vec<u32>,

    /// Timer interval driving round advancement.
    #[serde(default = "default_round_duration")]
    pub round_duration_ms: u64,
}

fn default_fee() -> u64 {
    DEFAULT_TRANSACTION_FEE
}

fn default_thresholds() -> Vec<u32> {
    DEFAULT_ROUND_THRESHOLDS_BPS.to_vec()
}

fn default_round_duration() -> u64 {
    DEFAULT_ROUND_DURATION_MS
}

impl ProtocolParams {
    /// Number of rounds per epoch (`R`).
    pub fn round_count(&self) -> usize {
        self.round_thresholds_bps.len()
    }

    /// Threshold for `round`, clamped to the final round.
    pub fn threshold_bps(&self, round: usize) -> u32 {
        let last = self.round_count().saturating_sub(1);
        self.round_thresholds_bps
            .get(round.min(last))
            .copied()
            .unwrap_or(0)
    }

    /// Check internal consistency: at least two rounds, a zero collection
    /// round, non-decreasing thresholds, none above 100%.
    pub fn validate(&self) -> Result<(), ArbiterError> {
        if self.round_thresholds_bps.len() < 2 {
            return Err(ArbiterError::InvalidParams("at least two rounds are required".into()));
        }
        if self.round_thresholds_bps[0] != 0 {
            return Err(ArbiterError::InvalidParams("round 0 must have threshold 0".into()));
        }
        if self
            .round_thresholds_bps
            .iter()
            .any(|&t| u64::from(t) > BPS_DENOMINATOR)
        {
            return Err(ArbiterError::InvalidParams("thresholds must not exceed 10000 bps".into()));
        }
        if self.round_thresholds_bps.windows(2).any(|w| w[0] > w[1]) {
            return Err(ArbiterError::InvalidParams("thresholds must be non-decreasing".into()));
        }
        if self.round_duration_ms == 0 {
            return Err(ArbiterError::InvalidParams("round duration must be positive".into()));
        }
        Ok(())
    }
}

impl Default for ProtocolParams {
    fn default() -> Self {
        Self {
            transaction_fee: DEFAULT_TRANSACTION_FEE,
            round_thresholds_bps: default_thresholds(),
            round_duration_ms: DEFAULT_ROUND_DURATION_MS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let p = ProtocolParams::default();
        assert!(p.validate().is_ok());
        assert_eq!(p.round_count(), 5);
        assert_eq!(p.threshold_bps(0), 0);
        assert_eq!(p.threshold_bps(4), 8000);
        assert_eq!(p.threshold_bps(99), 8000);
    }

    #[test]
    fn rejects_nonzero_collection_round() {
        let p = ProtocolParams {
            round_thresholds_bps: vec![1000, 5000],
            ..Default::default()
        };
        assert!(p.validate().is_err());
    }

    #[test]
    fn rejects_decreasing_thresholds() {
        let p = ProtocolParams {
            round_thresholds_bps: vec![0, 7000, 6000],
            ..Default::default()
        };
        assert!(p.validate().is_err());
    }
}
