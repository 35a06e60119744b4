use std::sync::Arc;

use crate::error::Result;
use crate::models::{DisplayStat, HandicapReport, Round, UserId};
use crate::store::RoundStore;

/// How many recent completed rounds feed the estimate
pub const HANDICAP_ROUNDS: usize = 10;

/// `0.96` as an exact fraction
const HANDICAP_FACTOR: (i64, i64) = (24, 25);

/// Simplified differential: `(mean score - mean holes played) * 0.96`.
///
/// Holes played stands in for course par because rounds carry no par total.
/// This is not the official handicap index and must stay this formula. The
/// means share a denominator, so the value is computed exactly as
/// `(total score - total holes) * 24 / (25 * rounds)` before rounding.
pub fn estimate_handicap(rounds: &[Round]) -> HandicapReport {
    if rounds.is_empty() {
        return HandicapReport {
            handicap: DisplayStat::NoData,
            rounds_count: 0,
        };
    }

    let differential: i64 = rounds
        .iter()
        .map(|r| i64::from(r.total_score.unwrap_or(0)) - i64::from(r.holes_played.count()))
        .sum();
    let (factor_num, factor_den) = HANDICAP_FACTOR;
    let count = i64::try_from(rounds.len()).unwrap_or(i64::MAX);

    HandicapReport {
        handicap: DisplayStat::ratio(differential * factor_num, count * factor_den, 2),
        rounds_count: rounds.len(),
    }
}

#[derive(Clone)]
pub struct HandicapEstimator {
    store: Arc<dyn RoundStore>,
}

impl HandicapEstimator {
    pub fn new(store: Arc<dyn RoundStore>) -> Self {
        Self { store }
    }

    pub fn estimate(&self, user_id: UserId) -> Result<HandicapReport> {
        let rounds = self.store.recent_completed(user_id, HANDICAP_ROUNDS)?;

        Ok(estimate_handicap(&rounds))
    }
}
