use std::sync::Arc;

use chrono::NaiveDate;

use crate::error::Result;
use crate::models::{DisplayStat, FairwayHit, HoleRecord, LeakCounts, LeakReport, UserId};
use crate::store::RoundStore;

pub fn is_three_putt(record: &HoleRecord) -> bool {
    record.putts.is_some_and(|putts| putts >= 3)
}

/// Two or more over par. Holes without a known par never qualify.
pub fn is_double_bogey_or_worse(record: &HoleRecord) -> bool {
    record
        .par
        .is_some_and(|par| u16::from(record.strokes) >= u16::from(par) + 2)
}

/// Tally leak categories. Only an explicit miss counts against the fairway;
/// unrecorded outcomes (par 3s, legacy data) never do.
pub fn count_leaks(records: &[HoleRecord]) -> LeakCounts {
    records.iter().fold(LeakCounts::default(), |mut counts, record| {
        if is_three_putt(record) {
            counts.three_putts += 1;
        }
        if is_double_bogey_or_worse(record) {
            counts.double_bogeys += 1;
        }
        if record.fairway_hit == Some(FairwayHit::Missed) {
            counts.missed_fairways += 1;
        }
        counts
    })
}

/// Per-round averages of each leak, all `0` when no rounds are in the window
pub fn leak_report(counts: &LeakCounts, rounds: usize) -> LeakReport {
    if rounds == 0 {
        return LeakReport::empty();
    }

    LeakReport {
        three_putts: DisplayStat::per(i64::from(counts.three_putts), rounds),
        double_bogeys: DisplayStat::per(i64::from(counts.double_bogeys), rounds),
        missed_fairways: DisplayStat::per(i64::from(counts.missed_fairways), rounds),
    }
}

#[derive(Clone)]
pub struct LeakAnalyzer {
    store: Arc<dyn RoundStore>,
}

impl LeakAnalyzer {
    pub fn new(store: Arc<dyn RoundStore>) -> Self {
        Self { store }
    }

    /// Raw tallies over completed rounds dated on or after `since`
    pub fn counts_since(&self, user_id: UserId, since: NaiveDate) -> Result<LeakCounts> {
        let records = self.store.hole_records_since(user_id, since)?;

        Ok(count_leaks(&records))
    }

    pub fn analyze(&self, user_id: UserId, since: NaiveDate) -> Result<LeakReport> {
        let rounds = self.store.completed_since(user_id, since)?.len();
        let counts = self.counts_since(user_id, since)?;

        Ok(leak_report(&counts, rounds))
    }
}
