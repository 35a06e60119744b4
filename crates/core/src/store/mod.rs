//! The round store is the collaborator every statistics service reads from.
//!
//! [`SqliteRoundStore`] backs the server; [`InMemoryRoundStore`] keeps the
//! same contract in process memory and is what the aggregation tests run
//! against.

pub mod memory;
pub mod sqlite;

use chrono::{NaiveDate, NaiveDateTime};

pub use memory::InMemoryRoundStore;
pub use sqlite::SqliteRoundStore;

use crate::error::{Error, Result};
use crate::models::{
    CareerTotals, HoleRecord, HoleScore, HoleScoreInput, NewRound, Round, RoundId, RoundSummary,
    TeeHoleScore, UserId,
};

/// Persistence of rounds and their hole scores.
///
/// Every mutation is a single atomic operation. Deleting a round removes its
/// hole scores in the same operation.
pub trait RoundStore: Send + Sync {
    /// Start a round in the `in_progress` state with no score
    fn create_round(&self, round: &NewRound, created_at: NaiveDateTime) -> Result<Round>;

    /// Insert or overwrite the score for `input.hole_number` of a round
    fn upsert_hole_score(&self, round_id: RoundId, input: &HoleScoreInput) -> Result<HoleScore>;

    /// Complete a round, recording its total and notes
    fn finalize(
        &self,
        round_id: RoundId,
        total_score: i32,
        notes: &str,
        completed_at: NaiveDateTime,
    ) -> Result<Round>;

    fn delete(&self, round_id: RoundId) -> Result<()>;

    fn get(&self, round_id: RoundId) -> Result<Round>;

    /// Hole scores of a round ordered by hole number
    fn hole_scores(&self, round_id: RoundId) -> Result<Vec<HoleScore>>;

    /// All rounds of a user, newest date first
    fn list_by_user(&self, user_id: UserId) -> Result<Vec<Round>>;

    /// Up to `limit` completed rounds, newest date first
    fn recent_completed(&self, user_id: UserId, limit: usize) -> Result<Vec<Round>>;

    /// Completed rounds dated on or after `since`, newest first
    fn completed_since(&self, user_id: UserId, since: NaiveDate) -> Result<Vec<RoundSummary>>;

    /// Hole records of completed rounds dated on or after `since`
    fn hole_records_since(&self, user_id: UserId, since: NaiveDate) -> Result<Vec<HoleRecord>>;

    fn career_totals(&self, user_id: UserId) -> Result<CareerTotals>;

    /// Hole strokes of every completed round played from a known tee
    fn tee_hole_scores(&self, user_id: UserId) -> Result<Vec<TeeHoleScore>>;
}

/// A hole score must address a hole that exists in its round
pub(crate) fn check_hole_fits(round: &Round, input: &HoleScoreInput) -> Result<()> {
    if round.holes_played.contains(input.hole_number) {
        Ok(())
    } else {
        Err(Error::Validation(format!(
            "hole {} is outside a {}-hole round",
            input.hole_number,
            round.holes_played.count()
        )))
    }
}

pub(crate) fn check_finalizable(round: &Round, total_score: i32) -> Result<()> {
    if round.is_completed() {
        return Err(Error::Validation(format!(
            "Round {} is already completed",
            round.id
        )));
    }

    if total_score <= 0 {
        return Err(Error::Validation(format!(
            "totalScore must be positive, got {}",
            total_score
        )));
    }

    Ok(())
}

/// Birdie and par tallies shared by every store implementation
pub(crate) fn classify_career_hole(strokes: u8, par: Option<u8>) -> (i64, i64) {
    match par {
        Some(par) if u16::from(strokes) + 1 == u16::from(par) => (1, 0),
        Some(par) if strokes == par => (0, 1),
        _ => (0, 0),
    }
}
