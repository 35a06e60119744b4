use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};

use crate::db::{Database, RoundsDao, StatisticsDao};
use crate::error::{Error, Result};
use crate::models::{
    CareerTotals, HoleRecord, HoleScore, HoleScoreInput, NewRound, Round, RoundId, RoundSummary,
    TeeHoleScore, UserId,
};
use crate::store::RoundStore;

#[derive(Clone)]
pub struct SqliteRoundStore {
    rounds: RoundsDao,
    statistics: StatisticsDao,
}

impl SqliteRoundStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self {
            rounds: RoundsDao::new(db.clone()),
            statistics: StatisticsDao::new(db),
        }
    }
}

impl RoundStore for SqliteRoundStore {
    fn create_round(&self, round: &NewRound, created_at: NaiveDateTime) -> Result<Round> {
        self.rounds.create_round(round, created_at)
    }

    fn upsert_hole_score(&self, round_id: RoundId, input: &HoleScoreInput) -> Result<HoleScore> {
        self.rounds.upsert_hole_score(round_id, input)
    }

    fn finalize(
        &self,
        round_id: RoundId,
        total_score: i32,
        notes: &str,
        completed_at: NaiveDateTime,
    ) -> Result<Round> {
        self.rounds
            .finalize_round(round_id, total_score, notes, completed_at)
    }

    fn delete(&self, round_id: RoundId) -> Result<()> {
        self.rounds.delete_round(round_id)
    }

    fn get(&self, round_id: RoundId) -> Result<Round> {
        self.rounds
            .get_round(round_id)?
            .ok_or_else(|| Error::NotFound(format!("Round {} does not exist", round_id)))
    }

    fn hole_scores(&self, round_id: RoundId) -> Result<Vec<HoleScore>> {
        self.rounds.get_hole_scores(round_id)
    }

    fn list_by_user(&self, user_id: UserId) -> Result<Vec<Round>> {
        self.rounds.list_rounds_for_user(user_id)
    }

    fn recent_completed(&self, user_id: UserId, limit: usize) -> Result<Vec<Round>> {
        self.statistics.get_recent_completed_rounds(user_id, limit)
    }

    fn completed_since(&self, user_id: UserId, since: NaiveDate) -> Result<Vec<RoundSummary>> {
        self.statistics.get_round_summaries(user_id, since)
    }

    fn hole_records_since(&self, user_id: UserId, since: NaiveDate) -> Result<Vec<HoleRecord>> {
        self.statistics.get_hole_records(user_id, since)
    }

    fn career_totals(&self, user_id: UserId) -> Result<CareerTotals> {
        self.statistics.get_career_totals(user_id)
    }

    fn tee_hole_scores(&self, user_id: UserId) -> Result<Vec<TeeHoleScore>> {
        self.statistics.get_tee_hole_scores(user_id)
    }
}
