use std::sync::Arc;

use chrono::Local;

use crate::error::{Error, Result};
use crate::models::{HoleScore, HoleScoreInput, NewRound, Round, RoundDetail, RoundId, UserId};
use crate::store::RoundStore;

/// Round lifecycle for one authenticated player.
///
/// Rounds belonging to someone else are reported as missing.
#[derive(Clone)]
pub struct RoundsService {
    store: Arc<dyn RoundStore>,
}

impl RoundsService {
    pub fn new(store: Arc<dyn RoundStore>) -> Self {
        Self { store }
    }

    /// Start a new round in progress
    pub fn create(&self, round: &NewRound) -> Result<Round> {
        self.store.create_round(round, Local::now().naive_local())
    }

    /// All of the player's rounds, newest first
    pub fn list(&self, user_id: UserId) -> Result<Vec<Round>> {
        self.store.list_by_user(user_id)
    }

    pub fn get(&self, user_id: UserId, round_id: RoundId) -> Result<RoundDetail> {
        let round = self.owned(user_id, round_id)?;
        let holes = self.store.hole_scores(round_id)?;

        Ok(RoundDetail { round, holes })
    }

    /// Save one hole; re-submitting a hole number replaces its values
    pub fn record_hole(
        &self,
        user_id: UserId,
        round_id: RoundId,
        input: &HoleScoreInput,
    ) -> Result<HoleScore> {
        self.owned(user_id, round_id)?;
        self.store.upsert_hole_score(round_id, input)
    }

    pub fn finalize(
        &self,
        user_id: UserId,
        round_id: RoundId,
        total_score: i32,
        notes: Option<&str>,
    ) -> Result<Round> {
        self.owned(user_id, round_id)?;
        self.store.finalize(
            round_id,
            total_score,
            notes.unwrap_or_default(),
            Local::now().naive_local(),
        )
    }

    pub fn delete(&self, user_id: UserId, round_id: RoundId) -> Result<()> {
        self.owned(user_id, round_id)?;
        self.store.delete(round_id)
    }

    fn owned(&self, user_id: UserId, round_id: RoundId) -> Result<Round> {
        let round = self.store.get(round_id)?;

        if round.user_id != user_id {
            tracing::warn!(user_id, round_id, "round requested by a different user");
            return Err(Error::NotFound(format!(
                "Round {} does not exist",
                round_id
            )));
        }

        Ok(round)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::models::{HolesPlayed, RoundStatus};
    use crate::store::InMemoryRoundStore;

    fn service() -> RoundsService {
        RoundsService::new(Arc::new(InMemoryRoundStore::new()))
    }

    fn start(service: &RoundsService, user: UserId) -> Round {
        service
            .create(&NewRound::new(
                user,
                1,
                NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
                HolesPlayed::Nine,
            ))
            .unwrap()
    }

    #[test]
    fn test_get_returns_holes_in_order() {
        let service = service();
        let round = start(&service, 1);

        for hole in [3, 1, 2] {
            service
                .record_hole(1, round.id, &HoleScoreInput::new(hole, 4))
                .unwrap();
        }

        let detail = service.get(1, round.id).unwrap();
        let order: Vec<u8> = detail.holes.iter().map(|h| h.hole_number).collect();
        assert_eq!(order, vec![1, 2, 3]);
    }

    #[test]
    fn test_other_users_round_is_not_found() {
        let service = service();
        let round = start(&service, 1);

        assert!(service.get(2, round.id).unwrap_err().is_not_found());
        assert!(service
            .record_hole(2, round.id, &HoleScoreInput::new(1, 4))
            .unwrap_err()
            .is_not_found());
        assert!(service.delete(2, round.id).unwrap_err().is_not_found());
        assert!(service.get(1, round.id).is_ok());
    }

    #[test]
    fn test_finalize_defaults_notes() {
        let service = service();
        let round = start(&service, 1);

        let done = service.finalize(1, round.id, 44, None).unwrap();

        assert_eq!(done.status, RoundStatus::Completed);
        assert_eq!(done.notes.as_deref(), Some(""));
        assert!(service.finalize(1, round.id, 44, None).unwrap_err().is_validation());
    }

    #[test]
    fn test_delete_then_get() {
        let service = service();
        let round = start(&service, 1);
        service
            .record_hole(1, round.id, &HoleScoreInput::new(1, 4))
            .unwrap();

        service.delete(1, round.id).unwrap();

        assert!(service.get(1, round.id).unwrap_err().is_not_found());
        assert!(service.list(1).unwrap().is_empty());
    }

    #[test]
    fn test_rejects_zero_total() {
        let service = service();
        let round = start(&service, 1);

        assert!(service.finalize(1, round.id, 0, None).unwrap_err().is_validation());
    }
}
