use std::collections::{BTreeMap, HashMap};

use chrono::{NaiveDate, NaiveDateTime};
use parking_lot::Mutex;

use crate::error::{Error, Result};
use crate::models::{
    CareerTotals, HoleRecord, HoleScore, HoleScoreInput, NewRound, Round, RoundId, RoundStatus,
    RoundSummary, TeeHoleScore, UserId,
};
use crate::store::{RoundStore, check_finalizable, check_hole_fits, classify_career_hole};

#[derive(Default)]
struct State {
    next_round_id: RoundId,
    next_hole_id: i64,
    rounds: BTreeMap<RoundId, Round>,
    holes: BTreeMap<(RoundId, u8), HoleScore>,
}

impl State {
    fn round(&self, round_id: RoundId) -> Result<&Round> {
        self.rounds
            .get(&round_id)
            .ok_or_else(|| Error::NotFound(format!("Round {} does not exist", round_id)))
    }

    /// Completed rounds of a user, newest first
    fn completed(&self, user_id: UserId) -> Vec<&Round> {
        let mut rounds: Vec<&Round> = self
            .rounds
            .values()
            .filter(|r| r.user_id == user_id && r.is_completed())
            .collect();
        rounds.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
        rounds
    }

    fn completed_since(&self, user_id: UserId, since: NaiveDate) -> Vec<&Round> {
        self.completed(user_id)
            .into_iter()
            .filter(|r| r.date >= since)
            .collect()
    }

    fn holes_of(&self, round_id: RoundId) -> impl Iterator<Item = &HoleScore> {
        self.holes
            .range((round_id, u8::MIN)..=(round_id, u8::MAX))
            .map(|(_, hole)| hole)
    }

    fn putts_of(&self, round_id: RoundId) -> Option<i64> {
        self.holes_of(round_id)
            .filter_map(|h| h.putts)
            .map(i64::from)
            .reduce(|a, b| a + b)
    }
}

/// Process-local [`RoundStore`] with the same contract as the SQLite store.
///
/// Courses and tees are not validated; tee names shown in round summaries
/// come from [`InMemoryRoundStore::with_tee_name`].
#[derive(Default)]
pub struct InMemoryRoundStore {
    state: Mutex<State>,
    tee_names: HashMap<i64, String>,
}

impl InMemoryRoundStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tee_name(mut self, tee_id: i64, name: impl Into<String>) -> Self {
        self.tee_names.insert(tee_id, name.into());
        self
    }
}

impl RoundStore for InMemoryRoundStore {
    fn create_round(&self, round: &NewRound, created_at: NaiveDateTime) -> Result<Round> {
        let mut state = self.state.lock();
        state.next_round_id += 1;

        let created = Round {
            id: state.next_round_id,
            user_id: round.user_id,
            course_id: round.course_id,
            tee_id: round.tee_id,
            date: round.date,
            holes_played: round.holes_played,
            total_score: None,
            notes: None,
            status: RoundStatus::InProgress,
            created_at,
            completed_at: None,
        };
        state.rounds.insert(created.id, created.clone());

        Ok(created)
    }

    fn upsert_hole_score(&self, round_id: RoundId, input: &HoleScoreInput) -> Result<HoleScore> {
        input.validate()?;

        let mut state = self.state.lock();
        check_hole_fits(state.round(round_id)?, input)?;

        let key = (round_id, input.hole_number);
        let existing = state.holes.get(&key).map(|hole| hole.id);
        let id = match existing {
            Some(id) => id,
            None => {
                state.next_hole_id += 1;
                state.next_hole_id
            }
        };

        let hole = HoleScore {
            id,
            round_id,
            hole_number: input.hole_number,
            strokes: input.strokes,
            putts: input.putts,
            par: input.par,
            notes: input.notes.clone(),
            fairway_hit: input.fairway_hit,
        };
        state.holes.insert(key, hole.clone());

        Ok(hole)
    }

    fn finalize(
        &self,
        round_id: RoundId,
        total_score: i32,
        notes: &str,
        completed_at: NaiveDateTime,
    ) -> Result<Round> {
        let mut state = self.state.lock();
        check_finalizable(state.round(round_id)?, total_score)?;

        let round = state
            .rounds
            .get_mut(&round_id)
            .ok_or_else(|| Error::NotFound(format!("Round {} does not exist", round_id)))?;
        round.status = RoundStatus::Completed;
        round.total_score = Some(total_score);
        round.notes = Some(notes.to_string());
        round.completed_at = Some(completed_at);

        Ok(round.clone())
    }

    fn delete(&self, round_id: RoundId) -> Result<()> {
        let mut state = self.state.lock();

        if state.rounds.remove(&round_id).is_none() {
            return Err(Error::NotFound(format!(
                "Round {} does not exist",
                round_id
            )));
        }
        state.holes.retain(|(owner, _), _| *owner != round_id);

        Ok(())
    }

    fn get(&self, round_id: RoundId) -> Result<Round> {
        self.state.lock().round(round_id).cloned()
    }

    fn hole_scores(&self, round_id: RoundId) -> Result<Vec<HoleScore>> {
        Ok(self.state.lock().holes_of(round_id).cloned().collect())
    }

    fn list_by_user(&self, user_id: UserId) -> Result<Vec<Round>> {
        let state = self.state.lock();
        let mut rounds: Vec<Round> = state
            .rounds
            .values()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        rounds.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));

        Ok(rounds)
    }

    fn recent_completed(&self, user_id: UserId, limit: usize) -> Result<Vec<Round>> {
        let state = self.state.lock();

        Ok(state
            .completed(user_id)
            .into_iter()
            .take(limit)
            .cloned()
            .collect())
    }

    fn completed_since(&self, user_id: UserId, since: NaiveDate) -> Result<Vec<RoundSummary>> {
        let state = self.state.lock();

        Ok(state
            .completed_since(user_id, since)
            .into_iter()
            .map(|r| RoundSummary {
                id: r.id,
                total_score: r.total_score,
                date: r.date,
                holes_played: r.holes_played,
                status: r.status,
                tee_name: r.tee_id.and_then(|id| self.tee_names.get(&id).cloned()),
                total_putts: state.putts_of(r.id),
            })
            .collect())
    }

    fn hole_records_since(&self, user_id: UserId, since: NaiveDate) -> Result<Vec<HoleRecord>> {
        let state = self.state.lock();

        Ok(state
            .completed_since(user_id, since)
            .into_iter()
            .flat_map(|r| state.holes_of(r.id))
            .map(|h| HoleRecord {
                round_id: h.round_id,
                strokes: h.strokes,
                putts: h.putts,
                par: h.par,
                fairway_hit: h.fairway_hit,
            })
            .collect())
    }

    fn career_totals(&self, user_id: UserId) -> Result<CareerTotals> {
        let state = self.state.lock();
        let rounds = state.completed(user_id);

        let mut totals = CareerTotals {
            rounds: rounds.len(),
            ..CareerTotals::default()
        };
        for hole in rounds.iter().flat_map(|r| state.holes_of(r.id)) {
            let (birdies, pars) = classify_career_hole(hole.strokes, hole.par);
            totals.birdies += birdies;
            totals.pars += pars;
            totals.total_putts += hole.putts.map(i64::from).unwrap_or(0);
        }

        Ok(totals)
    }

    fn tee_hole_scores(&self, user_id: UserId) -> Result<Vec<TeeHoleScore>> {
        let state = self.state.lock();

        Ok(state
            .completed(user_id)
            .into_iter()
            .filter_map(|r| r.tee_id.map(|tee_id| (tee_id, r.id)))
            .flat_map(|(tee_id, round_id)| {
                state.holes_of(round_id).map(move |h| TeeHoleScore {
                    tee_id,
                    hole_number: h.hole_number,
                    strokes: h.strokes,
                })
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Local;

    use super::*;
    use crate::models::{FairwayHit, HolesPlayed};

    fn start(store: &InMemoryRoundStore, user: UserId, day: u32) -> Round {
        let date = NaiveDate::from_ymd_opt(2024, 6, day).unwrap();
        store
            .create_round(
                &NewRound::new(user, 1, date, HolesPlayed::Eighteen),
                Local::now().naive_local(),
            )
            .unwrap()
    }

    #[test]
    fn test_upsert_overwrites_without_duplicating() {
        let store = InMemoryRoundStore::new();
        let round = start(&store, 1, 1);

        let first = store
            .upsert_hole_score(round.id, &HoleScoreInput::new(5, 6))
            .unwrap();
        let second = store
            .upsert_hole_score(
                round.id,
                &HoleScoreInput::new(5, 4).with_fairway(FairwayHit::Hit),
            )
            .unwrap();

        let holes = store.hole_scores(round.id).unwrap();
        assert_eq!(holes.len(), 1);
        assert_eq!(first.id, second.id);
        assert_eq!(holes[0].strokes, 4);
    }

    #[test]
    fn test_delete_removes_holes() {
        let store = InMemoryRoundStore::new();
        let round = start(&store, 1, 1);
        let kept = start(&store, 1, 2);

        store
            .upsert_hole_score(round.id, &HoleScoreInput::new(1, 4))
            .unwrap();
        store
            .upsert_hole_score(kept.id, &HoleScoreInput::new(1, 4))
            .unwrap();
        store.delete(round.id).unwrap();

        assert!(store.hole_scores(round.id).unwrap().is_empty());
        assert_eq!(store.hole_scores(kept.id).unwrap().len(), 1);
        assert!(store.get(round.id).unwrap_err().is_not_found());
    }

    #[test]
    fn test_finalize_missing_round() {
        let store = InMemoryRoundStore::new();
        let err = store
            .finalize(3, 80, "", Local::now().naive_local())
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_putts_null_without_records() {
        let store = InMemoryRoundStore::new().with_tee_name(2, "Gold");
        let mut new = NewRound::new(
            1,
            1,
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            HolesPlayed::Nine,
        );
        new.tee_id = Some(2);
        let round = store
            .create_round(&new, Local::now().naive_local())
            .unwrap();
        store
            .upsert_hole_score(round.id, &HoleScoreInput::new(1, 4))
            .unwrap();
        store
            .finalize(round.id, 40, "", Local::now().naive_local())
            .unwrap();

        let since = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let summaries = store.completed_since(1, since).unwrap();

        assert_eq!(summaries[0].total_putts, None);
        assert_eq!(summaries[0].tee_name.as_deref(), Some("Gold"));
    }
}
