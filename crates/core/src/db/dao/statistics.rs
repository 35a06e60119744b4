use std::sync::Arc;

use chrono::NaiveDate;
use rusqlite::params;

use crate::db::Database;
use crate::db::dao::rounds::{ROUND_COLUMNS, round_from_row};
use crate::error::Result;
use crate::models::{
    CareerTotals, FairwayHit, HoleRecord, HolesPlayed, Round, RoundStatus, RoundSummary,
    TeeHoleScore, UserId,
};
use crate::utils::time::{format_date, parse_date};

/// Read-only queries over completed rounds feeding the statistics services
#[derive(Clone)]
pub struct StatisticsDao {
    db: Arc<Database>,
}

impl StatisticsDao {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// The `limit` most recent completed rounds of a user, newest first
    pub fn get_recent_completed_rounds(&self, user_id: UserId, limit: usize) -> Result<Vec<Round>> {
        self.db.with_connection(|conn| {
            let mut stmt = conn.prepare(&format!(
                r#"
                SELECT {}
                FROM rounds r
                WHERE r.user_id = ?1 AND r.status = 'completed'
                ORDER BY r.date DESC, r.id DESC
                LIMIT ?2
                "#,
                ROUND_COLUMNS
            ))?;

            let rounds = stmt
                .query_map(params![user_id, limit as i64], round_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rounds)
        })
    }

    pub fn get_round_summaries(&self, user_id: UserId, since: NaiveDate) -> Result<Vec<RoundSummary>> {
        self.db.with_connection(|conn| {
            let mut stmt = conn.prepare(
                r#"
                SELECT
                    r.id,
                    r.total_score,
                    r.date,
                    r.holes_played,
                    t.name as tee_name,
                    (SELECT SUM(h.putts) FROM hole_scores h WHERE h.round_id = r.id) as total_putts
                FROM rounds r
                LEFT JOIN tees t ON r.tee_id = t.id
                WHERE r.user_id = ?1
                  AND r.status = 'completed'
                  AND r.date >= ?2
                ORDER BY r.date DESC, r.id DESC
                "#,
            )?;

            let rounds = stmt
                .query_map(params![user_id, format_date(since)], |row| {
                    let holes: u8 = row.get(3)?;

                    Ok(RoundSummary {
                        id: row.get(0)?,
                        total_score: row.get(1)?,
                        date: parse_date(&row.get::<_, String>(2)?, 2)?,
                        holes_played: HolesPlayed::try_from(holes).map_err(|e| {
                            rusqlite::Error::FromSqlConversionFailure(
                                3,
                                rusqlite::types::Type::Integer,
                                Box::new(e),
                            )
                        })?,
                        status: RoundStatus::Completed,
                        tee_name: row.get(4)?,
                        total_putts: row.get(5)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rounds)
        })
    }

    /// Every hole recorded in the user's completed rounds dated on or after `since`
    pub fn get_hole_records(&self, user_id: UserId, since: NaiveDate) -> Result<Vec<HoleRecord>> {
        self.db.with_connection(|conn| {
            let mut stmt = conn.prepare(
                r#"
                SELECT h.round_id, h.strokes, h.putts, h.par, h.fairway_hit
                FROM hole_scores h
                JOIN rounds r ON h.round_id = r.id
                WHERE r.user_id = ?1
                  AND r.status = 'completed'
                  AND r.date >= ?2
                ORDER BY h.round_id, h.hole_number
                "#,
            )?;

            let records = stmt
                .query_map(params![user_id, format_date(since)], |row| {
                    Ok(HoleRecord {
                        round_id: row.get(0)?,
                        strokes: row.get(1)?,
                        putts: row.get(2)?,
                        par: row.get(3)?,
                        fairway_hit: row
                            .get::<_, Option<i64>>(4)?
                            .and_then(FairwayHit::from_flag),
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(records)
        })
    }

    /// Lifetime counters. A birdie is exactly one under a known par, a par is
    /// exactly level with it; holes without a recorded par count as neither.
    pub fn get_career_totals(&self, user_id: UserId) -> Result<CareerTotals> {
        self.db.with_connection(|conn| {
            let totals = conn.query_row(
                r#"
                SELECT
                    (SELECT COUNT(*) FROM rounds WHERE user_id = ?1 AND status = 'completed'),
                    COALESCE(SUM(CASE WHEN h.par IS NOT NULL AND h.strokes = h.par - 1 THEN 1 ELSE 0 END), 0),
                    COALESCE(SUM(CASE WHEN h.par IS NOT NULL AND h.strokes = h.par THEN 1 ELSE 0 END), 0),
                    COALESCE(SUM(h.putts), 0)
                FROM hole_scores h
                JOIN rounds r ON h.round_id = r.id
                WHERE r.user_id = ?1 AND r.status = 'completed'
                "#,
                params![user_id],
                |row| {
                    Ok(CareerTotals {
                        rounds: row.get::<_, i64>(0)? as usize,
                        birdies: row.get(1)?,
                        pars: row.get(2)?,
                        total_putts: row.get(3)?,
                    })
                },
            )?;

            Ok(totals)
        })
    }

    /// Hole strokes from all completed rounds that were played from a known tee
    pub fn get_tee_hole_scores(&self, user_id: UserId) -> Result<Vec<TeeHoleScore>> {
        self.db.with_connection(|conn| {
            let mut stmt = conn.prepare(
                r#"
                SELECT r.tee_id, h.hole_number, h.strokes
                FROM hole_scores h
                JOIN rounds r ON h.round_id = r.id
                WHERE r.user_id = ?1
                  AND r.status = 'completed'
                  AND r.tee_id IS NOT NULL
                "#,
            )?;

            let scores = stmt
                .query_map(params![user_id], |row| {
                    Ok(TeeHoleScore {
                        tee_id: row.get(0)?,
                        hole_number: row.get(1)?,
                        strokes: row.get(2)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(scores)
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Local, NaiveDate};

    use super::*;
    use crate::db::RoundsDao;
    use crate::db::test_support::{insert_user, setup_test_db};
    use crate::models::{HoleScoreInput, NewRound};

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, day).unwrap()
    }

    fn play(
        rounds: &RoundsDao,
        user: UserId,
        day: u32,
        tee: Option<i64>,
        holes: &[HoleScoreInput],
        total: Option<i32>,
    ) -> i64 {
        let mut new = NewRound::new(user, 1, date(day), HolesPlayed::Eighteen);
        new.tee_id = tee;
        let round = rounds.create_round(&new, Local::now().naive_local()).unwrap();

        for hole in holes {
            rounds.upsert_hole_score(round.id, hole).unwrap();
        }

        if let Some(total) = total {
            rounds
                .finalize_round(round.id, total, "", Local::now().naive_local())
                .unwrap();
        }

        round.id
    }

    #[test]
    fn test_summaries_respect_window_and_status() {
        let db = setup_test_db();
        let user = insert_user(&db, "a@example.com");
        let rounds = RoundsDao::new(db.clone());
        let dao = StatisticsDao::new(db);

        let holes = [
            HoleScoreInput::new(1, 5).with_putts(2),
            HoleScoreInput::new(2, 4).with_putts(3),
        ];
        play(&rounds, user, 1, Some(3), &holes, Some(90));
        let recent = play(&rounds, user, 20, Some(3), &holes, Some(85));
        play(&rounds, user, 25, None, &holes, None);

        let summaries = dao.get_round_summaries(user, date(10)).unwrap();

        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].id, recent);
        assert_eq!(summaries[0].tee_name.as_deref(), Some("Blue"));
        assert_eq!(summaries[0].total_putts, Some(5));
    }

    #[test]
    fn test_summary_without_putts_is_null() {
        let db = setup_test_db();
        let user = insert_user(&db, "a@example.com");
        let rounds = RoundsDao::new(db.clone());
        let dao = StatisticsDao::new(db);

        play(&rounds, user, 5, None, &[HoleScoreInput::new(1, 4)], Some(80));

        let summaries = dao.get_round_summaries(user, date(1)).unwrap();
        assert_eq!(summaries[0].total_putts, None);
        assert_eq!(summaries[0].tee_name, None);
    }

    #[test]
    fn test_career_totals_count_birdies_and_pars() {
        let db = setup_test_db();
        let user = insert_user(&db, "a@example.com");
        let rounds = RoundsDao::new(db.clone());
        let dao = StatisticsDao::new(db);

        let holes = [
            HoleScoreInput::new(1, 3).with_par(4).with_putts(1),
            HoleScoreInput::new(2, 3).with_par(3).with_putts(2),
            HoleScoreInput::new(3, 3).with_par(5).with_putts(1),
            HoleScoreInput::new(4, 4),
        ];
        play(&rounds, user, 1, None, &holes, Some(75));
        play(&rounds, user, 2, None, &holes, None);

        let totals = dao.get_career_totals(user).unwrap();

        assert_eq!(totals.rounds, 1);
        assert_eq!(totals.birdies, 1);
        assert_eq!(totals.pars, 1);
        assert_eq!(totals.total_putts, 4);
    }

    #[test]
    fn test_career_totals_without_rounds() {
        let db = setup_test_db();
        let user = insert_user(&db, "a@example.com");
        let dao = StatisticsDao::new(db);

        assert_eq!(dao.get_career_totals(user).unwrap(), CareerTotals::default());
    }

    #[test]
    fn test_tee_hole_scores_skip_untracked_tees() {
        let db = setup_test_db();
        let user = insert_user(&db, "a@example.com");
        let rounds = RoundsDao::new(db.clone());
        let dao = StatisticsDao::new(db);

        play(&rounds, user, 1, Some(1), &[HoleScoreInput::new(7, 5)], Some(90));
        play(&rounds, user, 2, None, &[HoleScoreInput::new(7, 2)], Some(90));

        let scores = dao.get_tee_hole_scores(user).unwrap();
        assert_eq!(
            scores,
            vec![TeeHoleScore {
                tee_id: 1,
                hole_number: 7,
                strokes: 5,
            }]
        );
    }

    #[test]
    fn test_recent_completed_rounds_limit() {
        let db = setup_test_db();
        let user = insert_user(&db, "a@example.com");
        let rounds = RoundsDao::new(db.clone());
        let dao = StatisticsDao::new(db);

        for day in 1..=12 {
            play(&rounds, user, day, None, &[], Some(80 + day as i32));
        }

        let recent = dao.get_recent_completed_rounds(user, 10).unwrap();
        assert_eq!(recent.len(), 10);
        assert_eq!(recent[0].total_score, Some(92));
        assert_eq!(recent[9].total_score, Some(83));
    }
}
