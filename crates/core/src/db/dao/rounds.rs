use std::sync::Arc;

use chrono::NaiveDateTime;
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row, params};

use crate::db::Database;
use crate::error::{Error, Result};
use crate::models::{
    FairwayHit, HoleScore, HoleScoreInput, HolesPlayed, NewRound, Round, RoundId, RoundStatus,
    UserId,
};
use crate::utils::time::{format_date, format_datetime, parse_date, parse_datetime};

pub(crate) const ROUND_COLUMNS: &str = "r.id, r.user_id, r.course_id, r.tee_id, r.date, \
     r.holes_played, r.total_score, r.notes, r.status, r.created_at, r.completed_at";

const HOLE_COLUMNS: &str =
    "id, round_id, hole_number, strokes, putts, par, notes, fairway_hit";

pub(crate) fn round_from_row(row: &Row<'_>) -> rusqlite::Result<Round> {
    let holes: u8 = row.get(5)?;
    let status: String = row.get(8)?;

    Ok(Round {
        id: row.get(0)?,
        user_id: row.get(1)?,
        course_id: row.get(2)?,
        tee_id: row.get(3)?,
        date: parse_date(&row.get::<_, String>(4)?, 4)?,
        holes_played: HolesPlayed::try_from(holes)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(5, Type::Integer, Box::new(e)))?,
        total_score: row.get(6)?,
        notes: row.get(7)?,
        status: status
            .parse::<RoundStatus>()
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(8, Type::Text, Box::new(e)))?,
        created_at: parse_datetime(&row.get::<_, String>(9)?, 9)?,
        completed_at: row
            .get::<_, Option<String>>(10)?
            .map(|s| parse_datetime(&s, 10))
            .transpose()?,
    })
}

fn hole_from_row(row: &Row<'_>) -> rusqlite::Result<HoleScore> {
    Ok(HoleScore {
        id: row.get(0)?,
        round_id: row.get(1)?,
        hole_number: row.get(2)?,
        strokes: row.get(3)?,
        putts: row.get(4)?,
        par: row.get(5)?,
        notes: row.get(6)?,
        fairway_hit: row
            .get::<_, Option<i64>>(7)?
            .and_then(FairwayHit::from_flag),
    })
}

fn find_round(conn: &Connection, round_id: RoundId) -> Result<Option<Round>> {
    let round = conn
        .query_row(
            &format!("SELECT {} FROM rounds r WHERE r.id = ?1", ROUND_COLUMNS),
            params![round_id],
            round_from_row,
        )
        .optional()?;

    Ok(round)
}

fn require_round(conn: &Connection, round_id: RoundId) -> Result<Round> {
    find_round(conn, round_id)?
        .ok_or_else(|| Error::NotFound(format!("Round {} does not exist", round_id)))
}

#[derive(Clone)]
pub struct RoundsDao {
    db: Arc<Database>,
}

impl RoundsDao {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub fn create_round(&self, round: &NewRound, created_at: NaiveDateTime) -> Result<Round> {
        self.db.transaction(|tx| {
            let course_exists: bool = tx.query_row(
                "SELECT COUNT(*) > 0 FROM courses WHERE id = ?1",
                params![round.course_id],
                |row| row.get(0),
            )?;
            if !course_exists {
                return Err(Error::NotFound(format!(
                    "Course {} does not exist",
                    round.course_id
                )));
            }

            if let Some(tee_id) = round.tee_id {
                let tee_matches: bool = tx.query_row(
                    "SELECT COUNT(*) > 0 FROM tees WHERE id = ?1 AND course_id = ?2",
                    params![tee_id, round.course_id],
                    |row| row.get(0),
                )?;
                if !tee_matches {
                    return Err(Error::Validation(format!(
                        "Tee {} does not belong to course {}",
                        tee_id, round.course_id
                    )));
                }
            }

            tx.execute(
                r#"
                INSERT INTO rounds (user_id, course_id, tee_id, date, holes_played, status, created_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                "#,
                params![
                    round.user_id,
                    round.course_id,
                    round.tee_id,
                    format_date(round.date),
                    round.holes_played.count(),
                    RoundStatus::InProgress.as_str(),
                    format_datetime(created_at),
                ],
            )?;

            let round_id = tx.last_insert_rowid();

            tracing::debug!(
                round_id,
                user_id = round.user_id,
                holes = round.holes_played.count(),
                "created round"
            );

            require_round(tx, round_id)
        })
    }

    pub fn get_round(&self, round_id: RoundId) -> Result<Option<Round>> {
        self.db.with_connection(|conn| find_round(conn, round_id))
    }

    /// All rounds of a user, newest date first
    pub fn list_rounds_for_user(&self, user_id: UserId) -> Result<Vec<Round>> {
        self.db.with_connection(|conn| {
            let mut stmt = conn.prepare(&format!(
                r#"
                SELECT {}
                FROM rounds r
                WHERE r.user_id = ?1
                ORDER BY r.date DESC, r.id DESC
                "#,
                ROUND_COLUMNS
            ))?;

            let rounds = stmt
                .query_map(params![user_id], round_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rounds)
        })
    }

    pub fn get_hole_scores(&self, round_id: RoundId) -> Result<Vec<HoleScore>> {
        self.db.with_connection(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {} FROM hole_scores WHERE round_id = ?1 ORDER BY hole_number ASC",
                HOLE_COLUMNS
            ))?;

            let holes = stmt
                .query_map(params![round_id], hole_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(holes)
        })
    }

    /// Insert or overwrite the score of one hole. Keyed by (round, hole number).
    pub fn upsert_hole_score(&self, round_id: RoundId, input: &HoleScoreInput) -> Result<HoleScore> {
        input.validate()?;

        self.db.transaction(|tx| {
            let round = require_round(tx, round_id)?;
            crate::store::check_hole_fits(&round, input)?;

            tx.execute(
                r#"
                INSERT INTO hole_scores (round_id, hole_number, strokes, par, putts, notes, fairway_hit)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                ON CONFLICT(round_id, hole_number) DO UPDATE SET
                    strokes = excluded.strokes,
                    par = excluded.par,
                    putts = excluded.putts,
                    notes = excluded.notes,
                    fairway_hit = excluded.fairway_hit
                "#,
                params![
                    round_id,
                    input.hole_number,
                    input.strokes,
                    input.par,
                    input.putts,
                    input.notes,
                    input.fairway_hit.map(u8::from),
                ],
            )?;

            tracing::debug!(
                round_id,
                hole = input.hole_number,
                strokes = input.strokes,
                "recorded hole score"
            );

            let hole = tx.query_row(
                &format!(
                    "SELECT {} FROM hole_scores WHERE round_id = ?1 AND hole_number = ?2",
                    HOLE_COLUMNS
                ),
                params![round_id, input.hole_number],
                hole_from_row,
            )?;

            Ok(hole)
        })
    }

    /// Mark a round completed with its final score. Happens exactly once.
    pub fn finalize_round(
        &self,
        round_id: RoundId,
        total_score: i32,
        notes: &str,
        completed_at: NaiveDateTime,
    ) -> Result<Round> {
        self.db.transaction(|tx| {
            let round = require_round(tx, round_id)?;
            crate::store::check_finalizable(&round, total_score)?;

            tx.execute(
                r#"
                UPDATE rounds
                SET status = ?1, total_score = ?2, notes = ?3, completed_at = ?4
                WHERE id = ?5
                "#,
                params![
                    RoundStatus::Completed.as_str(),
                    total_score,
                    notes,
                    format_datetime(completed_at),
                    round_id
                ],
            )?;

            tracing::debug!(round_id, total_score, "finalized round");

            require_round(tx, round_id)
        })
    }

    /// Remove a round together with every hole score recorded for it
    pub fn delete_round(&self, round_id: RoundId) -> Result<()> {
        self.db.transaction(|tx| {
            // foreign_keys is a per-connection pragma, so children go explicitly
            let holes = tx.execute(
                "DELETE FROM hole_scores WHERE round_id = ?1",
                params![round_id],
            )?;
            let deleted = tx.execute("DELETE FROM rounds WHERE id = ?1", params![round_id])?;

            if deleted == 0 {
                return Err(Error::NotFound(format!(
                    "Round {} does not exist",
                    round_id
                )));
            }

            tracing::debug!(round_id, holes, "deleted round");

            Ok(())
        })
    }
}
