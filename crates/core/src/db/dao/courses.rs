use std::sync::Arc;

use rusqlite::{OptionalExtension, params};

use crate::db::Database;
use crate::error::Result;
use crate::models::{Course, HoleDefinition, Tee, Yardages};

/// Static course reference data. Seeded by migrations, never written at runtime.
#[derive(Clone)]
pub struct CoursesDao {
    db: Arc<Database>,
}

impl CoursesDao {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub fn get_course(&self, course_id: i64) -> Result<Option<Course>> {
        self.db.with_connection(|conn| {
            let course = conn
                .query_row(
                    "SELECT id, name, location, holes FROM courses WHERE id = ?1",
                    params![course_id],
                    |row| {
                        Ok(Course {
                            id: row.get(0)?,
                            name: row.get(1)?,
                            location: row.get(2)?,
                            holes: row.get(3)?,
                        })
                    },
                )
                .optional()?;

            Ok(course)
        })
    }

    pub fn get_tees(&self, course_id: i64) -> Result<Vec<Tee>> {
        self.db.with_connection(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, course_id, name, rating, slope FROM tees WHERE course_id = ?1 ORDER BY id",
            )?;

            let tees = stmt
                .query_map(params![course_id], |row| {
                    Ok(Tee {
                        id: row.get(0)?,
                        course_id: row.get(1)?,
                        name: row.get(2)?,
                        rating: row.get(3)?,
                        slope: row.get(4)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(tees)
        })
    }

    pub fn get_hole_definitions(&self, course_id: i64) -> Result<Vec<HoleDefinition>> {
        self.db.with_connection(|conn| {
            let mut stmt = conn.prepare(
                r#"
                SELECT
                    course_id, hole_number, par, handicap_index,
                    yardage_black, yardage_gold, yardage_blue, yardage_white, yardage_red
                FROM hole_defs
                WHERE course_id = ?1
                ORDER BY hole_number
                "#,
            )?;

            let holes = stmt
                .query_map(params![course_id], |row| {
                    Ok(HoleDefinition {
                        course_id: row.get(0)?,
                        hole_number: row.get(1)?,
                        par: row.get(2)?,
                        handicap_index: row.get(3)?,
                        yardages: Yardages {
                            black: row.get(4)?,
                            gold: row.get(5)?,
                            blue: row.get(6)?,
                            white: row.get(7)?,
                            red: row.get(8)?,
                        },
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(holes)
        })
    }
}
