use rusqlite::{Connection, params};

use crate::{Error, Result};

const SCHEMA_VERSION: i32 = 3;

/// Reference course seeded on first start
const SEED_COURSE_ID: i64 = 1;

/// (name, rating, slope)
const SEED_TEES: &[(&str, f64, i64)] = &[
    ("Black", 75.9, 141),
    ("Gold", 73.9, 137),
    ("Blue", 72.1, 133),
    ("White", 73.6, 132),
    ("Red", 69.9, 126),
];

/// (hole, par, handicap index, black, gold, blue, white, red)
const SEED_HOLES: &[(u8, u8, u8, u32, u32, u32, u32, u32)] = &[
    (1, 4, 9, 424, 403, 384, 349, 317),
    (2, 3, 11, 213, 187, 176, 133, 99),
    (3, 5, 7, 578, 522, 513, 489, 439),
    (4, 4, 1, 487, 442, 424, 352, 317),
    (5, 4, 5, 408, 385, 366, 312, 293),
    (6, 4, 15, 402, 387, 372, 325, 298),
    (7, 3, 17, 174, 140, 148, 114, 87),
    (8, 4, 3, 461, 441, 419, 336, 326),
    (9, 5, 13, 541, 517, 464, 412, 360),
    (10, 4, 16, 322, 308, 293, 258, 221),
    (11, 4, 12, 353, 335, 309, 270, 223),
    (12, 3, 18, 146, 136, 120, 109, 95),
    (13, 5, 4, 587, 569, 550, 505, 449),
    (14, 5, 14, 586, 540, 492, 441, 411),
    (15, 4, 2, 474, 452, 421, 363, 333),
    (16, 3, 10, 229, 217, 189, 150, 122),
    (17, 4, 8, 429, 407, 382, 339, 304),
    (18, 4, 6, 429, 411, 392, 349, 305),
];

pub fn run_migrations(conn: &mut Connection) -> Result<()> {
    ensure_migration_table(conn)?;

    let current_version = get_schema_version(conn)?;

    if current_version > SCHEMA_VERSION {
        return Err(Error::Internal(format!(
            "Database schema version ({}) is newer than supported version ({}). Please upgrade \
             the server.",
            current_version, SCHEMA_VERSION
        )));
    }

    for version in (current_version + 1)..=SCHEMA_VERSION {
        apply_migration(conn, version).map_err(|e| {
            Error::Internal(format!("Failed to apply migration {}: {}", version, e))
        })?;
        tracing::info!(version, "applied schema migration");
    }

    Ok(())
}

fn ensure_migration_table(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS migration (
            id INTEGER PRIMARY KEY
        )",
        [],
    )?;
    Ok(())
}

fn get_schema_version(conn: &Connection) -> Result<i32> {
    let version = conn.query_row("SELECT COALESCE(MAX(id), 0) FROM migration", [], |row| {
        row.get(0)
    })?;
    Ok(version)
}

fn set_schema_version(conn: &Connection, version: i32) -> Result<()> {
    conn.execute("INSERT INTO migration (id) VALUES (?1)", [version])?;
    Ok(())
}

fn apply_migration(conn: &mut Connection, version: i32) -> Result<()> {
    let tx = conn.transaction()?;

    match version {
        1 => migration_v1(&tx)?,
        2 => migration_v2(&tx)?,
        3 => migration_v3(&tx)?,
        _ => {
            return Err(Error::Internal(format!(
                "Unknown migration version: {}",
                version
            )));
        }
    }

    set_schema_version(&tx, version)?;
    tx.commit()?;

    Ok(())
}

fn migration_v1(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE users(
            user_id INTEGER PRIMARY KEY AUTOINCREMENT,
            first_name TEXT NOT NULL,
            last_name TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE,
            session_token TEXT UNIQUE
        );

        CREATE TABLE courses(
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            location TEXT,
            holes INTEGER NOT NULL DEFAULT 18
        );

        CREATE TABLE tees(
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            course_id INTEGER NOT NULL,
            name TEXT NOT NULL,
            rating REAL NOT NULL,
            slope INTEGER NOT NULL,
            FOREIGN KEY (course_id) REFERENCES courses(id)
        );

        CREATE TABLE hole_defs(
            course_id INTEGER NOT NULL,
            hole_number INTEGER NOT NULL,
            par INTEGER NOT NULL,
            handicap_index INTEGER NOT NULL,
            yardage_black INTEGER NOT NULL,
            yardage_gold INTEGER NOT NULL,
            yardage_blue INTEGER NOT NULL,
            yardage_white INTEGER NOT NULL,
            yardage_red INTEGER NOT NULL,
            PRIMARY KEY (course_id, hole_number),
            FOREIGN KEY (course_id) REFERENCES courses(id)
        );

        CREATE TABLE rounds(
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL,
            course_id INTEGER NOT NULL,
            tee_id INTEGER,
            date TEXT NOT NULL,
            holes_played INTEGER NOT NULL CHECK(holes_played IN (9, 18)),
            total_score INTEGER,
            notes TEXT,
            status TEXT NOT NULL DEFAULT 'in_progress'
                CHECK(status IN ('in_progress', 'completed')),
            created_at TEXT NOT NULL,
            completed_at TEXT,
            FOREIGN KEY (user_id) REFERENCES users(user_id),
            FOREIGN KEY (course_id) REFERENCES courses(id),
            FOREIGN KEY (tee_id) REFERENCES tees(id)
        );

        CREATE TABLE hole_scores(
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            round_id INTEGER NOT NULL,
            hole_number INTEGER NOT NULL,
            strokes INTEGER NOT NULL,
            putts INTEGER,
            par INTEGER,
            notes TEXT,
            fairway_hit INTEGER CHECK(fairway_hit IN (0, 1)),
            FOREIGN KEY (round_id) REFERENCES rounds(id) ON DELETE CASCADE,
            UNIQUE (round_id, hole_number)
        );
        "#,
    )?;
    Ok(())
}

fn migration_v2(conn: &Connection) -> Result<()> {
    conn.execute(
        "INSERT INTO courses (id, name, location, holes) VALUES (?1, ?2, ?3, 18)",
        params![SEED_COURSE_ID, "Royal Golf Club Bahrain", "Bahrain"],
    )?;

    let mut tee_stmt =
        conn.prepare("INSERT INTO tees (course_id, name, rating, slope) VALUES (?1, ?2, ?3, ?4)")?;
    for (name, rating, slope) in SEED_TEES {
        tee_stmt.execute(params![SEED_COURSE_ID, name, rating, slope])?;
    }

    let mut hole_stmt = conn.prepare(
        r#"
        INSERT INTO hole_defs (
            course_id, hole_number, par, handicap_index,
            yardage_black, yardage_gold, yardage_blue, yardage_white, yardage_red
        )
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
        "#,
    )?;
    for (hole, par, index, black, gold, blue, white, red) in SEED_HOLES {
        hole_stmt.execute(params![
            SEED_COURSE_ID,
            hole,
            par,
            index,
            black,
            gold,
            blue,
            white,
            red
        ])?;
    }

    Ok(())
}

fn migration_v3(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE INDEX IF NOT EXISTS idx_rounds_user_status_date
            ON rounds(user_id, status, date);

        CREATE INDEX IF NOT EXISTS idx_hole_scores_round_id
            ON hole_scores(round_id);

        CREATE INDEX IF NOT EXISTS idx_tees_course_id
            ON tees(course_id);
        "#,
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;

    use super::*;

    fn migrated() -> Connection {
        let mut conn = Connection::open_in_memory().unwrap();
        run_migrations(&mut conn).unwrap();
        conn
    }

    fn scalar(conn: &Connection, sql: &str) -> i64 {
        conn.query_row(sql, [], |row| row.get(0)).unwrap()
    }

    #[test]
    fn test_schema_created() {
        let conn = migrated();
        assert_eq!(get_schema_version(&conn).unwrap(), SCHEMA_VERSION);

        for table in ["users", "courses", "tees", "hole_defs", "rounds", "hole_scores"] {
            let found = scalar(
                &conn,
                &format!(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = '{}'",
                    table
                ),
            );
            assert_eq!(found, 1, "missing table {}", table);
        }
    }

    #[test]
    fn test_seed_reference_data() {
        let conn = migrated();

        assert_eq!(
            scalar(&conn, "SELECT COUNT(*) FROM tees WHERE course_id = 1"),
            SEED_TEES.len() as i64
        );
        assert_eq!(scalar(&conn, "SELECT COUNT(*) FROM hole_defs WHERE course_id = 1"), 18);
        assert_eq!(scalar(&conn, "SELECT SUM(par) FROM hole_defs WHERE course_id = 1"), 72);
    }

    #[test]
    fn test_round_constraints() {
        let conn = migrated();
        conn.execute(
            "INSERT INTO users (first_name, last_name, email) VALUES ('A', 'B', 'a@b.c')",
            [],
        )
        .unwrap();

        let bad_holes = conn.execute(
            "INSERT INTO rounds (user_id, course_id, date, holes_played, status, created_at)
             VALUES (1, 1, '2026-01-01', 12, 'in_progress', '2026-01-01T08:00:00')",
            [],
        );
        assert!(bad_holes.is_err());

        conn.execute(
            "INSERT INTO rounds (user_id, course_id, date, holes_played, status, created_at)
             VALUES (1, 1, '2026-01-01', 9, 'in_progress', '2026-01-01T08:00:00')",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO hole_scores (round_id, hole_number, strokes) VALUES (1, 1, 4)",
            [],
        )
        .unwrap();
        let duplicate = conn.execute(
            "INSERT INTO hole_scores (round_id, hole_number, strokes) VALUES (1, 1, 5)",
            [],
        );
        assert!(duplicate.is_err());
    }

    #[test]
    fn test_step_by_step_upgrade() {
        let mut conn = Connection::open_in_memory().unwrap();
        ensure_migration_table(&conn).unwrap();

        apply_migration(&mut conn, 1).unwrap();
        assert_eq!(scalar(&conn, "SELECT COUNT(*) FROM courses"), 0);

        apply_migration(&mut conn, 2).unwrap();
        assert_eq!(scalar(&conn, "SELECT COUNT(*) FROM courses"), 1);

        // Remaining steps are picked up by the runner
        run_migrations(&mut conn).unwrap();
        assert_eq!(get_schema_version(&conn).unwrap(), SCHEMA_VERSION);
    }

    #[test]
    fn test_rerun_keeps_seed_unique() {
        let mut conn = migrated();
        run_migrations(&mut conn).unwrap();

        assert_eq!(get_schema_version(&conn).unwrap(), SCHEMA_VERSION);
        assert_eq!(scalar(&conn, "SELECT COUNT(*) FROM courses"), 1);
        assert_eq!(scalar(&conn, "SELECT COUNT(*) FROM tees"), SEED_TEES.len() as i64);
    }

    #[test]
    fn test_newer_database_refused() {
        let mut conn = Connection::open_in_memory().unwrap();
        ensure_migration_table(&conn).unwrap();
        set_schema_version(&conn, SCHEMA_VERSION + 1).unwrap();

        let err = run_migrations(&mut conn).unwrap_err();
        assert!(err.to_string().contains("newer than supported"), "got: {}", err);
    }

    #[test]
    fn test_unknown_migration_rolls_back() {
        let mut conn = Connection::open_in_memory().unwrap();
        ensure_migration_table(&conn).unwrap();

        assert!(apply_migration(&mut conn, SCHEMA_VERSION + 1).is_err());
        assert_eq!(get_schema_version(&conn).unwrap(), 0);
    }
}
