pub mod connection;
pub mod dao;
pub mod migrations;

pub use connection::Database;
pub use dao::{CoursesDao, RoundsDao, StatisticsDao, UsersDao};

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use rusqlite::params;

    use super::Database;
    use crate::models::UserId;

    pub fn setup_test_db() -> Arc<Database> {
        Arc::new(Database::open_in_memory().unwrap())
    }

    pub fn insert_user(db: &Database, email: &str) -> UserId {
        db.with_connection(|conn| {
            conn.execute(
                "INSERT INTO users (first_name, last_name, email) VALUES ('Test', 'Golfer', ?1)",
                params![email],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .unwrap()
    }
}
