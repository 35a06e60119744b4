use std::sync::Arc;

use rusqlite::{ErrorCode, OptionalExtension, params};

use crate::db::Database;
use crate::error::{Error, Result};
use crate::models::{User, UserId};

/// Accounts and their session tokens. Credential checks happen elsewhere;
/// this only records who exists and which token maps to whom.
#[derive(Clone)]
pub struct UsersDao {
    db: Arc<Database>,
}

impl UsersDao {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub fn create_user(&self, first_name: &str, last_name: &str, email: &str) -> Result<User> {
        let (first_name, last_name, email) = (first_name.trim(), last_name.trim(), email.trim());

        if first_name.is_empty() || last_name.is_empty() {
            return Err(Error::Validation("first and last name are required".into()));
        }
        if !email.contains('@') {
            return Err(Error::Validation(format!("invalid email address: {}", email)));
        }

        self.db.with_connection(|conn| {
            let inserted = conn.execute(
                "INSERT INTO users (first_name, last_name, email) VALUES (?1, ?2, ?3)",
                params![first_name, last_name, email],
            );

            match inserted {
                Err(rusqlite::Error::SqliteFailure(e, _))
                    if e.code == ErrorCode::ConstraintViolation =>
                {
                    return Err(Error::Validation("Email already in use".into()));
                }
                other => other?,
            };

            let user = User {
                user_id: conn.last_insert_rowid(),
                first_name: first_name.to_string(),
                last_name: last_name.to_string(),
                email: email.to_string(),
            };

            tracing::debug!(user_id = user.user_id, "created user");

            Ok(user)
        })
    }

    pub fn get_user(&self, user_id: UserId) -> Result<Option<User>> {
        self.db.with_connection(|conn| {
            let user = conn
                .query_row(
                    "SELECT user_id, first_name, last_name, email FROM users WHERE user_id = ?1",
                    params![user_id],
                    |row| {
                        Ok(User {
                            user_id: row.get(0)?,
                            first_name: row.get(1)?,
                            last_name: row.get(2)?,
                            email: row.get(3)?,
                        })
                    },
                )
                .optional()?;

            Ok(user)
        })
    }

    /// Session token for a user, minting one if none is active
    pub fn issue_token(&self, user_id: UserId) -> Result<String> {
        self.db.transaction(|tx| {
            let existing: Option<Option<String>> = tx
                .query_row(
                    "SELECT session_token FROM users WHERE user_id = ?1",
                    params![user_id],
                    |row| row.get(0),
                )
                .optional()?;

            match existing {
                None => Err(Error::NotFound(format!("User {} does not exist", user_id))),
                Some(Some(token)) => Ok(token),
                Some(None) => {
                    let token = uuid::Uuid::new_v4().simple().to_string();
                    tx.execute(
                        "UPDATE users SET session_token = ?1 WHERE user_id = ?2",
                        params![token, user_id],
                    )?;
                    Ok(token)
                }
            }
        })
    }

    pub fn user_id_for_token(&self, token: &str) -> Result<Option<UserId>> {
        self.db.with_connection(|conn| {
            let user_id = conn
                .query_row(
                    "SELECT user_id FROM users WHERE session_token = ?1",
                    params![token],
                    |row| row.get(0),
                )
                .optional()?;

            Ok(user_id)
        })
    }

    /// Returns whether a session was actually ended
    pub fn revoke_token(&self, token: &str) -> Result<bool> {
        self.db.with_connection(|conn| {
            let updated = conn.execute(
                "UPDATE users SET session_token = NULL WHERE session_token = ?1",
                params![token],
            )?;

            Ok(updated > 0)
        })
    }
}
