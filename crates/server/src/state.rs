use std::sync::Arc;

use golf_core::db::{CoursesDao, Database, UsersDao};
use golf_core::domain::{RoundsService, StatisticsService};
use golf_core::store::{RoundStore, SqliteRoundStore};

use crate::error::ApiError;

/// Shared state accessible from axum handlers
#[derive(Clone)]
pub struct AppState {
    pub rounds: RoundsService,
    pub statistics: StatisticsService,
    pub courses: CoursesDao,
    pub users: UsersDao,
}

impl AppState {
    pub fn new(db: Arc<Database>) -> Self {
        let store: Arc<dyn RoundStore> = Arc::new(SqliteRoundStore::new(db.clone()));

        Self {
            rounds: RoundsService::new(store.clone()),
            statistics: StatisticsService::new(store),
            courses: CoursesDao::new(db.clone()),
            users: UsersDao::new(db),
        }
    }
}

/// Run synchronous store work on the blocking pool
pub async fn blocking<T, F>(work: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce() -> golf_core::Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| ApiError::Internal(format!("store task failed: {}", e)))?
        .map_err(ApiError::from)
}
