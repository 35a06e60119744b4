use std::sync::Arc;

use chrono::NaiveDate;

use crate::domain::dashboard::{DashboardComposer, ProfileComposer};
use crate::domain::handicap::HandicapEstimator;
use crate::error::Result;
use crate::models::{DashboardStats, HandicapReport, ProfileStats, UserId};
use crate::store::RoundStore;

/// Entry point for the read-only statistics endpoints
#[derive(Clone)]
pub struct StatisticsService {
    handicap: HandicapEstimator,
    dashboard: DashboardComposer,
    profile: ProfileComposer,
}

impl StatisticsService {
    pub fn new(store: Arc<dyn RoundStore>) -> Self {
        Self {
            handicap: HandicapEstimator::new(store.clone()),
            dashboard: DashboardComposer::new(store.clone()),
            profile: ProfileComposer::new(store),
        }
    }

    /// Handicap estimate from the last ten completed rounds
    pub fn get_handicap(&self, user_id: UserId) -> Result<HandicapReport> {
        self.handicap.estimate(user_id)
    }

    /// Dashboard over the trailing `days` ending today
    pub fn get_dashboard(&self, user_id: UserId, days: i64) -> Result<DashboardStats> {
        self.dashboard.compose(user_id, days)
    }

    pub fn get_dashboard_as_of(
        &self,
        user_id: UserId,
        days: i64,
        today: NaiveDate,
    ) -> Result<DashboardStats> {
        self.dashboard.compose_as_of(user_id, days, today)
    }

    /// Career totals and eclectic scores
    pub fn get_profile(&self, user_id: UserId) -> Result<ProfileStats> {
        self.profile.compose(user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::db::test_support::insert_user;
    use crate::domain::RoundsService;
    use crate::models::{HoleScoreInput, HolesPlayed, NewRound};
    use crate::store::SqliteRoundStore;

    #[test]
    fn test_statistics_over_sqlite_store() {
        let db = Arc::new(Database::open_in_memory().unwrap());
        let user = insert_user(&db, "a@example.com");
        let store: Arc<dyn RoundStore> = Arc::new(SqliteRoundStore::new(db));
        let rounds = RoundsService::new(store.clone());
        let stats = StatisticsService::new(store);

        let today = chrono::Local::now().date_naive();
        let round = rounds
            .create(&NewRound::new(user, 1, today, HolesPlayed::Nine).with_tee(1))
            .unwrap();
        rounds
            .record_hole(
                user,
                round.id,
                &HoleScoreInput::new(7, 5).with_par(3).with_putts(3),
            )
            .unwrap();
        rounds.finalize(user, round.id, 45, None).unwrap();

        let handicap = stats.get_handicap(user).unwrap();
        assert_eq!(handicap.handicap.as_str(), Some("34.56"));

        let dashboard = stats.get_dashboard_as_of(user, 30, today).unwrap();
        assert_eq!(dashboard.total_rounds, 1);
        assert_eq!(dashboard.avg_putts.as_str(), Some("3.0"));
        assert_eq!(dashboard.leaks.three_putts.as_str(), Some("1.0"));
        assert_eq!(dashboard.leaks.double_bogeys.as_str(), Some("1.0"));

        let profile = stats.get_profile(user).unwrap();
        assert_eq!(profile.eclectic[&1][&7], 5);
        assert_eq!(profile.career.rounds, 1);
    }
}
