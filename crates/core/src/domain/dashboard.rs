use std::sync::Arc;

use chrono::{Local, NaiveDate};

use crate::domain::eclectic::EclecticAggregator;
use crate::domain::fanout::join2;
use crate::domain::leaks::{LeakAnalyzer, leak_report};
use crate::error::Result;
use crate::models::{CareerStats, DashboardStats, DisplayStat, ProfileStats, UserId};
use crate::store::RoundStore;
use crate::utils::time::window_start;

pub const DEFAULT_WINDOW_DAYS: i64 = 30;

/// Windowed scoring overview: averages, the rounds themselves and leak rates
#[derive(Clone)]
pub struct DashboardComposer {
    store: Arc<dyn RoundStore>,
    leaks: LeakAnalyzer,
}

impl DashboardComposer {
    pub fn new(store: Arc<dyn RoundStore>) -> Self {
        Self {
            leaks: LeakAnalyzer::new(store.clone()),
            store,
        }
    }

    pub fn compose(&self, user_id: UserId, days: i64) -> Result<DashboardStats> {
        self.compose_as_of(user_id, days, Local::now().date_naive())
    }

    /// The round list and the leak tallies are read concurrently; any failing
    /// read fails the whole dashboard. Every average divides by the number of
    /// rounds in that one list.
    pub fn compose_as_of(&self, user_id: UserId, days: i64, today: NaiveDate) -> Result<DashboardStats> {
        let since = window_start(today, days)?;
        let store = self.store.as_ref();

        let (rounds, leaks) = join2(
            || store.completed_since(user_id, since),
            || self.leaks.counts_since(user_id, since),
        )?;

        let total_score: i64 = rounds
            .iter()
            .map(|r| i64::from(r.total_score.unwrap_or(0)))
            .sum();
        let total_putts: i64 = rounds.iter().map(|r| r.total_putts.unwrap_or(0)).sum();

        tracing::debug!(user_id, days, rounds = rounds.len(), "composed dashboard");

        Ok(DashboardStats {
            avg_score: DisplayStat::per(total_score, rounds.len()),
            avg_putts: DisplayStat::per(total_putts, rounds.len()),
            total_rounds: rounds.len(),
            leaks: leak_report(&leaks, rounds.len()),
            rounds,
        })
    }
}

/// Lifetime view: career counters and the eclectic best round per tee
#[derive(Clone)]
pub struct ProfileComposer {
    store: Arc<dyn RoundStore>,
    eclectic: EclecticAggregator,
}

impl ProfileComposer {
    pub fn new(store: Arc<dyn RoundStore>) -> Self {
        Self {
            eclectic: EclecticAggregator::new(store.clone()),
            store,
        }
    }

    pub fn compose(&self, user_id: UserId) -> Result<ProfileStats> {
        let store = self.store.as_ref();

        let (totals, eclectic) = join2(
            || store.career_totals(user_id),
            || self.eclectic.for_user(user_id),
        )?;

        Ok(ProfileStats {
            career: CareerStats {
                rounds: totals.rounds,
                birdies: totals.birdies,
                pars: totals.pars,
                avg_putts: DisplayStat::per(totals.total_putts, totals.rounds),
            },
            eclectic,
        })
    }
}
