pub mod dashboard;
pub mod eclectic;
mod fanout;
pub mod handicap;
pub mod leaks;
pub mod rounds;
pub mod statistics;

pub use dashboard::{DEFAULT_WINDOW_DAYS, DashboardComposer, ProfileComposer};
pub use eclectic::EclecticAggregator;
pub use handicap::HandicapEstimator;
pub use leaks::LeakAnalyzer;
pub use rounds::RoundsService;
pub use statistics::StatisticsService;
