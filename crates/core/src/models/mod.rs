pub mod course;
pub mod hole;
pub mod round;
pub mod statistics;
pub mod user;

pub use course::{Course, HoleDefinition, Tee, Yardages};
pub use hole::{FairwayHit, HoleRecord, HoleScore, HoleScoreInput, TeeHoleScore};
pub use round::{HolesPlayed, NewRound, Round, RoundDetail, RoundId, RoundStatus, RoundSummary};
pub use statistics::{
    CareerStats, CareerTotals, DashboardStats, DisplayStat, EclecticMap, HandicapReport,
    LeakCounts, LeakReport, ProfileStats,
};
pub use user::{User, UserId};
