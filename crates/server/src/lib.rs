//! HTTP surface for round tracking: round lifecycle endpoints plus the
//! dashboard, profile and handicap statistics.

pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod routes;
pub mod state;
pub mod telemetry;

pub use config::ServerConfig;
pub use error::ApiError;
pub use routes::router;
pub use state::AppState;
