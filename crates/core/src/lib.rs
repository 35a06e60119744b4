//! Round tracking core: persistence of rounds and hole scores, plus the
//! statistics computed over a player's history (handicap, stroke leaks,
//! eclectic best scores, dashboard and profile payloads).

pub mod db;
pub mod domain;
pub mod error;
pub mod models;
pub mod store;
pub mod utils;

pub use error::{Error, Result};
