use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::{HoleScore, UserId};

pub type RoundId = i64;

/// Number of holes a round covers. Only full nines and full eighteens exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum HolesPlayed {
    Nine,
    Eighteen,
}

impl HolesPlayed {
    pub fn count(self) -> u8 {
        match self {
            Self::Nine => 9,
            Self::Eighteen => 18,
        }
    }

    /// Whether `hole_number` is a valid hole for a round of this length
    pub fn contains(self, hole_number: u8) -> bool {
        (1..=self.count()).contains(&hole_number)
    }
}

impl TryFrom<u8> for HolesPlayed {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            9 => Ok(Self::Nine),
            18 => Ok(Self::Eighteen),
            other => Err(Error::Validation(format!(
                "holesPlayed must be 9 or 18, got {}",
                other
            ))),
        }
    }
}

impl From<HolesPlayed> for u8 {
    fn from(value: HolesPlayed) -> Self {
        value.count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundStatus {
    InProgress,
    Completed,
}

impl RoundStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for RoundStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoundStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            other => Err(Error::Internal(format!("Unknown round status: {}", other))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Round {
    pub id: RoundId,
    pub user_id: UserId,
    pub course_id: i64,
    pub tee_id: Option<i64>,
    pub date: NaiveDate,
    pub holes_played: HolesPlayed,
    pub total_score: Option<i32>,
    pub notes: Option<String>,
    pub status: RoundStatus,
    pub created_at: NaiveDateTime,
    pub completed_at: Option<NaiveDateTime>,
}

impl Round {
    pub fn is_completed(&self) -> bool {
        self.status == RoundStatus::Completed
    }
}

/// Parameters for starting a new round
#[derive(Debug, Clone, PartialEq)]
pub struct NewRound {
    pub user_id: UserId,
    pub course_id: i64,
    pub tee_id: Option<i64>,
    pub date: NaiveDate,
    pub holes_played: HolesPlayed,
}

impl NewRound {
    pub fn new(user_id: UserId, course_id: i64, date: NaiveDate, holes_played: HolesPlayed) -> Self {
        Self {
            user_id,
            course_id,
            tee_id: None,
            date,
            holes_played,
        }
    }

    pub fn with_tee(mut self, tee_id: i64) -> Self {
        self.tee_id = Some(tee_id);

        self
    }
}

/// A round together with its recorded holes, ordered by hole number
#[derive(Debug, Clone, Serialize)]
pub struct RoundDetail {
    #[serde(flatten)]
    pub round: Round,
    pub holes: Vec<HoleScore>,
}

/// Completed round as listed on the dashboard
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoundSummary {
    pub id: RoundId,
    pub total_score: Option<i32>,
    pub date: NaiveDate,
    pub holes_played: HolesPlayed,
    pub status: RoundStatus,
    pub tee_name: Option<String>,
    pub total_putts: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_holes_played_accepts_nine_and_eighteen() {
        assert_eq!(HolesPlayed::try_from(9).unwrap(), HolesPlayed::Nine);
        assert_eq!(HolesPlayed::try_from(18).unwrap(), HolesPlayed::Eighteen);
    }

    #[test]
    fn test_holes_played_rejects_other_lengths() {
        for value in [0, 1, 10, 17, 27] {
            let err = HolesPlayed::try_from(value).unwrap_err();
            assert!(err.is_validation(), "{} should be rejected", value);
        }
    }

    #[test]
    fn test_holes_played_contains() {
        assert!(HolesPlayed::Nine.contains(9));
        assert!(!HolesPlayed::Nine.contains(10));
        assert!(!HolesPlayed::Eighteen.contains(0));
        assert!(HolesPlayed::Eighteen.contains(18));
    }

    #[test]
    fn test_round_status_parse() {
        assert_eq!(
            "completed".parse::<RoundStatus>().unwrap(),
            RoundStatus::Completed
        );
        assert!("finished".parse::<RoundStatus>().is_err());
        assert_eq!(RoundStatus::InProgress.to_string(), "in_progress");
    }
}
