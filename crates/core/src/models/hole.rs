use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::RoundId;

/// Tee-shot outcome on a hole. Absence (`None`) means par 3 or not recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "FairwayRepr")]
pub enum FairwayHit {
    Hit,
    Missed,
}

impl FairwayHit {
    pub fn from_flag(value: i64) -> Option<Self> {
        match value {
            0 => Some(Self::Missed),
            1 => Some(Self::Hit),
            _ => None,
        }
    }
}

impl From<FairwayHit> for u8 {
    fn from(value: FairwayHit) -> Self {
        match value {
            FairwayHit::Hit => 1,
            FairwayHit::Missed => 0,
        }
    }
}

/// Clients send the flag either as a boolean or as 1/0
#[derive(Deserialize)]
#[serde(untagged)]
enum FairwayRepr {
    Flag(bool),
    Code(i64),
}

impl TryFrom<FairwayRepr> for FairwayHit {
    type Error = Error;

    fn try_from(value: FairwayRepr) -> Result<Self> {
        match value {
            FairwayRepr::Flag(true) => Ok(Self::Hit),
            FairwayRepr::Flag(false) => Ok(Self::Missed),
            FairwayRepr::Code(code) => Self::from_flag(code).ok_or_else(|| {
                Error::Validation(format!("fairwayHit must be 0 or 1, got {}", code))
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HoleScore {
    pub id: i64,
    pub round_id: RoundId,
    pub hole_number: u8,
    pub strokes: u8,
    pub putts: Option<u8>,
    pub par: Option<u8>,
    pub notes: Option<String>,
    pub fairway_hit: Option<FairwayHit>,
}

/// Values submitted for one hole while a round is being played
#[derive(Debug, Clone, PartialEq)]
pub struct HoleScoreInput {
    pub hole_number: u8,
    pub strokes: u8,
    pub par: Option<u8>,
    pub putts: Option<u8>,
    pub notes: Option<String>,
    pub fairway_hit: Option<FairwayHit>,
}

impl HoleScoreInput {
    pub fn new(hole_number: u8, strokes: u8) -> Self {
        Self {
            hole_number,
            strokes,
            par: None,
            putts: None,
            notes: None,
            fairway_hit: None,
        }
    }

    pub fn with_par(mut self, par: u8) -> Self {
        self.par = Some(par);
        self
    }

    pub fn with_putts(mut self, putts: u8) -> Self {
        self.putts = Some(putts);
        self
    }

    pub fn with_fairway(mut self, fairway_hit: FairwayHit) -> Self {
        self.fairway_hit = Some(fairway_hit);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Checks the values that do not depend on the owning round
    pub fn validate(&self) -> Result<()> {
        if self.hole_number == 0 {
            return Err(Error::Validation("holeNumber must be at least 1".into()));
        }

        if self.strokes == 0 {
            return Err(Error::Validation("strokes must be at least 1".into()));
        }

        if let Some(par) = self.par
            && !(3..=6).contains(&par)
        {
            return Err(Error::Validation(format!(
                "par must be between 3 and 6, got {}",
                par
            )));
        }

        if let Some(putts) = self.putts
            && putts > self.strokes
        {
            return Err(Error::Validation(format!(
                "putts ({}) cannot exceed strokes ({})",
                putts, self.strokes
            )));
        }

        Ok(())
    }
}

/// One hole of a completed round, as consumed by the leak analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoleRecord {
    pub round_id: RoundId,
    pub strokes: u8,
    pub putts: Option<u8>,
    pub par: Option<u8>,
    pub fairway_hit: Option<FairwayHit>,
}

/// Strokes on one hole of a completed round, keyed by the tee it was played from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TeeHoleScore {
    pub tee_id: i64,
    pub hole_number: u8,
    pub strokes: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fairway_accepts_bool_and_code() {
        let hit: FairwayHit = serde_json::from_str("true").unwrap();
        let missed: FairwayHit = serde_json::from_str("0").unwrap();

        assert_eq!(hit, FairwayHit::Hit);
        assert_eq!(missed, FairwayHit::Missed);
        assert!(serde_json::from_str::<FairwayHit>("2").is_err());
    }

    #[test]
    fn test_fairway_serializes_as_code() {
        assert_eq!(serde_json::to_string(&FairwayHit::Missed).unwrap(), "0");
    }

    #[test]
    fn test_validate_rejects_zero_strokes() {
        let err = HoleScoreInput::new(1, 0).validate().unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_validate_rejects_putts_above_strokes() {
        let input = HoleScoreInput::new(3, 4).with_putts(5);
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_unrealistic_par() {
        assert!(HoleScoreInput::new(3, 4).with_par(2).validate().is_err());
        assert!(HoleScoreInput::new(3, 4).with_par(5).validate().is_ok());
    }
}
