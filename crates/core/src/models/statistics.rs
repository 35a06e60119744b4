use std::collections::BTreeMap;

use serde::{Serialize, Serializer};

use crate::models::RoundSummary;

/// A rate or average prepared for display.
///
/// Serializes as the bare number `0` when there was nothing to average and as
/// a pre-formatted decimal string otherwise. Clients tell the two apart by
/// JSON type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayStat {
    NoData,
    Value(String),
}

impl DisplayStat {
    /// `numerator / denominator` rounded to `decimals` places, halves away
    /// from zero. `NoData` when `denominator` is zero.
    pub fn ratio(numerator: i64, denominator: i64, decimals: u32) -> Self {
        if denominator == 0 {
            return Self::NoData;
        }

        Self::Value(format_ratio(
            i128::from(numerator),
            i128::from(denominator),
            decimals,
        ))
    }

    /// Per-round average with one decimal, or `NoData` when `count` is zero
    pub fn per(numerator: i64, count: usize) -> Self {
        match i64::try_from(count) {
            Ok(count) => Self::ratio(numerator, count, 1),
            Err(_) => Self::NoData,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::NoData => None,
            Self::Value(value) => Some(value),
        }
    }
}

/// Exact decimal rendering of a fraction. Works on integers so that halves
/// such as `80.25` always round up to `80.3`.
fn format_ratio(numerator: i128, denominator: i128, decimals: u32) -> String {
    let negative = (numerator < 0) != (denominator < 0);
    let (numerator, denominator) = (numerator.unsigned_abs(), denominator.unsigned_abs());
    let scale = 10u128.pow(decimals);

    let rounded = (numerator * scale * 2 + denominator) / (denominator * 2);
    let sign = if negative { "-" } else { "" };

    if decimals == 0 {
        return format!("{}{}", sign, rounded);
    }

    format!(
        "{}{}.{:0width$}",
        sign,
        rounded / scale,
        rounded % scale,
        width = decimals as usize
    )
}

impl Serialize for DisplayStat {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::NoData => serializer.serialize_u8(0),
            Self::Value(value) => serializer.serialize_str(value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HandicapReport {
    pub handicap: DisplayStat,
    pub rounds_count: usize,
}

/// Raw leak tallies over a set of hole records
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LeakCounts {
    pub three_putts: u32,
    pub double_bogeys: u32,
    pub missed_fairways: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeakReport {
    pub three_putts: DisplayStat,
    pub double_bogeys: DisplayStat,
    pub missed_fairways: DisplayStat,
}

impl LeakReport {
    pub fn empty() -> Self {
        Self {
            three_putts: DisplayStat::NoData,
            double_bogeys: DisplayStat::NoData,
            missed_fairways: DisplayStat::NoData,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub avg_score: DisplayStat,
    pub avg_putts: DisplayStat,
    pub total_rounds: usize,
    pub rounds: Vec<RoundSummary>,
    pub leaks: LeakReport,
}

/// Lifetime counters maintained by the store
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CareerTotals {
    pub rounds: usize,
    pub birdies: i64,
    pub pars: i64,
    pub total_putts: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CareerStats {
    pub rounds: usize,
    pub birdies: i64,
    pub pars: i64,
    pub avg_putts: DisplayStat,
}

/// tee id -> hole number -> fewest strokes ever recorded
pub type EclecticMap = BTreeMap<i64, BTreeMap<u8, u8>>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileStats {
    pub career: CareerStats,
    pub eclectic: EclecticMap,
}
