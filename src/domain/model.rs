use chrono::{DateTime, Local, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const HISTORY_CAPACITY: usize = 50;
pub const LAST_ROLLS_CAPACITY: usize = 10;
pub const TOP_FREQUENCIES: usize = 5;

/// Inclusive integer interval with `min < max`.
///
/// Only obtainable through [`crate::core::range::validate`], so holding a `Range`
/// means the bounds were checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Range {
    min: i64,
    max: i64,
}

impl Range {
    pub(crate) fn new_unchecked(min: i64, max: i64) -> Self {
        Self { min, max }
    }

    pub fn min(&self) -> i64 {
        self.min
    }

    pub fn max(&self) -> i64 {
        self.max
    }

    /// Number of distinct values in the interval.
    pub fn span(&self) -> u128 {
        (i128::from(self.max) - i128::from(self.min) + 1) as u128
    }

    pub fn contains(&self, value: i64) -> bool {
        self.min <= value && value <= self.max
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.min, self.max)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresetRange {
    pub name: String,
    pub min: i64,
    pub max: i64,
    #[serde(default)]
    pub description: String,
}

impl PresetRange {
    /// Button label used by the presentation layer, e.g. `Dice (1-6)`.
    pub fn label(&self) -> String {
        format!("{} ({}-{})", self.name, self.min, self.max)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawRecord {
    pub number: i64,
    pub range: String,
    pub timestamp: String,
    pub date: String,
}

impl DrawRecord {
    /// `timestamp` is rendered in local time with `timestamp_format`; `date` is ISO-8601 UTC.
    pub fn new(number: i64, range: &Range, now: DateTime<Utc>, timestamp_format: &str) -> Self {
        Self {
            number,
            range: range.to_string(),
            timestamp: now.with_timezone(&Local).format(timestamp_format).to_string(),
            date: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrequencyEntry {
    pub number: i64,
    pub count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    #[serde(default)]
    pub total_rolls: u64,
    #[serde(default)]
    pub most_frequent_numbers: Vec<FrequencyEntry>,
    #[serde(default)]
    pub last_rolls: Vec<i64>,
}

/// Root aggregate. Same JSON shape as the bundled catalog and the durable blob.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Store {
    #[serde(default)]
    pub ranges: Vec<PresetRange>,
    #[serde(default)]
    pub history: Vec<DrawRecord>,
    #[serde(default)]
    pub statistics: Statistics,
}

impl Store {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_pristine(&self) -> bool {
        self.history.is_empty() && self.statistics == Statistics::default()
    }
}
