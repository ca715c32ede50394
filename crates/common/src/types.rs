use std::str::FromStr;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::Error;

/// One closed OHLCV interval for a single instrument.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Candle {
    pub fn new(
        timestamp: DateTime<Utc>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Self {
        Self { timestamp, open, high, low, close, volume }
    }

    /// True when every OHLCV field is a finite number.
    pub fn is_finite(&self) -> bool {
        self.open.is_finite()
            && self.high.is_finite()
            && self.low.is_finite()
            && self.close.is_finite()
            && self.volume.is_finite()
    }

    /// High bounds open/close/low from above and low bounds them from below.
    pub fn has_consistent_range(&self) -> bool {
        self.high >= self.low
            && self.high >= self.open
            && self.high >= self.close
            && self.low <= self.open
            && self.low <= self.close
    }
}

/// Fixed candle cadence, labelled the way exchanges label klines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Timeframe {
    Min1,
    Min5,
    Min15,
    Min30,
    Hour1,
    Hour2,
    Hour4,
    Hour6,
    Hour8,
    Hour12,
    Day1,
    Day3,
    Week1,
}

impl Timeframe {
    /// Duration of one candle at this cadence.
    pub fn duration(&self) -> TimeDelta {
        match self {
            Timeframe::Min1 => TimeDelta::minutes(1),
            Timeframe::Min5 => TimeDelta::minutes(5),
            Timeframe::Min15 => TimeDelta::minutes(15),
            Timeframe::Min30 => TimeDelta::minutes(30),
            Timeframe::Hour1 => TimeDelta::hours(1),
            Timeframe::Hour2 => TimeDelta::hours(2),
            Timeframe::Hour4 => TimeDelta::hours(4),
            Timeframe::Hour6 => TimeDelta::hours(6),
            Timeframe::Hour8 => TimeDelta::hours(8),
            Timeframe::Hour12 => TimeDelta::hours(12),
            Timeframe::Day1 => TimeDelta::days(1),
            Timeframe::Day3 => TimeDelta::days(3),
            Timeframe::Week1 => TimeDelta::weeks(1),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Timeframe::Min1 => "1m",
            Timeframe::Min5 => "5m",
            Timeframe::Min15 => "15m",
            Timeframe::Min30 => "30m",
            Timeframe::Hour1 => "1h",
            Timeframe::Hour2 => "2h",
            Timeframe::Hour4 => "4h",
            Timeframe::Hour6 => "6h",
            Timeframe::Hour8 => "8h",
            Timeframe::Hour12 => "12h",
            Timeframe::Day1 => "1d",
            Timeframe::Day3 => "3d",
            Timeframe::Week1 => "1w",
        }
    }

    pub fn all() -> &'static [Timeframe] {
        &[
            Timeframe::Min1,
            Timeframe::Min5,
            Timeframe::Min15,
            Timeframe::Min30,
            Timeframe::Hour1,
            Timeframe::Hour2,
            Timeframe::Hour4,
            Timeframe::Hour6,
            Timeframe::Hour8,
            Timeframe::Hour12,
            Timeframe::Day1,
            Timeframe::Day3,
            Timeframe::Week1,
        ]
    }
}

impl FromStr for Timeframe {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Timeframe::all()
            .iter()
            .copied()
            .find(|tf| tf.label() == s.trim())
            .ok_or_else(|| Error::Config(format!("unsupported timeframe '{s}'")))
    }
}

impl TryFrom<String> for Timeframe {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Timeframe> for String {
    fn from(tf: Timeframe) -> Self {
        tf.label().to_string()
    }
}

impl std::fmt::Display for Timeframe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
