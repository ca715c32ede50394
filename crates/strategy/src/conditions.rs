use serde::Serialize;

use crate::error::{AnalysisError, Result};
use crate::pipeline::EnrichedCandle;

/// RSI band for bullish entries. Both ends inclusive.
pub const BULLISH_RSI_BAND: (f64, f64) = (30.0, 50.0);
/// RSI band for bearish entries. Both ends inclusive, so 50 sits in both bands.
pub const BEARISH_RSI_BAND: (f64, f64) = (50.0, 70.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    Bullish,
    Bearish,
}

impl std::fmt::Display for Polarity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Polarity::Bullish => write!(f, "bullish"),
            Polarity::Bearish => write!(f, "bearish"),
        }
    }
}

/// Indicator inputs the predicates read, all guaranteed present.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IndicatorReading {
    pub close: f64,
    pub volume: f64,
    pub ema: f64,
    pub rsi: f64,
    pub macd_histogram: f64,
    pub volume_avg: f64,
}

impl IndicatorReading {
    pub fn from_candle(candle: &EnrichedCandle) -> Result<Self> {
        let require = |name: &str, value: Option<f64>| {
            value.filter(|v| !v.is_nan()).ok_or_else(|| {
                AnalysisError::NullValue(format!(
                    "'{name}' is absent on candle at {}",
                    candle.timestamp()
                ))
            })
        };
        Ok(Self {
            close: candle.candle.close,
            volume: candle.candle.volume,
            ema: require("ema", candle.ema)?,
            rsi: require("rsi", candle.rsi)?,
            macd_histogram: require("macd_histogram", candle.macd_histogram)?,
            volume_avg: require("volume_avg", candle.volume_avg)?,
        })
    }
}

/// One named predicate and its outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Condition {
    pub name: &'static str,
    pub met: bool,
}

/// The predicate outcomes for one polarity on one candle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConditionSet {
    pub polarity: Polarity,
    pub conditions: [Condition; 4],
}

impl ConditionSet {
    pub fn all_met(&self) -> bool {
        self.conditions.iter().all(|c| c.met)
    }

    pub fn get(&self, name: &str) -> Option<bool> {
        self.conditions.iter().find(|c| c.name == name).map(|c| c.met)
    }
}

/// Evaluate the fixed predicate set for `polarity` against one candle.
///
/// Fails with `NullValue` if any indicator the predicates read is absent.
pub fn evaluate(candle: &EnrichedCandle, polarity: Polarity) -> Result<ConditionSet> {
    let reading = IndicatorReading::from_candle(candle)?;
    Ok(evaluate_reading(&reading, polarity))
}

pub fn evaluate_reading(r: &IndicatorReading, polarity: Polarity) -> ConditionSet {
    let volume_above_average = Condition {
        name: "volume_above_average",
        met: r.volume > r.volume_avg,
    };

    let conditions = match polarity {
        Polarity::Bullish => [
            Condition { name: "price_above_ema", met: r.close > r.ema },
            Condition { name: "rsi_in_range", met: in_band(r.rsi, BULLISH_RSI_BAND) },
            Condition { name: "macd_histogram_positive", met: r.macd_histogram > 0.0 },
            volume_above_average,
        ],
        Polarity::Bearish => [
            Condition { name: "price_below_ema", met: r.close < r.ema },
            Condition { name: "rsi_in_range", met: in_band(r.rsi, BEARISH_RSI_BAND) },
            Condition { name: "macd_histogram_negative", met: r.macd_histogram < 0.0 },
            volume_above_average,
        ],
    };

    ConditionSet { polarity, conditions }
}

fn in_band(value: f64, (lo, hi): (f64, f64)) -> bool {
    lo <= value && value <= hi
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use common::Candle;

    fn enriched(
        close: f64,
        volume: f64,
        ema: f64,
        rsi: f64,
        hist: f64,
        vol_avg: f64,
    ) -> EnrichedCandle {
        let ts = DateTime::from_timestamp(1_704_067_200, 0).unwrap();
        EnrichedCandle {
            candle: Candle::new(ts, close, close, close, close, volume),
            ema: Some(ema),
            rsi: Some(rsi),
            macd: Some(0.0),
            macd_signal: Some(-hist),
            macd_histogram: Some(hist),
            volume_avg: Some(vol_avg),
        }
    }

    #[test]
    fn bullish_set_all_met() {
        let c = enriched(105.0, 200.0, 100.0, 40.0, 0.5, 150.0);
        let set = evaluate(&c, Polarity::Bullish).unwrap();
        assert!(set.all_met());
        assert_eq!(set.get("price_above_ema"), Some(true));
    }

    #[test]
    fn bearish_set_all_met() {
        let c = enriched(95.0, 200.0, 100.0, 60.0, -0.5, 150.0);
        assert!(evaluate(&c, Polarity::Bearish).unwrap().all_met());
        assert!(!evaluate(&c, Polarity::Bullish).unwrap().all_met());
    }

    #[test]
    fn low_volume_fails_both_polarities() {
        let c = enriched(105.0, 100.0, 100.0, 40.0, 0.5, 150.0);
        let set = evaluate(&c, Polarity::Bullish).unwrap();
        assert!(!set.all_met());
        assert_eq!(set.get("volume_above_average"), Some(false));
        assert_eq!(set.get("price_above_ema"), Some(true));
    }

    #[test]
    fn volume_equal_to_average_is_not_above() {
        let c = enriched(105.0, 150.0, 100.0, 40.0, 0.5, 150.0);
        let set = evaluate(&c, Polarity::Bullish).unwrap();
        assert_eq!(set.get("volume_above_average"), Some(false));
    }

    #[test]
    fn rsi_band_edges_are_inclusive() {
        for rsi in [30.0, 50.0] {
            let c = enriched(105.0, 200.0, 100.0, rsi, 0.5, 150.0);
            assert!(evaluate(&c, Polarity::Bullish).unwrap().all_met(), "rsi={rsi}");
        }
        for rsi in [50.0, 70.0] {
            let c = enriched(95.0, 200.0, 100.0, rsi, -0.5, 150.0);
            assert!(evaluate(&c, Polarity::Bearish).unwrap().all_met(), "rsi={rsi}");
        }
        let c = enriched(105.0, 200.0, 100.0, 29.99, 0.5, 150.0);
        assert_eq!(evaluate(&c, Polarity::Bullish).unwrap().get("rsi_in_range"), Some(false));
    }

    #[test]
    fn zero_histogram_satisfies_neither_polarity() {
        let c = enriched(100.0, 200.0, 100.0, 50.0, 0.0, 150.0);
        let bull = evaluate(&c, Polarity::Bullish).unwrap();
        let bear = evaluate(&c, Polarity::Bearish).unwrap();
        assert_eq!(bull.get("macd_histogram_positive"), Some(false));
        assert_eq!(bear.get("macd_histogram_negative"), Some(false));
    }

    #[test]
    fn absent_indicator_is_a_null_value() {
        let mut c = enriched(105.0, 200.0, 100.0, 40.0, 0.5, 150.0);
        c.rsi = None;
        let err = evaluate(&c, Polarity::Bullish).unwrap_err();
        assert!(matches!(err, AnalysisError::NullValue(msg) if msg.contains("rsi")));
    }

    #[test]
    fn nan_indicator_is_a_null_value() {
        let mut c = enriched(105.0, 200.0, 100.0, 40.0, 0.5, 150.0);
        c.volume_avg = Some(f64::NAN);
        assert!(matches!(evaluate(&c, Polarity::Bearish), Err(AnalysisError::NullValue(_))));
    }
}
