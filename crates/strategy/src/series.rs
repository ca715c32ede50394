use common::{Candle, Timeframe};

use crate::error::{AnalysisError, Result};

/// Allowed deviation of a candle spacing from the timeframe, as a fraction of it.
const CADENCE_TOLERANCE: f64 = 0.1;

/// Open-to-close move above which a zero-volume candle is considered corrupt.
const SIGNIFICANT_MOVE: f64 = 0.01;

/// A validated, chronologically ordered window of closed candles.
///
/// Construction checks every invariant the indicator pipeline relies on,
/// so holding a `CandleSeries` means the window is well formed.
#[derive(Debug, Clone, PartialEq)]
pub struct CandleSeries {
    candles: Vec<Candle>,
    timeframe: Timeframe,
}

impl CandleSeries {
    pub fn new(candles: Vec<Candle>, timeframe: Timeframe) -> Result<Self> {
        if candles.is_empty() {
            return Err(AnalysisError::DataShape("candle series is empty".into()));
        }

        for (i, c) in candles.iter().enumerate() {
            if !c.is_finite() {
                return Err(AnalysisError::NullValue(format!(
                    "non-finite OHLCV value in candle {i} at {}",
                    c.timestamp
                )));
            }
            if c.open <= 0.0 || c.high <= 0.0 || c.low <= 0.0 || c.close <= 0.0 {
                return Err(AnalysisError::DataShape(format!(
                    "non-positive price in candle {i} at {}",
                    c.timestamp
                )));
            }
            if !c.has_consistent_range() {
                return Err(AnalysisError::DataShape(format!(
                    "inconsistent OHLC range in candle {i} at {}",
                    c.timestamp
                )));
            }
            if c.volume < 0.0 {
                return Err(AnalysisError::DataShape(format!(
                    "negative volume in candle {i} at {}",
                    c.timestamp
                )));
            }
            if c.volume == 0.0 && ((c.close - c.open) / c.open).abs() > SIGNIFICANT_MOVE {
                return Err(AnalysisError::DataShape(format!(
                    "candle {i} at {} moved more than 1% on zero volume",
                    c.timestamp
                )));
            }
        }

        let expected = timeframe.duration();
        let tolerance_ms = (expected.num_milliseconds() as f64 * CADENCE_TOLERANCE) as i64;
        for (i, pair) in candles.windows(2).enumerate() {
            let step = pair[1].timestamp - pair[0].timestamp;
            if step == chrono::TimeDelta::zero() {
                return Err(AnalysisError::DataShape(format!(
                    "duplicate timestamp {} at index {}",
                    pair[1].timestamp,
                    i + 1
                )));
            }
            if step < chrono::TimeDelta::zero() {
                return Err(AnalysisError::DataShape(format!(
                    "timestamps not increasing at index {}: {} follows {}",
                    i + 1,
                    pair[1].timestamp,
                    pair[0].timestamp
                )));
            }
            if (step - expected).num_milliseconds().abs() > tolerance_ms {
                return Err(AnalysisError::DataShape(format!(
                    "irregular gap of {}s at index {} for {timeframe} candles",
                    step.num_seconds(),
                    i + 1
                )));
            }
        }

        Ok(Self { candles, timeframe })
    }

    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    pub fn timeframe(&self) -> Timeframe {
        self.timeframe
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.close).collect()
    }

    pub fn volumes(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.volume).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeDelta};

    fn candle_at(hour: i64, close: f64) -> Candle {
        let ts = DateTime::from_timestamp(1_704_067_200, 0).unwrap() + TimeDelta::hours(hour);
        Candle::new(ts, close, close * 1.01, close * 0.99, close, 100.0)
    }

    #[test]
    fn accepts_regular_hourly_series() {
        let candles: Vec<Candle> = (0..5).map(|h| candle_at(h, 100.0 + h as f64)).collect();
        let series = CandleSeries::new(candles, Timeframe::Hour1).unwrap();
        assert_eq!(series.len(), 5);
        assert_eq!(series.closes()[4], 104.0);
    }

    #[test]
    fn rejects_empty_series() {
        assert!(matches!(
            CandleSeries::new(vec![], Timeframe::Hour1),
            Err(AnalysisError::DataShape(_))
        ));
    }

    #[test]
    fn rejects_duplicate_timestamps() {
        let candles = vec![candle_at(0, 100.0), candle_at(0, 101.0)];
        assert!(matches!(
            CandleSeries::new(candles, Timeframe::Hour1),
            Err(AnalysisError::DataShape(_))
        ));
    }

    #[test]
    fn rejects_out_of_order_timestamps() {
        let candles = vec![candle_at(1, 100.0), candle_at(0, 101.0)];
        assert!(matches!(
            CandleSeries::new(candles, Timeframe::Hour1),
            Err(AnalysisError::DataShape(_))
        ));
    }

    #[test]
    fn rejects_gap_beyond_tolerance() {
        let candles = vec![candle_at(0, 100.0), candle_at(1, 100.0), candle_at(3, 100.0)];
        assert!(matches!(
            CandleSeries::new(candles, Timeframe::Hour1),
            Err(AnalysisError::DataShape(_))
        ));
    }

    #[test]
    fn tolerates_small_cadence_jitter() {
        let mut late = candle_at(1, 100.0);
        late.timestamp += TimeDelta::minutes(5);
        let candles = vec![candle_at(0, 100.0), late];
        assert!(CandleSeries::new(candles, Timeframe::Hour1).is_ok());
    }

    #[test]
    fn nan_close_is_a_null_value() {
        let mut bad = candle_at(1, 100.0);
        bad.close = f64::NAN;
        assert!(matches!(
            CandleSeries::new(vec![candle_at(0, 100.0), bad], Timeframe::Hour1),
            Err(AnalysisError::NullValue(_))
        ));
    }

    #[test]
    fn rejects_inverted_high_low() {
        let mut bad = candle_at(0, 100.0);
        bad.high = 90.0;
        assert!(matches!(
            CandleSeries::new(vec![bad], Timeframe::Hour1),
            Err(AnalysisError::DataShape(_))
        ));
    }

    #[test]
    fn rejects_large_move_on_zero_volume() {
        let ts = DateTime::from_timestamp(1_704_067_200, 0).unwrap();
        let bad = Candle::new(ts, 100.0, 103.0, 99.0, 102.0, 0.0);
        assert!(matches!(
            CandleSeries::new(vec![bad], Timeframe::Hour1),
            Err(AnalysisError::DataShape(_))
        ));
    }

    #[test]
    fn rejects_non_positive_price() {
        let mut bad = candle_at(0, 100.0);
        bad.low = 0.0;
        assert!(matches!(
            CandleSeries::new(vec![bad], Timeframe::Hour1),
            Err(AnalysisError::DataShape(_))
        ));
    }

    #[test]
    fn rejects_negative_volume() {
        let mut bad = candle_at(0, 100.0);
        bad.volume = -1.0;
        assert!(matches!(
            CandleSeries::new(vec![bad], Timeframe::Hour1),
            Err(AnalysisError::DataShape(_))
        ));
    }

    #[test]
    fn accepts_flat_zero_volume_candle() {
        let mut quiet = candle_at(1, 100.0);
        quiet.volume = 0.0;
        quiet.close = 100.5;
        let series =
            CandleSeries::new(vec![candle_at(0, 100.0), quiet], Timeframe::Hour1).unwrap();
        assert_eq!(series.volumes(), vec![100.0, 0.0]);
        assert_eq!(series.timeframe(), Timeframe::Hour1);
    }
}
