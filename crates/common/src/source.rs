use std::path::{Path, PathBuf};

use chrono::DateTime;
use serde::Deserialize;
use tracing::{debug, info};

use crate::{Candle, Error, Result, Timeframe};

/// Abstraction over whatever supplies closed candles for analysis.
///
/// Network venues, retries and rate-limit backoff all live behind this
/// trait. Implementations return candles oldest first.
pub trait CandleSource {
    /// Fetch up to `limit` trailing candles for `pair` at `timeframe`.
    fn fetch(&self, pair: &str, timeframe: Timeframe, limit: usize) -> Result<Vec<Candle>>;
}

/// Reads a JSON candle dump from disk.
///
/// Rows may be objects with an RFC 3339 `timestamp`, or exchange kline rows
/// `[timestamp_ms, open, high, low, close, volume]`.
#[derive(Debug, Clone)]
pub struct JsonCandleFile {
    path: PathBuf,
}

/// A source must deliver at least this share of the requested rows.
const MIN_FILL_RATIO: f64 = 0.9;

#[derive(Deserialize)]
#[serde(untagged)]
enum CandleRow {
    Object(Candle),
    Kline(i64, f64, f64, f64, f64, f64),
}

impl CandleRow {
    fn into_candle(self) -> Result<Candle> {
        match self {
            CandleRow::Object(candle) => Ok(candle),
            CandleRow::Kline(ts_ms, open, high, low, close, volume) => {
                let timestamp = DateTime::from_timestamp_millis(ts_ms)
                    .ok_or_else(|| Error::Source(format!("timestamp {ts_ms} out of range")))?;
                Ok(Candle::new(timestamp, open, high, low, close, volume))
            }
        }
    }
}

impl JsonCandleFile {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }

    /// Parse a JSON candle array.
    pub fn parse(json: &str) -> Result<Vec<Candle>> {
        let rows: Vec<CandleRow> = serde_json::from_str(json)?;
        rows.into_iter().map(CandleRow::into_candle).collect()
    }
}

impl CandleSource for JsonCandleFile {
    fn fetch(&self, pair: &str, timeframe: Timeframe, limit: usize) -> Result<Vec<Candle>> {
        debug!(path = %self.path.display(), pair, %timeframe, limit, "Reading candle file");
        let content = std::fs::read_to_string(&self.path)?;
        let mut candles = Self::parse(&content)?;

        if (candles.len() as f64) < limit as f64 * MIN_FILL_RATIO {
            return Err(Error::Source(format!(
                "insufficient candles for {pair} {timeframe}: expected ~{limit}, got {}",
                candles.len()
            )));
        }

        if candles.len() > limit {
            let excess = candles.len() - limit;
            candles.drain(..excess);
        }

        info!(pair, %timeframe, rows = candles.len(), "Candle window loaded");
        Ok(candles)
    }
}
