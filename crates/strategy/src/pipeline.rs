use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use common::Candle;

use crate::config::{IndicatorParams, STABILIZATION_MARGIN};
use crate::diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
use crate::error::{AnalysisError, Result};
use crate::indicators::{Ema, Macd, Rsi, VolumeAverage};
use crate::series::CandleSeries;

/// A candle together with the indicator values computed at its index.
///
/// An indicator is `None` until enough preceding candles exist to seed it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EnrichedCandle {
    pub candle: Candle,
    pub ema: Option<f64>,
    pub rsi: Option<f64>,
    pub macd: Option<f64>,
    pub macd_signal: Option<f64>,
    pub macd_histogram: Option<f64>,
    pub volume_avg: Option<f64>,
}

impl EnrichedCandle {
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.candle.timestamp
    }

    /// Named indicator fields, in pipeline order.
    pub fn indicator_fields(&self) -> [(&'static str, Option<f64>); 6] {
        [
            ("ema", self.ema),
            ("rsi", self.rsi),
            ("macd", self.macd),
            ("macd_signal", self.macd_signal),
            ("macd_histogram", self.macd_histogram),
            ("volume_avg", self.volume_avg),
        ]
    }
}

/// Output of [`enrich`]: one enriched candle per input candle, same order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedSeries {
    candles: Vec<EnrichedCandle>,
}

impl EnrichedSeries {
    pub fn candles(&self) -> &[EnrichedCandle] {
        &self.candles
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    /// Most recent candle.
    pub fn latest(&self) -> Option<&EnrichedCandle> {
        self.candles.last()
    }

    /// The last two candles as `(previous, current)`.
    pub fn latest_pair(&self) -> Option<(&EnrichedCandle, &EnrichedCandle)> {
        match self.candles.as_slice() {
            [.., previous, current] => Some((previous, current)),
            _ => None,
        }
    }
}

/// Compute every indicator over `series`.
///
/// Pure: the input is not modified and identical inputs give bit-identical
/// output. RSI values outside [0, 100] are reported to `diagnostics` and
/// left as computed.
pub fn enrich(
    series: &CandleSeries,
    params: &IndicatorParams,
    diagnostics: &mut Diagnostics,
) -> Result<EnrichedSeries> {
    params.validate()?;

    let required = params.min_candles();
    if series.len() < required {
        return Err(AnalysisError::InsufficientData { required, available: series.len() });
    }

    let closes = series.closes();
    let volumes = series.volumes();

    debug!(period = params.ema_period, "Computing EMA");
    let ema = Ema::new(params.ema_period).compute(&closes);

    debug!(period = params.rsi_period, "Computing RSI");
    let rsi = Rsi::new(params.rsi_period).compute(&closes);

    debug!(
        fast = params.macd_fast,
        slow = params.macd_slow,
        signal = params.macd_signal,
        "Computing MACD"
    );
    let macd = Macd::new(params.macd_fast, params.macd_slow, params.macd_signal).compute(&closes);

    debug!(period = params.volume_avg_period, "Computing volume average");
    let volume_avg = VolumeAverage::new(params.volume_avg_period).compute(&volumes);

    let candles: Vec<EnrichedCandle> = series
        .candles()
        .iter()
        .enumerate()
        .map(|(i, candle)| EnrichedCandle {
            candle: *candle,
            ema: ema[i],
            rsi: rsi[i],
            macd: macd.line[i],
            macd_signal: macd.signal[i],
            macd_histogram: macd.histogram[i],
            volume_avg: volume_avg[i],
        })
        .collect();

    check_trailing_values(&candles)?;
    check_rsi_range(&candles, diagnostics);

    debug!(rows = candles.len(), "Candle series enriched");
    Ok(EnrichedSeries { candles })
}

/// Every indicator must have a value somewhere in the stabilization tail.
fn check_trailing_values(candles: &[EnrichedCandle]) -> Result<()> {
    let tail = &candles[candles.len().saturating_sub(STABILIZATION_MARGIN)..];
    let Some(first) = tail.first() else {
        return Err(AnalysisError::NullValue("enriched series is empty".into()));
    };

    for (idx, (name, _)) in first.indicator_fields().iter().enumerate() {
        let populated = tail.iter().any(|c| c.indicator_fields()[idx].1.is_some());
        if !populated {
            return Err(AnalysisError::NullValue(format!(
                "indicator '{name}' has no value in the last {} candles",
                tail.len()
            )));
        }
    }
    Ok(())
}

fn check_rsi_range(candles: &[EnrichedCandle], diagnostics: &mut Diagnostics) {
    let (min, max) = candles
        .iter()
        .filter_map(|c| c.rsi)
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));

    if min < 0.0 || max > 100.0 {
        diagnostics.record(Diagnostic::warning(
            DiagnosticKind::RsiOutOfRange,
            format!("RSI outside [0, 100]: min={min:.2}, max={max:.2}"),
        ));
    }
}
