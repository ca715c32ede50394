use std::fmt;

use serde::Serialize;
use tracing::info;

use crate::config::IndicatorParams;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::error::{AnalysisError, Result};
use crate::pipeline::enrich;
use crate::series::CandleSeries;
use crate::summary::{summarize, MarketSnapshot};
use crate::transition::{detect, SignalEvent, SignalKind};
use crate::Strategy;

/// Result of one evaluation cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    pub event: SignalEvent,
    pub snapshot: MarketSnapshot,
    pub diagnostics: Vec<Diagnostic>,
}

/// Runs the indicator pipeline, transition detector and summarizer over a
/// candle window.
#[derive(Debug, Clone)]
pub struct SignalEngine {
    params: IndicatorParams,
}

impl SignalEngine {
    pub fn new(params: IndicatorParams) -> Result<Self> {
        params.validate()?;
        info!(
            ema = params.ema_period,
            rsi = params.rsi_period,
            macd_fast = params.macd_fast,
            macd_slow = params.macd_slow,
            macd_signal = params.macd_signal,
            volume_avg = params.volume_avg_period,
            "Signal engine initialised"
        );
        Ok(Self { params })
    }
}

impl Strategy for SignalEngine {
    fn name(&self) -> &str {
        "ema-rsi-macd-volume"
    }

    fn analyze(&self, series: &CandleSeries) -> Result<Analysis> {
        let mut diagnostics = Diagnostics::new();

        let enriched = enrich(series, &self.params, &mut diagnostics)?;
        let (previous, current) = enriched.latest_pair().ok_or(AnalysisError::InsufficientData {
            required: 2,
            available: enriched.len(),
        })?;

        let event = detect(previous, current, &mut diagnostics)?;
        let snapshot = summarize(current)?;

        info!(
            signal = %event.kind,
            close = snapshot.close,
            rsi = snapshot.rsi,
            diagnostics = diagnostics.len(),
            "Evaluation cycle complete"
        );

        Ok(Analysis { event, snapshot, diagnostics: diagnostics.into_vec() })
    }
}

impl fmt::Display for Analysis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = &self.snapshot;
        match self.event.kind {
            SignalKind::Bullish => {
                writeln!(f, "🟢 BULLISH SIGNAL DETECTED:")?;
                writeln!(f, "• Price ${:.2} moved ABOVE EMA ${:.2}", s.close, s.ema)?;
            }
            SignalKind::Bearish => {
                writeln!(f, "🔴 BEARISH SIGNAL DETECTED:")?;
                writeln!(f, "• Price ${:.2} moved BELOW EMA ${:.2}", s.close, s.ema)?;
            }
            SignalKind::None => {
                writeln!(f, "⚪ NO SIGNAL:")?;
                writeln!(f, "• Price ${:.2} vs EMA ${:.2} ({})", s.close, s.ema, s.trend)?;
            }
        }
        writeln!(f, "• RSI {:.1} in zone {}", s.rsi, s.rsi_zone)?;
        writeln!(f, "• MACD histogram {} ({:+.4})", s.momentum, s.macd_histogram)?;
        write!(f, "• Volume {} (ratio: {:.2}x)", s.volume_status, s.volume_ratio)?;
        if self.event.kind == SignalKind::None {
            write!(f, "\n• No entry transition on the current candle")?;
        }
        for d in &self.diagnostics {
            write!(f, "\n⚠️ {}", d.message)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeDelta};
    use common::{Candle, Timeframe};

    use crate::summary::VolumeStatus;

    fn series(n: usize) -> CandleSeries {
        let start = DateTime::from_timestamp(1_704_067_200, 0).unwrap();
        let candles = (0..n)
            .map(|i| {
                let close = 100.0 + (i as f64 * 0.5).sin() * 3.0;
                Candle::new(
                    start + TimeDelta::hours(2 * i as i64),
                    close,
                    close * 1.002,
                    close * 0.998,
                    close,
                    500.0 + (i % 5) as f64 * 40.0,
                )
            })
            .collect();
        CandleSeries::new(candles, Timeframe::Hour2).unwrap()
    }

    #[test]
    fn new_rejects_invalid_params() {
        let params = IndicatorParams { volume_avg_period: 0, ..Default::default() };
        assert!(SignalEngine::new(params).is_err());
    }

    #[test]
    fn analysis_targets_latest_candle() {
        let engine = SignalEngine::new(IndicatorParams::default()).unwrap();
        let series = series(60);
        let analysis = engine.analyze(&series).unwrap();
        assert_eq!(analysis.event.timestamp, series.candles()[59].timestamp);
        assert_eq!(analysis.snapshot.close, series.candles()[59].close);
    }

    #[test]
    fn insufficient_window_aborts_cycle() {
        let engine = SignalEngine::new(IndicatorParams::default()).unwrap();
        let err = engine.analyze(&series(40)).unwrap_err();
        assert_eq!(err, AnalysisError::InsufficientData { required: 45, available: 40 });
    }

    #[test]
    fn report_mentions_zone_and_volume() {
        let engine = SignalEngine::new(IndicatorParams::default()).unwrap();
        let analysis = engine.analyze(&series(60)).unwrap();
        let text = analysis.to_string();
        assert!(text.contains(&analysis.snapshot.rsi_zone.to_string()));
        assert!(text.contains("Volume"));
    }

    #[test]
    fn report_headline_follows_signal_kind() {
        let engine = SignalEngine::new(IndicatorParams::default()).unwrap();
        let mut analysis = engine.analyze(&series(60)).unwrap();

        analysis.event.kind = SignalKind::Bullish;
        let text = analysis.to_string();
        assert!(text.starts_with("🟢 BULLISH SIGNAL DETECTED:"));
        assert!(text.contains("moved ABOVE EMA"));
        assert!(!text.contains("No entry transition"));

        analysis.event.kind = SignalKind::Bearish;
        let text = analysis.to_string();
        assert!(text.starts_with("🔴 BEARISH SIGNAL DETECTED:"));
        assert!(text.contains("moved BELOW EMA"));

        analysis.event.kind = SignalKind::None;
        assert!(analysis.to_string().starts_with("⚪ NO SIGNAL:"));
    }

    #[test]
    fn zero_volume_window_reports_finite_ratio() {
        let start = DateTime::from_timestamp(1_704_067_200, 0).unwrap();
        let candles = (0..60)
            .map(|i| Candle::new(start + TimeDelta::hours(2 * i), 100.0, 100.0, 100.0, 100.0, 0.0))
            .collect();
        let series = CandleSeries::new(candles, Timeframe::Hour2).unwrap();

        let engine = SignalEngine::new(IndicatorParams::default()).unwrap();
        let analysis = engine.analyze(&series).unwrap();
        assert_eq!(analysis.snapshot.volume_ratio, 0.0);
        assert_eq!(analysis.snapshot.volume_status, VolumeStatus::Low);

        let json = serde_json::to_value(&analysis).unwrap();
        assert_eq!(json["snapshot"]["volume_ratio"], 0.0);
    }
}
