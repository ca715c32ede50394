pub mod conditions;
pub mod config;
pub mod diagnostics;
pub mod engine;
pub mod error;
pub mod indicators;
pub mod pipeline;
pub mod series;
pub mod summary;
pub mod transition;

pub use conditions::{evaluate, Condition, ConditionSet, IndicatorReading, Polarity};
pub use config::{IndicatorFileConfig, IndicatorParams};
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
pub use engine::{Analysis, SignalEngine};
pub use error::{AnalysisError, Result, Severity};
pub use pipeline::{enrich, EnrichedCandle, EnrichedSeries};
pub use series::CandleSeries;
pub use summary::{summarize, MarketSnapshot, Momentum, RsiZone, Trend, VolumeStatus};
pub use transition::{detect, resolve, EntryState, PolarityTransition, SignalEvent, SignalKind};

/// A signal strategy evaluated once per closed candle window.
pub trait Strategy: Send + Sync {
    /// Human-readable name of this strategy instance.
    fn name(&self) -> &str;

    /// Analyse the window and decide the signal for its latest candle.
    ///
    /// Each call is independent; the caller keeps the trailing candles
    /// between cycles.
    fn analyze(&self, series: &CandleSeries) -> Result<Analysis>;
}
