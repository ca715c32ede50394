use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, Result};

/// Rows appended to the longest indicator window so the tail of an enriched
/// series holds settled values rather than freshly seeded ones.
pub const STABILIZATION_MARGIN: usize = 10;

/// Indicator config file (TOML).
///
/// Example `config/indicators.toml`:
/// ```toml
/// [indicators]
/// ema_period = 21
/// rsi_period = 14
/// macd_fast = 12
/// macd_slow = 26
/// macd_signal = 9
/// volume_avg_period = 20
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct IndicatorFileConfig {
    #[serde(default)]
    pub indicators: IndicatorParams,
}

impl IndicatorFileConfig {
    /// Load and validate the indicator table from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> common::Result<IndicatorParams> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            common::Error::Config(format!(
                "failed to read indicator config at '{}': {e}",
                path.display()
            ))
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> common::Result<IndicatorParams> {
        let file: IndicatorFileConfig = toml::from_str(content)
            .map_err(|e| common::Error::Config(format!("failed to parse indicator config: {e}")))?;
        file.indicators
            .validate()
            .map_err(|e| common::Error::Config(e.to_string()))?;
        Ok(file.indicators)
    }
}

/// Window lengths for every indicator the pipeline computes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct IndicatorParams {
    pub ema_period: usize,
    pub rsi_period: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub volume_avg_period: usize,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            ema_period: 21,
            rsi_period: 14,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            volume_avg_period: 20,
        }
    }
}

impl IndicatorParams {
    /// Every period must be positive, the fast MACD leg shorter than the slow
    /// one, and the combined warm-up must fit in a `usize`.
    pub fn validate(&self) -> Result<()> {
        let periods = [
            ("ema_period", self.ema_period),
            ("rsi_period", self.rsi_period),
            ("macd_fast", self.macd_fast),
            ("macd_slow", self.macd_slow),
            ("macd_signal", self.macd_signal),
            ("volume_avg_period", self.volume_avg_period),
        ];
        if let Some((name, _)) = periods.iter().find(|(_, p)| *p == 0) {
            return Err(AnalysisError::InvalidParams(format!("{name} must be greater than zero")));
        }
        if self.macd_fast >= self.macd_slow {
            return Err(AnalysisError::InvalidParams(format!(
                "macd_fast ({}) must be less than macd_slow ({})",
                self.macd_fast, self.macd_slow
            )));
        }
        self.macd_slow
            .checked_add(self.macd_signal)
            .and_then(|warm_up| warm_up.checked_add(STABILIZATION_MARGIN))
            .ok_or_else(|| {
                AnalysisError::InvalidParams(format!(
                    "macd_slow ({}) + macd_signal ({}) overflows the candle window",
                    self.macd_slow, self.macd_signal
                ))
            })?;
        Ok(())
    }

    /// Longest lookback any indicator needs before it is defined.
    pub fn max_period(&self) -> usize {
        self.ema_period
            .max(self.rsi_period)
            .max(self.macd_slow.saturating_add(self.macd_signal))
            .max(self.volume_avg_period)
    }

    /// Shortest series the pipeline accepts.
    pub fn min_candles(&self) -> usize {
        self.max_period().saturating_add(STABILIZATION_MARGIN)
    }
}
