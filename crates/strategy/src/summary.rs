use serde::Serialize;

use crate::conditions::IndicatorReading;
use crate::error::Result;
use crate::pipeline::EnrichedCandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Trend {
    Above,
    Below,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RsiZone {
    /// Below 30.
    Oversold,
    /// 30 to 50 inclusive.
    NeutralBearish,
    /// Above 50 up to 70 inclusive.
    NeutralBullish,
    /// Above 70.
    Overbought,
}

impl RsiZone {
    pub fn classify(rsi: f64) -> Self {
        if rsi < 30.0 {
            RsiZone::Oversold
        } else if rsi > 70.0 {
            RsiZone::Overbought
        } else if rsi <= 50.0 {
            RsiZone::NeutralBearish
        } else {
            RsiZone::NeutralBullish
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Momentum {
    Positive,
    Negative,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VolumeStatus {
    High,
    Low,
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Trend::Above => write!(f, "ABOVE"),
            Trend::Below => write!(f, "BELOW"),
        }
    }
}

impl std::fmt::Display for RsiZone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RsiZone::Oversold => write!(f, "OVERSOLD"),
            RsiZone::NeutralBearish => write!(f, "NEUTRAL_BEARISH"),
            RsiZone::NeutralBullish => write!(f, "NEUTRAL_BULLISH"),
            RsiZone::Overbought => write!(f, "OVERBOUGHT"),
        }
    }
}

impl std::fmt::Display for Momentum {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Momentum::Positive => write!(f, "POSITIVE"),
            Momentum::Negative => write!(f, "NEGATIVE"),
        }
    }
}

impl std::fmt::Display for VolumeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VolumeStatus::High => write!(f, "HIGH"),
            VolumeStatus::Low => write!(f, "LOW"),
        }
    }
}

/// Descriptive view of the latest candle. Never feeds signal decisions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MarketSnapshot {
    pub trend: Trend,
    pub rsi_zone: RsiZone,
    pub rsi: f64,
    pub momentum: Momentum,
    pub macd_histogram: f64,
    pub volume_status: VolumeStatus,
    pub volume_ratio: f64,
    pub close: f64,
    pub ema: f64,
}

pub fn summarize(candle: &EnrichedCandle) -> Result<MarketSnapshot> {
    let r = IndicatorReading::from_candle(candle)?;
    // A window of zero-volume candles has no meaningful ratio; report it as low.
    let volume_ratio = if r.volume_avg > 0.0 { r.volume / r.volume_avg } else { 0.0 };

    Ok(MarketSnapshot {
        trend: if r.close > r.ema { Trend::Above } else { Trend::Below },
        rsi_zone: RsiZone::classify(r.rsi),
        rsi: r.rsi,
        momentum: if r.macd_histogram > 0.0 { Momentum::Positive } else { Momentum::Negative },
        macd_histogram: r.macd_histogram,
        volume_status: if volume_ratio > 1.0 { VolumeStatus::High } else { VolumeStatus::Low },
        volume_ratio,
        close: r.close,
        ema: r.ema,
    })
}
