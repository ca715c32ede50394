//! Indicator families computed over a candle window.
//!
//! Every indicator returns one value per input row, `None` during its
//! warm-up period, so outputs line up index-for-index with the candles.

pub mod ema;
pub mod macd;
pub mod rsi;
pub mod volume;

pub use ema::Ema;
pub use macd::{Macd, MacdSeries};
pub use rsi::Rsi;
pub use volume::VolumeAverage;
