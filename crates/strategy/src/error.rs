use serde::Serialize;
use thiserror::Error;

/// Whether a condition aborts the evaluation cycle or is only reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Fatal,
    Warning,
}

/// Failures that abort an evaluation cycle. No partial output is produced.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    #[error("Malformed candle series: {0}")]
    DataShape(String),

    #[error("Insufficient data: {required} candles required, {available} available")]
    InsufficientData { required: usize, available: usize },

    #[error("Missing value: {0}")]
    NullValue(String),

    #[error("Invalid indicator parameters: {0}")]
    InvalidParams(String),
}

impl AnalysisError {
    pub fn severity(&self) -> Severity {
        Severity::Fatal
    }
}

pub type Result<T, E = AnalysisError> = std::result::Result<T, E>;
