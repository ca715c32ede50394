use super::ema::Ema;

/// MACD (Moving Average Convergence/Divergence) indicator.
///
/// Computes: MACD line = EMA(fast) − EMA(slow), Signal = EMA(macd_line, signal_period),
/// Histogram = line − signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Macd {
    pub fast: usize,
    pub slow: usize,
    pub signal: usize,
}

/// The three MACD outputs, index-aligned with the input closes.
#[derive(Debug, Clone, PartialEq)]
pub struct MacdSeries {
    pub line: Vec<Option<f64>>,
    pub signal: Vec<Option<f64>>,
    pub histogram: Vec<Option<f64>>,
}

impl Macd {
    pub fn new(fast: usize, slow: usize, signal: usize) -> Self {
        Self { fast, slow, signal }
    }

    /// Compute all three MACD outputs from close prices (oldest first).
    ///
    /// The line is defined from index `slow - 1`, the signal and histogram
    /// from index `slow + signal - 2`.
    pub fn compute(&self, closes: &[f64]) -> MacdSeries {
        let fast = Ema::new(self.fast).compute(closes);
        let slow = Ema::new(self.slow).compute(closes);

        let line: Vec<Option<f64>> = fast
            .iter()
            .zip(&slow)
            .map(|(f, s)| Some((*f)? - (*s)?))
            .collect();

        let signal = Ema::new(self.signal).compute_sparse(&line);

        let histogram = line
            .iter()
            .zip(&signal)
            .map(|(l, s)| Some((*l)? - (*s)?))
            .collect();

        MacdSeries { line, signal, histogram }
    }
}
