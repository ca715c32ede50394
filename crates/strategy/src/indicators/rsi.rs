/// RSI (Relative Strength Index) indicator.
///
/// Uses Wilder's smoothed moving average (same as TradingView / standard RSI).
/// The first value is defined once `period` price changes exist, i.e. at
/// index `period` of the close series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rsi {
    pub period: usize,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        Self { period }
    }

    /// RSI at every index of `closes` (oldest first).
    ///
    /// Values are not clamped; callers check the [0, 100] range.
    pub fn compute(&self, closes: &[f64]) -> Vec<Option<f64>> {
        let mut out = vec![None; closes.len()];
        if self.period == 0 || closes.len() < self.period + 1 {
            return out;
        }

        let period = self.period as f64;
        let changes: Vec<f64> = closes.windows(2).map(|w| w[1] - w[0]).collect();

        // First average gain/loss over the initial `period` changes
        let initial = &changes[..self.period];
        let mut avg_gain = initial.iter().filter(|&&c| c > 0.0).sum::<f64>() / period;
        let mut avg_loss =
            initial.iter().filter(|&&c| c < 0.0).map(|c| c.abs()).sum::<f64>() / period;
        out[self.period] = Some(rsi_value(avg_gain, avg_loss));

        // Wilder smoothing over remaining changes
        for (i, &change) in changes.iter().enumerate().skip(self.period) {
            let gain = if change > 0.0 { change } else { 0.0 };
            let loss = if change < 0.0 { change.abs() } else { 0.0 };
            avg_gain = (avg_gain * (period - 1.0) + gain) / period;
            avg_loss = (avg_loss * (period - 1.0) + loss) / period;
            out[i + 1] = Some(rsi_value(avg_gain, avg_loss));
        }
        out
    }
}

fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    100.0 - 100.0 / (1.0 + rs)
}
