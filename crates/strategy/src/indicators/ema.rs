/// Exponential moving average with smoothing factor `2 / (period + 1)`.
///
/// Seeded with the simple average of the first `period` values, so the first
/// defined output sits at index `period - 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ema {
    pub period: usize,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        Self { period }
    }

    pub fn alpha(&self) -> f64 {
        2.0 / (self.period as f64 + 1.0)
    }

    /// EMA of a fully defined input, oldest first.
    pub fn compute(&self, values: &[f64]) -> Vec<Option<f64>> {
        let mut out = vec![None; values.len()];
        if self.period == 0 || values.len() < self.period {
            return out;
        }

        let alpha = self.alpha();
        let seed = values[..self.period].iter().sum::<f64>() / self.period as f64;
        out[self.period - 1] = Some(seed);

        let mut prev = seed;
        for (i, &value) in values.iter().enumerate().skip(self.period) {
            let next = alpha * value + (1.0 - alpha) * prev;
            out[i] = Some(next);
            prev = next;
        }
        out
    }

    /// EMA of an input that is undefined for a leading warm-up run.
    ///
    /// Smoothing starts at the first defined value and covers the contiguous
    /// defined run after it.
    pub fn compute_sparse(&self, values: &[Option<f64>]) -> Vec<Option<f64>> {
        let mut out = vec![None; values.len()];
        let Some(start) = values.iter().position(Option::is_some) else {
            return out;
        };

        let dense: Vec<f64> = values[start..].iter().map_while(|v| *v).collect();
        for (offset, value) in self.compute(&dense).into_iter().enumerate() {
            out[start + offset] = value;
        }
        out
    }
}
