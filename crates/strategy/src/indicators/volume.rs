/// Simple rolling mean of traded volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VolumeAverage {
    pub period: usize,
}

impl VolumeAverage {
    pub fn new(period: usize) -> Self {
        Self { period }
    }

    /// Mean of the `period` trailing volumes at each index, `None` for the
    /// first `period - 1` rows.
    pub fn compute(&self, volumes: &[f64]) -> Vec<Option<f64>> {
        if self.period == 0 {
            return vec![None; volumes.len()];
        }
        (0..volumes.len())
            .map(|i| {
                if i + 1 < self.period {
                    return None;
                }
                let window = &volumes[i + 1 - self.period..=i];
                Some(window.iter().sum::<f64>() / self.period as f64)
            })
            .collect()
    }
}
