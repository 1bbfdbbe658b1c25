//! Mean and population standard deviation

use serde::{Deserialize, Serialize};

/// Arithmetic mean and population standard deviation of a sample.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Arithmetic mean
    pub mean: f64,
    /// Population standard deviation (divisor = sample count)
    pub std: f64,
}

impl Summary {
    /// Summarise `values`, or `None` for an empty sample.
    ///
    /// A constant sample yields its value as mean and a standard deviation
    /// of exactly zero.
    ///
    /// # Example
    ///
    /// ```rust
    /// use sweep_aggregate::aggregate::Summary;
    ///
    /// let s = Summary::of(&[100.0, 90.0]).unwrap();
    /// assert!((s.mean - 95.0).abs() < 1e-12);
    /// assert!((s.std - 5.0).abs() < 1e-12);
    /// ```
    #[must_use]
    #[allow(clippy::cast_precision_loss, clippy::float_cmp)]
    pub fn of(values: &[f64]) -> Option<Self> {
        let (first, rest) = values.split_first()?;
        if rest.iter().all(|v| v == first) {
            return Some(Self {
                mean: *first,
                std: 0.0,
            });
        }

        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        Some(Self {
            mean,
            std: variance.sqrt(),
        })
    }

    /// Summarise run lengths (counts of days).
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn of_lengths(lengths: &[usize]) -> Option<Self> {
        let values: Vec<f64> = lengths.iter().map(|&l| l as f64).collect();
        Self::of(&values)
    }
}
