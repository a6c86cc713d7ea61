//! Uniformity of q-values across many samples.

use crate::special::{chi_square, igamc};

/// Scores at or above this value count as uniformly distributed.
pub const ACCEPTANCE_THRESHOLD: f64 = 0.0001;

/// Chi-square test of q-values against the uniform distribution on [0,1].
#[derive(Debug, Clone, Copy)]
pub struct QValueScorer {
    intervals: usize,
}

impl Default for QValueScorer {
    fn default() -> Self {
        Self { intervals: 10 }
    }
}

impl QValueScorer {
    /// Panics on fewer than two intervals: the chi-square would have no
    /// degrees of freedom.
    pub fn new(intervals: usize) -> Self {
        assert!(intervals >= 2, "uniformity needs at least two intervals");
        Self { intervals }
    }

    pub fn intervals(&self) -> usize {
        self.intervals
    }

    /// Interval index of `q`; exactly 1.0 falls into the last interval.
    fn interval(&self, q: f64) -> usize {
        ((q * self.intervals as f64) as usize).min(self.intervals - 1)
    }

    /// P-value of the uniformity chi-square, or `None` for an empty collection.
    pub fn score(&self, q_values: &[f64]) -> Option<f64> {
        if q_values.is_empty() {
            return None;
        }
        let mut counts = vec![0u64; self.intervals];
        for &q in q_values {
            counts[self.interval(q.clamp(0.0, 1.0))] += 1;
        }
        let share = 1.0 / self.intervals as f64;
        let probabilities = vec![share; self.intervals];
        let chi2 = chi_square(&counts, &probabilities, q_values.len() as f64);
        Some(igamc((self.intervals - 1) as f64 / 2.0, chi2 / 2.0))
    }

    pub fn is_acceptable(score: f64) -> bool {
        score >= ACCEPTANCE_THRESHOLD
    }
}
