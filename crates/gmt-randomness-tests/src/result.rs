use serde::Serialize;

/// One p-value together with the q-value derived from the same statistic.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Statistic {
    pub score: f64,
    pub q_value: f64,
}

impl Statistic {
    /// A chi-square style statistic whose q-value is the p-value itself.
    pub fn one_sided(score: f64) -> Self {
        Self {
            score,
            q_value: score,
        }
    }

    /// A two-sided normal statistic: `(p, q)` as returned by
    /// [`crate::special::normal_two_sided`].
    pub fn two_sided((score, q_value): (f64, f64)) -> Self {
        Self { score, q_value }
    }
}

/// Outcome of a single test execution.
///
/// `scores` and `q_values` are parallel and hold one or two entries.
#[derive(Debug, Clone, Serialize)]
pub struct TestResult {
    pub name: String,
    pub passed: bool,
    pub scores: Vec<f64>,
    pub q_values: Vec<f64>,
    pub details: String,
    pub elapsed_us: u64,
}

impl TestResult {
    pub(crate) fn new(
        name: &str,
        significance: f64,
        statistics: &[Statistic],
        details: String,
    ) -> Self {
        assert!(!statistics.is_empty(), "{name} produced no statistics");
        let scores: Vec<f64> = statistics.iter().map(|s| s.score).collect();
        let q_values = statistics.iter().map(|s| s.q_value).collect();
        Self {
            name: name.to_string(),
            passed: Self::pass_from_scores(&scores, significance),
            scores,
            q_values,
            details,
            elapsed_us: 0,
        }
    }

    /// Every score must clear the threshold.
    pub fn pass_from_scores(scores: &[f64], significance: f64) -> bool {
        scores.iter().all(|&p| p >= significance)
    }

    /// Number of parallel (score, q-value) pairs.
    pub fn arity(&self) -> usize {
        self.scores.len()
    }
}
