//! The fifteen GM/T 0005 statistical tests.
//!
//! Every test is a small configured struct: `new(len, params...)` validates
//! the parameters against the sequence length and precomputes what it can,
//! `evaluate(bits)` produces the statistics. Length checks and preconditions
//! live in [`crate::unit::TestUnit`], so `evaluate` assumes a sequence of the
//! configured length.

mod complexity;
mod cusum;
mod derivative;
mod frequency;
mod matrix;
mod runs;
mod serial;
mod spectral;
mod universal;

pub use complexity::{LinearComplexity, berlekamp_massey};
pub use cusum::CumulativeSums;
pub use derivative::{Autocorrelation, BinaryDerivative};
pub use frequency::{FrequencyWithinBlock, Monobit, Poker};
pub use matrix::BinaryMatrixRank;
pub use runs::{LongestRunsInABlock, Runs, RunsDistribution, run_length_bin};
pub use serial::{ApproximateEntropy, Serial};
pub use spectral::DiscreteFourierTransform;
pub use universal::MaurersUniversal;

use crate::result::Statistic;

/// Raw output of one algorithm before it is judged against a significance level.
#[derive(Debug, Clone)]
pub(crate) struct Evaluation {
    pub statistics: Vec<Statistic>,
    pub details: String,
}

impl Evaluation {
    pub(crate) fn new(statistics: Vec<Statistic>, details: String) -> Self {
        Self {
            statistics,
            details,
        }
    }
}
