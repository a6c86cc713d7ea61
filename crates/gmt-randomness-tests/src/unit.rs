//! A configured test bound to one sequence length.
//!
//! [`TestUnit`] is what the battery stores and the runner executes. It owns
//! the significance level, checks that an incoming sequence matches the
//! configured length and runs the algorithm-specific precondition before
//! dispatching to the algorithm.

use std::time::Instant;

use log::debug;

use crate::algorithms::{
    ApproximateEntropy, Autocorrelation, BinaryDerivative, BinaryMatrixRank, CumulativeSums,
    DiscreteFourierTransform, Evaluation, FrequencyWithinBlock, LinearComplexity,
    LongestRunsInABlock, MaurersUniversal, Monobit, Poker, Runs, RunsDistribution, Serial,
};
use crate::bits::BitSequence;
use crate::error::{Error, Result};
use crate::result::TestResult;

/// Canonical pass/fail threshold on a p-value.
pub const DEFAULT_SIGNIFICANCE: f64 = 0.01;

/// The closed set of algorithms, each with its configured payload.
#[derive(Debug, Clone)]
pub enum Algorithm {
    Monobit(Monobit),
    FrequencyWithinBlock(FrequencyWithinBlock),
    Poker(Poker),
    Serial(Serial),
    Runs(Runs),
    RunsDistribution(RunsDistribution),
    LongestRunsInABlock(LongestRunsInABlock),
    BinaryDerivative(BinaryDerivative),
    Autocorrelation(Autocorrelation),
    CumulativeSums(CumulativeSums),
    ApproximateEntropy(ApproximateEntropy),
    DiscreteFourierTransform(DiscreteFourierTransform),
    MaurersUniversal(MaurersUniversal),
    LinearComplexity(LinearComplexity),
    BinaryMatrixRank(BinaryMatrixRank),
}

macro_rules! dispatch {
    ($algorithm:expr, $test:ident => $body:expr) => {
        match $algorithm {
            Algorithm::Monobit($test) => $body,
            Algorithm::FrequencyWithinBlock($test) => $body,
            Algorithm::Poker($test) => $body,
            Algorithm::Serial($test) => $body,
            Algorithm::Runs($test) => $body,
            Algorithm::RunsDistribution($test) => $body,
            Algorithm::LongestRunsInABlock($test) => $body,
            Algorithm::BinaryDerivative($test) => $body,
            Algorithm::Autocorrelation($test) => $body,
            Algorithm::CumulativeSums($test) => $body,
            Algorithm::ApproximateEntropy($test) => $body,
            Algorithm::DiscreteFourierTransform($test) => $body,
            Algorithm::MaurersUniversal($test) => $body,
            Algorithm::LinearComplexity($test) => $body,
            Algorithm::BinaryMatrixRank($test) => $body,
        }
    };
}

impl Algorithm {
    pub fn display_name(&self) -> String {
        dispatch!(self, test => test.display_name())
    }

    fn evaluate(&self, bits: &[u8]) -> Evaluation {
        dispatch!(self, test => test.evaluate(bits))
    }

    /// Test-specific eligibility beyond the length check.
    fn precondition(&self, bits: &[u8]) -> std::result::Result<(), String> {
        match self {
            Algorithm::Runs(test) => test.precondition(bits),
            _ => Ok(()),
        }
    }
}

/// One test configured for one sequence length.
#[derive(Debug, Clone)]
pub struct TestUnit {
    name: String,
    len: usize,
    significance: f64,
    algorithm: Algorithm,
}

impl TestUnit {
    fn configured(len: usize, algorithm: Algorithm) -> Self {
        let name = algorithm.display_name();
        debug!("configured {name} for {len}-bit sequences");
        Self {
            name,
            len,
            significance: DEFAULT_SIGNIFICANCE,
            algorithm,
        }
    }

    pub fn monobit(len: usize) -> Result<Self> {
        Ok(Self::configured(len, Algorithm::Monobit(Monobit::new(len)?)))
    }

    pub fn frequency_within_block(len: usize, block_size: usize) -> Result<Self> {
        let test = FrequencyWithinBlock::new(len, block_size)?;
        Ok(Self::configured(len, Algorithm::FrequencyWithinBlock(test)))
    }

    pub fn poker(len: usize, pattern_len: usize) -> Result<Self> {
        Ok(Self::configured(len, Algorithm::Poker(Poker::new(len, pattern_len)?)))
    }

    pub fn serial(len: usize, pattern_len: usize) -> Result<Self> {
        Ok(Self::configured(len, Algorithm::Serial(Serial::new(len, pattern_len)?)))
    }

    pub fn runs(len: usize) -> Result<Self> {
        Ok(Self::configured(len, Algorithm::Runs(Runs::new(len)?)))
    }

    pub fn runs_distribution(len: usize) -> Result<Self> {
        let test = RunsDistribution::new(len)?;
        Ok(Self::configured(len, Algorithm::RunsDistribution(test)))
    }

    pub fn longest_runs_in_a_block(len: usize) -> Result<Self> {
        let test = LongestRunsInABlock::new(len)?;
        Ok(Self::configured(len, Algorithm::LongestRunsInABlock(test)))
    }

    pub fn binary_derivative(len: usize, order: usize) -> Result<Self> {
        let test = BinaryDerivative::new(len, order)?;
        Ok(Self::configured(len, Algorithm::BinaryDerivative(test)))
    }

    pub fn autocorrelation(len: usize, shift: usize) -> Result<Self> {
        let test = Autocorrelation::new(len, shift)?;
        Ok(Self::configured(len, Algorithm::Autocorrelation(test)))
    }

    pub fn cumulative_sums(len: usize) -> Result<Self> {
        let test = CumulativeSums::new(len)?;
        Ok(Self::configured(len, Algorithm::CumulativeSums(test)))
    }

    pub fn approximate_entropy(len: usize, pattern_len: usize) -> Result<Self> {
        let test = ApproximateEntropy::new(len, pattern_len)?;
        Ok(Self::configured(len, Algorithm::ApproximateEntropy(test)))
    }

    pub fn discrete_fourier_transform(len: usize) -> Result<Self> {
        let test = DiscreteFourierTransform::new(len)?;
        Ok(Self::configured(len, Algorithm::DiscreteFourierTransform(test)))
    }

    /// Maurer's universal test with L = 7, Q = 1280.
    pub fn maurers_universal(len: usize) -> Result<Self> {
        Self::maurers_universal_with(
            len,
            MaurersUniversal::DEFAULT_BLOCK_LEN,
            MaurersUniversal::DEFAULT_INIT_BLOCKS,
        )
    }

    pub fn maurers_universal_with(
        len: usize,
        block_len: usize,
        init_blocks: usize,
    ) -> Result<Self> {
        let test = MaurersUniversal::new(len, block_len, init_blocks)?;
        Ok(Self::configured(len, Algorithm::MaurersUniversal(test)))
    }

    pub fn linear_complexity(len: usize, block_len: usize) -> Result<Self> {
        let test = LinearComplexity::new(len, block_len)?;
        Ok(Self::configured(len, Algorithm::LinearComplexity(test)))
    }

    pub fn binary_matrix_rank(len: usize) -> Result<Self> {
        let test = BinaryMatrixRank::new(len)?;
        Ok(Self::configured(len, Algorithm::BinaryMatrixRank(test)))
    }

    /// Replace the pass/fail threshold (0.01 by default).
    pub fn with_significance(mut self, significance: f64) -> Self {
        self.significance = significance;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sequence length this unit was configured for.
    pub fn sequence_len(&self) -> usize {
        self.len
    }

    pub fn significance(&self) -> f64 {
        self.significance
    }

    pub fn algorithm(&self) -> &Algorithm {
        &self.algorithm
    }

    /// Length match plus the algorithm's own precondition, as an error value.
    pub fn check_eligibility(&self, sequence: &BitSequence) -> Result<()> {
        if sequence.len() != self.len {
            return Err(Error::ineligible(
                &self.name,
                format!("expected {} bits, got {}", self.len, sequence.len()),
            ));
        }
        self.algorithm
            .precondition(sequence.as_slice())
            .map_err(|reason| Error::ineligible(&self.name, reason))
    }

    pub fn is_eligible(&self, sequence: &BitSequence) -> bool {
        self.check_eligibility(sequence).is_ok()
    }

    /// Run the test. Ineligible sequences fail with [`Error::IneligibleInput`].
    pub fn execute(&self, sequence: &BitSequence) -> Result<TestResult> {
        self.check_eligibility(sequence)?;
        let start = Instant::now();
        let evaluation = self.algorithm.evaluate(sequence.as_slice());
        let mut result = TestResult::new(
            &self.name,
            self.significance,
            &evaluation.statistics,
            evaluation.details,
        );
        result.elapsed_us = start.elapsed().as_micros() as u64;
        debug!(
            "{}: passed={} scores={:?} ({} us)",
            self.name, result.passed, result.scores, result.elapsed_us
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::pseudo_random_bits;

    const FIXTURE_128: &str = "11001100000101010110110001001100111000000000001001001101010100010001001111010110100000001101011111001100111001101101100010110010";

    #[test]
    fn test_monobit_golden_score() {
        let seq = BitSequence::from_ascii(FIXTURE_128).unwrap();
        let result = TestUnit::monobit(seq.len()).unwrap().execute(&seq).unwrap();
        assert_eq!(result.name, "Monobit");
        assert!((result.scores[0] - MONOBIT_GOLDEN).abs() < 1e-6);
        assert!(result.passed);
    }

    // 57 ones in 128 bits: S = -14, p = erfc(14 / √256)
    const MONOBIT_GOLDEN: f64 = 0.215924939;

    #[test]
    fn test_length_mismatch_is_ineligible() {
        let unit = TestUnit::monobit(200).unwrap();
        let seq = BitSequence::from_ascii(FIXTURE_128).unwrap();
        assert!(!unit.is_eligible(&seq));
        let err = unit.execute(&seq).unwrap_err();
        assert!(err.is_ineligible());
    }

    #[test]
    fn test_runs_precondition_skips_biased_input() {
        let bits: Vec<u8> = (0..1000).map(|i| u8::from(i % 4 != 0)).collect();
        let seq = BitSequence::from_bits(bits).unwrap();
        let unit = TestUnit::runs(1000).unwrap();
        assert!(!unit.is_eligible(&seq));
        assert!(matches!(
            unit.execute(&seq),
            Err(Error::IneligibleInput { .. })
        ));
    }

    #[test]
    fn test_with_significance_changes_verdict() {
        let seq = BitSequence::from_ascii(FIXTURE_128).unwrap();
        let strict = TestUnit::monobit(seq.len())
            .unwrap()
            .with_significance(0.25);
        assert!(!strict.execute(&seq).unwrap().passed);
    }

    #[test]
    fn test_display_names_carry_parameters() {
        assert_eq!(TestUnit::poker(20000, 4).unwrap().name(), "Poker (m=4)");
        assert_eq!(
            TestUnit::autocorrelation(20000, 8).unwrap().name(),
            "Autocorrelation (d=8)"
        );
    }

    #[test]
    fn test_execute_records_scores_in_range() {
        let seq = BitSequence::from_bits(pseudo_random_bits(20000)).unwrap();
        let units = [
            TestUnit::serial(20000, 3).unwrap(),
            TestUnit::longest_runs_in_a_block(20000).unwrap(),
            TestUnit::cumulative_sums(20000).unwrap(),
            TestUnit::discrete_fourier_transform(20000).unwrap(),
        ];
        for unit in &units {
            let result = unit.execute(&seq).unwrap();
            assert_eq!(result.scores.len(), result.q_values.len());
            for v in result.scores.iter().chain(&result.q_values) {
                assert!((0.0..=1.0).contains(v), "{} out of range", unit.name());
            }
        }
    }
}
