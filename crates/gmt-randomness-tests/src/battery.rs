//! Test registries for the supported sequence lengths.
//!
//! A [`Battery`] is built explicitly for one length and owns its units; there
//! is no global registry. Identifiers are stable strings shared with the CLI.

use log::warn;

use crate::error::{Error, Result};
use crate::unit::TestUnit;

/// Sequence lengths with a published parameter set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SequenceLength {
    Bits20000,
    Bits1000000,
}

impl SequenceLength {
    pub const ALL: [SequenceLength; 2] = [SequenceLength::Bits20000, SequenceLength::Bits1000000];

    pub fn bits(self) -> usize {
        match self {
            SequenceLength::Bits20000 => 20_000,
            SequenceLength::Bits1000000 => 1_000_000,
        }
    }
}

impl TryFrom<usize> for SequenceLength {
    type Error = Error;

    fn try_from(bits: usize) -> Result<Self> {
        match bits {
            20_000 => Ok(SequenceLength::Bits20000),
            1_000_000 => Ok(SequenceLength::Bits1000000),
            other => Err(Error::UnsupportedLength(other)),
        }
    }
}

/// Ordered mapping of test identifier to configured unit.
#[derive(Debug, Clone)]
pub struct Battery {
    len: usize,
    entries: Vec<(String, TestUnit)>,
}

impl Battery {
    /// Battery for a supported length; anything else is [`Error::UnsupportedLength`].
    pub fn for_length(bits: usize) -> Result<Self> {
        Self::build(SequenceLength::try_from(bits)?)
    }

    pub fn build(length: SequenceLength) -> Result<Self> {
        let n = length.bits();
        let mut battery = Battery {
            len: n,
            entries: Vec::new(),
        };
        let block_size = match length {
            SequenceLength::Bits20000 => 1000,
            SequenceLength::Bits1000000 => 10_000,
        };

        battery.push("monobit", TestUnit::monobit(n)?);
        battery.push(
            "frequency_within_block",
            TestUnit::frequency_within_block(n, block_size)?,
        );
        battery.push("poker_4", TestUnit::poker(n, 4)?);
        battery.push("poker_8", TestUnit::poker(n, 8)?);
        battery.push("serial_3", TestUnit::serial(n, 3)?);
        battery.push("serial_5", TestUnit::serial(n, 5)?);
        battery.push("runs", TestUnit::runs(n)?);
        battery.push("runs_distribution", TestUnit::runs_distribution(n)?);
        battery.push(
            "longest_runs_in_a_block",
            TestUnit::longest_runs_in_a_block(n)?,
        );
        battery.push("binary_derivative_3", TestUnit::binary_derivative(n, 3)?);
        battery.push("binary_derivative_7", TestUnit::binary_derivative(n, 7)?);
        if length == SequenceLength::Bits1000000 {
            battery.push("autocorrelation_1", TestUnit::autocorrelation(n, 1)?);
        }
        for shift in [2, 8, 16] {
            battery.push(
                &format!("autocorrelation_{shift}"),
                TestUnit::autocorrelation(n, shift)?,
            );
        }
        battery.push("cumulative_sums", TestUnit::cumulative_sums(n)?);
        battery.push("approximate_entropy_2", TestUnit::approximate_entropy(n, 2)?);
        battery.push("approximate_entropy_5", TestUnit::approximate_entropy(n, 5)?);
        battery.push(
            "discrete_fourier_transform",
            TestUnit::discrete_fourier_transform(n)?,
        );
        if length == SequenceLength::Bits1000000 {
            battery.push("linear_complexity_500", TestUnit::linear_complexity(n, 500)?);
            battery.push("linear_complexity_1000", TestUnit::linear_complexity(n, 1000)?);
            battery.push("maurers_universal", TestUnit::maurers_universal(n)?);
            battery.push("binary_matrix", TestUnit::binary_matrix_rank(n)?);
        }
        Ok(battery)
    }

    fn push(&mut self, id: &str, unit: TestUnit) {
        self.entries.push((id.to_string(), unit));
    }

    /// Sequence length every unit in this battery expects.
    pub fn sequence_len(&self) -> usize {
        self.len
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &str) -> Result<&TestUnit> {
        self.entries
            .iter()
            .find(|(entry_id, _)| entry_id == id)
            .map(|(_, unit)| unit)
            .ok_or_else(|| Error::UnknownTest(id.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TestUnit)> {
        self.entries.iter().map(|(id, unit)| (id.as_str(), unit))
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(id, _)| id.as_str())
    }

    /// Sub-battery with the named tests in the requested order.
    ///
    /// Unknown identifiers are returned alongside rather than aborting the
    /// selection, so a run can proceed with the tests that do exist.
    pub fn select<S: AsRef<str>>(&self, ids: &[S]) -> (Battery, Vec<Error>) {
        let mut selected = Battery {
            len: self.len,
            entries: Vec::with_capacity(ids.len()),
        };
        let mut unknown = Vec::new();
        for id in ids {
            let id = id.as_ref();
            match self.get(id) {
                Ok(unit) => selected.push(id, unit.clone()),
                Err(e) => {
                    warn!("{e}");
                    unknown.push(e);
                }
            }
        }
        (selected, unknown)
    }

    /// Apply one significance level to every unit.
    pub fn with_significance(mut self, significance: f64) -> Self {
        self.entries = self
            .entries
            .into_iter()
            .map(|(id, unit)| (id, unit.with_significance(significance)))
            .collect();
        self
    }
}
