//! Runs family: total runs, run-length distribution, longest run per block.

use crate::bits::count_ones;
use crate::error::{Error, Result};
use crate::result::Statistic;
use crate::special::{chi_square, igamc, normal_two_sided};

use super::Evaluation;

/// Total number of runs against the count expected for the observed
/// proportion of ones.
#[derive(Debug, Clone)]
pub struct Runs {
    len: usize,
}

impl Runs {
    const MIN_LEN: usize = 100;

    pub fn new(len: usize) -> Result<Self> {
        if len < Self::MIN_LEN {
            return Err(Error::configuration(
                "Runs",
                format!("need at least {} bits, got {len}", Self::MIN_LEN),
            ));
        }
        Ok(Self { len })
    }

    pub fn display_name(&self) -> String {
        "Runs".to_string()
    }

    /// Frequency pre-test: `|π − ½| < 2/√n`.
    pub(crate) fn precondition(&self, bits: &[u8]) -> std::result::Result<(), String> {
        let prop = count_ones(bits) as f64 / self.len as f64;
        let tau = 2.0 / (self.len as f64).sqrt();
        if (prop - 0.5).abs() >= tau {
            return Err(format!("proportion of ones {prop:.4} is outside 0.5 ± {tau:.4}"));
        }
        Ok(())
    }

    pub(crate) fn evaluate(&self, bits: &[u8]) -> Evaluation {
        let n = self.len as f64;
        let prop = count_ones(bits) as f64 / n;
        let runs = 1 + bits.windows(2).filter(|w| w[0] != w[1]).count();
        let spread = prop * (1.0 - prop);
        let z = (runs as f64 - 2.0 * n * spread) / (2.0 * n.sqrt() * spread);
        Evaluation::new(
            vec![Statistic::two_sided(normal_two_sided(z))],
            format!("runs={runs}, expected={:.0}", 2.0 * n * spread),
        )
    }
}

/// Histogram bin for a run of `run_len` bits: lengths beyond `k` share bin `k`.
pub fn run_length_bin(run_len: usize, k: usize) -> usize {
    run_len.min(k)
}

/// Distribution of run lengths for zeroes and ones, capped at length `k`.
#[derive(Debug, Clone)]
pub struct RunsDistribution {
    k: usize,
}

impl RunsDistribution {
    /// Largest `i` with `(n − i + 3) / 2^(i+2) ≥ 5`.
    pub fn max_run_length(len: usize) -> usize {
        let mut k = 0;
        for i in 1..len {
            let expected = (len - i + 3) as f64 / 2f64.powi(i as i32 + 2);
            if expected < 5.0 {
                break;
            }
            k = i;
        }
        k
    }

    pub fn new(len: usize) -> Result<Self> {
        let k = Self::max_run_length(len);
        if k < 2 {
            return Err(Error::configuration(
                "Runs Distribution",
                format!("sequence of {len} bits is too short for two run-length bins"),
            ));
        }
        Ok(Self { k })
    }

    pub fn display_name(&self) -> String {
        "Runs Distribution".to_string()
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub(crate) fn evaluate(&self, bits: &[u8]) -> Evaluation {
        let k = self.k;
        let mut zero_runs = vec![0u64; k + 1];
        let mut one_runs = vec![0u64; k + 1];
        let mut record = |bit: u8, run_len: usize| {
            let bin = run_length_bin(run_len, k);
            if bit == 0 {
                zero_runs[bin] += 1;
            } else {
                one_runs[bin] += 1;
            }
        };
        let mut current = bits[0];
        let mut run_len = 0usize;
        for &bit in bits {
            if bit == current {
                run_len += 1;
            } else {
                record(current, run_len);
                current = bit;
                run_len = 1;
            }
        }
        record(current, run_len);

        let total: u64 = zero_runs.iter().chain(one_runs.iter()).sum();
        // Bin 0 is unused: every run has length at least one.
        let mut probabilities: Vec<f64> = (1..k)
            .map(|i| 1.0 / 2f64.powi(i as i32 + 1))
            .collect();
        probabilities.push(1.0 / 2f64.powi(k as i32));
        let t = total as f64;
        let chi2 = chi_square(&zero_runs[1..], &probabilities, t)
            + chi_square(&one_runs[1..], &probabilities, t);
        let p = igamc((k - 1) as f64, chi2 / 2.0);
        Evaluation::new(
            vec![Statistic::one_sided(p)],
            format!("chi2={chi2:.4}, runs={total}, k={k}"),
        )
    }
}

/// Published probabilities of the longest run for one block size.
#[derive(Debug, Clone, Copy)]
struct LongestRunTable {
    block_size: usize,
    /// Longest-run length mapped to bin 0.
    offset: usize,
    probabilities: &'static [f64],
}

const LONGEST_RUN_M8: LongestRunTable = LongestRunTable {
    block_size: 8,
    offset: 1,
    probabilities: &[0.2148, 0.3672, 0.2305, 0.1875],
};

const LONGEST_RUN_M128: LongestRunTable = LongestRunTable {
    block_size: 128,
    offset: 4,
    probabilities: &[0.1174, 0.2430, 0.2494, 0.1752, 0.1027, 0.1124],
};

const LONGEST_RUN_M10000: LongestRunTable = LongestRunTable {
    block_size: 10000,
    offset: 10,
    probabilities: &[
        0.086632, 0.208201, 0.248419, 0.193913, 0.121458, 0.068011, 0.073366,
    ],
};

impl LongestRunTable {
    fn for_len(len: usize) -> Self {
        if len < 6272 {
            LONGEST_RUN_M8
        } else if len < 750_000 {
            LONGEST_RUN_M128
        } else {
            LONGEST_RUN_M10000
        }
    }

    /// Index of the last bin (K).
    fn k(&self) -> usize {
        self.probabilities.len() - 1
    }

    fn bin(&self, longest: usize) -> usize {
        longest.saturating_sub(self.offset).min(self.k())
    }
}

/// Longest runs of zeroes and of ones per block; two independent p-values.
#[derive(Debug, Clone)]
pub struct LongestRunsInABlock {
    table: LongestRunTable,
    blocks: usize,
}

impl LongestRunsInABlock {
    const MIN_LEN: usize = 128;

    pub fn new(len: usize) -> Result<Self> {
        if len < Self::MIN_LEN {
            return Err(Error::configuration(
                "Longest Runs In A Block",
                format!("need at least {} bits, got {len}", Self::MIN_LEN),
            ));
        }
        let table = LongestRunTable::for_len(len);
        Ok(Self {
            table,
            blocks: len / table.block_size,
        })
    }

    pub fn display_name(&self) -> String {
        "Longest Runs In A Block".to_string()
    }

    pub fn block_size(&self) -> usize {
        self.table.block_size
    }

    /// Bin a longest-run length for this configuration.
    pub fn bin(&self, longest: usize) -> usize {
        self.table.bin(longest)
    }

    pub(crate) fn evaluate(&self, bits: &[u8]) -> Evaluation {
        let bins = self.table.probabilities.len();
        let mut zero_hist = vec![0u64; bins];
        let mut one_hist = vec![0u64; bins];
        for block in bits.chunks_exact(self.table.block_size).take(self.blocks) {
            let (longest_zero, longest_one) = longest_runs(block);
            zero_hist[self.table.bin(longest_zero)] += 1;
            one_hist[self.table.bin(longest_one)] += 1;
        }
        let n = self.blocks as f64;
        let chi2_zero = chi_square(&zero_hist, self.table.probabilities, n);
        let chi2_one = chi_square(&one_hist, self.table.probabilities, n);
        let a = self.table.k() as f64 / 2.0;
        Evaluation::new(
            vec![
                Statistic::one_sided(igamc(a, chi2_zero / 2.0)),
                Statistic::one_sided(igamc(a, chi2_one / 2.0)),
            ],
            format!(
                "chi2(0)={chi2_zero:.4}, chi2(1)={chi2_one:.4}, blocks={}, M={}",
                self.blocks, self.table.block_size
            ),
        )
    }
}

/// Longest run of zeroes and of ones in a block.
fn longest_runs(block: &[u8]) -> (usize, usize) {
    let mut longest = [0usize; 2];
    let mut current = 0usize;
    let mut prev = block[0];
    for &bit in block {
        if bit == prev {
            current += 1;
        } else {
            current = 1;
            prev = bit;
        }
        let slot = &mut longest[bit as usize];
        if current > *slot {
            *slot = current;
        }
    }
    (longest[0], longest[1])
}
