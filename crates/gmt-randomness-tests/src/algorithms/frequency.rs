//! Frequency family: monobit, frequency within a block, and poker.

use crate::bits::{count_ones, pattern_at};
use crate::error::{Error, Result};
use crate::result::Statistic;
use crate::special::{igamc, normal_two_sided};

use super::Evaluation;

/// Proportion of ones against ½ over the whole sequence.
#[derive(Debug, Clone)]
pub struct Monobit {
    len: usize,
}

impl Monobit {
    pub fn new(len: usize) -> Result<Self> {
        if len == 0 {
            return Err(Error::configuration("Monobit", "empty sequence"));
        }
        Ok(Self { len })
    }

    pub fn display_name(&self) -> String {
        "Monobit".to_string()
    }

    pub(crate) fn evaluate(&self, bits: &[u8]) -> Evaluation {
        let ones = count_ones(bits) as i64;
        let s = 2 * ones - self.len as i64;
        let z = s as f64 / (self.len as f64).sqrt();
        Evaluation::new(
            vec![Statistic::two_sided(normal_two_sided(z))],
            format!("S={s}, n={}", self.len),
        )
    }
}

/// Proportion of ones within M-bit blocks; chi-square over N blocks.
#[derive(Debug, Clone)]
pub struct FrequencyWithinBlock {
    block_size: usize,
    blocks: usize,
}

impl FrequencyWithinBlock {
    const MIN_LEN: usize = 100;

    pub fn new(len: usize, block_size: usize) -> Result<Self> {
        let name = "Frequency Within Block";
        if block_size == 0 {
            return Err(Error::configuration(name, "block size is zero"));
        }
        if len < Self::MIN_LEN {
            return Err(Error::configuration(
                name,
                format!("need at least {} bits, got {len}", Self::MIN_LEN),
            ));
        }
        let blocks = len / block_size;
        if blocks == 0 {
            return Err(Error::configuration(
                name,
                format!("block size {block_size} exceeds sequence length {len}"),
            ));
        }
        Ok(Self { block_size, blocks })
    }

    pub fn display_name(&self) -> String {
        format!("Frequency Within Block (m={})", self.block_size)
    }

    pub(crate) fn evaluate(&self, bits: &[u8]) -> Evaluation {
        let m = self.block_size as f64;
        let chi2: f64 = bits
            .chunks_exact(self.block_size)
            .take(self.blocks)
            .map(|block| {
                let proportion = count_ones(block) as f64 / m;
                (proportion - 0.5) * (proportion - 0.5)
            })
            .sum::<f64>()
            * 4.0
            * m;
        let p = igamc(self.blocks as f64 / 2.0, chi2 / 2.0);
        Evaluation::new(
            vec![Statistic::one_sided(p)],
            format!("chi2={chi2:.4}, blocks={}, M={}", self.blocks, self.block_size),
        )
    }
}

/// Frequencies of the 2^m non-overlapping m-bit patterns.
#[derive(Debug, Clone)]
pub struct Poker {
    pattern_len: usize,
    blocks: usize,
}

impl Poker {
    const MIN_LEN: usize = 100;
    const MAX_PATTERN: usize = 8;

    pub fn new(len: usize, pattern_len: usize) -> Result<Self> {
        let name = "Poker";
        if pattern_len == 0 || pattern_len > Self::MAX_PATTERN {
            return Err(Error::configuration(
                name,
                format!("pattern length {pattern_len} outside 1..={}", Self::MAX_PATTERN),
            ));
        }
        if len < Self::MIN_LEN {
            return Err(Error::configuration(
                name,
                format!("need at least {} bits, got {len}", Self::MIN_LEN),
            ));
        }
        Ok(Self {
            pattern_len,
            blocks: len / pattern_len,
        })
    }

    pub fn display_name(&self) -> String {
        format!("Poker (m={})", self.pattern_len)
    }

    pub(crate) fn evaluate(&self, bits: &[u8]) -> Evaluation {
        let patterns = 1usize << self.pattern_len;
        let mut counts = vec![0u64; patterns];
        for block in bits.chunks_exact(self.pattern_len).take(self.blocks) {
            counts[pattern_at(block)] += 1;
        }
        let n = self.blocks as f64;
        let sum_sq: f64 = counts.iter().map(|&c| (c as f64) * (c as f64)).sum();
        let chi2 = patterns as f64 / n * sum_sq - n;
        let p = igamc((patterns - 1) as f64 / 2.0, chi2 / 2.0);
        Evaluation::new(
            vec![Statistic::one_sided(p)],
            format!("chi2={chi2:.4}, blocks={}", self.blocks),
        )
    }
}
