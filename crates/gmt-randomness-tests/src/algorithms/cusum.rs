use crate::error::{Error, Result};
use crate::result::Statistic;
use crate::special::normal_cdf;

use super::Evaluation;

/// Cumulative sums: maximal excursion of the ±1 random walk, forward and reverse.
#[derive(Debug, Clone)]
pub struct CumulativeSums {
    len: usize,
}

impl CumulativeSums {
    const MIN_LEN: usize = 100;

    pub fn new(len: usize) -> Result<Self> {
        if len < Self::MIN_LEN {
            return Err(Error::configuration(
                "Cumulative Sums",
                format!("need at least {} bits, got {len}", Self::MIN_LEN),
            ));
        }
        Ok(Self { len })
    }

    pub fn display_name(&self) -> String {
        "Cumulative Sums".to_string()
    }

    /// Largest |partial sum| of the ±1 walk over `bits` in the given order.
    pub(crate) fn max_excursion<'a>(bits: impl Iterator<Item = &'a u8>) -> u64 {
        let mut s: i64 = 0;
        let mut z: u64 = 0;
        for &bit in bits {
            s += if bit == 1 { 1 } else { -1 };
            z = z.max(s.unsigned_abs());
        }
        z
    }

    /// P-value for a maximal excursion `z` of an `n`-step walk.
    pub(crate) fn p_value(n: usize, z: u64) -> f64 {
        let nf = n as f64;
        let zf = z as f64;
        let sqrt_n = nf.sqrt();
        let term = |k: i64, a: f64, b: f64| {
            let kf = k as f64;
            normal_cdf((4.0 * kf + a) * zf / sqrt_n) - normal_cdf((4.0 * kf + b) * zf / sqrt_n)
        };

        let upper = ((nf / zf - 1.0) / 4.0).floor() as i64;
        let mut sum1 = 0.0;
        for k in ((-nf / zf + 1.0) / 4.0).floor() as i64..=upper {
            sum1 += term(k, 1.0, -1.0);
        }
        let mut sum2 = 0.0;
        for k in ((-nf / zf - 3.0) / 4.0).floor() as i64..=upper {
            sum2 += term(k, 3.0, 1.0);
        }
        (1.0 - sum1 + sum2).clamp(0.0, 1.0)
    }

    pub(crate) fn evaluate(&self, bits: &[u8]) -> Evaluation {
        let forward = Self::max_excursion(bits.iter());
        let reverse = Self::max_excursion(bits.iter().rev());
        Evaluation::new(
            vec![
                Statistic::one_sided(Self::p_value(self.len, forward)),
                Statistic::one_sided(Self::p_value(self.len, reverse)),
            ],
            format!("max|S| forward={forward}, reverse={reverse}, n={}", self.len),
        )
    }
}
