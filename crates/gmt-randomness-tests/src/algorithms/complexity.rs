use crate::error::{Error, Result};
use crate::result::Statistic;
use crate::special::{chi_square, igamc};

use super::Evaluation;

/// Probabilities of the seven T categories (T ≤ −2.5, …, T > 2.5).
const PROBABILITIES: [f64; 7] = [0.010417, 0.03125, 0.125, 0.5, 0.25, 0.0625, 0.020833];

/// Berlekamp–Massey over GF(2): length of the shortest LFSR generating `block`.
pub fn berlekamp_massey(block: &[u8]) -> usize {
    let n = block.len();
    if n == 0 {
        return 0;
    }
    let mut c = vec![0u8; n];
    let mut b = vec![0u8; n];
    c[0] = 1;
    b[0] = 1;
    let mut l: usize = 0;
    let mut m: isize = -1;

    for i in 0..n {
        let mut d = block[i];
        for j in 1..=l {
            d ^= c[j] & block[i - j];
        }
        if d == 0 {
            continue;
        }
        let shift = (i as isize - m) as usize;
        let saved = (l <= i / 2).then(|| c.clone());
        for (cj, &bj) in c[shift..].iter_mut().zip(&b) {
            *cj ^= bj;
        }
        if let Some(previous) = saved {
            l = i + 1 - l;
            m = i as isize;
            b = previous;
        }
    }
    l
}

/// Linear complexity test: Berlekamp–Massey per M-bit block, binned by deviation from μ.
#[derive(Debug, Clone)]
pub struct LinearComplexity {
    block_len: usize,
    blocks: usize,
    mu: f64,
}

impl LinearComplexity {
    pub const MIN_BLOCK_LEN: usize = 500;
    pub const MAX_BLOCK_LEN: usize = 5000;
    pub const MIN_BLOCKS: usize = 200;

    pub fn new(len: usize, block_len: usize) -> Result<Self> {
        let name = "Linear Complexity";
        if !(Self::MIN_BLOCK_LEN..=Self::MAX_BLOCK_LEN).contains(&block_len) {
            return Err(Error::configuration(
                name,
                format!(
                    "block length {block_len} outside {}..={}",
                    Self::MIN_BLOCK_LEN,
                    Self::MAX_BLOCK_LEN
                ),
            ));
        }
        let blocks = len / block_len;
        if blocks < Self::MIN_BLOCKS {
            return Err(Error::configuration(
                name,
                format!(
                    "{len} bits give {blocks} blocks of {block_len}, need {}",
                    Self::MIN_BLOCKS
                ),
            ));
        }
        let m = block_len as f64;
        let parity = if block_len % 2 == 0 { -1.0 } else { 1.0 };
        // (−1)^(M+1) in the middle term; the last term vanishes for any M ≥ 500.
        let mu = m / 2.0 + (9.0 + parity) / 36.0 - (m / 3.0 + 2.0 / 9.0) / 2f64.powf(m);
        Ok(Self {
            block_len,
            blocks,
            mu,
        })
    }

    pub fn display_name(&self) -> String {
        format!("Linear Complexity (M={})", self.block_len)
    }

    fn category(t: f64) -> usize {
        match t {
            t if t <= -2.5 => 0,
            t if t <= -1.5 => 1,
            t if t <= -0.5 => 2,
            t if t <= 0.5 => 3,
            t if t <= 1.5 => 4,
            t if t <= 2.5 => 5,
            _ => 6,
        }
    }

    pub(crate) fn evaluate(&self, bits: &[u8]) -> Evaluation {
        // (−1)^M
        let sign = if self.block_len % 2 == 0 { 1.0 } else { -1.0 };
        let mut counts = [0u64; 7];
        for block in bits.chunks_exact(self.block_len).take(self.blocks) {
            let complexity = berlekamp_massey(block) as f64;
            let t = sign * (complexity - self.mu) + 2.0 / 9.0;
            counts[Self::category(t)] += 1;
        }

        let chi2 = chi_square(&counts, &PROBABILITIES, self.blocks as f64);
        let p = igamc(3.0, chi2 / 2.0);
        Evaluation::new(
            vec![Statistic::one_sided(p)],
            format!("chi2={chi2:.4}, N={}, counts={counts:?}", self.blocks),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::pseudo_random_bits;

    #[test]
    fn test_berlekamp_massey_zero_block() {
        assert_eq!(berlekamp_massey(&[0u8; 64]), 0);
        assert_eq!(berlekamp_massey(&[]), 0);
    }

    #[test]
    fn test_berlekamp_massey_reference() {
        let bits: Vec<u8> = "1101011110001".bytes().map(|b| b - b'0').collect();
        assert_eq!(berlekamp_massey(&bits), 4);
    }

    #[test]
    fn test_berlekamp_massey_single_trailing_one() {
        // Only an LFSR as long as the block can hold n−1 zeros then a one.
        let mut bits = vec![0u8; 100];
        bits[99] = 1;
        assert_eq!(berlekamp_massey(&bits), 100);
    }

    #[test]
    fn test_berlekamp_massey_periodic() {
        // Primitive connection polynomial 1 + x⁶ + x⁷
        let mut bits = vec![1u8, 0, 0, 0, 0, 0, 0];
        for i in 7..200 {
            let next = bits[i - 6] ^ bits[i - 7];
            bits.push(next);
        }
        assert_eq!(berlekamp_massey(&bits), 7);
    }

    #[test]
    fn test_berlekamp_massey_random_near_half() {
        let bits = pseudo_random_bits(1000);
        let l = berlekamp_massey(&bits);
        assert!((490..=510).contains(&l), "complexity {l}");
    }

    #[test]
    fn test_rejects_bad_parameters() {
        assert!(LinearComplexity::new(1_000_000, 500).is_ok());
        assert!(LinearComplexity::new(1_000_000, 1000).is_ok());
        assert!(LinearComplexity::new(20000, 500).is_err());
        assert!(LinearComplexity::new(1_000_000, 100).is_err());
    }

    #[test]
    fn test_categories() {
        assert_eq!(LinearComplexity::category(-3.0), 0);
        assert_eq!(LinearComplexity::category(-2.5), 0);
        assert_eq!(LinearComplexity::category(0.0), 3);
        assert_eq!(LinearComplexity::category(2.5), 5);
        assert_eq!(LinearComplexity::category(2.6), 6);
    }

    #[test]
    fn test_random_sequence_reference_value() {
        let bits = pseudo_random_bits(100_000);
        let test = LinearComplexity::new(bits.len(), 500).unwrap();
        let eval = test.evaluate(&bits);
        assert_eq!(
            eval.details,
            "chi2=9.6300, N=200, counts=[4, 10, 22, 95, 45, 16, 8]"
        );
        assert!((eval.statistics[0].score - 0.141123).abs() < 1e-6);
    }

    #[test]
    fn test_odd_block_length_reference_value() {
        // Odd M flips both the μ correction and the sign of T.
        let bits = pseudo_random_bits(200 * 501);
        let test = LinearComplexity::new(bits.len(), 501).unwrap();
        let eval = test.evaluate(&bits);
        assert_eq!(
            eval.details,
            "chi2=1.9300, N=200, counts=[1, 8, 28, 99, 50, 10, 4]"
        );
        assert!((eval.statistics[0].score - 0.926018).abs() < 1e-6);
    }

    #[test]
    fn test_low_complexity_fails() {
        let bits: Vec<u8> = (0..100_000).map(|i| ((i / 5) % 2) as u8).collect();
        let eval = LinearComplexity::new(bits.len(), 500)
            .unwrap()
            .evaluate(&bits);
        assert!(eval.statistics[0].score < 1e-10);
    }
}
