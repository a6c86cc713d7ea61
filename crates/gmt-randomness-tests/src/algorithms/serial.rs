//! Overlapping-pattern tests: serial and approximate entropy.
//!
//! Both count every m-bit window of the sequence with the first `m − 1` bits
//! wrapped onto the end, so there are exactly `n` windows for every width.

use crate::error::{Error, Result};
use crate::result::Statistic;
use crate::special::igamc;

use super::Evaluation;

/// Counts of the 2^m overlapping m-bit patterns, cyclically padded.
pub(crate) fn overlapping_counts(bits: &[u8], m: usize) -> Vec<u64> {
    let n = bits.len();
    let mut counts = vec![0u64; 1 << m];
    if m == 0 {
        counts[0] = n as u64;
        return counts;
    }
    let mask = (1usize << m) - 1;
    let mut window = 0usize;
    for j in 0..m - 1 {
        window = (window << 1) | bits[j % n] as usize;
    }
    for i in 0..n {
        window = ((window << 1) | bits[(i + m - 1) % n] as usize) & mask;
        counts[window] += 1;
    }
    counts
}

/// ψ²ₘ = 2ᵐ/n · Σ νᵢ² − n; zero for `m == 0`.
fn psi_sq(bits: &[u8], m: usize) -> f64 {
    let n = bits.len() as f64;
    let sum_sq: f64 = overlapping_counts(bits, m)
        .iter()
        .map(|&c| (c as f64) * (c as f64))
        .sum();
    sum_sq * 2f64.powi(m as i32) / n - n
}

/// Serial test: first and second differences of ψ² over m, m−1, m−2 bit patterns.
#[derive(Debug, Clone)]
pub struct Serial {
    pattern_len: usize,
}

impl Serial {
    pub fn new(len: usize, pattern_len: usize) -> Result<Self> {
        let name = "Serial";
        if pattern_len == 0 {
            return Err(Error::configuration(name, "pattern length is zero"));
        }
        // m must stay below ⌊log2 n⌋ − 2 for the counts to mean anything.
        if len == 0 || pattern_len + 2 >= len.ilog2() as usize {
            return Err(Error::configuration(
                name,
                format!("pattern length {pattern_len} is too long for {len} bits"),
            ));
        }
        Ok(Self { pattern_len })
    }

    pub fn display_name(&self) -> String {
        format!("Serial (m={})", self.pattern_len)
    }

    pub(crate) fn evaluate(&self, bits: &[u8]) -> Evaluation {
        let m = self.pattern_len;
        let psi_m = psi_sq(bits, m);
        let psi_m1 = psi_sq(bits, m - 1);
        let psi_m2 = if m >= 2 { psi_sq(bits, m - 2) } else { 0.0 };
        let delta1 = psi_m - psi_m1;
        let delta2 = psi_m - 2.0 * psi_m1 + psi_m2;
        let p1 = igamc(2f64.powi(m as i32 - 2), delta1 / 2.0);
        let p2 = igamc(2f64.powi(m as i32 - 3), delta2 / 2.0);
        Evaluation::new(
            vec![Statistic::one_sided(p1), Statistic::one_sided(p2)],
            format!("del1={delta1:.4}, del2={delta2:.4}, m={m}"),
        )
    }
}

/// Approximate entropy: φₘ − φₘ₊₁ against ln 2.
#[derive(Debug, Clone)]
pub struct ApproximateEntropy {
    pattern_len: usize,
}

impl ApproximateEntropy {
    pub fn new(len: usize, pattern_len: usize) -> Result<Self> {
        let name = "Approximate Entropy";
        if pattern_len == 0 {
            return Err(Error::configuration(name, "pattern length is zero"));
        }
        if pattern_len >= usize::BITS as usize - 1 || (1usize << (pattern_len + 1)) > len {
            return Err(Error::configuration(
                name,
                format!("pattern length {pattern_len} is too long for {len} bits"),
            ));
        }
        Ok(Self { pattern_len })
    }

    pub fn display_name(&self) -> String {
        format!("Approximate Entropy (m={})", self.pattern_len)
    }

    fn phi(bits: &[u8], m: usize) -> f64 {
        let n = bits.len() as f64;
        overlapping_counts(bits, m)
            .iter()
            .filter(|&&c| c > 0)
            .map(|&c| {
                let p = c as f64 / n;
                p * p.ln()
            })
            .sum()
    }

    pub(crate) fn evaluate(&self, bits: &[u8]) -> Evaluation {
        let m = self.pattern_len;
        let n = bits.len() as f64;
        let apen = Self::phi(bits, m) - Self::phi(bits, m + 1);
        let chi2 = 2.0 * n * (std::f64::consts::LN_2 - apen);
        let p = igamc(2f64.powi(m as i32 - 1), chi2 / 2.0);
        Evaluation::new(
            vec![Statistic::one_sided(p)],
            format!("ApEn={apen:.6}, chi2={chi2:.4}, m={m}"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::Monobit;
    use crate::bits::BitSequence;

    const FIXTURE_128: &str = "11001100000101010110110001001100111000000000001001001101010100010001001111010110100000001101011111001100111001101101100010110010";
    const EPSILON_100: &str = "1100100100001111110110101010001000100001011010001100001000110100110001001100011001100010100010111000";

    #[test]
    fn test_overlapping_counts_wrap() {
        // 0011 cyclic: windows 00, 01, 11, 10
        let counts = overlapping_counts(&[0, 0, 1, 1], 2);
        assert_eq!(counts, vec![1, 1, 1, 1]);
        let counts = overlapping_counts(&[0, 0, 1, 1], 3);
        assert_eq!(counts.iter().sum::<u64>(), 4);
        assert_eq!(counts[0b001], 1);
        assert_eq!(counts[0b100], 1);
    }

    #[test]
    fn test_overlapping_counts_zero_width() {
        assert_eq!(overlapping_counts(&[1, 0, 1], 0), vec![3]);
        assert_eq!(psi_sq(&[1, 0, 1], 0), 0.0);
    }

    #[test]
    fn test_serial_single_bit_matches_monobit() {
        let seq = BitSequence::from_ascii(FIXTURE_128).unwrap();
        let monobit = Monobit::new(seq.len()).unwrap().evaluate(seq.as_slice());
        let serial = Serial::new(seq.len(), 1).unwrap().evaluate(seq.as_slice());
        assert!((monobit.statistics[0].score - serial.statistics[0].score).abs() < 1e-9);
    }

    #[test]
    fn test_serial_reference_value() {
        // 0011011101, m=3: ψ² = 2.8, 1.2, 0.4 so ∇ψ² = 1.6, ∇²ψ² = 0.8.
        // Ten bits is below the constructor's minimum, so build it directly.
        let bits: Vec<u8> = "0011011101".bytes().map(|b| b - b'0').collect();
        let eval = Serial { pattern_len: 3 }.evaluate(&bits);
        assert!((eval.statistics[0].score - 0.808792).abs() < 1e-6);
        assert!((eval.statistics[1].score - 0.670320).abs() < 1e-6);
        assert_eq!(eval.details, "del1=1.6000, del2=0.8000, m=3");
    }

    #[test]
    fn test_serial_reports_two_scores() {
        let seq = BitSequence::from_ascii(FIXTURE_128).unwrap();
        let eval = Serial::new(seq.len(), 2).unwrap().evaluate(seq.as_slice());
        assert_eq!(eval.statistics.len(), 2);
        for s in &eval.statistics {
            assert!((0.0..=1.0).contains(&s.score));
        }
    }

    #[test]
    fn test_serial_rejects_long_patterns() {
        assert!(Serial::new(20000, 5).is_ok());
        // ⌊log2 128⌋ − 2 = 5 is the first rejected length
        assert!(Serial::new(128, 4).is_ok());
        assert!(Serial::new(128, 5).is_err());
        assert!(Serial::new(128, 6).is_err());
        assert!(Serial::new(128, 0).is_err());
    }

    #[test]
    fn test_approximate_entropy_reference_value() {
        // 100-bit sequence, m=2: ApEn = 0.665393, chi2 = 5.550792, p = 0.235301
        let seq = BitSequence::from_ascii(EPSILON_100).unwrap();
        let test = ApproximateEntropy::new(seq.len(), 2).unwrap();
        let eval = test.evaluate(seq.as_slice());
        assert!((eval.statistics[0].score - 0.235301).abs() < 1e-5);
    }

    #[test]
    fn test_approximate_entropy_periodic_fails() {
        let bits: Vec<u8> = (0..20000).map(|i| ((i / 3) % 2) as u8).collect();
        let eval = ApproximateEntropy::new(20000, 2).unwrap().evaluate(&bits);
        assert!(eval.statistics[0].score < 1e-10);
    }
}
