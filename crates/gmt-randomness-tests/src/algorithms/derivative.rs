//! XOR-based tests: binary derivative and autocorrelation.

use crate::bits::count_ones;
use crate::error::{Error, Result};
use crate::result::Statistic;
use crate::special::normal_two_sided;

use super::Evaluation;

/// Monobit test on the d-th binary derivative (d passes of adjacent XOR).
#[derive(Debug, Clone)]
pub struct BinaryDerivative {
    order: usize,
    derived_len: usize,
}

impl BinaryDerivative {
    pub fn new(len: usize, order: usize) -> Result<Self> {
        let name = "Binary Derivative";
        if order == 0 {
            return Err(Error::configuration(name, "derivative order is zero"));
        }
        if order >= len {
            return Err(Error::configuration(
                name,
                format!("order {order} leaves no bits out of {len}"),
            ));
        }
        Ok(Self {
            order,
            derived_len: len - order,
        })
    }

    pub fn display_name(&self) -> String {
        format!("Binary Derivative (d={})", self.order)
    }

    pub(crate) fn derive(bits: &[u8], order: usize) -> Vec<u8> {
        let mut current = bits.to_vec();
        for _ in 0..order {
            current = current.windows(2).map(|w| w[0] ^ w[1]).collect();
        }
        current
    }

    pub(crate) fn evaluate(&self, bits: &[u8]) -> Evaluation {
        let derived = Self::derive(bits, self.order);
        debug_assert_eq!(derived.len(), self.derived_len);
        let ones = count_ones(&derived) as i64;
        let s = 2 * ones - self.derived_len as i64;
        let z = s as f64 / (self.derived_len as f64).sqrt();
        Evaluation::new(
            vec![Statistic::two_sided(normal_two_sided(z))],
            format!("S={s}, n={}", self.derived_len),
        )
    }
}

/// Weight of the sequence XOR its own d-bit left shift.
#[derive(Debug, Clone)]
pub struct Autocorrelation {
    shift: usize,
    overlap: usize,
}

impl Autocorrelation {
    pub fn new(len: usize, shift: usize) -> Result<Self> {
        let name = "Autocorrelation";
        if shift == 0 {
            return Err(Error::configuration(name, "shift is zero"));
        }
        if shift >= len {
            return Err(Error::configuration(
                name,
                format!("shift {shift} leaves no overlap in {len} bits"),
            ));
        }
        Ok(Self {
            shift,
            overlap: len - shift,
        })
    }

    pub fn display_name(&self) -> String {
        format!("Autocorrelation (d={})", self.shift)
    }

    pub(crate) fn evaluate(&self, bits: &[u8]) -> Evaluation {
        let weight: usize = bits[..self.overlap]
            .iter()
            .zip(&bits[self.shift..])
            .map(|(&a, &b)| (a ^ b) as usize)
            .sum();
        let n = self.overlap as f64;
        let z = 2.0 * (weight as f64 - n / 2.0) / n.sqrt();
        Evaluation::new(
            vec![Statistic::two_sided(normal_two_sided(z))],
            format!("A={weight}, n-d={}", self.overlap),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_shrinks_by_order() {
        let bits = [1u8, 0, 1, 1, 0, 0, 1, 0];
        assert_eq!(BinaryDerivative::derive(&bits, 1), vec![1, 1, 0, 1, 0, 1, 1]);
        assert_eq!(BinaryDerivative::derive(&bits, 2), vec![0, 1, 1, 1, 1, 0]);
        assert_eq!(BinaryDerivative::derive(&bits, 3).len(), 5);
    }

    const EPSILON_100: &str = "1100100100001111110110101010001000100001011010001100001000110100110001001100011001100010100010111000";

    fn epsilon() -> Vec<u8> {
        EPSILON_100.bytes().map(|b| b - b'0').collect()
    }

    #[test]
    fn test_binary_derivative_reference_values() {
        let bits = epsilon();
        let eval = BinaryDerivative::new(100, 3).unwrap().evaluate(&bits);
        assert!((eval.statistics[0].score - 0.360816).abs() < 1e-6);
        let eval = BinaryDerivative::new(100, 7).unwrap().evaluate(&bits);
        assert!((eval.statistics[0].score - 0.917411).abs() < 1e-6);
    }

    #[test]
    fn test_autocorrelation_reference_values() {
        let bits = epsilon();
        let cases = [
            (1, 0.763025, 0.381512),
            (2, 0.312422, 0.156211),
            (8, 0.404248, 0.797876),
            (16, 0.382733, 0.191367),
        ];
        for (shift, p, q) in cases {
            let eval = Autocorrelation::new(100, shift).unwrap().evaluate(&bits);
            let stat = &eval.statistics[0];
            assert!((stat.score - p).abs() < 1e-6, "d={shift}: {}", stat.score);
            assert!((stat.q_value - q).abs() < 1e-6, "d={shift}: {}", stat.q_value);
        }
    }

    #[test]
    fn test_derivative_of_alternating_is_constant() {
        let bits: Vec<u8> = (0..1000).map(|i| (i % 2) as u8).collect();
        let eval = BinaryDerivative::new(1000, 1).unwrap().evaluate(&bits);
        assert!(eval.statistics[0].score < 1e-10);
    }

    #[test]
    fn test_autocorrelation_periodic_fails() {
        // Period-2 sequence: shift of 2 reproduces it exactly, A = 0.
        let bits: Vec<u8> = (0..1000).map(|i| (i % 2) as u8).collect();
        let eval = Autocorrelation::new(1000, 2).unwrap().evaluate(&bits);
        assert!(eval.statistics[0].score < 1e-10);
        // Too few mismatches: negative statistic, q-value near one.
        assert!(eval.statistics[0].q_value > 1.0 - 1e-10);
    }

    #[test]
    fn test_rejects_degenerate_parameters() {
        assert!(Autocorrelation::new(100, 0).is_err());
        assert!(Autocorrelation::new(100, 100).is_err());
        assert!(BinaryDerivative::new(100, 0).is_err());
        assert!(BinaryDerivative::new(3, 3).is_err());
    }
}
