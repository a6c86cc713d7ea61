//! Thin wrappers over `statrs` special functions in the shape the tests use.

use statrs::distribution::{ContinuousCDF, Normal};
use statrs::function::erf;
use statrs::function::gamma::gamma_ur;
use std::f64::consts::SQRT_2;

/// Regularized upper incomplete gamma Q(a, x) = Γ(a, x) / Γ(a).
///
/// Panics on `a <= 0`: a non-positive degrees-of-freedom value means a
/// probability table was misapplied. Statistics that round to slightly below
/// zero give 1.
pub fn igamc(a: f64, x: f64) -> f64 {
    assert!(a > 0.0, "igamc called with non-positive shape {a}");
    if x <= 0.0 {
        return 1.0;
    }
    if x.is_infinite() {
        return 0.0;
    }
    gamma_ur(a, x)
}

pub fn erfc(x: f64) -> f64 {
    erf::erfc(x)
}

/// Standard normal CDF.
pub fn normal_cdf(x: f64) -> f64 {
    Normal::standard().cdf(x)
}

/// Two-sided p-value and signed q-value for a standard normal statistic.
///
/// `p = erfc(|z|/√2)`, `q = erfc(z/√2) / 2`.
pub fn normal_two_sided(z: f64) -> (f64, f64) {
    let p = erfc(z.abs() / SQRT_2);
    let q = erfc(z / SQRT_2) / 2.0;
    (p, q)
}

/// Pearson chi-square of observed counts against expected probabilities.
///
/// Panics if an expected count is zero.
pub fn chi_square(observed: &[u64], probabilities: &[f64], total: f64) -> f64 {
    assert_eq!(observed.len(), probabilities.len());
    observed
        .iter()
        .zip(probabilities)
        .map(|(&o, &p)| {
            let expected = total * p;
            assert!(expected > 0.0, "zero expected count in chi-square bin");
            let diff = o as f64 - expected;
            diff * diff / expected
        })
        .sum()
}
