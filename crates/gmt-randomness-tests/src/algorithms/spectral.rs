use std::fmt;
use std::sync::Arc;

use rustfft::{Fft, FftPlanner, num_complex::Complex};

use crate::error::{Error, Result};
use crate::result::Statistic;
use crate::special::normal_two_sided;

use super::Evaluation;

/// Discrete Fourier transform (spectral) test.
///
/// Counts the peaks in the first half of the spectrum of the ±1 mapped
/// sequence that stay under the 95% threshold `√(ln(1/0.05)·n)` and compares
/// the count with `0.95·n/2`. The variance uses the GM/T divisor 3.8 rather
/// than the NIST divisor 4.
#[derive(Clone)]
pub struct DiscreteFourierTransform {
    len: usize,
    threshold: f64,
    expected_peaks: f64,
    sigma: f64,
    fft: Arc<dyn Fft<f64>>,
}

impl fmt::Debug for DiscreteFourierTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiscreteFourierTransform")
            .field("len", &self.len)
            .field("threshold", &self.threshold)
            .field("expected_peaks", &self.expected_peaks)
            .field("sigma", &self.sigma)
            .finish_non_exhaustive()
    }
}

impl DiscreteFourierTransform {
    const MIN_LEN: usize = 64;

    pub fn new(len: usize) -> Result<Self> {
        if len < Self::MIN_LEN {
            return Err(Error::configuration(
                "Discrete Fourier Transform",
                format!("need at least {} bits, got {len}", Self::MIN_LEN),
            ));
        }
        let n = len as f64;
        let fft = FftPlanner::new().plan_fft_forward(len);
        Ok(Self {
            len,
            threshold: (2.995732274 * n).sqrt(),
            expected_peaks: 0.95 * n / 2.0,
            sigma: (n / 3.8 * 0.95 * 0.05).sqrt(),
            fft,
        })
    }

    pub fn display_name(&self) -> String {
        "Discrete Fourier Transform".to_string()
    }

    pub(crate) fn evaluate(&self, bits: &[u8]) -> Evaluation {
        let mut buffer: Vec<Complex<f64>> = bits
            .iter()
            .map(|&b| Complex {
                re: if b == 1 { 1.0 } else { -1.0 },
                im: 0.0,
            })
            .collect();
        self.fft.process(&mut buffer);

        let half = self.len / 2;
        let below = buffer[..half]
            .iter()
            .filter(|c| c.norm() < self.threshold)
            .count();
        let d = (below as f64 - self.expected_peaks) / self.sigma;
        Evaluation::new(
            vec![Statistic::two_sided(normal_two_sided(d))],
            format!("peaks_below_threshold={below}/{half}, d={d:.4}"),
        )
    }
}
