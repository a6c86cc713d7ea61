use crate::bits::pattern_at;
use crate::error::{Error, Result};
use crate::result::Statistic;
use crate::special::normal_two_sided;

use super::Evaluation;

/// Expected value of fₙ for L = 0..=16 (index 0 unused).
const EXPECTED_VALUE: [f64; 17] = [
    0.0, 0.73264948, 1.5374383, 2.40160681, 3.31122472, 4.25342659, 5.2177052, 6.1962507,
    7.1836656, 8.1764248, 9.1723243, 10.170032, 11.168765, 12.168070, 13.167693, 14.167488,
    15.167379,
];

/// Variance of log2 gaps for L = 0..=16 (index 0 unused).
const VARIANCE: [f64; 17] = [
    0.0, 0.690, 1.338, 1.901, 2.358, 2.705, 2.954, 3.125, 3.238, 3.311, 3.356, 3.384, 3.401,
    3.410, 3.416, 3.419, 3.421,
];

/// Shortest sequence the published tables support for L = 6..=16.
const MIN_LEN: [usize; 11] = [
    387_840,
    904_960,
    2_068_480,
    4_654_080,
    10_342_400,
    22_753_280,
    49_643_520,
    107_560_960,
    231_669_760,
    496_435_200,
    1_059_061_760,
];

/// Maurer's universal statistical test.
///
/// The first Q blocks of L bits seed the last-seen table, the remaining K
/// blocks contribute `log2` of the distance back to the previous occurrence.
#[derive(Debug, Clone)]
pub struct MaurersUniversal {
    block_len: usize,
    init_blocks: usize,
    test_blocks: usize,
    expected: f64,
    sigma: f64,
}

impl MaurersUniversal {
    pub const DEFAULT_BLOCK_LEN: usize = 7;
    pub const DEFAULT_INIT_BLOCKS: usize = 1280;

    pub fn new(len: usize, block_len: usize, init_blocks: usize) -> Result<Self> {
        let name = "Maurers Universal";
        if block_len == 0 || block_len >= EXPECTED_VALUE.len() {
            return Err(Error::configuration(
                name,
                format!("block length {block_len} outside 1..=16"),
            ));
        }
        if let Some(&min_len) = block_len.checked_sub(6).and_then(|i| MIN_LEN.get(i)) {
            if len < min_len {
                return Err(Error::configuration(
                    name,
                    format!("L={block_len} needs at least {min_len} bits, got {len}"),
                ));
            }
        }
        let total_blocks = len / block_len;
        if total_blocks <= init_blocks {
            return Err(Error::configuration(
                name,
                format!(
                    "{len} bits give {total_blocks} blocks of {block_len}, need more than {init_blocks}"
                ),
            ));
        }
        let test_blocks = total_blocks - init_blocks;
        let l = block_len as f64;
        let k = test_blocks as f64;
        let c = 0.7 - 0.8 / l + (4.0 + 32.0 / l) * k.powf(-3.0 / l) / 15.0;
        Ok(Self {
            block_len,
            init_blocks,
            test_blocks,
            expected: EXPECTED_VALUE[block_len],
            sigma: c * (VARIANCE[block_len] / k).sqrt(),
        })
    }

    pub fn display_name(&self) -> String {
        format!("Maurers Universal (L={})", self.block_len)
    }

    pub(crate) fn evaluate(&self, bits: &[u8]) -> Evaluation {
        let l = self.block_len;
        let mut last_seen = vec![0usize; 1 << l];
        let mut blocks = bits.chunks_exact(l).map(pattern_at).enumerate();

        for (i, pattern) in blocks.by_ref().take(self.init_blocks) {
            last_seen[pattern] = i + 1;
        }
        let mut total = 0.0f64;
        for (i, pattern) in blocks.take(self.test_blocks) {
            let distance = i + 1 - last_seen[pattern];
            total += (distance as f64).log2();
            last_seen[pattern] = i + 1;
        }

        let fn_val = total / self.test_blocks as f64;
        let z = (fn_val - self.expected) / self.sigma;
        Evaluation::new(
            vec![Statistic::two_sided(normal_two_sided(z))],
            format!("fn={fn_val:.6}, expected={:.6}, L={l}", self.expected),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_short_sequences() {
        assert!(MaurersUniversal::new(20000, 7, 1280).is_err());
        assert!(MaurersUniversal::new(1_000_000, 7, 1280).is_ok());
        assert!(MaurersUniversal::new(1_000_000, 17, 1280).is_err());
    }

    #[test]
    fn test_minimum_length_per_block_length() {
        assert!(MaurersUniversal::new(904_960, 7, 1280).is_ok());
        assert!(MaurersUniversal::new(904_959, 7, 1280).is_err());
        assert!(MaurersUniversal::new(387_840, 6, 640).is_ok());
        assert!(MaurersUniversal::new(387_839, 6, 640).is_err());
        assert!(MaurersUniversal::new(1_000_000, 8, 2560).is_err());
        // Below L=6 only the block count limits the length.
        assert!(MaurersUniversal::new(20_000, 5, 320).is_ok());

        let err = MaurersUniversal::new(20_000, 7, 1280).unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }), "{err}");
    }

    #[test]
    fn test_reference_value_small_parameters() {
        // 20-bit sequence, L=2, Q=4, K=6: fn = 7.169925 / 6
        let bits: Vec<u8> = "01011010011101010111"
            .bytes()
            .map(|b| b - b'0')
            .collect();
        let test = MaurersUniversal::new(bits.len(), 2, 4).unwrap();
        let eval = test.evaluate(&bits);
        assert!(eval.details.starts_with("fn=1.19498"), "{}", eval.details);
    }

    #[test]
    fn test_constant_sequence_fails() {
        let bits = vec![0u8; 1_000_000];
        let eval = MaurersUniversal::new(bits.len(), 7, 1280)
            .unwrap()
            .evaluate(&bits);
        assert!(eval.statistics[0].score < 1e-10);
    }
}
