use crate::error::{Error, Result};
use crate::result::Statistic;
use crate::special::{chi_square, igamc};

use super::Evaluation;

const SIZE: usize = 32;
const BITS_PER_MATRIX: usize = SIZE * SIZE;

/// Full rank, rank 31, rank ≤ 30 for a random 32×32 matrix over GF(2).
const PROBABILITIES: [f64; 3] = [0.2888, 0.5776, 0.1336];

/// Rank over GF(2) of a square matrix whose rows are packed into `u32`s.
pub(crate) fn gf2_rank(mut rows: [u32; SIZE]) -> usize {
    let mut rank = 0;
    for col in (0..SIZE).rev() {
        let bit = 1u32 << col;
        let Some(pivot) = (rank..SIZE).find(|&r| rows[r] & bit != 0) else {
            continue;
        };
        rows.swap(rank, pivot);
        let pivot_row = rows[rank];
        for (r, row) in rows.iter_mut().enumerate() {
            if r != rank && *row & bit != 0 {
                *row ^= pivot_row;
            }
        }
        rank += 1;
    }
    rank
}

/// Binary matrix rank test over disjoint 32×32 matrices, filled row by row.
#[derive(Debug, Clone)]
pub struct BinaryMatrixRank {
    matrices: usize,
}

impl BinaryMatrixRank {
    pub const MIN_MATRICES: usize = 38;

    pub fn new(len: usize) -> Result<Self> {
        let matrices = len / BITS_PER_MATRIX;
        if matrices < Self::MIN_MATRICES {
            return Err(Error::configuration(
                "Binary Matrix Rank",
                format!(
                    "{len} bits give {matrices} matrices, need {}",
                    Self::MIN_MATRICES
                ),
            ));
        }
        Ok(Self { matrices })
    }

    pub fn display_name(&self) -> String {
        "Binary Matrix Rank".to_string()
    }

    fn pack(matrix: &[u8]) -> [u32; SIZE] {
        let mut rows = [0u32; SIZE];
        for (row, bits) in rows.iter_mut().zip(matrix.chunks_exact(SIZE)) {
            *row = bits.iter().fold(0u32, |acc, &b| (acc << 1) | b as u32);
        }
        rows
    }

    pub(crate) fn evaluate(&self, bits: &[u8]) -> Evaluation {
        let mut counts = [0u64; 3];
        for matrix in bits.chunks_exact(BITS_PER_MATRIX).take(self.matrices) {
            let rank = gf2_rank(Self::pack(matrix));
            let bin = match rank {
                SIZE => 0,
                r if r == SIZE - 1 => 1,
                _ => 2,
            };
            counts[bin] += 1;
        }

        let chi2 = chi_square(&counts, &PROBABILITIES, self.matrices as f64);
        let p = igamc(1.0, chi2 / 2.0);
        Evaluation::new(
            vec![Statistic::one_sided(p)],
            format!(
                "full={}, full-1={}, lower={}, N={}",
                counts[0], counts[1], counts[2], self.matrices
            ),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::pseudo_random_bits;

    #[test]
    fn test_gf2_rank_identity() {
        let mut rows = [0u32; SIZE];
        for (i, row) in rows.iter_mut().enumerate() {
            *row = 1 << i;
        }
        assert_eq!(gf2_rank(rows), 32);
    }

    #[test]
    fn test_gf2_rank_dependent_rows() {
        let mut rows = [0u32; SIZE];
        rows[0] = 0b1011;
        rows[1] = 0b0110;
        rows[2] = 0b1101; // rows[0] ^ rows[1]
        assert_eq!(gf2_rank(rows), 2);
        assert_eq!(gf2_rank([0u32; SIZE]), 0);
        assert_eq!(gf2_rank([u32::MAX; SIZE]), 1);
    }

    #[test]
    fn test_pack_row_order() {
        let mut matrix = vec![0u8; BITS_PER_MATRIX];
        matrix[0] = 1;
        matrix[BITS_PER_MATRIX - 1] = 1;
        let rows = BinaryMatrixRank::pack(&matrix);
        assert_eq!(rows[0], 1 << 31);
        assert_eq!(rows[SIZE - 1], 1);
    }

    #[test]
    fn test_requires_38_matrices() {
        assert!(BinaryMatrixRank::new(20000).is_err());
        assert!(BinaryMatrixRank::new(38 * 1024).is_ok());
    }

    #[test]
    fn test_random_sequence_reference_value() {
        let bits = pseudo_random_bits(200 * 1024);
        let eval = BinaryMatrixRank::new(bits.len()).unwrap().evaluate(&bits);
        assert_eq!(eval.details, "full=61, full-1=107, lower=32, N=200");
        assert!((eval.statistics[0].score - 0.395842).abs() < 1e-6);
    }

    #[test]
    fn test_constant_sequence_fails() {
        let bits = vec![1u8; 100 * 1024];
        let eval = BinaryMatrixRank::new(bits.len()).unwrap().evaluate(&bits);
        assert!(eval.statistics[0].score < 1e-10);
    }
}
