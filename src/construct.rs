use crate::{BinaryMatrix, LdpcError};
use rand::seq::SliceRandom;
use rand::Rng;

/// Build a regular parity-check matrix with Gallager's block-stacking
/// construction.
///
/// The matrix has `n` columns and `n * p / q` rows; every column has weight
/// `p` and every row has weight `q`. The base block places each row's `q`
/// ones in a disjoint contiguous column range, and the remaining `p - 1`
/// blocks are column-permuted copies of it, stacked vertically.
///
/// The result is rank-deficient on purpose (each block's rows sum to the
/// all-ones vector); run [`reduce_to_full_rank`](crate::reduce_to_full_rank)
/// before triangulating.
pub fn construct_regular<R: Rng>(
    n: usize,
    p: usize,
    q: usize,
    rng: &mut R,
) -> Result<BinaryMatrix, LdpcError> {
    if n == 0 || p == 0 || q == 0 {
        return Err(LdpcError::InvalidParameter(
            "n, p and q must all be positive".to_string(),
        ));
    }
    if n % q != 0 {
        return Err(LdpcError::InvalidParameter(format!(
            "column count {} is not a multiple of row weight {}",
            n, q
        )));
    }

    let block_rows = n / q;
    let m = block_rows * p;
    let mut h = BinaryMatrix::zeros(m, n);

    // Base block: row i covers columns [i*q, (i+1)*q).
    for i in 0..block_rows {
        for j in i * q..(i + 1) * q {
            h.set(i, j, true);
        }
    }

    // Each further block permutes the base block's column assignment.
    for b in 1..p {
        let mut perm: Vec<usize> = (0..n).collect();
        perm.shuffle(rng);
        for i in 0..block_rows {
            for (j, &src) in perm.iter().enumerate() {
                if h.get(i, src) {
                    h.set(b * block_rows + i, j, true);
                }
            }
        }
    }

    debug_assert!((0..m).all(|i| h.row_weight(i) == q));
    debug_assert!((0..n).all(|j| h.col_weight(j) == p));
    Ok(h)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn regular_weights() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let h = construct_regular(20, 3, 5, &mut rng).unwrap();
        assert_eq!(h.rows(), 12);
        assert_eq!(h.cols(), 20);
        for i in 0..h.rows() {
            assert_eq!(h.row_weight(i), 5);
        }
        for j in 0..h.cols() {
            assert_eq!(h.col_weight(j), 3);
        }
    }

    #[test]
    fn rejects_indivisible_length() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!(matches!(
            construct_regular(21, 3, 5, &mut rng),
            Err(LdpcError::InvalidParameter(_))
        ));
        assert!(matches!(
            construct_regular(20, 0, 5, &mut rng),
            Err(LdpcError::InvalidParameter(_))
        ));
    }

    #[test]
    fn expected_rank_deficiency() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let h = construct_regular(30, 3, 5, &mut rng).unwrap();
        // Each of the p block's rows sums to all-ones, giving p - 1
        // structural dependencies.
        assert!(h.rank() <= h.rows() - 3 + 1);
    }

    #[test]
    fn reproducible_for_a_seed() {
        let a = construct_regular(20, 3, 4, &mut ChaCha8Rng::seed_from_u64(42)).unwrap();
        let b = construct_regular(20, 3, 4, &mut ChaCha8Rng::seed_from_u64(42)).unwrap();
        assert_eq!(a, b);
    }
}
