//! Richardson-Urbanke greedy upper-triangulation.
//!
//! Permutes a full-rank parity-check matrix into approximate upper-triangular
//! form `[T A B; E C D]` with a small gap `g`, then verifies that the Schur
//! complement `phi = C - E T^-1 A` is nonsingular, which is what makes the
//! permuted matrix usable for linear-time systematic encoding. Column
//! selection ties and the recovery shuffles are driven by an injected seedable
//! generator, so a given seed reproduces a run exactly.

use crate::{BinaryMatrix, Diagnostics, LdpcError};
use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;

/// Bound on the random row/column shuffles tried when the Schur complement
/// comes out singular.
pub const MAX_SHUFFLES: usize = 300;

/// Per-attempt triangulation failure. These are expected outcomes of the
/// randomized search; [`best_matrix`] swallows them and retries.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriangulationError {
    /// The permutation came out with no gap at all.
    #[error("triangulation produced a gap of zero")]
    ZeroGap,
    /// The residual block had no column with a positive degree.
    #[error("residual block has no nonzero column")]
    EmptyResidual,
    /// The C and D blocks are all zero, so no shuffle can repair phi.
    #[error("C and D blocks are all zero; phi cannot be made nonsingular")]
    UnshufflableGap,
    /// No nonsingular phi was found within the shuffle budget.
    #[error("no nonsingular phi within the shuffle budget")]
    ShuffleBudgetExhausted,
}

/// Outcome of one successful triangulation attempt.
#[derive(Debug, Clone)]
pub struct TriangulationResult {
    /// Size of the upper-triangular prefix.
    pub t: usize,
    /// Gap size; `t + g` equals the row count of the matrix.
    pub g: usize,
    /// The fully permuted parity-check matrix.
    pub matrix: BinaryMatrix,
}

/// Run a single greedy triangulation attempt on a full-rank matrix.
///
/// Fails with [`LdpcError::NotFullRank`] if the input has dependent rows, and
/// with [`LdpcError::Triangulation`] when the randomized attempt itself comes
/// up empty. The input is never modified; a result is published only on
/// success.
pub fn greedy_upper_triangulation<R: Rng>(
    h: &BinaryMatrix,
    rng: &mut R,
    diag: &Diagnostics,
) -> Result<TriangulationResult, LdpcError> {
    if h.rank() != h.rows() {
        return Err(LdpcError::NotFullRank);
    }
    attempt(h, rng, diag)
}

fn attempt<R: Rng>(
    h: &BinaryMatrix,
    rng: &mut R,
    diag: &Diagnostics,
) -> Result<TriangulationResult, LdpcError> {
    let m = h.rows();
    let n = h.cols();
    let mut row_order: Vec<usize> = (0..m).collect();
    let mut col_order: Vec<usize> = (0..n).collect();
    let mut t = 0;
    let mut g = 0;

    while t != m - g {
        // Residual block: rows [t, m - g), columns [t, n). Find the columns
        // of minimum positive degree within it.
        let mut min_degree = usize::MAX;
        let mut candidates: Vec<usize> = Vec::new();
        for j in t..n {
            let degree = (t..m - g)
                .filter(|&i| h.get(row_order[i], col_order[j]))
                .count();
            if degree == 0 {
                continue;
            }
            if degree < min_degree {
                min_degree = degree;
                candidates.clear();
            }
            if degree == min_degree {
                candidates.push(j);
            }
        }
        if candidates.is_empty() {
            return Err(TriangulationError::EmptyResidual.into());
        }
        let chosen = candidates[rng.gen_range(0..candidates.len())];
        col_order.swap(t, chosen);

        let one_positions: Vec<usize> = (t..m - g)
            .filter(|&i| h.get(row_order[i], col_order[t]))
            .collect();
        row_order.swap(t, one_positions[0]);

        if min_degree > 1 {
            // "Choose" step: the surplus rows holding a one rotate into the
            // gap region, keeping their relative order.
            let moved: Vec<usize> = one_positions[1..].iter().map(|&p| row_order[p]).collect();
            for &p in one_positions[1..].iter().rev() {
                row_order.remove(p);
            }
            let insert_at = row_order.len() - g;
            for (k, r) in moved.into_iter().enumerate() {
                row_order.insert(insert_at + k, r);
            }
            g += min_degree - 1;
        }
        t += 1;
    }

    if g == 0 {
        // Preserved behavior: a zero gap is rejected even though the matrix
        // is fully triangular.
        return Err(TriangulationError::ZeroGap.into());
    }

    let permuted = h.permuted(&row_order, &col_order);
    let resolved = resolve_gap(permuted, t, g, rng, diag)?;
    Ok(TriangulationResult {
        t,
        g,
        matrix: resolved,
    })
}

/// Check the Schur complement of a permuted matrix and, when it is singular,
/// retry with random row shuffles in the gap rows and column shuffles in
/// `[t, n)` up to [`MAX_SHUFFLES`] times.
fn resolve_gap<R: Rng>(
    mut hp: BinaryMatrix,
    t: usize,
    g: usize,
    rng: &mut R,
    diag: &Diagnostics,
) -> Result<BinaryMatrix, LdpcError> {
    debug_assert_eq!(t + g, hp.rows());
    let m = hp.rows();
    let n = hp.cols();

    if schur_complement(&hp, t, g)?.rank() == g {
        return Ok(hp);
    }

    let c = hp.submatrix(t, m, t, t + g)?;
    let d = hp.submatrix(t, m, t + g, n)?;
    if c.is_zero() && d.is_zero() {
        return Err(TriangulationError::UnshufflableGap.into());
    }

    let mut row_order: Vec<usize> = (0..m).collect();
    let mut col_order: Vec<usize> = (0..n).collect();
    for shuffle in 1..=MAX_SHUFFLES {
        row_order[t..].shuffle(rng);
        col_order[t..].shuffle(rng);
        hp = hp.permuted(&row_order, &col_order);
        if schur_complement(&hp, t, g)?.rank() == g {
            diag.note(&format!(
                "found a nonsingular phi after {} gap shuffles",
                shuffle
            ));
            return Ok(hp);
        }
    }
    Err(TriangulationError::ShuffleBudgetExhausted.into())
}

/// `phi = C - E T^-1 A` over GF(2).
fn schur_complement(hp: &BinaryMatrix, t: usize, g: usize) -> Result<BinaryMatrix, LdpcError> {
    let m = hp.rows();
    let tri = hp.submatrix(0, t, 0, t)?;
    let a = hp.submatrix(0, t, t, t + g)?;
    let e = hp.submatrix(t, m, 0, t)?;
    let c = hp.submatrix(t, m, t, t + g)?;
    c.xor(&e.multiply(&tri.invert()?)?.multiply(&a)?)
}

/// Repeat [`greedy_upper_triangulation`] up to `iterations` times and keep
/// the success with the smallest gap. Attempt-level failures are counted and
/// swallowed; [`LdpcError::NoSolutionFound`] is returned only when every
/// attempt fails.
pub fn best_matrix<R: Rng>(
    h: &BinaryMatrix,
    iterations: usize,
    rng: &mut R,
    diag: &Diagnostics,
) -> Result<TriangulationResult, LdpcError> {
    if iterations == 0 {
        return Err(LdpcError::InvalidParameter(
            "iteration budget must be positive".to_string(),
        ));
    }
    if h.rank() != h.rows() {
        return Err(LdpcError::NotFullRank);
    }

    let mut best: Option<TriangulationResult> = None;
    let mut failures = 0;
    for _ in 0..iterations {
        match attempt(h, rng, diag) {
            Ok(result) => {
                if best.as_ref().map_or(true, |b| result.g < b.g) {
                    diag.note(&format!("new best gap: {}", result.g));
                    best = Some(result);
                }
            }
            Err(LdpcError::Triangulation(e)) => {
                diag.note(&format!("triangulation attempt failed: {}", e));
                failures += 1;
            }
            Err(LdpcError::SingularMatrix) => {
                failures += 1;
            }
            Err(other) => return Err(other),
        }
    }
    best.ok_or(LdpcError::NoSolutionFound {
        attempts: iterations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{construct_regular, reduce_to_full_rank};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn reduced_regular(n: usize, p: usize, q: usize, seed: u64) -> BinaryMatrix {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let h = construct_regular(n, p, q, &mut rng).unwrap();
        reduce_to_full_rank(&h)
    }

    #[test]
    fn rejects_rank_deficient_input() {
        let mut h = BinaryMatrix::identity(4);
        h.set(2, 2, false);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let diag = Diagnostics::quiet();
        assert!(matches!(
            greedy_upper_triangulation(&h, &mut rng, &diag),
            Err(LdpcError::NotFullRank)
        ));
    }

    #[test]
    fn identity_matrix_has_zero_gap() {
        let h = BinaryMatrix::identity(5);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let diag = Diagnostics::quiet();
        assert!(matches!(
            greedy_upper_triangulation(&h, &mut rng, &diag),
            Err(LdpcError::Triangulation(TriangulationError::ZeroGap))
        ));
    }

    #[test]
    fn triangulates_a_regular_code() {
        let h = reduced_regular(40, 3, 5, 11);
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let diag = Diagnostics::quiet();
        let result = best_matrix(&h, 30, &mut rng, &diag).unwrap();

        assert_eq!(result.t + result.g, h.rows());
        assert!(result.g >= 1);
        assert_eq!(result.matrix.rows(), h.rows());
        assert_eq!(result.matrix.cols(), h.cols());
        // Row and column permutations preserve rank.
        assert_eq!(result.matrix.rank(), h.rank());
        // The prefix is upper triangular with a unit diagonal.
        for i in 0..result.t {
            assert!(result.matrix.get(i, i));
            for j in 0..i {
                assert!(!result.matrix.get(i, j));
            }
        }
        // phi is nonsingular on the published matrix.
        let phi = schur_complement(&result.matrix, result.t, result.g).unwrap();
        assert_eq!(phi.rank(), result.g);
    }

    #[test]
    fn best_matrix_is_reproducible() {
        // Same matrix and budget as `triangulates_a_regular_code`, which is
        // known to find a positive gap; not every (matrix, seed) pair does.
        let h = reduced_regular(40, 3, 5, 11);
        let diag = Diagnostics::quiet();
        let a = best_matrix(&h, 30, &mut ChaCha8Rng::seed_from_u64(11), &diag).unwrap();
        let b = best_matrix(&h, 30, &mut ChaCha8Rng::seed_from_u64(11), &diag).unwrap();
        assert_eq!(a.t, b.t);
        assert_eq!(a.g, b.g);
        assert_eq!(a.matrix, b.matrix);
    }

    #[test]
    fn zero_gap_search_exhausts_budget() {
        // Every attempt on the identity triangulates with g = 0 and fails.
        let h = BinaryMatrix::identity(6);
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        let diag = Diagnostics::quiet();
        assert!(matches!(
            best_matrix(&h, 25, &mut rng, &diag),
            Err(LdpcError::NoSolutionFound { attempts: 25 })
        ));
    }

    #[test]
    fn all_zero_c_and_d_fail_without_shuffling() {
        // Permuted matrix with t = 2, g = 1 whose gap row is zero outside the
        // prefix: phi = 0 and no shuffle can change that.
        let hp = BinaryMatrix::from_rows(&[
            vec![1, 1, 0, 0],
            vec![0, 1, 0, 0],
            vec![1, 0, 0, 0],
        ]);
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let diag = Diagnostics::quiet();
        assert!(matches!(
            resolve_gap(hp, 2, 1, &mut rng, &diag),
            Err(LdpcError::Triangulation(TriangulationError::UnshufflableGap))
        ));
    }

    #[test]
    fn shuffling_repairs_a_singular_phi() {
        // Here C = [0] but D = [1]; a column shuffle moves the one into C,
        // making phi nonsingular.
        let hp = BinaryMatrix::from_rows(&[
            vec![1, 1, 0, 0],
            vec![0, 1, 0, 0],
            vec![1, 0, 0, 1],
        ]);
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let diag = Diagnostics::quiet();
        let fixed = resolve_gap(hp, 2, 1, &mut rng, &diag).unwrap();
        assert!(fixed.get(2, 2));
        assert_eq!(schur_complement(&fixed, 2, 1).unwrap().rank(), 1);
    }
}
