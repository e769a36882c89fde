use crate::{BinaryMatrix, LdpcError};

/// Systematic generator matrix `G = [I_k | M^T]` together with the column
/// ordering under which it pairs with the parity-check matrix it was derived
/// from.
#[derive(Debug, Clone)]
pub struct SystematicGenerator {
    /// The k-by-n generator matrix.
    pub matrix: BinaryMatrix,
    /// Maps a column position of the systematic form back to the column index
    /// of the original parity-check matrix.
    pub column_order: Vec<usize>,
}

impl SystematicGenerator {
    pub fn n(&self) -> usize {
        self.matrix.cols()
    }

    pub fn k(&self) -> usize {
        self.matrix.rows()
    }

    /// The original parity-check matrix reordered to match this generator,
    /// so that `permuted_parity_check(h) * G^T = 0`.
    pub fn permuted_parity_check(&self, h: &BinaryMatrix) -> BinaryMatrix {
        h.permute_columns(&self.column_order)
    }
}

/// Derive a systematic generator matrix from a full-rank parity-check matrix.
///
/// Gauss-Jordan elimination (recording the column permutation) brings H to
/// `[I | M]`; the two column blocks are swapped to `[M | I]` and the
/// generator is assembled as `G = [I_k | M^T]`, which satisfies
/// `H_pi * G^T = 0` for H in the returned column order. A caller that encodes
/// with G must apply the same column ordering consistently.
///
/// Fails with [`LdpcError::NotFullRank`] when a pivot is missing, which means
/// the input had dependent rows.
pub fn build_generator(h: &BinaryMatrix) -> Result<SystematicGenerator, LdpcError> {
    let m = h.rows();
    let n = h.cols();
    if m == 0 || n <= m {
        return Err(LdpcError::InvalidParameter(format!(
            "a {}x{} parity-check matrix admits no generator",
            m, n
        )));
    }
    let k = n - m;

    let mut work = h.clone();
    let mut col_order: Vec<usize> = (0..n).collect();
    for i in 0..m {
        let j = (i..n)
            .find(|&j| work.get(i, col_order[j]))
            .ok_or(LdpcError::NotFullRank)?;
        col_order.swap(i, j);
        for r in 0..m {
            if r != i && work.get(r, col_order[i]) {
                work.xor_rows(r, i);
            }
        }
    }

    // work under col_order is [I_m | M]; swapping the blocks gives [M | I_m],
    // and G = [I_k | M^T] pairs with that ordering.
    let mut g = BinaryMatrix::zeros(k, n);
    for i in 0..k {
        g.set(i, i, true);
        for r in 0..m {
            if work.get(r, col_order[m + i]) {
                g.set(i, k + r, true);
            }
        }
    }
    let column_order: Vec<usize> = col_order[m..]
        .iter()
        .chain(col_order[..m].iter())
        .copied()
        .collect();

    Ok(SystematicGenerator {
        matrix: g,
        column_order,
    })
}
