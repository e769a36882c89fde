use crate::LdpcError;

/// Dense matrix over GF(2), with each row packed into 64-bit words.
///
/// All arithmetic is exact mod 2. Operations either mutate a caller-owned
/// matrix in place (`swap_rows`, `xor_rows`, ...) or return a fresh matrix
/// (`transpose`, `multiply`, `invert`, ...); nothing aliases shared state.
///
/// Padding bits past `cols` in the last word of each row are kept at zero by
/// every mutator, so whole-word comparisons and popcounts are valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryMatrix {
    rows: usize,
    cols: usize,
    words_per_row: usize,
    data: Vec<u64>,
}

impl BinaryMatrix {
    /// All-zero matrix. Zero-sized dimensions are allowed; they show up as
    /// empty blocks during triangulation.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        let words_per_row = (cols + 63) / 64;
        Self {
            rows,
            cols,
            words_per_row,
            data: vec![0u64; rows * words_per_row],
        }
    }

    /// n-by-n identity matrix.
    pub fn identity(n: usize) -> Self {
        let mut m = Self::zeros(n, n);
        for i in 0..n {
            m.set(i, i, true);
        }
        m
    }

    /// Build from explicit 0/1 rows. Panics if the rows are jagged.
    pub fn from_rows(rows: &[Vec<u8>]) -> Self {
        let n_cols = rows.first().map_or(0, |r| r.len());
        let mut m = Self::zeros(rows.len(), n_cols);
        for (i, row) in rows.iter().enumerate() {
            assert_eq!(row.len(), n_cols, "jagged row {}", i);
            for (j, &bit) in row.iter().enumerate() {
                if bit != 0 {
                    m.set(i, j, true);
                }
            }
        }
        m
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> bool {
        assert!(row < self.rows && col < self.cols, "index out of bounds");
        let word = row * self.words_per_row + col / 64;
        self.data[word] & (1u64 << (col % 64)) != 0
    }

    pub fn set(&mut self, row: usize, col: usize, value: bool) {
        assert!(row < self.rows && col < self.cols, "index out of bounds");
        let word = row * self.words_per_row + col / 64;
        let mask = 1u64 << (col % 64);
        if value {
            self.data[word] |= mask;
        } else {
            self.data[word] &= !mask;
        }
    }

    pub fn flip(&mut self, row: usize, col: usize) {
        assert!(row < self.rows && col < self.cols, "index out of bounds");
        let word = row * self.words_per_row + col / 64;
        self.data[word] ^= 1u64 << (col % 64);
    }

    /// Number of ones in a row.
    pub fn row_weight(&self, row: usize) -> usize {
        assert!(row < self.rows, "row out of bounds");
        let base = row * self.words_per_row;
        self.data[base..base + self.words_per_row]
            .iter()
            .map(|w| w.count_ones() as usize)
            .sum()
    }

    /// Number of ones in a column.
    pub fn col_weight(&self, col: usize) -> usize {
        (0..self.rows).filter(|&i| self.get(i, col)).count()
    }

    pub fn is_zero(&self) -> bool {
        self.data.iter().all(|&w| w == 0)
    }

    pub fn swap_rows(&mut self, row1: usize, row2: usize) {
        assert!(row1 < self.rows && row2 < self.rows, "row out of bounds");
        if row1 == row2 {
            return;
        }
        for w in 0..self.words_per_row {
            self.data
                .swap(row1 * self.words_per_row + w, row2 * self.words_per_row + w);
        }
    }

    pub fn swap_cols(&mut self, col1: usize, col2: usize) {
        assert!(col1 < self.cols && col2 < self.cols, "column out of bounds");
        if col1 == col2 {
            return;
        }
        for i in 0..self.rows {
            let a = self.get(i, col1);
            let b = self.get(i, col2);
            if a != b {
                self.set(i, col1, b);
                self.set(i, col2, a);
            }
        }
    }

    /// Mod-2 row addition: `dest ^= src`.
    pub fn xor_rows(&mut self, dest: usize, src: usize) {
        assert!(dest < self.rows && src < self.rows, "row out of bounds");
        assert_ne!(dest, src, "xor of a row with itself");
        for w in 0..self.words_per_row {
            let s = self.data[src * self.words_per_row + w];
            self.data[dest * self.words_per_row + w] ^= s;
        }
    }

    /// Copy of the half-open block `[row_start, row_end) x [col_start, col_end)`.
    pub fn submatrix(
        &self,
        row_start: usize,
        row_end: usize,
        col_start: usize,
        col_end: usize,
    ) -> Result<Self, LdpcError> {
        if row_start > row_end
            || col_start > col_end
            || row_end > self.rows
            || col_end > self.cols
        {
            return Err(LdpcError::InvalidParameter(format!(
                "submatrix [{}, {}) x [{}, {}) out of a {}x{} matrix",
                row_start, row_end, col_start, col_end, self.rows, self.cols
            )));
        }
        let mut out = Self::zeros(row_end - row_start, col_end - col_start);
        for i in row_start..row_end {
            for j in col_start..col_end {
                if self.get(i, j) {
                    out.set(i - row_start, j - col_start, true);
                }
            }
        }
        Ok(out)
    }

    pub fn transpose(&self) -> Self {
        let mut out = Self::zeros(self.cols, self.rows);
        for i in 0..self.rows {
            for j in 0..self.cols {
                if self.get(i, j) {
                    out.set(j, i, true);
                }
            }
        }
        out
    }

    /// Mod-2 matrix product `self * other`.
    pub fn multiply(&self, other: &Self) -> Result<Self, LdpcError> {
        if self.cols != other.rows {
            return Err(LdpcError::InvalidParameter(format!(
                "cannot multiply {}x{} by {}x{}",
                self.rows, self.cols, other.rows, other.cols
            )));
        }
        let mut out = Self::zeros(self.rows, other.cols);
        for i in 0..self.rows {
            for k in 0..self.cols {
                if self.get(i, k) {
                    for w in 0..out.words_per_row {
                        let s = other.data[k * other.words_per_row + w];
                        out.data[i * out.words_per_row + w] ^= s;
                    }
                }
            }
        }
        Ok(out)
    }

    /// Entrywise mod-2 sum `self + other`.
    pub fn xor(&self, other: &Self) -> Result<Self, LdpcError> {
        if self.rows != other.rows || self.cols != other.cols {
            return Err(LdpcError::InvalidParameter(format!(
                "cannot add {}x{} to {}x{}",
                self.rows, self.cols, other.rows, other.cols
            )));
        }
        let mut out = self.clone();
        for (d, s) in out.data.iter_mut().zip(other.data.iter()) {
            *d ^= s;
        }
        Ok(out)
    }

    /// Number of linearly independent rows, by forward Gaussian elimination
    /// over GF(2) on a scratch copy.
    pub fn rank(&self) -> usize {
        let mut work = self.clone();
        let mut r = 0;
        for c in 0..work.cols {
            if r == work.rows {
                break;
            }
            let Some(pivot) = (r..work.rows).find(|&i| work.get(i, c)) else {
                continue;
            };
            work.swap_rows(r, pivot);
            for i in 0..work.rows {
                if i != r && work.get(i, c) {
                    work.xor_rows(i, r);
                }
            }
            r += 1;
        }
        r
    }

    /// Exact inverse over GF(2) by Gauss-Jordan elimination, reducing the
    /// matrix while applying the same operations to an identity companion.
    ///
    /// Fails with [`LdpcError::SingularMatrix`] when some column has no pivot,
    /// and with [`LdpcError::InvalidParameter`] on non-square input.
    pub fn invert(&self) -> Result<Self, LdpcError> {
        if self.rows != self.cols {
            return Err(LdpcError::InvalidParameter(format!(
                "cannot invert a {}x{} matrix",
                self.rows, self.cols
            )));
        }
        let n = self.rows;
        let mut work = self.clone();
        let mut inv = Self::identity(n);
        for c in 0..n {
            let pivot = (c..n)
                .find(|&i| work.get(i, c))
                .ok_or(LdpcError::SingularMatrix)?;
            work.swap_rows(c, pivot);
            inv.swap_rows(c, pivot);
            for i in 0..n {
                if i != c && work.get(i, c) {
                    work.xor_rows(i, c);
                    inv.xor_rows(i, c);
                }
            }
        }
        Ok(inv)
    }

    /// New matrix whose entry `(i, j)` is `self[row_order[i], col_order[j]]`.
    pub fn permuted(&self, row_order: &[usize], col_order: &[usize]) -> Self {
        assert_eq!(row_order.len(), self.rows, "row permutation length");
        assert_eq!(col_order.len(), self.cols, "column permutation length");
        let mut out = Self::zeros(self.rows, self.cols);
        for (i, &src_row) in row_order.iter().enumerate() {
            for (j, &src_col) in col_order.iter().enumerate() {
                if self.get(src_row, src_col) {
                    out.set(i, j, true);
                }
            }
        }
        out
    }

    /// Column permutation: column `j` of the result is column `col_order[j]`
    /// of `self`.
    pub fn permute_columns(&self, col_order: &[usize]) -> Self {
        let row_order: Vec<usize> = (0..self.rows).collect();
        self.permuted(&row_order, col_order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    fn random_matrix(rng: &mut ChaCha8Rng, rows: usize, cols: usize) -> BinaryMatrix {
        let mut m = BinaryMatrix::zeros(rows, cols);
        for i in 0..rows {
            for j in 0..cols {
                if rng.gen_bool(0.5) {
                    m.set(i, j, true);
                }
            }
        }
        m
    }

    #[test]
    fn set_get_flip() {
        let mut m = BinaryMatrix::zeros(3, 70);
        m.set(1, 65, true);
        assert!(m.get(1, 65));
        assert!(!m.get(1, 64));
        m.flip(1, 65);
        assert!(!m.get(1, 65));
        assert!(m.is_zero());
    }

    #[test]
    fn row_and_column_swaps() {
        let mut m = BinaryMatrix::from_rows(&[vec![1, 0, 0], vec![0, 1, 1]]);
        m.swap_rows(0, 1);
        assert_eq!(m, BinaryMatrix::from_rows(&[vec![0, 1, 1], vec![1, 0, 0]]));
        m.swap_cols(0, 2);
        assert_eq!(m, BinaryMatrix::from_rows(&[vec![1, 1, 0], vec![0, 0, 1]]));
    }

    #[test]
    fn xor_rows_is_mod2_addition() {
        let mut m = BinaryMatrix::from_rows(&[vec![1, 1, 0], vec![0, 1, 1]]);
        m.xor_rows(0, 1);
        assert_eq!(m, BinaryMatrix::from_rows(&[vec![1, 0, 1], vec![0, 1, 1]]));
    }

    #[test]
    fn multiply_known_product() {
        let a = BinaryMatrix::from_rows(&[vec![1, 0, 1], vec![0, 1, 0]]);
        let b = BinaryMatrix::from_rows(&[vec![0, 1], vec![1, 0], vec![0, 1]]);
        let p = a.multiply(&b).unwrap();
        // row 0: (0,1) + (0,1) = (0,0); row 1: (1,0)
        assert_eq!(p, BinaryMatrix::from_rows(&[vec![0, 0], vec![1, 0]]));
    }

    #[test]
    fn multiply_dimension_mismatch() {
        let a = BinaryMatrix::zeros(2, 3);
        let b = BinaryMatrix::zeros(2, 3);
        assert!(matches!(
            a.multiply(&b),
            Err(LdpcError::InvalidParameter(_))
        ));
    }

    #[test]
    fn transpose_roundtrip() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let m = random_matrix(&mut rng, 5, 9);
        assert_eq!(m.transpose().transpose(), m);
    }

    #[test]
    fn submatrix_block() {
        let m = BinaryMatrix::from_rows(&[vec![1, 1, 0, 0], vec![0, 1, 1, 0], vec![0, 0, 1, 1]]);
        let b = m.submatrix(1, 3, 1, 3).unwrap();
        assert_eq!(b, BinaryMatrix::from_rows(&[vec![1, 1], vec![0, 1]]));
        // empty blocks are fine
        let e = m.submatrix(1, 3, 4, 4).unwrap();
        assert_eq!(e.rows(), 2);
        assert_eq!(e.cols(), 0);
        assert!(e.is_zero());
        assert!(m.submatrix(0, 4, 0, 2).is_err());
    }

    #[test]
    fn rank_of_known_matrices() {
        assert_eq!(BinaryMatrix::identity(6).rank(), 6);
        assert_eq!(BinaryMatrix::zeros(4, 4).rank(), 0);
        let m = BinaryMatrix::from_rows(&[vec![1, 1, 0], vec![0, 1, 1], vec![1, 0, 1]]);
        // third row is the sum of the first two
        assert_eq!(m.rank(), 2);
    }

    #[test]
    fn invert_random_nonsingular() {
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        let mut tested = 0;
        while tested < 50 {
            let n = rng.gen_range(1..=16);
            let a = random_matrix(&mut rng, n, n);
            if a.rank() < n {
                continue;
            }
            let inv = a.invert().unwrap();
            assert_eq!(a.multiply(&inv).unwrap(), BinaryMatrix::identity(n));
            assert_eq!(inv.multiply(&a).unwrap(), BinaryMatrix::identity(n));
            tested += 1;
        }
    }

    #[test]
    fn invert_singular_fails() {
        // zero row makes the matrix singular
        let m = BinaryMatrix::from_rows(&[vec![1, 0, 1], vec![0, 0, 0], vec![0, 1, 1]]);
        assert!(matches!(m.invert(), Err(LdpcError::SingularMatrix)));
    }

    #[test]
    fn invert_non_square_rejected() {
        let m = BinaryMatrix::zeros(2, 3);
        assert!(matches!(m.invert(), Err(LdpcError::InvalidParameter(_))));
    }

    #[test]
    fn permuted_reorders_entries() {
        let m = BinaryMatrix::from_rows(&[vec![1, 0, 0], vec![0, 1, 0]]);
        let p = m.permuted(&[1, 0], &[2, 1, 0]);
        assert_eq!(p, BinaryMatrix::from_rows(&[vec![0, 1, 0], vec![0, 0, 1]]));
        let c = m.permute_columns(&[1, 0, 2]);
        assert_eq!(c, BinaryMatrix::from_rows(&[vec![0, 1, 0], vec![1, 0, 0]]));
    }
}
