use crate::BinaryMatrix;

/// Strip linearly dependent rows by forward Gaussian elimination over GF(2),
/// returning a matrix whose row count equals the rank of the input.
///
/// For each pivot position the eligible columns at or after the diagonal are
/// searched for a one; the found column is swapped to the diagonal and xored
/// out of every other row. A row with no eligible one is dependent: it is
/// rotated to the bottom (a stable move preserving the order of the rows
/// below it) and excluded from the output.
///
/// Row and column moves are tracked as index permutations over the scratch
/// copy rather than by slicing the matrix itself, and the surviving rows are
/// materialized once at the end in the discovered column order.
///
/// Note that a regular input does not stay regular: row and column weights
/// are generally uneven after reduction.
pub fn reduce_to_full_rank(h: &BinaryMatrix) -> BinaryMatrix {
    let m = h.rows();
    let n = h.cols();
    let mut work = h.clone();
    let mut row_order: Vec<usize> = (0..m).collect();
    let mut col_order: Vec<usize> = (0..n).collect();

    let mut limit = m;
    let mut i = 0;
    while i < limit {
        match (i..n).find(|&j| work.get(row_order[i], col_order[j])) {
            Some(j) => {
                col_order.swap(i, j);
                for r in 0..m {
                    if r != i && work.get(row_order[r], col_order[i]) {
                        work.xor_rows(row_order[r], row_order[i]);
                    }
                }
                i += 1;
            }
            None => {
                // Dependent row: rotate to the bottom and shrink the
                // eligible range.
                let dropped = row_order.remove(i);
                row_order.push(dropped);
                limit -= 1;
            }
        }
    }

    let rank = limit;
    let mut out = BinaryMatrix::zeros(rank, n);
    for i in 0..rank {
        for j in 0..n {
            if h.get(row_order[i], col_order[j]) {
                out.set(i, j, true);
            }
        }
    }
    out
}
