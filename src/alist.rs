//! Plain-text "alist" sparse-matrix interchange format.
//!
//! Layout: a two-line header (`cols rows`, then `max_col_weight
//! max_row_weight`), the per-column weights, the per-row weights, then one
//! line per column and one line per row listing the 1-based indices of the
//! nonzero entries. Reading reconstructs the matrix from the per-column
//! section only; the per-row section is not cross-validated. Zero entries in
//! an index line are accepted as padding and skipped.

use crate::{BinaryMatrix, LdpcError};
use std::fs;
use std::path::Path;

/// Render a matrix in alist form.
pub fn to_alist(m: &BinaryMatrix) -> String {
    let rows = m.rows();
    let cols = m.cols();
    let col_weights: Vec<usize> = (0..cols).map(|j| m.col_weight(j)).collect();
    let row_weights: Vec<usize> = (0..rows).map(|i| m.row_weight(i)).collect();

    let mut out = String::new();
    out.push_str(&format!("{} {}\n", cols, rows));
    out.push_str(&format!(
        "{} {}\n",
        col_weights.iter().max().copied().unwrap_or(0),
        row_weights.iter().max().copied().unwrap_or(0)
    ));
    out.push_str(&join(col_weights.iter().copied()));
    out.push('\n');
    out.push_str(&join(row_weights.iter().copied()));
    out.push('\n');
    for j in 0..cols {
        out.push_str(&join((0..rows).filter(|&i| m.get(i, j)).map(|i| i + 1)));
        out.push('\n');
    }
    for i in 0..rows {
        out.push_str(&join((0..cols).filter(|&j| m.get(i, j)).map(|j| j + 1)));
        out.push('\n');
    }
    out
}

/// Parse an alist document back into a matrix.
///
/// Fails with [`LdpcError::MalformedAlist`] on bad dimensions, a column index
/// line that disagrees with its declared weight, or an out-of-range index.
pub fn from_alist(text: &str) -> Result<BinaryMatrix, LdpcError> {
    let mut lines = text.lines();
    let (cols, rows) = parse_pair(lines.next(), "size header")?;
    if cols == 0 || rows == 0 {
        return Err(LdpcError::MalformedAlist(format!(
            "bad dimensions {}x{}",
            rows, cols
        )));
    }
    // The maximum-weight header is consumed but not trusted.
    parse_pair(lines.next(), "weight header")?;

    let col_weights = parse_ints(lines.next(), "column weights")?;
    if col_weights.len() != cols {
        return Err(LdpcError::MalformedAlist(format!(
            "expected {} column weights, found {}",
            cols,
            col_weights.len()
        )));
    }
    let row_weights = parse_ints(lines.next(), "row weights")?;
    if row_weights.len() != rows {
        return Err(LdpcError::MalformedAlist(format!(
            "expected {} row weights, found {}",
            rows,
            row_weights.len()
        )));
    }

    let mut m = BinaryMatrix::zeros(rows, cols);
    for (j, &weight) in col_weights.iter().enumerate() {
        let entries = parse_ints(lines.next(), "column index line")?;
        // MacKay-style padding: zeros fill short lines out to the maximum
        // weight and carry no entry.
        let entries: Vec<usize> = entries.into_iter().filter(|&e| e != 0).collect();
        if entries.len() != weight {
            return Err(LdpcError::MalformedAlist(format!(
                "column {} lists {} entries but declares weight {}",
                j + 1,
                entries.len(),
                weight
            )));
        }
        for row in entries {
            if row > rows {
                return Err(LdpcError::MalformedAlist(format!(
                    "column {} references row {} of {}",
                    j + 1,
                    row,
                    rows
                )));
            }
            m.set(row - 1, j, true);
        }
    }
    // Per-row index lines are intentionally ignored.
    Ok(m)
}

/// Write a matrix to an alist file.
pub fn write_alist_file<P: AsRef<Path>>(path: P, m: &BinaryMatrix) -> Result<(), LdpcError> {
    fs::write(path, to_alist(m))?;
    Ok(())
}

/// Read a matrix from an alist file.
pub fn read_alist_file<P: AsRef<Path>>(path: P) -> Result<BinaryMatrix, LdpcError> {
    let text = fs::read_to_string(path)?;
    from_alist(&text)
}

fn join(values: impl Iterator<Item = usize>) -> String {
    values
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

fn parse_ints(line: Option<&str>, what: &str) -> Result<Vec<usize>, LdpcError> {
    let line = line.ok_or_else(|| LdpcError::MalformedAlist(format!("missing {}", what)))?;
    line.split_whitespace()
        .map(|tok| {
            tok.parse::<usize>()
                .map_err(|_| LdpcError::MalformedAlist(format!("bad integer {:?} in {}", tok, what)))
        })
        .collect()
}

fn parse_pair(line: Option<&str>, what: &str) -> Result<(usize, usize), LdpcError> {
    let values = parse_ints(line, what)?;
    match values[..] {
        [a, b] => Ok((a, b)),
        _ => Err(LdpcError::MalformedAlist(format!(
            "expected two integers in {}",
            what
        ))),
    }
}
