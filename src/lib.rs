//! Offline LDPC code design: construction of sparse binary parity-check
//! matrices, reduction to full rank, Richardson-Urbanke greedy
//! upper-triangulation with a bounded randomized search, exact GF(2)
//! inversion, systematic generator extraction, and alist serialization.
//!
//! This is a design-time tool, not a runtime codec: it cares about producing
//! an algebraically well-formed (H, G) pair that admits a linear-time
//! systematic encoder, not about throughput or error-correction performance.
//!
//! ```no_run
//! use ldpc_design::{generate_code, DesignConfig};
//!
//! let code = generate_code(200, 3, 5, &DesignConfig::default()).unwrap();
//! assert!(code.verify());
//! ```

pub mod alist;
pub mod construct;
pub mod design;
pub mod generator;
pub mod matrix;
pub mod reduce;
pub mod triangulate;

pub use alist::{from_alist, read_alist_file, to_alist, write_alist_file};
pub use construct::construct_regular;
pub use design::{generate_code, CodeMatrices, DesignConfig, DEFAULT_ITERATIONS};
pub use generator::{build_generator, SystematicGenerator};
pub use matrix::BinaryMatrix;
pub use reduce::reduce_to_full_rank;
pub use triangulate::{
    best_matrix, greedy_upper_triangulation, TriangulationError, TriangulationResult, MAX_SHUFFLES,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LdpcError {
    /// Bad construction parameters or mismatched dimensions. Never retried.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    /// A square matrix with no inverse over GF(2).
    #[error("matrix is singular")]
    SingularMatrix,
    /// Triangulation requires a full-rank input; reduce first.
    #[error("matrix is not full rank")]
    NotFullRank,
    /// One randomized triangulation attempt failed; the search retries these.
    #[error("triangulation failed: {0}")]
    Triangulation(#[from] TriangulationError),
    /// The best-matrix search exhausted its budget without one success.
    #[error("no encoder-friendly matrix found in {attempts} attempts")]
    NoSolutionFound { attempts: usize },
    /// An alist document that cannot be decoded.
    #[error("malformed alist: {0}")]
    MalformedAlist(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Explicit diagnostics sink threaded through the randomized searches in
/// place of any global verbosity state. Quiet by default; when verbose,
/// progress notes go to stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct Diagnostics {
    verbose: bool,
}

impl Diagnostics {
    pub fn quiet() -> Self {
        Self { verbose: false }
    }

    pub fn verbose() -> Self {
        Self { verbose: true }
    }

    pub(crate) fn note(&self, message: &str) {
        if self.verbose {
            eprintln!("{}", message);
        }
    }
}
