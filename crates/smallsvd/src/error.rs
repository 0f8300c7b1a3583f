//! Error types for the decomposition entry points.

use thiserror::Error;

/// Errors surfaced by the decomposition routines.
///
/// All variants are precondition violations detected synchronously at the
/// call boundary; none are retried or masked internally.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecompError {
    /// The matrix dimension is not 2 or 3.
    #[error("unsupported matrix size {0}x{0}, only 2x2 and 3x3 matrices are supported")]
    UnsupportedMatrixSize(usize),

    /// The requested float width is neither 32 nor 64 bits.
    #[error("unsupported precision: {0}-bit floats are not supported, use 32 or 64")]
    UnsupportedPrecision(usize),

    /// The number of entries does not match the requested dimension.
    #[error("matrix shape mismatch: expected {expected} entries, got {got}")]
    ShapeMismatch {
        /// Entry count implied by the requested dimension.
        expected: usize,
        /// Entry count actually supplied.
        got: usize,
    },

    /// The external 3x3 solver returned a result of the wrong arity.
    ///
    /// This indicates a broken solver binding rather than bad input data.
    /// It is fatal and never retried.
    #[error("svd solver returned {got} values, expected {expected}")]
    SolverContractViolation {
        /// Arity required by the solver contract.
        expected: usize,
        /// Arity actually returned.
        got: usize,
    },
}
