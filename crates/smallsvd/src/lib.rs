#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

pub mod dispatch;
pub mod error;
pub mod precision;
pub mod solver;
/// Module with the closed-form 2x2 decompositions
pub mod svd2;
/// Module to calculate SVD of a 3x3 matrix through the solver port
pub mod svd3;

pub use dispatch::{polar_decompose, svd, PolarDecomposition, SquareMatrix, SvdDecomposition};
pub use error::DecompError;
pub use precision::Precision;
pub use solver::{JacobiSvd3, Svd3Solver};
