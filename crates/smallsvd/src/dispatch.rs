//! Size dispatch over the supported matrix dimensions.
//!
//! The dimension is carried by the [`SquareMatrix`] tag, so the 2×2/3×3
//! selection is resolved once per call on the variant, not per element;
//! unsupported dimensions are rejected when the tag is built, before any
//! numerical work.

use glam::{DMat2, DMat3, DVec2, DVec3};

use crate::error::DecompError;
use crate::precision::Precision;
use crate::svd2;
use crate::svd3;

/// A square matrix tagged by one of the two supported sizes.
///
/// Entries are stored in double precision; the [`Precision`] tag passed
/// to the entry points selects the arithmetic width of the computation.
#[derive(Debug, Clone, Copy)]
pub enum SquareMatrix {
    /// A 2×2 matrix.
    Size2(DMat2),
    /// A 3×3 matrix.
    Size3(DMat3),
}

impl SquareMatrix {
    /// Build a size-tagged matrix from row-major entries.
    ///
    /// Dimensions other than 2 and 3 are rejected with
    /// [`DecompError::UnsupportedMatrixSize`]; an entry count that does
    /// not match the dimension with [`DecompError::ShapeMismatch`].
    pub fn from_rows(dim: usize, entries: &[f64]) -> Result<Self, DecompError> {
        match dim {
            2 => {
                if entries.len() != 4 {
                    return Err(DecompError::ShapeMismatch {
                        expected: 4,
                        got: entries.len(),
                    });
                }
                Ok(SquareMatrix::Size2(DMat2::from_cols(
                    DVec2::new(entries[0], entries[2]),
                    DVec2::new(entries[1], entries[3]),
                )))
            }
            3 => {
                if entries.len() != 9 {
                    return Err(DecompError::ShapeMismatch {
                        expected: 9,
                        got: entries.len(),
                    });
                }
                Ok(SquareMatrix::Size3(DMat3::from_cols(
                    DVec3::new(entries[0], entries[3], entries[6]),
                    DVec3::new(entries[1], entries[4], entries[7]),
                    DVec3::new(entries[2], entries[5], entries[8]),
                )))
            }
            other => Err(DecompError::UnsupportedMatrixSize(other)),
        }
    }

    /// The dimension carried by the tag.
    pub fn dim(&self) -> usize {
        match self {
            SquareMatrix::Size2(_) => 2,
            SquareMatrix::Size3(_) => 3,
        }
    }
}

/// A size-tagged SVD result, `A = U * Σ * Vᵀ`.
#[derive(Debug, Clone)]
pub enum SvdDecomposition {
    /// Factors of a 2×2 input.
    Size2 {
        /// Left singular vectors.
        u: DMat2,
        /// Diagonal matrix of singular values, descending.
        s: DMat2,
        /// Right singular vectors.
        v: DMat2,
    },
    /// Factors of a 3×3 input.
    Size3 {
        /// Left singular vectors.
        u: DMat3,
        /// Diagonal matrix of singular values, descending magnitude.
        s: DMat3,
        /// Right singular vectors.
        v: DMat3,
    },
}

/// A size-tagged polar decomposition result, `A = R * S`.
#[derive(Debug, Clone)]
pub enum PolarDecomposition {
    /// Factors of a 2×2 input.
    Size2 {
        /// Rotation part.
        r: DMat2,
        /// Symmetric stretch part.
        s: DMat2,
    },
    /// Factors of a 3×3 input.
    Size3 {
        /// Rotation part.
        r: DMat3,
        /// Symmetric stretch part.
        s: DMat3,
    },
}

/// Singular value decomposition of a 2×2 or 3×3 matrix.
///
/// With [`Precision::Single`] the computation runs in 32-bit floats and
/// the results are widened back; with [`Precision::Double`] everything
/// stays in 64-bit floats.
pub fn svd(a: &SquareMatrix, precision: Precision) -> Result<SvdDecomposition, DecompError> {
    match (a, precision) {
        (SquareMatrix::Size2(m), Precision::Single) => {
            let out = svd2::svd2(&m.as_mat2());
            Ok(SvdDecomposition::Size2 {
                u: out.u().as_dmat2(),
                s: out.s().as_dmat2(),
                v: out.v().as_dmat2(),
            })
        }
        (SquareMatrix::Size2(m), Precision::Double) => {
            let out = svd2::svd2_f64(m);
            Ok(SvdDecomposition::Size2 {
                u: *out.u(),
                s: *out.s(),
                v: *out.v(),
            })
        }
        (SquareMatrix::Size3(m), Precision::Single) => {
            let out = svd3::svd3(&m.as_mat3())?;
            Ok(SvdDecomposition::Size3 {
                u: out.u().as_dmat3(),
                s: out.s().as_dmat3(),
                v: out.v().as_dmat3(),
            })
        }
        (SquareMatrix::Size3(m), Precision::Double) => {
            let out = svd3::svd3_f64(m)?;
            Ok(SvdDecomposition::Size3 {
                u: *out.u(),
                s: *out.s(),
                v: *out.v(),
            })
        }
    }
}

/// Polar decomposition of a 2×2 or 3×3 matrix.
///
/// See [`svd`] for how the precision tag is interpreted.
pub fn polar_decompose(
    a: &SquareMatrix,
    precision: Precision,
) -> Result<PolarDecomposition, DecompError> {
    match (a, precision) {
        (SquareMatrix::Size2(m), Precision::Single) => {
            let (r, s) = svd2::polar_decompose2(&m.as_mat2());
            Ok(PolarDecomposition::Size2 {
                r: r.as_dmat2(),
                s: s.as_dmat2(),
            })
        }
        (SquareMatrix::Size2(m), Precision::Double) => {
            let (r, s) = svd2::polar_decompose2_f64(m);
            Ok(PolarDecomposition::Size2 { r, s })
        }
        (SquareMatrix::Size3(m), Precision::Single) => {
            let (r, s) = svd3::polar_decompose3(&m.as_mat3())?;
            Ok(PolarDecomposition::Size3 {
                r: r.as_dmat3(),
                s: s.as_dmat3(),
            })
        }
        (SquareMatrix::Size3(m), Precision::Double) => {
            let (r, s) = svd3::polar_decompose3_f64(m)?;
            Ok(PolarDecomposition::Size3 { r, s })
        }
    }
}
