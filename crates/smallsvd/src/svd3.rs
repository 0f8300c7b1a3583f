//! SVD and polar decomposition of 3×3 matrices through the solver port.
//!
//! Unlike the 2×2 case there is no practical closed form, so this module
//! only marshals: it serializes the 9 row-major entries of the input,
//! hands them to a [`Svd3Solver`] together with a precision tag and a
//! sweep count, validates the arity of the 21 returned values, and
//! rebuilds `U`, `Σ` and `V` as fresh matrices. The diagonal of `Σ` is
//! written into a zero-initialized matrix, so any off-diagonal residue a
//! solver might carry never reaches the caller.
//!
//! # Example
//!
//! ```
//! use glam::Mat3;
//! use smallsvd::svd3::svd3;
//!
//! let a = Mat3::from_cols_array(&[
//!     1.0, 0.0, 0.0,
//!     0.0, 2.0, 0.0,
//!     0.0, 0.0, 3.0,
//! ]);
//!
//! let svd = svd3(&a).unwrap();
//! let reconstructed = *svd.u() * *svd.s() * svd.v().transpose();
//! assert!(a.abs_diff_eq(reconstructed, 1e-4));
//! ```

use glam::{DMat3, DVec3, Mat3};

use crate::error::DecompError;
use crate::precision::Precision;
use crate::solver::{JacobiSvd3, Svd3Solver, SOLVER_OUTPUT_LEN};

/// The result of a 3×3 singular value decomposition.
#[derive(Debug, Clone)]
pub struct Svd3Set {
    /// The matrix of left singular vectors.
    u: Mat3,

    /// The diagonal matrix of singular values.
    s: Mat3,

    /// The matrix of right singular vectors.
    v: Mat3,
}

impl Svd3Set {
    /// Get the left singular vectors matrix.
    #[inline]
    pub fn u(&self) -> &Mat3 {
        &self.u
    }

    /// Get the diagonal matrix of singular values.
    #[inline]
    pub fn s(&self) -> &Mat3 {
        &self.s
    }

    /// Get the right singular vectors matrix.
    #[inline]
    pub fn v(&self) -> &Mat3 {
        &self.v
    }
}

/// Double precision variant of [`Svd3Set`].
#[derive(Debug, Clone)]
pub struct Svd3SetF64 {
    /// The matrix of left singular vectors.
    u: DMat3,

    /// The diagonal matrix of singular values.
    s: DMat3,

    /// The matrix of right singular vectors.
    v: DMat3,
}

impl Svd3SetF64 {
    /// Get the left singular vectors matrix.
    #[inline]
    pub fn u(&self) -> &DMat3 {
        &self.u
    }

    /// Get the diagonal matrix of singular values.
    #[inline]
    pub fn s(&self) -> &DMat3 {
        &self.s
    }

    /// Get the right singular vectors matrix.
    #[inline]
    pub fn v(&self) -> &DMat3 {
        &self.v
    }
}

/// Row-major entries of a column-major glam matrix.
fn row_major_entries(a: &DMat3) -> [f64; 9] {
    [
        a.x_axis.x, a.y_axis.x, a.z_axis.x, // row 0
        a.x_axis.y, a.y_axis.y, a.z_axis.y, // row 1
        a.x_axis.z, a.y_axis.z, a.z_axis.z, // row 2
    ]
}

fn mat3_from_rows(r: &[f64]) -> DMat3 {
    DMat3::from_cols(
        DVec3::new(r[0], r[3], r[6]),
        DVec3::new(r[1], r[4], r[7]),
        DVec3::new(r[2], r[5], r[8]),
    )
}

/// Invoke the solver and unmarshal its 21-value result.
fn run_solver<S: Svd3Solver + ?Sized>(
    solver: &S,
    a: &DMat3,
    precision: Precision,
    sweeps: u32,
) -> Result<(DMat3, DMat3, DMat3), DecompError> {
    let rets = solver.compute(&row_major_entries(a), precision, sweeps);
    if rets.len() != SOLVER_OUTPUT_LEN {
        log::error!(
            "svd solver returned {} values instead of {}, the solver binding is broken",
            rets.len(),
            SOLVER_OUTPUT_LEN
        );
        return Err(DecompError::SolverContractViolation {
            expected: SOLVER_OUTPUT_LEN,
            got: rets.len(),
        });
    }
    let u = mat3_from_rows(&rets[..9]);
    let v = mat3_from_rows(&rets[9..18]);
    let s = DMat3::from_diagonal(DVec3::new(rets[18], rets[19], rets[20]));
    Ok((u, s, v))
}

/// Singular value decomposition of a 3×3 matrix, `A = U * Σ * Vᵀ`, using
/// the built-in solver with the single precision default of 5 sweeps.
///
/// `U` and `V` are proper rotations; the diagonal of `Σ` is sorted by
/// descending magnitude and non-negative whenever `det(A) >= 0` (for
/// reflections the smallest singular value carries the sign).
pub fn svd3(a: &Mat3) -> Result<Svd3Set, DecompError> {
    svd3_with(a, &JacobiSvd3, Precision::Single.default_sweeps())
}

/// [`svd3`] with a caller-supplied solver backend and sweep count.
pub fn svd3_with<S: Svd3Solver + ?Sized>(
    a: &Mat3,
    solver: &S,
    sweeps: u32,
) -> Result<Svd3Set, DecompError> {
    let (u, s, v) = run_solver(solver, &a.as_dmat3(), Precision::Single, sweeps)?;
    Ok(Svd3Set {
        u: u.as_mat3(),
        s: s.as_mat3(),
        v: v.as_mat3(),
    })
}

/// Double precision variant of [`svd3`], defaulting to 8 sweeps.
pub fn svd3_f64(a: &DMat3) -> Result<Svd3SetF64, DecompError> {
    svd3_f64_with(a, &JacobiSvd3, Precision::Double.default_sweeps())
}

/// [`svd3_f64`] with a caller-supplied solver backend and sweep count.
pub fn svd3_f64_with<S: Svd3Solver + ?Sized>(
    a: &DMat3,
    solver: &S,
    sweeps: u32,
) -> Result<Svd3SetF64, DecompError> {
    let (u, s, v) = run_solver(solver, a, Precision::Double, sweeps)?;
    Ok(Svd3SetF64 { u, s, v })
}

/// Polar decomposition of a 3×3 matrix, `A = R * S`, derived from the
/// SVD: `R = U * Vᵀ` and `S = V * Σ * Vᵀ`.
///
/// # Returns
///
/// The pair `(R, S)` with `R` a proper rotation and `S` symmetric.
pub fn polar_decompose3(a: &Mat3) -> Result<(Mat3, Mat3), DecompError> {
    let svd = svd3(a)?;
    Ok((svd.u * svd.v.transpose(), svd.v * svd.s * svd.v.transpose()))
}

/// Double precision variant of [`polar_decompose3`].
pub fn polar_decompose3_f64(a: &DMat3) -> Result<(DMat3, DMat3), DecompError> {
    let svd = svd3_f64(a)?;
    Ok((svd.u * svd.v.transpose(), svd.v * svd.s * svd.v.transpose()))
}
