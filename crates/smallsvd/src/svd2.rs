//! Closed-form polar decomposition and SVD of 2×2 matrices.
//!
//! The 2×2 case needs no iteration: the rotation part of the polar
//! decomposition is read directly off the trace and the antisymmetric part
//! of the matrix, and the remaining symmetric stretch is diagonalized with
//! a single Jacobi rotation.
//!
//! ```text
//! A = R S           (polar: R rotation, S symmetric)
//! A = U Σ Vᵀ        (svd:   U, V proper rotations, Σ diagonal, σ₁ ≥ σ₂)
//! ```
//!
//! # Example
//!
//! ```
//! use glam::Mat2;
//! use smallsvd::svd2::svd2;
//!
//! let a = Mat2::from_cols_array(&[3.0, 1.0, -1.0, 2.0]);
//! let svd = svd2(&a);
//! let reconstructed = *svd.u() * *svd.s() * svd.v().transpose();
//! assert!(a.abs_diff_eq(reconstructed, 1e-4));
//! ```
//!
//! # References
//!
//! * Jiang et al., "The Material Point Method for Simulating Continuum
//!   Materials", SIGGRAPH 2016 course notes, §SVD.

use glam::{DMat2, DVec2, Mat2, Vec2};

/// Absolute threshold under which the off-diagonal entry of the symmetric
/// stretch is treated as zero and the matrix as already diagonal.
///
/// Deliberately absolute, not scaled by the matrix magnitude; inputs with
/// entries far from unit scale may want to be normalized by the caller.
const DIAGONAL_EPSILON: f32 = 1e-5;
const DIAGONAL_EPSILON_F64: f64 = 1e-5;

/// The result of a 2×2 singular value decomposition.
#[derive(Debug, Clone)]
pub struct Svd2Set {
    /// The matrix of left singular vectors.
    u: Mat2,

    /// The diagonal matrix of singular values.
    s: Mat2,

    /// The matrix of right singular vectors.
    v: Mat2,
}

impl Svd2Set {
    /// Get the left singular vectors matrix.
    #[inline]
    pub fn u(&self) -> &Mat2 {
        &self.u
    }

    /// Get the diagonal matrix of singular values.
    #[inline]
    pub fn s(&self) -> &Mat2 {
        &self.s
    }

    /// Get the right singular vectors matrix.
    #[inline]
    pub fn v(&self) -> &Mat2 {
        &self.v
    }
}

/// Double precision variant of [`Svd2Set`].
#[derive(Debug, Clone)]
pub struct Svd2SetF64 {
    /// The matrix of left singular vectors.
    u: DMat2,

    /// The diagonal matrix of singular values.
    s: DMat2,

    /// The matrix of right singular vectors.
    v: DMat2,
}

impl Svd2SetF64 {
    /// Get the left singular vectors matrix.
    #[inline]
    pub fn u(&self) -> &DMat2 {
        &self.u
    }

    /// Get the diagonal matrix of singular values.
    #[inline]
    pub fn s(&self) -> &DMat2 {
        &self.s
    }

    /// Get the right singular vectors matrix.
    #[inline]
    pub fn v(&self) -> &DMat2 {
        &self.v
    }
}

/// Polar decomposition of a 2×2 matrix, `A = R * S`.
///
/// `R` is a proper rotation built from the unit vector
/// `(a00 + a11, a10 - a01)`; `S = Rᵀ * A` is symmetric for any invertible
/// input. When that vector is exactly zero (a traceless symmetric or zero
/// matrix, which has no preferred rotation) `R` falls back to the
/// identity and `S = A` is returned as-is.
///
/// # Returns
///
/// The pair `(R, S)`.
pub fn polar_decompose2(a: &Mat2) -> (Mat2, Mat2) {
    let x = a.x_axis.x + a.y_axis.y;
    let y = a.x_axis.y - a.y_axis.x;
    let norm = (x * x + y * y).sqrt();
    let r = if norm == 0.0 {
        Mat2::IDENTITY
    } else {
        let c = x / norm;
        let s = y / norm;
        Mat2::from_cols(Vec2::new(c, s), Vec2::new(-s, c))
    };
    (r, r.transpose() * *a)
}

/// Double precision variant of [`polar_decompose2`].
pub fn polar_decompose2_f64(a: &DMat2) -> (DMat2, DMat2) {
    let x = a.x_axis.x + a.y_axis.y;
    let y = a.x_axis.y - a.y_axis.x;
    let norm = (x * x + y * y).sqrt();
    let r = if norm == 0.0 {
        DMat2::IDENTITY
    } else {
        let c = x / norm;
        let s = y / norm;
        DMat2::from_cols(DVec2::new(c, s), DVec2::new(-s, c))
    };
    (r, r.transpose() * *a)
}

/// One-step Jacobi rotation diagonalizing a symmetric 2×2 matrix.
///
/// Returns `(c, s, s1, s2)` such that the rotation with cosine `c` and
/// sine `s` conjugates the matrix to `diag(s1, s2)` (unordered). The
/// branch of `t` is picked from the sign of `tau` to avoid cancellation.
fn symmetric_eigen2(s00: f32, s01: f32, s11: f32) -> (f32, f32, f32, f32) {
    if s01.abs() < DIAGONAL_EPSILON {
        return (1.0, 0.0, s00, s11);
    }
    let tau = 0.5 * (s00 - s11);
    let w = (tau * tau + s01 * s01).sqrt();
    let t = if tau > 0.0 {
        s01 / (tau + w)
    } else {
        s01 / (tau - w)
    };
    let c = (t * t + 1.0).sqrt().recip();
    let s = -t * c;
    let s1 = c * c * s00 - 2.0 * c * s * s01 + s * s * s11;
    let s2 = s * s * s00 + 2.0 * c * s * s01 + c * c * s11;
    (c, s, s1, s2)
}

fn symmetric_eigen2_f64(s00: f64, s01: f64, s11: f64) -> (f64, f64, f64, f64) {
    if s01.abs() < DIAGONAL_EPSILON_F64 {
        return (1.0, 0.0, s00, s11);
    }
    let tau = 0.5 * (s00 - s11);
    let w = (tau * tau + s01 * s01).sqrt();
    let t = if tau > 0.0 {
        s01 / (tau + w)
    } else {
        s01 / (tau - w)
    };
    let c = (t * t + 1.0).sqrt().recip();
    let s = -t * c;
    let s1 = c * c * s00 - 2.0 * c * s * s01 + s * s * s11;
    let s2 = s * s * s00 + 2.0 * c * s * s01 + c * c * s11;
    (c, s, s1, s2)
}

/// Singular value decomposition of a 2×2 matrix, `A = U * Σ * Vᵀ`.
///
/// Built from the polar decomposition followed by a single Jacobi rotation
/// of the symmetric stretch. Singular values are ordered descending
/// (`Σ[0][0] >= Σ[1][1]`); when the unordered eigenvalues come out
/// ascending, the swap uses a sign pattern that keeps `V` a proper
/// rotation (det = +1) rather than a reflection, so `U = R * V` is proper
/// as well.
pub fn svd2(a: &Mat2) -> Svd2Set {
    let (r, sym) = polar_decompose2(a);
    let (c, s, mut s1, mut s2) = symmetric_eigen2(sym.x_axis.x, sym.y_axis.x, sym.y_axis.y);
    let v = if s1 < s2 {
        core::mem::swap(&mut s1, &mut s2);
        Mat2::from_cols(Vec2::new(-s, -c), Vec2::new(c, -s))
    } else {
        Mat2::from_cols(Vec2::new(c, -s), Vec2::new(s, c))
    };
    Svd2Set {
        u: r * v,
        s: Mat2::from_diagonal(Vec2::new(s1, s2)),
        v,
    }
}

/// Double precision variant of [`svd2`].
pub fn svd2_f64(a: &DMat2) -> Svd2SetF64 {
    let (r, sym) = polar_decompose2_f64(a);
    let (c, s, mut s1, mut s2) = symmetric_eigen2_f64(sym.x_axis.x, sym.y_axis.x, sym.y_axis.y);
    let v = if s1 < s2 {
        core::mem::swap(&mut s1, &mut s2);
        DMat2::from_cols(DVec2::new(-s, -c), DVec2::new(c, -s))
    } else {
        DMat2::from_cols(DVec2::new(c, -s), DVec2::new(s, c))
    };
    Svd2SetF64 {
        u: r * v,
        s: DMat2::from_diagonal(DVec2::new(s1, s2)),
        v,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use glam::{DMat2, Mat2, Vec2};

    fn random_entry() -> f32 {
        rand::random::<f32>() * 4.0 - 2.0
    }

    fn verify_svd2_properties(a: &Mat2, svd: &Svd2Set, epsilon: f32) {
        let u = *svd.u();
        let s = *svd.s();
        let v = *svd.v();

        let reconstruction = u * s * v.transpose();
        assert!(
            a.abs_diff_eq(reconstruction, epsilon),
            "Reconstruction failed: A != U*S*V.T\nA:\n{}\nReconstruction:\n{}",
            a,
            reconstruction
        );

        let u_t_u = u.transpose() * u;
        assert!(
            Mat2::IDENTITY.abs_diff_eq(u_t_u, epsilon),
            "U is not orthogonal: U.T*U != I\nU.T*U:\n{}",
            u_t_u
        );

        let v_t_v = v.transpose() * v;
        assert!(
            Mat2::IDENTITY.abs_diff_eq(v_t_v, epsilon),
            "V is not orthogonal: V.T*V != I\nV.T*V:\n{}",
            v_t_v
        );

        assert_relative_eq!(u.determinant(), 1.0, epsilon = epsilon);
        assert_relative_eq!(v.determinant(), 1.0, epsilon = epsilon);

        assert!(
            s.x_axis.x >= s.y_axis.y,
            "Singular values are not sorted: {} < {}",
            s.x_axis.x,
            s.y_axis.y
        );
        assert!(
            s.x_axis.y == 0.0 && s.y_axis.x == 0.0,
            "S is not diagonal:\n{}",
            s
        );
    }

    #[test]
    fn test_polar2_reconstruction_random() {
        for _ in 0..100 {
            let a = Mat2::from_cols_array(&[
                random_entry(),
                random_entry(),
                random_entry(),
                random_entry(),
            ]);
            let (r, s) = polar_decompose2(&a);

            assert!(a.abs_diff_eq(r * s, 1e-4));
            assert!(Mat2::IDENTITY.abs_diff_eq(r.transpose() * r, 1e-4));
            assert_relative_eq!(r.determinant(), 1.0, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_polar2_stretch_symmetric() {
        let a = Mat2::from_cols_array(&[2.0, 0.5, -1.0, 3.0]);
        let (_, s) = polar_decompose2(&a);
        assert_relative_eq!(s.x_axis.y, s.y_axis.x, epsilon = 1e-5);
    }

    #[test]
    fn test_polar2_zero_matrix() {
        let (r, s) = polar_decompose2(&Mat2::ZERO);
        assert_eq!(r, Mat2::IDENTITY);
        assert_eq!(s, Mat2::ZERO);
    }

    #[test]
    fn test_polar2_traceless_symmetric() {
        // Both the trace and the antisymmetric part vanish, so there is
        // no preferred rotation and the identity fallback applies.
        let a = Mat2::from_cols_array(&[1.0, 2.0, 2.0, -1.0]);
        let (r, s) = polar_decompose2(&a);
        assert_eq!(r, Mat2::IDENTITY);
        assert_eq!(s, a);
    }

    #[test]
    fn test_polar2_rotation_input() {
        // A proper rotation is its own rotation factor with identity
        // stretch; (x, y) = (0, 2) here, well away from the fallback.
        let a = Mat2::from_cols_array(&[0.0, 1.0, -1.0, 0.0]);
        let (r, s) = polar_decompose2(&a);
        assert!(r.abs_diff_eq(a, 1e-6));
        assert!(s.abs_diff_eq(Mat2::IDENTITY, 1e-6));
    }

    #[test]
    fn test_svd2_reconstruction_random() {
        for _ in 0..100 {
            let a = Mat2::from_cols_array(&[
                random_entry(),
                random_entry(),
                random_entry(),
                random_entry(),
            ]);
            verify_svd2_properties(&a, &svd2(&a), 1e-3);
        }
    }

    #[test]
    fn test_svd2_diagonal_sorted() {
        // Already diagonal and descending: the epsilon branch must leave
        // everything untouched.
        let a = Mat2::from_diagonal(Vec2::new(3.0, 1.0));
        let svd = svd2(&a);
        assert_eq!(*svd.v(), Mat2::IDENTITY);
        assert_eq!(*svd.u(), Mat2::IDENTITY);
        assert_eq!(*svd.s(), a);
    }

    #[test]
    fn test_svd2_diagonal_swap() {
        // Ascending diagonal forces the ordering swap; V must stay a
        // proper rotation afterwards.
        let a = Mat2::from_diagonal(Vec2::new(1.0, 2.0));
        let svd = svd2(&a);
        assert_eq!(svd.s().x_axis.x, 2.0);
        assert_eq!(svd.s().y_axis.y, 1.0);
        assert_relative_eq!(svd.v().determinant(), 1.0, epsilon = 1e-6);
        verify_svd2_properties(&a, &svd, 1e-5);
    }

    #[test]
    fn test_svd2_rotation_input() {
        let angle = 0.7_f32;
        let a = Mat2::from_angle(angle);
        let svd = svd2(&a);
        verify_svd2_properties(&a, &svd, 1e-5);
        assert_relative_eq!(svd.s().x_axis.x, 1.0, epsilon = 1e-5);
        assert_relative_eq!(svd.s().y_axis.y, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_svd2_f64_reconstruction_random() {
        for _ in 0..100 {
            let a = DMat2::from_cols_array(&[
                rand::random::<f64>() * 4.0 - 2.0,
                rand::random::<f64>() * 4.0 - 2.0,
                rand::random::<f64>() * 4.0 - 2.0,
                rand::random::<f64>() * 4.0 - 2.0,
            ]);
            let svd = svd2_f64(&a);
            let reconstruction = *svd.u() * *svd.s() * svd.v().transpose();
            assert!(a.abs_diff_eq(reconstruction, 1e-9));
            assert!(DMat2::IDENTITY.abs_diff_eq(svd.u().transpose() * *svd.u(), 1e-9));
            assert!(DMat2::IDENTITY.abs_diff_eq(svd.v().transpose() * *svd.v(), 1e-9));
            assert!(svd.s().x_axis.x >= svd.s().y_axis.y);
        }
    }

    #[test]
    fn test_svd2_determinism() {
        let a = Mat2::from_cols_array(&[0.3, -1.2, 2.5, 0.9]);
        let first = svd2(&a);
        let second = svd2(&a);
        assert_eq!(first.u().to_cols_array(), second.u().to_cols_array());
        assert_eq!(first.s().to_cols_array(), second.s().to_cols_array());
        assert_eq!(first.v().to_cols_array(), second.v().to_cols_array());
    }
}
