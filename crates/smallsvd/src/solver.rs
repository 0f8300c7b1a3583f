//! The external 3×3 SVD solver port and its reference implementation.
//!
//! The 3×3 path delegates the numerical work to a solver behind the
//! [`Svd3Solver`] trait. The wire contract is fixed: 9 row-major input
//! entries, a precision tag, a positive sweep count, and exactly 21
//! ordered output values (U row-major 9, V row-major 9, Σ diagonal 3).
//! [`JacobiSvd3`] is the built-in reference backend; an accelerated
//! implementation can be swapped in through
//! [`crate::svd3::svd3_with`] / [`crate::svd3::svd3_f64_with`].
//!
//! The reference backend follows McAdams, Selle, Tamstorf, Teran and
//! Sifakis, "Computing the Singular Value Decomposition of 3x3 matrices
//! with minimal branching and elementary floating point operations",
//! University of Wisconsin-Madison TR1690: a fixed number of cyclic
//! Jacobi sweeps diagonalizes AᵀA to obtain V, then a Givens QR of
//! B = A·V yields U and the singular values. There is no residual-based
//! early exit, so the cost of a call depends only on the sweep count.

use num_traits::Float;

use crate::precision::Precision;

/// Arity of the solver output required by the wire contract.
pub const SOLVER_OUTPUT_LEN: usize = 21;

/// Port to an external 3×3 SVD solver.
///
/// Implementations must be pure functions of their inputs and reentrant:
/// many worker threads invoke the solver concurrently with independent
/// matrices. The returned values are, in order: the 9 row-major entries
/// of U, the 9 row-major entries of V, and the 3 diagonal entries of Σ
/// sorted by descending magnitude. U and V are proper rotations
/// (det = +1); for inputs with negative determinant the smallest
/// singular value carries the sign.
pub trait Svd3Solver: Send + Sync {
    /// Compute the SVD of the row-major 3×3 matrix `a`.
    ///
    /// `sweeps` must be positive; higher counts trade compute for
    /// accuracy, not correctness.
    fn compute(&self, a: &[f64; 9], precision: Precision, sweeps: u32) -> Vec<f64>;
}

/// Reference fixed-sweep Jacobi solver.
#[derive(Debug, Default, Clone, Copy)]
pub struct JacobiSvd3;

impl Svd3Solver for JacobiSvd3 {
    fn compute(&self, a: &[f64; 9], precision: Precision, sweeps: u32) -> Vec<f64> {
        match precision {
            Precision::Single => {
                let a32: [f32; 9] = core::array::from_fn(|i| a[i] as f32);
                let (u, v, sig) = fixed_sweep_svd(&a32, sweeps);
                let mut out = Vec::with_capacity(SOLVER_OUTPUT_LEN);
                out.extend(u.iter().flatten().map(|&x| f64::from(x)));
                out.extend(v.iter().flatten().map(|&x| f64::from(x)));
                out.extend(sig.iter().map(|&x| f64::from(x)));
                out
            }
            Precision::Double => {
                let (u, v, sig) = fixed_sweep_svd(a, sweeps);
                let mut out = Vec::with_capacity(SOLVER_OUTPUT_LEN);
                out.extend(u.iter().flatten());
                out.extend(v.iter().flatten());
                out.extend(sig.iter());
                out
            }
        }
    }
}

/// Constants of the approximate Givens rotation, derived at the working
/// precision rather than truncated from decimal literals.
struct Consts<T> {
    /// 3 + 2√2, the cutoff of Algorithm 2.
    gamma: T,
    /// cos(π/8).
    cstar: T,
    /// sin(π/8).
    sstar: T,
    /// Tiny guard against division by zero in the QR Givens step.
    tiny: T,
}

impl<T: Float> Consts<T> {
    fn new() -> Self {
        let one = T::one();
        let two = one + one;
        let sqrt2 = two.sqrt();
        Consts {
            gamma: two + one + two * sqrt2,
            cstar: ((two + sqrt2).sqrt()) / two,
            sstar: ((two - sqrt2).sqrt()) / two,
            tiny: T::epsilon(),
        }
    }
}

/// A symmetric 3×3 matrix, storing only the lower triangle.
#[derive(Debug, Clone)]
struct Symmetric3<T> {
    m00: T,
    m10: T,
    m11: T,
    m20: T,
    m21: T,
    m22: T,
}

impl<T: Float> Symmetric3<T> {
    /// AᵀA of a row-major matrix.
    fn from_ata(a: &[[T; 3]; 3]) -> Self {
        let dot = |i: usize, j: usize| a[0][i] * a[0][j] + a[1][i] * a[1][j] + a[2][i] * a[2][j];
        Symmetric3 {
            m00: dot(0, 0),
            m10: dot(1, 0),
            m11: dot(1, 1),
            m20: dot(2, 0),
            m21: dot(2, 1),
            m22: dot(2, 2),
        }
    }
}

/// Cosine/sine pair of a Givens rotation (half-angle in the Jacobi
/// steps, full-angle after conversion).
#[derive(Debug)]
struct Givens<T> {
    cos_theta: T,
    sin_theta: T,
}

/// Approximate Givens parameters for a 2×2 symmetric sub-block
/// (Algorithm 2 of TR1690).
#[inline(always)]
fn approximate_givens_parameters<T: Float>(s_pp: T, s_qq: T, s_pq: T, k: &Consts<T>) -> Givens<T> {
    let two = T::one() + T::one();
    let cos_theta_val = two * (s_pp - s_qq);
    let sin_theta_val = s_pq;
    let cos_theta2 = cos_theta_val * cos_theta_val;
    let sin_theta2 = sin_theta_val * sin_theta_val;

    if k.gamma * sin_theta2 < cos_theta2 {
        let w = (cos_theta2 + sin_theta2).sqrt().recip();
        Givens {
            cos_theta: w * cos_theta_val,
            sin_theta: w * sin_theta_val,
        }
    } else {
        Givens {
            cos_theta: k.cstar,
            sin_theta: k.sstar,
        }
    }
}

#[inline(always)]
fn conjugate_xy<T: Float>(s: &mut Symmetric3<T>, q: &mut [T; 4], k: &Consts<T>) {
    let two = T::one() + T::one();
    let mut g = approximate_givens_parameters(s.m00, s.m11, s.m10, k);

    let cos_theta2 = g.cos_theta * g.cos_theta;
    let sin_theta2 = g.sin_theta * g.sin_theta;
    let scale = (cos_theta2 + sin_theta2).recip();
    let a = (cos_theta2 - sin_theta2) * scale;
    let b = two * g.sin_theta * g.cos_theta * scale;

    // cache original matrix elements
    let s00 = s.m00;
    let s10 = s.m10;
    let s11 = s.m11;
    let s20 = s.m20;
    let s21 = s.m21;

    s.m00 = a * (a * s00 + b * s10) + b * (a * s10 + b * s11);
    s.m10 = a * (-b * s00 + a * s10) + b * (-b * s10 + a * s11);
    s.m11 = -b * (-b * s00 + a * s10) + a * (-b * s10 + a * s11);
    s.m20 = a * s20 + b * s21;
    s.m21 = -b * s20 + a * s21;

    // fold the rotation into the cumulative quaternion (x, y, z, w)
    let tmp_x = q[0] * g.sin_theta;
    let tmp_y = q[1] * g.sin_theta;
    let tmp_z = q[2] * g.sin_theta;
    g.sin_theta = g.sin_theta * q[3];

    q[2] = q[2] * g.cos_theta + g.sin_theta;
    q[3] = q[3] * g.cos_theta - tmp_z;
    q[0] = q[0] * g.cos_theta + tmp_y;
    q[1] = q[1] * g.cos_theta - tmp_x;
}

#[inline(always)]
fn conjugate_yz<T: Float>(s: &mut Symmetric3<T>, q: &mut [T; 4], k: &Consts<T>) {
    let two = T::one() + T::one();
    let mut g = approximate_givens_parameters(s.m11, s.m22, s.m21, k);

    let cos_theta2 = g.cos_theta * g.cos_theta;
    let sin_theta2 = g.sin_theta * g.sin_theta;
    let scale = (cos_theta2 + sin_theta2).recip();
    let a = (cos_theta2 - sin_theta2) * scale;
    let b = two * g.sin_theta * g.cos_theta * scale;

    let s11 = s.m11;
    let s21 = s.m21;
    let s22 = s.m22;
    let s10 = s.m10;
    let s20 = s.m20;

    s.m11 = a * (a * s11 + b * s21) + b * (a * s21 + b * s22);
    s.m21 = a * (-b * s11 + a * s21) + b * (-b * s21 + a * s22);
    s.m22 = -b * (-b * s11 + a * s21) + a * (-b * s21 + a * s22);
    s.m10 = a * s10 + b * s20;
    s.m20 = -b * s10 + a * s20;

    let tmp_x = q[0] * g.sin_theta;
    let tmp_y = q[1] * g.sin_theta;
    let tmp_z = q[2] * g.sin_theta;
    g.sin_theta = g.sin_theta * q[3];

    q[0] = q[0] * g.cos_theta + g.sin_theta;
    q[3] = q[3] * g.cos_theta - tmp_x;
    q[1] = q[1] * g.cos_theta + tmp_z;
    q[2] = q[2] * g.cos_theta - tmp_y;
}

#[inline(always)]
fn conjugate_xz<T: Float>(s: &mut Symmetric3<T>, q: &mut [T; 4], k: &Consts<T>) {
    let two = T::one() + T::one();
    let mut g = approximate_givens_parameters(s.m00, s.m22, s.m20, k);

    let cos_theta2 = g.cos_theta * g.cos_theta;
    let sin_theta2 = g.sin_theta * g.sin_theta;
    let scale = (cos_theta2 + sin_theta2).recip();
    let a = (cos_theta2 - sin_theta2) * scale;
    let b = two * g.sin_theta * g.cos_theta * scale;

    let s00 = s.m00;
    let s20 = s.m20;
    let s22 = s.m22;
    let s10 = s.m10;
    let s21 = s.m21;

    s.m00 = a * (a * s00 + b * s20) + b * (a * s20 + b * s22);
    s.m20 = a * (-b * s00 + a * s20) + b * (-b * s20 + a * s22);
    s.m22 = -b * (-b * s00 + a * s20) + a * (-b * s20 + a * s22);
    s.m10 = a * s10 + b * s21;
    s.m21 = -b * s10 + a * s21;

    // The xz conjugation above rotates by -theta about y (the embedded
    // 2x2 block acts on indices (0, 2), flipping the orientation), so
    // the accumulated quaternion takes the sine negated.
    let tmp_x = q[0] * g.sin_theta;
    let tmp_y = q[1] * g.sin_theta;
    let tmp_z = q[2] * g.sin_theta;
    g.sin_theta = g.sin_theta * q[3];

    q[1] = q[1] * g.cos_theta - g.sin_theta;
    q[3] = q[3] * g.cos_theta + tmp_y;
    q[2] = q[2] * g.cos_theta - tmp_x;
    q[0] = q[0] * g.cos_theta + tmp_z;
}

/// Row-major rotation matrix from a quaternion, normalizing first since
/// the cumulative quaternion drifts over the sweeps.
fn quat_to_mat3<T: Float>(q: [T; 4]) -> [[T; 3]; 3] {
    let one = T::one();
    let two = one + one;
    let n = (q[0] * q[0] + q[1] * q[1] + q[2] * q[2] + q[3] * q[3])
        .sqrt()
        .recip();
    let (x, y, z, w) = (q[0] * n, q[1] * n, q[2] * n, q[3] * n);
    [
        [
            one - two * (y * y + z * z),
            two * (x * y - w * z),
            two * (x * z + w * y),
        ],
        [
            two * (x * y + w * z),
            one - two * (x * x + z * z),
            two * (y * z - w * x),
        ],
        [
            two * (x * z - w * y),
            two * (y * z + w * x),
            one - two * (x * x + y * y),
        ],
    ]
}

/// Cyclic Jacobi sweeps diagonalizing `s`; returns the accumulated
/// rotation as a row-major matrix. The sweep count is fixed so the cost
/// of a call never depends on the input.
fn jacobi_eigenanalysis<T: Float>(mut s: Symmetric3<T>, sweeps: u32, k: &Consts<T>) -> [[T; 3]; 3] {
    let mut q = [T::zero(), T::zero(), T::zero(), T::one()];
    for _ in 0..sweeps {
        conjugate_xy(&mut s, &mut q, k);
        conjugate_yz(&mut s, &mut q, k);
        conjugate_xz(&mut s, &mut q, k);
    }
    quat_to_mat3(q)
}

fn mat_mul<T: Float>(a: &[[T; 3]; 3], b: &[[T; 3]; 3]) -> [[T; 3]; 3] {
    let mut out = [[T::zero(); 3]; 3];
    for (out_row, a_row) in out.iter_mut().zip(a.iter()) {
        for (j, out_entry) in out_row.iter_mut().enumerate() {
            *out_entry = a_row[0] * b[0][j] + a_row[1] * b[1][j] + a_row[2] * b[2][j];
        }
    }
    out
}

fn col_norm_sq<T: Float>(m: &[[T; 3]; 3], c: usize) -> T {
    m[0][c] * m[0][c] + m[1][c] * m[1][c] + m[2][c] * m[2][c]
}

fn swap_cols<T: Float>(m: &mut [[T; 3]; 3], c1: usize, c2: usize) {
    for row in m.iter_mut() {
        row.swap(c1, c2);
    }
}

fn negate_col<T: Float>(m: &mut [[T; 3]; 3], c: usize) {
    for row in m.iter_mut() {
        row[c] = -row[c];
    }
}

/// Sorts the columns of `b = A·V` (and `v` alongside) by descending
/// squared norm. Every swap negates one of the swapped columns so that
/// `v` stays a proper rotation.
fn sort_singular_values<T: Float>(b: &mut [[T; 3]; 3], v: &mut [[T; 3]; 3]) {
    let mut rho1 = col_norm_sq(b, 0);
    let mut rho2 = col_norm_sq(b, 1);
    let mut rho3 = col_norm_sq(b, 2);

    if rho1 < rho2 {
        core::mem::swap(&mut rho1, &mut rho2);
        swap_cols(b, 0, 1);
        swap_cols(v, 0, 1);
        negate_col(b, 1);
        negate_col(v, 1);
    }
    if rho1 < rho3 {
        core::mem::swap(&mut rho1, &mut rho3);
        swap_cols(b, 0, 2);
        swap_cols(v, 0, 2);
        negate_col(b, 2);
        negate_col(v, 2);
    }
    if rho2 < rho3 {
        swap_cols(b, 1, 2);
        swap_cols(v, 1, 2);
        negate_col(b, 2);
        negate_col(v, 2);
    }
}

/// Givens parameters zeroing `a2` against `a1` (Algorithm 4 of TR1690).
#[inline(always)]
fn qr_givens_parameters<T: Float>(a1: T, a2: T, tiny: T) -> Givens<T> {
    let rho = (a1 * a1 + a2 * a2).sqrt();

    let mut cos_theta = a1.abs() + rho.max(tiny);
    let mut sin_theta = if rho > tiny { a2 } else { T::zero() };
    if a1 < T::zero() {
        core::mem::swap(&mut cos_theta, &mut sin_theta);
    }

    let w = (cos_theta * cos_theta + sin_theta * sin_theta)
        .sqrt()
        .recip();
    Givens {
        cos_theta: cos_theta * w,
        sin_theta: sin_theta * w,
    }
}

/// QR decomposition of a row-major 3×3 matrix using three Givens
/// rotations. Returns `(Q, R)` with `Q` a proper rotation; the Givens
/// construction leaves `R[0][0]` and `R[1][1]` non-negative, so
/// `R[2][2]` carries the sign of the input's determinant.
fn qr_decomposition<T: Float>(b: &mut [[T; 3]; 3], tiny: T) -> ([[T; 3]; 3], [[T; 3]; 3]) {
    let one = T::one();
    let two = one + one;
    let zero = T::zero();

    // zero b[1][0], rotating rows 0 and 1
    let g1 = qr_givens_parameters(b[0][0], b[1][0], tiny);
    let a1 = one - two * g1.sin_theta * g1.sin_theta;
    let b1 = two * g1.cos_theta * g1.sin_theta;
    for j in 0..3 {
        let c0 = b[0][j];
        let c1 = b[1][j];
        b[0][j] = a1 * c0 + b1 * c1;
        b[1][j] = -b1 * c0 + a1 * c1;
    }

    // zero b[2][0], rotating rows 0 and 2
    let g2 = qr_givens_parameters(b[0][0], b[2][0], tiny);
    let a2 = one - two * g2.sin_theta * g2.sin_theta;
    let b2 = two * g2.cos_theta * g2.sin_theta;
    for j in 0..3 {
        let c0 = b[0][j];
        let c2 = b[2][j];
        b[0][j] = a2 * c0 + b2 * c2;
        b[2][j] = -b2 * c0 + a2 * c2;
    }

    // zero b[2][1], rotating rows 1 and 2
    let g3 = qr_givens_parameters(b[1][1], b[2][1], tiny);
    let a3 = one - two * g3.sin_theta * g3.sin_theta;
    let b3 = two * g3.cos_theta * g3.sin_theta;
    for j in 0..3 {
        let c1 = b[1][j];
        let c2 = b[2][j];
        b[1][j] = a3 * c1 + b3 * c2;
        b[2][j] = -b3 * c1 + a3 * c2;
    }

    let r = *b;

    let q1 = [[a1, -b1, zero], [b1, a1, zero], [zero, zero, one]];
    let q2 = [[a2, zero, -b2], [zero, one, zero], [b2, zero, a2]];
    let q3 = [[one, zero, zero], [zero, a3, -b3], [zero, b3, a3]];

    (mat_mul(&mat_mul(&q1, &q2), &q3), r)
}

/// Fixed-sweep 3×3 SVD on row-major entries.
///
/// Returns `(U, V, Σ-diagonal)`, all row-major. U and V are proper
/// rotations; the singular values are sorted by descending magnitude
/// and the last one is negative exactly when det(A) < 0.
fn fixed_sweep_svd<T: Float>(entries: &[T; 9], sweeps: u32) -> ([[T; 3]; 3], [[T; 3]; 3], [T; 3]) {
    let k = Consts::new();
    let a = [
        [entries[0], entries[1], entries[2]],
        [entries[3], entries[4], entries[5]],
        [entries[6], entries[7], entries[8]],
    ];

    // right singular vectors from the eigenanalysis of AᵀA
    let mut v = jacobi_eigenanalysis(Symmetric3::from_ata(&a), sweeps, &k);
    // B = A·V has the (scaled) left singular vectors as columns
    let mut b = mat_mul(&a, &v);

    sort_singular_values(&mut b, &mut v);

    let (u, r) = qr_decomposition(&mut b, k.tiny);
    (u, v, [r[0][0], r[1][1], r[2][2]])
}
