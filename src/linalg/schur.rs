use alloc::vec;
use alloc::vec::Vec;

use crate::linalg::hessenberg::hessenberg;
use crate::linalg::{max_sweeps, norm2, to_dyn, LinalgError};
use crate::traits::{FloatScalar, MatrixRef};
use crate::DynMatrix;

/// Francis double-shift QR iteration on an upper Hessenberg matrix.
///
/// Transforms `h` to real Schur form (quasi-upper-triangular) in place and
/// accumulates the orthogonal similarity transform into `q`.
///
/// Real eigenvalues appear as 1×1 diagonal blocks; complex conjugate pairs
/// as 2×2 blocks. A 2×2 block may still hold a real pair on return; see
/// [`split_real_blocks`].
pub(crate) fn francis_qr<T: FloatScalar>(
    h: &mut DynMatrix<T>,
    q: &mut DynMatrix<T>,
    max_iter: usize,
) -> Result<(), LinalgError> {
    let n = h.nrows();
    if n <= 1 {
        return Ok(());
    }

    let eps = T::epsilon();
    let mut iter = 0usize;
    // active submatrix is h[0..p, 0..p]
    let mut p = n;

    while p > 2 {
        let tol = eps * (h[(p - 2, p - 2)].abs() + h[(p - 1, p - 1)].abs());
        if h[(p - 1, p - 2)].abs() <= tol {
            h[(p - 1, p - 2)] = T::zero();
            p -= 1;
            continue;
        }

        let tol2 = eps * (h[(p - 3, p - 3)].abs() + h[(p - 2, p - 2)].abs());
        if h[(p - 2, p - 3)].abs() <= tol2 {
            h[(p - 2, p - 3)] = T::zero();
            p -= 2;
            continue;
        }

        iter += 1;
        if iter > max_iter {
            tracing::warn!(iter, n, "Francis QR did not converge");
            return Err(LinalgError::ConvergenceFailure);
        }

        // start of the unreduced block that ends at p
        let mut lo = p - 1;
        while lo > 0 {
            let tol_lo = eps * (h[(lo - 1, lo - 1)].abs() + h[(lo, lo)].abs());
            if h[(lo, lo - 1)].abs() <= tol_lo {
                h[(lo, lo - 1)] = T::zero();
                break;
            }
            lo -= 1;
        }

        // exceptional shift every 10 iterations
        let (s, t) = if iter % 10 == 0 {
            let w = h[(p - 1, p - 2)].abs() + h[(p - 2, p - 3)].abs();
            (w + w, w * w)
        } else {
            let a11 = h[(p - 2, p - 2)];
            let a12 = h[(p - 2, p - 1)];
            let a21 = h[(p - 1, p - 2)];
            let a22 = h[(p - 1, p - 1)];
            (a11 + a22, a11 * a22 - a12 * a21)
        };

        // first column of H² − s·H + t·I
        let h00 = h[(lo, lo)];
        let h10 = h[(lo + 1, lo)];
        let h01 = h[(lo, lo + 1)];
        let h11 = h[(lo + 1, lo + 1)];

        let mut x = h00 * h00 + h01 * h10 - s * h00 + t;
        let mut y = h10 * (h00 + h11 - s);
        let mut z = if lo + 2 < p { h10 * h[(lo + 2, lo + 1)] } else { T::zero() };

        for k in lo..(p - 1) {
            let use3 = k + 2 < p;
            let (v, tau) = if use3 {
                householder3(x, y, z)
            } else {
                let (v1, tau) = householder2(x, y);
                ([T::one(), v1, T::zero()], tau)
            };
            let width = if use3 { 3 } else { 2 };

            let col_start = if k > lo { k - 1 } else { k };
            for j in col_start..n {
                let mut dot = T::zero();
                for (r, &vr) in v[..width].iter().enumerate() {
                    dot = dot + vr * h[(k + r, j)];
                }
                dot = tau * dot;
                for (r, &vr) in v[..width].iter().enumerate() {
                    h[(k + r, j)] = h[(k + r, j)] - dot * vr;
                }
            }

            let row_end = if use3 { (k + 4).min(p) } else { p };
            reflect_block(h, 0..row_end, k, &v[..width], tau);
            reflect_block(q, 0..n, k, &v[..width], tau);

            if k + 2 < p - 1 {
                x = h[(k + 1, k)];
                y = h[(k + 2, k)];
                z = h[(k + 3, k)];
            } else if k + 1 < p - 1 {
                x = h[(k + 1, k)];
                y = h[(k + 2, k)];
                z = T::zero();
            }
        }

        for i in 0..n {
            for j in 0..i.saturating_sub(1) {
                if h[(i, j)].abs() < eps * (h[(i, i)].abs() + h[(j, j)].abs()) {
                    h[(i, j)] = T::zero();
                }
            }
        }
    }

    if p == 2 {
        let tol = eps * (h[(0, 0)].abs() + h[(1, 1)].abs());
        if h[(1, 0)].abs() <= tol {
            h[(1, 0)] = T::zero();
        }
    }

    tracing::trace!(iter, n, "Francis QR converged");
    Ok(())
}

/// `M[rows, k..k+len] ← M[rows, k..k+len]·(I − tau·v·vᵀ)`.
fn reflect_block<T: FloatScalar>(
    m: &mut DynMatrix<T>,
    rows: core::ops::Range<usize>,
    k: usize,
    v: &[T],
    tau: T,
) {
    for i in rows {
        let mut dot = T::zero();
        for (c, &vc) in v.iter().enumerate() {
            dot = dot + vc * m[(i, k + c)];
        }
        dot = tau * dot;
        for (c, &vc) in v.iter().enumerate() {
            m[(i, k + c)] = m[(i, k + c)] - dot * vc;
        }
    }
}

/// 3-element Householder: returns `([1, v1, v2], tau)`.
#[inline]
fn householder3<T: FloatScalar>(x: T, y: T, z: T) -> ([T; 3], T) {
    let norm = norm2([x, y, z].into_iter());
    if norm == T::zero() {
        return ([T::one(), T::zero(), T::zero()], T::zero());
    }
    let u0 = if x >= T::zero() { x + norm } else { x - norm };
    let v1 = y / u0;
    let v2 = z / u0;
    let tau = T::constant(2.0) / (T::one() + v1 * v1 + v2 * v2);
    ([T::one(), v1, v2], tau)
}

/// 2-element Householder: returns `(v1, tau)` for `v = [1, v1]`.
#[inline]
fn householder2<T: FloatScalar>(x: T, y: T) -> (T, T) {
    let norm = norm2([x, y].into_iter());
    if norm == T::zero() {
        return (T::zero(), T::zero());
    }
    let u0 = if x >= T::zero() { x + norm } else { x - norm };
    let v1 = y / u0;
    let tau = T::constant(2.0) / (T::one() + v1 * v1);
    (v1, tau)
}

/// Rotate every 2×2 diagonal block that holds a real eigenvalue pair into
/// upper triangular form, updating `q` to match.
///
/// Afterwards a non-zero sub-diagonal entry marks a complex pair.
pub(crate) fn split_real_blocks<T: FloatScalar>(s: &mut DynMatrix<T>, q: &mut DynMatrix<T>) {
    let n = s.nrows();
    let half = T::constant(0.5);
    let mut i = 0;
    while i + 1 < n {
        if s[(i + 1, i)] == T::zero() {
            i += 1;
            continue;
        }
        let a = s[(i, i)];
        let b = s[(i, i + 1)];
        let c = s[(i + 1, i)];
        let d = s[(i + 1, i + 1)];
        let tr = (a + d) * half;
        let disc = (a - d) * (a - d) * half * half + b * c;
        if disc < T::zero() {
            i += 2;
            continue;
        }

        let root = disc.sqrt();
        let lambda = if tr >= T::zero() { tr + root } else { tr - root };
        // eigenvector of the block for `lambda`; take the better conditioned form
        let (e0, e1) = {
            let p = (b, lambda - a);
            let r = (lambda - d, c);
            if p.0.hypot(p.1) >= r.0.hypot(r.1) {
                p
            } else {
                r
            }
        };
        let norm = e0.hypot(e1);
        let (cs, sn) = (e0 / norm, e1 / norm);

        // S ← Gᵀ·S·G with G = [[cs, −sn], [sn, cs]]
        for j in i..n {
            let top = s[(i, j)];
            let bot = s[(i + 1, j)];
            s[(i, j)] = cs * top + sn * bot;
            s[(i + 1, j)] = cs * bot - sn * top;
        }
        rotate_columns(s, i, cs, sn);
        rotate_columns(q, i, cs, sn);
        s[(i + 1, i)] = T::zero();
        i += 2;
    }
}

/// `M[.., i..i+2] ← M[.., i..i+2]·[[cs, −sn], [sn, cs]]`.
fn rotate_columns<T: FloatScalar>(m: &mut DynMatrix<T>, i: usize, cs: T, sn: T) {
    for r in 0..m.nrows() {
        let left = m[(r, i)];
        let right = m[(r, i + 1)];
        m[(r, i)] = cs * left + sn * right;
        m[(r, i + 1)] = cs * right - sn * left;
    }
}

/// Real Schur decomposition `A = Q·S·Qᵀ` with real pairs already split.
pub(crate) struct RealSchur<T> {
    pub s: DynMatrix<T>,
    pub q: DynMatrix<T>,
}

impl<T: FloatScalar> RealSchur<T> {
    pub(crate) fn new(a: &impl MatrixRef<T>) -> Result<Self, LinalgError> {
        let n = a.nrows();
        let mut s = to_dyn(a);
        let mut q = DynMatrix::eye(n, T::zero());
        if n > 1 {
            hessenberg(&mut s, &mut q);
            francis_qr(&mut s, &mut q, max_sweeps(n))?;
            split_real_blocks(&mut s, &mut q);
        }
        Ok(Self { s, q })
    }

    /// Eigenvalues as `(real_parts, imaginary_parts)` in diagonal order.
    ///
    /// A complex pair is listed with the positive imaginary part first.
    pub(crate) fn eigenvalues(&self) -> (Vec<T>, Vec<T>) {
        let n = self.s.nrows();
        let mut re = vec![T::zero(); n];
        let mut im = vec![T::zero(); n];
        let half = T::constant(0.5);

        let mut i = 0;
        while i < n {
            if i + 1 < n && self.s[(i + 1, i)] != T::zero() {
                let a = self.s[(i, i)];
                let b = self.s[(i, i + 1)];
                let c = self.s[(i + 1, i)];
                let d = self.s[(i + 1, i + 1)];
                let tr = (a + d) * half;
                let disc = (a - d) * (a - d) * half * half + b * c;
                let sq = disc.abs().sqrt();
                if disc >= T::zero() {
                    re[i] = tr + sq;
                    re[i + 1] = tr - sq;
                } else {
                    re[i] = tr;
                    re[i + 1] = tr;
                    im[i] = sq;
                    im[i + 1] = -sq;
                }
                i += 2;
            } else {
                re[i] = self.s[(i, i)];
                i += 1;
            }
        }
        (re, im)
    }
}
