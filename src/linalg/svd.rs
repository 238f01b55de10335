use alloc::vec;
use alloc::vec::Vec;

use crate::error::Result;
use crate::linalg::{givens, max_sweeps, norm2, to_dyn, LinalgError};
use crate::traits::{FloatScalar, MatrixMut, MatrixRef};
use crate::DynMatrix;

// ── Householder bidiagonalization ───────────────────────────────────

/// Householder bidiagonalization: reduce an M×N matrix (M ≥ N) to upper
/// bidiagonal form.
///
/// On return:
/// - `diag[0..n]` contains the bidiagonal diagonal
/// - `off_diag[0..n-1]` contains the bidiagonal superdiagonal
/// - the first element is the thin left factor `U` (M×N)
/// - the second is the right factor `V` (N×N)
///
/// so that `A = U · B · Vᵀ` with `B = bidiag(diag, off_diag)`.
pub(crate) fn bidiagonalize<T: FloatScalar>(
    a: &mut DynMatrix<T>,
    diag: &mut [T],
    off_diag: &mut [T],
) -> (DynMatrix<T>, DynMatrix<T>) {
    let m = a.nrows();
    let n = a.ncols();
    debug_assert!(m >= n, "bidiagonalize requires M >= N");

    let mut v = DynMatrix::eye(n, T::zero());
    // left reflectors stay below the diagonal of `a`; their taus live here
    let mut left_tau = vec![T::zero(); n];

    for k in 0..n {
        // ── Left Householder: zero out a[k+1:m, k] ──
        let norm = norm2(a.col_as_slice(k, k).iter().copied());

        if norm > T::zero() {
            let akk = a[(k, k)];
            let sigma = if akk < T::zero() { -norm } else { norm };
            let v0 = akk + sigma;

            for x in a.col_as_mut_slice(k, k + 1) {
                *x = *x / v0;
            }
            let tau = v0 / sigma;
            left_tau[k] = tau;

            // A[k:m, k+1:n] -= tau · v · (vᵀ · A)
            for j in (k + 1)..n {
                let mut dot = a[(k, j)];
                for i in (k + 1)..m {
                    dot = dot + a[(i, k)] * a[(i, j)];
                }
                dot = dot * tau;

                a[(k, j)] = a[(k, j)] - dot;
                for i in (k + 1)..m {
                    let vi = a[(i, k)];
                    a[(i, j)] = a[(i, j)] - dot * vi;
                }
            }

            diag[k] = -sigma;
        } else {
            diag[k] = a[(k, k)];
        }

        // ── Right Householder: zero out a[k, k+2:n] ──
        if k + 2 < n {
            let norm = norm2(((k + 1)..n).map(|j| a[(k, j)]));

            if norm > T::zero() {
                let ak_k1 = a[(k, k + 1)];
                let sigma = if ak_k1 < T::zero() { -norm } else { norm };
                let v0 = ak_k1 + sigma;

                for j in (k + 2)..n {
                    a[(k, j)] = a[(k, j)] / v0;
                }
                let tau = v0 / sigma;

                for i in (k + 1)..m {
                    let mut dot = a[(i, k + 1)];
                    for j in (k + 2)..n {
                        dot = dot + a[(i, j)] * a[(k, j)];
                    }
                    dot = dot * tau;

                    a[(i, k + 1)] = a[(i, k + 1)] - dot;
                    for j in (k + 2)..n {
                        let vj = a[(k, j)];
                        a[(i, j)] = a[(i, j)] - dot * vj;
                    }
                }

                // V = V · H_R
                for row in 0..n {
                    let mut dot = v[(row, k + 1)];
                    for j in (k + 2)..n {
                        dot = dot + v[(row, j)] * a[(k, j)];
                    }
                    dot = dot * tau;

                    v[(row, k + 1)] = v[(row, k + 1)] - dot;
                    for j in (k + 2)..n {
                        let vj = a[(k, j)];
                        v[(row, j)] = v[(row, j)] - dot * vj;
                    }
                }

                off_diag[k] = -sigma;
            } else {
                off_diag[k] = a[(k, k + 1)];
            }
        } else if k + 1 < n {
            off_diag[k] = a[(k, k + 1)];
        }
    }

    // thin U = H_0 · H_1 ⋯ H_{n-1} · I[:, 0..n], applied back to front
    let mut u = DynMatrix::from_fn(m, n, |i, j| if i == j { T::one() } else { T::zero() });
    for k in (0..n).rev() {
        let tau = left_tau[k];
        if tau == T::zero() {
            continue;
        }
        for j in k..n {
            let mut dot = u[(k, j)];
            for i in (k + 1)..m {
                dot = dot + a[(i, k)] * u[(i, j)];
            }
            dot = dot * tau;

            u[(k, j)] = u[(k, j)] - dot;
            for i in (k + 1)..m {
                let vi = a[(i, k)];
                u[(i, j)] = u[(i, j)] - dot * vi;
            }
        }
    }

    (u, v)
}

// ── Golub-Kahan bidiagonal QR ───────────────────────────────────────

fn rotate_columns<T: FloatScalar>(m: &mut DynMatrix<T>, j: usize, k: usize, c: T, s: T) {
    for row in 0..m.nrows() {
        let mj = m[(row, j)];
        let mk = m[(row, k)];
        m[(row, j)] = c * mj + s * mk;
        m[(row, k)] = c * mk - s * mj;
    }
}

fn swap_columns<T: Copy>(m: &mut DynMatrix<T>, i: usize, j: usize) {
    for row in 0..m.nrows() {
        let tmp = m[(row, i)];
        m[(row, i)] = m[(row, j)];
        m[(row, j)] = tmp;
    }
}

/// Golub-Kahan implicit-shift QR iteration on a bidiagonal matrix.
///
/// On return `diag` holds the non-negative singular values sorted
/// descending and `off_diag` is zeroed. Rotations are accumulated into the
/// columns of `u` and `v`.
pub(crate) fn bidiagonal_qr<T: FloatScalar>(
    diag: &mut [T],
    off_diag: &mut [T],
    u: &mut DynMatrix<T>,
    v: &mut DynMatrix<T>,
    max_iter: usize,
) -> core::result::Result<(), LinalgError> {
    let n = diag.len();
    let eps = T::epsilon();
    let two = T::constant(2.0);
    let mut iter = 0usize;

    let mut b_norm = T::zero();
    for &x in diag.iter().chain(off_diag.iter()) {
        b_norm = b_norm.max(x.abs());
    }
    let zero_tol = eps * b_norm;

    let mut hi = n.saturating_sub(1);
    while hi > 0 {
        let threshold = eps * (diag[hi - 1].abs() + diag[hi].abs());
        if off_diag[hi - 1].abs() <= threshold {
            off_diag[hi - 1] = T::zero();
            hi -= 1;
            continue;
        }

        let mut lo = hi - 1;
        while lo > 0 {
            let threshold = eps * (diag[lo - 1].abs() + diag[lo].abs());
            if off_diag[lo - 1].abs() <= threshold {
                off_diag[lo - 1] = T::zero();
                break;
            }
            lo -= 1;
        }

        iter += 1;
        if iter > max_iter {
            tracing::warn!(iter, n, "bidiagonal QR did not converge");
            return Err(LinalgError::ConvergenceFailure);
        }

        // A zero on the diagonal breaks the shift; chase its row off the
        // bottom with left rotations, which splits the block.
        if let Some(idx) = (lo..hi).find(|&idx| diag[idx].abs() <= zero_tol) {
            diag[idx] = T::zero();
            let mut z = off_diag[idx];
            off_diag[idx] = T::zero();
            for j in (idx + 1)..=hi {
                let (c, s) = givens(diag[j], z);
                diag[j] = c * diag[j] + s * z;
                if j < hi {
                    z = -s * off_diag[j];
                    off_diag[j] = c * off_diag[j];
                }
                rotate_columns(u, j, idx, c, s);
            }
            continue;
        }

        // Wilkinson shift from the trailing 2×2 of BᵀB
        let d_hi = diag[hi];
        let d_hi1 = diag[hi - 1];
        let e_hi1 = off_diag[hi - 1];
        let e_hi2 = if hi >= lo + 2 { off_diag[hi - 2] } else { T::zero() };

        let t11 = d_hi1 * d_hi1 + e_hi2 * e_hi2;
        let t12 = d_hi1 * e_hi1;
        let t22 = d_hi * d_hi + e_hi1 * e_hi1;

        let d = (t11 - t22) / two;
        let r = d.hypot(t12);
        let mu = t22 - t12 * (t12 / (d + if d >= T::zero() { r } else { -r }));

        let mut x = diag[lo] * diag[lo] - mu;
        let mut z = diag[lo] * off_diag[lo];

        for k in lo..hi {
            // right rotation on columns k, k+1 of B
            let (c, s) = givens(x, z);
            if k > lo {
                off_diag[k - 1] = c * x + s * z;
            }

            let dk = diag[k];
            let ek = off_diag[k];
            let dk1 = diag[k + 1];
            diag[k] = c * dk + s * ek;
            off_diag[k] = c * ek - s * dk;
            let bulge = s * dk1;
            diag[k + 1] = c * dk1;
            rotate_columns(v, k, k + 1, c, s);

            // left rotation on rows k, k+1 clears the bulge at B[k+1, k]
            let (c2, s2) = givens(diag[k], bulge);
            diag[k] = c2 * diag[k] + s2 * bulge;
            let old_ek = off_diag[k];
            let old_dk1 = diag[k + 1];
            off_diag[k] = c2 * old_ek + s2 * old_dk1;
            diag[k + 1] = c2 * old_dk1 - s2 * old_ek;

            if k + 1 < hi {
                let old_ek1 = off_diag[k + 1];
                x = off_diag[k];
                z = s2 * old_ek1;
                off_diag[k + 1] = c2 * old_ek1;
            }
            rotate_columns(u, k, k + 1, c2, s2);
        }
    }
    tracing::trace!(iter, n, "bidiagonal QR converged");

    for i in 0..n {
        if diag[i] < T::zero() {
            diag[i] = -diag[i];
            for row in 0..u.nrows() {
                u[(row, i)] = -u[(row, i)];
            }
        }
    }

    for i in 0..n {
        let mut max_idx = i;
        for j in (i + 1)..n {
            if diag[j] > diag[max_idx] {
                max_idx = j;
            }
        }
        if max_idx != i {
            diag.swap(i, max_idx);
            swap_columns(u, i, max_idx);
            swap_columns(v, i, max_idx);
        }
    }

    Ok(())
}

// ── Svd bundle ──────────────────────────────────────────────────────

/// Thin singular value decomposition `A = U · S · Vᵀ`.
///
/// With `k = min(m, n)`: `u` is m×k with orthonormal columns, `s` is the k×k
/// diagonal of singular values (non-negative, descending), and `v` is n×k
/// with orthonormal columns.
///
/// ```
/// use denseops::DynMatrix;
///
/// let a = DynMatrix::from_rows(2, 3, &[3.0_f64, 2.0, 2.0, 2.0, 3.0, -2.0]);
/// let svd = a.svd().unwrap();
/// assert_eq!(svd.u.shape(), (2, 2));
/// assert_eq!(svd.s.shape(), (2, 2));
/// assert_eq!(svd.v.shape(), (3, 2));
/// assert!((svd.s[(0, 0)] - 5.0).abs() < 1e-12);
/// assert!((svd.s[(1, 1)] - 3.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Svd<T> {
    pub u: DynMatrix<T>,
    pub s: DynMatrix<T>,
    pub v: DynMatrix<T>,
}

impl<T: FloatScalar> Svd<T> {
    /// Singular values, descending.
    pub fn singular_values(&self) -> Vec<T> {
        (0..self.s.nrows()).map(|i| self.s[(i, i)]).collect()
    }

    /// Number of singular values strictly greater than `tol`.
    pub fn rank(&self, tol: T) -> usize {
        (0..self.s.nrows()).filter(|&i| self.s[(i, i)] > tol).count()
    }

    /// Ratio of the largest to the smallest singular value.
    ///
    /// Infinite when the smallest singular value is zero.
    pub fn condition_number(&self) -> T {
        let k = self.s.nrows();
        if k == 0 {
            return T::one();
        }
        let smallest = self.s[(k - 1, k - 1)];
        if smallest == T::zero() {
            return T::infinity();
        }
        self.s[(0, 0)] / smallest
    }

    /// `U · S · Vᵀ`.
    pub fn reconstruct(&self) -> DynMatrix<T> {
        let m = self.u.nrows();
        let n = self.v.nrows();
        let k = self.s.nrows();
        DynMatrix::from_fn(m, n, |i, j| {
            let mut sum = T::zero();
            for p in 0..k {
                sum = sum + self.u[(i, p)] * self.s[(p, p)] * self.v[(j, p)];
            }
            sum
        })
    }
}

/// Singular value decomposition of any m×n matrix.
///
/// Tall and square inputs are bidiagonalized directly; wide inputs are
/// decomposed through their transpose with `U` and `V` swapped.
pub fn svd<T: FloatScalar>(a: &impl MatrixRef<T>) -> Result<Svd<T>> {
    let (m, n) = (a.nrows(), a.ncols());
    if m < n {
        let at = DynMatrix::from_fn(n, m, |i, j| *a.get(j, i));
        let Svd { u, s, v } = tall_svd(at)?;
        return Ok(Svd { u: v, s, v: u });
    }
    tall_svd(to_dyn(a))
}

fn tall_svd<T: FloatScalar>(mut a: DynMatrix<T>) -> Result<Svd<T>> {
    let n = a.ncols();
    let mut diag = vec![T::zero(); n];
    let mut off_diag = vec![T::zero(); n.saturating_sub(1)];
    let (mut u, mut v) = bidiagonalize(&mut a, &mut diag, &mut off_diag);
    bidiagonal_qr(&mut diag, &mut off_diag, &mut u, &mut v, max_sweeps(n))?;
    Ok(Svd { u, s: DynMatrix::from_diag(&diag), v })
}

impl<T: FloatScalar> DynMatrix<T> {
    /// Singular value decomposition. See [`svd`].
    pub fn svd(&self) -> Result<Svd<T>> {
        svd(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linalg::test_util::{assert_mat_near, assert_near};

    fn check(a: &DynMatrix<f64>) -> Svd<f64> {
        let svd = a.svd().unwrap();
        let k = a.nrows().min(a.ncols());
        assert_eq!(svd.u.shape(), (a.nrows(), k));
        assert_eq!(svd.s.shape(), (k, k));
        assert_eq!(svd.v.shape(), (a.ncols(), k));

        assert_mat_near(&svd.reconstruct(), a, 1e-10);
        assert_mat_near(&(&svd.u.transpose() * &svd.u), &DynMatrix::eye(k, 0.0), 1e-10);
        assert_mat_near(&(&svd.v.transpose() * &svd.v), &DynMatrix::eye(k, 0.0), 1e-10);

        let sv = svd.singular_values();
        for w in sv.windows(2) {
            assert!(w[0] >= w[1], "descending");
        }
        assert!(sv.iter().all(|&x| x >= 0.0));
        svd
    }

    #[test]
    fn identity_3x3() {
        let svd = check(&DynMatrix::eye(3, 0.0));
        assert_eq!(svd.singular_values(), vec![1.0; 3]);
    }

    #[test]
    fn diagonal_with_negative() {
        let svd = check(&DynMatrix::from_diag(&[-3.0, 1.0, 2.0]));
        assert_eq!(svd.singular_values(), vec![3.0, 2.0, 1.0]);
    }

    #[test]
    fn known_2x2() {
        // singular values of [[3, 0], [4, 5]] are 3√5 and √5
        let svd = check(&DynMatrix::from_rows(2, 2, &[3.0, 0.0, 4.0, 5.0]));
        let sv = svd.singular_values();
        assert_near(sv[0], 3.0 * 5.0_f64.sqrt(), 1e-12, "σ0");
        assert_near(sv[1], 5.0_f64.sqrt(), 1e-12, "σ1");
    }

    #[test]
    fn tall_5x3() {
        check(&DynMatrix::from_fn(5, 3, |i, j| ((i + 1) * (j + 2)) as f64 + (i * j % 3) as f64));
    }

    #[test]
    fn wide_2x3_swaps_factors() {
        let a = DynMatrix::from_rows(2, 3, &[3.0, 2.0, 2.0, 2.0, 3.0, -2.0]);
        let svd = check(&a);
        assert_near(svd.s[(0, 0)], 5.0, 1e-12, "σ0");
        assert_near(svd.s[(1, 1)], 3.0, 1e-12, "σ1");
    }

    #[test]
    fn rank_deficient() {
        let a = DynMatrix::from_rows(3, 3, &[1.0, 2.0, 3.0, 2.0, 4.0, 6.0, 1.0, 1.0, 1.0]);
        let svd = check(&a);
        assert_eq!(svd.rank(1e-10), 2);
        assert!(svd.condition_number() > 1e12);
    }

    #[test]
    fn rank_and_condition() {
        let svd = check(&DynMatrix::from_diag(&[4.0, 2.0]));
        assert_eq!(svd.rank(1e-12), 2);
        assert_near(svd.condition_number(), 2.0, 1e-12, "cond");
    }

    #[test]
    fn zero_matrix() {
        let svd = check(&DynMatrix::zeros(3, 2, 0.0));
        assert_eq!(svd.singular_values(), vec![0.0, 0.0]);
        assert_eq!(svd.rank(0.0), 0);
        assert!(svd.condition_number().is_infinite());
    }

    #[test]
    fn single_column() {
        let svd = check(&DynMatrix::column(&[3.0, -4.0]));
        assert_near(svd.s[(0, 0)], 5.0, 1e-12, "norm");
    }

    #[test]
    fn one_by_one_negative() {
        let svd = check(&DynMatrix::from_rows(1, 1, &[-7.0]));
        assert_eq!(svd.s[(0, 0)], 7.0);
    }

    #[test]
    fn empty_is_ok() {
        let svd = DynMatrix::<f64>::zeros(0, 3, 0.0).svd().unwrap();
        assert_eq!(svd.s.shape(), (0, 0));
        assert_eq!(svd.v.shape(), (3, 0));
    }

    #[test]
    fn f32_support() {
        let a = DynMatrix::from_rows(2, 2, &[3.0_f32, 0.0, 4.0, 5.0]);
        let svd = a.svd().unwrap();
        assert!((svd.s[(0, 0)] - 3.0 * 5.0_f32.sqrt()).abs() < 1e-4);
        assert!((svd.s[(1, 1)] - 5.0_f32.sqrt()).abs() < 1e-4);
    }

    #[test]
    fn reconstructs_at_extreme_scales() {
        let base = DynMatrix::from_rows(2, 2, &[1.0_f64, 2.0, 3.0, 4.0]);
        for c in [1e-17, 1e-100, 1e17, 1e100] {
            let a = base.scale(c);
            let svd = a.svd().unwrap();
            assert_mat_near(&svd.reconstruct().scale(1.0 / c), &base, 1e-12);
            let unit = base.svd().unwrap().singular_values();
            for (got, want) in svd.singular_values().iter().zip(unit) {
                assert_near(got / c, want, 1e-12, "scaled singular value");
            }
        }
    }

    #[test]
    fn tiny_tall_matrix() {
        let a = DynMatrix::from_fn(5, 3, |i, j| ((i * 3 + j) % 4) as f64 + 0.5 * (i == j) as u8 as f64);
        let svd = a.scale(1e-20).svd().unwrap();
        assert_mat_near(&svd.reconstruct().scale(1e20), &a, 1e-10);
    }
}
