use alloc::vec;

use crate::linalg::{givens, norm2, to_dyn, LinalgError};
use crate::traits::{FloatScalar, MatrixMut, MatrixRef};
use crate::DynMatrix;

/// Householder tridiagonalization of a symmetric matrix.
///
/// On return:
/// - `diag[0..n]` holds the diagonal of T
/// - `off_diag[0..n-1]` holds the sub-diagonal (`off_diag[i] = T[i+1, i]`)
/// - `q` holds the orthogonal Q with `Qᵀ·A·Q = T`
///
/// Only the lower triangle of `a` influences the result when `a` is
/// symmetric; the input itself is not modified.
pub(crate) fn tridiagonalize<T: FloatScalar>(
    a: &impl MatrixRef<T>,
    diag: &mut [T],
    off_diag: &mut [T],
    q: &mut DynMatrix<T>,
) {
    let n = a.nrows();
    debug_assert!(diag.len() >= n && off_diag.len() + 1 >= n);

    let mut w = to_dyn(a);
    *q = DynMatrix::eye(n, T::zero());
    let two = T::constant(2.0);

    for k in 0..n.saturating_sub(2) {
        let norm = norm2(((k + 1)..n).map(|i| w[(i, k)]));
        if norm == T::zero() {
            off_diag[k] = T::zero();
            continue;
        }

        let x0 = w[(k + 1, k)];
        let sigma = if x0 < T::zero() { -norm } else { norm };
        let v0 = x0 + sigma;

        // v = [v0, w[k+2.., k]]; the tail stays stored in column k
        let sub_n = n - k - 1;
        let v_at = |w: &DynMatrix<T>, i: usize| if i == 0 { v0 } else { w[(k + 1 + i, k)] };

        // ‖v‖² = 2·sigma·v0
        let tau = T::one() / (sigma * v0);

        // p = tau · A_sub · v
        let mut p = vec![T::zero(); sub_n];
        for (i, pi) in p.iter_mut().enumerate() {
            let mut dot = T::zero();
            for jj in 0..sub_n {
                dot = dot + w[(k + 1 + i, k + 1 + jj)] * v_at(&w, jj);
            }
            *pi = tau * dot;
        }

        // r = p − (tau/2)(vᵀp) v
        let mut vtp = T::zero();
        for (i, &pi) in p.iter().enumerate() {
            vtp = vtp + v_at(&w, i) * pi;
        }
        let half_tau_vtp = tau / two * vtp;
        let r: alloc::vec::Vec<T> = (0..sub_n).map(|i| p[i] - half_tau_vtp * v_at(&w, i)).collect();

        // A_sub −= v·rᵀ + r·vᵀ
        for i in 0..sub_n {
            let vi = v_at(&w, i);
            for j in 0..sub_n {
                let vj = v_at(&w, j);
                let cell = &mut w[(k + 1 + i, k + 1 + j)];
                *cell = *cell - vi * r[j] - r[i] * vj;
            }
        }

        off_diag[k] = -sigma;

        // Q ← Q·(I − tau·v·vᵀ)
        for row in 0..n {
            let mut s = T::zero();
            for m in 0..sub_n {
                s = s + q[(row, k + 1 + m)] * v_at(&w, m);
            }
            s = tau * s;
            for m in 0..sub_n {
                let vm = v_at(&w, m);
                q[(row, k + 1 + m)] = q[(row, k + 1 + m)] - s * vm;
            }
        }
    }

    for i in 0..n {
        diag[i] = w[(i, i)];
    }
    if n >= 2 {
        off_diag[n - 2] = w[(n - 1, n - 2)];
    }
}

/// Implicit symmetric QR with Wilkinson shifts on a tridiagonal matrix.
///
/// `diag` is overwritten with the eigenvalues, sorted ascending; `off_diag`
/// is destroyed. When `q` is given, rotations are accumulated into it and its
/// columns are permuted alongside the eigenvalues.
pub(crate) fn tridiagonal_qr<T: FloatScalar>(
    diag: &mut [T],
    off_diag: &mut [T],
    mut q: Option<&mut DynMatrix<T>>,
    max_iter: usize,
) -> Result<(), LinalgError> {
    let n = diag.len();
    if n <= 1 {
        return Ok(());
    }

    let eps = T::epsilon();
    let two = T::constant(2.0);
    let mut iter = 0usize;
    let mut hi = n - 1;

    while hi > 0 {
        let mut lo = hi;
        while lo > 0 {
            let threshold = eps * (diag[lo - 1].abs() + diag[lo].abs());
            if off_diag[lo - 1].abs() <= threshold {
                off_diag[lo - 1] = T::zero();
                break;
            }
            lo -= 1;
        }

        if lo == hi {
            hi -= 1;
            continue;
        }

        iter += 1;
        if iter > max_iter {
            tracing::warn!(iter, n, "tridiagonal QR did not converge");
            return Err(LinalgError::ConvergenceFailure);
        }

        // Wilkinson shift from the trailing 2×2
        let d = (diag[hi - 1] - diag[hi]) / two;
        let e = off_diag[hi - 1];
        let r = d.hypot(e);
        let shift = diag[hi] - e * e / (d + if d >= T::zero() { r } else { -r });

        let mut x = diag[lo] - shift;
        let mut z = off_diag[lo];

        for k in lo..hi {
            let (c, s) = givens(x, z);
            if k > lo {
                off_diag[k - 1] = c * x + s * z;
            }

            let d_k = diag[k];
            let d_k1 = diag[k + 1];
            let e_k = off_diag[k];
            diag[k] = c * c * d_k + two * c * s * e_k + s * s * d_k1;
            diag[k + 1] = s * s * d_k - two * c * s * e_k + c * c * d_k1;
            off_diag[k] = c * s * (d_k1 - d_k) + (c * c - s * s) * e_k;

            if k + 1 < hi {
                let e_next = off_diag[k + 1];
                x = off_diag[k];
                z = s * e_next;
                off_diag[k + 1] = c * e_next;
            }

            if let Some(q) = q.as_deref_mut() {
                for i in 0..q.nrows() {
                    let qik = q[(i, k)];
                    let qik1 = q[(i, k + 1)];
                    q[(i, k)] = c * qik + s * qik1;
                    q[(i, k + 1)] = c * qik1 - s * qik;
                }
            }
        }
    }
    tracing::trace!(iter, n, "tridiagonal QR converged");

    // selection sort keeps eigenvector columns in step with the values
    for i in 0..n {
        let mut min_idx = i;
        for j in (i + 1)..n {
            if diag[j] < diag[min_idx] {
                min_idx = j;
            }
        }
        if min_idx != i {
            diag.swap(i, min_idx);
            if let Some(q) = q.as_deref_mut() {
                for row in 0..q.nrows() {
                    let tmp = *q.get(row, i);
                    *q.get_mut(row, i) = *q.get(row, min_idx);
                    *q.get_mut(row, min_idx) = tmp;
                }
            }
        }
    }

    Ok(())
}

/// Eigenvalues (ascending) and orthonormal eigenvectors of a symmetric matrix.
pub(crate) fn symmetric_eigen<T: FloatScalar>(
    a: &impl MatrixRef<T>,
) -> Result<(alloc::vec::Vec<T>, DynMatrix<T>), LinalgError> {
    let n = a.nrows();
    let mut diag = vec![T::zero(); n];
    let mut off_diag = vec![T::zero(); n.saturating_sub(1)];
    let mut q = DynMatrix::zeros(n, n, T::zero());
    tridiagonalize(a, &mut diag, &mut off_diag, &mut q);
    tridiagonal_qr(&mut diag, &mut off_diag, Some(&mut q), super::max_sweeps(n))?;
    Ok((diag, q))
}
