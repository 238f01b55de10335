use alloc::vec::Vec;

use crate::linalg::norm2;
use crate::traits::{FloatScalar, MatrixMut};
use crate::DynMatrix;

/// Reduce a square matrix to upper Hessenberg form via Householder similarity
/// transforms: `Qᵀ·A·Q = H`.
///
/// On return `a` is overwritten with `H` and `q` holds the orthogonal `Q`,
/// so that `A = Q·H·Qᵀ`.
pub(crate) fn hessenberg<T: FloatScalar>(a: &mut DynMatrix<T>, q: &mut DynMatrix<T>) {
    let n = a.nrows();
    debug_assert_eq!(n, a.ncols());
    *q = DynMatrix::eye(n, T::zero());

    for k in 0..n.saturating_sub(2) {
        let norm = norm2(((k + 1)..n).map(|i| a[(i, k)]));
        if norm == T::zero() {
            continue;
        }

        let x0 = a[(k + 1, k)];
        let sigma = if x0 < T::zero() { -norm } else { norm };
        let v0 = x0 + sigma;

        // v = [1, a[k+2.., k] / v0]
        let v: Vec<T> = core::iter::once(T::one())
            .chain(((k + 2)..n).map(|i| a[(i, k)] / v0))
            .collect();
        let tau = v0 / sigma;

        // left: A[k+1.., k+1..] = (I − tau·v·vᵀ)·A[k+1.., k+1..]
        for j in (k + 1)..n {
            let col = &mut a.col_as_mut_slice(j, k + 1)[..v.len()];
            let mut dot = T::zero();
            for (&vi, &x) in v.iter().zip(col.iter()) {
                dot = dot + vi * x;
            }
            dot = dot * tau;
            for (x, &vi) in col.iter_mut().zip(v.iter()) {
                *x = *x - dot * vi;
            }
        }

        // right: A[.., k+1..] = A[.., k+1..]·(I − tau·v·vᵀ)
        reflect_columns(a, k + 1, &v, tau);
        reflect_columns(q, k + 1, &v, tau);

        a[(k + 1, k)] = -sigma;
        for i in (k + 2)..n {
            a[(i, k)] = T::zero();
        }
    }
}

/// `M[.., start..] ← M[.., start..]·(I − tau·v·vᵀ)`.
fn reflect_columns<T: FloatScalar>(m: &mut DynMatrix<T>, start: usize, v: &[T], tau: T) {
    for i in 0..m.nrows() {
        let mut dot = T::zero();
        for (jj, &vj) in v.iter().enumerate() {
            dot = dot + m[(i, start + jj)] * vj;
        }
        dot = dot * tau;
        for (jj, &vj) in v.iter().enumerate() {
            m[(i, start + jj)] = m[(i, start + jj)] - dot * vj;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linalg::test_util::{assert_mat_near, assert_near};

    fn check(orig: &DynMatrix<f64>) {
        let n = orig.nrows();
        let mut h = orig.clone();
        let mut q = DynMatrix::zeros(n, n, 0.0);
        hessenberg(&mut h, &mut q);

        for i in 2..n {
            for j in 0..i - 1 {
                assert_near(h[(i, j)], 0.0, 1e-12, "below sub-diagonal");
            }
        }
        let qt = q.transpose();
        assert_mat_near(&(&(&qt * orig) * &q), &h, 1e-10);
        assert_mat_near(&(&qt * &q), &DynMatrix::eye(n, 0.0), 1e-12);
    }

    #[test]
    fn hessenberg_3x3() {
        check(&DynMatrix::from_rows(3, 3, &[4.0, 1.0, -2.0, 1.0, 2.0, 0.0, -2.0, 0.0, 3.0]));
    }

    #[test]
    fn hessenberg_4x4() {
        check(&DynMatrix::from_fn(4, 4, |i, j| (4 * i + j + 1) as f64));
    }

    #[test]
    fn hessenberg_5x5_nonsymmetric() {
        check(&DynMatrix::from_fn(5, 5, |i, j| ((i * 7 + j * 3) % 5) as f64 - 1.5 * (i == j) as u8 as f64));
    }

    #[test]
    fn upper_triangular_is_untouched() {
        let a = DynMatrix::from_rows(3, 3, &[1.0, 2.0, 3.0, 0.0, 5.0, 6.0, 0.0, 0.0, 8.0]);
        let mut h = a.clone();
        let mut q = DynMatrix::zeros(3, 3, 0.0);
        hessenberg(&mut h, &mut q);
        assert_eq!(h, a);
        assert_eq!(q, DynMatrix::eye(3, 0.0));
    }

    #[test]
    fn tiny_entries_are_still_reduced() {
        let a = DynMatrix::from_fn(4, 4, |i, j| (4 * i + j + 1) as f64).scale(1e-18);
        let mut h = a.clone();
        let mut q = DynMatrix::zeros(4, 4, 0.0);
        hessenberg(&mut h, &mut q);
        for i in 2..4 {
            for j in 0..i - 1 {
                assert_eq!(h[(i, j)], 0.0);
            }
        }
        let rebuilt = &(&q * &h) * &q.transpose();
        assert_mat_near(&rebuilt.scale(1e18), &a.scale(1e18), 1e-10);
    }
}
