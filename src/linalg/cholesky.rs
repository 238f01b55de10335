use alloc::vec;

use crate::error::{ensure_square, DimensionMismatch, Result};
use crate::linalg::{to_dyn, LinalgError};
use crate::traits::{FloatScalar, MatrixMut, MatrixRef};
use crate::DynMatrix;

/// Left-looking Cholesky factorization on the lower triangle of `a`.
///
/// On success the lower triangle (including the diagonal) holds `L`; the
/// strict upper triangle is not read or written. On failure `a` is partially
/// overwritten, so callers that promise atomicity work on a copy.
fn factor_lower<T: FloatScalar>(a: &mut impl MatrixMut<T>) -> core::result::Result<(), LinalgError> {
    let n = a.nrows();
    for j in 0..n {
        for k in 0..j {
            let ljk = *a.get(j, k);
            if ljk == T::zero() {
                continue;
            }
            for i in j..n {
                let lik = *a.get(i, k);
                let v = a.get_mut(i, j);
                *v = *v - ljk * lik;
            }
        }

        let diag = *a.get(j, j);
        // also rejects NaN, which would otherwise leak into every later column
        if !(diag > T::zero()) {
            tracing::debug!(pivot = j, "cholesky: non-positive pivot");
            return Err(LinalgError::NotPositiveDefinite);
        }
        let ljj = diag.sqrt();
        *a.get_mut(j, j) = ljj;

        let inv_ljj = T::one() / ljj;
        for x in a.col_as_mut_slice(j, j + 1).iter_mut() {
            *x = *x * inv_ljj;
        }
    }
    Ok(())
}

/// Cholesky factorization in place: on success `a` becomes the lower
/// triangular factor `L` with `A = L·Lᵀ` (strict upper triangle zeroed).
///
/// Only the lower triangle of `a` is read; the matrix is assumed symmetric.
/// Fails with a domain error for non-square input and
/// [`LinalgError::NotPositiveDefinite`] when a pivot is not positive.
/// On failure `a` is left unchanged.
pub fn cholesky_in_place<T: FloatScalar>(a: &mut impl MatrixMut<T>) -> Result<()> {
    let n = a.nrows();
    ensure_square(n, a.ncols())?;

    let mut work = to_dyn(&*a);
    factor_lower(&mut work)?;

    for j in 0..n {
        for i in 0..n {
            *a.get_mut(i, j) = if i >= j { work[(i, j)] } else { T::zero() };
        }
    }
    Ok(())
}

/// Cholesky decomposition of a symmetric positive-definite matrix.
///
/// ```
/// use denseops::DynMatrix;
///
/// let a = DynMatrix::from_rows(2, 2, &[4.0_f64, 2.0, 2.0, 3.0]);
/// let chol = a.cholesky().unwrap();
/// let l = chol.l();
/// let rebuilt = l * &l.transpose();
/// assert!((rebuilt[(1, 1)] - 3.0).abs() < 1e-12);
/// assert!((chol.det() - 8.0).abs() < 1e-12);
/// ```
pub fn cholesky<T: FloatScalar>(a: &impl MatrixRef<T>) -> Result<Cholesky<T>> {
    let mut l = to_dyn(a);
    cholesky_in_place(&mut l)?;
    Ok(Cholesky { l })
}

/// Solve `L·x = b` by forward substitution, where `L` is lower triangular.
pub(crate) fn forward_substitute<T: FloatScalar>(l: &impl MatrixRef<T>, b: &[T], x: &mut [T]) {
    let n = l.nrows();
    for i in 0..n {
        let mut sum = b[i];
        for j in 0..i {
            sum = sum - *l.get(i, j) * x[j];
        }
        x[i] = sum / *l.get(i, i);
    }
}

/// Solve `Lᵀ·x = b` by back substitution, where `L` is lower triangular.
pub(crate) fn back_substitute_lt<T: FloatScalar>(l: &impl MatrixRef<T>, b: &[T], x: &mut [T]) {
    let n = l.nrows();
    for i in (0..n).rev() {
        let mut sum = b[i];
        for j in (i + 1)..n {
            sum = sum - *l.get(j, i) * x[j];
        }
        x[i] = sum / *l.get(i, i);
    }
}

/// Lower triangular Cholesky factor `L` of a matrix `A = L·Lᵀ`.
#[derive(Debug, Clone, PartialEq)]
pub struct Cholesky<T> {
    l: DynMatrix<T>,
}

impl<T: FloatScalar> Cholesky<T> {
    /// The factor `L` (zeros above the diagonal).
    #[inline]
    pub fn l(&self) -> &DynMatrix<T> {
        &self.l
    }

    /// Consume the decomposition, returning `L`.
    #[inline]
    pub fn into_l(self) -> DynMatrix<T> {
        self.l
    }

    /// Solve `A·X = B` for every column of `B`.
    pub fn solve(&self, b: &DynMatrix<T>) -> Result<DynMatrix<T>> {
        let n = self.l.nrows();
        DimensionMismatch::check((n, b.ncols()), b.shape())?;

        let mut out = DynMatrix::zeros(n, b.ncols(), T::zero());
        let mut y = vec![T::zero(); n];
        for col in 0..b.ncols() {
            forward_substitute(&self.l, b.col_as_slice(col, 0), &mut y);
            back_substitute_lt(&self.l, &y, out.col_as_mut_slice(col, 0));
        }
        Ok(out)
    }

    /// Determinant: `det(A) = (Π Lᵢᵢ)²`.
    pub fn det(&self) -> T {
        let n = self.l.nrows();
        let mut prod = T::one();
        for i in 0..n {
            prod = prod * self.l[(i, i)];
        }
        prod * prod
    }

    /// Log-determinant: `ln det(A) = 2 Σ ln Lᵢᵢ`.
    ///
    /// More numerically stable than `det()` for large matrices.
    pub fn ln_det(&self) -> T {
        let n = self.l.nrows();
        let mut sum = T::zero();
        for i in 0..n {
            sum = sum + self.l[(i, i)].ln();
        }
        sum + sum
    }

    /// `A⁻¹` from the factorization.
    pub fn inverse(&self) -> DynMatrix<T> {
        let n = self.l.nrows();
        let mut inv = DynMatrix::zeros(n, n, T::zero());
        let mut e = vec![T::zero(); n];
        let mut y = vec![T::zero(); n];

        for col in 0..n {
            if col > 0 {
                e[col - 1] = T::zero();
            }
            e[col] = T::one();
            forward_substitute(&self.l, &e, &mut y);
            back_substitute_lt(&self.l, &y, inv.col_as_mut_slice(col, 0));
        }
        inv
    }
}

/// Convenience methods.
impl<T: FloatScalar> DynMatrix<T> {
    /// Cholesky decomposition (`A = L·Lᵀ`). See [`cholesky`].
    pub fn cholesky(&self) -> Result<Cholesky<T>> {
        cholesky(self)
    }

    /// Replace `self` with its Cholesky factor. See [`cholesky_in_place`].
    pub fn cholesky_in_place(&mut self) -> Result<()> {
        cholesky_in_place(self)
    }
}
