//! Dense decompositions and solvers.
//!
//! Free functions accept any `&impl MatrixRef<T>`; each one is mirrored by a
//! convenience method on [`DynMatrix`](crate::DynMatrix). Results are fresh
//! allocations that never alias the input.
//!
//! | Operation | Function | Method |
//! |---|---|---|
//! | Cholesky `A = L·Lᵀ` | [`cholesky`], [`cholesky_in_place`] | `a.cholesky()`, `a.cholesky_in_place()` |
//! | SVD `A = U·S·Vᵀ` | [`svd`] | `a.svd()` |
//! | Eigenpairs | [`eigen`] | `a.eigen()` |
//! | Real eigenvalues | [`real_eigenvalues`] | `a.real_eigenvalues()` |
//! | Full spectrum | [`eigenvalues`] | `a.eigenvalues()` |
//! | Pseudoinverse | [`pseudo_inverse`] | `a.pseudo_inverse()` |
//! | Solve `A·X = B` | [`solve`] | `a.solve(&b)` |
//! | Least squares | [`solve_least_squares`] | `a.solve_least_squares(&b)` |
//! | Determinant | [`determinant`] | `a.determinant()` |
//! | Inverse | [`inverse`] | `a.inverse()` |
//!
//! Iterative stages (bidiagonal, tridiagonal and Francis QR) give up after
//! `30·n` sweeps with [`LinalgError::ConvergenceFailure`].

pub(crate) mod cholesky;
pub(crate) mod eigen;
pub(crate) mod hessenberg;
pub(crate) mod lu;
pub(crate) mod pinv;
pub(crate) mod schur;
pub(crate) mod svd;
pub(crate) mod symmetric_eigen;

pub use cholesky::{cholesky, cholesky_in_place, Cholesky};
pub use eigen::{eigen, eigenvalues, real_eigenvalues, Eigen, EigenvaluesComplex};
pub use lu::{determinant, inverse, solve};
pub use pinv::{pseudo_inverse, pseudo_inverse_with_tol, solve_least_squares};
pub use svd::{svd, Svd};

use crate::traits::{FloatScalar, MatrixRef};
use crate::DynMatrix;

/// Numerical failures: the decomposition itself cannot proceed.
///
/// ```
/// use denseops::{DynMatrix, Error, LinalgError};
///
/// let singular = DynMatrix::from_rows(2, 2, &[1.0_f64, 2.0, 2.0, 4.0]);
/// let b = DynMatrix::from_rows(2, 1, &[1.0, 1.0]);
/// assert_eq!(singular.solve(&b).unwrap_err(), Error::Numerical(LinalgError::Singular));
///
/// let not_pd = DynMatrix::from_rows(2, 2, &[1.0_f64, 5.0, 5.0, 1.0]);
/// assert_eq!(
///     not_pd.cholesky().unwrap_err(),
///     Error::Numerical(LinalgError::NotPositiveDefinite)
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LinalgError {
    /// Matrix is singular or nearly singular.
    #[error("matrix is singular")]
    Singular,
    /// Matrix is not positive definite (required for Cholesky).
    #[error("matrix is not positive definite")]
    NotPositiveDefinite,
    /// Iterative algorithm did not converge within the iteration budget.
    #[error("iterative algorithm did not converge")]
    ConvergenceFailure,
    /// Eigenvectors requested for a spectrum with complex-conjugate pairs.
    #[error("matrix has complex eigenvalues")]
    ComplexEigenvalues,
}

/// Iteration budget shared by the QR-type sweeps.
#[inline]
pub(crate) fn max_sweeps(n: usize) -> usize {
    30 * n.max(1)
}

/// Givens rotation: returns `(c, s)` such that
/// `[[c, s], [-s, c]] · [a; b] = [r; 0]`.
#[inline]
pub(crate) fn givens<T: FloatScalar>(a: T, b: T) -> (T, T) {
    if b == T::zero() {
        return (T::one(), T::zero());
    }
    let r = a.hypot(b);
    (a / r, b / r)
}

/// Copy any matrix-like value into a fresh `DynMatrix`.
pub(crate) fn to_dyn<T: Copy>(a: &impl MatrixRef<T>) -> DynMatrix<T> {
    DynMatrix::from_fn(a.nrows(), a.ncols(), |i, j| *a.get(i, j))
}

/// Largest absolute entry; used to scale tolerances.
pub(crate) fn max_abs<T: FloatScalar>(a: &impl MatrixRef<T>) -> T {
    let mut m = T::zero();
    for j in 0..a.ncols() {
        for &x in a.col_as_slice(j, 0) {
            m = m.max(x.abs());
        }
    }
    m
}

/// Euclidean norm, accumulated relative to the largest entry so that tiny
/// and huge inputs neither underflow nor overflow. Zero only for a zero vector.
pub(crate) fn norm2<T: FloatScalar>(xs: impl Iterator<Item = T> + Clone) -> T {
    let scale = xs.clone().fold(T::zero(), |m, x| m.max(x.abs()));
    if scale == T::zero() {
        return T::zero();
    }
    let sum = xs.fold(T::zero(), |acc, x| {
        let r = x / scale;
        acc + r * r
    });
    scale * sum.sqrt()
}
