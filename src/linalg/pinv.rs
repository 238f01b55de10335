use crate::error::{DimensionMismatch, Result};
use crate::linalg::{svd, Svd};
use crate::traits::{FloatScalar, MatrixRef};
use crate::DynMatrix;

/// Moore–Penrose pseudoinverse `A⁺ = V · S⁺ · Uᵀ` (n×m for an m×n input).
///
/// Singular values at or below `max(m, n) · σ_max · ε` are treated as zero.
///
/// ```
/// use denseops::DynMatrix;
///
/// let a = DynMatrix::from_rows(3, 2, &[1.0_f64, 0.0, 0.0, 1.0, 0.0, 0.0]);
/// let p = a.pseudo_inverse().unwrap();
/// assert_eq!(p.shape(), (2, 3));
/// assert!((p[(0, 0)] - 1.0).abs() < 1e-12);
/// assert!(p[(0, 2)].abs() < 1e-12);
/// ```
pub fn pseudo_inverse<T: FloatScalar>(a: &impl MatrixRef<T>) -> Result<DynMatrix<T>> {
    let decomposition = svd(a)?;
    let sigma_max = if decomposition.s.nrows() > 0 { decomposition.s[(0, 0)] } else { T::zero() };
    let dim = a.nrows().max(a.ncols());
    let tol = T::constant(dim as f64) * sigma_max * T::epsilon();
    Ok(assemble(&decomposition, tol))
}

/// Pseudoinverse with an explicit cutoff: singular values `<= tol` are
/// treated as zero.
pub fn pseudo_inverse_with_tol<T: FloatScalar>(a: &impl MatrixRef<T>, tol: T) -> Result<DynMatrix<T>> {
    let decomposition = svd(a)?;
    Ok(assemble(&decomposition, tol))
}

fn assemble<T: FloatScalar>(d: &Svd<T>, tol: T) -> DynMatrix<T> {
    let m = d.u.nrows();
    let n = d.v.nrows();
    let k = d.s.nrows();
    let kept = (0..k).filter(|&p| d.s[(p, p)] > tol).count();
    tracing::trace!(kept, k, "pseudo_inverse: singular values above cutoff");

    DynMatrix::from_fn(n, m, |i, j| {
        let mut sum = T::zero();
        // singular values are descending, so the kept ones are a prefix
        for p in 0..kept {
            sum = sum + d.v[(i, p)] * d.u[(j, p)] / d.s[(p, p)];
        }
        sum
    })
}

/// Least-squares (minimum-norm) solution of `A·X = B` via `A⁺ · B`.
///
/// Valid for any shape of `A` and for singular `A`; this is the fallback
/// for [`solve`](crate::linalg::solve) when it reports a singular matrix.
///
/// ```
/// use denseops::{DynMatrix, Error, LinalgError};
///
/// let a = DynMatrix::from_rows(2, 2, &[1.0_f64, 1.0, 1.0, 1.0]);
/// let b = DynMatrix::from_rows(2, 1, &[2.0, 2.0]);
/// assert_eq!(a.solve(&b).unwrap_err(), Error::Numerical(LinalgError::Singular));
/// let x = a.solve_least_squares(&b).unwrap();
/// assert!((x[(0, 0)] - 1.0).abs() < 1e-12);
/// assert!((x[(1, 0)] - 1.0).abs() < 1e-12);
/// ```
pub fn solve_least_squares<T: FloatScalar>(a: &impl MatrixRef<T>, b: &DynMatrix<T>) -> Result<DynMatrix<T>> {
    DimensionMismatch::check((a.nrows(), b.ncols()), b.shape())?;
    let pinv = pseudo_inverse(a)?;
    Ok(pinv.matmul(b)?)
}

/// Convenience methods.
impl<T: FloatScalar> DynMatrix<T> {
    /// Pseudoinverse. See [`pseudo_inverse`].
    pub fn pseudo_inverse(&self) -> Result<DynMatrix<T>> {
        pseudo_inverse(self)
    }

    /// Pseudoinverse with an explicit cutoff. See [`pseudo_inverse_with_tol`].
    pub fn pseudo_inverse_with_tol(&self, tol: T) -> Result<DynMatrix<T>> {
        pseudo_inverse_with_tol(self, tol)
    }

    /// Least-squares solve. See [`solve_least_squares`].
    pub fn solve_least_squares(&self, b: &DynMatrix<T>) -> Result<DynMatrix<T>> {
        solve_least_squares(self, b)
    }
}
