//! Per-axis reductions and pairwise measures.
//!
//! Row reductions return an `nrows × 1` column; column reductions return a
//! `1 × ncols` row.
//!
//! | Reduction | Rows | Columns | Empty axis |
//! |---|---|---|---|
//! | Sum | [`sums_of_rows`] | [`sums_of_columns`] | 0 |
//! | Mean | [`means_of_rows`] | [`means_of_columns`] | `EmptyAxis` |
//! | Population variance (÷ n) | [`variances_of_rows`] | [`variances_of_columns`] | `EmptyAxis` |
//! | Sample variance (÷ n − 1) | [`sample_variances_of_rows`] | [`sample_variances_of_columns`] | `EmptyAxis`, `TooFewObservations` for n = 1 |
//! | Minimum | [`minimums_of_rows`] | [`minimums_of_columns`] | `EmptyAxis` |
//! | Maximum | [`maximums_of_rows`] | [`maximums_of_columns`] | `EmptyAxis` |
//!
//! Pairwise: [`euclidean_distance`], [`quadrance`]. [`determinant`] is
//! re-exported from [`linalg`](crate::linalg).
//!
//! # Example
//!
//! ```
//! use denseops::DynMatrix;
//!
//! let m = DynMatrix::from_rows(2, 3, &[1.0_f64, 2.0, 3.0, 4.0, 6.0, 8.0]);
//! assert_eq!(m.means_of_rows().unwrap(), DynMatrix::column(&[2.0, 6.0]));
//! assert_eq!(m.sums_of_columns(), DynMatrix::row(&[5.0, 8.0, 11.0]));
//! assert_eq!(m.variances_of_columns().unwrap(), DynMatrix::row(&[2.25, 4.0, 6.25]));
//! ```
//!
//! Extrema propagate NaN: an axis containing NaN reduces to NaN.


use alloc::vec::Vec;

use crate::error::{DimensionMismatch, DomainError, Result};
use crate::traits::{FloatScalar, MatrixRef};
use crate::DynMatrix;

pub use crate::linalg::determinant;

// ── Slice kernels ───────────────────────────────────────────────────

fn sum<T: FloatScalar>(xs: &[T]) -> T {
    xs.iter().fold(T::zero(), |acc, &x| acc + x)
}

fn mean<T: FloatScalar>(xs: &[T]) -> core::result::Result<T, DomainError> {
    if xs.is_empty() {
        return Err(DomainError::EmptyAxis);
    }
    Ok(sum(xs) / T::constant(xs.len() as f64))
}

/// Two-pass sum of squared deviations from the mean.
fn sum_sq_dev<T: FloatScalar>(xs: &[T]) -> core::result::Result<T, DomainError> {
    let mu = mean(xs)?;
    Ok(xs.iter().fold(T::zero(), |acc, &x| acc + (x - mu) * (x - mu)))
}

fn population_variance<T: FloatScalar>(xs: &[T]) -> core::result::Result<T, DomainError> {
    Ok(sum_sq_dev(xs)? / T::constant(xs.len() as f64))
}

fn sample_variance<T: FloatScalar>(xs: &[T]) -> core::result::Result<T, DomainError> {
    let ss = sum_sq_dev(xs)?;
    let n = xs.len();
    if n < 2 {
        return Err(DomainError::TooFewObservations { n });
    }
    Ok(ss / T::constant((n - 1) as f64))
}

fn extremum<T: FloatScalar>(
    xs: &[T],
    better: impl Fn(T, T) -> bool,
) -> core::result::Result<T, DomainError> {
    let (&first, rest) = xs.split_first().ok_or(DomainError::EmptyAxis)?;
    let mut best = first;
    for &x in rest {
        if x.is_nan() || best.is_nan() {
            return Ok(T::nan());
        }
        if better(x, best) {
            best = x;
        }
    }
    Ok(best)
}

fn minimum<T: FloatScalar>(xs: &[T]) -> core::result::Result<T, DomainError> {
    extremum(xs, |x, best| x < best)
}

fn maximum<T: FloatScalar>(xs: &[T]) -> core::result::Result<T, DomainError> {
    extremum(xs, |x, best| x > best)
}

// ── Axis drivers ────────────────────────────────────────────────────

/// Run `f` over each row, gathered into a scratch buffer. Returns `nrows × 1`.
fn over_rows<T: FloatScalar>(
    a: &impl MatrixRef<T>,
    mut f: impl FnMut(&[T]) -> core::result::Result<T, DomainError>,
) -> Result<DynMatrix<T>> {
    let (m, n) = (a.nrows(), a.ncols());
    let mut row = Vec::with_capacity(n);
    let mut out = Vec::with_capacity(m);
    for i in 0..m {
        row.clear();
        row.extend((0..n).map(|j| *a.get(i, j)));
        out.push(f(&row)?);
    }
    Ok(DynMatrix::column(&out))
}

/// Run `f` over each column slice. Returns `1 × ncols`.
fn over_columns<T: FloatScalar>(
    a: &impl MatrixRef<T>,
    mut f: impl FnMut(&[T]) -> core::result::Result<T, DomainError>,
) -> Result<DynMatrix<T>> {
    let out = (0..a.ncols())
        .map(|j| f(a.col_as_slice(j, 0)))
        .collect::<core::result::Result<Vec<T>, _>>()?;
    Ok(DynMatrix::row(&out))
}

// ── Public reductions ───────────────────────────────────────────────

/// Sum of each row (`nrows × 1`). An empty row sums to zero.
pub fn sums_of_rows<T: FloatScalar>(a: &impl MatrixRef<T>) -> DynMatrix<T> {
    let (m, n) = (a.nrows(), a.ncols());
    DynMatrix::from_fn(m, 1, |i, _| (0..n).fold(T::zero(), |acc, j| acc + *a.get(i, j)))
}

/// Sum of each column (`1 × ncols`). An empty column sums to zero.
pub fn sums_of_columns<T: FloatScalar>(a: &impl MatrixRef<T>) -> DynMatrix<T> {
    DynMatrix::from_fn(1, a.ncols(), |_, j| sum(a.col_as_slice(j, 0)))
}

/// Mean of each row (`nrows × 1`).
pub fn means_of_rows<T: FloatScalar>(a: &impl MatrixRef<T>) -> Result<DynMatrix<T>> {
    over_rows(a, mean)
}

/// Mean of each column (`1 × ncols`).
pub fn means_of_columns<T: FloatScalar>(a: &impl MatrixRef<T>) -> Result<DynMatrix<T>> {
    over_columns(a, mean)
}

/// Population variance (divide by `n`) of each row.
pub fn variances_of_rows<T: FloatScalar>(a: &impl MatrixRef<T>) -> Result<DynMatrix<T>> {
    over_rows(a, population_variance)
}

/// Population variance (divide by `n`) of each column.
pub fn variances_of_columns<T: FloatScalar>(a: &impl MatrixRef<T>) -> Result<DynMatrix<T>> {
    over_columns(a, population_variance)
}

/// Sample variance (divide by `n − 1`) of each row.
///
/// Rows of length one fail with [`DomainError::TooFewObservations`].
pub fn sample_variances_of_rows<T: FloatScalar>(a: &impl MatrixRef<T>) -> Result<DynMatrix<T>> {
    over_rows(a, sample_variance)
}

/// Sample variance (divide by `n − 1`) of each column.
pub fn sample_variances_of_columns<T: FloatScalar>(a: &impl MatrixRef<T>) -> Result<DynMatrix<T>> {
    over_columns(a, sample_variance)
}

/// Smallest entry of each row.
pub fn minimums_of_rows<T: FloatScalar>(a: &impl MatrixRef<T>) -> Result<DynMatrix<T>> {
    over_rows(a, minimum)
}

/// Smallest entry of each column.
pub fn minimums_of_columns<T: FloatScalar>(a: &impl MatrixRef<T>) -> Result<DynMatrix<T>> {
    over_columns(a, minimum)
}

/// Largest entry of each row.
pub fn maximums_of_rows<T: FloatScalar>(a: &impl MatrixRef<T>) -> Result<DynMatrix<T>> {
    over_rows(a, maximum)
}

/// Largest entry of each column.
pub fn maximums_of_columns<T: FloatScalar>(a: &impl MatrixRef<T>) -> Result<DynMatrix<T>> {
    over_columns(a, maximum)
}

/// Squared Euclidean distance `Σ (a − b)²`. Shapes must match.
///
/// ```
/// use denseops::DynMatrix;
/// let a = DynMatrix::row(&[0.0_f64, 0.0]);
/// let b = DynMatrix::row(&[3.0_f64, 4.0]);
/// assert_eq!(a.quadrance(&b).unwrap(), 25.0);
/// assert_eq!(a.euclidean_distance(&b).unwrap(), 5.0);
/// ```
pub fn quadrance<T: FloatScalar>(a: &impl MatrixRef<T>, b: &impl MatrixRef<T>) -> Result<T> {
    DimensionMismatch::check((a.nrows(), a.ncols()), (b.nrows(), b.ncols()))?;
    let mut acc = T::zero();
    for j in 0..a.ncols() {
        for (&x, &y) in a.col_as_slice(j, 0).iter().zip(b.col_as_slice(j, 0)) {
            let d = x - y;
            acc = acc + d * d;
        }
    }
    Ok(acc)
}

/// Euclidean distance `sqrt(Σ (a − b)²)`. Shapes must match.
pub fn euclidean_distance<T: FloatScalar>(a: &impl MatrixRef<T>, b: &impl MatrixRef<T>) -> Result<T> {
    Ok(quadrance(a, b)?.sqrt())
}

/// Convenience methods.
impl<T: FloatScalar> DynMatrix<T> {
    /// See [`sums_of_rows`].
    pub fn sums_of_rows(&self) -> DynMatrix<T> {
        sums_of_rows(self)
    }

    /// See [`sums_of_columns`].
    pub fn sums_of_columns(&self) -> DynMatrix<T> {
        sums_of_columns(self)
    }

    /// See [`means_of_rows`].
    pub fn means_of_rows(&self) -> Result<DynMatrix<T>> {
        means_of_rows(self)
    }

    /// See [`means_of_columns`].
    pub fn means_of_columns(&self) -> Result<DynMatrix<T>> {
        means_of_columns(self)
    }

    /// See [`variances_of_rows`].
    pub fn variances_of_rows(&self) -> Result<DynMatrix<T>> {
        variances_of_rows(self)
    }

    /// See [`variances_of_columns`].
    pub fn variances_of_columns(&self) -> Result<DynMatrix<T>> {
        variances_of_columns(self)
    }

    /// See [`sample_variances_of_rows`].
    pub fn sample_variances_of_rows(&self) -> Result<DynMatrix<T>> {
        sample_variances_of_rows(self)
    }

    /// See [`sample_variances_of_columns`].
    pub fn sample_variances_of_columns(&self) -> Result<DynMatrix<T>> {
        sample_variances_of_columns(self)
    }

    /// See [`minimums_of_rows`].
    pub fn minimums_of_rows(&self) -> Result<DynMatrix<T>> {
        minimums_of_rows(self)
    }

    /// See [`minimums_of_columns`].
    pub fn minimums_of_columns(&self) -> Result<DynMatrix<T>> {
        minimums_of_columns(self)
    }

    /// See [`maximums_of_rows`].
    pub fn maximums_of_rows(&self) -> Result<DynMatrix<T>> {
        maximums_of_rows(self)
    }

    /// See [`maximums_of_columns`].
    pub fn maximums_of_columns(&self) -> Result<DynMatrix<T>> {
        maximums_of_columns(self)
    }

    /// See [`quadrance`].
    pub fn quadrance(&self, other: &DynMatrix<T>) -> Result<T> {
        quadrance(self, other)
    }

    /// See [`euclidean_distance`].
    pub fn euclidean_distance(&self, other: &DynMatrix<T>) -> Result<T> {
        euclidean_distance(self, other)
    }
}
