use rand::Rng;

use crate::error::{DimensionMismatch, DomainError, Result};
use crate::DynMatrix;

/// Where uniform draws land: one interval for every coordinate, or one
/// interval per output dimension.
///
/// ```
/// use denseops::{Domain, DynMatrix};
///
/// let unit = Domain::Scalar { low: 0.0, high: 1.0 };
/// assert!(unit.validate().is_ok());
///
/// let boxed = Domain::Vector {
///     lower: DynMatrix::column(&[-1.0, 0.0]),
///     upper: DynMatrix::column(&[1.0, 0.0]),
/// };
/// assert_eq!(boxed.dimension(), 2);
/// assert!(boxed.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Domain {
    /// `[low, high)` applied to every coordinate.
    Scalar { low: f64, high: f64 },
    /// `[lower[d], upper[d])` for dimension `d`. Both are `d × 1`.
    Vector {
        lower: DynMatrix<f64>,
        upper: DynMatrix<f64>,
    },
}

impl Domain {
    /// Validated scalar domain.
    pub fn scalar(low: f64, high: f64) -> Result<Self> {
        let domain = Domain::Scalar { low, high };
        domain.validate()?;
        Ok(domain)
    }

    /// Validated per-dimension domain.
    pub fn vector(lower: DynMatrix<f64>, upper: DynMatrix<f64>) -> Result<Self> {
        let domain = Domain::Vector { lower, upper };
        domain.validate()?;
        Ok(domain)
    }

    /// Number of intervals: 1 for `Scalar`, the row count for `Vector`.
    pub fn dimension(&self) -> usize {
        match self {
            Domain::Scalar { .. } => 1,
            Domain::Vector { lower, .. } => lower.nrows(),
        }
    }

    /// Check that every interval is non-empty and bounded, and that `Vector`
    /// bounds are matching columns.
    pub fn validate(&self) -> Result<()> {
        match self {
            Domain::Scalar { low, high } => Ok(check_interval(0, *low, *high)?),
            Domain::Vector { lower, upper } => check_bounds(lower, upper).map(|_| ()),
        }
    }

    /// `count` uniform draws from the domain.
    ///
    /// `Scalar` gives a `count × 1` column; `Vector` gives `count × d` with
    /// column `j` drawn from interval `j`.
    ///
    /// ```
    /// use denseops::Domain;
    /// use rand::SeedableRng;
    ///
    /// let mut rng = rand::rngs::StdRng::seed_from_u64(11);
    /// let draws = Domain::Scalar { low: 2.0, high: 3.0 }.sample(&mut rng, 5).unwrap();
    /// assert_eq!(draws.shape(), (5, 1));
    /// assert!(draws.iter().all(|&x| (2.0..3.0).contains(&x)));
    /// ```
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R, count: usize) -> Result<DynMatrix<f64>> {
        match self {
            Domain::Scalar { .. } => super::uniform(rng, count, 1, self),
            Domain::Vector { lower, upper } => super::uniform_samples(rng, lower, upper, count),
        }
    }
}

/// Fail unless `low <= high` with both bounds and the width `high − low`
/// finite.
fn check_interval(dimension: usize, low: f64, high: f64) -> core::result::Result<(), DomainError> {
    // NaN fails the comparison too
    if !(low <= high) {
        return Err(DomainError::EmptyInterval { dimension, low, high });
    }
    if !(high - low).is_finite() {
        return Err(DomainError::UnboundedInterval { dimension });
    }
    Ok(())
}

/// Entrywise intervals between two matrices of the same shape, indexed in
/// column-major order.
pub(super) fn check_intervals(lower: &DynMatrix<f64>, upper: &DynMatrix<f64>) -> Result<()> {
    lower.ensure_same_shape(upper)?;
    for (d, (&lo, &hi)) in lower.iter().zip(upper.iter()).enumerate() {
        check_interval(d, lo, hi)?;
    }
    Ok(())
}

/// Validate a pair of `d × 1` bound columns and return `d`.
pub(super) fn check_bounds(lower: &DynMatrix<f64>, upper: &DynMatrix<f64>) -> Result<usize> {
    DimensionMismatch::check((lower.nrows(), 1), lower.shape())?;
    check_intervals(lower, upper)?;
    Ok(lower.nrows())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn scalar_validation() {
        assert!(Domain::scalar(0.0, 1.0).is_ok());
        assert!(Domain::scalar(3.0, 3.0).is_ok());
        assert_eq!(
            Domain::scalar(2.0, 1.0).unwrap_err(),
            Error::Domain(DomainError::EmptyInterval { dimension: 0, low: 2.0, high: 1.0 })
        );
        assert_eq!(
            Domain::scalar(0.0, f64::INFINITY).unwrap_err(),
            Error::Domain(DomainError::UnboundedInterval { dimension: 0 })
        );
        assert!(matches!(
            Domain::scalar(f64::NAN, 1.0),
            Err(Error::Domain(DomainError::EmptyInterval { dimension: 0, .. }))
        ));
    }

    #[test]
    fn overflowing_width_is_unbounded() {
        assert_eq!(
            Domain::scalar(-f64::MAX, f64::MAX).unwrap_err(),
            Error::Domain(DomainError::UnboundedInterval { dimension: 0 })
        );
        assert!(Domain::scalar(-1e300, 1e300).is_ok());
    }

    #[test]
    fn vector_reports_offending_dimension() {
        let err = Domain::vector(
            DynMatrix::column(&[0.0, 5.0, 0.0]),
            DynMatrix::column(&[1.0, 4.0, 1.0]),
        )
        .unwrap_err();
        assert_eq!(
            err,
            Error::Domain(DomainError::EmptyInterval { dimension: 1, low: 5.0, high: 4.0 })
        );
    }

    #[test]
    fn vector_shapes() {
        let err = Domain::vector(DynMatrix::column(&[0.0, 0.0]), DynMatrix::column(&[1.0])).unwrap_err();
        assert_eq!(err, Error::Shape(DimensionMismatch { expected: (2, 1), got: (1, 1) }));

        let err = Domain::vector(DynMatrix::row(&[0.0, 0.0]), DynMatrix::row(&[1.0, 1.0])).unwrap_err();
        assert_eq!(err, Error::Shape(DimensionMismatch { expected: (1, 1), got: (1, 2) }));
    }

    #[test]
    fn dimension() {
        assert_eq!(Domain::Scalar { low: 0.0, high: 1.0 }.dimension(), 1);
        let d = Domain::Vector {
            lower: DynMatrix::zeros(4, 1, 0.0),
            upper: DynMatrix::fill(4, 1, 1.0),
        };
        assert_eq!(d.dimension(), 4);
    }
}
