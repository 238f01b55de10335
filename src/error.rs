//! Error taxonomy shared by every module.
//!
//! Failures fall into three categories, mirrored by the variants of
//! [`Error`]: incompatible operand shapes, violated numeric preconditions,
//! and decompositions that cannot proceed. All of them are reported before
//! any output is written.

use crate::linalg::LinalgError;

/// Operand shapes are incompatible.
///
/// ```
/// use denseops::{DynMatrix, ErrorKind};
///
/// let a = DynMatrix::zeros(2, 3, 0.0_f64);
/// let b = DynMatrix::zeros(3, 2, 0.0_f64);
/// let err = a.euclidean_distance(&b).unwrap_err();
/// assert_eq!(err.kind(), ErrorKind::Shape);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("dimension mismatch: expected {}x{}, got {}x{}", .expected.0, .expected.1, .got.0, .got.1)]
pub struct DimensionMismatch {
    /// Expected `(rows, cols)`.
    pub expected: (usize, usize),
    /// Got `(rows, cols)`.
    pub got: (usize, usize),
}

impl DimensionMismatch {
    /// Fail unless `got == expected`.
    #[inline]
    pub(crate) fn check(expected: (usize, usize), got: (usize, usize)) -> core::result::Result<(), Self> {
        if expected == got {
            Ok(())
        } else {
            Err(Self { expected, got })
        }
    }
}

/// A numeric precondition on the inputs does not hold.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum DomainError {
    /// Operation is only defined for square matrices.
    #[error("matrix must be square, got {nrows}x{ncols}")]
    NotSquare { nrows: usize, ncols: usize },
    /// Interval with `low > high` (or a NaN bound).
    #[error("empty interval in dimension {dimension}: low {low} > high {high}")]
    EmptyInterval { dimension: usize, low: f64, high: f64 },
    /// Interval with an infinite bound.
    #[error("interval in dimension {dimension} is unbounded")]
    UnboundedInterval { dimension: usize },
    /// Negative (or NaN) variance for a normal draw.
    #[error("variance must be non-negative in dimension {dimension}, got {variance}")]
    NegativeVariance { dimension: usize, variance: f64 },
    /// Bernoulli input outside `[0, 1]`.
    #[error("entry ({row}, {col}) is not a probability in [0, 1]")]
    ProbabilityOutOfRange { row: usize, col: usize },
    /// More distinct samples requested than the range holds.
    #[error("cannot draw {samples} distinct indexes from a range of {range_len}")]
    SampleSizeExceedsRange { samples: usize, range_len: usize },
    /// Draws requested from an empty range.
    #[error("cannot draw from an empty index range")]
    EmptyRange,
    /// Sequence dimension of zero.
    #[error("sequence dimension must be at least 1")]
    ZeroDimension,
    /// Sequence dimension beyond the generator's table.
    #[error("sequence dimension {dimension} exceeds the supported maximum {max}")]
    UnsupportedDimension { dimension: usize, max: usize },
    /// Sample statistics need at least two observations along the axis.
    #[error("sample variance needs at least 2 observations, got {n}")]
    TooFewObservations { n: usize },
    /// Reduction over an axis of length zero.
    #[error("reduction over an empty axis")]
    EmptyAxis,
}

/// Error category, for callers that branch on the kind of failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Shape,
    Domain,
    Numerical,
}

/// Any failure reported by this crate.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Shape(#[from] DimensionMismatch),
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Numerical(#[from] LinalgError),
}

impl Error {
    /// Which of the three categories this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Shape(_) => ErrorKind::Shape,
            Error::Domain(_) => ErrorKind::Domain,
            Error::Numerical(_) => ErrorKind::Numerical,
        }
    }
}

/// Shorthand for `Result<T, denseops::Error>`.
pub type Result<T> = core::result::Result<T, Error>;

/// Fail with [`DomainError::NotSquare`] unless `nrows == ncols`.
#[inline]
pub(crate) fn ensure_square(nrows: usize, ncols: usize) -> core::result::Result<(), DomainError> {
    if nrows == ncols {
        Ok(())
    } else {
        Err(DomainError::NotSquare { nrows, ncols })
    }
}
