//! Random matrix factory.
//!
//! Pseudo-random draws take an explicit generator (`&mut R` with
//! `R: Rng + ?Sized`), so a seeded generator reproduces its output exactly.
//! Quasi-random samples come from [`sequence`](crate::sequence) and take no
//! generator at all.
//!
//! | Function | Shape | Distribution |
//! |---|---|---|
//! | [`uniform`] | `rows × cols` | uniform in a [`Domain`] |
//! | [`uniform_samples`] | `count × d` | uniform, interval per column |
//! | [`uniform_in`] | like `lower` | one uniform draw per entry |
//! | [`sobol_samples`] / [`halton_samples`] | `count × d` | low-discrepancy, rescaled into the box |
//! | [`normal`] | `rows × cols` | Gaussian, scalar mean and variance |
//! | [`normal_samples`] | `count × d` | Gaussian, mean and variance per column |
//! | [`normal_in`] | like `mean` | one Gaussian draw per entry |
//!
//! Intervals are half-open, `[low, high)`; a degenerate interval with
//! `low == high` always yields `low`. Normal draws are parameterised by
//! **variance**, not standard deviation.
//!
//! # Example
//!
//! ```
//! use denseops::{random, Domain, DynMatrix};
//! use rand::SeedableRng;
//!
//! let mut rng = rand::rngs::StdRng::seed_from_u64(2024);
//! let m = random::uniform(&mut rng, 3, 4, &Domain::Scalar { low: -1.0, high: 1.0 }).unwrap();
//! assert!(m.iter().all(|&x| (-1.0..1.0).contains(&x)));
//!
//! let mean = DynMatrix::column(&[0.0, 100.0]);
//! let variance = DynMatrix::column(&[1.0, 0.0]);
//! let g = random::normal_samples(&mut rng, &mean, &variance, 10).unwrap();
//! assert_eq!(g.shape(), (10, 2));
//! assert!((0..10).all(|i| g[(i, 1)] == 100.0));
//! ```

mod domain;


pub use domain::Domain;

use alloc::vec::Vec;

use num_traits::Float;
use rand::distributions::{Distribution, Uniform};
use rand::Rng;
use rand_distr::StandardNormal;

use crate::error::{DimensionMismatch, DomainError, Result};
use crate::sequence;
use crate::DynMatrix;

use domain::{check_bounds, check_intervals};

// ── Helpers ─────────────────────────────────────────────────────────

/// Largest `f64` strictly below a finite `x`.
#[inline]
fn next_below(x: f64) -> f64 {
    if x == 0.0 {
        -f64::from_bits(1)
    } else if x > 0.0 {
        f64::from_bits(x.to_bits() - 1)
    } else {
        f64::from_bits(x.to_bits() + 1)
    }
}

/// Map a unit coordinate `u ∈ [0, 1)` affinely into `[low, high)`.
///
/// The two-term form cannot overflow for finite bounds. Rounding is clamped
/// back into the interval.
#[inline]
fn lerp(low: f64, high: f64, u: f64) -> f64 {
    if low == high {
        return low;
    }
    let x = low * (1.0 - u) + high * u;
    if x < high {
        x.max(low)
    } else {
        next_below(high).max(low)
    }
}

fn check_variance(dimension: usize, variance: f64) -> core::result::Result<(), DomainError> {
    if variance >= 0.0 && variance.is_finite() {
        Ok(())
    } else {
        Err(DomainError::NegativeVariance { dimension, variance })
    }
}

/// Uniform draws from one validated interval `[low, high)`.
#[derive(Debug, Clone)]
enum Interval {
    /// `low == high`: every draw is `low`.
    Point(f64),
    Span { dist: Uniform<f64>, high: f64 },
}

impl Interval {
    /// `low <= high`, both finite, with a finite width.
    fn new(low: f64, high: f64) -> Self {
        if low == high {
            Interval::Point(low)
        } else {
            Interval::Span { dist: Uniform::new(low, high), high }
        }
    }

    fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match self {
            Interval::Point(x) => *x,
            Interval::Span { dist, high } => {
                let x = dist.sample(rng);
                if x < *high {
                    x
                } else {
                    next_below(*high)
                }
            }
        }
    }
}

/// One draw from `N(mean, sd²)`.
#[inline]
fn gaussian<R: Rng + ?Sized>(rng: &mut R, mean: f64, sd: f64) -> f64 {
    let z: f64 = rng.sample(StandardNormal);
    mean + sd * z
}

/// Rescale `count × d` points in `[0, 1)^d` into the box given by two `d × 1`
/// bound columns.
fn rescale(points: &DynMatrix<f64>, lower: &DynMatrix<f64>, upper: &DynMatrix<f64>) -> DynMatrix<f64> {
    DynMatrix::from_fn(points.nrows(), points.ncols(), |i, j| {
        lerp(lower[(j, 0)], upper[(j, 0)], points[(i, j)])
    })
}

/// One interval per row of a pair of validated `d × 1` bound columns.
fn column_intervals(lower: &DynMatrix<f64>, upper: &DynMatrix<f64>) -> Vec<Interval> {
    (0..lower.nrows()).map(|j| Interval::new(lower[(j, 0)], upper[(j, 0)])).collect()
}

// ── Uniform ─────────────────────────────────────────────────────────

/// `rows × cols` matrix of independent uniform draws.
///
/// With [`Domain::Scalar`] every entry is drawn from `[low, high)`. With
/// [`Domain::Vector`] of dimension `d`, `cols` must equal `d` and column `j`
/// is drawn from interval `j`.
pub fn uniform<R: Rng + ?Sized>(
    rng: &mut R,
    rows: usize,
    cols: usize,
    domain: &Domain,
) -> Result<DynMatrix<f64>> {
    domain.validate()?;
    match domain {
        Domain::Scalar { low, high } => {
            let interval = Interval::new(*low, *high);
            Ok(DynMatrix::from_fn(rows, cols, |_, _| interval.draw(rng)))
        }
        Domain::Vector { lower, upper } => {
            DimensionMismatch::check((rows, lower.nrows()), (rows, cols))?;
            let intervals = column_intervals(lower, upper);
            Ok(DynMatrix::from_fn(rows, cols, |_, j| intervals[j].draw(rng)))
        }
    }
}

/// `count × d` matrix whose entry `(i, j)` is uniform in
/// `[lower[j], upper[j])`. `lower` and `upper` must both be `d × 1`.
pub fn uniform_samples<R: Rng + ?Sized>(
    rng: &mut R,
    lower: &DynMatrix<f64>,
    upper: &DynMatrix<f64>,
    count: usize,
) -> Result<DynMatrix<f64>> {
    let d = check_bounds(lower, upper)?;
    let intervals = column_intervals(lower, upper);
    Ok(DynMatrix::from_fn(count, d, |_, j| intervals[j].draw(rng)))
}

/// A single draw shaped like `lower`, each entry uniform between the
/// matching entries of `lower` and `upper`.
///
/// ```
/// use denseops::{random, DynMatrix};
/// use rand::SeedableRng;
///
/// let mut rng = rand::rngs::StdRng::seed_from_u64(5);
/// let lower = DynMatrix::column(&[0.0, 10.0, 4.0]);
/// let upper = DynMatrix::column(&[1.0, 20.0, 4.0]);
/// let x = random::uniform_in(&mut rng, &lower, &upper).unwrap();
/// assert_eq!(x.shape(), (3, 1));
/// assert!((10.0..20.0).contains(&x[(1, 0)]));
/// assert_eq!(x[(2, 0)], 4.0);
/// ```
pub fn uniform_in<R: Rng + ?Sized>(
    rng: &mut R,
    lower: &DynMatrix<f64>,
    upper: &DynMatrix<f64>,
) -> Result<DynMatrix<f64>> {
    check_intervals(lower, upper)?;
    Ok(DynMatrix::from_fn(lower.nrows(), lower.ncols(), |i, j| {
        Interval::new(lower[(i, j)], upper[(i, j)]).draw(rng)
    }))
}

// ── Quasi-random ────────────────────────────────────────────────────

/// `count` Sobol points rescaled into the box `[lower, upper)`.
///
/// Deterministic: identical bounds and count give identical output. At most
/// [`SOBOL_MAX_DIMENSION`](crate::sequence::SOBOL_MAX_DIMENSION) dimensions.
pub fn sobol_samples(lower: &DynMatrix<f64>, upper: &DynMatrix<f64>, count: usize) -> Result<DynMatrix<f64>> {
    let d = check_bounds(lower, upper)?;
    let unit = sequence::sobol(d, count)?;
    Ok(rescale(&unit, lower, upper))
}

/// `count` Halton points rescaled into the box `[lower, upper)`.
///
/// ```
/// use denseops::{random, DynMatrix};
///
/// let lower = DynMatrix::column(&[0.0]);
/// let upper = DynMatrix::column(&[8.0]);
/// let h = random::halton_samples(&lower, &upper, 3).unwrap();
/// assert_eq!(h.as_slice(), &[4.0, 2.0, 6.0]);
/// ```
pub fn halton_samples(lower: &DynMatrix<f64>, upper: &DynMatrix<f64>, count: usize) -> Result<DynMatrix<f64>> {
    let d = check_bounds(lower, upper)?;
    let unit = sequence::halton(d, count)?;
    Ok(rescale(&unit, lower, upper))
}

// ── Normal ──────────────────────────────────────────────────────────

/// `rows × cols` matrix of independent `N(mean, variance)` draws.
///
/// Fails with [`DomainError::NegativeVariance`] for a negative, infinite or
/// NaN variance. Zero variance yields `mean` exactly.
pub fn normal<R: Rng + ?Sized>(
    rng: &mut R,
    rows: usize,
    cols: usize,
    mean: f64,
    variance: f64,
) -> Result<DynMatrix<f64>> {
    check_variance(0, variance)?;
    let sd = variance.sqrt();
    Ok(DynMatrix::from_fn(rows, cols, |_, _| gaussian(rng, mean, sd)))
}

/// `count × d` matrix whose column `j` is drawn from
/// `N(mean[j], variance[j])`. `mean` and `variance` must both be `d × 1`.
pub fn normal_samples<R: Rng + ?Sized>(
    rng: &mut R,
    mean: &DynMatrix<f64>,
    variance: &DynMatrix<f64>,
    count: usize,
) -> Result<DynMatrix<f64>> {
    DimensionMismatch::check((mean.nrows(), 1), mean.shape())?;
    mean.ensure_same_shape(variance)?;
    for (d, &v) in variance.iter().enumerate() {
        check_variance(d, v)?;
    }
    let sd = variance.map(Float::sqrt);
    Ok(DynMatrix::from_fn(count, mean.nrows(), |_, j| gaussian(rng, mean[(j, 0)], sd[(j, 0)])))
}

/// A single Gaussian draw shaped like `mean`, with entrywise variances.
pub fn normal_in<R: Rng + ?Sized>(
    rng: &mut R,
    mean: &DynMatrix<f64>,
    variance: &DynMatrix<f64>,
) -> Result<DynMatrix<f64>> {
    mean.ensure_same_shape(variance)?;
    for (d, &v) in variance.iter().enumerate() {
        check_variance(d, v)?;
    }
    Ok(DynMatrix::from_fn(mean.nrows(), mean.ncols(), |i, j| {
        gaussian(rng, mean[(i, j)], variance[(i, j)].sqrt())
    }))
}
