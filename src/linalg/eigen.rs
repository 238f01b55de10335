use alloc::vec::Vec;

use crate::error::{ensure_square, Result};
use crate::linalg::schur::RealSchur;
use crate::linalg::symmetric_eigen::symmetric_eigen;
use crate::linalg::{max_abs, svd, LinalgError};
use crate::traits::{FloatScalar, MatrixRef};
use crate::DynMatrix;

/// Real eigenvalues with matching eigenvectors.
///
/// `values` is n×1, ascending. Column `k` of `vectors` is a unit-length
/// eigenvector for `values[(k, 0)]`; for symmetric input the columns are
/// also mutually orthogonal.
#[derive(Debug, Clone, PartialEq)]
pub struct Eigen<T> {
    pub values: DynMatrix<T>,
    pub vectors: DynMatrix<T>,
}

/// Full spectrum of a real square matrix, as n×1 real and imaginary parts.
///
/// Sorted by real part, then imaginary part. Complex eigenvalues come in
/// conjugate pairs.
#[derive(Debug, Clone, PartialEq)]
pub struct EigenvaluesComplex<T> {
    pub re: DynMatrix<T>,
    pub im: DynMatrix<T>,
}

fn is_symmetric<T: FloatScalar>(a: &impl MatrixRef<T>) -> bool {
    let n = a.nrows();
    let tol = T::constant(1e3) * T::epsilon() * max_abs(a);
    for j in 0..n {
        for i in (j + 1)..n {
            if (*a.get(i, j) - *a.get(j, i)).abs() > tol {
                return false;
            }
        }
    }
    true
}

fn frobenius<T: FloatScalar>(a: &impl MatrixRef<T>) -> T {
    let mut sum = T::zero();
    for j in 0..a.ncols() {
        for &x in a.col_as_slice(j, 0) {
            sum = sum + x * x;
        }
    }
    sum.sqrt()
}

/// Imaginary parts at or below this are treated as rounding noise.
fn imag_tol<T: FloatScalar>(a: &impl MatrixRef<T>) -> T {
    T::epsilon().sqrt() * frobenius(a)
}

fn sort_pairs<T: FloatScalar>(pairs: &mut [(T, T)]) {
    pairs.sort_by(|x, y| {
        x.0.partial_cmp(&y.0)
            .unwrap_or(core::cmp::Ordering::Equal)
            .then(x.1.partial_cmp(&y.1).unwrap_or(core::cmp::Ordering::Equal))
    });
}

/// Eigenvectors of an upper triangular Schur form, mapped back through `q`.
fn triangular_eigenvectors<T: FloatScalar>(s: &DynMatrix<T>, q: &DynMatrix<T>) -> DynMatrix<T> {
    let n = s.nrows();
    let small = (T::epsilon() * max_abs(s)).max(T::min_positive_value());
    let mut vectors = DynMatrix::zeros(n, n, T::zero());
    let mut x = alloc::vec![T::zero(); n];

    for k in 0..n {
        let lambda = s[(k, k)];
        for xi in x.iter_mut() {
            *xi = T::zero();
        }
        x[k] = T::one();
        for i in (0..k).rev() {
            let mut sum = s[(i, k)];
            for j in (i + 1)..k {
                sum = sum + s[(i, j)] * x[j];
            }
            let mut denom = s[(i, i)] - lambda;
            if denom.abs() < small {
                denom = small;
            }
            x[i] = -sum / denom;
        }

        let mut norm_sq = T::zero();
        for i in 0..n {
            let mut vi = T::zero();
            for j in 0..=k {
                vi = vi + q[(i, j)] * x[j];
            }
            vectors[(i, k)] = vi;
            norm_sq = norm_sq + vi * vi;
        }
        let norm = norm_sq.sqrt();
        for i in 0..n {
            vectors[(i, k)] = vectors[(i, k)] / norm;
        }
    }
    vectors
}

/// Unit vector spanning (approximately) the null space of `A − λI`.
fn null_vector<T: FloatScalar>(a: &impl MatrixRef<T>, lambda: T) -> Result<Vec<T>> {
    let n = a.nrows();
    let shifted = DynMatrix::from_fn(n, n, |i, j| {
        let x = *a.get(i, j);
        if i == j {
            x - lambda
        } else {
            x
        }
    });
    let svd = svd(&shifted)?;
    Ok(svd.v.col_to_vec(n - 1))
}

/// Eigenvalues and eigenvectors of a real square matrix.
///
/// Symmetric input (within `1e3·ε` relative tolerance) goes through
/// tridiagonal QR and yields orthonormal eigenvectors. Other input is reduced
/// to real Schur form; if the spectrum holds a complex pair the call fails
/// with [`LinalgError::ComplexEigenvalues`].
///
/// ```
/// use denseops::DynMatrix;
///
/// let a = DynMatrix::from_rows(2, 2, &[2.0_f64, 1.0, 1.0, 2.0]);
/// let eig = a.eigen().unwrap();
/// assert!((eig.values[(0, 0)] - 1.0).abs() < 1e-12);
/// assert!((eig.values[(1, 0)] - 3.0).abs() < 1e-12);
/// ```
pub fn eigen<T: FloatScalar>(a: &impl MatrixRef<T>) -> Result<Eigen<T>> {
    let n = a.nrows();
    ensure_square(n, a.ncols())?;

    if is_symmetric(a) {
        let (values, vectors) = symmetric_eigen(a)?;
        return Ok(Eigen { values: DynMatrix::column(&values), vectors });
    }

    let schur = RealSchur::new(a)?;
    let (re, im) = schur.eigenvalues();
    let tol = imag_tol(a);
    if im.iter().any(|x| x.abs() > tol) {
        tracing::debug!(n, "eigen: complex spectrum");
        return Err(LinalgError::ComplexEigenvalues.into());
    }

    let triangular = (1..n).all(|i| schur.s[(i, i - 1)] == T::zero());
    let unsorted = if triangular {
        triangular_eigenvectors(&schur.s, &schur.q)
    } else {
        // a near-degenerate pair that rounded to a tiny imaginary part
        let mut vectors = DynMatrix::zeros(n, n, T::zero());
        for (k, &lambda) in re.iter().enumerate() {
            let v = null_vector(a, lambda)?;
            for (i, vi) in v.into_iter().enumerate() {
                vectors[(i, k)] = vi;
            }
        }
        vectors
    };

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&x, &y| re[x].partial_cmp(&re[y]).unwrap_or(core::cmp::Ordering::Equal));
    let values = DynMatrix::from_fn(n, 1, |i, _| re[order[i]]);
    let vectors = DynMatrix::from_fn(n, n, |i, k| unsorted[(i, order[k])]);
    Ok(Eigen { values, vectors })
}

/// Full spectrum of a real square matrix, complex pairs included.
///
/// ```
/// use denseops::DynMatrix;
///
/// // 90° rotation: eigenvalues ±i
/// let a = DynMatrix::from_rows(2, 2, &[0.0_f64, -1.0, 1.0, 0.0]);
/// let ev = a.eigenvalues().unwrap();
/// assert!((ev.im[(0, 0)] + 1.0).abs() < 1e-12);
/// assert!((ev.im[(1, 0)] - 1.0).abs() < 1e-12);
/// ```
pub fn eigenvalues<T: FloatScalar>(a: &impl MatrixRef<T>) -> Result<EigenvaluesComplex<T>> {
    let n = a.nrows();
    ensure_square(n, a.ncols())?;

    let mut pairs: Vec<(T, T)> = if is_symmetric(a) {
        let (values, _) = symmetric_eigen(a)?;
        values.into_iter().map(|v| (v, T::zero())).collect()
    } else {
        let (re, im) = RealSchur::new(a)?.eigenvalues();
        re.into_iter().zip(im).collect()
    };
    sort_pairs(&mut pairs);

    Ok(EigenvaluesComplex {
        re: DynMatrix::from_fn(n, 1, |i, _| pairs[i].0),
        im: DynMatrix::from_fn(n, 1, |i, _| pairs[i].1),
    })
}

/// Real eigenvalues only, ascending, as a k×1 matrix.
///
/// Complex-conjugate pairs (imaginary part above `sqrt(ε)·‖A‖_F`) are
/// discarded; a debug event records how many.
///
/// ```
/// use denseops::DynMatrix;
///
/// let a = DynMatrix::from_rows(3, 3, &[0.0_f64, -1.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 5.0]);
/// let real = a.real_eigenvalues().unwrap();
/// assert_eq!(real.shape(), (1, 1));
/// assert!((real[(0, 0)] - 5.0).abs() < 1e-12);
/// ```
pub fn real_eigenvalues<T: FloatScalar>(a: &impl MatrixRef<T>) -> Result<DynMatrix<T>> {
    let spectrum = eigenvalues(a)?;
    let tol = imag_tol(a);
    let n = spectrum.re.nrows();

    let real: Vec<T> = (0..n)
        .filter(|&i| spectrum.im[(i, 0)].abs() <= tol)
        .map(|i| spectrum.re[(i, 0)])
        .collect();
    let discarded = n - real.len();
    if discarded > 0 {
        tracing::debug!(discarded, n, "real_eigenvalues: dropped complex eigenvalues");
    }
    // `eigenvalues` already sorted by real part
    Ok(DynMatrix::column(&real))
}

/// Convenience methods.
impl<T: FloatScalar> DynMatrix<T> {
    /// Eigenvalues and eigenvectors. See [`eigen`].
    pub fn eigen(&self) -> Result<Eigen<T>> {
        eigen(self)
    }

    /// Full complex spectrum. See [`eigenvalues`].
    pub fn eigenvalues(&self) -> Result<EigenvaluesComplex<T>> {
        eigenvalues(self)
    }

    /// Real eigenvalues only. See [`real_eigenvalues`].
    pub fn real_eigenvalues(&self) -> Result<DynMatrix<T>> {
        real_eigenvalues(self)
    }
}
