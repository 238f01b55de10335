use alloc::vec;
use alloc::vec::Vec;

use crate::error::{ensure_square, DimensionMismatch, Result};
use crate::linalg::{to_dyn, LinalgError};
use crate::traits::{FloatScalar, MatrixMut, MatrixRef};
use crate::DynMatrix;

/// LU decomposition with partial pivoting, in place.
///
/// On return, `a` contains both L and U packed together:
/// - Upper triangle (including diagonal): U
/// - Lower triangle (excluding diagonal): L (diagonal of L is implicitly 1)
///
/// `perm` is filled with the row permutation indices.
/// Returns `true` if the number of row swaps was even.
///
/// A pivot no larger than `cutoff` times the largest entry of its original
/// column counts as zero. With `cutoff == 0` only an exactly zero pivot
/// column is singular.
pub(crate) fn lu_in_place<T: FloatScalar>(
    a: &mut impl MatrixMut<T>,
    perm: &mut [usize],
    cutoff: T,
) -> core::result::Result<bool, LinalgError> {
    let n = a.nrows();
    debug_assert_eq!(n, a.ncols());
    debug_assert_eq!(n, perm.len());

    for (i, p) in perm.iter_mut().enumerate() {
        *p = i;
    }

    let col_scale: Vec<T> = (0..n)
        .map(|j| a.col_as_slice(j, 0).iter().fold(T::zero(), |m, x| m.max(x.abs())))
        .collect();
    let mut even = true;

    for col in 0..n {
        let mut max_row = col;
        let mut max_val = a.get(col, col).abs();
        for row in (col + 1)..n {
            let val = a.get(row, col).abs();
            if val > max_val {
                max_val = val;
                max_row = row;
            }
        }

        if !(max_val > cutoff * col_scale[col]) {
            return Err(LinalgError::Singular);
        }

        if max_row != col {
            perm.swap(col, max_row);
            for j in 0..n {
                let tmp = *a.get(col, j);
                *a.get_mut(col, j) = *a.get(max_row, j);
                *a.get_mut(max_row, j) = tmp;
            }
            even = !even;
        }

        let inv_pivot = T::one() / *a.get(col, col);
        for x in a.col_as_mut_slice(col, col + 1).iter_mut() {
            *x = *x * inv_pivot;
        }

        // rank-1 update of the trailing block
        for j in (col + 1)..n {
            let a_col_j = *a.get(col, j);
            if a_col_j == T::zero() {
                continue;
            }
            for i in (col + 1)..n {
                let l_ic = *a.get(i, col);
                let v = a.get_mut(i, j);
                *v = *v - l_ic * a_col_j;
            }
        }
    }

    Ok(even)
}

/// Solve `A·x = b` given the packed LU factors and permutation.
pub(crate) fn lu_solve<T: FloatScalar>(lu: &impl MatrixRef<T>, perm: &[usize], b: &[T], x: &mut [T]) {
    let n = lu.nrows();

    // Ly = Pb
    for i in 0..n {
        let mut sum = b[perm[i]];
        for j in 0..i {
            sum = sum - *lu.get(i, j) * x[j];
        }
        x[i] = sum;
    }

    // Ux = y
    for i in (0..n).rev() {
        let mut sum = x[i];
        for j in (i + 1)..n {
            sum = sum - *lu.get(i, j) * x[j];
        }
        x[i] = sum / *lu.get(i, i);
    }
}

/// Packed LU factors of a square matrix.
struct Lu<T> {
    lu: DynMatrix<T>,
    perm: Vec<usize>,
    even: bool,
}

impl<T: FloatScalar> Lu<T> {
    /// Factor for solving: a pivot within `n·ε` of its column scale is singular.
    fn new(a: &impl MatrixRef<T>) -> Result<Self> {
        let cutoff = T::constant(a.nrows() as f64) * T::epsilon();
        Self::with_cutoff(a, cutoff)
    }

    fn with_cutoff(a: &impl MatrixRef<T>, cutoff: T) -> Result<Self> {
        let n = a.nrows();
        ensure_square(n, a.ncols())?;
        let mut lu = to_dyn(a);
        let mut perm = vec![0usize; n];
        let even = lu_in_place(&mut lu, &mut perm, cutoff)?;
        Ok(Self { lu, perm, even })
    }

    fn det(&self) -> T {
        let n = self.lu.nrows();
        let mut d = if self.even { T::one() } else { -T::one() };
        for i in 0..n {
            d = d * self.lu[(i, i)];
        }
        d
    }

    fn solve_columns(&self, b: &DynMatrix<T>) -> DynMatrix<T> {
        let mut out = DynMatrix::zeros(b.nrows(), b.ncols(), T::zero());
        for col in 0..b.ncols() {
            lu_solve(&self.lu, &self.perm, b.col_as_slice(col, 0), out.col_as_mut_slice(col, 0));
        }
        out
    }
}

/// Determinant of a square matrix via LU with partial pivoting.
///
/// The result is the signed product of the pivots, so it keeps its scale for
/// any conditioning. Only an exactly zero pivot column gives zero. The empty
/// `0×0` matrix has determinant one. Non-square input is a domain error.
///
/// ```
/// use denseops::DynMatrix;
/// let a = DynMatrix::from_rows(2, 2, &[3.0_f64, 8.0, 4.0, 6.0]);
/// assert!((a.determinant().unwrap() + 14.0).abs() < 1e-12);
/// ```
pub fn determinant<T: FloatScalar>(a: &impl MatrixRef<T>) -> Result<T> {
    match Lu::with_cutoff(a, T::zero()) {
        Ok(lu) => Ok(lu.det()),
        Err(crate::Error::Numerical(LinalgError::Singular)) => Ok(T::zero()),
        Err(e) => Err(e),
    }
}

/// Solve `A·X = B` for `X`, one solution column per column of `B`.
///
/// Strict policy: `A` must be square and non-singular. A singular `A`
/// fails with [`LinalgError::Singular`]; callers that want a least-squares
/// answer instead use [`solve_least_squares`](crate::linalg::solve_least_squares).
///
/// ```
/// use denseops::DynMatrix;
/// let a = DynMatrix::from_rows(2, 2, &[2.0_f64, 1.0, 5.0, 3.0]);
/// let b = DynMatrix::from_rows(2, 1, &[4.0, 11.0]);
/// let x = a.solve(&b).unwrap();
/// assert!((x[(0, 0)] - 1.0).abs() < 1e-12);
/// assert!((x[(1, 0)] - 2.0).abs() < 1e-12);
/// ```
pub fn solve<T: FloatScalar>(a: &impl MatrixRef<T>, b: &DynMatrix<T>) -> Result<DynMatrix<T>> {
    let n = a.nrows();
    ensure_square(n, a.ncols())?;
    DimensionMismatch::check((n, b.ncols()), b.shape())?;
    let lu = Lu::new(a)?;
    Ok(lu.solve_columns(b))
}

/// Inverse of a square non-singular matrix.
pub fn inverse<T: FloatScalar>(a: &impl MatrixRef<T>) -> Result<DynMatrix<T>> {
    let lu = Lu::new(a)?;
    let n = a.nrows();
    Ok(lu.solve_columns(&DynMatrix::eye(n, T::zero())))
}

/// Convenience methods.
impl<T: FloatScalar> DynMatrix<T> {
    /// Determinant. See [`determinant`].
    pub fn determinant(&self) -> Result<T> {
        determinant(self)
    }

    /// Solve `self · X = B`. See [`solve`].
    pub fn solve(&self, b: &DynMatrix<T>) -> Result<DynMatrix<T>> {
        solve(self, b)
    }

    /// Inverse. See [`inverse`].
    pub fn inverse(&self) -> Result<DynMatrix<T>> {
        inverse(self)
    }
}
