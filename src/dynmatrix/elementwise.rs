use rand::Rng;

use crate::error::{DomainError, Result};
use crate::traits::FloatScalar;

use super::DynMatrix;

// ── Map / apply ─────────────────────────────────────────────────────

impl<T: Copy> DynMatrix<T> {
    /// New matrix with `f` applied to every element. Shape is preserved.
    ///
    /// ```
    /// use denseops::DynMatrix;
    /// let m = DynMatrix::from_rows(1, 3, &[1.0_f64, 4.0, 9.0]);
    /// let r = m.map(f64::sqrt);
    /// assert_eq!(r, DynMatrix::from_rows(1, 3, &[1.0, 2.0, 3.0]));
    /// ```
    pub fn map<U>(&self, f: impl Fn(T) -> U) -> DynMatrix<U> {
        DynMatrix {
            data: self.data.iter().map(|&x| f(x)).collect(),
            nrows: self.nrows,
            ncols: self.ncols,
        }
    }

    /// Apply `f` to every element in place.
    ///
    /// ```
    /// use denseops::DynMatrix;
    /// let mut m = DynMatrix::fill(2, 2, 3.0_f64);
    /// m.apply(|x| x * x);
    /// assert_eq!(m, DynMatrix::fill(2, 2, 9.0));
    /// ```
    pub fn apply(&mut self, mut f: impl FnMut(T) -> T) {
        for x in self.data.iter_mut() {
            *x = f(*x);
        }
    }
}

// ── Bernoulli ───────────────────────────────────────────────────────

impl<T: FloatScalar> DynMatrix<T> {
    /// Replace every entry `p` with a draw that is `1` with probability `p`
    /// and `0` otherwise.
    ///
    /// Every entry must lie in `[0, 1]`. All entries are checked before any
    /// is written, so on error the matrix is unchanged.
    ///
    /// ```
    /// use denseops::DynMatrix;
    /// use rand::SeedableRng;
    ///
    /// let mut rng = rand::rngs::StdRng::seed_from_u64(7);
    /// let mut m = DynMatrix::from_rows(1, 3, &[0.0_f64, 1.0, 0.5]);
    /// m.bernoulli(&mut rng).unwrap();
    /// assert_eq!(m[(0, 0)], 0.0);
    /// assert_eq!(m[(0, 1)], 1.0);
    /// assert!(m[(0, 2)] == 0.0 || m[(0, 2)] == 1.0);
    /// ```
    pub fn bernoulli<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<()> {
        let nrows = self.nrows;
        let out_of_range = self
            .data
            .iter()
            .position(|&p| !(p >= T::zero() && p <= T::one()));
        if let Some(idx) = out_of_range {
            return Err(DomainError::ProbabilityOutOfRange {
                row: idx % nrows,
                col: idx / nrows,
            }
            .into());
        }

        for x in self.data.iter_mut() {
            *x = if rng.gen_bool(x.to_f64_lossy()) { T::one() } else { T::zero() };
        }
        Ok(())
    }
}
