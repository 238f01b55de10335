use core::ops::{Add, Mul, Neg, Sub};

use crate::error::DimensionMismatch;
use crate::traits::Scalar;

use super::DynMatrix;

impl<T: Scalar> DynMatrix<T> {
    fn zip_with(&self, rhs: &Self, f: impl Fn(T, T) -> T) -> Result<Self, DimensionMismatch> {
        self.ensure_same_shape(rhs)?;
        let data = self
            .data
            .iter()
            .zip(rhs.data.iter())
            .map(|(&a, &b)| f(a, b))
            .collect();
        Ok(DynMatrix {
            data,
            nrows: self.nrows,
            ncols: self.ncols,
        })
    }

    /// Element-wise sum, failing on a shape mismatch instead of panicking.
    pub fn checked_add(&self, rhs: &Self) -> Result<Self, DimensionMismatch> {
        self.zip_with(rhs, |a, b| a + b)
    }

    /// Element-wise difference, failing on a shape mismatch instead of panicking.
    pub fn checked_sub(&self, rhs: &Self) -> Result<Self, DimensionMismatch> {
        self.zip_with(rhs, |a, b| a - b)
    }

    /// Element-wise (Hadamard) product.
    pub fn element_mul(&self, rhs: &Self) -> Result<Self, DimensionMismatch> {
        self.zip_with(rhs, |a, b| a * b)
    }

    /// Matrix product `self · rhs`, failing when `rhs.nrows() != self.ncols()`.
    ///
    /// ```
    /// use denseops::DynMatrix;
    /// let a = DynMatrix::from_rows(2, 3, &[1.0_f64, 2.0, 3.0, 4.0, 5.0, 6.0]);
    /// let b = DynMatrix::from_rows(3, 1, &[1.0, 1.0, 1.0]);
    /// let c = a.matmul(&b).unwrap();
    /// assert_eq!(c, DynMatrix::from_rows(2, 1, &[6.0, 15.0]));
    /// assert!(b.matmul(&a).is_err());
    /// ```
    pub fn matmul(&self, rhs: &Self) -> Result<Self, DimensionMismatch> {
        if rhs.nrows != self.ncols {
            return Err(DimensionMismatch {
                expected: (self.ncols, rhs.ncols),
                got: (rhs.nrows, rhs.ncols),
            });
        }
        let (m, n, p) = (self.nrows, self.ncols, rhs.ncols);
        let mut out = DynMatrix::zeros(m, p, T::zero());
        // j-k-i order: both the output column and the lhs column are contiguous
        for j in 0..p {
            for k in 0..n {
                let b_kj = rhs.data[j * n + k];
                if b_kj == T::zero() {
                    continue;
                }
                let a_col = &self.data[k * m..(k + 1) * m];
                let out_col = &mut out.data[j * m..(j + 1) * m];
                for (o, &a) in out_col.iter_mut().zip(a_col) {
                    *o = *o + a * b_kj;
                }
            }
        }
        Ok(out)
    }

    /// Multiply every element by `s`.
    pub fn scale(&self, s: T) -> Self {
        DynMatrix {
            data: self.data.iter().map(|&x| x * s).collect(),
            nrows: self.nrows,
            ncols: self.ncols,
        }
    }
}

// ── Operators (panic on shape mismatch) ─────────────────────────────

impl<T: Scalar> Add<&DynMatrix<T>> for &DynMatrix<T> {
    type Output = DynMatrix<T>;
    fn add(self, rhs: &DynMatrix<T>) -> DynMatrix<T> {
        match self.checked_add(rhs) {
            Ok(m) => m,
            Err(e) => panic!("{}", e),
        }
    }
}

impl<T: Scalar> Add for DynMatrix<T> {
    type Output = DynMatrix<T>;
    fn add(self, rhs: Self) -> DynMatrix<T> {
        &self + &rhs
    }
}

impl<T: Scalar> Sub<&DynMatrix<T>> for &DynMatrix<T> {
    type Output = DynMatrix<T>;
    fn sub(self, rhs: &DynMatrix<T>) -> DynMatrix<T> {
        match self.checked_sub(rhs) {
            Ok(m) => m,
            Err(e) => panic!("{}", e),
        }
    }
}

impl<T: Scalar> Sub for DynMatrix<T> {
    type Output = DynMatrix<T>;
    fn sub(self, rhs: Self) -> DynMatrix<T> {
        &self - &rhs
    }
}

impl<T: Scalar> Mul<&DynMatrix<T>> for &DynMatrix<T> {
    type Output = DynMatrix<T>;
    fn mul(self, rhs: &DynMatrix<T>) -> DynMatrix<T> {
        match self.matmul(rhs) {
            Ok(m) => m,
            Err(e) => panic!("{}", e),
        }
    }
}

impl<T: Scalar> Mul for DynMatrix<T> {
    type Output = DynMatrix<T>;
    fn mul(self, rhs: Self) -> DynMatrix<T> {
        &self * &rhs
    }
}

impl<T: Scalar> Mul<T> for &DynMatrix<T> {
    type Output = DynMatrix<T>;
    fn mul(self, rhs: T) -> DynMatrix<T> {
        self.scale(rhs)
    }
}

impl<T: Scalar + Neg<Output = T>> Neg for &DynMatrix<T> {
    type Output = DynMatrix<T>;
    fn neg(self) -> DynMatrix<T> {
        DynMatrix {
            data: self.data.iter().map(|&x| -x).collect(),
            nrows: self.nrows,
            ncols: self.ncols,
        }
    }
}
