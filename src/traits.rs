use core::fmt::Debug;
use num_traits::{Float, Num, One, Zero};

/// Trait for types that can be used as matrix elements.
///
/// Blanket-implemented for all types satisfying the bounds.
pub trait Scalar: Copy + PartialEq + Debug + Zero + One + Num {}

impl<T: Copy + PartialEq + Debug + Zero + One + Num> Scalar for T {}

/// Real floating-point matrix elements (`f32`, `f64`).
///
/// Required by everything that needs `sqrt`, `ln`, ordered comparison or
/// machine epsilon: decompositions, reductions, distances.
pub trait FloatScalar: Scalar + Float {
    /// Convert an `f64` literal or sample into `Self` (rounding for `f32`).
    fn constant(x: f64) -> Self;

    /// Widen to `f64`.
    fn to_f64_lossy(self) -> f64;
}

macro_rules! impl_float_scalar {
    ($($t:ty),*) => {
        $(
            impl FloatScalar for $t {
                #[inline] fn constant(x: f64) -> $t { x as $t }
                #[inline] fn to_f64_lossy(self) -> f64 { self as f64 }
            }
        )*
    };
}

impl_float_scalar!(f32, f64);

/// Read-only access to a matrix-like type.
///
/// Every algorithm in [`crate::linalg`] and [`crate::stats`] is written
/// against this contract (shape plus element access), not against a
/// concrete storage type.
pub trait MatrixRef<T> {
    fn nrows(&self) -> usize;
    fn ncols(&self) -> usize;
    fn get(&self, row: usize, col: usize) -> &T;

    /// Contiguous view of column `col` from `row_start` to the last row.
    fn col_as_slice(&self, col: usize, row_start: usize) -> &[T];
}

/// Mutable access to a matrix-like type.
///
/// Extends `MatrixRef` with mutable element access, enabling
/// in-place algorithms (Cholesky, Householder reductions) to work generically.
pub trait MatrixMut<T>: MatrixRef<T> {
    fn get_mut(&mut self, row: usize, col: usize) -> &mut T;

    fn col_as_mut_slice(&mut self, col: usize, row_start: usize) -> &mut [T];
}
