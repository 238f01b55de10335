//! Low-discrepancy sequences in the unit cube `[0,1)^d`.
//!
//! Both generators are pure functions of `(dimension, index)`: the same
//! request always yields bit-identical output, and no generator state is
//! kept between calls. Row `i` of a generated matrix is the point with index
//! `i + 1`, so the all-zero origin never appears.
//!
//! | Sequence | Matrix | Single point | Dimensions |
//! |---|---|---|---|
//! | Halton | [`halton`] | [`halton_point`] | any ≥ 1 |
//! | Sobol | [`sobol`] | [`sobol_point`] | 1 ..= [`SOBOL_MAX_DIMENSION`] |
//!
//! ```
//! use denseops::sequence;
//!
//! let h = sequence::halton(1, 4).unwrap();
//! assert_eq!(h.as_slice(), &[0.5, 0.25, 0.75, 0.125]);
//!
//! let s = sequence::sobol(1, 4).unwrap();
//! assert_eq!(s.as_slice(), &[0.5, 0.75, 0.25, 0.375]);
//! ```
//!
//! For points rescaled into an arbitrary box see
//! [`random::halton_samples`](crate::random::halton_samples) and
//! [`random::sobol_samples`](crate::random::sobol_samples).

mod halton;
mod sobol;

pub use halton::{halton, halton_point, radical_inverse};
pub use sobol::{sobol, sobol_point, SOBOL_MAX_DIMENSION};

use crate::error::DomainError;

#[inline]
fn ensure_dimension(dimension: usize) -> Result<(), DomainError> {
    if dimension == 0 {
        Err(DomainError::ZeroDimension)
    } else {
        Ok(())
    }
}
