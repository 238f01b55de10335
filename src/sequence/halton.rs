use alloc::vec::Vec;

use crate::error::Result;
use crate::DynMatrix;

use super::ensure_dimension;

/// Van der Corput radical inverse: the base-`base` digits of `index`
/// mirrored about the radix point.
///
/// ```
/// use denseops::sequence::radical_inverse;
/// assert_eq!(radical_inverse(2, 6), 0.375); // 110₂ → 0.011₂
/// assert_eq!(radical_inverse(3, 1), 1.0 / 3.0);
/// ```
///
/// # Panics
///
/// Panics if `base < 2`.
pub fn radical_inverse(base: u64, mut index: u64) -> f64 {
    assert!(base >= 2, "radical inverse needs a base of at least 2");
    let inv_base = 1.0 / base as f64;
    let mut scale = inv_base;
    let mut result = 0.0;
    while index > 0 {
        result += (index % base) as f64 * scale;
        index /= base;
        scale *= inv_base;
    }
    result
}

/// The first `count` primes, by trial division against the primes found so far.
fn first_primes(count: usize) -> Vec<u64> {
    let mut primes: Vec<u64> = Vec::with_capacity(count);
    let mut candidate = 2u64;
    while primes.len() < count {
        if primes.iter().take_while(|&&p| p * p <= candidate).all(|&p| candidate % p != 0) {
            primes.push(candidate);
        }
        candidate += 1;
    }
    primes
}

/// One Halton point: coordinate `d` is the radical inverse of `index` in the
/// `d`-th prime base.
pub fn halton_point(dimension: usize, index: u64) -> Result<Vec<f64>> {
    ensure_dimension(dimension)?;
    Ok(first_primes(dimension)
        .into_iter()
        .map(|p| radical_inverse(p, index))
        .collect())
}

/// `count × dimension` matrix of Halton points with indices `1..=count`.
///
/// Fails with `ZeroDimension` when `dimension == 0`. `count == 0` gives a
/// matrix with no rows.
pub fn halton(dimension: usize, count: usize) -> Result<DynMatrix<f64>> {
    ensure_dimension(dimension)?;
    tracing::debug!(dimension, count, "halton: generating");
    let primes = first_primes(dimension);
    Ok(DynMatrix::from_fn(count, dimension, |i, d| {
        radical_inverse(primes[d], i as u64 + 1)
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{DomainError, Error};

    #[test]
    fn first_primes_are_primes() {
        assert_eq!(first_primes(8), vec![2, 3, 5, 7, 11, 13, 17, 19]);
        assert!(first_primes(0).is_empty());
    }

    #[test]
    fn radical_inverse_base_two() {
        let got: Vec<f64> = (1..=7).map(|i| radical_inverse(2, i)).collect();
        assert_eq!(got, vec![0.5, 0.25, 0.75, 0.125, 0.625, 0.375, 0.875]);
        assert_eq!(radical_inverse(2, 0), 0.0);
    }

    #[test]
    #[should_panic]
    fn radical_inverse_rejects_base_one() {
        radical_inverse(1, 3);
    }

    #[test]
    fn one_dimension_golden_values() {
        let h = halton(1, 4).unwrap();
        assert_eq!(h.shape(), (4, 1));
        assert_eq!(h.as_slice(), &[0.5, 0.25, 0.75, 0.125]);
    }

    #[test]
    fn second_column_is_base_three() {
        let h = halton(2, 3).unwrap();
        let expect = [1.0 / 3.0, 2.0 / 3.0, 1.0 / 9.0];
        for (i, &e) in expect.iter().enumerate() {
            assert!((h[(i, 1)] - e).abs() < 1e-15);
        }
    }

    #[test]
    fn rows_match_single_points() {
        let h = halton(4, 10).unwrap();
        for i in 0..10 {
            let p = halton_point(4, i as u64 + 1).unwrap();
            for d in 0..4 {
                assert_eq!(h[(i, d)], p[d]);
            }
        }
    }

    #[test]
    fn edge_cases() {
        assert_eq!(halton(3, 0).unwrap().shape(), (0, 3));
        assert_eq!(halton(0, 5).unwrap_err(), Error::Domain(DomainError::ZeroDimension));
        assert_eq!(halton_point(0, 1).unwrap_err(), Error::Domain(DomainError::ZeroDimension));
    }

    #[test]
    fn values_in_unit_interval() {
        let h = halton(6, 500).unwrap();
        assert!(h.iter().all(|&x| (0.0..1.0).contains(&x)));
    }
}
