//! Index subsets for resampling schemes.
//!
//! Results are `Vec<usize>` sorted ascending. Draws with replacement keep
//! their duplicates, so the length is always the requested sample count.
//!
//! ```
//! use denseops::sampling;
//! use rand::SeedableRng;
//!
//! let mut rng = rand::rngs::StdRng::seed_from_u64(3);
//! let all = sampling::indexes_for_sampling(&mut rng, 5, 0..5, false).unwrap();
//! assert_eq!(all, vec![0, 1, 2, 3, 4]);
//!
//! let boot = sampling::bootstrap(&mut rng, 10).unwrap();
//! let oob = sampling::out_of_bag(10, &boot);
//! assert!(oob.iter().all(|i| !boot.contains(i)));
//! ```

use alloc::vec;
use alloc::vec::Vec;
use core::ops::Range;

use rand::seq::index;
use rand::Rng;

use crate::error::{DomainError, Result};

/// Draw `samples` indexes from `range`, sorted ascending.
///
/// With `replacement` each index is an independent uniform draw, so
/// duplicates can occur. Without it the indexes are distinct and
/// `samples > range.len()` fails with
/// [`DomainError::SampleSizeExceedsRange`]. Drawing at least one index from
/// an empty range fails with [`DomainError::EmptyRange`].
pub fn indexes_for_sampling<R: Rng + ?Sized>(
    rng: &mut R,
    samples: usize,
    range: Range<usize>,
    replacement: bool,
) -> Result<Vec<usize>> {
    let range_len = range.len();
    tracing::debug!(samples, range_len, replacement, "sampling indexes");

    let mut picked = if replacement {
        if samples > 0 && range.is_empty() {
            return Err(DomainError::EmptyRange.into());
        }
        (0..samples).map(|_| rng.gen_range(range.clone())).collect::<Vec<_>>()
    } else {
        if samples > range_len {
            return Err(DomainError::SampleSizeExceedsRange { samples, range_len }.into());
        }
        index::sample(rng, range_len, samples)
            .into_iter()
            .map(|i| range.start + i)
            .collect::<Vec<_>>()
    };
    picked.sort_unstable();
    Ok(picked)
}

/// A bootstrap sample: `n` draws with replacement from `0..n`.
pub fn bootstrap<R: Rng + ?Sized>(rng: &mut R, n: usize) -> Result<Vec<usize>> {
    indexes_for_sampling(rng, n, 0..n, true)
}

/// Indexes of `0..n` that do not appear in `sample`, ascending.
///
/// Entries of `sample` outside `0..n` are ignored.
pub fn out_of_bag(n: usize, sample: &[usize]) -> Vec<usize> {
    let mut seen = vec![false; n];
    for &i in sample {
        if let Some(flag) = seen.get_mut(i) {
            *flag = true;
        }
    }
    seen.iter()
        .enumerate()
        .filter_map(|(i, &hit)| (!hit).then_some(i))
        .collect()
}
