use alloc::vec::Vec;

use crate::error::{DomainError, Result};
use crate::DynMatrix;

use super::ensure_dimension;

/// Highest dimension with tabulated direction numbers.
pub const SOBOL_MAX_DIMENSION: usize = 16;

/// Bits per coordinate; indices must fit in this many bits.
const BITS: usize = 32;

/// Joe–Kuo primitive polynomials for dimensions 2..=16: `(degree, coefficients, initial m)`.
///
/// `coefficients` holds the inner polynomial coefficients as bits, most
/// significant first. Dimension 1 is the van der Corput sequence and has no
/// entry.
const JOE_KUO: [(usize, u32, &[u32]); SOBOL_MAX_DIMENSION - 1] = [
    (1, 0, &[1]),
    (2, 1, &[1, 3]),
    (3, 1, &[1, 3, 1]),
    (3, 2, &[1, 1, 1]),
    (4, 1, &[1, 1, 3, 3]),
    (4, 4, &[1, 3, 5, 13]),
    (5, 2, &[1, 1, 5, 5, 17]),
    (5, 4, &[1, 1, 5, 5, 5]),
    (5, 7, &[1, 1, 7, 11, 19]),
    (5, 11, &[1, 1, 5, 1, 1]),
    (5, 13, &[1, 1, 1, 3, 11]),
    (5, 14, &[1, 3, 5, 5, 31]),
    (6, 1, &[1, 3, 3, 9, 7, 49]),
    (6, 13, &[1, 1, 1, 15, 21, 21]),
    (6, 16, &[1, 3, 1, 13, 27, 49]),
];

/// Direction numbers `V_k = m_k · 2^(32−k)` for one coordinate, `k = 1..=32`
/// stored at `[k − 1]`.
fn direction_numbers(coordinate: usize) -> [u32; BITS] {
    let mut v = [0u32; BITS];
    if coordinate == 0 {
        for (k, vk) in v.iter_mut().enumerate() {
            *vk = 1 << (BITS - 1 - k);
        }
        return v;
    }

    let (s, a, m) = JOE_KUO[coordinate - 1];
    for k in 0..s.min(BITS) {
        v[k] = m[k] << (BITS - 1 - k);
    }
    for k in s..BITS {
        let mut vk = v[k - s] ^ (v[k - s] >> s);
        for i in 1..s {
            if (a >> (s - 1 - i)) & 1 == 1 {
                vk ^= v[k - i];
            }
        }
        v[k] = vk;
    }
    v
}

fn direction_table(dimension: usize) -> Result<Vec<[u32; BITS]>> {
    ensure_dimension(dimension)?;
    if dimension > SOBOL_MAX_DIMENSION {
        return Err(DomainError::UnsupportedDimension {
            dimension,
            max: SOBOL_MAX_DIMENSION,
        }
        .into());
    }
    Ok((0..dimension).map(direction_numbers).collect())
}

/// XOR of the direction numbers picked out by the Gray code of `index`.
#[inline]
fn coordinate(v: &[u32; BITS], index: u32) -> f64 {
    let mut gray = index ^ (index >> 1);
    let mut x = 0u32;
    let mut bit = 0;
    while gray != 0 {
        if gray & 1 == 1 {
            x ^= v[bit];
        }
        gray >>= 1;
        bit += 1;
    }
    x as f64 / (1u64 << BITS) as f64
}

/// One Sobol point with the given index.
///
/// Index 0 is the origin; [`sobol`] starts at index 1.
pub fn sobol_point(dimension: usize, index: u32) -> Result<Vec<f64>> {
    let table = direction_table(dimension)?;
    Ok(table.iter().map(|v| coordinate(v, index)).collect())
}

/// `count × dimension` matrix of Sobol points with indices `1..=count`.
///
/// Fails with `ZeroDimension` for `dimension == 0` and
/// `UnsupportedDimension` above [`SOBOL_MAX_DIMENSION`]. Indices are 32-bit,
/// so `count` may not exceed `u32::MAX`.
///
/// ```
/// use denseops::sequence::sobol;
///
/// let s = sobol(2, 3).unwrap();
/// assert_eq!((s[(0, 0)], s[(0, 1)]), (0.5, 0.5));
/// assert_eq!((s[(1, 0)], s[(1, 1)]), (0.75, 0.25));
/// assert_eq!((s[(2, 0)], s[(2, 1)]), (0.25, 0.75));
/// ```
pub fn sobol(dimension: usize, count: usize) -> Result<DynMatrix<f64>> {
    let table = direction_table(dimension)?;
    if count > u32::MAX as usize {
        return Err(DomainError::SampleSizeExceedsRange {
            samples: count,
            range_len: u32::MAX as usize,
        }
        .into());
    }
    tracing::debug!(dimension, count, "sobol: generating");
    Ok(DynMatrix::from_fn(count, dimension, |i, d| {
        coordinate(&table[d], i as u32 + 1)
    }))
}
