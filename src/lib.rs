//! # denseops
//!
//! Decompositions, quasi-random sampling and axis statistics for dense
//! real matrices. Pure Rust, no-std compatible (requires `alloc`).
//!
//! ## Quick start
//!
//! ```
//! use denseops::DynMatrix;
//!
//! // Solve a linear system AX = B
//! let a = DynMatrix::from_rows(3, 3, &[
//!     2.0_f64, 1.0, -1.0,
//!     -3.0, -1.0, 2.0,
//!     -2.0, 1.0, 2.0,
//! ]);
//! let b = DynMatrix::from_rows(3, 1, &[8.0, -11.0, -3.0]);
//! let x = a.solve(&b).unwrap(); // x = [2, 3, -1]
//! assert!((x[(0, 0)] - 2.0).abs() < 1e-12);
//!
//! // 64 Sobol points rescaled into a box
//! let lower = DynMatrix::from_rows(2, 1, &[-1.0, 0.0]);
//! let upper = DynMatrix::from_rows(2, 1, &[1.0, 10.0]);
//! let pts = denseops::random::sobol_samples(&lower, &upper, 64).unwrap();
//! assert_eq!((pts.nrows(), pts.ncols()), (64, 2));
//! ```
//!
//! ## Modules
//!
//! - [`dynmatrix`]: Heap-allocated `DynMatrix<T>` with runtime dimensions.
//!   Column-major `Vec<T>` storage, arithmetic, transpose, and the elementwise
//!   transforms (`map`, `apply`, `bernoulli`).
//!
//! - [`linalg`]: Cholesky, SVD, symmetric and general eigendecomposition,
//!   LU determinant/solve, Moore–Penrose pseudoinverse. Free functions take
//!   `&impl MatrixRef<T>`; convenience methods live on `DynMatrix`.
//!
//! - [`stats`]: Per-row/per-column sums, means, population and sample
//!   variances, extrema; Euclidean distance, quadrance, determinant.
//!
//! - [`sequence`]: Halton and Sobol low-discrepancy sequences in `[0,1)^d`,
//!   pure functions of `(dimension, index)`.
//!
//! - [`random`]: Random matrix factory: uniform and normal draws inside a
//!   [`random::Domain`], and quasi-random samples rescaled into a box.
//!
//! - [`sampling`]: Index subsets with or without replacement (bootstrap).
//!
//! - [`traits`]: Element trait hierarchy:
//!   - [`Scalar`]: all matrix elements (`Copy + PartialEq + Debug + Zero + One + Num`)
//!   - [`FloatScalar`]: real floats, used by decompositions and reductions
//!   - [`MatrixRef`] / [`MatrixMut`]: generic read/write access for algorithms
//!
//! ## Randomness
//!
//! Every stochastic function takes `&mut R` where `R: rand::Rng + ?Sized`.
//! Pass a seeded generator to make results reproducible. Halton and Sobol
//! paths take no generator; they are deterministic by construction.
//!
//! ## Errors
//!
//! All fallible operations return [`Result`], whose [`Error`] is one of a
//! shape mismatch, a domain violation, or a numerical failure
//! (see [`ErrorKind`]).
//!
//! ## Cargo features
//!
//! | Feature   | Default  | Description |
//! |-----------|----------|-------------|
//! | `std`     | yes      | Hardware FPU via system libm, `std::error::Error` impls, `rand::rngs::StdRng` |
//!
//! Without `std`, float math goes through `num-traits`' `libm` backend, which
//! is always enabled.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod dynmatrix;
pub mod error;
pub mod linalg;
pub mod random;
pub mod sampling;
pub mod sequence;
pub mod stats;
pub mod traits;

pub use dynmatrix::DynMatrix;
pub use error::{DimensionMismatch, DomainError, Error, ErrorKind, Result};
pub use linalg::{Cholesky, Eigen, EigenvaluesComplex, LinalgError, Svd};
pub use random::Domain;
pub use traits::{FloatScalar, MatrixMut, MatrixRef, Scalar};
