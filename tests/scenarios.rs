use denseops::{
    random, sampling, sequence, DimensionMismatch, Domain, DomainError, DynMatrix, Error, ErrorKind,
    LinalgError,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const TOL: f64 = 1e-10;

fn assert_mat_near(a: &DynMatrix<f64>, b: &DynMatrix<f64>, tol: f64, msg: &str) {
    assert_eq!(a.shape(), b.shape(), "{}: shape", msg);
    for (x, y) in a.iter().zip(b.iter()) {
        assert!((x - y).abs() < tol, "{}: {} vs {}", msg, x, y);
    }
}

/// Largest distance between neighbouring values of column `j`, counting the
/// edges at 0 and 1.
fn max_gap(m: &DynMatrix<f64>, j: usize) -> f64 {
    let mut xs = m.col_to_vec(j);
    xs.sort_by(|a, b| a.total_cmp(b));
    let mut prev = 0.0;
    let mut gap: f64 = 0.0;
    for x in xs {
        gap = gap.max(x - prev);
        prev = x;
    }
    gap.max(1.0 - prev)
}

// ── Identity ─────────────────────────────────────────────────────────

#[test]
fn identity_three_by_three() {
    let id = DynMatrix::eye(3, 0.0_f64);
    assert_eq!(id.determinant().unwrap(), 1.0);
    assert_eq!(id.cholesky().unwrap().l(), &id);
    assert_mat_near(&id.pseudo_inverse().unwrap(), &id, TOL, "pinv");
    assert_mat_near(&id.svd().unwrap().s, &id, TOL, "singular values");
}

// ── Solve ────────────────────────────────────────────────────────────

#[test]
fn solve_and_verify() {
    let a = DynMatrix::from_rows(3, 3, &[4.0, -2.0, 1.0, -2.0, 4.0, -2.0, 1.0, -2.0, 4.0]);
    let b = DynMatrix::from_rows(3, 2, &[11.0, 1.0, -16.0, 0.0, 17.0, 2.0]);
    let x = a.solve(&b).unwrap();
    assert_mat_near(&(&a * &x), &b, TOL, "A·X");
}

#[test]
fn singular_solve_falls_back_to_least_squares() {
    let a = DynMatrix::from_rows(3, 3, &[1.0, 2.0, 3.0, 2.0, 4.0, 6.0, 1.0, 0.0, 1.0]);
    let b = DynMatrix::column(&[6.0, 12.0, 2.0]);
    assert_eq!(a.solve(&b).unwrap_err(), Error::Numerical(LinalgError::Singular));

    // b lies in the column space, so the least-squares residual vanishes
    let x = a.solve_least_squares(&b).unwrap();
    assert_mat_near(&(&a * &x), &b, 1e-9, "residual");
}

// ── Decompositions end to end ────────────────────────────────────────

#[test]
fn covariance_pipeline() {
    // sample covariance of normal draws is SPD, so it factors and inverts
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let mean = DynMatrix::column(&[1.0, -2.0, 0.5]);
    let variance = DynMatrix::column(&[1.0, 4.0, 0.25]);
    let x = random::normal_samples(&mut rng, &mean, &variance, 500).unwrap();

    let mu = x.means_of_columns().unwrap();
    let centered = DynMatrix::from_fn(x.nrows(), x.ncols(), |i, j| x[(i, j)] - mu[(0, j)]);
    let cov = (&centered.transpose() * &centered).scale(1.0 / (x.nrows() - 1) as f64);

    let diag = x.sample_variances_of_columns().unwrap();
    for j in 0..3 {
        assert!((cov[(j, j)] - diag[(0, j)]).abs() < 1e-9);
    }

    let chol = cov.cholesky().unwrap();
    assert_mat_near(&(&cov * &chol.inverse()), &DynMatrix::eye(3, 0.0), 1e-9, "Σ·Σ⁻¹");

    let e = cov.eigen().unwrap();
    assert!((0..3).all(|i| e.values[(i, 0)] > 0.0));
    let trace: f64 = (0..3).map(|i| cov[(i, i)]).sum();
    let sum: f64 = e.values.iter().sum();
    assert!((trace - sum).abs() < 1e-9);
}

#[test]
fn rotation_has_complex_spectrum() {
    let r = DynMatrix::from_rows(2, 2, &[0.0_f64, -1.0, 1.0, 0.0]);
    assert_eq!(r.eigen().unwrap_err(), Error::Numerical(LinalgError::ComplexEigenvalues));
    let ev = r.eigenvalues().unwrap();
    assert!(ev.re.iter().all(|x| x.abs() < TOL));
    assert!((ev.im[(0, 0)] + 1.0).abs() < TOL);
    assert!((ev.im[(1, 0)] - 1.0).abs() < TOL);
    assert_eq!(r.real_eigenvalues().unwrap().shape(), (0, 1));
}

#[test]
fn svd_rank_of_outer_product() {
    let u = DynMatrix::column(&[1.0, 2.0, 3.0, 4.0]);
    let v = DynMatrix::row(&[1.0, -1.0, 2.0]);
    let a = &u * &v;
    let d = a.svd().unwrap();
    assert_eq!(d.rank(1e-10), 1);
    assert!((d.s[(0, 0)] - (30.0_f64).sqrt() * (6.0_f64).sqrt()).abs() < TOL);
}

// ── Sequences ────────────────────────────────────────────────────────

#[test]
fn golden_sequences() {
    assert_eq!(sequence::halton(1, 4).unwrap().as_slice(), &[0.5, 0.25, 0.75, 0.125]);
    assert_eq!(sequence::sobol(1, 4).unwrap().as_slice(), &[0.5, 0.75, 0.25, 0.375]);
    let s = sequence::sobol(2, 3).unwrap();
    assert_eq!(s, DynMatrix::from_rows(3, 2, &[0.5, 0.5, 0.75, 0.25, 0.25, 0.75]));
}

#[test]
fn quasi_random_fills_gaps_better_than_uniform() {
    let count = 511;
    let lower = DynMatrix::column(&[0.0, 0.0]);
    let upper = DynMatrix::column(&[1.0, 1.0]);
    let mut rng = ChaCha8Rng::seed_from_u64(2718);
    let uniform = random::uniform_samples(&mut rng, &lower, &upper, count).unwrap();
    let sobol = random::sobol_samples(&lower, &upper, count).unwrap();
    let halton = random::halton_samples(&lower, &upper, count).unwrap();

    for j in 0..2 {
        let u = max_gap(&uniform, j);
        assert!(max_gap(&sobol, j) < u, "sobol column {}", j);
        assert!(max_gap(&halton, j) < u, "halton column {}", j);
    }
    assert!((max_gap(&sobol, 0) - 1.0 / 512.0).abs() < 1e-15);
}

// ── Sampling ─────────────────────────────────────────────────────────

#[test]
fn full_draw_without_replacement() {
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    let idx = sampling::indexes_for_sampling(&mut rng, 5, 0..5, false).unwrap();
    assert_eq!(idx, vec![0, 1, 2, 3, 4]);
}

#[test]
fn bootstrap_rows_of_a_matrix() {
    let mut rng = ChaCha8Rng::seed_from_u64(31);
    let data = DynMatrix::from_fn(20, 2, |i, j| (i * 10 + j) as f64);
    let idx = sampling::bootstrap(&mut rng, data.nrows()).unwrap();
    let resampled = DynMatrix::from_fn(idx.len(), 2, |i, j| data[(idx[i], j)]);
    assert_eq!(resampled.shape(), (20, 2));
    let oob = sampling::out_of_bag(data.nrows(), &idx);
    assert!(oob.iter().all(|i| !idx.contains(i)));
}

// ── Error categories ─────────────────────────────────────────────────

#[test]
fn error_categories() {
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let a = DynMatrix::zeros(2, 3, 0.0_f64);

    let shape = a.euclidean_distance(&DynMatrix::zeros(3, 2, 0.0)).unwrap_err();
    assert_eq!(shape, Error::Shape(DimensionMismatch { expected: (2, 3), got: (3, 2) }));

    let domain = random::uniform(&mut rng, 1, 1, &Domain::Scalar { low: 1.0, high: -1.0 }).unwrap_err();
    assert_eq!(domain.kind(), ErrorKind::Domain);
    assert_eq!(a.cholesky().unwrap_err(), Error::Domain(DomainError::NotSquare { nrows: 2, ncols: 3 }));

    let indefinite = DynMatrix::from_rows(2, 2, &[1.0, 2.0, 2.0, 1.0]);
    assert_eq!(indefinite.cholesky().unwrap_err().kind(), ErrorKind::Numerical);
}

#[test]
fn bernoulli_leaves_matrix_on_error() {
    let mut rng = ChaCha8Rng::seed_from_u64(4);
    let mut m = DynMatrix::from_rows(2, 2, &[0.1, 0.2, -0.3, 0.4]);
    let before = m.clone();
    assert_eq!(
        m.bernoulli(&mut rng).unwrap_err(),
        Error::Domain(DomainError::ProbabilityOutOfRange { row: 1, col: 0 })
    );
    assert_eq!(m, before);
}
