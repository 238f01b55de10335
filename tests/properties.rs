use denseops::{random, sampling, sequence, Domain, DynMatrix};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Random `rows × cols` matrix with entries in `[-10, 10)`.
fn matrix_strategy(rows: usize, cols: usize) -> impl Strategy<Value = DynMatrix<f64>> {
    proptest::collection::vec(-10.0f64..10.0, rows * cols)
        .prop_map(move |data| DynMatrix::from_vec(rows, cols, data))
}

/// Matrix of random shape up to 6×6.
fn any_matrix() -> impl Strategy<Value = DynMatrix<f64>> {
    (1usize..7, 1usize..7).prop_flat_map(|(m, n)| matrix_strategy(m, n))
}

fn square(max: usize) -> impl Strategy<Value = DynMatrix<f64>> {
    (1usize..=max).prop_flat_map(|n| matrix_strategy(n, n))
}

/// Per-dimension box: lower bound in `[-100, 100)`, width in `[0, 50)`.
fn bounds(d: usize) -> impl Strategy<Value = (DynMatrix<f64>, DynMatrix<f64>)> {
    (
        proptest::collection::vec(-100.0f64..100.0, d),
        proptest::collection::vec(0.0f64..50.0, d),
    )
        .prop_map(|(lo, width)| {
            let hi: Vec<f64> = lo.iter().zip(&width).map(|(l, w)| l + w).collect();
            (DynMatrix::column(&lo), DynMatrix::column(&hi))
        })
}

fn inside(m: &DynMatrix<f64>, lower: &DynMatrix<f64>, upper: &DynMatrix<f64>) -> bool {
    (0..m.nrows()).all(|i| {
        (0..m.ncols()).all(|j| {
            let (lo, hi, x) = (lower[(j, 0)], upper[(j, 0)], m[(i, j)]);
            if lo == hi {
                x == lo
            } else {
                lo <= x && x < hi
            }
        })
    })
}

fn max_deviation(a: &DynMatrix<f64>, b: &DynMatrix<f64>) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y).abs()).fold(0.0, f64::max)
}

fn scale_of(a: &DynMatrix<f64>) -> f64 {
    a.iter().map(|x| x.abs()).fold(1.0, f64::max)
}

/// Largest absolute entry, with no floor, so tolerances follow tiny inputs.
fn magnitude(a: &DynMatrix<f64>) -> f64 {
    a.iter().map(|x| x.abs()).fold(f64::MIN_POSITIVE, f64::max)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    // ── Generators stay inside their domain ─────────────────────────

    #[test]
    fn uniform_draws_inside_scalar_domain(
        seed in any::<u64>(),
        low in -1e6f64..1e6,
        width in 0.0f64..1e3,
        rows in 0usize..8,
        cols in 0usize..8,
    ) {
        let high = low + width;
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let m = random::uniform(&mut rng, rows, cols, &Domain::Scalar { low, high }).unwrap();
        prop_assert_eq!(m.shape(), (rows, cols));
        for &x in m.iter() {
            let in_range = if low == high { x == low } else { low <= x && x < high };
            prop_assert!(in_range, "{} outside [{}, {})", x, low, high);
        }
    }

    #[test]
    fn uniform_samples_inside_box(
        seed in any::<u64>(),
        (lower, upper) in (1usize..6).prop_flat_map(bounds),
        count in 0usize..40,
    ) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let m = random::uniform_samples(&mut rng, &lower, &upper, count).unwrap();
        prop_assert_eq!(m.shape(), (count, lower.nrows()));
        prop_assert!(inside(&m, &lower, &upper));
    }

    #[test]
    fn quasi_samples_inside_box_and_repeatable(
        (lower, upper) in (1usize..=16).prop_flat_map(bounds),
        count in 0usize..100,
    ) {
        let s = random::sobol_samples(&lower, &upper, count).unwrap();
        let h = random::halton_samples(&lower, &upper, count).unwrap();
        prop_assert!(inside(&s, &lower, &upper));
        prop_assert!(inside(&h, &lower, &upper));
        prop_assert_eq!(s, random::sobol_samples(&lower, &upper, count).unwrap());
        prop_assert_eq!(h, random::halton_samples(&lower, &upper, count).unwrap());
    }

    #[test]
    fn unit_sequences_in_unit_cube(dimension in 1usize..=16, count in 0usize..200) {
        let s = sequence::sobol(dimension, count).unwrap();
        let h = sequence::halton(dimension, count).unwrap();
        prop_assert!(s.iter().chain(h.iter()).all(|&x| (0.0..1.0).contains(&x)));
    }

    #[test]
    fn normal_draws_are_reproducible(seed in any::<u64>(), mean in -10.0f64..10.0, variance in 0.0f64..4.0) {
        let a = random::normal(&mut ChaCha8Rng::seed_from_u64(seed), 3, 3, mean, variance).unwrap();
        let b = random::normal(&mut ChaCha8Rng::seed_from_u64(seed), 3, 3, mean, variance).unwrap();
        prop_assert_eq!(a, b);
    }

    // ── Index sampling ──────────────────────────────────────────────

    #[test]
    fn sampling_without_replacement(
        seed in any::<u64>(),
        start in 0usize..1000,
        len in 0usize..60,
        frac in 0.0f64..=1.0,
    ) {
        let samples = (len as f64 * frac) as usize;
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let idx = sampling::indexes_for_sampling(&mut rng, samples, start..start + len, false).unwrap();
        prop_assert_eq!(idx.len(), samples);
        prop_assert!(idx.windows(2).all(|w| w[0] < w[1]));
        prop_assert!(idx.iter().all(|&i| i >= start && i < start + len));

        let too_many = sampling::indexes_for_sampling(&mut rng, len + 1, start..start + len, false);
        prop_assert!(too_many.is_err());
    }

    #[test]
    fn sampling_with_replacement(seed in any::<u64>(), len in 1usize..30, samples in 0usize..100) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let idx = sampling::indexes_for_sampling(&mut rng, samples, 0..len, true).unwrap();
        prop_assert_eq!(idx.len(), samples);
        prop_assert!(idx.windows(2).all(|w| w[0] <= w[1]));
        prop_assert!(idx.iter().all(|&i| i < len));
    }

    // ── Decompositions ──────────────────────────────────────────────

    #[test]
    fn cholesky_reconstructs_spd(b in square(6)) {
        // Bᵀ·B + n·I is symmetric positive definite
        let n = b.nrows();
        let a = &(&b.transpose() * &b) + &DynMatrix::from_diag(&vec![n as f64; n]);
        let l = a.cholesky().unwrap().into_l();
        let llt = &l * &l.transpose();
        prop_assert!(max_deviation(&llt, &a) < 1e-9 * scale_of(&a));
    }

    #[test]
    fn svd_reconstructs(a in any_matrix()) {
        let d = a.svd().unwrap();
        let k = a.nrows().min(a.ncols());
        prop_assert_eq!(d.s.shape(), (k, k));
        prop_assert!(max_deviation(&d.reconstruct(), &a) < 1e-9 * scale_of(&a));
        let s = d.singular_values();
        prop_assert!(s.windows(2).all(|w| w[0] >= w[1]));
        prop_assert!(s.iter().all(|&x| x >= 0.0));
    }

    #[test]
    fn pseudo_inverse_of_invertible(b in square(5)) {
        // strict diagonal dominance keeps A well conditioned
        let n = b.nrows();
        let a = &b + &DynMatrix::from_diag(&vec![60.0; n]);
        let p = a.pseudo_inverse().unwrap();
        prop_assert!(max_deviation(&(&a * &p), &DynMatrix::eye(n, 0.0)) < 1e-10);
    }

    #[test]
    fn symmetric_eigen_reconstructs(b in square(5)) {
        let a = &b + &b.transpose();
        let e = a.eigen().unwrap();
        let n = a.nrows();
        let lambda = DynMatrix::from_fn(n, n, |i, j| if i == j { e.values[(i, 0)] } else { 0.0 });
        let rebuilt = &(&e.vectors * &lambda) * &e.vectors.transpose();
        prop_assert!(max_deviation(&rebuilt, &a) < 1e-8 * scale_of(&a));
    }

    // ── Scale invariance ────────────────────────────────────────────

    #[test]
    fn svd_reconstructs_at_any_scale(a in any_matrix(), k in -60i32..=60) {
        let c = 10f64.powi(k);
        let ca = a.scale(c);
        let d = ca.svd().unwrap();
        prop_assert!(max_deviation(&d.reconstruct(), &ca) < 1e-9 * magnitude(&ca));
    }

    #[test]
    fn pseudo_inverse_at_any_scale(b in square(5), k in -60i32..=60) {
        let n = b.nrows();
        let a = (&b + &DynMatrix::from_diag(&vec![60.0; n])).scale(10f64.powi(k));
        let p = a.pseudo_inverse().unwrap();
        prop_assert!(max_deviation(&(&a * &p), &DynMatrix::eye(n, 0.0)) < 1e-10);
    }

    #[test]
    fn symmetric_eigen_at_any_scale(b in square(5), k in -60i32..=60) {
        let a = (&b + &b.transpose()).scale(10f64.powi(k));
        let e = a.eigen().unwrap();
        let n = a.nrows();
        let lambda = DynMatrix::from_fn(n, n, |i, j| if i == j { e.values[(i, 0)] } else { 0.0 });
        let rebuilt = &(&e.vectors * &lambda) * &e.vectors.transpose();
        prop_assert!(max_deviation(&rebuilt, &a) < 1e-8 * magnitude(&a));
    }

    #[test]
    fn general_spectrum_trace_at_any_scale(b in square(5), k in -60i32..=60) {
        let a = b.scale(10f64.powi(k));
        let ev = a.eigenvalues().unwrap();
        let trace: f64 = (0..a.nrows()).map(|i| a[(i, i)]).sum();
        let sum: f64 = ev.re.iter().sum();
        prop_assert!((trace - sum).abs() < 1e-8 * magnitude(&a) * a.nrows() as f64);
    }

    #[test]
    fn determinant_scales_as_power(b in square(5), k in -20i32..=20) {
        let n = b.nrows();
        let a = &b + &DynMatrix::from_diag(&vec![60.0; n]);
        let c = 10f64.powi(k);
        let expected = c.powi(n as i32) * a.determinant().unwrap();
        let got = a.scale(c).determinant().unwrap();
        prop_assert!((got - expected).abs() <= 1e-10 * expected.abs());
    }

    #[test]
    fn wide_range_diagonal_determinant_and_solve(
        exponents in proptest::collection::vec(-30i32..=30, 1..7),
        x in proptest::collection::vec(-10.0f64..10.0, 6),
    ) {
        let diag: Vec<f64> = exponents.iter().map(|&e| 10f64.powi(e)).collect();
        let n = diag.len();
        let a = DynMatrix::from_diag(&diag);

        let expected: f64 = diag.iter().product();
        prop_assert!((a.determinant().unwrap() - expected).abs() <= 1e-12 * expected.abs());

        let x = DynMatrix::column(&x[..n]);
        let b = &a * &x;
        let solved = a.solve(&b).unwrap();
        for i in 0..n {
            prop_assert!((solved[(i, 0)] - x[(i, 0)]).abs() <= 1e-12 * x[(i, 0)].abs().max(1e-300));
        }
    }

    // ── Statistics ──────────────────────────────────────────────────

    #[test]
    fn sample_variance_is_scaled_population_variance(a in (1usize..6, 2usize..8).prop_flat_map(|(m, n)| matrix_strategy(m, n))) {
        let n = a.ncols() as f64;
        let pop = a.variances_of_rows().unwrap();
        let smp = a.sample_variances_of_rows().unwrap();
        for i in 0..a.nrows() {
            prop_assert!((smp[(i, 0)] - pop[(i, 0)] * n / (n - 1.0)).abs() < 1e-9);
        }
    }

    #[test]
    fn bernoulli_rejects_without_writing(seed in any::<u64>(), a in any_matrix()) {
        // entries in [-10, 10) rarely all fall in [0, 1]; force one out of range
        let mut m = a.map(|x| x.abs() / 10.0);
        let last = (m.nrows() - 1, m.ncols() - 1);
        let mut bad = DynMatrix::from_fn(m.nrows(), m.ncols(), |i, j| if (i, j) == last { 1.5 } else { m[(i, j)] });
        let before = bad.clone();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        prop_assert!(bad.bernoulli(&mut rng).is_err());
        prop_assert_eq!(&bad, &before);

        m.bernoulli(&mut rng).unwrap();
        prop_assert!(m.iter().all(|&x| x == 0.0 || x == 1.0));
    }
}
