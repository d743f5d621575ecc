//! Property tests for the PCA engine on synthetic panels.

use approx::assert_abs_diff_eq;
use ndarray::{array, Array1, Array2, Axis};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};

use macro_pca::{
    dominant_variables, fit, kaiser_count, variance_threshold_count, Decomposition,
    StandardizedPanel,
};

fn names(n: usize) -> Vec<String> {
    (0..n).map(|j| format!("var_{}", j)).collect()
}

/// A random panel with no imposed structure.
fn random_panel(n_observations: usize, n_variables: usize, seed: u64) -> StandardizedPanel {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let raw = Array2::from_shape_fn((n_observations, n_variables), |_| rng.gen_range(-3.0..3.0));
    StandardizedPanel::from_raw(raw.view(), names(n_variables)).unwrap()
}

/// A panel driven by two latent factors, three observed variables each,
/// with small idiosyncratic noise. Its leading two eigenvalues sit well
/// above 1 and the rest well below.
fn two_factor_panel(n_observations: usize, seed: u64) -> StandardizedPanel {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let factor = Normal::new(0.0, 1.0).unwrap();
    let noise = Normal::new(0.0, 0.1).unwrap();

    let mut raw = Array2::zeros((n_observations, 6));
    for i in 0..n_observations {
        let f1 = factor.sample(&mut rng);
        let f2 = factor.sample(&mut rng);
        for j in 0..3 {
            raw[[i, j]] = f1 + noise.sample(&mut rng);
        }
        for j in 3..6 {
            raw[[i, j]] = f2 + noise.sample(&mut rng);
        }
    }
    StandardizedPanel::from_raw(raw.view(), names(6)).unwrap()
}

#[test]
fn components_are_orthonormal() {
    let panel = random_panel(120, 8, 11);
    let dec = fit(&panel, None).unwrap();
    let basis = dec.components();
    let gram = basis.t().dot(&basis);
    for i in 0..dec.n_components() {
        for j in 0..dec.n_components() {
            let expected = if i == j { 1.0 } else { 0.0 };
            assert_abs_diff_eq!(gram[[i, j]], expected, epsilon = 1e-8);
        }
    }
}

#[test]
fn eigenvalues_are_descending_and_conserve_variance() {
    let panel = random_panel(200, 10, 23);
    let dec = fit(&panel, None).unwrap();
    let eigenvalues = dec.eigenvalues();
    for pair in eigenvalues.windows(2) {
        assert!(pair[0] >= pair[1]);
    }
    // Full-rank fit of standardized columns: total variance is the
    // variable count.
    assert_abs_diff_eq!(eigenvalues.sum(), 10.0, epsilon = 1e-8);
}

#[test]
fn communalities_round_trip_to_unit_variance() {
    let panel = random_panel(150, 7, 37);
    let dec = fit(&panel, None).unwrap();
    let h2 = dec.communalities(None).unwrap();
    for &value in h2.iter() {
        assert_abs_diff_eq!(value, 1.0, epsilon = 1e-8);
    }
}

#[test]
fn score_variances_match_eigenvalues() {
    let panel = random_panel(180, 9, 41);
    let dec = fit(&panel, None).unwrap();
    let scores = dec.transform(panel.matrix()).unwrap();
    let variances = scores.var_axis(Axis(0), 1.0);
    for (k, &lambda) in dec.eigenvalues().iter().enumerate() {
        assert_abs_diff_eq!(variances[k], lambda, epsilon = 1e-8);
    }
}

#[test]
fn kaiser_rule_finds_the_planted_factors() {
    let panel = two_factor_panel(400, 53);
    let dec = fit(&panel, None).unwrap();
    let eigenvalues = dec.eigenvalues();
    // Keep the test away from the lambda = 1 boundary the rule is known to
    // be sensitive around.
    assert!(eigenvalues[1] > 1.5);
    assert!(eigenvalues[2] < 0.5);
    assert_eq!(kaiser_count(eigenvalues), 2);
}

#[test]
fn variance_threshold_agrees_with_the_spectrum() {
    let panel = two_factor_panel(400, 59);
    let dec = fit(&panel, None).unwrap();
    // Two factors of three unit-variance variables each: the leading pair
    // of components carries nearly all variance.
    let kept = variance_threshold_count(dec.eigenvalues(), 0.80).unwrap();
    assert!(kept <= 2);
    let all = variance_threshold_count(dec.eigenvalues(), 1.0).unwrap();
    assert_eq!(all, dec.n_components());
}

#[test]
fn refits_are_bit_identical() {
    let panel = random_panel(90, 6, 67);
    let first = fit(&panel, None).unwrap();
    let second = fit(&panel, None).unwrap();
    assert_eq!(first.components(), second.components());
    assert_eq!(first.eigenvalues(), second.eigenvalues());
    let scores_a = first.transform(panel.matrix()).unwrap();
    let scores_b = second.transform(panel.matrix()).unwrap();
    assert_eq!(scores_a, scores_b);
}

#[test]
fn dominant_variables_rank_by_magnitude_with_sign() {
    // Single component with loadings [0.8, -0.9, 0.1] for A, B, C.
    let components = array![[0.8], [-0.9], [0.1]];
    let eigenvalues = Array1::from(vec![1.0]);
    let dec = Decomposition::from_parts(
        components,
        eigenvalues,
        vec!["A".to_string(), "B".to_string(), "C".to_string()],
    )
    .unwrap();

    let ranked = dominant_variables(&dec, 0, 2).unwrap();
    assert_eq!(ranked[0].0, "B");
    assert_abs_diff_eq!(ranked[0].1, -0.9, epsilon = 1e-12);
    assert_eq!(ranked[1].0, "A");
    assert_abs_diff_eq!(ranked[1].1, 0.8, epsilon = 1e-12);
}

#[test]
fn loadings_are_variable_component_correlations() {
    // For standardized data, loading (j, k) equals the Pearson correlation
    // between variable j and score k.
    let panel = two_factor_panel(300, 71);
    let dec = fit(&panel, None).unwrap();
    let scores = dec.transform(panel.matrix()).unwrap();
    let loadings = dec.loadings();
    let n = panel.n_observations() as f64;

    for k in 0..2 {
        let score = scores.column(k);
        let score_std = score.std(1.0);
        for j in 0..panel.n_variables() {
            let column = panel.matrix().column(j).to_owned();
            let covariance = column.dot(&score) / (n - 1.0);
            let correlation = covariance / score_std;
            assert_abs_diff_eq!(loadings[[j, k]], correlation, epsilon = 1e-6);
        }
    }
}
