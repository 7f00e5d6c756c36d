//! Integration test: forest training and grid-search selection

use domus::training::{ForestParams, GridSearch, KFold, ParamGrid, RandomForestRegressor};
use ndarray::{Array1, Array2};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Noisy linear data: y = 3*x0 - 2*x1 + noise
fn make_regression(n: usize, seed: u64) -> (Array2<f64>, Array1<f64>) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let x = Array2::from_shape_fn((n, 2), |_| rng.gen_range(-5.0..5.0));
    let y = Array1::from_shape_fn(n, |i| {
        3.0 * x[[i, 0]] - 2.0 * x[[i, 1]] + rng.gen_range(-0.5..0.5)
    });
    (x, y)
}

#[test]
fn test_forest_learns_signal() {
    let (x, y) = make_regression(80, 1);
    let mut rf = RandomForestRegressor::new(30).with_random_state(42);
    rf.fit(&x, &y).unwrap();

    let predictions = rf.predict(&x).unwrap();
    let mse: f64 = predictions
        .iter()
        .zip(y.iter())
        .map(|(p, a)| (p - a).powi(2))
        .sum::<f64>()
        / y.len() as f64;

    // In-sample error of a bagged forest on smooth data should be small
    assert!(mse < 5.0, "MSE too high: {}", mse);
}

#[test]
fn test_k_fold_covers_every_sample_once() {
    let splits = KFold::new(5, 42).split(83).unwrap();
    let mut seen: Vec<usize> = splits
        .iter()
        .flat_map(|s| s.test_indices.clone())
        .collect();
    seen.sort();
    assert_eq!(seen, (0..83).collect::<Vec<_>>());
}

#[test]
fn test_grid_search_end_to_end() {
    let (x, y) = make_regression(60, 2);
    let grid = ParamGrid {
        n_estimators: vec![10, 20],
        max_depth: vec![None, Some(4)],
        min_samples_split: vec![2],
    };
    let outcome = GridSearch::new(grid, 3, 42).run(&x, &y).unwrap();

    assert_eq!(outcome.candidates.len(), 4);
    assert!(outcome.candidates.iter().all(|c| c.mean_score.is_some()));
    // Winner's score is the max over candidates
    let max_score = outcome
        .candidates
        .iter()
        .filter_map(|c| c.mean_score)
        .fold(f64::NEG_INFINITY, f64::max);
    assert_eq!(outcome.best_score, max_score);
    // Refit model carries the winning tree count
    assert_eq!(outcome.model.n_trees(), outcome.best_params.n_estimators);
}

#[test]
fn test_grid_search_is_deterministic() {
    let (x, y) = make_regression(50, 3);
    let grid = ParamGrid {
        n_estimators: vec![8, 16],
        max_depth: vec![Some(5)],
        min_samples_split: vec![2, 5],
    };
    let a = GridSearch::new(grid.clone(), 3, 7).run(&x, &y).unwrap();
    let b = GridSearch::new(grid, 3, 7).run(&x, &y).unwrap();

    assert_eq!(a.best_params, b.best_params);
    assert_eq!(a.best_score, b.best_score);

    let pred_a = a.model.predict(&x).unwrap();
    let pred_b = b.model.predict(&x).unwrap();
    assert_eq!(pred_a, pred_b);
}

#[test]
fn test_refit_uses_full_training_set() {
    let (x, y) = make_regression(40, 4);
    let grid = ParamGrid {
        n_estimators: vec![10],
        max_depth: vec![None],
        min_samples_split: vec![2],
    };
    let outcome = GridSearch::new(grid, 4, 42).run(&x, &y).unwrap();

    // A fresh fit on the full set with the same params must match exactly
    let mut reference = ForestParams {
        n_estimators: 10,
        max_depth: None,
        min_samples_split: 2,
    }
    .build(42);
    reference.fit(&x, &y).unwrap();

    let from_search = outcome.model.predict(&x).unwrap();
    let from_reference = reference.predict(&x).unwrap();
    assert_eq!(from_search, from_reference);
}
