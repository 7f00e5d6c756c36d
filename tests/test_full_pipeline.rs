//! Integration test: full pipeline (load → split → preprocess → select →
//! evaluate → package → reload → predict)

use domus::artifact::PricePipeline;
use domus::pipeline::{train_and_package, TrainOptions};
use domus::schema;
use domus::training::ParamGrid;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::HashMap;
use std::io::Write;
use std::path::Path;

fn write_housing_csv(path: &Path, n_rows: usize) {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let mut file = std::fs::File::create(path).unwrap();

    let header: Vec<&str> = schema::FEATURES.iter().map(|f| f.name).collect();
    writeln!(file, "{},MEDV", header.join(",")).unwrap();

    for i in 0..n_rows {
        let chas = if i % 14 == 0 { 1.0 } else { 0.0 };
        let rm: f64 = rng.gen_range(4.0..8.5);
        let lstat: f64 = rng.gen_range(2.0..35.0);
        let medv = (10.0 + 4.5 * rm - 0.6 * lstat + rng.gen_range(-2.0..2.0)).max(5.0);

        writeln!(
            file,
            "{:.5},{:.1},{:.2},{},{:.3},{:.3},{:.1},{:.4},{},{},{:.1},{:.2},{:.2},{:.2}",
            rng.gen_range(0.01..80.0),
            rng.gen_range(0.0..100.0),
            rng.gen_range(0.5..27.0),
            chas,
            rng.gen_range(0.4..0.87),
            rm,
            rng.gen_range(5.0..100.0),
            rng.gen_range(1.2..12.0),
            rng.gen_range(1..24),
            rng.gen_range(187..711),
            rng.gen_range(12.6..22.0),
            rng.gen_range(0.5..396.9),
            lstat,
            medv,
        )
        .unwrap();
    }
}

fn small_grid() -> ParamGrid {
    ParamGrid {
        n_estimators: vec![10, 25],
        max_depth: vec![Some(6)],
        min_samples_split: vec![2],
    }
}

fn example_row() -> Vec<f64> {
    vec![
        0.00632, 18.0, 2.31, 0.0, 0.538, 6.575, 65.2, 4.09, 1.0, 296.0, 15.3, 396.9, 4.98,
    ]
}

#[test]
fn test_train_and_package_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let data_path = dir.path().join("REdata.csv");
    let artifact_path = dir.path().join("pipeline.json");
    write_housing_csv(&data_path, 160);

    let mut opts = TrainOptions::new(data_path, artifact_path.clone());
    opts.cv_folds = 3;
    opts.eval_cv_folds = 5;
    opts.grid = small_grid();

    let report = train_and_package(&opts).unwrap();

    assert_eq!(report.n_train + report.n_test, report.n_rows);
    assert!(report.test_rmse.is_finite() && report.test_rmse > 0.0);
    assert!(report.cv_rmse.scores.len() == 5);
    assert_eq!(report.feature_importances.len(), 13);
    // Importances are sorted descending
    for pair in report.feature_importances.windows(2) {
        assert!(pair[0].1 >= pair[1].1);
    }

    // The artifact must reproduce the in-process pipeline's predictions
    let reloaded = PricePipeline::load(&artifact_path).unwrap();
    let row = example_row();
    let first = reloaded.predict(&row).unwrap();
    let second = reloaded.predict(&row).unwrap();
    assert!(first.is_finite());
    assert_eq!(first, second, "prediction must be idempotent");
}

#[test]
fn test_reloaded_artifact_matches_in_memory_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    let data_path = dir.path().join("REdata.csv");
    let artifact_path = dir.path().join("pipeline.json");
    write_housing_csv(&data_path, 140);

    let mut opts = TrainOptions::new(data_path, artifact_path.clone());
    opts.cv_folds = 3;
    opts.eval_cv_folds = 3;
    opts.grid = small_grid();
    train_and_package(&opts).unwrap();

    let loaded_once = PricePipeline::load(&artifact_path).unwrap();
    let loaded_twice = PricePipeline::load(&artifact_path).unwrap();

    let row = example_row();
    let a = loaded_once.predict(&row).unwrap();
    let b = loaded_twice.predict(&row).unwrap();
    assert!((a - b).abs() < 1e-9);

    // Predicting by name through the packaged ordering gives the same value
    let named: HashMap<String, f64> = schema::feature_names()
        .into_iter()
        .zip(example_row())
        .collect();
    let by_name = loaded_once.predict_row(&named).unwrap();
    assert!((a - by_name).abs() < 1e-9);
}

#[test]
fn test_no_artifact_written_on_failure() {
    let dir = tempfile::tempdir().unwrap();
    let data_path = dir.path().join("missing.csv");
    let artifact_path = dir.path().join("pipeline.json");

    let opts = TrainOptions::new(data_path, artifact_path.clone());
    assert!(train_and_package(&opts).is_err());
    assert!(!artifact_path.exists(), "failed run must not leave an artifact");
}

#[test]
fn test_training_is_reproducible() {
    let dir = tempfile::tempdir().unwrap();
    let data_path = dir.path().join("REdata.csv");
    write_housing_csv(&data_path, 140);

    let artifact_a = dir.path().join("a.json");
    let artifact_b = dir.path().join("b.json");

    let mut opts_a = TrainOptions::new(data_path.clone(), artifact_a.clone());
    opts_a.cv_folds = 3;
    opts_a.eval_cv_folds = 3;
    opts_a.grid = small_grid();
    let mut opts_b = TrainOptions::new(data_path, artifact_b.clone());
    opts_b.cv_folds = 3;
    opts_b.eval_cv_folds = 3;
    opts_b.grid = small_grid();

    let report_a = train_and_package(&opts_a).unwrap();
    let report_b = train_and_package(&opts_b).unwrap();

    assert_eq!(report_a.best_params, report_b.best_params);
    assert_eq!(report_a.test_rmse, report_b.test_rmse);

    let row = example_row();
    let pred_a = PricePipeline::load(&artifact_a).unwrap().predict(&row).unwrap();
    let pred_b = PricePipeline::load(&artifact_b).unwrap().predict(&row).unwrap();
    assert_eq!(pred_a, pred_b);
}
