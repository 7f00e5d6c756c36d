//! Offline training pipeline
//!
//! The batch job end to end: load → stratified split → fit transform →
//! grid search → evaluate → package. Errors anywhere are fatal to the run;
//! the artifact is only written after every prior stage has succeeded.

use crate::artifact::PricePipeline;
use crate::data::{feature_matrix, load_csv, target_vector, StratifiedShuffleSplit};
use crate::error::Result;
use crate::evaluation::{cv_rmse, holdout_rmse};
use crate::preprocessing::Preprocessor;
use crate::schema;
use crate::training::cross_validation::CvScores;
use crate::training::grid_search::{ForestParams, GridSearch, ParamGrid};
use crate::training::metrics::RegressionMetrics;
use std::path::PathBuf;
use tracing::info;

/// Configuration for one training run.
#[derive(Debug, Clone)]
pub struct TrainOptions {
    pub data_path: PathBuf,
    pub artifact_path: PathBuf,
    /// Low-cardinality column used to balance the split.
    pub stratify_column: String,
    pub test_fraction: f64,
    /// Folds for grid-search cross-validation.
    pub cv_folds: usize,
    /// Folds for the secondary CV RMSE estimate.
    pub eval_cv_folds: usize,
    pub seed: u64,
    pub grid: ParamGrid,
}

impl TrainOptions {
    pub fn new(data_path: PathBuf, artifact_path: PathBuf) -> Self {
        Self {
            data_path,
            artifact_path,
            stratify_column: "CHAS".to_string(),
            test_fraction: 0.2,
            cv_folds: 5,
            eval_cv_folds: 10,
            seed: 42,
            grid: ParamGrid::default(),
        }
    }
}

/// Diagnostics from a completed training run.
#[derive(Debug, Clone)]
pub struct TrainingReport {
    pub n_rows: usize,
    pub n_train: usize,
    pub n_test: usize,
    pub best_params: ForestParams,
    /// Winning cross-validated score (negative MSE).
    pub best_cv_score: f64,
    pub test_rmse: f64,
    pub train_rmse: f64,
    pub cv_rmse: CvScores,
    /// (feature name, importance), sorted descending.
    pub feature_importances: Vec<(String, f64)>,
}

/// Run the whole offline pipeline and write the artifact.
pub fn train_and_package(opts: &TrainOptions) -> Result<TrainingReport> {
    let feature_names = schema::feature_names();

    let df = load_csv(&opts.data_path)?;
    info!(
        rows = df.height(),
        cols = df.width(),
        path = %opts.data_path.display(),
        "dataset loaded"
    );

    let splitter = StratifiedShuffleSplit::new(opts.test_fraction, opts.seed)?;
    let (train_df, test_df) = splitter.split(&df, &opts.stratify_column)?;
    info!(
        train = train_df.height(),
        test = test_df.height(),
        stratify = %opts.stratify_column,
        "stratified split complete"
    );

    let x_train_raw = feature_matrix(&train_df, &feature_names)?;
    let y_train = target_vector(&train_df, schema::TARGET)?;
    let x_test_raw = feature_matrix(&test_df, &feature_names)?;
    let y_test = target_vector(&test_df, schema::TARGET)?;

    // Transform statistics come from the training split only; the test split
    // stays untouched until final evaluation.
    let mut preprocessor = Preprocessor::new();
    let x_train = preprocessor.fit_transform(&x_train_raw)?;
    info!(n_features = preprocessor.n_features(), "preprocessing fitted");

    let search = GridSearch::new(opts.grid.clone(), opts.cv_folds, opts.seed);
    let outcome = search.run(&x_train, &y_train)?;

    let test_rmse = holdout_rmse(&outcome.model, &preprocessor, &x_test_raw, &y_test)?;
    let train_predictions = outcome.model.predict(&x_train)?;
    let train_rmse = RegressionMetrics::compute(&y_train, &train_predictions).rmse;
    let cv = cv_rmse(
        &outcome.best_params,
        &x_train,
        &y_train,
        opts.eval_cv_folds,
        opts.seed,
    )?;
    info!(test_rmse, train_rmse, "evaluation complete");

    let mut feature_importances: Vec<(String, f64)> = outcome
        .model
        .feature_importances()
        .map(|imp| {
            feature_names
                .iter()
                .cloned()
                .zip(imp.iter().copied())
                .collect()
        })
        .unwrap_or_default();
    feature_importances
        .sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    for (name, importance) in &feature_importances {
        info!(feature = %name, importance, "feature importance");
    }

    let pipeline = PricePipeline::new(preprocessor, outcome.model, feature_names)?;
    pipeline.save(&opts.artifact_path)?;

    Ok(TrainingReport {
        n_rows: df.height(),
        n_train: train_df.height(),
        n_test: test_df.height(),
        best_params: outcome.best_params,
        best_cv_score: outcome.best_score,
        test_rmse,
        train_rmse,
        cv_rmse: cv,
        feature_importances,
    })
}
