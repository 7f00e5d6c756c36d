//! Model-quality sign-off
//!
//! Read-only diagnostics: held-out RMSE on the untouched test split, and a
//! secondary k-fold cross-validated RMSE estimate over the training set using
//! fresh fits of the winning hyperparameters.

use crate::error::Result;
use crate::preprocessing::Preprocessor;
use crate::training::cross_validation::{CvScores, KFold};
use crate::training::grid_search::ForestParams;
use crate::training::metrics::RegressionMetrics;
use crate::training::random_forest::RandomForestRegressor;
use ndarray::{Array1, Array2, Axis};
use rayon::prelude::*;
use tracing::info;

/// RMSE of the fitted model on a raw (untransformed) feature matrix.
pub fn holdout_rmse(
    model: &RandomForestRegressor,
    preprocessor: &Preprocessor,
    x_raw: &Array2<f64>,
    y: &Array1<f64>,
) -> Result<f64> {
    let x = preprocessor.transform(x_raw)?;
    let predictions = model.predict(&x)?;
    let metrics = RegressionMetrics::compute(y, &predictions);
    Ok(metrics.rmse)
}

/// K-fold cross-validated RMSE over the training set.
///
/// Each fold fits a fresh forest with the given hyperparameters; folds are
/// independent and run on the rayon pool.
pub fn cv_rmse(
    params: &ForestParams,
    x: &Array2<f64>,
    y: &Array1<f64>,
    n_folds: usize,
    seed: u64,
) -> Result<CvScores> {
    let folds = KFold::new(n_folds, seed).split(x.nrows())?;

    let rmse_scores: Vec<f64> = folds
        .par_iter()
        .map(|fold| -> Result<f64> {
            let x_train = x.select(Axis(0), &fold.train_indices);
            let y_train: Array1<f64> =
                Array1::from_vec(fold.train_indices.iter().map(|&i| y[i]).collect());
            let x_val = x.select(Axis(0), &fold.test_indices);
            let y_val: Array1<f64> =
                Array1::from_vec(fold.test_indices.iter().map(|&i| y[i]).collect());

            let mut model = params.build(seed);
            model.fit(&x_train, &y_train)?;
            let predictions = model.predict(&x_val)?;
            Ok(RegressionMetrics::compute(&y_val, &predictions).rmse)
        })
        .collect::<Result<Vec<_>>>()?;

    let scores = CvScores::from_scores(rmse_scores);
    info!(
        mean_rmse = scores.mean,
        std_rmse = scores.std,
        n_folds,
        "cross-validated RMSE"
    );
    Ok(scores)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array;

    #[test]
    fn test_holdout_rmse_near_zero_on_easy_data() {
        let x = Array::from_shape_fn((40, 1), |(i, _)| i as f64);
        let y = Array::from_shape_fn(40, |i| i as f64);

        let mut prep = Preprocessor::new();
        let x_t = prep.fit_transform(&x).unwrap();

        let params = ForestParams {
            n_estimators: 20,
            max_depth: None,
            min_samples_split: 2,
        };
        let mut model = params.build(42);
        model.fit(&x_t, &y).unwrap();

        let rmse = holdout_rmse(&model, &prep, &x, &y).unwrap();
        assert!(rmse < 2.0, "rmse = {}", rmse);
    }

    #[test]
    fn test_cv_rmse_shape() {
        let x = Array::from_shape_fn((30, 2), |(i, j)| (i + j) as f64);
        let y = Array::from_shape_fn(30, |i| i as f64);

        let params = ForestParams {
            n_estimators: 5,
            max_depth: Some(4),
            min_samples_split: 2,
        };
        let scores = cv_rmse(&params, &x, &y, 3, 42).unwrap();
        assert_eq!(scores.scores.len(), 3);
        assert!(scores.mean >= 0.0);
        assert!(scores.std >= 0.0);
    }
}
