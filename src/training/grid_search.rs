//! Cross-validated grid search over forest hyperparameters

use crate::error::{DomusError, Result};
use super::cross_validation::KFold;
use super::metrics::mean_squared_error;
use super::random_forest::RandomForestRegressor;
use ndarray::{Array1, Array2, Axis};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, warn};

/// One point in the hyperparameter grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForestParams {
    pub n_estimators: usize,
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
}

impl ForestParams {
    /// Build a fresh, unfitted forest with these hyperparameters.
    pub fn build(&self, seed: u64) -> RandomForestRegressor {
        RandomForestRegressor::new(self.n_estimators)
            .with_max_depth(self.max_depth)
            .with_min_samples_split(self.min_samples_split)
            .with_random_state(seed)
    }
}

impl fmt::Display for ForestParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "n_estimators={}, max_depth={}, min_samples_split={}",
            self.n_estimators,
            self.max_depth
                .map_or("None".to_string(), |d| d.to_string()),
            self.min_samples_split
        )
    }
}

/// Named hyperparameter axes; the search space is the full Cartesian product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParamGrid {
    pub n_estimators: Vec<usize>,
    pub max_depth: Vec<Option<usize>>,
    pub min_samples_split: Vec<usize>,
}

impl Default for ParamGrid {
    fn default() -> Self {
        Self {
            n_estimators: vec![50, 100, 300],
            max_depth: vec![None, Some(10), Some(20)],
            min_samples_split: vec![2, 5],
        }
    }
}

impl ParamGrid {
    /// Enumerate the Cartesian product in declared-axis order (last axis
    /// fastest). This order is the tie-break order for selection.
    pub fn candidates(&self) -> Vec<ForestParams> {
        let mut points = Vec::with_capacity(
            self.n_estimators.len() * self.max_depth.len() * self.min_samples_split.len(),
        );
        for &n_estimators in &self.n_estimators {
            for &max_depth in &self.max_depth {
                for &min_samples_split in &self.min_samples_split {
                    points.push(ForestParams {
                        n_estimators,
                        max_depth,
                        min_samples_split,
                    });
                }
            }
        }
        points
    }
}

/// Per-candidate cross-validation record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateScore {
    pub params: ForestParams,
    /// Negative MSE per fold; a missing entry means that fold's fit failed.
    pub fold_scores: Vec<Option<f64>>,
    /// Mean score across folds; `None` when any fold failed.
    pub mean_score: Option<f64>,
}

/// Result of a completed grid search
#[derive(Debug)]
pub struct SearchOutcome {
    pub best_params: ForestParams,
    /// Cross-validated negative MSE of the winner (higher is better).
    pub best_score: f64,
    /// The winner refit on the entire training set.
    pub model: RandomForestRegressor,
    pub candidates: Vec<CandidateScore>,
}

/// Grid search with seeded k-fold cross-validation, scored by negative MSE.
#[derive(Debug, Clone)]
pub struct GridSearch {
    grid: ParamGrid,
    n_folds: usize,
    seed: u64,
}

impl GridSearch {
    pub fn new(grid: ParamGrid, n_folds: usize, seed: u64) -> Self {
        Self {
            grid,
            n_folds,
            seed,
        }
    }

    /// Run the search on preprocessed training data.
    ///
    /// Every (candidate × fold) fit is independent; they run on the rayon
    /// pool and are merged by a simple reduction afterwards. A candidate
    /// whose fit fails on any fold is excluded from selection; if every
    /// candidate is excluded the search fails with `Selection`.
    pub fn run(&self, x: &Array2<f64>, y: &Array1<f64>) -> Result<SearchOutcome> {
        let candidates = self.grid.candidates();
        if candidates.is_empty() {
            return Err(DomusError::Selection(
                "hyperparameter grid is empty".to_string(),
            ));
        }

        let folds = KFold::new(self.n_folds, self.seed).split(x.nrows())?;
        info!(
            n_candidates = candidates.len(),
            n_folds = self.n_folds,
            total_fits = candidates.len() * self.n_folds,
            "starting grid search"
        );

        // One task per (candidate, fold) pair
        let tasks: Vec<(usize, usize)> = (0..candidates.len())
            .flat_map(|c| (0..folds.len()).map(move |f| (c, f)))
            .collect();

        let scores: Vec<(usize, usize, Option<f64>)> = tasks
            .par_iter()
            .map(|&(cand_idx, fold_idx)| {
                let fold = &folds[fold_idx];
                let x_train = x.select(Axis(0), &fold.train_indices);
                let y_train: Array1<f64> =
                    Array1::from_vec(fold.train_indices.iter().map(|&i| y[i]).collect());
                let x_val = x.select(Axis(0), &fold.test_indices);
                let y_val: Array1<f64> =
                    Array1::from_vec(fold.test_indices.iter().map(|&i| y[i]).collect());

                let mut model = candidates[cand_idx].build(self.seed);
                let score = model
                    .fit(&x_train, &y_train)
                    .and_then(|m| m.predict(&x_val))
                    .map(|pred| -mean_squared_error(&y_val, &pred));

                match score {
                    Ok(s) => (cand_idx, fold_idx, Some(s)),
                    Err(e) => {
                        warn!(
                            params = %candidates[cand_idx],
                            fold = fold_idx,
                            error = %e,
                            "candidate fit failed"
                        );
                        (cand_idx, fold_idx, None)
                    }
                }
            })
            .collect();

        // Reduce to per-candidate fold score vectors
        let mut fold_scores: Vec<Vec<Option<f64>>> =
            vec![vec![None; folds.len()]; candidates.len()];
        for (cand_idx, fold_idx, score) in scores {
            fold_scores[cand_idx][fold_idx] = score;
        }

        let candidate_scores: Vec<CandidateScore> = candidates
            .iter()
            .zip(fold_scores)
            .map(|(params, scores)| {
                let mean_score = if scores.iter().all(|s| s.is_some()) {
                    let sum: f64 = scores.iter().flatten().sum();
                    Some(sum / scores.len() as f64)
                } else {
                    None
                };
                debug!(params = %params, mean_score = ?mean_score, "candidate scored");
                CandidateScore {
                    params: params.clone(),
                    fold_scores: scores,
                    mean_score,
                }
            })
            .collect();

        // Select the best mean score; strict comparison keeps the first
        // enumerated candidate on ties.
        let mut best: Option<(usize, f64)> = None;
        for (idx, candidate) in candidate_scores.iter().enumerate() {
            if let Some(score) = candidate.mean_score {
                if best.map_or(true, |(_, s)| score > s) {
                    best = Some((idx, score));
                }
            }
        }

        let (best_idx, best_score) = best.ok_or_else(|| {
            DomusError::Selection(
                "no hyperparameter candidate produced a complete cross-validation score"
                    .to_string(),
            )
        })?;

        let best_params = candidates[best_idx].clone();
        info!(params = %best_params, score = best_score, "grid search winner");

        // Refit the winner on the entire training set
        let mut model = best_params.build(self.seed);
        model.fit(x, y)?;

        Ok(SearchOutcome {
            best_params,
            best_score,
            model,
            candidates: candidate_scores,
        })
    }
}
