//! Median imputation of missing values

use crate::error::{DomusError, Result};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Replaces `NaN` entries with the per-column median observed at fit time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedianImputer {
    medians: Vec<f64>,
    is_fitted: bool,
}

impl MedianImputer {
    pub fn new() -> Self {
        Self {
            medians: Vec::new(),
            is_fitted: false,
        }
    }

    /// Compute per-column medians, ignoring missing values.
    ///
    /// Fails with `EmptyColumn` when a column has no observed values at all
    /// (no median is definable).
    pub fn fit(&mut self, x: &Array2<f64>) -> Result<&mut Self> {
        self.medians = x
            .columns()
            .into_iter()
            .enumerate()
            .map(|(idx, col)| {
                let mut observed: Vec<f64> =
                    col.iter().copied().filter(|v| !v.is_nan()).collect();
                if observed.is_empty() {
                    return Err(DomusError::EmptyColumn(idx));
                }
                observed.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
                let mid = observed.len() / 2;
                let median = if observed.len() % 2 == 0 {
                    (observed[mid - 1] + observed[mid]) / 2.0
                } else {
                    observed[mid]
                };
                Ok(median)
            })
            .collect::<Result<Vec<_>>>()?;

        self.is_fitted = true;
        Ok(self)
    }

    /// Replace missing entries with the stored medians.
    pub fn transform(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        if !self.is_fitted {
            return Err(DomusError::NotFitted);
        }
        if x.ncols() != self.medians.len() {
            return Err(DomusError::Shape {
                expected: format!("{} columns", self.medians.len()),
                actual: format!("{} columns", x.ncols()),
            });
        }

        let mut result = x.clone();
        for (j, &median) in self.medians.iter().enumerate() {
            for value in result.column_mut(j) {
                if value.is_nan() {
                    *value = median;
                }
            }
        }
        Ok(result)
    }

    /// Per-column fitted medians.
    pub fn medians(&self) -> &[f64] {
        &self.medians
    }
}

impl Default for MedianImputer {
    fn default() -> Self {
        Self::new()
    }
}
