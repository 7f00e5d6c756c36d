//! Feature standardization

use crate::error::{DomusError, Result};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Variance below this is treated as a constant column.
const VARIANCE_EPS: f64 = 1e-12;

/// Parameters for one fitted column.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ScaleParams {
    center: f64,
    scale: f64,
}

/// Standard scaling (z-score): `(x - mean) / std` with train-split statistics.
///
/// Constant columns (std ≈ 0) pass through unchanged — with `center = 0` and
/// `scale = 1` the output stays at the imputed value, never NaN/Inf.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    params: Vec<ScaleParams>,
    is_fitted: bool,
}

impl StandardScaler {
    pub fn new() -> Self {
        Self {
            params: Vec::new(),
            is_fitted: false,
        }
    }

    /// Compute per-column mean and standard deviation. Expects already-imputed
    /// input; a NaN here is a contract violation upstream.
    pub fn fit(&mut self, x: &Array2<f64>) -> Result<&mut Self> {
        let n = x.nrows();
        if n == 0 {
            return Err(DomusError::Shape {
                expected: "at least 1 row".to_string(),
                actual: "0 rows".to_string(),
            });
        }

        self.params = x
            .columns()
            .into_iter()
            .map(|col| {
                let mean = col.sum() / n as f64;
                let variance = if n < 2 {
                    0.0
                } else {
                    col.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64
                };
                if variance < VARIANCE_EPS {
                    ScaleParams {
                        center: 0.0,
                        scale: 1.0,
                    }
                } else {
                    ScaleParams {
                        center: mean,
                        scale: variance.sqrt(),
                    }
                }
            })
            .collect();

        self.is_fitted = true;
        Ok(self)
    }

    /// Rescale each column with the stored parameters.
    pub fn transform(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        if !self.is_fitted {
            return Err(DomusError::NotFitted);
        }
        if x.ncols() != self.params.len() {
            return Err(DomusError::Shape {
                expected: format!("{} columns", self.params.len()),
                actual: format!("{} columns", x.ncols()),
            });
        }

        let mut result = x.clone();
        for (j, params) in self.params.iter().enumerate() {
            for value in result.column_mut(j) {
                *value = (*value - params.center) / params.scale;
            }
        }
        Ok(result)
    }
}

impl Default for StandardScaler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_standardize() {
        let x = array![[1.0], [2.0], [3.0], [4.0], [5.0]];
        let mut scaler = StandardScaler::new();
        let scaled = scaler.fit(&x).unwrap().transform(&x).unwrap();

        let mean: f64 = scaled.column(0).sum() / 5.0;
        assert!(mean.abs() < 1e-10);
    }

    #[test]
    fn test_constant_column_passes_through() {
        let x = array![[5.0, 1.0], [5.0, 2.0], [5.0, 3.0]];
        let mut scaler = StandardScaler::new();
        let scaled = scaler.fit(&x).unwrap().transform(&x).unwrap();

        for i in 0..3 {
            assert_eq!(scaled[[i, 0]], 5.0);
            assert!(scaled[[i, 0]].is_finite());
        }
        // Non-constant column is still centered
        let mean: f64 = scaled.column(1).sum() / 3.0;
        assert!(mean.abs() < 1e-10);
    }

    #[test]
    fn test_transform_before_fit() {
        let scaler = StandardScaler::new();
        let x = array![[1.0]];
        assert!(matches!(
            scaler.transform(&x).unwrap_err(),
            DomusError::NotFitted
        ));
    }
}
