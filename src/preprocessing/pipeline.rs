//! Composed imputation + scaling transform

use crate::error::{DomusError, Result};
use super::{MedianImputer, StandardScaler};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// The fitted preprocessing transform: median imputation followed by
/// standardization.
///
/// Scaler statistics are computed on the imputed training matrix, matching
/// the fit order of the original pipeline. Fit state is immutable once
/// computed; `transform` never mutates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preprocessor {
    imputer: MedianImputer,
    scaler: StandardScaler,
    n_features: usize,
    is_fitted: bool,
}

impl Preprocessor {
    pub fn new() -> Self {
        Self {
            imputer: MedianImputer::new(),
            scaler: StandardScaler::new(),
            n_features: 0,
            is_fitted: false,
        }
    }

    /// Fit both stages on the training matrix.
    pub fn fit(&mut self, x: &Array2<f64>) -> Result<&mut Self> {
        self.imputer.fit(x)?;
        let imputed = self.imputer.transform(x)?;
        self.scaler.fit(&imputed)?;
        self.n_features = x.ncols();
        self.is_fitted = true;
        Ok(self)
    }

    /// Apply imputation then scaling. Input must have the same column order
    /// the transform was fit on; this is the caller's contract.
    pub fn transform(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        if !self.is_fitted {
            return Err(DomusError::NotFitted);
        }
        if x.ncols() != self.n_features {
            return Err(DomusError::Shape {
                expected: format!("{} columns", self.n_features),
                actual: format!("{} columns", x.ncols()),
            });
        }
        let imputed = self.imputer.transform(x)?;
        self.scaler.transform(&imputed)
    }

    /// Fit and transform in one step.
    pub fn fit_transform(&mut self, x: &Array2<f64>) -> Result<Array2<f64>> {
        self.fit(x)?;
        self.transform(x)
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn is_fitted(&self) -> bool {
        self.is_fitted
    }

    /// Fitted per-column medians, for diagnostics.
    pub fn medians(&self) -> &[f64] {
        self.imputer.medians()
    }
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_fit_transform_fills_and_scales() {
        let x = array![
            [1.0, 10.0],
            [2.0, f64::NAN],
            [3.0, 30.0],
            [4.0, 40.0],
            [5.0, 20.0]
        ];
        let mut prep = Preprocessor::new();
        let out = prep.fit_transform(&x).unwrap();

        assert!(out.iter().all(|v| v.is_finite()));
        let mean: f64 = out.column(0).sum() / 5.0;
        assert!(mean.abs() < 1e-10);
    }

    #[test]
    fn test_transform_before_fit() {
        let prep = Preprocessor::new();
        let x = array![[1.0]];
        assert!(matches!(
            prep.transform(&x).unwrap_err(),
            DomusError::NotFitted
        ));
    }

    #[test]
    fn test_repeated_transform_identical() {
        let x = array![[1.0, 2.0], [3.0, 4.0], [5.0, f64::NAN]];
        let mut prep = Preprocessor::new();
        prep.fit(&x).unwrap();

        let a = prep.transform(&x).unwrap();
        let b = prep.transform(&x).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_column_count_contract() {
        let x = array![[1.0, 2.0], [3.0, 4.0]];
        let mut prep = Preprocessor::new();
        prep.fit(&x).unwrap();

        let wide = array![[1.0, 2.0, 3.0]];
        assert!(matches!(
            prep.transform(&wide).unwrap_err(),
            DomusError::Shape { .. }
        ));
    }
}
