//! CSV loading and DataFrame → matrix extraction

use crate::error::{DomusError, Result};
use ndarray::{Array1, Array2};
use polars::prelude::*;
use std::path::Path;

/// Load a delimited tabular file with a header row.
///
/// Column order follows the file. Fails with `DataUnavailable` when the path
/// does not exist or the content does not parse as a rectangular table.
pub fn load_csv(path: &Path) -> Result<DataFrame> {
    if !path.exists() {
        return Err(DomusError::DataUnavailable(format!(
            "dataset file not found: {}",
            path.display()
        )));
    }

    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(100))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| DomusError::DataUnavailable(e.to_string()))?
        .finish()
        .map_err(|e| DomusError::DataUnavailable(e.to_string()))
}

/// Extract named columns into a row-major `Array2<f64>`.
///
/// Missing entries surface as `NaN` so the imputer can see them. Uses
/// `from_shape_fn` for cache-friendly construction from column-major data.
pub fn feature_matrix(df: &DataFrame, columns: &[String]) -> Result<Array2<f64>> {
    let n_rows = df.height();
    let n_cols = columns.len();

    let col_data: Vec<Vec<f64>> = columns
        .iter()
        .map(|name| {
            let series = df
                .column(name)
                .map_err(|_| DomusError::DataUnavailable(format!("column '{name}' not found")))?;
            let series_f64 = series
                .cast(&DataType::Float64)
                .map_err(|e| DomusError::DataUnavailable(e.to_string()))?;
            let values: Vec<f64> = series_f64
                .f64()
                .map_err(|e| DomusError::DataUnavailable(e.to_string()))?
                .into_iter()
                .map(|v| v.unwrap_or(f64::NAN))
                .collect();
            Ok(values)
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Array2::from_shape_fn((n_rows, n_cols), |(i, j)| {
        col_data[j][i]
    }))
}

/// Extract the target column as `Array1<f64>`. Missing targets are not
/// imputable, so any null here is an error.
pub fn target_vector(df: &DataFrame, column: &str) -> Result<Array1<f64>> {
    let series = df
        .column(column)
        .map_err(|_| DomusError::DataUnavailable(format!("target column '{column}' not found")))?;
    let series_f64 = series
        .cast(&DataType::Float64)
        .map_err(|e| DomusError::DataUnavailable(e.to_string()))?;

    let values: Vec<f64> = series_f64
        .f64()
        .map_err(|e| DomusError::DataUnavailable(e.to_string()))?
        .into_iter()
        .map(|v| {
            v.ok_or_else(|| {
                DomusError::DataUnavailable(format!("target column '{column}' contains missing values"))
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Array1::from_vec(values))
}
