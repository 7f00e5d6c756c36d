//! The packaged pipeline artifact
//!
//! One serializable unit combining the fitted preprocessing transform, the
//! fitted forest, and the feature ordering they were fit with. This is the
//! only thing persisted by training and the only thing loaded at serving
//! time; once loaded it is read-only and safe to share across concurrent
//! prediction requests.

use crate::error::{DomusError, Result};
use crate::preprocessing::Preprocessor;
use crate::training::random_forest::RandomForestRegressor;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tracing::info;

/// Bumped whenever the serialized layout of the transform or model changes.
pub const ARTIFACT_FORMAT_VERSION: u32 = 1;

/// Fitted preprocessing + model, invocable end-to-end on a raw feature row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricePipeline {
    format_version: u32,
    created_at: String,
    feature_names: Vec<String>,
    preprocessor: Preprocessor,
    model: RandomForestRegressor,
}

impl PricePipeline {
    /// Package a fitted transform and model. The feature-name order must be
    /// the order both were fit on; it is reproduced verbatim at inference.
    pub fn new(
        preprocessor: Preprocessor,
        model: RandomForestRegressor,
        feature_names: Vec<String>,
    ) -> Result<Self> {
        if !preprocessor.is_fitted() {
            return Err(DomusError::NotFitted);
        }
        if preprocessor.n_features() != feature_names.len() {
            return Err(DomusError::Shape {
                expected: format!("{} feature names", preprocessor.n_features()),
                actual: format!("{} feature names", feature_names.len()),
            });
        }

        Ok(Self {
            format_version: ARTIFACT_FORMAT_VERSION,
            created_at: chrono::Utc::now().to_rfc3339(),
            feature_names,
            preprocessor,
            model,
        })
    }

    /// Predict from a feature vector already in the packaged order.
    pub fn predict(&self, row: &[f64]) -> Result<f64> {
        if row.len() != self.feature_names.len() {
            return Err(DomusError::SchemaMismatch(format!(
                "expected {} features, got {}",
                self.feature_names.len(),
                row.len()
            )));
        }
        let x = Array2::from_shape_vec((1, row.len()), row.to_vec())?;
        let transformed = self.preprocessor.transform(&x)?;
        let predictions = self.model.predict(&transformed)?;
        Ok(predictions[0])
    }

    /// Predict from a by-name row, assembling the packaged feature order.
    pub fn predict_row(&self, values: &HashMap<String, f64>) -> Result<f64> {
        let row: Vec<f64> = self
            .feature_names
            .iter()
            .map(|name| {
                values.get(name).copied().ok_or_else(|| {
                    DomusError::SchemaMismatch(format!("missing required feature '{name}'"))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        self.predict(&row)
    }

    /// Predict a whole raw feature matrix (packaged column order).
    pub fn predict_matrix(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let transformed = self.preprocessor.transform(x)?;
        self.model.predict(&transformed)
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn created_at(&self) -> &str {
        &self.created_at
    }

    pub fn model(&self) -> &RandomForestRegressor {
        &self.model
    }

    /// Serialize to `path`, all-or-nothing.
    ///
    /// The artifact is written to a sibling temp file and renamed into place,
    /// so a failed run never leaves a partial artifact behind.
    pub fn save(&self, path: &Path) -> Result<()> {
        let tmp_path = path.with_extension("tmp");

        let write_result = (|| -> Result<()> {
            let file = fs::File::create(&tmp_path)
                .map_err(|e| DomusError::Serialization(e.to_string()))?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer(&mut writer, self)
                .map_err(|e| DomusError::Serialization(e.to_string()))?;
            writer
                .flush()
                .map_err(|e| DomusError::Serialization(e.to_string()))?;
            Ok(())
        })();

        if let Err(e) = write_result {
            let _ = fs::remove_file(&tmp_path);
            return Err(e);
        }

        fs::rename(&tmp_path, path).map_err(|e| {
            let _ = fs::remove_file(&tmp_path);
            DomusError::Serialization(e.to_string())
        })?;

        info!(path = %path.display(), "pipeline artifact saved");
        Ok(())
    }

    /// Load a previously saved artifact.
    ///
    /// Fails with `Deserialization` when the content is corrupt or was
    /// produced by an incompatible format version.
    pub fn load(path: &Path) -> Result<Self> {
        let file = fs::File::open(path)?;
        let reader = BufReader::new(file);
        let pipeline: Self = serde_json::from_reader(reader)
            .map_err(|e| DomusError::Deserialization(e.to_string()))?;

        if pipeline.format_version != ARTIFACT_FORMAT_VERSION {
            return Err(DomusError::Deserialization(format!(
                "artifact format version {} is incompatible with expected {}",
                pipeline.format_version, ARTIFACT_FORMAT_VERSION
            )));
        }

        info!(
            path = %path.display(),
            created_at = %pipeline.created_at,
            n_features = pipeline.feature_names.len(),
            "pipeline artifact loaded"
        );
        Ok(pipeline)
    }
}
