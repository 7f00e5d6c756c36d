//! Fixed feature schema for the housing dataset
//!
//! The 13 feature columns and the `MEDV` target are fixed at both training
//! and inference time. This module is the single source of truth for the
//! name→position mapping: inference callers supply values by name and the
//! boundary assembles the canonical order.

use crate::error::{DomusError, Result};

/// One feature column: name, human description, and its advisory value range
/// (observed over the original dataset; used for CLI prompts, not enforced).
#[derive(Debug, Clone, Copy)]
pub struct FeatureSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub min: f64,
    pub max: f64,
}

/// Target column: median home value in thousands of currency.
pub const TARGET: &str = "MEDV";

/// The canonical feature order. Training extracts columns in this order and
/// the packaged artifact reproduces it at inference.
pub const FEATURES: [FeatureSpec; 13] = [
    FeatureSpec {
        name: "CRIM",
        description: "Per capita crime rate by town",
        min: 0.00632,
        max: 88.9762,
    },
    FeatureSpec {
        name: "ZN",
        description: "Proportion of residential land zoned for lots over 25,000 sq.ft.",
        min: 0.0,
        max: 100.0,
    },
    FeatureSpec {
        name: "INDUS",
        description: "Proportion of non-retail business acres per town",
        min: 0.46,
        max: 27.74,
    },
    FeatureSpec {
        name: "CHAS",
        description: "Charles River dummy variable (1 if tract bounds river; 0 otherwise)",
        min: 0.0,
        max: 1.0,
    },
    FeatureSpec {
        name: "NOX",
        description: "Nitric oxides concentration (parts per 10 million)",
        min: 0.385,
        max: 0.871,
    },
    FeatureSpec {
        name: "RM",
        description: "Average number of rooms per dwelling",
        min: 3.561,
        max: 8.78,
    },
    FeatureSpec {
        name: "AGE",
        description: "Proportion of owner-occupied units built prior to 1940",
        min: 2.9,
        max: 100.0,
    },
    FeatureSpec {
        name: "DIS",
        description: "Weighted distances to five employment centers",
        min: 1.1296,
        max: 12.1265,
    },
    FeatureSpec {
        name: "RAD",
        description: "Index of accessibility to radial highways",
        min: 1.0,
        max: 24.0,
    },
    FeatureSpec {
        name: "TAX",
        description: "Full-value property-tax rate per $10,000",
        min: 187.0,
        max: 711.0,
    },
    FeatureSpec {
        name: "PTRATIO",
        description: "Pupil-teacher ratio by town",
        min: 12.6,
        max: 22.0,
    },
    FeatureSpec {
        name: "B",
        description: "1000(Bk - 0.63)^2 where Bk is the proportion of Black residents by town",
        min: 0.32,
        max: 396.9,
    },
    FeatureSpec {
        name: "LSTAT",
        description: "% lower status of the population",
        min: 1.73,
        max: 37.97,
    },
];

/// Feature names in canonical order.
pub fn feature_names() -> Vec<String> {
    FEATURES.iter().map(|f| f.name.to_string()).collect()
}

/// Assemble a canonical-order feature vector from a by-name JSON object.
///
/// Every feature must be present with a finite numeric value; unknown keys
/// are rejected so that a typoed feature name cannot silently drop a value.
pub fn vector_from_json(values: &serde_json::Map<String, serde_json::Value>) -> Result<Vec<f64>> {
    for key in values.keys() {
        if !FEATURES.iter().any(|f| f.name == key.as_str()) {
            return Err(DomusError::SchemaMismatch(format!(
                "unknown feature '{key}'"
            )));
        }
    }

    FEATURES
        .iter()
        .map(|spec| {
            let value = values.get(spec.name).ok_or_else(|| {
                DomusError::SchemaMismatch(format!("missing required feature '{}'", spec.name))
            })?;
            let number = value.as_f64().ok_or_else(|| {
                DomusError::SchemaMismatch(format!(
                    "feature '{}' must be numeric, got {value}",
                    spec.name
                ))
            })?;
            if !number.is_finite() {
                return Err(DomusError::SchemaMismatch(format!(
                    "feature '{}' must be finite",
                    spec.name
                )));
            }
            Ok(number)
        })
        .collect()
}
