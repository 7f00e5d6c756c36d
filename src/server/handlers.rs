//! HTTP request handlers

use std::sync::Arc;
use axum::{extract::State, Json};
use serde_json::{json, Value};
use tracing::info;

use crate::error::DomusError;
use crate::schema;

use super::error::{Result, ServerError};
use super::state::AppState;

/// Landing message
pub async fn home() -> &'static str {
    "Housing price prediction API - use the /predict endpoint"
}

/// Liveness check
pub async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "model_created_at": state.pipeline.created_at(),
    }))
}

/// Predict a price from a by-name feature object.
///
/// A malformed or empty body never reaches the pipeline; it is rejected here
/// with a structured 400. Bad requests must not crash the serving process.
pub async fn predict(
    State(state): State<Arc<AppState>>,
    body: Option<Json<serde_json::Map<String, Value>>>,
) -> Result<Json<Value>> {
    let Some(Json(data)) = body else {
        return Err(ServerError::BadRequest("no input data provided".to_string()));
    };
    if data.is_empty() {
        return Err(ServerError::BadRequest("no input data provided".to_string()));
    }

    let row = schema::vector_from_json(&data).map_err(|e| match e {
        DomusError::SchemaMismatch(msg) => ServerError::BadRequest(msg),
        other => ServerError::Internal(other.to_string()),
    })?;

    let prediction = state
        .pipeline
        .predict(&row)
        .map_err(|e| ServerError::Internal(e.to_string()))?;

    // Price in thousands of currency, as the model emits it. Rounded for
    // presentation only; no unit rescale happens anywhere in the stack.
    let rounded = (prediction * 1000.0).round() / 1000.0;
    info!(prediction = rounded, "prediction served");

    Ok(Json(json!({
        "prediction": rounded,
        "status": "success",
    })))
}

/// GET on the predict endpoint explains how to call it.
pub async fn predict_usage() -> Json<Value> {
    let example: serde_json::Map<String, Value> = schema::FEATURES
        .iter()
        .map(|spec| (spec.name.to_string(), json!(spec.min)))
        .collect();

    Json(json!({
        "message": "use POST with a JSON object mapping each feature name to a numeric value",
        "example_request": example,
    }))
}
