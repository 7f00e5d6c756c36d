//! Application state shared across handlers

use crate::artifact::PricePipeline;

/// The loaded pipeline, injected at startup.
///
/// Read-only for the process's lifetime; a reload requires a restart.
pub struct AppState {
    pub pipeline: PricePipeline,
}

impl AppState {
    pub fn new(pipeline: PricePipeline) -> Self {
        Self { pipeline }
    }
}
