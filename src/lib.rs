//! domus - housing price regression pipeline
//!
//! Trains a random-forest regressor on the fixed 13-feature housing schema,
//! packages the fitted preprocessing and model into a single artifact, and
//! serves predictions over HTTP.
//!
//! # Modules
//!
//! ## Offline pipeline
//! - [`data`] - CSV loading and stratified train/test splitting
//! - [`preprocessing`] - Median imputation + standardization transform
//! - [`training`] - Regression forest, k-fold CV, grid search
//! - [`evaluation`] - Held-out and cross-validated RMSE
//! - [`pipeline`] - End-to-end batch orchestration
//!
//! ## Artifact & serving
//! - [`artifact`] - The packaged transform+model unit and its persistence
//! - [`server`] - HTTP prediction endpoint
//! - [`cli`] - Command-line interface
//!
//! ## Shared
//! - [`schema`] - The fixed feature schema and by-name validation
//! - [`error`] - Crate error taxonomy

pub mod error;
pub mod schema;

pub mod data;
pub mod preprocessing;
pub mod training;
pub mod evaluation;
pub mod pipeline;

pub mod artifact;
pub mod server;
pub mod cli;

pub use error::{DomusError, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::error::{DomusError, Result};

    pub use crate::data::StratifiedShuffleSplit;
    pub use crate::preprocessing::Preprocessor;
    pub use crate::training::{
        CvScores, ForestParams, GridSearch, KFold, ParamGrid, RandomForestRegressor,
        RegressionMetrics, SearchOutcome,
    };
    pub use crate::evaluation::{cv_rmse, holdout_rmse};
    pub use crate::pipeline::{train_and_package, TrainOptions, TrainingReport};
    pub use crate::artifact::PricePipeline;
    pub use crate::server::{create_router, AppState, ServerConfig};
}
