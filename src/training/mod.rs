//! Model training and selection
//!
//! Provides the regression tree and random forest, seeded k-fold
//! cross-validation, and the grid search that picks the served model.

pub mod cross_validation;
pub mod decision_tree;
pub mod grid_search;
pub mod metrics;
pub mod random_forest;

pub use cross_validation::{CvScores, FoldSplit, KFold};
pub use decision_tree::{RegressionTree, TreeNode};
pub use grid_search::{ForestParams, GridSearch, ParamGrid, SearchOutcome};
pub use metrics::RegressionMetrics;
pub use random_forest::RandomForestRegressor;
