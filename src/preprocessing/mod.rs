//! Preprocessing transform
//!
//! A fit-once/apply-many transform over the feature matrix: median imputation
//! of missing values followed by standardization, using statistics learned
//! only from the training split. Column order is an input contract — the
//! transform never reorders columns.

mod imputer;
mod pipeline;
mod scaler;

pub use imputer::MedianImputer;
pub use pipeline::Preprocessor;
pub use scaler::StandardScaler;
