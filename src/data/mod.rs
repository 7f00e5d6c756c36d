//! Dataset loading and splitting
//!
//! The loader reads the fixed-schema CSV into a Polars `DataFrame`; the
//! splitter produces a seeded stratified train/test partition. Both run once
//! at the start of the offline pipeline and the resulting frames are
//! read-only afterwards.

mod loader;
mod split;

pub use loader::{feature_matrix, load_csv, target_vector};
pub use split::StratifiedShuffleSplit;
