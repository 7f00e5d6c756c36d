//! Stratified train/test splitting

use crate::error::{DomusError, Result};
use polars::prelude::*;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeMap;

/// Seeded stratified shuffle split.
///
/// Partitions rows into disjoint train/test sets so that the distribution of
/// a low-cardinality key column is approximately preserved in both. The same
/// seed and inputs always produce the same split.
#[derive(Debug, Clone)]
pub struct StratifiedShuffleSplit {
    test_fraction: f64,
    seed: u64,
}

impl StratifiedShuffleSplit {
    pub fn new(test_fraction: f64, seed: u64) -> Result<Self> {
        if !(test_fraction > 0.0 && test_fraction < 1.0) {
            return Err(DomusError::InvalidParameter {
                name: "test_fraction".to_string(),
                value: test_fraction.to_string(),
                reason: "must be strictly between 0 and 1".to_string(),
            });
        }
        Ok(Self {
            test_fraction,
            seed,
        })
    }

    /// Split on the given stratification-key column.
    ///
    /// Fails with `Stratification` when any key group has fewer than 2
    /// members, since such a group cannot appear on both sides.
    pub fn split(&self, df: &DataFrame, key: &str) -> Result<(DataFrame, DataFrame)> {
        let series = df
            .column(key)
            .map_err(|_| DomusError::Stratification(format!("key column '{key}' not found")))?;
        let key_f64 = series
            .cast(&DataType::Float64)
            .map_err(|e| DomusError::Stratification(e.to_string()))?;
        let ca = key_f64
            .f64()
            .map_err(|e| DomusError::Stratification(e.to_string()))?;

        // Group row indices by key value. BTreeMap keeps group iteration
        // order stable, which the seeded shuffle relies on.
        let mut groups: BTreeMap<i64, Vec<usize>> = BTreeMap::new();
        for (idx, value) in ca.into_iter().enumerate() {
            let value = value.ok_or_else(|| {
                DomusError::Stratification(format!("key column '{key}' contains missing values"))
            })?;
            groups.entry(value.round() as i64).or_default().push(idx);
        }

        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let mut train_indices: Vec<usize> = Vec::new();
        let mut test_indices: Vec<usize> = Vec::new();

        for (value, indices) in &groups {
            if indices.len() < 2 {
                return Err(DomusError::Stratification(format!(
                    "key group {value} has {} member(s), need at least 2",
                    indices.len()
                )));
            }

            let mut shuffled = indices.clone();
            shuffled.shuffle(&mut rng);

            // At least one row on each side of the split per group.
            let n_test = ((indices.len() as f64) * self.test_fraction).round() as usize;
            let n_test = n_test.clamp(1, indices.len() - 1);

            test_indices.extend_from_slice(&shuffled[..n_test]);
            train_indices.extend_from_slice(&shuffled[n_test..]);
        }

        // Restore original row order within each side.
        train_indices.sort_unstable();
        test_indices.sort_unstable();

        let train = take_rows(df, &train_indices)?;
        let test = take_rows(df, &test_indices)?;
        Ok((train, test))
    }
}

fn take_rows(df: &DataFrame, indices: &[usize]) -> Result<DataFrame> {
    let idx: IdxCa = IdxCa::from_vec(
        "idx".into(),
        indices.iter().map(|&i| i as IdxSize).collect(),
    );
    df.take(&idx)
        .map_err(|e| DomusError::DataUnavailable(e.to_string()))
}
