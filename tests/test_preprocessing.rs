//! Integration test: preprocessing transform properties

use domus::error::DomusError;
use domus::preprocessing::Preprocessor;
use ndarray::{array, Array2};

fn matrix_with_missing() -> Array2<f64> {
    array![
        [1.0, 100.0, 7.0],
        [2.0, f64::NAN, 7.0],
        [3.0, 300.0, 7.0],
        [4.0, 400.0, 7.0],
        [f64::NAN, 500.0, 7.0],
        [6.0, 600.0, 7.0],
    ]
}

#[test]
fn test_missing_values_replaced_with_training_median() {
    let x = matrix_with_missing();
    let mut prep = Preprocessor::new();
    prep.fit(&x).unwrap();

    // Medians over observed values: col 0 -> 3.0, col 1 -> 400.0
    assert_eq!(prep.medians()[0], 3.0);
    assert_eq!(prep.medians()[1], 400.0);

    let out = prep.transform(&x).unwrap();
    assert!(out.iter().all(|v| !v.is_nan()), "no missing entries may survive");
}

#[test]
fn test_constant_feature_never_produces_nan_or_inf() {
    let x = matrix_with_missing();
    let mut prep = Preprocessor::new();
    let out = prep.fit_transform(&x).unwrap();

    // Column 2 is constant: it must come back at its imputed value
    for i in 0..out.nrows() {
        assert_eq!(out[[i, 2]], 7.0);
        assert!(out[[i, 2]].is_finite());
    }
}

#[test]
fn test_apply_is_deterministic() {
    let x = matrix_with_missing();
    let mut prep = Preprocessor::new();
    prep.fit(&x).unwrap();

    let a = prep.transform(&x).unwrap();
    let b = prep.transform(&x).unwrap();
    let c = prep.transform(&x).unwrap();
    assert_eq!(a, b);
    assert_eq!(b, c);
}

#[test]
fn test_apply_before_fit_fails() {
    let prep = Preprocessor::new();
    let x = array![[1.0, 2.0]];
    assert!(matches!(
        prep.transform(&x).unwrap_err(),
        DomusError::NotFitted
    ));
}

#[test]
fn test_all_missing_column_fails_fit() {
    let x = array![[1.0, f64::NAN], [2.0, f64::NAN], [3.0, f64::NAN]];
    let mut prep = Preprocessor::new();
    let err = prep.fit(&x).unwrap_err();
    assert!(matches!(err, DomusError::EmptyColumn(1)));
}

#[test]
fn test_test_rows_scaled_with_train_statistics() {
    let x_train = array![[0.0], [10.0]];
    let mut prep = Preprocessor::new();
    prep.fit(&x_train).unwrap();

    // A held-out row is scaled with the train mean/std, not its own
    let x_new = array![[5.0]];
    let out = prep.transform(&x_new).unwrap();
    // mean = 5, sample std = sqrt(50): (5 - 5) / std = 0
    assert!(out[[0, 0]].abs() < 1e-12);
}
