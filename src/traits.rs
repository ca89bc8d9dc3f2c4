//! Core traits for outlier detectors.

use crate::error::Result;
use crate::primitives::{Matrix, Vector};

/// Unsupervised outlier detector with sklearn-style fit/predict.
///
/// Labels are `1` for outliers and `0` for inliers.
///
/// # Examples
///
/// ```
/// use gaal::prelude::*;
///
/// let x = Matrix::from_vec(4, 1, vec![0.0, 0.1, 0.2, 9.0]).expect("4x1");
/// let mut detector = SoGaal::new().with_stop_epochs(1).with_random_state(0);
/// detector.fit(&x).expect("fit succeeds");
///
/// let scores = detector.decision_function(&x).expect("fitted");
/// assert_eq!(scores.len(), 4);
/// ```
pub trait OutlierDetector {
    /// Fits the detector to unlabeled data.
    ///
    /// # Errors
    ///
    /// Returns an error for invalid hyperparameters or input (empty,
    /// non-finite).
    fn fit(&mut self, x: &Matrix<f32>) -> Result<()>;

    /// Raw anomaly score of every row of `x`.
    ///
    /// # Errors
    ///
    /// Returns an error if the detector is not fitted or `x` does not
    /// match the training dimensionality.
    fn decision_function(&self, x: &Matrix<f32>) -> Result<Vector<f32>>;

    /// Binary outlier labels for every row of `x`.
    ///
    /// # Errors
    ///
    /// Same as [`decision_function`](Self::decision_function).
    fn predict(&self, x: &Matrix<f32>) -> Result<Vec<i32>>;

    /// Fit on `x`, then label it.
    ///
    /// # Errors
    ///
    /// Same as [`fit`](Self::fit).
    fn fit_predict(&mut self, x: &Matrix<f32>) -> Result<Vec<i32>> {
        self.fit(x)?;
        self.predict(x)
    }
}
