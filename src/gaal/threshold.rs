//! Turning raw scores into a cutoff and binary labels.

use serde::{Deserialize, Serialize};

use crate::primitives::Vector;

/// Derives a decision threshold and training labels from scores.
///
/// Label `1` marks an outlier, `0` an inlier.
pub trait ThresholdPolicy {
    /// Returns `(threshold, labels)` for `scores` under the expected
    /// outlier fraction `contamination`.
    fn set_threshold_and_labels(&self, scores: &Vector<f32>, contamination: f32) -> (f32, Vec<i32>);
}

/// Threshold at the `1 − contamination` quantile of the scores.
///
/// Samples scoring strictly above the threshold are outliers. Any NaN
/// score makes the threshold NaN, which labels every sample an inlier.
///
/// # Examples
///
/// ```
/// use gaal::gaal::{ContaminationThreshold, ThresholdPolicy};
/// use gaal::primitives::Vector;
///
/// let scores = Vector::from_slice(&[0.1, 0.2, 0.3, 0.4, 0.9]);
/// let (threshold, labels) = ContaminationThreshold.set_threshold_and_labels(&scores, 0.2);
/// assert!((threshold - 0.5).abs() < 1e-6);
/// assert_eq!(labels, vec![0, 0, 0, 0, 1]);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContaminationThreshold;

impl ThresholdPolicy for ContaminationThreshold {
    fn set_threshold_and_labels(&self, scores: &Vector<f32>, contamination: f32) -> (f32, Vec<i32>) {
        let threshold = percentile(scores.as_slice(), 100.0 * (1.0 - contamination));
        (threshold, label_above(scores.as_slice(), threshold))
    }
}

/// `1` where `score > threshold`, else `0`.
#[must_use]
pub fn label_above(scores: &[f32], threshold: f32) -> Vec<i32> {
    scores.iter().map(|&s| i32::from(s > threshold)).collect()
}

/// The `q`-th percentile (`q` in `[0, 100]`) with linear interpolation
/// between closest ranks.
///
/// Returns NaN for an empty slice or when any value is NaN.
#[must_use]
pub fn percentile(values: &[f32], q: f32) -> f32 {
    if values.is_empty() || values.iter().any(|v| v.is_nan()) {
        return f32::NAN;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f32::total_cmp);

    let rank = f64::from(q.clamp(0.0, 100.0)) / 100.0 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = (lo + 1).min(sorted.len() - 1);
    let frac = (rank - lo as f64) as f32;

    if frac == 0.0 || lo == hi {
        sorted[lo]
    } else {
        (sorted[lo] + frac * (sorted[hi] - sorted[lo])).clamp(sorted[lo], sorted[hi])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentile_interpolates() {
        let v = [4.0, 1.0, 3.0, 2.0];
        assert_eq!(percentile(&v, 0.0), 1.0);
        assert_eq!(percentile(&v, 100.0), 4.0);
        assert!((percentile(&v, 50.0) - 2.5).abs() < 1e-6);
        assert!((percentile(&v, 90.0) - 3.7).abs() < 1e-5);
    }

    #[test]
    fn test_percentile_single_value() {
        assert_eq!(percentile(&[0.42], 90.0), 0.42);
    }

    #[test]
    fn test_percentile_nan_propagates() {
        assert!(percentile(&[0.1, f32::NAN, 0.3], 50.0).is_nan());
        assert!(percentile(&[], 50.0).is_nan());
    }

    #[test]
    fn test_labels_strictly_above() {
        let scores = Vector::from_slice(&[0.5, 0.5, 0.5, 0.5]);
        let (threshold, labels) = ContaminationThreshold.set_threshold_and_labels(&scores, 0.1);
        assert_eq!(threshold, 0.5);
        assert_eq!(labels, vec![0, 0, 0, 0]);
    }

    #[test]
    fn test_contamination_fraction_roughly_respected() {
        let scores: Vec<f32> = (0..100).map(|i| i as f32).collect();
        let (_, labels) =
            ContaminationThreshold.set_threshold_and_labels(&Vector::from_vec(scores), 0.1);
        assert_eq!(labels.iter().sum::<i32>(), 10);
    }

    #[test]
    fn test_nan_scores_label_everything_inlier() {
        let scores = Vector::from_slice(&[0.1, f32::NAN, 0.9]);
        let (threshold, labels) = ContaminationThreshold.set_threshold_and_labels(&scores, 0.1);
        assert!(threshold.is_nan());
        assert_eq!(labels, vec![0, 0, 0]);
    }
}
