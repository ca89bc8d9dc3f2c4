//! Input checks run before any training or scoring.

use crate::error::{GaalError, Result};
use crate::primitives::Matrix;

/// Reject matrices with no rows, no columns, or non-finite entries.
///
/// # Errors
///
/// [`GaalError::EmptyInput`] or [`GaalError::NonFiniteInput`].
pub fn check_array(x: &Matrix<f32>) -> Result<()> {
    if x.n_rows() == 0 {
        return Err(GaalError::empty_input("input has no samples"));
    }
    if x.n_cols() == 0 {
        return Err(GaalError::empty_input("input has no features"));
    }
    if let Some((row, col)) = x.first_non_finite() {
        return Err(GaalError::NonFiniteInput { row, col });
    }
    Ok(())
}

/// [`check_array`] plus a column count check against a fitted model.
///
/// # Errors
///
/// Everything [`check_array`] returns, or [`GaalError::DimensionMismatch`].
pub fn check_features(x: &Matrix<f32>, n_features: usize) -> Result<()> {
    check_array(x)?;
    if x.n_cols() != n_features {
        return Err(GaalError::dimension_mismatch(
            "n_features",
            n_features,
            x.n_cols(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_matrix_passes() {
        let x = Matrix::from_vec(2, 2, vec![1.0, 2.0, 3.0, 4.0]).expect("2x2");
        assert!(check_array(&x).is_ok());
        assert!(check_features(&x, 2).is_ok());
    }

    #[test]
    fn test_empty_rejected() {
        let no_rows = Matrix::<f32>::zeros(0, 3);
        let no_cols = Matrix::<f32>::zeros(3, 0);
        assert!(matches!(check_array(&no_rows), Err(GaalError::EmptyInput { .. })));
        assert!(matches!(check_array(&no_cols), Err(GaalError::EmptyInput { .. })));
    }

    #[test]
    fn test_non_finite_location_reported() {
        let x = Matrix::from_vec(2, 2, vec![1.0, 2.0, f32::INFINITY, 4.0]).expect("2x2");
        assert_eq!(
            check_array(&x),
            Err(GaalError::NonFiniteInput { row: 1, col: 0 })
        );
    }

    #[test]
    fn test_feature_mismatch() {
        let x = Matrix::from_vec(1, 3, vec![1.0, 2.0, 3.0]).expect("1x3");
        let err = check_features(&x, 2).unwrap_err();
        assert!(matches!(err, GaalError::DimensionMismatch { .. }));
        assert!(err.to_string().contains("n_features=2"));
    }
}
