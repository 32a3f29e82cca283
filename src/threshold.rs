//! Confidence score thresholding utilities.

use crate::error::{Result, VocEvalError};
use crate::types::Prediction;

/// Indices of predictions whose score is strictly above `threshold`.
///
/// # Errors
///
/// Returns an error if the threshold is not in the valid range [0.0, 1.0].
///
/// # Example
///
/// ```
/// use voc_eval::threshold::confident_indices;
/// use voc_eval::types::{BoundingBox, Prediction};
///
/// let bbox = BoundingBox::new(0.0, 0.0, 10.0, 10.0).unwrap();
/// let predictions = vec![
///     Prediction::new(bbox, 0.9, 0).unwrap(),
///     Prediction::new(bbox, 0.3, 0).unwrap(),
///     Prediction::new(bbox, 0.8, 0).unwrap(),
/// ];
///
/// assert_eq!(confident_indices(&predictions, 0.8).unwrap(), vec![0]);
/// ```
pub fn confident_indices(predictions: &[Prediction], threshold: f64) -> Result<Vec<usize>> {
    validate_threshold(threshold)?;

    Ok(predictions
        .iter()
        .enumerate()
        .filter(|(_, p)| p.score > threshold)
        .map(|(idx, _)| idx)
        .collect())
}

/// Predictions whose score is strictly above `threshold`, in input order.
pub fn filter_by_confidence(predictions: &[Prediction], threshold: f64) -> Result<Vec<Prediction>> {
    Ok(confident_indices(predictions, threshold)?
        .into_iter()
        .map(|idx| predictions[idx].clone())
        .collect())
}

/// Generate a range of threshold values for evaluation.
///
/// # Arguments
///
/// * `start` - Starting threshold value (inclusive)
/// * `end` - Ending threshold value (inclusive)
/// * `steps` - Number of threshold values to generate
///
/// # Example
///
/// ```
/// use voc_eval::threshold::generate_threshold_range;
///
/// let thresholds = generate_threshold_range(0.0, 1.0, 11).unwrap();
/// assert_eq!(thresholds.len(), 11);
/// assert_eq!(thresholds[0], 0.0);
/// assert_eq!(thresholds[10], 1.0);
/// ```
pub fn generate_threshold_range(start: f64, end: f64, steps: usize) -> Result<Vec<f64>> {
    if steps == 0 {
        return Err(VocEvalError::InvalidThreshold(
            "Number of steps must be greater than 0".to_string()
        ));
    }

    validate_threshold(start)?;
    validate_threshold(end)?;

    if start > end {
        return Err(VocEvalError::InvalidThreshold(
            format!("Start threshold ({}) must be <= end threshold ({})", start, end)
        ));
    }

    if steps == 1 {
        return Ok(vec![start]);
    }

    let step_size = (end - start) / (steps - 1) as f64;
    Ok((0..steps)
        .map(|i| if i == steps - 1 { end } else { start + step_size * i as f64 })
        .collect())
}

/// Validate that a threshold is in the valid range [0.0, 1.0].
pub fn validate_threshold(threshold: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&threshold) {
        return Err(VocEvalError::InvalidThreshold(
            format!("Threshold must be between 0.0 and 1.0, got {}", threshold)
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BoundingBox;

    fn predictions(scores: &[f64]) -> Vec<Prediction> {
        let bbox = BoundingBox::new(0.0, 0.0, 10.0, 10.0).unwrap();
        scores
            .iter()
            .map(|&s| Prediction::new(bbox, s, 0).unwrap())
            .collect()
    }

    #[test]
    fn test_filter_by_confidence() {
        let filtered = filter_by_confidence(&predictions(&[0.9, 0.3, 0.5]), 0.5).unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].score, 0.9);
    }

    #[test]
    fn test_zero_threshold_drops_zero_scores() {
        let indices = confident_indices(&predictions(&[0.0, 0.1]), 0.0).unwrap();
        assert_eq!(indices, vec![1]);
    }

    #[test]
    fn test_invalid_threshold() {
        assert!(filter_by_confidence(&[], 1.5).is_err());
        assert!(filter_by_confidence(&[], -0.1).is_err());
        assert!(validate_threshold(f64::NAN).is_err());
    }

    #[test]
    fn test_generate_threshold_range() {
        let thresholds = generate_threshold_range(0.0, 1.0, 11).unwrap();
        assert_eq!(thresholds.len(), 11);
        assert!((thresholds[0] - 0.0).abs() < 1e-10);
        assert!((thresholds[10] - 1.0).abs() < 1e-10);
        assert!((thresholds[5] - 0.5).abs() < 1e-10);
    }

    #[test]
    fn test_generate_threshold_range_errors() {
        assert!(generate_threshold_range(0.0, 1.0, 0).is_err());
        assert!(generate_threshold_range(0.8, 0.2, 3).is_err());
        assert_eq!(generate_threshold_range(0.3, 0.9, 1).unwrap(), vec![0.3]);
    }
}
