/// Non-Maximum Suppression (`NMS`) implementation
///
/// Greedy suppression of overlapping, lower-scoring boxes within one image.
/// Suppression overlap is measured with the continuous box convention.

use crate::error::{Result, VocEvalError};
use crate::metrics::iou::{calculate_iou_with, BoxConvention};
use crate::types::{BoundingBox, Prediction};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default overlap above which a lower-scoring box is suppressed.
pub const DEFAULT_NMS_THRESHOLD: f64 = 0.5;

/// Default number of top-scoring candidates considered.
pub const DEFAULT_TOP_K: usize = 200;

/// Parameters for a suppression pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NmsConfig {
    /// Boxes whose `IoU` with a kept box exceeds this value are dropped.
    pub overlap_threshold: f64,
    /// Only the `top_k` highest-scoring boxes are candidates; the rest are
    /// dropped outright.
    pub top_k: usize,
}

impl Default for NmsConfig {
    fn default() -> Self {
        Self {
            overlap_threshold: DEFAULT_NMS_THRESHOLD,
            top_k: DEFAULT_TOP_K,
        }
    }
}

/// Output of a suppression pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NmsResult {
    /// Indices into the input, in order of selection (descending score).
    pub keep: Vec<usize>,
    /// Number of kept boxes.
    pub count: usize,
}

impl NmsResult {
    fn from_keep(keep: Vec<usize>) -> Self {
        let count = keep.len();
        Self { keep, count }
    }
}

fn validate_inputs(boxes: &[BoundingBox], scores: &[f64], config: &NmsConfig) -> Result<()> {
    if !(0.0..=1.0).contains(&config.overlap_threshold) {
        return Err(VocEvalError::InvalidThreshold(format!(
            "NMS overlap threshold must be between 0 and 1, got {}",
            config.overlap_threshold
        )));
    }

    if boxes.len() != scores.len() {
        return Err(VocEvalError::LengthMismatch(format!(
            "{} boxes but {} scores",
            boxes.len(),
            scores.len()
        )));
    }

    if let Some(score) = scores.iter().find(|s| !s.is_finite()) {
        return Err(VocEvalError::InvalidScore(format!(
            "NMS scores must be finite, got {score}"
        )));
    }

    Ok(())
}

/// Indices sorted by descending score; ties keep input order.
fn descending_order(scores: &[f64]) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..scores.len()).collect();
    indices.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));
    indices
}

/// Apply Non-Maximum Suppression to one image's boxes.
///
/// Candidates are restricted to the `top_k` highest scores. The highest
/// remaining box is kept and every remaining box whose `IoU` with it exceeds
/// `overlap_threshold` is discarded, until no candidates remain. Class labels
/// play no part; see [`batched_non_maximum_suppression`] for that.
///
/// # Errors
///
/// Returns an error if the threshold is outside [0.0, 1.0], if `boxes` and
/// `scores` differ in length, or if a score is not finite.
///
/// # Examples
///
/// ```
/// # use voc_eval::nms::{non_maximum_suppression, NmsConfig};
/// # use voc_eval::types::BoundingBox;
/// let boxes = vec![
///     BoundingBox::new(10.0, 10.0, 50.0, 50.0).unwrap(),
///     BoundingBox::new(15.0, 15.0, 55.0, 55.0).unwrap(),
///     BoundingBox::new(100.0, 100.0, 150.0, 150.0).unwrap(),
/// ];
/// let scores = vec![0.9, 0.8, 0.95];
///
/// let result = non_maximum_suppression(&boxes, &scores, &NmsConfig::default()).unwrap();
/// assert_eq!(result.keep, vec![2, 0]);
/// assert_eq!(result.count, 2);
/// ```
pub fn non_maximum_suppression(
    boxes: &[BoundingBox],
    scores: &[f64],
    config: &NmsConfig,
) -> Result<NmsResult> {
    validate_inputs(boxes, scores, config)?;

    let mut remaining = descending_order(scores);
    remaining.truncate(config.top_k);

    let mut keep = Vec::new();
    while let Some((&current, rest)) = remaining.split_first() {
        keep.push(current);
        remaining = rest
            .iter()
            .copied()
            .filter(|&other| {
                calculate_iou_with(&boxes[current], &boxes[other], BoxConvention::Continuous)
                    <= config.overlap_threshold
            })
            .collect();
    }

    Ok(NmsResult::from_keep(keep))
}

/// Apply Non-Maximum Suppression separately within each class label.
///
/// Kept indices from all classes are merged by descending score and capped
/// at `top_k`.
pub fn batched_non_maximum_suppression(
    predictions: &[Prediction],
    config: &NmsConfig,
) -> Result<NmsResult> {
    let mut by_class: BTreeMap<u32, Vec<usize>> = BTreeMap::new();
    for (idx, prediction) in predictions.iter().enumerate() {
        by_class.entry(prediction.class_id).or_default().push(idx);
    }

    let mut keep = Vec::new();
    for indices in by_class.values() {
        let boxes: Vec<BoundingBox> = indices.iter().map(|&i| predictions[i].bbox).collect();
        let scores: Vec<f64> = indices.iter().map(|&i| predictions[i].score).collect();

        let class_result = non_maximum_suppression(&boxes, &scores, config)?;
        keep.extend(class_result.keep.into_iter().map(|local| indices[local]));
    }

    keep.sort_by(|&a, &b| {
        predictions[b]
            .score
            .total_cmp(&predictions[a].score)
            .then(a.cmp(&b))
    });
    keep.truncate(config.top_k);

    Ok(NmsResult::from_keep(keep))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bbox(x1: f64, y1: f64, x2: f64, y2: f64) -> BoundingBox {
        BoundingBox::new(x1, y1, x2, y2).unwrap()
    }

    fn prediction(b: BoundingBox, score: f64, class_id: u32) -> Prediction {
        Prediction::new(b, score, class_id).unwrap()
    }

    #[test]
    fn test_nms_empty_input() {
        let result = non_maximum_suppression(&[], &[], &NmsConfig::default()).unwrap();
        assert!(result.keep.is_empty());
        assert_eq!(result.count, 0);
    }

    #[test]
    fn test_nms_single_detection() {
        let boxes = vec![bbox(0.0, 0.0, 10.0, 10.0)];
        let result = non_maximum_suppression(&boxes, &[0.9], &NmsConfig::default()).unwrap();
        assert_eq!(result.keep, vec![0]);
    }

    #[test]
    fn test_nms_identical_boxes() {
        let b = bbox(0.0, 0.0, 10.0, 10.0);
        let boxes = vec![b, b, b];
        let result = non_maximum_suppression(&boxes, &[0.9, 0.5, 0.1], &NmsConfig::default()).unwrap();
        assert_eq!(result.keep, vec![0]);
        assert_eq!(result.count, 1);
    }

    #[test]
    fn test_nms_no_overlap() {
        let boxes = vec![bbox(0.0, 0.0, 10.0, 10.0), bbox(20.0, 20.0, 30.0, 30.0)];
        let result = non_maximum_suppression(&boxes, &[0.8, 0.9], &NmsConfig::default()).unwrap();
        assert_eq!(result.keep, vec![1, 0]);
    }

    #[test]
    fn test_nms_complex_scenario() {
        let boxes = vec![
            bbox(10.0, 10.0, 50.0, 50.0),
            bbox(15.0, 15.0, 55.0, 55.0),
            bbox(100.0, 100.0, 150.0, 150.0),
            bbox(105.0, 105.0, 155.0, 155.0),
        ];
        let scores = vec![0.9, 0.8, 0.95, 0.7];
        let result = non_maximum_suppression(&boxes, &scores, &NmsConfig::default()).unwrap();

        // IoU between 2 and 3: intersection 45x45=2025, union 2500+2500-2025=2975, IoU=0.68
        assert_eq!(result.keep, vec![2, 0]);
    }

    #[test]
    fn test_nms_top_k_cap() {
        // Disjoint boxes: without the cap all would survive
        let boxes: Vec<BoundingBox> = (0..5)
            .map(|i| {
                let offset = i as f64 * 100.0;
                bbox(offset, 0.0, offset + 10.0, 10.0)
            })
            .collect();
        let scores = vec![0.1, 0.5, 0.3, 0.9, 0.7];
        let config = NmsConfig { top_k: 2, ..NmsConfig::default() };

        let result = non_maximum_suppression(&boxes, &scores, &config).unwrap();
        assert_eq!(result.keep, vec![3, 4]);
    }

    #[test]
    fn test_nms_zero_top_k_keeps_nothing() {
        let boxes = vec![bbox(0.0, 0.0, 10.0, 10.0)];
        let config = NmsConfig { top_k: 0, ..NmsConfig::default() };
        let result = non_maximum_suppression(&boxes, &[0.9], &config).unwrap();
        assert_eq!(result.count, 0);
    }

    #[test]
    fn test_nms_threshold_extremes() {
        let boxes = vec![
            bbox(0.0, 0.0, 10.0, 10.0),
            bbox(1.0, 1.0, 11.0, 11.0),
            bbox(2.0, 2.0, 12.0, 12.0),
        ];
        let scores = vec![0.3, 0.9, 0.6];

        let keep_all = NmsConfig { overlap_threshold: 1.0, ..NmsConfig::default() };
        let result = non_maximum_suppression(&boxes, &scores, &keep_all).unwrap();
        assert_eq!(result.keep, vec![1, 2, 0]);

        let keep_one = NmsConfig { overlap_threshold: 0.0, ..NmsConfig::default() };
        let result = non_maximum_suppression(&boxes, &scores, &keep_one).unwrap();
        assert_eq!(result.keep, vec![1]);
    }

    #[test]
    fn test_nms_invalid_inputs() {
        let boxes = vec![bbox(0.0, 0.0, 10.0, 10.0)];

        let config = NmsConfig { overlap_threshold: 1.5, ..NmsConfig::default() };
        assert!(non_maximum_suppression(&boxes, &[0.9], &config).is_err());

        let config = NmsConfig { overlap_threshold: -0.1, ..NmsConfig::default() };
        assert!(non_maximum_suppression(&boxes, &[0.9], &config).is_err());

        let result = non_maximum_suppression(&boxes, &[0.9, 0.8], &NmsConfig::default());
        assert!(matches!(result, Err(VocEvalError::LengthMismatch(_))));

        let result = non_maximum_suppression(&boxes, &[f64::NAN], &NmsConfig::default());
        assert!(matches!(result, Err(VocEvalError::InvalidScore(_))));
    }

    #[test]
    fn test_batched_nms_keeps_overlapping_boxes_of_other_classes() {
        let b = bbox(0.0, 0.0, 10.0, 10.0);
        let predictions = vec![
            prediction(b, 0.9, 0),
            prediction(b, 0.8, 1),
            prediction(b, 0.7, 0),
        ];

        let result = batched_non_maximum_suppression(&predictions, &NmsConfig::default()).unwrap();
        assert_eq!(result.keep, vec![0, 1]);

        let boxes: Vec<BoundingBox> = predictions.iter().map(|p| p.bbox).collect();
        let scores: Vec<f64> = predictions.iter().map(|p| p.score).collect();
        let agnostic = non_maximum_suppression(&boxes, &scores, &NmsConfig::default()).unwrap();
        assert_eq!(agnostic.keep, vec![0]);
    }
}
