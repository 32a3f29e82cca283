//! Detection matching utilities for evaluating predictions against ground truth.

use crate::metrics::iou::{calculate_iou_matrix, BoxConvention};
use crate::types::{BoundingBox, DetectionOutcome, GroundTruth, ImageOutcome, ImageRecord, Prediction};
use serde::{Deserialize, Serialize};

/// How predictions are credited against ground truth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchingScheme {
    /// One flag per image: true positive when the best `IoU` over every
    /// prediction/ground-truth pair exceeds the threshold. An image with no
    /// predictions is a false positive.
    ///
    /// This is coarse: several ground-truth objects in one image earn a
    /// single credit, and one ground truth can satisfy many predictions.
    #[default]
    ImageLevel,
    /// One flag per prediction: greedy assignment to the highest-`IoU`
    /// unclaimed ground truth, predictions visited by descending confidence.
    PerObject,
}

/// Prediction indices sorted by descending confidence; ties keep input order.
fn confidence_order(predictions: &[Prediction]) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..predictions.len()).collect();
    indices.sort_by(|&a, &b| predictions[b].score.total_cmp(&predictions[a].score));
    indices
}

fn iou_table(
    predictions: &[Prediction],
    order: &[usize],
    ground_truths: &[GroundTruth],
    convention: BoxConvention,
) -> Vec<Vec<f64>> {
    let pred_boxes: Vec<BoundingBox> = order.iter().map(|&i| predictions[i].bbox).collect();
    let gt_boxes: Vec<BoundingBox> = ground_truths.iter().map(|gt| gt.bbox).collect();
    calculate_iou_matrix(&pred_boxes, &gt_boxes, convention)
}

/// Image-level match: a single flag for the whole image.
///
/// # Example
///
/// ```
/// use voc_eval::matching::match_image_level;
/// use voc_eval::metrics::iou::BoxConvention;
/// use voc_eval::types::{BoundingBox, GroundTruth, Prediction};
///
/// let gt = vec![GroundTruth::new(BoundingBox::new(0.0, 0.0, 10.0, 10.0).unwrap(), 0)];
/// let preds = vec![Prediction::new(BoundingBox::new(0.0, 0.0, 10.0, 10.0).unwrap(), 0.9, 0).unwrap()];
///
/// let outcome = match_image_level(&preds, &gt, 0.5, BoxConvention::PixelInclusive);
/// assert!(outcome.is_true_positive);
/// ```
pub fn match_image_level(
    predictions: &[Prediction],
    ground_truths: &[GroundTruth],
    iou_threshold: f64,
    convention: BoxConvention,
) -> DetectionOutcome {
    if predictions.is_empty() {
        return DetectionOutcome::missing_predictions();
    }

    let order = confidence_order(predictions);
    let table = iou_table(predictions, &order, ground_truths, convention);

    // First maximum in (confidence, ground truth) order wins ties
    let mut best: Option<(usize, usize, f64)> = None;
    for (rank, row) in table.iter().enumerate() {
        for (gt_idx, &iou) in row.iter().enumerate() {
            if best.map_or(true, |(_, _, best_iou)| iou > best_iou) {
                best = Some((rank, gt_idx, iou));
            }
        }
    }

    match best {
        Some((rank, gt_idx, iou)) => {
            let is_true_positive = iou > iou_threshold;
            DetectionOutcome {
                is_true_positive,
                confidence: Some(predictions[order[rank]].score),
                iou: Some(iou),
                matched_ground_truth: is_true_positive.then_some(gt_idx),
            }
        }
        // Predictions but no ground truth: nothing can overlap
        None => DetectionOutcome {
            is_true_positive: false,
            confidence: Some(predictions[order[0]].score),
            iou: None,
            matched_ground_truth: None,
        },
    }
}

/// Per-object greedy match: one flag per prediction, in descending
/// confidence order.
///
/// Each prediction claims the unclaimed ground truth with the highest `IoU`
/// if that `IoU` exceeds the threshold; otherwise it is a false positive.
pub fn match_per_object(
    predictions: &[Prediction],
    ground_truths: &[GroundTruth],
    iou_threshold: f64,
    convention: BoxConvention,
) -> Vec<DetectionOutcome> {
    let order = confidence_order(predictions);
    let table = iou_table(predictions, &order, ground_truths, convention);
    let mut claimed = vec![false; ground_truths.len()];

    order
        .iter()
        .zip(&table)
        .map(|(&pred_idx, row)| {
            let best = row
                .iter()
                .enumerate()
                .filter(|&(gt_idx, _)| !claimed[gt_idx])
                .fold(None, |best: Option<(usize, f64)>, (gt_idx, &iou)| match best {
                    Some((_, best_iou)) if best_iou >= iou => best,
                    _ => Some((gt_idx, iou)),
                });

            let matched = best.filter(|&(_, iou)| iou > iou_threshold).map(|(gt_idx, _)| gt_idx);
            if let Some(gt_idx) = matched {
                claimed[gt_idx] = true;
            }

            DetectionOutcome {
                is_true_positive: matched.is_some(),
                confidence: Some(predictions[pred_idx].score),
                iou: best.map(|(_, iou)| iou),
                matched_ground_truth: matched,
            }
        })
        .collect()
}

/// Match one image's predictions against its ground truth under the given
/// scheme.
pub fn match_detections(
    predictions: &[Prediction],
    ground_truths: &[GroundTruth],
    scheme: MatchingScheme,
    iou_threshold: f64,
    convention: BoxConvention,
) -> Vec<DetectionOutcome> {
    match scheme {
        MatchingScheme::ImageLevel => vec![match_image_level(
            predictions,
            ground_truths,
            iou_threshold,
            convention,
        )],
        MatchingScheme::PerObject => {
            match_per_object(predictions, ground_truths, iou_threshold, convention)
        }
    }
}

/// Match a whole [`ImageRecord`] under the given scheme.
pub fn match_image(
    record: &ImageRecord,
    scheme: MatchingScheme,
    iou_threshold: f64,
    convention: BoxConvention,
) -> ImageOutcome {
    ImageOutcome {
        image_id: record.image_id,
        ground_truth_count: record.ground_truths.len(),
        detections: match_detections(
            &record.predictions,
            &record.ground_truths,
            scheme,
            iou_threshold,
            convention,
        ),
    }
}
