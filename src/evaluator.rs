//! Main evaluation orchestrator.
//!
//! Each image runs confidence filter → suppression → matching on its own;
//! images are independent and may run on the rayon pool. The ordered
//! per-image outcomes are then folded by the [`MetricAccumulator`].

use crate::accumulator::MetricAccumulator;
use crate::config::EvalConfig;
use crate::error::Result;
use crate::matching::match_detections;
use crate::metrics::ap::ApResult;
use crate::nms::{batched_non_maximum_suppression, non_maximum_suppression};
use crate::stats::EvalStats;
use crate::threshold::confident_indices;
use crate::types::{BoundingBox, ImageOutcome, ImageRecord, Prediction};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Result of evaluating a single image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageEvaluation {
    pub image_id: u64,
    /// Indices into the image's original prediction list that survived
    /// filtering and suppression, in selection order.
    pub kept_indices: Vec<usize>,
    pub outcome: ImageOutcome,
    pub stats: EvalStats,
}

/// Result of evaluating a dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub images: Vec<ImageEvaluation>,
    pub result: ApResult,
    pub stats: EvalStats,
}

impl EvaluationReport {
    pub fn average_precision(&self) -> f64 {
        self.result.average_precision
    }

    pub fn recall(&self) -> &[f64] {
        self.result.recall()
    }

    pub fn precision(&self) -> &[f64] {
        self.result.precision()
    }
}

/// Indices (into `predictions`) kept by suppression, in selection order.
fn suppress(predictions: &[Prediction], config: &EvalConfig) -> Result<Vec<usize>> {
    if !config.nms_enabled {
        return Ok((0..predictions.len()).collect());
    }

    let nms_config = config.nms_config();
    let result = if config.class_aware_nms {
        batched_non_maximum_suppression(predictions, &nms_config)?
    } else {
        let boxes: Vec<BoundingBox> = predictions.iter().map(|p| p.bbox).collect();
        let scores: Vec<f64> = predictions.iter().map(|p| p.score).collect();
        non_maximum_suppression(&boxes, &scores, &nms_config)?
    };

    Ok(result.keep)
}

/// Evaluate one image: filter by confidence, suppress, then match.
///
/// The record is not modified; filtering and suppression work on copies.
///
/// # Errors
///
/// Returns an error if a prediction score lies outside [0, 1] or the
/// configuration holds an invalid threshold.
pub fn evaluate_image(record: &ImageRecord, config: &EvalConfig) -> Result<ImageEvaluation> {
    record.validate()?;

    let candidates: Vec<usize> = match config.confidence_threshold {
        Some(threshold) => confident_indices(&record.predictions, threshold)?,
        None => (0..record.predictions.len()).collect(),
    };
    let candidate_predictions: Vec<Prediction> = candidates
        .iter()
        .map(|&idx| record.predictions[idx].clone())
        .collect();

    let kept_local = suppress(&candidate_predictions, config)?;
    let kept_indices: Vec<usize> = kept_local.iter().map(|&local| candidates[local]).collect();
    let kept_predictions: Vec<Prediction> = kept_local
        .iter()
        .map(|&local| candidate_predictions[local].clone())
        .collect();

    if kept_predictions.is_empty() {
        warn!(image_id = record.image_id, "no predictions left for image");
    }

    let detections = match_detections(
        &kept_predictions,
        &record.ground_truths,
        config.matching_scheme,
        config.iou_threshold,
        config.box_convention,
    );

    let outcome = ImageOutcome {
        image_id: record.image_id,
        ground_truth_count: record.ground_truths.len(),
        detections,
    };

    let stats = EvalStats {
        images_evaluated: 1,
        images_without_predictions: usize::from(kept_predictions.is_empty()),
        images_without_ground_truth: usize::from(record.ground_truths.is_empty()),
        ground_truths: record.ground_truths.len(),
        predictions_seen: record.predictions.len(),
        predictions_below_confidence: record.predictions.len() - candidates.len(),
        predictions_suppressed: candidates.len() - kept_indices.len(),
        true_positives: outcome.true_positives(),
        false_positives: outcome.false_positives(),
    };

    debug!(
        image_id = record.image_id,
        kept = kept_indices.len(),
        ground_truths = outcome.ground_truth_count,
        true_positives = stats.true_positives,
        false_positives = stats.false_positives,
        "image evaluated"
    );

    Ok(ImageEvaluation {
        image_id: record.image_id,
        kept_indices,
        outcome,
        stats,
    })
}

/// Evaluate detector output over a dataset.
///
/// Produces the per-image results, the precision/recall curve with its AP,
/// and run statistics. Images are accumulated in input order.
///
/// # Errors
///
/// * `InvalidConfig` if the configuration does not validate
/// * `InvalidScore` if a prediction score lies outside [0, 1]
/// * `ZeroDenominator` if the dataset has no ground-truth objects
///
/// # Example
///
/// ```
/// use voc_eval::config::EvalConfig;
/// use voc_eval::evaluator::evaluate;
/// use voc_eval::types::{BoundingBox, GroundTruth, ImageRecord, Prediction};
///
/// # fn main() -> voc_eval::Result<()> {
/// let gt = BoundingBox::new(0.0, 0.0, 10.0, 10.0)?;
/// let miss = BoundingBox::new(50.0, 50.0, 60.0, 60.0)?;
/// let records = vec![
///     ImageRecord::new(1, vec![Prediction::new(gt, 0.9, 0)?], vec![GroundTruth::new(gt, 0)]),
///     ImageRecord::new(2, vec![Prediction::new(miss, 0.8, 0)?], vec![GroundTruth::new(gt, 0)]),
/// ];
///
/// let report = evaluate(&records, &EvalConfig::default())?;
/// assert!((report.average_precision() - 0.5).abs() < 1e-12);
/// # Ok(())
/// # }
/// ```
pub fn evaluate(records: &[ImageRecord], config: &EvalConfig) -> Result<EvaluationReport> {
    config.validate()?;

    let images: Vec<ImageEvaluation> = if config.parallel {
        records
            .par_iter()
            .map(|record| evaluate_image(record, config))
            .collect::<Result<Vec<_>>>()?
    } else {
        records
            .iter()
            .map(|record| evaluate_image(record, config))
            .collect::<Result<Vec<_>>>()?
    };

    let mut stats = EvalStats::new();
    for image in &images {
        stats += &image.stats;
    }

    let outcomes: Vec<ImageOutcome> = images.iter().map(|image| image.outcome.clone()).collect();
    let accumulator = MetricAccumulator::new(config.ap_method, config.matching_scheme.into());
    let result = accumulator.accumulate(&outcomes, records.len())?;

    info!(
        images = stats.images_evaluated,
        ground_truths = stats.ground_truths,
        average_precision = result.average_precision,
        "{}",
        stats.summary()
    );

    Ok(EvaluationReport {
        images,
        result,
        stats,
    })
}

/// Evaluate once per confidence threshold.
///
/// Each run uses `config` with its `confidence_threshold` replaced.
pub fn evaluate_confidence_sweep(
    records: &[ImageRecord],
    config: &EvalConfig,
    confidence_thresholds: &[f64],
) -> Result<Vec<(f64, EvaluationReport)>> {
    confidence_thresholds
        .iter()
        .map(|&threshold| {
            let swept = config.clone().with_confidence_threshold(threshold);
            evaluate(records, &swept).map(|report| (threshold, report))
        })
        .collect()
}
