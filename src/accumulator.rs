//! Reduction of per-image outcomes into a precision/recall curve and AP.

use crate::error::{Result, VocEvalError};
use crate::matching::MatchingScheme;
use crate::metrics::ap::{calculate_ap, ApMethod, ApResult};
use crate::metrics::precision_recall::PrCurve;
use crate::types::{DetectionOutcome, ImageOutcome};

/// Order in which flags enter the cumulative sums.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlagOrdering {
    /// Image order, then flag order within each image.
    #[default]
    ImageOrder,
    /// Descending confidence across the whole dataset (stable). Flags with
    /// no confidence sort last.
    Confidence,
}

impl From<MatchingScheme> for FlagOrdering {
    fn from(scheme: MatchingScheme) -> Self {
        match scheme {
            MatchingScheme::ImageLevel => FlagOrdering::ImageOrder,
            MatchingScheme::PerObject => FlagOrdering::Confidence,
        }
    }
}

/// Folds ordered per-image outcomes into an [`ApResult`].
///
/// Holds no running state: each call is a pure function of its input.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricAccumulator {
    method: ApMethod,
    ordering: FlagOrdering,
}

impl MetricAccumulator {
    pub fn new(method: ApMethod, ordering: FlagOrdering) -> Self {
        Self { method, ordering }
    }

    pub fn method(&self) -> ApMethod {
        self.method
    }

    pub fn ordering(&self) -> FlagOrdering {
        self.ordering
    }

    /// Reduce per-image outcomes. The recall denominator is the sum of the
    /// outcomes' ground-truth counts.
    ///
    /// # Errors
    ///
    /// * `OutcomeCountMismatch` if `outcomes.len() != declared_images`
    /// * `ZeroDenominator` if the outcomes carry no ground truth at all
    ///
    /// # Example
    ///
    /// ```
    /// use voc_eval::accumulator::MetricAccumulator;
    /// use voc_eval::types::{DetectionOutcome, ImageOutcome};
    ///
    /// let hit = DetectionOutcome { is_true_positive: true, confidence: Some(0.9), iou: Some(1.0), matched_ground_truth: Some(0) };
    /// let miss = DetectionOutcome { is_true_positive: false, confidence: Some(0.8), iou: Some(0.0), matched_ground_truth: None };
    /// let outcomes = vec![
    ///     ImageOutcome { image_id: 0, ground_truth_count: 1, detections: vec![hit] },
    ///     ImageOutcome { image_id: 1, ground_truth_count: 1, detections: vec![miss] },
    /// ];
    ///
    /// let result = MetricAccumulator::default().accumulate(&outcomes, 2).unwrap();
    /// assert!((result.average_precision - 0.5).abs() < 1e-12);
    /// ```
    pub fn accumulate(&self, outcomes: &[ImageOutcome], declared_images: usize) -> Result<ApResult> {
        if outcomes.len() != declared_images {
            return Err(VocEvalError::OutcomeCountMismatch {
                declared: declared_images,
                actual: outcomes.len(),
            });
        }

        let total_ground_truths = outcomes.iter().map(|o| o.ground_truth_count).sum();
        let flags = self.ordered_flags(outcomes);
        self.accumulate_flags(&flags, total_ground_truths)
    }

    /// Reduce already-ordered flags against an externally supplied
    /// ground-truth total.
    ///
    /// # Errors
    ///
    /// Returns `ZeroDenominator` when `total_ground_truths` is 0, since
    /// recall is undefined.
    pub fn accumulate_flags(&self, flags: &[bool], total_ground_truths: usize) -> Result<ApResult> {
        if total_ground_truths == 0 {
            return Err(VocEvalError::ZeroDenominator(format!(
                "recall is undefined with 0 ground-truth objects ({} flags)",
                flags.len()
            )));
        }

        let curve = PrCurve::from_flags(flags, total_ground_truths);
        let average_precision = calculate_ap(&curve.recall, &curve.precision, self.method)?;

        Ok(ApResult {
            curve,
            average_precision,
            method: self.method,
        })
    }

    fn ordered_flags(&self, outcomes: &[ImageOutcome]) -> Vec<bool> {
        let mut detections: Vec<&DetectionOutcome> =
            outcomes.iter().flat_map(|o| o.detections.iter()).collect();

        if self.ordering == FlagOrdering::Confidence {
            let key = |d: &DetectionOutcome| d.confidence.unwrap_or(f64::NEG_INFINITY);
            detections.sort_by(|a, b| key(*b).total_cmp(&key(*a)));
        }

        detections.iter().map(|d| d.is_true_positive).collect()
    }
}
