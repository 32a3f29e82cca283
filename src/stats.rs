/// Statistics tracking for an evaluation run
///
/// Counts what happened to predictions on their way from the detector to
/// the accumulator.

use serde::{Deserialize, Serialize};
use std::ops::AddAssign;

/// Statistics collected while evaluating images
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvalStats {
    /// Number of images evaluated
    pub images_evaluated: usize,

    /// Images left with no predictions after filtering and suppression
    pub images_without_predictions: usize,

    /// Images with no ground-truth objects
    pub images_without_ground_truth: usize,

    /// Total ground-truth objects seen
    pub ground_truths: usize,

    /// Predictions received from the detector
    pub predictions_seen: usize,

    /// Predictions dropped by the confidence threshold
    pub predictions_below_confidence: usize,

    /// Predictions dropped by non-maximum suppression
    pub predictions_suppressed: usize,

    /// True positive flags produced by the matcher
    pub true_positives: usize,

    /// False positive flags produced by the matcher
    pub false_positives: usize,
}

impl EvalStats {
    /// Create a new `EvalStats` with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Predictions that reached the matcher
    pub fn predictions_matched(&self) -> usize {
        self.predictions_seen - self.predictions_below_confidence - self.predictions_suppressed
    }

    /// Fraction of received predictions removed before matching
    pub fn removal_rate(&self) -> f64 {
        if self.predictions_seen == 0 {
            0.0
        } else {
            (self.predictions_below_confidence + self.predictions_suppressed) as f64
                / self.predictions_seen as f64
        }
    }

    /// Get a summary string of the statistics
    pub fn summary(&self) -> String {
        format!(
            "Evaluated {} images ({} without predictions, {} without ground truth), \
             {} ground truths, {} predictions seen, {} below confidence, {} suppressed, \
             {} TP / {} FP",
            self.images_evaluated,
            self.images_without_predictions,
            self.images_without_ground_truth,
            self.ground_truths,
            self.predictions_seen,
            self.predictions_below_confidence,
            self.predictions_suppressed,
            self.true_positives,
            self.false_positives,
        )
    }
}

impl AddAssign<&EvalStats> for EvalStats {
    fn add_assign(&mut self, other: &EvalStats) {
        self.images_evaluated += other.images_evaluated;
        self.images_without_predictions += other.images_without_predictions;
        self.images_without_ground_truth += other.images_without_ground_truth;
        self.ground_truths += other.ground_truths;
        self.predictions_seen += other.predictions_seen;
        self.predictions_below_confidence += other.predictions_below_confidence;
        self.predictions_suppressed += other.predictions_suppressed;
        self.true_positives += other.true_positives;
        self.false_positives += other.false_positives;
    }
}
