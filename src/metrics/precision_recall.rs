//! Precision and Recall calculation.

use serde::{Deserialize, Serialize};

/// Cumulative precision/recall curve over an ordered sequence of
/// true/false positive flags.
///
/// All four sequences have one entry per flag. Cumulative counts and recall
/// are non-decreasing along the sequence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrCurve {
    pub cumulative_tp: Vec<usize>,
    pub cumulative_fp: Vec<usize>,
    pub recall: Vec<f64>,
    pub precision: Vec<f64>,
}

impl PrCurve {
    /// Build the curve from ordered flags (`true` = true positive).
    ///
    /// Recall is `cumulative_tp / total_ground_truths`; when
    /// `total_ground_truths` is 0 recall is undefined and every entry is NaN.
    /// Precision is `cumulative_tp / max(cumulative_tp + cumulative_fp, eps)`.
    ///
    /// # Example
    ///
    /// ```
    /// use voc_eval::metrics::precision_recall::PrCurve;
    ///
    /// let curve = PrCurve::from_flags(&[true, false], 2);
    /// assert_eq!(curve.cumulative_tp, vec![1, 1]);
    /// assert_eq!(curve.cumulative_fp, vec![0, 1]);
    /// assert_eq!(curve.recall, vec![0.5, 0.5]);
    /// assert_eq!(curve.precision, vec![1.0, 0.5]);
    /// ```
    pub fn from_flags(flags: &[bool], total_ground_truths: usize) -> Self {
        let (cumulative_tp, cumulative_fp) = cumulative_counts(flags);

        let recall = cumulative_tp
            .iter()
            .map(|&tp| {
                if total_ground_truths == 0 {
                    f64::NAN
                } else {
                    tp as f64 / total_ground_truths as f64
                }
            })
            .collect();

        let precision = cumulative_tp
            .iter()
            .zip(&cumulative_fp)
            .map(|(&tp, &fp)| tp as f64 / ((tp + fp) as f64).max(f64::EPSILON))
            .collect();

        Self {
            cumulative_tp,
            cumulative_fp,
            recall,
            precision,
        }
    }

    pub fn len(&self) -> usize {
        self.recall.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recall.is_empty()
    }
}

/// Running totals of true and false positives over ordered flags.
pub fn cumulative_counts(flags: &[bool]) -> (Vec<usize>, Vec<usize>) {
    let mut tp = 0;
    let mut fp = 0;
    flags
        .iter()
        .map(|&is_tp| {
            if is_tp {
                tp += 1;
            } else {
                fp += 1;
            }
            (tp, fp)
        })
        .unzip()
}

/// Interpolate precision at fixed recall levels.
///
/// For each level the result is the maximum precision over all points with
/// recall at or above that level, or 0.0 if no point reaches it.
pub fn interpolate_precision(precision: &[f64], recall: &[f64], recall_levels: &[f64]) -> Vec<f64> {
    recall_levels
        .iter()
        .map(|&recall_level| {
            precision
                .iter()
                .zip(recall.iter())
                .filter(|(_, &r)| r >= recall_level)
                .map(|(&p, _)| p)
                .fold(0.0f64, f64::max)
        })
        .collect()
}
