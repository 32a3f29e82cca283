//! Average Precision (AP) calculation.

use crate::error::{Result, VocEvalError};
use crate::metrics::precision_recall::{interpolate_precision, PrCurve};
use serde::{Deserialize, Serialize};

/// How the precision/recall curve is reduced to a scalar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApMethod {
    /// Area under the precision envelope, summed wherever recall changes.
    #[default]
    Continuous,
    /// VOC2007 11-point interpolation at recall 0.0, 0.1, ..., 1.0.
    ElevenPoint,
}

/// Curve plus the AP derived from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApResult {
    pub curve: PrCurve,
    pub average_precision: f64,
    pub method: ApMethod,
}

impl ApResult {
    pub fn recall(&self) -> &[f64] {
        &self.curve.recall
    }

    pub fn precision(&self) -> &[f64] {
        &self.curve.precision
    }
}

/// Calculate Average Precision from a precision-recall curve.
///
/// `recall` and `precision` are parallel sequences ordered along the curve.
/// The result is in [0, 1] for any curve with values in [0, 1].
///
/// # Errors
///
/// Returns `LengthMismatch` if the two sequences differ in length.
///
/// # Example
///
/// ```
/// use voc_eval::metrics::ap::{calculate_ap, ApMethod};
///
/// let recall = vec![0.5, 0.5];
/// let precision = vec![1.0, 0.5];
/// let ap = calculate_ap(&recall, &precision, ApMethod::Continuous).unwrap();
/// assert!((ap - 0.5).abs() < 1e-12);
/// ```
pub fn calculate_ap(recall: &[f64], precision: &[f64], method: ApMethod) -> Result<f64> {
    if recall.len() != precision.len() {
        return Err(VocEvalError::LengthMismatch(format!(
            "recall has {} points, precision has {}",
            recall.len(),
            precision.len()
        )));
    }

    Ok(match method {
        ApMethod::Continuous => continuous_ap(recall, precision),
        ApMethod::ElevenPoint => eleven_point_ap(recall, precision),
    })
}

fn continuous_ap(recall: &[f64], precision: &[f64]) -> f64 {
    // Sentinels at both ends
    let mut mrec = Vec::with_capacity(recall.len() + 2);
    mrec.push(0.0);
    mrec.extend_from_slice(recall);
    mrec.push(1.0);

    let mut mpre = Vec::with_capacity(precision.len() + 2);
    mpre.push(0.0);
    mpre.extend_from_slice(precision);
    mpre.push(0.0);

    // Precision envelope, non-increasing from right to left
    for i in (1..mpre.len()).rev() {
        mpre[i - 1] = mpre[i - 1].max(mpre[i]);
    }

    // Sum delta-recall * precision wherever recall changes
    mrec.windows(2)
        .enumerate()
        .filter(|(_, w)| w[1] != w[0])
        .map(|(i, w)| (w[1] - w[0]) * mpre[i + 1])
        .sum()
}

fn eleven_point_ap(recall: &[f64], precision: &[f64]) -> f64 {
    // Levels built as i * 0.1 so they match the classic arange(0, 1.1, 0.1)
    let levels: Vec<f64> = (0..=10).map(|i| i as f64 * 0.1).collect();
    interpolate_precision(precision, recall, &levels)
        .iter()
        .map(|p| p / 11.0)
        .sum()
}
