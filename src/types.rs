//! Core data types for detection evaluation.

use crate::error::{Result, VocEvalError};
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box in corner format (x1, y1, x2, y2).
///
/// A box always has `x1 < x2` and `y1 < y2` with finite coordinates; the
/// constructor and deserialization both reject anything else. On the wire a
/// box is the plain array `[x1, y1, x2, y2]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[f64; 4]", into = "[f64; 4]")]
pub struct BoundingBox {
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
}

impl BoundingBox {
    /// Create a new bounding box from its corners.
    ///
    /// # Errors
    ///
    /// Returns `InvalidBoundingBox` if a coordinate is not finite or the box
    /// has non-positive width or height.
    ///
    /// # Example
    ///
    /// ```
    /// use voc_eval::types::BoundingBox;
    ///
    /// let bbox = BoundingBox::new(0.0, 0.0, 10.0, 20.0).unwrap();
    /// assert_eq!(bbox.width(), 10.0);
    /// assert!(BoundingBox::new(10.0, 0.0, 10.0, 20.0).is_err());
    /// ```
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Result<Self> {
        if ![x1, y1, x2, y2].iter().all(|v| v.is_finite()) {
            return Err(VocEvalError::InvalidBoundingBox(format!(
                "non-finite coordinates [{x1}, {y1}, {x2}, {y2}]"
            )));
        }
        if x2 <= x1 || y2 <= y1 {
            return Err(VocEvalError::InvalidBoundingBox(format!(
                "expected x1 < x2 and y1 < y2, got [{x1}, {y1}, {x2}, {y2}]"
            )));
        }
        Ok(Self { x1, y1, x2, y2 })
    }

    pub fn x1(&self) -> f64 {
        self.x1
    }

    pub fn y1(&self) -> f64 {
        self.y1
    }

    pub fn x2(&self) -> f64 {
        self.x2
    }

    pub fn y2(&self) -> f64 {
        self.y2
    }

    /// Continuous width (x2 - x1).
    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    /// Continuous height (y2 - y1).
    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }

    /// Corners as `[x1, y1, x2, y2]`.
    pub fn to_array(&self) -> [f64; 4] {
        [self.x1, self.y1, self.x2, self.y2]
    }
}

impl TryFrom<[f64; 4]> for BoundingBox {
    type Error = VocEvalError;

    fn try_from(value: [f64; 4]) -> Result<Self> {
        Self::new(value[0], value[1], value[2], value[3])
    }
}

impl From<BoundingBox> for [f64; 4] {
    fn from(bbox: BoundingBox) -> Self {
        bbox.to_array()
    }
}

/// A detector output: box, confidence and class label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub bbox: BoundingBox,
    /// Confidence in [0, 1].
    pub score: f64,
    pub class_id: u32,
}

impl Prediction {
    /// Create a prediction, checking that the score lies in [0, 1].
    pub fn new(bbox: BoundingBox, score: f64, class_id: u32) -> Result<Self> {
        let prediction = Self { bbox, score, class_id };
        prediction.validate()?;
        Ok(prediction)
    }

    /// Check the score invariant.
    ///
    /// Needed after deserialization, which does not go through [`Prediction::new`].
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.score) {
            return Err(VocEvalError::InvalidScore(format!(
                "score must be in [0, 1], got {}",
                self.score
            )));
        }
        Ok(())
    }
}

/// An annotated object: box and class label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroundTruth {
    pub bbox: BoundingBox,
    pub class_id: u32,
}

impl GroundTruth {
    pub fn new(bbox: BoundingBox, class_id: u32) -> Self {
        Self { bbox, class_id }
    }
}

/// Predictions and ground truth of one image, in the same coordinate frame.
///
/// An empty ground-truth list is a valid image with no objects.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageRecord {
    pub image_id: u64,
    #[serde(default)]
    pub predictions: Vec<Prediction>,
    #[serde(default)]
    pub ground_truths: Vec<GroundTruth>,
}

impl ImageRecord {
    pub fn new(image_id: u64, predictions: Vec<Prediction>, ground_truths: Vec<GroundTruth>) -> Self {
        Self {
            image_id,
            predictions,
            ground_truths,
        }
    }

    /// Validate every prediction score in the record.
    pub fn validate(&self) -> Result<()> {
        self.predictions.iter().try_for_each(Prediction::validate)
    }

    /// Prediction boxes in input order.
    pub fn prediction_boxes(&self) -> Vec<BoundingBox> {
        self.predictions.iter().map(|p| p.bbox).collect()
    }

    /// Prediction scores in input order.
    pub fn prediction_scores(&self) -> Vec<f64> {
        self.predictions.iter().map(|p| p.score).collect()
    }
}

/// A single true/false positive flag produced by the matcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionOutcome {
    pub is_true_positive: bool,
    /// Confidence of the prediction behind the flag, `None` when the flag
    /// stands for an image without predictions.
    pub confidence: Option<f64>,
    /// Best IoU found, `None` when there was nothing to compare.
    pub iou: Option<f64>,
    /// Index into the image's ground-truth list of the matched object.
    pub matched_ground_truth: Option<usize>,
}

impl DetectionOutcome {
    /// False positive contributed by an image that has no predictions.
    pub fn missing_predictions() -> Self {
        Self {
            is_true_positive: false,
            confidence: None,
            iou: None,
            matched_ground_truth: None,
        }
    }
}

/// Matcher result for one image.
///
/// Under image-level matching `detections` holds exactly one flag; under
/// per-object matching it holds one flag per prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageOutcome {
    pub image_id: u64,
    /// Ground-truth objects this image adds to the recall denominator.
    pub ground_truth_count: usize,
    pub detections: Vec<DetectionOutcome>,
}

impl ImageOutcome {
    pub fn true_positives(&self) -> usize {
        self.detections.iter().filter(|d| d.is_true_positive).count()
    }

    pub fn false_positives(&self) -> usize {
        self.detections.len() - self.true_positives()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bbox_dimensions() {
        let bbox = BoundingBox::new(2.0, 3.0, 12.0, 8.0).unwrap();
        assert_eq!(bbox.width(), 10.0);
        assert_eq!(bbox.height(), 5.0);
        assert_eq!(bbox.to_array(), [2.0, 3.0, 12.0, 8.0]);
    }

    #[test]
    fn test_bbox_rejects_degenerate() {
        assert!(BoundingBox::new(0.0, 0.0, 0.0, 10.0).is_err());
        assert!(BoundingBox::new(0.0, 10.0, 10.0, 5.0).is_err());
        assert!(BoundingBox::new(f64::NAN, 0.0, 10.0, 10.0).is_err());
        assert!(BoundingBox::new(0.0, 0.0, f64::INFINITY, 10.0).is_err());
    }

    #[test]
    fn test_bbox_serde_array() {
        let bbox = BoundingBox::new(1.0, 2.0, 3.0, 4.0).unwrap();
        let json = serde_json::to_string(&bbox).unwrap();
        assert_eq!(json, "[1.0,2.0,3.0,4.0]");

        let parsed: BoundingBox = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, bbox);

        let invalid: std::result::Result<BoundingBox, _> = serde_json::from_str("[5.0, 0.0, 1.0, 4.0]");
        assert!(invalid.is_err());
    }

    #[test]
    fn test_prediction_score_range() {
        let bbox = BoundingBox::new(0.0, 0.0, 1.0, 1.0).unwrap();
        assert!(Prediction::new(bbox, 0.5, 0).is_ok());
        assert!(Prediction::new(bbox, 1.5, 0).is_err());
        assert!(Prediction::new(bbox, -0.1, 0).is_err());
        assert!(Prediction::new(bbox, f64::NAN, 0).is_err());
    }

    #[test]
    fn test_image_outcome_counts() {
        let outcome = ImageOutcome {
            image_id: 1,
            ground_truth_count: 2,
            detections: vec![
                DetectionOutcome {
                    is_true_positive: true,
                    confidence: Some(0.9),
                    iou: Some(0.8),
                    matched_ground_truth: Some(0),
                },
                DetectionOutcome::missing_predictions(),
            ],
        };
        assert_eq!(outcome.true_positives(), 1);
        assert_eq!(outcome.false_positives(), 1);
    }
}
