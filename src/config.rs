//! Evaluation configuration.

use crate::error::{Result, VocEvalError};
use crate::matching::MatchingScheme;
use crate::metrics::ap::ApMethod;
use crate::metrics::iou::BoxConvention;
use crate::nms::{NmsConfig, DEFAULT_NMS_THRESHOLD, DEFAULT_TOP_K};
use crate::threshold::validate_threshold;
use serde::{Deserialize, Serialize};

/// Default `IoU` a match must exceed to count as a true positive.
pub const DEFAULT_IOU_THRESHOLD: f64 = 0.5;

/// Settings for an evaluation run. Every field has a default, so a partial
/// JSON object (or `{}`) is a valid configuration.
///
/// # Example
///
/// ```
/// use voc_eval::config::EvalConfig;
/// use voc_eval::matching::MatchingScheme;
///
/// let config: EvalConfig = serde_json::from_str(r#"{"matching_scheme": "per_object"}"#).unwrap();
/// assert_eq!(config.matching_scheme, MatchingScheme::PerObject);
/// assert_eq!(config.nms_top_k, 200);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalConfig {
    /// Matching `IoU` threshold; a match must strictly exceed it.
    pub iou_threshold: f64,
    /// Suppression overlap threshold.
    pub nms_threshold: f64,
    /// Candidate cap for suppression.
    pub nms_top_k: usize,
    pub nms_enabled: bool,
    /// Suppress within each class label instead of across all predictions.
    pub class_aware_nms: bool,
    /// Drop predictions scoring at or below this value before suppression.
    pub confidence_threshold: Option<f64>,
    pub ap_method: ApMethod,
    pub matching_scheme: MatchingScheme,
    /// Convention for matching `IoU`. Suppression always uses the continuous one.
    pub box_convention: BoxConvention,
    /// Evaluate images on the rayon thread pool.
    pub parallel: bool,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            iou_threshold: DEFAULT_IOU_THRESHOLD,
            nms_threshold: DEFAULT_NMS_THRESHOLD,
            nms_top_k: DEFAULT_TOP_K,
            nms_enabled: true,
            class_aware_nms: false,
            confidence_threshold: None,
            ap_method: ApMethod::default(),
            matching_scheme: MatchingScheme::default(),
            box_convention: BoxConvention::default(),
            parallel: true,
        }
    }
}

impl EvalConfig {
    pub fn with_iou_threshold(mut self, iou_threshold: f64) -> Self {
        self.iou_threshold = iou_threshold;
        self
    }

    pub fn with_confidence_threshold(mut self, confidence_threshold: f64) -> Self {
        self.confidence_threshold = Some(confidence_threshold);
        self
    }

    pub fn with_ap_method(mut self, ap_method: ApMethod) -> Self {
        self.ap_method = ap_method;
        self
    }

    pub fn with_matching_scheme(mut self, matching_scheme: MatchingScheme) -> Self {
        self.matching_scheme = matching_scheme;
        self
    }

    pub fn with_box_convention(mut self, box_convention: BoxConvention) -> Self {
        self.box_convention = box_convention;
        self
    }

    pub fn without_nms(mut self) -> Self {
        self.nms_enabled = false;
        self
    }

    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Suppression parameters derived from this configuration.
    pub fn nms_config(&self) -> NmsConfig {
        NmsConfig {
            overlap_threshold: self.nms_threshold,
            top_k: self.nms_top_k,
        }
    }

    /// Check that every threshold lies in [0, 1].
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` naming the offending field.
    pub fn validate(&self) -> Result<()> {
        let thresholds = [
            ("iou_threshold", Some(self.iou_threshold)),
            ("nms_threshold", Some(self.nms_threshold)),
            ("confidence_threshold", self.confidence_threshold),
        ];

        for (name, value) in thresholds {
            if let Some(value) = value {
                validate_threshold(value)
                    .map_err(|e| VocEvalError::InvalidConfig(format!("{name}: {e}")))?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EvalConfig::default();
        assert_eq!(config.iou_threshold, 0.5);
        assert_eq!(config.nms_threshold, 0.5);
        assert_eq!(config.nms_top_k, 200);
        assert_eq!(config.ap_method, ApMethod::Continuous);
        assert_eq!(config.matching_scheme, MatchingScheme::ImageLevel);
        assert_eq!(config.box_convention, BoxConvention::PixelInclusive);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_json_is_default() {
        let config: EvalConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, EvalConfig::default());
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let config = EvalConfig::default().with_iou_threshold(1.2);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("iou_threshold"));

        let config = EvalConfig::default().with_confidence_threshold(-0.5);
        assert!(matches!(config.validate(), Err(VocEvalError::InvalidConfig(_))));
    }

    #[test]
    fn test_nms_config() {
        let config = EvalConfig {
            nms_threshold: 0.45,
            nms_top_k: 10,
            ..EvalConfig::default()
        };
        assert_eq!(
            config.nms_config(),
            NmsConfig {
                overlap_threshold: 0.45,
                top_k: 10
            }
        );
    }

    #[test]
    fn test_enum_names() {
        let json = r#"{"ap_method": "eleven_point", "box_convention": "continuous"}"#;
        let config: EvalConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.ap_method, ApMethod::ElevenPoint);
        assert_eq!(config.box_convention, BoxConvention::Continuous);
    }
}
