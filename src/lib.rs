//! # voc-eval
//!
//! A Rust library for Pascal VOC style object detection evaluation: given
//! predicted and ground-truth boxes per image, decide which predictions are
//! correct and reduce the result to an Average Precision (AP) score.
//!
//! This library provides:
//! - **IoU** between corner-format boxes, pixel-inclusive ("+1") or continuous
//! - **NMS** (non-maximum suppression) with a top-k candidate cap
//! - **Matching** of predictions to ground truth, image-level or per-object
//! - **Precision/recall curves** and **AP**, continuous or VOC07 11-point
//!
//! ## Quick Start
//!
//! ```rust
//! use voc_eval::{evaluate, BoundingBox, EvalConfig, GroundTruth, ImageRecord, Prediction};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let target = BoundingBox::new(0.0, 0.0, 10.0, 10.0)?;
//! let records = vec![ImageRecord::new(
//!     1,
//!     vec![Prediction::new(target, 0.9, 0)?],
//!     vec![GroundTruth::new(target, 0)],
//! )];
//!
//! let report = evaluate(&records, &EvalConfig::default())?;
//! println!("AP: {:.4}", report.average_precision());
//! # Ok(())
//! # }
//! ```
//!
//! ## Record Format
//!
//! [`loader`] reads records as JSON, boxes as `[x1, y1, x2, y2]`:
//!
//! ```json
//! [
//!   {
//!     "image_id": 1,
//!     "predictions": [{"bbox": [48.0, 240.0, 195.0, 371.0], "score": 0.92, "class_id": 0}],
//!     "ground_truths": [{"bbox": [50.0, 242.0, 196.0, 370.0], "class_id": 0}]
//!   }
//! ]
//! ```
//!
//! ## Matching Schemes
//!
//! The default [`MatchingScheme::ImageLevel`] yields one flag per image and
//! counts an image as a true positive when any prediction overlaps any ground
//! truth above the threshold. It does not credit several objects in one image
//! separately. [`MatchingScheme::PerObject`] performs greedy one-to-one
//! assignment and yields one flag per prediction.

pub mod error;
pub mod types;
pub mod config;
pub mod loader;
pub mod threshold;
pub mod metrics;
pub mod nms;
pub mod matching;
pub mod accumulator;
pub mod stats;
pub mod evaluator;

// Re-export commonly used types and functions
pub use error::{Result, VocEvalError};
pub use types::{
    BoundingBox, DetectionOutcome, GroundTruth, ImageOutcome, ImageRecord, Prediction,
};
pub use config::EvalConfig;
pub use loader::{load_config_from_file, load_config_from_str, load_records_from_file, load_records_from_str};
pub use matching::MatchingScheme;
pub use metrics::{ApMethod, ApResult, BoxConvention, PrCurve};
pub use accumulator::{FlagOrdering, MetricAccumulator};
pub use evaluator::{evaluate, evaluate_image, EvaluationReport, ImageEvaluation};
