//! JSON loading utilities for configuration and per-image records.

use crate::config::EvalConfig;
use crate::error::Result;
use crate::types::ImageRecord;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Load an evaluation configuration from a JSON file.
///
/// Missing fields take their defaults. The configuration is validated.
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsed, or validated.
pub fn load_config_from_file<P: AsRef<Path>>(path: P) -> Result<EvalConfig> {
    let reader = BufReader::new(File::open(path)?);
    let config: EvalConfig = serde_json::from_reader(reader)?;
    config.validate()?;
    Ok(config)
}

/// Load an evaluation configuration from a JSON string.
///
/// # Example
///
/// ```
/// use voc_eval::loader::load_config_from_str;
///
/// let config = load_config_from_str(r#"{"iou_threshold": 0.7}"#).unwrap();
/// assert_eq!(config.iou_threshold, 0.7);
/// assert!(load_config_from_str(r#"{"iou_threshold": 7.0}"#).is_err());
/// ```
pub fn load_config_from_str(json_str: &str) -> Result<EvalConfig> {
    let config: EvalConfig = serde_json::from_str(json_str)?;
    config.validate()?;
    Ok(config)
}

/// Load per-image records from a JSON file holding an array of records.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, if a box is
/// degenerate, or if a score lies outside [0, 1].
///
/// # Example
///
/// ```no_run
/// use voc_eval::loader::load_records_from_file;
///
/// let records = load_records_from_file("detections.json").unwrap();
/// println!("Loaded {} images", records.len());
/// ```
pub fn load_records_from_file<P: AsRef<Path>>(path: P) -> Result<Vec<ImageRecord>> {
    let reader = BufReader::new(File::open(path)?);
    let records: Vec<ImageRecord> = serde_json::from_reader(reader)?;
    validate_records(&records)?;
    Ok(records)
}

/// Load per-image records from a JSON string.
///
/// Boxes are `[x1, y1, x2, y2]` arrays:
///
/// ```
/// use voc_eval::loader::load_records_from_str;
///
/// let json = r#"[
///     {
///         "image_id": 1,
///         "predictions": [{"bbox": [0.0, 0.0, 10.0, 10.0], "score": 0.9, "class_id": 0}],
///         "ground_truths": [{"bbox": [0.0, 0.0, 10.0, 10.0], "class_id": 0}]
///     },
///     {"image_id": 2}
/// ]"#;
/// let records = load_records_from_str(json).unwrap();
/// assert_eq!(records.len(), 2);
/// assert!(records[1].predictions.is_empty());
/// ```
pub fn load_records_from_str(json_str: &str) -> Result<Vec<ImageRecord>> {
    let records: Vec<ImageRecord> = serde_json::from_str(json_str)?;
    validate_records(&records)?;
    Ok(records)
}

fn validate_records(records: &[ImageRecord]) -> Result<()> {
    records.iter().try_for_each(ImageRecord::validate)
}
