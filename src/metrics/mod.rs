//! Metrics calculation modules for detection evaluation.

pub mod iou;
pub mod ap;
pub mod precision_recall;

pub use iou::{calculate_area, calculate_iou, calculate_iou_with, BoxConvention};
pub use ap::{calculate_ap, ApMethod, ApResult};
pub use precision_recall::{cumulative_counts, PrCurve};
