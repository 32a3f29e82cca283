//! Intersection over Union (IoU) calculation.

use crate::types::BoundingBox;
use serde::{Deserialize, Serialize};

/// How box extents are measured.
///
/// `PixelInclusive` treats corners as inclusive pixel indices, so a box
/// spanning x1..=x2 is `x2 - x1 + 1` wide. `Continuous` treats them as
/// real-valued interval endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoxConvention {
    #[default]
    PixelInclusive,
    Continuous,
}

impl BoxConvention {
    fn extent_offset(self) -> f64 {
        match self {
            BoxConvention::PixelInclusive => 1.0,
            BoxConvention::Continuous => 0.0,
        }
    }
}

/// Area of a bounding box under the pixel-inclusive convention:
/// `(x2 - x1 + 1) * (y2 - y1 + 1)`.
///
/// # Example
///
/// ```
/// use voc_eval::metrics::iou::calculate_area;
/// use voc_eval::types::BoundingBox;
///
/// let bbox = BoundingBox::new(0.0, 0.0, 10.0, 10.0).unwrap();
/// assert_eq!(calculate_area(&bbox), 121.0);
/// ```
pub fn calculate_area(bbox: &BoundingBox) -> f64 {
    calculate_area_with(bbox, BoxConvention::PixelInclusive)
}

/// Area of a bounding box under the given convention.
pub fn calculate_area_with(bbox: &BoundingBox, convention: BoxConvention) -> f64 {
    let offset = convention.extent_offset();
    (bbox.width() + offset) * (bbox.height() + offset)
}

/// Calculate the Intersection over Union (IoU) between two bounding boxes
/// under the pixel-inclusive convention.
///
/// # Returns
///
/// Returns a value between 0.0 (no overlap) and 1.0 (identical boxes).
///
/// # Example
///
/// ```
/// use voc_eval::metrics::iou::calculate_iou;
/// use voc_eval::types::BoundingBox;
///
/// let bbox1 = BoundingBox::new(0.0, 0.0, 10.0, 10.0).unwrap();
/// let bbox2 = BoundingBox::new(5.0, 5.0, 15.0, 15.0).unwrap();
/// let iou = calculate_iou(&bbox1, &bbox2);
/// assert!(iou > 0.0 && iou < 1.0);
/// ```
pub fn calculate_iou(bbox1: &BoundingBox, bbox2: &BoundingBox) -> f64 {
    calculate_iou_with(bbox1, bbox2, BoxConvention::PixelInclusive)
}

/// Calculate IoU under the given convention.
///
/// Both boxes have positive area, so the union is strictly positive and the
/// result is never NaN.
pub fn calculate_iou_with(bbox1: &BoundingBox, bbox2: &BoundingBox, convention: BoxConvention) -> f64 {
    let offset = convention.extent_offset();

    // Intersection rectangle
    let x_left = bbox1.x1().max(bbox2.x1());
    let y_top = bbox1.y1().max(bbox2.y1());
    let x_right = bbox1.x2().min(bbox2.x2());
    let y_bottom = bbox1.y2().min(bbox2.y2());

    let intersection_width = (x_right - x_left + offset).max(0.0);
    let intersection_height = (y_bottom - y_top + offset).max(0.0);
    let intersection_area = intersection_width * intersection_height;

    let union_area = calculate_area_with(bbox1, convention) + calculate_area_with(bbox2, convention)
        - intersection_area;

    (intersection_area / union_area).clamp(0.0, 1.0)
}

/// Calculate IoU matrix between two sets of bounding boxes.
///
/// Returns a 2D vector where `result[i][j]` is the IoU between `bboxes1[i]` and `bboxes2[j]`.
pub fn calculate_iou_matrix(
    bboxes1: &[BoundingBox],
    bboxes2: &[BoundingBox],
    convention: BoxConvention,
) -> Vec<Vec<f64>> {
    bboxes1
        .iter()
        .map(|bbox1| {
            bboxes2
                .iter()
                .map(|bbox2| calculate_iou_with(bbox1, bbox2, convention))
                .collect()
        })
        .collect()
}
