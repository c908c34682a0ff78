//! Detection boxes and contour geometry helpers.

use imageproc::contours::Contour;
use serde::{Deserialize, Serialize};

/// An axis-aligned detection box in pixel space.
///
/// Coordinates always lie within the source image: `x + width` and
/// `y + height` never exceed the image dimensions. Width and height use
/// the pixel-extent convention (`max - min + 1`), so a bar drawn 1000
/// pixels wide is reported with `width == 1000`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Detection {
    /// Left edge in pixels.
    pub x: u32,
    /// Top edge in pixels.
    pub y: u32,
    /// Box width in pixels.
    pub width: u32,
    /// Box height in pixels.
    pub height: u32,
}

impl Detection {
    /// Bounding-box area in pixels.
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

/// Computes the axis-aligned bounding box of a contour's points.
///
/// Returns `None` for contours without points. Negative coordinates are
/// clamped to zero; `find_contours` does not produce them, but the clamp
/// keeps the cast sound.
pub fn contour_bounding_box(contour: &Contour<i32>) -> Option<Detection> {
    let first = contour.points.first()?;
    let (mut min_x, mut min_y) = (first.x, first.y);
    let (mut max_x, mut max_y) = (first.x, first.y);
    for p in &contour.points[1..] {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }
    Some(Detection {
        x: min_x.max(0) as u32,
        y: min_y.max(0) as u32,
        width: (max_x - min_x + 1) as u32,
        height: (max_y - min_y + 1) as u32,
    })
}

/// Sorts detections top-to-bottom, then left-to-right.
///
/// Contour traversal already emits components in roughly this order;
/// sorting makes it explicit and deterministic.
pub fn sort_reading_order(detections: &mut [Detection]) {
    detections.sort_by_key(|d| (d.y, d.x));
}
