//! Horizontal line detection over a binary mask.

use crate::core::DetectionParams;
use crate::processors::geometry::{contour_bounding_box, sort_reading_order, Detection};
use image::{GrayImage, Luma};
use imageproc::contours::{find_contours, BorderType};
use imageproc::morphology::{grayscale_dilate, grayscale_erode, Mask};

/// The flat structuring element is at least this wide, regardless of
/// image size.
const MIN_KERNEL_WIDTH: u32 = 50;

/// The mask API addresses the element center with `u8` coordinates, so
/// the element width is capped here.
const MAX_KERNEL_WIDTH: u32 = 255;

/// Isolates long horizontal runs and returns their bounding boxes.
///
/// A morphological opening with a wide, one-pixel-tall structuring
/// element suppresses everything except horizontal runs at least as long
/// as the element. The surviving connected components are filtered by
/// the shared thresholds: a box is kept iff
/// `width >= min_line_width_ratio * image_width` and
/// `height <= max_line_height`, both bounds inclusive.
///
/// Components are disjoint by construction of the opened mask, so no
/// merging is performed. The result is ordered top-to-bottom then
/// left-to-right, and is empty (not an error) when nothing qualifies.
pub fn detect_lines(
    mask: &GrayImage,
    image_width: u32,
    image_height: u32,
    params: &DetectionParams,
) -> Vec<Detection> {
    let opened = open_horizontal(mask, image_width);
    let min_width = params.min_line_width_ratio * image_width as f64;

    let mut lines: Vec<Detection> = find_contours::<i32>(&opened)
        .iter()
        .filter(|c| c.border_type == BorderType::Outer)
        .filter_map(contour_bounding_box)
        .filter(|b| b.width as f64 >= min_width && b.height <= params.max_line_height)
        .collect();

    sort_reading_order(&mut lines);
    tracing::debug!(
        image_width,
        image_height,
        kept = lines.len(),
        "horizontal line detection finished"
    );
    lines
}

/// Applies the directional opening that keeps only long horizontal runs.
pub(crate) fn open_horizontal(mask: &GrayImage, image_width: u32) -> GrayImage {
    let element = horizontal_element(horizontal_kernel_width(image_width));
    let eroded = grayscale_erode(mask, &element);
    grayscale_dilate(&eroded, &element)
}

/// Builds the flat `width x 1` structuring element, centered on the
/// middle pixel. `width` must be odd and at most [`MAX_KERNEL_WIDTH`]
/// so the center coordinate fits the mask API.
fn horizontal_element(width: u32) -> Mask {
    let row = GrayImage::from_pixel(width, 1, Luma([255]));
    Mask::from_image(&row, (width / 2) as u8, 0)
}

/// Structuring element width: 5% of the image width, floored at
/// [`MIN_KERNEL_WIDTH`], capped at [`MAX_KERNEL_WIDTH`], and forced odd
/// so the element has a center pixel.
fn horizontal_kernel_width(image_width: u32) -> u32 {
    let scaled = (image_width as f64 * 0.05) as u32;
    (scaled.clamp(MIN_KERNEL_WIDTH, MAX_KERNEL_WIDTH)) | 1
}
