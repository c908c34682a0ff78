//! Rectangular frame detection over a binary mask.

use crate::core::DetectionParams;
use crate::processors::geometry::{contour_bounding_box, sort_reading_order, Detection};
use image::GrayImage;
use imageproc::contours::{find_contours, BorderType, Contour};
use imageproc::geometry::{approximate_polygon_dp, arc_length, convex_hull};

/// Polygon approximation tolerance as a fraction of the contour's
/// closed arc length.
const APPROX_EPSILON_RATIO: f64 = 0.02;

/// Finds rectangular frames and returns their bounding boxes.
///
/// Each outer contour is approximated with Douglas-Peucker; only
/// approximations that reduce to four convex vertices survive. The
/// bounding-box area of each surviving quadrilateral is then filtered
/// against the area band:
/// `min_rect_area_ratio * total <= area <= max_rect_area_ratio * total`,
/// inclusive at both ends, with `total = image_width * image_height`.
///
/// Squares are not special-cased and aspect ratio is unconstrained.
/// Overlapping or nested frames are reported independently; no merging
/// is performed. The result is ordered top-to-bottom then left-to-right
/// and is empty (not an error) when nothing qualifies.
pub fn detect_rectangles(
    mask: &GrayImage,
    image_width: u32,
    image_height: u32,
    params: &DetectionParams,
) -> Vec<Detection> {
    let total_area = image_width as f64 * image_height as f64;
    let min_area = params.min_rect_area_ratio * total_area;
    let max_area = params.max_rect_area_ratio * total_area;

    let mut rects: Vec<Detection> = find_contours::<i32>(mask)
        .iter()
        .filter(|c| c.border_type == BorderType::Outer)
        .filter(|c| is_convex_quad(c))
        .filter_map(contour_bounding_box)
        .filter(|b| {
            let area = b.area() as f64;
            area >= min_area && area <= max_area
        })
        .collect();

    sort_reading_order(&mut rects);
    tracing::debug!(
        image_width,
        image_height,
        kept = rects.len(),
        "rectangle detection finished"
    );
    rects
}

/// Returns true when the contour's polygon approximation is a convex
/// quadrilateral.
fn is_convex_quad(contour: &Contour<i32>) -> bool {
    if contour.points.len() < 4 {
        return false;
    }
    let epsilon = APPROX_EPSILON_RATIO * arc_length(&contour.points, true);
    let approx = approximate_polygon_dp(&contour.points, epsilon, true);
    // A quad is convex iff its hull keeps all four vertices.
    approx.len() == 4 && convex_hull(approx).len() == 4
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn blank_mask(width: u32, height: u32) -> GrayImage {
        GrayImage::from_pixel(width, height, Luma([0]))
    }

    /// Draws a hollow rectangular frame with a 2 px border, outer corner
    /// at (x, y), outer extent `width` x `height`.
    fn draw_frame(mask: &mut GrayImage, x: u32, y: u32, width: u32, height: u32) {
        for dy in 0..height {
            for dx in 0..width {
                let on_border = dx < 2 || dy < 2 || dx >= width - 2 || dy >= height - 2;
                if on_border {
                    mask.put_pixel(x + dx, y + dy, Luma([255]));
                }
            }
        }
    }

    fn band(min: f64, max: f64) -> DetectionParams {
        DetectionParams {
            min_rect_area_ratio: min,
            max_rect_area_ratio: max,
            ..DetectionParams::default()
        }
    }

    #[test]
    fn frame_is_detected_with_exact_bounds() {
        let mut mask = blank_mask(500, 400);
        draw_frame(&mut mask, 100, 100, 201, 151);
        let rects = detect_rectangles(&mask, 500, 400, &band(0.001, 0.5));
        assert_eq!(
            rects,
            vec![Detection {
                x: 100,
                y: 100,
                width: 201,
                height: 151
            }]
        );
    }

    #[test]
    fn square_is_an_ordinary_quad() {
        let mut mask = blank_mask(500, 400);
        draw_frame(&mut mask, 100, 100, 101, 101);
        let rects = detect_rectangles(&mask, 500, 400, &band(0.001, 0.5));
        assert_eq!(rects.len(), 1);
        assert_eq!(rects[0].width, rects[0].height);
    }

    #[test]
    fn area_band_is_inclusive_and_filters_small_frames() {
        let mut mask = blank_mask(500, 400);
        draw_frame(&mut mask, 100, 100, 11, 11);
        // 11x11 bounding area = 121 px over a 200_000 px image.
        assert!(detect_rectangles(&mask, 500, 400, &band(0.01, 0.5)).is_empty());
        assert_eq!(
            detect_rectangles(&mask, 500, 400, &band(0.0001, 0.5)).len(),
            1
        );
    }

    #[test]
    fn non_quad_shapes_are_rejected() {
        let mut mask = blank_mask(500, 400);
        // A filled triangle never approximates to four vertices.
        for y in 0..150u32 {
            for x in 0..=y {
                mask.put_pixel(100 + x, 100 + y, Luma([255]));
            }
        }
        assert!(detect_rectangles(&mask, 500, 400, &band(0.0001, 0.9)).is_empty());
    }

    #[test]
    fn nested_frames_are_kept_independently() {
        let mut mask = blank_mask(600, 600);
        draw_frame(&mut mask, 50, 50, 401, 401);
        draw_frame(&mut mask, 150, 150, 101, 101);
        let rects = detect_rectangles(&mask, 600, 600, &band(0.001, 0.9));
        assert_eq!(rects.len(), 2);
        assert_eq!(rects[0].x, 50);
        assert_eq!(rects[1].x, 150);
    }

    #[test]
    fn blank_mask_yields_no_rectangles() {
        let mask = blank_mask(300, 300);
        assert!(detect_rectangles(&mask, 300, 300, &DetectionParams::default()).is_empty());
    }
}
