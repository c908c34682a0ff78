//! Drawing detection overlays and dumping intermediate masks.

use crate::processors::Detection;
use image::{GrayImage, Rgb, RgbImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;
use std::path::Path;
use tracing::warn;

/// Outline color for detected horizontal lines.
pub const LINE_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
/// Outline color for detected rectangles.
pub const RECT_COLOR: Rgb<u8> = Rgb([255, 0, 0]);

const OUTLINE_THICKNESS: u32 = 2;

/// Draws detection outlines onto a copy of the source image.
///
/// Lines are outlined in green, rectangles in red, both with a 2 px
/// stroke drawn inward so the outline never leaves the image.
pub fn draw_detections(image: &RgbImage, lines: &[Detection], rectangles: &[Detection]) -> RgbImage {
    let mut canvas = image.clone();
    for det in lines {
        draw_outline(&mut canvas, det, LINE_COLOR);
    }
    for det in rectangles {
        draw_outline(&mut canvas, det, RECT_COLOR);
    }
    canvas
}

fn draw_outline(canvas: &mut RgbImage, det: &Detection, color: Rgb<u8>) {
    for inset in 0..OUTLINE_THICKNESS {
        let width = det.width.saturating_sub(inset * 2);
        let height = det.height.saturating_sub(inset * 2);
        if width == 0 || height == 0 {
            break;
        }
        let rect = Rect::at((det.x + inset) as i32, (det.y + inset) as i32).of_size(width, height);
        draw_hollow_rect_mut(canvas, rect, color);
    }
}

/// Saves an intermediate mask into the debug directory.
///
/// Creates the directory if needed. Failures are logged and swallowed;
/// debug artifacts must never fail a detection run.
pub fn save_debug_mask(dir: &Path, name: &str, mask: &GrayImage) {
    if let Err(err) = std::fs::create_dir_all(dir) {
        warn!(dir = %dir.display(), error = %err, "failed to create debug directory");
        return;
    }
    let path = dir.join(name);
    if let Err(err) = mask.save(&path) {
        warn!(path = %path.display(), error = %err, "failed to save debug mask");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outlines_are_drawn_with_two_pixel_stroke() {
        let image = RgbImage::from_pixel(100, 100, Rgb([255, 255, 255]));
        let det = Detection {
            x: 10,
            y: 20,
            width: 40,
            height: 30,
        };
        let out = draw_detections(&image, &[], &[det]);
        // Outer and inner border rows carry the stroke.
        assert_eq!(out.get_pixel(30, 20).0, RECT_COLOR.0);
        assert_eq!(out.get_pixel(30, 21).0, RECT_COLOR.0);
        assert_eq!(out.get_pixel(30, 22).0, [255, 255, 255]);
        // Source image untouched.
        assert_eq!(image.get_pixel(30, 20).0, [255, 255, 255]);
    }

    #[test]
    fn degenerate_boxes_do_not_panic() {
        let image = RgbImage::from_pixel(10, 10, Rgb([255, 255, 255]));
        let det = Detection {
            x: 2,
            y: 2,
            width: 1,
            height: 1,
        };
        draw_detections(&image, &[det], &[]);
    }

    #[test]
    fn save_debug_mask_creates_nested_directories() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("deep").join("nested");
        let mask = GrayImage::from_pixel(8, 8, image::Luma([0]));
        save_debug_mask(&dir, "mask.png", &mask);
        assert!(dir.join("mask.png").exists());
    }
}
