//! Global-threshold binarization.

use crate::core::{DetectError, RasterImage};
use image::{DynamicImage, GrayImage};
use imageproc::contrast::{otsu_level, threshold, ThresholdType};

/// Converts a raster image to an inverted binary mask.
///
/// Color input is reduced to luma first; grayscale input passes through
/// unchanged in effect. The threshold level is chosen with Otsu's method
/// and the output is inverted so that ink (dark pixels) becomes 255
/// foreground and paper becomes 0, which is what the morphology and
/// contour steps expect.
///
/// Returns [`DetectError::UnsupportedFormat`] for channel layouts other
/// than 1 or 3; the orchestrator treats that as a per-item skip.
pub fn binarize(image: &RasterImage) -> Result<GrayImage, DetectError> {
    Ok(threshold_mask(&to_gray(image)?))
}

/// Thresholds an already-grayscale image into an inverted binary mask.
pub(crate) fn threshold_mask(gray: &GrayImage) -> GrayImage {
    let level = otsu_level(gray);
    threshold(gray, level, ThresholdType::BinaryInverted)
}

/// Reduces a raster image to a single luma channel.
pub(crate) fn to_gray(image: &RasterImage) -> Result<GrayImage, DetectError> {
    match image.channels() {
        1 => GrayImage::from_raw(image.width(), image.height(), image.data().to_vec()).ok_or_else(
            || DetectError::UnsupportedFormat {
                reason: "grayscale buffer does not match its dimensions".to_string(),
            },
        ),
        3 => {
            let rgb =
                image::RgbImage::from_raw(image.width(), image.height(), image.data().to_vec())
                    .ok_or_else(|| DetectError::UnsupportedFormat {
                        reason: "rgb buffer does not match its dimensions".to_string(),
                    })?;
            Ok(DynamicImage::ImageRgb8(rgb).to_luma8())
        }
        other => Err(DetectError::unsupported_channels(other)),
    }
}
