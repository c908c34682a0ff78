//! Per-item processing shared by the folder and PDF orchestrators.
//!
//! One item moves through `Loading -> Detecting -> Completed | Skipped`;
//! this module covers the detecting span: binarization, both detectors,
//! and the optional debug/visualization artifacts. All artifact writes
//! are non-fatal.

use crate::core::{DetectError, DetectionParams, RasterImage};
use crate::processors::binarize::{threshold_mask, to_gray};
use crate::processors::lines::open_horizontal;
use crate::processors::{detect_lines, detect_rectangles, Detection};
use crate::utils::visualization::{draw_detections, save_debug_mask};
use std::path::Path;
use tracing::warn;

/// Detections produced from a single raster item.
#[derive(Debug)]
pub(crate) struct ItemDetections {
    pub width: u32,
    pub height: u32,
    pub lines: Vec<Detection>,
    pub rectangles: Vec<Detection>,
}

/// Runs binarization and both detectors over one raster image.
///
/// `debug_dir` receives step-numbered intermediate masks when set;
/// `visualization_path` receives the annotated overlay when set. The
/// raster and all masks are dropped when this function returns, keeping
/// peak memory bounded to one item.
pub(crate) fn detect_item(
    raster: &RasterImage,
    params: &DetectionParams,
    debug_dir: Option<&Path>,
    visualization_path: Option<&Path>,
) -> Result<ItemDetections, DetectError> {
    let width = raster.width();
    let height = raster.height();

    let gray = to_gray(raster)?;
    let mask = threshold_mask(&gray);

    if let Some(dir) = debug_dir {
        save_debug_mask(dir, "step_01_gray.png", &gray);
        save_debug_mask(dir, "step_02_binary.png", &mask);
        save_debug_mask(dir, "step_03_line_mask.png", &open_horizontal(&mask, width));
    }
    drop(gray);

    let lines = detect_lines(&mask, width, height, params);
    let rectangles = detect_rectangles(&mask, width, height, params);
    drop(mask);

    if let Some(path) = visualization_path {
        match raster.to_rgb() {
            Some(rgb) => {
                let annotated = draw_detections(&rgb, &lines, &rectangles);
                if let Err(err) = annotated.save(path) {
                    warn!(path = %path.display(), error = %err, "failed to save visualization");
                }
            }
            None => warn!(
                path = %path.display(),
                "cannot render visualization for this channel layout"
            ),
        }
    }

    Ok(ItemDetections {
        width,
        height,
        lines,
        rectangles,
    })
}
