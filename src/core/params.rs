//! Detection thresholds shared by every item in a job.

use crate::core::errors::DetectError;
use serde::{Deserialize, Serialize};

/// Thresholds controlling line and rectangle filtering.
///
/// A `DetectionParams` value is built once at job start, validated, and
/// then shared by reference across all items; nothing mutates it after
/// creation. The same value is echoed into the JSON report so a result
/// file records the thresholds that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionParams {
    /// Minimum line width as a fraction of the image width (0-1).
    pub min_line_width_ratio: f64,
    /// Maximum line height in pixels.
    pub max_line_height: u32,
    /// Minimum rectangle bounding-box area as a fraction of the image area (0-1).
    pub min_rect_area_ratio: f64,
    /// Maximum rectangle bounding-box area as a fraction of the image area (0-1).
    pub max_rect_area_ratio: f64,
}

impl Default for DetectionParams {
    fn default() -> Self {
        Self {
            min_line_width_ratio: 0.2,
            max_line_height: 10,
            min_rect_area_ratio: 0.001,
            max_rect_area_ratio: 0.5,
        }
    }
}

impl DetectionParams {
    /// Checks that every threshold is inside its documented range.
    ///
    /// Called by the orchestrator before any item is processed; a
    /// violation aborts the whole job as a configuration error.
    pub fn validate(&self) -> Result<(), DetectError> {
        if !(0.0..=1.0).contains(&self.min_line_width_ratio) {
            return Err(DetectError::invalid_field(
                "min_line_width_ratio",
                "a ratio in 0.0..=1.0",
                self.min_line_width_ratio,
            ));
        }
        if self.max_line_height == 0 {
            return Err(DetectError::invalid_field(
                "max_line_height",
                "a height greater than zero",
                self.max_line_height,
            ));
        }
        if !(0.0..=1.0).contains(&self.min_rect_area_ratio) {
            return Err(DetectError::invalid_field(
                "min_rect_area_ratio",
                "a ratio in 0.0..=1.0",
                self.min_rect_area_ratio,
            ));
        }
        if !(0.0..=1.0).contains(&self.max_rect_area_ratio) {
            return Err(DetectError::invalid_field(
                "max_rect_area_ratio",
                "a ratio in 0.0..=1.0",
                self.max_rect_area_ratio,
            ));
        }
        if self.min_rect_area_ratio >= self.max_rect_area_ratio {
            return Err(DetectError::Config {
                message: format!(
                    "min_rect_area_ratio ({}) must be less than max_rect_area_ratio ({})",
                    self.min_rect_area_ratio, self.max_rect_area_ratio
                ),
            });
        }
        Ok(())
    }
}
