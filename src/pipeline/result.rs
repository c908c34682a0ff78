//! Result types for detection jobs.
//!
//! Two serialized shapes exist, selected by input kind. Folder and
//! single-image jobs produce a map keyed by filename; PDF jobs produce
//! an ordered `pages` array. Both echo the `DetectionParams` used for
//! the run. Empty detection categories are omitted as keys, never
//! emitted as empty arrays.

use crate::core::DetectionParams;
use crate::processors::Detection;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Horizontal and vertical DPI pair, reporting-only.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dpi {
    /// Horizontal resolution in dots per inch.
    pub x: f64,
    /// Vertical resolution in dots per inch.
    pub y: f64,
}

/// Per-image resolution block for folder/image mode.
///
/// Carries the pixel dimensions alongside the DPI pair so a consumer
/// can size overlays without reopening the source file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImageDpi {
    /// Horizontal resolution in dots per inch (0.0 when unknown).
    pub x: f64,
    /// Vertical resolution in dots per inch (0.0 when unknown).
    pub y: f64,
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
}

/// Detection results for one image file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageEntry {
    /// Resolution and pixel dimensions of the source image.
    pub dpi: ImageDpi,
    /// Detected horizontal lines; absent when none were found.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub horizontal_lines: Option<Vec<Detection>>,
    /// Detected rectangles; absent when none were found.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub rectangles: Option<Vec<Detection>>,
}

/// Detection results for one PDF page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageEntry {
    /// 1-based page number.
    pub page: usize,
    /// Rendered page width in pixels.
    pub width: u32,
    /// Rendered page height in pixels.
    pub height: u32,
    /// Detected horizontal lines; absent when none were found.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub horizontal_lines: Option<Vec<Detection>>,
    /// Detected rectangles; absent when none were found.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub rectangles: Option<Vec<Detection>>,
}

impl PageEntry {
    /// True when at least one detection category is present.
    pub fn has_detections(&self) -> bool {
        self.horizontal_lines.is_some() || self.rectangles.is_some()
    }
}

/// Folder/image mode report: one entry per processed input file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FolderReport {
    /// Per-filename results, in filename order.
    pub result: BTreeMap<String, ImageEntry>,
    /// The thresholds used for the run.
    pub detection_params: DetectionParams,
}

/// PDF mode report: pages with detections, in ascending page order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PdfReport {
    /// Pages with at least one non-empty detection category.
    pub pages: Vec<PageEntry>,
    /// The fixed render resolution used to rasterize the pages.
    pub dpi: Dpi,
    /// The thresholds used for the run.
    pub detection_params: DetectionParams,
}

/// The final structured output of a job.
///
/// Serialization is untagged; the two shapes are distinguished by their
/// required keys (`result` vs `pages`), so round-tripping through JSON
/// is unambiguous.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResultSet {
    /// Folder/image mode output.
    Folder(FolderReport),
    /// PDF mode output.
    Pdf(PdfReport),
}

impl ResultSet {
    /// Number of entries (files or pages) in the report.
    pub fn len(&self) -> usize {
        match self {
            ResultSet::Folder(report) => report.result.len(),
            ResultSet::Pdf(report) => report.pages.len(),
        }
    }

    /// True when the report has no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Renders the report as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Writes the report as pretty-printed JSON, creating parent
    /// directories as needed.
    pub fn write_json(&self, path: &Path) -> Result<(), crate::core::DetectError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let json = self.to_json_pretty()?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

/// Wraps a detection list in the report convention: absence, not an
/// empty list, signals "none found".
pub fn non_empty(detections: Vec<Detection>) -> Option<Vec<Detection>> {
    if detections.is_empty() {
        None
    } else {
        Some(detections)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_detection() -> Detection {
        Detection {
            x: 120,
            y: 350,
            width: 1000,
            height: 2,
        }
    }

    #[test]
    fn empty_categories_are_omitted() {
        let entry = ImageEntry {
            dpi: ImageDpi {
                x: 0.0,
                y: 0.0,
                width: 800,
                height: 600,
            },
            horizontal_lines: non_empty(vec![]),
            rectangles: non_empty(vec![sample_detection()]),
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert!(json.get("horizontal_lines").is_none());
        assert!(json.get("rectangles").is_some());
    }

    #[test]
    fn folder_report_round_trips() {
        let mut result = BTreeMap::new();
        result.insert(
            "scan_01.png".to_string(),
            ImageEntry {
                dpi: ImageDpi {
                    x: 300.0,
                    y: 300.0,
                    width: 1000,
                    height: 1400,
                },
                horizontal_lines: Some(vec![sample_detection()]),
                rectangles: None,
            },
        );
        let set = ResultSet::Folder(FolderReport {
            result,
            detection_params: DetectionParams::default(),
        });
        let json = set.to_json_pretty().unwrap();
        let back: ResultSet = serde_json::from_str(&json).unwrap();
        assert_eq!(set, back);
    }

    #[test]
    fn pdf_report_round_trips_with_params_echo() {
        let set = ResultSet::Pdf(PdfReport {
            pages: vec![
                PageEntry {
                    page: 1,
                    width: 1224,
                    height: 1584,
                    horizontal_lines: Some(vec![sample_detection()]),
                    rectangles: None,
                },
                PageEntry {
                    page: 3,
                    width: 1224,
                    height: 1584,
                    horizontal_lines: None,
                    rectangles: Some(vec![sample_detection()]),
                },
            ],
            dpi: Dpi { x: 144.0, y: 144.0 },
            detection_params: DetectionParams {
                min_line_width_ratio: 0.1,
                max_line_height: 20,
                min_rect_area_ratio: 0.002,
                max_rect_area_ratio: 0.6,
            },
        });
        let json = set.to_json_pretty().unwrap();
        let back: ResultSet = serde_json::from_str(&json).unwrap();
        assert_eq!(set, back);
        match back {
            ResultSet::Pdf(report) => {
                assert_eq!(report.detection_params.max_line_height, 20);
                assert_eq!(report.pages[0].page, 1);
                assert_eq!(report.pages[1].page, 3);
            }
            ResultSet::Folder(_) => panic!("parsed as folder report"),
        }
    }

    #[test]
    fn untagged_parse_distinguishes_modes() {
        let folder: ResultSet = serde_json::from_str(
            r#"{"result": {}, "detection_params": {
                "min_line_width_ratio": 0.2, "max_line_height": 10,
                "min_rect_area_ratio": 0.001, "max_rect_area_ratio": 0.5}}"#,
        )
        .unwrap();
        assert!(matches!(folder, ResultSet::Folder(_)));

        let pdf: ResultSet = serde_json::from_str(
            r#"{"pages": [], "dpi": {"x": 144.0, "y": 144.0}, "detection_params": {
                "min_line_width_ratio": 0.2, "max_line_height": 10,
                "min_rect_area_ratio": 0.001, "max_rect_area_ratio": 0.5}}"#,
        )
        .unwrap();
        assert!(matches!(pdf, ResultSet::Pdf(_)));
    }
}
