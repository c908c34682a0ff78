//! Batch orchestration over PDF pages.
//!
//! Pages are rasterized with PDFium at a fixed render resolution and
//! pushed through the same per-item detection as standalone images.
//! Rendering happens one page at a time inside the loop; a large
//! document never holds more than the current page in memory.

use crate::core::{DetectError, DetectionParams, RasterImage};
use crate::pipeline::item::detect_item;
use crate::pipeline::job::{report_progress, BatchOutcome, JobOptions, Progress, SkippedItem};
use crate::pipeline::result::{non_empty, Dpi, PageEntry, PdfReport, ResultSet};
use crate::utils::round3;
use image::RgbImage;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Configuration for PDF page rasterization.
///
/// The render DPI is a job-level constant, not a per-page lookup; it is
/// echoed into the report's `dpi` object. Detection thresholds operate
/// entirely in the rendered pixel space and never consult it.
#[derive(Debug, Clone)]
pub struct PdfRenderSettings {
    /// Render resolution in dots per inch (default: 144, a 2x zoom of
    /// the 72 pt/inch page space).
    pub dpi: f32,
    /// Maximum dimension for rendered pages (default: 4000).
    pub max_dimension: u32,
}

impl Default for PdfRenderSettings {
    fn default() -> Self {
        Self {
            dpi: 144.0,
            max_dimension: 4000,
        }
    }
}

/// Detects structures on every page of a PDF using default render
/// settings.
///
/// A page that fails to render or binarize is recorded as a skip and
/// the batch continues. Only pages with at least one non-empty
/// detection category appear in the report, in ascending page order. A
/// zero-page document completes with an empty `pages` array.
pub fn process_pdf(
    path: &Path,
    params: &DetectionParams,
    opts: &JobOptions,
    progress: Progress<'_>,
) -> Result<BatchOutcome, DetectError> {
    process_pdf_with_settings(path, params, opts, &PdfRenderSettings::default(), progress)
}

/// Detects structures on every page of a PDF with explicit render
/// settings.
pub fn process_pdf_with_settings(
    path: &Path,
    params: &DetectionParams,
    opts: &JobOptions,
    settings: &PdfRenderSettings,
    progress: Progress<'_>,
) -> Result<BatchOutcome, DetectError> {
    params.validate()?;
    if !path.is_file() {
        return Err(DetectError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let pdfium = bind_pdfium()?;
    let document = pdfium
        .load_pdf_from_file(path, None)
        .map_err(|e| DetectError::Pdf {
            message: e.to_string(),
        })?;

    let pages = document.pages();
    let total = pages.len() as usize;
    info!(path = %path.display(), total, dpi = settings.dpi, "starting pdf job");

    let viz_base = visualization_base(path, opts);
    let rendered = pages.iter().enumerate().map(|(index, page)| {
        let number = index + 1;
        let image = render_page(&page, settings).map_err(|message| DetectError::PdfRender {
            page: number,
            message,
        });
        (number, image)
    });

    let (entries, skipped) = run_pages(rendered, total, params, opts, viz_base.as_ref(), progress);

    Ok(BatchOutcome {
        results: ResultSet::Pdf(PdfReport {
            pages: entries,
            dpi: Dpi {
                x: round3(settings.dpi as f64),
                y: round3(settings.dpi as f64),
            },
            detection_params: params.clone(),
        }),
        skipped,
    })
}

/// Drives rendered pages through detection, isolating per-page failures.
///
/// Split out from [`process_pdf_with_settings`] so the page-level
/// orchestration can be exercised without a native PDFium library.
pub(crate) fn run_pages(
    rendered: impl Iterator<Item = (usize, Result<RgbImage, DetectError>)>,
    total: usize,
    params: &DetectionParams,
    opts: &JobOptions,
    viz_base: Option<&(PathBuf, String)>,
    mut progress: Progress<'_>,
) -> (Vec<PageEntry>, Vec<SkippedItem>) {
    let mut entries = Vec::new();
    let mut skipped = Vec::new();
    let mut done = 0usize;

    for (number, image) in rendered {
        if opts.is_cancelled() {
            info!(done, total, "pdf job cancelled");
            break;
        }
        done += 1;
        match process_page(number, image, params, opts, viz_base) {
            Ok(Some(entry)) => entries.push(entry),
            Ok(None) => {}
            Err(err) => {
                warn!(page = number, error = %err, "skipping page");
                skipped.push(SkippedItem {
                    item: format!("page {number}"),
                    reason: err.to_string(),
                });
            }
        }
        report_progress(&mut progress, done, total);
    }

    (entries, skipped)
}

/// Processes one rendered page; returns `None` when nothing was
/// detected on it. The page image is dropped before returning.
fn process_page(
    number: usize,
    image: Result<RgbImage, DetectError>,
    params: &DetectionParams,
    opts: &JobOptions,
    viz_base: Option<&(PathBuf, String)>,
) -> Result<Option<PageEntry>, DetectError> {
    let raster = RasterImage::from_rgb(image?);

    let debug_dir = opts
        .debug_dir
        .as_ref()
        .map(|dir| dir.join(format!("page_{number:03}")));
    let viz_path = viz_base
        .map(|(dir, stem)| dir.join(format!("{stem}_page_{number}_detected.jpg")));

    let detections = detect_item(&raster, params, debug_dir.as_deref(), viz_path.as_deref())?;

    let entry = PageEntry {
        page: number,
        width: detections.width,
        height: detections.height,
        horizontal_lines: non_empty(detections.lines),
        rectangles: non_empty(detections.rectangles),
    };
    Ok(entry.has_detections().then_some(entry))
}

/// Directory and filename stem for per-page visualization artifacts.
fn visualization_base(path: &Path, opts: &JobOptions) -> Option<(PathBuf, String)> {
    if !opts.save_visualization {
        return None;
    }
    let dir = path.parent().unwrap_or_else(|| Path::new(".")).to_path_buf();
    let stem = path.file_stem()?.to_string_lossy().into_owned();
    Some((dir, stem))
}

/// Binds to a PDFium library, trying bundled locations before the
/// system library.
fn bind_pdfium() -> Result<Pdfium, DetectError> {
    let bindings = Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
        .or_else(|_| {
            Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("/usr/lib"))
        })
        .or_else(|_| {
            Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("/usr/local/lib"))
        })
        .or_else(|_| {
            Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(
                "/opt/homebrew/lib",
            ))
        })
        .or_else(|_| Pdfium::bind_to_system_library())
        .map_err(|e| DetectError::Pdf {
            message: format!("could not find a PDFium library: {e}"),
        })?;
    Ok(Pdfium::new(bindings))
}

/// Renders a single page to RGB pixels at the configured DPI, capped at
/// the maximum dimension.
fn render_page(page: &PdfPage, settings: &PdfRenderSettings) -> Result<RgbImage, String> {
    let width_points = page.width().value;
    let height_points = page.height().value;

    // 72 points per inch.
    let scale = settings.dpi / 72.0;
    let mut width_px = (width_points * scale) as u32;
    let mut height_px = (height_points * scale) as u32;

    if width_px > settings.max_dimension || height_px > settings.max_dimension {
        let ratio = if width_px > height_px {
            settings.max_dimension as f32 / width_px as f32
        } else {
            settings.max_dimension as f32 / height_px as f32
        };
        width_px = (width_px as f32 * ratio) as u32;
        height_px = (height_px as f32 * ratio) as u32;
    }

    let render_config = PdfRenderConfig::new()
        .set_target_width(width_px as i32)
        .set_target_height(height_px as i32)
        .render_form_data(true)
        .render_annotations(true);

    let bitmap = page
        .render_with_config(&render_config)
        .map_err(|e| e.to_string())?;

    Ok(bitmap.as_image().to_rgb8())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn blank_page() -> RgbImage {
        RgbImage::from_pixel(1000, 1400, Rgb([255, 255, 255]))
    }

    fn page_with_frame() -> RgbImage {
        let mut img = blank_page();
        for y in 200..601u32 {
            for x in 150..651u32 {
                let on_border =
                    x < 152 || y < 202 || x >= 649 || y >= 599;
                if on_border {
                    img.put_pixel(x, y, Rgb([0, 0, 0]));
                }
            }
        }
        img
    }

    fn params() -> DetectionParams {
        DetectionParams {
            min_rect_area_ratio: 0.001,
            max_rect_area_ratio: 0.5,
            ..DetectionParams::default()
        }
    }

    #[test]
    fn only_pages_with_detections_are_kept_in_order() {
        // 10 pages; only pages 1 and 3 contain a frame.
        let rendered = (1..=10usize).map(|n| {
            let img = if n == 1 || n == 3 {
                page_with_frame()
            } else {
                blank_page()
            };
            (n, Ok(img))
        });
        let (entries, skipped) = run_pages(
            rendered,
            10,
            &params(),
            &JobOptions::default(),
            None,
            None,
        );
        assert!(skipped.is_empty());
        let pages: Vec<usize> = entries.iter().map(|e| e.page).collect();
        assert_eq!(pages, vec![1, 3]);
        assert!(entries.iter().all(|e| e.rectangles.is_some()));
    }

    #[test]
    fn render_failures_are_skips_not_aborts() {
        let rendered = (1..=3usize).map(|n| {
            if n == 2 {
                (
                    n,
                    Err(DetectError::PdfRender {
                        page: n,
                        message: "render failed".to_string(),
                    }),
                )
            } else {
                (n, Ok(page_with_frame()))
            }
        });
        let (entries, skipped) = run_pages(
            rendered,
            3,
            &params(),
            &JobOptions::default(),
            None,
            None,
        );
        assert_eq!(entries.len(), 2);
        assert_eq!(skipped.len(), 1);
        assert_eq!(skipped[0].item, "page 2");
    }

    #[test]
    fn progress_fires_once_per_page_in_order() {
        let rendered = (1..=4usize).map(|n| (n, Ok(blank_page())));
        let mut calls = Vec::new();
        let mut callback = |done: usize, total: usize| calls.push((done, total));
        run_pages(
            rendered,
            4,
            &params(),
            &JobOptions::default(),
            None,
            Some(&mut callback),
        );
        assert_eq!(calls, vec![(1, 4), (2, 4), (3, 4), (4, 4)]);
    }

    #[test]
    fn cancellation_stops_between_pages() {
        use std::sync::atomic::{AtomicBool, Ordering};
        use std::sync::Arc;

        let flag = Arc::new(AtomicBool::new(false));
        let opts = JobOptions {
            cancel: Some(flag.clone()),
            ..JobOptions::default()
        };
        let cancel_after = 2usize;
        let mut calls = 0usize;
        let mut callback = |done: usize, _total: usize| {
            calls += 1;
            if done >= cancel_after {
                flag.store(true, Ordering::Relaxed);
            }
        };
        let rendered = (1..=10usize).map(|n| (n, Ok(page_with_frame())));
        let (entries, _skipped) = run_pages(
            rendered,
            10,
            &params(),
            &opts,
            None,
            Some(&mut callback),
        );
        assert_eq!(calls, 2);
        // Results accumulated before cancellation survive intact.
        assert_eq!(entries.len(), 2);
    }
}
