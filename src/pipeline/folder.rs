//! Batch orchestration over standalone images.

use crate::core::{DetectError, DetectionParams, RasterImage};
use crate::pipeline::item::detect_item;
use crate::pipeline::job::{report_progress, BatchOutcome, JobOptions, Progress, SkippedItem};
use crate::pipeline::result::{non_empty, FolderReport, ImageDpi, ImageEntry, ResultSet};
use crate::utils::round3;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// File extensions the folder scanner accepts, lowercase.
const SUPPORTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tif", "tiff", "webp"];

/// Detects structures in every supported image in a folder.
///
/// Items are processed one at a time in filename order. A file that
/// fails to load or binarize is recorded as a skip and the batch
/// continues; a missing root folder aborts the whole job. An empty
/// folder completes with an empty result set. Every successfully
/// processed file gets an entry even when nothing was detected, so
/// interactive callers see one entry per input.
///
/// The progress callback fires exactly once per item, skip or not.
pub fn process_folder(
    root: &Path,
    params: &DetectionParams,
    opts: &JobOptions,
    mut progress: Progress<'_>,
) -> Result<BatchOutcome, DetectError> {
    params.validate()?;
    if !root.is_dir() {
        return Err(DetectError::FileNotFound {
            path: root.to_path_buf(),
        });
    }

    let files = list_supported_files(root)?;
    let total = files.len();
    info!(root = %root.display(), total, "starting folder job");

    let mut result = BTreeMap::new();
    let mut skipped = Vec::new();
    let mut done = 0usize;

    for name in files {
        if opts.is_cancelled() {
            info!(done, total, "folder job cancelled");
            break;
        }
        let path = root.join(&name);
        done += 1;
        match process_one(&path, &name, params, opts) {
            Ok(entry) => {
                result.insert(name, entry);
            }
            Err(err) => {
                warn!(item = %name, error = %err, "skipping item");
                skipped.push(SkippedItem {
                    item: name,
                    reason: err.to_string(),
                });
            }
        }
        report_progress(&mut progress, done, total);
    }

    Ok(BatchOutcome {
        results: ResultSet::Folder(FolderReport {
            result,
            detection_params: params.clone(),
        }),
        skipped,
    })
}

/// Detects structures in a single image file.
///
/// Produces a one-entry folder-mode result. Unlike folder mode, the
/// input file is the whole job, so a missing or undecodable file is
/// fatal rather than a recorded skip.
pub fn process_single_image(
    path: &Path,
    params: &DetectionParams,
    opts: &JobOptions,
    mut progress: Progress<'_>,
) -> Result<BatchOutcome, DetectError> {
    params.validate()?;
    if !path.is_file() {
        return Err(DetectError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let entry = process_one(path, &name, params, opts)?;
    report_progress(&mut progress, 1, 1);

    let mut result = BTreeMap::new();
    result.insert(name, entry);
    Ok(BatchOutcome {
        results: ResultSet::Folder(FolderReport {
            result,
            detection_params: params.clone(),
        }),
        skipped: Vec::new(),
    })
}

/// Loads and detects one file; the raster is dropped before returning.
fn process_one(
    path: &Path,
    name: &str,
    params: &DetectionParams,
    opts: &JobOptions,
) -> Result<ImageEntry, DetectError> {
    let raster = RasterImage::open(path)?;

    let stem = Path::new(name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| name.to_string());
    let debug_dir = opts.debug_dir.as_ref().map(|dir| dir.join(&stem));
    let viz_path = visualization_path(path, opts);

    let detections = detect_item(&raster, params, debug_dir.as_deref(), viz_path.as_deref())?;
    let (dpi_x, dpi_y) = opts.resolve_dpi(path);

    Ok(ImageEntry {
        dpi: ImageDpi {
            x: round3(dpi_x),
            y: round3(dpi_y),
            width: detections.width,
            height: detections.height,
        },
        horizontal_lines: non_empty(detections.lines),
        rectangles: non_empty(detections.rectangles),
    })
}

/// `<stem>_detected.jpg` next to the source file, when enabled.
fn visualization_path(path: &Path, opts: &JobOptions) -> Option<PathBuf> {
    if !opts.save_visualization {
        return None;
    }
    let stem = path.file_stem()?.to_string_lossy();
    Some(path.with_file_name(format!("{stem}_detected.jpg")))
}

/// Lists supported image filenames in a folder, sorted.
fn list_supported_files(root: &Path) -> Result<Vec<String>, DetectError> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(root)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        let supported = Path::new(&name)
            .extension()
            .map(|ext| {
                let ext = ext.to_string_lossy().to_lowercase();
                SUPPORTED_EXTENSIONS.contains(&ext.as_str())
            })
            .unwrap_or(false);
        if supported {
            files.push(name);
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_filter_is_case_insensitive() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("a.PNG"), b"").unwrap();
        std::fs::write(tmp.path().join("b.jpeg"), b"").unwrap();
        std::fs::write(tmp.path().join("notes.txt"), b"").unwrap();
        std::fs::write(tmp.path().join("noext"), b"").unwrap();
        let files = list_supported_files(tmp.path()).unwrap();
        assert_eq!(files, vec!["a.PNG".to_string(), "b.jpeg".to_string()]);
    }

    #[test]
    fn missing_root_is_fatal() {
        let err = process_folder(
            Path::new("/definitely/not/here"),
            &DetectionParams::default(),
            &JobOptions::default(),
            None,
        )
        .unwrap_err();
        assert!(matches!(err, DetectError::FileNotFound { .. }));
    }

    #[test]
    fn invalid_params_abort_before_io() {
        let params = DetectionParams {
            min_rect_area_ratio: 0.9,
            max_rect_area_ratio: 0.1,
            ..DetectionParams::default()
        };
        let err = process_folder(
            Path::new("/definitely/not/here"),
            &params,
            &JobOptions::default(),
            None,
        )
        .unwrap_err();
        assert!(matches!(err, DetectError::Config { .. }));
    }

    #[test]
    fn empty_folder_completes_with_empty_result() {
        let tmp = tempfile::tempdir().unwrap();
        let outcome = process_folder(
            tmp.path(),
            &DetectionParams::default(),
            &JobOptions::default(),
            None,
        )
        .unwrap();
        assert!(outcome.results.is_empty());
        assert!(outcome.skipped.is_empty());
    }
}
