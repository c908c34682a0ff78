//! DPI fallback for images without a configured metadata lookup.

use std::path::Path;

/// DPI reported when no lookup is configured or metadata is absent.
/// Zero is a deliberate sentinel: consumers can tell "unknown" apart
/// from any real resolution.
pub const DPI_FALLBACK: (f64, f64) = (0.0, 0.0);

/// Returns the fallback DPI for an image file.
///
/// Pixel dimensions and detection results never depend on this value;
/// it only fills the `dpi` fields of the report.
pub fn fallback_dpi(_path: &Path) -> (f64, f64) {
    DPI_FALLBACK
}
