//! Job-level options, progress reporting, and skip records.

use crate::pipeline::result::ResultSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Resolves the DPI metadata of a standalone image file.
///
/// Metadata parsing is an external collaborator; the pipeline only
/// consumes the lookup. The default lookup returns the documented
/// fallback `(0.0, 0.0)`.
pub type DpiLookup = Arc<dyn Fn(&Path) -> (f64, f64) + Send + Sync>;

/// Options shared by all items of a job.
pub struct JobOptions {
    /// Directory for intermediate mask dumps; nothing is written when
    /// unset. Write failures are warnings, never fatal.
    pub debug_dir: Option<PathBuf>,
    /// When set, an annotated copy of each processed image is saved
    /// next to its source (`<stem>_detected.jpg`).
    pub save_visualization: bool,
    /// Checked between items; setting the flag stops the job after the
    /// current item without discarding accumulated results.
    pub cancel: Option<Arc<AtomicBool>>,
    /// DPI metadata lookup for standalone images.
    pub dpi_lookup: Option<DpiLookup>,
}

impl Default for JobOptions {
    fn default() -> Self {
        Self {
            debug_dir: None,
            save_visualization: false,
            cancel: None,
            dpi_lookup: None,
        }
    }
}

impl fmt::Debug for JobOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JobOptions")
            .field("debug_dir", &self.debug_dir)
            .field("save_visualization", &self.save_visualization)
            .field("cancel", &self.cancel.is_some())
            .field("dpi_lookup", &self.dpi_lookup.is_some())
            .finish()
    }
}

impl JobOptions {
    /// True when a cancellation flag is set and has been raised.
    pub fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .map(|flag| flag.load(Ordering::Relaxed))
            .unwrap_or(false)
    }

    /// Resolves the DPI of an image file through the configured lookup,
    /// or the fallback when none is configured.
    pub fn resolve_dpi(&self, path: &Path) -> (f64, f64) {
        match &self.dpi_lookup {
            Some(lookup) => lookup(path),
            None => crate::utils::dpi::fallback_dpi(path),
        }
    }
}

/// Progress callback: `(items_completed, items_total)`, invoked
/// synchronously exactly once per item, with strictly increasing counts.
pub type Progress<'a> = Option<&'a mut dyn FnMut(usize, usize)>;

/// Invokes the progress callback when one is present.
pub(crate) fn report_progress(progress: &mut Progress<'_>, done: usize, total: usize) {
    if let Some(callback) = progress {
        callback(done, total);
    }
}

/// An item the orchestrator gave up on without aborting the batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedItem {
    /// Filename or `page N` label of the skipped item.
    pub item: String,
    /// Why the item was skipped.
    pub reason: String,
}

/// The outcome of a batch job: the structured results plus the items
/// that were skipped along the way. Skips are surfaced here and in the
/// logs, never inside the JSON result.
#[derive(Debug)]
pub struct BatchOutcome {
    /// The structured detection results.
    pub results: ResultSet,
    /// Per-item failures recorded during the run.
    pub skipped: Vec<SkippedItem>,
}
