//! Batch orchestration: folder, single-image, and PDF jobs.
//!
//! The orchestrators share one per-item detection path and one failure
//! policy: bad input discovered up front is fatal, a bad item inside a
//! batch is a recorded skip.

pub mod folder;
mod item;
pub mod job;
pub mod pdf;
pub mod result;

pub use folder::{process_folder, process_single_image};
pub use job::{BatchOutcome, DpiLookup, JobOptions, Progress, SkippedItem};
pub use pdf::{process_pdf, process_pdf_with_settings, PdfRenderSettings};
pub use result::{Dpi, FolderReport, ImageDpi, ImageEntry, PageEntry, PdfReport, ResultSet};
