//! Structural primitive detection for scanned documents.
//!
//! This crate locates long horizontal rules and rectangular frames in
//! raster images and rasterized PDF pages, producing bounding boxes for
//! downstream table and form layout extraction. Detection runs on a
//! binarized mask: a directional morphological opening isolates
//! horizontal runs, and polygon approximation over contours finds
//! four-sided frames.
//!
//! # Main APIs
//!
//! - [`pipeline::process_single_image`] / [`pipeline::process_folder`] -
//!   detection over standalone images
//! - [`pipeline::process_pdf`] - page-by-page detection over a PDF
//! - [`processors::detect_lines`] / [`processors::detect_rectangles`] -
//!   the underlying pure detectors
//!
//! # Example
//!
//! ```no_run
//! use linescan::core::DetectionParams;
//! use linescan::pipeline::{process_folder, JobOptions};
//!
//! let params = DetectionParams::default();
//! params.validate().expect("invalid detection params");
//! let outcome = process_folder(
//!     "scans/".as_ref(),
//!     &params,
//!     &JobOptions::default(),
//!     None,
//! )
//! .expect("folder processing failed");
//! println!("{}", outcome.results.to_json_pretty().unwrap());
//! ```

pub mod core;
pub mod pipeline;
pub mod processors;
pub mod utils;

pub use core::{DetectError, DetectionParams, RasterImage};
pub use pipeline::{
    BatchOutcome, JobOptions, PdfRenderSettings, ResultSet, SkippedItem,
    process_folder, process_pdf, process_single_image,
};
pub use processors::{Detection, binarize, detect_lines, detect_rectangles};
