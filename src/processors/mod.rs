//! Pure, CPU-bound transforms over in-memory masks.
//!
//! None of these functions touch the filesystem; they take a decoded
//! image or binary mask and return detections. The pipeline module
//! wires them together per item.

pub mod binarize;
pub mod geometry;
pub mod lines;
pub mod rectangles;

pub use binarize::binarize;
pub use geometry::Detection;
pub use lines::detect_lines;
pub use rectangles::detect_rectangles;
