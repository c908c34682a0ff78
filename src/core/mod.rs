//! Core types shared across the detection pipeline.
//!
//! This module contains the foundational pieces every other module builds on:
//! - Error handling (`DetectError` and per-item skip semantics)
//! - The immutable detection parameter set with up-front validation
//! - The typed raster image value used by the processing steps

pub mod errors;
pub mod params;
pub mod raster;

pub use errors::DetectError;
pub use params::DetectionParams;
pub use raster::RasterImage;
