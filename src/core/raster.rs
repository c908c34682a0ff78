//! The typed raster image consumed by the processing steps.

use crate::core::errors::DetectError;
use image::{DynamicImage, GrayImage, RgbImage};
use std::path::Path;

/// A decoded raster image with an explicit channel layout.
///
/// Instances are transient: one is created per source item (file or PDF
/// page) and dropped before the next item loads, so peak memory stays
/// bounded by a single image plus its masks.
#[derive(Debug, Clone)]
pub struct RasterImage {
    data: Vec<u8>,
    width: u32,
    height: u32,
    channels: u8,
}

impl RasterImage {
    /// Creates a raster image from a raw interleaved pixel buffer.
    ///
    /// The buffer length must equal `width * height * channels`.
    pub fn from_raw(
        data: Vec<u8>,
        width: u32,
        height: u32,
        channels: u8,
    ) -> Result<Self, DetectError> {
        let expected = width as usize * height as usize * channels as usize;
        if data.len() != expected {
            return Err(DetectError::UnsupportedFormat {
                reason: format!(
                    "buffer length {} does not match {}x{}x{}",
                    data.len(),
                    width,
                    height,
                    channels
                ),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            channels,
        })
    }

    /// Loads and decodes an image file.
    ///
    /// Grayscale sources keep a single channel; everything else is
    /// normalized to 3-channel RGB at decode time.
    pub fn open(path: &Path) -> Result<Self, DetectError> {
        let img = image::open(path).map_err(|source| DetectError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_dynamic(img))
    }

    /// Converts a decoded [`DynamicImage`] into a raster image.
    pub fn from_dynamic(img: DynamicImage) -> Self {
        match img {
            DynamicImage::ImageLuma8(gray) => Self::from_gray(gray),
            other => Self::from_rgb(other.to_rgb8()),
        }
    }

    /// Wraps an 8-bit RGB buffer (e.g. a rendered PDF page).
    pub fn from_rgb(img: RgbImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            data: img.into_raw(),
            width,
            height,
            channels: 3,
        }
    }

    /// Wraps an 8-bit grayscale buffer.
    pub fn from_gray(img: GrayImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            data: img.into_raw(),
            width,
            height,
            channels: 1,
        }
    }

    /// Image width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of interleaved channels (1 for grayscale, 3 for RGB).
    pub fn channels(&self) -> u8 {
        self.channels
    }

    /// Raw interleaved pixel data.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns a view of this image as an [`RgbImage`] for rendering,
    /// expanding grayscale to three channels when needed.
    pub fn to_rgb(&self) -> Option<RgbImage> {
        match self.channels {
            3 => RgbImage::from_raw(self.width, self.height, self.data.clone()),
            1 => {
                let gray = GrayImage::from_raw(self.width, self.height, self.data.clone())?;
                Some(DynamicImage::ImageLuma8(gray).to_rgb8())
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn from_raw_validates_buffer_length() {
        assert!(RasterImage::from_raw(vec![0; 12], 2, 2, 3).is_ok());
        assert!(RasterImage::from_raw(vec![0; 11], 2, 2, 3).is_err());
    }

    #[test]
    fn gray_source_keeps_one_channel() {
        let gray = GrayImage::from_pixel(4, 3, Luma([200]));
        let raster = RasterImage::from_dynamic(DynamicImage::ImageLuma8(gray));
        assert_eq!(raster.channels(), 1);
        assert_eq!((raster.width(), raster.height()), (4, 3));
    }

    #[test]
    fn rgba_source_is_normalized_to_rgb() {
        let rgba = image::RgbaImage::from_pixel(2, 2, image::Rgba([10, 20, 30, 255]));
        let raster = RasterImage::from_dynamic(DynamicImage::ImageRgba8(rgba));
        assert_eq!(raster.channels(), 3);
        assert_eq!(raster.data().len(), 2 * 2 * 3);
    }

    #[test]
    fn to_rgb_expands_grayscale() {
        let raster = RasterImage::from_raw(vec![128; 6], 3, 2, 1).unwrap();
        let rgb = raster.to_rgb().unwrap();
        assert_eq!(rgb.get_pixel(0, 0).0, [128, 128, 128]);
    }
}
