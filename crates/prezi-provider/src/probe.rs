//! Image dimension probing
//!
//! Only the image header is decoded; pixel data is never loaded.

use crate::error::ProbeError;
use image::ImageReader;
use serde::{Deserialize, Serialize};
use std::io::Cursor;

/// Pixel dimensions of an image
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageDimensions {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl ImageDimensions {
    /// Unknown dimensions
    pub const UNKNOWN: Self = Self {
        width: 0,
        height: 0,
    };

    /// Create new dimensions
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Check if the dimensions are unknown (0×0)
    pub fn is_unknown(&self) -> bool {
        *self == Self::UNKNOWN
    }
}

/// Read width and height from an encoded image's header
///
/// The format is guessed from the leading bytes; JPEG, PNG, GIF and WebP are
/// recognized.
pub fn probe_dimensions(bytes: &[u8]) -> Result<ImageDimensions, ProbeError> {
    let reader = ImageReader::new(Cursor::new(bytes)).with_guessed_format()?;
    let (width, height) = reader.into_dimensions()?;
    Ok(ImageDimensions { width, height })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, RgbImage};

    fn encode(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
        let mut bytes = Cursor::new(Vec::new());
        RgbImage::new(width, height)
            .write_to(&mut bytes, format)
            .unwrap();
        bytes.into_inner()
    }

    #[test]
    fn test_probe_png() {
        let bytes = encode(200, 100, ImageFormat::Png);
        assert_eq!(probe_dimensions(&bytes).unwrap(), ImageDimensions::new(200, 100));
    }

    #[test]
    fn test_probe_jpeg() {
        let bytes = encode(64, 48, ImageFormat::Jpeg);
        assert_eq!(probe_dimensions(&bytes).unwrap(), ImageDimensions::new(64, 48));
    }

    #[test]
    fn test_probe_rejects_non_image() {
        assert!(probe_dimensions(b"<html>not an image</html>").is_err());
        assert!(probe_dimensions(&[]).is_err());
    }

    #[test]
    fn test_unknown_dimensions() {
        assert!(ImageDimensions::UNKNOWN.is_unknown());
        assert!(ImageDimensions::default().is_unknown());
        assert!(!ImageDimensions::new(1, 1).is_unknown());
    }
}
