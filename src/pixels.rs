use std::path::Path;

use image::{DynamicImage, RgbImage};
use itertools::iproduct;

use crate::error::{Result, SepiaError};

pub type SubPixel = f32;
pub type Pixel = [SubPixel; CHANNELS_PER_PIXEL];
pub type ImageBuffer = Vec<Pixel>;

pub const CHANNELS_PER_PIXEL: usize = 3;
pub const R_LUMA_WEIGHT: SubPixel = 0.299;
pub const G_LUMA_WEIGHT: SubPixel = 0.587;
pub const B_LUMA_WEIGHT: SubPixel = 0.114;

pub trait PixelOps {
    fn luminance(self) -> SubPixel;
    fn average(self) -> SubPixel;
}

impl PixelOps for Pixel {
    // red + green first, then blue; the truncation downstream depends on this order
    fn luminance(self) -> SubPixel {
        let [r, g, b] = self;
        let y = R_LUMA_WEIGHT*r + G_LUMA_WEIGHT*g + B_LUMA_WEIGHT*b;
        return y
    }

    fn average(self) -> SubPixel {
        let [r, g, b] = self;
        return (r + g + b) / 3.0
    }
}

/// Interleaved RGB samples of one image, row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct PixelBuffer {
    pub data: ImageBuffer,
    pub width: usize,
    pub height: usize,
}

impl PixelBuffer {
    pub fn new(data: ImageBuffer, width: usize, height: usize) -> Result<PixelBuffer> {
        let expected = width * height;
        if expected == 0 || data.len() != expected {
            return Err(SepiaError::DimensionMismatch {
                expected: expected * CHANNELS_PER_PIXEL,
                actual: data.len() * CHANNELS_PER_PIXEL,
            });
        }
        Ok(PixelBuffer { data, width, height })
    }

    /// Decodes `path` and extracts its RGB samples. Alpha is discarded.
    pub fn open(path: impl AsRef<Path>) -> Result<PixelBuffer> {
        let path = path.as_ref();
        let decoded = image::open(path).map_err(|e| SepiaError::Decode {
            path: path.to_path_buf(),
            source: Box::new(e),
        })?;
        PixelBuffer::from_image(&decoded, path)
    }

    /// Extracts samples row by row, columns inner. `origin` only labels errors.
    pub fn from_image(decoded: &DynamicImage, origin: impl AsRef<Path>) -> Result<PixelBuffer> {
        let rgb = decoded.to_rgb8();
        let (width, height) = rgb.dimensions();
        if width == 0 || height == 0 {
            return Err(SepiaError::Decode {
                path: origin.as_ref().to_path_buf(),
                source: format!("image has zero dimensions ({width}x{height})").into(),
            });
        }

        let data = iproduct!(0..height, 0..width)
            .map(|(y, x)| rgb.get_pixel(x, y).0.map(SubPixel::from))
            .collect();

        PixelBuffer::new(data, width as usize, height as usize)
    }

    /// Rebuilds an 8-bit image. Samples are expected to already lie in [0, 255].
    pub fn to_image(&self) -> Result<RgbImage> {
        let expected = self.width * self.height * CHANNELS_PER_PIXEL;
        let actual = self.data.len() * CHANNELS_PER_PIXEL;
        let mismatch = SepiaError::DimensionMismatch { expected, actual };
        if expected != actual {
            return Err(mismatch);
        }

        let (Ok(width), Ok(height)) = (u32::try_from(self.width), u32::try_from(self.height)) else {
            return Err(mismatch);
        };
        let samples: Vec<u8> = self
            .data
            .iter()
            .flat_map(|pixel| pixel.map(|sub_pixel| sub_pixel as u8))
            .collect();

        RgbImage::from_vec(width, height, samples).ok_or(mismatch)
    }
}
