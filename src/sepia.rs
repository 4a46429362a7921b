use serde::{Deserialize, Serialize};

use crate::conditional_paralell::for_each_pixel;
use crate::pixels::{Pixel, PixelBuffer, PixelOps, SubPixel};

pub const MAX_CHANNEL: i32 = 255;

/// Suitable depth is 20, 0 gives a black-and-white image. Suitable intensity is 80.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct ToneParameters {
    pub depth: i32,
    pub intensity: i32,
}

impl Default for ToneParameters {
    fn default() -> Self {
        ToneParameters {
            depth: 20,
            intensity: 80,
        }
    }
}

/// How a pixel is collapsed to a single gray value before toning.
#[derive(Serialize, Deserialize, clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum GrayscaleMode {
    /// 0.299 R + 0.587 G + 0.114 B
    #[default]
    Weighted,
    /// (R + G + B) / 3
    Average,
}

impl GrayscaleMode {
    pub fn gray(self, pixel: Pixel) -> SubPixel {
        match self {
            GrayscaleMode::Weighted => pixel.luminance(),
            GrayscaleMode::Average => pixel.average(),
        }
    }
}

/// Maps one gray value to its sepia triple.
///
/// Red and green only get the depth bias. Blue is capped at 255 first, then
/// darkened by `intensity` and clamped again.
pub fn tone(gray: SubPixel, params: ToneParameters) -> [u8; 3] {
    // truncates toward zero
    let base = gray as i32;

    let r = base.saturating_add(params.depth.saturating_mul(2)).clamp(0, MAX_CHANNEL);
    let g = base.saturating_add(params.depth).clamp(0, MAX_CHANNEL);
    let b = base
        .min(MAX_CHANNEL)
        .saturating_sub(params.intensity)
        .clamp(0, MAX_CHANNEL);

    return [r as u8, g as u8, b as u8]
}

pub fn sepia_pixel(pixel: [u8; 3], params: ToneParameters, mode: GrayscaleMode) -> [u8; 3] {
    tone(mode.gray(pixel.map(SubPixel::from)), params)
}

/// Gray pass: every pixel becomes `[gray, gray, gray]`.
pub fn set_gray(buffer: &mut PixelBuffer, mode: GrayscaleMode) {
    for_each_pixel(&mut buffer.data, |pixel| {
        let gray = mode.gray(*pixel);
        *pixel = [gray; 3];
    });
}

/// Tone pass over a buffer already reduced by [`set_gray`].
pub fn apply_tone(buffer: &mut PixelBuffer, params: ToneParameters) {
    for_each_pixel(&mut buffer.data, |pixel| {
        *pixel = tone(pixel[0], params).map(SubPixel::from);
    });
}

pub fn sepia_tone(buffer: &mut PixelBuffer, params: ToneParameters, mode: GrayscaleMode) {
    set_gray(buffer, mode);
    apply_tone(buffer, params);
}
