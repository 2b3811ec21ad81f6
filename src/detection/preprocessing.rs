use image::{DynamicImage, GrayImage, RgbImage};
use imageproc::contrast::{threshold, ThresholdType};
use imageproc::filter::median_filter;

use crate::error::RecognitionError;

/// Frame after border trim and denoising, plus where it sits in the source
#[derive(Debug, Clone)]
pub struct Preprocessed {
    pub color: RgbImage,
    pub gray: GrayImage,
    /// Offset of `color`'s origin in the source image
    pub offset: (u32, u32),
}

/// Convert image to grayscale
pub fn to_grayscale(img: &RgbImage) -> GrayImage {
    image::imageops::grayscale(img)
}

/// Pixels above `thresh` become 255, the rest 0
pub fn binarize(img: &GrayImage, thresh: u8) -> GrayImage {
    threshold(img, thresh, ThresholdType::Binary)
}

/// Swap foreground and background of a binary image
pub fn invert(img: &GrayImage) -> GrayImage {
    let mut inverted = img.clone();
    image::imageops::invert(&mut inverted);
    inverted
}

/// Cut `border` pixels from each edge and apply a median filter.
///
/// Fails when nothing is left after the trim.
pub fn preprocess(
    img: &DynamicImage,
    border: u32,
    median_radius: u32,
) -> Result<Preprocessed, RecognitionError> {
    let (width, height) = (img.width(), img.height());
    if width <= 2 * border || height <= 2 * border {
        return Err(RecognitionError::EmptyImage { width, height });
    }

    let rgb = img.to_rgb8();
    let trimmed = image::imageops::crop_imm(
        &rgb,
        border,
        border,
        width - 2 * border,
        height - 2 * border,
    )
    .to_image();

    let color = median_filter(&trimmed, median_radius, median_radius);
    let gray = to_grayscale(&color);

    Ok(Preprocessed {
        color,
        gray,
        offset: (border, border),
    })
}
