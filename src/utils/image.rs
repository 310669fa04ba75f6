//! Image loading and colorspace helpers.

use crate::core::{OCRError, OcrResult};
use image::{DynamicImage, GrayImage, RgbImage};
use std::path::Path;

/// Loads an image from a file path and converts it to RGB.
///
/// # Arguments
///
/// * `path` - The path to the image file.
///
/// # Returns
///
/// A `Result` containing the RGB image, or an `OCRError` if the file cannot
/// be read or decoded.
pub fn load_image(path: impl AsRef<Path>) -> OcrResult<RgbImage> {
    let path = path.as_ref();
    let dynamic = image::open(path).map_err(OCRError::ImageLoad)?;
    Ok(dynamic_to_rgb(dynamic))
}

/// Converts a dynamic image to RGB, avoiding a copy when already RGB.
pub fn dynamic_to_rgb(image: DynamicImage) -> RgbImage {
    match image {
        DynamicImage::ImageRgb8(rgb) => rgb,
        other => other.to_rgb8(),
    }
}

/// Converts an RGB image to a single-channel grayscale image.
pub fn rgb_to_gray(image: &RgbImage) -> GrayImage {
    image::imageops::grayscale(image)
}
