//! Deterministic enhancement for the recognition stage.
//!
//! The enhancement chain upsamples the corrected label, smooths sensor
//! noise, evens out illumination with CLAHE, and sharpens stroke edges. The
//! same input always produces the same output, so recognition results stay
//! reproducible across runs.

use crate::core::EnhanceConfig;
use image::imageops::{self, FilterType};
use image::{GrayImage, Luma};
use imageproc::filter::{filter3x3, gaussian_blur_f32};
use tracing::debug;

const SHARPEN_KERNEL: [f32; 9] = [-1.0, -1.0, -1.0, -1.0, 9.0, -1.0, -1.0, -1.0, -1.0];

/// Prepares a grayscale crop for text recognition.
///
/// Applies, in order: Catmull-Rom upscaling by the configured factor, a
/// Gaussian denoise, contrast-limited adaptive histogram equalization over
/// the configured tile grid, and a 3x3 sharpening convolution.
pub fn enhance_for_recognition(image: &GrayImage, config: &EnhanceConfig) -> GrayImage {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return image.clone();
    }

    let upscaled = imageops::resize(
        image,
        width * config.upscale_factor,
        height * config.upscale_factor,
        FilterType::CatmullRom,
    );
    let denoised = gaussian_blur_f32(&upscaled, config.denoise_sigma);
    let equalized = apply_clahe(&denoised, config.clahe_clip_limit, config.clahe_tile_grid);
    let sharpened = filter3x3::<Luma<u8>, f32, u8>(&equalized, &SHARPEN_KERNEL);

    debug!(
        from = ?(width, height),
        to = ?sharpened.dimensions(),
        "enhanced crop"
    );
    sharpened
}

/// Contrast-limited adaptive histogram equalization.
///
/// The image is divided into a `grid.0 x grid.1` grid of tiles and each tile
/// is equalized against its own clipped histogram. The clip limit is a
/// multiple of the uniform histogram level; clipped mass is redistributed
/// evenly across all bins before the CDF is built.
fn apply_clahe(image: &GrayImage, clip_limit: f32, grid: (u32, u32)) -> GrayImage {
    let (width, height) = image.dimensions();

    let tile_width = width.div_ceil(grid.0).max(1);
    let tile_height = height.div_ceil(grid.1).max(1);
    let tiles_x = width.div_ceil(tile_width);
    let tiles_y = height.div_ceil(tile_height);

    let mut output = GrayImage::new(width, height);

    for tile_y in 0..tiles_y {
        for tile_x in 0..tiles_x {
            let x0 = tile_x * tile_width;
            let y0 = tile_y * tile_height;
            let x1 = (x0 + tile_width).min(width);
            let y1 = (y0 + tile_height).min(height);
            equalize_tile(image, &mut output, x0, y0, x1, y1, clip_limit);
        }
    }

    output
}

/// Equalizes one tile in place in the output image.
fn equalize_tile(
    image: &GrayImage,
    output: &mut GrayImage,
    x0: u32,
    y0: u32,
    x1: u32,
    y1: u32,
    clip_limit: f32,
) {
    let total_pixels = ((x1 - x0) * (y1 - y0)) as f32;

    let mut histogram = [0u32; 256];
    for y in y0..y1 {
        for x in x0..x1 {
            histogram[image.get_pixel(x, y)[0] as usize] += 1;
        }
    }

    let clip_limit_pixels = (clip_limit * (total_pixels / 256.0)).round() as u32;
    let mut excess = 0u32;
    for count in &mut histogram {
        if *count > clip_limit_pixels {
            excess += *count - clip_limit_pixels;
            *count = clip_limit_pixels;
        }
    }

    // Redistribute the clipped mass uniformly.
    let increment = excess / 256;
    let mut remainder = excess % 256;
    for count in &mut histogram {
        *count += increment;
        if remainder > 0 {
            *count += 1;
            remainder -= 1;
        }
    }

    let mut cdf = [0.0f32; 256];
    let mut cumulative = 0.0;
    for (i, &count) in histogram.iter().enumerate() {
        cumulative += count as f32 / total_pixels;
        cdf[i] = cumulative;
    }

    for y in y0..y1 {
        for x in x0..x1 {
            let intensity = image.get_pixel(x, y)[0] as usize;
            let mapped = (cdf[intensity] * 255.0).round().clamp(0.0, 255.0) as u8;
            output.put_pixel(x, y, Luma([mapped]));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_scales_by_upscale_factor() {
        let image = GrayImage::from_pixel(40, 24, Luma([128]));
        let enhanced = enhance_for_recognition(&image, &EnhanceConfig::default());
        assert_eq!(enhanced.dimensions(), (120, 72));
    }

    #[test]
    fn empty_image_passes_through() {
        let image = GrayImage::new(0, 0);
        let enhanced = enhance_for_recognition(&image, &EnhanceConfig::default());
        assert_eq!(enhanced.dimensions(), (0, 0));
    }

    #[test]
    fn enhancement_is_deterministic() {
        let mut image = GrayImage::from_pixel(32, 32, Luma([180]));
        for x in 8..24 {
            image.put_pixel(x, 16, Luma([40]));
        }
        let config = EnhanceConfig::default();
        let first = enhance_for_recognition(&image, &config);
        let second = enhance_for_recognition(&image, &config);
        assert_eq!(first, second);
    }

    #[test]
    fn clahe_keeps_uniform_tiles_uniform() {
        let image = GrayImage::from_pixel(64, 64, Luma([90]));
        let equalized = apply_clahe(&image, 3.0, (8, 8));
        let first = equalized.get_pixel(0, 0)[0];
        assert!(equalized.pixels().all(|p| p[0] == first));
    }

    #[test]
    fn clahe_stretches_low_contrast_tile() {
        let mut image = GrayImage::from_pixel(32, 32, Luma([100]));
        for y in 0..32 {
            for x in 0..16 {
                image.put_pixel(x, y, Luma([110]));
            }
        }
        let equalized = apply_clahe(&image, 3.0, (1, 1));
        let dark = equalized.get_pixel(20, 16)[0];
        let bright = equalized.get_pixel(4, 16)[0];
        let spread = bright as i32 - dark as i32;
        assert!(spread > 10, "spread was {spread}");
    }
}
