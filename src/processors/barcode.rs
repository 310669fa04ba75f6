//! Barcode-region masking.
//!
//! Product labels often carry a barcode near the left or right margin whose
//! tall parallel bars dominate a projection profile and drag the skew search
//! toward the bars instead of the text. This pass detects those bars inside
//! each margin band and paints them out before skew estimation. The skew
//! correction itself then runs on the original, unmasked image.

use crate::core::BarcodeConfig;
use crate::processors::morphology::open_rect;
use crate::processors::threshold::binarize_above;
use image::{GrayImage, Luma};
use tracing::debug;

/// Returns a copy of the image with barcode bars in the margin bands erased.
///
/// Each margin band (a fraction of the image width on the left and on the
/// right) is inverted so ink is bright, then opened with a thin vertical
/// kernel. Only strokes at least as tall as the kernel survive the opening.
/// If the surviving pixels cover more than the configured density the band
/// is judged to hold a barcode and those pixels are set to white in the
/// output. Images without barcode bars are returned unchanged.
pub fn remove_barcodes(image: &GrayImage, config: &BarcodeConfig) -> GrayImage {
    let (width, height) = image.dimensions();
    let band_width = (width as f32 * config.edge_band_fraction) as u32;

    let mut output = image.clone();
    if band_width == 0 || height == 0 {
        return output;
    }

    let bands = [(0u32, band_width), (width - band_width, band_width)];
    for (band_x, band_w) in bands {
        mask_band(image, &mut output, band_x, band_w, config);
    }
    output
}

/// Detects and erases vertical bars inside one margin band.
fn mask_band(
    image: &GrayImage,
    output: &mut GrayImage,
    band_x: u32,
    band_w: u32,
    config: &BarcodeConfig,
) {
    let height = image.height();

    let mut inverted = GrayImage::new(band_w, height);
    for y in 0..height {
        for x in 0..band_w {
            let v = image.get_pixel(band_x + x, y)[0];
            inverted.put_pixel(x, y, Luma([255 - v]));
        }
    }

    let opened = open_rect(&inverted, 1, config.kernel_height);
    let lines = binarize_above(&opened, config.line_threshold);

    let total = (band_w * height) as f32;
    let line_pixels = lines.pixels().filter(|p| p[0] > 0).count();
    let density = line_pixels as f32 / total;

    debug!(band_x, density, "barcode band density");

    if density <= config.density_threshold {
        return;
    }

    for y in 0..height {
        for x in 0..band_w {
            if lines.get_pixel(x, y)[0] > 0 {
                output.put_pixel(band_x + x, y, Luma([255]));
            }
        }
    }
}
