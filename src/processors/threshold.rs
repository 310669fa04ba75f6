//! Binarization helpers.

use image::{GrayImage, Luma};
use imageproc::contrast::otsu_level;

/// Binarizes a grayscale image with Otsu's threshold, foreground inverted.
///
/// Pixels at or below the Otsu level become 255 and the rest become 0, so
/// dark ink on a bright label ends up as bright foreground. That polarity is
/// what the projection profile and contour analysis expect.
pub fn otsu_binarize_inverted(image: &GrayImage) -> GrayImage {
    let level = otsu_level(image);
    map_binary(image, |v| v <= level)
}

/// Binarizes with a fixed threshold, keeping bright pixels as foreground.
pub fn binarize_above(image: &GrayImage, threshold: u8) -> GrayImage {
    map_binary(image, |v| v > threshold)
}

fn map_binary(image: &GrayImage, is_foreground: impl Fn(u8) -> bool) -> GrayImage {
    let mut output = GrayImage::new(image.width(), image.height());
    for (x, y, pixel) in image.enumerate_pixels() {
        let value = if is_foreground(pixel[0]) { 255 } else { 0 };
        output.put_pixel(x, y, Luma([value]));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn otsu_inverts_dark_ink_to_bright_foreground() {
        let mut image = GrayImage::from_pixel(10, 10, Luma([230]));
        for x in 2..8 {
            image.put_pixel(x, 5, Luma([20]));
        }
        let binary = otsu_binarize_inverted(&image);
        assert_eq!(binary.get_pixel(4, 5)[0], 255);
        assert_eq!(binary.get_pixel(0, 0)[0], 0);
    }

    #[test]
    fn fixed_threshold_keeps_bright_pixels() {
        let mut image = GrayImage::from_pixel(4, 4, Luma([10]));
        image.put_pixel(1, 1, Luma([200]));
        let binary = binarize_above(&image, 50);
        assert_eq!(binary.get_pixel(1, 1)[0], 255);
        assert_eq!(binary.get_pixel(0, 0)[0], 0);
    }
}
