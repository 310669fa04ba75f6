//! Grayscale morphology with rectangular structuring elements.
//!
//! Rectangular kernels are separable, so erosion and dilation run as a
//! horizontal pass followed by a vertical pass. Borders replicate the edge
//! pixel, matching the behavior the estimators were tuned against.

use image::GrayImage;

#[derive(Clone, Copy, PartialEq)]
enum MorphOp {
    Erode,
    Dilate,
}

/// Erodes an image with a `width x height` rectangular kernel.
pub fn erode_rect(image: &GrayImage, width: u32, height: u32) -> GrayImage {
    let horizontal = morph_pass_horizontal(image, width, MorphOp::Erode);
    morph_pass_vertical(&horizontal, height, MorphOp::Erode)
}

/// Dilates an image with a `width x height` rectangular kernel.
pub fn dilate_rect(image: &GrayImage, width: u32, height: u32) -> GrayImage {
    let horizontal = morph_pass_horizontal(image, width, MorphOp::Dilate);
    morph_pass_vertical(&horizontal, height, MorphOp::Dilate)
}

/// Morphological opening: erosion followed by dilation.
///
/// Removes structures thinner than the kernel while keeping the extent of
/// everything that survives.
pub fn open_rect(image: &GrayImage, width: u32, height: u32) -> GrayImage {
    dilate_rect(&erode_rect(image, width, height), width, height)
}

/// Morphological closing: dilation followed by erosion.
///
/// Bridges gaps narrower than the kernel, which merges the characters of a
/// text line into a single blob.
pub fn close_rect(image: &GrayImage, width: u32, height: u32) -> GrayImage {
    erode_rect(&dilate_rect(image, width, height), width, height)
}

fn morph_pass_horizontal(image: &GrayImage, kernel: u32, op: MorphOp) -> GrayImage {
    if kernel <= 1 {
        return image.clone();
    }
    let (width, height) = image.dimensions();
    let mut output = GrayImage::new(width, height);
    // Anchor at kernel/2, window clamped to the row.
    let left = (kernel / 2) as i64;
    let right = (kernel - 1 - kernel / 2) as i64;

    for y in 0..height {
        for x in 0..width {
            let start = (x as i64 - left).max(0) as u32;
            let end = ((x as i64 + right).min(width as i64 - 1)) as u32;
            let mut value = image.get_pixel(start, y)[0];
            for sx in (start + 1)..=end {
                let p = image.get_pixel(sx, y)[0];
                value = match op {
                    MorphOp::Erode => value.min(p),
                    MorphOp::Dilate => value.max(p),
                };
            }
            output.put_pixel(x, y, image::Luma([value]));
        }
    }
    output
}

fn morph_pass_vertical(image: &GrayImage, kernel: u32, op: MorphOp) -> GrayImage {
    if kernel <= 1 {
        return image.clone();
    }
    let (width, height) = image.dimensions();
    let mut output = GrayImage::new(width, height);
    let top = (kernel / 2) as i64;
    let bottom = (kernel - 1 - kernel / 2) as i64;

    for y in 0..height {
        let start = (y as i64 - top).max(0) as u32;
        let end = ((y as i64 + bottom).min(height as i64 - 1)) as u32;
        for x in 0..width {
            let mut value = image.get_pixel(x, start)[0];
            for sy in (start + 1)..=end {
                let p = image.get_pixel(x, sy)[0];
                value = match op {
                    MorphOp::Erode => value.min(p),
                    MorphOp::Dilate => value.max(p),
                };
            }
            output.put_pixel(x, y, image::Luma([value]));
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn image_with_bright_rect(w: u32, h: u32, x0: u32, y0: u32, rw: u32, rh: u32) -> GrayImage {
        let mut image = GrayImage::from_pixel(w, h, Luma([0]));
        for y in y0..y0 + rh {
            for x in x0..x0 + rw {
                image.put_pixel(x, y, Luma([255]));
            }
        }
        image
    }

    #[test]
    fn unit_kernel_is_identity() {
        let image = image_with_bright_rect(10, 10, 2, 2, 3, 3);
        assert_eq!(erode_rect(&image, 1, 1), image);
        assert_eq!(dilate_rect(&image, 1, 1), image);
    }

    #[test]
    fn dilate_grows_bright_region() {
        let image = image_with_bright_rect(20, 20, 8, 8, 4, 4);
        let dilated = dilate_rect(&image, 3, 3);
        assert_eq!(dilated.get_pixel(7, 8)[0], 255);
        assert_eq!(dilated.get_pixel(8, 7)[0], 255);
        assert_eq!(dilated.get_pixel(5, 5)[0], 0);
    }

    #[test]
    fn opening_removes_thin_vertical_line() {
        let mut image = GrayImage::from_pixel(20, 20, Luma([0]));
        for y in 0..20 {
            image.put_pixel(10, y, Luma([255]));
        }
        let opened = open_rect(&image, 5, 1);
        assert!(opened.pixels().all(|p| p[0] == 0));
    }

    #[test]
    fn opening_preserves_wide_region() {
        let image = image_with_bright_rect(30, 30, 5, 5, 20, 20);
        let opened = open_rect(&image, 5, 5);
        assert_eq!(opened.get_pixel(15, 15)[0], 255);
        assert_eq!(opened.get_pixel(5, 5)[0], 255);
    }

    #[test]
    fn closing_bridges_character_gap() {
        let mut image = GrayImage::from_pixel(40, 10, Luma([0]));
        for y in 2..8 {
            for x in 5..15 {
                image.put_pixel(x, y, Luma([255]));
            }
            for x in 20..30 {
                image.put_pixel(x, y, Luma([255]));
            }
        }
        let closed = close_rect(&image, 15, 1);
        assert_eq!(closed.get_pixel(17, 5)[0], 255);
    }
}
