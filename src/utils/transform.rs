//! Geometric image transforms.
//!
//! The rotation here grows the output canvas so no content is clipped, which
//! is what the skew corrector needs: a deskewed label must keep every text
//! region, even the ones near the original corners.

use crate::core::{OCRError, OcrResult, ProcessingStage};
use image::{ImageBuffer, Pixel};
use nalgebra::Matrix3;
use rayon::prelude::*;

/// Rotates an image by the given angle, expanding the canvas to fit.
///
/// Positive angles rotate clockwise in image coordinates (y pointing down).
/// The output dimensions are `h * |sin| + w * |cos|` by `w * |sin| + h * |cos|`.
/// Sampling is bicubic Catmull-Rom with clamped coordinates, so regions
/// outside the source replicate the nearest border pixel instead of filling
/// with black. A zero angle returns an unmodified copy.
///
/// # Arguments
///
/// * `image` - The source image.
/// * `angle_degrees` - The rotation angle in degrees.
///
/// # Returns
///
/// A `Result` containing the rotated image, or an `OCRError` if the rotation
/// matrix is singular.
pub fn rotate_bound<P>(
    image: &ImageBuffer<P, Vec<u8>>,
    angle_degrees: f32,
) -> OcrResult<ImageBuffer<P, Vec<u8>>>
where
    P: Pixel<Subpixel = u8> + Send + Sync,
{
    if angle_degrees == 0.0 {
        return Ok(image.clone());
    }

    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(OCRError::invalid_input("cannot rotate an empty image"));
    }

    let radians = angle_degrees.to_radians();
    let (sin, cos) = radians.sin_cos();

    let new_width = (height as f32 * sin.abs() + width as f32 * cos.abs()).round() as u32;
    let new_height = (width as f32 * sin.abs() + height as f32 * cos.abs()).round() as u32;

    let cx = width as f32 / 2.0;
    let cy = height as f32 / 2.0;
    let ncx = new_width as f32 / 2.0;
    let ncy = new_height as f32 / 2.0;

    // Forward map: rotate about the source center, then recenter on the
    // expanded canvas.
    let forward = Matrix3::new(
        cos,
        sin,
        ncx - cx * cos - cy * sin,
        -sin,
        cos,
        ncy + cx * sin - cy * cos,
        0.0,
        0.0,
        1.0,
    );

    let inverse = forward.try_inverse().ok_or_else(|| {
        OCRError::processing_error(
            ProcessingStage::SkewCorrection,
            "rotation matrix is not invertible",
            crate::core::errors::SimpleError::new("singular transform"),
        )
    })?;

    let channels = P::CHANNEL_COUNT as usize;
    let mut output = vec![0u8; new_width as usize * new_height as usize * channels];

    output
        .par_chunks_mut(new_width as usize * channels)
        .enumerate()
        .for_each(|(y, row)| {
            for x in 0..new_width as usize {
                let src_x =
                    inverse[(0, 0)] * x as f32 + inverse[(0, 1)] * y as f32 + inverse[(0, 2)];
                let src_y =
                    inverse[(1, 0)] * x as f32 + inverse[(1, 1)] * y as f32 + inverse[(1, 2)];

                for c in 0..channels {
                    row[x * channels + c] = bicubic_sample(image, src_x, src_y, c);
                }
            }
        });

    ImageBuffer::from_raw(new_width, new_height, output).ok_or_else(|| {
        OCRError::processing_error(
            ProcessingStage::SkewCorrection,
            "failed to assemble rotated image buffer",
            crate::core::errors::SimpleError::new("buffer size mismatch"),
        )
    })
}

/// Samples one channel at a fractional coordinate with 4x4 Catmull-Rom
/// weighting.
///
/// Tap coordinates are clamped to the image bounds, which replicates the
/// border row or column for samples outside the image.
fn bicubic_sample<P>(image: &ImageBuffer<P, Vec<u8>>, x: f32, y: f32, channel: usize) -> u8
where
    P: Pixel<Subpixel = u8>,
{
    let (width, height) = image.dimensions();

    let x0 = x.floor();
    let y0 = y.floor();
    let dx = x - x0;
    let dy = y - y0;

    let clamp_x = |v: f32| (v.max(0.0) as u32).min(width - 1);
    let clamp_y = |v: f32| (v.max(0.0) as u32).min(height - 1);

    let mut accum = 0.0f32;
    for j in -1i32..=2 {
        let yc = clamp_y(y0 + j as f32);
        let wy = catmull_rom_weight(j as f32 - dy);
        let mut row_accum = 0.0f32;
        for i in -1i32..=2 {
            let xc = clamp_x(x0 + i as f32);
            let wx = catmull_rom_weight(i as f32 - dx);
            row_accum += wx * image.get_pixel(xc, yc).channels()[channel] as f32;
        }
        accum += wy * row_accum;
    }

    accum.round().clamp(0.0, 255.0) as u8
}

/// Catmull-Rom cubic kernel weight for a tap offset.
fn catmull_rom_weight(t: f32) -> f32 {
    let t = t.abs();
    if t <= 1.0 {
        1.5 * t * t * t - 2.5 * t * t + 1.0
    } else if t < 2.0 {
        -0.5 * t * t * t + 2.5 * t * t - 4.0 * t + 2.0
    } else {
        0.0
    }
}
