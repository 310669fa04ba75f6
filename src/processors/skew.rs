//! Skew estimation and correction.
//!
//! Three independent estimators each measure the dominant text direction of
//! the label, in degrees:
//!
//! * projection profile: grid-search the angle that maximizes the variance
//!   of row-wise ink counts,
//! * Hough: the median direction of long line segments,
//! * morphological: the median orientation of minimum-area rectangles
//!   fitted to merged text-line blobs.
//!
//! Their votes are combined by median, with a spread check that keeps a
//! borderline angle from rotating the image when the estimators disagree.
//! The angle returned by each estimator is the one to feed directly to
//! [`rotate_bound`] to straighten the text.

use crate::core::{BarcodeConfig, OcrResult, SkewConfig};
use crate::processors::barcode::remove_barcodes;
use crate::processors::geometry::{MinAreaRect, TextRegion};
use crate::processors::morphology::close_rect;
use crate::processors::threshold::otsu_binarize_inverted;
use crate::utils::image::rgb_to_gray;
use crate::utils::transform::rotate_bound;
use image::{GrayImage, RgbImage};
use imageproc::contours::{BorderType, find_contours};
use imageproc::edges::canny;
use imageproc::hough::{LineDetectionOptions, detect_lines};
use rayon::prelude::*;
use tracing::debug;

/// Which estimator produced an angle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkewSource {
    /// Projection-profile variance search.
    Projection,
    /// Hough line-segment voting.
    Hough,
    /// Minimum-area rectangles of merged text blobs.
    Morphological,
}

/// A single estimator's vote.
#[derive(Debug, Clone, Copy)]
pub struct SkewEstimate {
    /// Measured text direction in degrees.
    pub angle: f32,
    /// The estimator that produced it.
    pub source: SkewSource,
}

/// The combined verdict of all estimators.
#[derive(Debug, Clone, Copy)]
pub struct SkewDecision {
    /// Median of the valid estimates, in degrees.
    pub angle: f32,
    /// Population standard deviation of the valid estimates.
    pub std_dev: f32,
    /// Whether the angle is confident enough to rotate.
    pub should_rotate: bool,
}

/// Estimates the skew of an RGB label image and corrects it if warranted.
///
/// Barcode bars are masked out before the projection search so their strong
/// horizontal profile cannot outvote the text, but the returned image is the
/// original content rotated, never the masked one.
///
/// # Returns
///
/// The corrected image and the applied angle in degrees. When the decision
/// is not to rotate, the image is returned unchanged with an angle of 0.0.
pub fn detect_and_correct_skew(
    image: &RgbImage,
    skew: &SkewConfig,
    barcode: &BarcodeConfig,
) -> OcrResult<(RgbImage, f32)> {
    let gray = rgb_to_gray(image);
    let cleaned = remove_barcodes(&gray, barcode);

    let estimates = [
        SkewEstimate {
            angle: projection_skew(&cleaned, skew)?,
            source: SkewSource::Projection,
        },
        SkewEstimate {
            angle: hough_skew(&gray, skew),
            source: SkewSource::Hough,
        },
        SkewEstimate {
            angle: morphological_skew(&gray, skew),
            source: SkewSource::Morphological,
        },
    ];
    for estimate in &estimates {
        debug!(source = ?estimate.source, angle = estimate.angle, "skew estimate");
    }

    let decision = combine_estimates(&estimates, skew);
    debug!(
        angle = decision.angle,
        std_dev = decision.std_dev,
        should_rotate = decision.should_rotate,
        "skew decision"
    );

    if decision.should_rotate {
        let rotated = rotate_bound(image, decision.angle)?;
        Ok((rotated, decision.angle))
    } else {
        Ok((image.clone(), 0.0))
    }
}

/// Finds the rotation angle that maximizes row-profile variance.
///
/// The image is binarized with inverted Otsu so ink is foreground, then each
/// candidate angle in the configured range is scored by the variance of
/// per-row foreground counts of the rotated binary. Straight text lines
/// produce sharply peaked row profiles, so the best candidate is the text
/// direction. Returns 0.0 when the binary image is all foreground or all
/// background.
pub fn projection_skew(gray: &GrayImage, config: &SkewConfig) -> OcrResult<f32> {
    let binary = otsu_binarize_inverted(gray);
    let foreground = binary.pixels().filter(|p| p[0] > 0).count();
    // An all-ink or all-background profile carries no angle signal.
    if foreground == 0 || foreground == binary.pixels().len() {
        return Ok(0.0);
    }

    let steps = (2.0 * config.search_half_range / config.search_step).round() as i32;
    let candidates: Vec<f32> = (0..=steps)
        .map(|i| -config.search_half_range + i as f32 * config.search_step)
        .collect();

    let scores: Vec<f32> = candidates
        .par_iter()
        .map(|&angle| row_profile_variance(&binary, angle))
        .collect::<OcrResult<Vec<f32>>>()?;

    // First maximum wins so ties resolve deterministically.
    let mut best_index = 0;
    for (i, &score) in scores.iter().enumerate() {
        if score > scores[best_index] {
            best_index = i;
        }
    }
    Ok(candidates[best_index])
}

fn row_profile_variance(binary: &GrayImage, angle: f32) -> OcrResult<f32> {
    let rotated = rotate_bound(binary, angle)?;
    let (width, height) = rotated.dimensions();

    let mut counts = vec![0.0f32; height as usize];
    for y in 0..height {
        let mut count = 0u32;
        for x in 0..width {
            if rotated.get_pixel(x, y)[0] > 0 {
                count += 1;
            }
        }
        counts[y as usize] = count as f32;
    }

    let mean = counts.iter().sum::<f32>() / counts.len() as f32;
    Ok(counts.iter().map(|c| (c - mean).powi(2)).sum::<f32>() / counts.len() as f32)
}

/// Estimates skew from the direction of long Hough line segments.
///
/// The binary image is closed with a wide flat kernel to turn text lines
/// into continuous strokes, edges are extracted with Canny, and straight
/// lines are collected from the Hough accumulator. Returns 0.0 for a
/// zero-area image or when fewer than the minimum number of lines are found. Lines steeper than the
/// configured limit are then discarded as non-text, and the median direction
/// of the rest is the estimate (0.0 again when none survive).
pub fn hough_skew(gray: &GrayImage, config: &SkewConfig) -> f32 {
    // A zero-area image carries no angle signal, and the edge detector
    // cannot run on it.
    if gray.width() == 0 || gray.height() == 0 {
        return 0.0;
    }

    let binary = otsu_binarize_inverted(gray);
    let (kw, kh) = config.hough_close_kernel;
    let closed = close_rect(&binary, kw, kh);

    let edges = canny(&closed, config.hough_canny_low, config.hough_canny_high);
    let lines = detect_lines(
        &edges,
        LineDetectionOptions {
            vote_threshold: config.hough_vote_threshold,
            suppression_radius: config.hough_suppression_radius,
        },
    );

    // Too few lines means the closing produced no usable strokes, so the
    // estimate would be noise.
    if lines.len() < config.hough_min_line_count {
        return 0.0;
    }

    let mut angles: Vec<f32> = lines
        .iter()
        .map(|line| line.angle_in_degrees as f32 - 90.0)
        .filter(|angle| angle.abs() < config.hough_max_line_angle)
        .collect();

    if angles.is_empty() {
        return 0.0;
    }
    median(&mut angles)
}

/// Estimates skew from the orientation of merged text-line blobs.
///
/// Closing with a wide flat kernel merges the characters of each line into
/// one blob. The largest blobs above the area floor each contribute the
/// orientation of their minimum-area rectangle, and the median of those
/// orientations is the estimate. Returns 0.0 with fewer than two blobs or
/// when none qualifies.
pub fn morphological_skew(gray: &GrayImage, config: &SkewConfig) -> f32 {
    let binary = otsu_binarize_inverted(gray);
    let (kw, kh) = config.morph_close_kernel;
    let closed = close_rect(&binary, kw, kh);

    let contours = find_contours::<u32>(&closed);
    let mut regions: Vec<(f32, TextRegion)> = contours
        .iter()
        .filter(|contour| contour.border_type == BorderType::Outer)
        .map(TextRegion::from_contour)
        .map(|region| (region.area(), region))
        .collect();

    // A single blob gives no consensus to take a median over.
    if regions.len() < 2 {
        return 0.0;
    }

    regions.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

    let mut angles: Vec<f32> = regions
        .iter()
        .take(config.morph_max_blobs)
        .filter(|(area, _)| *area > config.morph_min_contour_area)
        .map(|(_, region)| normalize_rect_angle(&region.min_area_rect()))
        .collect();

    if angles.is_empty() {
        return 0.0;
    }
    median(&mut angles)
}

/// Folds a minimum-area rectangle's edge orientation into (-45, 45].
///
/// The rectangle reports the orientation of whichever edge it happened to
/// rest on, so the text direction is that angle shifted by a multiple of 90
/// degrees into the near-horizontal range.
pub fn normalize_rect_angle(rect: &MinAreaRect) -> f32 {
    let mut angle = rect.angle.rem_euclid(180.0);
    if angle > 90.0 {
        angle -= 180.0;
    }
    if angle <= -45.0 {
        angle += 90.0;
    } else if angle > 45.0 {
        angle -= 90.0;
    }
    angle
}

/// Combines estimator votes into a rotation decision.
///
/// Estimates at or beyond the validity limit are discarded. The remaining
/// votes are reduced to their median, and rotation happens when the median
/// is large, or moderate while the votes agree tightly.
pub fn combine_estimates(estimates: &[SkewEstimate], config: &SkewConfig) -> SkewDecision {
    let mut valid: Vec<f32> = estimates
        .iter()
        .map(|e| e.angle)
        .filter(|a| a.abs() < config.max_valid_angle)
        .collect();

    if valid.is_empty() {
        return SkewDecision {
            angle: 0.0,
            std_dev: 0.0,
            should_rotate: false,
        };
    }

    let angle = median(&mut valid);
    let std_dev = population_std_dev(&valid);
    let should_rotate = angle.abs() > config.rotation_threshold
        || (angle.abs() > config.agreement_threshold && std_dev < config.agreement_max_std_dev);

    SkewDecision {
        angle,
        std_dev,
        should_rotate,
    }
}

/// Median of a non-empty slice, averaging the middle pair for even lengths.
fn median(values: &mut [f32]) -> f32 {
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let n = values.len();
    if n % 2 == 1 {
        values[n / 2]
    } else {
        (values[n / 2 - 1] + values[n / 2]) / 2.0
    }
}

/// Population standard deviation, 0.0 for fewer than two values.
fn population_std_dev(values: &[f32]) -> f32 {
    if values.len() < 2 {
        return 0.0;
    }
    let mean = values.iter().sum::<f32>() / values.len() as f32;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f32>() / values.len() as f32;
    variance.sqrt()
}
