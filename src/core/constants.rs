//! Tuned constants used throughout the label OCR pipeline.
//!
//! Every empirically tuned threshold lives here as a named constant so it
//! can be retuned without touching algorithm structure. The values were
//! calibrated on photographed ingredient labels.

/// Half-range of the projection-profile angle search, in degrees.
///
/// Candidate angles span `-SKEW_SEARCH_HALF_RANGE..=+SKEW_SEARCH_HALF_RANGE`.
pub const SKEW_SEARCH_HALF_RANGE: f32 = 15.0;

/// Step between candidate angles in the projection-profile search, in degrees.
pub const SKEW_SEARCH_STEP: f32 = 0.5;

/// Estimates with a magnitude at or above this are discarded as implausible
/// for a label photograph, in degrees.
pub const SKEW_MAX_VALID_ANGLE: f32 = 20.0;

/// Rotation is always applied when the combined angle exceeds this, in degrees.
pub const SKEW_ROTATION_THRESHOLD: f32 = 2.0;

/// Rotation is applied for moderate angles above this when the estimators
/// agree closely, in degrees.
pub const SKEW_AGREEMENT_THRESHOLD: f32 = 1.0;

/// Maximum standard deviation between estimators for the moderate-angle
/// rotation rule, in degrees.
pub const SKEW_AGREEMENT_MAX_STD_DEV: f32 = 3.0;

/// Width and height of the closing kernel that fuses characters into
/// line-like blobs before Hough line detection, in pixels.
pub const HOUGH_CLOSE_KERNEL: (u32, u32) = (20, 2);

/// Minimum number of detected line segments for the Hough estimate to count.
pub const HOUGH_MIN_LINE_COUNT: usize = 5;

/// Line segments steeper than this are ignored by the Hough estimator,
/// in degrees.
pub const HOUGH_MAX_LINE_ANGLE: f32 = 30.0;

/// Lower Canny hysteresis threshold for the Hough estimator's edge map.
pub const HOUGH_CANNY_LOW: f32 = 50.0;

/// Upper Canny hysteresis threshold for the Hough estimator's edge map.
pub const HOUGH_CANNY_HIGH: f32 = 150.0;

/// Accumulator votes required for a Hough line.
pub const HOUGH_VOTE_THRESHOLD: u32 = 100;

/// Suppression radius that keeps near-duplicate Hough lines apart.
pub const HOUGH_SUPPRESSION_RADIUS: u32 = 8;

/// Width and height of the closing kernel that merges text into line blobs
/// for the morphological estimator, in pixels.
pub const MORPH_CLOSE_KERNEL: (u32, u32) = (30, 3);

/// Contours smaller than this area do not contribute a min-area-rect angle,
/// in square pixels.
pub const MORPH_MIN_CONTOUR_AREA: f32 = 1000.0;

/// Number of largest contours considered by the morphological estimator.
pub const MORPH_MAX_TEXT_LINE_BLOBS: usize = 5;

/// Fraction of the image width covered by each margin band searched for
/// barcodes.
pub const BARCODE_EDGE_BAND_FRACTION: f32 = 0.2;

/// Height of the vertical opening kernel that isolates barcode strokes,
/// in pixels.
pub const BARCODE_KERNEL_HEIGHT: u32 = 30;

/// Intensity above which an opened pixel counts as part of a vertical line.
pub const BARCODE_LINE_THRESHOLD: u8 = 50;

/// Fraction of on pixels within a band that marks it as barcode-bearing.
pub const BARCODE_DENSITY_THRESHOLD: f32 = 0.03;

/// Upscale factor applied before recognition; OCR engines are
/// resolution-sensitive on small label text.
pub const ENHANCE_UPSCALE_FACTOR: u32 = 3;

/// Gaussian sigma for the denoising pass.
pub const ENHANCE_DENOISE_SIGMA: f32 = 1.0;

/// CLAHE clip limit as a multiple of the uniform histogram level.
pub const ENHANCE_CLAHE_CLIP_LIMIT: f32 = 3.0;

/// CLAHE tile grid (columns, rows).
pub const ENHANCE_CLAHE_TILE_GRID: (u32, u32) = (8, 8);

/// Fraction of the median box height used as the same-line threshold.
pub const LINE_HEIGHT_RATIO: f32 = 0.7;

/// Fraction of the current line span below which a vertical gap is treated
/// as intra-line jitter.
pub const LINE_GAP_RATIO: f32 = 0.5;
