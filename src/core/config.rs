//! Configuration for the label OCR pipeline.
//!
//! All tuned thresholds are carried by serde-derived config structs whose
//! defaults come from [`crate::core::constants`]. Configs can be built in
//! code, deserialized from JSON, and validated before use.

use crate::core::constants::*;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during configuration validation or loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Error indicating that a configuration value is invalid.
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Error reading a configuration file.
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing a configuration file.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ConfigError {
    fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }
}

/// Configuration for skew estimation and correction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SkewConfig {
    /// Half-range of the projection-profile angle search, in degrees.
    pub search_half_range: f32,
    /// Step between candidate angles, in degrees.
    pub search_step: f32,
    /// Estimates at or above this magnitude are discarded, in degrees.
    pub max_valid_angle: f32,
    /// Rotation always applies above this combined angle, in degrees.
    pub rotation_threshold: f32,
    /// Moderate-angle rotation floor, in degrees.
    pub agreement_threshold: f32,
    /// Maximum estimator spread for the moderate-angle rule, in degrees.
    pub agreement_max_std_dev: f32,
    /// Closing kernel (width, height) for the Hough estimator, in pixels.
    pub hough_close_kernel: (u32, u32),
    /// Minimum line segments required by the Hough estimator.
    pub hough_min_line_count: usize,
    /// Maximum segment angle considered text-like, in degrees.
    pub hough_max_line_angle: f32,
    /// Lower Canny hysteresis threshold for the Hough edge map.
    pub hough_canny_low: f32,
    /// Upper Canny hysteresis threshold for the Hough edge map.
    pub hough_canny_high: f32,
    /// Hough accumulator vote threshold.
    pub hough_vote_threshold: u32,
    /// Hough duplicate-line suppression radius.
    pub hough_suppression_radius: u32,
    /// Closing kernel (width, height) for the morphological estimator.
    pub morph_close_kernel: (u32, u32),
    /// Minimum contour area contributing an angle, in square pixels.
    pub morph_min_contour_area: f32,
    /// Number of largest contours considered.
    pub morph_max_blobs: usize,
}

impl Default for SkewConfig {
    fn default() -> Self {
        Self {
            search_half_range: SKEW_SEARCH_HALF_RANGE,
            search_step: SKEW_SEARCH_STEP,
            max_valid_angle: SKEW_MAX_VALID_ANGLE,
            rotation_threshold: SKEW_ROTATION_THRESHOLD,
            agreement_threshold: SKEW_AGREEMENT_THRESHOLD,
            agreement_max_std_dev: SKEW_AGREEMENT_MAX_STD_DEV,
            hough_close_kernel: HOUGH_CLOSE_KERNEL,
            hough_min_line_count: HOUGH_MIN_LINE_COUNT,
            hough_max_line_angle: HOUGH_MAX_LINE_ANGLE,
            hough_canny_low: HOUGH_CANNY_LOW,
            hough_canny_high: HOUGH_CANNY_HIGH,
            hough_vote_threshold: HOUGH_VOTE_THRESHOLD,
            hough_suppression_radius: HOUGH_SUPPRESSION_RADIUS,
            morph_close_kernel: MORPH_CLOSE_KERNEL,
            morph_min_contour_area: MORPH_MIN_CONTOUR_AREA,
            morph_max_blobs: MORPH_MAX_TEXT_LINE_BLOBS,
        }
    }
}

impl SkewConfig {
    /// Validates the skew configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.search_step <= 0.0 {
            return Err(ConfigError::invalid("search_step must be positive"));
        }
        if self.search_half_range <= 0.0 {
            return Err(ConfigError::invalid("search_half_range must be positive"));
        }
        if self.max_valid_angle <= 0.0 {
            return Err(ConfigError::invalid("max_valid_angle must be positive"));
        }
        if self.hough_close_kernel.0 == 0 || self.hough_close_kernel.1 == 0 {
            return Err(ConfigError::invalid("hough_close_kernel must be non-zero"));
        }
        if self.hough_canny_low <= 0.0 || self.hough_canny_high <= self.hough_canny_low {
            return Err(ConfigError::invalid(
                "canny thresholds must be positive with low below high",
            ));
        }
        if self.morph_close_kernel.0 == 0 || self.morph_close_kernel.1 == 0 {
            return Err(ConfigError::invalid("morph_close_kernel must be non-zero"));
        }
        Ok(())
    }
}

/// Configuration for barcode-region masking.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BarcodeConfig {
    /// Fraction of the image width covered by each margin band.
    pub edge_band_fraction: f32,
    /// Height of the vertical opening kernel, in pixels.
    pub kernel_height: u32,
    /// Intensity above which an opened pixel counts as line content.
    pub line_threshold: u8,
    /// On-pixel fraction above which a band is masked.
    pub density_threshold: f32,
}

impl Default for BarcodeConfig {
    fn default() -> Self {
        Self {
            edge_band_fraction: BARCODE_EDGE_BAND_FRACTION,
            kernel_height: BARCODE_KERNEL_HEIGHT,
            line_threshold: BARCODE_LINE_THRESHOLD,
            density_threshold: BARCODE_DENSITY_THRESHOLD,
        }
    }
}

impl BarcodeConfig {
    /// Validates the barcode configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=0.5).contains(&self.edge_band_fraction) {
            return Err(ConfigError::invalid(
                "edge_band_fraction must be within 0.0..=0.5",
            ));
        }
        if self.kernel_height == 0 {
            return Err(ConfigError::invalid("kernel_height must be non-zero"));
        }
        if self.density_threshold < 0.0 {
            return Err(ConfigError::invalid("density_threshold must not be negative"));
        }
        Ok(())
    }
}

/// Configuration for the recognition-oriented enhancement pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnhanceConfig {
    /// Upscale factor applied before recognition.
    pub upscale_factor: u32,
    /// Gaussian sigma for the denoising pass.
    pub denoise_sigma: f32,
    /// CLAHE clip limit as a multiple of the uniform histogram level.
    pub clahe_clip_limit: f32,
    /// CLAHE tile grid (columns, rows).
    pub clahe_tile_grid: (u32, u32),
}

impl Default for EnhanceConfig {
    fn default() -> Self {
        Self {
            upscale_factor: ENHANCE_UPSCALE_FACTOR,
            denoise_sigma: ENHANCE_DENOISE_SIGMA,
            clahe_clip_limit: ENHANCE_CLAHE_CLIP_LIMIT,
            clahe_tile_grid: ENHANCE_CLAHE_TILE_GRID,
        }
    }
}

impl EnhanceConfig {
    /// Validates the enhancement configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.upscale_factor == 0 {
            return Err(ConfigError::invalid("upscale_factor must be non-zero"));
        }
        if self.denoise_sigma <= 0.0 {
            return Err(ConfigError::invalid("denoise_sigma must be positive"));
        }
        if self.clahe_clip_limit <= 0.0 {
            return Err(ConfigError::invalid("clahe_clip_limit must be positive"));
        }
        if self.clahe_tile_grid.0 == 0 || self.clahe_tile_grid.1 == 0 {
            return Err(ConfigError::invalid("clahe_tile_grid must be non-zero"));
        }
        Ok(())
    }
}

/// Configuration for spatial reading-order reconstruction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderingConfig {
    /// Fraction of the median box height used as the same-line threshold.
    pub line_height_ratio: f32,
    /// Fraction of the line span below which a gap is intra-line jitter.
    pub gap_ratio: f32,
}

impl Default for OrderingConfig {
    fn default() -> Self {
        Self {
            line_height_ratio: LINE_HEIGHT_RATIO,
            gap_ratio: LINE_GAP_RATIO,
        }
    }
}

impl OrderingConfig {
    /// Validates the ordering configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.line_height_ratio <= 0.0 {
            return Err(ConfigError::invalid("line_height_ratio must be positive"));
        }
        if self.gap_ratio < 0.0 {
            return Err(ConfigError::invalid("gap_ratio must not be negative"));
        }
        Ok(())
    }
}

/// Top-level configuration for the label OCR pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Skew estimation and correction settings.
    pub skew: SkewConfig,
    /// Barcode masking settings.
    pub barcode: BarcodeConfig,
    /// Enhancement settings.
    pub enhance: EnhanceConfig,
    /// Reading-order settings.
    pub ordering: OrderingConfig,
}

impl PipelineConfig {
    /// Validates every section of the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.skew.validate()?;
        self.barcode.validate()?;
        self.enhance.validate()?;
        self.ordering.validate()?;
        Ok(())
    }

    /// Loads and validates a configuration from a JSON file.
    ///
    /// Missing fields fall back to their defaults, so partial files that
    /// only override a few thresholds are accepted.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        PipelineConfig::default().validate().expect("defaults valid");
    }

    #[test]
    fn rejects_zero_search_step() {
        let config = SkewConfig {
            search_step: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_inverted_canny_thresholds() {
        let config = SkewConfig {
            hough_canny_low: 150.0,
            hough_canny_high: 50.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_oversized_band_fraction() {
        let config = BarcodeConfig {
            edge_band_fraction: 0.6,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_json_overrides_defaults() {
        let parsed: PipelineConfig =
            serde_json::from_str(r#"{"ordering": {"line_height_ratio": 0.8}}"#).unwrap();
        assert_eq!(parsed.ordering.line_height_ratio, 0.8);
        assert_eq!(parsed.ordering.gap_ratio, LINE_GAP_RATIO);
        assert_eq!(parsed.skew.search_step, SKEW_SEARCH_STEP);
    }

    #[test]
    fn json_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pipeline.json");
        let config = PipelineConfig::default();
        std::fs::write(&path, serde_json::to_string(&config).unwrap()).unwrap();
        let loaded = PipelineConfig::from_json_file(&path).expect("load config");
        assert_eq!(loaded.barcode.kernel_height, config.barcode.kernel_height);
    }
}
