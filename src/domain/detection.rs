//! Text detections and the engine that produces them.

use crate::core::OcrResult;
use crate::processors::geometry::Point;
use image::GrayImage;
use serde::{Deserialize, Serialize};

/// One recognized text region.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Detection {
    /// The four corners of the detected region, in image coordinates.
    pub quad: [Point; 4],
    /// The recognized text.
    pub text: String,
    /// Recognition confidence in the range 0.0 to 1.0.
    pub confidence: f32,
}

impl Detection {
    /// Creates a detection from an axis-aligned box.
    pub fn from_rect(x: f32, y: f32, width: f32, height: f32, text: impl Into<String>) -> Self {
        Self {
            quad: [
                Point::new(x, y),
                Point::new(x + width, y),
                Point::new(x + width, y + height),
                Point::new(x, y + height),
            ],
            text: text.into(),
            confidence: 1.0,
        }
    }
}

/// A pluggable text detection and recognition engine.
///
/// The pipeline hands the engine a corrected, grayscale label image and
/// expects back the recognized regions. Implementations typically wrap an
/// OCR model or a remote recognition service.
pub trait TextDetectionEngine: Send + Sync {
    /// Detects and recognizes text regions in the given image.
    fn detect(&self, image: &GrayImage) -> OcrResult<Vec<Detection>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_rect_orders_corners_clockwise() {
        let detection = Detection::from_rect(10.0, 20.0, 30.0, 5.0, "LOT 42");
        assert_eq!(detection.quad[0], Point::new(10.0, 20.0));
        assert_eq!(detection.quad[2], Point::new(40.0, 25.0));
        assert_eq!(detection.text, "LOT 42");
    }

    #[test]
    fn detection_serializes_round_trip() {
        let detection = Detection::from_rect(0.0, 0.0, 10.0, 10.0, "EXP 2027-01");
        let json = serde_json::to_string(&detection).unwrap();
        let back: Detection = serde_json::from_str(&json).unwrap();
        assert_eq!(back.text, "EXP 2027-01");
        assert_eq!(back.quad[2], detection.quad[2]);
    }
}
