//! The label OCR pipeline.
//!
//! [`LabelOcr`] ties the processing stages together: skew correction,
//! enhancement, detection through a pluggable engine, and reading-order
//! reconstruction. The pipeline owns no model of its own; the caller
//! supplies a [`TextDetectionEngine`] implementation.

use crate::core::{OcrResult, PipelineConfig};
use crate::domain::TextDetectionEngine;
use crate::processors::enhance::enhance_for_recognition;
use crate::processors::skew::detect_and_correct_skew;
use crate::processors::sorting::sort_spatially;
use crate::utils::image::{load_image, rgb_to_gray};
use image::RgbImage;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// The result of running the pipeline on one label image.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct LabelOcrResult {
    /// The extracted text in reading order.
    pub text: String,
    /// The skew correction that was applied, in degrees. 0.0 when the image
    /// was judged straight enough.
    pub skew_angle: f32,
    /// Number of text regions the engine returned.
    pub region_count: usize,
}

/// End-to-end OCR pipeline for photographed product labels.
pub struct LabelOcr {
    config: PipelineConfig,
    engine: Arc<dyn TextDetectionEngine>,
}

impl LabelOcr {
    /// Creates a pipeline with the default configuration.
    pub fn new(engine: Arc<dyn TextDetectionEngine>) -> Self {
        Self {
            config: PipelineConfig::default(),
            engine,
        }
    }

    /// Creates a pipeline with a custom, validated configuration.
    pub fn with_config(
        engine: Arc<dyn TextDetectionEngine>,
        config: PipelineConfig,
    ) -> OcrResult<Self> {
        config.validate()?;
        Ok(Self { config, engine })
    }

    /// The pipeline's active configuration.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Extracts reading-ordered text from a label image.
    ///
    /// Runs skew correction on the full-color image, enhances the corrected
    /// grayscale for recognition, invokes the detection engine, and
    /// reassembles its detections into reading order.
    pub fn extract_text(&self, image: &RgbImage) -> OcrResult<LabelOcrResult> {
        let (corrected, skew_angle) =
            detect_and_correct_skew(image, &self.config.skew, &self.config.barcode)?;
        debug!(skew_angle, "skew correction done");

        let gray = rgb_to_gray(&corrected);
        let enhanced = enhance_for_recognition(&gray, &self.config.enhance);

        let detections = self.engine.detect(&enhanced)?;
        let text = sort_spatially(&detections, &self.config.ordering);

        info!(
            regions = detections.len(),
            skew_angle, "label extraction finished"
        );

        Ok(LabelOcrResult {
            text,
            skew_angle,
            region_count: detections.len(),
        })
    }

    /// Loads an image from disk and extracts its text.
    pub fn extract_text_from_path(&self, path: impl AsRef<Path>) -> OcrResult<LabelOcrResult> {
        let image = load_image(path)?;
        self.extract_text(&image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::OCRError;
    use crate::domain::Detection;
    use image::{GrayImage, Rgb};

    struct FixedEngine {
        detections: Vec<Detection>,
    }

    impl TextDetectionEngine for FixedEngine {
        fn detect(&self, _image: &GrayImage) -> OcrResult<Vec<Detection>> {
            Ok(self.detections.clone())
        }
    }

    struct FailingEngine;

    impl TextDetectionEngine for FailingEngine {
        fn detect(&self, _image: &GrayImage) -> OcrResult<Vec<Detection>> {
            Err(OCRError::inference_error(std::io::Error::new(
                std::io::ErrorKind::ConnectionReset,
                "recognizer unavailable",
            )))
        }
    }

    fn plain_label() -> RgbImage {
        RgbImage::from_pixel(100, 60, Rgb([240, 240, 240]))
    }

    #[test]
    fn orders_engine_detections_into_lines() {
        let engine = FixedEngine {
            detections: vec![
                Detection::from_rect(40.0, 50.0, 20.0, 10.0, "2027-01"),
                Detection::from_rect(10.0, 10.0, 20.0, 10.0, "LOT"),
                Detection::from_rect(10.0, 50.0, 20.0, 10.0, "EXP"),
                Detection::from_rect(40.0, 10.0, 20.0, 10.0, "A1234"),
            ],
        };
        let pipeline = LabelOcr::new(Arc::new(engine));
        let result = pipeline.extract_text(&plain_label()).unwrap();
        assert_eq!(result.text, "LOT A1234\nEXP 2027-01");
        assert_eq!(result.region_count, 4);
        assert_eq!(result.skew_angle, 0.0);
    }

    #[test]
    fn empty_detections_give_empty_text() {
        let pipeline = LabelOcr::new(Arc::new(FixedEngine { detections: vec![] }));
        let result = pipeline.extract_text(&plain_label()).unwrap();
        assert_eq!(result.text, "");
        assert_eq!(result.region_count, 0);
    }

    #[test]
    fn engine_failures_propagate() {
        let pipeline = LabelOcr::new(Arc::new(FailingEngine));
        let err = pipeline.extract_text(&plain_label()).unwrap_err();
        assert!(matches!(err, OCRError::Inference(_)));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = PipelineConfig::default();
        config.enhance.upscale_factor = 0;
        let result = LabelOcr::with_config(Arc::new(FixedEngine { detections: vec![] }), config);
        assert!(result.is_err());
    }

    #[test]
    fn missing_file_surfaces_image_load_error() {
        let pipeline = LabelOcr::new(Arc::new(FixedEngine { detections: vec![] }));
        let err = pipeline
            .extract_text_from_path("/nonexistent/label.jpg")
            .unwrap_err();
        assert!(matches!(err, OCRError::ImageLoad(_)));
    }
}
