//! Error types for the label OCR pipeline.
//!
//! This module defines the error types that can occur while correcting and
//! ordering a label image, including image loading errors, processing errors,
//! detection engine errors, and configuration errors, along with utility
//! constructors for creating them with appropriate context.

use thiserror::Error;

/// Enum representing different stages of processing in the pipeline.
///
/// This enum is used to identify which stage of the pipeline an error
/// occurred in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProcessingStage {
    /// Error occurred while estimating or correcting skew.
    SkewCorrection,
    /// Error occurred while masking barcode regions.
    BarcodeMasking,
    /// Error occurred during image enhancement.
    Enhancement,
    /// Error occurred while ordering detections.
    Ordering,
    /// Generic processing error.
    Generic,
}

impl std::fmt::Display for ProcessingStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProcessingStage::SkewCorrection => write!(f, "skew correction"),
            ProcessingStage::BarcodeMasking => write!(f, "barcode masking"),
            ProcessingStage::Enhancement => write!(f, "enhancement"),
            ProcessingStage::Ordering => write!(f, "ordering"),
            ProcessingStage::Generic => write!(f, "processing"),
        }
    }
}

/// Enum representing the errors that can occur in the label OCR pipeline.
#[derive(Error, Debug)]
pub enum OCRError {
    /// Error occurred while loading an image.
    #[error("image load")]
    ImageLoad(#[source] image::ImageError),

    /// Error occurred during processing.
    #[error("{kind} failed: {context}")]
    Processing {
        /// The stage of processing where the error occurred.
        kind: ProcessingStage,
        /// Additional context about the error.
        context: String,
        /// The underlying error that caused this error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Error raised by the external text detection engine.
    ///
    /// Engine failures are fatal to the request and are never retried here;
    /// retries, if any, belong to the calling service layer.
    #[error("detection engine")]
    Inference(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Error indicating invalid input.
    #[error("invalid input: {message}")]
    InvalidInput {
        /// A message describing the invalid input.
        message: String,
    },

    /// Error indicating a configuration problem.
    #[error("configuration: {message}")]
    ConfigError {
        /// A message describing the configuration error.
        message: String,
    },

    /// IO error.
    #[error("io")]
    Io(#[from] std::io::Error),
}

/// Convenient result alias for pipeline operations.
pub type OcrResult<T> = Result<T, OCRError>;

/// A message-only error used as the source for processing failures that have
/// no underlying error of their own.
#[derive(Error, Debug)]
#[error("{message}")]
pub struct SimpleError {
    message: String,
}

impl SimpleError {
    /// Creates a new SimpleError with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl OCRError {
    /// Creates an OCRError for a processing stage.
    ///
    /// # Arguments
    ///
    /// * `kind` - The stage of processing where the error occurred.
    /// * `context` - Additional context about the error.
    /// * `error` - The underlying error that caused this error.
    pub fn processing_error(
        kind: ProcessingStage,
        context: &str,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Processing {
            kind,
            context: context.to_string(),
            source: Box::new(error),
        }
    }

    /// Creates an OCRError for a detection engine failure.
    pub fn inference_error(error: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Inference(Box::new(error))
    }

    /// Creates an OCRError for invalid input.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Creates an OCRError for configuration errors.
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }
}

impl From<image::ImageError> for OCRError {
    fn from(error: image::ImageError) -> Self {
        Self::ImageLoad(error)
    }
}

impl From<crate::core::config::ConfigError> for OCRError {
    fn from(error: crate::core::config::ConfigError) -> Self {
        Self::ConfigError {
            message: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn processing_stage_display() {
        assert_eq!(ProcessingStage::SkewCorrection.to_string(), "skew correction");
        assert_eq!(ProcessingStage::Generic.to_string(), "processing");
    }

    #[test]
    fn inference_error_preserves_source() {
        let inner = std::io::Error::new(std::io::ErrorKind::TimedOut, "engine timeout");
        let err = OCRError::inference_error(inner);
        assert!(matches!(err, OCRError::Inference(_)));
        let source = std::error::Error::source(&err).expect("source");
        assert!(source.to_string().contains("engine timeout"));
    }

    #[test]
    fn invalid_input_message() {
        let err = OCRError::invalid_input("quad must contain exactly 4 points");
        assert!(err.to_string().contains("4 points"));
    }
}
