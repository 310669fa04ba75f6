//! # Label OCR
//!
//! A Rust library that prepares photographed product-label images for OCR
//! and reassembles the recognized text into reading order. Text recognition
//! itself is delegated to a pluggable engine.
//!
//! ## Features
//!
//! - Skew estimation from three voting estimators with a confidence-gated
//!   correction step
//! - Barcode-bar masking so margin barcodes cannot bias the skew search
//! - Deterministic enhancement for recognition: upscale, denoise, CLAHE,
//!   sharpen
//! - Spatial reading-order reconstruction of engine detections
//!
//! ## Modules
//!
//! * [`core`] - Constants, configuration, and error handling
//! * [`domain`] - Detections and the detection engine trait
//! * [`pipeline`] - The end-to-end label pipeline
//! * [`processors`] - Skew, barcode, enhancement, and ordering processors
//! * [`utils`] - Image loading and geometric transforms
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use label_ocr::prelude::*;
//! use image::GrayImage;
//! use std::sync::Arc;
//!
//! struct MyEngine;
//!
//! impl TextDetectionEngine for MyEngine {
//!     fn detect(&self, _image: &GrayImage) -> OcrResult<Vec<Detection>> {
//!         // Run a model or call a recognition service here.
//!         Ok(Vec::new())
//!     }
//! }
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let pipeline = LabelOcr::new(Arc::new(MyEngine));
//! let result = pipeline.extract_text_from_path("label.jpg")?;
//! println!("skew: {:.1} degrees", result.skew_angle);
//! println!("{}", result.text);
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod domain;
pub mod pipeline;
pub mod processors;
pub mod utils;

/// Commonly used types, re-exported for convenience.
pub mod prelude {
    pub use crate::core::{OCRError, OcrResult, PipelineConfig};
    pub use crate::domain::{Detection, TextDetectionEngine};
    pub use crate::pipeline::{LabelOcr, LabelOcrResult};
    pub use crate::utils::image::load_image;
}
