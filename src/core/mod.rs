//! Core functionality shared across the pipeline.
//!
//! This module holds the tuned constants, the configuration structs, and the
//! error taxonomy used by every processing stage.

pub mod config;
pub mod constants;
pub mod errors;

pub use config::{
    BarcodeConfig, ConfigError, EnhanceConfig, OrderingConfig, PipelineConfig, SkewConfig,
};
pub use errors::{OCRError, OcrResult, ProcessingStage};
