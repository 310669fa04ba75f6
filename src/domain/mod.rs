//! Domain types shared between the pipeline and detection engines.

pub mod detection;

pub use detection::{Detection, TextDetectionEngine};
