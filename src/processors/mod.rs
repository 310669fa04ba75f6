//! Image and layout processors used by the pipeline.

pub mod barcode;
pub mod enhance;
pub mod geometry;
pub mod morphology;
pub mod skew;
pub mod sorting;
pub mod threshold;

pub use barcode::remove_barcodes;
pub use enhance::enhance_for_recognition;
pub use geometry::{MinAreaRect, Point, TextRegion};
pub use skew::{SkewDecision, SkewEstimate, SkewSource, detect_and_correct_skew};
pub use sorting::sort_spatially;
