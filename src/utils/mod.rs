//! Utility functions for image loading and geometric transforms.

pub mod image;
pub mod transform;

pub use image::{dynamic_to_rgb, load_image, rgb_to_gray};
pub use transform::rotate_bound;
