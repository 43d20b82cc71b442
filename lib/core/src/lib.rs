//! # cbir Core
//!
//! Core library for the cbir image retrieval tool.
//!
//! This crate provides the descriptor data model and the feature
//! extractors:
//!
//! - [`Descriptor`] - Fixed-length float vector summarizing an image
//! - [`features`] - Pure extraction functions (center patch, color and
//!   chromaticity histograms, multi-region histograms, Sobel texture)
//!
//! ## Example
//!
//! ```rust
//! use cbir_core::features;
//! use image::{Rgb, RgbImage};
//!
//! let image = RgbImage::from_pixel(4, 4, Rgb([255, 0, 0]));
//! let histogram = features::rgb_histogram(&image, 8).unwrap();
//! assert_eq!(histogram.len(), 512);
//! ```

pub mod descriptor;
pub mod error;
pub mod features;

pub use descriptor::Descriptor;
pub use error::{Error, Result};
