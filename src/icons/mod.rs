//! Icons module
//!
//! Provides:
//! - HSL and gradient parsing (color)
//! - Offline PNG rendering of color swatches (raster)
//! - Query-time icon lookup (resolver)

pub mod color;
pub mod raster;
pub mod resolver;

pub use resolver::IconResolver;
