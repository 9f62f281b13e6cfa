//! Core module - Shared data structures and utilities
//!
//! This module provides:
//! - Runtime configuration
//! - Launcher result model and rendering
//! - Data directory layout
//! - Common utilities

pub mod config;
pub mod model;
pub mod paths;
pub mod render;
pub mod util;
