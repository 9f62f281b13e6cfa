//! Search module - Fuzzy ranking and request orchestration

pub mod engine;
pub mod scorer;

pub use engine::QueryEngine;
pub use scorer::Scorer;
