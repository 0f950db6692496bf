//! Utility modules for eco-scoring
//!
//! Contains shared functionality used across the loader, scorer and
//! meal-plan orchestrator:
//! - Normalization: min-max scaling and the 0-10 display transform
//! - Frame helpers: typed column access with validation
//! - JSON span: balanced-object extraction from generated text

pub mod normalization;
pub mod frame_helpers;
pub mod json_span;

// Re-export commonly used functions
pub use normalization::{min_max_normalize, inverted_ceiling_score, round_to_one_decimal};
pub use frame_helpers::{missing_columns, f64_values, string_values};
pub use json_span::{extract_json_object, find_object_span, SpanError};
