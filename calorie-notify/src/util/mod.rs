//! Shared helpers.

pub mod sanitize;

pub use sanitize::{sanitize_text, strip_tags};
