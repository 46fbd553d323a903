//! Shared helpers

pub mod paths;

pub use paths::{absolutize, normalize_lexically};
