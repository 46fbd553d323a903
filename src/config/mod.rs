//! Config document loading and merging
//!
//! Documents are loaded from JSON, TOML or YAML files and stacked with
//! proper precedence (rc > environment > defaults).

pub mod loader;
pub mod merge;

pub use loader::{load_document, parse_document, Format};
pub use merge::{deep_merge, MergeChain};
