//! Deep merging of config documents
//!
//! Layers are stacked on a [`Figment`] with `merge` ordering, so later layers
//! win: mappings are merged key by key, while scalars and arrays from a
//! later layer replace the earlier value outright.

use crate::error::{ConfigError, Result};
use figment::providers::Serialized;
use figment::Figment;
use serde_json::Value;

/// Ordered stack of documents, lowest precedence first.
pub struct MergeChain {
    figment: Figment,
    layers: usize,
}

impl Default for MergeChain {
    fn default() -> Self {
        Self::new()
    }
}

impl MergeChain {
    pub fn new() -> Self {
        Self { figment: Figment::new(), layers: 0 }
    }

    /// Push `document` on top of everything layered so far.
    pub fn layer(mut self, document: Value) -> Self {
        self.figment = self.figment.merge(Serialized::defaults(document));
        self.layers += 1;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.layers == 0
    }

    /// Collapse the stack into a single document.
    pub fn finish(self) -> Result<Value> {
        if self.is_empty() {
            return Ok(Value::Object(serde_json::Map::new()));
        }
        self.figment.extract::<Value>().map_err(|e| ConfigError::Merge(Box::new(e)))
    }
}

/// Merge `overrides` on top of `base` without touching either input.
pub fn deep_merge(base: &Value, overrides: &Value) -> Result<Value> {
    MergeChain::new().layer(base.clone()).layer(overrides.clone()).finish()
}
