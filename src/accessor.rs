//! Read-only accessor over a merged configuration
//!
//! [`Config`] answers dotted-path lookups (`database.username`,
//! `servers[0].host`) and also exposes the merged document's top-level
//! fields directly through indexing and [`Config::raw`].

use crate::error::{ConfigError, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::ops::Index;

static NULL: Value = Value::Null;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    data: Value,
}

impl Config {
    pub fn new(data: Value) -> Self {
        Self { data }
    }

    /// Look up a dotted path. `None` only when the path is absent; stored
    /// `null`, `false`, `0` and empty collections are returned as-is.
    pub fn get(&self, key: &str) -> Option<&Value> {
        if let Some(direct) = self.data.as_object().and_then(|m| m.get(key)) {
            return Some(direct);
        }
        let segments = parse_path(key)?;
        lookup(&self.data, &segments)
    }

    /// Look up a dotted path, falling back to `default` when it is absent.
    pub fn get_or(&self, key: &str, default: impl Into<Value>) -> Value {
        match self.get(key) {
            Some(value) => value.clone(),
            None => default.into(),
        }
    }

    /// Look up a dotted path and deserialize it into `T`.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        self.get(key)
            .map(|value| {
                serde_json::from_value(value.clone())
                    .map_err(|source| ConfigError::Type { key: key.to_string(), source })
            })
            .transpose()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// The merged document.
    pub fn raw(&self) -> &Value {
        &self.data
    }

    /// Top-level field names.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.data.as_object().into_iter().flat_map(|m| m.keys().map(String::as_str))
    }

    pub fn into_inner(self) -> Value {
        self.data
    }
}

impl From<Value> for Config {
    fn from(data: Value) -> Self {
        Self::new(data)
    }
}

/// Direct top-level field access; absent fields read as `Value::Null`.
impl Index<&str> for Config {
    type Output = Value;

    fn index(&self, key: &str) -> &Value {
        self.data.get(key).unwrap_or(&NULL)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Key(String),
    Index(usize),
}

/// Split `a.b[0]["c.d"]` into segments. Returns `None` for malformed paths.
fn parse_path(path: &str) -> Option<Vec<Segment>> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut chars = path.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '.' => {
                if !current.is_empty() {
                    segments.push(Segment::Key(std::mem::take(&mut current)));
                }
            }
            '[' => {
                if !current.is_empty() {
                    segments.push(Segment::Key(std::mem::take(&mut current)));
                }
                let mut inner = String::new();
                let mut closed = false;
                for c in chars.by_ref() {
                    if c == ']' {
                        closed = true;
                        break;
                    }
                    inner.push(c);
                }
                if !closed {
                    return None;
                }
                let inner = inner.trim();
                let quoted = inner.len() >= 2
                    && ((inner.starts_with('"') && inner.ends_with('"'))
                        || (inner.starts_with('\'') && inner.ends_with('\'')));
                if quoted {
                    segments.push(Segment::Key(inner[1..inner.len() - 1].to_string()));
                } else if let Ok(idx) = inner.parse::<usize>() {
                    segments.push(Segment::Index(idx));
                } else {
                    segments.push(Segment::Key(inner.to_string()));
                }
            }
            c => current.push(c),
        }
    }
    if !current.is_empty() {
        segments.push(Segment::Key(current));
    }

    if segments.is_empty() {
        None
    } else {
        Some(segments)
    }
}

fn lookup<'a>(root: &'a Value, segments: &[Segment]) -> Option<&'a Value> {
    let mut current = root;
    for segment in segments {
        current = match (current, segment) {
            (Value::Object(map), Segment::Key(key)) => map.get(key)?,
            (Value::Object(map), Segment::Index(idx)) => map.get(&idx.to_string())?,
            (Value::Array(items), Segment::Index(idx)) => items.get(*idx)?,
            (Value::Array(items), Segment::Key(key)) => items.get(key.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}
