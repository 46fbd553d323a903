//! Environment variable overrides for rc
//!
//! `{prefix}_db__host=x` becomes `{"db": {"host": "x"}}`. The prefix match
//! ignores ASCII case; the remainder keeps its case. Values stay strings.

use super::set_path;
use crate::template::Variables;
use serde_json::{Map, Value};

pub fn env_overrides(prefix: &str, vars: &Variables) -> Value {
    let needle = format!("{}_", prefix);
    let mut out = Map::new();

    for (key, value) in vars {
        let Some(rest) = strip_prefix_ignore_case(key, &needle) else {
            continue;
        };
        let path: Vec<&str> = rest.split("__").filter(|s| !s.is_empty()).collect();
        if path.is_empty() {
            continue;
        }
        set_path(&mut out, &path, Value::String(value.clone()), false);
    }

    Value::Object(out)
}

fn strip_prefix_ignore_case<'a>(key: &'a str, prefix: &str) -> Option<&'a str> {
    let head = key.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        key.get(prefix.len()..)
    } else {
        None
    }
}
