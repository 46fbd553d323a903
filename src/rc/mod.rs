//! Runtime-configuration (rc) overrides
//!
//! Given an application prefix `app`, overrides are gathered from (lowest
//! precedence first):
//!
//! 1. `/etc/{app}rc`, `/etc/{app}/config`
//! 2. `~/.{app}rc`, `~/.{app}/config`, `~/.config/{app}`, `~/.config/{app}/config`
//! 3. the nearest `.{app}rc` walking up from the working directory
//! 4. the file named by `{app}_config` in the environment
//! 5. the file named by `--config` on the command line
//! 6. `{app}_*` environment variables
//! 7. command-line flags
//!
//! rc files are JSON when they start with `{`, INI otherwise.

pub mod args;
pub mod env;
pub mod ini;

use crate::ambient::Ambient;
use crate::config::{parse_document, Format, MergeChain};
use crate::discovery::is_accessible;
use crate::error::{ConfigError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Number, Value};
use std::fs;
use std::path::{Path, PathBuf};

pub use args::parse_args;
pub use env::env_overrides;
pub use ini::parse_ini;

/// Keys the convention uses for its own bookkeeping; never merged.
pub const BOOKKEEPING_KEYS: [&str; 3] = ["config", "configs", "_"];

pub const DEFAULT_PREFIX: &str = "local";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RcOptions {
    pub prefix: String,
}

impl RcOptions {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into() }
    }
}

impl Default for RcOptions {
    fn default() -> Self {
        Self::new(DEFAULT_PREFIX)
    }
}

/// Overrides gathered by the rc convention.
#[derive(Debug, Clone, PartialEq)]
pub struct RcLayer {
    /// Merged overrides with bookkeeping keys removed.
    pub document: Value,
    /// rc files that contributed, lowest precedence first.
    pub files: Vec<PathBuf>,
}

/// Collect rc overrides for `options.prefix` from `ambient`.
pub fn load(options: &RcOptions, ambient: &Ambient) -> Result<RcLayer> {
    let app = options.prefix.as_str();
    let env_doc = env_overrides(app, &ambient.vars);
    let args_doc = parse_args(&ambient.args);

    let mut files = Vec::new();
    for path in default_candidates(app, ambient) {
        if is_accessible(&path) {
            files.push(path);
        }
    }
    if let Some(local) = find_up(&ambient.cwd, &format!(".{}rc", app)) {
        files.push(local);
    }
    for explicit in [env_doc.get("config"), args_doc.get("config")] {
        if let Some(Value::String(path)) = explicit {
            let path = ambient.cwd.join(path);
            if is_accessible(&path) {
                files.push(path);
            } else {
                tracing::debug!("Skipping unreadable rc file {}", path.display());
            }
        }
    }

    let mut chain = MergeChain::new();
    for path in &files {
        tracing::debug!("Loading rc file {}", path.display());
        chain = chain.layer(parse_rc_file(path)?);
    }
    let mut document = chain.layer(env_doc).layer(args_doc).finish()?;
    strip_bookkeeping(&mut document);

    Ok(RcLayer { document, files })
}

fn default_candidates(app: &str, ambient: &Ambient) -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    #[cfg(not(target_os = "windows"))]
    {
        let etc = Path::new("/etc");
        candidates.push(etc.join(format!("{}rc", app)));
        candidates.push(etc.join(app).join("config"));
    }

    if let Some(home) = &ambient.home {
        candidates.push(home.join(format!(".{}rc", app)));
        candidates.push(home.join(format!(".{}", app)).join("config"));
        candidates.push(home.join(".config").join(app));
        candidates.push(home.join(".config").join(app).join("config"));
    }

    candidates
}

/// Walk up from `start` looking for `file_name`.
pub fn find_up(start: &Path, file_name: &str) -> Option<PathBuf> {
    start.ancestors().map(|dir| dir.join(file_name)).find(|candidate| is_accessible(candidate))
}

/// Parse an rc file: JSON when it opens with `{`, INI otherwise.
pub fn parse_rc_file(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path)
        .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;

    if content.trim_start().starts_with('{') {
        parse_document(&content, Format::Json, path)
    } else {
        Ok(parse_ini(&content))
    }
}

/// Remove the convention's bookkeeping keys from a document.
pub fn strip_bookkeeping(document: &mut Value) {
    if let Value::Object(map) = document {
        for key in BOOKKEEPING_KEYS {
            map.remove(key);
        }
    }
}

static NUMBER_LITERAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[-+]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][-+]?\d+)?$").expect("number regex")
});

/// Turn a command-line token into a JSON scalar.
pub(crate) fn coerce_scalar(raw: &str) -> Value {
    match raw {
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        _ => {}
    }
    if NUMBER_LITERAL.is_match(raw) {
        if let Ok(int) = raw.parse::<i64>() {
            return Value::from(int);
        }
        if let Some(num) = raw.parse::<f64>().ok().and_then(Number::from_f64) {
            return Value::Number(num);
        }
    }
    Value::String(raw.to_string())
}

/// Set `value` at `path` inside `out`, creating intermediate mappings.
///
/// With `accumulate`, an existing value is turned into (or extended as) an
/// array instead of being overwritten.
pub(crate) fn set_path(out: &mut Map<String, Value>, path: &[&str], value: Value, accumulate: bool) {
    let Some((last, parents)) = path.split_last() else {
        return;
    };

    let mut current: &mut Map<String, Value> = out;
    for segment in parents {
        let entry =
            current.entry(segment.to_string()).or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }
        let Value::Object(next) = entry else {
            return;
        };
        current = next;
    }

    if accumulate {
        if let Some(existing) = current.get_mut(*last) {
            match existing {
                Value::Array(items) => items.push(value),
                other => {
                    let previous = other.take();
                    *other = Value::Array(vec![previous, value]);
                }
            }
            return;
        }
    }
    current.insert(last.to_string(), value);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    // A prefix no real machine carries in /etc.
    const APP: &str = "envcfgrctest";

    #[test]
    fn local_rc_is_found_walking_up() {
        let tmp = TempDir::new().expect("tmp");
        let nested = tmp.path().join("a/b/c");
        fs::create_dir_all(&nested).expect("mkdir");
        fs::write(tmp.path().join(format!(".{}rc", APP)), "usedb = true\n").expect("write");

        let layer = load(&RcOptions::new(APP), &Ambient::new(&nested)).expect("rc");
        assert_eq!(layer.document, json!({"usedb": true}));
        assert_eq!(layer.files, vec![tmp.path().join(format!(".{}rc", APP))]);
    }

    #[test]
    fn precedence_is_files_then_env_then_args() {
        let tmp = TempDir::new().expect("tmp");
        let home = tmp.path().join("home");
        let project = tmp.path().join("project");
        fs::create_dir_all(&home).expect("mkdir home");
        fs::create_dir_all(&project).expect("mkdir project");
        fs::write(
            home.join(format!(".{}rc", APP)),
            r#"{"a": "home", "b": "home", "c": "home", "d": "home"}"#,
        )
        .expect("write home rc");
        fs::write(project.join(format!(".{}rc", APP)), "b = local\nc = local\nd = local\n")
            .expect("write local rc");

        let ambient = Ambient::new(&project)
            .home(&home)
            .var(format!("{}_c", APP), "env")
            .var(format!("{}_d", APP), "env")
            .args(["--d", "args"]);
        let layer = load(&RcOptions::new(APP), &ambient).expect("rc");

        assert_eq!(layer.document, json!({"a": "home", "b": "local", "c": "env", "d": "args"}));
        assert_eq!(layer.files.len(), 2);
    }

    #[test]
    fn explicit_config_flag_loads_file_and_is_stripped() {
        let tmp = TempDir::new().expect("tmp");
        fs::write(tmp.path().join("extra.json"), r#"{"mysql": {"host": "flag.db"}}"#)
            .expect("write");

        let ambient = Ambient::new(tmp.path()).args(["--config", "extra.json", "positional"]);
        let layer = load(&RcOptions::new(APP), &ambient).expect("rc");

        assert_eq!(layer.document, json!({"mysql": {"host": "flag.db"}}));
        assert_eq!(layer.files, vec![tmp.path().join("extra.json")]);
    }

    #[test]
    fn missing_explicit_config_files_are_ignored() {
        let tmp = TempDir::new().expect("tmp");
        let ambient = Ambient::new(tmp.path())
            .var(format!("{}_config", APP), "gone.json")
            .args(["--config", "nope.ini", "--port", "8080"]);
        let layer = load(&RcOptions::new(APP), &ambient).expect("rc");

        assert_eq!(layer.document, json!({"port": 8080}));
        assert!(layer.files.is_empty());
    }

    #[test]
    fn malformed_json_rc_is_fatal() {
        let tmp = TempDir::new().expect("tmp");
        fs::write(tmp.path().join(format!(".{}rc", APP)), "{ not json").expect("write");

        let err = load(&RcOptions::new(APP), &Ambient::new(tmp.path())).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn nothing_configured_yields_empty_document() {
        let tmp = TempDir::new().expect("tmp");
        let layer = load(&RcOptions::new(APP), &Ambient::new(tmp.path())).expect("rc");
        assert_eq!(layer.document, json!({}));
        assert!(layer.files.is_empty());
    }

    #[test]
    fn coerces_numbers_and_booleans_only() {
        assert_eq!(coerce_scalar("42"), json!(42));
        assert_eq!(coerce_scalar("-1.5"), json!(-1.5));
        assert_eq!(coerce_scalar("false"), json!(false));
        assert_eq!(coerce_scalar("inf"), json!("inf"));
        assert_eq!(coerce_scalar("1.2.3"), json!("1.2.3"));
    }
}
