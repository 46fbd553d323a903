//! Config file loading

use crate::error::{ConfigError, Result};
use serde_json::{Map, Number, Value};
use std::fs;
use std::path::Path;

/// Document formats understood by the loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Toml,
    Yaml,
}

impl Format {
    /// Pick a format from the file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("").to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(Self::Json),
            "toml" => Some(Self::Toml),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Json => "JSON",
            Self::Toml => "TOML",
            Self::Yaml => "YAML",
        }
    }
}

/// Load a config document from a discovered file.
///
/// Errors are never swallowed here: a file that exists but cannot be read
/// or parsed is fatal for the whole resolution.
pub fn load_document(config_file: &Path) -> Result<Value> {
    let format = Format::from_path(config_file)
        .ok_or_else(|| ConfigError::UnsupportedFormat { path: config_file.to_path_buf() })?;

    let content = fs::read_to_string(config_file)
        .map_err(|source| ConfigError::Read { path: config_file.to_path_buf(), source })?;

    let parsed = parse_document(&content, format, config_file)?;
    tracing::debug!("Loaded {} config from {}", format.name(), config_file.display());
    Ok(parsed)
}

/// Parse `content` in the given format into a mapping.
pub fn parse_document(content: &str, format: Format, config_file: &Path) -> Result<Value> {
    let raw: Value = match format {
        Format::Json => serde_json::from_str(content)
            .map_err(|e| ConfigError::parse(config_file, format.name(), e))?,
        Format::Toml => {
            let table: toml::Table = toml::from_str(content)
                .map_err(|e| ConfigError::parse(config_file, format.name(), e))?;
            toml_to_json(toml::Value::Table(table))
        }
        Format::Yaml => serde_yaml::from_str(content)
            .map_err(|e| ConfigError::parse(config_file, format.name(), e))?,
    };

    match raw {
        Value::Object(_) => Ok(raw),
        // An empty YAML file deserializes to null.
        Value::Null => Ok(Value::Object(Map::new())),
        _ => Err(ConfigError::NotAMapping { path: config_file.to_path_buf() }),
    }
}

/// Convert a TOML value into JSON. Datetimes become their RFC 3339 text;
/// non-finite floats have no JSON form and become null.
fn toml_to_json(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::from(i),
        toml::Value::Float(f) => Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(items) => Value::Array(items.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => {
            Value::Object(table.into_iter().map(|(k, v)| (k, toml_to_json(v))).collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_toml_document() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("default.toml");
        fs::write(&path, "usedb = false\n[mysql]\nhost = 'localhost'\nport = 3306\n")
            .expect("write");

        let doc = load_document(&path).expect("doc");
        assert_eq!(doc, json!({"usedb": false, "mysql": {"host": "localhost", "port": 3306}}));
    }

    #[test]
    fn test_toml_datetimes_become_strings() {
        let content = "released = 2024-01-02T03:04:05Z\nbirthday = 1979-05-27\n\
                       [window]\nopens = 07:32:00\nstamps = [2024-01-02T03:04:05Z]\n";
        let doc = parse_document(content, Format::Toml, Path::new("default.toml")).expect("doc");
        assert_eq!(
            doc,
            json!({
                "released": "2024-01-02T03:04:05Z",
                "birthday": "1979-05-27",
                "window": {"opens": "07:32:00", "stamps": ["2024-01-02T03:04:05Z"]}
            })
        );
    }

    #[test]
    fn test_load_yaml_document() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("staging.yml");
        fs::write(&path, "mysql:\n  host: staging.mysql.com\n  user: staging_root\n")
            .expect("write");

        let doc = load_document(&path).expect("doc");
        assert_eq!(doc["mysql"]["host"], "staging.mysql.com");
    }

    #[test]
    fn test_empty_yaml_is_empty_mapping() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("empty.yaml");
        fs::write(&path, "").expect("write");

        assert_eq!(load_document(&path).expect("doc"), json!({}));
    }

    #[test]
    fn test_malformed_json_is_fatal() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("production.json");
        fs::write(&path, "{\"mysql\": ").expect("write");

        let err = load_document(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { format: "JSON", .. }));
    }

    #[test]
    fn test_unsupported_extension() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("production.js");
        fs::write(&path, "module.exports = {}").expect("write");

        let err = load_document(&path).unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat { .. }));
    }

    #[test]
    fn test_top_level_scalar_is_rejected() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("list.json");
        fs::write(&path, "[1, 2, 3]").expect("write");

        let err = load_document(&path).unwrap_err();
        assert!(matches!(err, ConfigError::NotAMapping { .. }));
    }
}
