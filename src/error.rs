//! Error types for configuration resolution

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// Neither the defaults file nor the environment file could be found.
    #[error(
        "no configuration file found: neither the environment file nor the defaults file exists (patterns: {}, cwd: {})",
        patterns.join(", "),
        cwd.display()
    )]
    NotFound { patterns: Vec<String>, cwd: PathBuf },

    #[error("failed to capture process state: {0}")]
    Ambient(#[source] std::io::Error),

    #[error("failed to render pattern '{pattern}': {reason}")]
    Template { pattern: String, reason: String },

    #[error("failed reading config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid {format} in {}: {message}", path.display())]
    Parse { path: PathBuf, format: &'static str, message: String },

    #[error("unsupported config extension for file {}", path.display())]
    UnsupportedFormat { path: PathBuf },

    #[error("config file {} must contain a mapping at the top level", path.display())]
    NotAMapping { path: PathBuf },

    #[error("failed to merge configuration layers: {0}")]
    Merge(#[from] Box<figment::Error>),

    #[error("value at '{key}' has an unexpected type: {source}")]
    Type {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ConfigError {
    pub(crate) fn parse(path: &std::path::Path, format: &'static str, err: impl ToString) -> Self {
        Self::Parse { path: path.to_path_buf(), format, message: err.to_string() }
    }

    /// True for the terminal "nothing to load" case.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_lists_patterns() {
        let err = ConfigError::NotFound {
            patterns: vec!["config/<%= APP_ENV %>.toml".into(), "conf/${APP_ENV}.json".into()],
            cwd: PathBuf::from("/srv/app"),
        };
        let msg = err.to_string();
        assert!(msg.contains("config/<%= APP_ENV %>.toml, conf/${APP_ENV}.json"));
        assert!(msg.contains("/srv/app"));
        assert!(err.is_not_found());
    }
}
