//! Configuration resolution pipeline
//!
//! 1. Discover the environment file and the defaults file from the patterns.
//! 2. Fail when neither exists.
//! 3. Merge defaults (optional), then the environment file, then rc
//!    overrides (optional), later layers winning.

use crate::accessor::Config;
use crate::ambient::Ambient;
use crate::config::{load_document, MergeChain};
use crate::discovery::{compile_patterns, discover};
use crate::error::{ConfigError, Result};
use crate::rc::{self, RcOptions};
use crate::template::{layer_variables, PatternTemplate, Variables};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Variable naming the active environment.
pub const ENV_VAR: &str = "APP_ENV";
/// Environment used when [`ENV_VAR`] is not set.
pub const DEFAULT_ENVIRONMENT: &str = "development";
/// Value of [`ENV_VAR`] when looking for the defaults file.
pub const DEFAULTS_NAME: &str = "default";
pub const DEFAULT_PATTERN: &str = "config/<%= APP_ENV %>.toml";

/// Options for a single resolution.
#[derive(Debug, Clone)]
pub struct ResolverOptions {
    /// Filename templates, tried in order.
    pub patterns: Vec<String>,
    /// Variables used to find the environment file.
    pub variables: Variables,
    /// Variables used to find the defaults file; `None` skips it entirely.
    pub default_variables: Option<Variables>,
    /// Whether the defaults file takes part in the merge.
    pub merge_with_defaults: bool,
    /// rc overrides layered on top, if enabled.
    pub rc: Option<RcOptions>,
    /// Process state: environment, working directory, home, argv.
    pub ambient: Ambient,
}

impl ResolverOptions {
    /// Default options over an explicit process snapshot.
    pub fn new(ambient: Ambient) -> Self {
        let environment =
            ambient.vars.get(ENV_VAR).cloned().unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_string());
        Self {
            patterns: vec![DEFAULT_PATTERN.to_string()],
            variables: single_var(ENV_VAR, &environment),
            default_variables: Some(single_var(ENV_VAR, DEFAULTS_NAME)),
            merge_with_defaults: true,
            rc: Some(RcOptions::default()),
            ambient,
        }
    }

    /// Default options over the current process state.
    pub fn from_process() -> Result<Self> {
        Ambient::capture().map(Self::new).map_err(ConfigError::Ambient)
    }

    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.patterns = vec![pattern.into()];
        self
    }

    pub fn patterns<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.patterns = patterns.into_iter().map(Into::into).collect();
        self
    }

    /// Set the active environment name (`APP_ENV`).
    pub fn environment(self, name: impl Into<String>) -> Self {
        self.variable(ENV_VAR, name)
    }

    pub fn variable(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.insert(key.into(), value.into());
        self
    }

    pub fn variables(mut self, variables: Variables) -> Self {
        self.variables = variables;
        self
    }

    pub fn default_variables(mut self, variables: Option<Variables>) -> Self {
        self.default_variables = variables;
        self
    }

    pub fn cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.ambient.cwd = cwd.into();
        self
    }

    pub fn merge_with_defaults(mut self, merge: bool) -> Self {
        self.merge_with_defaults = merge;
        self
    }

    pub fn rc(mut self, rc: Option<RcOptions>) -> Self {
        self.rc = rc;
        self
    }
}

/// Files picked by discovery.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscoveredPaths {
    pub defaults: Option<PathBuf>,
    pub environment: Option<PathBuf>,
}

impl DiscoveredPaths {
    pub fn is_empty(&self) -> bool {
        self.defaults.is_none() && self.environment.is_none()
    }
}

pub struct Resolver {
    options: ResolverOptions,
    templates: Vec<PatternTemplate>,
}

impl Resolver {
    pub fn new(options: ResolverOptions) -> Self {
        let templates = compile_patterns(&options.patterns);
        Self { options, templates }
    }

    pub fn options(&self) -> &ResolverOptions {
        &self.options
    }

    fn cwd(&self) -> &Path {
        &self.options.ambient.cwd
    }

    /// Find the environment and defaults files without loading them.
    pub fn discover_paths(&self) -> DiscoveredPaths {
        let ambient_vars = &self.options.ambient.vars;

        let env_vars = layer_variables(ambient_vars, &self.options.variables);
        let environment = discover(&self.templates, &env_vars, self.cwd());

        let defaults = self.options.default_variables.as_ref().and_then(|vars| {
            let default_vars = layer_variables(ambient_vars, vars);
            discover(&self.templates, &default_vars, self.cwd())
        });

        DiscoveredPaths { defaults, environment }
    }

    /// Resolve and merge into a plain document.
    pub fn resolve_document(&self) -> Result<Value> {
        let paths = self.discover_paths();
        if paths.is_empty() {
            return Err(ConfigError::NotFound {
                patterns: self.options.patterns.clone(),
                cwd: self.cwd().to_path_buf(),
            });
        }

        let mut chain = MergeChain::new();

        if self.options.merge_with_defaults {
            if let Some(path) = &paths.defaults {
                tracing::debug!("Merging defaults from {}", path.display());
                chain = chain.layer(load_document(path)?);
            }
        }

        if let Some(path) = &paths.environment {
            tracing::debug!("Merging environment config from {}", path.display());
            chain = chain.layer(load_document(path)?);
        }

        if let Some(rc_options) = &self.options.rc {
            let layer = rc::load(rc_options, &self.options.ambient)?;
            tracing::debug!(
                "Merging rc overrides for prefix '{}' ({} files)",
                rc_options.prefix,
                layer.files.len()
            );
            chain = chain.layer(layer.document);
        }

        chain.finish()
    }

    /// Resolve and wrap the merged document in an accessor.
    pub fn resolve(&self) -> Result<Config> {
        self.resolve_document().map(Config::new)
    }
}

/// Resolve `options` into an accessor.
pub fn resolve(options: ResolverOptions) -> Result<Config> {
    Resolver::new(options).resolve()
}

/// Resolve `options` into the raw merged document.
pub fn resolve_document(options: ResolverOptions) -> Result<Value> {
    Resolver::new(options).resolve_document()
}

/// Resolve with default options over the current process and look up `key`,
/// returning `default` when it is absent.
pub fn lookup(key: &str, default: impl Into<Value>) -> Result<Value> {
    let ambient = Ambient::capture().map_err(ConfigError::Ambient)?;
    lookup_with(ambient, key, default)
}

/// [`lookup`] over an explicit process snapshot.
pub fn lookup_with(ambient: Ambient, key: &str, default: impl Into<Value>) -> Result<Value> {
    let config = resolve(ResolverOptions::new(ambient))?;
    Ok(config.get_or(key, default))
}

fn single_var(key: &str, value: &str) -> Variables {
    let mut vars = Variables::new();
    vars.insert(key.to_string(), value.to_string());
    vars
}
