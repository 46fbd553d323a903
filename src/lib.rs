//! envcfg: per-environment configuration resolution
//!
//! Locates a defaults file and an environment-specific file from filename
//! patterns, merges them (environment wins), optionally layers rc overrides
//! from dotfiles, environment variables and command-line flags, and hands
//! back a [`Config`] accessor with dotted-path lookup.
//!
//! ```no_run
//! use envcfg::{resolve, Ambient, ResolverOptions};
//!
//! # fn main() -> envcfg::Result<()> {
//! let options = ResolverOptions::new(Ambient::new("/srv/app"))
//!     .pattern("config/<%= APP_ENV %>.toml")
//!     .environment("production");
//! let config = resolve(options)?;
//! let host = config.get_or("mysql.host", "localhost");
//! # let _ = host;
//! # Ok(())
//! # }
//! ```

pub mod accessor;
pub mod ambient;
pub mod config;
pub mod discovery;
pub mod error;
pub mod rc;
pub mod resolver;
pub mod template;
pub mod utils;

pub use accessor::Config;
pub use ambient::Ambient;
pub use error::{ConfigError, Result};
pub use rc::{RcLayer, RcOptions};
pub use resolver::{
    lookup, lookup_with, resolve, resolve_document, DiscoveredPaths, Resolver, ResolverOptions,
    ENV_VAR,
};
pub use template::{PatternTemplate, Variables};
