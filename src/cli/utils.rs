//! Shared CLI utilities.

use anyhow::{Context, Result};
use clap::Args;
use envcfg::{Ambient, RcOptions, ResolverOptions};
use std::path::PathBuf;

/// Resolution options shared by every subcommand.
#[derive(Args)]
pub struct ResolveArgs {
    /// Active environment name
    #[arg(long = "env", env = "APP_ENV", value_name = "NAME")]
    pub environment: Option<String>,

    /// Config filename patterns, tried in order (repeatable or comma-separated)
    #[arg(short, long = "pattern", value_name = "PATTERNS")]
    pub patterns: Vec<String>,

    /// Base directory for relative patterns
    #[arg(long, value_name = "DIR")]
    pub cwd: Option<PathBuf>,

    /// Do not merge the defaults file
    #[arg(long)]
    pub no_defaults: bool,

    /// Prefix for rc dotfiles, environment variables and flags
    #[arg(long, value_name = "PREFIX", default_value = envcfg::rc::DEFAULT_PREFIX)]
    pub rc_prefix: String,

    /// Skip rc overrides
    #[arg(long)]
    pub no_rc: bool,

    /// Flags forwarded to the rc convention (after `--`)
    #[arg(last = true, value_name = "RC_ARGS")]
    pub rc_args: Vec<String>,
}

impl ResolveArgs {
    /// Build resolver options from the process state and these flags.
    pub fn options(&self) -> Result<ResolverOptions> {
        let mut ambient = Ambient::capture()
            .context("Failed to read process state")?
            .args(self.rc_args.iter().cloned());
        if let Some(cwd) = &self.cwd {
            ambient.cwd = cwd
                .canonicalize()
                .with_context(|| format!("Invalid --cwd: {}", cwd.display()))?;
        }

        let rc = (!self.no_rc).then(|| RcOptions::new(self.rc_prefix.clone()));
        let mut options =
            ResolverOptions::new(ambient).merge_with_defaults(!self.no_defaults).rc(rc);

        let patterns = parse_csv_multi(&self.patterns);
        if !patterns.is_empty() {
            options = options.patterns(patterns);
        }
        if let Some(environment) = &self.environment {
            options = options.environment(environment.clone());
        }
        Ok(options)
    }
}

/// Flatten repeated, comma-separated values, trimming whitespace and
/// discarding empty segments.
pub fn parse_csv_multi(values: &[String]) -> Vec<String> {
    values
        .iter()
        .flat_map(|s| s.split(','))
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| part.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::parse_csv_multi;

    #[test]
    fn splits_and_trims_repeated_values() {
        let values = vec![
            "config/<%= APP_ENV %>.toml, conf/<%= APP_ENV %>.json".to_string(),
            " ,settings.yaml".to_string(),
        ];
        assert_eq!(
            parse_csv_multi(&values),
            vec!["config/<%= APP_ENV %>.toml", "conf/<%= APP_ENV %>.json", "settings.yaml"]
        );
    }
}
