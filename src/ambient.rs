//! Snapshot of process state used during resolution
//!
//! Resolution never reads environment variables, the working directory or
//! argv on its own; everything flows in through an [`Ambient`] value.

use crate::template::Variables;
use std::path::PathBuf;

#[derive(Debug, Clone, Default)]
pub struct Ambient {
    /// Process environment variables.
    pub vars: Variables,
    /// Working directory candidate paths are anchored at.
    pub cwd: PathBuf,
    /// Home directory searched for rc dotfiles.
    pub home: Option<PathBuf>,
    /// Command-line arguments handed to the rc convention (program name excluded).
    pub args: Vec<String>,
}

impl Ambient {
    /// Empty snapshot anchored at `cwd`.
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self { cwd: cwd.into(), ..Self::default() }
    }

    /// Capture the current process state.
    ///
    /// Variables that are not valid UTF-8 are skipped.
    pub fn capture() -> std::io::Result<Self> {
        let vars: Variables = std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect();
        let home = home_dir(&vars);
        Ok(Self {
            cwd: std::env::current_dir()?,
            home,
            args: std::env::args().skip(1).collect(),
            vars,
        })
    }

    pub fn var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }

    pub fn vars(mut self, vars: Variables) -> Self {
        self.vars = vars;
        self
    }

    pub fn home(mut self, home: impl Into<PathBuf>) -> Self {
        self.home = Some(home.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }
}

fn home_dir(vars: &Variables) -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        vars.get("USERPROFILE").map(PathBuf::from)
    }
    #[cfg(not(target_os = "windows"))]
    {
        vars.get("HOME").filter(|h| !h.is_empty()).map(PathBuf::from)
    }
}
