//! Candidate path discovery
//!
//! Renders each pattern in order and returns the first one that points at a
//! readable regular file.

use crate::template::{PatternTemplate, Variables};
use crate::utils::absolutize;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

/// Render `template` with `variables` and anchor the result at `cwd`.
pub fn build_path(
    template: &PatternTemplate,
    cwd: &Path,
    variables: &Variables,
) -> crate::Result<PathBuf> {
    let rendered = template.render(variables)?;
    Ok(absolutize(cwd, &rendered))
}

/// True when `path` is a regular file that can be opened for reading.
///
/// Any failure (missing, permission denied, not a regular file) counts as
/// absent. The file type is checked before opening so a FIFO never blocks.
pub fn is_accessible(path: &Path) -> bool {
    match fs::metadata(path) {
        Ok(meta) if meta.is_file() => File::open(path).is_ok(),
        _ => false,
    }
}

/// Return the first pattern whose rendered path is accessible.
///
/// Patterns that fail to render are logged and skipped.
pub fn discover(
    templates: &[PatternTemplate],
    variables: &Variables,
    cwd: &Path,
) -> Option<PathBuf> {
    for template in templates {
        let path = match build_path(template, cwd, variables) {
            Ok(path) => path,
            Err(e) => {
                tracing::warn!("Skipping config pattern {}: {}", template.source(), e);
                continue;
            }
        };

        if is_accessible(&path) {
            tracing::debug!("Config pattern {} matched {}", template.source(), path.display());
            return Some(path);
        }
        tracing::debug!("Config candidate {} not found", path.display());
    }

    None
}

/// Compile every pattern, dropping (and logging) the ones that are malformed.
pub fn compile_patterns(patterns: &[String]) -> Vec<PatternTemplate> {
    patterns
        .iter()
        .filter_map(|pattern| match PatternTemplate::compile(pattern) {
            Ok(template) => Some(template),
            Err(e) => {
                tracing::warn!("Ignoring malformed config pattern: {}", e);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn env(name: &str) -> Variables {
        [("APP_ENV".to_string(), name.to_string())].into_iter().collect()
    }

    fn compile(patterns: &[&str]) -> Vec<PatternTemplate> {
        compile_patterns(&patterns.iter().map(|p| p.to_string()).collect::<Vec<_>>())
    }

    #[test]
    fn first_existing_candidate_wins() {
        let tmp = TempDir::new().expect("tmp");
        fs::create_dir_all(tmp.path().join("a")).expect("mkdir a");
        fs::create_dir_all(tmp.path().join("b")).expect("mkdir b");
        fs::write(tmp.path().join("a/dev.json"), "{}").expect("write a");
        fs::write(tmp.path().join("b/dev.json"), "{}").expect("write b");

        let templates = compile(&[
            "missing/<%= APP_ENV %>.json",
            "b/<%= APP_ENV %>.json",
            "a/<%= APP_ENV %>.json",
        ]);
        let found = discover(&templates, &env("dev"), tmp.path());
        assert_eq!(found, Some(tmp.path().join("b/dev.json")));
    }

    #[test]
    fn returns_none_when_nothing_matches() {
        let tmp = TempDir::new().expect("tmp");
        let templates = compile(&["config/<%= APP_ENV %>.json"]);
        assert!(discover(&templates, &env("dev"), tmp.path()).is_none());
    }

    #[test]
    fn render_failures_fall_through_to_next_pattern() {
        let tmp = TempDir::new().expect("tmp");
        fs::write(tmp.path().join("dev.toml"), "").expect("write");

        let templates = compile(&["<%= UNDEFINED_VAR %>.toml", "<%= APP_ENV %>.toml"]);
        let found = discover(&templates, &env("dev"), tmp.path());
        assert_eq!(found, Some(tmp.path().join("dev.toml")));
    }

    #[test]
    fn directories_are_not_accessible_files() {
        let tmp = TempDir::new().expect("tmp");
        fs::create_dir_all(tmp.path().join("dev.json")).expect("mkdir");
        assert!(!is_accessible(&tmp.path().join("dev.json")));
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_candidate_falls_through_to_next_pattern() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().expect("tmp");
        fs::create_dir_all(tmp.path().join("locked")).expect("mkdir locked");
        fs::create_dir_all(tmp.path().join("open")).expect("mkdir open");
        let locked = tmp.path().join("locked/dev.json");
        fs::write(&locked, "{}").expect("write locked");
        fs::write(tmp.path().join("open/dev.json"), "{}").expect("write open");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).expect("chmod");

        // root reads through any mode bits
        if File::open(&locked).is_ok() {
            return;
        }

        let templates = compile(&["locked/<%= APP_ENV %>.json", "open/<%= APP_ENV %>.json"]);
        let found = discover(&templates, &env("dev"), tmp.path());
        assert!(!is_accessible(&locked));
        assert_eq!(found, Some(tmp.path().join("open/dev.json")));
    }

    #[cfg(unix)]
    #[test]
    fn fifo_is_not_an_accessible_file() {
        let tmp = TempDir::new().expect("tmp");
        let fifo = tmp.path().join("dev.json");
        let status =
            std::process::Command::new("mkfifo").arg(&fifo).status().expect("spawn mkfifo");
        assert!(status.success());
        assert!(!is_accessible(&fifo));
    }

    #[test]
    fn malformed_patterns_are_dropped_at_compile_time() {
        let templates = compile(&["<%= APP_ENV .json", "config/<%= APP_ENV %>.json"]);
        assert_eq!(templates.len(), 1);
        assert_eq!(templates[0].source(), "config/<%= APP_ENV %>.json");
    }

    #[test]
    fn absolute_patterns_ignore_cwd() {
        let tmp = TempDir::new().expect("tmp");
        let file = tmp.path().join("prod.yaml");
        fs::write(&file, "a: 1\n").expect("write");

        let pattern = format!("{}/<%= APP_ENV %>.yaml", tmp.path().display());
        let templates = compile(&[pattern.as_str()]);
        let found = discover(&templates, &env("prod"), Path::new("/nonexistent"));
        assert_eq!(found, Some(file));
    }
}
