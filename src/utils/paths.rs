//! Path normalization

use std::path::{Component, Path, PathBuf};

/// Lexically normalize a path: drop `.` components and let `..` pop the
/// previous component. The filesystem is not consulted.
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // Never pop past the root or a drive prefix.
                let poppable = matches!(out.components().next_back(), Some(Component::Normal(_)));
                if poppable {
                    out.pop();
                } else if !out.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Make `rendered` absolute: absolute paths are kept, relative ones are
/// joined to `cwd`. The result is lexically normalized.
pub fn absolutize(cwd: &Path, rendered: &str) -> PathBuf {
    let candidate = Path::new(rendered);
    if candidate.is_absolute() {
        normalize_lexically(candidate)
    } else {
        normalize_lexically(&cwd.join(candidate))
    }
}
