//! Lexical path helpers.

use std::path::{Component, Path, PathBuf};

/// Collapse `.` and `..` components without touching the filesystem.
/// A `..` that would climb above the start of the path is kept.
pub(crate) fn normalize_path(path: &Path) -> PathBuf {
    let mut result = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir if result.pop() => {}
            other => result.push(other),
        }
    }
    result
}

/// Check whether `path` lies inside `dir` (or is `dir` itself), comparing
/// normalized components so that `..` cannot escape the prefix.
pub fn is_path_under(path: &Path, dir: &Path) -> bool {
    normalize_path(path).starts_with(normalize_path(dir))
}

/// Expand `{name}` placeholders in a definition path.
///
/// Unknown placeholders are left untouched.
pub fn expand_placeholders(raw: &str, vars: &[(&str, &Path)]) -> PathBuf {
    let mut expanded = raw.to_string();
    for (name, value) in vars {
        let placeholder = format!("{{{}}}", name);
        if expanded.contains(&placeholder) {
            expanded = expanded.replace(&placeholder, &value.to_string_lossy());
        }
    }
    PathBuf::from(expanded)
}
