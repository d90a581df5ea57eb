//! URL-style path helpers.
//!
//! Every path facade emits uses forward slashes, whatever the host
//! filesystem uses. These helpers work on strings lexically and never touch
//! the filesystem.

use std::path::{Component, Path};

use crate::core::FacadeError;

/// Convert backslashes to forward slashes.
#[must_use]
pub fn normalize_slashes(path: &str) -> String {
    path.replace('\\', "/")
}

/// Lexically normalize a forward-slash path.
///
/// - `.` segments and empty segments are dropped
/// - `name/..` pairs cancel out
/// - leading `..` segments of a relative path are kept
/// - `..` directly under the root of an absolute path is dropped
/// - a trailing slash is preserved when the input had one and the result is
///   not empty
///
/// ```rust
/// use facade_cli::utils::paths::normalize;
///
/// assert_eq!(normalize("a/./b/../c.js"), "a/c.js");
/// assert_eq!(normalize("../a/../../b"), "../../b");
/// assert_eq!(normalize("/a/../../b"), "/b");
/// assert_eq!(normalize("./"), "");
/// ```
#[must_use]
pub fn normalize(path: &str) -> String {
    let path = normalize_slashes(path);
    let absolute = path.starts_with('/');
    let mut segments: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => match segments.last() {
                Some(&last) if last != ".." => {
                    segments.pop();
                }
                _ if absolute => {}
                _ => segments.push(".."),
            },
            other => segments.push(other),
        }
    }

    let mut normalized = segments.join("/");
    if absolute {
        normalized.insert(0, '/');
    }
    if path.ends_with('/') && !segments.is_empty() {
        normalized.push('/');
    }
    normalized
}

/// Join path parts with single slashes and normalize the result.
///
/// The result is absolute when the first non-empty part is.
#[must_use]
pub fn join<I, S>(parts: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut joined = String::new();
    for part in parts {
        let part = normalize_slashes(part.as_ref());
        if part.is_empty() {
            continue;
        }
        if !joined.is_empty() && !joined.ends_with('/') {
            joined.push('/');
        }
        joined.push_str(if joined.is_empty() { part.as_str() } else { part.trim_start_matches('/') });
    }
    normalize(&joined)
}

/// Directory of `template` relative to `cwd`, as forward-slash segments.
///
/// A relative `template` is taken relative to `cwd`. An empty string means
/// the template sits at the project root.
///
/// # Errors
///
/// [`FacadeError::ConfigError`] if the template lies outside `cwd`.
pub fn template_relative_dir(cwd: &Path, template: &Path) -> Result<String, FacadeError> {
    let relative = if template.is_absolute() {
        template.strip_prefix(cwd).map_err(|_| FacadeError::ConfigError {
            message: format!(
                "Template '{}' is not inside the project root '{}'",
                template.display(),
                cwd.display()
            ),
        })?
    } else {
        template
    };

    let mut segments = Vec::new();
    for component in relative.parent().map(Path::components).into_iter().flatten() {
        match component {
            Component::Normal(part) => segments.push(part.to_string_lossy().into_owned()),
            Component::CurDir => {}
            _ => {
                return Err(FacadeError::ConfigError {
                    message: format!(
                        "Template path '{}' must stay inside the project root",
                        template.display()
                    ),
                });
            }
        }
    }
    Ok(segments.join("/"))
}

/// Number of segments in a normalized relative directory (`""` → 0).
#[must_use]
pub fn depth(relative_dir: &str) -> usize {
    relative_dir.split('/').filter(|s| !s.is_empty()).count()
}

/// Split the final segment's extension: `a/b.min.css` → (`a/b.min`, `.css`).
///
/// A leading dot on the file name (`.eslintrc`) is not an extension.
#[must_use]
pub fn split_extension(path: &str) -> (&str, &str) {
    let file_start = path.rfind('/').map_or(0, |i| i + 1);
    match path[file_start..].rfind('.') {
        Some(dot) if dot > 0 => path.split_at(file_start + dot),
        _ => (path, ""),
    }
}
