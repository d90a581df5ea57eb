//! Project boundary checks for user-supplied relative references.
//!
//! Directive arguments such as `href(id="../about.html")` or combo entries
//! like `./a.css` are resolved lexically against the template directory. A
//! reference whose normalized form climbs above the project root is rejected
//! before any URL is built from it.

use crate::core::FacadeError;
use crate::utils::paths::normalize;

/// Whether a normalized path starts with a parent traversal segment.
#[must_use]
pub fn escapes_root(normalized: &str) -> bool {
    normalized == ".." || normalized.starts_with("../")
}

/// Normalize `relative_path` and reject it if it leaves the project root.
///
/// Returns the normalized, forward-slash form on success.
///
/// # Errors
///
/// [`FacadeError::PathEscapesProject`] when the normalized path is `..` or
/// begins with `../`.
///
/// # Examples
///
/// ```rust
/// use facade_cli::utils::security::check_within_project;
///
/// assert_eq!(check_within_project("views/./a.css").unwrap(), "views/a.css");
/// assert_eq!(check_within_project("views/../a.css").unwrap(), "a.css");
/// assert!(check_within_project("views/../../secret").is_err());
/// ```
pub fn check_within_project(relative_path: &str) -> Result<String, FacadeError> {
    let normalized = normalize(relative_path);
    if escapes_root(&normalized) {
        tracing::debug!("Rejected '{}' (normalized '{}')", relative_path, normalized);
        return Err(FacadeError::PathEscapesProject {
            path: relative_path.to_string(),
        });
    }
    Ok(normalized)
}
