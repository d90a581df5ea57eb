//! Deployment path construction.
//!
//! Built assets are deployed as `<root>/<name>/<version>/<file>`, and a
//! compiled template lands at `<root>/<name>/<version>/<template dir>/<basename>`.
//! From the template's point of view the deployment root is therefore
//! `..` repeated `2 + depth(template dir)` times. That relative root is
//! computed once per session and stored here.

use std::collections::BTreeMap;
use std::path::Path;

use crate::constants::DEFAULT_MODULE_EXTENSION;
use crate::core::FacadeError;
use crate::utils::paths::{self, join, normalize, normalize_slashes, split_extension};

/// Builds absolute and template-relative asset paths for one template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathBuilder {
    module_root: String,
    template_dir: String,
    extension_map: BTreeMap<String, String>,
}

/// Relative path from a template to the deployment root.
///
/// # Errors
///
/// [`FacadeError::ConfigError`] when the template is not under `cwd`.
///
/// # Examples
///
/// ```rust
/// use facade_cli::resolver::path_builder::compute_module_root;
/// use std::path::Path;
///
/// let cwd = Path::new("/work/app");
/// assert_eq!(compute_module_root(cwd, Path::new("/work/app/index.html"))?, "../..");
/// assert_eq!(compute_module_root(cwd, Path::new("/work/app/views/a.html"))?, "../../..");
/// # Ok::<(), facade_cli::core::FacadeError>(())
/// ```
pub fn compute_module_root(cwd: &Path, template_path: &Path) -> Result<String, FacadeError> {
    let template_dir = paths::template_relative_dir(cwd, template_path)?;
    Ok(module_root_for(&template_dir))
}

fn module_root_for(template_dir: &str) -> String {
    vec![".."; 2 + paths::depth(template_dir)].join("/")
}

impl PathBuilder {
    /// Create a builder from precomputed parts.
    ///
    /// Extension map keys may be given with or without their leading dot;
    /// values without a leading dot get one.
    #[must_use]
    pub fn new(
        module_root: impl Into<String>,
        template_dir: impl Into<String>,
        extension_map: &BTreeMap<String, String>,
    ) -> Self {
        let extension_map = extension_map
            .iter()
            .map(|(from, to)| {
                let from = from.trim_start_matches('.').to_string();
                let to = if to.starts_with('.') { to.clone() } else { format!(".{to}") };
                (from, to)
            })
            .collect();

        Self {
            module_root: module_root.into(),
            template_dir: normalize(&template_dir.into()).trim_end_matches('/').to_string(),
            extension_map,
        }
    }

    /// Create a builder for `template_path` inside the project at `cwd`.
    ///
    /// # Errors
    ///
    /// [`FacadeError::ConfigError`] when the template is not under `cwd`.
    pub fn for_template(
        cwd: &Path,
        template_path: &Path,
        extension_map: &BTreeMap<String, String>,
    ) -> Result<Self, FacadeError> {
        let template_dir = paths::template_relative_dir(cwd, template_path)?;
        let module_root = module_root_for(&template_dir);
        tracing::debug!(
            "Template dir '{}' gives module root '{}'",
            template_dir,
            module_root
        );
        Ok(Self::new(module_root, template_dir, extension_map))
    }

    /// Relative path from the template to the deployment root.
    #[must_use]
    pub fn module_root(&self) -> &str {
        &self.module_root
    }

    /// The template's directory relative to the project root (`""` at top level).
    #[must_use]
    pub fn template_dir(&self) -> &str {
        &self.template_dir
    }

    /// Absolute deployment path `/<name>/<version>/<sub_path>`.
    ///
    /// An empty sub-path means the package's entry file `<name>.js`. One
    /// leading slash is stripped, so `/lib/x.js` is package-relative.
    ///
    /// ```rust
    /// use facade_cli::resolver::path_builder::PathBuilder;
    /// use std::collections::BTreeMap;
    ///
    /// let paths = PathBuilder::new("../..", "", &BTreeMap::new());
    /// assert_eq!(paths.module_path("bar", "1.0.0", "/lib\\x.js"), "/bar/1.0.0/lib/x.js");
    /// assert_eq!(paths.module_path("bar", "1.0.0", ""), "/bar/1.0.0/bar.js");
    /// ```
    #[must_use]
    pub fn module_path(&self, name: &str, version: &str, sub_path: &str) -> String {
        let sub_path = normalize_slashes(sub_path);
        let sub_path = sub_path.strip_prefix('/').unwrap_or(&sub_path);
        let sub_path = if sub_path.is_empty() {
            format!("{name}{DEFAULT_MODULE_EXTENSION}")
        } else {
            sub_path.to_string()
        };
        join(["/", name, version, &sub_path])
    }

    /// The same file as [`PathBuilder::module_path`], relative to the template.
    #[must_use]
    pub fn relative_module_path(&self, name: &str, version: &str, sub_path: &str) -> String {
        self.to_relative(&self.module_path(name, version, sub_path))
    }

    /// Path of a same-project static file as written in the template.
    ///
    /// Absolute titles pass through untouched. Relative titles get their
    /// extension mapped and are returned normalized, relative to the template
    /// directory.
    #[must_use]
    pub fn static_path(&self, title: &str) -> String {
        let title = normalize_slashes(title);
        if title.starts_with('/') {
            return title;
        }
        normalize(&self.map_extension(&title))
    }

    /// Absolute deployment path of a same-project static file.
    ///
    /// `/<pkg>/<version>/<template dir>/<mapped title>`.
    #[must_use]
    pub fn project_static_path(&self, pkg: &str, version: &str, title: &str) -> String {
        let mapped = self.map_extension(&normalize_slashes(title));
        join(["/", pkg, version, &self.template_dir, &mapped])
    }

    /// Resolve a relative reference against the template directory.
    ///
    /// The result is relative to the project root and may start with `..`
    /// when the reference climbs out of it.
    #[must_use]
    pub fn resolve_from_template(&self, reference: &str) -> String {
        join([self.template_dir.as_str(), reference])
    }

    /// Convert an absolute deployment path to one relative to the template.
    #[must_use]
    pub fn to_relative(&self, absolute_path: &str) -> String {
        join([self.module_root.as_str(), absolute_path.trim_start_matches('/')])
    }

    fn map_extension(&self, title: &str) -> String {
        let (stem, extension) = split_extension(title);
        match self.extension_map.get(extension.trim_start_matches('.')) {
            Some(mapped) if !extension.is_empty() => format!("{stem}{mapped}"),
            _ => title.to_string(),
        }
    }
}
