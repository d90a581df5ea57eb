//! Package descriptor of the current project.
//!
//! Only `name` and `version` matter to resolution; every other field of the
//! descriptor file is ignored.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::core::FacadeError;

/// Name and version of the project whose templates are being compiled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageDescriptor {
    /// Package name; must be non-empty.
    #[serde(default)]
    pub name: String,

    /// Package version, if declared.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl PackageDescriptor {
    /// Descriptor with an explicit version.
    #[must_use]
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: Some(version.into()),
        }
    }

    /// Load a descriptor from a JSON file.
    ///
    /// # Errors
    ///
    /// [`FacadeError::ManifestNotFound`] if the file is missing and
    /// [`FacadeError::ManifestParseError`] if it is not valid JSON.
    pub fn load(path: &Path) -> Result<Self, FacadeError> {
        if !path.exists() {
            return Err(FacadeError::ManifestNotFound {
                path: path.display().to_string(),
            });
        }

        let content = fs::read_to_string(path)?;
        let pkg: Self =
            serde_json::from_str(&content).map_err(|e| FacadeError::ManifestParseError {
                file: path.display().to_string(),
                reason: e.to_string(),
            })?;

        tracing::debug!("Loaded package {}@{:?}", pkg.name, pkg.version);
        Ok(pkg)
    }

    /// The declared version, treating an empty string as absent.
    #[must_use]
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref().filter(|v| !v.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_ignores_extra_fields() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("package.json");
        fs::write(
            &path,
            r#"{"name":"app","version":"0.2.0","main":"index.js","dependencies":{"bar":"^1.0.0"}}"#,
        )
        .unwrap();

        let pkg = PackageDescriptor::load(&path).unwrap();
        assert_eq!(pkg, PackageDescriptor::new("app", "0.2.0"));
    }

    #[test]
    fn test_missing_version() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("package.json");
        fs::write(&path, r#"{"name":"app","version":""}"#).unwrap();

        let pkg = PackageDescriptor::load(&path).unwrap();
        assert_eq!(pkg.version(), None);
    }

    #[test]
    fn test_load_errors() {
        let temp = TempDir::new().unwrap();
        let missing = PackageDescriptor::load(&temp.path().join("package.json"));
        assert!(matches!(missing, Err(FacadeError::ManifestNotFound { .. })));

        let path = temp.path().join("broken.json");
        fs::write(&path, "{").unwrap();
        assert!(matches!(
            PackageDescriptor::load(&path),
            Err(FacadeError::ManifestParseError { .. })
        ));
    }
}
