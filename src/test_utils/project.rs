//! On-disk project layouts for tests
//!
//! A [`ProjectFixture`] owns a temporary project root and writes the files a
//! resolution session reads: shrinkwrap, package descriptor, `facade.toml`,
//! templates and hash manifests.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use super::fixtures::{LockGraphFixture, PackageFixture};
use crate::config::{ProjectConfig, ResolverOptions};
use crate::constants::{CONFIG_FILE, HASH_MANIFEST_FILE};
use crate::resolver::DirectiveResolver;

/// A temporary project directory.
pub struct ProjectFixture {
    temp_dir: TempDir,
}

impl ProjectFixture {
    /// Empty project directory.
    pub fn new() -> Result<Self> {
        Ok(Self {
            temp_dir: TempDir::new().context("Failed to create temp dir")?,
        })
    }

    /// Project with the given lock graph and a matching package descriptor.
    pub fn with_lock_graph(fixture: &LockGraphFixture) -> Result<Self> {
        let project = Self::new()?;
        fixture.write_to(project.path())?;

        let graph = fixture.graph()?;
        let name = graph.name.clone().unwrap_or_else(|| "app".to_string());
        let package = match graph.version.as_deref() {
            Some(version) => PackageFixture::new(&name, version),
            None => PackageFixture::unversioned(&name),
        };
        package.write_to(project.path())?;
        Ok(project)
    }

    /// Project root.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Path under the project root.
    pub fn join(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.path().join(relative)
    }

    /// Write a file, creating parent directories.
    pub fn add_file(&self, relative: impl AsRef<Path>, content: &str) -> Result<PathBuf> {
        let path = self.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }

    /// Write `facade.toml`.
    pub fn write_config(&self, content: &str) -> Result<PathBuf> {
        self.add_file(CONFIG_FILE, content)
    }

    /// Write `<root>/<name>/<version>/md5.json`, with `root` relative to the project.
    pub fn add_hash_manifest(
        &self,
        root: &str,
        name: &str,
        version: &str,
        hashes: &[(&str, &str)],
    ) -> Result<PathBuf> {
        let map: serde_json::Map<String, serde_json::Value> = hashes
            .iter()
            .map(|(file, hash)| ((*file).to_string(), serde_json::Value::from(*hash)))
            .collect();
        let relative = Path::new(root).join(name).join(version).join(HASH_MANIFEST_FILE);
        self.add_file(relative, &serde_json::to_string(&map)?)
    }

    /// Options for `template` built from the project's files.
    pub fn options(&self, template: &str) -> Result<ResolverOptions> {
        let config = ProjectConfig::discover(self.path(), None)?;
        Ok(config.into_options(self.path(), &self.join(template))?)
    }

    /// A resolver session for `template`.
    pub fn resolver(&self, template: &str) -> Result<DirectiveResolver> {
        Ok(DirectiveResolver::new(self.options(template)?)?)
    }
}
