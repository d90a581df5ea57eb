//! Test fixtures for lock graphs and package descriptors
//!
//! Each fixture carries the raw file content so tests can exercise the same
//! parsing path the CLI uses.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::{DEFAULT_LOCKFILE, DEFAULT_PACKAGE_FILE};
use crate::lockfile::LockGraph;
use crate::manifest::PackageDescriptor;

/// Test fixture for shrinkwrap files
#[derive(Clone, Debug)]
pub struct LockGraphFixture {
    pub content: String,
    pub name: String,
}

impl LockGraphFixture {
    /// `foo@0.2.0` depending on `bar@1.0.0`
    pub fn basic() -> Self {
        Self {
            name: "basic".to_string(),
            content: r#"
{
  "name": "foo",
  "version": "0.2.0",
  "dependencies": {
    "bar": { "from": "bar@^1.0.0", "version": "1.0.0" }
  }
}
"#
            .trim()
            .to_string(),
        }
    }

    /// `app@0.2.0` with an engine, nested duplicates and a scoped package
    pub fn with_engines() -> Self {
        Self {
            name: "with_engines".to_string(),
            content: r#"
{
  "name": "app",
  "version": "0.2.0",
  "dependencies": {
    "lib": { "version": "1.0.0" },
    "bar": {
      "version": "1.4.2",
      "dependencies": { "lib": { "version": "1.2.0" } }
    },
    "@ui/button": { "version": "2.0.0" },
    "neuron": { "version": "4.2.0" }
  },
  "engines": {
    "neuron": { "from": "neuron@*", "version": "4.2.0" }
  }
}
"#
            .trim()
            .to_string(),
        }
    }

    /// Not JSON at all
    pub fn invalid_json() -> Self {
        Self {
            name: "invalid_json".to_string(),
            content: r#"{ "name": "app", "dependencies": "#.to_string(),
        }
    }

    /// Parse the fixture.
    pub fn graph(&self) -> Result<LockGraph> {
        serde_json::from_str(&self.content)
            .with_context(|| format!("Fixture '{}' is not a valid lock graph", self.name))
    }

    /// Write the fixture as `shrinkwrap.json` under `dir`.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(DEFAULT_LOCKFILE);
        fs::write(&path, &self.content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }
}

/// Test fixture for package descriptors
#[derive(Clone, Debug)]
pub struct PackageFixture {
    pub descriptor: PackageDescriptor,
}

impl PackageFixture {
    /// Descriptor with a version.
    pub fn new(name: &str, version: &str) -> Self {
        Self {
            descriptor: PackageDescriptor::new(name, version),
        }
    }

    /// Descriptor without a version.
    pub fn unversioned(name: &str) -> Self {
        Self {
            descriptor: PackageDescriptor {
                name: name.to_string(),
                version: None,
            },
        }
    }

    /// Write the descriptor as `package.json` under `dir`.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(DEFAULT_PACKAGE_FILE);
        let content = serde_json::to_string_pretty(&self.descriptor)?;
        fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }
}
