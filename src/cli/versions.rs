//! Print the installed-version index.
//!
//! ```bash
//! facade versions               # every package
//! facade versions bar           # one package
//! facade versions --format json
//! ```
//!
//! Text output lists one package per line with its versions ascending by
//! semver; the highest is the one wildcard references resolve to.

use anyhow::Result;
use clap::{Args, ValueEnum};
use colored::Colorize;
use semver::Version;
use std::collections::BTreeMap;

use super::CliConfig;
use crate::core::FacadeError;
use crate::lockfile::LockGraph;
use crate::version::constraints::parse_version;
use crate::version::{RangeResolver, VersionIndex};

/// Output formats for `facade versions`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Show which versions of each package the shrinkwrap installs.
#[derive(Args, Debug)]
pub struct VersionsCommand {
    /// Only show this package
    #[arg(value_name = "NAME")]
    name: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

impl VersionsCommand {
    /// Load the shrinkwrap and print the index.
    ///
    /// # Errors
    ///
    /// Config and shrinkwrap load failures, and
    /// [`FacadeError::ModuleNotFound`] when `NAME` is not installed.
    pub fn execute(self, config: &CliConfig) -> Result<()> {
        let project = config.project_config()?;
        let graph = LockGraph::load(&project.lockfile_path(&config.cwd))?;
        let index = VersionIndex::build(&graph);
        let tags = project.wildcard_tags.clone().unwrap_or_default();

        let selected = self.select(&index, &tags)?;
        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&selected)?),
            OutputFormat::Text => {
                if selected.is_empty() && !config.quiet {
                    eprintln!("{}", "No packages installed".yellow());
                }
                for (name, versions) in &selected {
                    println!("{} {}", name.bold(), versions.join(", "));
                }
            }
        }
        Ok(())
    }

    /// The packages to print, each with versions sorted ascending.
    ///
    /// # Errors
    ///
    /// [`FacadeError::ModuleNotFound`] when `NAME` is not in the index.
    pub fn select(
        &self,
        index: &VersionIndex,
        wildcard_tags: &[String],
    ) -> Result<BTreeMap<String, Vec<String>>, FacadeError> {
        let entries: Vec<_> = match &self.name {
            Some(name) => match index.versions(name) {
                Some(versions) => vec![(name.as_str(), versions)],
                None => {
                    return Err(FacadeError::ModuleNotFound {
                        name: name.clone(),
                        suggestion: RangeResolver::new(index, wildcard_tags).suggest(name),
                    });
                }
            },
            None => index.iter().collect(),
        };

        Ok(entries
            .into_iter()
            .map(|(name, versions)| {
                let mut sorted: Vec<(Option<Version>, &String)> =
                    versions.iter().map(|raw| (parse_version(raw), raw)).collect();
                sorted.sort();
                (name.to_string(), sorted.into_iter().map(|(_, raw)| raw.clone()).collect())
            })
            .collect())
    }
}
