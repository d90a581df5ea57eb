//! Parsing of `name[@version|range][/path]` package references.
//!
//! Directive arguments name a package, optionally pin it to an exact version
//! or constrain it with a range, and optionally point at a file inside it:
//!
//! | Argument | Name | Selector | Path |
//! |---|---|---|---|
//! | `bar` | `bar` | unspecified | `""` |
//! | `bar@1.0.0/lib/x.js` | `bar` | version `1.0.0` | `lib/x.js` |
//! | `bar@^1.2.0` | `bar` | range `^1.2.0` | `""` |
//! | `@scope/ui@~2.0.0/button` | `@scope/ui` | range `~2.0.0` | `button` |

use std::fmt;

use crate::version::constraints::parse_version;

/// How a reference selects a version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionSelector {
    /// An exact version, trusted without consulting the lock graph.
    Version(String),

    /// A range or tag resolved against the installed versions.
    Range(String),

    /// Nothing given; resolution uses the default wildcard tag.
    Unspecified,
}

/// A parsed package reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageRef {
    /// Package name, including the scope for scoped packages.
    pub name: String,

    /// Version or range selector.
    pub selector: VersionSelector,

    /// In-package sub-path without a leading slash; empty for the entry file.
    pub path: String,
}

impl PackageRef {
    /// Reference to a package's entry file with no version selector.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            selector: VersionSelector::Unspecified,
            path: String::new(),
        }
    }

    /// Parse a reference.
    ///
    /// The text between `@` and the next `/` is an exact version when it
    /// parses as one, and a range otherwise. Parsing never fails; a malformed
    /// range surfaces later when it is resolved.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use facade_cli::resolver::package_ref::{PackageRef, VersionSelector};
    ///
    /// let r = PackageRef::parse("bar@^1.0.0/lib/x.js");
    /// assert_eq!(r.name, "bar");
    /// assert_eq!(r.selector, VersionSelector::Range("^1.0.0".into()));
    /// assert_eq!(r.path, "lib/x.js");
    /// ```
    #[must_use]
    pub fn parse(reference: &str) -> Self {
        let reference = reference.trim().replace('\\', "/");

        // Scoped names carry their own '@' and one '/'.
        let scope_len = if reference.starts_with('@') {
            reference.find('/').map_or(reference.len(), |i| i + 1)
        } else {
            0
        };
        let (scope, rest) = reference.split_at(scope_len);

        let name_end = rest.find(['@', '/']).unwrap_or(rest.len());
        let name = format!("{scope}{}", &rest[..name_end]);
        let rest = &rest[name_end..];

        let (selector, path) = match rest.strip_prefix('@') {
            Some(versioned) => {
                let (selector, path) = versioned.split_once('/').unwrap_or((versioned, ""));
                (Self::selector(selector), path)
            }
            None => (VersionSelector::Unspecified, rest),
        };

        Self {
            name,
            selector,
            path: path.trim_start_matches('/').to_string(),
        }
    }

    fn selector(text: &str) -> VersionSelector {
        let text = text.trim();
        if text.is_empty() {
            VersionSelector::Unspecified
        } else if parse_version(text).is_some() {
            VersionSelector::Version(text.to_string())
        } else {
            VersionSelector::Range(text.to_string())
        }
    }
}

impl fmt::Display for PackageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        match &self.selector {
            VersionSelector::Version(v) | VersionSelector::Range(v) => write!(f, "@{v}")?,
            VersionSelector::Unspecified => {}
        }
        if !self.path.is_empty() {
            write!(f, "/{}", self.path)?;
        }
        Ok(())
    }
}
