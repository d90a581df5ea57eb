//! Best-version selection against the installed-version index.

use semver::Version;
use strsim::levenshtein;

use super::VersionIndex;
use super::constraints::{RangeSpec, parse_version};
use crate::core::FacadeError;

/// Maximum Levenshtein distance, as a percentage of the name length, for a
/// known package name to be offered as a suggestion.
const SIMILARITY_THRESHOLD_PERCENT: usize = 50;

/// Picks the single best installed version of a package for a range.
///
/// # Examples
///
/// ```rust
/// use facade_cli::lockfile::LockGraph;
/// use facade_cli::version::{RangeResolver, VersionIndex};
///
/// let graph = LockGraph::root("app", "0.1.0")
///     .with_dependency("bar", LockGraph::node("1.0.0"))
///     .with_dependency("baz", LockGraph::node("1.0.0").with_dependency("bar", LockGraph::node("1.4.2")));
/// let index = VersionIndex::build(&graph);
/// let tags = vec!["*".to_string()];
///
/// let resolver = RangeResolver::new(&index, &tags);
/// assert_eq!(resolver.resolve("bar", "^1.0.0")?, "1.4.2");
/// # Ok::<(), facade_cli::core::FacadeError>(())
/// ```
pub struct RangeResolver<'a> {
    index: &'a VersionIndex,
    wildcard_tags: &'a [String],
}

impl<'a> RangeResolver<'a> {
    /// Resolver over `index`, treating `wildcard_tags` as "any version".
    #[must_use]
    pub const fn new(index: &'a VersionIndex, wildcard_tags: &'a [String]) -> Self {
        Self {
            index,
            wildcard_tags,
        }
    }

    /// Resolve `name` at `range` to an installed version string.
    ///
    /// The returned string is exactly as recorded in the lock graph and is
    /// always a member of the index entry for `name`.
    ///
    /// # Errors
    ///
    /// - [`FacadeError::ModuleNotFound`] when `name` has no installed version
    /// - [`FacadeError::RangeInvalid`] when `range` is malformed
    /// - [`FacadeError::NoSatisfyingVersion`] when nothing installed matches
    pub fn resolve(&self, name: &str, range: &str) -> Result<String, FacadeError> {
        let Some(installed) = self.index.versions(name) else {
            return Err(FacadeError::ModuleNotFound {
                name: name.to_string(),
                suggestion: self.suggest(name),
            });
        };

        let spec = RangeSpec::parse(range, self.wildcard_tags)?;

        let best = installed
            .iter()
            .filter_map(|raw| match parse_version(raw) {
                Some(version) => Some((version, raw)),
                None => {
                    tracing::trace!("Ignoring non-semver version '{}' of '{}'", raw, name);
                    None
                }
            })
            .filter(|(version, _)| spec.matches(version))
            .max_by(|(a, _), (b, _)| a.cmp(b));

        match best {
            Some((version, raw)) => {
                tracing::debug!("Resolved {}@{} to {}", name, range, version);
                Ok(raw.clone())
            }
            None => Err(FacadeError::NoSatisfyingVersion {
                name: name.to_string(),
                range: range.to_string(),
                available: installed.iter().cloned().collect(),
            }),
        }
    }

    /// The highest installed version of `name` as a [`Version`], if any parse.
    #[must_use]
    pub fn latest(&self, name: &str) -> Option<Version> {
        self.index.versions(name)?.iter().filter_map(|raw| parse_version(raw)).max()
    }

    /// The indexed name closest to `name`, if any is similar enough.
    #[must_use]
    pub fn suggest(&self, name: &str) -> Option<String> {
        let max_distance = (name.len() * SIMILARITY_THRESHOLD_PERCENT / 100).max(1);
        self.index
            .names()
            .map(|candidate| (levenshtein(name, candidate), candidate))
            .filter(|(distance, _)| *distance <= max_distance)
            .min_by_key(|(distance, _)| *distance)
            .map(|(_, candidate)| candidate.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lockfile::LockGraph;

    fn index() -> VersionIndex {
        let graph = LockGraph::root("app", "0.2.0")
            .with_dependency("jquery", LockGraph::node("1.9.1"))
            .with_dependency(
                "widget",
                LockGraph::node("2.0.0")
                    .with_dependency("jquery", LockGraph::node("2.1.4"))
                    .with_dependency("util", LockGraph::node("1.0.0-beta.2")),
            )
            .with_dependency("util", LockGraph::node("0.9.0"))
            .with_dependency("legacy", LockGraph::node("git+https://example.com/legacy.git"));
        VersionIndex::build(&graph)
    }

    fn tags() -> Vec<String> {
        vec!["*".to_string(), "latest".to_string()]
    }

    #[test]
    fn test_picks_maximum_satisfying() {
        let index = index();
        let tags = tags();
        let resolver = RangeResolver::new(&index, &tags);

        assert_eq!(resolver.resolve("jquery", "^1.0.0").unwrap(), "1.9.1");
        assert_eq!(resolver.resolve("jquery", ">=1.0.0").unwrap(), "2.1.4");
        assert_eq!(resolver.resolve("jquery", "*").unwrap(), "2.1.4");
        assert_eq!(resolver.resolve("jquery", "latest").unwrap(), "2.1.4");
    }

    #[test]
    fn test_result_is_member_of_index() {
        let index = index();
        let tags = tags();
        let resolver = RangeResolver::new(&index, &tags);

        for range in ["*", "^1.0.0", "~2.1.0", ">=1.0.0 <3.0.0", "1.x || 2.x"] {
            let version = resolver.resolve("jquery", range).unwrap();
            assert!(index.versions("jquery").unwrap().contains(&version), "{range}");
        }
    }

    #[test]
    fn test_prerelease_sorts_below_release() {
        let index = index();
        let tags = tags();
        let resolver = RangeResolver::new(&index, &tags);

        // Any-version picks the highest by semver order: 1.0.0-beta.2 > 0.9.0.
        assert_eq!(resolver.resolve("util", "*").unwrap(), "1.0.0-beta.2");
        // A range without a pre-release tag does not admit pre-releases.
        assert_eq!(resolver.resolve("util", "<1.0.0").unwrap(), "0.9.0");
    }

    #[test]
    fn test_module_not_found_iff_absent() {
        let index = index();
        let tags = tags();
        let resolver = RangeResolver::new(&index, &tags);

        let err = resolver.resolve("jqeury", "^1.0.0").unwrap_err();
        match err {
            FacadeError::ModuleNotFound { name, suggestion } => {
                assert_eq!(name, "jqeury");
                assert_eq!(suggestion.as_deref(), Some("jquery"));
            }
            other => panic!("Expected ModuleNotFound, got {other:?}"),
        }

        // Even with a malformed range, an unknown name is reported as not found.
        assert!(matches!(
            resolver.resolve("nothing-like-it", "^^"),
            Err(FacadeError::ModuleNotFound { suggestion: None, .. })
        ));
    }

    #[test]
    fn test_range_invalid_is_distinct() {
        let index = index();
        let tags = tags();
        let resolver = RangeResolver::new(&index, &tags);
        assert!(matches!(
            resolver.resolve("jquery", "^^1"),
            Err(FacadeError::RangeInvalid { .. })
        ));
    }

    #[test]
    fn test_no_satisfying_version() {
        let index = index();
        let tags = tags();
        let resolver = RangeResolver::new(&index, &tags);

        match resolver.resolve("jquery", "^3.0.0").unwrap_err() {
            FacadeError::NoSatisfyingVersion { available, .. } => {
                assert_eq!(available, vec!["1.9.1".to_string(), "2.1.4".to_string()]);
            }
            other => panic!("Expected NoSatisfyingVersion, got {other:?}"),
        }

        // Non-semver installs never satisfy a range.
        assert!(matches!(
            resolver.resolve("legacy", "*"),
            Err(FacadeError::NoSatisfyingVersion { .. })
        ));
    }

    #[test]
    fn test_latest() {
        let index = index();
        let tags = tags();
        let resolver = RangeResolver::new(&index, &tags);
        assert_eq!(resolver.latest("jquery"), Some(Version::new(2, 1, 4)));
        assert_eq!(resolver.latest("missing"), None);
    }
}
