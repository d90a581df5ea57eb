//! Version range grammar.
//!
//! Ranges are written the way package manifests write them (`^1.2.0`,
//! `~1.2`, `>=1.0.0 <2.0.0`, `1.x`, `1.0.0 - 2.0.0`, `^1.0.0 || ^2.0.0`) and
//! are translated into [`semver::VersionReq`] alternatives. The translation
//! handles the places where that grammar differs from Cargo's:
//!
//! - comparators are separated by whitespace instead of commas
//! - a bare full version (`1.2.3`) is an exact match, not a caret range
//! - `x`/`X`/`*` segments are wildcards at any position
//! - hyphen ranges are inclusive on both ends
//! - `||` separates alternatives
//!
//! Wildcard tags (`*`, `latest` by default) and the empty string mean "any
//! installed version".

use regex::Regex;
use semver::{Version, VersionReq};
use std::fmt;
use std::sync::OnceLock;

use crate::core::FacadeError;

const OPERATORS: &[&str] = &[">=", "<=", ">", "<", "=", "^", "~"];

fn hyphen_range() -> Option<&'static Regex> {
    static HYPHEN: OnceLock<Option<Regex>> = OnceLock::new();
    HYPHEN.get_or_init(|| Regex::new(r"^(\S+)\s+-\s+(\S+)$").ok()).as_ref()
}

/// A parsed version range.
#[derive(Debug, Clone, PartialEq)]
pub enum RangeSpec {
    /// Any installed version, pre-releases included.
    Any,

    /// Satisfied when any alternative matches.
    Alternatives(Vec<VersionReq>),
}

impl RangeSpec {
    /// Parse a range or tag.
    ///
    /// # Errors
    ///
    /// [`FacadeError::RangeInvalid`] when the range is not valid range syntax.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use facade_cli::version::constraints::RangeSpec;
    /// use semver::Version;
    ///
    /// let tags = vec!["*".to_string(), "latest".to_string()];
    /// let range = RangeSpec::parse(">=1.0.0 <2.0.0", &tags)?;
    /// assert!(range.matches(&Version::parse("1.9.0")?));
    /// assert!(!range.matches(&Version::parse("2.0.0")?));
    ///
    /// assert_eq!(RangeSpec::parse("latest", &tags)?, RangeSpec::Any);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn parse(range: &str, wildcard_tags: &[String]) -> Result<Self, FacadeError> {
        let trimmed = range.trim();
        if trimmed.is_empty() || wildcard_tags.iter().any(|tag| tag == trimmed) {
            return Ok(Self::Any);
        }

        let invalid = |reason: String| FacadeError::RangeInvalid {
            spec: trimmed.to_string(),
            reason,
        };

        let mut alternatives = Vec::new();
        for alternative in trimmed.split("||") {
            let Some(comparators) = translate_alternative(alternative.trim()).map_err(invalid)?
            else {
                return Ok(Self::Any);
            };
            let req = VersionReq::parse(&comparators)
                .map_err(|e| invalid(format!("{e} (while parsing '{comparators}')")))?;
            alternatives.push(req);
        }

        Ok(Self::Alternatives(alternatives))
    }

    /// Whether `version` satisfies the range.
    #[must_use]
    pub fn matches(&self, version: &Version) -> bool {
        match self {
            Self::Any => true,
            Self::Alternatives(reqs) => reqs.iter().any(|req| req.matches(version)),
        }
    }
}

impl fmt::Display for RangeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => write!(f, "*"),
            Self::Alternatives(reqs) => {
                let parts: Vec<String> = reqs.iter().map(ToString::to_string).collect();
                write!(f, "{}", parts.join(" || "))
            }
        }
    }
}

/// Parse an installed version string, tolerating a leading `v`.
#[must_use]
pub fn parse_version(version: &str) -> Option<Version> {
    let trimmed = version.trim();
    Version::parse(trimmed.strip_prefix('v').unwrap_or(trimmed)).ok()
}

/// Translate one `||` alternative into Cargo comparator syntax.
///
/// Returns `Ok(None)` when the alternative matches everything.
fn translate_alternative(alternative: &str) -> Result<Option<String>, String> {
    if alternative.is_empty() {
        return Ok(None);
    }

    if let Some(caps) = hyphen_range().and_then(|re| re.captures(alternative)) {
        let low = translate_comparator(&format!(">={}", &caps[1]))?;
        let high = translate_comparator(&format!("<={}", &caps[2]))?;
        let parts: Vec<String> = low.into_iter().chain(high).collect();
        return Ok((!parts.is_empty()).then(|| parts.join(", ")));
    }

    // Glue detached operators (">= 1.0.0") to their operand.
    let mut tokens: Vec<String> = Vec::new();
    let mut pending_op: Option<&str> = None;
    for token in alternative.split_whitespace() {
        if let Some(op) = OPERATORS.iter().find(|op| **op == token) {
            if pending_op.is_some() {
                return Err(format!("operator '{token}' follows another operator"));
            }
            pending_op = Some(*op);
            continue;
        }
        tokens.push(format!("{}{token}", pending_op.take().unwrap_or_default()));
    }
    if let Some(op) = pending_op {
        return Err(format!("operator '{op}' is missing a version"));
    }

    let mut comparators = Vec::new();
    for token in &tokens {
        comparators.extend(translate_comparator(token)?);
    }

    Ok((!comparators.is_empty()).then(|| comparators.join(", ")))
}

/// Translate a single comparator. `Ok(None)` means it matches everything.
fn translate_comparator(token: &str) -> Result<Option<String>, String> {
    let op = OPERATORS.iter().find(|op| token.starts_with(**op)).copied().unwrap_or("");
    let operand = &token[op.len()..];
    let operand = operand.strip_prefix('v').unwrap_or(operand);

    if operand.is_empty() {
        return Err(format!("comparator '{token}' is missing a version"));
    }

    // Split off pre-release/build so wildcard detection only sees the core.
    let (core, suffix) = match operand.find(['-', '+']) {
        Some(i) => operand.split_at(i),
        None => (operand, ""),
    };

    let mut segments = Vec::new();
    let mut wildcard = false;
    for segment in core.split('.') {
        if matches!(segment, "x" | "X" | "*") {
            wildcard = true;
            break;
        }
        if segment.is_empty() || !segment.chars().all(|c| c.is_ascii_digit()) {
            return Err(format!("'{segment}' is not a numeric version segment in '{token}'"));
        }
        segments.push(segment);
    }

    if segments.is_empty() {
        // "*", ">=x" and friends
        return Ok(None);
    }
    if wildcard && !suffix.is_empty() {
        return Err(format!("wildcard version '{operand}' cannot carry a pre-release"));
    }

    let op = match op {
        // A bare version is exact; a bare partial is an x-range, which `=` expresses.
        "" => "=",
        other => other,
    };
    Ok(Some(format!("{op}{}{suffix}", segments.join("."))))
}
