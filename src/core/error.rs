//! Error handling for facade
//!
//! This module provides the error type shared by every resolution step and the
//! user-facing error reporting used by the CLI. The error system follows two
//! principles:
//! 1. **Strongly-typed errors** so callers can match on the failure mode
//! 2. **User-friendly messages** with actionable suggestions for CLI users
//!
//! # Error Categories
//!
//! - **Configuration**: [`FacadeError::MissingRequiredOption`], [`FacadeError::ConfigError`]
//! - **Resolution**: [`FacadeError::ModuleNotFound`], [`FacadeError::RangeInvalid`],
//!   [`FacadeError::NoSatisfyingVersion`]
//! - **Security**: [`FacadeError::PathEscapesProject`]
//! - **Directives**: [`FacadeError::MissingDirectiveArgument`], [`FacadeError::DirectiveFailed`]
//! - **Inputs**: lockfile and package descriptor loading failures
//!
//! Hash manifest load failures never surface here: they are recovered by
//! skipping cache-busting for the affected package.
//!
//! # Examples
//!
//! ```rust,no_run
//! use facade_cli::core::{FacadeError, user_friendly_error};
//!
//! let error = FacadeError::ModuleNotFound {
//!     name: "jquery".to_string(),
//!     suggestion: None,
//! };
//! let ctx = user_friendly_error(anyhow::Error::from(error));
//! ctx.display(); // colored error with suggestion on stderr
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for facade operations
///
/// Every variant carries enough context (module name, range, path, directive)
/// for the message to identify the offending input without further lookups.
#[derive(Error, Debug)]
pub enum FacadeError {
    /// A required construction input was absent or empty
    #[error("Missing required option: {option}")]
    MissingRequiredOption {
        /// Name of the missing option (e.g. "pkg", "cwd")
        option: String,
    },

    /// The module name is not present in the lock graph
    #[error("Module '{name}' not found in the dependency lock graph")]
    ModuleNotFound {
        /// Name that was looked up
        name: String,
        /// Closest known name, if any is similar enough
        suggestion: Option<String>,
    },

    /// A version range could not be parsed
    #[error("Invalid version range '{spec}': {reason}")]
    RangeInvalid {
        /// The offending range or full package spec
        spec: String,
        /// Parser diagnostic
        reason: String,
    },

    /// The module exists but no installed version satisfies the range
    #[error("No installed version of '{name}' satisfies '{range}'")]
    NoSatisfyingVersion {
        /// Module name
        name: String,
        /// Requested range
        range: String,
        /// Installed versions, for diagnostics
        available: Vec<String>,
    },

    /// A relative reference resolved outside the project root
    #[error("Path '{path}' resolves outside the project root")]
    PathEscapesProject {
        /// The offending reference as written
        path: String,
    },

    /// A directive that requires an argument received none
    #[error("Directive '{directive}' requires an argument")]
    MissingDirectiveArgument {
        /// Directive name
        directive: String,
    },

    /// A directive failed; wraps the underlying resolution error
    #[error("{directive}({argument}) failed: {source}")]
    DirectiveFailed {
        /// Directive name
        directive: String,
        /// Argument as written in the template (quoted), or empty
        argument: String,
        /// Underlying failure
        #[source]
        source: Box<FacadeError>,
    },

    /// Shrinkwrap file not found
    #[error("Lockfile not found: {path}")]
    LockfileNotFound {
        /// Path that was probed
        path: String,
    },

    /// Shrinkwrap file could not be parsed
    #[error("Invalid lockfile syntax in {file}")]
    LockfileParseError {
        /// Path to the lockfile
        file: String,
        /// Parser diagnostic
        reason: String,
    },

    /// Package descriptor not found
    #[error("Package descriptor not found: {path}")]
    ManifestNotFound {
        /// Path that was probed
        path: String,
    },

    /// Package descriptor could not be parsed
    #[error("Invalid package descriptor in {file}")]
    ManifestParseError {
        /// Path to the descriptor
        file: String,
        /// Parser diagnostic
        reason: String,
    },

    /// Project configuration error
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the problem
        message: String,
    },

    /// Template could not be rendered for a reason other than a directive failure
    #[error("Template error: {message}")]
    TemplateError {
        /// Flattened template engine diagnostic
        message: String,
    },

    /// IO error from [`std::io::Error`]
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON error from [`serde_json::Error`]
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl FacadeError {
    /// Wrap this error with the directive and argument that triggered it.
    ///
    /// Already-wrapped errors are returned unchanged so nesting never doubles up.
    #[must_use]
    pub fn in_directive(self, directive: &str, argument: Option<&str>) -> Self {
        if matches!(self, Self::DirectiveFailed { .. }) {
            return self;
        }
        Self::DirectiveFailed {
            directive: directive.to_string(),
            argument: argument.map(|a| format!("\"{a}\"")).unwrap_or_default(),
            source: Box::new(self),
        }
    }

    /// The innermost error, unwrapping [`FacadeError::DirectiveFailed`] layers.
    #[must_use]
    pub fn root_cause(&self) -> &Self {
        match self {
            Self::DirectiveFailed { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

/// Error context wrapper that provides user-friendly error information
///
/// Mirrors the CLI presentation: the error itself, optional details explaining
/// why it happened, and an optional actionable suggestion.
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: FacadeError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with no suggestion or details.
    #[must_use]
    pub const fn new(error: FacadeError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Display the error context to stderr with terminal colors
    ///
    /// - Error message: red and bold
    /// - Details: yellow
    /// - Suggestion: green
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error to a user-friendly [`ErrorContext`] with actionable suggestions
///
/// Recognizes [`FacadeError`] (including one wrapped by an [`anyhow`] context
/// chain) and IO errors; anything else is reported as a template error carrying
/// the full context chain.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    let chain_message = format!("{error:#}");
    let is_bare = error.chain().next().is_some_and(|e| e.is::<FacadeError>());

    let error = if is_bare {
        match error.downcast::<FacadeError>() {
            Ok(facade_error) => return create_error_context(facade_error),
            Err(other) => other,
        }
    } else {
        error
    };

    // A FacadeError buried under `.context()` layers still drives the suggestion.
    if let Some(facade_error) = error.chain().find_map(|e| e.downcast_ref::<FacadeError>()) {
        let ctx = suggestion_for(facade_error.root_cause());
        return ErrorContext {
            error: FacadeError::TemplateError {
                message: chain_message,
            },
            suggestion: ctx.0,
            details: ctx.1,
        };
    }

    match error.downcast::<std::io::Error>() {
        Ok(io_error) => {
            let suggestion = match io_error.kind() {
                std::io::ErrorKind::NotFound => {
                    "Check that the file or directory exists and the path is correct"
                }
                std::io::ErrorKind::PermissionDenied => {
                    "Check file ownership and permissions"
                }
                _ => "Re-run with --verbose for more information",
            };
            ErrorContext::new(FacadeError::IoError(io_error)).with_suggestion(suggestion)
        }
        Err(_) => ErrorContext::new(FacadeError::TemplateError {
            message: chain_message,
        }),
    }
}

fn create_error_context(error: FacadeError) -> ErrorContext {
    let (suggestion, details) = suggestion_for(error.root_cause());
    ErrorContext {
        error,
        suggestion,
        details,
    }
}

fn suggestion_for(error: &FacadeError) -> (Option<String>, Option<String>) {
    match error {
        FacadeError::MissingRequiredOption { option } => (
            Some(format!("Provide '{option}' in facade.toml or on the command line")),
            Some("pkg, cwd, template path, deployment root and the lock graph are required".into()),
        ),
        FacadeError::ModuleNotFound { suggestion, .. } => (
            Some(match suggestion {
                Some(name) => format!("Did you mean '{name}'?"),
                None => "Install the package and regenerate the shrinkwrap file".to_string(),
            }),
            Some("Only packages recorded in the lock graph can be referenced".into()),
        ),
        FacadeError::RangeInvalid { .. } => (
            Some("Use a semver range such as '^1.2.0', '~1.2.0', '>=1.0.0 <2.0.0' or '*'".into()),
            None,
        ),
        FacadeError::NoSatisfyingVersion { available, .. } => (
            Some("Relax the range or install a matching version".into()),
            Some(format!("Installed versions: {}", available.join(", "))),
        ),
        FacadeError::PathEscapesProject { .. } => (
            Some("Reference files inside the project directory only".into()),
            Some("Relative references may not climb above the project root with '..'".into()),
        ),
        FacadeError::MissingDirectiveArgument { directive } => {
            (Some(format!("Pass an argument, e.g. {{{{ {directive}(id=\"...\") }}}}")), None)
        }
        FacadeError::LockfileNotFound { .. } => {
            (Some("Generate the shrinkwrap file or point 'lockfile' at it in facade.toml".into()), None)
        }
        FacadeError::LockfileParseError { reason, .. }
        | FacadeError::ManifestParseError { reason, .. } => {
            (Some("Check the JSON syntax of the file".into()), Some(reason.clone()))
        }
        FacadeError::ManifestNotFound { .. } => {
            (Some("Run from the project root or pass --cwd".into()), None)
        }
        _ => (None, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = FacadeError::ModuleNotFound {
            name: "jquery".to_string(),
            suggestion: None,
        };
        assert_eq!(error.to_string(), "Module 'jquery' not found in the dependency lock graph");

        let error = FacadeError::RangeInvalid {
            spec: "^^1".to_string(),
            reason: "unexpected character".to_string(),
        };
        assert_eq!(error.to_string(), "Invalid version range '^^1': unexpected character");

        let error = FacadeError::MissingDirectiveArgument {
            directive: "href".to_string(),
        };
        assert_eq!(error.to_string(), "Directive 'href' requires an argument");
    }

    #[test]
    fn test_in_directive_names_directive_and_argument() {
        let error = FacadeError::ModuleNotFound {
            name: "nope".to_string(),
            suggestion: None,
        }
        .in_directive("modfile", Some("nope/x.js"));

        let message = error.to_string();
        assert!(message.starts_with("modfile(\"nope/x.js\") failed"));
        assert!(message.contains("'nope'"));
        assert!(matches!(error.root_cause(), FacadeError::ModuleNotFound { .. }));

        // Wrapping twice keeps the innermost directive.
        let twice = error.in_directive("facade", None);
        assert!(twice.to_string().starts_with("modfile("));
    }

    #[test]
    fn test_error_context_display() {
        let ctx = ErrorContext::new(FacadeError::MissingRequiredOption {
            option: "cwd".to_string(),
        })
        .with_suggestion("Pass --cwd")
        .with_details("cwd is the project root");

        let display = format!("{ctx}");
        assert!(display.contains("Missing required option: cwd"));
        assert!(display.contains("Details: cwd is the project root"));
        assert!(display.contains("Suggestion: Pass --cwd"));
    }

    #[test]
    fn test_user_friendly_module_not_found_suggestion() {
        let error = FacadeError::ModuleNotFound {
            name: "jqeury".to_string(),
            suggestion: Some("jquery".to_string()),
        };
        let ctx = user_friendly_error(anyhow::Error::from(error));
        assert!(matches!(ctx.error, FacadeError::ModuleNotFound { .. }));
        assert_eq!(ctx.suggestion.as_deref(), Some("Did you mean 'jquery'?"));
    }

    #[test]
    fn test_user_friendly_error_through_context() {
        let error = anyhow::Error::from(FacadeError::PathEscapesProject {
            path: "../../etc".to_string(),
        })
        .context("Failed to render index.html");

        let ctx = user_friendly_error(error);
        let display = ctx.to_string();
        assert!(display.contains("Failed to render index.html"));
        assert!(display.contains("../../etc"));
        assert!(ctx.suggestion.is_some());
    }

    #[test]
    fn test_user_friendly_io_error() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let ctx = user_friendly_error(anyhow::Error::from(io_error));
        assert!(matches!(ctx.error, FacadeError::IoError(_)));
        assert!(ctx.suggestion.is_some());
    }
}
