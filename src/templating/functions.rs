//! Template functions backed by a resolution session.
//!
//! Every directive is exposed to Tera as a function of zero or one argument:
//!
//! ```text
//! {{ facade() }}
//! {{ modfile(id="bar/x.js") }}
//! {{ combo(id="./a.css,lib@1.0.0/b.js") }}
//! {{ static(path="./logo.png") }}
//! ```
//!
//! The argument is the one named `id`, or the only named argument given.
//! Non-string values count as no argument.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use strsim::levenshtein;

use crate::core::FacadeError;
use crate::resolver::DirectiveResolver;

/// State shared by the directive functions of a single render.
///
/// Tracks whether the bootstrap block has been emitted on this page and
/// keeps the first typed directive failure, since Tera only carries strings.
#[derive(Debug, Default)]
pub struct RenderState {
    bootstrap_emitted: AtomicBool,
    failure: Mutex<Option<FacadeError>>,
}

impl RenderState {
    /// Fresh state for one render.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a `facade` call in this render emitted the bootstrap block.
    #[must_use]
    pub fn bootstrap_emitted(&self) -> bool {
        self.bootstrap_emitted.load(Ordering::SeqCst)
    }

    /// Keep `error` unless an earlier failure is already recorded.
    fn record_failure(&self, error: FacadeError) {
        if let Ok(mut slot) = self.failure.lock() {
            slot.get_or_insert(error);
        }
    }

    /// Take the first recorded failure.
    pub fn take_failure(&self) -> Option<FacadeError> {
        self.failure.lock().ok().and_then(|mut slot| slot.take())
    }
}

/// The directives a template can call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Directive {
    Facade,
    Href,
    Static,
    Modfile,
    Combo,
    Version,
    Timestamp,
    Timestr,
}

impl Directive {
    /// Every directive, in registration order.
    pub const ALL: [Self; 8] = [
        Self::Facade,
        Self::Href,
        Self::Static,
        Self::Modfile,
        Self::Combo,
        Self::Version,
        Self::Timestamp,
        Self::Timestr,
    ];

    /// Name used in templates.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Facade => "facade",
            Self::Href => "href",
            Self::Static => "static",
            Self::Modfile => "modfile",
            Self::Combo => "combo",
            Self::Version => "version",
            Self::Timestamp => "timestamp",
            Self::Timestr => "timestr",
        }
    }

    /// Whether the directive reads its argument.
    #[must_use]
    pub const fn takes_argument(self) -> bool {
        !matches!(self, Self::Version | Self::Timestamp | Self::Timestr)
    }

    /// Run the directive against a session.
    ///
    /// `facade` tracks its bootstrap block on the session itself.
    ///
    /// # Errors
    ///
    /// Whatever the corresponding [`DirectiveResolver`] method returns.
    pub fn apply(
        self,
        resolver: &DirectiveResolver,
        argument: Option<&str>,
    ) -> Result<String, FacadeError> {
        self.apply_with(resolver, resolver.session_bootstrap_flag(), argument)
    }

    /// Run the directive, tracking the bootstrap block with `bootstrap_emitted`.
    ///
    /// # Errors
    ///
    /// Whatever the corresponding [`DirectiveResolver`] method returns.
    pub fn apply_with(
        self,
        resolver: &DirectiveResolver,
        bootstrap_emitted: &AtomicBool,
        argument: Option<&str>,
    ) -> Result<String, FacadeError> {
        match self {
            Self::Facade => resolver.facade_with(bootstrap_emitted, argument),
            Self::Href => resolver.href(argument),
            Self::Static => resolver.static_file(argument),
            Self::Modfile => resolver.modfile(argument),
            Self::Combo => resolver.combo(argument),
            Self::Version => Ok(resolver.version()),
            Self::Timestamp => Ok(resolver.timestamp().to_string()),
            Self::Timestr => Ok(resolver.timestr()),
        }
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Directive {
    type Err = FacadeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        if let Some(directive) = Self::ALL.into_iter().find(|d| d.name() == name) {
            return Ok(directive);
        }

        let closest = Self::ALL
            .into_iter()
            .map(|d| (levenshtein(name, d.name()), d))
            .filter(|(distance, _)| *distance <= 3)
            .min_by_key(|(distance, _)| *distance);
        let hint = closest.map(|(_, d)| format!(" Did you mean '{d}'?")).unwrap_or_default();
        let known: Vec<&str> = Self::ALL.iter().map(|d| d.name()).collect();

        Err(FacadeError::ConfigError {
            message: format!(
                "Unknown directive '{name}'.{hint} Known directives: {}",
                known.join(", ")
            ),
        })
    }
}

/// Pick the directive argument out of Tera's named arguments.
#[must_use]
pub fn directive_argument(args: &HashMap<String, tera::Value>) -> Option<&str> {
    let value = match args.get("id") {
        Some(value) => Some(value),
        None if args.len() == 1 => args.values().next(),
        None => None,
    };
    value.and_then(tera::Value::as_str)
}

/// Build the Tera function for `directive`.
///
/// On failure the typed error is recorded in `state` (first failure wins)
/// and Tera receives its message.
pub fn create_directive_function(
    resolver: Arc<DirectiveResolver>,
    directive: Directive,
    state: Arc<RenderState>,
) -> impl tera::Function + 'static {
    move |args: &HashMap<String, tera::Value>| -> tera::Result<tera::Value> {
        let argument = if directive.takes_argument() { directive_argument(args) } else { None };

        match directive.apply_with(&resolver, &state.bootstrap_emitted, argument) {
            Ok(output) => Ok(tera::Value::String(output)),
            Err(e) => {
                let message = e.to_string();
                state.record_failure(e);
                Err(tera::Error::msg(message))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args(pairs: &[(&str, tera::Value)]) -> HashMap<String, tera::Value> {
        pairs.iter().map(|(k, v)| ((*k).to_string(), v.clone())).collect()
    }

    #[test]
    fn test_directive_names_round_trip() {
        for directive in Directive::ALL {
            assert_eq!(directive.name().parse::<Directive>().unwrap(), directive);
        }
    }

    #[test]
    fn test_unknown_directive_suggests() {
        match "modfil".parse::<Directive>() {
            Err(FacadeError::ConfigError { message }) => {
                assert!(message.contains("Did you mean 'modfile'?"), "{message}");
            }
            other => panic!("expected ConfigError, got {other:?}"),
        }
        match "zzzzzzzzzz".parse::<Directive>() {
            Err(FacadeError::ConfigError { message }) => assert!(!message.contains("Did you mean")),
            other => panic!("expected ConfigError, got {other:?}"),
        }
    }

    #[test]
    fn test_argument_selection() {
        assert_eq!(directive_argument(&args(&[])), None);
        assert_eq!(directive_argument(&args(&[("id", json!("bar"))])), Some("bar"));
        assert_eq!(directive_argument(&args(&[("path", json!("./a.css"))])), Some("./a.css"));
        assert_eq!(
            directive_argument(&args(&[("id", json!("bar")), ("other", json!("x"))])),
            Some("bar")
        );
        assert_eq!(directive_argument(&args(&[("a", json!("x")), ("b", json!("y"))])), None);
        assert_eq!(directive_argument(&args(&[("id", json!({"name": "bar"}))])), None);
        assert_eq!(directive_argument(&args(&[("id", json!(42))])), None);
    }

    #[test]
    fn test_render_state_keeps_first_failure() {
        let state = RenderState::new();
        assert!(!state.bootstrap_emitted());
        state.record_failure(FacadeError::MissingDirectiveArgument {
            directive: "href".to_string(),
        });
        state.record_failure(FacadeError::MissingDirectiveArgument {
            directive: "static".to_string(),
        });
        match state.take_failure() {
            Some(FacadeError::MissingDirectiveArgument { directive }) => assert_eq!(directive, "href"),
            other => panic!("expected the first failure, got {other:?}"),
        }
        assert!(state.take_failure().is_none());
    }

    #[test]
    fn test_zero_argument_directives() {
        assert!(!Directive::Version.takes_argument());
        assert!(!Directive::Timestamp.takes_argument());
        assert!(Directive::Static.takes_argument());
    }
}
