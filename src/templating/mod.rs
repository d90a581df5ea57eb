//! Template rendering with directive functions.
//!
//! A [`TemplateRenderer`] wraps one [`DirectiveResolver`] session and renders
//! templates through a Tera instance created per render, with the session's
//! directives registered as functions. Nothing is registered globally, so
//! renderers for different projects never see each other's helpers.
//!
//! # Example
//!
//! ```rust
//! use facade_cli::config::ResolverOptions;
//! use facade_cli::lockfile::LockGraph;
//! use facade_cli::manifest::PackageDescriptor;
//! use facade_cli::resolver::DirectiveResolver;
//! use facade_cli::templating::TemplateRenderer;
//! use std::sync::Arc;
//!
//! # fn example() -> anyhow::Result<()> {
//! let options = ResolverOptions::builder()
//!     .pkg(PackageDescriptor::new("foo", "0.2.0"))
//!     .lock_graph(LockGraph::root("foo", "0.2.0").with_dependency("bar", LockGraph::node("1.0.0")))
//!     .cwd("/work/foo")
//!     .template_path("/work/foo/index.html")
//!     .deployment_root("/work/foo/dist")
//!     .build()?;
//! let renderer = TemplateRenderer::new(Arc::new(DirectiveResolver::new(options)?));
//!
//! let html = renderer.render(r#"<script src="{{ modfile(id="bar/x.js") }}"></script>"#)?;
//! assert_eq!(html, r#"<script src="../../bar/1.0.0/x.js"></script>"#);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

pub mod functions;

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use tera::{Context as TeraContext, Tera};

use crate::core::FacadeError;
use crate::resolver::DirectiveResolver;

pub use functions::{Directive, RenderState, create_directive_function, directive_argument};

/// Renders templates against one resolution session.
pub struct TemplateRenderer {
    resolver: Arc<DirectiveResolver>,
    context: TeraContext,
}

impl TemplateRenderer {
    /// Renderer for `resolver`.
    #[must_use]
    pub fn new(resolver: Arc<DirectiveResolver>) -> Self {
        Self {
            resolver,
            context: TeraContext::new(),
        }
    }

    /// Make `value` available to templates as `{{ key }}`.
    pub fn insert<T: serde::Serialize + ?Sized>(&mut self, key: &str, value: &T) {
        self.context.insert(key, value);
    }

    /// The session behind this renderer.
    #[must_use]
    pub fn resolver(&self) -> &Arc<DirectiveResolver> {
        &self.resolver
    }

    /// Render a template string.
    ///
    /// Every call is a separate page: the first `facade` of each render
    /// emits the bootstrap block.
    ///
    /// # Errors
    ///
    /// The first failing directive's [`FacadeError`] (a
    /// [`FacadeError::DirectiveFailed`] naming the directive and argument),
    /// or [`FacadeError::TemplateError`] for template syntax errors.
    pub fn render(&self, template: &str) -> Result<String> {
        let state = Arc::new(RenderState::new());

        let mut tera = Tera::default();
        tera.autoescape_on(vec![]);
        for directive in Directive::ALL {
            tera.register_function(
                directive.name(),
                create_directive_function(Arc::clone(&self.resolver), directive, Arc::clone(&state)),
            );
        }

        match tera.render_str(template, &self.context) {
            Ok(rendered) => {
                tracing::debug!("Rendered template ({} bytes)", rendered.len());
                Ok(rendered)
            }
            Err(e) => match state.take_failure() {
                Some(error) => Err(error.into()),
                None => Err(FacadeError::TemplateError {
                    message: format_tera_error(&e),
                }
                .into()),
            },
        }
    }

    /// Read and render a template file.
    ///
    /// # Errors
    ///
    /// Read failures, plus everything [`TemplateRenderer::render`] returns.
    pub fn render_file(&self, path: &Path) -> Result<String> {
        let template = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read template {}", path.display()))?;
        self.render(&template)
    }
}

/// Flatten a Tera error chain into one readable message.
///
/// Tera wraps errors in layers that mention its internal one-off template
/// name; those layers are dropped.
#[must_use]
pub fn format_tera_error(error: &tera::Error) -> String {
    use std::error::Error;

    let mut all_messages = vec![error.to_string()];
    let mut current_error: Option<&dyn Error> = error.source();
    while let Some(err) = current_error {
        all_messages.push(err.to_string());
        current_error = err.source();
    }

    let messages: Vec<String> = all_messages
        .into_iter()
        .map(|msg| {
            msg.replace("while rendering '__tera_one_off'", "")
                .replace("Failed to render '__tera_one_off'", "Template rendering failed")
                .replace("Failed to parse '__tera_one_off'", "Template syntax error")
                .replace("'__tera_one_off'", "template")
                .trim()
                .to_string()
        })
        .filter(|msg| {
            !msg.is_empty() && msg != "Template rendering failed" && msg != "Template syntax error"
        })
        .collect();

    if messages.is_empty() {
        "Template syntax error".to_string()
    } else {
        messages.join("\n  → ")
    }
}
