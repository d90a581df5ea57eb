//! Resolve one directive from the command line.
//!
//! Handy for checking what a template would produce without writing one:
//!
//! ```bash
//! facade resolve modfile bar/x.js
//! facade resolve combo "./a.css,lib@1.0.0/b.js" --template views/index.html
//! facade resolve version
//! ```

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use super::CliConfig;
use crate::resolver::DirectiveResolver;
use crate::templating::Directive;

/// Run a single directive against the project.
#[derive(Args, Debug)]
pub struct ResolveCommand {
    /// Directive name (facade, href, static, modfile, combo, version, timestamp, timestr)
    #[arg(value_name = "DIRECTIVE")]
    directive: String,

    /// Directive argument
    #[arg(value_name = "ARG")]
    argument: Option<String>,

    /// Template the output is relative to
    #[arg(short, long, value_name = "PATH", default_value = "index.html")]
    template: PathBuf,
}

impl ResolveCommand {
    /// Resolve and print.
    ///
    /// # Errors
    ///
    /// Unknown directive names, project load failures and directive failures.
    pub fn execute(self, config: &CliConfig) -> Result<()> {
        println!("{}", self.resolve(config)?);
        Ok(())
    }

    /// Resolve to a string.
    ///
    /// # Errors
    ///
    /// Same as [`ResolveCommand::execute`].
    pub fn resolve(&self, config: &CliConfig) -> Result<String> {
        let directive: Directive = self.directive.parse()?;
        if !directive.takes_argument() && self.argument.is_some() {
            tracing::warn!("'{}' takes no argument; ignoring it", directive);
        }

        let template = config.resolve_path(&self.template);
        let resolver = DirectiveResolver::new(config.options_builder(&template)?.build()?)?;
        let output = directive.apply(&resolver, self.argument.as_deref())?;
        Ok(output)
    }
}
