//! Render a template file.
//!
//! ```bash
//! facade render views/index.html                  # to stdout
//! facade render views/index.html -o dist/index.html
//! facade render index.html --host s1.cdn.com --host s2.cdn.com --cache-busting
//! ```
//!
//! Flags override the matching `facade.toml` settings for this run only.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use super::CliConfig;
use crate::resolver::DirectiveResolver;
use crate::templating::TemplateRenderer;

/// Render one template with the project's directives.
#[derive(Args, Debug)]
pub struct RenderCommand {
    /// Template file to render
    #[arg(value_name = "TEMPLATE")]
    template: PathBuf,

    /// Write the result here instead of stdout
    #[arg(short, long, value_name = "OUT")]
    output: Option<PathBuf>,

    /// Asset host; repeat for several (replaces configured hosts)
    #[arg(long = "host", value_name = "H")]
    hosts: Vec<String>,

    /// Root URL for `href` links
    #[arg(long, value_name = "URL")]
    link_root: Option<String>,

    /// Rewrite asset paths with content hashes
    #[arg(long)]
    cache_busting: bool,
}

impl RenderCommand {
    /// Render the template and write the result.
    ///
    /// # Errors
    ///
    /// Project load failures, directive failures, template syntax errors and
    /// output write failures.
    pub fn execute(self, config: &CliConfig) -> Result<()> {
        let rendered = self.render(config)?;

        match &self.output {
            Some(output) => {
                let output = config.resolve_path(output);
                if let Some(parent) = output.parent() {
                    fs::create_dir_all(parent)
                        .with_context(|| format!("Failed to create {}", parent.display()))?;
                }
                fs::write(&output, &rendered)
                    .with_context(|| format!("Failed to write {}", output.display()))?;
                if !config.quiet {
                    eprintln!("{} {}", "✓ Rendered".green(), output.display());
                }
            }
            None => print!("{rendered}"),
        }
        Ok(())
    }

    /// Render the template to a string.
    ///
    /// # Errors
    ///
    /// Same as [`RenderCommand::execute`], minus output writing.
    pub fn render(&self, config: &CliConfig) -> Result<String> {
        let template = config.resolve_path(&self.template);
        if !template.is_file() {
            anyhow::bail!("Template not found: {}", template.display());
        }

        let mut builder = config.options_builder(&template)?;
        if !self.hosts.is_empty() {
            builder = builder.hosts(self.hosts.iter().cloned());
        }
        if let Some(root) = &self.link_root {
            builder = builder.hybrid_link_root(root.clone());
        }
        if self.cache_busting {
            builder = builder.cache_busting(true);
        }

        let resolver = DirectiveResolver::new(builder.build()?)?;
        tracing::debug!("Rendering {} as {}", template.display(), resolver.package().name);

        TemplateRenderer::new(Arc::new(resolver)).render_file(&template)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::FacadeError;
    use crate::test_utils::{LockGraphFixture, ProjectFixture};
    use serial_test::serial;

    fn command(template: &str) -> RenderCommand {
        RenderCommand {
            template: PathBuf::from(template),
            output: None,
            hosts: Vec::new(),
            link_root: None,
            cache_busting: false,
        }
    }

    #[test]
    fn test_render_modfile() {
        let project = ProjectFixture::with_lock_graph(&LockGraphFixture::basic()).unwrap();
        project
            .add_file("index.html", r#"<script src="{{ modfile(id="bar/x.js") }}"></script>"#)
            .unwrap();

        let config = CliConfig::new(project.path());
        let output = command("index.html").render(&config).unwrap();
        assert_eq!(output, r#"<script src="../../bar/1.0.0/x.js"></script>"#);
    }

    #[test]
    fn test_hosts_flag_overrides_config() {
        let project = ProjectFixture::with_lock_graph(&LockGraphFixture::basic()).unwrap();
        project.write_config(r#"hosts = ["configured.cdn.com"]"#).unwrap();
        project.add_file("index.html", r#"{{ modfile(id="bar/x.js") }}"#).unwrap();

        let config = CliConfig::new(project.path());
        let mut cmd = command("index.html");
        cmd.hosts = vec!["flag.cdn.com".to_string()];
        let output = cmd.render(&config).unwrap();
        assert_eq!(output, "//flag.cdn.com/bar/1.0.0/x.js");
    }

    #[test]
    fn test_link_root_flag() {
        let project = ProjectFixture::with_lock_graph(&LockGraphFixture::basic()).unwrap();
        project.add_file("views/index.html", r#"{{ href(id="./about.html") }}"#).unwrap();

        let config = CliConfig::new(project.path());
        let mut cmd = command("views/index.html");
        cmd.link_root = Some("https://example.com/".to_string());
        assert_eq!(cmd.render(&config).unwrap(), "https://example.com/foo/views/about.html");
    }

    #[test]
    #[serial]
    fn test_cache_busting_flag() {
        let project = ProjectFixture::with_lock_graph(&LockGraphFixture::basic()).unwrap();
        project
            .write_config(
                r#"
                facades = ["bar"]
                hosts = ["s.cdn.com"]
                "#,
            )
            .unwrap();
        project.add_hash_manifest(".", "bar", "1.0.0", &[("x.js", "abc123")]).unwrap();
        project.add_file("index.html", r#"{{ modfile(id="bar/x.js") }}"#).unwrap();

        let config = CliConfig::new(project.path());
        assert_eq!(command("index.html").render(&config).unwrap(), "//s.cdn.com/bar/1.0.0/x.js");

        let mut cmd = command("index.html");
        cmd.cache_busting = true;
        assert_eq!(cmd.render(&config).unwrap(), "//s.cdn.com/bar/1.0.0/x_abc123.js");
    }

    #[test]
    fn test_writes_output_file() {
        let project = ProjectFixture::with_lock_graph(&LockGraphFixture::basic()).unwrap();
        project.add_file("index.html", "{{ version() }}").unwrap();

        let mut config = CliConfig::new(project.path());
        config.quiet = true;
        let mut cmd = command("index.html");
        cmd.output = Some(PathBuf::from("dist/out/index.html"));
        cmd.execute(&config).unwrap();

        let written = fs::read_to_string(project.join("dist/out/index.html")).unwrap();
        assert_eq!(written, "0.2.0");
    }

    #[test]
    fn test_missing_template() {
        let project = ProjectFixture::with_lock_graph(&LockGraphFixture::basic()).unwrap();
        let config = CliConfig::new(project.path());
        let err = command("nope.html").render(&config).unwrap_err();
        assert!(err.to_string().contains("Template not found"));
    }

    #[test]
    fn test_missing_lockfile() {
        let project = ProjectFixture::new().unwrap();
        project.add_file("index.html", "{{ version() }}").unwrap();
        let config = CliConfig::new(project.path());
        let err = command("index.html").render(&config).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<FacadeError>(),
            Some(FacadeError::LockfileNotFound { .. })
        ));
    }
}
