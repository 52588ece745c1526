//! nginx configuration rendering.
//!
//! # Data Flow
//! ```text
//! RouterConfig (merged, validated)
//!     → NginxTemplate::render (tera, template compiled once)
//!     → nginx.conf text
//!     → caller's sink (file or any io::Write)
//! ```
//!
//! # Design Decisions
//! - The template is compiled into the binary; a compile failure is a
//!   programming defect, reported as `RenderError::Template`
//! - Output is fully rendered before the destination is touched, so a
//!   failed render never truncates an existing file
//! - Rendering is deterministic: same config, same bytes

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use tera::{Context, Tera};
use thiserror::Error;

use crate::config::schema::RouterConfig;

const TEMPLATE_NAME: &str = "nginx.conf";
const TEMPLATE_SOURCE: &str = include_str!("nginx.conf.tera");

/// Errors raised while rendering or writing the nginx configuration.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The template definition itself does not parse.
    #[error("invalid nginx template: {0}")]
    Template(#[source] tera::Error),

    /// The template parsed but could not be evaluated against the config.
    #[error("failed to render nginx template: {0}")]
    Render(#[source] tera::Error),

    #[error("failed to create {}: {source}", path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write nginx config: {0}")]
    Write(#[source] std::io::Error),
}

impl RenderError {
    /// Destination failures; the caller may retry these.
    pub fn is_io(&self) -> bool {
        matches!(self, RenderError::Create { .. } | RenderError::Write(_))
    }
}

/// The compiled nginx template.
#[derive(Debug, Clone)]
pub struct NginxTemplate {
    tera: Tera,
}

impl NginxTemplate {
    /// Compile the built-in template.
    pub fn new() -> Result<Self, RenderError> {
        Self::from_source(TEMPLATE_SOURCE)
    }

    pub(crate) fn from_source(source: &str) -> Result<Self, RenderError> {
        let mut tera = Tera::default();
        tera.autoescape_on(Vec::new());
        tera.add_raw_template(TEMPLATE_NAME, source)
            .map_err(RenderError::Template)?;
        Ok(Self { tera })
    }

    /// Render `config` to a string.
    pub fn render(&self, config: &RouterConfig) -> Result<String, RenderError> {
        let mut context = Context::new();
        context.insert("router", config);

        let rendered = self
            .tera
            .render(TEMPLATE_NAME, &context)
            .map_err(RenderError::Render)?;

        tracing::debug!(
            apps = config.apps.len(),
            server_blocks = config.apps.iter().map(|a| a.domains.len()).sum::<usize>() + 1,
            bytes = rendered.len(),
            "nginx config rendered"
        );

        Ok(rendered)
    }

    /// Render `config` into any writer.
    pub fn render_to<W: Write>(&self, config: &RouterConfig, mut sink: W) -> Result<(), RenderError> {
        let rendered = self.render(config)?;
        sink.write_all(rendered.as_bytes())
            .and_then(|_| sink.flush())
            .map_err(RenderError::Write)
    }

    /// Render `config` and write it to `path`, replacing any existing file.
    pub fn write_config(&self, config: &RouterConfig, path: &Path) -> Result<(), RenderError> {
        let rendered = self.render(config)?;
        let mut file = File::create(path).map_err(|source| RenderError::Create {
            path: path.to_path_buf(),
            source,
        })?;
        file.write_all(rendered.as_bytes()).map_err(RenderError::Write)?;

        tracing::info!(path = %path.display(), bytes = rendered.len(), "nginx config written");
        Ok(())
    }
}

/// Render `config` with the built-in template.
pub fn render_config(config: &RouterConfig) -> Result<String, RenderError> {
    NginxTemplate::new()?.render(config)
}

/// Render `config` with the built-in template and write it to `path`.
pub fn write_config(config: &RouterConfig, path: &Path) -> Result<(), RenderError> {
    NginxTemplate::new()?.write_config(config, path)
}
