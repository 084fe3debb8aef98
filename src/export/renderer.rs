//! Vector-drawing renderer capability
//!
//! The renderer is an external collaborator reached through two calls:
//! parse a composed SVG file into a [`Drawing`], then draw it to a file in
//! the requested format. Canvases do not bind a renderer up front; they ask a
//! [`RendererProvider`] for one when an export actually runs.

use super::command::CommandRenderer;
use crate::compose::{ExportFeature, Result};
use std::path::Path;

/// Output format understood by [`VectorRenderer::draw_to_file`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawFormat {
    Pdf,
    Png,
}

impl DrawFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            DrawFormat::Pdf => "pdf",
            DrawFormat::Png => "png",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DrawOptions {
    pub format: DrawFormat,
    /// Dots per inch; `None` leaves the renderer's default
    pub dpi: Option<f64>,
    /// Draw a frame around the page boundary
    pub show_boundary: bool,
}

impl DrawOptions {
    pub fn pdf() -> Self {
        Self {
            format: DrawFormat::Pdf,
            dpi: None,
            show_boundary: false,
        }
    }

    pub fn png(dpi: f64) -> Self {
        Self {
            format: DrawFormat::Png,
            dpi: Some(dpi),
            show_boundary: false,
        }
    }
}

/// A composed document as parsed by the renderer
#[derive(Debug, Clone, PartialEq)]
pub struct Drawing {
    pub markup: String,
    pub width: f64,
    pub height: f64,
}

impl Drawing {
    pub fn new(markup: impl Into<String>, width: f64, height: f64) -> Self {
        Self {
            markup: markup.into(),
            width,
            height,
        }
    }
}

pub trait VectorRenderer {
    /// Parse the SVG file at `path`. `Ok(None)` means the renderer could not
    /// make a drawing out of it.
    fn parse_to_drawing(&self, path: &Path) -> Result<Option<Drawing>>;

    fn draw_to_file(&self, drawing: &Drawing, destination: &Path, options: &DrawOptions) -> Result<()>;
}

/// Resolves the renderer lazily, once per export call
pub trait RendererProvider {
    fn resolve(&self, feature: ExportFeature) -> Option<Box<dyn VectorRenderer>>;

    /// Remediation shown when [`resolve`](Self::resolve) returns `None`
    fn install_hint(&self, _feature: ExportFeature) -> String {
        "configure a vector-drawing renderer for this canvas".to_string()
    }
}

impl<F> RendererProvider for F
where
    F: Fn(ExportFeature) -> Option<Box<dyn VectorRenderer>>,
{
    fn resolve(&self, feature: ExportFeature) -> Option<Box<dyn VectorRenderer>> {
        self(feature)
    }
}

/// Finds an `rsvg-convert` compatible executable on `PATH`
#[derive(Debug, Clone)]
pub struct CommandRendererProvider {
    program: String,
}

impl CommandRendererProvider {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl RendererProvider for CommandRendererProvider {
    fn resolve(&self, feature: ExportFeature) -> Option<Box<dyn VectorRenderer>> {
        match which::which(&self.program) {
            Ok(path) => {
                log::debug!("{} export using {}", feature, path.display());
                Some(Box::new(CommandRenderer::new(path)))
            }
            Err(e) => {
                log::warn!("{} export unavailable, `{}` not found: {}", feature, self.program, e);
                None
            }
        }
    }

    fn install_hint(&self, _feature: ExportFeature) -> String {
        format!("install librsvg so that `{}` is on PATH", self.program)
    }
}
