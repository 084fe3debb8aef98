//! Renderer backed by an `rsvg-convert` executable
//!
//! The drawing is piped to the process on stdin and the process writes the
//! output file itself.

use super::renderer::{DrawOptions, Drawing, VectorRenderer};
use crate::compose::geometry::{parse_length, parse_view_box, DEFAULT_SOURCE_SIZE};
use crate::compose::{CanvasError, Result};
use roxmltree::Document;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Drawing units per inch. Zoom is relative to this, so a 72 dpi PNG is 1:1.
pub const POINTS_PER_INCH: f64 = 72.0;

#[derive(Debug, Clone)]
pub struct CommandRenderer {
    program: PathBuf,
}

impl CommandRenderer {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn arguments(destination: &Path, options: &DrawOptions) -> Vec<String> {
        let mut args = vec!["--format".to_string(), options.format.as_str().to_string()];
        if let Some(dpi) = options.dpi {
            // Physical units stay at their nominal size; zoom alone scales the page.
            args.push("--dpi-x".to_string());
            args.push(POINTS_PER_INCH.to_string());
            args.push("--dpi-y".to_string());
            args.push(POINTS_PER_INCH.to_string());
            args.push("--zoom".to_string());
            args.push((dpi / POINTS_PER_INCH).to_string());
        }
        args.push("--output".to_string());
        args.push(destination.display().to_string());
        args
    }
}

impl VectorRenderer for CommandRenderer {
    fn parse_to_drawing(&self, path: &Path) -> Result<Option<Drawing>> {
        let markup = fs::read_to_string(path)?;
        let (width, height) = match Document::parse(&markup) {
            Ok(doc) => {
                let root = doc.root_element();
                if root.tag_name().name() != "svg" {
                    log::warn!("{} has no <svg> root, found <{}>", path.display(), root.tag_name().name());
                    return Ok(None);
                }
                let view_box = root.attribute("viewBox").and_then(parse_view_box);
                let width = parse_length(root.attribute("width"))
                    .or(view_box.map(|vb| vb.width))
                    .unwrap_or(DEFAULT_SOURCE_SIZE);
                let height = parse_length(root.attribute("height"))
                    .or(view_box.map(|vb| vb.height))
                    .unwrap_or(DEFAULT_SOURCE_SIZE);
                (width, height)
            }
            Err(e) => {
                log::warn!("could not parse {}: {}", path.display(), e);
                return Ok(None);
            }
        };

        Ok(Some(Drawing::new(markup, width, height)))
    }

    fn draw_to_file(&self, drawing: &Drawing, destination: &Path, options: &DrawOptions) -> Result<()> {
        if options.show_boundary {
            log::debug!("{} does not draw page boundaries, ignoring", self.program.display());
        }

        let mut child = Command::new(&self.program)
            .args(Self::arguments(destination, options))
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                CanvasError::RenderFailure(format!("failed to spawn {}: {}", self.program.display(), e))
            })?;

        let piped = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(drawing.markup.as_bytes()),
            None => Ok(()),
        };

        let output = child.wait_with_output()?;
        if let Err(e) = piped {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CanvasError::RenderFailure(format!(
                "failed to write drawing to {}: {} ({})",
                self.program.display(),
                e,
                stderr.trim()
            )));
        }
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CanvasError::RenderFailure(format!(
                "{} exited with {}: {}",
                self.program.display(),
                output.status,
                stderr.trim()
            )));
        }

        Ok(())
    }
}
