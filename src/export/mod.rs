//! PDF and PNG export through the external renderer
//!
//! Every export renders the canvas, writes it to a temporary `.svg` file and
//! hands that file to the renderer. The temporary file lives only for the
//! duration of the call and is removed on every exit path.

pub mod command;
pub mod renderer;

use crate::compose::geometry::fmt_number;
use crate::compose::{Canvas, CanvasError, ExportFeature, Result};
use renderer::{DrawOptions, Drawing, VectorRenderer};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

fn default_baseline_dpi() -> f64 {
    72.0
}

fn default_renderer_program() -> String {
    "rsvg-convert".to_string()
}

/// Export configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportSettings {
    /// Resolution of a scale-1 PNG
    #[serde(default = "default_baseline_dpi")]
    pub baseline_dpi: f64,
    /// Executable looked up on PATH by the default renderer provider
    #[serde(default = "default_renderer_program")]
    pub renderer_program: String,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            baseline_dpi: default_baseline_dpi(),
            renderer_program: default_renderer_program(),
        }
    }
}

/// Reject scale factors that are not strictly positive and finite
pub fn validate_scale(scale: f64) -> Result<()> {
    if scale.is_finite() && scale > 0.0 {
        Ok(())
    } else {
        Err(CanvasError::Validation(format!(
            "scale must be greater than 0, got {}",
            scale
        )))
    }
}

/// `{base}@{scale}x.png`, with the decimal point of the scale replaced by `_`
pub fn resolution_file_name(base_name: &str, scale: f64) -> String {
    format!("{}@{}x.png", base_name, fmt_number(scale).replace('.', "_"))
}

impl Canvas {
    /// Export the composed canvas as a vector PDF page
    pub fn save_pdf(&self, output_path: impl AsRef<Path>) -> Result<PathBuf> {
        let destination = output_path.as_ref().to_path_buf();
        let renderer = self.resolve_renderer(ExportFeature::Pdf)?;

        self.with_drawing(renderer.as_ref(), |drawing| {
            renderer.draw_to_file(drawing, &destination, &DrawOptions::pdf())
        })?;

        log::info!("wrote PDF to {}", destination.display());
        Ok(destination)
    }

    /// Export a PNG at `scale × baseline_dpi`
    pub fn save_png(&self, output_path: impl AsRef<Path>, scale: f64) -> Result<PathBuf> {
        validate_scale(scale)?;
        let dpi = self.png_resolution(scale)?;
        let destination = output_path.as_ref().to_path_buf();
        let renderer = self.resolve_renderer(ExportFeature::Png)?;

        self.with_drawing(renderer.as_ref(), |drawing| {
            renderer.draw_to_file(drawing, &destination, &DrawOptions::png(dpi))
        })?;

        log::info!("wrote PNG ({} dpi) to {}", dpi, destination.display());
        Ok(destination)
    }

    /// Export one PNG per scale into `output_dir`, named `{base_name}@{scale}x.png`.
    ///
    /// Returns the written paths in the order of `scales`. Any invalid scale
    /// or render failure fails the whole call.
    pub fn save_png_resolutions(
        &self,
        output_dir: impl AsRef<Path>,
        base_name: &str,
        scales: &[f64],
    ) -> Result<Vec<PathBuf>> {
        let resolutions = scales
            .iter()
            .map(|&scale| -> Result<(f64, f64)> {
                validate_scale(scale)?;
                Ok((scale, self.png_resolution(scale)?))
            })
            .collect::<Result<Vec<_>>>()?;

        let renderer = self.resolve_renderer(ExportFeature::Png)?;
        let output_dir = output_dir.as_ref();
        fs::create_dir_all(output_dir)?;

        let written = self.with_drawing(renderer.as_ref(), |drawing| {
            resolutions
                .iter()
                .map(|&(scale, dpi)| -> Result<PathBuf> {
                    let destination = output_dir.join(resolution_file_name(base_name, scale));
                    renderer.draw_to_file(drawing, &destination, &DrawOptions::png(dpi))?;
                    log::info!("wrote PNG ({} dpi) to {}", dpi, destination.display());
                    Ok(destination)
                })
                .collect::<Result<Vec<_>>>()
        })?;

        Ok(written)
    }

    fn png_resolution(&self, scale: f64) -> Result<f64> {
        let baseline = self.settings.baseline_dpi;
        if !(baseline.is_finite() && baseline > 0.0) {
            return Err(CanvasError::Validation(format!(
                "baseline dpi must be greater than 0, got {}",
                baseline
            )));
        }
        Ok(scale * baseline)
    }

    fn resolve_renderer(&self, feature: ExportFeature) -> Result<Box<dyn VectorRenderer>> {
        self.renderers
            .resolve(feature)
            .ok_or_else(|| CanvasError::MissingDependency {
                feature,
                hint: self.renderers.install_hint(feature),
            })
    }

    /// Render to a scoped temporary file, parse it into a drawing and run `draw`.
    fn with_drawing<T>(
        &self,
        renderer: &dyn VectorRenderer,
        draw: impl FnOnce(&Drawing) -> Result<T>,
    ) -> Result<T> {
        let composed = self.render_svg()?;

        let mut temp = tempfile::Builder::new()
            .prefix("svg-compose-")
            .suffix(".svg")
            .tempfile()?;
        temp.write_all(composed.as_bytes())?;
        temp.flush()?;
        log::debug!("composed SVG staged at {}", temp.path().display());

        let drawing = renderer.parse_to_drawing(temp.path())?.ok_or_else(|| {
            CanvasError::RenderFailure("could not parse composed SVG into a drawing".to_string())
        })?;
        log::debug!("drawing page is {}x{}", drawing.width, drawing.height);

        draw(&drawing)
    }
}
