/// Composition manifests
///
/// Describes a canvas and its placements in YAML (or JSON), so a layout can
/// be kept next to the SVG files it places. File placements are resolved
/// relative to the manifest's directory.

use crate::compose::{Canvas, CanvasError, Rect, Result, DEFAULT_BACKGROUND};
use crate::export::ExportSettings;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

fn default_background() -> String {
    DEFAULT_BACKGROUND.to_string()
}

fn default_extent() -> f64 {
    100.0
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Manifest {
    pub width: f64,
    pub height: f64,
    #[serde(default = "default_background")]
    pub background: String,
    #[serde(default)]
    pub settings: ExportSettings,
    #[serde(default)]
    pub placements: Vec<PlacementSpec>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlacementSpec {
    /// Path to an SVG file, relative to the manifest
    pub file: Option<PathBuf>,
    /// Inline SVG markup
    pub content: Option<String>,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default = "default_extent")]
    pub width: f64,
    #[serde(default = "default_extent")]
    pub height: f64,
}

impl PlacementSpec {
    fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

impl Manifest {
    pub fn from_yaml_str(source: &str) -> Result<Self> {
        serde_yaml::from_str(source)
            .map_err(|e| CanvasError::Manifest(format!("YAML parse error: {}", e)))
    }

    pub fn from_json_str(source: &str) -> Result<Self> {
        serde_json::from_str(source)
            .map_err(|e| CanvasError::Manifest(format!("JSON parse error: {}", e)))
    }

    /// Build the canvas, reading file placements relative to `base_dir`
    pub fn into_canvas(self, base_dir: &Path) -> Result<Canvas> {
        let mut canvas = Canvas::new(self.width, self.height)
            .with_background(self.background)
            .with_settings(self.settings);

        for (idx, spec) in self.placements.iter().enumerate() {
            match (&spec.file, &spec.content) {
                (Some(file), None) => canvas.add_svg_file(base_dir.join(file), spec.rect())?,
                (None, Some(content)) => canvas.add_svg_content(content.as_str(), spec.rect()),
                _ => {
                    return Err(CanvasError::Manifest(format!(
                        "placement {}: exactly one of `file` or `content` is required",
                        idx
                    )))
                }
            }
        }

        log::debug!("manifest produced {} placements", canvas.placements().len());
        Ok(canvas)
    }
}

/// Load a manifest file (`.json` as JSON, anything else as YAML) into a canvas
pub fn load_canvas(path: impl AsRef<Path>) -> Result<Canvas> {
    let path = path.as_ref();
    let source = fs::read_to_string(path)?;

    let manifest = match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => Manifest::from_json_str(&source)?,
        _ => Manifest::from_yaml_str(&source)?,
    };

    let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
    manifest.into_canvas(base_dir)
}
