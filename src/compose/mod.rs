//! SVG canvas composition
//!
//! A [`Canvas`] holds target dimensions, a background fill and an ordered
//! list of [`Placement`]s. Rendering parses each placement lazily, derives
//! the transform that maps its intrinsic box onto the target rectangle, and
//! wraps a copy of its children in a `<g>` carrying that transform.
//!
//! # Basic Usage
//!
//! ```ignore
//! use svg_compose::{Canvas, Rect};
//!
//! let mut canvas = Canvas::new(800.0, 600.0).with_background("white");
//! canvas.add_svg_content(
//!     r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 20 20"><circle cx="10" cy="10" r="8"/></svg>"#,
//!     Rect::new(10.0, 20.0, 120.0, 140.0),
//! );
//! let svg = canvas.render_svg()?;
//! ```

pub mod errors;
pub mod geometry;
pub mod tree;

pub use errors::{CanvasError, ExportFeature, Result};
pub use geometry::{IntrinsicBox, PlacementTransform, Rect};

use crate::export::renderer::{CommandRendererProvider, RendererProvider};
use crate::export::ExportSettings;
use geometry::{fmt_number, intrinsic_box};
use roxmltree::{Document, ParsingOptions};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tree::{copy_children, Namespaces, XmlElement, XmlNode, SVG_NS};

/// Background used when none is configured
pub const DEFAULT_BACKGROUND: &str = "transparent";

/// A source document plus its target rectangle on the canvas
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    index: usize,
    content: String,
    rect: Rect,
}

impl Placement {
    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Position in the canvas' drawing order
    pub fn index(&self) -> usize {
        self.index
    }

    /// Parse the content and derive its transform onto the target rectangle
    pub fn transform(&self) -> Result<PlacementTransform> {
        let doc = self.parse()?;
        Ok(PlacementTransform::derive(self.rect, intrinsic_box(doc.root_element())))
    }

    fn parse(&self) -> Result<Document<'_>> {
        // Editors commonly emit a DOCTYPE; entities are not expanded beyond what roxmltree supports.
        let options = ParsingOptions {
            allow_dtd: true,
            ..ParsingOptions::default()
        };
        Document::parse_with_options(&self.content, options).map_err(|e| CanvasError::InvalidInput {
            index: self.index,
            reason: e.to_string(),
        })
    }

    fn build_group(&self, namespaces: &mut Namespaces) -> Result<XmlElement> {
        let doc = self.parse()?;
        let root = doc.root_element();
        let transform = PlacementTransform::derive(self.rect, intrinsic_box(root));

        log::debug!("placement {}: {}", self.index, transform.to_svg());

        let mut group = XmlElement::new("g").with_attribute("transform", transform.to_svg());
        group.children = copy_children(root, namespaces);
        Ok(group)
    }
}

/// Output surface holding ordered placements and a background
pub struct Canvas {
    width: f64,
    height: f64,
    background: String,
    placements: Vec<Placement>,
    pub(crate) settings: ExportSettings,
    pub(crate) renderers: Box<dyn RendererProvider>,
}

impl fmt::Debug for Canvas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Canvas")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("background", &self.background)
            .field("placements", &self.placements)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl Canvas {
    /// Create an empty canvas with a transparent background
    pub fn new(width: f64, height: f64) -> Self {
        let settings = ExportSettings::default();
        Self {
            width,
            height,
            background: DEFAULT_BACKGROUND.to_string(),
            placements: Vec::new(),
            renderers: Box::new(CommandRendererProvider::new(&settings.renderer_program)),
            settings,
        }
    }

    pub fn with_background(mut self, background: impl Into<String>) -> Self {
        self.background = background.into();
        self
    }

    /// Replace the export settings. Resets the renderer provider to the
    /// command backend named by the new settings.
    pub fn with_settings(mut self, settings: ExportSettings) -> Self {
        self.renderers = Box::new(CommandRendererProvider::new(&settings.renderer_program));
        self.settings = settings;
        self
    }

    /// Use a different source for the external renderer
    pub fn with_renderer_provider(mut self, provider: impl RendererProvider + 'static) -> Self {
        self.renderers = Box::new(provider);
        self
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn background(&self) -> &str {
        &self.background
    }

    pub fn settings(&self) -> &ExportSettings {
        &self.settings
    }

    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    /// Add raw SVG markup. The content is stored as-is and only parsed at render time.
    pub fn add_svg_content(&mut self, content: impl Into<String>, rect: Rect) {
        self.placements.push(Placement {
            index: self.placements.len(),
            content: content.into(),
            rect,
        });
    }

    /// Add an SVG read from a UTF-8 file
    pub fn add_svg_file(&mut self, path: impl AsRef<Path>, rect: Rect) -> Result<()> {
        let content = fs::read_to_string(path.as_ref())?;
        self.add_svg_content(content, rect);
        Ok(())
    }

    /// Render the composed SVG document
    pub fn render_svg(&self) -> Result<String> {
        let mut namespaces = Namespaces::default();
        let groups = self
            .placements
            .iter()
            .map(|placement| placement.build_group(&mut namespaces))
            .collect::<Result<Vec<_>>>()?;

        let width = fmt_number(self.width);
        let height = fmt_number(self.height);
        let mut root = XmlElement::new("svg")
            .with_attribute("xmlns", SVG_NS)
            .with_attribute("width", width.as_str())
            .with_attribute("height", height.as_str())
            .with_attribute("viewBox", format!("0 0 {} {}", width, height));
        for (prefix, uri) in namespaces.declarations() {
            root.push_attribute(format!("xmlns:{}", prefix), uri);
        }

        root.push_child(XmlNode::Element(
            XmlElement::new("rect")
                .with_attribute("width", "100%")
                .with_attribute("height", "100%")
                .with_attribute("fill", self.background.as_str()),
        ));
        root.children.extend(groups.into_iter().map(XmlNode::Element));

        Ok(root.to_markup()?)
    }

    /// Write the composed SVG to `output_path` and return the path written
    pub fn save_svg(&self, output_path: impl AsRef<Path>) -> Result<PathBuf> {
        let destination = output_path.as_ref().to_path_buf();
        fs::write(&destination, self.render_svg()?)?;
        log::info!("wrote SVG to {}", destination.display());
        Ok(destination)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CIRCLE_VB: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 20 20"><circle cx="10" cy="10" r="8"/></svg>"#;
    const RECT_WH: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="12" height="12"><rect width="12" height="12"/></svg>"#;

    #[test]
    fn test_empty_canvas_has_only_background() {
        let canvas = Canvas::new(320.0, 200.0);
        let svg = canvas.render_svg().unwrap();

        assert_eq!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="320" height="200" viewBox="0 0 320 200"><rect width="100%" height="100%" fill="transparent"/></svg>"#
        );
    }

    #[test]
    fn test_group_per_placement_in_order() {
        let mut canvas = Canvas::new(800.0, 600.0).with_background("white");
        canvas.add_svg_content(CIRCLE_VB, Rect::new(10.0, 20.0, 120.0, 140.0));
        canvas.add_svg_content(RECT_WH, Rect::new(30.0, 40.0, 220.0, 240.0));

        let svg = canvas.render_svg().unwrap();
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert_eq!(svg.matches("<g transform=").count(), 2);
        assert!(svg.contains(r#"fill="white""#));

        let circle = svg.find("<circle").unwrap();
        let rect = svg.find("<rect width=\"12\"").unwrap();
        assert!(circle < rect);
        assert!(svg.contains("translate(10 20) scale(6 7) translate(0 0)"));
    }

    #[test]
    fn test_source_root_attributes_are_discarded() {
        let mut canvas = Canvas::new(100.0, 100.0);
        canvas.add_svg_content(
            r#"<svg xmlns="http://www.w3.org/2000/svg" id="source-root" width="10" height="10"><path d="M0 0L10 10"/></svg>"#,
            Rect::default(),
        );
        let svg = canvas.render_svg().unwrap();
        assert!(!svg.contains("source-root"));
        assert!(svg.contains(r#"<path d="M0 0L10 10"/>"#));
    }

    #[test]
    fn test_invalid_content_fails_at_render_not_add() {
        let mut canvas = Canvas::new(100.0, 100.0);
        canvas.add_svg_content(CIRCLE_VB, Rect::default());
        canvas.add_svg_content("not-valid-svg", Rect::default());
        assert_eq!(canvas.placements().len(), 2);

        match canvas.render_svg() {
            Err(CanvasError::InvalidInput { index, reason }) => {
                assert_eq!(index, 1);
                assert!(!reason.is_empty());
            }
            other => panic!("expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_placement_transform_accessor() {
        let mut canvas = Canvas::new(100.0, 100.0);
        canvas.add_svg_content(RECT_WH, Rect::new(30.0, 40.0, 220.0, 240.0));
        let t = canvas.placements()[0].transform().unwrap();
        assert_eq!(t.scale_y, 20.0);
        assert_eq!((t.translate_x, t.translate_y), (30.0, 40.0));
    }

    #[test]
    fn test_placement_transform_reports_invalid_input() {
        let mut canvas = Canvas::new(100.0, 100.0);
        canvas.add_svg_content(RECT_WH, Rect::default());
        canvas.add_svg_content("<svg", Rect::default());

        let placement = &canvas.placements()[1];
        assert_eq!(placement.index(), 1);
        match placement.transform() {
            Err(CanvasError::InvalidInput { index, .. }) => assert_eq!(index, 1),
            other => panic!("expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_svg_namespaced_attribute_does_not_collide() {
        let mut canvas = Canvas::new(100.0, 100.0);
        canvas.add_svg_content(
            r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:s="http://www.w3.org/2000/svg"><rect s:width="3" width="4"/></svg>"#,
            Rect::default(),
        );

        let svg = canvas.render_svg().unwrap();
        let doc = roxmltree::Document::parse(&svg).expect("composed output should reparse");
        let rect = doc
            .descendants()
            .find(|n| n.has_tag_name("rect") && n.attribute("fill").is_none())
            .unwrap();
        assert_eq!(rect.attribute("width"), Some("4"));
        assert_eq!(rect.attribute((SVG_NS, "width")), Some("3"));
    }

    #[test]
    fn test_fractional_dimensions_keep_precision() {
        let canvas = Canvas::new(210.5, 297.25);
        let svg = canvas.render_svg().unwrap();
        assert!(svg.contains(r#"viewBox="0 0 210.5 297.25""#));
    }
}
