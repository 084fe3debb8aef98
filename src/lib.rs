//! SVG canvas composition
//!
//! Places independent SVG documents onto a single canvas, each scaled to fit
//! a target rectangle, and exports the result as SVG, PDF or PNG. PDF and PNG
//! go through an external vector-drawing renderer resolved at export time.

pub mod compose;
pub mod export;
pub mod manifest;

// Re-export commonly used types
pub use compose::{Canvas, CanvasError, ExportFeature, IntrinsicBox, Placement, PlacementTransform, Rect, Result};
pub use export::renderer::{DrawFormat, DrawOptions, Drawing, RendererProvider, VectorRenderer};
pub use export::ExportSettings;
pub use manifest::{load_canvas, Manifest};
