//! Error types for canvas composition and export
//!
//! Every failure surfaces synchronously to the caller of the operation that
//! triggered it. Nothing is retried.

use std::fmt;
use thiserror::Error;

/// Export capability that needs the external vector-drawing renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFeature {
    /// Vector page output
    Pdf,
    /// Raster output
    Png,
}

impl fmt::Display for ExportFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFeature::Pdf => write!(f, "PDF"),
            ExportFeature::Png => write!(f, "PNG"),
        }
    }
}

/// Top-level error type for canvas operations
#[derive(Debug, Error)]
pub enum CanvasError {
    /// A placement's content is not well-formed markup (raised at render time)
    #[error("invalid SVG content in placement {index}: {reason}")]
    InvalidInput { index: usize, reason: String },

    /// A requested export parameter is out of range
    #[error("validation failed: {0}")]
    Validation(String),

    /// The renderer capability is not available in this environment
    #[error("{feature} export requires a vector-drawing renderer, none is available ({hint})")]
    MissingDependency { feature: ExportFeature, hint: String },

    /// The renderer accepted the document but produced nothing usable
    #[error("render failed: {0}")]
    RenderFailure(String),

    /// Manifest could not be read or does not describe a canvas
    #[error("invalid manifest: {0}")]
    Manifest(String),

    /// Writing the composed markup failed
    #[error("failed to write SVG markup: {0}")]
    Markup(#[from] quick_xml::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CanvasError>;
