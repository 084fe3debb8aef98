//! Coordinate normalization for placed documents
//!
//! Derives the intrinsic coordinate box of a source SVG and the transform
//! that maps it onto a target rectangle on the canvas.

use roxmltree::Node;

/// Size used for a source dimension that is missing or unparseable
pub const DEFAULT_SOURCE_SIZE: f64 = 100.0;

/// Target rectangle on the canvas, in canvas units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }
}

impl Default for Rect {
    fn default() -> Self {
        Self::new(0.0, 0.0, DEFAULT_SOURCE_SIZE, DEFAULT_SOURCE_SIZE)
    }
}

/// The coordinate rectangle a source document considers its own
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntrinsicBox {
    pub min_x: f64,
    pub min_y: f64,
    pub width: f64,
    pub height: f64,
}

/// Parse a length attribute such as `"12px"` or `"4.5mm"`, ignoring units.
///
/// Only digits, signs and the decimal point are kept. Returns `None` when
/// nothing numeric remains.
pub fn parse_length(value: Option<&str>) -> Option<f64> {
    let filtered: String = value?
        .trim()
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+'))
        .collect();

    if filtered.is_empty() {
        return None;
    }
    filtered.parse::<f64>().ok()
}

/// Parse a `viewBox` value into its four components.
///
/// Returns `None` unless there are exactly four numeric tokens and the
/// width and height are positive.
pub fn parse_view_box(value: &str) -> Option<IntrinsicBox> {
    let parts: Vec<f64> = value
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .map(|token| token.parse::<f64>())
        .collect::<Result<_, _>>()
        .ok()?;

    match parts.as_slice() {
        &[min_x, min_y, width, height] if width > 0.0 && height > 0.0 => Some(IntrinsicBox {
            min_x,
            min_y,
            width,
            height,
        }),
        _ => None,
    }
}

/// Determine the intrinsic box of a source document's root element.
///
/// A usable `viewBox` wins over `width`/`height`. Otherwise each dimension
/// falls back independently to [`DEFAULT_SOURCE_SIZE`], with the origin at 0,0.
pub fn intrinsic_box(root: Node) -> IntrinsicBox {
    if let Some(view_box) = root.attribute("viewBox").and_then(parse_view_box) {
        return view_box;
    }

    let dimension = |name: &str| {
        parse_length(root.attribute(name))
            .filter(|v| *v != 0.0)
            .unwrap_or(DEFAULT_SOURCE_SIZE)
    };

    IntrinsicBox {
        min_x: 0.0,
        min_y: 0.0,
        width: dimension("width"),
        height: dimension("height"),
    }
}

/// `translate(x, y) · scale(sx, sy) · translate(-min_x, -min_y)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementTransform {
    pub translate_x: f64,
    pub translate_y: f64,
    pub scale_x: f64,
    pub scale_y: f64,
    pub origin_x: f64,
    pub origin_y: f64,
}

impl PlacementTransform {
    /// Map `source` onto `target`, filling it exactly (no aspect preservation).
    pub fn derive(target: Rect, source: IntrinsicBox) -> Self {
        let scale_x = if source.width != 0.0 { target.width / source.width } else { 1.0 };
        let scale_y = if source.height != 0.0 { target.height / source.height } else { 1.0 };

        Self {
            translate_x: target.x,
            translate_y: target.y,
            scale_x,
            scale_y,
            origin_x: source.min_x,
            origin_y: source.min_y,
        }
    }

    /// Equivalent affine matrix `[a, b, c, d, e, f]`
    pub fn matrix(&self) -> [f64; 6] {
        [
            self.scale_x,
            0.0,
            0.0,
            self.scale_y,
            self.translate_x - self.scale_x * self.origin_x,
            self.translate_y - self.scale_y * self.origin_y,
        ]
    }

    /// Map a point from source coordinates to canvas coordinates
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        let [a, _, _, d, e, f] = self.matrix();
        (a * x + e, d * y + f)
    }

    /// Value for an SVG `transform` attribute
    pub fn to_svg(&self) -> String {
        format!(
            "translate({} {}) scale({} {}) translate({} {})",
            fmt_number(self.translate_x),
            fmt_number(self.translate_y),
            fmt_number(self.scale_x),
            fmt_number(self.scale_y),
            fmt_number(-self.origin_x),
            fmt_number(-self.origin_y),
        )
    }
}

/// Shortest round-trip decimal form, with negative zero written as `0`
pub fn fmt_number(value: f64) -> String {
    if value == 0.0 {
        "0".to_string()
    } else {
        value.to_string()
    }
}
