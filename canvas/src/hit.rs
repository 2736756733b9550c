//! Hit-testing: deciding which element, and which vertex of it, lies under a
//! pointer position.
//!
//! Strokes and lines are effectively zero-width, so they are picked by
//! distance to their vertices rather than by geometric containment. Labels
//! are picked by their measured text box.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::consts::{FALLBACK_ADVANCE_RATIO, FONT_SIZE_PX, LINE_HEIGHT_PX};
use crate::doc::{DocStore, Element, ElementId, ElementKind, Point};

/// Measures rendered text at the label font.
pub trait TextMetrics {
    /// Width in pixels of `text` rendered at the label font.
    fn text_width(&self, text: &str) -> f64;

    /// Height of a label's box above its baseline.
    fn line_height(&self) -> f64 {
        LINE_HEIGHT_PX
    }
}

/// Estimates width from character count. Used when no drawing surface is
/// available to measure against.
#[derive(Debug, Clone, Copy)]
pub struct FixedAdvanceMetrics {
    pub font_size: f64,
    pub line_height: f64,
}

impl FixedAdvanceMetrics {
    #[must_use]
    pub fn new(font_size: f64, line_height: f64) -> Self {
        Self { font_size, line_height }
    }
}

impl Default for FixedAdvanceMetrics {
    fn default() -> Self {
        Self::new(FONT_SIZE_PX, LINE_HEIGHT_PX)
    }
}

impl TextMetrics for FixedAdvanceMetrics {
    #[allow(clippy::cast_precision_loss)]
    fn text_width(&self, text: &str) -> f64 {
        text.chars().count() as f64 * self.font_size * FALLBACK_ADVANCE_RATIO
    }

    fn line_height(&self) -> f64 {
        self.line_height
    }
}

/// Which part of an element was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitPart {
    /// A stroke or line vertex, by index.
    Vertex(usize),
    /// Somewhere inside a label's text box.
    TextBox,
}

/// Result of a hit test.
#[derive(Debug, Clone, Copy)]
pub struct Hit {
    pub element_id: ElementId,
    pub part: HitPart,
}

/// Axis-aligned box occupied by a label's text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextBox {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl TextBox {
    #[must_use]
    pub fn contains(&self, pt: Point) -> bool {
        pt.x >= self.left && pt.x <= self.right && pt.y >= self.top && pt.y <= self.bottom
    }
}

/// Text box of a label anchored at its baseline-left corner.
#[must_use]
pub fn label_box(anchor: Point, text: &str, metrics: &dyn TextMetrics) -> TextBox {
    TextBox {
        left: anchor.x,
        top: anchor.y - metrics.line_height(),
        right: anchor.x + metrics.text_width(text),
        bottom: anchor.y,
    }
}

/// Whether `pt` touches `element`: within `tolerance` of a stroke or line
/// vertex, or inside a label's text box.
#[must_use]
pub fn hits_element(element: &Element, pt: Point, tolerance: f64, metrics: &dyn TextMetrics) -> bool {
    match &element.kind {
        ElementKind::Stroke { .. } | ElementKind::Line { .. } => point_index_near(element, pt, tolerance).is_some(),
        ElementKind::Label { anchor, text } => label_box(*anchor, text, metrics).contains(pt),
    }
}

/// Index of the first stroke or line vertex within `tolerance` of `pt`.
///
/// Labels have no pickable vertices and always return `None`.
#[must_use]
pub fn point_index_near(element: &Element, pt: Point, tolerance: f64) -> Option<usize> {
    match &element.kind {
        ElementKind::Stroke { points } => points.iter().position(|p| p.distance_to(pt) <= tolerance),
        ElementKind::Line { a, b } => [*a, *b].iter().position(|p| p.distance_to(pt) <= tolerance),
        ElementKind::Label { .. } => None,
    }
}

/// Pick the topmost element under `pt` and the part of it that was hit.
#[must_use]
pub fn hit_test(pt: Point, doc: &DocStore, tolerance: f64, metrics: &dyn TextMetrics) -> Option<Hit> {
    let element = doc.find_near(pt, tolerance, metrics)?;
    let part = match &element.kind {
        ElementKind::Stroke { .. } | ElementKind::Line { .. } => {
            HitPart::Vertex(point_index_near(element, pt, tolerance)?)
        }
        ElementKind::Label { .. } => HitPart::TextBox,
    };
    Some(Hit { element_id: element.id, part })
}
