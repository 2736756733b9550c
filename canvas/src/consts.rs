//! Shared numeric constants for the canvas crate.

// ── Hit-testing ─────────────────────────────────────────────────

/// Pixel radius within which a pointer counts as touching a vertex.
pub const HIT_TOLERANCE_PX: f64 = 6.0;

// ── Styling ─────────────────────────────────────────────────────

/// Color given to new elements when none is configured.
pub const DEFAULT_COLOR: &str = "#000";

/// Stroke width for strokes and lines, in pixels.
pub const LINE_WIDTH_PX: f64 = 2.0;

/// Font size of label text, in pixels.
pub const FONT_SIZE_PX: f64 = 16.0;

/// Font family of label text.
pub const FONT_FAMILY: &str = "Arial";

/// Height of a label's bounding box above its baseline.
pub const LINE_HEIGHT_PX: f64 = 16.0;

/// Average glyph advance as a fraction of font size, used when no real text
/// measurement is available.
pub const FALLBACK_ADVANCE_RATIO: f64 = 0.6;

// ── Selection UI ────────────────────────────────────────────────

/// Radius of the vertex handles drawn on a selected element.
pub const HANDLE_RADIUS_PX: f64 = 4.0;

/// Fill color of vertex handles.
pub const HANDLE_COLOR: &str = "red";
