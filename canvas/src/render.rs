//! Rendering: draws the full canvas scene to a 2D context.
//!
//! This module is the only place that draws with [`web_sys::CanvasRenderingContext2d`].
//! It receives read-only views of document state and the in-progress element
//! and produces pixels. It does not mutate any application state.
//!
//! All fallible `Canvas2D` calls propagate errors via `Result<(), JsValue>`.
//! The top-level caller ([`crate::engine::Engine::render`]) handles the result.

use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use crate::consts::{FONT_FAMILY, HANDLE_COLOR, HANDLE_RADIUS_PX};
use crate::doc::{DocStore, Element, ElementKind, Point};
use crate::engine::EngineConfig;

/// CSS font shorthand used for every label.
#[must_use]
pub fn label_font(size_px: f64) -> String {
    format!("{size_px}px {FONT_FAMILY}")
}

/// Draw the full scene: committed elements, selection handles, then the
/// element being drawn.
///
/// `width` and `height` are the canvas size in pixels.
///
/// # Errors
///
/// Returns `Err` if any `Canvas2D` call fails (e.g. invalid context state).
pub fn draw(
    ctx: &CanvasRenderingContext2d,
    doc: &DocStore,
    in_progress: Option<&Element>,
    config: &EngineConfig,
    width: f64,
    height: f64,
) -> Result<(), JsValue> {
    ctx.clear_rect(0.0, 0.0, width, height);

    // Layer 1: elements in insertion order (bottom first).
    for element in doc.iter() {
        draw_element(ctx, element, config)?;
        if element.selected {
            draw_handles(ctx, element)?;
        }
    }

    // Layer 2: the element under construction.
    if let Some(element) = in_progress {
        draw_element(ctx, element, config)?;
    }

    Ok(())
}

// =============================================================
// Element dispatch
// =============================================================

fn draw_element(ctx: &CanvasRenderingContext2d, element: &Element, config: &EngineConfig) -> Result<(), JsValue> {
    match &element.kind {
        ElementKind::Stroke { points } => {
            draw_polyline(ctx, points, &element.color, config.line_width);
            Ok(())
        }
        ElementKind::Line { a, b } => {
            draw_polyline(ctx, &[*a, *b], &element.color, config.line_width);
            Ok(())
        }
        ElementKind::Label { anchor, text } => draw_label(ctx, *anchor, text, &element.color, config.font_size),
    }
}

fn draw_polyline(ctx: &CanvasRenderingContext2d, points: &[Point], color: &str, line_width: f64) {
    let Some((first, rest)) = points.split_first() else {
        return;
    };

    ctx.save();
    ctx.set_line_width(line_width);
    ctx.set_stroke_style_str(color);
    ctx.begin_path();
    ctx.move_to(first.x, first.y);
    for p in rest {
        ctx.line_to(p.x, p.y);
    }
    ctx.stroke();
    ctx.restore();
}

fn draw_label(
    ctx: &CanvasRenderingContext2d,
    anchor: Point,
    text: &str,
    color: &str,
    font_size: f64,
) -> Result<(), JsValue> {
    ctx.save();
    ctx.set_fill_style_str(color);
    ctx.set_font(&label_font(font_size));
    ctx.set_text_align("left");
    ctx.set_text_baseline("alphabetic");
    ctx.fill_text(text, anchor.x, anchor.y)?;
    ctx.restore();
    Ok(())
}

// =============================================================
// Selection UI
// =============================================================

/// Vertex handles for a selected stroke or line. Labels have no handles.
fn draw_handles(ctx: &CanvasRenderingContext2d, element: &Element) -> Result<(), JsValue> {
    if matches!(element.kind, ElementKind::Label { .. }) {
        return Ok(());
    }

    ctx.save();
    ctx.set_fill_style_str(HANDLE_COLOR);
    for p in element.vertices() {
        ctx.begin_path();
        ctx.arc(p.x, p.y, HANDLE_RADIUS_PX, 0.0, 2.0 * PI)?;
        ctx.fill();
    }
    ctx.restore();
    Ok(())
}
