//! JSON interchange format for saved documents.
//!
//! The document is stored as a flat array of records tagged by `type`:
//!
//! ```json
//! [
//!   { "type": "brush", "points": [{ "x": 1, "y": 2 }, { "x": 3, "y": 4 }], "color": "#000", "selected": false },
//!   { "type": "line",  "points": [{ "x": 0, "y": 0 }, { "x": 9, "y": 9 }], "color": "#000", "selected": false },
//!   { "type": "text",  "text": "hello", "x": 5, "y": 20, "color": "#000", "selected": false }
//! ]
//! ```
//!
//! Ids are not part of the format; decoded elements get fresh ones. Decoding
//! validates the whole payload before returning, so callers never observe a
//! partially loaded document.

#[cfg(test)]
#[path = "persist_test.rs"]
mod persist_test;

use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_COLOR;
use crate::doc::{DocStore, Element, ElementKind, Point};

/// Error returned by [`encode_document`] and [`decode_document`].
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    /// The payload is not valid JSON or does not match the record shape.
    #[error("malformed document: {0}")]
    Json(#[from] serde_json::Error),
    /// A brush record has no points.
    #[error("element {index}: brush stroke has no points")]
    EmptyStroke { index: usize },
    /// A line record does not have exactly two points.
    #[error("element {index}: line needs 2 points, found {found}")]
    LineEndpoints { index: usize, found: usize },
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum WireRecord {
    Brush {
        points: Vec<Point>,
        #[serde(default = "default_color")]
        color: String,
        #[serde(default)]
        selected: bool,
    },
    Line {
        points: Vec<Point>,
        #[serde(default = "default_color")]
        color: String,
        #[serde(default)]
        selected: bool,
    },
    Text {
        text: String,
        x: f64,
        y: f64,
        #[serde(default = "default_color")]
        color: String,
        #[serde(default)]
        selected: bool,
    },
}

fn default_color() -> String {
    DEFAULT_COLOR.to_owned()
}

/// Serialize every element of `doc`, in draw order.
///
/// # Errors
///
/// Returns [`PersistError::Json`] if serialization fails.
pub fn encode_document(doc: &DocStore) -> Result<String, PersistError> {
    let records: Vec<WireRecord> = doc.iter().map(element_to_wire).collect();
    Ok(serde_json::to_string(&records)?)
}

/// Parse a saved document into elements, preserving order.
///
/// # Errors
///
/// Returns [`PersistError::Json`] for syntax or shape errors and the
/// geometry variants for records that violate element invariants.
pub fn decode_document(json: &str) -> Result<Vec<Element>, PersistError> {
    let records: Vec<WireRecord> = serde_json::from_str(json)?;
    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| wire_to_element(index, record))
        .collect()
}

fn element_to_wire(element: &Element) -> WireRecord {
    let color = element.color.clone();
    let selected = element.selected;
    match &element.kind {
        ElementKind::Stroke { points } => WireRecord::Brush { points: points.clone(), color, selected },
        ElementKind::Line { a, b } => WireRecord::Line { points: vec![*a, *b], color, selected },
        ElementKind::Label { anchor, text } => WireRecord::Text {
            text: text.clone(),
            x: anchor.x,
            y: anchor.y,
            color,
            selected,
        },
    }
}

fn wire_to_element(index: usize, record: WireRecord) -> Result<Element, PersistError> {
    let (kind, color, selected) = match record {
        WireRecord::Brush { points, color, selected } => {
            if points.is_empty() {
                return Err(PersistError::EmptyStroke { index });
            }
            (ElementKind::Stroke { points }, color, selected)
        }
        WireRecord::Line { points, color, selected } => {
            let [a, b] = <[Point; 2]>::try_from(points)
                .map_err(|points| PersistError::LineEndpoints { index, found: points.len() })?;
            (ElementKind::Line { a, b }, color, selected)
        }
        WireRecord::Text { text, x, y, color, selected } => {
            (ElementKind::Label { anchor: Point::new(x, y), text }, color, selected)
        }
    };
    let mut element = Element::new(kind, color);
    element.selected = selected;
    Ok(element)
}
