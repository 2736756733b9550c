//! Document model: drawable elements and the ordered in-memory store.
//!
//! This module defines what is on the canvas (`Element`, `ElementKind`) and
//! the runtime store that owns every committed element (`DocStore`). The store
//! is an ordered sequence: insertion order is draw order, so the last element
//! is on top and wins ties when picking.
//!
//! Data flows into this layer from the persistence codec (whole-document
//! loads) and from the input engine (appends, vertex drags, erasures). The
//! renderer reads from `DocStore` via `iter`.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::hit::{self, TextMetrics};

/// Unique identifier for an element. Identity is by id, never by value.
pub type ElementId = Uuid;

/// A point in canvas pixel coordinates (origin top-left, y-down).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance_to(self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// Geometry of an element.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementKind {
    /// Freehand path through an ordered list of vertices.
    Stroke {
        /// Vertices in drawing order.
        points: Vec<Point>,
    },
    /// Straight segment between two endpoints.
    Line {
        /// Endpoint where the drag started.
        a: Point,
        /// Endpoint where the drag ended.
        b: Point,
    },
    /// A single line of text.
    Label {
        /// Baseline-left corner of the text.
        anchor: Point,
        /// Text content; never empty for labels created by the engine.
        text: String,
    },
}

/// A drawable unit in the document.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    /// Unique identifier for this element.
    pub id: ElementId,
    /// Shape and geometry.
    pub kind: ElementKind,
    /// CSS color string used for stroke or text fill.
    pub color: String,
    /// Whether selection handles are drawn for this element.
    pub selected: bool,
}

impl Element {
    /// Create an unselected element with a fresh id.
    #[must_use]
    pub fn new(kind: ElementKind, color: impl Into<String>) -> Self {
        Self { id: Uuid::new_v4(), kind, color: color.into(), selected: false }
    }

    #[must_use]
    pub fn stroke(points: Vec<Point>, color: impl Into<String>) -> Self {
        Self::new(ElementKind::Stroke { points }, color)
    }

    #[must_use]
    pub fn line(a: Point, b: Point, color: impl Into<String>) -> Self {
        Self::new(ElementKind::Line { a, b }, color)
    }

    #[must_use]
    pub fn label(anchor: Point, text: impl Into<String>, color: impl Into<String>) -> Self {
        Self::new(ElementKind::Label { anchor, text: text.into() }, color)
    }

    /// Editable vertices in order. A label exposes its anchor as the only vertex.
    #[must_use]
    pub fn vertices(&self) -> Vec<Point> {
        match &self.kind {
            ElementKind::Stroke { points } => points.clone(),
            ElementKind::Line { a, b } => vec![*a, *b],
            ElementKind::Label { anchor, .. } => vec![*anchor],
        }
    }

    /// Overwrite the vertex at `index`. Returns false if the index is out of range.
    pub fn set_vertex(&mut self, index: usize, to: Point) -> bool {
        let slot = match &mut self.kind {
            ElementKind::Stroke { points } => points.get_mut(index),
            ElementKind::Line { a, b } => match index {
                0 => Some(a),
                1 => Some(b),
                _ => None,
            },
            ElementKind::Label { anchor, .. } => (index == 0).then_some(anchor),
        };
        match slot {
            Some(p) => {
                *p = to;
                true
            }
            None => false,
        }
    }

    /// Short kind name, matching the interchange `type` tag.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            ElementKind::Stroke { .. } => "brush",
            ElementKind::Line { .. } => "line",
            ElementKind::Label { .. } => "text",
        }
    }
}

/// Ordered in-memory store of committed elements.
#[derive(Debug, Clone, Default)]
pub struct DocStore {
    elements: Vec<Element>,
}

impl DocStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self { elements: Vec::new() }
    }

    /// Add an element on top of the stack and return its id.
    pub fn append(&mut self, element: Element) -> ElementId {
        let id = element.id;
        self.elements.push(element);
        id
    }

    /// Remove an element by id, returning it if it was present.
    pub fn remove(&mut self, id: &ElementId) -> Option<Element> {
        let index = self.index_of(id)?;
        Some(self.elements.remove(index))
    }

    #[must_use]
    pub fn get(&self, id: &ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == *id)
    }

    pub fn get_mut(&mut self, id: &ElementId) -> Option<&mut Element> {
        self.elements.iter_mut().find(|e| e.id == *id)
    }

    /// Position of an element in draw order.
    #[must_use]
    pub fn index_of(&self, id: &ElementId) -> Option<usize> {
        self.elements.iter().position(|e| e.id == *id)
    }

    /// Topmost element whose hit test succeeds at `pt`.
    #[must_use]
    pub fn find_near(&self, pt: Point, tolerance: f64, metrics: &dyn TextMetrics) -> Option<&Element> {
        self.elements
            .iter()
            .rev()
            .find(|e| hit::hits_element(e, pt, tolerance, metrics))
    }

    /// Replace every element with `elements`, keeping their order.
    pub fn replace_all(&mut self, elements: Vec<Element>) {
        self.elements = elements;
    }

    /// Clear the `selected` flag on every element.
    pub fn clear_selected(&mut self) {
        for e in &mut self.elements {
            e.selected = false;
        }
    }

    /// Elements in draw order (bottom first).
    pub fn iter(&self) -> impl Iterator<Item = &Element> {
        self.elements.iter()
    }

    #[must_use]
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}
