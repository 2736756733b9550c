//! Input model: tools, mouse buttons, and the gesture state machine.
//!
//! `Tool` captures which editing mode the user picked from the toolbar.
//! `UiState` is the part of the editing session that outlives a single
//! gesture (active tool and selection). `InputState` is the active gesture
//! being tracked between pointer-down and pointer-up.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use std::fmt;
use std::str::FromStr;

use crate::doc::{Element, ElementId};

/// Which tool is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    /// Pick an element and drag one of its vertices.
    Select,
    /// Draw a freehand stroke (default, as in the toolbar).
    #[default]
    Brush,
    /// Draw a straight line.
    Line,
    /// Remove the element under the pointer.
    Eraser,
    /// Place a text label.
    Text,
}

impl Tool {
    /// All tools in toolbar order.
    pub const ALL: [Tool; 5] = [Self::Brush, Self::Eraser, Self::Line, Self::Select, Self::Text];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Select => "select",
            Self::Brush => "brush",
            Self::Line => "line",
            Self::Eraser => "eraser",
            Self::Text => "text",
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown tool name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown tool: {0}")]
pub struct UnknownTool(pub String);

impl FromStr for Tool {
    type Err = UnknownTool;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownTool(s.to_owned()))
    }
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button (or two-finger tap).
    Secondary,
}

/// Session state visible to the renderer.
#[derive(Debug, Clone, Default)]
pub struct UiState {
    /// Currently active tool.
    pub tool: Tool,
    /// The id of the currently selected element, if any.
    pub selected_id: Option<ElementId>,
}

/// Internal state for the input state machine.
#[derive(Debug, Clone, Default)]
pub enum InputState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// A stroke or line is being dragged into existence. It is drawn as an
    /// overlay and only appended to the document on release.
    Drawing {
        /// The provisional element.
        element: Element,
    },
    /// A vertex of the selected element follows the pointer.
    DraggingPoint {
        /// Id of the element being edited.
        id: ElementId,
        /// Index of the vertex being moved.
        index: usize,
    },
}
