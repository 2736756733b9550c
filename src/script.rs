//! Line-oriented pointer scripts for driving the editing engine headlessly.
//!
//! One command per line. Blank lines and `#` comments are ignored, except
//! that a `text` answer runs literally to the end of its line:
//!
//! ```text
//! tool brush
//! down 10 10
//! move 20 10
//! up 20 10      # release coordinates are optional
//! # answer for the next text prompt
//! text C# in a label
//! tool text
//! down 40 40
//! ```

#[cfg(test)]
#[path = "script_test.rs"]
mod script_test;

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use canvas::doc::Point;
use canvas::engine::{Action, EngineCore};
use canvas::input::{Button, Tool, UnknownTool};

/// A single scripted input event.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Tool(Tool),
    Down(Point),
    Move(Point),
    Up,
    /// Queue an answer for the next text prompt.
    Text(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("line {line}: unknown command `{word}`")]
    UnknownCommand { line: usize, word: String },
    #[error("line {line}: {source}")]
    Tool { line: usize, source: UnknownTool },
    #[error("line {line}: expected `<x> <y>` coordinates")]
    Coordinates { line: usize },
    #[error("line {line}: `text` needs a value")]
    EmptyText { line: usize },
}

/// Counts of document changes produced by a replay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    pub created: usize,
    pub updated: usize,
    pub deleted: usize,
}

/// Parse a script into steps.
///
/// # Errors
///
/// Returns the first malformed line, numbered from 1.
pub fn parse(src: &str) -> Result<Vec<Step>, ScriptError> {
    let mut steps = Vec::new();
    for (i, raw) in src.lines().enumerate() {
        let line = i + 1;
        let content = raw.trim();
        if content.is_empty() || content.starts_with('#') {
            continue;
        }
        let (word, rest) = split_word(content);
        if word == "text" {
            if rest.is_empty() {
                return Err(ScriptError::EmptyText { line });
            }
            steps.push(Step::Text(rest.to_owned()));
            continue;
        }
        let rest = strip_comment(rest);
        let step = match word {
            "tool" => Step::Tool(rest.parse().map_err(|source| ScriptError::Tool { line, source })?),
            "down" => Step::Down(parse_point(rest).ok_or(ScriptError::Coordinates { line })?),
            "move" => Step::Move(parse_point(rest).ok_or(ScriptError::Coordinates { line })?),
            // Release coordinates are validated but unused.
            "up" if rest.is_empty() || parse_point(rest).is_some() => Step::Up,
            "up" => return Err(ScriptError::Coordinates { line }),
            other => {
                return Err(ScriptError::UnknownCommand { line, word: other.to_owned() });
            }
        };
        steps.push(step);
    }
    Ok(steps)
}

fn split_word(content: &str) -> (&str, &str) {
    match content.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (content, ""),
    }
}

fn strip_comment(rest: &str) -> &str {
    rest.split_once('#').map_or(rest, |(before, _)| before).trim_end()
}

fn parse_point(rest: &str) -> Option<Point> {
    let mut parts = rest.split_whitespace();
    let x = parts.next()?.parse().ok()?;
    let y = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some(Point::new(x, y))
}

/// Feed `steps` into `core`. `Text` steps answer the engine's text prompts
/// in order; a prompt with nothing queued cancels.
pub fn replay(core: &mut EngineCore, steps: &[Step]) -> ReplaySummary {
    let answers: Rc<RefCell<VecDeque<String>>> = Rc::default();
    let queue = Rc::clone(&answers);
    core.set_prompt(Box::new(move || queue.borrow_mut().pop_front()));

    let mut summary = ReplaySummary::default();
    for step in steps {
        let actions = match step {
            Step::Tool(tool) => core.set_tool(*tool),
            Step::Down(pt) => core.on_pointer_down(*pt, Button::Primary),
            Step::Move(pt) => core.on_pointer_move(*pt),
            Step::Up => core.on_pointer_up(Button::Primary),
            Step::Text(text) => {
                answers.borrow_mut().push_back(text.clone());
                Vec::new()
            }
        };
        for action in &actions {
            match action {
                Action::ElementCreated(element) => {
                    tracing::debug!(id = %element.id, kind = element.kind_name(), "created");
                    summary.created += 1;
                }
                Action::ElementUpdated { .. } => summary.updated += 1,
                Action::ElementDeleted { id } => {
                    tracing::debug!(%id, "deleted");
                    summary.deleted += 1;
                }
                Action::SelectionChanged(_) | Action::RenderNeeded => {}
            }
        }
    }
    summary
}
