//! Document model and editing engine for the vector illustration canvas.
//!
//! This crate is compiled to WebAssembly and runs in the browser. It owns the
//! drawing lifecycle: translating pointer events into document mutations
//! through the active tool, hit-testing elements, saving and loading the
//! document, and rendering the scene. The host page is responsible only for
//! wiring DOM events and toolbar buttons to the engine.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level engine and testable [`engine::EngineCore`] |
//! | [`doc`] | Elements and the ordered in-memory document store |
//! | [`input`] | Tools, buttons, and the gesture state machine |
//! | [`hit`] | Tolerance-based hit-testing against elements |
//! | [`persist`] | JSON interchange format for saved documents |
//! | [`render`] | Scene rendering to a `CanvasRenderingContext2d` |
//! | [`consts`] | Shared numeric and styling constants |

pub mod consts;
pub mod doc;
pub mod engine;
pub mod hit;
pub mod input;
pub mod persist;
pub mod render;
