//! The rendering engine capability.
//!
//! The sync core never looks inside the rendered document. It replaces
//! the document wholesale, drains the engine's notifications, and asks
//! two structural questions: which nodes exist, and where a document
//! offset currently sits on screen.

mod markdown;

pub use markdown::{EngineLayout, MarkdownEngine};

use thiserror::Error;

/// Structural role of a top-level node in the rendered document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Heading,
    Block,
}

/// A top-level node and the document offset (in chars) where it starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StructuralNode {
    pub kind: NodeKind,
    pub offset: usize,
}

/// Screen coordinates of a document offset, relative to the window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coords {
    pub top: f64,
}

/// Notifications emitted by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// The engine's document changed; carries its full text.
    DocumentChanged(String),
    /// The engine finished its first render.
    Mounted,
    /// Layout changed without a content change.
    LayoutUpdated,
}

/// Failures of a single engine query.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("offset {offset} is outside the document (length {len})")]
    OffsetOutOfRange { offset: usize, len: usize },
    #[error("offset {0} has no laid-out position")]
    NotLaidOut(usize),
}

/// The capability a rendering engine exposes to the sync core.
pub trait RenderEngine {
    /// Replace the whole document with `text`.
    ///
    /// Notifications caused by the replacement must be queued before
    /// this returns so the caller can tell them apart from later ones.
    fn replace_document(&mut self, text: &str);

    /// Top-level structural nodes in document order.
    fn structural_nodes(&self) -> Vec<StructuralNode>;

    /// Window-relative position of a document offset.
    ///
    /// # Errors
    /// Returns an error when the offset cannot be resolved; callers skip
    /// that node.
    fn coordinates_at_offset(&self, offset: usize) -> Result<Coords, EngineError>;

    /// Drain queued notifications, oldest first.
    fn take_events(&mut self) -> Vec<EngineEvent>;
}
