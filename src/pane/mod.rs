//! The two scrollable panes and the capability they expose.
//!
//! A pane is anything that reports scroll metrics and accepts a new
//! scroll offset: the source text area, or the container wrapping the
//! rendering engine's output.

mod viewport;

pub use viewport::{PaneViewport, SharedViewport};

/// Identifies one of the two panes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pane {
    /// The plain-text source pane.
    Source,
    /// The rendered (WYSIWYG) pane.
    Editor,
}

impl Pane {
    /// The other pane.
    pub const fn opposite(self) -> Self {
        match self {
            Self::Source => Self::Editor,
            Self::Editor => Self::Source,
        }
    }

    pub(crate) const fn index(self) -> usize {
        match self {
            Self::Source => 0,
            Self::Editor => 1,
        }
    }
}

/// Scroll metrics of a host pane, in pixels.
pub trait ScrollPane {
    /// Current scroll offset from the top of the content.
    fn scroll_top(&self) -> f64;

    /// Total height of the scrollable content.
    fn scroll_height(&self) -> f64;

    /// Height of the visible area.
    fn client_height(&self) -> f64;

    /// Write a new scroll offset. Hosts may clamp.
    fn set_scroll_top(&mut self, top: f64);

    /// Top of the pane's visible area in viewport coordinates.
    ///
    /// Used to convert viewport-relative positions reported by the
    /// rendering engine into pane-scroll-relative offsets.
    fn viewport_top(&self) -> f64 {
        0.0
    }

    /// Largest valid scroll offset; zero when the content fits.
    fn max_scroll(&self) -> f64 {
        (self.scroll_height() - self.client_height()).max(0.0)
    }
}

/// The two panes, either of which may be absent (not yet attached).
#[derive(Debug, Clone)]
pub struct Panes<P> {
    pub source: Option<P>,
    pub editor: Option<P>,
}

impl<P> Panes<P> {
    pub const fn new(source: P, editor: P) -> Self {
        Self {
            source: Some(source),
            editor: Some(editor),
        }
    }

    /// No pane attached yet.
    pub const fn detached() -> Self {
        Self {
            source: None,
            editor: None,
        }
    }

    pub fn get(&self, pane: Pane) -> Option<&P> {
        match pane {
            Pane::Source => self.source.as_ref(),
            Pane::Editor => self.editor.as_ref(),
        }
    }

    pub fn get_mut(&mut self, pane: Pane) -> Option<&mut P> {
        match pane {
            Pane::Source => self.source.as_mut(),
            Pane::Editor => self.editor.as_mut(),
        }
    }
}
