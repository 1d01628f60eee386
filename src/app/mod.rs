//! The split editor: both panes, the engine and the sync controllers.
//!
//! This module follows The Elm Architecture loosely:
//! - [`Message`]: host events (edits, scrolls, resizes)
//! - [`Effect`]: what the host must mirror after a step
//! - [`SplitEditor::handle`], [`SplitEditor::tick`] and
//!   [`SplitEditor::frame`]: the three entry points the host drives

mod frame;
mod update;

pub use update::{Effect, Message};

use tracing::debug;

use crate::config::SyncConfig;
use crate::document::SourceText;
use crate::edit::EditPropagation;
use crate::engine::RenderEngine;
use crate::pane::{PaneViewport, Panes, ScrollPane};
use crate::sched::FrameSlot;
use crate::stops::StopSet;
use crate::sync::ScrollSync;

/// Keeps a source pane and a rendered pane in sync.
///
/// All time is passed in as milliseconds from an arbitrary origin.
pub struct SplitEditor<E, P = PaneViewport> {
    config: SyncConfig,
    panes: Panes<P>,
    engine: Option<E>,
    source: SourceText,
    stops: StopSet,
    stops_dirty: bool,
    frame: FrameSlot,
    scroll: ScrollSync,
    edits: EditPropagation,
}

impl<E, P> std::fmt::Debug for SplitEditor<E, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SplitEditor")
            .field("config", &self.config)
            .field("mounted", &self.engine.is_some())
            .field("stops", &self.stops)
            .field("stops_dirty", &self.stops_dirty)
            .finish_non_exhaustive()
    }
}

impl<E: RenderEngine, P: ScrollPane> SplitEditor<E, P> {
    /// Create an editor over `panes` holding `initial_text`.
    ///
    /// No engine is attached yet; call [`Self::mount`].
    pub fn new(config: SyncConfig, panes: Panes<P>, initial_text: &str) -> Self {
        let mut frame = FrameSlot::new();
        frame.request();
        Self {
            config,
            panes,
            engine: None,
            source: SourceText::from_text(initial_text),
            stops: StopSet::default(),
            stops_dirty: true,
            frame,
            scroll: ScrollSync::new(&config),
            edits: EditPropagation::new(initial_text.to_string(), config.debounce_ms),
        }
    }

    /// Attach the rendering engine.
    pub fn mount(&mut self, engine: E) {
        debug!("engine mounted");
        self.engine = Some(engine);
        self.invalidate_stops();
    }

    /// Detach the engine and cancel every timer, frame request and
    /// animation.
    pub fn unmount(&mut self) -> Option<E> {
        debug!("split editor unmounted");
        self.edits.cancel();
        self.scroll.cancel_all();
        self.frame.cancel();
        self.engine.take()
    }

    pub const fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub const fn engine(&self) -> Option<&E> {
        self.engine.as_ref()
    }

    pub const fn engine_mut(&mut self) -> Option<&mut E> {
        self.engine.as_mut()
    }

    pub const fn panes(&self) -> &Panes<P> {
        &self.panes
    }

    pub const fn panes_mut(&mut self) -> &mut Panes<P> {
        &mut self.panes
    }

    /// The document text as the source pane knows it.
    pub fn document(&self) -> &str {
        self.edits.document()
    }

    /// The cached anchors; may be stale until the next frame.
    pub const fn stops(&self) -> &StopSet {
        &self.stops
    }

    pub const fn scroll_sync(&self) -> &ScrollSync {
        &self.scroll
    }

    /// True when the host should call [`Self::frame`] on its next
    /// animation frame.
    pub fn wants_frame(&self) -> bool {
        self.frame.is_requested() || self.scroll.is_easing()
    }

    /// Earliest time [`Self::tick`] has timer work to do.
    pub fn next_deadline(&self) -> Option<u64> {
        [self.edits.deadline(), self.scroll.next_deadline()]
            .into_iter()
            .flatten()
            .min()
    }

    /// Mark the stops stale and ask for a frame to recompute them.
    fn invalidate_stops(&mut self) {
        self.stops_dirty = true;
        self.frame.request();
    }
}

#[cfg(test)]
mod tests;
