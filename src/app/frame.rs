use tracing::debug;

use super::{Effect, SplitEditor};
use crate::engine::RenderEngine;
use crate::pane::{Pane, ScrollPane};
use crate::stops::{StopSet, rendered_stops, source_stops};

impl<E: RenderEngine, P: ScrollPane> SplitEditor<E, P> {
    /// Run one animation frame.
    ///
    /// Drains engine notifications, recomputes stale stops, applies the
    /// last pending scroll target of each pane and advances the settle
    /// ease. Beyond the drain, does nothing when no frame was requested.
    pub fn frame(&mut self, now_ms: u64) -> Vec<Effect> {
        let mut effects = Vec::new();
        self.dispatch_engine_events(&mut effects);
        if !self.frame.take() && !self.scroll.is_easing() {
            return effects;
        }

        if self.stops_dirty {
            self.recompute_stops();
            effects.push(Effect::StopsRecomputed);
        }

        for write in self.scroll.apply_pending(&mut self.panes) {
            effects.push(Effect::ScrollWritten(write));
        }
        if let Some(write) = self.scroll.step_ease(&mut self.panes, now_ms) {
            effects.push(Effect::ScrollWritten(write));
        }
        if self.scroll.is_easing() {
            self.frame.request();
        }
        effects
    }

    /// Rebuild both anchor sequences from the current text and layout.
    ///
    /// A missing pane or engine leaves that side empty, which the
    /// mapper treats as a plain ratio.
    pub(super) fn recompute_stops(&mut self) {
        let source = self
            .panes
            .get(Pane::Source)
            .map(|pane| source_stops(&self.source, self.config.line_height, pane.max_scroll()))
            .unwrap_or_default();
        let editor = match (self.engine.as_ref(), self.panes.get(Pane::Editor)) {
            (Some(engine), Some(pane)) => rendered_stops(engine, pane),
            _ => Vec::new(),
        };
        debug!(source = source.len(), editor = editor.len(), "stops recomputed");
        self.stops = StopSet::new(source, editor);
        self.stops_dirty = false;
    }
}
