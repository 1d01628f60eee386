use tracing::{debug, trace};

use super::SplitEditor;
use crate::engine::{EngineEvent, RenderEngine};
use crate::pane::{Pane, ScrollPane};
use crate::sync::ScrollWrite;

/// Host events delivered to the split editor.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// The user changed the source pane's text
    SourceEdited(String),
    /// A pane's scroll offset changed (user input or our own write)
    Scrolled(Pane),
    /// The window was resized
    WindowResized,
    /// A pane's visible or content size changed
    PaneResized(Pane),
}

/// Changes the host must reflect after a step.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// A pane's scroll offset was written
    ScrollWritten(ScrollWrite),
    /// The rendered document was replaced from the source text
    DocumentReplaced,
    /// A render-originated edit was adopted; update the source widget
    SourceReplaced(String),
    /// The anchor cache was rebuilt
    StopsRecomputed,
}

impl<E: RenderEngine, P: ScrollPane> SplitEditor<E, P> {
    /// Handle one host event.
    pub fn handle(&mut self, msg: Message, now_ms: u64) -> Vec<Effect> {
        let mut effects = Vec::new();
        match msg {
            Message::SourceEdited(text) => {
                self.source.set_text(&text);
                self.edits.source_edited(text, now_ms);
                self.invalidate_stops();
            }
            Message::Scrolled(pane) => {
                if self.stops.is_empty() {
                    self.recompute_stops();
                    effects.push(Effect::StopsRecomputed);
                }
                if self.scroll.on_scroll(pane, &self.stops, &self.panes, now_ms) {
                    self.frame.request();
                }
            }
            Message::WindowResized | Message::PaneResized(_) => self.invalidate_stops(),
        }
        effects
    }

    /// Drain the engine's queued notifications.
    ///
    /// Hosts call this whenever their engine signals a change; a
    /// render-side edit is adopted here without waiting for any timer.
    pub fn engine_notified(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        self.dispatch_engine_events(&mut effects);
        effects
    }

    /// Run due timers and drain engine notifications.
    pub fn tick(&mut self, now_ms: u64) -> Vec<Effect> {
        let mut effects = Vec::new();
        self.dispatch_engine_events(&mut effects);

        if let Some(text) = self.edits.take_due(now_ms) {
            self.propagate_to_engine(&text, &mut effects);
        }

        if self.scroll.on_idle(&self.stops, &self.panes, now_ms) {
            self.frame.request();
        }
        effects
    }

    fn propagate_to_engine(&mut self, text: &str, effects: &mut Vec<Effect>) {
        let Some(engine) = self.engine.as_mut() else {
            trace!("no engine, dropping source replacement");
            return;
        };
        self.edits.begin_replace();
        engine.replace_document(text);
        // Notifications raised by the replacement itself are echoes
        self.dispatch_engine_events(effects);
        self.edits.end_replace();
        debug!(len = text.len(), "rendered document replaced");
        effects.push(Effect::DocumentReplaced);
    }

    pub(super) fn dispatch_engine_events(&mut self, effects: &mut Vec<Effect>) {
        let Some(engine) = self.engine.as_mut() else {
            return;
        };
        for event in engine.take_events() {
            match event {
                EngineEvent::DocumentChanged(text) => {
                    if let Some(adopted) = self.edits.render_changed(text) {
                        self.source.set_text(&adopted);
                        effects.push(Effect::SourceReplaced(adopted));
                    }
                    self.invalidate_stops();
                }
                EngineEvent::Mounted | EngineEvent::LayoutUpdated => self.invalidate_stops(),
            }
        }
    }
}
