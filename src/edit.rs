//! Edit propagation between the source pane and the rendering engine.
//!
//! Source keystrokes are debounced before they replace the rendered
//! document. Render-originated changes are adopted at once. An echo flag
//! plus an equality check keep the two directions from feeding each
//! other.

use tracing::{debug, trace};

use crate::sched::TimerSlot;

/// Debounce and echo state for both edit directions.
#[derive(Debug, Clone)]
pub struct EditPropagation {
    debounce: TimerSlot,
    debounce_ms: u64,
    /// The document text as the source pane knows it
    document: String,
    /// Text waiting for the debounce to fire
    pending: Option<String>,
    /// Last text the engine reported
    last_render_text: Option<String>,
    suppressing_echo: bool,
}

impl EditPropagation {
    pub const fn new(initial_text: String, debounce_ms: u64) -> Self {
        Self {
            debounce: TimerSlot::new(),
            debounce_ms,
            document: initial_text,
            pending: None,
            last_render_text: None,
            suppressing_echo: false,
        }
    }

    /// The currently tracked document text.
    pub fn document(&self) -> &str {
        &self.document
    }

    pub fn last_render_text(&self) -> Option<&str> {
        self.last_render_text.as_deref()
    }

    pub const fn is_suppressing_echo(&self) -> bool {
        self.suppressing_echo
    }

    pub const fn deadline(&self) -> Option<u64> {
        self.debounce.deadline()
    }

    /// Record a source-pane edit and restart the debounce.
    pub fn source_edited(&mut self, text: String, now_ms: u64) {
        self.document.clone_from(&text);
        self.pending = Some(text);
        self.debounce.schedule(now_ms, self.debounce_ms);
    }

    /// Text to push to the engine once the debounce has elapsed.
    pub fn take_due(&mut self, now_ms: u64) -> Option<String> {
        if !self.debounce.take_due(now_ms) {
            return None;
        }
        let text = self.pending.take();
        if text.is_some() {
            debug!("edit debounce fired");
        }
        text
    }

    /// Mark the start of a source-driven replacement; notifications
    /// seen until [`Self::end_replace`] are echoes.
    pub const fn begin_replace(&mut self) {
        self.suppressing_echo = true;
    }

    pub const fn end_replace(&mut self) {
        self.suppressing_echo = false;
    }

    /// Handle a "document changed" notification from the engine.
    ///
    /// Returns the text to adopt into the source pane, if any.
    pub fn render_changed(&mut self, text: String) -> Option<String> {
        self.last_render_text = Some(text.clone());
        if self.suppressing_echo {
            trace!("render change suppressed as echo");
            return None;
        }
        if text == self.document {
            trace!("render change matches document");
            return None;
        }
        debug!(len = text.len(), "adopting render-originated edit");
        // The adopted text supersedes any source edit still waiting
        self.debounce.cancel();
        self.pending = None;
        self.document.clone_from(&text);
        Some(text)
    }

    pub fn cancel(&mut self) {
        self.debounce.cancel();
        self.pending = None;
        self.suppressing_echo = false;
    }
}
