// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. stops::StopSet)
    clippy::module_name_repetitions
)]

//! # Panesync
//!
//! Scroll and edit synchronization for a two-pane document editor.
//!
//! One pane shows the plain source text, the other a rendered view
//! produced by a pluggable engine. Panesync keeps them aligned with:
//! - Structural anchors ("stops") extracted from both panes
//! - A piecewise-linear mapping between the two anchor sequences
//! - A scroll lock that suppresses echo scrolls
//! - Debounced source-to-render propagation with echo suppression
//! - An optional settle ease once scrolling goes idle
//!
//! ## Architecture
//!
//! The host owns the clock and the event loop. It feeds
//! [`app::Message`]s into [`app::SplitEditor::handle`], calls
//! [`app::SplitEditor::tick`] when [`app::SplitEditor::next_deadline`]
//! passes and [`app::SplitEditor::frame`] on each animation frame
//! while [`app::SplitEditor::wants_frame`] holds. Whenever the engine
//! signals a change, the host calls
//! [`app::SplitEditor::engine_notified`]; `tick` and `frame` also drain
//! any notifications still queued.
//!
//! ## Modules
//!
//! - [`app`]: The split editor state machine
//! - [`pane`]: Pane identity and scroll geometry
//! - [`engine`]: Rendering engine contract and a markdown engine
//! - [`stops`]: Anchor extraction for both panes
//! - [`mapping`]: Anchor-to-anchor offset mapping
//! - [`sync`]: Scroll lock, coalesced writes and the settle ease
//! - [`edit`]: Source/render text propagation
//! - [`watcher`]: File watching for the harness

pub mod app;
pub mod config;
pub mod document;
pub mod edit;
pub mod engine;
pub mod mapping;
pub mod pane;
pub mod sched;
pub mod stops;
pub mod sync;
pub mod watcher;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::app::{Effect, Message, SplitEditor};
    pub use crate::config::SyncConfig;
    pub use crate::engine::{EngineLayout, MarkdownEngine, RenderEngine};
    pub use crate::mapping::map;
    pub use crate::pane::{Pane, PaneViewport, Panes, ScrollPane, SharedViewport};
    pub use crate::stops::StopSet;
}
