//! Bidirectional scroll synchronization.
//!
//! - [`SyncLock`]: which pane's scroll is currently being mirrored
//! - [`PendingWrites`]: last-value-wins targets, drained once per frame
//! - [`SmoothSnap`]: optional settle ease after scrolling stops
//! - [`ScrollSync`]: the per-event state machine tying them together

mod controller;
mod lock;
mod pending;
mod snap;

pub use controller::{ScrollSync, ScrollWrite, WRITE_EPSILON};
pub use lock::SyncLock;
pub use pending::PendingWrites;
pub use snap::{Ease, SmoothSnap, ease_out_cubic};
