use tracing::{debug, trace};

use super::lock::SyncLock;
use super::pending::PendingWrites;
use super::snap::{Ease, SmoothSnap};
use crate::config::SyncConfig;
use crate::mapping::map;
use crate::pane::{Pane, Panes, ScrollPane};
use crate::stops::StopSet;

/// Writes closer than this to the current offset are skipped.
pub const WRITE_EPSILON: f64 = 0.5;

/// A scroll offset the controller wrote to a pane.
///
/// The host will usually see a scroll event for it; feeding that event
/// back through [`ScrollSync::on_scroll`] is harmless.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollWrite {
    pub pane: Pane,
    pub top: f64,
}

/// Mirrors scroll positions between the two panes.
#[derive(Debug, Clone)]
pub struct ScrollSync {
    lock: SyncLock,
    writes: PendingWrites,
    lock_ms: u64,
    snap: Option<SnapSettings>,
}

#[derive(Debug, Clone)]
struct SnapSettings {
    state: SmoothSnap,
    idle_ms: u64,
    lock_ms: u64,
    duration_ms: u64,
}

impl ScrollSync {
    pub fn new(config: &SyncConfig) -> Self {
        let snap = config.smooth_snap.then(|| SnapSettings {
            state: SmoothSnap::new(),
            idle_ms: config.snap_idle_ms,
            lock_ms: config.snap_lock_ms,
            duration_ms: config.snap_duration_ms,
        });
        Self {
            lock: SyncLock::new(),
            writes: PendingWrites::new(),
            lock_ms: config.lock_ms,
            snap,
        }
    }

    pub const fn lock(&self) -> &SyncLock {
        &self.lock
    }

    pub const fn pending(&self) -> &PendingWrites {
        &self.writes
    }

    /// Handle a scroll event from `from`.
    ///
    /// Returns true when a write for the other pane was queued and the
    /// caller must request a frame.
    pub fn on_scroll<P: ScrollPane>(
        &mut self,
        from: Pane,
        stops: &StopSet,
        panes: &Panes<P>,
        now_ms: u64,
    ) -> bool {
        let to = from.opposite();
        if self.lock.is_held_by(to, now_ms) {
            trace!(?from, "echo scroll suppressed");
            return false;
        }
        let Some(target) = mapped_target(from, stops, panes) else {
            trace!(?from, "pane missing, scroll ignored");
            return false;
        };

        self.lock.acquire(from, now_ms, self.lock_ms);
        self.writes.set(to, target);
        if let Some(snap) = self.snap.as_mut() {
            // A fresh target replaces whatever the ease was heading for
            snap.state.cancel_ease();
            snap.state.restart_idle(from, now_ms, snap.idle_ms);
        }
        trace!(?from, target, "scroll mirrored");
        true
    }

    /// Apply the last pending target of each pane.
    ///
    /// Targets are clamped to the pane's range and skipped when within
    /// [`WRITE_EPSILON`] of the current offset.
    pub fn apply_pending<P: ScrollPane>(&mut self, panes: &mut Panes<P>) -> Vec<ScrollWrite> {
        let mut applied = Vec::new();
        for (pane, target) in self.writes.drain() {
            if let Some(write) = write_clamped(panes, pane, target, WRITE_EPSILON) {
                applied.push(write);
            }
        }
        applied
    }

    /// Fire due idle timers and start settle eases.
    ///
    /// Returns true when an ease started and frames are needed.
    pub fn on_idle<P: ScrollPane>(&mut self, stops: &StopSet, panes: &Panes<P>, now_ms: u64) -> bool {
        let Some(snap) = self.snap.as_mut() else {
            return false;
        };
        let mut started = false;
        for from in snap.state.take_idle(now_ms) {
            let to = from.opposite();
            if self.lock.is_held_by(to, now_ms) {
                trace!(?from, "snap skipped, lock held by other pane");
                continue;
            }
            let Some(target) = mapped_target(from, stops, panes) else {
                continue;
            };
            let Some(dest) = panes.get(to) else {
                continue;
            };
            self.lock.acquire(from, now_ms, snap.lock_ms);
            snap.state.cancel_ease();

            let current = dest.scroll_top();
            let target = target.clamp(0.0, dest.max_scroll());
            if (target - current).abs() <= WRITE_EPSILON {
                continue;
            }
            debug!(?to, current, target, "settling pane");
            snap.state
                .start(Ease::new(to, current, target, now_ms, snap.duration_ms));
            started = true;
        }
        started
    }

    /// Advance the settle ease by one frame.
    ///
    /// Every step is written so the ease lands exactly on its target.
    pub fn step_ease<P: ScrollPane>(&mut self, panes: &mut Panes<P>, now_ms: u64) -> Option<ScrollWrite> {
        let (pane, top) = self.snap.as_mut()?.state.step(now_ms)?;
        write_clamped(panes, pane, top, 0.0)
    }

    pub fn is_easing(&self) -> bool {
        self.snap.as_ref().is_some_and(|s| s.state.is_easing())
    }

    pub fn next_deadline(&self) -> Option<u64> {
        self.snap.as_ref().and_then(|s| s.state.next_deadline())
    }

    /// Drop pending writes, timers and any running ease.
    pub fn cancel_all(&mut self) {
        self.writes.clear();
        self.lock.clear();
        if let Some(snap) = self.snap.as_mut() {
            snap.state.cancel_all();
        }
    }
}

/// Target offset in the pane opposite `from`, or `None` if either pane
/// is missing.
fn mapped_target<P: ScrollPane>(from: Pane, stops: &StopSet, panes: &Panes<P>) -> Option<f64> {
    let src = panes.get(from)?;
    let dst = panes.get(from.opposite())?;
    let (from_stops, to_stops) = stops.directed(from);
    Some(map(
        src.scroll_top(),
        from_stops,
        to_stops,
        src.max_scroll(),
        dst.max_scroll(),
    ))
}

fn write_clamped<P: ScrollPane>(
    panes: &mut Panes<P>,
    pane: Pane,
    target: f64,
    epsilon: f64,
) -> Option<ScrollWrite> {
    let dest = panes.get_mut(pane)?;
    let top = target.clamp(0.0, dest.max_scroll());
    if (top - dest.scroll_top()).abs() <= epsilon {
        return None;
    }
    dest.set_scroll_top(top);
    Some(ScrollWrite { pane, top })
}
