//! Settle animation after scrolling stops.
//!
//! Frame-coalesced sync can leave the passive pane a little off its
//! mapped target. Once a pane has been idle for a short while, the
//! passive pane is eased to the exact target.

use crate::pane::Pane;
use crate::sched::TimerSlot;

/// Cubic ease-out: fast start, gentle landing. `t` is clamped to `[0, 1]`.
pub fn ease_out_cubic(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

/// A running ease of one pane's scroll offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ease {
    pub pane: Pane,
    from: f64,
    to: f64,
    start_ms: u64,
    duration_ms: u64,
}

impl Ease {
    pub const fn new(pane: Pane, from: f64, to: f64, start_ms: u64, duration_ms: u64) -> Self {
        Self {
            pane,
            from,
            to,
            start_ms,
            duration_ms,
        }
    }

    /// Offset at `now_ms` and whether the ease has finished.
    pub fn sample(&self, now_ms: u64) -> (f64, bool) {
        if self.duration_ms == 0 {
            return (self.to, true);
        }
        let elapsed = now_ms.saturating_sub(self.start_ms);
        let t = elapsed as f64 / self.duration_ms as f64;
        let value = self.from + (self.to - self.from) * ease_out_cubic(t);
        (value, elapsed >= self.duration_ms)
    }
}

/// Idle timers (one per pane) and the single running ease.
#[derive(Debug, Clone, Default)]
pub struct SmoothSnap {
    idle: [TimerSlot; 2],
    ease: Option<Ease>,
}

impl SmoothSnap {
    pub const fn new() -> Self {
        Self {
            idle: [TimerSlot::new(), TimerSlot::new()],
            ease: None,
        }
    }

    /// Restart `pane`'s idle timer.
    pub const fn restart_idle(&mut self, pane: Pane, now_ms: u64, idle_ms: u64) {
        self.idle[pane.index()].schedule(now_ms, idle_ms);
    }

    /// Panes whose idle timer has fired, disarming them.
    pub fn take_idle(&mut self, now_ms: u64) -> Vec<Pane> {
        [Pane::Source, Pane::Editor]
            .into_iter()
            .filter(|pane| self.idle[pane.index()].take_due(now_ms))
            .collect()
    }

    /// Cancel any running ease and start `ease`.
    pub const fn start(&mut self, ease: Ease) {
        self.ease = Some(ease);
    }

    pub const fn cancel_ease(&mut self) {
        self.ease = None;
    }

    pub const fn is_easing(&self) -> bool {
        self.ease.is_some()
    }

    /// Advance the running ease; returns the pane and offset to write.
    pub fn step(&mut self, now_ms: u64) -> Option<(Pane, f64)> {
        let ease = self.ease?;
        let (value, done) = ease.sample(now_ms);
        if done {
            self.ease = None;
        }
        Some((ease.pane, value))
    }

    /// Earliest idle deadline.
    pub fn next_deadline(&self) -> Option<u64> {
        self.idle.iter().filter_map(TimerSlot::deadline).min()
    }

    /// Cancel every timer and the running ease.
    pub const fn cancel_all(&mut self) {
        self.idle[0].cancel();
        self.idle[1].cancel();
        self.ease = None;
    }
}
