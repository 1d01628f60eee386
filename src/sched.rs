//! Cancellable scheduling slots.
//!
//! Everything runs on one cooperative thread. A slot holds at most one
//! pending continuation; scheduling again replaces it, and the host
//! polls slots with the current time in milliseconds.

/// A one-shot timer that restarts on every `schedule`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimerSlot {
    deadline: Option<u64>,
}

impl TimerSlot {
    pub const fn new() -> Self {
        Self { deadline: None }
    }

    /// Cancel any pending fire and arm the timer for `now_ms + delay_ms`.
    pub const fn schedule(&mut self, now_ms: u64, delay_ms: u64) {
        self.deadline = Some(now_ms.saturating_add(delay_ms));
    }

    pub const fn cancel(&mut self) {
        self.deadline = None;
    }

    pub const fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub const fn deadline(&self) -> Option<u64> {
        self.deadline
    }

    /// Returns true once, when the deadline has passed, and disarms.
    pub const fn take_due(&mut self, now_ms: u64) -> bool {
        match self.deadline {
            Some(deadline) if now_ms >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

/// A request for the next animation frame.
///
/// Requesting twice before the frame runs still yields one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameSlot {
    requested: bool,
}

impl FrameSlot {
    pub const fn new() -> Self {
        Self { requested: false }
    }

    pub const fn request(&mut self) {
        self.requested = true;
    }

    pub const fn cancel(&mut self) {
        self.requested = false;
    }

    pub const fn is_requested(&self) -> bool {
        self.requested
    }

    /// Consume the request; true if a frame was pending.
    pub const fn take(&mut self) -> bool {
        let requested = self.requested;
        self.requested = false;
        requested
    }
}
