use crate::pane::Pane;

/// Advisory, self-expiring lock naming the pane whose scroll is being
/// mirrored.
///
/// While one pane holds it, scroll events from the other pane are
/// echoes of our own writes and are ignored. The lock is never
/// released explicitly; it simply expires.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncLock {
    holder: Option<Pane>,
    expires_at_ms: u64,
}

impl SyncLock {
    pub const fn new() -> Self {
        Self {
            holder: None,
            expires_at_ms: 0,
        }
    }

    /// Give the lock to `pane` until `now_ms + window_ms`.
    pub const fn acquire(&mut self, pane: Pane, now_ms: u64, window_ms: u64) {
        self.holder = Some(pane);
        self.expires_at_ms = now_ms.saturating_add(window_ms);
    }

    /// The pane holding an unexpired lock at `now_ms`, if any.
    pub const fn holder(&self, now_ms: u64) -> Option<Pane> {
        if now_ms > self.expires_at_ms {
            None
        } else {
            self.holder
        }
    }

    pub fn is_held_by(&self, pane: Pane, now_ms: u64) -> bool {
        self.holder(now_ms) == Some(pane)
    }

    pub const fn clear(&mut self) {
        self.holder = None;
        self.expires_at_ms = 0;
    }
}
