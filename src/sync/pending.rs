use crate::pane::Pane;

/// One pending scroll target per pane; a newer target overwrites the
/// older one.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PendingWrites {
    targets: [Option<f64>; 2],
}

impl PendingWrites {
    pub const fn new() -> Self {
        Self {
            targets: [None, None],
        }
    }

    pub const fn set(&mut self, pane: Pane, target: f64) {
        self.targets[pane.index()] = Some(target);
    }

    pub const fn get(&self, pane: Pane) -> Option<f64> {
        self.targets[pane.index()]
    }

    pub const fn is_empty(&self) -> bool {
        self.targets[0].is_none() && self.targets[1].is_none()
    }

    /// Remove and return every pending target.
    pub fn drain(&mut self) -> Vec<(Pane, f64)> {
        let taken = std::mem::take(&mut self.targets);
        [Pane::Source, Pane::Editor]
            .into_iter()
            .filter_map(|pane| taken[pane.index()].map(|t| (pane, t)))
            .collect()
    }

    pub const fn clear(&mut self) {
        self.targets = [None, None];
    }
}
