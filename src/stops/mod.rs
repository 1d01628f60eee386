//! Structural scroll anchors ("stops") for both panes.
//!
//! A stop is a scroll offset at which something structurally meaningful
//! starts: a heading, or failing that, a block. The two sequences are
//! later paired index by index by [`crate::mapping`].

mod rendered;
mod source;

pub use rendered::rendered_stops;
pub use source::source_stops;

use crate::pane::Pane;

/// Anchors closer than this are treated as the same anchor.
pub const DEDUP_EPSILON: f64 = 0.5;

/// Cached anchors of both panes.
///
/// Each side is ascending, starts at 0 and ends at that pane's max
/// scroll offset. Derived data only; recomputed whenever content or
/// layout changes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StopSet {
    pub source: Vec<f64>,
    pub editor: Vec<f64>,
}

impl StopSet {
    pub const fn new(source: Vec<f64>, editor: Vec<f64>) -> Self {
        Self { source, editor }
    }

    /// Stops of `pane`.
    pub fn for_pane(&self, pane: Pane) -> &[f64] {
        match pane {
            Pane::Source => &self.source,
            Pane::Editor => &self.editor,
        }
    }

    /// `(from, to)` stops for a scroll originating in `from`.
    pub fn directed(&self, from: Pane) -> (&[f64], &[f64]) {
        (self.for_pane(from), self.for_pane(from.opposite()))
    }

    /// True until the first extraction pass has run.
    pub fn is_empty(&self) -> bool {
        self.source.is_empty() && self.editor.is_empty()
    }
}

/// Clamp anchors into `[0, max]`, bracket them with 0 and `max`, sort,
/// and drop anchors within [`DEDUP_EPSILON`] of the previous one.
///
/// The result always ends exactly at `max`.
pub fn normalize_stops(anchors: impl IntoIterator<Item = f64>, max: f64) -> Vec<f64> {
    let max = if max.is_finite() { max.max(0.0) } else { 0.0 };
    let mut all: Vec<f64> = anchors
        .into_iter()
        .filter(|a| a.is_finite())
        .map(|a| a.clamp(0.0, max))
        .collect();
    all.push(0.0);
    all.push(max);
    all.sort_by(f64::total_cmp);

    let mut out: Vec<f64> = Vec::with_capacity(all.len());
    for stop in all {
        match out.last() {
            Some(&last) if stop - last <= DEDUP_EPSILON => {}
            _ => out.push(stop),
        }
    }
    if out.len() == 1 {
        if out[0] < max {
            out.push(max);
        }
    } else if let Some(last) = out.last_mut() {
        *last = max;
    }
    out
}
