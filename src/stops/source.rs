use tracing::trace;

use super::normalize_stops;
use crate::document::SourceText;

/// Anchors for the source pane.
///
/// Heading lines are used when there are at least two of them;
/// otherwise block starts. Each anchor line is converted to pixels with
/// the pane's line height.
pub fn source_stops(text: &SourceText, line_height: f64, max_scroll: f64) -> Vec<f64> {
    let headings = text.heading_lines();
    let lines = if headings.len() >= 2 {
        headings
    } else {
        text.block_start_lines()
    };
    trace!(anchors = lines.len(), "source anchors");
    normalize_stops(lines.into_iter().map(|l| l as f64 * line_height), max_scroll)
}
