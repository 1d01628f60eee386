use tracing::{debug, trace};

use super::normalize_stops;
use crate::engine::{NodeKind, RenderEngine, StructuralNode};
use crate::pane::ScrollPane;

/// Anchors for the rendered pane.
///
/// Heading nodes are used when there are at least two of them;
/// otherwise every top-level block. The engine reports window-relative
/// tops, which are shifted into the pane's scroll space. A node whose
/// position cannot be resolved is skipped.
pub fn rendered_stops<E, P>(engine: &E, pane: &P) -> Vec<f64>
where
    E: RenderEngine + ?Sized,
    P: ScrollPane + ?Sized,
{
    let nodes = engine.structural_nodes();
    let headings: Vec<&StructuralNode> = nodes
        .iter()
        .filter(|n| n.kind == NodeKind::Heading)
        .collect();
    let anchors: Vec<&StructuralNode> = if headings.len() >= 2 {
        headings
    } else {
        nodes.iter().collect()
    };

    let origin = pane.viewport_top();
    let scroll = pane.scroll_top();
    let mut tops = Vec::with_capacity(anchors.len());
    for node in anchors {
        match engine.coordinates_at_offset(node.offset) {
            Ok(coords) => tops.push(coords.top - origin + scroll),
            Err(err) => debug!(offset = node.offset, %err, "skipping anchor"),
        }
    }
    trace!(anchors = tops.len(), "rendered anchors");
    normalize_stops(tops, pane.max_scroll())
}
