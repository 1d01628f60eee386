//! Reference rendering engine over comrak block structure.
//!
//! Lays out each top-level markdown block at a deterministic pixel
//! height so the sync core can be driven end to end without a real
//! renderer.

use comrak::nodes::{AstNode, NodeValue};
use comrak::{Arena, Options, parse_document};
use ropey::Rope;

use super::{Coords, EngineError, EngineEvent, NodeKind, RenderEngine, StructuralNode};
use crate::pane::{ScrollPane, SharedViewport};

/// Pixel metrics used to lay out blocks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineLayout {
    /// Height of one rendered text line.
    pub line_height: f64,
    /// Multiplier applied to heading lines.
    pub heading_scale: f64,
    /// Vertical gap between consecutive blocks.
    pub block_gap: f64,
    /// Space above the first block and below the last one.
    pub padding: f64,
}

impl Default for EngineLayout {
    fn default() -> Self {
        Self {
            line_height: 24.0,
            heading_scale: 1.5,
            block_gap: 16.0,
            padding: 12.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct LaidOutBlock {
    kind: NodeKind,
    /// Char offset of the block's first line
    offset: usize,
    /// Zero-based source line where the block starts
    first_line: usize,
    /// Number of source lines the block spans
    line_span: usize,
    /// Top relative to the content origin
    top: f64,
    /// Height of one line inside this block
    line_height: f64,
}

/// A markdown engine rendering into a shared scroll container.
#[derive(Debug)]
pub struct MarkdownEngine {
    text: Rope,
    layout: EngineLayout,
    container: SharedViewport,
    blocks: Vec<LaidOutBlock>,
    events: Vec<EngineEvent>,
}

impl MarkdownEngine {
    /// Create an engine rendering `initial_text` into `container`.
    ///
    /// Queues [`EngineEvent::Mounted`].
    pub fn create(container: SharedViewport, layout: EngineLayout, initial_text: &str) -> Self {
        let mut engine = Self {
            text: Rope::from_str(&normalize(initial_text)),
            layout,
            container,
            blocks: Vec::new(),
            events: Vec::new(),
        };
        engine.relayout();
        engine.events.push(EngineEvent::Mounted);
        engine
    }

    /// The engine's current document text.
    pub fn text(&self) -> String {
        self.text.to_string()
    }

    /// Height of the laid-out content.
    pub fn content_height(&self) -> f64 {
        self.blocks.last().map_or(0.0, |last| {
            last.top + last.line_span as f64 * last.line_height + self.layout.padding
        })
    }

    /// Apply an edit made through the engine's own UI.
    ///
    /// Queues the same notifications as a replacement, which the sync
    /// core must treat as render-originated.
    pub fn edit(&mut self, text: &str) {
        self.replace_document(text);
    }

    /// Change pixel metrics and reflow.
    pub fn set_layout(&mut self, layout: EngineLayout) {
        self.layout = layout;
        self.relayout();
        self.events.push(EngineEvent::LayoutUpdated);
    }

    fn relayout(&mut self) {
        let source = self.text.to_string();
        let arena = Arena::new();
        let options = Options::default();
        let root = parse_document(&arena, &source, &options);

        let mut blocks = Vec::new();
        let mut y = self.layout.padding;
        for node in root.children() {
            let Some((kind, first_line, line_span)) = block_extent(node) else {
                continue;
            };
            if first_line >= self.text.len_lines() {
                continue;
            }
            let line_height = match kind {
                NodeKind::Heading => self.layout.line_height * self.layout.heading_scale,
                NodeKind::Block => self.layout.line_height,
            };
            blocks.push(LaidOutBlock {
                kind,
                offset: self.text.line_to_char(first_line),
                first_line,
                line_span,
                top: y,
                line_height,
            });
            y += line_span as f64 * line_height + self.layout.block_gap;
        }
        self.blocks = blocks;

        let height = self.content_height();
        self.container.with_mut(|vp| vp.set_scroll_height(height));
    }

    fn block_for_offset(&self, offset: usize) -> Option<&LaidOutBlock> {
        let idx = self.blocks.partition_point(|b| b.offset <= offset);
        idx.checked_sub(1).and_then(|i| self.blocks.get(i))
    }
}

impl RenderEngine for MarkdownEngine {
    fn replace_document(&mut self, text: &str) {
        let text = normalize(text);
        self.text = Rope::from_str(&text);
        self.relayout();
        self.events.push(EngineEvent::DocumentChanged(text));
        self.events.push(EngineEvent::LayoutUpdated);
    }

    fn structural_nodes(&self) -> Vec<StructuralNode> {
        self.blocks
            .iter()
            .map(|b| StructuralNode {
                kind: b.kind,
                offset: b.offset,
            })
            .collect()
    }

    fn coordinates_at_offset(&self, offset: usize) -> Result<Coords, EngineError> {
        let len = self.text.len_chars();
        if offset > len {
            return Err(EngineError::OffsetOutOfRange { offset, len });
        }
        let block = self
            .block_for_offset(offset)
            .ok_or(EngineError::NotLaidOut(offset))?;
        let line = self.text.char_to_line(offset);
        let within = line
            .saturating_sub(block.first_line)
            .min(block.line_span.saturating_sub(1));
        let content_top = block.top + within as f64 * block.line_height;

        Ok(Coords {
            top: self.container.viewport_top() + content_top - self.container.scroll_top(),
        })
    }

    fn take_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }
}

/// Kind, first zero-based line and line span of a top-level node.
fn block_extent<'a>(node: &'a AstNode<'a>) -> Option<(NodeKind, usize, usize)> {
    let data = node.data.borrow();
    let kind = match data.value {
        NodeValue::Heading(_) => NodeKind::Heading,
        NodeValue::FrontMatter(_) => return None,
        _ => NodeKind::Block,
    };
    let start = data.sourcepos.start.line;
    let end = data.sourcepos.end.line.max(start);
    if start == 0 {
        return None;
    }
    Some((kind, start - 1, end - start + 1))
}

/// Serialized form the engine reports back: exactly one trailing newline.
fn normalize(text: &str) -> String {
    let trimmed = text.trim_end_matches('\n');
    if trimmed.is_empty() {
        return String::new();
    }
    format!("{trimmed}\n")
}
