//! End-to-end runs of the split editor against a host-supplied engine.

use panesync::engine::{Coords, EngineError, EngineEvent, NodeKind, RenderEngine, StructuralNode};
use panesync::prelude::*;

const LINE: f64 = 30.0;

/// Renders every source line as one block of fixed height.
struct LineEngine {
    container: SharedViewport,
    text: String,
    events: Vec<EngineEvent>,
}

impl LineEngine {
    fn new(container: SharedViewport, text: &str) -> Self {
        let mut engine = Self {
            container,
            text: text.to_string(),
            events: vec![EngineEvent::Mounted],
        };
        engine.layout();
        engine
    }

    fn layout(&mut self) {
        let height = self.text.split('\n').count() as f64 * LINE;
        self.container.with_mut(|vp| vp.set_scroll_height(height));
    }

    /// Simulate the user typing directly into the rendered pane.
    fn user_types(&mut self, text: &str) {
        self.text = text.to_string();
        self.layout();
        self.events.push(EngineEvent::DocumentChanged(text.to_string()));
    }
}

impl RenderEngine for LineEngine {
    fn replace_document(&mut self, text: &str) {
        self.text = text.to_string();
        self.layout();
        self.events.push(EngineEvent::DocumentChanged(text.to_string()));
    }

    fn structural_nodes(&self) -> Vec<StructuralNode> {
        let mut offset = 0;
        let mut nodes = Vec::new();
        for line in self.text.split('\n') {
            let kind = if line.starts_with('#') {
                NodeKind::Heading
            } else {
                NodeKind::Block
            };
            nodes.push(StructuralNode { kind, offset });
            offset += line.len() + 1;
        }
        nodes
    }

    fn coordinates_at_offset(&self, offset: usize) -> Result<Coords, EngineError> {
        let len = self.text.len();
        if offset > len {
            return Err(EngineError::OffsetOutOfRange { offset, len });
        }
        let line = self.text[..offset].matches('\n').count();
        Ok(Coords {
            top: self.container.viewport_top() + line as f64 * LINE - self.container.scroll_top(),
        })
    }

    fn take_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }
}

/// Headings on lines 0, 3 and 8 of 16.
const DOC: &str = "# A\nx\nx\n# B\nx\nx\nx\nx\n# C\nx\nx\nx\nx\nx\nx\nx";

struct Setup {
    app: SplitEditor<LineEngine, SharedViewport>,
    source: SharedViewport,
    editor: SharedViewport,
}

fn setup(config: SyncConfig) -> Setup {
    // Source: 16 lines of 20px in a 100px pane, max 220
    let source = SharedViewport::new(PaneViewport::new(100.0, 16.0 * config.line_height));
    // Editor: 16 lines of 30px in a 100px pane below a 48px toolbar, max 380
    let editor = SharedViewport::new(PaneViewport::new(100.0, 0.0).with_viewport_top(48.0));
    let engine = LineEngine::new(editor.clone(), DOC);
    let mut app = SplitEditor::new(config, Panes::new(source.clone(), editor.clone()), DOC);
    app.mount(engine);
    app.tick(0);
    app.frame(0);
    Setup { app, source, editor }
}

fn scroll_source(s: &mut Setup, top: f64, now: u64) -> f64 {
    s.source.clone().set_scroll_top(top);
    s.app.handle(Message::Scrolled(Pane::Source), now);
    s.app.frame(now + 16);
    s.editor.scroll_top()
}

#[test]
fn test_headings_line_up_across_panes() {
    let mut s = setup(SyncConfig::default());
    assert_eq!(s.app.stops().source, vec![0.0, 60.0, 160.0, 220.0]);
    assert_eq!(s.app.stops().editor, vec![0.0, 90.0, 240.0, 380.0]);

    assert!((scroll_source(&mut s, 60.0, 1_000) - 90.0).abs() < 1e-9);
    // Halfway between headings B and C
    assert!((scroll_source(&mut s, 110.0, 1_100) - 165.0).abs() < 1e-9);
    assert!((scroll_source(&mut s, 220.0, 1_200) - 380.0).abs() < 1e-9);
}

#[test]
fn test_mirrored_write_does_not_bounce_back() {
    let mut s = setup(SyncConfig::default());
    scroll_source(&mut s, 60.0, 1_000);

    s.app.handle(Message::Scrolled(Pane::Editor), 1_020);
    let effects = s.app.frame(1_036);
    assert!(effects.is_empty());
    assert!((s.source.scroll_top() - 60.0).abs() < 1e-9);
}

#[test]
fn test_edits_flow_both_ways_without_loops() {
    let config = SyncConfig::default();
    let mut s = setup(config);

    let typed = "# A\nx\n# B\nx";
    s.app.handle(Message::SourceEdited(typed.to_string()), 2_000);
    assert_eq!(s.app.next_deadline(), Some(2_000 + config.debounce_ms));
    assert!(s.app.tick(2_100).is_empty());

    let effects = s.app.tick(2_000 + config.debounce_ms);
    assert_eq!(effects, vec![Effect::DocumentReplaced]);
    assert_eq!(s.app.engine().map(|e| e.text.as_str()), Some(typed));

    let rendered = "# A\nx\n# B\nx\n# C\nx\nx\nx\nx\nx";
    s.app.engine_mut().unwrap().user_types(rendered);
    let effects = s.app.tick(2_400);
    assert_eq!(effects, vec![Effect::SourceReplaced(rendered.to_string())]);
    assert_eq!(s.app.document(), rendered);

    // The adopted text must not travel back to the engine
    assert_eq!(s.app.next_deadline(), None);
    assert!(s.app.frame(2_416).contains(&Effect::StopsRecomputed));
    assert_eq!(s.app.stops().editor.len(), 4);
}
