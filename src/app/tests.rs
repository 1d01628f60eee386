use super::{Effect, Message, SplitEditor};
use crate::config::SyncConfig;
use crate::engine::{EngineLayout, MarkdownEngine};
use crate::mapping::map;
use crate::pane::{Pane, PaneViewport, Panes, ScrollPane, SharedViewport};
use crate::sync::ScrollWrite;

type TestEditor = SplitEditor<MarkdownEngine, SharedViewport>;

fn sections(n: usize) -> String {
    let mut md = String::new();
    for i in 1..=n {
        md.push_str(&format!("## Section {i}\n\nfirst line\nsecond line\n\n"));
    }
    md
}

fn source_height(text: &str, line_height: f64) -> f64 {
    (text.split('\n').count()) as f64 * line_height
}

struct Harness {
    app: TestEditor,
    source: SharedViewport,
    editor: SharedViewport,
}

fn mounted(config: SyncConfig, text: &str) -> Harness {
    let source = SharedViewport::new(PaneViewport::new(
        200.0,
        source_height(text, config.line_height),
    ));
    let editor = SharedViewport::new(PaneViewport::new(200.0, 0.0));
    let engine = MarkdownEngine::create(editor.clone(), EngineLayout::default(), text);
    let mut app = SplitEditor::new(config, Panes::new(source.clone(), editor.clone()), text);
    app.mount(engine);
    app.tick(0);
    app.frame(0);
    Harness { app, source, editor }
}

fn writes(effects: &[Effect]) -> Vec<ScrollWrite> {
    effects
        .iter()
        .filter_map(|e| match e {
            Effect::ScrollWritten(w) => Some(*w),
            _ => None,
        })
        .collect()
}

fn count(effects: &[Effect], wanted: &Effect) -> usize {
    effects.iter().filter(|e| *e == wanted).count()
}

#[test]
fn test_mount_computes_stops_for_both_panes() {
    let h = mounted(SyncConfig::default(), &sections(10));
    let stops = h.app.stops();
    assert!(stops.source.len() >= 3);
    assert!(stops.editor.len() >= 3);
    assert_eq!(stops.source.first().copied(), Some(0.0));
    assert_eq!(stops.source.last().copied(), Some(h.source.max_scroll()));
    assert_eq!(stops.editor.last().copied(), Some(h.editor.max_scroll()));
}

#[test]
fn test_source_scroll_writes_mapped_editor_offset_on_frame() {
    let mut h = mounted(SyncConfig::default(), &sections(10));
    h.source.clone().set_scroll_top(400.0);
    let effects = h.app.handle(Message::Scrolled(Pane::Source), 1_000);
    assert!(effects.is_empty());
    assert!(h.app.wants_frame());

    let stops = h.app.stops().clone();
    let expected = map(
        400.0,
        &stops.source,
        &stops.editor,
        h.source.max_scroll(),
        h.editor.max_scroll(),
    );
    let applied = writes(&h.app.frame(1_016));
    assert_eq!(applied.len(), 1);
    assert_eq!(applied[0].pane, Pane::Editor);
    assert!((applied[0].top - expected).abs() < 1e-9);
    assert!((h.editor.scroll_top() - expected).abs() < 1e-9);
}

#[test]
fn test_echo_scroll_produces_no_write_back() {
    let mut h = mounted(SyncConfig::default(), &sections(10));
    h.source.clone().set_scroll_top(400.0);
    h.app.handle(Message::Scrolled(Pane::Source), 1_000);
    assert_eq!(writes(&h.app.frame(1_016)).len(), 1);

    // The host reports the scroll our write caused
    h.app.handle(Message::Scrolled(Pane::Editor), 1_020);
    assert!(writes(&h.app.frame(1_032)).is_empty());
    assert!((h.source.scroll_top() - 400.0).abs() < 1e-9);
}

#[test]
fn test_editor_scroll_syncs_back_after_lock_expires() {
    let config = SyncConfig::default();
    let mut h = mounted(config, &sections(10));
    h.source.clone().set_scroll_top(400.0);
    h.app.handle(Message::Scrolled(Pane::Source), 1_000);
    h.app.frame(1_016);

    h.editor.clone().set_scroll_top(h.editor.max_scroll());
    h.app.handle(Message::Scrolled(Pane::Editor), 1_000 + config.lock_ms + 1);
    let applied = writes(&h.app.frame(1_300));
    assert_eq!(applied.len(), 1);
    assert_eq!(applied[0].pane, Pane::Source);
    assert!((h.source.scroll_top() - h.source.max_scroll()).abs() < 1e-9);
}

#[test]
fn test_scrolls_within_one_frame_apply_last_target_only() {
    let mut h = mounted(SyncConfig::default(), &sections(10));
    let mut source = h.source.clone();
    for (i, top) in [100.0, 250.0, 600.0].into_iter().enumerate() {
        source.set_scroll_top(top);
        h.app.handle(Message::Scrolled(Pane::Source), 1_000 + i as u64);
    }
    let stops = h.app.stops().clone();
    let expected = map(
        600.0,
        &stops.source,
        &stops.editor,
        h.source.max_scroll(),
        h.editor.max_scroll(),
    );
    let applied = writes(&h.app.frame(1_016));
    assert_eq!(applied.len(), 1);
    assert!((applied[0].top - expected).abs() < 1e-9);
}

#[test]
fn test_three_quick_edits_replace_document_once() {
    let config = SyncConfig::default();
    let mut h = mounted(config, "");
    let mut effects = Vec::new();
    effects.extend(h.app.handle(Message::SourceEdited("# a".to_string()), 1_000));
    effects.extend(h.app.tick(1_030));
    effects.extend(h.app.handle(Message::SourceEdited("# ab".to_string()), 1_040));
    effects.extend(h.app.tick(1_080));
    effects.extend(h.app.handle(Message::SourceEdited("# abc".to_string()), 1_090));
    for now in [1_100, 1_250, 1_339] {
        effects.extend(h.app.tick(now));
    }
    assert_eq!(count(&effects, &Effect::DocumentReplaced), 0);

    effects.extend(h.app.tick(1_090 + config.debounce_ms));
    effects.extend(h.app.tick(2_000));
    assert_eq!(count(&effects, &Effect::DocumentReplaced), 1);
    assert_eq!(h.app.engine().unwrap().text(), "# abc\n");
}

#[test]
fn test_replacement_echo_is_not_adopted() {
    let mut h = mounted(SyncConfig::default(), "");
    h.app.handle(Message::SourceEdited("# typed".to_string()), 0);
    let effects = h.app.tick(250);
    assert_eq!(effects, vec![Effect::DocumentReplaced]);
    // The engine normalized the text, but the user's text stands
    assert_eq!(h.app.document(), "# typed");
    assert!(h.app.tick(300).is_empty());
}

#[test]
fn test_render_edit_is_adopted_without_debounce() {
    let mut h = mounted(SyncConfig::default(), "# start\n");
    h.app.engine_mut().unwrap().edit("# start\n\n- item\n");
    let effects = h.app.tick(10);
    assert_eq!(effects, vec![Effect::SourceReplaced("# start\n\n- item\n".to_string())]);
    assert_eq!(h.app.document(), "# start\n\n- item\n");
    assert_eq!(h.app.next_deadline(), None);
}

#[test]
fn test_render_edit_invalidates_stops() {
    let mut h = mounted(SyncConfig::default(), "# start\n");
    h.app.engine_mut().unwrap().edit(&sections(10));
    h.app.tick(10);
    assert!(h.app.wants_frame());
    let effects = h.app.frame(16);
    assert!(effects.contains(&Effect::StopsRecomputed));
}

#[test]
fn test_missing_engine_is_silent() {
    let config = SyncConfig::default();
    let source = SharedViewport::new(PaneViewport::new(100.0, 1_000.0));
    let editor = SharedViewport::new(PaneViewport::new(100.0, 2_000.0));
    let mut app: TestEditor =
        SplitEditor::new(config, Panes::new(source.clone(), editor.clone()), "");

    app.handle(Message::SourceEdited("# lost".to_string()), 0);
    assert!(app.tick(config.debounce_ms).is_empty());

    // Scroll still syncs by ratio: source max 900, editor max 1900
    source.clone().set_scroll_top(450.0);
    app.handle(Message::Scrolled(Pane::Source), 1_000);
    let applied = writes(&app.frame(1_016));
    assert_eq!(applied.len(), 1);
    assert!((editor.scroll_top() - 950.0).abs() < 1e-9);
}

#[test]
fn test_detached_panes_are_silent() {
    let mut app: SplitEditor<MarkdownEngine, PaneViewport> =
        SplitEditor::new(SyncConfig::default(), Panes::detached(), "# x\n");
    assert!(app.handle(Message::Scrolled(Pane::Source), 0).len() <= 1);
    app.frame(16);
    assert!(app.scroll_sync().lock().holder(16).is_none());
}

#[test]
fn test_unmount_cancels_everything() {
    let mut h = mounted(SyncConfig { smooth_snap: true, ..SyncConfig::default() }, &sections(5));
    h.app.handle(Message::SourceEdited("# pending".to_string()), 0);
    h.source.clone().set_scroll_top(100.0);
    h.app.handle(Message::Scrolled(Pane::Source), 0);
    assert!(h.app.wants_frame());
    assert!(h.app.next_deadline().is_some());

    let engine = h.app.unmount();
    assert!(engine.is_some());
    assert!(!h.app.wants_frame());
    assert_eq!(h.app.next_deadline(), None);
    assert!(h.app.tick(10_000).is_empty());
    assert!(h.app.frame(10_000).is_empty());
}

#[test]
fn test_resize_requests_stop_recompute() {
    let mut h = mounted(SyncConfig::default(), &sections(10));
    assert!(!h.app.wants_frame());
    h.editor.with_mut(|vp| vp.resize(500.0));
    h.app.handle(Message::PaneResized(Pane::Editor), 100);
    let effects = h.app.frame(116);
    assert_eq!(effects, vec![Effect::StopsRecomputed]);
    assert_eq!(h.app.stops().editor.last().copied(), Some(h.editor.max_scroll()));
}

#[test]
fn test_smooth_snap_settles_editor_on_target() {
    let config = SyncConfig {
        smooth_snap: true,
        ..SyncConfig::default()
    };
    let mut h = mounted(config, &sections(10));
    h.source.clone().set_scroll_top(500.0);
    h.app.handle(Message::Scrolled(Pane::Source), 1_000);
    let applied = writes(&h.app.frame(1_016));
    let target = applied[0].top;

    // Host-side drift the coalesced write did not correct
    h.editor.clone().set_scroll_top(target - 80.0);

    let idle_at = 1_000 + config.snap_idle_ms;
    h.app.tick(idle_at);
    assert!(h.app.scroll_sync().is_easing());
    assert_eq!(
        h.app.scroll_sync().lock().holder(idle_at + config.snap_lock_ms),
        Some(Pane::Source)
    );

    let mut now = idle_at;
    let mut last = None;
    while h.app.wants_frame() && now < idle_at + 1_000 {
        now += 16;
        if let Some(w) = writes(&h.app.frame(now)).last() {
            last = Some(*w);
        }
    }
    let last = last.unwrap();
    assert_eq!(last.pane, Pane::Editor);
    assert!((h.editor.scroll_top() - target).abs() < 1e-6);
}

#[test]
fn test_smooth_snap_off_leaves_drift() {
    let config = SyncConfig::default();
    let mut h = mounted(config, &sections(10));
    h.source.clone().set_scroll_top(500.0);
    h.app.handle(Message::Scrolled(Pane::Source), 1_000);
    let target = writes(&h.app.frame(1_016))[0].top;
    h.editor.clone().set_scroll_top(target - 80.0);

    h.app.tick(1_500);
    assert!(!h.app.wants_frame());
    assert!((h.editor.scroll_top() - (target - 80.0)).abs() < 1e-9);
}

#[test]
fn test_render_edit_during_pending_debounce_wins() {
    let config = SyncConfig::default();
    let mut h = mounted(config, "# start\n");
    h.app.handle(Message::SourceEdited("# start typed\n".to_string()), 0);
    h.app.engine_mut().unwrap().edit("# start\n\n- item\n");

    let effects = h.app.tick(10);
    assert_eq!(effects, vec![Effect::SourceReplaced("# start\n\n- item\n".to_string())]);
    assert_eq!(h.app.next_deadline(), None);

    assert!(h.app.tick(config.debounce_ms).is_empty());
    assert_eq!(h.app.document(), "# start\n\n- item\n");
    assert_eq!(h.app.engine().unwrap().text(), h.app.document());
}

#[test]
fn test_scroll_during_settle_ease_wins_over_ease() {
    let config = SyncConfig {
        smooth_snap: true,
        ..SyncConfig::default()
    };
    let mut h = mounted(config, &sections(10));
    h.source.clone().set_scroll_top(500.0);
    h.app.handle(Message::Scrolled(Pane::Source), 1_000);
    let target = writes(&h.app.frame(1_016))[0].top;
    h.editor.clone().set_scroll_top(target - 80.0);

    let idle_at = 1_000 + config.snap_idle_ms;
    h.app.tick(idle_at);
    h.app.frame(idle_at + 16);
    assert!(h.app.scroll_sync().is_easing());

    h.source.clone().set_scroll_top(0.0);
    h.app.handle(Message::Scrolled(Pane::Source), idle_at + 20);
    let applied = writes(&h.app.frame(idle_at + 32));
    assert_eq!(applied, vec![ScrollWrite { pane: Pane::Editor, top: 0.0 }]);
    assert!(!h.app.scroll_sync().is_easing());
    assert_eq!(h.editor.scroll_top(), 0.0);
}

#[test]
fn test_engine_notification_is_adopted_without_timers() {
    let mut h = mounted(SyncConfig::default(), "# start\n");
    h.app.engine_mut().unwrap().edit("# start\n\n- item\n");
    assert_eq!(h.app.next_deadline(), None);

    let effects = h.app.engine_notified();
    assert_eq!(effects, vec![Effect::SourceReplaced("# start\n\n- item\n".to_string())]);
    assert_eq!(h.app.document(), "# start\n\n- item\n");
    assert!(h.app.wants_frame());
}

#[test]
fn test_frame_drains_queued_engine_notifications() {
    let mut h = mounted(SyncConfig::default(), "# start\n");
    h.app.engine_mut().unwrap().edit("# start\n\nmore\n");
    let effects = h.app.frame(16);
    assert!(effects.contains(&Effect::SourceReplaced("# start\n\nmore\n".to_string())));
    assert!(effects.contains(&Effect::StopsRecomputed));
}
