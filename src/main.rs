//! Panesync harness: drive the split editor headlessly over a file.
//!
//! # Usage
//!
//! ```bash
//! panesync README.md
//! panesync --steps 20 --editor-height 400 README.md
//! panesync --watch --smooth-snap README.md
//! ```

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;

use panesync::app::{Effect, Message, SplitEditor};
use panesync::config::{
    ConfigFlags, SyncConfig, clear_config_flags, global_config_path, load_config_flags,
    local_override_path, parse_flag_tokens, save_config_flags,
};
use panesync::engine::{EngineLayout, MarkdownEngine};
use panesync::pane::{Pane, PaneViewport, Panes, ScrollPane, SharedViewport};
use panesync::watcher::FileWatcher;

type Editor = SplitEditor<MarkdownEngine, SharedViewport>;

const FRAME: Duration = Duration::from_millis(16);

/// Drive a two-pane scroll-synced editor over a markdown file
#[derive(Parser, Debug)]
#[command(name = "panesync", version, about, long_about = None)]
struct Cli {
    /// Markdown file to load into both panes
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Ease the passive pane onto its exact target once scrolling settles
    #[arg(long)]
    smooth_snap: bool,

    /// Delay before source edits reach the rendered pane
    #[arg(long, value_name = "MS")]
    debounce_ms: Option<u64>,

    /// Echo-suppression window after a mirrored scroll
    #[arg(long, value_name = "MS")]
    lock_ms: Option<u64>,

    /// Idle time before the settle ease starts
    #[arg(long, value_name = "MS")]
    snap_idle_ms: Option<u64>,

    /// Duration of the settle ease
    #[arg(long, value_name = "MS")]
    snap_duration_ms: Option<u64>,

    /// Source pane line height
    #[arg(long, value_name = "PX")]
    line_height: Option<f64>,

    /// Visible height of the source pane
    #[arg(long, value_name = "PX", default_value_t = 600.0)]
    source_height: f64,

    /// Visible height of the rendered pane
    #[arg(long, value_name = "PX", default_value_t = 600.0)]
    editor_height: f64,

    /// Rows in the printed mapping table
    #[arg(long, value_name = "N", default_value_t = 10)]
    steps: u32,

    /// Watch the file and feed every save in as a source edit
    #[arg(short, long)]
    watch: bool,

    /// Save current command-line flags as defaults in the global config
    #[arg(long)]
    save: bool,

    /// Clear saved defaults in the global config
    #[arg(long)]
    clear: bool,
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let raw_args = std::env::args().collect::<Vec<_>>();
    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = parse_flag_tokens(&raw_args);

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);
    let config = effective.to_sync_config();

    if !cli.file.exists() {
        anyhow::bail!("File not found: {}", cli.file.display());
    }
    let text = std::fs::read_to_string(&cli.file)
        .with_context(|| format!("failed to read {}", cli.file.display()))?;

    let source = SharedViewport::new(PaneViewport::new(
        cli.source_height,
        source_content_height(&text, &config),
    ));
    let editor = SharedViewport::new(PaneViewport::new(cli.editor_height, 0.0));
    let engine = MarkdownEngine::create(editor.clone(), EngineLayout::default(), &text);
    let mut app: Editor =
        SplitEditor::new(config, Panes::new(source.clone(), editor.clone()), &text);
    app.mount(engine);
    app.tick(0);
    app.frame(0);

    print_stops(&app);
    print_mapping_table(&mut app, &source, &editor, cli.steps);

    if effective.watch {
        watch(&cli.file, &mut app, &source, &config)?;
    }
    Ok(())
}

fn source_content_height(text: &str, config: &SyncConfig) -> f64 {
    text.split('\n').count() as f64 * config.line_height
}

fn print_stops(app: &Editor) {
    let stops = app.stops();
    println!("source stops ({}):", stops.source.len());
    for top in &stops.source {
        println!("  {top:>10.1}");
    }
    println!("editor stops ({}):", stops.editor.len());
    for top in &stops.editor {
        println!("  {top:>10.1}");
    }
}

/// Scroll the source pane through its range and print where the
/// rendered pane lands.
fn print_mapping_table(
    app: &mut Editor,
    source: &SharedViewport,
    editor: &SharedViewport,
    steps: u32,
) {
    let steps = steps.max(1);
    let max = source.max_scroll();
    let frame_ms = frame_millis();
    let mut source = source.clone();

    println!("{:>10} {:>10}", "source", "editor");
    for i in 0..=steps {
        let now = u64::from(i + 1) * frame_ms * 2;
        source.set_scroll_top(max * f64::from(i) / f64::from(steps));
        app.handle(Message::Scrolled(Pane::Source), now);
        app.frame(now + frame_ms);
        println!("{:>10.1} {:>10.1}", source.scroll_top(), editor.scroll_top());
    }
}

fn watch(
    path: &std::path::Path,
    app: &mut Editor,
    source: &SharedViewport,
    config: &SyncConfig,
) -> Result<()> {
    let mut watcher =
        FileWatcher::new(path, Duration::from_millis(200)).context("failed to watch file")?;
    println!("watching {}", watcher.target_path().display());

    let start = Instant::now();
    loop {
        let now = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
        let mut effects = Vec::new();

        if let Some(text) = watcher.take_changed_text() {
            source.with_mut(|vp| vp.set_scroll_height(source_content_height(&text, config)));
            effects.extend(app.handle(Message::PaneResized(Pane::Source), now));
            effects.extend(app.handle(Message::SourceEdited(text), now));
        }
        effects.extend(app.engine_notified());
        if app.next_deadline().is_some_and(|deadline| deadline <= now) {
            effects.extend(app.tick(now));
        }
        if app.wants_frame() {
            effects.extend(app.frame(now));
        }

        for effect in &effects {
            report(app, effect);
        }
        std::thread::sleep(FRAME);
    }
}

fn report(app: &Editor, effect: &Effect) {
    match effect {
        Effect::ScrollWritten(write) => println!("scroll {:?} -> {:.1}", write.pane, write.top),
        Effect::DocumentReplaced => println!("rendered pane replaced"),
        Effect::SourceReplaced(text) => println!("source replaced ({} bytes)", text.len()),
        Effect::StopsRecomputed => {
            let stops = app.stops();
            println!(
                "stops recomputed: {} source, {} editor",
                stops.source.len(),
                stops.editor.len()
            );
        }
    }
}

fn frame_millis() -> u64 {
    u64::try_from(FRAME.as_millis()).unwrap_or(16)
}
