//! File watching for the harness's live source feed.
//!
//! Each settled change of the watched file becomes a
//! [`crate::app::Message::SourceEdited`] carrying its new contents.
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::time::{Duration, Instant};

use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{trace, warn};

/// Watches one source file and reports its contents once writes settle.
pub struct FileWatcher {
    _watcher: RecommendedWatcher,
    rx: Receiver<notify::Result<Event>>,
    watch_root: PathBuf,
    target_path: PathBuf,
    target_name: Option<OsString>,
    settle: Duration,
    pending_since: Option<Instant>,
}

impl FileWatcher {
    /// Watch `path`, reporting changes once no event arrived for `settle`.
    ///
    /// # Errors
    /// Returns an error if the file watcher cannot be created or the path cannot be watched.
    pub fn new(path: impl AsRef<Path>, settle: Duration) -> notify::Result<Self> {
        // OS event paths are canonical
        let target_path = path
            .as_ref()
            .canonicalize()
            .unwrap_or_else(|_| path.as_ref().to_path_buf());
        let target_name = target_path.file_name().map(std::ffi::OsStr::to_os_string);
        let watch_root = watch_root_for(&target_path);

        let (tx, rx) = mpsc::channel();
        let mut watcher = notify::recommended_watcher(move |res| {
            let _ = tx.send(res);
        })?;
        // Editors often save by rename, so watch the directory
        watcher.watch(&watch_root, RecursiveMode::NonRecursive)?;

        Ok(Self {
            _watcher: watcher,
            rx,
            watch_root,
            target_path,
            target_name,
            settle,
            pending_since: None,
        })
    }

    pub fn target_path(&self) -> &Path {
        &self.target_path
    }

    /// Returns true once a settled change of the file is ready.
    pub fn take_change_ready(&mut self) -> bool {
        let mut relevant = 0u32;
        while let Ok(event) = self.rx.try_recv() {
            match event {
                Ok(ev) if self.is_relevant(&ev) => relevant += 1,
                Ok(ev) => trace!(kind = ?ev.kind, paths = ?ev.paths, "unrelated fs event"),
                Err(err) => warn!(%err, "watch error"),
            }
        }
        if relevant > 0 {
            trace!(relevant, target = %self.target_path.display(), "source file touched");
            self.pending_since = Some(Instant::now());
        }

        let Some(pending_since) = self.pending_since else {
            return false;
        };
        if pending_since.elapsed() >= self.settle {
            self.pending_since = None;
            return true;
        }
        false
    }

    /// The new file contents if a settled change is ready.
    ///
    /// A file that vanished or is unreadable mid-save is skipped with a
    /// warning; the next event retries.
    pub fn take_changed_text(&mut self) -> Option<String> {
        if !self.take_change_ready() {
            return None;
        }
        match std::fs::read_to_string(&self.target_path) {
            Ok(text) => Some(text),
            Err(err) => {
                warn!(%err, path = %self.target_path.display(), "failed to re-read source");
                None
            }
        }
    }

    fn is_relevant(&self, event: &Event) -> bool {
        event.paths.iter().any(|path| {
            path == &self.watch_root
                || path == &self.target_path
                || self
                    .target_name
                    .as_ref()
                    .is_some_and(|name| path.file_name().is_some_and(|f| f == name))
        })
    }
}

fn watch_root_for(path: &Path) -> PathBuf {
    path.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
}
