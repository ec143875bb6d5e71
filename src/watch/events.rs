// src/watch/events.rs

use std::path::{Path, PathBuf};
use std::sync::Arc;

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::errors::Result;
use crate::fs::FileSystem;
use crate::types::{ChangeCallback, PendingChange, PollOutcome};
use crate::watch::FileWatcher;
use crate::watch::matcher::PathMatcher;
use crate::watch::poller::PollWatcher;
use crate::watch::registry::WatchTask;
use crate::watch::walk::{has_wildcards, literal_prefix};

/// Event-driven strategy: a `notify` backend reports OS filesystem events
/// and a fixed handler invokes the server's callback once per relevant
/// notification. The handler never touches the filesystem itself; all
/// diffing stays in the shared poll logic of the inner [`PollWatcher`].
pub struct EventWatcher {
    fs: Arc<dyn FileSystem>,
    poller: PollWatcher,
    backend: Option<RecommendedWatcher>,
    event_rx: Option<mpsc::UnboundedReceiver<Event>>,
    started: bool,
}

impl std::fmt::Debug for EventWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventWatcher")
            .field("poller", &self.poller)
            .field("started", &self.started)
            .finish_non_exhaustive()
    }
}

impl EventWatcher {
    /// Construct the notify backend, probing whether OS notifications are
    /// available at all. When this fails the caller falls back to polling.
    pub fn try_new(fs: Arc<dyn FileSystem>) -> Result<Self> {
        // Channel from the blocking notify callback into the async world.
        let (event_tx, event_rx) = mpsc::unbounded_channel::<Event>();

        // Closure called synchronously by notify whenever an event arrives.
        let backend = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if let Err(err) = event_tx.send(event) {
                        // We can't log via tracing here easily, so fallback to stderr.
                        eprintln!("livewatch: failed to forward notify event: {err}");
                    }
                }
                Err(err) => {
                    eprintln!("livewatch: file watch error: {err}");
                }
            },
            Config::default(),
        )?;

        Ok(Self {
            poller: PollWatcher::new(Arc::clone(&fs)),
            fs,
            backend: Some(backend),
            event_rx: Some(event_rx),
            started: false,
        })
    }

    /// Paths currently tracked for a target, if it is registered.
    pub fn tracked_paths(&self, target: &str) -> Option<Vec<PathBuf>> {
        self.poller.tracked_paths(target)
    }

    /// Tear down the notify backend: dropping it releases the armed OS
    /// watches and closes the channel its event closure feeds.
    fn disarm(&mut self) {
        self.backend = None;
        self.event_rx = None;
    }
}

impl FileWatcher for EventWatcher {
    fn watch(&mut self, task: WatchTask) {
        if let Some(backend) = self.backend.as_mut() {
            let root = watch_root(self.fs.as_ref(), task.target().as_str());
            match backend.watch(&root, RecursiveMode::Recursive) {
                Ok(()) => debug!(task = %task.target(), "armed OS watch on {:?}", root),
                Err(err) => {
                    // Registration still succeeds; polling covers the target.
                    warn!(task = %task.target(), "failed to arm OS watch on {:?}: {err}", root);
                }
            }
        }
        self.poller.watch(task);
    }

    fn examine(&mut self) -> PollOutcome {
        self.poller.examine()
    }

    fn start(&mut self, callback: ChangeCallback) -> bool {
        if self.started {
            return true;
        }

        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            warn!("no async runtime on this thread; regular polling will be used");
            self.disarm();
            return false;
        };
        let Some(mut event_rx) = self.event_rx.take() else {
            return false;
        };

        let async_callback = Arc::clone(&callback);
        handle.spawn(async move {
            while let Some(event) = event_rx.recv().await {
                debug!(?event, "received notify event");
                if is_change_event(&event.kind) {
                    async_callback();
                }
            }
            debug!("watcher event loop finished");
        });

        info!("file watcher started");
        // Seed initial state so the server scans once right away.
        callback();
        self.started = true;
        true
    }

    fn queue_change(&mut self, change: PendingChange) {
        self.poller.queue_change(change);
    }

    fn matcher_mut(&mut self) -> &mut PathMatcher {
        self.poller.matcher_mut()
    }
}

/// Only creations, modifications and removals warrant a re-scan.
fn is_change_event(kind: &EventKind) -> bool {
    matches!(
        kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    )
}

/// Where to arm the OS watch for a target: the literal prefix for glob
/// patterns, then the nearest existing ancestor, so watching a
/// not-yet-created output directory still works.
fn watch_root(fs: &dyn FileSystem, target: &str) -> PathBuf {
    let base = if has_wildcards(target) {
        literal_prefix(target)
    } else {
        PathBuf::from(target)
    };
    nearest_existing_ancestor(fs, &base)
}

fn nearest_existing_ancestor(fs: &dyn FileSystem, path: &Path) -> PathBuf {
    let mut current = path;
    loop {
        if fs.exists(current) {
            return current.to_path_buf();
        }
        match current.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => current = parent,
            _ => return PathBuf::from("."),
        }
    }
}
