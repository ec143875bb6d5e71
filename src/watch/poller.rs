// src/watch/poller.rs

use std::path::PathBuf;
use std::sync::Arc;
use std::time::SystemTime;

use tracing::{debug, info};

use crate::fs::FileSystem;
use crate::types::{ChangeCallback, PendingChange, PollOutcome};
use crate::watch::FileWatcher;
use crate::watch::diff::diff_task;
use crate::watch::matcher::PathMatcher;
use crate::watch::registry::{TaskRegistry, WatchTask};

/// Default strategy: detect changes by scanning every registered task on
/// each `examine` call. The external server drives the cadence, typically
/// one call per second.
#[derive(Debug)]
pub struct PollWatcher {
    fs: Arc<dyn FileSystem>,
    matcher: PathMatcher,
    registry: TaskRegistry,
    pending: Vec<PendingChange>,
    started_at: SystemTime,
}

impl PollWatcher {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self {
            fs,
            matcher: PathMatcher::default(),
            registry: TaskRegistry::new(),
            pending: Vec::new(),
            started_at: SystemTime::now(),
        }
    }

    pub fn with_matcher(mut self, matcher: PathMatcher) -> Self {
        self.matcher = matcher;
        self
    }

    /// Override the baseline instant separating pre-existing files from
    /// additions. Mainly useful in tests.
    pub fn with_start_time(mut self, started_at: SystemTime) -> Self {
        self.started_at = started_at;
        self
    }

    pub fn registry(&self) -> &TaskRegistry {
        &self.registry
    }

    /// Paths currently tracked for a target, if it is registered.
    pub fn tracked_paths(&self, target: &str) -> Option<Vec<PathBuf>> {
        self.registry.get(target).map(|task| task.tracked_paths())
    }
}

impl FileWatcher for PollWatcher {
    fn watch(&mut self, task: WatchTask) {
        debug!(task = %task.target(), "registering watch task");
        self.registry.insert(task);
    }

    fn examine(&mut self) -> PollOutcome {
        // Queued changes short-circuit the scan, most recent first.
        if let Some(pending) = self.pending.pop() {
            return pending.into();
        }

        let mut changed_paths = Vec::new();
        let mut delays = Vec::new();

        for task in self.registry.iter_mut() {
            let result = diff_task(self.fs.as_ref(), &self.matcher, self.started_at, task);
            if !result.changed {
                continue;
            }

            info!(task = %task.target(), delay = ?task.delay(), "running watch task");
            changed_paths.extend(result.paths.iter().cloned());
            if let Some(delay) = task.delay().as_finite() {
                delays.push(delay);
            }
            if let Some(callback) = task.callback_mut() {
                callback(&result.paths);
            }
        }

        PollOutcome {
            paths: changed_paths,
            delay: delays.into_iter().max(),
        }
    }

    fn start(&mut self, _callback: ChangeCallback) -> bool {
        // No event backend here; the caller keeps polling.
        false
    }

    fn queue_change(&mut self, change: PendingChange) {
        self.pending.push(change);
    }

    fn matcher_mut(&mut self) -> &mut PathMatcher {
        &mut self.matcher
    }
}
