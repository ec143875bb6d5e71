// src/watch/mod.rs

//! File watching and change detection.
//!
//! This module is responsible for:
//! - Evaluating layered ignore rules (extensions, glob patterns, pruned
//!   directories, per-task predicates).
//! - Tracking per-task mtime tables and diffing them on every poll.
//! - Wiring up a cross-platform filesystem watcher (`notify`) where the
//!   platform supports it, with polling as the fallback.
//!
//! It does **not** know about HTTP or WebSocket delivery; it only turns
//! filesystem changes into change reports and callback invocations.

pub mod diff;
pub mod events;
pub mod matcher;
pub mod poller;
pub mod registry;
pub mod walk;

use std::sync::Arc;

use tracing::warn;

use crate::fs::FileSystem;
use crate::types::{ChangeCallback, PendingChange, PollOutcome};

pub use diff::{ChangeResult, diff_task};
pub use events::EventWatcher;
pub use matcher::PathMatcher;
pub use poller::PollWatcher;
pub use registry::{TaskRegistry, WatchTask};

/// Common interface over the polling and event-driven strategies.
///
/// The embedding server drives whichever implementation
/// [`detect_watcher`] hands it, without caring which one it got.
pub trait FileWatcher: Send {
    /// Register a watch task. Registration is idempotent per target: the
    /// last registration wins.
    fn watch(&mut self, task: WatchTask);

    /// Run one scan-and-diff cycle across all registered tasks.
    fn examine(&mut self) -> PollOutcome;

    /// Arm event-driven change delivery, invoking `callback` on every
    /// relevant filesystem notification (and once immediately to seed
    /// initial state). Returns false when the capability is unavailable and
    /// the caller must keep polling.
    fn start(&mut self, callback: ChangeCallback) -> bool;

    /// Queue a change to be served by the next `examine` call, bypassing
    /// the scan.
    fn queue_change(&mut self, change: PendingChange);

    /// Mutable access to the shared ignore rules.
    fn matcher_mut(&mut self) -> &mut PathMatcher;
}

/// Pick the best available strategy: the event-driven engine when the
/// notification backend can be constructed, the polling engine otherwise.
pub fn detect_watcher(fs: Arc<dyn FileSystem>) -> Box<dyn FileWatcher> {
    match EventWatcher::try_new(Arc::clone(&fs)) {
        Ok(watcher) => Box::new(watcher),
        Err(err) => {
            warn!("filesystem notifications unavailable, using polling: {err}");
            Box::new(PollWatcher::new(fs))
        }
    }
}
