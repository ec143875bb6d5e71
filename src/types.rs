// src/types.rs

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::errors::{Result, WatchError};

/// How long dependents should wait before reacting to a change on a task.
///
/// - `NoDelay`: notify immediately (default behaviour).
/// - `After`: wait the given duration first. This is useful to compile sass
///   files to css, but reload on the changed css files only.
/// - `Forever`: never send a reload message for this task's changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delay {
    NoDelay,
    After(Duration),
    Forever,
}

impl Default for Delay {
    fn default() -> Self {
        Delay::NoDelay
    }
}

impl Delay {
    /// Build a delay from a number of seconds, as accepted from server
    /// configuration. Zero means no delay; negative or non-finite values are
    /// configuration errors.
    pub fn from_secs_f64(secs: f64) -> Result<Self> {
        if secs == 0.0 {
            return Ok(Delay::NoDelay);
        }
        match Duration::try_from_secs_f64(secs) {
            Ok(duration) => Ok(Delay::After(duration)),
            Err(_) => Err(WatchError::ConfigError(format!(
                "delay must be a non-negative number of seconds (got {secs})"
            ))),
        }
    }

    /// The finite duration carried by this delay, if any.
    ///
    /// `NoDelay` and `Forever` never contribute to delay aggregation.
    pub fn as_finite(self) -> Option<Duration> {
        match self {
            Delay::After(duration) => Some(duration),
            Delay::NoDelay | Delay::Forever => None,
        }
    }
}

/// Key identifying a watch task: a file path, a directory path, or a glob
/// pattern. Which of the three it is gets resolved against the filesystem on
/// every poll, since a path may change kind between polls.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WatchTarget(String);

impl WatchTarget {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_path(&self) -> &Path {
        Path::new(&self.0)
    }
}

impl fmt::Display for WatchTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for WatchTarget {
    fn from(s: String) -> Self {
        WatchTarget(s)
    }
}

impl From<&str> for WatchTarget {
    fn from(s: &str) -> Self {
        WatchTarget(s.to_string())
    }
}

impl From<&Path> for WatchTarget {
    fn from(p: &Path) -> Self {
        WatchTarget(p.to_string_lossy().into_owned())
    }
}

impl From<PathBuf> for WatchTarget {
    fn from(p: PathBuf) -> Self {
        WatchTarget(p.to_string_lossy().into_owned())
    }
}

/// Result of one `examine` cycle: every path that changed across all tasks,
/// plus the largest finite delay among the tasks that triggered (or `None`
/// when nothing asked for a delay).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PollOutcome {
    pub paths: Vec<PathBuf>,
    pub delay: Option<Duration>,
}

/// A change notification injected from outside the poll loop (e.g. by an
/// event handler). Consumed exactly once by the next `examine` call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingChange {
    pub paths: Vec<PathBuf>,
    pub delay: Option<Duration>,
}

impl PendingChange {
    pub fn new(paths: Vec<PathBuf>, delay: Option<Duration>) -> Self {
        Self { paths, delay }
    }
}

impl From<PendingChange> for PollOutcome {
    fn from(change: PendingChange) -> Self {
        PollOutcome {
            paths: change.paths,
            delay: change.delay,
        }
    }
}

/// Per-task callback, invoked with the (possibly empty) list of changed
/// paths whenever the task's target changed.
pub type TaskCallback = Box<dyn FnMut(&[PathBuf]) + Send>;

/// Per-task ignore predicate: return true to suppress change reporting for
/// a given path.
pub type IgnorePredicate = Box<dyn Fn(&Path) -> bool + Send>;

/// Engine-level callback handed to `start`, invoked once per filesystem
/// notification to trigger a re-scan.
pub type ChangeCallback = Arc<dyn Fn() + Send + Sync>;
