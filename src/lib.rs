// src/lib.rs

//! Change detection engine for live-reload development servers.
//!
//! The embedding server registers watch tasks (file paths, directories, or
//! glob patterns) and either polls [`FileWatcher::examine`] on a timer or
//! hands a callback to [`FileWatcher::start`] to be driven by OS filesystem
//! notifications. Each examine cycle reports which paths were added,
//! modified, or removed since the previous check, plus the reload delay to
//! apply.
//!
//! ```no_run
//! use std::sync::Arc;
//! use livewatch::{Delay, FileWatcher, RealFileSystem, WatchTask, detect_watcher};
//!
//! let mut watcher = detect_watcher(Arc::new(RealFileSystem));
//! watcher.watch(
//!     WatchTask::new("build/**/*.css").with_delay(Delay::from_secs_f64(2.5)?),
//! );
//! let outcome = watcher.examine();
//! println!("changed: {:?} (delay {:?})", outcome.paths, outcome.delay);
//! # Ok::<(), livewatch::WatchError>(())
//! ```

pub mod config;
pub mod errors;
pub mod fs;
pub mod logging;
pub mod types;
pub mod watch;

pub use config::WatchConfig;
pub use errors::{Result, WatchError};
pub use fs::{FileSystem, RealFileSystem};
pub use types::{
    ChangeCallback, Delay, IgnorePredicate, PendingChange, PollOutcome, TaskCallback, WatchTarget,
};
pub use watch::{
    ChangeResult, EventWatcher, FileWatcher, PathMatcher, PollWatcher, WatchTask, detect_watcher,
};
