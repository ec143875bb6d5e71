// src/watch/diff.rs

//! mtime diffing for a single task.
//!
//! Each poll stages the mtimes it observes into a [`ScanAccumulator`] and
//! replaces the task's persistent table with the staged one at the end.
//! Paths the previous table knew about that were not re-staged are removals,
//! so the table never keeps stale entries across polls.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::debug;

use crate::fs::FileSystem;
use crate::watch::matcher::PathMatcher;
use crate::watch::registry::WatchTask;
use crate::watch::walk::{expand_glob, walk_files};

/// What one task's poll found: the paths that changed, and whether anything
/// changed at all. `changed` can be true with empty `paths` when the only
/// difference was a removal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeResult {
    pub changed: bool,
    pub paths: Vec<PathBuf>,
}

/// Scratch state for one task's scan, threaded through the traversal.
#[derive(Debug, Default)]
struct ScanAccumulator {
    staged: HashMap<PathBuf, SystemTime>,
    changed: Vec<PathBuf>,
}

/// Diff one task against the filesystem, updating its mtime table.
///
/// The target's kind is resolved fresh on every call: an existing file is
/// checked directly, an existing directory is walked, anything else is
/// treated as a glob pattern. A first sighting counts as a change only when
/// its mtime is newer than `started_at`; older first sightings just seed the
/// baseline.
pub fn diff_task(
    fs: &dyn FileSystem,
    matcher: &PathMatcher,
    started_at: SystemTime,
    task: &mut WatchTask,
) -> ChangeResult {
    let mut acc = ScanAccumulator::default();
    let target_path = task.target().as_path().to_path_buf();

    if fs.is_file(&target_path) {
        check_file(fs, matcher, started_at, task, &target_path, &mut acc);
    } else if fs.is_dir(&target_path) {
        for path in walk_files(fs, matcher, &target_path) {
            check_file(fs, matcher, started_at, task, &path, &mut acc);
        }
    } else {
        match expand_glob(fs, task.target().as_str()) {
            Ok(candidates) => {
                for path in candidates {
                    check_file(fs, matcher, started_at, task, &path, &mut acc);
                }
            }
            Err(err) => {
                // A pattern that fails to expand yields no changes this poll.
                debug!(task = %task.target(), "glob expansion failed: {err}");
            }
        }
    }

    let removed = task
        .mtimes()
        .keys()
        .any(|known| !acc.staged.contains_key(known));
    let changed = removed || !acc.changed.is_empty();

    task.replace_mtimes(acc.staged);

    ChangeResult {
        changed,
        paths: acc.changed,
    }
}

fn check_file(
    fs: &dyn FileSystem,
    matcher: &PathMatcher,
    started_at: SystemTime,
    task: &WatchTask,
    path: &Path,
    acc: &mut ScanAccumulator,
) {
    // Glob candidates may be directories; only files carry change signal.
    if !fs.is_file(path) {
        return;
    }
    if matcher.should_ignore(path, task.ignore()) {
        return;
    }

    let mtime = match fs.mtime(path) {
        Ok(mtime) => mtime,
        Err(err) => {
            // The file vanished between listing and stat; the removal pass
            // accounts for it.
            debug!("mtime unavailable for {:?}: {err}", path);
            return;
        }
    };

    match task.mtimes().get(path) {
        None => {
            acc.staged.insert(path.to_path_buf(), mtime);
            if mtime > started_at {
                acc.changed.push(path.to_path_buf());
            }
        }
        Some(&known) => {
            acc.staged.insert(path.to_path_buf(), mtime);
            if known != mtime {
                acc.changed.push(path.to_path_buf());
            }
        }
    }
}
