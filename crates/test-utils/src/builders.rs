#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime};

use livewatch::types::{ChangeCallback, TaskCallback};

/// Fixed timestamp for deterministic mtime tables.
pub fn mtime(secs: u64) -> SystemTime {
    SystemTime::UNIX_EPOCH + Duration::from_secs(secs)
}

/// Records every invocation of a task callback together with the paths it
/// was handed, so tests can assert on both count and content.
#[derive(Clone, Default)]
pub struct RecordingCallback {
    calls: Arc<Mutex<Vec<Vec<PathBuf>>>>,
}

impl RecordingCallback {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_task_callback(&self) -> TaskCallback {
        let calls = Arc::clone(&self.calls);
        Box::new(move |paths: &[PathBuf]| {
            calls.lock().unwrap().push(paths.to_vec());
        })
    }

    pub fn calls(&self) -> Vec<Vec<PathBuf>> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

/// Counts invocations of an engine-level change callback.
#[derive(Clone, Default)]
pub struct ChangeProbe {
    hits: Arc<AtomicUsize>,
}

impl ChangeProbe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_change_callback(&self) -> ChangeCallback {
        let hits = Arc::clone(&self.hits);
        Arc::new(move || {
            hits.fetch_add(1, Ordering::SeqCst);
        })
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}
