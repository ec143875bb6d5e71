// src/watch/registry.rs

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::types::{Delay, IgnorePredicate, TaskCallback, WatchTarget};

/// One registered watch target plus its callback, delay policy, ignore
/// predicate, and the mtime table persisted between polls.
pub struct WatchTask {
    target: WatchTarget,
    callback: Option<TaskCallback>,
    delay: Delay,
    ignore: Option<IgnorePredicate>,
    mtimes: HashMap<PathBuf, SystemTime>,
}

impl fmt::Debug for WatchTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchTask")
            .field("target", &self.target)
            .field("delay", &self.delay)
            .field("tracked", &self.mtimes.len())
            .finish_non_exhaustive()
    }
}

impl WatchTask {
    /// Watch a file path, directory path, or glob pattern.
    pub fn new(target: impl Into<WatchTarget>) -> Self {
        Self {
            target: target.into(),
            callback: None,
            delay: Delay::default(),
            ignore: None,
            mtimes: HashMap::new(),
        }
    }

    /// Run `callback` with the changed paths whenever this target changes.
    pub fn with_callback(mut self, callback: impl FnMut(&[PathBuf]) + Send + 'static) -> Self {
        self.callback = Some(Box::new(callback));
        self
    }

    pub fn with_delay(mut self, delay: Delay) -> Self {
        self.delay = delay;
        self
    }

    /// Suppress change reporting for paths the predicate accepts.
    pub fn with_ignore(mut self, ignore: impl Fn(&Path) -> bool + Send + 'static) -> Self {
        self.ignore = Some(Box::new(ignore));
        self
    }

    pub fn target(&self) -> &WatchTarget {
        &self.target
    }

    pub fn delay(&self) -> Delay {
        self.delay
    }

    /// Paths currently tracked in this task's mtime table.
    pub fn tracked_paths(&self) -> Vec<PathBuf> {
        self.mtimes.keys().cloned().collect()
    }

    pub(crate) fn ignore(&self) -> Option<&IgnorePredicate> {
        self.ignore.as_ref()
    }

    pub(crate) fn callback_mut(&mut self) -> Option<&mut TaskCallback> {
        self.callback.as_mut()
    }

    pub(crate) fn mtimes(&self) -> &HashMap<PathBuf, SystemTime> {
        &self.mtimes
    }

    pub(crate) fn replace_mtimes(&mut self, staged: HashMap<PathBuf, SystemTime>) {
        self.mtimes = staged;
    }
}

/// Ordered collection of watch tasks, keyed by target.
///
/// Re-registering a target replaces the previous task in place, so polling
/// order stays stable while the replacement starts with a fresh mtime table.
#[derive(Debug, Default)]
pub struct TaskRegistry {
    tasks: Vec<WatchTask>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, task: WatchTask) {
        match self
            .tasks
            .iter()
            .position(|existing| existing.target() == task.target())
        {
            Some(index) => self.tasks[index] = task,
            None => self.tasks.push(task),
        }
    }

    pub fn get(&self, target: &str) -> Option<&WatchTask> {
        self.tasks.iter().find(|task| task.target().as_str() == target)
    }

    pub fn iter(&self) -> impl Iterator<Item = &WatchTask> {
        self.tasks.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut WatchTask> {
        self.tasks.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn registration_order_is_preserved() {
        let mut registry = TaskRegistry::new();
        registry.insert(WatchTask::new("b"));
        registry.insert(WatchTask::new("a"));
        registry.insert(WatchTask::new("c"));

        let order: Vec<&str> = registry.iter().map(|t| t.target().as_str()).collect();
        assert_eq!(order, vec!["b", "a", "c"]);
    }

    #[test]
    fn reregistering_a_target_replaces_in_place() {
        let mut registry = TaskRegistry::new();
        registry.insert(WatchTask::new("a"));
        registry.insert(WatchTask::new("b"));
        registry.insert(
            WatchTask::new("a").with_delay(Delay::After(Duration::from_secs(1))),
        );

        assert_eq!(registry.len(), 2);
        let order: Vec<&str> = registry.iter().map(|t| t.target().as_str()).collect();
        assert_eq!(order, vec!["a", "b"]);
        assert_eq!(
            registry.get("a").unwrap().delay(),
            Delay::After(Duration::from_secs(1))
        );
    }

    #[test]
    fn replacement_starts_with_an_empty_mtime_table() {
        let mut registry = TaskRegistry::new();
        let mut seeded = WatchTask::new("a");
        seeded.replace_mtimes(HashMap::from([(
            PathBuf::from("a/file.txt"),
            SystemTime::UNIX_EPOCH,
        )]));
        registry.insert(seeded);
        assert_eq!(registry.get("a").unwrap().tracked_paths().len(), 1);

        registry.insert(WatchTask::new("a"));
        assert!(registry.get("a").unwrap().tracked_paths().is_empty());
    }
}
