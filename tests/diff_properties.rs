// tests/diff_properties.rs

use std::collections::BTreeMap;
use std::path::PathBuf;

use proptest::prelude::*;

use livewatch::WatchTask;
use livewatch::fs::mock::MockFileSystem;
use livewatch::watch::{PathMatcher, diff_task};
use livewatch_test_utils::builders::mtime;

/// Random directory tree: file name mapped to its seed mtime offset and a
/// flag deciding whether the test mutates that file.
fn tree_strategy() -> impl Strategy<Value = BTreeMap<String, (u64, bool)>> {
    proptest::collection::btree_map("[a-z]{1,8}", (1u64..1_000, any::<bool>()), 1..8)
}

proptest! {
    #[test]
    fn touched_files_are_reported_exactly_once(tree in tree_strategy()) {
        let fs = MockFileSystem::new();
        for (name, (offset, _)) in &tree {
            fs.add_file(format!("root/{name}"), mtime(*offset));
        }

        let matcher = PathMatcher::default();
        let mut task = WatchTask::new("root");
        let baseline = diff_task(&fs, &matcher, mtime(10_000), &mut task);
        prop_assert!(!baseline.changed, "pre-existing files must not report a change");

        let mut expected: Vec<PathBuf> = Vec::new();
        for (i, (name, (_, touched))) in tree.iter().enumerate() {
            if *touched {
                fs.touch(format!("root/{name}"), mtime(20_000 + i as u64));
                expected.push(PathBuf::from(format!("root/{name}")));
            }
        }

        let mut result = diff_task(&fs, &matcher, mtime(10_000), &mut task);
        result.paths.sort();
        prop_assert_eq!(result.changed, !expected.is_empty());
        prop_assert_eq!(result.paths, expected);

        let follow_up = diff_task(&fs, &matcher, mtime(10_000), &mut task);
        prop_assert!(!follow_up.changed, "a reported change must not repeat");
    }

    #[test]
    fn removed_files_are_purged_and_never_reported_as_paths(tree in tree_strategy()) {
        let fs = MockFileSystem::new();
        for (name, (offset, _)) in &tree {
            fs.add_file(format!("root/{name}"), mtime(*offset));
        }

        let matcher = PathMatcher::default();
        let mut task = WatchTask::new("root");
        diff_task(&fs, &matcher, mtime(10_000), &mut task);

        let mut survivors: Vec<PathBuf> = Vec::new();
        let mut removed_any = false;
        for (name, (_, removed)) in &tree {
            if *removed {
                fs.remove_file(format!("root/{name}"));
                removed_any = true;
            } else {
                survivors.push(PathBuf::from(format!("root/{name}")));
            }
        }

        let result = diff_task(&fs, &matcher, mtime(10_000), &mut task);
        prop_assert_eq!(result.changed, removed_any);
        prop_assert!(result.paths.is_empty(), "removals must not surface as changed paths");

        let mut tracked = task.tracked_paths();
        tracked.sort();
        prop_assert_eq!(tracked, survivors);

        prop_assert!(!diff_task(&fs, &matcher, mtime(10_000), &mut task).changed);
    }
}
