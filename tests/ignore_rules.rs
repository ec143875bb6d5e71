// tests/ignore_rules.rs

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use livewatch::fs::mock::MockFileSystem;
use livewatch::{FileSystem, FileWatcher, PathMatcher, PollWatcher, WatchConfig, WatchTask};
use livewatch_test_utils::builders::mtime;
use livewatch_test_utils::init_tracing;

type TestResult = Result<(), Box<dyn Error>>;

fn poll_watcher(fs: &Arc<MockFileSystem>) -> PollWatcher {
    let fs: Arc<dyn FileSystem> = fs.clone();
    PollWatcher::new(fs).with_start_time(mtime(100))
}

#[test]
fn changes_under_a_vcs_directory_stay_invisible() -> TestResult {
    init_tracing();

    let fs = Arc::new(MockFileSystem::new());
    fs.add_file("repo/readme.md", mtime(50));

    let mut watcher = poll_watcher(&fs);
    watcher.watch(WatchTask::new("repo"));
    watcher.examine();

    // Lexically under the watched root, but inside a pruned directory.
    fs.add_file("repo/.git/index", mtime(150));
    assert!(watcher.examine().paths.is_empty());

    // A sibling outside the pruned directory still triggers.
    fs.add_file("repo/new.md", mtime(160));
    assert_eq!(watcher.examine().paths, vec![PathBuf::from("repo/new.md")]);

    Ok(())
}

#[test]
fn blacklisted_extensions_never_trigger() -> TestResult {
    init_tracing();

    let fs = Arc::new(MockFileSystem::new());
    fs.add_file("srv/app.py", mtime(50));
    fs.add_file("srv/app.pyc", mtime(50));

    let mut watcher = poll_watcher(&fs);
    watcher.watch(WatchTask::new("srv"));
    watcher.examine();

    fs.touch("srv/app.pyc", mtime(150));
    assert!(watcher.examine().paths.is_empty());

    fs.touch("srv/app.py", mtime(160));
    assert_eq!(watcher.examine().paths, vec![PathBuf::from("srv/app.py")]);

    Ok(())
}

#[test]
fn ignore_rules_added_at_runtime_apply_to_the_next_examine() -> TestResult {
    init_tracing();

    let fs = Arc::new(MockFileSystem::new());
    fs.add_file("srv/app.js", mtime(50));
    fs.add_file("srv/app.min.js", mtime(50));

    let mut watcher = poll_watcher(&fs);
    watcher.watch(WatchTask::new("srv"));
    watcher.examine();

    watcher.matcher_mut().add_ignore_pattern("*.min.js")?;

    fs.touch("srv/app.min.js", mtime(150));
    assert!(watcher.examine().paths.is_empty());

    fs.touch("srv/app.js", mtime(160));
    assert_eq!(watcher.examine().paths, vec![PathBuf::from("srv/app.js")]);

    Ok(())
}

#[test]
fn per_task_predicates_only_affect_their_own_task() -> TestResult {
    init_tracing();

    let fs = Arc::new(MockFileSystem::new());
    fs.add_file("docs/draft.md", mtime(50));

    let mut watcher = poll_watcher(&fs);
    watcher.watch(
        WatchTask::new("docs")
            .with_ignore(|path| path.file_name().is_some_and(|name| name == "draft.md")),
    );
    // Same tree watched without the predicate.
    watcher.watch(WatchTask::new("docs/draft.md"));
    watcher.examine();

    fs.touch("docs/draft.md", mtime(150));
    let outcome = watcher.examine();
    assert_eq!(outcome.paths, vec![PathBuf::from("docs/draft.md")]);

    Ok(())
}

#[test]
fn toml_settings_flow_into_the_matcher() -> TestResult {
    init_tracing();

    let config = WatchConfig::from_toml_str(
        r#"
        ignored_dirs = [".git", "target"]
        ignored_extensions = [".log"]
        ignore_patterns = ["build/**/compiled/*"]
        "#,
    )?;
    let matcher = PathMatcher::from_config(&config)?;

    let fs = Arc::new(MockFileSystem::new());
    fs.add_file("build/a/compiled/out.css", mtime(50));
    fs.add_file("build/a/site.css", mtime(50));
    fs.add_file("build/session.log", mtime(50));
    fs.add_file("build/target/dep.rlib", mtime(50));

    let mut watcher = poll_watcher(&fs).with_matcher(matcher);
    watcher.watch(WatchTask::new("build"));
    watcher.examine();

    fs.touch("build/a/compiled/out.css", mtime(150));
    fs.touch("build/a/site.css", mtime(150));
    fs.touch("build/session.log", mtime(150));
    fs.touch("build/target/dep.rlib", mtime(150));

    assert_eq!(watcher.examine().paths, vec![PathBuf::from("build/a/site.css")]);

    Ok(())
}

#[test]
fn newly_ignored_extension_applies_without_restart() -> TestResult {
    init_tracing();

    let fs = Arc::new(MockFileSystem::new());
    fs.add_file("srv/scratch.tmp", mtime(50));

    let mut watcher = poll_watcher(&fs);
    watcher.watch(WatchTask::new("srv"));
    watcher.matcher_mut().add_ignored_extension("tmp");
    watcher.examine();

    fs.touch("srv/scratch.tmp", mtime(150));
    assert!(watcher.examine().paths.is_empty());

    Ok(())
}
