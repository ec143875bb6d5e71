// src/watch/walk.rs

use std::path::{Path, PathBuf};

use globset::GlobBuilder;
use tracing::debug;

use crate::errors::{Result, WatchError};
use crate::fs::FileSystem;
use crate::watch::matcher::PathMatcher;

/// Collect all files under `root`, pruning ignored directory names.
///
/// Unreadable directories are skipped; the next poll retries them anyway.
pub fn walk_files(fs: &dyn FileSystem, matcher: &PathMatcher, root: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    let mut stack = vec![root.to_path_buf()];

    while let Some(dir) = stack.pop() {
        let entries = match fs.read_dir(&dir) {
            Ok(entries) => entries,
            Err(err) => {
                debug!("skipping unreadable directory {:?}: {err}", dir);
                continue;
            }
        };
        for path in entries {
            if fs.is_dir(&path) {
                if !matcher.is_ignored_dir(&path) {
                    stack.push(path);
                }
            } else if fs.is_file(&path) {
                files.push(path);
            }
        }
    }

    files
}

/// Expand a glob pattern into the matching paths, walking from the pattern's
/// literal prefix.
///
/// Unlike ignore matching, expansion keeps wildcards confined to one path
/// component and supports true recursive `**`. A pattern without any
/// wildcards expands to itself when the path exists. Directories that match
/// are included; callers that only care about files filter them out.
pub fn expand_glob(fs: &dyn FileSystem, pattern: &str) -> Result<Vec<PathBuf>> {
    let pattern = pattern.strip_prefix("./").unwrap_or(pattern);

    if !has_wildcards(pattern) {
        let path = PathBuf::from(pattern);
        if fs.exists(&path) {
            return Ok(vec![path]);
        }
        return Ok(Vec::new());
    }

    let glob = GlobBuilder::new(pattern)
        .literal_separator(true)
        .build()
        .map_err(|source| WatchError::PatternError {
            pattern: pattern.to_string(),
            source,
        })?;
    let matcher = glob.compile_matcher();

    let mut matches = Vec::new();
    let mut stack = vec![literal_prefix(pattern)];

    while let Some(dir) = stack.pop() {
        let entries = match fs.read_dir(&dir) {
            Ok(entries) => entries,
            Err(err) => {
                debug!("skipping unreadable directory {:?}: {err}", dir);
                continue;
            }
        };
        for path in entries {
            let text = match_text(&path);
            if matcher.is_match(text.as_str()) {
                matches.push(path.clone());
            }
            if fs.is_dir(&path) {
                stack.push(path);
            }
        }
    }

    Ok(matches)
}

pub(crate) fn has_wildcards(pattern: &str) -> bool {
    pattern.contains(['*', '?', '['])
}

/// Longest leading run of wildcard-free components, used as the walk root
/// (and as the path to arm OS watches on).
pub(crate) fn literal_prefix(pattern: &str) -> PathBuf {
    let mut prefix = if pattern.starts_with('/') {
        PathBuf::from("/")
    } else {
        PathBuf::new()
    };

    for component in pattern.split('/') {
        if component.is_empty() {
            continue;
        }
        if has_wildcards(component) {
            break;
        }
        prefix.push(component);
    }

    if prefix.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        prefix
    }
}

fn match_text(path: &Path) -> String {
    let text = path.to_string_lossy().replace('\\', "/");
    match text.strip_prefix("./") {
        Some(stripped) => stripped.to_string(),
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFileSystem;
    use std::time::{Duration, SystemTime};

    fn mtime(secs: u64) -> SystemTime {
        SystemTime::UNIX_EPOCH + Duration::from_secs(secs)
    }

    #[test]
    fn literal_prefix_stops_at_first_wildcard_component() {
        assert_eq!(literal_prefix("build/**/*.css"), PathBuf::from("build"));
        assert_eq!(literal_prefix("*.css"), PathBuf::from("."));
        assert_eq!(literal_prefix("a/b/c.txt"), PathBuf::from("a/b/c.txt"));
        assert_eq!(literal_prefix("/srv/site/*.html"), PathBuf::from("/srv/site"));
    }

    #[test]
    fn walk_prunes_ignored_directories() {
        let fs = MockFileSystem::new();
        fs.add_file("site/index.html", mtime(1));
        fs.add_file("site/.git/objects/aa", mtime(1));
        fs.add_file("site/assets/app.js", mtime(1));

        let matcher = PathMatcher::default();
        let mut files = walk_files(&fs, &matcher, Path::new("site"));
        files.sort();

        assert_eq!(
            files,
            vec![
                PathBuf::from("site/assets/app.js"),
                PathBuf::from("site/index.html"),
            ]
        );
    }

    #[test]
    fn recursive_glob_expands_across_nested_directories() {
        let fs = MockFileSystem::new();
        fs.add_file("build/a/b/style.css", mtime(1));
        fs.add_file("build/top.css", mtime(1));
        fs.add_file("build/a/readme.md", mtime(1));

        let mut matches = expand_glob(&fs, "build/**/*.css").unwrap();
        matches.sort();

        assert_eq!(
            matches,
            vec![
                PathBuf::from("build/a/b/style.css"),
                PathBuf::from("build/top.css"),
            ]
        );
    }

    #[test]
    fn bare_wildcard_matches_at_the_walk_root_only() {
        let fs = MockFileSystem::new();
        fs.add_file("./top.css", mtime(1));
        fs.add_file("./nested/inner.css", mtime(1));

        let matches = expand_glob(&fs, "*.css").unwrap();
        assert_eq!(matches, vec![PathBuf::from("./top.css")]);
    }

    #[test]
    fn literal_pattern_expands_to_itself_when_present() {
        let fs = MockFileSystem::new();
        fs.add_file("docs/notes.txt", mtime(1));

        assert_eq!(
            expand_glob(&fs, "docs/notes.txt").unwrap(),
            vec![PathBuf::from("docs/notes.txt")]
        );
        assert!(expand_glob(&fs, "docs/missing.txt").unwrap().is_empty());
    }

    #[test]
    fn malformed_pattern_is_reported() {
        let fs = MockFileSystem::new();
        assert!(matches!(
            expand_glob(&fs, "build/[oops"),
            Err(WatchError::PatternError { .. })
        ));
    }
}
