// src/watch/matcher.rs

use std::fmt;
use std::path::Path;

use globset::{Glob, GlobMatcher};

use crate::config::WatchConfig;
use crate::errors::{Result, WatchError};
use crate::types::IgnorePredicate;

/// One compiled ignore pattern, kept alongside its source string so the
/// active rules can be inspected at runtime.
#[derive(Clone)]
struct IgnoreGlob {
    source: String,
    matcher: GlobMatcher,
}

/// Layered ignore rules shared by every watch task.
///
/// A path is invisible to change detection when any of these match, checked
/// in order: the extension blacklist, the ignore-glob patterns, then the
/// task's own predicate. Directory names in `ignored_dirs` are pruned from
/// traversal entirely rather than filtered per file.
///
/// Ignore patterns use shell-style wildcard matching where `*` and `?` may
/// also cross path separators. A recursive wildcard (`a/**/b`) is translated
/// into a single-level wildcard (`a*/b`) before compiling; that trades exact
/// recursive-glob semantics for a simpler match, and means e.g. `src/**/tmp`
/// also matches `srcextra/tmp`.
#[derive(Clone)]
pub struct PathMatcher {
    ignored_dirs: Vec<String>,
    ignored_extensions: Vec<String>,
    ignore_globs: Vec<IgnoreGlob>,
}

impl fmt::Debug for PathMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PathMatcher")
            .field("ignored_dirs", &self.ignored_dirs)
            .field("ignored_extensions", &self.ignored_extensions)
            .field("ignore_patterns", &self.ignore_patterns())
            .finish_non_exhaustive()
    }
}

impl Default for PathMatcher {
    fn default() -> Self {
        let defaults = WatchConfig::default();
        Self {
            ignored_dirs: defaults.ignored_dirs,
            ignored_extensions: defaults.ignored_extensions,
            ignore_globs: Vec::new(),
        }
    }
}

impl PathMatcher {
    /// Compile a matcher from declarative settings.
    pub fn from_config(config: &WatchConfig) -> Result<Self> {
        let mut matcher = Self {
            ignored_dirs: config.ignored_dirs.clone(),
            ignored_extensions: Vec::new(),
            ignore_globs: Vec::new(),
        };
        for ext in &config.ignored_extensions {
            matcher.add_ignored_extension(ext);
        }
        for pattern in &config.ignore_patterns {
            matcher.add_ignore_pattern(pattern)?;
        }
        Ok(matcher)
    }

    /// True when `path` must stay invisible to change detection.
    pub fn should_ignore(&self, path: &Path, task_ignore: Option<&IgnorePredicate>) -> bool {
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            if self
                .ignored_extensions
                .iter()
                .any(|ignored| ignored.strip_prefix('.') == Some(ext))
            {
                return true;
            }
        }

        if !self.ignore_globs.is_empty() {
            let text = path.to_string_lossy().replace('\\', "/");
            if self
                .ignore_globs
                .iter()
                .any(|glob| glob.matcher.is_match(text.as_str()))
            {
                return true;
            }
        }

        if let Some(ignore) = task_ignore {
            if ignore(path) {
                return true;
            }
        }

        false
    }

    /// True when a directory entry must be pruned from traversal.
    pub fn is_ignored_dir(&self, path: &Path) -> bool {
        match path.file_name().and_then(|n| n.to_str()) {
            Some(name) => self.ignored_dirs.iter().any(|dir| dir == name),
            None => false,
        }
    }

    pub fn add_ignored_dirs<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignored_dirs.extend(names.into_iter().map(Into::into));
    }

    pub fn remove_ignored_dirs<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for name in names {
            self.ignored_dirs.retain(|dir| dir != name.as_ref());
        }
    }

    /// Add an extension to the blacklist. A missing leading dot is supplied,
    /// so `"tmp"` and `".tmp"` behave the same.
    pub fn add_ignored_extension(&mut self, extension: &str) {
        let normalized = if extension.starts_with('.') {
            extension.to_string()
        } else {
            format!(".{extension}")
        };
        if !self.ignored_extensions.contains(&normalized) {
            self.ignored_extensions.push(normalized);
        }
    }

    /// Compile and append an ignore pattern. Invalid patterns fail here, not
    /// at match time.
    pub fn add_ignore_pattern(&mut self, pattern: &str) -> Result<()> {
        let rewritten = pattern.replace("/**/", "*/");
        let glob = Glob::new(&rewritten).map_err(|source| WatchError::PatternError {
            pattern: pattern.to_string(),
            source,
        })?;
        self.ignore_globs.push(IgnoreGlob {
            source: pattern.to_string(),
            matcher: glob.compile_matcher(),
        });
        Ok(())
    }

    pub fn ignored_dirs(&self) -> &[String] {
        &self.ignored_dirs
    }

    pub fn ignored_extensions(&self) -> &[String] {
        &self.ignored_extensions
    }

    /// Source strings of the active ignore patterns.
    pub fn ignore_patterns(&self) -> Vec<&str> {
        self.ignore_globs
            .iter()
            .map(|glob| glob.source.as_str())
            .collect()
    }
}
