//! Discovery and parsing of ignore files on disk

use std::fs;
use std::path::Path;

use ignore::WalkBuilder;
use tracing::{debug, warn};

use crate::path::RelativePath;
use crate::pattern::{GlobCompiler, PatternSet};

use super::defaults::DEFAULT_IGNORE_PATTERNS;

pub const GITIGNORE_FILE: &str = ".gitignore";
pub const REPOPACK_IGNORE_FILE: &str = ".repopackignore";

/// Supplies raw ignore patterns gathered from files under a root directory.
///
/// Read failures are never fatal: an unreadable source contributes no patterns.
pub trait IgnoreFileReader: Send + Sync {
    fn read_patterns(&self, root: &Path) -> Vec<String>;
}

/// Reads `.repopackignore` files, and `.gitignore` files when enabled,
/// from anywhere under the root.
///
/// With default pruning on, directories the built-in patterns ignore
/// (`node_modules/`, `target/` and the like) are not searched.
#[derive(Debug, Clone, Copy)]
pub struct FsIgnoreFileReader {
    use_gitignore: bool,
    prune_default_dirs: bool,
}

impl FsIgnoreFileReader {
    pub fn new(use_gitignore: bool) -> Self {
        Self {
            use_gitignore,
            prune_default_dirs: false,
        }
    }

    pub fn with_default_pruning(mut self, prune: bool) -> Self {
        self.prune_default_dirs = prune;
        self
    }

    fn default_patterns(&self) -> Option<PatternSet> {
        if !self.prune_default_dirs {
            return None;
        }
        match PatternSet::compile(&GlobCompiler, DEFAULT_IGNORE_PATTERNS) {
            Ok(set) => Some(set),
            Err(err) => {
                warn!(error = %err, "built-in patterns failed to compile, searching every directory");
                None
            }
        }
    }

    fn is_ignore_file(&self, name: &str) -> bool {
        name == REPOPACK_IGNORE_FILE || (self.use_gitignore && name == GITIGNORE_FILE)
    }
}

impl Default for FsIgnoreFileReader {
    fn default() -> Self {
        Self::new(true)
    }
}

impl IgnoreFileReader for FsIgnoreFileReader {
    fn read_patterns(&self, root: &Path) -> Vec<String> {
        let defaults = self.default_patterns();
        let search_root = root.to_path_buf();
        let walker = WalkBuilder::new(root)
            .standard_filters(false)
            .filter_entry(move |entry| {
                if entry.file_name() == ".git" {
                    return false;
                }
                let Some(defaults) = &defaults else {
                    return true;
                };
                if entry.depth() == 0 || !entry.file_type().is_some_and(|ft| ft.is_dir()) {
                    return true;
                }
                // prune when an ignore file placed here would itself be ignored
                match RelativePath::from_path(&search_root, entry.path()) {
                    Some(dir) => !defaults.is_match(&format!("{dir}/{GITIGNORE_FILE}")),
                    None => true,
                }
            })
            .sort_by_file_name(|a, b| a.cmp(b))
            .build();

        let mut patterns = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(e) => e,
                Err(err) => {
                    warn!(error = %err, "skipping unreadable entry while looking for ignore files");
                    continue;
                }
            };
            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                continue;
            }
            if !entry.file_name().to_str().is_some_and(|n| self.is_ignore_file(n)) {
                continue;
            }

            let base = entry
                .path()
                .parent()
                .and_then(|dir| RelativePath::from_path(root, dir));
            match fs::read_to_string(entry.path()) {
                Ok(content) => {
                    let parsed = parse_ignore_file(&content);
                    debug!(
                        path = %entry.path().display(),
                        patterns = parsed.len(),
                        "loaded ignore file"
                    );
                    patterns.extend(parsed.iter().map(|p| rebase_pattern(p, base.as_ref())));
                }
                Err(err) => {
                    warn!(path = %entry.path().display(), error = %err, "failed to read ignore file");
                }
            }
        }
        patterns
    }
}

/// Extract patterns from ignore-file text.
///
/// Blank lines and `#` comments are dropped. Negated (`!`) lines are
/// dropped as well since ignore sources only ever add exclusions.
pub fn parse_ignore_file(content: &str) -> Vec<String> {
    content
        .lines()
        .filter_map(|line| {
            let line = line.trim_end();
            if line.is_empty() || line.starts_with('#') {
                return None;
            }
            if line.starts_with('!') {
                debug!(pattern = line, "negated ignore pattern skipped");
                return None;
            }
            let line = line
                .strip_prefix('\\')
                .filter(|rest| rest.starts_with('#') || rest.starts_with('!'))
                .unwrap_or(line);
            Some(line.to_string())
        })
        .collect()
}

/// Rewrite a pattern from an ignore file in `base` so it applies from the root.
fn rebase_pattern(pattern: &str, base: Option<&RelativePath>) -> String {
    let Some(base) = base else {
        return pattern.to_string();
    };
    let (body, dir_suffix) = match pattern.strip_suffix('/') {
        Some(body) => (body, "/"),
        None => (pattern, ""),
    };
    if let Some(rooted) = body.strip_prefix('/') {
        format!("{base}/{rooted}{dir_suffix}")
    } else if body.contains('/') {
        format!("{base}/{body}{dir_suffix}")
    } else {
        format!("{base}/**/{body}{dir_suffix}")
    }
}
