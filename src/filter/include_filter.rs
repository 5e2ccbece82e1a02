//! Allow-list filter built from configured include patterns

use std::collections::HashSet;
use std::path::Path;

use tracing::{debug, warn};

use crate::config::PackConfig;
use crate::path::RelativePath;
use crate::pattern::{PatternCompiler, PatternSet};

/// Restricts packing to an explicit allow-list.
///
/// With no include patterns configured every path is included and only
/// the ignore rules decide.
#[derive(Debug, Default)]
pub struct IncludeFilter {
    literals: HashSet<String>,
    patterns: PatternSet,
}

impl IncludeFilter {
    /// Build the filter. Entries that are not valid glob syntax still
    /// select the single path they spell out.
    pub fn build(root: &Path, config: &PackConfig, compiler: &dyn PatternCompiler) -> Self {
        let entries = collect_include_patterns(root, config);
        let mut patterns = PatternSet::new();
        for entry in &entries {
            // still absolute means outside the root
            if Path::new(entry).is_absolute() {
                continue;
            }
            match compiler.compile(entry) {
                Ok(matcher) => patterns.push(matcher),
                Err(err) => debug!(pattern = %entry, error = %err, "include entry kept as literal path"),
            }
        }
        Self {
            literals: entries.into_iter().collect(),
            patterns,
        }
    }

    /// True when no include restriction is configured.
    pub fn is_unrestricted(&self) -> bool {
        self.literals.is_empty()
    }

    pub fn is_included(&self, path: &RelativePath) -> bool {
        self.is_unrestricted()
            || self.literals.contains(path.as_str())
            || self.patterns.is_match(path.as_str())
    }
}

/// Configured include entries, with absolute paths made relative to `root`.
pub fn collect_include_patterns(root: &Path, config: &PackConfig) -> Vec<String> {
    config
        .include
        .iter()
        .map(|pattern| make_path_relative(root, pattern))
        .collect()
}

/// Convert an absolute include entry to a root-relative one.
///
/// Relative entries pass through untouched; absolute entries outside the
/// root are kept verbatim and can never match.
pub fn make_path_relative(root: &Path, pattern: &str) -> String {
    let path = Path::new(pattern);
    if !path.is_absolute() {
        return pattern.to_string();
    }
    match RelativePath::from_path(root, path) {
        Some(rel) => rel.as_str().to_string(),
        None => {
            warn!(pattern, root = %root.display(), "include path is outside the root directory");
            pattern.to_string()
        }
    }
}
