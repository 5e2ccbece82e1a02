//! Exclusion filter assembled from defaults, ignore files and configuration

use std::path::Path;

use glob::Pattern;
use tracing::debug;

use crate::config::PackConfig;
use crate::error::Result;
use crate::path::RelativePath;
use crate::pattern::{PatternCompiler, PatternSet};

use super::defaults::DEFAULT_IGNORE_PATTERNS;
use super::ignore_file::IgnoreFileReader;

/// Decides which files are excluded from packing.
///
/// A path ignored by any source is ignored; sources never override each other.
#[derive(Debug)]
pub struct IgnoreFilter {
    patterns: PatternSet,
}

impl IgnoreFilter {
    /// Build the filter for `root`. Fails if any pattern is malformed.
    pub fn build(
        root: &Path,
        config: &PackConfig,
        reader: &dyn IgnoreFileReader,
        compiler: &dyn PatternCompiler,
    ) -> Result<Self> {
        let patterns = collect_ignore_patterns(root, config, reader);
        debug!(count = patterns.len(), "compiling ignore patterns");
        Ok(Self::from_patterns(PatternSet::compile(compiler, &patterns)?))
    }

    pub fn from_patterns(patterns: PatternSet) -> Self {
        Self { patterns }
    }

    pub fn is_ignored(&self, path: &RelativePath) -> bool {
        self.patterns.is_match(path.as_str())
    }
}

/// Gather every ignore pattern that applies to a pack of `root`, in source order:
/// built-in defaults, the output file, ignore files, then custom patterns.
pub fn collect_ignore_patterns(
    root: &Path,
    config: &PackConfig,
    reader: &dyn IgnoreFileReader,
) -> Vec<String> {
    let mut patterns = Vec::new();

    if config.ignore.use_default_patterns {
        patterns.extend(DEFAULT_IGNORE_PATTERNS.iter().map(|p| p.to_string()));
    }

    if let Some(output) = output_file_pattern(root, &config.output.file_path) {
        patterns.push(output);
    }

    patterns.extend(reader.read_patterns(root));
    patterns.extend(config.ignore.custom_patterns.iter().cloned());
    patterns
}

/// Anchored, glob-escaped pattern for the output file, if it lives under `root`.
fn output_file_pattern(root: &Path, file_path: &str) -> Option<String> {
    let path = Path::new(file_path);
    let rel = if path.is_absolute() {
        RelativePath::from_path(root, path)?
    } else {
        RelativePath::new(file_path)?
    };
    Some(format!("/{}", Pattern::escape(rel.as_str())))
}
