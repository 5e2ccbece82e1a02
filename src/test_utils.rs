//! Test utilities: temporary repositories and in-memory collaborators.
//!
//! This module is only compiled for tests, benchmarks and the `test-utils` feature.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tempfile::TempDir;

use crate::config::PackConfig;
use crate::error::Result;
use crate::filter::IgnoreFileReader;
use crate::output::{OutputContext, OutputWriter};
use crate::packager::Collaborators;
use crate::pattern::{GlobCompiler, PathMatcher, PatternCompiler};
use crate::process::ContentProcessor;
use crate::security::{SecretFinding, SecretScanResult, SecretScanner};

/// A temporary directory to pack.
///
/// The directory is automatically cleaned up when dropped.
pub struct TestRepo {
    dir: TempDir,
}

impl TestRepo {
    /// Create a new empty temporary directory.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        Self { dir }
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Add a file, creating parent directories as needed.
    pub fn add_file(&self, path: &str, content: &str) -> PathBuf {
        let full_path = self.dir.path().join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        fs::write(&full_path, content).expect("Failed to write file");
        full_path
    }

    /// Add an empty directory.
    pub fn add_dir(&self, path: &str) -> PathBuf {
        let full_path = self.dir.path().join(path);
        fs::create_dir_all(&full_path).expect("Failed to create dir");
        full_path
    }

    /// Add a symlink at `link` pointing to `target` (taken verbatim).
    #[cfg(unix)]
    pub fn add_symlink(&self, target: &str, link: &str) -> PathBuf {
        let full_path = self.dir.path().join(link);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        std::os::unix::fs::symlink(target, &full_path).expect("Failed to create symlink");
        full_path
    }
}

impl Default for TestRepo {
    fn default() -> Self {
        Self::new()
    }
}

/// Compiles every pattern to a plain string-equality check.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactCompiler;

#[derive(Debug)]
pub struct ExactMatcher(String);

impl PathMatcher for ExactMatcher {
    fn is_match(&self, path: &str) -> bool {
        self.0 == path
    }
}

impl PatternCompiler for ExactCompiler {
    fn compile(&self, pattern: &str) -> Result<Box<dyn PathMatcher>> {
        Ok(Box::new(ExactMatcher(pattern.to_string())))
    }
}

/// Returns a fixed list of patterns regardless of what is on disk.
#[derive(Debug, Clone, Default)]
pub struct StaticIgnoreFileReader(pub Vec<String>);

impl StaticIgnoreFileReader {
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(patterns.into_iter().map(Into::into).collect())
    }
}

impl IgnoreFileReader for StaticIgnoreFileReader {
    fn read_patterns(&self, _root: &Path) -> Vec<String> {
        self.0.clone()
    }
}

/// Gives every file the same content, except for names marked as skipped.
#[derive(Debug, Clone, Default)]
pub struct StaticContentProcessor {
    content: String,
    skipped: HashSet<String>,
}

impl StaticContentProcessor {
    pub fn new(content: &str) -> Self {
        Self {
            content: content.to_string(),
            skipped: HashSet::new(),
        }
    }

    /// Treat files with this file name as unpackable.
    pub fn skipping(mut self, file_name: &str) -> Self {
        self.skipped.insert(file_name.to_string());
        self
    }
}

impl ContentProcessor for StaticContentProcessor {
    fn process(&self, path: &Path, _config: &PackConfig) -> Option<String> {
        let name = path.file_name()?.to_str()?;
        if self.skipped.contains(name) {
            None
        } else {
            Some(self.content.clone())
        }
    }
}

/// Flags every line containing the keyword.
#[derive(Debug, Clone)]
pub struct KeywordSecretScanner {
    keyword: String,
}

impl KeywordSecretScanner {
    pub fn new(keyword: &str) -> Self {
        Self {
            keyword: keyword.to_string(),
        }
    }
}

impl SecretScanner for KeywordSecretScanner {
    fn scan(&self, file_path: &str, content: &str) -> SecretScanResult {
        let messages = content
            .lines()
            .enumerate()
            .filter(|(_, line)| line.contains(&self.keyword))
            .map(|(i, _)| SecretFinding {
                rule_id: "keyword",
                message: "keyword found",
                line: i + 1,
            })
            .collect();
        SecretScanResult {
            file_path: file_path.to_string(),
            messages,
        }
    }
}

/// What a `RecordingOutputWriter` saw on one call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedOutput {
    /// `(path, content)` of each packed file, in order.
    pub files: Vec<(String, String)>,
    pub tree: String,
}

/// Keeps every write in memory. Clones share the same record.
#[derive(Debug, Clone, Default)]
pub struct RecordingOutputWriter {
    records: Arc<Mutex<Vec<RecordedOutput>>>,
}

impl RecordingOutputWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<RecordedOutput> {
        self.records.lock().expect("recording writer lock poisoned").clone()
    }
}

impl OutputWriter for RecordingOutputWriter {
    fn write(&self, ctx: &OutputContext<'_>) -> Result<()> {
        let record = RecordedOutput {
            files: ctx
                .files
                .iter()
                .map(|f| (f.path.to_string(), f.content.clone()))
                .collect(),
            tree: ctx.tree_string(),
        };
        self.records
            .lock()
            .expect("recording writer lock poisoned")
            .push(record);
        Ok(())
    }
}

/// Collaborators that never touch the disk except for the walk itself.
///
/// Patterns still compile as globs so ignore rules behave normally.
pub fn test_collaborators(
    ignore_patterns: StaticIgnoreFileReader,
    processor: StaticContentProcessor,
    scanner: KeywordSecretScanner,
    writer: RecordingOutputWriter,
) -> Collaborators {
    Collaborators {
        compiler: Box::new(GlobCompiler),
        ignore_reader: Box::new(ignore_patterns),
        processor: Box::new(processor),
        scanner: Box::new(scanner),
        writer: Box::new(writer),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packager::pack;

    #[test]
    fn test_exact_compiler_matches_only_equal_paths() {
        let matcher = ExactCompiler.compile("src/*.rs").unwrap();
        assert!(matcher.is_match("src/*.rs"));
        assert!(!matcher.is_match("src/main.rs"));
    }

    #[test]
    fn test_pack_with_test_doubles() {
        let repo = TestRepo::new();
        repo.add_file("src/a.rs", "on disk");
        repo.add_file("src/b.rs", "on disk");
        repo.add_file("skip.bin", "on disk");
        repo.add_file("generated/out.rs", "on disk");

        let writer = RecordingOutputWriter::new();
        let collaborators = test_collaborators(
            StaticIgnoreFileReader::new(["generated/"]),
            StaticContentProcessor::new("stub").skipping("skip.bin"),
            KeywordSecretScanner::new("disk"),
            writer.clone(),
        );

        let result = pack(repo.path(), &PackConfig::default(), &collaborators).unwrap();
        assert_eq!(result.total_files, 2);
        assert_eq!(result.total_characters, 8);
        assert_eq!(result.suspicious_files_results.len(), 3);

        let records = writer.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].tree, "src/\n  a.rs\n  b.rs\nskip.bin");
        assert!(records[0].files.iter().all(|(_, content)| content == "stub"));
    }
}
