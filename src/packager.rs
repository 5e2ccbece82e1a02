//! The pack pipeline: select files, scan them, process them and write the output

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::{IgnoreSettings, PackConfig};
use crate::error::{PackError, Result};
use crate::filter::{FsIgnoreFileReader, IgnoreFileReader, IgnoreFilter, IncludeFilter};
use crate::output::{OutputContext, OutputWriter, PackedFile, TextOutputWriter};
use crate::path::RelativePath;
use crate::pattern::{GlobCompiler, PatternCompiler};
use crate::process::{ContentProcessor, FileContentProcessor};
use crate::security::{RegexSecretScanner, SecretScanResult, SecretScanner};
use crate::tree::DirectoryWalker;

/// The swappable pieces a pack run is built from.
pub struct Collaborators {
    pub compiler: Box<dyn PatternCompiler>,
    pub ignore_reader: Box<dyn IgnoreFileReader>,
    pub processor: Box<dyn ContentProcessor>,
    pub scanner: Box<dyn SecretScanner>,
    pub writer: Box<dyn OutputWriter>,
}

impl Collaborators {
    /// Glob patterns, on-disk ignore files, real file contents, regex secret
    /// rules and a plain-text document.
    pub fn production(ignore: &IgnoreSettings) -> Self {
        let reader = FsIgnoreFileReader::new(ignore.use_gitignore)
            .with_default_pruning(ignore.use_default_patterns);
        Self {
            compiler: Box::new(GlobCompiler),
            ignore_reader: Box::new(reader),
            processor: Box::new(FileContentProcessor),
            scanner: Box::new(RegexSecretScanner::new()),
            writer: Box::new(TextOutputWriter),
        }
    }
}

/// Metrics of a completed pack run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackResult {
    pub total_files: usize,
    pub total_characters: usize,
    pub file_char_counts: BTreeMap<String, usize>,
    pub suspicious_files_results: Vec<SecretScanResult>,
}

impl PackResult {
    pub fn from_packed(files: &[PackedFile], suspicious_files_results: Vec<SecretScanResult>) -> Self {
        let file_char_counts: BTreeMap<String, usize> = files
            .iter()
            .map(|f| (f.path.as_str().to_string(), f.content.chars().count()))
            .collect();
        Self {
            total_files: files.len(),
            total_characters: file_char_counts.values().sum(),
            file_char_counts,
            suspicious_files_results,
        }
    }

    /// The `n` largest files, by character count descending then path.
    pub fn top_files(&self, n: usize) -> Vec<(&str, usize)> {
        let mut files: Vec<(&str, usize)> = self
            .file_char_counts
            .iter()
            .map(|(path, count)| (path.as_str(), *count))
            .collect();
        files.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        files.truncate(n);
        files
    }
}

/// Runs the pack pipeline with a fixed set of collaborators.
pub struct Packager<'a> {
    collaborators: &'a Collaborators,
    /// Number of parallel workers for scanning and processing
    /// (0 = auto-detect, 1 = sequential, N = use N workers)
    parallel_workers: usize,
}

impl<'a> Packager<'a> {
    pub fn new(collaborators: &'a Collaborators) -> Self {
        Self {
            collaborators,
            parallel_workers: 0,
        }
    }

    pub fn with_parallel_workers(mut self, workers: usize) -> Self {
        self.parallel_workers = workers;
        self
    }

    /// Pack `root` and write the output document.
    ///
    /// Nothing is written unless filter construction, the walk and the
    /// secret scan all succeed.
    pub fn pack(&self, root: &Path, config: &PackConfig) -> Result<PackResult> {
        let c = self.collaborators;
        let ignore_filter =
            IgnoreFilter::build(root, config, c.ignore_reader.as_ref(), c.compiler.as_ref())?;
        let include_filter = IncludeFilter::build(root, config, c.compiler.as_ref());

        let file_paths = DirectoryWalker::new(&ignore_filter, &include_filter).walk(root)?;
        debug!(count = file_paths.len(), "collected file paths");

        let suspicious_files_results = self.security_check(root, &file_paths)?;
        let files = self.pack_files(root, config, &file_paths);

        c.writer.write(&OutputContext {
            root_dir: root,
            config,
            files: &files,
            file_paths: &file_paths,
        })?;

        let result = PackResult::from_packed(&files, suspicious_files_results);
        info!(
            files = result.total_files,
            characters = result.total_characters,
            suspicious = result.suspicious_files_results.len(),
            "pack complete"
        );
        Ok(result)
    }

    /// Scan every selected file, keeping only results with findings.
    fn security_check(
        &self,
        root: &Path,
        file_paths: &[RelativePath],
    ) -> Result<Vec<SecretScanResult>> {
        let scanner = self.collaborators.scanner.as_ref();
        let results: Vec<Result<Option<SecretScanResult>>> = self.run(|| {
            file_paths
                .par_iter()
                .map(|rel| -> Result<Option<SecretScanResult>> {
                    let full_path = rel.to_path(root);
                    let bytes = fs::read(&full_path).map_err(|e| PackError::read(full_path, e))?;
                    let content = String::from_utf8_lossy(&bytes);
                    let result = scanner.scan(rel.as_str(), &content);
                    Ok(result.is_suspicious().then_some(result))
                })
                .collect()
        });

        let mut suspicious = Vec::new();
        for result in results {
            if let Some(found) = result? {
                suspicious.push(found);
            }
        }
        Ok(suspicious)
    }

    /// Process every selected file, dropping those the processor skips.
    fn pack_files(
        &self,
        root: &Path,
        config: &PackConfig,
        file_paths: &[RelativePath],
    ) -> Vec<PackedFile> {
        let processor = self.collaborators.processor.as_ref();
        let processed: Vec<Option<PackedFile>> = self.run(|| {
            file_paths
                .par_iter()
                .map(|rel| {
                    processor
                        .process(&rel.to_path(root), config)
                        .filter(|content| !content.is_empty())
                        .map(|content| PackedFile {
                            path: rel.clone(),
                            content,
                        })
                })
                .collect()
        });
        processed.into_iter().flatten().collect()
    }

    /// Run `op` on the configured worker count. Indexed collects keep input order.
    fn run<T, F>(&self, op: F) -> T
    where
        T: Send,
        F: FnOnce() -> T + Send,
    {
        match self.parallel_workers {
            0 => op(),
            n => match rayon::ThreadPoolBuilder::new().num_threads(n).build() {
                Ok(pool) => pool.install(op),
                Err(err) => {
                    // Fall back to rayon's global pool if custom pool creation fails
                    warn!(workers = n, error = %err, "failed to build worker pool");
                    op()
                }
            },
        }
    }
}

/// Pack `root` with the given collaborators on rayon's default pool.
pub fn pack(root: &Path, config: &PackConfig, collaborators: &Collaborators) -> Result<PackResult> {
    Packager::new(collaborators).pack(root, config)
}
