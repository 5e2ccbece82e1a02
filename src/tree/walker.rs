//! DirectoryWalker - collects the root-relative paths of every packable file

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, trace, warn};

use crate::error::{PackError, Result};
use crate::filter::{IgnoreFilter, IncludeFilter};
use crate::path::RelativePath;

/// A directory being listed, with the entries not yet visited.
struct Frame {
    rel: Option<RelativePath>,
    canonical: PathBuf,
    entries: std::vec::IntoIter<fs::DirEntry>,
}

enum EntryKind {
    Directory,
    File,
    BrokenLink,
    Special,
}

/// Depth-first walker that applies the ignore filter, then the include
/// filter, to every file it finds.
///
/// Paths come out in directory-listing order at each level, with a
/// subdirectory's files emitted where the subdirectory was listed. Directories
/// themselves are never filtered. Any failure to list a directory aborts
/// the walk.
pub struct DirectoryWalker<'a> {
    ignore_filter: &'a IgnoreFilter,
    include_filter: &'a IncludeFilter,
}

impl<'a> DirectoryWalker<'a> {
    pub fn new(ignore_filter: &'a IgnoreFilter, include_filter: &'a IncludeFilter) -> Self {
        Self {
            ignore_filter,
            include_filter,
        }
    }

    pub fn walk(&self, root: &Path) -> Result<Vec<RelativePath>> {
        let mut files = Vec::new();
        let mut stack = vec![Frame {
            rel: None,
            canonical: canonical_dir(root)?,
            entries: read_entries(root)?.into_iter(),
        }];

        while let Some(frame) = stack.last_mut() {
            let Some(entry) = frame.entries.next() else {
                stack.pop();
                continue;
            };

            let path = entry.path();
            let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
                warn!(path = %path.display(), "skipping entry with non-UTF-8 name");
                continue;
            };
            let rel = RelativePath::child_of(frame.rel.as_ref(), &name);

            match classify(&entry)? {
                EntryKind::Directory => {
                    let canonical = canonical_dir(&path)?;
                    if stack.iter().any(|f| f.canonical == canonical) {
                        debug!(path = %rel, "skipping directory link back into its own ancestry");
                        continue;
                    }
                    let entries = read_entries(&path)?;
                    stack.push(Frame {
                        rel: Some(rel),
                        canonical,
                        entries: entries.into_iter(),
                    });
                }
                EntryKind::File => {
                    if self.accepts(&rel) {
                        files.push(rel);
                    }
                }
                EntryKind::BrokenLink => debug!(path = %rel, "skipping broken symlink"),
                EntryKind::Special => debug!(path = %rel, "skipping non-regular file"),
            }
        }

        Ok(files)
    }

    fn accepts(&self, rel: &RelativePath) -> bool {
        if self.ignore_filter.is_ignored(rel) {
            trace!(path = %rel, "ignoring file");
            return false;
        }
        if !self.include_filter.is_included(rel) {
            trace!(path = %rel, "ignoring file (does not match include filter)");
            return false;
        }
        trace!(path = %rel, "including file");
        true
    }
}

/// List a directory eagerly so enumeration errors surface here.
fn read_entries(dir: &Path) -> Result<Vec<fs::DirEntry>> {
    fs::read_dir(dir)
        .map_err(|e| PackError::walk(dir, e))?
        .map(|entry| entry.map_err(|e| PackError::walk(dir, e)))
        .collect()
}

fn canonical_dir(dir: &Path) -> Result<PathBuf> {
    dir.canonicalize().map_err(|e| PackError::walk(dir, e))
}

/// Symlinks are resolved to what they point at.
fn classify(entry: &fs::DirEntry) -> Result<EntryKind> {
    let file_type = entry
        .file_type()
        .map_err(|e| PackError::walk(entry.path(), e))?;

    if file_type.is_dir() {
        return Ok(EntryKind::Directory);
    }
    if file_type.is_file() {
        return Ok(EntryKind::File);
    }
    if file_type.is_symlink() {
        return Ok(match fs::metadata(entry.path()) {
            Ok(meta) if meta.is_dir() => EntryKind::Directory,
            Ok(meta) if meta.is_file() => EntryKind::File,
            Ok(_) => EntryKind::Special,
            Err(_) => EntryKind::BrokenLink,
        });
    }
    Ok(EntryKind::Special)
}
