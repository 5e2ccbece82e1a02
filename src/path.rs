//! Root-relative file paths with a canonical `/` separator

use std::fmt;
use std::path::{Component, Path, PathBuf};

use serde::Serialize;

/// A path relative to the scan root.
///
/// Always uses `/` between segments, is never absolute and never contains
/// `.` or `..` segments.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct RelativePath(String);

impl RelativePath {
    pub const SEPARATOR: char = '/';

    /// Normalize a relative path string.
    ///
    /// Accepts both `/` and the platform separator. Returns `None` for
    /// absolute paths, empty paths and paths that climb above the root.
    pub fn new(path: &str) -> Option<Self> {
        if path.starts_with(Self::SEPARATOR) || Path::new(path).is_absolute() {
            return None;
        }
        let mut segments: Vec<&str> = Vec::new();
        for segment in path.split(|c| c == Self::SEPARATOR || c == std::path::MAIN_SEPARATOR) {
            match segment {
                "" | "." => {}
                ".." => {
                    segments.pop()?;
                }
                s => segments.push(s),
            }
        }
        if segments.is_empty() {
            None
        } else {
            Some(Self(segments.join("/")))
        }
    }

    /// Express `path` relative to `root`, if it lives under it.
    pub fn from_path(root: &Path, path: &Path) -> Option<Self> {
        let rel = path.strip_prefix(root).ok()?;
        let mut segments: Vec<&str> = Vec::new();
        for component in rel.components() {
            match component {
                Component::Normal(name) => segments.push(name.to_str()?),
                Component::CurDir => {}
                Component::ParentDir => {
                    segments.pop()?;
                }
                Component::RootDir | Component::Prefix(_) => return None,
            }
        }
        if segments.is_empty() {
            None
        } else {
            Some(Self(segments.join("/")))
        }
    }

    /// Path of an entry named `name` inside `parent` (or the root when `None`).
    pub(crate) fn child_of(parent: Option<&Self>, name: &str) -> Self {
        match parent {
            Some(p) => Self(format!("{}{}{}", p.0, Self::SEPARATOR, name)),
            None => Self(name.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split(Self::SEPARATOR)
    }

    pub fn file_name(&self) -> &str {
        self.0.rsplit(Self::SEPARATOR).next().unwrap_or(&self.0)
    }

    /// Resolve against the scan root.
    pub fn to_path(&self, root: &Path) -> PathBuf {
        self.segments().fold(root.to_path_buf(), |acc, s| acc.join(s))
    }
}

impl fmt::Display for RelativePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RelativePath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
