//! Output document and run summary
//!
//! - `text` - the packed plain-text document written next to the repository
//! - `summary` - colored console summary and JSON result printing

mod summary;
mod text;

use std::path::Path;

use crate::config::PackConfig;
use crate::error::Result;
use crate::path::RelativePath;
use crate::tree::generate_tree_string;

pub use summary::{format_number, print_json, print_summary, write_summary};
pub use text::{TextOutputWriter, render_document};

/// A file that made it into the output, with its processed content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedFile {
    pub path: RelativePath,
    pub content: String,
}

/// Everything an output writer gets to see.
#[derive(Debug, Clone, Copy)]
pub struct OutputContext<'a> {
    pub root_dir: &'a Path,
    pub config: &'a PackConfig,
    /// Files with content, in walk order.
    pub files: &'a [PackedFile],
    /// Every walked path, including files the content processor skipped.
    pub file_paths: &'a [RelativePath],
}

impl OutputContext<'_> {
    /// Rendered directory tree of all walked paths.
    pub fn tree_string(&self) -> String {
        generate_tree_string(self.file_paths)
    }
}

/// Persists the packed files.
pub trait OutputWriter: Send + Sync {
    fn write(&self, ctx: &OutputContext<'_>) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tree_string_covers_skipped_files() {
        let config = PackConfig::default();
        let paths = vec![
            RelativePath::new("src/main.rs").unwrap(),
            RelativePath::new("logo.png").unwrap(),
        ];
        let files = vec![PackedFile {
            path: paths[0].clone(),
            content: "fn main() {}".to_string(),
        }];
        let ctx = OutputContext {
            root_dir: Path::new("/project"),
            config: &config,
            files: &files,
            file_paths: &paths,
        };
        assert_eq!(ctx.tree_string(), "src/\n  main.rs\nlogo.png");
    }
}
