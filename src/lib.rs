//! Repopack - pack a repository into a single text document for LLM consumption

pub mod config;
pub mod error;
pub mod filter;
pub mod output;
pub mod packager;
pub mod path;
pub mod pattern;
pub mod process;
pub mod security;
pub mod tree;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use config::{ConfigLayer, IgnoreLayer, OutputLayer, PackConfig, resolve_config};
pub use error::{PackError, Result};
pub use filter::{FsIgnoreFileReader, IgnoreFileReader, IgnoreFilter, IncludeFilter};
pub use output::{
    OutputContext, OutputWriter, PackedFile, TextOutputWriter, print_json, print_summary,
};
pub use packager::{Collaborators, PackResult, Packager, pack};
pub use path::RelativePath;
pub use pattern::{GlobCompiler, PathMatcher, PatternCompiler, PatternSet};
pub use process::{ContentProcessor, FileContentProcessor};
pub use security::{RegexSecretScanner, SecretFinding, SecretScanResult, SecretScanner};
pub use tree::{DirectoryWalker, TreeNode, build_tree, generate_tree_string, render_tree};
