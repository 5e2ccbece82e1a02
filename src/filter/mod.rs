//! File selection filters
//!
//! Two independent predicates decide whether a walked file is packed:
//!
//! - `IgnoreFilter`: union of built-in defaults, ignore files and custom patterns
//! - `IncludeFilter`: optional allow-list, vacuous when empty
//!
//! The walker consults the ignore filter first; a file must pass both.

mod defaults;
mod ignore_file;
mod ignore_filter;
mod include_filter;

pub use defaults::DEFAULT_IGNORE_PATTERNS;
pub use ignore_filter::{IgnoreFilter, collect_ignore_patterns};
pub use ignore_file::{
    FsIgnoreFileReader, GITIGNORE_FILE, IgnoreFileReader, REPOPACK_IGNORE_FILE, parse_ignore_file,
};
pub use include_filter::{IncludeFilter, collect_include_patterns, make_path_relative};
