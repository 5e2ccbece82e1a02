//! Directory traversal and tree summary
//!
//! - `DirectoryWalker`: collects the packable files under a root, in listing order
//! - `build_tree` / `render_tree`: turn the flat path list into the indented
//!   "Repository Structure" text

mod node;
mod render;
mod walker;

pub use node::{TreeNode, build_tree};
pub use render::{compare_nodes, generate_tree_string, render_tree, sort_tree};
pub use walker::DirectoryWalker;
