//! Deterministic text rendering of the summary tree

use std::cmp::Ordering;

use super::node::{TreeNode, build_tree};

const INDENT: &str = "  ";

/// Directories first, then names compared case-insensitively with a
/// byte-wise tiebreak so the order is total.
pub fn compare_nodes(a: &TreeNode, b: &TreeNode) -> Ordering {
    b.is_dir
        .cmp(&a.is_dir)
        .then_with(|| compare_names(&a.name, &b.name))
}

fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Sort every node's children in place, recursively.
pub fn sort_tree(node: &mut TreeNode) {
    node.children.sort_by(compare_nodes);
    for child in &mut node.children {
        sort_tree(child);
    }
}

/// Render the tree below `root` (the root itself is not printed).
///
/// One line per node, two spaces of indentation per level, directories
/// suffixed with `/`.
pub fn render_tree(root: &TreeNode) -> String {
    let mut output = String::new();
    render_children(root, 0, &mut output);
    output.trim().to_string()
}

fn render_children(node: &TreeNode, depth: usize, output: &mut String) {
    let mut children: Vec<&TreeNode> = node.children.iter().collect();
    children.sort_by(|a, b| compare_nodes(a, b));

    for child in children {
        output.push_str(&INDENT.repeat(depth));
        output.push_str(&child.name);
        if child.is_dir {
            output.push('/');
        }
        output.push('\n');
        if child.is_dir {
            render_children(child, depth + 1, output);
        }
    }
}

/// Build and render in one step.
pub fn generate_tree_string<I, S>(paths: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    render_tree(&build_tree(paths))
}
