//! Hierarchical view of a flat list of relative paths

use serde::Serialize;

use crate::path::RelativePath;

/// A directory or file in the summary tree.
///
/// Only directories have children, and sibling names are unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeNode {
    pub name: String,
    pub is_dir: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    /// The synthetic root every built tree hangs from.
    pub fn root() -> Self {
        Self::dir("root")
    }

    pub fn dir(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_dir: true,
            children: Vec::new(),
        }
    }

    pub fn file(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_dir: false,
            children: Vec::new(),
        }
    }

    pub fn child(&self, name: &str) -> Option<&TreeNode> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Find or append the child `name`. A child reached as an intermediate
    /// segment becomes a directory even if it was first seen as a file.
    fn descend(&mut self, name: &str, is_dir: bool) -> &mut TreeNode {
        let index = match self.children.iter().position(|c| c.name == name) {
            Some(i) => i,
            None => {
                self.children.push(if is_dir {
                    TreeNode::dir(name)
                } else {
                    TreeNode::file(name)
                });
                self.children.len() - 1
            }
        };
        let child = &mut self.children[index];
        if is_dir {
            child.is_dir = true;
        }
        child
    }

    /// Number of files below this node.
    pub fn file_count(&self) -> usize {
        self.children
            .iter()
            .map(|c| if c.is_dir { c.file_count() } else { 1 })
            .sum()
    }
}

/// Build a tree from `/`-separated relative paths.
///
/// Children keep first-seen order; sorting happens at render time.
pub fn build_tree<I, S>(paths: I) -> TreeNode
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut root = TreeNode::root();
    for path in paths {
        let segments: Vec<&str> = path
            .as_ref()
            .split(RelativePath::SEPARATOR)
            .filter(|s| !s.is_empty())
            .collect();
        let last = segments.len().saturating_sub(1);
        let mut node = &mut root;
        for (i, segment) in segments.iter().enumerate() {
            node = node.descend(segment, i < last);
        }
    }
    root
}
