//! Flattened directory tree shown in the left pane.
//!
//! Nodes are stored in display order; expanding a node inserts its
//! subdirectories right after it, collapsing removes every deeper node that
//! follows it. Subdirectories are read only when a node is expanded.

use crate::error::{AppError, Result};
use crate::file_utils::{self, PathExt};
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryNode {
    pub path: PathBuf,
    pub name: String,
    pub depth: usize,
    pub expanded: bool,
    pub has_children: bool,
}

impl DirectoryNode {
    fn new(path: PathBuf, depth: usize) -> Self {
        Self {
            name: file_utils::display_name(&path),
            has_children: file_utils::has_subdirectories(&path),
            path,
            depth,
            expanded: false,
        }
    }
}

pub struct DirectoryTree {
    nodes: Vec<DirectoryNode>,
    selected: Option<usize>,
}

impl DirectoryTree {
    /// Creates a tree rooted at `root`, expanded and selected.
    pub fn new(root: PathBuf) -> Self {
        let mut tree = Self {
            nodes: vec![DirectoryNode::new(root, 0)],
            selected: Some(0),
        };
        if let Err(e) = tree.expand(0) {
            log::warn!("Failed to expand root directory: {}", e);
        }
        tree
    }

    pub fn nodes(&self) -> &[DirectoryNode] {
        &self.nodes
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn root(&self) -> &Path {
        &self.nodes[0].path
    }

    fn node(&self, index: usize) -> Result<&DirectoryNode> {
        self.nodes
            .get(index)
            .ok_or_else(|| AppError::DirectoryScan(format!("No directory at row {}", index)))
    }

    /// End (exclusive) of the rows below `index` that belong to its subtree.
    fn subtree_end(&self, index: usize) -> usize {
        let depth = self.nodes[index].depth;
        self.nodes[index + 1..]
            .iter()
            .position(|node| node.depth <= depth)
            .map(|offset| index + 1 + offset)
            .unwrap_or(self.nodes.len())
    }

    pub fn expand(&mut self, index: usize) -> Result<()> {
        let node = self.node(index)?;
        if node.expanded {
            return Ok(());
        }

        let depth = node.depth + 1;
        let children: Vec<DirectoryNode> = file_utils::list_subdirectories(&node.path)?
            .into_iter()
            .map(|path| DirectoryNode::new(path, depth))
            .collect();
        debug!(
            "Expanding {} ({} subdirectories)",
            node.path.format_for_log(),
            children.len()
        );

        let inserted = children.len();
        let node = &mut self.nodes[index];
        node.expanded = true;
        node.has_children = inserted > 0;
        self.nodes.splice(index + 1..index + 1, children);

        if let Some(selected) = self.selected.as_mut()
            && *selected > index
        {
            *selected += inserted;
        }
        Ok(())
    }

    pub fn collapse(&mut self, index: usize) -> Result<()> {
        if !self.node(index)?.expanded {
            return Ok(());
        }

        let end = self.subtree_end(index);
        self.nodes.drain(index + 1..end);
        self.nodes[index].expanded = false;

        self.selected = self.selected.map(|selected| {
            if selected > index && selected < end {
                index
            } else if selected >= end {
                selected - (end - index - 1)
            } else {
                selected
            }
        });
        Ok(())
    }

    pub fn toggle(&mut self, index: usize) -> Result<()> {
        if self.node(index)?.expanded {
            self.collapse(index)
        } else {
            self.expand(index)
        }
    }

    /// Selects the row at `index` and returns its path.
    pub fn select(&mut self, index: usize) -> Option<PathBuf> {
        let path = self.nodes.get(index)?.path.clone();
        self.selected = Some(index);
        Some(path)
    }

    /// Expands every ancestor of `path` and selects it.
    ///
    /// Returns `None`, with nothing selected, if `path` lies outside the
    /// tree root or under a directory the tree does not list.
    pub fn reveal(&mut self, path: &Path) -> Result<Option<usize>> {
        let index = self.find_or_expand(path)?;
        self.selected = index;
        Ok(index)
    }

    fn find_or_expand(&mut self, path: &Path) -> Result<Option<usize>> {
        let canonical = |p: &Path| fs::canonicalize(p).unwrap_or_else(|_| p.to_path_buf());
        let root = canonical(self.root());
        let target = canonical(path);
        let Ok(relative) = target.strip_prefix(&root) else {
            return Ok(None);
        };

        let mut index = 0;
        let mut current = self.root().to_path_buf();
        for component in relative.components() {
            self.expand(index)?;
            current.push(component);
            let end = self.subtree_end(index);
            let Some(child) = (index + 1..end).find(|&i| self.nodes[i].path == current) else {
                debug!("{} is not listed in the tree", current.format_for_log());
                return Ok(None);
            };
            index = child;
        }
        Ok(Some(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    /// root/{a/{a1,a2},b/{b1},c}
    fn fixture() -> TempDir {
        let dir = TempDir::new().unwrap();
        for sub in ["a/a1", "a/a2", "b/b1", "c"] {
            fs::create_dir_all(dir.path().join(sub)).unwrap();
        }
        dir
    }

    fn names(tree: &DirectoryTree) -> Vec<&str> {
        tree.nodes().iter().map(|n| n.name.as_str()).collect()
    }

    fn selected_path(tree: &DirectoryTree) -> Option<PathBuf> {
        tree.selected_index().map(|i| tree.nodes()[i].path.clone())
    }

    #[test]
    fn test_new_tree_expands_root() {
        let dir = fixture();
        let tree = DirectoryTree::new(dir.path().to_path_buf());

        assert_eq!(&names(&tree)[1..], &["a", "b", "c"]);
        assert!(tree.nodes()[0].expanded);
        assert!(tree.nodes()[1].has_children);
        assert!(!tree.nodes()[3].has_children);
        assert_eq!(tree.selected_index(), Some(0));
        assert_eq!(tree.nodes()[1].depth, 1);
    }

    #[test]
    fn test_expand_and_collapse() {
        let dir = fixture();
        let mut tree = DirectoryTree::new(dir.path().to_path_buf());

        tree.expand(1).unwrap();
        assert_eq!(&names(&tree)[1..], &["a", "a1", "a2", "b", "c"]);
        assert_eq!(tree.nodes()[2].depth, 2);

        tree.collapse(1).unwrap();
        assert_eq!(&names(&tree)[1..], &["a", "b", "c"]);

        tree.toggle(2).unwrap();
        assert_eq!(&names(&tree)[1..], &["a", "b", "b1", "c"]);
        tree.toggle(2).unwrap();
        assert!(!tree.nodes()[2].expanded);
    }

    #[test]
    fn test_selection_follows_node() {
        let dir = fixture();
        let mut tree = DirectoryTree::new(dir.path().to_path_buf());

        let c = tree.select(3).unwrap();
        tree.expand(1).unwrap();
        assert_eq!(selected_path(&tree), Some(c.clone()));

        tree.collapse(1).unwrap();
        assert_eq!(selected_path(&tree), Some(c));
    }

    #[test]
    fn test_collapse_over_selection_selects_parent() {
        let dir = fixture();
        let mut tree = DirectoryTree::new(dir.path().to_path_buf());
        tree.expand(1).unwrap();
        tree.select(3);

        tree.collapse(1).unwrap();

        assert_eq!(tree.selected_index(), Some(1));
        assert_eq!(selected_path(&tree), Some(dir.path().join("a")));
    }

    #[test]
    fn test_reveal_nested_path() {
        let dir = fixture();
        let mut tree = DirectoryTree::new(dir.path().to_path_buf());

        let index = tree.reveal(&dir.path().join("b").join("b1")).unwrap();

        assert_eq!(index, Some(3));
        assert_eq!(selected_path(&tree), Some(dir.path().join("b/b1")));
        assert_eq!(&names(&tree)[1..], &["a", "b", "b1", "c"]);
    }

    #[test]
    fn test_reveal_outside_root() {
        let dir = fixture();
        let other = TempDir::new().unwrap();
        let mut tree = DirectoryTree::new(dir.path().to_path_buf());

        assert_eq!(tree.reveal(other.path()).unwrap(), None);
        assert_eq!(tree.selected_index(), None);
    }

    #[test]
    fn test_reveal_resolves_parent_components() {
        let dir = fixture();
        let mut tree = DirectoryTree::new(dir.path().to_path_buf());

        let index = tree.reveal(&dir.path().join("a").join("..").join("b")).unwrap();

        assert_eq!(index, Some(2));
        assert_eq!(selected_path(&tree), Some(dir.path().join("b")));
    }

    #[test]
    fn test_reveal_under_hidden_directory_clears_selection() {
        let dir = fixture();
        fs::create_dir_all(dir.path().join(".cache/pics")).unwrap();
        let mut tree = DirectoryTree::new(dir.path().to_path_buf());
        tree.select(3);

        assert_eq!(tree.reveal(&dir.path().join(".cache/pics")).unwrap(), None);
        assert_eq!(tree.selected_index(), None);
        assert!(!names(&tree).contains(&".cache"));
    }

    #[test]
    fn test_out_of_range_rows() {
        let dir = fixture();
        let mut tree = DirectoryTree::new(dir.path().to_path_buf());

        assert!(tree.expand(42).is_err());
        assert_eq!(tree.select(42), None);
    }
}
