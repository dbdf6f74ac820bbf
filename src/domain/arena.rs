//! Arena-backed record trees with index-based parent references

use std::fmt;

use generational_arena::{Arena, Index};
use serde::{Deserialize, Serialize};
use termtree::Tree;
use tracing::instrument;

use crate::domain::line::GedLine;

/// Tree node in the arena-based record structure.
#[derive(Debug)]
pub struct RecordNode {
    /// Parsed line data for this node
    pub line: GedLine,
    /// Index of the parent node in the arena, None for the root.
    /// Non-owning, used only for upward traversal.
    pub parent: Option<Index>,
    /// Indices of child nodes in the arena, in document order
    pub children: Vec<Index>,
    /// Set once no further lines can attach beneath this node
    pub finished: bool,
}

impl fmt::Display for RecordNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.line)
    }
}

/// Arena-based tree holding one top-level record and its subtree.
///
/// Uses a generational arena for memory-safe parent references and O(1)
/// lookups. Each tree represents one complete top-level record; emitting a
/// record is a move of the whole `RecordTree`.
#[derive(Debug)]
pub struct RecordTree {
    /// Arena storage for all tree nodes
    arena: Arena<RecordNode>,
    /// Index of the root node, None for empty trees
    root: Option<Index>,
}

impl Default for RecordTree {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordTree {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
        }
    }

    #[instrument(level = "trace", skip(self))]
    pub fn insert_node(&mut self, line: GedLine, parent: Option<Index>) -> Index {
        let node = RecordNode {
            line,
            parent,
            children: Vec::new(),
            finished: false,
        };
        let node_idx = self.arena.insert(node);

        if let Some(parent_idx) = parent {
            if let Some(parent) = self.arena.get_mut(parent_idx) {
                parent.children.push(node_idx);
            }
        } else {
            self.root = Some(node_idx);
        }

        node_idx
    }

    #[instrument(level = "trace", skip(self))]
    pub fn get_node(&self, idx: Index) -> Option<&RecordNode> {
        self.arena.get(idx)
    }

    #[instrument(level = "trace", skip(self))]
    pub fn get_node_mut(&mut self, idx: Index) -> Option<&mut RecordNode> {
        self.arena.get_mut(idx)
    }

    #[instrument(level = "trace", skip(self))]
    pub fn root(&self) -> Option<Index> {
        self.root
    }

    /// Tag of the governing top-level line, if the tree is non-empty.
    pub fn root_tag(&self) -> Option<&str> {
        self.root
            .and_then(|idx| self.get_node(idx))
            .map(|node| node.line.tag.as_str())
    }

    /// Mark the root as complete: no further lines can attach beneath it.
    #[instrument(level = "debug", skip(self))]
    pub fn mark_finished(&mut self) {
        if let Some(root) = self.root {
            if let Some(node) = self.arena.get_mut(root) {
                node.finished = true;
            }
        }
    }

    pub fn is_finished(&self) -> bool {
        self.root
            .and_then(|idx| self.get_node(idx))
            .is_some_and(|node| node.finished)
    }

    #[instrument(level = "trace", skip(self))]
    pub fn iter(&self) -> TreeIterator {
        TreeIterator::new(self)
    }

    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        if let Some(root) = self.root {
            self.calculate_depth(root)
        } else {
            0
        }
    }

    #[instrument(level = "trace", skip(self))]
    fn calculate_depth(&self, node_idx: Index) -> usize {
        if let Some(node) = self.get_node(node_idx) {
            1 + node
                .children
                .iter()
                .map(|&child| self.calculate_depth(child))
                .max()
                .unwrap_or(0)
        } else {
            0
        }
    }

    /// Export the tree into the owned, serde-friendly [`TreeData`] shape.
    ///
    /// Returns `None` for an empty tree.
    #[instrument(level = "debug", skip(self))]
    pub fn to_data(&self) -> Option<TreeData> {
        self.root.and_then(|root| self.export_node(root))
    }

    fn export_node(&self, node_idx: Index) -> Option<TreeData> {
        let node = self.get_node(node_idx)?;
        let children = node
            .children
            .iter()
            .filter_map(|&child| self.export_node(child))
            .collect();
        Some(TreeData {
            level: node.line.level,
            pointer: node.line.pointer.clone(),
            tag: node.line.tag.clone(),
            data: node.line.data.clone(),
            children,
        })
    }

    /// Render the tree for terminal display.
    #[instrument(level = "debug", skip(self))]
    pub fn to_display_tree(&self) -> Option<Tree<String>> {
        self.root.and_then(|root| self.display_node(root))
    }

    fn display_node(&self, node_idx: Index) -> Option<Tree<String>> {
        let node = self.get_node(node_idx)?;
        let mut tree = Tree::new(node.to_string());
        for &child in &node.children {
            if let Some(subtree) = self.display_node(child) {
                tree.push(subtree);
            }
        }
        Some(tree)
    }
}

/// Serializable view of a record tree, one node per level of nesting.
///
/// This is the emitted wire shape: `pointer` is omitted when absent,
/// `data` when empty, `children` when the node is a leaf. It round-trips
/// through JSON without loss.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeData {
    pub level: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pointer: Option<String>,
    pub tag: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub data: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeData>,
}

pub struct TreeIterator<'a> {
    tree: &'a RecordTree,
    stack: Vec<Index>,
}

impl<'a> TreeIterator<'a> {
    fn new(tree: &'a RecordTree) -> Self {
        let mut stack = Vec::new();
        if let Some(root) = tree.root() {
            stack.push(root);
        }
        Self { tree, stack }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (Index, &'a RecordNode);

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.tree.get_node(current_idx) {
                // Push children in reverse order for document-order traversal
                for &child in node.children.iter().rev() {
                    self.stack.push(child);
                }
                return Some((current_idx, node));
            }
        }
        None
    }
}
