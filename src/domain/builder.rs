//! Incremental attachment of parsed lines to a growing record forest

use generational_arena::Index;
use tracing::{debug, instrument};

use crate::domain::arena::RecordTree;
use crate::domain::line::GedLine;

/// Attaches parsed lines one at a time, keeping the most recently attached
/// node as the anchor for the next line.
///
/// Exactly one tree is in progress at any time. A level-0 line closes the
/// tree in progress and roots the next one; [`TreeBuilder::finish`] closes
/// the last. One builder per logical document.
#[derive(Debug)]
pub struct TreeBuilder {
    tree: Option<RecordTree>,
    current: Option<Index>,
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self {
            tree: None,
            current: None,
        }
    }

    /// Attach one parsed line.
    ///
    /// Returns the previous tree when `line` starts a new top-level record
    /// and thereby completes it. Level jumps of more than +1 attach beneath
    /// the most recent node with a lower level, pass-through.
    #[instrument(level = "trace", skip(self))]
    pub fn attach(&mut self, line: GedLine) -> Option<RecordTree> {
        // level 0 always opens a new record
        if line.level == 0 {
            return self.start_tree(line);
        }

        match self.find_anchor(line.level) {
            Some(anchor) => {
                if let Some(tree) = self.tree.as_mut() {
                    let idx = tree.insert_node(line, Some(anchor));
                    self.current = Some(idx);
                }
                None
            }
            // no tree yet, or the walk ran past a root that never saw
            // level 0: the line opens a record of its own instead of
            // being dropped
            None => self.start_tree(line),
        }
    }

    /// Signal end of stream: the in-progress tree, if any, is complete.
    #[instrument(level = "debug", skip(self))]
    pub fn finish(&mut self) -> Option<RecordTree> {
        self.current = None;
        self.tree.take().map(|mut tree| {
            tree.mark_finished();
            tree
        })
    }

    /// Walk up from the current node to the first ancestor that can take a
    /// child at `level`.
    ///
    /// A greater level nests beneath the anchor; an equal level steps to
    /// the anchor's parent first and lands beside the anchor.
    fn find_anchor(&self, level: u32) -> Option<Index> {
        let tree = self.tree.as_ref()?;
        let mut anchor = self.current?;
        loop {
            let node = tree.get_node(anchor)?;
            if level > node.line.level {
                return Some(anchor);
            }
            anchor = node.parent?;
        }
    }

    fn start_tree(&mut self, line: GedLine) -> Option<RecordTree> {
        debug!("starting new top-level record: {}", line.tag);
        let done = self.tree.take().map(|mut tree| {
            tree.mark_finished();
            tree
        });

        let mut tree = RecordTree::new();
        let root = tree.insert_node(line, None);
        self.tree = Some(tree);
        self.current = Some(root);

        done
    }
}
