use generational_arena::{Arena, Index};
use std::fmt;
use tracing::instrument;

use crate::domain::token::Suffix;

/// Creation-order id of a node. The root is 0.
pub type NodeId = usize;

/// Data payload for tree nodes representing a candidate unit phrase.
#[derive(Debug, Clone)]
pub struct NodeData {
    /// Surface tokens of the prefix joined by single spaces
    pub unit: String,
    /// Tags aligned token-for-token with `unit`
    pub unit_tag: String,
    /// Suffixes sharing this prefix
    pub members: Vec<Suffix>,
    /// Tokens consumed to reach this node
    pub depth: usize,
    /// Growth has stopped here for good
    pub terminal: bool,
}

impl NodeData {
    /// Support of this node's unit phrase.
    pub fn support(&self) -> usize {
        self.members.len()
    }
}

impl fmt::Display for NodeData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}] x{}", self.unit, self.unit_tag, self.support())
    }
}

/// Tree node in the arena-based prefix tree.
#[derive(Debug)]
pub struct TreeNode {
    pub id: NodeId,
    pub data: NodeData,
    /// Index of parent node in the arena, None for the root
    pub parent: Option<Index>,
    /// Indices of child nodes in attachment order
    pub children: Vec<Index>,
}

impl TreeNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Arena-based prefix tree of unit phrases.
///
/// Nodes are never removed, so arena indices stay valid for the lifetime of
/// the tree and `created` doubles as the id-to-index table.
#[derive(Debug)]
pub struct UnitTree {
    arena: Arena<TreeNode>,
    root: Index,
    /// Node indices in creation order; position == node id
    created: Vec<Index>,
}

impl UnitTree {
    /// New tree holding only the root, which keeps every suffix for bookkeeping.
    pub fn new(members: Vec<Suffix>) -> Self {
        let mut arena = Arena::new();
        let root = arena.insert(TreeNode {
            id: 0,
            data: NodeData {
                unit: String::new(),
                unit_tag: String::new(),
                members,
                depth: 0,
                terminal: false,
            },
            parent: None,
            children: Vec::new(),
        });
        Self {
            arena,
            root,
            created: vec![root],
        }
    }

    #[instrument(level = "trace", skip(self, data), fields(unit = %data.unit))]
    pub fn insert_node(&mut self, data: NodeData, parent: Index) -> Index {
        let node = TreeNode {
            id: self.created.len(),
            data,
            parent: Some(parent),
            children: Vec::new(),
        };
        let node_idx = self.arena.insert(node);
        self.created.push(node_idx);

        if let Some(parent) = self.arena.get_mut(parent) {
            parent.children.push(node_idx);
        }

        node_idx
    }

    pub fn get_node(&self, idx: Index) -> Option<&TreeNode> {
        self.arena.get(idx)
    }

    pub fn get_node_mut(&mut self, idx: Index) -> Option<&mut TreeNode> {
        self.arena.get_mut(idx)
    }

    pub fn node_by_id(&self, id: NodeId) -> Option<&TreeNode> {
        self.created.get(id).and_then(|&idx| self.arena.get(idx))
    }

    pub fn root(&self) -> Index {
        self.root
    }

    pub fn root_node(&self) -> &TreeNode {
        &self.arena[self.root]
    }

    pub fn len(&self) -> usize {
        self.created.len()
    }

    pub fn is_empty(&self) -> bool {
        self.created.is_empty()
    }

    /// Pre-order traversal, children in attachment order.
    pub fn iter(&self) -> TreeIterator {
        TreeIterator::new(self)
    }

    /// All nodes in creation (id) order.
    pub fn iter_created(&self) -> impl Iterator<Item = (Index, &TreeNode)> + '_ {
        self.created
            .iter()
            .filter_map(move |&idx| self.arena.get(idx).map(|node| (idx, node)))
    }

    /// Leaf nodes in creation order, the root included while it has no children.
    pub fn leaves(&self) -> impl Iterator<Item = (Index, &TreeNode)> + '_ {
        self.iter_created().filter(|(_, node)| node.is_leaf())
    }

    /// Deepest unit phrase in tokens.
    #[instrument(level = "debug", skip(self))]
    pub fn max_depth(&self) -> usize {
        self.iter_created()
            .map(|(_, node)| node.data.depth)
            .max()
            .unwrap_or(0)
    }
}

pub struct TreeIterator<'a> {
    tree: &'a UnitTree,
    stack: Vec<Index>,
}

impl<'a> TreeIterator<'a> {
    fn new(tree: &'a UnitTree) -> Self {
        Self {
            tree,
            stack: vec![tree.root()],
        }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (Index, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.tree.get_node(current_idx) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push(child);
                }
                return Some((current_idx, node));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::token::TaggedToken;
    use std::rc::Rc;

    fn data(unit: &str, depth: usize) -> NodeData {
        NodeData {
            unit: unit.to_string(),
            unit_tag: String::new(),
            members: vec![Rc::from(vec![TaggedToken::new("NN", unit)])],
            depth,
            terminal: false,
        }
    }

    // root
    // ├── a
    // │   └── a b
    // └── c
    #[test]
    fn given_nested_nodes_when_iterating_then_preorder_follows_attachment_order() {
        let mut tree = UnitTree::new(Vec::new());
        let a = tree.insert_node(data("a", 1), tree.root());
        let c = tree.insert_node(data("c", 1), tree.root());
        tree.insert_node(data("a b", 2), a);

        let units: Vec<_> = tree.iter().map(|(_, n)| n.data.unit.clone()).collect();
        assert_eq!(units, vec!["", "a", "a b", "c"]);

        let ids: Vec<_> = tree.iter_created().map(|(_, n)| n.id).collect();
        assert_eq!(ids, vec![0, 1, 2, 3]);

        let leaves: Vec<_> = tree.leaves().map(|(_, n)| n.data.unit.clone()).collect();
        assert_eq!(leaves, vec!["c", "a b"]);

        assert_eq!(tree.get_node(c).and_then(|n| n.parent), Some(tree.root()));
        assert_eq!(tree.node_by_id(3).map(|n| n.data.unit.as_str()), Some("a b"));
        assert_eq!(tree.max_depth(), 2);
        assert_eq!(tree.len(), 4);
    }

    #[test]
    fn given_fresh_tree_when_listing_leaves_then_root_is_the_only_leaf() {
        let tree = UnitTree::new(Vec::new());
        let leaves: Vec<_> = tree.leaves().map(|(idx, _)| idx).collect();
        assert_eq!(leaves, vec![tree.root()]);
        assert_eq!(tree.max_depth(), 0);
    }
}
