//! Human-readable views of a unit tree.
//!
//! `render_trace` gives the tab-indented per-round snapshot written to the
//! diagnostic trace files; `TreeNodeConvert` builds a `termtree` for the
//! terminal.

use generational_arena::Index;
use termtree::Tree;
use tracing::instrument;

use crate::domain::arena::{TreeNode, UnitTree};

/// One line per node in pre-order, children in attachment order:
/// `<tabs><id>/<depth>:【<unit>】【<unit_tag>】 - <count>/<terminal>`.
#[instrument(level = "debug", skip(tree), fields(nodes = tree.len()))]
pub fn render_trace(tree: &UnitTree) -> Vec<String> {
    tree.iter().map(|(_, node)| trace_line(node)).collect()
}

pub fn trace_line(node: &TreeNode) -> String {
    let data = &node.data;
    format!(
        "{}{}/{}:【{}】【{}】 - {}/{}",
        "\t".repeat(data.depth),
        node.id,
        data.depth,
        data.unit,
        data.unit_tag,
        data.support(),
        data.terminal
    )
}

pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> Tree<String>;
}

impl TreeNodeConvert for UnitTree {
    fn to_tree_string(&self) -> Tree<String> {
        fn label(node: &TreeNode) -> String {
            if node.parent.is_none() {
                return format!("<root> x{}", node.data.support());
            }
            let marker = if node.data.terminal { " ■" } else { "" };
            format!("{}{}", node.data, marker)
        }

        fn build_tree(tree: &UnitTree, node_idx: Index, parent_tree: &mut Tree<String>) {
            if let Some(node) = tree.get_node(node_idx) {
                for &child_idx in &node.children {
                    if let Some(child) = tree.get_node(child_idx) {
                        let mut child_tree = Tree::new(label(child));
                        build_tree(tree, child_idx, &mut child_tree);
                        parent_tree.push(child_tree);
                    }
                }
            }
        }

        let mut root = Tree::new(label(self.root_node()));
        build_tree(self, self.root(), &mut root);
        root
    }
}
