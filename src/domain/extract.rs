//! Leaf extraction: one ranked row per finished unit phrase.

use std::fmt;

use tracing::instrument;

use crate::domain::arena::UnitTree;

/// One mined unit phrase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitRow {
    pub unit: String,
    pub tag: String,
    pub count: usize,
    pub level: usize,
}

impl UnitRow {
    pub fn new(unit: impl Into<String>, tag: impl Into<String>, count: usize, level: usize) -> Self {
        Self {
            unit: unit.into(),
            tag: tag.into(),
            count,
            level,
        }
    }
}

impl fmt::Display for UnitRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}] count={} level={}", self.unit, self.tag, self.count, self.level)
    }
}

/// Rows for every non-root leaf, by descending count. Ties keep leaf
/// creation order.
#[instrument(level = "debug", skip(tree))]
pub fn extract_rows(tree: &UnitTree) -> Vec<UnitRow> {
    let root = tree.root();
    let mut rows: Vec<UnitRow> = tree
        .leaves()
        .filter(|(idx, _)| *idx != root)
        .map(|(_, node)| {
            UnitRow::new(
                node.data.unit.clone(),
                node.data.unit_tag.clone(),
                node.data.support(),
                node.data.depth,
            )
        })
        .collect();
    rows.sort_by(|a, b| b.count.cmp(&a.count));
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::builder::TreeBuilder;
    use crate::domain::policy::MiningPolicy;
    use crate::domain::token::{Suffix, TaggedToken};

    fn repeat(text: &str, n: usize) -> Vec<Suffix> {
        (0..n)
            .map(|_| Suffix::from(vec![TaggedToken::new("NN", text)]))
            .collect()
    }

    #[test]
    fn given_empty_tree_when_extracting_then_no_rows() {
        let tree = TreeBuilder::new(MiningPolicy::default()).build(Vec::new());
        assert!(extract_rows(&tree).is_empty());
    }

    #[test]
    fn given_leaves_when_extracting_then_sorts_by_count_and_keeps_creation_order_on_ties() {
        let mut suffixes = repeat("h", 2);
        suffixes.extend(repeat("mL", 3));
        suffixes.extend(repeat("g", 2));
        let tree = TreeBuilder::new(MiningPolicy::default().with_min_support(2)).build(suffixes);

        let rows = extract_rows(&tree);

        assert_eq!(
            rows,
            vec![
                UnitRow::new("mL", "NN", 3, 1),
                UnitRow::new("h", "NN", 2, 1),
                UnitRow::new("g", "NN", 2, 1),
            ]
        );
    }
}
