//! Incremental prefix-tree growth over anchor suffixes.
//!
//! The root groups suffixes by their first token. Each growth round then looks
//! at every non-terminal leaf, regroups its members by the next token they
//! would add, and attaches a child for every group that clears the support
//! threshold. Members whose next token is rejected gather in a "stop" group
//! keyed by the leaf's own unit; that group becomes a terminal child of the
//! same depth.

use std::collections::HashMap;
use std::rc::Rc;

use generational_arena::Index;
use itertools::Itertools;
use tracing::{debug, instrument, trace};

use crate::domain::arena::{NodeData, UnitTree};
use crate::domain::policy::{MiningPolicy, StopReason};
use crate::domain::token::Suffix;

/// Suffixes sharing one unit key.
#[derive(Debug, Clone)]
pub struct CandidateGroup {
    pub key: String,
    pub members: Vec<Suffix>,
}

/// Group keyed members, preserving the order in which keys are first seen.
pub fn group_candidates<I>(keyed: I) -> Vec<CandidateGroup>
where
    I: IntoIterator<Item = (String, Suffix)>,
{
    let mut slots: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<CandidateGroup> = Vec::new();
    for (key, member) in keyed {
        match slots.get(&key) {
            Some(&slot) => groups[slot].members.push(member),
            None => {
                slots.insert(key.clone(), groups.len());
                groups.push(CandidateGroup {
                    key,
                    members: vec![member],
                });
            }
        }
    }
    groups
}

/// What one growth round did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoundOutcome {
    /// Leaves examined
    pub grown: usize,
    /// New nodes attached
    pub created: usize,
    /// Leaves marked terminal because no group cleared the threshold
    pub exhausted: usize,
}

impl RoundOutcome {
    pub fn made_progress(&self) -> bool {
        self.created > 0
    }
}

pub struct TreeBuilder {
    policy: MiningPolicy,
}

impl TreeBuilder {
    pub fn new(policy: MiningPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &MiningPolicy {
        &self.policy
    }

    /// Create the root and its depth-1 children.
    ///
    /// Empty suffixes have no first token; they stay on the root and never
    /// form a unit phrase.
    #[instrument(level = "debug", skip(self, suffixes), fields(count = suffixes.len()))]
    pub fn plant(&self, suffixes: Vec<Suffix>) -> UnitTree {
        let groups = group_candidates(
            suffixes
                .iter()
                .filter_map(|s| s.first().map(|first| (first.text.clone(), Rc::clone(s)))),
        );
        let mut tree = UnitTree::new(suffixes);
        let root = tree.root();

        for group in groups {
            if group.members.len() < self.policy.min_support {
                continue;
            }
            let unit_tag = group.members[0][0].tag.clone();
            tree.insert_node(
                NodeData {
                    unit: group.key,
                    unit_tag,
                    members: group.members,
                    depth: 1,
                    terminal: false,
                },
                root,
            );
        }
        debug!(children = tree.len() - 1, "planted root");
        tree
    }

    /// Run one growth round over every non-terminal leaf.
    ///
    /// Children are attached only after all leaves were examined, so nodes
    /// created here are first grown in the next round.
    #[instrument(level = "debug", skip(self, tree))]
    pub fn grow_round(&self, tree: &mut UnitTree) -> RoundOutcome {
        let root = tree.root();
        let candidates: Vec<Index> = tree
            .leaves()
            .filter(|(idx, node)| *idx != root && !node.data.terminal)
            .map(|(idx, _)| idx)
            .collect();

        let mut outcome = RoundOutcome {
            grown: candidates.len(),
            ..RoundOutcome::default()
        };
        let mut pending: Vec<(Index, Vec<NodeData>)> = Vec::new();

        for idx in candidates {
            let Some(node) = tree.get_node(idx) else {
                continue;
            };
            let children: Vec<NodeData> = self
                .regroup(&node.data)
                .into_iter()
                .filter(|group| group.members.len() >= self.policy.min_support)
                .map(|group| self.child_data(&node.data, group))
                .collect();

            if children.is_empty() {
                if let Some(node) = tree.get_node_mut(idx) {
                    node.data.terminal = true;
                }
                outcome.exhausted += 1;
            } else {
                pending.push((idx, children));
            }
        }

        for (parent, children) in pending {
            for child in children {
                tree.insert_node(child, parent);
                outcome.created += 1;
            }
        }
        debug!(?outcome, "growth round finished");
        outcome
    }

    /// Plant and grow until a round creates nothing.
    #[instrument(level = "debug", skip(self, suffixes))]
    pub fn build(&self, suffixes: Vec<Suffix>) -> UnitTree {
        let mut tree = self.plant(suffixes);
        while self.grow_round(&mut tree).made_progress() {}
        tree
    }

    /// Key every member by the unit it would reach with its next token, or by
    /// the parent's own unit when that token is rejected.
    fn regroup(&self, parent: &NodeData) -> Vec<CandidateGroup> {
        let mut stops: HashMap<StopReason, usize> = HashMap::new();
        let keyed = parent.members.iter().map(|member| {
            let next = member.get(parent.depth);
            let key = match self.policy.stop_reason(&parent.unit, next) {
                None => member[..=parent.depth].iter().map(|t| t.text.as_str()).join(" "),
                Some(reason) => {
                    *stops.entry(reason).or_default() += 1;
                    parent.unit.clone()
                }
            };
            (key, Rc::clone(member))
        });
        let groups = group_candidates(keyed);
        trace!(unit = %parent.unit, ?stops, groups = groups.len(), "regrouped leaf");
        groups
    }

    fn child_data(&self, parent: &NodeData, group: CandidateGroup) -> NodeData {
        let stop = group.key == parent.unit;
        let depth = if stop { parent.depth } else { parent.depth + 1 };
        let unit_tag = group
            .members
            .first()
            .map(|first| first.iter().take(depth).map(|t| t.tag.as_str()).join(" "))
            .unwrap_or_default();
        NodeData {
            unit: group.key,
            unit_tag,
            members: group.members,
            depth,
            terminal: stop,
        }
    }
}
