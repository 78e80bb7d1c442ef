//! Domain layer: the mining algorithm
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod builder;
pub mod error;
pub mod extract;
pub mod filter;
pub mod policy;
pub mod render;
pub mod splitter;
pub mod token;

pub use arena::{NodeData, NodeId, TreeNode, UnitTree};
pub use builder::{group_candidates, CandidateGroup, RoundOutcome, TreeBuilder};
pub use error::{DomainError, DomainResult};
pub use extract::{extract_rows, UnitRow};
pub use filter::{is_balanced, AcceptanceFilter, Rejection};
pub use policy::{MiningPolicy, StopReason};
pub use render::{render_trace, TreeNodeConvert};
pub use splitter::split_by_anchor;
pub use token::{parse_sequence, Suffix, TaggedSequence, TaggedToken};
