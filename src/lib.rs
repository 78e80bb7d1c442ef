//! Mining of measurement-unit phrases from part-of-speech tagged text.
//!
//! Sentences are split at every number (the anchor tag), the suffixes after
//! each number are grown into a prefix tree of frequent continuations, and
//! the tree's leaves are ranked and filtered into unit phrases.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
