//! Slice tagged sentences into the suffixes that follow each anchor token.

use std::rc::Rc;

use crate::domain::token::{Suffix, TaggedToken};

/// One suffix per anchor occurrence, each starting right after its anchor and
/// running to the end of the sentence. Later anchors give shorter suffixes; an
/// anchor in last position gives an empty one.
pub fn split_by_anchor(sequence: &[TaggedToken], anchor_tag: &str) -> Vec<Suffix> {
    sequence
        .iter()
        .enumerate()
        .filter(|(_, token)| token.tag == anchor_tag)
        .map(|(i, _)| Rc::from(&sequence[i + 1..]))
        .collect()
}
