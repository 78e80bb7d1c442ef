//! Acceptance filter applied to mined rows.
//!
//! Growth uses a loose support threshold; acceptance uses a strict one plus a
//! set of syntactic checks typical of real unit abbreviations.

use std::collections::HashSet;

use tracing::{debug, instrument};

use crate::domain::extract::UnitRow;
use crate::domain::policy::MiningPolicy;

/// First check a row failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rejection {
    LowCount,
    UnbalancedBrackets,
    AllLongTokens,
    /// Empty unit or a unit starting with a digit
    LeadingDigit,
    ForbiddenWord,
    ForbiddenTag,
}

pub struct AcceptanceFilter {
    min_count: usize,
    forbidden_words: Vec<String>,
    forbidden_tags: HashSet<String>,
}

impl AcceptanceFilter {
    pub fn new(policy: &MiningPolicy) -> Self {
        Self {
            min_count: policy.min_count,
            forbidden_words: policy.forbidden_words.iter().map(|w| w.to_lowercase()).collect(),
            forbidden_tags: policy.forbidden_tags.clone(),
        }
    }

    pub fn rejection(&self, row: &UnitRow) -> Option<Rejection> {
        let unit = row.unit.as_str();
        if row.count < self.min_count {
            return Some(Rejection::LowCount);
        }
        if !(is_balanced(unit, '(', ')') && is_balanced(unit, '[', ']') && is_balanced(unit, '{', '}'))
        {
            return Some(Rejection::UnbalancedBrackets);
        }
        if unit.split(' ').all(|token| token.chars().count() >= 4) {
            return Some(Rejection::AllLongTokens);
        }
        match unit.chars().next() {
            Some(first) if !first.is_numeric() => {}
            _ => return Some(Rejection::LeadingDigit),
        }
        let lowered = unit.to_lowercase();
        if self.forbidden_words.iter().any(|w| lowered.contains(w.as_str())) {
            return Some(Rejection::ForbiddenWord);
        }
        if row.tag.split(' ').any(|tag| self.forbidden_tags.contains(tag)) {
            return Some(Rejection::ForbiddenTag);
        }
        None
    }

    pub fn accepts(&self, row: &UnitRow) -> bool {
        self.rejection(row).is_none()
    }

    /// Keep accepted rows in their original order.
    #[instrument(level = "debug", skip(self, rows), fields(count = rows.len()))]
    pub fn apply(&self, rows: &[UnitRow]) -> Vec<UnitRow> {
        let accepted: Vec<UnitRow> = rows.iter().filter(|row| self.accepts(row)).cloned().collect();
        debug!(accepted = accepted.len(), "filtered rows");
        accepted
    }
}

/// Running count of `open` minus `close` never drops below zero and ends at zero.
pub fn is_balanced(text: &str, open: char, close: char) -> bool {
    let mut depth: i64 = 0;
    for c in text.chars() {
        if c == open {
            depth += 1;
        } else if c == close {
            depth -= 1;
        }
        if depth < 0 {
            return false;
        }
    }
    depth == 0
}
