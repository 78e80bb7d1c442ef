//! Thresholds and token rules shared by tree growth and the acceptance filter.

use std::collections::HashSet;

use tracing::instrument;

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::token::TaggedToken;

/// Tag of cardinal numbers; every anchor opens a candidate suffix.
pub const DEFAULT_ANCHOR_TAG: &str = "CD";
/// Support a group needs to become a tree node.
pub const DEFAULT_MIN_SUPPORT: usize = 10;
/// Support a mined row needs to be accepted.
pub const DEFAULT_MIN_COUNT: usize = 100;
/// Anchor-tagged integers from this value upwards stop growth; 0-4 continue.
pub const DEFAULT_NUMERIC_STOP_FROM: u64 = 5;

/// Tags that never extend a unit phrase: punctuation, conjunctions, the
/// determiner "the", prepositions, inflected verbs and colons.
pub const DEFAULT_FORBIDDEN_TAGS: &[&str] = &[
    "VBZ", "VBD", "VBN", "VBP", "IN", "IN-IN", "IN-OF", "IN-OVER", "IN-FOR", "IN-WITH",
    "IN-UNDER", "DT-THE", "TO", "COMMA", "STOP", "CC", "WRB", "COLON",
];

/// Words that disqualify a unit phrase, matched case-insensitively.
pub const DEFAULT_FORBIDDEN_WORDS: &[&str] = &["elsevier"];

/// Why a member stopped extending at the current node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StopReason {
    /// No token left after the prefix.
    Exhausted,
    ForbiddenTag,
    Numeric,
    /// A closing bracket with no pending opener in the prefix.
    UnmatchedClose,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MiningPolicy {
    pub anchor_tag: String,
    pub min_support: usize,
    pub min_count: usize,
    pub numeric_stop_from: u64,
    pub forbidden_tags: HashSet<String>,
    /// Stored lower-cased.
    pub forbidden_words: Vec<String>,
}

impl Default for MiningPolicy {
    fn default() -> Self {
        Self {
            anchor_tag: DEFAULT_ANCHOR_TAG.to_string(),
            min_support: DEFAULT_MIN_SUPPORT,
            min_count: DEFAULT_MIN_COUNT,
            numeric_stop_from: DEFAULT_NUMERIC_STOP_FROM,
            forbidden_tags: DEFAULT_FORBIDDEN_TAGS.iter().map(|t| t.to_string()).collect(),
            forbidden_words: DEFAULT_FORBIDDEN_WORDS.iter().map(|w| w.to_string()).collect(),
        }
    }
}

impl MiningPolicy {
    pub fn with_min_support(mut self, min_support: usize) -> Self {
        self.min_support = min_support;
        self
    }

    pub fn with_min_count(mut self, min_count: usize) -> Self {
        self.min_count = min_count;
        self
    }

    pub fn with_forbidden_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.forbidden_words = words.into_iter().map(|w| w.as_ref().to_lowercase()).collect();
        self
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.anchor_tag.is_empty() {
            return Err(DomainError::InvalidPolicy("anchor tag must not be empty".into()));
        }
        if self.min_support == 0 {
            return Err(DomainError::InvalidPolicy("min_support must be at least 1".into()));
        }
        Ok(())
    }

    pub fn is_forbidden_tag(&self, tag: &str) -> bool {
        self.forbidden_tags.contains(tag)
    }

    /// Numeric in the growth sense: an anchor-tagged token that is a decimal,
    /// not a plain integer, or an integer at or above `numeric_stop_from`.
    /// Only ASCII digit strings count as plain integers.
    pub fn is_numeric(&self, token: &TaggedToken) -> bool {
        if token.tag != self.anchor_tag {
            return false;
        }
        let text = token.text.as_str();
        if text.contains('.') {
            return true;
        }
        if text.is_empty() || !text.chars().all(|c| c.is_ascii_digit()) {
            return true;
        }
        // Overflowing digit strings are large numbers.
        text.parse::<u64>()
            .map_or(true, |n| n >= self.numeric_stop_from)
    }

    /// Decide whether `next` may extend a node whose unit string is `prefix`.
    /// `None` means the token extends the unit.
    #[instrument(level = "trace", skip(self))]
    pub fn stop_reason(&self, prefix: &str, next: Option<&TaggedToken>) -> Option<StopReason> {
        let Some(next) = next else {
            return Some(StopReason::Exhausted);
        };
        if self.is_forbidden_tag(&next.tag) {
            return Some(StopReason::ForbiddenTag);
        }
        if self.is_numeric(next) {
            return Some(StopReason::Numeric);
        }
        let brackets = match next.text.as_str() {
            ")" => Some(('(', ')')),
            "]" => Some(('[', ']')),
            "}" => Some(('{', '}')),
            _ => None,
        };
        match brackets {
            Some((open, close)) if !has_open_bracket(prefix, open, close) => {
                Some(StopReason::UnmatchedClose)
            }
            _ => None,
        }
    }
}

/// True if `text` leaves at least one `open` without its `close`. Closers
/// without a pending opener are ignored.
pub fn has_open_bracket(text: &str, open: char, close: char) -> bool {
    let mut pending = 0usize;
    for c in text.chars() {
        if c == open {
            pending += 1;
        } else if c == close && pending >= 1 {
            pending -= 1;
        }
    }
    pending > 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn cd(text: &str) -> TaggedToken {
        TaggedToken::new("CD", text)
    }

    #[rstest]
    #[case("0", false)]
    #[case("2", false)]
    #[case("4", false)]
    #[case("5", true)]
    #[case("12", true)]
    #[case("2.5", true)]
    #[case(".", true)]
    #[case("two", true)]
    #[case("2a", true)]
    #[case("", true)]
    #[case("99999999999999999999999", true)]
    #[case("\u{0663}", true)]
    #[case("²", true)]
    fn given_anchor_tagged_text_when_checking_numeric_then_small_integers_are_exempt(
        #[case] text: &str,
        #[case] expected: bool,
    ) {
        assert_eq!(MiningPolicy::default().is_numeric(&cd(text)), expected);
    }

    #[test]
    fn given_other_tag_when_checking_numeric_then_never_numeric() {
        let policy = MiningPolicy::default();
        assert!(!policy.is_numeric(&TaggedToken::new("NN", "12.5")));
    }

    #[rstest]
    #[case("( mol", '(', ')', true)]
    #[case("( mol )", '(', ')', false)]
    #[case(") (", '(', ')', true)]
    #[case("mL", '(', ')', false)]
    #[case("[ ( x", '[', ']', true)]
    #[case("[ ( x", '{', '}', false)]
    fn given_prefix_when_checking_open_bracket_then_tracks_each_type(
        #[case] text: &str,
        #[case] open: char,
        #[case] close: char,
        #[case] expected: bool,
    ) {
        assert_eq!(has_open_bracket(text, open, close), expected);
    }

    #[test]
    fn given_candidates_when_deciding_stop_then_first_matching_rule_wins() {
        let policy = MiningPolicy::default();
        assert_eq!(policy.stop_reason("mL", None), Some(StopReason::Exhausted));
        assert_eq!(
            policy.stop_reason("mL", Some(&TaggedToken::new("STOP", "."))),
            Some(StopReason::ForbiddenTag)
        );
        assert_eq!(
            policy.stop_reason("mL", Some(&cd("10"))),
            Some(StopReason::Numeric)
        );
        assert_eq!(
            policy.stop_reason("mL", Some(&TaggedToken::new("-RRB-", ")"))),
            Some(StopReason::UnmatchedClose)
        );
        assert_eq!(
            policy.stop_reason("( mol", Some(&TaggedToken::new("-RRB-", ")"))),
            None
        );
        assert_eq!(policy.stop_reason("mL", Some(&cd("2"))), None);
        assert_eq!(
            policy.stop_reason("mL", Some(&TaggedToken::new("NN", "min"))),
            None
        );
    }

    #[test]
    fn given_zero_support_when_validating_then_errors() {
        let policy = MiningPolicy::default().with_min_support(0);
        assert!(matches!(policy.validate(), Err(DomainError::InvalidPolicy(_))));
        assert!(MiningPolicy::default().validate().is_ok());
    }
}
