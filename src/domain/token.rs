//! Tagged tokens and the literal sentence form written by the tagging pipeline.
//!
//! A sentence arrives as `[('CD', '5'), ('NN', 'mL')]`: a list of `(tag, text)`
//! pairs with quoted strings. Lists instead of tuples, double quotes and a
//! trailing comma are accepted as well.

use std::fmt;
use std::rc::Rc;

use nom::branch::alt;
use nom::character::complete::{char, multispace0};
use nom::combinator::{all_consuming, opt};
use nom::error::{ErrorKind, ParseError};
use nom::multi::separated_list0;
use nom::sequence::{delimited, separated_pair, terminated};
use nom::{IResult, Parser};
use tracing::instrument;

use crate::domain::error::{DomainError, DomainResult};

/// One token of a sentence together with its grammatical/semantic tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TaggedToken {
    pub tag: String,
    pub text: String,
}

impl TaggedToken {
    pub fn new(tag: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            text: text.into(),
        }
    }
}

impl fmt::Display for TaggedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.text, self.tag)
    }
}

/// A whole sentence, or the part of it following an anchor.
pub type TaggedSequence = Vec<TaggedToken>;

/// Shared, immutable suffix. Tree nodes own their member lists but the
/// suffixes themselves are shared between a node and its descendants.
pub type Suffix = Rc<[TaggedToken]>;

/// Parse one sentence in its literal `[(tag, text), ...]` form.
#[instrument(level = "trace")]
pub fn parse_sequence(input: &str) -> DomainResult<TaggedSequence> {
    all_consuming(sequence)(input)
        .map(|(_, tokens)| tokens)
        .map_err(|e| DomainError::MalformedSequence {
            input: preview(input),
            reason: e.to_string(),
        })
}

/// Consumes leading and trailing whitespace around `inner`.
fn ws<'a, F, O, E: ParseError<&'a str>>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O, E>
where
    F: Parser<&'a str, O, E>,
{
    delimited(multispace0, inner, multispace0)
}

fn sequence(input: &str) -> IResult<&str, TaggedSequence> {
    delimited(
        ws(char('[')),
        terminated(separated_list0(ws(char(',')), pair), opt(ws(char(',')))),
        ws(char(']')),
    )(input)
}

fn pair(input: &str) -> IResult<&str, TaggedToken> {
    let (input, open) = ws(alt((char('('), char('['))))(input)?;
    let (input, (tag, text)) = separated_pair(ws(quoted), char(','), ws(quoted))(input)?;
    let (input, _) = opt(ws(char(',')))(input)?;
    let close = if open == '(' { ')' } else { ']' };
    let (input, _) = ws(char(close))(input)?;
    Ok((input, TaggedToken::new(tag, text)))
}

/// A single- or double-quoted string literal with backslash escapes.
fn quoted(input: &str) -> IResult<&str, String> {
    let mut chars = input.char_indices();
    let quote = match chars.next() {
        Some((_, q @ ('\'' | '"'))) => q,
        _ => return Err(failure(input, ErrorKind::Char)),
    };

    let mut out = String::new();
    while let Some((i, c)) = chars.next() {
        if c == quote {
            return Ok((&input[i + c.len_utf8()..], out));
        }
        if c != '\\' {
            out.push(c);
            continue;
        }
        let (_, escaped) = chars
            .next()
            .ok_or_else(|| failure(input, ErrorKind::Escaped))?;
        match escaped {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            '0' => out.push('\0'),
            'x' | 'u' | 'U' => {
                let width = match escaped {
                    'x' => 2,
                    'u' => 4,
                    _ => 8,
                };
                let hex: String = chars.by_ref().take(width).map(|(_, h)| h).collect();
                let decoded = (hex.len() == width)
                    .then(|| u32::from_str_radix(&hex, 16).ok())
                    .flatten()
                    .and_then(char::from_u32)
                    .ok_or_else(|| failure(input, ErrorKind::Escaped))?;
                out.push(decoded);
            }
            other => out.push(other),
        }
    }
    Err(failure(input, ErrorKind::Char))
}

fn failure(input: &str, kind: ErrorKind) -> nom::Err<nom::error::Error<&str>> {
    nom::Err::Error(nom::error::Error::new(input, kind))
}

fn preview(input: &str) -> String {
    const MAX: usize = 80;
    match input.char_indices().nth(MAX) {
        Some((cut, _)) => format!("{}...", &input[..cut]),
        None => input.to_string(),
    }
}
