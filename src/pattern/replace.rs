use super::Match;
use crate::{Error, Result};
use std::fmt;

/// What each match is replaced with in [`Pattern::replace`](super::Pattern::replace).
pub enum Repl<'a> {
    /// Text where `$n` inserts group `n` and `\x` inserts `x` literally.
    ///
    /// The group number takes as many digits as still name a group of the
    /// pattern, so with three groups `$12` is group 1 followed by `2`.
    Template(&'a str),
    /// Computes the replacement from the match.
    Function(Box<dyn Fn(&Match<'_>) -> String + 'a>),
}

impl fmt::Debug for Repl<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Repl::Template(template) => f.debug_tuple("Template").field(template).finish(),
            Repl::Function(_) => f.write_str("Function(..)"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(super) enum ReplToken {
    Literal(char),
    Group(usize),
}

/// Splits a replacement template into literal characters and group
/// references, checking every reference against `group_count`.
pub(super) fn tokenize_template(template: &str, group_count: usize) -> Result<Vec<ReplToken>> {
    let mut tokens = Vec::with_capacity(template.len());
    let mut chars = template.chars().enumerate().peekable();

    while let Some((pos, c)) = chars.next() {
        match c {
            '\\' => {
                let Some((_, escaped)) = chars.next() else {
                    return Err(Error::ReplacementEscape { pos });
                };
                tokens.push(ReplToken::Literal(escaped));
            }
            '$' => {
                let Some(first) = chars.next_if(|(_, c)| c.is_ascii_digit()) else {
                    return Err(Error::ReplacementSyntax { pos });
                };
                let mut index = digit(first.1);
                if index > group_count {
                    return Err(Error::ReplacementGroup { pos, index });
                }
                while let Some(&(_, c)) = chars.peek()
                    && c.is_ascii_digit()
                {
                    let next = index.saturating_mul(10).saturating_add(digit(c));
                    if next > group_count {
                        break;
                    }
                    index = next;
                    chars.next();
                }
                tokens.push(ReplToken::Group(index));
            }
            c => tokens.push(ReplToken::Literal(c)),
        }
    }

    Ok(tokens)
}

fn digit(c: char) -> usize {
    c.to_digit(10).map_or(0, |d| d as usize)
}

/// Writes the replacement for one match. Groups that did not take part in
/// the match insert nothing.
pub(super) fn expand(tokens: &[ReplToken], found: &Match<'_>, out: &mut String) {
    for token in tokens {
        match *token {
            ReplToken::Literal(c) => out.push(c),
            ReplToken::Group(index) => {
                if let Some(text) = found.group_str(index) {
                    out.push_str(text);
                }
            }
        }
    }
}
