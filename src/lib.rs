//! A backtracking regular-expression engine built for interactive pattern
//! exploration: every pattern exposes its parse tree and compiled program,
//! syntax errors carry the offending character offset, and searches report
//! whether they ran into the end of the input.

#![warn(clippy::pedantic, rust_2018_idioms)]
#![allow(clippy::missing_errors_doc, clippy::too_many_lines)]

pub mod ast;
pub mod charset;
pub mod compiler;
pub mod engine;
pub mod lexer;
pub mod parser;
pub mod pattern;

pub use self::{
    ast::{AstNode, AstRoot, Quantifier},
    charset::CharSet,
    compiler::{Inst, Program},
    engine::Budget,
    lexer::{Lexer, Token},
    parser::parse_pattern,
    pattern::{FindAll, Flags, Match, Matcher, Pattern, Repl, compile},
};

#[derive(Clone, Debug, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    /// An invalid character class range was used.
    #[error("{err} near index {pos}")]
    CharSet { pos: usize, err: charset::Error },

    /// A `(` was never closed.
    #[error("unclosed group near index {pos}")]
    UnclosedGroup { pos: usize },

    /// A `)` has no matching `(`.
    #[error("unmatched closing ')' near index {pos}")]
    UnmatchedParen { pos: usize },

    /// A `[` was never closed.
    #[error("unclosed character class near index {pos}")]
    UnclosedClass { pos: usize },

    /// A quantifier has nothing to repeat.
    #[error("dangling meta character '{lit}' near index {pos}")]
    DanglingQuantifier { pos: usize, lit: char },

    /// A `{...}` repetition is malformed or its bounds are out of order.
    #[error("illegal repetition near index {pos}")]
    InvalidRepetition { pos: usize },

    /// A repetition bound is larger than [`MAX_REPEAT`].
    #[error("repetition count {count} exceeds {MAX_REPEAT} near index {pos}")]
    RepetitionTooLarge { pos: usize, count: u32 },

    /// The pattern contains an unrecognised escape sequence.
    #[error("illegal or unsupported escape sequence '\\{lit}' near index {pos}")]
    InvalidEscape { pos: usize, lit: char },

    /// A backreference names a group the pattern does not declare.
    #[error("reference to undefined group {index} near index {pos}")]
    InvalidBackreference { pos: usize, index: usize },

    /// A `(?` is followed by something other than `:`, `=`, `!`, `<=` or `<!`.
    #[error("unknown group construct near index {pos}")]
    UnknownGroupConstruct { pos: usize },

    /// A lookbehind body can match arbitrarily long text.
    #[error("look-behind group does not have an obvious maximum length near index {pos}")]
    UnboundedLookbehind { pos: usize },

    /// Groups are nested more than [`MAX_NESTING`] levels deep.
    #[error("groups nested more than {MAX_NESTING} deep near index {pos}")]
    NestingTooDeep { pos: usize },

    /// The pattern ended in the middle of an escape sequence.
    #[error("unexpected end of pattern near index {pos}")]
    UnexpectedEnd { pos: usize },

    /// Counted repetitions expanded past [`MAX_PROGRAM_LEN`] instructions.
    #[error("compiled program exceeds {limit} instructions")]
    ProgramTooLarge { limit: usize },

    /// A flag letter other than `i`, `m` or `s`.
    #[error("unknown flag '{lit}'")]
    UnknownFlag { lit: char },

    /// A `$` in a replacement template is not followed by a group number.
    #[error("illegal group reference in replacement near index {pos}")]
    ReplacementSyntax { pos: usize },

    /// A replacement template refers to a group the pattern does not have.
    #[error("no group {index} in replacement near index {pos}")]
    ReplacementGroup { pos: usize, index: usize },

    /// A replacement template ends with a lone `\`.
    #[error("character to be escaped is missing in replacement near index {pos}")]
    ReplacementEscape { pos: usize },

    /// A match ran out of its [`Budget`].
    #[error("match exceeded its execution budget after {steps} steps")]
    Timeout { steps: u64 },

    #[error("internal error: {0}")]
    Internal(&'static str),
}

impl Error {
    /// Returns the 0-based character offset into the pattern at which a
    /// syntax error was detected.
    #[must_use]
    pub const fn position(&self) -> Option<usize> {
        match *self {
            Error::CharSet { pos, .. }
            | Error::UnclosedGroup { pos }
            | Error::UnmatchedParen { pos }
            | Error::UnclosedClass { pos }
            | Error::DanglingQuantifier { pos, .. }
            | Error::InvalidRepetition { pos }
            | Error::RepetitionTooLarge { pos, .. }
            | Error::InvalidEscape { pos, .. }
            | Error::InvalidBackreference { pos, .. }
            | Error::UnknownGroupConstruct { pos }
            | Error::UnboundedLookbehind { pos }
            | Error::NestingTooDeep { pos }
            | Error::UnexpectedEnd { pos } => Some(pos),
            _ => None,
        }
    }

    /// Returns `true` if the error describes a malformed pattern.
    #[must_use]
    pub const fn is_syntax(&self) -> bool {
        self.position().is_some()
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// The largest bound accepted in a `{m,n}` repetition.
pub const MAX_REPEAT: u32 = 10_000;

/// The deepest nesting of groups and lookarounds a pattern may use.
pub const MAX_NESTING: usize = 250;

/// The largest number of instructions a compiled program may contain.
pub const MAX_PROGRAM_LEN: usize = 1 << 20;
