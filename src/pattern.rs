//! Compiled patterns and the operations on them.

mod flags;
mod iter;
mod matched;
mod matcher;
mod replace;

pub use self::{flags::Flags, iter::FindAll, matched::Match, matcher::Matcher, replace::Repl};
use self::replace::{expand, tokenize_template};
use crate::{
    Result,
    ast::{AstRoot, parse_pattern},
    compiler::{self, Program},
    engine::{self, Unlimited},
};
use log::debug;
use std::{fmt, str::FromStr};

/// Compiles `pattern` with `flags`.
///
/// # Errors
///
/// A malformed pattern gives a syntax [`Error`](crate::Error) carrying the
/// character offset of the problem.
pub fn compile(pattern: &str, flags: Flags) -> Result<Pattern> {
    Pattern::with_flags(pattern, flags)
}

/// A compiled regular expression.
///
/// A pattern is immutable once compiled; every search allocates its own
/// state, so one pattern can be shared between threads and searched
/// concurrently.
///
/// ```
/// use regexp_explorer::{Flags, Pattern};
///
/// let pattern = Pattern::with_flags("^abc$", Flags::new().multiline(true)).unwrap();
/// let found = pattern.find("xx\nabc\nyy", 0).unwrap();
/// assert_eq!(found.range(), 3..6);
/// assert!(!pattern.matches("xx\nabc\nyy"));
/// ```
#[derive(Clone, Debug)]
pub struct Pattern {
    source: String,
    ast: AstRoot,
    program: Program,
}

impl Pattern {
    /// Compiles `pattern` with default flags.
    ///
    /// # Errors
    ///
    /// A malformed pattern gives a syntax [`Error`](crate::Error).
    pub fn new(pattern: &str) -> Result<Self> {
        Self::with_flags(pattern, Flags::default())
    }

    /// Compiles `pattern` with `flags`.
    ///
    /// # Errors
    ///
    /// A malformed pattern gives a syntax [`Error`](crate::Error).
    pub fn with_flags(pattern: &str, flags: Flags) -> Result<Self> {
        let ast = parse_pattern(pattern, flags)?;
        let program = compiler::compile(&ast, flags)?;
        debug!(
            "Compiled {pattern:?} with flags {flags:?}: {} groups, {} instructions, backtracking: {}",
            ast.capture_count(),
            program.insts().len(),
            program.requires_backtracking()
        );
        Ok(Pattern {
            source: pattern.to_owned(),
            ast,
            program,
        })
    }

    /// Returns the source text of the pattern.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    #[must_use]
    pub fn flags(&self) -> Flags {
        self.program.flags()
    }

    /// Returns the parse tree.
    #[must_use]
    pub fn ast(&self) -> &AstRoot {
        &self.ast
    }

    /// Returns the compiled program.
    #[must_use]
    pub fn program(&self) -> &Program {
        &self.program
    }

    /// Returns the number of capturing groups.
    #[must_use]
    pub fn capture_count(&self) -> usize {
        self.ast.capture_count()
    }

    /// Finds the leftmost match that starts at or after byte offset `start`.
    #[must_use]
    pub fn find<'t>(&self, input: &'t str, start: usize) -> Option<Match<'t>> {
        let Ok(outcome) = engine::find_at(&self.program, input, start, &mut Unlimited);
        outcome
            .slots
            .and_then(|slots| Match::from_slots(input, &slots))
    }

    /// Returns an iterator over the non-overlapping matches in `input`.
    #[must_use]
    pub fn find_all<'p, 't>(&'p self, input: &'t str) -> FindAll<'p, 't> {
        FindAll {
            pattern: self,
            input,
            next_pos: Some(0),
            hit_end: false,
        }
    }

    /// Returns `true` if the whole of `input` matches.
    #[must_use]
    pub fn matches(&self, input: &str) -> bool {
        let Ok(outcome) = engine::match_full(&self.program, input, &mut Unlimited);
        outcome.slots.is_some()
    }

    /// Returns a stateful matcher over `input`.
    #[must_use]
    pub fn matcher<'p, 't>(&'p self, input: &'t str) -> Matcher<'p, 't> {
        Matcher::new(self, input)
    }

    /// Replaces the first `limit` matches in `input` (all of them if `limit`
    /// is `None`), returning the new text and the number of replacements.
    ///
    /// # Errors
    ///
    /// A malformed [`Repl::Template`] gives a replacement error before any
    /// text is replaced.
    pub fn replace(
        &self,
        input: &str,
        repl: Repl<'_>,
        limit: Option<usize>,
    ) -> Result<(String, usize)> {
        let tokens = match &repl {
            Repl::Template(template) => tokenize_template(template, self.capture_count())?,
            Repl::Function(_) => Vec::new(),
        };

        let mut result = String::with_capacity(input.len());
        let mut last_pos = 0;
        let mut count = 0;
        for found in self.find_all(input).take(limit.unwrap_or(usize::MAX)) {
            result.push_str(&input[last_pos..found.start()]);
            match &repl {
                Repl::Template(_) => expand(&tokens, &found, &mut result),
                Repl::Function(f) => result.push_str(&f(&found)),
            }
            last_pos = found.end();
            count += 1;
        }
        result.push_str(&input[last_pos..]);

        debug!("Replaced {count} matches of {:?}", self.source);
        Ok((result, count))
    }

    /// Replaces every match in `input` with the expanded `template`.
    ///
    /// # Errors
    ///
    /// A malformed template gives a replacement error.
    pub fn replace_all(&self, input: &str, template: &str) -> Result<String> {
        self.replace(input, Repl::Template(template), None)
            .map(|(result, _)| result)
    }
}

impl FromStr for Pattern {
    type Err = crate::Error;

    fn from_str(pattern: &str) -> Result<Self> {
        Self::new(pattern)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}
