use super::{Match, Pattern, iter::advance};
use crate::{
    Result,
    engine::{self, Budget},
};
use std::iter::FusedIterator;

/// A stateful cursor over the matches of a [`Pattern`] in one input, created
/// by [`Pattern::matcher`].
///
/// Each [`find`](Matcher::find) continues after the previous match, and
/// [`hit_end`](Matcher::hit_end) tells whether the last search ran into the
/// end of the input:
///
/// ```
/// use regexp_explorer::Pattern;
///
/// let pattern = Pattern::new(r"\d+").unwrap();
/// let mut matcher = pattern.matcher("12 345");
/// assert_eq!(matcher.find().unwrap().map(|m| m.range()), Some(0..2));
/// assert!(!matcher.hit_end());
/// assert_eq!(matcher.find().unwrap().map(|m| m.range()), Some(3..6));
/// assert!(matcher.hit_end());
/// assert_eq!(matcher.find().unwrap(), None);
/// ```
///
/// Searches are charged to the matcher's [`Budget`], which fails a search
/// with [`Error::Timeout`](crate::Error::Timeout) once it runs out.
#[derive(Clone, Debug)]
pub struct Matcher<'p, 't> {
    pattern: &'p Pattern,
    input: &'t str,
    next_pos: Option<usize>,
    hit_end: bool,
    budget: Budget,
    initial_budget: Budget,
}

impl<'p, 't> Matcher<'p, 't> {
    pub(super) fn new(pattern: &'p Pattern, input: &'t str) -> Self {
        let mut budget = Budget::new();
        budget.start();
        Matcher {
            pattern,
            input,
            next_pos: Some(0),
            hit_end: false,
            budget,
            initial_budget: budget,
        }
    }

    /// Replaces the budget that searches are charged to. The budget starts
    /// now and is restored by [`reset`](Matcher::reset).
    #[must_use]
    pub fn with_budget(mut self, budget: Budget) -> Self {
        self.initial_budget = budget;
        self.budget = budget;
        self.budget.start();
        self
    }

    #[must_use]
    pub fn pattern(&self) -> &'p Pattern {
        self.pattern
    }

    #[must_use]
    pub fn input(&self) -> &'t str {
        self.input
    }

    /// Finds the next match after the previous one.
    pub fn find(&mut self) -> Result<Option<Match<'t>>> {
        let Some(pos) = self.next_pos else {
            return Ok(None);
        };
        self.search(pos)
    }

    /// Restarts the search at byte offset `start`. Later calls to
    /// [`find`](Matcher::find) continue after the match found here.
    pub fn find_at(&mut self, start: usize) -> Result<Option<Match<'t>>> {
        self.search(start)
    }

    /// Returns `true` if the whole input matches the pattern.
    pub fn matches(&mut self) -> Result<bool> {
        let result = engine::match_full(self.pattern.program(), self.input, &mut self.budget);
        let outcome = result.inspect_err(|_| self.next_pos = None)?;
        self.hit_end = outcome.hit_end;
        Ok(outcome.slots.is_some())
    }

    /// Returns `true` if the most recent search inspected the end of the
    /// input, so more input could have changed its result.
    #[must_use]
    pub fn hit_end(&self) -> bool {
        self.hit_end
    }

    /// Returns the number of instructions executed since the budget was
    /// started.
    #[must_use]
    pub fn steps(&self) -> u64 {
        self.budget.used()
    }

    /// Rewinds to the start of the input and restores the budget.
    pub fn reset(&mut self) -> &mut Self {
        self.next_pos = Some(0);
        self.hit_end = false;
        self.budget = self.initial_budget;
        self.budget.start();
        self
    }

    fn search(&mut self, start: usize) -> Result<Option<Match<'t>>> {
        let result = engine::find_at(self.pattern.program(), self.input, start, &mut self.budget);
        let outcome = result.inspect_err(|_| self.next_pos = None)?;
        self.hit_end = outcome.hit_end;

        let found = outcome
            .slots
            .and_then(|slots| Match::from_slots(self.input, &slots));
        self.next_pos = found.as_ref().and_then(|m| advance(self.input, m));
        Ok(found)
    }
}

impl<'t> Iterator for Matcher<'_, 't> {
    type Item = Result<Match<'t>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.find().transpose()
    }
}

impl FusedIterator for Matcher<'_, '_> {}
