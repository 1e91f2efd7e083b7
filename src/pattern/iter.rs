use super::{Match, Pattern};
use crate::engine::{self, Unlimited};
use std::iter::FusedIterator;

/// A lazy iterator over the non-overlapping matches of a [`Pattern`], created
/// by [`Pattern::find_all`].
///
/// After an empty match the next search starts one character later, so the
/// iterator always makes progress and ends.
#[derive(Clone, Debug)]
pub struct FindAll<'p, 't> {
    pub(super) pattern: &'p Pattern,
    pub(super) input: &'t str,
    /// Where the next search starts, `None` once the input is exhausted.
    pub(super) next_pos: Option<usize>,
    pub(super) hit_end: bool,
}

impl FindAll<'_, '_> {
    /// Returns `true` if the most recent search inspected the end of the
    /// input, so more input could have changed its result.
    #[must_use]
    pub fn hit_end(&self) -> bool {
        self.hit_end
    }
}

impl<'t> Iterator for FindAll<'_, 't> {
    type Item = Match<'t>;

    fn next(&mut self) -> Option<Self::Item> {
        let pos = self.next_pos?;

        let Ok(outcome) = engine::find_at(self.pattern.program(), self.input, pos, &mut Unlimited);
        self.hit_end = outcome.hit_end;

        let Some(found) = outcome
            .slots
            .and_then(|slots| Match::from_slots(self.input, &slots))
        else {
            self.next_pos = None;
            return None;
        };

        self.next_pos = advance(self.input, &found);
        Some(found)
    }
}

impl FusedIterator for FindAll<'_, '_> {}

/// Returns where the search after `found` starts: its end, or one character
/// past it if it was empty.
pub(super) fn advance(input: &str, found: &Match<'_>) -> Option<usize> {
    if !found.is_empty() {
        return Some(found.end());
    }
    input[found.end()..]
        .chars()
        .next()
        .map(|c| found.end() + c.len_utf8())
}
