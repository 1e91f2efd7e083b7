use std::ops::Range;

/// A successful match: the span of the whole match plus the span of each
/// capturing group.
///
/// All offsets are byte offsets into the searched text and always fall on
/// character boundaries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Match<'t> {
    input: &'t str,
    range: Range<usize>,
    /// Spans of groups `1..`, `None` for groups that did not participate.
    groups: Vec<Option<Range<usize>>>,
}

impl<'t> Match<'t> {
    /// Builds a match from engine capture slots, where slots `2n` and `2n + 1`
    /// hold the start and end of group `n`.
    pub(crate) fn from_slots(input: &'t str, slots: &[Option<usize>]) -> Option<Self> {
        let mut spans = slots.chunks_exact(2).map(|pair| match *pair {
            [Some(start), Some(end)] => Some(start..end),
            _ => None,
        });
        let range = spans.next()??;
        Some(Match {
            input,
            range,
            groups: spans.collect(),
        })
    }

    #[must_use]
    pub fn start(&self) -> usize {
        self.range.start
    }

    #[must_use]
    pub fn end(&self) -> usize {
        self.range.end
    }

    #[must_use]
    pub fn range(&self) -> Range<usize> {
        self.range.clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.range.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }

    /// Returns the matched text.
    #[must_use]
    pub fn as_str(&self) -> &'t str {
        &self.input[self.range.clone()]
    }

    /// Returns the span of group `index`, where group 0 is the whole match.
    ///
    /// A group inside a repetition reports its last iteration. `None` means
    /// the group did not take part in the match or does not exist.
    #[must_use]
    pub fn group(&self, index: usize) -> Option<Range<usize>> {
        match index {
            0 => Some(self.range()),
            _ => self.groups.get(index - 1).cloned().flatten(),
        }
    }

    /// Returns the text of group `index`, where group 0 is the whole match.
    #[must_use]
    pub fn group_str(&self, index: usize) -> Option<&'t str> {
        self.group(index).map(|range| &self.input[range])
    }

    /// Returns the spans of the capturing groups in order, starting at group 1.
    pub fn groups(&self) -> impl ExactSizeIterator<Item = Option<Range<usize>>> + '_ {
        self.groups.iter().cloned()
    }

    /// Returns the number of capturing groups, not counting the whole match.
    #[must_use]
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_slots() {
        let m = Match::from_slots("xaby", &[Some(1), Some(3), None, None, Some(2), Some(3)])
            .unwrap();
        assert_eq!(m.range(), 1..3);
        assert_eq!(m.as_str(), "ab");
        assert_eq!(m.group_count(), 2);
        assert_eq!(m.group(1), None);
        assert_eq!(m.group_str(2), Some("b"));
        assert_eq!(m.group(3), None);
        assert_eq!(m.groups().collect::<Vec<_>>(), [None, Some(2..3)]);

        assert_eq!(Match::from_slots("x", &[None, None]), None);
    }
}
