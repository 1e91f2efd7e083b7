use super::Limit;
use crate::{
    ast::Anchor,
    charset::{fold, is_line_terminator, is_word_char},
    compiler::Program,
};

/// An entry on the backtracking stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum Frame {
    /// A choice point: resume at `pc` with the input at `pos`.
    Branch { pc: usize, pos: usize },
    /// Undo a `Save` when backtracking past it.
    RestoreSlot { slot: usize, value: Option<usize> },
    /// Undo a `SetMark` when backtracking past it.
    RestoreMark { mark: usize, value: Option<usize> },
}

/// (pc, position) pairs already explored without success.
///
/// Rows are positions counted from the search start and grow as the search
/// reaches them, so a search only pays for the input it explores.
pub(super) struct Visited {
    bits: Vec<u64>,
    insts: usize,
    origin: usize,
}

impl Visited {
    pub fn new(insts: usize, origin: usize) -> Self {
        Visited {
            bits: Vec::new(),
            insts,
            origin,
        }
    }

    /// Marks the pair as visited, returning `false` if it already was.
    #[inline]
    pub fn insert(&mut self, pc: usize, pos: usize) -> bool {
        debug_assert!(pos >= self.origin, "memoized search moved before its start");
        let index = (pos - self.origin) * self.insts + pc;
        let (word, bit) = (index / 64, 1 << (index % 64));
        if word >= self.bits.len() {
            self.bits.resize(word + 1, 0);
        }
        let fresh = self.bits[word] & bit == 0;
        self.bits[word] |= bit;
        fresh
    }
}

/// Per-search matcher state.
pub(super) struct State<'a, L> {
    pub program: &'a Program,
    pub input: &'a str,
    pub limit: &'a mut L,
    pub slots: Vec<Option<usize>>,
    pub marks: Vec<Option<usize>>,
    pub stack: Vec<Frame>,
    pub visited: Option<Visited>,
    pub hit_end: bool,
}

impl<'a, L: Limit> State<'a, L> {
    /// Creates the state for a search that begins at byte offset `origin`.
    /// With `memoize` set, failed (pc, position) pairs are never explored
    /// twice.
    pub fn new(
        program: &'a Program,
        input: &'a str,
        limit: &'a mut L,
        origin: usize,
        memoize: bool,
    ) -> Self {
        Self {
            program,
            input,
            limit,
            slots: vec![None; program.slot_count],
            marks: vec![None; program.mark_count],
            stack: Vec::new(),
            visited: memoize.then(|| Visited::new(program.insts.len(), origin)),
            hit_end: false,
        }
    }

    /// Clears captures and marks before an attempt at a new start position.
    pub fn clear(&mut self) {
        self.slots.fill(None);
        self.marks.fill(None);
        self.stack.clear();
    }

    /// Returns the character at `pos`, noting when the end of the input was
    /// reached.
    #[inline]
    pub fn char_at(&mut self, pos: usize) -> Option<char> {
        let c = self.peek_char(pos);
        if c.is_none() {
            self.hit_end = true;
        }
        c
    }

    #[inline]
    pub fn peek_char(&self, pos: usize) -> Option<char> {
        self.input.get(pos..).and_then(|rest| rest.chars().next())
    }

    #[inline]
    pub fn prev_char(&self, pos: usize) -> Option<char> {
        self.input.get(..pos).and_then(|before| before.chars().next_back())
    }

    #[inline]
    pub fn same_char(&self, a: char, b: char) -> bool {
        a == b || (self.program.flags.case_insensitive && fold(a) == fold(b))
    }

    pub fn check_anchor(&mut self, anchor: Anchor, pos: usize) -> bool {
        let at_end = pos == self.input.len();
        match anchor {
            Anchor::StartInput => pos == 0,
            Anchor::EndInput => {
                self.hit_end |= at_end;
                at_end
            }
            Anchor::StartLine => {
                // A line terminator at the very end does not start a line.
                if at_end {
                    self.hit_end = true;
                    return false;
                }
                match self.prev_char(pos) {
                    None => true,
                    Some('\r') => self.peek_char(pos) != Some('\n'),
                    Some(c) => is_line_terminator(c),
                }
            }
            Anchor::EndLine => match self.peek_char(pos) {
                None => {
                    self.hit_end = true;
                    true
                }
                Some('\n') => self.prev_char(pos) != Some('\r'),
                Some(c) => is_line_terminator(c),
            },
            Anchor::WordBoundary | Anchor::NotWordBoundary => {
                let before = self.prev_char(pos).is_some_and(is_word_char);
                let after = self.char_at(pos).is_some_and(is_word_char);
                (before != after) == (anchor == Anchor::WordBoundary)
            }
        }
    }

    /// Matches the text last captured by `group` at `pos`, returning the
    /// position after it.
    pub fn match_backref(&mut self, group: usize, mut pos: usize) -> Option<usize> {
        let (Some(start), Some(end)) = (self.slots[2 * group], self.slots[2 * group + 1]) else {
            return None;
        };
        let input = self.input;
        let captured = &input[start..end];

        if !self.program.flags.case_insensitive {
            if input[pos..].starts_with(captured) {
                return Some(pos + captured.len());
            }
            self.hit_end |= pos + captured.len() > input.len();
            return None;
        }

        for expected in captured.chars() {
            let c = self.char_at(pos)?;
            if !self.same_char(c, expected) {
                return None;
            }
            pos += c.len_utf8();
        }
        Some(pos)
    }

    /// Moves `pos` back by `count` characters, or returns `None` if the input
    /// is too short.
    pub fn back(&self, pos: usize, count: usize) -> Option<usize> {
        if count == 0 {
            return Some(pos);
        }
        self.input[..pos]
            .char_indices()
            .rev()
            .nth(count - 1)
            .map(|(at, _)| at)
    }

    /// Pops the top frame if it lies above `base`.
    #[inline]
    pub fn pop_above(&mut self, base: usize) -> Option<Frame> {
        if self.stack.len() > base {
            self.stack.pop()
        } else {
            None
        }
    }

    /// Pops every frame above `base`, undoing captures and marks.
    pub fn unwind(&mut self, base: usize) {
        while let Some(frame) = self.pop_above(base) {
            self.restore(frame);
        }
    }

    /// Drops the choice points above `base`, keeping the undo entries so that
    /// backtracking past this point still restores captures.
    pub fn commit(&mut self, base: usize) {
        let mut keep = base;
        for at in base..self.stack.len() {
            if !matches!(self.stack[at], Frame::Branch { .. }) {
                self.stack[keep] = self.stack[at];
                keep += 1;
            }
        }
        self.stack.truncate(keep);
    }

    #[inline]
    pub fn restore(&mut self, frame: Frame) {
        match frame {
            Frame::Branch { .. } => {}
            Frame::RestoreSlot { slot, value } => self.slots[slot] = value,
            Frame::RestoreMark { mark, value } => self.marks[mark] = value,
        }
    }

    pub fn save(&mut self, slot: usize, pos: usize) {
        let value = self.slots[slot].replace(pos);
        self.stack.push(Frame::RestoreSlot { slot, value });
    }

    pub fn set_mark(&mut self, mark: usize, pos: usize) {
        let value = self.marks[mark].replace(pos);
        self.stack.push(Frame::RestoreMark { mark, value });
    }
}
