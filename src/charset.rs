//! Character class set types.

use std::fmt;

/// The error type used by [`CharSet`].
#[derive(Clone, Debug, Eq, thiserror::Error, PartialEq)]
pub enum Error {
    /// An invalid range was given.
    #[error("illegal character range '{}-{}'", _0.escape_debug(), _1.escape_debug())]
    Range(char, char),
    /// An invalid class escape was given.
    #[error("invalid character class '\\{}'", _0.escape_debug())]
    Class(char),
}

const DIGIT: &[(char, char)] = &[('0', '9')];
const WORD: &[(char, char)] = &[('0', '9'), ('A', 'Z'), ('_', '_'), ('a', 'z')];
const SPACE: &[(char, char)] = &[('\t', '\r'), (' ', ' ')];

/// A character class set, stored as sorted non-overlapping inclusive ranges.
#[derive(Clone, Default, PartialEq, Eq, Debug)]
pub struct CharSet {
    ranges: Vec<(char, char)>,
}

impl CharSet {
    /// Creates a new empty character set.
    #[must_use]
    pub const fn new() -> Self {
        CharSet { ranges: Vec::new() }
    }

    /// Creates the set for a class escape such as `d` or `W`.
    ///
    /// # Errors
    ///
    /// If `class` is not one of `d w s D W S`, an [`Error`] is returned.
    pub fn from_class(class: char) -> Result<Self, Error> {
        let mut set = CharSet::new();
        set.add_class(class)?;
        Ok(set)
    }

    /// Adds the given character to the set.
    pub fn add_char(&mut self, c: char) {
        self.insert(c, c);
    }

    /// Adds an inclusive range of characters to the set.
    ///
    /// # Errors
    ///
    /// If the start of the range is after its end, an [`Error`] is returned.
    pub fn add_range(&mut self, start: char, end: char) -> Result<(), Error> {
        if start <= end {
            self.insert(start, end);
            Ok(())
        } else {
            Err(Error::Range(start, end))
        }
    }

    /// Adds a class escape (e.g. the `d` of `\d`) to the set. Uppercase
    /// letters add the complement of the class.
    ///
    /// # Errors
    ///
    /// If `class` is not a known class letter, an [`Error`] is returned.
    pub fn add_class(&mut self, class: char) -> Result<(), Error> {
        let ranges = match class.to_ascii_lowercase() {
            'd' => DIGIT,
            'w' => WORD,
            's' => SPACE,
            _ => return Err(Error::Class(class)),
        };

        let mut class_set = CharSet {
            ranges: ranges.to_vec(),
        };
        if class.is_ascii_uppercase() {
            class_set = class_set.complement();
        }
        for &(start, end) in &class_set.ranges {
            self.insert(start, end);
        }

        Ok(())
    }

    /// Returns `true` if the set contains the given character.
    #[must_use]
    pub fn contains(&self, c: char) -> bool {
        self.ranges
            .binary_search_by(|&(start, end)| {
                if end < c {
                    std::cmp::Ordering::Less
                } else if start > c {
                    std::cmp::Ordering::Greater
                } else {
                    std::cmp::Ordering::Equal
                }
            })
            .is_ok()
    }

    /// Returns `true` if the set contains the given character or one of its
    /// simple case variants.
    #[must_use]
    pub fn contains_folded(&self, c: char) -> bool {
        self.contains(c) || self.contains(simple_lower(c)) || self.contains(simple_upper(c))
    }

    /// Returns the set of every character not in this set.
    #[must_use]
    pub fn complement(&self) -> CharSet {
        let mut ranges = Vec::with_capacity(self.ranges.len() + 1);
        let mut next = Some('\0');
        for &(start, end) in &self.ranges {
            if let Some(from) = next
                && from < start
                && let Some(to) = pred(start)
            {
                ranges.push((from, to));
            }
            next = succ(end);
        }
        if let Some(from) = next {
            ranges.push((from, char::MAX));
        }
        CharSet { ranges }
    }

    /// Returns the inclusive ranges making up the set, in ascending order.
    #[must_use]
    pub fn ranges(&self) -> &[(char, char)] {
        &self.ranges
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    fn insert(&mut self, start: char, end: char) {
        let at = self.ranges.partition_point(|&(s, _)| s < start);
        self.ranges.insert(at, (start, end));

        // Merge overlapping and adjacent neighbours.
        let mut merged: Vec<(char, char)> = Vec::with_capacity(self.ranges.len());
        for &(s, e) in &self.ranges {
            if let Some(last) = merged.last_mut()
                && succ(last.1).is_none_or(|after| s <= after)
            {
                last.1 = last.1.max(e);
            } else {
                merged.push((s, e));
            }
        }
        self.ranges = merged;
    }
}

impl fmt::Display for CharSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &(start, end) in &self.ranges {
            if start == end {
                write!(f, "{}", start.escape_debug())?;
            } else {
                write!(f, "{}-{}", start.escape_debug(), end.escape_debug())?;
            }
        }
        Ok(())
    }
}

/// Returns `true` for `[0-9A-Za-z_]`, the characters `\w` and `\b` treat as
/// word characters.
#[inline]
#[must_use]
pub const fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Returns `true` for the characters that end a line.
#[inline]
#[must_use]
pub const fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{85}' | '\u{2028}' | '\u{2029}')
}

/// Simple (single character) case folding.
#[must_use]
pub fn fold(c: char) -> char {
    simple_lower(simple_upper(c))
}

fn simple_lower(c: char) -> char {
    let mut lower = c.to_lowercase();
    match (lower.next(), lower.next()) {
        (Some(l), None) => l,
        _ => c,
    }
}

fn simple_upper(c: char) -> char {
    let mut upper = c.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(u), None) => u,
        _ => c,
    }
}

fn succ(c: char) -> Option<char> {
    match c {
        '\u{D7FF}' => Some('\u{E000}'),
        char::MAX => None,
        _ => char::from_u32(c as u32 + 1),
    }
}

fn pred(c: char) -> Option<char> {
    match c {
        '\0' => None,
        '\u{E000}' => Some('\u{D7FF}'),
        _ => char::from_u32(c as u32 - 1),
    }
}
