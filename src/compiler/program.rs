use crate::{ast::Anchor, charset::CharSet, pattern::Flags};
use std::fmt;

/// A single instruction of a compiled [`Program`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Inst {
    /// Consume one character equal to the given one.
    Char(char),
    /// Consume any character except, without `dot_all`, a line terminator.
    Any,
    /// Consume one character that is (or with `negated`, is not) in the set.
    Class { set: CharSet, negated: bool },
    /// Continue at `prefer`; on failure resume at `alt`.
    Split { prefer: usize, alt: usize },
    Jump(usize),
    /// Record the current position in a capture slot.
    Save(usize),
    Assert(Anchor),
    /// Consume the text last captured by the group.
    Backref(usize),
    /// Run `body` at the current position without consuming input.
    LookAhead { negated: bool, body: Box<[Inst]> },
    /// Run `body` so that it ends at the current position, starting between
    /// `min` and `max` characters back.
    LookBehind {
        negated: bool,
        body: Box<[Inst]>,
        min: usize,
        max: usize,
    },
    /// Record the position at which a loop iteration starts.
    SetMark(usize),
    /// Fail unless the iteration started at the mark consumed input.
    CheckProgress(usize),
    Match,
}

/// An immutable compiled pattern.
#[derive(Clone, Debug)]
pub struct Program {
    pub(crate) insts: Vec<Inst>,
    pub(crate) slot_count: usize,
    pub(crate) mark_count: usize,
    pub(crate) requires_backtracking: bool,
    pub(crate) min_len: usize,
    pub(crate) anchored: bool,
    pub(crate) flags: Flags,
}

impl Program {
    #[must_use]
    pub fn insts(&self) -> &[Inst] {
        &self.insts
    }

    /// Returns the number of capture slots: a start and an end for the whole
    /// match and for every capturing group.
    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.slot_count
    }

    /// Returns the number of capturing groups, not counting the whole match.
    #[must_use]
    pub fn group_count(&self) -> usize {
        self.slot_count / 2 - 1
    }

    #[must_use]
    pub fn mark_count(&self) -> usize {
        self.mark_count
    }

    /// Returns `true` if the program uses backreferences, lookaround or loop
    /// progress marks, whose outcome depends on more than the current
    /// instruction and position.
    #[must_use]
    pub fn requires_backtracking(&self) -> bool {
        self.requires_backtracking
    }

    /// Returns the fewest characters any match can span.
    #[must_use]
    pub fn min_len(&self) -> usize {
        self.min_len
    }

    /// Returns `true` if a match can only begin at the start of the input.
    #[must_use]
    pub fn is_anchored(&self) -> bool {
        self.anchored
    }

    #[must_use]
    pub fn flags(&self) -> Flags {
        self.flags
    }
}

impl fmt::Display for Inst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Inst::Char(c) => write!(f, "char '{}'", c.escape_debug()),
            Inst::Any => f.write_str("any"),
            Inst::Class { set, negated } => {
                write!(f, "class [{}{set}]", if *negated { "^" } else { "" })
            }
            Inst::Split { prefer, alt } => write!(f, "split {prefer}, {alt}"),
            Inst::Jump(target) => write!(f, "jmp {target}"),
            Inst::Save(slot) => write!(f, "save {slot}"),
            Inst::Assert(anchor) => write!(f, "assert {anchor:?}"),
            Inst::Backref(group) => write!(f, "backref {group}"),
            Inst::LookAhead { negated, .. } => {
                write!(f, "lookahead{}", if *negated { " not" } else { "" })
            }
            Inst::LookBehind {
                negated, min, max, ..
            } => write!(
                f,
                "lookbehind{} {{{min},{max}}}",
                if *negated { " not" } else { "" }
            ),
            Inst::SetMark(mark) => write!(f, "mark {mark}"),
            Inst::CheckProgress(mark) => write!(f, "progress {mark}"),
            Inst::Match => f.write_str("match"),
        }
    }
}

fn write_listing(f: &mut fmt::Formatter<'_>, insts: &[Inst], depth: usize) -> fmt::Result {
    for (pc, inst) in insts.iter().enumerate() {
        writeln!(f, "{:indent$}{pc:04} {inst}", "", indent = depth * 4)?;
        if let Inst::LookAhead { body, .. } | Inst::LookBehind { body, .. } = inst {
            write_listing(f, body, depth + 1)?;
        }
    }
    Ok(())
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_listing(f, &self.insts, 0)
    }
}
