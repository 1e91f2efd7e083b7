//! Runs compiled programs against input text.
//!
//! Matching is backtracking over an explicit stack of frames, so deeply
//! nested patterns and long inputs never grow the native stack. Programs that
//! do not need full backtracking (see [`Program::requires_backtracking`]) also
//! record every (instruction, position) pair that failed and never explore it
//! twice, which bounds their running time by the size of that table.

mod budget;
mod state;

pub use self::budget::Budget;
pub(crate) use self::budget::{Limit, Unlimited};
use self::state::{Frame, State};
use crate::{
    charset::is_line_terminator,
    compiler::{Inst, Program},
};
use log::trace;

/// The largest (instruction × position) table the memoized strategy will
/// allocate, in bits.
const MAX_VISITED_BITS: usize = 1 << 21;

/// The result of one search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Outcome {
    /// The capture slots of the match, if one was found. Slots 0 and 1 hold
    /// the byte range of the whole match.
    pub slots: Option<Vec<Option<usize>>>,
    /// Whether the search inspected the end of the input.
    pub hit_end: bool,
}

/// How a search explores the program.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Strategy {
    Backtrack,
    Memoized,
}

impl Strategy {
    /// Picks a strategy for a search over `len` bytes of input.
    fn choose(program: &Program, len: usize) -> Self {
        let cells = program.insts.len().saturating_mul(len + 1);
        if program.requires_backtracking || cells > MAX_VISITED_BITS {
            Strategy::Backtrack
        } else {
            Strategy::Memoized
        }
    }
}

/// Finds the leftmost match starting at or after byte offset `start`.
///
/// A `start` inside a character begins the search at the next character
/// boundary. A `start` past the end never matches.
pub(crate) fn find_at<L: Limit>(
    program: &Program,
    input: &str,
    start: usize,
    limit: &mut L,
) -> Result<Outcome, L::Error> {
    let strategy = Strategy::choose(program, input.len().saturating_sub(start));
    search(program, input, start, strategy, limit)
}

/// Tries a single match at offset 0 that must consume the whole input.
pub(crate) fn match_full<L: Limit>(
    program: &Program,
    input: &str,
    limit: &mut L,
) -> Result<Outcome, L::Error> {
    full(program, input, Strategy::choose(program, input.len()), limit)
}

fn search<L: Limit>(
    program: &Program,
    input: &str,
    start: usize,
    strategy: Strategy,
    limit: &mut L,
) -> Result<Outcome, L::Error> {
    if start > input.len() {
        return Ok(Outcome {
            slots: None,
            hit_end: false,
        });
    }
    let start = (start..input.len())
        .find(|&at| input.is_char_boundary(at))
        .unwrap_or(input.len());

    let memoize = strategy == Strategy::Memoized;
    let mut state = State::new(program, input, limit, start, memoize);
    let rest = &input[start..];
    // The last offset with at least `min_len` characters after it.
    let last_start = match program.min_len {
        0 => Some(input.len()),
        min_len => rest
            .char_indices()
            .rev()
            .nth(min_len - 1)
            .map(|(at, _)| start + at),
    };
    let candidates = rest
        .char_indices()
        .map(|(at, _)| start + at)
        .chain(std::iter::once(input.len()));

    for pos in candidates {
        if last_start.is_none_or(|last| pos > last) {
            state.hit_end = true;
            break;
        }

        if let Some(end) = attempt(&mut state, pos, None)? {
            trace!("{strategy:?} match at {pos}..{end}");
            return Ok(finish(state, pos, Some(end)));
        }

        if program.anchored {
            break;
        }
    }

    trace!("{strategy:?} search from {start} failed");
    Ok(finish(state, start, None))
}

fn full<L: Limit>(
    program: &Program,
    input: &str,
    strategy: Strategy,
    limit: &mut L,
) -> Result<Outcome, L::Error> {
    let mut state = State::new(program, input, limit, 0, strategy == Strategy::Memoized);
    let end = attempt(&mut state, 0, Some(input.len()))?;
    trace!("{strategy:?} full match: {end:?}");
    Ok(finish(state, 0, end))
}

fn finish<L: Limit>(state: State<'_, L>, start: usize, end: Option<usize>) -> Outcome {
    let hit_end = state.hit_end;
    let slots = end.map(|end| {
        let mut slots = state.slots;
        slots[0] = Some(start);
        slots[1] = Some(end);
        slots
    });
    Outcome { slots, hit_end }
}

fn attempt<L: Limit>(
    state: &mut State<'_, L>,
    pos: usize,
    must_end: Option<usize>,
) -> Result<Option<usize>, L::Error> {
    state.clear();
    let program = state.program;
    run(state, &program.insts, pos, must_end)
}

/// Runs `insts` from `start` until one thread reaches `Match`, returning its
/// end position. On failure every frame pushed since entry has been undone.
fn run<'a, L: Limit>(
    state: &mut State<'a, L>,
    insts: &'a [Inst],
    start: usize,
    must_end: Option<usize>,
) -> Result<Option<usize>, L::Error> {
    let base = state.stack.len();
    state.stack.push(Frame::Branch { pc: 0, pos: start });

    while let Some(frame) = state.pop_above(base) {
        let Frame::Branch { pc, pos } = frame else {
            state.restore(frame);
            continue;
        };
        if let Some(end) = step(state, insts, pc, pos, must_end)? {
            return Ok(Some(end));
        }
    }

    Ok(None)
}

/// Follows one thread until it matches or fails.
fn step<'a, L: Limit>(
    state: &mut State<'a, L>,
    insts: &'a [Inst],
    mut pc: usize,
    mut pos: usize,
    must_end: Option<usize>,
) -> Result<Option<usize>, L::Error> {
    loop {
        state.limit.tick()?;

        if let Some(visited) = &mut state.visited
            && !visited.insert(pc, pos)
        {
            return Ok(None);
        }

        match &insts[pc] {
            Inst::Char(expected) => match state.char_at(pos) {
                Some(c) if state.same_char(c, *expected) => {
                    pos += c.len_utf8();
                    pc += 1;
                }
                _ => return Ok(None),
            },
            Inst::Any => match state.char_at(pos) {
                Some(c) if state.program.flags.dot_all || !is_line_terminator(c) => {
                    pos += c.len_utf8();
                    pc += 1;
                }
                _ => return Ok(None),
            },
            Inst::Class { set, negated } => {
                let Some(c) = state.char_at(pos) else {
                    return Ok(None);
                };
                let member = if state.program.flags.case_insensitive {
                    set.contains_folded(c)
                } else {
                    set.contains(c)
                };
                if member == *negated {
                    return Ok(None);
                }
                pos += c.len_utf8();
                pc += 1;
            }
            &Inst::Split { prefer, alt } => {
                state.stack.push(Frame::Branch { pc: alt, pos });
                pc = prefer;
            }
            &Inst::Jump(target) => pc = target,
            &Inst::Save(slot) => {
                state.save(slot, pos);
                pc += 1;
            }
            &Inst::Assert(anchor) => {
                if !state.check_anchor(anchor, pos) {
                    return Ok(None);
                }
                pc += 1;
            }
            &Inst::Backref(group) => {
                let Some(end) = state.match_backref(group, pos) else {
                    return Ok(None);
                };
                pos = end;
                pc += 1;
            }
            Inst::LookAhead { negated, body } => {
                let base = state.stack.len();
                let found = run(state, body, pos, None)?.is_some();
                if !settle(state, base, found, *negated) {
                    return Ok(None);
                }
                pc += 1;
            }
            Inst::LookBehind {
                negated,
                body,
                min,
                max,
            } => {
                let base = state.stack.len();
                let hit_end = state.hit_end;
                let mut found = false;
                for back in *min..=*max {
                    let Some(from) = state.back(pos, back) else {
                        break;
                    };
                    if run(state, body, from, Some(pos))?.is_some() {
                        found = true;
                        break;
                    }
                }
                state.hit_end = hit_end;
                if !settle(state, base, found, *negated) {
                    return Ok(None);
                }
                pc += 1;
            }
            &Inst::SetMark(mark) => {
                state.set_mark(mark, pos);
                pc += 1;
            }
            &Inst::CheckProgress(mark) => {
                if state.marks[mark] == Some(pos) {
                    return Ok(None);
                }
                pc += 1;
            }
            Inst::Match => {
                if must_end.is_some_and(|end| end != pos) {
                    return Ok(None);
                }
                return Ok(Some(pos));
            }
        }
    }
}

/// Resolves a lookaround whose body did or did not match, returning whether
/// the assertion holds. A holding positive assertion keeps the captures its
/// body made; every other outcome discards them.
fn settle<L: Limit>(state: &mut State<'_, L>, base: usize, found: bool, negated: bool) -> bool {
    if found && !negated {
        state.commit(base);
    } else {
        state.unwind(base);
    }
    found != negated
}
