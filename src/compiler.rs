pub mod program;

pub use self::program::{Inst, Program};
use super::{
    Error, MAX_PROGRAM_LEN, Result,
    ast::{AstNode, AstRoot, LookKind, Quantifier},
    pattern::Flags,
};
use log::trace;

/// Lowers a parsed pattern into a [`Program`].
///
/// Each capturing group `n` is bracketed by `Save(2n)` and `Save(2n + 1)`.
/// Slots 0 and 1 belong to the whole match and are filled in by the executor.
///
/// # Errors
///
/// [`Error::ProgramTooLarge`] if counted repetitions expand past
/// [`MAX_PROGRAM_LEN`] instructions. [`Error::Internal`] if the tree refers to
/// a group the root does not declare, which the parser never produces.
pub fn compile(ast: &AstRoot, flags: Flags) -> Result<Program> {
    let mut compiler = Compiler {
        insts: Vec::new(),
        total: 0,
        group_count: ast.capture_count(),
        mark_count: 0,
        has_backref: false,
        has_lookaround: false,
    };
    compiler.emit(ast)?;
    compiler.push(Inst::Match)?;

    let program = Program {
        slot_count: 2 * (compiler.group_count + 1),
        mark_count: compiler.mark_count,
        requires_backtracking: compiler.has_backref
            || compiler.has_lookaround
            || compiler.mark_count > 0,
        min_len: ast.width().min,
        anchored: ast.is_anchored_start(),
        insts: compiler.insts,
        flags,
    };

    trace!(
        "Compiled {} instructions ({} total), {} slots, {} marks, backtracking: {}",
        program.insts.len(),
        compiler.total,
        program.slot_count,
        program.mark_count,
        program.requires_backtracking
    );

    Ok(program)
}

struct Compiler {
    /// The instruction list currently being written. Lookaround bodies swap in
    /// a fresh list while they are compiled.
    insts: Vec<Inst>,
    /// Instructions emitted so far, nested bodies included.
    total: usize,
    group_count: usize,
    mark_count: usize,
    has_backref: bool,
    has_lookaround: bool,
}

impl Compiler {
    fn pc(&self) -> usize {
        self.insts.len()
    }

    fn push(&mut self, inst: Inst) -> Result<usize> {
        self.total += 1;
        if self.total > MAX_PROGRAM_LEN {
            return Err(Error::ProgramTooLarge {
                limit: MAX_PROGRAM_LEN,
            });
        }
        self.insts.push(inst);
        Ok(self.insts.len() - 1)
    }

    /// Points the jump or split at `at` to `target`. A split's preferred
    /// branch is always the instruction following it unless `prefer_target`
    /// is set.
    fn patch(&mut self, at: usize, target: usize, prefer_target: bool) {
        match &mut self.insts[at] {
            Inst::Jump(to) => *to = target,
            Inst::Split { prefer, alt } => {
                if prefer_target {
                    *prefer = target;
                    *alt = at + 1;
                } else {
                    *prefer = at + 1;
                    *alt = target;
                }
            }
            inst => debug_assert!(false, "cannot patch {inst}"),
        }
    }

    fn check_group(&self, index: usize) -> Result<()> {
        debug_assert!(
            (1..=self.group_count).contains(&index),
            "group {index} out of range"
        );
        if (1..=self.group_count).contains(&index) {
            Ok(())
        } else {
            Err(Error::Internal("group index out of range"))
        }
    }

    fn emit(&mut self, node: &AstNode) -> Result<()> {
        match node {
            AstNode::Literal(c) => {
                self.push(Inst::Char(*c))?;
            }
            AstNode::AnyChar => {
                self.push(Inst::Any)?;
            }
            AstNode::Class { set, negated } => {
                self.push(Inst::Class {
                    set: set.clone(),
                    negated: *negated,
                })?;
            }
            AstNode::Anchor(anchor) => {
                self.push(Inst::Assert(*anchor))?;
            }
            AstNode::Group {
                inner,
                index: Some(index),
            } => {
                self.check_group(*index)?;
                self.push(Inst::Save(2 * index))?;
                self.emit(inner)?;
                self.push(Inst::Save(2 * index + 1))?;
            }
            AstNode::Group { inner, index: None } => self.emit(inner)?,
            AstNode::Backreference(index) => {
                self.check_group(*index)?;
                self.has_backref = true;
                self.push(Inst::Backref(*index))?;
            }
            AstNode::Lookaround { inner, kind } => self.emit_look(inner, *kind)?,
            AstNode::Concat(nodes) => {
                for node in nodes {
                    self.emit(node)?;
                }
            }
            AstNode::Alternation(branches) => self.emit_alternation(branches)?,
            AstNode::Repeat { inner, quantifier } => self.emit_repeat(inner, *quantifier)?,
        }
        Ok(())
    }

    /// ```text
    ///     split L1, L2
    /// L1: <first>
    ///     jmp END
    /// L2: <second>
    /// END:
    /// ```
    fn emit_alternation(&mut self, branches: &[AstNode]) -> Result<()> {
        let Some((last, rest)) = branches.split_last() else {
            return Ok(());
        };

        let mut jumps = Vec::with_capacity(rest.len());
        for branch in rest {
            let split = self.push(Inst::Split { prefer: 0, alt: 0 })?;
            self.emit(branch)?;
            jumps.push(self.push(Inst::Jump(0))?);
            let next = self.pc();
            self.patch(split, next, false);
        }
        self.emit(last)?;

        let end = self.pc();
        for jump in jumps {
            self.patch(jump, end, false);
        }
        Ok(())
    }

    fn emit_repeat(&mut self, inner: &AstNode, quantifier: Quantifier) -> Result<()> {
        let Quantifier { min, max, lazy } = quantifier;

        match max {
            Some(max) => {
                for _ in 0..min {
                    self.emit(inner)?;
                }

                // x{2,4} is x x (x (x)?)?
                let mut splits = Vec::new();
                for _ in min..max {
                    splits.push(self.push(Inst::Split { prefer: 0, alt: 0 })?);
                    self.emit(inner)?;
                }
                let end = self.pc();
                for split in splits {
                    self.patch(split, end, lazy);
                }
            }
            None if min == 0 => {
                let guard = self.push(Inst::Split { prefer: 0, alt: 0 })?;
                self.emit_loop(inner, lazy)?;
                let end = self.pc();
                self.patch(guard, end, lazy);
            }
            None => {
                for _ in 1..min {
                    self.emit(inner)?;
                }
                self.emit_loop(inner, lazy)?;
            }
        }
        Ok(())
    }

    /// Emits one or more iterations of `inner`. When `inner` can match the
    /// empty string, an iteration that consumed nothing may not repeat:
    ///
    /// ```text
    /// L1: mark m
    ///     <inner>
    ///     split L2, END
    /// L2: progress m
    ///     jmp L1
    /// END:
    /// ```
    fn emit_loop(&mut self, inner: &AstNode, lazy: bool) -> Result<()> {
        if inner.width().min > 0 {
            let top = self.pc();
            self.emit(inner)?;
            let split = self.push(Inst::Split { prefer: 0, alt: 0 })?;
            let next = split + 1;
            if lazy {
                self.insts[split] = Inst::Split {
                    prefer: next,
                    alt: top,
                };
            } else {
                self.insts[split] = Inst::Split {
                    prefer: top,
                    alt: next,
                };
            }
            return Ok(());
        }

        let mark = self.mark_count;
        self.mark_count += 1;

        let top = self.push(Inst::SetMark(mark))?;
        self.emit(inner)?;
        let split = self.push(Inst::Split { prefer: 0, alt: 0 })?;
        self.push(Inst::CheckProgress(mark))?;
        self.push(Inst::Jump(top))?;
        let end = self.pc();
        self.patch(split, end, lazy);
        Ok(())
    }

    /// Compiles the lookaround body into its own instruction list ending in
    /// `Match`.
    fn emit_look(&mut self, inner: &AstNode, kind: LookKind) -> Result<()> {
        self.has_lookaround = true;

        let outer = std::mem::take(&mut self.insts);
        let body = self.emit(inner).and_then(|()| self.push(Inst::Match));
        let body_insts = std::mem::replace(&mut self.insts, outer);
        body?;
        let body = body_insts.into_boxed_slice();

        let negated = kind.is_negative();
        let inst = if kind.is_behind() {
            let width = inner.width();
            let Some(max) = width.max else {
                return Err(Error::Internal("lookbehind without a maximum width"));
            };
            Inst::LookBehind {
                negated,
                body,
                min: width.min,
                max,
            }
        } else {
            Inst::LookAhead { negated, body }
        };
        self.push(inst)?;
        Ok(())
    }
}
