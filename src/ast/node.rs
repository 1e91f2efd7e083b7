use super::{super::CharSet, Quantifier};

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum AstNode {
    Literal(char),
    AnyChar, // .
    Class {
        set: CharSet,
        negated: bool, // [^...], \D, \W, \S
    },

    // Zero-width assertions
    Anchor(Anchor),

    Group {
        inner: Box<AstNode>,
        index: Option<usize>, // None for (?:...)
    },

    Backreference(usize), // \1, \2, ...

    Lookaround {
        inner: Box<AstNode>,
        kind: LookKind,
    },

    Concat(Vec<AstNode>),
    Alternation(Vec<AstNode>),

    Repeat {
        inner: Box<AstNode>,
        quantifier: Quantifier,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Anchor {
    StartLine,       // ^ (multiline)
    EndLine,         // $ (multiline)
    StartInput,      // ^, \A
    EndInput,        // $, \z
    WordBoundary,    // \b
    NotWordBoundary, // \B
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LookKind {
    AheadPositive,  // (?=...)
    AheadNegative,  // (?!...)
    BehindPositive, // (?<=...)
    BehindNegative, // (?<!...)
}

impl LookKind {
    #[must_use]
    pub const fn is_behind(self) -> bool {
        matches!(self, LookKind::BehindPositive | LookKind::BehindNegative)
    }

    #[must_use]
    pub const fn is_negative(self) -> bool {
        matches!(self, LookKind::AheadNegative | LookKind::BehindNegative)
    }
}

/// The number of characters a node can match.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Width {
    pub min: usize,
    /// `None` if the node can match arbitrarily long text.
    pub max: Option<usize>,
}

impl Width {
    const ZERO: Width = Width::exact(0);
    const ONE: Width = Width::exact(1);

    const fn exact(n: usize) -> Self {
        Width {
            min: n,
            max: Some(n),
        }
    }

    fn then(self, next: Width) -> Width {
        Width {
            min: self.min.saturating_add(next.min),
            max: self.max.zip(next.max).map(|(a, b)| a.saturating_add(b)),
        }
    }

    fn or(self, other: Width) -> Width {
        Width {
            min: self.min.min(other.min),
            max: self.max.zip(other.max).map(|(a, b)| a.max(b)),
        }
    }
}

impl AstNode {
    /// An empty sequence, matching the empty string.
    #[must_use]
    pub const fn empty() -> Self {
        AstNode::Concat(Vec::new())
    }

    /// Returns the bounds on how many characters this node can match.
    #[must_use]
    pub fn width(&self) -> Width {
        match self {
            AstNode::Literal(_) | AstNode::AnyChar | AstNode::Class { .. } => Width::ONE,
            AstNode::Anchor(_) | AstNode::Lookaround { .. } => Width::ZERO,
            AstNode::Group { inner, .. } => inner.width(),
            AstNode::Backreference(_) => Width { min: 0, max: None },
            AstNode::Concat(nodes) => nodes
                .iter()
                .fold(Width::ZERO, |width, node| width.then(node.width())),
            AstNode::Alternation(branches) => branches
                .iter()
                .map(AstNode::width)
                .reduce(Width::or)
                .unwrap_or(Width::ZERO),
            AstNode::Repeat { inner, quantifier } => {
                let inner = inner.width();
                let min = inner.min.saturating_mul(quantifier.min as usize);
                let max = match (inner.max, quantifier.max) {
                    (Some(0), _) | (_, Some(0)) => Some(0),
                    (Some(w), Some(n)) => Some(w.saturating_mul(n as usize)),
                    _ => None,
                };
                Width { min, max }
            }
        }
    }

    /// Returns `true` if every match of this node must begin at the start of
    /// the input.
    #[must_use]
    pub fn is_anchored_start(&self) -> bool {
        match self {
            AstNode::Anchor(Anchor::StartInput) => true,
            AstNode::Concat(nodes) => nodes.first().is_some_and(AstNode::is_anchored_start),
            AstNode::Group { inner, .. } => inner.is_anchored_start(),
            AstNode::Alternation(branches) => branches.iter().all(AstNode::is_anchored_start),
            AstNode::Repeat { inner, quantifier } => {
                quantifier.min > 0 && inner.is_anchored_start()
            }
            _ => false,
        }
    }

    /// Returns the direct children of this node, in pattern order.
    #[must_use]
    pub fn children(&self) -> &[AstNode] {
        match self {
            AstNode::Group { inner, .. }
            | AstNode::Lookaround { inner, .. }
            | AstNode::Repeat { inner, .. } => std::slice::from_ref(inner.as_ref()),
            AstNode::Concat(nodes) | AstNode::Alternation(nodes) => nodes,
            _ => &[],
        }
    }
}
