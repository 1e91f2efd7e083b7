pub mod node;
pub mod quantifier;
mod tree;

pub use self::{
    node::{Anchor, AstNode, LookKind, Width},
    quantifier::Quantifier,
};
pub use super::parser::parse_pattern;

/// A parsed pattern: the root node plus the number of capturing groups.
#[derive(Clone, Debug)]
pub struct AstRoot {
    tree: AstNode,
    capture_count: usize,
}

impl AstRoot {
    #[must_use]
    pub(crate) fn new(tree: AstNode, capture_count: usize) -> Self {
        Self {
            tree,
            capture_count,
        }
    }

    #[must_use]
    pub fn capture_count(&self) -> usize {
        self.capture_count
    }
}

impl std::ops::Deref for AstRoot {
    type Target = AstNode;

    fn deref(&self) -> &Self::Target {
        &self.tree
    }
}

impl PartialEq<AstNode> for AstRoot {
    fn eq(&self, other: &AstNode) -> bool {
        self.tree == *other
    }
}
