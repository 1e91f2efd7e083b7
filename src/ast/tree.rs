//! Text rendering of a parse tree, one line per node.

use super::{AstNode, AstRoot, node::LookKind};
use std::fmt;

impl AstNode {
    /// Returns a one-line description of this node: its variant followed by
    /// its key attributes.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            AstNode::Literal(c) => format!("Literal '{}'", c.escape_debug()),
            AstNode::AnyChar => "AnyChar".to_owned(),
            AstNode::Class { set, negated } => {
                format!("CharClass [{}{set}]", if *negated { "^" } else { "" })
            }
            AstNode::Anchor(anchor) => format!("Anchor {anchor:?}"),
            AstNode::Group {
                index: Some(index), ..
            } => format!("Group #{index}"),
            AstNode::Group { index: None, .. } => "Group (non-capturing)".to_owned(),
            AstNode::Backreference(index) => format!("Backreference \\{index}"),
            AstNode::Lookaround { kind, .. } => {
                let name = match kind {
                    LookKind::AheadPositive => "AheadPositive",
                    LookKind::AheadNegative => "AheadNegative",
                    LookKind::BehindPositive => "BehindPositive",
                    LookKind::BehindNegative => "BehindNegative",
                };
                format!("Lookaround {name}")
            }
            AstNode::Concat(nodes) if nodes.is_empty() => "Empty".to_owned(),
            AstNode::Concat(_) => "Concat".to_owned(),
            AstNode::Alternation(_) => "Alternation".to_owned(),
            AstNode::Repeat { quantifier, .. } => format!("Repeat {quantifier}"),
        }
    }

    fn render(&self, depth: usize, out: &mut String) {
        for _ in 0..depth {
            out.push_str("  ");
        }
        out.push_str(&self.label());
        out.push('\n');
        for child in self.children() {
            child.render(depth + 1, out);
        }
    }
}

impl fmt::Display for AstRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        self.render(0, &mut out);
        f.write_str(&out)
    }
}
