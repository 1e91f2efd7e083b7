use super::{
    Error, MAX_NESTING, MAX_REPEAT, Result,
    ast::{Anchor, AstNode, AstRoot, LookKind, Quantifier},
    charset::CharSet,
    lexer::{Lexer, PosToken, Token},
    pattern::Flags,
};

/// Parses a regular expression into an AST.
///
/// `flags` decide how `^` and `$` are read: with [`Flags::multiline`] they
/// become line anchors, otherwise input anchors.
///
/// # Errors
///
/// If the pattern string cannot be parsed, an [`Error`] carrying the offending
/// character offset is returned.
pub fn parse_pattern(pattern: &str, flags: Flags) -> Result<AstRoot> {
    Parser::new(pattern, flags)?.parse()
}

/// Converts a pattern string into an AST.
struct Parser<'a> {
    lexer: Lexer<'a>,
    flags: Flags,
    capture_count: usize,
    /// Number of groups currently open.
    depth: usize,
    /// Backreferences seen so far, validated once every group is known.
    backrefs: Vec<(usize, usize)>,
}

impl<'a> Parser<'a> {
    /// Creates a new parser for the given `pattern`.
    fn new(pattern: &'a str, flags: Flags) -> Result<Self> {
        Ok(Parser {
            lexer: Lexer::new(pattern)?,
            flags,
            capture_count: 0,
            depth: 0,
            backrefs: Vec::new(),
        })
    }

    /// Converts the pattern into an [`AstRoot`], consuming the parser.
    fn parse(mut self) -> Result<AstRoot> {
        let tree = self.parse_alternation()?;

        // Only a `)` stops an alternation before the end of the pattern.
        if let Some(PosToken { pos, .. }) = self.lexer.peek() {
            return Err(Error::UnmatchedParen { pos });
        }

        if let Some(&(pos, index)) = self
            .backrefs
            .iter()
            .find(|&&(_, index)| index > self.capture_count)
        {
            return Err(Error::InvalidBackreference { pos, index });
        }

        Ok(AstRoot::new(tree, self.capture_count))
    }

    fn parse_alternation(&mut self) -> Result<AstNode> {
        let mut branches = vec![self.parse_sequence()?];
        while self.lexer.consume(Token::Pipe)? {
            branches.push(self.parse_sequence()?);
        }

        Ok(if branches.len() == 1 {
            branches.swap_remove(0)
        } else {
            AstNode::Alternation(branches)
        })
    }

    fn parse_sequence(&mut self) -> Result<AstNode> {
        let mut items = Vec::new();

        while let Some(PosToken { token, .. }) = self.lexer.peek()
            && !matches!(token, Token::RParen | Token::Pipe)
        {
            items.push(self.parse_item()?);
        }

        Ok(if items.len() == 1 {
            items.swap_remove(0)
        } else {
            AstNode::Concat(items)
        })
    }

    fn parse_item(&mut self) -> Result<AstNode> {
        let base_item = self.parse_base()?;

        let Some(PosToken { pos, token }) = self.lexer.peek() else {
            return Ok(base_item);
        };
        let mut quantifier = match token {
            Token::Star => Quantifier::STAR,
            Token::Plus => Quantifier::PLUS,
            Token::Question => Quantifier::QUESTION,
            Token::Counted { min, max } => {
                check_bounds(pos, min, max)?;
                Quantifier::new(min, max)
            }
            _ => return Ok(base_item),
        };
        self.lexer.next_token()?;

        if let AstNode::Anchor(_) = base_item {
            return Err(Error::DanglingQuantifier {
                pos,
                lit: token.to_char(),
            });
        }

        if self.lexer.consume(Token::Question)? {
            quantifier = quantifier.lazy();
        }

        if let Some(PosToken { pos, token }) = self.lexer.peek()
            && token.is_quantifier()
        {
            return Err(Error::DanglingQuantifier {
                pos,
                lit: token.to_char(),
            });
        }

        Ok(AstNode::Repeat {
            inner: Box::new(base_item),
            quantifier,
        })
    }

    fn parse_base(&mut self) -> Result<AstNode> {
        let Some(PosToken { pos, token }) = self.lexer.next_token()? else {
            return Err(Error::UnexpectedEnd {
                pos: self.lexer.tell(),
            });
        };

        match token {
            Token::Literal(c) | Token::EscapedLiteral(c) => Ok(AstNode::Literal(c)),
            Token::Any => Ok(AstNode::AnyChar),
            Token::Class(c) => {
                let negated = c.is_ascii_uppercase();
                let set = CharSet::from_class(c.to_ascii_lowercase())
                    .map_err(|err| Error::CharSet { pos, err })?;
                Ok(AstNode::Class { set, negated })
            }
            Token::LBracket => self.parse_set(pos),
            Token::LParen => {
                self.capture_count += 1;
                let index = self.capture_count;
                let inner = self.parse_group_body(pos)?;
                Ok(AstNode::Group {
                    inner: Box::new(inner),
                    index: Some(index),
                })
            }
            Token::NonCapturing => {
                let inner = self.parse_group_body(pos)?;
                Ok(AstNode::Group {
                    inner: Box::new(inner),
                    index: None,
                })
            }
            Token::Look(kind) => self.parse_lookaround(pos, kind),
            Token::Caret => Ok(AstNode::Anchor(if self.flags.multiline {
                Anchor::StartLine
            } else {
                Anchor::StartInput
            })),
            Token::Dollar => Ok(AstNode::Anchor(if self.flags.multiline {
                Anchor::EndLine
            } else {
                Anchor::EndInput
            })),
            Token::StartInput => Ok(AstNode::Anchor(Anchor::StartInput)),
            Token::EndInput => Ok(AstNode::Anchor(Anchor::EndInput)),
            Token::WordBoundary => Ok(AstNode::Anchor(Anchor::WordBoundary)),
            Token::NotWordBoundary => Ok(AstNode::Anchor(Anchor::NotWordBoundary)),
            Token::Backref(index) => {
                self.backrefs.push((pos, index));
                Ok(AstNode::Backreference(index))
            }
            Token::Star | Token::Plus | Token::Question | Token::Counted { .. } => {
                Err(Error::DanglingQuantifier {
                    pos,
                    lit: token.to_char(),
                })
            }
            Token::RParen => Err(Error::UnmatchedParen { pos }),
            // `|` ends a sequence, `]` and `-` are only lexed inside a class.
            Token::RBracket | Token::Minus | Token::Pipe => {
                Err(Error::Internal("token cannot start an item"))
            }
        }
    }

    fn parse_group_body(&mut self, open: usize) -> Result<AstNode> {
        if self.depth == MAX_NESTING {
            return Err(Error::NestingTooDeep { pos: open });
        }
        self.depth += 1;
        let inner = self.parse_alternation()?;
        self.depth -= 1;
        if self.lexer.consume(Token::RParen)? {
            Ok(inner)
        } else {
            Err(Error::UnclosedGroup { pos: open })
        }
    }

    fn parse_lookaround(&mut self, open: usize, kind: LookKind) -> Result<AstNode> {
        let inner = self.parse_group_body(open)?;
        if kind.is_behind() && inner.width().max.is_none() {
            return Err(Error::UnboundedLookbehind { pos: open });
        }
        Ok(AstNode::Lookaround {
            inner: Box::new(inner),
            kind,
        })
    }

    fn parse_set(&mut self, open: usize) -> Result<AstNode> {
        let mut set = CharSet::new();
        let negated = self.lexer.consume(Token::Caret)?;

        while let Some(PosToken { pos, token }) = self.lexer.until(Token::RBracket)? {
            if let Token::Class(c) = token {
                set.add_class(c)
                    .map_err(|err| Error::CharSet { pos, err })?;
                continue;
            }

            let start = token.to_char();
            if !self.lexer.consume(Token::Minus)? {
                set.add_char(start);
                continue;
            }

            match self.lexer.peek().map(|next| next.token) {
                // [a-z], [+--]
                Some(
                    next @ (Token::Literal(_) | Token::EscapedLiteral(_) | Token::Minus),
                ) => {
                    self.lexer.next_token()?;
                    set.add_range(start, next.to_char())
                        .map_err(|err| Error::CharSet { pos, err })?;
                }
                // [a-], [a-\d]
                _ => {
                    set.add_char(start);
                    set.add_char('-');
                }
            }
        }

        if !self.lexer.consume(Token::RBracket)? {
            return Err(Error::UnclosedClass { pos: open });
        }

        Ok(AstNode::Class { set, negated })
    }
}

fn check_bounds(pos: usize, min: u32, max: Option<u32>) -> Result<()> {
    if let Some(max) = max
        && max < min
    {
        return Err(Error::InvalidRepetition { pos });
    }

    let count = max.unwrap_or(min);
    if count > MAX_REPEAT {
        return Err(Error::RepetitionTooLarge { pos, count });
    }

    Ok(())
}
