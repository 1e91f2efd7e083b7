use crate::ast::LookKind;

/// A pattern string token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    /// A normal character.
    Literal(char),
    /// A character written as an escape (`\.`, `\t`, `\x41`) or quoted by
    /// `\Q...\E`.
    EscapedLiteral(char),
    /// `.`
    Any,
    /// A class escape like `\d` or `\W` (just the identifying letter).
    Class(char),
    /// `(`
    LParen,
    /// `(?:`
    NonCapturing,
    /// `(?=`, `(?!`, `(?<=` or `(?<!`
    Look(LookKind),
    /// `)`
    RParen,
    /// `[`
    LBracket,
    /// `]` closing a character class.
    RBracket,
    /// `^`, or the negation marker right after `[`.
    Caret,
    /// `$`
    Dollar,
    /// `\b`
    WordBoundary,
    /// `\B`
    NotWordBoundary,
    /// `\A`
    StartInput,
    /// `\z`
    EndInput,
    /// `\1`, `\2`, ...
    Backref(usize),
    /// `|`
    Pipe,
    /// `*`
    Star,
    /// `+`
    Plus,
    /// `?`
    Question,
    /// `{m}`, `{m,}` or `{m,n}`
    Counted { min: u32, max: Option<u32> },
    /// `-` inside a character class.
    Minus,
}

impl Token {
    /// Returns the character the token starts with in the pattern, or for
    /// literal tokens the character they stand for.
    #[must_use]
    pub const fn to_char(self) -> char {
        match self {
            Token::Literal(c) | Token::EscapedLiteral(c) => c,
            Token::Any => '.',
            Token::LParen | Token::NonCapturing | Token::Look(_) => '(',
            Token::RParen => ')',
            Token::LBracket => '[',
            Token::RBracket => ']',
            Token::Caret => '^',
            Token::Dollar => '$',
            Token::Class(_)
            | Token::WordBoundary
            | Token::NotWordBoundary
            | Token::StartInput
            | Token::EndInput
            | Token::Backref(_) => '\\',
            Token::Pipe => '|',
            Token::Star => '*',
            Token::Plus => '+',
            Token::Question => '?',
            Token::Counted { .. } => '{',
            Token::Minus => '-',
        }
    }

    /// Returns `true` for tokens that repeat the preceding item.
    #[must_use]
    pub const fn is_quantifier(self) -> bool {
        matches!(
            self,
            Token::Star | Token::Plus | Token::Question | Token::Counted { .. }
        )
    }
}

/// A [`Token`] with associated position information.
#[derive(Clone, Copy, Debug, Eq)]
pub struct PosToken {
    /// The start position of the token in the pattern string, in characters.
    pub pos: usize,
    /// The token.
    pub token: Token,
}

impl core::ops::Deref for PosToken {
    type Target = Token;

    fn deref(&self) -> &Self::Target {
        &self.token
    }
}

impl PartialEq for PosToken {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.token == other.token
    }
}
