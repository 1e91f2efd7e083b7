use super::{Error, Result, ast::LookKind};
use std::{iter::Peekable, str::Chars};

pub mod token;

pub use token::{PosToken, Token};

/// Where the lexer is relative to a `[...]` class.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SetState {
    Outside,
    /// Right after `[`.
    Opened,
    /// Right after `[^`.
    Negated,
    Inside,
}

/// Splits a pattern string into [`Token`]s, keeping one token of lookahead.
pub struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
    pos: usize,
    set: SetState,
    quoting: bool,
    lookahead: Option<PosToken>,
}

impl<'a> Lexer<'a> {
    /// Creates a lexer and reads the first token of `input`.
    ///
    /// # Errors
    ///
    /// If the first character sequence is not a valid token, an [`Error`] is
    /// returned.
    pub fn new(input: &'a str) -> Result<Self> {
        let mut lexer = Lexer {
            chars: input.chars().peekable(),
            pos: 0,
            set: SetState::Outside,
            quoting: false,
            lookahead: None,
        };
        lexer.lookahead = lexer.scan_token()?;
        Ok(lexer)
    }

    /// Returns the next token without consuming it.
    #[must_use]
    pub fn peek(&self) -> Option<PosToken> {
        self.lookahead
    }

    /// Returns the position of the next token, or the length of the pattern
    /// once it is exhausted.
    #[must_use]
    pub fn tell(&self) -> usize {
        self.lookahead.map_or(self.pos, |token| token.pos)
    }

    /// Consumes and returns the next token.
    ///
    /// # Errors
    ///
    /// If the token after it is malformed, an [`Error`] is returned.
    pub fn next_token(&mut self) -> Result<Option<PosToken>> {
        let current = self.lookahead;
        if current.is_some() {
            match self.scan_token() {
                Ok(next) => self.lookahead = next,
                Err(err) => {
                    self.lookahead = None;
                    return Err(err);
                }
            }
        }
        Ok(current)
    }

    /// Consumes the next token if it is `token`.
    ///
    /// # Errors
    ///
    /// If the token after the consumed one is malformed, an [`Error`] is
    /// returned.
    pub fn consume(&mut self, token: Token) -> Result<bool> {
        if self.lookahead.is_some_and(|next| next.token == token) {
            self.next_token()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Consumes the next token unless it is `end` or the input is exhausted.
    ///
    /// # Errors
    ///
    /// See [`next_token`](Lexer::next_token).
    pub fn until(&mut self, end: Token) -> Result<Option<PosToken>> {
        match self.lookahead {
            Some(next) if next.token != end => self.next_token(),
            _ => Ok(None),
        }
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.chars.peek() == Some(&expected) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn scan_token(&mut self) -> Result<Option<PosToken>> {
        loop {
            let pos = self.pos;
            let Some(c) = self.bump() else {
                return Ok(None);
            };

            let token = if self.quoting {
                if c == '\\' && self.eat('E') {
                    self.quoting = false;
                    continue;
                }
                self.enter_set_body();
                Token::EscapedLiteral(c)
            } else if c == '\\' {
                match self.scan_escape(pos)? {
                    Some(token) => token,
                    None => continue,
                }
            } else if self.set == SetState::Outside {
                self.scan_outside(pos, c)?
            } else {
                self.scan_in_set(c)
            };

            return Ok(Some(PosToken { pos, token }));
        }
    }

    fn enter_set_body(&mut self) {
        if self.set != SetState::Outside {
            self.set = SetState::Inside;
        }
    }

    fn scan_outside(&mut self, pos: usize, c: char) -> Result<Token> {
        Ok(match c {
            '(' => self.scan_group(pos)?,
            ')' => Token::RParen,
            '[' => {
                self.set = SetState::Opened;
                Token::LBracket
            }
            '.' => Token::Any,
            '^' => Token::Caret,
            '$' => Token::Dollar,
            '|' => Token::Pipe,
            '*' => Token::Star,
            '+' => Token::Plus,
            '?' => Token::Question,
            '{' => self.scan_counted(pos)?,
            _ => Token::Literal(c),
        })
    }

    fn scan_in_set(&mut self, c: char) -> Token {
        match (self.set, c) {
            (SetState::Opened, '^') => {
                self.set = SetState::Negated;
                Token::Caret
            }
            // A `]` that would close an empty class is taken literally.
            (SetState::Opened | SetState::Negated, ']') => {
                self.set = SetState::Inside;
                Token::Literal(']')
            }
            (_, ']') => {
                self.set = SetState::Outside;
                Token::RBracket
            }
            (_, '-') => {
                self.set = SetState::Inside;
                Token::Minus
            }
            _ => {
                self.set = SetState::Inside;
                Token::Literal(c)
            }
        }
    }

    fn scan_group(&mut self, pos: usize) -> Result<Token> {
        if !self.eat('?') {
            return Ok(Token::LParen);
        }

        let kind = match self.bump() {
            Some(':') => return Ok(Token::NonCapturing),
            Some('=') => LookKind::AheadPositive,
            Some('!') => LookKind::AheadNegative,
            Some('<') => match self.bump() {
                Some('=') => LookKind::BehindPositive,
                Some('!') => LookKind::BehindNegative,
                _ => return Err(Error::UnknownGroupConstruct { pos }),
            },
            _ => return Err(Error::UnknownGroupConstruct { pos }),
        };
        Ok(Token::Look(kind))
    }

    fn scan_counted(&mut self, pos: usize) -> Result<Token> {
        let min = self
            .scan_number()
            .ok_or(Error::InvalidRepetition { pos })?;

        let max = if self.eat(',') {
            if self.chars.peek() == Some(&'}') {
                None
            } else {
                Some(
                    self.scan_number()
                        .ok_or(Error::InvalidRepetition { pos })?,
                )
            }
        } else {
            Some(min)
        };

        if self.eat('}') {
            Ok(Token::Counted { min, max })
        } else {
            Err(Error::InvalidRepetition { pos })
        }
    }

    fn scan_number(&mut self) -> Option<u32> {
        let mut value: Option<u32> = None;
        while let Some(digit) = self.chars.peek().and_then(|c| c.to_digit(10)) {
            self.bump();
            value = Some(value.unwrap_or(0).saturating_mul(10).saturating_add(digit));
        }
        value
    }

    /// Reads the character after a `\`. Returns `None` when the escape only
    /// switches the lexer into quoting mode.
    fn scan_escape(&mut self, pos: usize) -> Result<Option<Token>> {
        let Some(c) = self.bump() else {
            return Err(Error::UnexpectedEnd { pos });
        };
        let in_set = self.set != SetState::Outside;

        let token = match c {
            'd' | 'D' | 'w' | 'W' | 's' | 'S' => Token::Class(c),
            't' => Token::EscapedLiteral('\t'),
            'n' => Token::EscapedLiteral('\n'),
            'r' => Token::EscapedLiteral('\r'),
            'f' => Token::EscapedLiteral('\u{c}'),
            'a' => Token::EscapedLiteral('\u{7}'),
            'e' => Token::EscapedLiteral('\u{1b}'),
            '0' => Token::EscapedLiteral(self.scan_octal(pos)?),
            'x' => Token::EscapedLiteral(self.scan_hex(pos)?),
            'u' => Token::EscapedLiteral(self.scan_hex_digits(pos, 'u', 4)?),
            'Q' => {
                self.quoting = true;
                return Ok(None);
            }
            'b' if !in_set => Token::WordBoundary,
            'B' if !in_set => Token::NotWordBoundary,
            'A' if !in_set => Token::StartInput,
            'z' if !in_set => Token::EndInput,
            '1'..='9' if !in_set => Token::Backref(self.scan_backref(c)),
            c if c.is_ascii_alphanumeric() => return Err(Error::InvalidEscape { pos, lit: c }),
            c => Token::EscapedLiteral(c),
        };

        self.enter_set_body();
        Ok(Some(token))
    }

    fn scan_octal(&mut self, pos: usize) -> Result<char> {
        let mut value: Option<u32> = None;
        for _ in 0..3 {
            let Some(digit) = self.chars.peek().and_then(|c| c.to_digit(8)) else {
                break;
            };
            let next = value.unwrap_or(0) * 8 + digit;
            if next > 0o377 {
                break;
            }
            self.bump();
            value = Some(next);
        }
        value
            .and_then(char::from_u32)
            .ok_or(Error::InvalidEscape { pos, lit: '0' })
    }

    fn scan_hex(&mut self, pos: usize) -> Result<char> {
        if !self.eat('{') {
            return self.scan_hex_digits(pos, 'x', 2);
        }

        let mut value: u32 = 0;
        let mut digits = 0;
        while let Some(digit) = self.chars.peek().and_then(|c| c.to_digit(16)) {
            self.bump();
            value = value.saturating_mul(16).saturating_add(digit);
            digits += 1;
        }
        if digits == 0 || !self.eat('}') {
            return Err(Error::InvalidEscape { pos, lit: 'x' });
        }
        char::from_u32(value).ok_or(Error::InvalidEscape { pos, lit: 'x' })
    }

    fn scan_hex_digits(&mut self, pos: usize, lit: char, count: usize) -> Result<char> {
        let mut value = 0;
        for _ in 0..count {
            let digit = self
                .bump()
                .and_then(|c| c.to_digit(16))
                .ok_or(Error::InvalidEscape { pos, lit })?;
            value = value * 16 + digit;
        }
        char::from_u32(value).ok_or(Error::InvalidEscape { pos, lit })
    }

    fn scan_backref(&mut self, first: char) -> usize {
        let mut index = first.to_digit(10).map_or(0, |d| d as usize);
        while let Some(digit) = self.chars.peek().and_then(|c| c.to_digit(10)) {
            self.bump();
            index = index.saturating_mul(10).saturating_add(digit as usize);
        }
        index
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<PosToken>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token().transpose()
    }
}
