//! Pull-based tokenizer for LookML.
//!
//! The parser drives the lexer one token at a time because `sql`-style values
//! are not tokenizable: after `sql:` the parser asks for the raw text up to the
//! closing `;;` via [`Lexer::read_expression`].

use super::SyntaxError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TokenKind {
    /// Bare word: keys, names, enum-like values (`left_outer`, `+orders`)
    Literal(String),
    /// Double-quoted string with escapes resolved
    Quoted(String),
    Colon,
    Comma,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    End,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Token {
    pub(crate) kind: TokenKind,
    pub(crate) line: usize,
    pub(crate) column: usize,
}

pub(crate) struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    column: usize,
}

impl Lexer {
    pub(crate) fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_next(&self) -> Option<char> {
        self.chars.get(self.pos + 1).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += 1;
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn error(&self, message: impl Into<String>) -> SyntaxError {
        SyntaxError::new(message, self.line, self.column)
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            while matches!(self.peek(), Some(ch) if ch.is_whitespace()) {
                self.advance();
            }

            if self.peek() == Some('#') {
                while let Some(ch) = self.peek() {
                    if ch == '\n' {
                        break;
                    }
                    self.advance();
                }
                continue;
            }

            break;
        }
    }

    fn is_literal_char(ch: char) -> bool {
        !ch.is_whitespace() && !matches!(ch, '{' | '}' | '[' | ']' | ',' | ':' | '"' | '#')
    }

    pub(crate) fn next_token(&mut self) -> Result<Token, SyntaxError> {
        self.skip_whitespace_and_comments();
        let (line, column) = (self.line, self.column);
        let token = |kind| Token { kind, line, column };

        let Some(ch) = self.peek() else {
            return Ok(token(TokenKind::End));
        };

        let kind = match ch {
            ':' => {
                self.advance();
                TokenKind::Colon
            }
            ',' => {
                self.advance();
                TokenKind::Comma
            }
            '{' => {
                self.advance();
                TokenKind::LBrace
            }
            '}' => {
                self.advance();
                TokenKind::RBrace
            }
            '[' => {
                self.advance();
                TokenKind::LBracket
            }
            ']' => {
                self.advance();
                TokenKind::RBracket
            }
            '"' => self.read_quoted()?,
            _ if Self::is_literal_char(ch) => self.read_literal(),
            _ => return Err(self.error(format!("unexpected character '{}'", ch))),
        };

        Ok(token(kind))
    }

    fn read_literal(&mut self) -> TokenKind {
        let mut buf = String::new();
        while let Some(ch) = self.peek() {
            if !Self::is_literal_char(ch) {
                break;
            }
            buf.push(ch);
            self.advance();
        }
        TokenKind::Literal(buf)
    }

    fn read_quoted(&mut self) -> Result<TokenKind, SyntaxError> {
        let start = (self.line, self.column);
        self.advance(); // opening quote
        let mut buf = String::new();
        loop {
            match self.advance() {
                Some('"') => return Ok(TokenKind::Quoted(buf)),
                Some('\\') => match self.advance() {
                    Some('n') => buf.push('\n'),
                    Some('t') => buf.push('\t'),
                    Some(other) => buf.push(other),
                    None => break,
                },
                Some(ch) => buf.push(ch),
                None => break,
            }
        }
        Err(SyntaxError::new("unterminated string", start.0, start.1))
    }

    /// Read a `;;`-terminated expression and return it trimmed.
    pub(crate) fn read_expression(&mut self) -> Result<String, SyntaxError> {
        let start = (self.line, self.column);
        let mut buf = String::new();
        while let Some(ch) = self.peek() {
            if ch == ';' && self.peek_next() == Some(';') {
                self.advance();
                self.advance();
                return Ok(buf.trim().to_string());
            }
            buf.push(ch);
            self.advance();
        }
        Err(SyntaxError::new(
            "expression is missing its closing ';;'",
            start.0,
            start.1,
        ))
    }
}
