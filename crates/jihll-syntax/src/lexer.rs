//! Lexer for Jihll source code.
//!
//! Whitespace and newlines are insignificant except after a `.`: a dot that
//! is followed only by spaces or tabs up to a newline, a `#` comment, or the
//! end of input closes a block and is lexed as [`TokenKind::BlockDot`].

use crate::token::{Span, Token, TokenKind};

/// Lexer for Jihll source code.
pub struct Lexer<'a> {
    input: &'a str,
    /// Byte offset of `ch`.
    pos: usize,
    ch: Option<char>,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given input.
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            ch: input.chars().next(),
        }
    }

    /// Advance past the current character.
    fn read_char(&mut self) {
        if let Some(c) = self.ch {
            self.pos += c.len_utf8();
        }
        self.ch = self.input[self.pos..].chars().next();
    }

    /// Peek at the character after `ch` without consuming.
    fn peek_char(&self) -> Option<char> {
        let next = self.pos + self.ch.map(char::len_utf8).unwrap_or(0);
        self.input[next..].chars().next()
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.ch {
            if c.is_whitespace() {
                self.read_char();
            } else if c == '#' {
                while self.ch.is_some() && self.ch != Some('\n') {
                    self.read_char();
                }
            } else {
                break;
            }
        }
    }

    /// Whether the rest of the line after a `.` is blank or a comment.
    fn at_block_end(&self) -> bool {
        for b in self.input[self.pos..].bytes() {
            match b {
                b' ' | b'\t' => continue,
                b'\r' | b'\n' | b'#' => return true,
                _ => return false,
            }
        }
        true
    }

    fn read_ident(&mut self) -> TokenKind {
        let start = self.pos;
        while let Some(c) = self.ch {
            if c.is_alphanumeric() || c == '_' {
                self.read_char();
            } else {
                break;
            }
        }
        Self::lookup_ident(&self.input[start..self.pos])
    }

    /// Read a number: digits with an optional fractional part.
    fn read_number(&mut self) -> TokenKind {
        let start = self.pos;
        while matches!(self.ch, Some(c) if c.is_ascii_digit()) {
            self.read_char();
        }
        if self.ch == Some('.') && matches!(self.peek_char(), Some(c) if c.is_ascii_digit()) {
            self.read_char(); // consume .
            while matches!(self.ch, Some(c) if c.is_ascii_digit()) {
                self.read_char();
            }
        }
        let text = &self.input[start..self.pos];
        match text.parse() {
            Ok(n) => TokenKind::Number(n),
            Err(_) => TokenKind::Invalid(text.chars().next().unwrap_or('0')),
        }
    }

    /// Read a string literal. Strings may span lines.
    fn read_string(&mut self) -> TokenKind {
        self.read_char(); // consume opening "
        let mut result = String::new();

        loop {
            match self.ch {
                None => return TokenKind::UnterminatedString,
                Some('"') => {
                    self.read_char();
                    return TokenKind::String(result);
                }
                Some('\\') => {
                    self.read_char();
                    match self.ch {
                        Some('n') => result.push('\n'),
                        Some('t') => result.push('\t'),
                        Some(c) => result.push(c),
                        None => return TokenKind::UnterminatedString,
                    }
                    self.read_char();
                }
                Some(c) => {
                    result.push(c);
                    self.read_char();
                }
            }
        }
    }

    /// Look up keyword or return identifier.
    fn lookup_ident(ident: &str) -> TokenKind {
        match ident {
            "fun" => TokenKind::Fun,
            "class" => TokenKind::Class,
            "import" => TokenKind::Import,
            "if" => TokenKind::If,
            "else" => TokenKind::Else,
            "while" => TokenKind::While,
            "return" => TokenKind::Return,
            "try" => TokenKind::Try,
            "catch" => TokenKind::Catch,
            "spawn" => TokenKind::Spawn,
            "print" => TokenKind::Print,
            "for" => TokenKind::For,
            "in" => TokenKind::In,
            "this" => TokenKind::This,
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            "null" => TokenKind::Null,
            _ => TokenKind::Ident(ident.to_string()),
        }
    }

    /// Consume the current character, then pick `matched` if the next one is `=`.
    fn with_eq(&mut self, matched: TokenKind, single: TokenKind) -> TokenKind {
        self.read_char();
        if self.ch == Some('=') {
            self.read_char();
            matched
        } else {
            single
        }
    }

    /// Get the next token.
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();
        let start = self.pos;

        let kind = match self.ch {
            None => TokenKind::Eof,
            Some(c) => match c {
                c if c.is_alphabetic() || c == '_' => self.read_ident(),
                '0'..='9' => self.read_number(),
                '"' => self.read_string(),

                '=' => self.with_eq(TokenKind::Eq, TokenKind::Assign),
                '!' => self.with_eq(TokenKind::NotEq, TokenKind::Not),
                '<' => self.with_eq(TokenKind::LtEq, TokenKind::Lt),
                '>' => self.with_eq(TokenKind::GtEq, TokenKind::Gt),

                '.' => {
                    self.read_char();
                    if self.at_block_end() {
                        TokenKind::BlockDot
                    } else {
                        TokenKind::Dot
                    }
                }

                _ => {
                    self.read_char();
                    match c {
                        '+' => TokenKind::Plus,
                        '-' => TokenKind::Minus,
                        '*' => TokenKind::Star,
                        '/' => TokenKind::Slash,
                        '(' => TokenKind::LParen,
                        ')' => TokenKind::RParen,
                        '[' => TokenKind::LBracket,
                        ']' => TokenKind::RBracket,
                        '{' => TokenKind::LBrace,
                        '}' => TokenKind::RBrace,
                        ',' => TokenKind::Comma,
                        ':' => TokenKind::Colon,
                        _ => TokenKind::Invalid(c),
                    }
                }
            },
        };

        Token::new(kind, Span::new(start, self.pos))
    }

    /// Tokenize the entire input.
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let tok = self.next_token();
            let is_eof = tok.kind == TokenKind::Eof;
            tokens.push(tok);
            if is_eof {
                break;
            }
        }
        tokens
    }
}
