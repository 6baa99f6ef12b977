//! Parser for Jihll source code.

mod expr;
mod stmt;

use jihll_common::Diagnostic;

use crate::ast::*;
use crate::lexer::Lexer;
use crate::token::{Span, Token, TokenKind};

/// Result type for parser operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// Parse error with message and location.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct ParseError {
    pub message: String,
    pub span: Span,
}

impl ParseError {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::error(&self.message).with_span(self.span)
    }
}

/// Parse a complete compile unit.
pub fn parse(source: &str) -> ParseResult<Program> {
    Parser::new(source).parse_program()
}

/// Recursive-descent parser over a [`Lexer`] with one token of lookahead.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
    peek: Token,
    /// Span of the most recently consumed token.
    prev_span: Span,
}

impl<'a> Parser<'a> {
    /// Create a new parser for the given source code.
    pub fn new(source: &'a str) -> Self {
        let mut lexer = Lexer::new(source);
        let current = lexer.next_token();
        let peek = lexer.next_token();
        Self {
            lexer,
            current,
            peek,
            prev_span: Span::point(0),
        }
    }

    /// Parse statements until end of input.
    pub fn parse_program(&mut self) -> ParseResult<Program> {
        let start = self.current.span;
        let mut stmts = Vec::new();
        while !self.at_eof() {
            stmts.push(self.parse_stmt()?);
        }
        Ok(Program {
            stmts,
            span: start.to(&self.current.span),
        })
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Token Management
    // ═══════════════════════════════════════════════════════════════════════

    /// Advance to the next token.
    fn next_token(&mut self) {
        self.prev_span = self.current.span;
        self.current = std::mem::replace(&mut self.peek, self.lexer.next_token());
    }

    /// Check if current token matches the given kind.
    fn cur_is(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(&self.current.kind) == std::mem::discriminant(kind)
    }

    /// Check if peek token matches the given kind.
    fn peek_is(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(&self.peek.kind) == std::mem::discriminant(kind)
    }

    fn at_eof(&self) -> bool {
        self.cur_is(&TokenKind::Eof)
    }

    /// Consume current token if it matches, return true if consumed.
    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.cur_is(kind) {
            self.next_token();
            true
        } else {
            false
        }
    }

    /// Expect current token to match, consume and return its span.
    fn expect(&mut self, kind: &TokenKind) -> ParseResult<Span> {
        if self.cur_is(kind) {
            let span = self.current.span;
            self.next_token();
            Ok(span)
        } else {
            Err(self.unexpected(kind.name()))
        }
    }

    fn parse_ident(&mut self) -> ParseResult<Ident> {
        match &self.current.kind {
            TokenKind::Ident(name) => {
                let id = Ident::new(name.clone(), self.current.span);
                self.next_token();
                Ok(id)
            }
            _ => Err(self.unexpected("identifier")),
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Error Helpers
    // ═══════════════════════════════════════════════════════════════════════

    /// Create an error at the current position.
    fn error(&self, message: &str) -> ParseError {
        ParseError::new(message, self.current.span)
    }

    /// `expected X, found Y`, with lexer failures reported as such.
    fn unexpected(&self, expected: &str) -> ParseError {
        match &self.current.kind {
            TokenKind::Invalid(c) => self.error(&format!("unexpected character '{}'", c)),
            TokenKind::UnterminatedString => self.error("unterminated string"),
            found => self.error(&format!("expected {}, found {}", expected, found.name())),
        }
    }
}
