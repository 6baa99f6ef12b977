//! Token definitions for the Jihll lexer.

use std::fmt;

pub use jihll_common::Span;

/// A token with its kind and source span.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// Token kinds for Jihll.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // ═══════════════════════════════════════════════════════════════════════
    // Literals
    // ═══════════════════════════════════════════════════════════════════════
    Ident(String),
    Number(f64),
    String(String),

    // ═══════════════════════════════════════════════════════════════════════
    // Keywords
    // ═══════════════════════════════════════════════════════════════════════

    // Declarations
    Fun,
    Class,
    Import,

    // Control flow
    If,
    Else,
    While,
    Return,
    Try,
    Catch,
    Spawn,
    Print,

    // Reserved, never accepted by the parser
    For,
    In,

    // Values
    This,
    True,
    False,
    Null,

    // ═══════════════════════════════════════════════════════════════════════
    // Operators
    // ═══════════════════════════════════════════════════════════════════════
    Plus,  // +
    Minus, // -
    Star,  // *
    Slash, // /
    Not,   // !

    Eq,    // ==
    NotEq, // !=
    Lt,    // <
    LtEq,  // <=
    Gt,    // >
    GtEq,  // >=

    Assign, // =

    // ═══════════════════════════════════════════════════════════════════════
    // Delimiters
    // ═══════════════════════════════════════════════════════════════════════
    LParen,   // (
    RParen,   // )
    LBracket, // [
    RBracket, // ]
    LBrace,   // {
    RBrace,   // }
    Comma,    // ,
    Colon,    // :
    Dot,      // . followed by more code on the same line
    BlockDot, // . closing a block

    // ═══════════════════════════════════════════════════════════════════════
    // Special
    // ═══════════════════════════════════════════════════════════════════════
    Eof,
    Invalid(char),
    UnterminatedString,
}

impl TokenKind {
    /// Get a human-readable name for this token kind.
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::Ident(_) => "identifier",
            TokenKind::Number(_) => "number",
            TokenKind::String(_) => "string",
            TokenKind::Fun => "fun",
            TokenKind::Class => "class",
            TokenKind::Import => "import",
            TokenKind::If => "if",
            TokenKind::Else => "else",
            TokenKind::While => "while",
            TokenKind::Return => "return",
            TokenKind::Try => "try",
            TokenKind::Catch => "catch",
            TokenKind::Spawn => "spawn",
            TokenKind::Print => "print",
            TokenKind::For => "for",
            TokenKind::In => "in",
            TokenKind::This => "this",
            TokenKind::True => "true",
            TokenKind::False => "false",
            TokenKind::Null => "null",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Not => "!",
            TokenKind::Eq => "==",
            TokenKind::NotEq => "!=",
            TokenKind::Lt => "<",
            TokenKind::LtEq => "<=",
            TokenKind::Gt => ">",
            TokenKind::GtEq => ">=",
            TokenKind::Assign => "=",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBracket => "[",
            TokenKind::RBracket => "]",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::Comma => ",",
            TokenKind::Colon => ":",
            TokenKind::Dot => ".",
            TokenKind::BlockDot => "block-closing '.'",
            TokenKind::Eof => "end of file",
            TokenKind::Invalid(_) => "invalid character",
            TokenKind::UnterminatedString => "unterminated string",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
