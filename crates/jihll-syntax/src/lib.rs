//! Front end for Jihll: tokens, lexer, AST and parser.
//!
//! ```text
//! source ──Lexer──▶ tokens ──Parser──▶ ast::Program
//! ```

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod token;

pub use parser::{parse, ParseError, ParseResult, Parser};
