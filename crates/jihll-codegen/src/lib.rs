//! Jihll bytecode generation.
//!
//! A single pass over the AST emits one [`Chunk`]. Function and method bodies
//! are emitted inline behind a forward jump; their `Function` constants
//! record the entry address.

mod context;
mod error;
mod expr;
mod func;
mod scope;
mod stmt;

pub use context::CodegenContext;
pub use error::CodegenError;

use jihll_syntax::ast::Program;
use jihll_vm::{Chunk, OpCode};

/// Compile a program into a chunk named `main`.
pub fn compile_program(program: &Program) -> Result<Chunk, CodegenError> {
    compile_named(program, "main")
}

/// Compile a program into a chunk with the given name.
pub fn compile_named(program: &Program, name: &str) -> Result<Chunk, CodegenError> {
    let mut ctx = CodegenContext::new(name);
    for stmt in &program.stmts {
        ctx.compile_stmt(stmt)?;
    }
    ctx.emit_null()?;
    ctx.emit_op(OpCode::Return);
    Ok(ctx.finish())
}
