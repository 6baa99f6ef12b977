//! Functions, methods and tail values.

use std::mem;

use jihll_syntax::ast::{Block, FunctionDecl, IfStmt, Stmt};
use jihll_vm::OpCode;

use crate::context::CodegenContext;
use crate::error::CodegenError;

impl CodegenContext {
    /// Emit a function body inline behind a forward jump and return the index
    /// of its `Function` constant.
    ///
    /// Methods bind `this` at local slot 0, ahead of the parameters. A
    /// trailing expression or `if` statement supplies the return value;
    /// otherwise the body returns `null`.
    pub(crate) fn compile_function(
        &mut self,
        decl: &FunctionDecl,
        is_method: bool,
    ) -> Result<usize, CodegenError> {
        let skip = self.emit_jump(OpCode::Jump);
        let entry = self.here();

        let saved = mem::take(&mut self.scope);
        if is_method {
            self.scope.declare("this");
        }
        for param in &decl.params {
            self.scope.declare(&param.name);
        }
        let result = self.compile_body(&decl.body);
        self.scope = saved;
        result?;

        self.patch_jump(skip)?;
        Ok(self.const_function(&decl.name.name, decl.params.len(), entry))
    }

    fn compile_body(&mut self, body: &Block) -> Result<(), CodegenError> {
        let Some((last, init)) = body.stmts.split_last() else {
            self.emit_null()?;
            self.emit_op(OpCode::Return);
            return Ok(());
        };
        for stmt in init {
            self.compile_stmt(stmt)?;
        }
        match last {
            Stmt::Expr(expr) => self.compile_expr(expr)?,
            Stmt::If(if_stmt) => self.compile_if_expression(if_stmt)?,
            Stmt::Return(_) => return self.compile_stmt(last),
            other => {
                self.compile_stmt(other)?;
                self.emit_null()?;
            }
        }
        self.emit_op(OpCode::Return);
        Ok(())
    }

    /// Compile an `if` so that exactly one value is left on the stack.
    pub(crate) fn compile_if_expression(&mut self, stmt: &IfStmt) -> Result<(), CodegenError> {
        self.compile_expr(&stmt.cond)?;
        let else_jump = self.emit_jump(OpCode::JumpIfFalse);
        self.compile_block_value(&stmt.then_block)?;
        let end_jump = self.emit_jump(OpCode::Jump);
        self.patch_jump(else_jump)?;
        match &stmt.else_block {
            Some(block) => self.compile_block_value(block)?,
            None => self.emit_null()?,
        }
        self.patch_jump(end_jump)
    }

    fn compile_block_value(&mut self, block: &Block) -> Result<(), CodegenError> {
        let Some((last, init)) = block.stmts.split_last() else {
            return self.emit_null();
        };
        for stmt in init {
            self.compile_stmt(stmt)?;
        }
        match last {
            Stmt::Expr(expr) => self.compile_expr(expr),
            Stmt::If(if_stmt) => self.compile_if_expression(if_stmt),
            other => {
                self.compile_stmt(other)?;
                self.emit_null()
            }
        }
    }
}
