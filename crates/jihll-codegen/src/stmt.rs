//! Statement compilation.

use jihll_syntax::ast::{Block, ClassDecl, IfStmt, Stmt, TryStmt, WhileStmt};
use jihll_vm::OpCode;

use crate::context::CodegenContext;
use crate::error::CodegenError;

impl CodegenContext {
    /// Compile one statement. Statements leave the stack as they found it.
    pub fn compile_stmt(&mut self, stmt: &Stmt) -> Result<(), CodegenError> {
        match stmt {
            Stmt::Expr(expr) => {
                self.compile_expr(expr)?;
                self.emit_op(OpCode::Pop);
            }
            Stmt::Print(p) => {
                self.compile_expr(&p.value)?;
                self.emit_op(OpCode::Print);
            }
            Stmt::Function(decl) => {
                let proto = self.compile_function(decl, false)?;
                let name = self.const_string(&decl.name.name);
                self.emit_constant(proto)?;
                self.emit_with_operand(OpCode::SetGlobal, name)?;
                self.emit_op(OpCode::Pop);
            }
            Stmt::Class(class) => self.compile_class(class)?,
            Stmt::Block(block) => self.compile_block(block)?,
            Stmt::If(if_stmt) => self.compile_if(if_stmt)?,
            Stmt::While(w) => self.compile_while(w)?,
            Stmt::Return(r) => {
                match &r.value {
                    Some(value) => self.compile_expr(value)?,
                    None => self.emit_null()?,
                }
                self.emit_op(OpCode::Return);
            }
            Stmt::Import(import) => {
                self.compile_expr(&import.path)?;
                self.emit_op(OpCode::Import);
            }
            Stmt::Try(t) => self.compile_try(t)?,
        }
        Ok(())
    }

    pub(crate) fn compile_block(&mut self, block: &Block) -> Result<(), CodegenError> {
        self.scope.begin();
        for stmt in &block.stmts {
            self.compile_stmt(stmt)?;
        }
        self.end_scope();
        Ok(())
    }

    fn compile_class(&mut self, class: &ClassDecl) -> Result<(), CodegenError> {
        let name = self.const_string(&class.name.name);
        self.emit_with_operand(OpCode::Class, name)?;
        for method in &class.methods {
            let proto = self.compile_function(method, true)?;
            let method_name = self.const_string(&method.name.name);
            self.emit_constant(proto)?;
            self.emit_with_operand(OpCode::Method, method_name)?;
        }
        // the class stays reachable through its global
        self.emit_op(OpCode::Pop);
        Ok(())
    }

    fn compile_if(&mut self, stmt: &IfStmt) -> Result<(), CodegenError> {
        self.compile_expr(&stmt.cond)?;
        let else_jump = self.emit_jump(OpCode::JumpIfFalse);
        self.compile_block(&stmt.then_block)?;
        let end_jump = self.emit_jump(OpCode::Jump);
        self.patch_jump(else_jump)?;
        if let Some(else_block) = &stmt.else_block {
            self.compile_block(else_block)?;
        }
        self.patch_jump(end_jump)
    }

    fn compile_while(&mut self, stmt: &WhileStmt) -> Result<(), CodegenError> {
        let start = self.here();
        self.compile_expr(&stmt.cond)?;
        let exit = self.emit_jump(OpCode::JumpIfFalse);
        self.compile_block(&stmt.body)?;
        self.emit_loop(start)?;
        self.patch_jump(exit)
    }

    fn compile_try(&mut self, stmt: &TryStmt) -> Result<(), CodegenError> {
        let handler = self.emit_jump(OpCode::TryEnter);
        self.compile_block(&stmt.body)?;
        self.emit_op(OpCode::TryExit);
        let end = self.emit_jump(OpCode::Jump);

        // the VM pushes the failure message; it becomes the error variable
        self.patch_jump(handler)?;
        self.scope.begin();
        self.scope.declare(&stmt.error_var.name);
        self.compile_block(&stmt.handler)?;
        self.end_scope();
        self.patch_jump(end)
    }
}
