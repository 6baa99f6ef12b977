//! Expression compilation. Every expression pushes exactly one value.

use jihll_syntax::ast::{BinaryOp, Expr, Literal, UnaryOp};
use jihll_vm::OpCode;

use crate::context::CodegenContext;
use crate::error::CodegenError;

impl CodegenContext {
    pub fn compile_expr(&mut self, expr: &Expr) -> Result<(), CodegenError> {
        match expr {
            Expr::Variable(ident) => match self.scope.resolve(&ident.name) {
                Some(slot) => {
                    self.emit_with_operand(OpCode::GetLocal, slot)?;
                }
                None => {
                    let name = self.const_string(&ident.name);
                    self.emit_with_operand(OpCode::GetGlobal, name)?;
                }
            },
            Expr::Literal(lit) => {
                let idx = match lit {
                    Literal::Null(_) => self.const_null(),
                    Literal::Bool(b, _) => self.const_bool(*b),
                    Literal::Number(n, _) => self.const_number(*n),
                    Literal::String(s, _) => self.const_string(s),
                };
                self.emit_constant(idx)?;
            }
            Expr::Assign(assign) => {
                let Expr::Variable(target) = &assign.target else {
                    return Err(CodegenError::InvalidAssignTarget(assign.target.span()));
                };
                self.compile_expr(&assign.value)?;
                match self.scope.resolve(&target.name) {
                    Some(slot) => {
                        self.emit_with_operand(OpCode::SetLocal, slot)?;
                    }
                    None => {
                        let name = self.const_string(&target.name);
                        self.emit_with_operand(OpCode::SetGlobal, name)?;
                    }
                }
            }
            Expr::Set(set) => {
                self.compile_expr(&set.object)?;
                self.compile_expr(&set.value)?;
                let name = self.const_string(&set.name.name);
                self.emit_with_operand(OpCode::SetProperty, name)?;
            }
            Expr::Get(get) => {
                self.compile_expr(&get.object)?;
                let name = self.const_string(&get.name.name);
                self.emit_with_operand(OpCode::GetProperty, name)?;
            }
            Expr::Binary(bin) => {
                self.compile_expr(&bin.left)?;
                self.compile_expr(&bin.right)?;
                self.emit_op(binary_op(bin.op));
            }
            Expr::Unary(unary) => {
                self.compile_expr(&unary.operand)?;
                self.emit_op(match unary.op {
                    UnaryOp::Neg => OpCode::Negate,
                    UnaryOp::Not => OpCode::Not,
                });
            }
            Expr::Call(call) => {
                self.compile_call(&call.callee, &call.args, OpCode::Call)?;
            }
            Expr::Array(array) => {
                for elem in &array.elems {
                    self.compile_expr(elem)?;
                }
                self.emit_with_operand(OpCode::BuildList, array.elems.len())?;
            }
            Expr::Map(map) => {
                for (key, value) in &map.entries {
                    self.compile_expr(key)?;
                    self.compile_expr(value)?;
                }
                self.emit_with_operand(OpCode::BuildMap, map.entries.len())?;
            }
            Expr::This(span) => {
                let slot = self
                    .scope
                    .resolve("this")
                    .ok_or(CodegenError::ThisOutsideMethod(*span))?;
                self.emit_with_operand(OpCode::GetLocal, slot)?;
            }
            Expr::Spawn(spawn) => {
                let Expr::Call(call) = &spawn.call else {
                    return Err(CodegenError::SpawnNonCall(spawn.call.span()));
                };
                self.compile_call(&call.callee, &call.args, OpCode::Spawn)?;
            }
        }
        Ok(())
    }

    fn compile_call(&mut self, callee: &Expr, args: &[Expr], op: OpCode) -> Result<(), CodegenError> {
        self.compile_expr(callee)?;
        for arg in args {
            self.compile_expr(arg)?;
        }
        self.emit_with_operand(op, args.len())?;
        Ok(())
    }
}

fn binary_op(op: BinaryOp) -> OpCode {
    match op {
        BinaryOp::Add => OpCode::Add,
        BinaryOp::Sub => OpCode::Subtract,
        BinaryOp::Mul => OpCode::Multiply,
        BinaryOp::Div => OpCode::Divide,
        BinaryOp::Eq => OpCode::Equal,
        BinaryOp::NotEq => OpCode::NotEqual,
        BinaryOp::Lt => OpCode::Less,
        BinaryOp::LtEq => OpCode::LessEqual,
        BinaryOp::Gt => OpCode::Greater,
        BinaryOp::GtEq => OpCode::GreaterEqual,
    }
}
