//! Codegen context: chunk under construction, constant dedup and jump patching.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use jihll_vm::{Chunk, Constant, FunctionProto, OpCode};

use crate::error::CodegenError;
use crate::scope::Scope;

/// Key for deduplicating constants. Function constants are never shared.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum ConstKey {
    Null,
    Bool(bool),
    Number(u64),
    Str(Arc<str>),
}

/// Compilation state for one chunk.
pub struct CodegenContext {
    chunk: Chunk,
    const_map: FxHashMap<ConstKey, usize>,
    pub(crate) scope: Scope,
}

impl CodegenContext {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            chunk: Chunk::new(name),
            const_map: FxHashMap::default(),
            scope: Scope::default(),
        }
    }

    pub fn finish(self) -> Chunk {
        self.chunk
    }

    /// Index of the next word to be written.
    pub fn here(&self) -> usize {
        self.chunk.len()
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Constants
    // ═══════════════════════════════════════════════════════════════════════

    fn intern(&mut self, key: ConstKey, constant: Constant) -> usize {
        if let Some(&idx) = self.const_map.get(&key) {
            return idx;
        }
        let idx = self.chunk.add_constant(constant);
        self.const_map.insert(key, idx);
        idx
    }

    pub fn const_null(&mut self) -> usize {
        self.intern(ConstKey::Null, Constant::Null)
    }

    pub fn const_bool(&mut self, b: bool) -> usize {
        self.intern(ConstKey::Bool(b), Constant::Bool(b))
    }

    pub fn const_number(&mut self, n: f64) -> usize {
        // -0.0 keeps its own slot so it still prints as "-0"
        self.intern(ConstKey::Number(n.to_bits()), Constant::Number(n))
    }

    pub fn const_string(&mut self, s: &str) -> usize {
        let s: Arc<str> = Arc::from(s);
        self.intern(ConstKey::Str(s.clone()), Constant::Str(s))
    }

    pub fn const_function(&mut self, name: &str, arity: usize, entry: usize) -> usize {
        self.chunk.add_constant(Constant::Function(FunctionProto {
            name: Arc::from(name),
            arity,
            entry,
        }))
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Emission
    // ═══════════════════════════════════════════════════════════════════════

    pub fn emit_op(&mut self, op: OpCode) -> usize {
        self.chunk.write_op(op)
    }

    pub fn emit_with_operand(&mut self, op: OpCode, operand: usize) -> Result<usize, CodegenError> {
        let word = i32::try_from(operand).map_err(|_| CodegenError::OperandOverflow(operand))?;
        let at = self.chunk.write_op(op);
        self.chunk.write(word);
        Ok(at)
    }

    pub fn emit_constant(&mut self, idx: usize) -> Result<(), CodegenError> {
        self.emit_with_operand(OpCode::Constant, idx).map(|_| ())
    }

    pub fn emit_null(&mut self) -> Result<(), CodegenError> {
        let idx = self.const_null();
        self.emit_constant(idx)
    }

    /// Emit a forward jump with a placeholder operand; returns the operand slot.
    pub fn emit_jump(&mut self, op: OpCode) -> usize {
        self.chunk.write_op(op);
        self.chunk.write(0)
    }

    /// Point the jump whose operand lives at `slot` at the next instruction.
    pub fn patch_jump(&mut self, slot: usize) -> Result<(), CodegenError> {
        let target = self.here();
        let offset = target as i64 - slot as i64 - 1;
        let word = i32::try_from(offset).map_err(|_| CodegenError::OperandOverflow(target))?;
        self.chunk.patch(slot, word);
        Ok(())
    }

    /// Emit a backward jump to `start`.
    pub fn emit_loop(&mut self, start: usize) -> Result<(), CodegenError> {
        let op_at = self.chunk.write_op(OpCode::Jump);
        let offset = start as i64 - (op_at as i64 + 2);
        let word = i32::try_from(offset).map_err(|_| CodegenError::OperandOverflow(start))?;
        self.chunk.write(word);
        Ok(())
    }

    /// Close a block scope, popping its locals.
    pub(crate) fn end_scope(&mut self) {
        for _ in 0..self.scope.end() {
            self.emit_op(OpCode::Pop);
        }
    }
}
