//! Instruction dispatch.

use std::sync::Arc;

use indexmap::IndexMap;

use super::Vm;
use crate::chunk::Constant;
use crate::error::{VmError, VmResult};
use crate::frame::Handler;
use crate::opcode::OpCode;
use crate::value::{BoundMethod, Class, Function, MapKey, Value};

impl Vm {
    /// Execute one instruction. `Some` means the run at `base_depth` finished.
    pub(super) fn step(&mut self, base_depth: usize) -> VmResult<Option<Value>> {
        let at = self.ip;
        let Some(&word) = self.chunk.code.get(at) else {
            // Falling off the end behaves like `return null`.
            return self.do_return(Value::Null, base_depth);
        };
        let op = OpCode::decode(word).ok_or(VmError::InvalidOpcode { word, at })?;
        self.ip += 1;

        match op {
            OpCode::Return => {
                let value = self.pop()?;
                return self.do_return(value, base_depth);
            }
            OpCode::Constant => {
                let value = self.read_constant()?;
                self.push(value)?;
            }

            // === Arithmetic ===
            OpCode::Add => {
                let b = self.pop()?;
                let a = self.pop()?;
                let result = match (&a, &b) {
                    (Value::Number(x), Value::Number(y)) => Value::Number(x + y),
                    (Value::Str(_), _) | (_, Value::Str(_)) => Value::str(format!("{}{}", a, b)),
                    _ => {
                        return Err(VmError::type_error(format!(
                            "cannot add {} and {}",
                            a.type_name(),
                            b.type_name()
                        )))
                    }
                };
                self.push(result)?;
            }
            OpCode::Subtract => self.numeric_binary("subtract", |x, y| Value::Number(x - y))?,
            OpCode::Multiply => self.numeric_binary("multiply", |x, y| Value::Number(x * y))?,
            OpCode::Divide => self.numeric_binary("divide", |x, y| Value::Number(x / y))?,
            OpCode::Negate => {
                match self.pop()? {
                    Value::Number(n) => self.push(Value::Number(-n))?,
                    other => {
                        return Err(VmError::type_error(format!(
                            "cannot negate {}",
                            other.type_name()
                        )))
                    }
                }
            }
            OpCode::Not => {
                let value = self.pop()?;
                self.push(Value::Bool(value.is_falsey()))?;
            }

            OpCode::Print => {
                let value = self.pop()?;
                self.output.print(&value.to_string());
            }
            OpCode::Pop => {
                self.pop()?;
            }

            // === Variables ===
            OpCode::GetGlobal => {
                let name = self.read_name()?;
                let value = self
                    .globals
                    .get(&name)
                    .cloned()
                    .ok_or_else(|| VmError::UndefinedGlobal(name.to_string()))?;
                self.push(value)?;
            }
            OpCode::SetGlobal => {
                let name = self.read_name()?;
                let value = self.peek(0)?.clone();
                self.globals.insert(name, value);
            }
            OpCode::GetLocal => {
                let slot = self.fp + self.read_index()?;
                let value = self
                    .stack
                    .get(slot)
                    .cloned()
                    .ok_or(VmError::InvalidLocal(slot))?;
                self.push(value)?;
            }
            OpCode::SetLocal => {
                let slot = self.fp + self.read_index()?;
                let value = self.peek(0)?.clone();
                let target = self
                    .stack
                    .get_mut(slot)
                    .ok_or(VmError::InvalidLocal(slot))?;
                *target = value;
            }

            // === Control flow ===
            OpCode::JumpIfFalse => {
                let offset = self.read_operand()?;
                if self.pop()?.is_falsey() {
                    self.ip = self.jump_target(offset)?;
                }
            }
            OpCode::Jump => {
                let offset = self.read_operand()?;
                self.ip = self.jump_target(offset)?;
            }

            OpCode::Call => {
                let argc = self.read_index()?;
                self.call_value(argc)?;
            }
            OpCode::Spawn => {
                let argc = self.read_index()?;
                self.spawn(argc)?;
            }

            // === Comparison ===
            OpCode::Less => self.numeric_binary("compare", |x, y| Value::Bool(x < y))?,
            OpCode::Greater => self.numeric_binary("compare", |x, y| Value::Bool(x > y))?,
            OpCode::LessEqual => self.numeric_binary("compare", |x, y| Value::Bool(x <= y))?,
            OpCode::GreaterEqual => self.numeric_binary("compare", |x, y| Value::Bool(x >= y))?,
            OpCode::Equal => {
                let b = self.pop()?;
                let a = self.pop()?;
                self.push(Value::Bool(a == b))?;
            }
            OpCode::NotEqual => {
                let b = self.pop()?;
                let a = self.pop()?;
                self.push(Value::Bool(a != b))?;
            }

            // === Aggregates ===
            OpCode::BuildList => {
                let n = self.read_index()?;
                let items = self.pop_n(n)?;
                self.push(Value::list(items))?;
            }
            OpCode::BuildMap => {
                let n = self.read_index()?;
                let flat = self.pop_n(n * 2)?;
                let mut entries = IndexMap::with_capacity(n);
                let mut iter = flat.into_iter();
                while let (Some(key), Some(value)) = (iter.next(), iter.next()) {
                    let key = MapKey::from_value(&key)
                        .ok_or(VmError::UnhashableKey(key.type_name()))?;
                    entries.insert(key, value);
                }
                self.push(Value::map(entries))?;
            }

            OpCode::Import => {
                let path = self.pop()?.to_string();
                self.import(path)?;
            }

            // === Classes ===
            OpCode::Class => {
                let name = self.read_name()?;
                let class = Value::Class(Arc::new(Class::new(name.clone())));
                self.globals.insert(name, class.clone());
                self.push(class)?;
            }
            OpCode::Method => {
                let name = self.read_name()?;
                let method = match self.pop()? {
                    Value::Function(f) => f,
                    other => {
                        return Err(VmError::type_error(format!(
                            "method '{}' must be a function, got {}",
                            name,
                            other.type_name()
                        )))
                    }
                };
                match self.peek(0)? {
                    Value::Class(class) => class.define_method(name, method),
                    other => {
                        return Err(VmError::type_error(format!(
                            "cannot add method '{}' to {}",
                            name,
                            other.type_name()
                        )))
                    }
                }
            }
            OpCode::GetProperty => {
                let name = self.read_name()?;
                let instance = match self.pop()? {
                    Value::Instance(i) => i,
                    other => return Err(VmError::NotAnInstance(other.type_name())),
                };
                let value = if let Some(field) = instance.get_field(&name) {
                    field
                } else if let Some(method) = instance.class.find_method(&name) {
                    Value::BoundMethod(Arc::new(BoundMethod {
                        receiver: instance,
                        method,
                    }))
                } else {
                    return Err(VmError::UndefinedProperty {
                        name: name.to_string(),
                        class: instance.class.name.to_string(),
                    });
                };
                self.push(value)?;
            }
            OpCode::SetProperty => {
                let name = self.read_name()?;
                let value = self.pop()?;
                match self.pop()? {
                    Value::Instance(instance) => instance.set_field(name, value.clone()),
                    other => return Err(VmError::NotAnInstance(other.type_name())),
                }
                self.push(value)?;
            }

            // === Exceptions ===
            OpCode::TryEnter => {
                let offset = self.read_operand()?;
                let address = self.jump_target(offset)?;
                self.handler = Some(Handler {
                    address,
                    chunk: self.chunk.clone(),
                    fp: self.fp,
                    frame_depth: self.frames.len(),
                    stack_len: self.stack.len(),
                });
            }
            OpCode::TryExit => {
                self.handler = None;
            }
        }

        Ok(None)
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Operand decoding
    // ═══════════════════════════════════════════════════════════════════════

    fn read_operand(&mut self) -> VmResult<i32> {
        let word = self
            .chunk
            .code
            .get(self.ip)
            .copied()
            .ok_or(VmError::MissingOperand(self.ip))?;
        self.ip += 1;
        Ok(word)
    }

    /// An operand that must be non-negative: slot, count or constant index.
    fn read_index(&mut self) -> VmResult<usize> {
        let at = self.ip;
        let word = self.read_operand()?;
        usize::try_from(word).map_err(|_| VmError::MissingOperand(at))
    }

    fn constant(&self, index: usize) -> VmResult<&Constant> {
        self.chunk
            .constants
            .get(index)
            .ok_or(VmError::InvalidConstant(index))
    }

    fn read_constant(&mut self) -> VmResult<Value> {
        let index = self.read_index()?;
        Ok(match self.constant(index)? {
            Constant::Null => Value::Null,
            Constant::Bool(b) => Value::Bool(*b),
            Constant::Number(n) => Value::Number(*n),
            Constant::Str(s) => Value::Str(s.clone()),
            Constant::Function(proto) => Value::Function(Arc::new(Function {
                name: proto.name.clone(),
                arity: proto.arity,
                entry: proto.entry,
                chunk: self.chunk.clone(),
            })),
        })
    }

    /// A string constant naming a global, property, class or method.
    fn read_name(&mut self) -> VmResult<Arc<str>> {
        let index = self.read_index()?;
        self.constant(index)?
            .as_str()
            .cloned()
            .ok_or(VmError::InvalidConstant(index))
    }

    /// `ip + offset`, where `ip` is already past the operand.
    fn jump_target(&self, offset: i32) -> VmResult<usize> {
        let target = self.ip as i64 + offset as i64;
        if target < 0 || target as usize > self.chunk.code.len() {
            return Err(VmError::InvalidJump(self.ip.saturating_sub(2)));
        }
        Ok(target as usize)
    }

    fn numeric_binary(&mut self, verb: &str, f: impl FnOnce(f64, f64) -> Value) -> VmResult<()> {
        let b = self.pop()?;
        let a = self.pop()?;
        match (&a, &b) {
            (Value::Number(x), Value::Number(y)) => self.push(f(*x, *y)),
            _ => Err(VmError::type_error(format!(
                "cannot {} {} and {}",
                verb,
                a.type_name(),
                b.type_name()
            ))),
        }
    }
}
