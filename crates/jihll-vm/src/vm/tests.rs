use std::sync::Arc;

use pretty_assertions::assert_eq;

use super::*;
use crate::chunk::{Constant, FunctionProto};
use crate::natives::NativeCtx;
use crate::opcode::OpCode;
use crate::output::CaptureOutput;

/// Minimal assembler for hand-written chunks.
struct Asm {
    chunk: Chunk,
}

impl Asm {
    fn new() -> Self {
        Self {
            chunk: Chunk::new("test"),
        }
    }

    fn op(&mut self, op: OpCode) -> &mut Self {
        self.chunk.write_op(op);
        self
    }

    fn op1(&mut self, op: OpCode, operand: i32) -> &mut Self {
        self.chunk.write_op(op);
        self.chunk.write(operand);
        self
    }

    fn konst(&mut self, c: Constant) -> i32 {
        self.chunk.add_constant(c) as i32
    }

    fn name(&mut self, s: &str) -> i32 {
        self.konst(Constant::Str(Arc::from(s)))
    }

    fn num(&mut self, n: f64) -> &mut Self {
        let k = self.konst(Constant::Number(n));
        self.op1(OpCode::Constant, k)
    }

    fn func(&mut self, name: &str, arity: usize, entry: usize) -> i32 {
        self.konst(Constant::Function(FunctionProto {
            name: Arc::from(name),
            arity,
            entry,
        }))
    }

    fn here(&self) -> usize {
        self.chunk.len()
    }

    fn end(&mut self) -> Chunk {
        let k = self.konst(Constant::Null);
        self.op1(OpCode::Constant, k).op(OpCode::Return);
        std::mem::take(&mut self.chunk)
    }
}

fn capture_vm() -> (Vm, Arc<CaptureOutput>) {
    let out = Arc::new(CaptureOutput::new());
    let vm = Vm::new().with_output(out.clone());
    (vm, out)
}

#[test]
fn test_arithmetic_and_print() {
    let mut a = Asm::new();
    a.num(1.0).num(2.0).op(OpCode::Add).num(4.0).op(OpCode::Multiply).op(OpCode::Print);
    a.num(7.0).op(OpCode::Negate).op(OpCode::Print);
    let chunk = a.end();

    let (mut vm, out) = capture_vm();
    assert_eq!(vm.interpret(chunk), Ok(Value::Null));
    assert_eq!(out.lines(), vec!["12", "-7"]);
    assert_eq!(vm.stack_len(), 0);
}

#[test]
fn test_string_concatenation_uses_textual_form() {
    let mut a = Asm::new();
    let s = a.konst(Constant::Str(Arc::from("n=")));
    a.op1(OpCode::Constant, s).num(2.5).op(OpCode::Add).op(OpCode::Print);
    let chunk = a.end();

    let (mut vm, out) = capture_vm();
    vm.interpret(chunk).unwrap();
    assert_eq!(out.lines(), vec!["n=2.5"]);
}

#[test]
fn test_comparisons_produce_booleans() {
    let mut a = Asm::new();
    a.num(1.0).num(2.0).op(OpCode::Less).op(OpCode::Print);
    a.num(1.0).num(2.0).op(OpCode::GreaterEqual).op(OpCode::Print);
    a.num(3.0).num(3.0).op(OpCode::Equal).op(OpCode::Print);
    let chunk = a.end();

    let (mut vm, out) = capture_vm();
    vm.interpret(chunk).unwrap();
    assert_eq!(out.lines(), vec!["true", "false", "true"]);
}

#[test]
fn test_jump_if_false_consumes_condition() {
    // if false: print 1 .  print 2
    let mut a = Asm::new();
    let f = a.konst(Constant::Bool(false));
    a.op1(OpCode::Constant, f).op1(OpCode::JumpIfFalse, 3);
    a.num(1.0).op(OpCode::Print);
    a.num(2.0).op(OpCode::Print);
    let chunk = a.end();

    let (mut vm, out) = capture_vm();
    vm.interpret(chunk).unwrap();
    assert_eq!(out.lines(), vec!["2"]);
    assert_eq!(vm.stack_len(), 0);
}

#[test]
fn test_call_and_return() {
    let mut a = Asm::new();
    a.op1(OpCode::Jump, 6);
    let entry = a.here();
    a.op1(OpCode::GetLocal, 0).op1(OpCode::GetLocal, 1).op(OpCode::Add).op(OpCode::Return);
    let func = a.func("add", 2, entry);
    let name = a.name("add");
    a.op1(OpCode::Constant, func).op1(OpCode::SetGlobal, name).op(OpCode::Pop);
    a.op1(OpCode::GetGlobal, name).num(1.0).num(2.0).op1(OpCode::Call, 2).op(OpCode::Print);
    let chunk = a.end();

    let (mut vm, out) = capture_vm();
    vm.interpret(chunk).unwrap();
    assert_eq!(out.lines(), vec!["3"]);
    assert_eq!(vm.stack_len(), 0);
    assert!(matches!(vm.global("add"), Some(Value::Function(_))));
}

#[test]
fn test_arity_mismatch() {
    let mut a = Asm::new();
    a.op1(OpCode::Jump, 3);
    let entry = a.here();
    a.num(0.0).op(OpCode::Return);
    let func = a.func("f", 1, entry);
    a.op1(OpCode::Constant, func).op1(OpCode::Call, 0);
    let chunk = a.end();

    let (mut vm, _) = capture_vm();
    assert_eq!(
        vm.interpret(chunk),
        Err(VmError::ArityMismatch {
            name: "f".into(),
            expected: 1,
            got: 0
        })
    );
}

#[test]
fn test_init_result_is_replaced_by_instance() {
    // class P: fun init: return 42 . .   print P()
    let mut a = Asm::new();
    let class_name = a.name("P");
    let init_name = a.name("init");
    a.op1(OpCode::Class, class_name);
    a.op1(OpCode::Jump, 3);
    let entry = a.here();
    a.num(42.0).op(OpCode::Return);
    let init = a.func("init", 0, entry);
    a.op1(OpCode::Constant, init).op1(OpCode::Method, init_name).op(OpCode::Pop);
    a.op1(OpCode::GetGlobal, class_name).op1(OpCode::Call, 0).op(OpCode::Print);
    let chunk = a.end();

    let (mut vm, out) = capture_vm();
    vm.interpret(chunk).unwrap();
    assert_eq!(out.lines(), vec!["<P instance>"]);
    assert_eq!(vm.stack_len(), 0);
}

#[test]
fn test_class_without_init_discards_arguments() {
    let mut a = Asm::new();
    let class_name = a.name("Bag");
    a.op1(OpCode::Class, class_name).op(OpCode::Pop);
    a.op1(OpCode::GetGlobal, class_name).num(1.0).num(2.0).num(3.0).op1(OpCode::Call, 3);
    a.op(OpCode::Print);
    let chunk = a.end();

    let (mut vm, out) = capture_vm();
    vm.interpret(chunk).unwrap();
    assert_eq!(out.lines(), vec!["<Bag instance>"]);
    assert_eq!(vm.stack_len(), 0);
}

#[test]
fn test_fields_shadow_methods() {
    let mut a = Asm::new();
    let class_name = a.name("C");
    let method = a.name("m");
    let obj = a.name("o");
    a.op1(OpCode::Class, class_name);
    a.op1(OpCode::Jump, 3);
    let entry = a.here();
    a.num(1.0).op(OpCode::Return);
    let m = a.func("m", 0, entry);
    a.op1(OpCode::Constant, m).op1(OpCode::Method, method).op(OpCode::Pop);
    // o = C()  o.m = 5  print o.m
    a.op1(OpCode::GetGlobal, class_name).op1(OpCode::Call, 0).op1(OpCode::SetGlobal, obj).op(OpCode::Pop);
    a.op1(OpCode::GetGlobal, obj).num(5.0).op1(OpCode::SetProperty, method).op(OpCode::Pop);
    a.op1(OpCode::GetGlobal, obj).op1(OpCode::GetProperty, method).op(OpCode::Print);
    // print C().m()
    a.op1(OpCode::GetGlobal, class_name).op1(OpCode::Call, 0).op1(OpCode::GetProperty, method);
    a.op1(OpCode::Call, 0).op(OpCode::Print);
    let chunk = a.end();

    let (mut vm, out) = capture_vm();
    vm.interpret(chunk).unwrap();
    assert_eq!(out.lines(), vec!["5", "1"]);
}

#[test]
fn test_build_list_and_map_preserve_order() {
    let mut a = Asm::new();
    a.num(1.0).num(2.0).num(3.0).op1(OpCode::BuildList, 3).op(OpCode::Print);
    let k1 = a.konst(Constant::Str(Arc::from("b")));
    let k2 = a.konst(Constant::Str(Arc::from("a")));
    a.op1(OpCode::Constant, k1).num(1.0).op1(OpCode::Constant, k2).num(2.0);
    a.op1(OpCode::Constant, k1).num(3.0).op1(OpCode::BuildMap, 3).op(OpCode::Print);
    let chunk = a.end();

    let (mut vm, out) = capture_vm();
    vm.interpret(chunk).unwrap();
    assert_eq!(out.lines(), vec!["[1, 2, 3]", "{b: 3, a: 2}"]);
}

#[test]
fn test_unhashable_map_key() {
    let mut a = Asm::new();
    a.op1(OpCode::BuildList, 0).num(1.0).op1(OpCode::BuildMap, 1);
    let chunk = a.end();
    let (mut vm, _) = capture_vm();
    assert_eq!(vm.interpret(chunk), Err(VmError::UnhashableKey("list")));
}

#[test]
fn test_try_catches_failure_in_callee() {
    // fun bad: return 1 + C . (C is a class)    try: bad() catch e: print e .  print "after"
    let mut a = Asm::new();
    let class_name = a.name("C");
    let bad_name = a.name("bad");
    let after = a.konst(Constant::Str(Arc::from("after")));
    a.op1(OpCode::Class, class_name).op(OpCode::Pop);
    a.op1(OpCode::Jump, 6);
    let entry = a.here();
    a.num(1.0).op1(OpCode::GetGlobal, class_name).op(OpCode::Add).op(OpCode::Return);
    let bad = a.func("bad", 0, entry);
    a.op1(OpCode::Constant, bad).op1(OpCode::SetGlobal, bad_name).op(OpCode::Pop);

    a.op1(OpCode::TryEnter, 0);
    let patch = a.here() - 1;
    a.op1(OpCode::GetGlobal, bad_name).op1(OpCode::Call, 0).op(OpCode::Pop);
    a.op(OpCode::TryExit);
    a.op1(OpCode::Jump, 0);
    let end_patch = a.here() - 1;
    let catch_at = a.here();
    a.op1(OpCode::GetLocal, 0).op(OpCode::Print).op(OpCode::Pop);
    let end_at = a.here();
    a.op1(OpCode::Constant, after).op(OpCode::Print);
    a.chunk.patch(patch, (catch_at - patch - 1) as i32);
    a.chunk.patch(end_patch, (end_at - end_patch - 1) as i32);
    let chunk = a.end();

    let (mut vm, out) = capture_vm();
    vm.interpret(chunk).unwrap();
    assert_eq!(out.lines(), vec!["cannot add number and class", "after"]);
    assert_eq!(vm.stack_len(), 0);
}

#[test]
fn test_uncaught_failure_propagates() {
    let mut a = Asm::new();
    let name = a.name("missing");
    a.op1(OpCode::GetGlobal, name);
    let chunk = a.end();
    let (mut vm, _) = capture_vm();
    let err = vm.interpret(chunk).unwrap_err();
    assert_eq!(err.to_string(), "undefined variable 'missing'");
}

#[test]
fn test_deep_recursion_overflows() {
    // fun f: return f() .  f()
    let mut a = Asm::new();
    let name = a.name("f");
    a.op1(OpCode::Jump, 5);
    let entry = a.here();
    a.op1(OpCode::GetGlobal, name).op1(OpCode::Call, 0).op(OpCode::Return);
    let f = a.func("f", 0, entry);
    a.op1(OpCode::Constant, f).op1(OpCode::SetGlobal, name).op(OpCode::Pop);
    a.op1(OpCode::GetGlobal, name).op1(OpCode::Call, 0);
    let chunk = a.end();

    let (vm, _) = capture_vm();
    let mut vm = vm.with_config(VmConfig {
        stack_limit: 1000,
        frame_limit: 64,
        ..VmConfig::default()
    });
    assert_eq!(vm.interpret(chunk), Err(VmError::StackOverflow));
}

#[test]
fn test_invalid_opcode() {
    let chunk = Chunk {
        name: "bad".into(),
        code: vec![200],
        constants: vec![],
    };
    let (mut vm, _) = capture_vm();
    assert_eq!(
        vm.interpret(chunk),
        Err(VmError::InvalidOpcode { word: 200, at: 0 })
    );
}

#[test]
fn test_native_call_and_failure() {
    fn twice(_: &NativeCtx, args: &[Value]) -> Result<Value, String> {
        match args {
            [Value::Number(n)] => Ok(Value::Number(n * 2.0)),
            _ => Err("expected one number".to_string()),
        }
    }

    let mut a = Asm::new();
    let name = a.name("twice");
    a.op1(OpCode::GetGlobal, name).num(21.0).op1(OpCode::Call, 1).op(OpCode::Print);
    a.op1(OpCode::GetGlobal, name).op1(OpCode::Call, 0);
    let chunk = a.end();

    let (mut vm, out) = capture_vm();
    vm.define_native("twice", twice);
    let err = vm.interpret(chunk).unwrap_err();
    assert_eq!(out.lines(), vec!["42"]);
    assert_eq!(err.to_string(), "twice: expected one number");
}

#[test]
fn test_import_shares_globals() {
    let loader = |path: &str| -> Result<Chunk, String> {
        if path != "lib" {
            return Err(format!("no module {}", path));
        }
        let mut a = Asm::new();
        let name = a.name("shared");
        a.num(9.0).op1(OpCode::SetGlobal, name).op(OpCode::Pop);
        Ok(a.end())
    };

    let mut a = Asm::new();
    let path = a.konst(Constant::Str(Arc::from("lib")));
    let name = a.name("shared");
    a.num(1.0).op1(OpCode::Constant, path).op(OpCode::Import);
    a.op1(OpCode::GetGlobal, name).op(OpCode::Add).op(OpCode::Print);
    let chunk = a.end();

    let (vm, out) = capture_vm();
    let mut vm = vm.with_loader(Arc::new(loader));
    vm.interpret(chunk).unwrap();
    assert_eq!(out.lines(), vec!["10"]);
}

#[test]
fn test_import_failure_is_reported_with_path() {
    let loader = |path: &str| -> Result<Chunk, String> { Err(format!("{} not found", path)) };
    let mut a = Asm::new();
    let path = a.konst(Constant::Str(Arc::from("nope.jhl")));
    a.op1(OpCode::Constant, path).op(OpCode::Import);
    let chunk = a.end();

    let (vm, _) = capture_vm();
    let mut vm = vm.with_loader(Arc::new(loader));
    assert_eq!(
        vm.interpret(chunk).unwrap_err().to_string(),
        "import 'nope.jhl' failed: nope.jhl not found"
    );
}

#[test]
fn test_spawn_runs_on_snapshot_of_globals() {
    // fun w x: print x + g .   g = 1   spawn w(2)   g = 100
    let mut a = Asm::new();
    let w_name = a.name("w");
    let g_name = a.name("g");
    a.op1(OpCode::Jump, 9);
    let entry = a.here();
    a.op1(OpCode::GetLocal, 0).op1(OpCode::GetGlobal, g_name).op(OpCode::Add).op(OpCode::Print);
    a.num(0.0).op(OpCode::Return);
    let w = a.func("w", 1, entry);
    a.op1(OpCode::Constant, w).op1(OpCode::SetGlobal, w_name).op(OpCode::Pop);
    a.num(1.0).op1(OpCode::SetGlobal, g_name).op(OpCode::Pop);
    a.op1(OpCode::GetGlobal, w_name).num(2.0).op1(OpCode::Spawn, 1).op(OpCode::Pop);
    a.num(100.0).op1(OpCode::SetGlobal, g_name).op(OpCode::Pop);
    let chunk = a.end();

    let (mut vm, out) = capture_vm();
    vm.interpret(chunk).unwrap();
    vm.join_spawned();
    assert_eq!(out.lines(), vec!["3"]);
    assert!(out.reports().is_empty());
    assert_eq!(vm.global("g"), Some(Value::Number(100.0)));
}

#[test]
fn test_spawn_failure_is_reported_not_propagated() {
    let mut a = Asm::new();
    let name = a.name("missing");
    a.op1(OpCode::Jump, 2);
    let entry = a.here();
    a.op1(OpCode::GetGlobal, name);
    let f = a.func("f", 0, entry);
    a.op1(OpCode::Constant, f).op1(OpCode::Spawn, 0).op(OpCode::Pop);
    let chunk = a.end();

    let (mut vm, out) = capture_vm();
    assert_eq!(vm.interpret(chunk), Ok(Value::Null));
    vm.join_spawned();
    let reports = out.reports();
    assert_eq!(reports.len(), 1);
    assert!(reports[0].ends_with("runtime error: undefined variable 'missing'"), "{}", reports[0]);
}

#[test]
fn test_spawn_rejects_non_callable() {
    let mut a = Asm::new();
    a.num(1.0).op1(OpCode::Spawn, 0);
    let chunk = a.end();
    let (mut vm, _) = capture_vm();
    assert_eq!(
        vm.interpret(chunk),
        Err(VmError::Spawn("cannot spawn a number".into()))
    );
}
