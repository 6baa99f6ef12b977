//! Compile and run programs end to end on the VM.

use std::sync::Arc;

use jihll_codegen::compile_program;
use jihll_vm::{CaptureOutput, Value, Vm, VmError};
use pretty_assertions::assert_eq;

fn run(source: &str) -> (Vm, Arc<CaptureOutput>, Result<Value, VmError>) {
    let program = jihll_syntax::parse(source).expect("parse failed");
    let chunk = compile_program(&program).expect("codegen failed");
    let output = Arc::new(CaptureOutput::new());
    let mut vm = Vm::new().with_output(output.clone());
    let result = vm.interpret(chunk);
    (vm, output, result)
}

fn run_ok(source: &str) -> Vec<String> {
    let (_, output, result) = run(source);
    if let Err(err) = result {
        panic!("runtime error: {err}\noutput so far: {:?}", output.lines());
    }
    output.lines()
}

#[test]
fn test_function_without_return_yields_null() {
    let lines = run_ok(
        r#"
fun noisy:
  print "hi"
.
fun quiet:
  while false:
  .
.
print noisy()
print quiet()
"#,
    );
    assert_eq!(lines, vec!["hi", "null", "null"]);
}

#[test]
fn test_tail_expression_is_returned() {
    let lines = run_ok(
        r#"
fun sign n:
  if n < 0:
    -1
  else:
    1
  .
.
fun add a, b:
  a + b
.
print sign(-5)
print sign(5)
print add(2, 3)
"#,
    );
    assert_eq!(lines, vec!["-1", "1", "5"]);
}

#[test]
fn test_tail_if_without_else_is_null() {
    let lines = run_ok("fun f x:\n  if x: 1 .\n.\nprint f(false)\nprint f(true)\n");
    assert_eq!(lines, vec!["null", "1"]);
}

#[test]
fn test_recursion_and_locals() {
    let lines = run_ok(
        r#"
fun fib n:
  if n < 2:
    return n
  .
  fib(n - 1) + fib(n - 2)
.
fun sum n:
  total = 0
  while n > 0:
    total = total + n
    n = n - 1
  .
  total
.
print fib(10)
print sum(4)
"#,
    );
    assert_eq!(lines, vec!["55", "10"]);
}

#[test]
fn test_init_result_is_discarded() {
    let lines = run_ok(
        r#"
class Point:
  fun init x:
    this.x = x
    return 42
  .
.
p = Point(7)
print p
print p.x
"#,
    );
    assert_eq!(lines, vec!["<Point instance>", "7"]);
}

#[test]
fn test_class_without_init_discards_arguments() {
    let lines = run_ok("class Empty:\n.\nprint Empty()\nprint Empty(1, 2, 3)\n");
    assert_eq!(lines, vec!["<Empty instance>", "<Empty instance>"]);
}

#[test]
fn test_methods_see_this() {
    let lines = run_ok(
        r#"
class Counter:
  fun init:
    this.n = 0
  .
  fun bump by:
    this.n = this.n + by
    this
  .
.
c = Counter()
c.bump(2).bump(3)
print c.n
"#,
    );
    assert_eq!(lines, vec!["5"]);
}

#[test]
fn test_literals_keep_source_order() {
    let lines = run_ok("print [1, 2, 3]\nprint {b: 2, a: 1, \"c\": [true]}\nprint [1, 2, 3] == [1, 2, 3]\n");
    assert_eq!(lines, vec!["[1, 2, 3]", "{b: 2, a: 1, c: [true]}", "true"]);
}

#[test]
fn test_try_binds_message_and_continues() {
    let lines = run_ok(
        r#"
class Box:
.
try:
  print "before"
  print 1 + Box()
  print "unreachable"
catch err:
  print err
.
print "after"
"#,
    );
    assert_eq!(
        lines,
        vec!["before", "cannot add number and instance", "after"]
    );
}

#[test]
fn test_try_catches_failure_in_callee() {
    let lines = run_ok(
        r#"
fun boom:
  missing + 1
.
try:
  boom()
catch e:
  print e
.
print "done"
"#,
    );
    assert_eq!(lines, vec!["undefined variable 'missing'", "done"]);
}

#[test]
fn test_uncaught_failure_stops_run() {
    let (_, output, result) = run("print 1\nprint -\"x\"\nprint 2\n");
    assert!(result.is_err());
    assert_eq!(output.lines(), vec!["1"]);
}

#[test]
fn test_field_shadows_method_on_one_instance() {
    let lines = run_ok(
        r#"
class Pet:
  fun name:
    "method"
  .
.
a = Pet()
b = Pet()
a.name = "field"
print a.name
print b.name
print b.name()
"#,
    );
    assert_eq!(lines, vec!["field", "<bound name>", "method"]);
}

#[test]
fn test_catch_variable_leaves_scope() {
    let lines = run_ok(
        r#"
e = "global"
try:
  print null + 1
catch e:
  print "caught"
.
print e
"#,
    );
    assert_eq!(lines, vec!["caught", "global"]);

    let (_, _, result) = run("try:\n  print -null\ncatch gone:\n.\nprint gone\n");
    assert_eq!(
        result.unwrap_err(),
        VmError::UndefinedGlobal("gone".to_string())
    );
}

#[test]
fn test_spawn_does_not_block() {
    let (vm, output, result) = run(
        r#"
fun worker a, b:
  print a + b
.
spawn worker(1, 2)
print "next"
"#,
    );
    result.unwrap();
    vm.join_spawned();
    let lines = output.lines();
    assert_eq!(lines.len(), 2);
    assert!(lines.contains(&"next".to_string()));
    assert!(lines.contains(&"3".to_string()));
}

#[test]
fn test_unary_operators() {
    let lines = run_ok("print -(2 + 3)\nprint !0\nprint !\"\"\nprint 1 != 2\n");
    assert_eq!(lines, vec!["-5", "true", "false", "true"]);
}
