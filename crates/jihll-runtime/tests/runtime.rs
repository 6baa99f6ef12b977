//! Runtime tests: natives through scripts and file imports.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use jihll_common::SourceFile;
use jihll_runtime::{create_vm_with_output, run_main, run_source, ErrorKind, RuntimeConfig};
use jihll_vm::CaptureOutput;
use pretty_assertions::assert_eq;

fn run_in(root: &Path, source: &str) -> (Vec<String>, Result<(), String>) {
    let output = Arc::new(CaptureOutput::new());
    let config = RuntimeConfig::new(root.to_path_buf());
    let mut vm = create_vm_with_output(&config, output.clone());
    let result = run_source(&mut vm, &SourceFile::new("main.jhl", source))
        .map(|_| ())
        .map_err(|e| e.to_string());
    vm.join_spawned();
    (output.lines(), result)
}

#[test]
fn test_natives_are_globals() {
    let dir = tempfile::tempdir().unwrap();
    let (lines, result) = run_in(
        dir.path(),
        r#"
print len("abc")
print trim("  x  ")
print split("a b c", " ")
print jsonStringify({k: [1, true, null]})
print jsonParse("[1, 2]")
"#,
    );
    result.unwrap();
    assert_eq!(
        lines,
        vec!["3", "x", "[a, b, c]", r#"{"k":[1,true,null]}"#, "[1, 2]"]
    );
}

#[test]
fn test_native_can_be_shadowed() {
    let dir = tempfile::tempdir().unwrap();
    let (lines, result) = run_in(dir.path(), "len = 7\nprint len\n");
    result.unwrap();
    assert_eq!(lines, vec!["7"]);
}

#[test]
fn test_native_failure_is_catchable() {
    let dir = tempfile::tempdir().unwrap();
    let (lines, result) = run_in(
        dir.path(),
        "try:\n  len()\ncatch e:\n  print e\n.\nprint \"ok\"\n",
    );
    result.unwrap();
    assert_eq!(lines, vec!["len: expected 1 argument(s), got 0", "ok"]);
}

#[test]
fn test_import_shares_globals() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("util.jhl"),
        "greeting = \"hello\"\nfun shout s:\n  s + \"!\"\n.\nprint \"loaded\"\n",
    )
    .unwrap();
    let (lines, result) = run_in(
        dir.path(),
        "import \"util.jhl\"\nprint shout(greeting)\n",
    );
    result.unwrap();
    assert_eq!(lines, vec!["loaded", "hello!"]);
}

#[test]
fn test_import_sees_importer_globals() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("lib")).unwrap();
    fs::write(dir.path().join("lib/bump.jhl"), "count = count + 1\n").unwrap();
    let (lines, result) = run_in(
        dir.path(),
        "count = 1\nimport \"lib/bump.jhl\"\nimport \"lib/bump.jhl\"\nprint count\n",
    );
    result.unwrap();
    assert_eq!(lines, vec!["3"]);
}

#[test]
fn test_import_from_search_path() {
    let root = tempfile::tempdir().unwrap();
    let lib = tempfile::tempdir().unwrap();
    fs::write(lib.path().join("extra.jhl"), "answer = 42\n").unwrap();

    let output = Arc::new(CaptureOutput::new());
    let mut config = RuntimeConfig::new(root.path().to_path_buf());
    config.search_paths.push(lib.path().to_path_buf());
    let mut vm = create_vm_with_output(&config, output.clone());
    run_source(
        &mut vm,
        &SourceFile::new("main.jhl", "import \"extra.jhl\"\nprint answer\n"),
    )
    .unwrap();
    assert_eq!(output.lines(), vec!["42"]);
}

#[test]
fn test_missing_and_broken_imports_fail() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("broken.jhl"), "print (\n").unwrap();
    let (lines, result) = run_in(
        dir.path(),
        r#"
try:
  import "missing.jhl"
catch e:
  print e
.
import "broken.jhl"
"#,
    );
    assert_eq!(
        lines,
        vec!["import 'missing.jhl' failed: module not found: missing.jhl"]
    );
    let err = result.unwrap_err();
    assert!(err.starts_with("runtime error: import 'broken.jhl' failed:"), "{err}");
    assert!(err.contains("broken.jhl:2:"), "{err}");
}

#[test]
fn test_self_import_is_bounded() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("loop.jhl"), "import \"loop.jhl\"\n").unwrap();
    let (_, result) = run_in(dir.path(), "import \"loop.jhl\"\n");
    let err = result.unwrap_err();
    assert!(err.starts_with("runtime error: import 'loop.jhl' failed:"), "{err}");
    assert!(err.contains("imports nested too deeply"), "{err}");
}

#[test]
fn test_parse_error_kind() {
    let output = Arc::new(CaptureOutput::new());
    let config = RuntimeConfig::new(".".into());
    let mut vm = create_vm_with_output(&config, output);
    let err = run_source(&mut vm, &SourceFile::new("x.jhl", "fun:\n")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Parse);
}

#[test]
fn test_spawned_native_runs() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("spawned.txt");
    let source = format!(
        "spawn writeFile(\"{}\", \"from thread\")\nprint \"main\"\n",
        out.display()
    );
    let (lines, result) = run_in(dir.path(), &source);
    result.unwrap();
    assert_eq!(lines, vec!["main"]);
    assert_eq!(fs::read_to_string(out).unwrap(), "from thread");
}

#[test]
fn test_failed_main_still_waits_for_spawned() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("late.txt");
    let source = format!(
        r#"
fun worker:
  sleep(200)
  writeFile("{}", "worker done")
.
spawn worker()
x = 1 + null
"#,
        out.display()
    );
    let output = Arc::new(CaptureOutput::new());
    let config = RuntimeConfig::new(dir.path().to_path_buf());
    let mut vm = create_vm_with_output(&config, output);
    let err = run_main(&mut vm, &SourceFile::new("main.jhl", source)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Runtime);
    assert_eq!(fs::read_to_string(out).unwrap(), "worker done");
}

#[test]
fn test_worker_assignments_stay_in_worker() {
    let output = Arc::new(CaptureOutput::new());
    let config = RuntimeConfig::new(".".into());
    let mut vm = create_vm_with_output(&config, output.clone());
    let source = r#"
counter = 1
fun worker:
  counter = 99
  print "worker " + counter
.
spawn worker()
"#;
    run_main(&mut vm, &SourceFile::new("main.jhl", source)).unwrap();
    run_source(&mut vm, &SourceFile::new("after.jhl", "print \"main \" + counter\n")).unwrap();
    assert_eq!(output.lines(), vec!["worker 99", "main 1"]);
}
