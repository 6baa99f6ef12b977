//! Test runner for file-based tests.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use jihll_common::SourceFile;
use jihll_runtime::{create_vm_with_output, run_main, RuntimeConfig};
use jihll_vm::CaptureOutput;

/// Result of running a single test.
#[derive(Debug)]
pub struct TestResult {
    pub file_name: String,
    pub passed: bool,
    pub message: String,
    pub expected: String,
    pub actual: String,
}

impl TestResult {
    fn pass(file_name: String) -> Self {
        Self {
            file_name,
            passed: true,
            message: "OK".to_string(),
            expected: String::new(),
            actual: String::new(),
        }
    }

    fn fail(file_name: String, message: &str, expected: String, actual: String) -> Self {
        Self {
            file_name,
            passed: false,
            message: message.to_string(),
            expected,
            actual,
        }
    }
}

/// Runs every test file below a directory.
pub struct TestRunner {
    test_dir: PathBuf,
}

impl TestRunner {
    pub fn new(test_dir: impl AsRef<Path>) -> Self {
        Self {
            test_dir: test_dir.as_ref().to_path_buf(),
        }
    }

    pub fn run_all(&self) -> Vec<TestResult> {
        let mut files = Vec::new();
        collect_files(&self.test_dir, &mut files);
        files.sort();
        files
            .iter()
            .filter_map(|path| run_test_file(path))
            .collect()
    }
}

fn collect_files(dir: &Path, out: &mut Vec<PathBuf>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_files(&path, out);
        } else if path.extension().is_some_and(|e| e == "jhl") {
            out.push(path);
        }
    }
}

/// Runs all tests in a directory tree.
pub fn run_all_tests(test_dir: &Path) -> Vec<TestResult> {
    TestRunner::new(test_dir).run_all()
}

/// Runs a single test file. Returns `None` for support modules.
pub fn run_test_file(path: &Path) -> Option<TestResult> {
    let file_name = path.display().to_string();
    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            return Some(TestResult::fail(
                file_name,
                &format!("Failed to read file: {}", e),
                String::new(),
                String::new(),
            ))
        }
    };

    let sections = parse_test_file(&content);
    if sections.output.is_none() && sections.error.is_none() {
        return None;
    }

    let root = path.parent().map(Path::to_path_buf).unwrap_or_default();
    let (lines, error) = execute(&root, &file_name, &sections.source);

    if let Some(expected) = &sections.output {
        let (expected_lines, actual_lines) = if sections.unordered {
            (sorted(expected.lines()), sorted(lines.iter().map(String::as_str)))
        } else {
            (expected.lines().map(str::to_string).collect(), lines)
        };
        if expected_lines != actual_lines {
            return Some(TestResult::fail(
                file_name,
                "Output doesn't match",
                expected_lines.join("\n"),
                actual_lines.join("\n"),
            ));
        }
    }

    match (&sections.error, error) {
        (Some(expected), Some(actual)) if expected.trim() == actual.trim() => {}
        (Some(expected), actual) => {
            return Some(TestResult::fail(
                file_name,
                "Error doesn't match",
                expected.clone(),
                actual.unwrap_or_default(),
            ))
        }
        (None, Some(actual)) => {
            return Some(TestResult::fail(
                file_name,
                "Unexpected error",
                String::new(),
                actual,
            ))
        }
        (None, None) => {}
    }

    Some(TestResult::pass(file_name))
}

fn execute(root: &Path, name: &str, source: &str) -> (Vec<String>, Option<String>) {
    let output = Arc::new(CaptureOutput::new());
    let config = RuntimeConfig::new(root.to_path_buf());
    let mut vm = create_vm_with_output(&config, output.clone());
    let result = run_main(&mut vm, &SourceFile::new(name, source));
    let mut lines = output.lines();
    lines.extend(output.reports());
    (lines, result.err().map(|e| e.message()))
}

fn sorted<'a>(lines: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut lines: Vec<String> = lines.map(str::to_string).collect();
    lines.sort();
    lines
}

/// Parsed sections from a test file.
#[derive(Debug, Default)]
struct TestSections {
    source: String,
    output: Option<String>,
    unordered: bool,
    error: Option<String>,
}

/// Parses a test file into sections.
fn parse_test_file(content: &str) -> TestSections {
    let mut sections = TestSections::default();
    let mut current = "source".to_string();
    let mut body = String::new();

    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with("=== ") && trimmed.ends_with(" ===") && trimmed.len() > 8 {
            sections.store(&current, &body);
            body.clear();
            current = trimmed[4..trimmed.len() - 4].to_string();
        } else {
            body.push_str(line);
            body.push('\n');
        }
    }
    sections.store(&current, &body);
    sections
}

impl TestSections {
    fn store(&mut self, section: &str, body: &str) {
        match section {
            "source" => self.source = body.to_string(),
            "output" => self.output = Some(body.trim().to_string()),
            "output unordered" => {
                self.output = Some(body.trim().to_string());
                self.unordered = true;
            }
            "error" => self.error = Some(body.trim().to_string()),
            _ => {}
        }
    }
}
