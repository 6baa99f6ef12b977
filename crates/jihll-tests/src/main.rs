//! Runs `.jhl` test files and prints a summary.
//!
//! ```text
//! jihll-tests               # everything under test_data/
//! jihll-tests <file.jhl>    # one file
//! jihll-tests <dir>         # one directory tree
//! ```

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use jihll_tests::{run_all_tests, run_test_file, TestResult};

fn main() -> ExitCode {
    let path = env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("test_data"));

    if !path.exists() {
        eprintln!("error: no such file or directory: {}", path.display());
        return ExitCode::FAILURE;
    }

    let results: Vec<TestResult> = if path.is_file() {
        run_test_file(&path).into_iter().collect()
    } else {
        run_all_tests(&path)
    };

    let rule = "-".repeat(60);
    println!("{}", rule);
    for result in &results {
        report(result);
    }
    println!("{}", rule);

    let failed = results.iter().filter(|r| !r.passed).count();
    println!(
        "{} passed, {} failed, {} total",
        results.len() - failed,
        failed,
        results.len()
    );

    if failed == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn report(result: &TestResult) {
    let mark = if result.passed { "✓" } else { "✗" };
    println!("{} {}: {}", mark, result.file_name, result.message);
    if result.passed {
        return;
    }
    for (label, text) in [("expected", &result.expected), ("actual", &result.actual)] {
        if text.is_empty() {
            continue;
        }
        println!("  {}:", label);
        for line in text.lines() {
            println!("    {}", line);
        }
    }
}
