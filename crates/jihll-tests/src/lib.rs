//! File-based integration tests for Jihll.
//!
//! A test file is a `.jhl` program followed by expectation sections:
//!
//! ```text
//! print 1 + 2
//!
//! === output ===
//! 3
//! ```
//!
//! Supported sections:
//! - `=== output ===` - printed lines, in order
//! - `=== output unordered ===` - printed lines in any order (spawned threads)
//! - `=== error ===` - message of the failure that ends the run
//!
//! Files without any section are support modules for `import` and are skipped.
//! Imports resolve against the directory of the test file.

mod runner;

pub use runner::{run_all_tests, run_test_file, TestResult, TestRunner};

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_run_all_files() {
        let test_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("test_data");
        let results = run_all_tests(&test_dir);
        assert!(!results.is_empty(), "no test files under {}", test_dir.display());

        let failures: Vec<String> = results
            .iter()
            .filter(|r| !r.passed)
            .map(|r| {
                format!(
                    "{}: {}\n  Expected:\n{}\n  Actual:\n{}",
                    r.file_name,
                    r.message,
                    indent(&r.expected),
                    indent(&r.actual)
                )
            })
            .collect();
        if !failures.is_empty() {
            panic!("Test failures:\n{}", failures.join("\n\n"));
        }
    }

    fn indent(text: &str) -> String {
        text.lines()
            .map(|l| format!("    {}", l))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
