//! Output sinks for `print` and diagnostics.

use parking_lot::Mutex;

/// Where a VM writes program output and out-of-band reports (failures of
/// spawned threads).
pub trait Output: Send + Sync {
    fn print(&self, line: &str);
    fn report(&self, message: &str);
}

/// Prints to stdout, reports to stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdOutput;

impl Output for StdOutput {
    fn print(&self, line: &str) {
        println!("{}", line);
    }

    fn report(&self, message: &str) {
        eprintln!("{}", message);
    }
}

/// Collects output in memory.
#[derive(Debug, Default)]
pub struct CaptureOutput {
    lines: Mutex<Vec<String>>,
    reports: Mutex<Vec<String>>,
}

impl CaptureOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }

    pub fn reports(&self) -> Vec<String> {
        self.reports.lock().clone()
    }

    /// Printed lines joined with `\n`.
    pub fn text(&self) -> String {
        self.lines.lock().join("\n")
    }

    pub fn clear(&self) {
        self.lines.lock().clear();
        self.reports.lock().clear();
    }
}

impl Output for CaptureOutput {
    fn print(&self, line: &str) {
        self.lines.lock().push(line.to_string());
    }

    fn report(&self, message: &str) {
        self.reports.lock().push(message.to_string());
    }
}
