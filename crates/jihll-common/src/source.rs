//! Source file management.

use std::fmt;
use std::sync::Arc;

use crate::span::Span;

/// Line and column information for a position in a source file.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct LineCol {
    /// 1-indexed line number.
    pub line: u32,
    /// 1-indexed column number (in UTF-8 bytes).
    pub column: u32,
}

impl LineCol {
    #[inline]
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for LineCol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A named piece of source text with precomputed line starts.
#[derive(Clone)]
pub struct SourceFile {
    name: Arc<str>,
    source: Arc<str>,
    /// Byte offsets of line starts. The first element is always 0.
    line_starts: Vec<u32>,
}

impl SourceFile {
    pub fn new(name: impl Into<Arc<str>>, source: impl Into<Arc<str>>) -> Self {
        let source = source.into();
        let line_starts = Self::compute_line_starts(&source);
        Self {
            name: name.into(),
            source,
            line_starts,
        }
    }

    fn compute_line_starts(source: &str) -> Vec<u32> {
        let mut starts = vec![0];
        for (i, c) in source.char_indices() {
            if c == '\n' {
                starts.push((i + 1) as u32);
            }
        }
        starts
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Converts a byte position to line/column.
    pub fn line_col(&self, pos: u32) -> LineCol {
        let line = match self.line_starts.binary_search(&pos) {
            Ok(line) => line,
            Err(line) => line.saturating_sub(1),
        };
        let column = pos.saturating_sub(self.line_starts[line]) + 1;
        LineCol::new((line + 1) as u32, column)
    }

    /// Returns the source text for a given span, clamped to the file.
    pub fn span_text(&self, span: Span) -> &str {
        let start = (span.start as usize).min(self.source.len());
        let end = (span.end as usize).min(self.source.len());
        self.source.get(start..end).unwrap_or("")
    }
}

impl fmt::Debug for SourceFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceFile")
            .field("name", &self.name)
            .field("len", &self.source.len())
            .field("lines", &self.line_starts.len())
            .finish()
    }
}
