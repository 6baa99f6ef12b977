//! Diagnostic rendering.
//!
//! Errors from the front end carry a [`Span`]; this module turns them into
//! either a rich `codespan-reporting` snippet or a compact
//! `file:line:col: message` line.

use codespan_reporting::diagnostic::{Diagnostic as Report, Label};
use codespan_reporting::files::SimpleFile;
use codespan_reporting::term::{self, Config};
use termcolor::{ColorChoice, NoColor, StandardStream, WriteColor};

use crate::source::SourceFile;
use crate::span::Span;

/// An error message with an optional location.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub message: String,
    pub span: Option<Span>,
    pub notes: Vec<String>,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            span: None,
            notes: Vec::new(),
        }
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    fn to_report(&self, file: &SourceFile) -> Report<()> {
        let mut report = Report::error().with_message(&self.message);
        if let Some(span) = self.span {
            let end = (span.end as usize).min(file.source().len());
            let start = (span.start as usize).min(end);
            report = report.with_labels(vec![Label::primary((), start..end)]);
        }
        report.with_notes(self.notes.clone())
    }

    /// Writes the rich form to `writer`.
    pub fn emit_to(&self, file: &SourceFile, writer: &mut dyn WriteColor) -> std::io::Result<()> {
        let files = SimpleFile::new(file.name(), file.source());
        term::emit(writer, &Config::default(), &files, &self.to_report(file))
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))
    }

    /// Writes the rich form to stderr, colored when stderr is a terminal.
    pub fn emit(&self, file: &SourceFile) -> std::io::Result<()> {
        let mut stderr = StandardStream::stderr(ColorChoice::Auto);
        self.emit_to(file, &mut stderr)
    }

    /// Renders the rich form without color codes.
    pub fn render_plain(&self, file: &SourceFile) -> String {
        let mut buf = NoColor::new(Vec::new());
        if self.emit_to(file, &mut buf).is_err() {
            return self.short(file);
        }
        String::from_utf8_lossy(&buf.into_inner()).into_owned()
    }

    /// `file:line:col: message`, or `file: message` without a span.
    pub fn short(&self, file: &SourceFile) -> String {
        match self.span {
            Some(span) => format!("{}:{}: {}", file.name(), file.line_col(span.start), self.message),
            None => format!("{}: {}", file.name(), self.message),
        }
    }
}
