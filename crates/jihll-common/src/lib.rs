//! Shared infrastructure for the Jihll toolchain.
//!
//! - [`span`]: byte ranges into source text
//! - [`source`]: source files with line tables
//! - [`diagnostics`]: rendering errors against their source

pub mod diagnostics;
pub mod source;
pub mod span;

pub use diagnostics::Diagnostic;
pub use source::{LineCol, SourceFile};
pub use span::Span;
