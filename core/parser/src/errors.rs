//! Parser diagnostics sink.
//!
//! A lighter-weight cousin of `quixc-ir`'s full diagnostic engine (§4.4.6):
//! the parser crate intentionally doesn't depend on `quixc-ir` (that
//! dependency runs the other way, ast -> ir), so it accumulates plain
//! [`ParseIssue`]s here. The CLI and `quixc-ir`'s renderer both know how to
//! turn a `ParseIssue` into a full `Diagnostic` (see `quixc-ir::diagnostics`).

use quixc_ast::Span;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIssue {
    pub span: Span,
    pub message: String,
}

impl ParseIssue {
    #[must_use]
    pub fn new(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
        }
    }
}
