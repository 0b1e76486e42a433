//! Lowering-time error conditions (§4.4.9's failure modes), distinct from
//! the accumulated [`crate::diagnostics::Diagnostic`] log: these are the
//! `Result::Err` a single lowering function returns to unwind out of the
//! current top-level item, which the top-level loop then turns into a
//! diagnostic and a skip rather than propagating further.

use quixc_ast::Span;

#[derive(Debug, Clone, thiserror::Error)]
pub enum LowerError {
    #[error("expected child node is missing from the AST tree")]
    BadTree { span: Span },
    #[error("type `{name}` is already defined in this scope")]
    TypeRedefinition { name: String, span: Span },
    #[error("variable `{name}` is already defined in this scope")]
    VariableRedefinition { name: String, span: Span },
    #[error("`{construct}` is not yet supported")]
    Unimplemented { construct: &'static str, span: Span },
    #[error("`{value}` is not a recognized export ABI name")]
    InvalidAbiName { value: String, span: Span },
}

impl LowerError {
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            LowerError::BadTree { span }
            | LowerError::TypeRedefinition { span, .. }
            | LowerError::VariableRedefinition { span, .. }
            | LowerError::Unimplemented { span, .. }
            | LowerError::InvalidAbiName { span, .. } => *span,
        }
    }
}
