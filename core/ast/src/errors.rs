//! AST-crate error types.
//!
//! Grounded on the teacher's `inference_ast::errors::AstError` (a small
//! `thiserror` enum keyed to file/parse concerns); ours drops the
//! multi-file module-discovery variants the teacher needs and doesn't
//! apply here (this toolchain parses a single compilation unit at a time,
//! §1) and adds the structural-verification variant `verify()` reports.

use crate::span::Span;

#[derive(Debug, thiserror::Error)]
pub enum AstError {
    #[error("{span:?}: structural verification failed: {reason}")]
    VerificationFailed { span: Span, reason: String },

    #[error("{span:?}: `noreturn` is only permitted on an impure function")]
    NoreturnOnPureFunction { span: Span },
}
