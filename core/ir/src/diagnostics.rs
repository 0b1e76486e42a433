//! The diagnostic engine (§4.4.6): per-module accumulation of issues plus
//! pluggable rendering on top of `codespan-reporting`.

use codespan_reporting::diagnostic::{Diagnostic as CsDiagnostic, Label, Severity};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term::{self, termcolor};

use quixc_ast::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DiagnosticClass {
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
}

impl DiagnosticClass {
    fn to_severity(self) -> Severity {
        match self {
            DiagnosticClass::Debug => Severity::Help,
            DiagnosticClass::Info => Severity::Note,
            DiagnosticClass::Warn => Severity::Warning,
            DiagnosticClass::Error => Severity::Error,
            DiagnosticClass::Fatal => Severity::Bug,
        }
    }
}

/// One issue code per distinct lowering/parsing failure kind (§4.4.9), plus
/// `Panic` for a crash caught by [`guard`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticCode {
    BadTree,
    TypeRedefinition,
    VariableRedefinition,
    Unimplemented,
    InvalidAbiName,
    ParseError,
    Panic,
}

impl DiagnosticCode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            DiagnosticCode::BadTree => "bad-tree",
            DiagnosticCode::TypeRedefinition => "type-redefinition",
            DiagnosticCode::VariableRedefinition => "variable-redefinition",
            DiagnosticCode::Unimplemented => "unimplemented",
            DiagnosticCode::InvalidAbiName => "invalid-abi-name",
            DiagnosticCode::ParseError => "parse-error",
            DiagnosticCode::Panic => "panic",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub code: DiagnosticCode,
    pub class: DiagnosticClass,
    pub span: Option<Span>,
    pub message: String,
}

impl Diagnostic {
    #[must_use]
    pub fn new(code: DiagnosticCode, class: DiagnosticClass, span: Option<Span>, message: impl Into<String>) -> Self {
        Self {
            code,
            class,
            span,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn from_lower_error(err: &crate::errors::LowerError) -> Self {
        let code = match err {
            crate::errors::LowerError::BadTree { .. } => DiagnosticCode::BadTree,
            crate::errors::LowerError::TypeRedefinition { .. } => DiagnosticCode::TypeRedefinition,
            crate::errors::LowerError::VariableRedefinition { .. } => DiagnosticCode::VariableRedefinition,
            crate::errors::LowerError::Unimplemented { .. } => DiagnosticCode::Unimplemented,
            crate::errors::LowerError::InvalidAbiName { .. } => DiagnosticCode::InvalidAbiName,
        };
        Self::new(code, DiagnosticClass::Error, Some(err.span()), err.to_string())
    }
}

/// Accumulates diagnostics for one compilation unit (§4.4.6: "accumulates
/// per-module"). A pushed `Fatal` flips [`DiagnosticEngine::is_fatal`],
/// which callers check to decide whether to keep lowering further top-level
/// items.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticEngine {
    diagnostics: Vec<Diagnostic>,
    fatal: bool,
}

impl DiagnosticEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        if diagnostic.class == DiagnosticClass::Fatal {
            self.fatal = true;
        }
        self.diagnostics.push(diagnostic);
    }

    #[must_use]
    pub fn is_fatal(&self) -> bool {
        self.fatal
    }

    #[must_use]
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }
}

/// Which renderer to use for a batch of diagnostics (§4.4.6, and the CLI's
/// `--color auto|always|never` surface).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    PlainText,
    Clang16Color,
}

/// Renders every diagnostic in `engine` against `source_name`/`source_text`,
/// returning the formatted report as a `String`.
#[must_use]
pub fn render(engine: &DiagnosticEngine, source_name: &str, source_text: &str, mode: RenderMode) -> String {
    let mut files = SimpleFiles::new();
    let file_id = files.add(source_name, source_text);

    let config = term::Config::default();
    let mut buffer = match mode {
        RenderMode::PlainText => termcolor::Buffer::no_color(),
        RenderMode::Clang16Color => termcolor::Buffer::ansi(),
    };

    for diag in engine.iter() {
        let mut cs = CsDiagnostic::new(diag.class.to_severity())
            .with_code(diag.code.as_str())
            .with_message(diag.message.clone());
        if let Some(span) = diag.span {
            cs = cs.with_labels(vec![Label::primary(file_id, span.lo as usize..span.hi as usize)]);
        }
        // A render failure here means the span is out of bounds for the
        // given source text; that is a caller bug, not a recoverable
        // condition, so it is swallowed into a best-effort fallback line
        // rather than panicking the whole render.
        if term::emit(&mut buffer, &config, &files, &cs).is_err() {
            use std::fmt::Write as _;
            let mut line = String::new();
            let _ = writeln!(line, "{}: {}", diag.code.as_str(), diag.message);
            buffer.extend_from_slice(line.as_bytes());
        }
    }

    String::from_utf8_lossy(buffer.as_slice()).into_owned()
}

/// Runs `f`, converting a caught panic into an `Err` message instead of
/// propagating the unwind (§4.4.6's crash-guarding redesign: `catch_unwind`
/// around each top-level lowering/parsing unit in place of installed OS
/// signal handlers).
pub fn guard<F, R>(f: F) -> Result<R, String>
where
    F: FnOnce() -> R + std::panic::UnwindSafe,
{
    std::panic::catch_unwind(f).map_err(|payload| {
        if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown panic payload".to_string()
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fatal_diagnostic_sets_the_flag() {
        let mut engine = DiagnosticEngine::new();
        assert!(!engine.is_fatal());
        engine.push(Diagnostic::new(DiagnosticCode::Panic, DiagnosticClass::Fatal, None, "boom"));
        assert!(engine.is_fatal());
    }

    #[test]
    fn guard_converts_panic_to_err() {
        let result = guard(|| -> i32 { panic!("nope") });
        assert!(result.is_err());
        let ok = guard(|| 42);
        assert_eq!(ok.unwrap(), 42);
    }

    #[test]
    fn render_plain_text_contains_message() {
        let mut engine = DiagnosticEngine::new();
        engine.push(Diagnostic::new(
            DiagnosticCode::BadTree,
            DiagnosticClass::Error,
            Some(Span::new(0, 3)),
            "missing child",
        ));
        let out = render(&engine, "t.q", "abc", RenderMode::PlainText);
        assert!(out.contains("missing child"));
    }
}
