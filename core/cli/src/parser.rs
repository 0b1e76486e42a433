//! Command line argument parsing for `qcc`, mirroring the shape of the
//! teacher's `inference-cli::parser::Cli` (phase/dump flags plus a single
//! input path), trimmed and re-aimed at this toolchain's own flag surface
//! (§6A).

use clap::{Parser, ValueEnum};

/// Which diagnostic renderer to use. `Auto` resolves to `Always` or `Never`
/// at CLI-boundary time by checking whether stderr is a terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum ColorMode {
    Auto,
    Always,
    Never,
}

/// Command line interface for the `qcc` compiler front end.
///
/// `qcc` operates in phases much like the teacher's `infc`, except the
/// phases here are dump/inspection modes rather than full-pipeline stages:
/// every invocation parses and lowers, and the flags pick what gets printed
/// afterward. At least one of `--dump-ast`, `--dump-ir`, `--mangle` must be
/// given.
#[derive(Parser)]
#[command(
    name = "qcc",
    author,
    version,
    about = "quixc compiler CLI (qcc)",
    long_about = "The 'qcc' command parses and lowers a single source file and reports on the \
result. --dump-ast prints the parsed AST, --dump-ir prints the lowered IR, and --mangle prints \
the mangled name of every top-level function and variable."
)]
#[allow(clippy::struct_excessive_bools)]
pub(crate) struct Cli {
    /// Path to the source file to compile, or `-` to read from stdin.
    pub(crate) path: String,

    /// Print the parsed AST's debug-dump grammar.
    #[clap(long = "dump-ast", action = clap::ArgAction::SetTrue)]
    pub(crate) dump_ast: bool,

    /// Lower the AST and print the IR's debug dump.
    #[clap(long = "dump-ir", action = clap::ArgAction::SetTrue)]
    pub(crate) dump_ir: bool,

    /// Lower the AST and print the mangled name of every top-level `Fn`/
    /// `Local`, one per line.
    #[clap(long = "mangle", action = clap::ArgAction::SetTrue)]
    pub(crate) mangle: bool,

    /// Controls whether diagnostics render with ANSI color.
    #[clap(long = "color", value_enum, default_value_t = ColorMode::Auto)]
    pub(crate) color: ColorMode,
}

impl ColorMode {
    pub(crate) fn resolve(self) -> quixc_ir::diagnostics::RenderMode {
        use quixc_ir::diagnostics::RenderMode;
        let use_color = match self {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => std::io::IsTerminal::is_terminal(&std::io::stderr()),
        };
        if use_color {
            RenderMode::Clang16Color
        } else {
            RenderMode::PlainText
        }
    }
}
