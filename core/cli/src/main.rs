//! # quixc Compiler CLI
//!
//! Command line interface for the quixc toolchain.
//!
//! `qcc` parses and lowers a single source file, then reports on it
//! according to whichever of `--dump-ast` / `--dump-ir` / `--mangle` was
//! given (§6A). At least one of those flags must be supplied.
//!
//! ## Exit codes
//! * 0 – success.
//! * 1 – usage / IO / parse / lowering failure.
//!
//! ## Example
//! ```bash
//! qcc hello.qx --dump-ir
//! ```
//!
//! ## Tests
//! Integration tests exercise flag validation and the happy-path pipeline.

mod parser;

use clap::Parser as _;
use parser::Cli;
use quixc_ir::diagnostics::render;
use std::{fs, io::Read as _, process};

/// Entry point for the CLI executable.
///
/// Responsibilities:
/// * Parse flags.
/// * Validate that at least one of the dump/mangle flags is selected.
/// * Read the source (a file path, or stdin for `-`).
/// * Run the parse -> lower pipeline and print whatever was requested.
///
/// On any failure a diagnostic is printed to stderr and the process exits
/// with code `1`.
fn main() {
    let args = Cli::parse();

    if !(args.dump_ast || args.dump_ir || args.mangle) {
        eprintln!("Error: at least one of --dump-ast, --dump-ir, or --mangle must be specified");
        process::exit(1);
    }

    let source = if args.path == "-" {
        let mut buf = String::new();
        if std::io::stdin().read_to_string(&mut buf).is_err() {
            eprintln!("Error reading source from stdin");
            process::exit(1);
        }
        buf
    } else {
        match fs::read_to_string(&args.path) {
            Ok(s) => s,
            Err(_) => {
                eprintln!("Error: path not found");
                process::exit(1);
            }
        }
    };

    let (ast, root, parse_issues) = quixc::parse(&source);
    if args.dump_ast {
        println!("{}", quixc_ast::print::print_to_string(&ast, root, false));
    }

    let (mut module, mut diagnostics) = quixc::lower(&ast, root);
    for issue in &parse_issues {
        diagnostics.push(quixc_ir::diagnostics::Diagnostic::new(
            quixc_ir::diagnostics::DiagnosticCode::ParseError,
            quixc_ir::diagnostics::DiagnosticClass::Error,
            Some(issue.span),
            issue.message.clone(),
        ));
    }

    if args.dump_ir {
        println!("{}", quixc_ir::dump::dump_to_string(&module));
    }

    if args.mangle {
        let top_level = module.top_level.clone();
        for id in top_level {
            if let Some(name) = mangled_name_of(&mut module, id) {
                println!("{name}");
            }
        }
    }

    if !diagnostics.is_empty() {
        let report = render(&diagnostics, &args.path, &source, args.color.resolve());
        eprint!("{report}");
    }

    if diagnostics.is_fatal() || !parse_issues.is_empty() {
        process::exit(1);
    }
    process::exit(0);
}

/// Mangles a top-level `Function`/`Local`'s qualified name against its
/// declared type. Function parameters lowered with bodies are `Local`
/// nodes (their own type lives on `Local::ty`); parameter-only
/// declarations (no body) store bare type ids directly — this picks
/// whichever shape is present rather than assuming one (§4.4.7). Needs
/// `&mut IrModule` since mangling a function's signature first allocates a
/// synthesized `IrType::Function` node to mangle against.
fn mangled_name_of(module: &mut quixc_ir::IrModule, id: quixc_ir::IrId) -> Option<String> {
    use quixc_ir::expr::IrExpr;
    use quixc_ir::IrNode;

    let param_type = |module: &quixc_ir::IrModule, p: quixc_ir::IrId| -> quixc_ir::IrId {
        match module.get(p) {
            IrNode::Expr(IrExpr::Local { ty, .. }) => *ty,
            _ => p,
        }
    };

    match module.get(id).clone() {
        IrNode::Expr(IrExpr::Function { name, params, return_type, variadic, .. }) => {
            let param_types: Vec<_> = params.iter().map(|&p| param_type(module, p)).collect();
            let fn_ty = quixc_ir::types::IrType::Function {
                params: param_types,
                return_type,
                variadic,
                attrs: quixc_ir::types::FunctionAttrs { noreturn: false, foreign: false },
            };
            let ty_id = module.create_type(fn_ty, None);
            Some(quixc_ir::mangle::mangle_quix(module, module.resolve(name), ty_id))
        }
        IrNode::Expr(IrExpr::Local { name, ty, .. }) => {
            Some(quixc_ir::mangle::mangle_quix(module, module.resolve(name), ty))
        }
        _ => None,
    }
}
