//! Shared helpers: parsing a snippet straight through `quixc`'s own
//! pipeline, and locating files under `tests/test_data/`.

#![allow(dead_code)]

use quixc_ast::{AstArena, NodeId};
use quixc_ir::diagnostics::DiagnosticEngine;
use quixc_ir::module::IrModule;
use quixc_parser::errors::ParseIssue;

/// Parses `source` through the CLI's own reference tokenizer, same path
/// `qcc` runs. Use the [`crate::parser::fixture`] stream instead when a test
/// needs to drive the parser with tokens no real-text lexer would produce.
pub fn parse(source: &str) -> (AstArena, NodeId, Vec<ParseIssue>) {
    quixc::parse(source)
}

pub fn lower(ast: &AstArena, root: NodeId) -> (IrModule, DiagnosticEngine) {
    quixc::lower(ast, root)
}

pub fn compile(source: &str) -> quixc::CompileOutcome {
    quixc::compile(source).expect("compile() only errors on conditions this crate doesn't hit")
}

/// `<workspace_root>/tests/test_data/qx/<name>`.
pub fn test_data_path(name: &str) -> std::path::PathBuf {
    std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("test_data").join("qx").join(name)
}
