//! The typed IR (C4): node model, AST lowering, name mangler, traversal
//! engine, diagnostics, and deep clone with back-reference fixup.
//!
//! [`IrModule`] owns every node for one compilation unit; [`lower::lower_source_file`]
//! is the AST-to-IR entry point; [`mangle`] and [`traverse`] are read-only
//! analyses over an already-built module; [`clone::clone_into`] copies a
//! subgraph, possibly across modules.

pub mod clone;
pub mod diagnostics;
pub mod dump;
pub mod errors;
pub mod expr;
pub mod ids;
pub mod lower;
pub mod mangle;
pub mod module;
pub mod node;
pub mod traverse;
pub mod types;

pub use diagnostics::{Diagnostic, DiagnosticClass, DiagnosticCode, DiagnosticEngine};
pub use errors::LowerError;
pub use expr::{AbiTag, IrExpr, StorageClass};
pub use ids::{IrId, ModuleIndex};
pub use module::IrModule;
pub use node::IrNode;
pub use types::{FunctionAttrs, IrType, LayoutError};
