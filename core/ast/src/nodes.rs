//! The closed node-kind sum (§4.2): `Expr`, `Type`, `Decl`, `Stmt`, unified
//! under [`AstNode`].
//!
//! Every concrete kind is a variant rather than a teacher-style `Rc`-wrapped
//! struct, because the arena already owns every node by index — there is no
//! need for the teacher's shared-ownership `Rc<T>` handles once pointers are
//! replaced by [`NodeId`]s (see `arena.rs` and §9's redesign notes). What the
//! teacher's `ast_node!`/`ast_enum!` macros gave for free — `id()`,
//! `kind()`, one dispatch point per axis — this module gives by construction:
//! matching on `AstNode` is exhaustive, so there is no dynamic-checked cast
//! to get wrong.

use quixc_arena::intern::Symbol;
use quixc_arena::Id;

use crate::kinds::{
    BinaryOperatorKind, BindingKind, CompositeKind, Mutability, PostUnaryOperatorKind, Purity,
    SafetyMode, UnaryOperatorKind, Visibility, WordOperatorKind,
};

/// A handle to any node in an [`crate::arena::AstArena`], whichever axis it
/// belongs to. Use [`AstNode::kind_name`] or match on [`AstNode`] itself to
/// recover which axis a given id names.
pub type NodeId = Id<AstNode>;

/// The four axes of the grammar, unified so a single arena (and a single
/// [`NodeId`] space) can hold all of them — mirroring the teacher's
/// `Ast`/`AstNode` unifying enum generated by its `ast_enums!` macro.
#[derive(Debug, Clone)]
pub enum AstNode {
    Expr(Expr),
    Type(Type),
    Decl(Decl),
    Stmt(Stmt),
}

impl AstNode {
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            AstNode::Expr(e) => e.kind_name(),
            AstNode::Type(t) => t.kind_name(),
            AstNode::Decl(d) => d.kind_name(),
            AstNode::Stmt(s) => s.kind_name(),
        }
    }

    #[must_use]
    pub fn as_expr(&self) -> Option<&Expr> {
        match self {
            AstNode::Expr(e) => Some(e),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_type(&self) -> Option<&Type> {
        match self {
            AstNode::Type(t) => Some(t),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_decl(&self) -> Option<&Decl> {
        match self {
            AstNode::Decl(d) => Some(d),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_stmt(&self) -> Option<&Stmt> {
        match self {
            AstNode::Stmt(s) => Some(s),
            _ => None,
        }
    }
}

/// One part of an f-string: either a literal chunk or an interpolated
/// expression (implicitly stringified at lowering, §4.4.3).
#[derive(Debug, Clone)]
pub enum FStringPart {
    Literal(Symbol),
    Interpolated(NodeId),
}

#[derive(Debug, Clone)]
pub enum Expr {
    Binary {
        op: BinaryOperatorKind,
        lhs: NodeId,
        rhs: NodeId,
    },
    Unary {
        op: UnaryOperatorKind,
        operand: NodeId,
    },
    PostUnary {
        op: PostUnaryOperatorKind,
        operand: NodeId,
    },
    Word {
        op: WordOperatorKind,
        operand: NodeId,
        /// The right-hand `Type` operand for `as`/`is`/`bitcast_as`/
        /// `reinterpret_as`/`offsetof`.
        type_operand: Option<NodeId>,
        /// The right-hand expression operand for `in` (`lhs in rhs`, lowered
        /// to `rhs.has(lhs)` per §4.4.3); unused by every other word operator.
        rhs_expr: Option<NodeId>,
        field_name: Option<Symbol>,
    },
    Ternary {
        cond: NodeId,
        then_branch: NodeId,
        else_branch: NodeId,
    },
    IntLiteral {
        /// Native when the literal fits in 64 bits; otherwise the decimal
        /// digit string is kept verbatim for arbitrary precision, matching
        /// the IR's own integer-literal representation (§3).
        value: IntLiteralValue,
    },
    FloatLiteral {
        value: FloatLiteralValue,
    },
    BoolLiteral(bool),
    CharLiteral(char),
    StringLiteral(Symbol),
    NullLiteral,
    UndefLiteral,
    Call {
        callee: NodeId,
        args: Vec<NodeId>,
    },
    TemplateCall {
        callee: NodeId,
        type_args: Vec<NodeId>,
        args: Vec<NodeId>,
    },
    List(Vec<NodeId>),
    AssocPair {
        key: NodeId,
        value: NodeId,
    },
    FieldAccess {
        base: NodeId,
        field: Symbol,
    },
    Index {
        base: NodeId,
        index: NodeId,
    },
    Slice {
        base: NodeId,
        start: Option<NodeId>,
        end: Option<NodeId>,
    },
    FString(Vec<FStringPart>),
    Identifier {
        name: Symbol,
        /// Populated by the lowerer's name-resolution pass; empty during
        /// parsing.
        resolved: Option<NodeId>,
    },
    SequencePoint(Vec<NodeId>),
    StmtExpr(NodeId),
    TypeExpr(NodeId),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IntLiteralValue {
    Native(i128),
    ArbitraryPrecision(Symbol),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FloatLiteralValue {
    Native(f64),
    Decimal(Symbol),
}

impl Expr {
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Expr::Binary { .. } => "Binary",
            Expr::Unary { .. } => "Unary",
            Expr::PostUnary { .. } => "PostUnary",
            Expr::Word { .. } => "Word",
            Expr::Ternary { .. } => "Ternary",
            Expr::IntLiteral { .. } => "IntLiteral",
            Expr::FloatLiteral { .. } => "FloatLiteral",
            Expr::BoolLiteral(_) => "BoolLiteral",
            Expr::CharLiteral(_) => "CharLiteral",
            Expr::StringLiteral(_) => "StringLiteral",
            Expr::NullLiteral => "NullLiteral",
            Expr::UndefLiteral => "UndefLiteral",
            Expr::Call { .. } => "Call",
            Expr::TemplateCall { .. } => "TemplateCall",
            Expr::List(_) => "List",
            Expr::AssocPair { .. } => "AssocPair",
            Expr::FieldAccess { .. } => "FieldAccess",
            Expr::Index { .. } => "Index",
            Expr::Slice { .. } => "Slice",
            Expr::FString(_) => "FString",
            Expr::Identifier { .. } => "Identifier",
            Expr::SequencePoint(_) => "SequencePoint",
            Expr::StmtExpr(_) => "StmtExpr",
            Expr::TypeExpr(_) => "TypeExpr",
        }
    }
}

#[derive(Debug, Clone)]
pub enum Type {
    Primitive(crate::kinds::PrimitiveKind),
    Pointer(NodeId),
    Reference(NodeId),
    Opaque(Symbol),
    Composite {
        kind: CompositeKind,
        name: Option<Symbol>,
        fields: Vec<NodeId>,
    },
    Array {
        element: NodeId,
        size: NodeId,
    },
    Function {
        params: Vec<(NodeId, Option<NodeId>)>,
        return_type: NodeId,
        variadic: bool,
        purity: Purity,
        noreturn: bool,
        foreign: bool,
    },
    Unresolved(Symbol),
    Inferred,
    Templated {
        base: NodeId,
        type_args: Vec<NodeId>,
    },
}

impl Type {
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Type::Primitive(_) => "Primitive",
            Type::Pointer(_) => "Pointer",
            Type::Reference(_) => "Reference",
            Type::Opaque(_) => "Opaque",
            Type::Composite { .. } => "Composite",
            Type::Array { .. } => "Array",
            Type::Function { .. } => "Function",
            Type::Unresolved(_) => "Unresolved",
            Type::Inferred => "Inferred",
            Type::Templated { .. } => "Templated",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Param {
    pub name: Symbol,
    pub ty: NodeId,
    pub default: Option<NodeId>,
}

#[derive(Debug, Clone)]
pub struct CompositeField {
    pub name: Symbol,
    pub ty: NodeId,
    pub default: Option<NodeId>,
    pub visibility: Visibility,
}

#[derive(Debug, Clone)]
pub enum Decl {
    Typedef {
        name: Symbol,
        aliased: NodeId,
        visibility: Visibility,
    },
    FunctionDecl {
        name: Symbol,
        params: Vec<Param>,
        return_type: NodeId,
        variadic: bool,
        purity: Purity,
        noreturn: bool,
        visibility: Visibility,
    },
    FunctionDef {
        name: Symbol,
        params: Vec<Param>,
        return_type: NodeId,
        variadic: bool,
        purity: Purity,
        noreturn: bool,
        visibility: Visibility,
        body: NodeId,
        preconditions: Vec<NodeId>,
        postconditions: Vec<NodeId>,
        captures: Vec<Symbol>,
    },
    CompositeDef {
        kind: CompositeKind,
        name: Symbol,
        fields: Vec<CompositeField>,
        instance_methods: Vec<NodeId>,
        static_methods: Vec<NodeId>,
        attributes: Vec<NodeId>,
        visibility: Visibility,
    },
    EnumDef {
        name: Symbol,
        items: Vec<(Symbol, Option<NodeId>)>,
        visibility: Visibility,
    },
    Variable {
        binding: BindingKind,
        name: Symbol,
        ty: Option<NodeId>,
        initializer: Option<NodeId>,
        mutability: Mutability,
        visibility: Visibility,
    },
    Scope {
        name: Symbol,
        depends_on: Vec<Symbol>,
        body: Vec<NodeId>,
    },
    Export {
        abi_name: Option<Symbol>,
        items: Vec<NodeId>,
    },
    Import {
        path: Vec<Symbol>,
        alias: Option<Symbol>,
    },
}

impl Decl {
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Decl::Typedef { .. } => "Typedef",
            Decl::FunctionDecl { .. } => "FunctionDecl",
            Decl::FunctionDef { .. } => "FunctionDef",
            Decl::CompositeDef { .. } => "CompositeDef",
            Decl::EnumDef { .. } => "EnumDef",
            Decl::Variable { .. } => "Variable",
            Decl::Scope { .. } => "Scope",
            Decl::Export { .. } => "Export",
            Decl::Import { .. } => "Import",
        }
    }

    #[must_use]
    pub fn visibility(&self) -> Visibility {
        match self {
            Decl::Typedef { visibility, .. }
            | Decl::FunctionDecl { visibility, .. }
            | Decl::FunctionDef { visibility, .. }
            | Decl::CompositeDef { visibility, .. }
            | Decl::EnumDef { visibility, .. }
            | Decl::Variable { visibility, .. } => *visibility,
            Decl::Scope { .. } | Decl::Export { .. } | Decl::Import { .. } => Visibility::Public,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SwitchCase {
    pub value: NodeId,
    pub body: NodeId,
}

#[derive(Debug, Clone)]
pub enum Stmt {
    Block {
        safety: SafetyMode,
        stmts: Vec<NodeId>,
    },
    If {
        cond: NodeId,
        then_branch: NodeId,
        else_branch: Option<NodeId>,
    },
    While {
        cond: NodeId,
        body: NodeId,
    },
    For {
        init: Option<NodeId>,
        cond: Option<NodeId>,
        step: Option<NodeId>,
        body: NodeId,
    },
    Foreach {
        binding: Symbol,
        index_binding: Option<Symbol>,
        iterable: NodeId,
        body: NodeId,
    },
    ParallelFor {
        binding: Symbol,
        iterable: NodeId,
        concurrency_bound: Option<NodeId>,
        body: NodeId,
    },
    Break,
    Continue,
    Return(Option<NodeId>),
    ReturnIf {
        cond: NodeId,
        value: Option<NodeId>,
    },
    ReturnIfZero {
        cond: NodeId,
        value: Option<NodeId>,
    },
    ReturnVoidIf {
        cond: NodeId,
    },
    Switch {
        scrutinee: NodeId,
        cases: Vec<SwitchCase>,
        default: Option<NodeId>,
    },
    Case(SwitchCase),
    InlineAsm {
        template: Symbol,
        clobbers: Vec<Symbol>,
    },
    ExprStmt(NodeId),
    Volatile(NodeId),
    /// A top-level compilation unit: the root `Block`-like container the
    /// parser publishes once parsing a source file completes (§4.3's
    /// top-level contract returns a `Block` via `out_block`).
    SourceFile {
        decls: Vec<NodeId>,
    },
}

impl Stmt {
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Stmt::Block { .. } => "Block",
            Stmt::If { .. } => "If",
            Stmt::While { .. } => "While",
            Stmt::For { .. } => "For",
            Stmt::Foreach { .. } => "Foreach",
            Stmt::ParallelFor { .. } => "ParallelFor",
            Stmt::Break => "Break",
            Stmt::Continue => "Continue",
            Stmt::Return(_) => "Return",
            Stmt::ReturnIf { .. } => "ReturnIf",
            Stmt::ReturnIfZero { .. } => "ReturnIfZero",
            Stmt::ReturnVoidIf { .. } => "ReturnVoidIf",
            Stmt::Switch { .. } => "Switch",
            Stmt::Case(_) => "Case",
            Stmt::InlineAsm { .. } => "InlineAsm",
            Stmt::ExprStmt(_) => "ExprStmt",
            Stmt::Volatile(_) => "Volatile",
            Stmt::SourceFile { .. } => "SourceFile",
        }
    }
}
