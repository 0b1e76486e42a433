//! IR expression nodes (§3 "IR entities" / `Expr`).
//!
//! The 6-bit node-kind tag the spec mentions is realized as the enum's
//! ordinary discriminant; there is no separate tag field to keep in sync.

use quixc_arena::intern::Symbol;
use quixc_ast::kinds::{BinaryOperatorKind, PostUnaryOperatorKind, UnaryOperatorKind};

use crate::ids::IrId;

/// Which calling convention a `Local`/`Function`/`ExternWrapper` was
/// published under (§4.4.2's export-ABI dispatch: no enclosing export ->
/// `Internal`; an export with an empty ABI name or `"q"` -> `Quix`; `"c"`
/// -> `C`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AbiTag {
    Internal,
    C,
    Quix,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageClass {
    Global,
    Local,
}

/// A deferred/unresolved cradle (§3: "carrying enough information for a
/// later resolution pass to finish lowering").
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TmpKind {
    Null,
    Undef,
    NamedTypeRef(Symbol),
    EnumRef { enum_name: Symbol, item: Symbol },
    PartialCall { callee: Symbol, args: Vec<IrId> },
}

#[derive(Debug, Clone)]
pub struct SwitchCase {
    pub value: IrId,
    pub body: IrId,
}

#[derive(Debug, Clone)]
pub enum IrExpr {
    Binary {
        op: BinaryOperatorKind,
        lhs: IrId,
        rhs: IrId,
    },
    Unary {
        op: UnaryOperatorKind,
        operand: IrId,
    },
    PostUnary {
        op: PostUnaryOperatorKind,
        operand: IrId,
    },
    IntLiteral(IntLiteral),
    FloatLiteral(FloatLiteral),
    List(Vec<IrId>),
    Call {
        target: IrId,
        args: Vec<IrId>,
    },
    /// Ordered list of child expressions; the unit value when empty.
    Sequence(Vec<IrId>),
    Index {
        base: IrId,
        index: IrId,
    },
    /// An identifier with an optional direct back-reference to its
    /// referent (§3 IR invariant: participates in cycles via back-refs).
    Ident {
        name: Symbol,
        referent: Option<IrId>,
    },
    ExternWrapper {
        abi: AbiTag,
        payload: IrId,
    },
    Local {
        name: Symbol,
        storage: StorageClass,
        abi: AbiTag,
        mutable: bool,
        ty: IrId,
        initializer: Option<IrId>,
    },
    Ret(Option<IrId>),
    Brk,
    Cont,
    If {
        cond: IrId,
        then_branch: IrId,
        else_branch: Option<IrId>,
    },
    While {
        cond: IrId,
        body: IrId,
    },
    For {
        init: Option<IrId>,
        cond: Option<IrId>,
        step: Option<IrId>,
        body: IrId,
    },
    ParallelFor {
        binding: Symbol,
        iterable: IrId,
        concurrency_bound: Option<IrId>,
        body: IrId,
    },
    Case(SwitchCase),
    Switch {
        scrutinee: IrId,
        cases: Vec<SwitchCase>,
        default: Option<IrId>,
    },
    /// Name + parameters + return type + optional body + variadic + ABI
    /// tag (§3). `referent` entries inside the body may cyclically refer
    /// back to this node's own `IrId` for recursive calls — that
    /// back-reference is carried on the `Ident`/`Call` nodes, not here.
    Function {
        name: Symbol,
        params: Vec<IrId>,
        return_type: IrId,
        body: Option<IrId>,
        variadic: bool,
        abi: AbiTag,
    },
    InlineAsm {
        template: Symbol,
        clobbers: Vec<Symbol>,
    },
    Ignore,
    Tmp(TmpKind),
    /// `as`/`bitcast_as` (§4.4.3: "Cast (`as`, `bitcast_as`) -> BinExpr(lhs,
    /// rhs_type, CastAs | BitcastAs)"), modeled as its own node rather than
    /// folded into [`IrExpr::Binary`] since a cast's right operand is a
    /// *type*, not an expression, and `BinaryOperatorKind` is shared with
    /// the AST's value-to-value operators.
    Cast {
        value: IrId,
        target_type: IrId,
        bit_cast: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IntLiteral {
    Native(i128),
    ArbitraryPrecision(Symbol),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FloatLiteral {
    Native(f64),
    Decimal(Symbol),
}

impl IrExpr {
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            IrExpr::Binary { .. } => "Binary",
            IrExpr::Unary { .. } => "Unary",
            IrExpr::PostUnary { .. } => "PostUnary",
            IrExpr::IntLiteral(_) => "IntLiteral",
            IrExpr::FloatLiteral(_) => "FloatLiteral",
            IrExpr::List(_) => "List",
            IrExpr::Call { .. } => "Call",
            IrExpr::Sequence(_) => "Sequence",
            IrExpr::Index { .. } => "Index",
            IrExpr::Ident { .. } => "Ident",
            IrExpr::ExternWrapper { .. } => "ExternWrapper",
            IrExpr::Local { .. } => "Local",
            IrExpr::Ret(_) => "Ret",
            IrExpr::Brk => "Brk",
            IrExpr::Cont => "Cont",
            IrExpr::If { .. } => "If",
            IrExpr::While { .. } => "While",
            IrExpr::For { .. } => "For",
            IrExpr::ParallelFor { .. } => "ParallelFor",
            IrExpr::Case(_) => "Case",
            IrExpr::Switch { .. } => "Switch",
            IrExpr::Function { .. } => "Function",
            IrExpr::InlineAsm { .. } => "InlineAsm",
            IrExpr::Ignore => "Ignore",
            IrExpr::Tmp(_) => "Tmp",
            IrExpr::Cast { .. } => "Cast",
        }
    }

    /// `true` for nodes whose *kind* alone determines their identity
    /// (§4.4.4's hash-consing: void/primitive types, brk, cont, ignore).
    /// Primitive types are handled on the `IrType` side; this covers the
    /// stateless expression kinds.
    #[must_use]
    pub fn is_stateless(&self) -> bool {
        matches!(self, IrExpr::Brk | IrExpr::Cont | IrExpr::Ignore)
    }
}
