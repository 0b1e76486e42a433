//! Small closed enums shared across the node definitions.

use std::fmt;

/// Visibility of a declaration. Every `Decl` node carries one of these;
/// default is `Private`, matching the teacher convention that the absence
/// of a `pub`/`pro` keyword means "not visible outside its scope".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Private,
    Protected,
    Public,
}

/// Purity classification of a function declaration. `noreturn` is only
/// legal combined with one of the two `Impure*` variants; the constructor
/// that builds a `FunctionDef`/`FunctionDecl` enforces this (debug-asserts
/// in debug builds, returns an error from the parser in release).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Purity {
    #[default]
    ImpureThreadUnsafe,
    ImpureThreadSafe,
    Pure,
    Quasipure,
    Retropure,
}

impl Purity {
    #[must_use]
    pub fn permits_noreturn(self) -> bool {
        matches!(self, Purity::ImpureThreadUnsafe | Purity::ImpureThreadSafe)
    }
}

/// Safety mode of a `Block`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SafetyMode {
    #[default]
    Unknown,
    Safe,
    Unsafe,
}

/// Storage/binding keyword a local or global variable was declared with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingKind {
    Const,
    Var,
    Let,
}

/// Which of the four composite-definition keywords produced a `CompositeDef`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositeKind {
    Struct,
    Region,
    Group,
    Union,
    Enum,
    Tuple,
}

impl CompositeKind {
    /// Only `Group` sorts fields by descending bit-size and inserts
    /// alignment padding; the rest keep declaration order (§4.3).
    #[must_use]
    pub fn reorders_fields(self) -> bool {
        matches!(self, CompositeKind::Group)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutability {
    Mutable,
    Immutable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    U1,
    U8,
    U16,
    U32,
    U64,
    U128,
    I8,
    I16,
    I32,
    I64,
    I128,
    F16,
    F32,
    F64,
    F128,
    Void,
}

impl PrimitiveKind {
    pub const ALL: &'static [PrimitiveKind] = &[
        PrimitiveKind::U1,
        PrimitiveKind::U8,
        PrimitiveKind::U16,
        PrimitiveKind::U32,
        PrimitiveKind::U64,
        PrimitiveKind::U128,
        PrimitiveKind::I8,
        PrimitiveKind::I16,
        PrimitiveKind::I32,
        PrimitiveKind::I64,
        PrimitiveKind::I128,
        PrimitiveKind::F16,
        PrimitiveKind::F32,
        PrimitiveKind::F64,
        PrimitiveKind::F128,
        PrimitiveKind::Void,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            PrimitiveKind::U1 => "u1",
            PrimitiveKind::U8 => "u8",
            PrimitiveKind::U16 => "u16",
            PrimitiveKind::U32 => "u32",
            PrimitiveKind::U64 => "u64",
            PrimitiveKind::U128 => "u128",
            PrimitiveKind::I8 => "i8",
            PrimitiveKind::I16 => "i16",
            PrimitiveKind::I32 => "i32",
            PrimitiveKind::I64 => "i64",
            PrimitiveKind::I128 => "i128",
            PrimitiveKind::F16 => "f16",
            PrimitiveKind::F32 => "f32",
            PrimitiveKind::F64 => "f64",
            PrimitiveKind::F128 => "f128",
            PrimitiveKind::Void => "void",
        }
    }

    #[must_use]
    pub fn is_float(self) -> bool {
        matches!(
            self,
            PrimitiveKind::F16 | PrimitiveKind::F32 | PrimitiveKind::F64 | PrimitiveKind::F128
        )
    }

    #[must_use]
    pub fn is_signed_int(self) -> bool {
        matches!(
            self,
            PrimitiveKind::I8
                | PrimitiveKind::I16
                | PrimitiveKind::I32
                | PrimitiveKind::I64
                | PrimitiveKind::I128
        )
    }

    #[must_use]
    pub fn is_unsigned_int(self) -> bool {
        matches!(
            self,
            PrimitiveKind::U1
                | PrimitiveKind::U8
                | PrimitiveKind::U16
                | PrimitiveKind::U32
                | PrimitiveKind::U64
                | PrimitiveKind::U128
        )
    }

    /// Bit width, or `None` for `void` which has no size.
    #[must_use]
    pub fn bit_width(self) -> Option<u32> {
        Some(match self {
            PrimitiveKind::U1 => 1,
            PrimitiveKind::U8 | PrimitiveKind::I8 => 8,
            PrimitiveKind::U16 | PrimitiveKind::I16 | PrimitiveKind::F16 => 16,
            PrimitiveKind::U32 | PrimitiveKind::I32 | PrimitiveKind::F32 => 32,
            PrimitiveKind::U64 | PrimitiveKind::I64 | PrimitiveKind::F64 => 64,
            PrimitiveKind::U128 | PrimitiveKind::I128 | PrimitiveKind::F128 => 128,
            PrimitiveKind::Void => return None,
        })
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Binary operators, including assignment forms. Ordered by the `OperatorKind`
/// shape the teacher uses, extended with the assignment and logical variants
/// this language's grammar needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperatorKind {
    Pow,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    LogicalAnd,
    LogicalOr,
    LogicalXor,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
    Assign,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
    ModAssign,
    AndAssign,
    OrAssign,
    XorAssign,
    BitAndAssign,
    BitOrAssign,
    BitXorAssign,
    ShlAssign,
    ShrAssign,
}

impl BinaryOperatorKind {
    /// `true` for every compound-assignment operator (everything other than
    /// plain `=`); §4.4.3 lowers these to `lhs = (lhs_clone op rhs)`.
    #[must_use]
    pub fn is_compound_assign(self) -> bool {
        matches!(
            self,
            BinaryOperatorKind::AddAssign
                | BinaryOperatorKind::SubAssign
                | BinaryOperatorKind::MulAssign
                | BinaryOperatorKind::DivAssign
                | BinaryOperatorKind::ModAssign
                | BinaryOperatorKind::AndAssign
                | BinaryOperatorKind::OrAssign
                | BinaryOperatorKind::XorAssign
                | BinaryOperatorKind::BitAndAssign
                | BinaryOperatorKind::BitOrAssign
                | BinaryOperatorKind::BitXorAssign
                | BinaryOperatorKind::ShlAssign
                | BinaryOperatorKind::ShrAssign
        )
    }

    /// The plain operator a compound assignment desugars to, e.g.
    /// `AddAssign -> Add`. Panics if called on a non-compound operator or on
    /// plain `Assign`, which has no underlying binary operator.
    #[must_use]
    pub fn underlying(self) -> BinaryOperatorKind {
        match self {
            BinaryOperatorKind::AddAssign => BinaryOperatorKind::Add,
            BinaryOperatorKind::SubAssign => BinaryOperatorKind::Sub,
            BinaryOperatorKind::MulAssign => BinaryOperatorKind::Mul,
            BinaryOperatorKind::DivAssign => BinaryOperatorKind::Div,
            BinaryOperatorKind::ModAssign => BinaryOperatorKind::Mod,
            BinaryOperatorKind::AndAssign => BinaryOperatorKind::LogicalAnd,
            BinaryOperatorKind::OrAssign => BinaryOperatorKind::LogicalOr,
            BinaryOperatorKind::XorAssign => BinaryOperatorKind::LogicalXor,
            BinaryOperatorKind::BitAndAssign => BinaryOperatorKind::BitAnd,
            BinaryOperatorKind::BitOrAssign => BinaryOperatorKind::BitOr,
            BinaryOperatorKind::BitXorAssign => BinaryOperatorKind::BitXor,
            BinaryOperatorKind::ShlAssign => BinaryOperatorKind::Shl,
            BinaryOperatorKind::ShrAssign => BinaryOperatorKind::Shr,
            other => panic!("{other:?} is not a compound assignment"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperatorKind {
    Not,
    Neg,
    Pos,
    BitNot,
    Deref,
    AddressOf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostUnaryOperatorKind {
    Increment,
    Decrement,
}

/// The "word operators": keyword-spelled operators that take an expression
/// and, for most variants, a type or field name (§4.3's `as`, `is`, `in`,
/// `sizeof`, `alignof`, `bitsizeof`, `typeof`, `bitcast_as`,
/// `reinterpret_as`, `offsetof`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordOperatorKind {
    As,
    Is,
    In,
    Sizeof,
    Alignof,
    Bitsizeof,
    Typeof,
    BitcastAs,
    ReinterpretAs,
    Offsetof,
}

impl WordOperatorKind {
    /// `true` when this operator takes a right-hand `Type` operand rather
    /// than a second expression (`in` takes an expression; the others that
    /// aren't unary-only take a type).
    #[must_use]
    pub fn takes_type_operand(self) -> bool {
        matches!(
            self,
            WordOperatorKind::As
                | WordOperatorKind::Is
                | WordOperatorKind::BitcastAs
                | WordOperatorKind::ReinterpretAs
                | WordOperatorKind::Offsetof
        )
    }
}
