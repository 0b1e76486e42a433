//! The operator precedence table driving the Pratt/precedence-climbing
//! expression parser (§4.3).
//!
//! Assignment is right-associative; comparisons are non-associative (the
//! table still assigns them a binding power, but the parser refuses to
//! chain two at the same level, see `parser.rs::parse_binary`); every other
//! binary operator is left-associative.

use quixc_ast::kinds::BinaryOperatorKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assoc {
    Left,
    Right,
    None,
}

/// Binding power pair `(left, right)` in the classic Pratt-parsing sense:
/// for left-associative operators `right = left + 1`; for right-associative
/// operators `right = left`.
#[must_use]
pub fn lookup(punct: &str) -> Option<(BinaryOperatorKind, u8, Assoc)> {
    use BinaryOperatorKind as B;
    Some(match punct {
        "=" => (B::Assign, 2, Assoc::Right),
        "+=" => (B::AddAssign, 2, Assoc::Right),
        "-=" => (B::SubAssign, 2, Assoc::Right),
        "*=" => (B::MulAssign, 2, Assoc::Right),
        "/=" => (B::DivAssign, 2, Assoc::Right),
        "%=" => (B::ModAssign, 2, Assoc::Right),
        "&&=" => (B::AndAssign, 2, Assoc::Right),
        "||=" => (B::OrAssign, 2, Assoc::Right),
        "^^=" => (B::XorAssign, 2, Assoc::Right),
        "&=" => (B::BitAndAssign, 2, Assoc::Right),
        "|=" => (B::BitOrAssign, 2, Assoc::Right),
        "^=" => (B::BitXorAssign, 2, Assoc::Right),
        "<<=" => (B::ShlAssign, 2, Assoc::Right),
        ">>=" => (B::ShrAssign, 2, Assoc::Right),
        "||" => (B::LogicalOr, 4, Assoc::Left),
        "^^" => (B::LogicalXor, 5, Assoc::Left),
        "&&" => (B::LogicalAnd, 6, Assoc::Left),
        "|" => (B::BitOr, 7, Assoc::Left),
        "^" => (B::BitXor, 8, Assoc::Left),
        "&" => (B::BitAnd, 9, Assoc::Left),
        "==" => (B::Eq, 10, Assoc::None),
        "!=" => (B::Ne, 10, Assoc::None),
        "<" => (B::Lt, 10, Assoc::None),
        "<=" => (B::Le, 10, Assoc::None),
        ">" => (B::Gt, 10, Assoc::None),
        ">=" => (B::Ge, 10, Assoc::None),
        "<<" => (B::Shl, 11, Assoc::Left),
        ">>" => (B::Shr, 11, Assoc::Left),
        "+" => (B::Add, 12, Assoc::Left),
        "-" => (B::Sub, 12, Assoc::Left),
        "*" => (B::Mul, 13, Assoc::Left),
        "/" => (B::Div, 13, Assoc::Left),
        "%" => (B::Mod, 13, Assoc::Left),
        "**" => (B::Pow, 15, Assoc::Right),
        _ => return None,
    })
}

/// The binding power of the word-spelled operators (`as`, `is`, `in`,
/// `bitcast_as`, `reinterpret_as`). Slightly tighter than comparisons so
/// `a as T == b` parses as `(a as T) == b`.
pub const WORD_OPERATOR_PRECEDENCE: u8 = 13;
