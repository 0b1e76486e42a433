//! The name mangler (§4.4.7). Grounded on the original `Format.cc`'s
//! self-delimiting `<len><segment>` namespace encoding and single-letter
//! primitive codes, reexpressed as a recursive walk over [`IrType`] instead
//! of a C++ string-view scan.

use serde_json::json;

use crate::ids::IrId;
use crate::module::IrModule;
use crate::types::IrType;
use quixc_ast::kinds::PrimitiveKind;

fn primitive_code(p: PrimitiveKind) -> &'static str {
    match p {
        PrimitiveKind::U1 => "b",
        PrimitiveKind::U8 => "h",
        PrimitiveKind::U16 => "t",
        PrimitiveKind::U32 => "j",
        PrimitiveKind::U64 => "m",
        PrimitiveKind::U128 => "o",
        PrimitiveKind::I8 => "a",
        PrimitiveKind::I16 => "s",
        PrimitiveKind::I32 => "i",
        PrimitiveKind::I64 => "l",
        PrimitiveKind::I128 => "n",
        PrimitiveKind::F16 => "Dh",
        PrimitiveKind::F32 => "Df",
        PrimitiveKind::F64 => "Dd",
        PrimitiveKind::F128 => "De",
        PrimitiveKind::Void => "v",
    }
}

/// `x::y::zzz` -> `1x1y3zzz` (`encode_ns_size_value`).
fn encode_ns_size_list(segments: &[&str]) -> String {
    let mut out = String::new();
    for seg in segments {
        out.push_str(&seg.len().to_string());
        out.push_str(seg);
    }
    out
}

fn encode_type(module: &IrModule, id: IrId) -> String {
    match module.get(id) {
        crate::node::IrNode::Expr(_) => {
            // A type-position `IrId` should never resolve to an expression;
            // this is defensive against a caller passing the wrong id and
            // intentionally renders something unambiguous instead of
            // panicking the mangler.
            "v".to_string()
        }
        crate::node::IrNode::Type(ty) => match ty {
            IrType::Primitive(p) => primitive_code(*p).to_string(),
            IrType::Pointer { pointee, .. } => format!("P{}", encode_type(module, *pointee)),
            IrType::Const(inner) => encode_type(module, *inner),
            IrType::Opaque(sym) => {
                let name = module.resolve(*sym);
                let segments: Vec<&str> = name.split("::").collect();
                format!("N{}E", encode_ns_size_list(&segments))
            }
            IrType::Struct(fields) => {
                let body: String = fields.iter().map(|f| encode_type(module, *f)).collect();
                format!("c{body}E")
            }
            IrType::Union(fields) => {
                let body: String = fields.iter().map(|f| encode_type(module, *f)).collect();
                format!("u{body}E")
            }
            IrType::Array { element, count } => {
                format!("A{}_{}", count, encode_type(module, *element))
            }
            IrType::Function {
                params,
                return_type,
                variadic,
                ..
            } => {
                let ret = encode_type(module, *return_type);
                let body: String = params.iter().map(|p| encode_type(module, *p)).collect();
                let variadic_marker = if *variadic { "_" } else { "" };
                format!("F{ret}{body}{variadic_marker}E")
            }
        },
    }
}

/// `_Q <ns-size-list> <type-encoding> _0`.
#[must_use]
pub fn mangle_quix(module: &IrModule, qualified_name: &str, type_id: IrId) -> String {
    let segments: Vec<&str> = qualified_name.split("::").collect();
    format!(
        "_Q{}{}_0",
        encode_ns_size_list(&segments),
        encode_type(module, type_id)
    )
}

/// The C ABI is lossy by design: every `:` becomes `_`, and there is no type
/// encoding at all.
#[must_use]
pub fn mangle_c_abi(qualified_name: &str) -> String {
    qualified_name.replace(':', "_")
}

/// Consumes a single `<len><segment>` pair off the front of `s`, returning
/// the segment and the remainder. `None` if `s` doesn't start with a decimal
/// length prefix or is shorter than the length it names — mirrors
/// `demangle_type`'s "fail safely, never index out of bounds" contract.
fn take_ns_segment(s: &str) -> Option<(&str, &str)> {
    let digit_len = s.chars().take_while(|c| c.is_ascii_digit()).count();
    if digit_len == 0 {
        return None;
    }
    let (len_str, rest) = s.split_at(digit_len);
    let len: usize = len_str.parse().ok()?;
    if rest.len() < len {
        return None;
    }
    Some(rest.split_at(len))
}

fn demangle_ns_list(mut s: &str) -> Option<(Vec<String>, &str)> {
    let mut segments = Vec::new();
    while let Some((seg, rest)) = take_ns_segment(s) {
        segments.push(seg.to_string());
        s = rest;
        // A namespace list in this grammar is immediately followed either by
        // more digits (another segment) or by the type-encoding / `E`
        // terminator; stop as soon as the next char isn't a digit.
        if !s.starts_with(|c: char| c.is_ascii_digit()) {
            break;
        }
    }
    if segments.is_empty() {
        None
    } else {
        Some((segments, s))
    }
}

fn demangle_type(s: &str) -> Option<(serde_json::Value, &str)> {
    if s.is_empty() {
        return None;
    }
    let (tag, rest) = s.split_at(1);
    match tag {
        "b" => Some((json!("u1"), rest)),
        "h" => Some((json!("u8"), rest)),
        "t" => Some((json!("u16"), rest)),
        "j" => Some((json!("u32"), rest)),
        "m" => Some((json!("u64"), rest)),
        "o" => Some((json!("u128"), rest)),
        "a" => Some((json!("i8"), rest)),
        "s" => Some((json!("i16"), rest)),
        "i" => Some((json!("i32"), rest)),
        "l" => Some((json!("i64"), rest)),
        "n" => Some((json!("i128"), rest)),
        "v" => Some((json!("void"), rest)),
        "D" => {
            if rest.is_empty() {
                return None;
            }
            let (sub, rest2) = rest.split_at(1);
            let name = match sub {
                "h" => "f16",
                "f" => "f32",
                "d" => "f64",
                "e" => "f128",
                _ => return None,
            };
            Some((json!(name), rest2))
        }
        "P" => {
            let (inner, rest2) = demangle_type(rest)?;
            Some((json!({ "pointer": inner }), rest2))
        }
        "N" => {
            let (segments, rest2) = demangle_ns_list(rest)?;
            let rest3 = rest2.strip_prefix('E')?;
            Some((json!({ "opaque": segments.join("::") }), rest3))
        }
        "c" | "u" => {
            let mut fields = Vec::new();
            let mut cursor = rest;
            while !cursor.starts_with('E') {
                let (field, next) = demangle_type(cursor)?;
                fields.push(field);
                cursor = next;
            }
            let cursor = cursor.strip_prefix('E')?;
            let key = if tag == "c" { "struct" } else { "union" };
            Some((json!({ key: fields }), cursor))
        }
        "A" => {
            let digit_len = rest.chars().take_while(|c| c.is_ascii_digit()).count();
            if digit_len == 0 {
                return None;
            }
            let (count_str, rest2) = rest.split_at(digit_len);
            let count: u64 = count_str.parse().ok()?;
            let rest3 = rest2.strip_prefix('_')?;
            let (element, rest4) = demangle_type(rest3)?;
            Some((json!({ "array": element, "count": count }), rest4))
        }
        "F" => {
            let (ret, mut cursor) = demangle_type(rest)?;
            let mut params = Vec::new();
            let mut variadic = false;
            loop {
                if let Some(next) = cursor.strip_prefix('E') {
                    cursor = next;
                    break;
                }
                if cursor.starts_with('_') {
                    variadic = true;
                    cursor = &cursor[1..];
                    continue;
                }
                let (param, next) = demangle_type(cursor)?;
                params.push(param);
                cursor = next;
            }
            Some((
                json!({ "function": { "return": ret, "params": params, "variadic": variadic } }),
                cursor,
            ))
        }
        _ => None,
    }
}

/// Demangles a `_Q`-prefixed name into `{"name": ..., "type": ...}`.
/// Returns `None` on malformed input rather than panicking (§4.4.7).
#[must_use]
pub fn demangle_quix(mangled: &str) -> Option<serde_json::Value> {
    let body = mangled.strip_prefix("_Q")?;
    let (segments, rest) = demangle_ns_list(body)?;
    let (ty, rest) = demangle_type(rest)?;
    let rest = rest.strip_prefix("_0")?;
    if !rest.is_empty() {
        return None;
    }
    Some(json!({ "name": segments.join("::"), "type": ty }))
}

/// The C ABI is the identity function when demangled: it's lossy by design
/// and there is nothing to recover.
#[must_use]
pub fn demangle_c_abi(mangled: &str) -> String {
    mangled.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::ModuleIndex;

    #[test]
    fn mangles_a_struct_of_primitives() {
        let mut module = IrModule::new(ModuleIndex(0));
        let u8_ty = module.create_type(IrType::Primitive(PrimitiveKind::U8), None);
        let u32_ty = module.create_type(IrType::Primitive(PrimitiveKind::U32), None);
        let st = module.create_type(IrType::Struct(vec![u8_ty, u32_ty]), None);
        let mangled = mangle_quix(&module, "x::y::zzz", st);
        assert_eq!(mangled, "_Q1x1y3zzzchjE_0");
    }

    #[test]
    fn roundtrips_through_demangle() {
        let mut module = IrModule::new(ModuleIndex(0));
        let u32_ty = module.create_type(IrType::Primitive(PrimitiveKind::U32), None);
        let ptr = module.create_type(IrType::Pointer { pointee: u32_ty, width: 64 }, None);
        let mangled = mangle_quix(&module, "outer::inner", ptr);
        let demangled = demangle_quix(&mangled).expect("should demangle");
        assert_eq!(demangled["name"], json!("outer::inner"));
        assert_eq!(demangled["type"], json!({ "pointer": "u32" }));
    }

    #[test]
    fn demangle_rejects_malformed_input() {
        assert!(demangle_quix("_Qnotvalid").is_none());
        assert!(demangle_quix("_Q1xP").is_none());
    }

    #[test]
    fn c_abi_replaces_colons() {
        assert_eq!(mangle_c_abi("a::b::c"), "a__b__c");
        assert_eq!(demangle_c_abi("a__b__c"), "a__b__c");
    }
}
