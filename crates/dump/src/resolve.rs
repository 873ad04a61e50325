//! Declared-type to native-type resolution
//!
//! Resolution is total: every declared-type string, including malformed or
//! unknown ones, maps to a usable native expression. Precision loss is
//! accepted silently; an unresolvable reference degrades to an opaque
//! object pointer and any array degrades to the boxed array header.

use crate::symbols::{AliasMap, TypeArena};
use structgen_core::{TypeIndex, TypeKind};
use tracing::trace;

/// Conservative fallback for anything the dump does not describe.
pub const OPAQUE_OBJECT: &str = "Il2CppObject*";
/// Coarse stand-in for every array, element metadata is not recoverable
/// from the dump alone.
pub const OPAQUE_ARRAY: &str = "Il2CppArray*";

/// Map a C# primitive spelling to its native counterpart.
fn primitive(name: &str) -> Option<&'static str> {
    let mapped = match name {
        "bool" | "Boolean" | "System.Boolean" => "bool",
        "byte" | "Byte" | "System.Byte" => "uint8_t",
        "sbyte" | "SByte" | "System.SByte" => "int8_t",
        "short" | "Int16" | "System.Int16" => "int16_t",
        "ushort" | "UInt16" | "System.UInt16" => "uint16_t",
        "char" | "Char" | "System.Char" => "uint16_t",
        "int" | "Int32" | "System.Int32" => "int32_t",
        "uint" | "UInt32" | "System.UInt32" => "uint32_t",
        "long" | "Int64" | "System.Int64" => "int64_t",
        "ulong" | "UInt64" | "System.UInt64" => "uint64_t",
        "float" | "Single" | "System.Single" => "float",
        "double" | "Double" | "System.Double" => "double",
        "string" | "String" | "System.String" => "System_String_o*",
        "void" => "void",
        "IntPtr" | "System.IntPtr" => "intptr_t",
        "UIntPtr" | "System.UIntPtr" => "uintptr_t",
        "object" | "Object" | "System.Object" => "Il2CppObject*",
        _ => return None,
    };
    Some(mapped)
}

/// Resolve one declared-type string against the discovered types.
///
/// Returns the native expression and, when the reference lands on a struct
/// embedded by value, the arena key of that struct so the renderer can
/// emit it first.
pub fn resolve_type(
    declared: &str,
    arena: &TypeArena,
    aliases: &AliasMap,
) -> (String, Option<TypeIndex>) {
    let mut working = declared.trim();

    let mut pointer_suffix = String::new();
    while let Some(stripped) = working.strip_suffix('*') {
        pointer_suffix.push('*');
        working = stripped.trim_end();
    }

    let mut array_count = 0usize;
    while let Some(stripped) = working.strip_suffix("[]") {
        array_count += 1;
        working = stripped.trim_end();
    }

    if let Some(stripped) = working.strip_suffix('?') {
        working = stripped;
    }
    let working = working.replace('?', "");
    let working = working.trim();

    if let Some(native) = primitive(working) {
        if array_count > 0 {
            return (OPAQUE_ARRAY.to_string(), None);
        }
        return (format!("{native}{pointer_suffix}"), None);
    }

    if let Some(idx) = aliases.resolve(working) {
        if array_count > 0 {
            return (OPAQUE_ARRAY.to_string(), None);
        }
        let info = arena.get(idx);
        return match info.kind {
            TypeKind::Enum => {
                let underlying = info
                    .enum_base
                    .as_deref()
                    .and_then(primitive)
                    .unwrap_or("int32_t");
                (format!("{underlying}{pointer_suffix}"), None)
            }
            TypeKind::Struct => (
                format!("{}_o{pointer_suffix}", info.struct_name),
                Some(idx),
            ),
            TypeKind::Class => (format!("{}_o*{pointer_suffix}", info.struct_name), None),
        };
    }

    trace!("unresolved type reference: {declared}");
    if array_count > 0 {
        return (OPAQUE_ARRAY.to_string(), None);
    }
    if working == "IntPtr" || working == "System.IntPtr" {
        return (format!("intptr_t{pointer_suffix}"), None);
    }
    (OPAQUE_OBJECT.to_string(), None)
}

/// Fill in `native_type` and `depends` for every field of every type.
pub fn resolve_all(arena: &mut TypeArena, aliases: &AliasMap) {
    for idx in 0..arena.len() {
        let idx = TypeIndex(idx);
        let resolved: Vec<(String, Option<TypeIndex>)> = {
            let info = arena.get(idx);
            info.fields
                .iter()
                .chain(info.static_fields.iter())
                .map(|f| resolve_type(&f.declared_type, arena, aliases))
                .collect()
        };
        let info = arena.get_mut(idx);
        for (field, (native, depends)) in info
            .fields
            .iter_mut()
            .chain(info.static_fields.iter_mut())
            .zip(resolved)
        {
            field.native_type = Some(native);
            field.depends = depends;
        }
    }
}
