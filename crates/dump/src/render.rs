//! Dependency-ordered structure-group renderer
//!
//! Walks the arena in discovery order and emits one structure group per
//! recoverable type, recursing into the parent and every embedded
//! value-type dependency first so that every name is declared before use.

use crate::headers;
use crate::symbols::{AliasMap, TypeArena};
use std::collections::HashSet;
use structgen_core::{Config, HeaderVersion, TypeIndex, TypeInfo};
use tracing::debug;

/// Render the complete header artifact: runtime preamble, version
/// descriptor block, then every structure group in first-emission order.
pub fn render_header(
    arena: &TypeArena,
    aliases: &AliasMap,
    version: HeaderVersion,
    config: &Config,
) -> String {
    let mut renderer = Renderer {
        arena,
        aliases,
        vtable_slots: config.vtable_slots,
        emitted: HashSet::new(),
        chunks: Vec::new(),
    };
    for idx in arena.indices() {
        renderer.emit(idx);
    }
    debug!(
        "rendered {} structure groups for {} types",
        renderer.chunks.len(),
        arena.len()
    );

    let body: usize = renderer.chunks.iter().map(String::len).sum();
    let mut out = String::with_capacity(headers::RUNTIME_PREAMBLE.len() + body + 4096);
    out.push_str(headers::RUNTIME_PREAMBLE);
    out.push_str(headers::preamble(version));
    for chunk in &renderer.chunks {
        out.push_str(chunk);
    }
    out
}

struct Renderer<'a> {
    arena: &'a TypeArena,
    aliases: &'a AliasMap,
    vtable_slots: usize,
    /// Structure names already emitted; keyed by name so duplicate
    /// declarations collapse to one group.
    emitted: HashSet<String>,
    chunks: Vec<String>,
}

impl Renderer<'_> {
    fn emit(&mut self, idx: TypeIndex) {
        let info = self.arena.get(idx);
        if info.is_enum() {
            return;
        }
        if self.emitted.contains(&info.struct_name) {
            return;
        }
        // Marked before recursing so a cyclic parent chain in a malformed
        // dump terminates instead of overflowing the stack.
        self.emitted.insert(info.struct_name.clone());

        if let Some(parent) = info.parent.as_deref() {
            if let Some(parent_idx) = self.aliases.resolve(parent) {
                self.emit(parent_idx);
            }
        }
        for field in info.fields.iter().chain(info.static_fields.iter()) {
            if let Some(dep) = field.depends {
                self.emit(dep);
            }
        }

        let chunk = self.render_group(info);
        if !chunk.is_empty() {
            self.chunks.push(chunk);
        }
    }

    fn render_group(&self, info: &TypeInfo) -> String {
        // Nothing recoverable, nothing emitted.
        if !info.has_fields() {
            return String::new();
        }

        let parent_struct = info
            .parent
            .as_deref()
            .and_then(|p| self.aliases.resolve(p))
            .map(|pidx| self.arena.get(pidx))
            .filter(|p| !p.is_enum() && p.struct_name != info.struct_name)
            .map(|p| p.struct_name.clone());

        let name = &info.struct_name;
        let mut out = String::new();

        match &parent_struct {
            Some(parent) => out.push_str(&format!("struct {name}_Fields : {parent}_Fields\n{{\n")),
            None => out.push_str(&format!("struct {name}_Fields\n{{\n")),
        }
        for field in &info.fields {
            if let Some(native) = &field.native_type {
                out.push_str(&format!("\t{native} {};\n", field.name));
            }
        }
        out.push_str("};\n\n");

        out.push_str(&format!("struct {name}_c\n{{\n"));
        out.push_str("\tIl2CppClass_1 _1;\n");
        if info.static_fields.is_empty() {
            out.push_str("\tvoid* static_fields;\n");
        } else {
            out.push_str(&format!("\t{name}_StaticFields* static_fields;\n"));
        }
        out.push_str("\tIl2CppRGCTXData* rgctx_data;\n");
        out.push_str("\tIl2CppClass_2 _2;\n");
        out.push_str(&format!("\tVirtualInvokeData vtable[{}];\n", self.vtable_slots));
        out.push_str("};\n\n");

        out.push_str(&format!("struct {name}_o\n{{\n"));
        if !info.is_value_type() {
            out.push_str(&format!("\t{name}_c *klass;\n"));
            out.push_str("\tvoid *monitor;\n");
        }
        out.push_str(&format!("\t{name}_Fields fields;\n"));
        out.push_str("};\n\n");

        if !info.static_fields.is_empty() {
            out.push_str(&format!("struct {name}_StaticFields\n{{\n"));
            for field in &info.static_fields {
                if let Some(native) = &field.native_type {
                    out.push_str(&format!("\t{native} {};\n", field.name));
                }
            }
            out.push_str("};\n\n");
        }

        out
    }
}
