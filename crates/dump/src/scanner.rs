//! Line-oriented dump.cs scanner
//!
//! Reconstructs the nested namespace/type context from brace counts rather
//! than a real grammar. The scanner is intentionally permissive: it only
//! recognizes namespace openers, type openers and `[FieldOffset]`-annotated
//! field declarations, and silently ignores everything else (method bodies,
//! properties, comments, other attributes). Malformed declarations degrade
//! to a skipped field, never to a scan abort.

use crate::naming::{sanitize_identifier, sanitize_struct_name};
use crate::symbols::{AliasMap, TypeArena};
use once_cell::sync::Lazy;
use regex::Regex;
use structgen_core::{Field, TypeIndex, TypeInfo, TypeKind};
use tracing::{debug, info, trace};

/// Modifier tokens stripped from the head of a field declaration.
const MODIFIERS: &[&str] = &[
    "public", "private", "protected", "internal", "static", "readonly", "volatile", "unsafe",
    "const", "new", "sealed", "abstract", "extern", "partial", "fixed",
];

/// Base-type names that never become a parent.
const IGNORED_BASES: &[&str] = &[
    "object",
    "System.Object",
    "Il2CppSystem.Object",
    "ValueType",
    "System.ValueType",
];

static NAMESPACE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^namespace\s+([\w\.]+)\s*(?:\{)?\s*$").unwrap());

static TYPE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:\[[^\]]+\]\s*)*(?:\w+\s+)*(class|struct|enum)\s+([\w`]+(?:<[^>]+>)?)(?:\s*:\s*([^{]+))?\s*(?:\{)?\s*$",
    )
    .unwrap()
});

static FIELD_OFFSET_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[\s*FieldOffset\s*\(").unwrap());

/// Everything the scanner discovered in one pass over the dump text.
#[derive(Debug, Default)]
pub struct Scan {
    pub arena: TypeArena,
    pub aliases: AliasMap,
}

/// Scan dump text into a type arena and alias map. Never fails; an input
/// with nothing recognizable simply produces an empty arena.
pub fn scan(text: &str) -> Scan {
    let mut scanner = Scanner::default();
    for line in text.lines() {
        scanner.step(line);
    }
    info!(
        "scan complete: {} types, {} aliases",
        scanner.arena.len(),
        scanner.aliases.len()
    );
    Scan {
        arena: scanner.arena,
        aliases: scanner.aliases,
    }
}

enum ContextKind {
    Namespace,
    Type(TypeIndex),
}

/// One open namespace or type body on the scanner's scope stack.
///
/// `pop_depth` is the brace depth below which the frame closes; `entered`
/// is set once the opening brace has actually been observed, which guards
/// against declarations whose brace sits on the following line.
struct Context {
    kind: ContextKind,
    name: String,
    pop_depth: i32,
    entered: bool,
}

#[derive(Default)]
struct Scanner {
    depth: i32,
    contexts: Vec<Context>,
    pending_field: bool,
    current: Option<TypeIndex>,
    arena: TypeArena,
    aliases: AliasMap,
}

impl Scanner {
    fn step(&mut self, raw: &str) {
        let line = raw.trim_end();
        let stripped = line.trim_start();
        let opens = line.matches('{').count() as i32;
        let closes = line.matches('}').count() as i32;
        let new_depth = self.depth + opens - closes;

        if let Some(caps) = NAMESPACE_RE.captures(stripped) {
            let name = caps[1].to_string();
            trace!("namespace {name} at depth {}", self.depth);
            self.contexts.push(Context {
                kind: ContextKind::Namespace,
                name,
                pop_depth: if opens > 0 { new_depth } else { self.depth + 1 },
                entered: opens > 0,
            });
        } else if let Some(caps) = TYPE_RE.captures(stripped) {
            self.open_type(&caps, opens, new_depth);
        } else if FIELD_OFFSET_RE.is_match(stripped) {
            self.pending_field = true;
        } else if self.pending_field
            && self.current.is_some()
            && !stripped.is_empty()
            && !stripped.starts_with('[')
        {
            self.take_field(stripped);
        }

        self.depth = new_depth;
        for ctx in &mut self.contexts {
            if !ctx.entered && self.depth >= ctx.pop_depth {
                ctx.entered = true;
            }
        }
        while self
            .contexts
            .last()
            .is_some_and(|c| c.entered && self.depth < c.pop_depth)
        {
            let Some(popped) = self.contexts.pop() else { break };
            if matches!(popped.kind, ContextKind::Type(_)) {
                self.current = self.contexts.iter().rev().find_map(|c| {
                    if !c.entered {
                        return None;
                    }
                    match c.kind {
                        ContextKind::Type(idx) => Some(idx),
                        ContextKind::Namespace => None,
                    }
                });
            }
        }
    }

    fn open_type(&mut self, caps: &regex::Captures<'_>, opens: i32, new_depth: i32) {
        let kind = match &caps[1] {
            "struct" => TypeKind::Struct,
            "enum" => TypeKind::Enum,
            _ => TypeKind::Class,
        };
        let short_name = caps[2].to_string();

        let mut parent = None;
        let mut enum_base = None;
        if let Some(bases) = caps.get(3) {
            let candidates: Vec<&str> = bases
                .as_str()
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .collect();
            if kind == TypeKind::Enum {
                enum_base = candidates.first().map(|s| (*s).to_string());
            } else {
                parent = candidates
                    .iter()
                    .find(|c| !IGNORED_BASES.contains(c))
                    .map(|s| (*s).to_string());
            }
        }

        // Qualified name: all open namespaces, then all open types, then us.
        let mut parts: Vec<&str> = self
            .contexts
            .iter()
            .filter(|c| matches!(c.kind, ContextKind::Namespace))
            .map(|c| c.name.as_str())
            .collect();
        parts.extend(
            self.contexts
                .iter()
                .filter(|c| matches!(c.kind, ContextKind::Type(_)))
                .map(|c| c.name.as_str()),
        );
        parts.push(&short_name);
        let full_name = parts.join(".");
        let struct_name = sanitize_struct_name(&full_name);
        debug!("discovered {kind:?} {full_name}");

        let info = TypeInfo {
            full_name: full_name.clone(),
            short_name: short_name.clone(),
            struct_name,
            kind,
            parent,
            enum_base,
            fields: Vec::new(),
            static_fields: Vec::new(),
        };
        let idx = self.arena.push(info);
        self.aliases.add(&full_name, idx);
        self.aliases.add(&short_name, idx);

        self.contexts.push(Context {
            kind: ContextKind::Type(idx),
            name: short_name,
            pop_depth: if opens > 0 { new_depth } else { self.depth + 1 },
            entered: opens > 0,
        });
        self.current = Some(idx);
        self.pending_field = false;
    }

    fn take_field(&mut self, stripped: &str) {
        self.pending_field = false;
        let Some(idx) = self.current else { return };
        let Some((declared_type, raw_name)) = split_declaration(stripped) else {
            trace!("skipping unsplittable declaration: {stripped}");
            return;
        };
        let is_static = format!(" {stripped} ").contains(" static ");
        let field = Field::new(sanitize_identifier(&raw_name), declared_type, is_static);
        let owner = self.arena.get_mut(idx);
        if is_static {
            owner.static_fields.push(field);
        } else {
            owner.fields.push(field);
        }
    }
}

/// Split a field declaration into declared-type and name fragments.
///
/// Whitespace inside angle or square brackets never splits, so generic and
/// array types survive intact. Returns `None` for anything that cannot be
/// split, such as the tail of a multi-line declaration.
fn split_declaration(declaration: &str) -> Option<(String, String)> {
    let mut decl = declaration.trim().to_string();
    if let Some(pos) = decl.find("//") {
        decl.truncate(pos);
    }
    let trimmed = decl.trim_end().trim_end_matches(';').trim_end();

    let remaining = strip_modifiers(trimmed);
    if remaining.is_empty() {
        return None;
    }

    let mut depth = 0usize;
    let mut split_at = None;
    for (i, ch) in remaining.char_indices() {
        match ch {
            '<' | '[' => depth += 1,
            '>' | ']' => depth = depth.saturating_sub(1),
            c if c.is_whitespace() && depth == 0 => {
                split_at = Some(i);
                break;
            }
            _ => {}
        }
    }
    let split_at = split_at?;

    let declared_type = remaining[..split_at].to_string();
    let rest = remaining[split_at..].trim();
    let name = rest.split('=').next().unwrap_or(rest).trim().to_string();
    Some((declared_type, name))
}

fn strip_modifiers(declaration: &str) -> &str {
    let mut remaining = declaration.trim();
    loop {
        let mut parts = remaining.splitn(2, char::is_whitespace);
        let first = parts.next().unwrap_or("");
        if !MODIFIERS.contains(&first) {
            return remaining;
        }
        match parts.next() {
            Some(rest) => remaining = rest.trim_start(),
            None => return "",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan_lines(lines: &[&str]) -> Scan {
        scan(&lines.join("\n"))
    }

    #[test]
    fn test_namespace_and_class_discovery() {
        let scan = scan_lines(&[
            "namespace Game.Core",
            "{",
            "\tpublic class Player : MonoBehaviour",
            "\t{",
            "\t\t[FieldOffset(Offset = \"0x10\")]",
            "\t\tpublic int health;",
            "\t}",
            "}",
        ]);
        assert_eq!(scan.arena.len(), 1);
        let player = scan.arena.get(TypeIndex(0));
        assert_eq!(player.full_name, "Game.Core.Player");
        assert_eq!(player.short_name, "Player");
        assert_eq!(player.struct_name, "Game_Core_Player");
        assert_eq!(player.parent.as_deref(), Some("MonoBehaviour"));
        assert_eq!(player.fields.len(), 1);
        assert_eq!(player.fields[0].name, "health");
        assert_eq!(player.fields[0].declared_type, "int");
    }

    #[test]
    fn test_brace_on_same_line() {
        let scan = scan_lines(&[
            "namespace A {",
            "\tclass Foo {",
            "\t\t[FieldOffset(0x8)]",
            "\t\tpublic bool ready;",
            "\t}",
            "}",
            "class Bar {",
            "}",
        ]);
        assert_eq!(scan.arena.len(), 2);
        assert_eq!(scan.arena.get(TypeIndex(0)).full_name, "A.Foo");
        assert_eq!(scan.arena.get(TypeIndex(1)).full_name, "Bar");
        assert_eq!(scan.arena.get(TypeIndex(0)).fields.len(), 1);
    }

    #[test]
    fn test_single_line_type_body_is_ignored() {
        // A declaration with its whole body on one line never appears in
        // real dumps; the opener pattern rejects it and scanning continues
        // cleanly on the next declaration.
        let scan = scan_lines(&[
            "class Foo { }",
            "class Bar",
            "{",
            "\t[FieldOffset(0x10)]",
            "\tpublic int x;",
            "}",
        ]);
        assert_eq!(scan.arena.len(), 1);
        let bar = scan.arena.get(TypeIndex(0));
        assert_eq!(bar.full_name, "Bar");
        assert_eq!(bar.fields.len(), 1);
        assert_eq!(bar.fields[0].name, "x");
    }

    #[test]
    fn test_nested_type_full_name() {
        let scan = scan_lines(&[
            "namespace Game",
            "{",
            "\tclass Outer",
            "\t{",
            "\t\tclass Inner",
            "\t\t{",
            "\t\t\t[FieldOffset(0x10)]",
            "\t\t\tpublic float value;",
            "\t\t}",
            "\t\t[FieldOffset(0x18)]",
            "\t\tpublic int after;",
            "\t}",
            "}",
        ]);
        assert_eq!(scan.arena.len(), 2);
        let inner = scan.arena.get(TypeIndex(1));
        assert_eq!(inner.full_name, "Game.Outer.Inner");
        assert_eq!(inner.fields[0].name, "value");
        // The field after the nested body lands on the outer type again.
        let outer = scan.arena.get(TypeIndex(0));
        assert_eq!(outer.fields.len(), 1);
        assert_eq!(outer.fields[0].name, "after");
    }

    #[test]
    fn test_enum_base_recorded() {
        let scan = scan_lines(&[
            "public enum Rarity : byte",
            "{",
            "\tCommon,",
            "\tRare,",
            "}",
        ]);
        let rarity = scan.arena.get(TypeIndex(0));
        assert_eq!(rarity.kind, TypeKind::Enum);
        assert_eq!(rarity.enum_base.as_deref(), Some("byte"));
    }

    #[test]
    fn test_object_root_is_not_a_parent() {
        let scan = scan_lines(&[
            "class Config : System.Object, IDisposable",
            "{",
            "}",
        ]);
        // System.Object is ignored; the first remaining base wins.
        assert_eq!(
            scan.arena.get(TypeIndex(0)).parent.as_deref(),
            Some("IDisposable")
        );
    }

    #[test]
    fn test_static_fields_are_separated() {
        let scan = scan_lines(&[
            "class Counters",
            "{",
            "\t[FieldOffset(0x0)]",
            "\tpublic static int total;",
            "\t[FieldOffset(0x10)]",
            "\tpublic int mine;",
            "}",
        ]);
        let counters = scan.arena.get(TypeIndex(0));
        assert_eq!(counters.static_fields.len(), 1);
        assert_eq!(counters.static_fields[0].name, "total");
        assert_eq!(counters.fields.len(), 1);
        assert_eq!(counters.fields[0].name, "mine");
    }

    #[test]
    fn test_methods_and_properties_ignored() {
        let scan = scan_lines(&[
            "class Player",
            "{",
            "\tpublic int Health { get; set; }",
            "\tpublic void Update() { }",
            "\t[FieldOffset(0x10)]",
            "\tpublic int hp;",
            "}",
        ]);
        let player = scan.arena.get(TypeIndex(0));
        assert_eq!(player.fields.len(), 1);
        assert_eq!(player.fields[0].name, "hp");
    }

    #[test]
    fn test_unannotated_declaration_is_not_a_field() {
        let scan = scan_lines(&[
            "class Player",
            "{",
            "\tpublic int notAnnotated;",
            "}",
        ]);
        assert!(scan.arena.get(TypeIndex(0)).fields.is_empty());
    }

    #[test]
    fn test_multi_line_declaration_is_dropped() {
        // The declared type alone has no split point, so the pending field
        // is discarded instead of guessed at.
        let scan = scan_lines(&[
            "class Holder",
            "{",
            "\t[FieldOffset(0x10)]",
            "\tDictionary<string,",
            "\t\tint> lookup;",
            "\t[FieldOffset(0x20)]",
            "\tpublic int next;",
            "}",
        ]);
        let holder = scan.arena.get(TypeIndex(0));
        assert_eq!(holder.fields.len(), 1);
        assert_eq!(holder.fields[0].name, "next");
    }

    #[test]
    fn test_declaration_with_default_and_comment() {
        let scan = scan_lines(&[
            "class Player",
            "{",
            "\t[FieldOffset(0x10)]",
            "\tpublic int hp = 100; // 0x10",
            "}",
        ]);
        let field = &scan.arena.get(TypeIndex(0)).fields[0];
        assert_eq!(field.name, "hp");
        assert_eq!(field.declared_type, "int");
    }

    #[test]
    fn test_generic_field_type_survives_split() {
        let scan = scan_lines(&[
            "class Inventory",
            "{",
            "\t[FieldOffset(0x10)]",
            "\tprivate Dictionary<int, string> names;",
            "}",
        ]);
        let field = &scan.arena.get(TypeIndex(0)).fields[0];
        assert_eq!(field.declared_type, "Dictionary<int, string>");
        assert_eq!(field.name, "names");
    }

    #[test]
    fn test_verbatim_identifier() {
        let scan = scan_lines(&[
            "class Events",
            "{",
            "\t[FieldOffset(0x10)]",
            "\tpublic int @event;",
            "}",
        ]);
        assert_eq!(scan.arena.get(TypeIndex(0)).fields[0].name, "event");
    }

    #[test]
    fn test_duplicate_short_names_are_ambiguous() {
        let scan = scan_lines(&[
            "namespace A", "{", "\tclass Item", "\t{", "\t}", "}",
            "namespace B", "{", "\tclass Item", "\t{", "\t}", "}",
        ]);
        assert_eq!(scan.arena.len(), 2);
        assert!(scan.aliases.resolve("A.Item").is_some());
        assert!(scan.aliases.resolve("B.Item").is_some());
        assert_eq!(scan.aliases.resolve("Item"), None);
    }

    #[test]
    fn test_empty_input_yields_empty_arena() {
        let scan = scan("");
        assert!(scan.arena.is_empty());
        let scan = scan_lines(&["// just a comment", "int x = 3;"]);
        assert!(scan.arena.is_empty());
    }

    #[test]
    fn test_split_declaration_edges() {
        assert_eq!(
            split_declaration("public static string name = \"x\";"),
            Some(("string".to_string(), "name".to_string()))
        );
        assert_eq!(
            split_declaration("private List<int[]> buckets;"),
            Some(("List<int[]>".to_string(), "buckets".to_string()))
        );
        assert_eq!(split_declaration("lonely"), None);
        assert_eq!(split_declaration("public"), None);
    }
}
