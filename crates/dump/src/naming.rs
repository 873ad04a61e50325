//! Sanitization rules for structure names and field identifiers
//!
//! Both rules are deterministic and idempotent so that re-running the
//! generator on unchanged input reproduces byte-identical output.

/// Derive the emitted structure name from a fully qualified type name.
///
/// Nested-type separators, generic brackets, arity backticks, whitespace
/// and punctuation all fold to single underscores; closing brackets are
/// dropped. The result never starts with an underscore and never contains
/// an underscore run.
pub fn sanitize_struct_name(name: &str) -> String {
    let folded = name
        .replace("::", ".")
        .replace('+', ".")
        .replace('/', ".")
        .replace(" `", "`");

    let mut out = String::with_capacity(folded.len());
    for ch in folded.chars() {
        match ch {
            '>' | ']' => {}
            '`' | '<' | ',' | ' ' | '[' | '-' | ':' | '.' => out.push('_'),
            _ => out.push(ch),
        }
    }

    let collapsed = collapse_underscores(&out);
    match collapsed.strip_prefix('_') {
        Some(rest) => rest.to_string(),
        None => collapsed,
    }
}

/// Turn a declared member name into a valid C identifier.
///
/// Strips the C# verbatim-identifier marker, replaces anything outside
/// `[0-9A-Za-z_]` with an underscore, collapses runs, and guards names
/// starting with a digit. Never returns an empty string.
pub fn sanitize_identifier(name: &str) -> String {
    let mut candidate = name.trim();
    if let Some(rest) = candidate.strip_prefix('@') {
        candidate = rest;
    }

    let mut out = String::with_capacity(candidate.len());
    for ch in candidate.chars() {
        if ch.is_ascii_alphanumeric() || ch == '_' {
            out.push(ch);
        } else {
            out.push('_');
        }
    }

    let mut collapsed = collapse_underscores(&out);
    if collapsed.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        collapsed.insert(0, '_');
    }
    if collapsed.is_empty() {
        "field".to_string()
    } else {
        collapsed
    }
}

/// Canonical spelling used for symbol-table keys.
pub fn normalise_type_name(name: &str) -> String {
    let name = name.trim();
    let name = name.strip_prefix("global::").unwrap_or(name);
    name.replace("::", ".").replace('+', ".")
}

fn collapse_underscores(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut last_underscore = false;
    for ch in s.chars() {
        if ch == '_' {
            if !last_underscore {
                out.push('_');
            }
            last_underscore = true;
        } else {
            out.push(ch);
            last_underscore = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_struct_name_folds_separators() {
        assert_eq!(sanitize_struct_name("Game.Core.Player"), "Game_Core_Player");
        assert_eq!(sanitize_struct_name("Outer+Inner"), "Outer_Inner");
        assert_eq!(sanitize_struct_name("Name::Spaced"), "Name_Spaced");
    }

    #[test]
    fn test_struct_name_generics() {
        assert_eq!(sanitize_struct_name("List`1<T>"), "List_1_T");
        assert_eq!(
            sanitize_struct_name("Dictionary`2<string, int>"),
            "Dictionary_2_string_int"
        );
    }

    #[test]
    fn test_struct_name_no_leading_or_double_underscore() {
        let name = sanitize_struct_name(".Weird..Name");
        assert!(!name.starts_with('_'));
        assert!(!name.contains("__"));
        assert_eq!(name, "Weird_Name");
    }

    #[test]
    fn test_struct_name_idempotent() {
        let once = sanitize_struct_name("A.B`1<C[]>");
        let twice = sanitize_struct_name(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_identifier_verbatim_marker() {
        assert_eq!(sanitize_identifier("@event"), "event");
    }

    #[test]
    fn test_identifier_digit_prefix() {
        assert_eq!(sanitize_identifier("2ndSlot"), "_2ndSlot");
    }

    #[test]
    fn test_identifier_compiler_generated() {
        assert_eq!(sanitize_identifier("<Health>k__BackingField"), "_Health_k_BackingField");
    }

    #[test]
    fn test_identifier_never_empty() {
        assert_eq!(sanitize_identifier(""), "field");
        assert_eq!(sanitize_identifier("   "), "field");
    }

    #[test]
    fn test_identifier_idempotent() {
        let once = sanitize_identifier("<>c__DisplayClass0_0");
        assert_eq!(sanitize_identifier(&once), once);
    }

    #[test]
    fn test_normalise_type_name() {
        assert_eq!(normalise_type_name("global::System.Int32"), "System.Int32");
        assert_eq!(normalise_type_name("Outer+Inner"), "Outer.Inner");
        assert_eq!(normalise_type_name("  Foo::Bar "), "Foo.Bar");
    }
}
