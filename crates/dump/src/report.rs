//! JSON summary of a completed dump scan
//!
//! Companion artifact to the generated header, convenient for scripting
//! against the discovered types without re-parsing the dump.

use crate::symbols::TypeArena;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;
use structgen_core::{Error, HeaderVersion, Result, TypeKind};

/// Serializable summary of one generator run.
#[derive(Debug, Serialize)]
pub struct DumpReport {
    pub generated_at: DateTime<Utc>,
    pub header_version: HeaderVersion,
    pub total_types: usize,
    pub classes: usize,
    pub structs: usize,
    pub enums: usize,
    pub instance_fields: usize,
    pub static_fields: usize,
    pub types: Vec<TypeEntry>,
}

/// Per-type entry in the report.
#[derive(Debug, Serialize)]
pub struct TypeEntry {
    pub full_name: String,
    pub struct_name: String,
    pub kind: TypeKind,
    pub parent: Option<String>,
    pub instance_fields: usize,
    pub static_fields: usize,
}

impl DumpReport {
    pub fn from_arena(arena: &TypeArena, header_version: HeaderVersion) -> Self {
        let mut classes = 0;
        let mut structs = 0;
        let mut enums = 0;
        let mut instance_fields = 0;
        let mut static_fields = 0;
        let mut types = Vec::with_capacity(arena.len());

        for (_, info) in arena.iter() {
            match info.kind {
                TypeKind::Class => classes += 1,
                TypeKind::Struct => structs += 1,
                TypeKind::Enum => enums += 1,
            }
            instance_fields += info.fields.len();
            static_fields += info.static_fields.len();
            types.push(TypeEntry {
                full_name: info.full_name.clone(),
                struct_name: info.struct_name.clone(),
                kind: info.kind,
                parent: info.parent.clone(),
                instance_fields: info.fields.len(),
                static_fields: info.static_fields.len(),
            });
        }

        Self {
            generated_at: Utc::now(),
            header_version,
            total_types: arena.len(),
            classes,
            structs,
            enums,
            instance_fields,
            static_fields,
            types,
        }
    }

    /// Write to a pretty-printed JSON file
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| Error::Custom(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::scan;

    #[test]
    fn test_report_counts() {
        let scan = scan(
            "class Player\n{\n\t[FieldOffset(0x10)]\n\tpublic int hp;\n\t[FieldOffset(0x0)]\n\tpublic static int total;\n}\nstruct Vec3\n{\n}\nenum Rarity : byte\n{\n}\n",
        );
        let report = DumpReport::from_arena(&scan.arena, HeaderVersion::V27);
        assert_eq!(report.total_types, 3);
        assert_eq!(report.classes, 1);
        assert_eq!(report.structs, 1);
        assert_eq!(report.enums, 1);
        assert_eq!(report.instance_fields, 1);
        assert_eq!(report.static_fields, 1);
        assert_eq!(report.types[0].full_name, "Player");
    }

    #[test]
    fn test_write_to_file_surfaces_io_failure() {
        let scan = scan("class C\n{\n}\n");
        let report = DumpReport::from_arena(&scan.arena, HeaderVersion::V29);
        let err = report
            .write_to_file(Path::new("/nonexistent-dir/report.json"))
            .unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_report_serializes() {
        let scan = scan("class C\n{\n}\n");
        let report = DumpReport::from_arena(&scan.arena, HeaderVersion::V29);
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"header_version\":\"29\""));
        assert!(json.contains("\"kind\":\"class\""));
    }
}
