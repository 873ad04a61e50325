//! dump.cs structure recovery
//!
//! Parses the pseudo-C# dump produced by Il2CppDumper and regenerates an
//! `il2cpp.h` header of native structure declarations, so that reversing
//! sessions in IDA/Ghidra/Binary Ninja keep typed field information even
//! when only `dump.cs` is available. The recovery is best-effort by
//! design: only `[FieldOffset]`-annotated fields are considered, arrays
//! degrade to an opaque array header, and unknown references degrade to
//! opaque object pointers.

pub mod headers;
pub mod naming;
pub mod render;
pub mod report;
pub mod resolve;
pub mod scanner;
pub mod symbols;

pub use report::DumpReport;
pub use scanner::{scan, Scan};

use std::path::Path;
use structgen_core::{Config, Error, HeaderVersion, Result};

/// Scan a dump file from disk.
pub fn scan_file(path: &Path) -> Result<Scan> {
    if !path.exists() {
        return Err(Error::not_found(format!(
            "dump file not found: {}",
            path.display()
        )));
    }
    let text = std::fs::read_to_string(path)?;
    Ok(scanner::scan(&text))
}

/// Run the full pipeline over dump text and return the header artifact.
pub fn generate(text: &str, version: HeaderVersion, config: &Config) -> Result<String> {
    let mut scan = scanner::scan(text);
    generate_from_scan(&mut scan, version, config)
}

/// Resolve and render an existing scan. Fails when the scan discovered no
/// types at all, since a zero-type header is never useful output.
pub fn generate_from_scan(scan: &mut Scan, version: HeaderVersion, config: &Config) -> Result<String> {
    if scan.arena.is_empty() {
        return Err(Error::invalid_format(
            "no type declarations found; is this a dump.cs?",
        ));
    }
    resolve::resolve_all(&mut scan.arena, &scan.aliases);
    Ok(render::render_header(
        &scan.arena,
        &scan.aliases,
        version,
        config,
    ))
}
