use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use structgen_core::{Config, HeaderVersion};
use structgen_dump::DumpReport;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Regenerate an il2cpp.h header from an Il2CppDumper dump.cs.
#[derive(Parser, Debug)]
#[command(name = "structgen", version, about)]
struct Cli {
    /// Path to the dump.cs to scan
    #[arg(default_value = "dump.cs")]
    dump: PathBuf,

    /// Where to write the generated header
    #[arg(short, long, default_value = "il2cpp.h")]
    output: PathBuf,

    /// Metadata version of the dumped binary (22, 24, 24.1, 24.2, 27, 29)
    #[arg(short = 'v', long)]
    header_version: Option<HeaderVersion>,

    /// Also write a JSON summary of the discovered types
    #[arg(short, long)]
    report: Option<PathBuf>,

    /// Optional JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => Config::default(),
    };
    let version = cli.header_version.unwrap_or(config.default_header_version);

    info!("scanning {}", cli.dump.display());
    let mut scan = structgen_dump::scan_file(&cli.dump)?;
    let header = structgen_dump::generate_from_scan(&mut scan, version, &config)?;

    if let Some(report_path) = &cli.report {
        let report = DumpReport::from_arena(&scan.arena, version);
        report
            .write_to_file(report_path)
            .with_context(|| format!("failed to write report to {}", report_path.display()))?;
        info!("wrote report to {}", report_path.display());
    }

    std::fs::write(&cli.output, &header)
        .with_context(|| format!("failed to write {}", cli.output.display()))?;
    info!(
        "generated {} ({} lines, version {version})",
        cli.output.display(),
        header.lines().count()
    );

    Ok(())
}
