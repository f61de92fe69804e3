use anyhow::{Context, Result};
use clap::Parser;
use kernel_sweep::cli::{Cli, OutputFormat};
use kernel_sweep::comparison::kernel_width_pairs;
use kernel_sweep::config::AggregationConfig;
use kernel_sweep::pipeline::run_pass;
use kernel_sweep::report::{build_workbook, CsvExporter, JsonExporter, WorkbookExporter};
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber; `--debug` raises the default level to trace
fn init_tracing(debug: bool) {
    let level = if debug {
        tracing::Level::TRACE
    } else {
        tracing::Level::INFO
    };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(args: &Cli) -> Result<AggregationConfig> {
    let mut config = match &args.config {
        Some(path) => AggregationConfig::from_file(path)?,
        None => AggregationConfig::default(),
    };
    if let Some(max_runs) = args.max_runs {
        config.max_runs = max_runs;
    }
    config.validate()?;
    Ok(config)
}

fn exporters(format: OutputFormat) -> Vec<Box<dyn WorkbookExporter>> {
    match format {
        OutputFormat::Csv => vec![Box::new(CsvExporter::new())],
        OutputFormat::Json => vec![Box::new(JsonExporter::new())],
        OutputFormat::Both => vec![Box::new(CsvExporter::new()), Box::new(JsonExporter::new())],
    }
}

fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(args.debug);

    let config = load_config(&args)?;
    if !args.root.is_dir() {
        anyhow::bail!("Results root {} is not a directory", args.root.display());
    }

    let outcome = run_pass(&args.root, &config)
        .with_context(|| format!("Aggregation failed for {}", args.root.display()))?;
    if !outcome.skipped.is_empty() {
        tracing::warn!("{} run-group(s) skipped", outcome.skipped.len());
    }

    let pairs = kernel_width_pairs(config.comparison_pairs);
    let workbook = build_workbook(&outcome.results, &outcome.comparisons, &pairs)?;

    let output_dir = args.output_dir();
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Cannot create output directory {}", output_dir.display()))?;
    for exporter in exporters(args.format) {
        for path in exporter.export(&workbook, output_dir, &config.output_basename)? {
            println!("{}", path.display());
        }
    }

    Ok(())
}
