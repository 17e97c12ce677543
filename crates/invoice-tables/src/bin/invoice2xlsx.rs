use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::str::FromStr;

use anyhow::{Context, Result, anyhow};
use clap::{Args, Parser, Subcommand, ValueEnum};
use invoice_tables::{
    CombinedDataset, DOWNLOAD_FILENAME, ExtractOptions, Extraction, PageSelection,
    extract_pdf_file, write_csv, write_spreadsheet,
};
use tracing_subscriber::EnvFilter;

const PREVIEW_CELL_WIDTH: usize = 18;

#[derive(Debug, Parser)]
#[command(
    name = "invoice2xlsx",
    version,
    about = "Extract every table of a PDF invoice into one spreadsheet"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Extract tables, print the page log and write the combined table.
    Extract(ExtractArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Xlsx,
    Csv,
}

#[derive(Debug, Args)]
struct ExtractArgs {
    /// Input PDF path.
    #[arg(short, long)]
    input: PathBuf,

    /// Output path. Defaults to combined_invoice_table.xlsx next to the input.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output file format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Xlsx)]
    format: OutputFormat,

    /// Page selection like 1-3,5.
    #[arg(long)]
    pages: Option<String>,

    /// Minimum cells required per candidate table row.
    #[arg(long, default_value_t = 2)]
    min_cols: usize,

    /// Number of combined rows to preview on stdout.
    #[arg(long, default_value_t = 10)]
    preview: usize,

    /// Print the per-table summary counts.
    #[arg(short, long)]
    verbose: bool,
}

fn parse_options(args: &ExtractArgs) -> Result<ExtractOptions> {
    let pages = args
        .pages
        .as_deref()
        .map(PageSelection::from_str)
        .transpose()
        .map_err(|error| anyhow!("invalid page selection: {error}"))
        .context("failed to parse --pages")?;

    Ok(ExtractOptions {
        pages,
        min_cols: args.min_cols,
    })
}

fn default_output(input: &Path, format: OutputFormat) -> PathBuf {
    let mut output = input.with_file_name(DOWNLOAD_FILENAME);
    if format == OutputFormat::Csv {
        output.set_extension("csv");
    }
    output
}

fn truncate_cell(value: &str) -> String {
    if value.chars().count() <= PREVIEW_CELL_WIDTH {
        return value.to_string();
    }
    let mut out = value.chars().take(PREVIEW_CELL_WIDTH - 1).collect::<String>();
    out.push('…');
    out
}

fn print_preview(dataset: &CombinedDataset, limit: usize) {
    if limit == 0 {
        return;
    }

    let format_row = |cells: Vec<&str>| {
        cells
            .into_iter()
            .map(|cell| format!("{:<width$}", truncate_cell(cell), width = PREVIEW_CELL_WIDTH))
            .collect::<Vec<_>>()
            .join(" | ")
    };

    println!("Preview of combined table:");
    println!(
        "{}",
        format_row(dataset.columns.iter().map(String::as_str).collect())
    );
    for row in dataset.rows.iter().take(limit) {
        println!(
            "{}",
            format_row(
                row.iter()
                    .map(|cell| cell.as_deref().unwrap_or_default())
                    .collect()
            )
        );
    }
    if dataset.row_count() > limit {
        println!("... {} more row(s)", dataset.row_count() - limit);
    }
}

fn report(extraction: &Extraction, verbose: bool) {
    println!("Extraction log:");
    for line in extraction.log_lines() {
        println!("{line}");
    }

    if verbose {
        let summary = extraction.summary();
        eprintln!(
            "pages={} tables={} batches={} rows={} warnings={} errors={}",
            summary.pages,
            summary.tables,
            summary.batches,
            summary.rows,
            summary.warnings,
            summary.errors
        );
    }
}

fn run_extract(args: &ExtractArgs) -> Result<Option<PathBuf>> {
    let options = parse_options(args)?;
    let extraction = extract_pdf_file(&args.input, &options)
        .with_context(|| format!("failed to extract tables from '{}'", args.input.display()))?;
    report(&extraction, args.verbose);

    if extraction.dataset.is_empty() {
        println!("⚠️ No tables were found or extracted from the uploaded PDF.");
        return Ok(None);
    }

    println!(
        "✅ Extracted a total of {} rows from the PDF.",
        extraction.dataset.row_count()
    );
    print_preview(&extraction.dataset, args.preview);

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output(&args.input, args.format));
    let written = match args.format {
        OutputFormat::Xlsx => write_spreadsheet(&output, &extraction.dataset),
        OutputFormat::Csv => write_csv(&output, &extraction.dataset, b','),
    };
    written.with_context(|| format!("failed to write '{}'", output.display()))?;

    Ok(Some(output))
}

fn main() -> ExitCode {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("invoice_tables=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Extract(args) => match run_extract(&args) {
            Ok(Some(output)) => {
                println!("Wrote {}", output.display());
                ExitCode::SUCCESS
            }
            Ok(None) => ExitCode::from(2),
            Err(error) => {
                eprintln!("error: {error:#}");
                ExitCode::from(1)
            }
        },
    }
}
