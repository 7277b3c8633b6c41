//! Process command - extract data from a single invoice file.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use fatura_core::{EnergyInvoiceParser, InvoiceParser};

use super::config::load_config;
use super::input::read_text;
use super::output::{format_record, OutputFormat};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input file (PDF or plain text)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Show sections that could not be read
    #[arg(long)]
    show_warnings: bool,
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")?,
    );
    pb.set_message("Reading document...");

    let text = read_text(&args.input, &config.pdf)?;

    pb.set_message("Extracting invoice data...");

    let parser = EnergyInvoiceParser::from_config(&config.extraction);
    let result = parser.parse(&text)?;

    pb.finish_and_clear();

    for warning in &result.warnings {
        info!("{}: {}", args.input.display(), warning);
    }

    if args.show_warnings && !result.warnings.is_empty() {
        eprintln!("{}", style("Extraction warnings:").yellow());
        for warning in &result.warnings {
            eprintln!("  - {}", warning);
        }
    }

    if result.needs_review() {
        eprintln!(
            "{} No energy sections were read; review this invoice manually.",
            style("⚠").yellow()
        );
    }

    let processing_time_ms = result.processing_time_ms;
    let mut record = result.into_record();
    if let Some(name) = args.input.file_name().and_then(|n| n.to_str()) {
        record = record.with_source(name);
    }

    let output = format_record(&record, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        eprintln!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!(
        "Extraction took {}ms, total {:?}",
        processing_time_ms,
        start.elapsed()
    );

    Ok(())
}
