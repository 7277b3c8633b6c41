//! Batch processing command for multiple invoice files.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use futures_util::{stream, StreamExt};
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, info, warn};

use fatura_core::models::config::PdfConfig;
use fatura_core::{
    EnergyInvoiceParser, ExtractionResult, ExtractionWarning, InvoiceLedger, InvoiceParser,
    InvoiceQuery, InvoiceRecord,
};

use super::config::load_config;
use super::input::{is_supported, read_text};
use super::output::{format_record, OutputFormat};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern of input files (PDF or plain text)
    #[arg(required = true)]
    input: String,

    /// Output directory for per-invoice files, summary and dashboard
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Also generate a dashboard JSON with monthly totals
    #[arg(long)]
    dashboard: bool,

    /// Restrict the dashboard to one client number
    #[arg(long)]
    client: Option<String>,

    /// Restrict the dashboard to one year (e.g. 2024)
    #[arg(long)]
    year: Option<String>,

    /// Restrict the dashboard to one month (e.g. SET)
    #[arg(long)]
    month: Option<String>,

    /// Number of parallel workers
    #[arg(short = 'j', long, default_value = "4")]
    jobs: usize,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

impl BatchArgs {
    fn query(&self) -> InvoiceQuery {
        let mut query = InvoiceQuery::new();
        if let Some(client) = &self.client {
            query = query.client(client);
        }
        if let Some(year) = &self.year {
            query = query.year(year);
        }
        if let Some(month) = &self.month {
            query = query.month(month);
        }
        query
    }

    fn output_path(&self, name: &str) -> PathBuf {
        self.output_dir
            .as_ref()
            .map(|d| d.join(name))
            .unwrap_or_else(|| PathBuf::from(name))
    }
}

/// Result of processing a single file.
struct ProcessResult {
    path: PathBuf,
    record: Option<InvoiceRecord>,
    warnings: Vec<ExtractionWarning>,
    needs_review: bool,
    error: Option<String>,
    processing_time_ms: u64,
}

impl ProcessResult {
    fn file_name(&self) -> &str {
        self.path.file_name().and_then(|s| s.to_str()).unwrap_or("")
    }
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;

    let mut files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| is_supported(p))
        .collect();
    files.sort();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    eprintln!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let overall_pb = ProgressBar::new(files.len() as u64);
    overall_pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    // The parser holds only configuration, so one instance serves every worker
    let parser = Arc::new(EnergyInvoiceParser::from_config(&config.extraction));
    let pdf_config = Arc::new(config.pdf.clone());

    let mut tasks = stream::iter(files.into_iter().map(|path| {
        let parser = Arc::clone(&parser);
        let pdf_config = Arc::clone(&pdf_config);
        tokio::task::spawn_blocking(move || {
            let file_start = Instant::now();
            let result = process_single_file(&path, parser.as_ref(), &pdf_config);
            (path, result, file_start.elapsed().as_millis() as u64)
        })
    }))
    .buffered(args.jobs.max(1));

    let mut results = Vec::new();
    let mut ledger = InvoiceLedger::new();

    while let Some(joined) = tasks.next().await {
        let (path, result, processing_time_ms) = joined?;

        match result {
            Ok(extraction) => {
                let warnings = extraction.warnings.clone();
                let needs_review = extraction.needs_review();
                let mut record = extraction.into_record();
                if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                    record = record.with_source(name);
                }

                for warning in &warnings {
                    info!("{}: {}", path.display(), warning);
                }

                if ledger.upsert(record.clone()) {
                    warn!(
                        "{} replaces an earlier invoice for client {} ({})",
                        path.display(),
                        record.data.client_number,
                        record.data.reference_month
                    );
                }

                results.push(ProcessResult {
                    path,
                    record: Some(record),
                    warnings,
                    needs_review,
                    error: None,
                    processing_time_ms,
                });
            }
            Err(e) => {
                let error_msg = e.to_string();
                if args.continue_on_error {
                    warn!("Failed to process {}: {}", path.display(), error_msg);
                    results.push(ProcessResult {
                        path,
                        record: None,
                        warnings: Vec::new(),
                        needs_review: false,
                        error: Some(error_msg),
                        processing_time_ms,
                    });
                } else {
                    overall_pb.abandon();
                    error!("Failed to process {}: {}", path.display(), error_msg);
                    anyhow::bail!("Processing failed for {}: {}", path.display(), error_msg);
                }
            }
        }

        overall_pb.inc(1);
    }

    overall_pb.finish_and_clear();

    if let Some(output_dir) = &args.output_dir {
        for record in ledger.list(&InvoiceQuery::new()) {
            let output_path =
                output_dir.join(format!("{}.{}", record.file_stem(), args.format.extension()));
            fs::write(&output_path, format_record(record, args.format)?)?;
            debug!("Wrote output to {}", output_path.display());
        }
    }

    if args.summary {
        let summary_path = args.output_path("summary.csv");
        write_summary(&summary_path, &results)?;
        eprintln!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    if args.dashboard {
        let dashboard_path = args.output_path("dashboard.json");
        let dashboard = ledger.dashboard(&args.query());
        fs::write(&dashboard_path, serde_json::to_string_pretty(&dashboard)?)?;
        eprintln!(
            "{} Dashboard written to {}",
            style("✓").green(),
            dashboard_path.display()
        );
    }

    let failed: Vec<&ProcessResult> = results.iter().filter(|r| r.error.is_some()).collect();
    let review: Vec<&ProcessResult> = results.iter().filter(|r| r.needs_review).collect();

    eprintln!();
    eprintln!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    eprintln!(
        "   {} successful, {} failed, {} invoices stored",
        style(results.len() - failed.len()).green(),
        style(failed.len()).red(),
        ledger.len()
    );

    if !review.is_empty() {
        eprintln!();
        eprintln!("{}", style("Needs review (no energy sections read):").yellow());
        for result in &review {
            eprintln!("  - {}", result.path.display());
        }
    }

    if !failed.is_empty() {
        eprintln!();
        eprintln!("{}", style("Failed files:").red());
        for result in &failed {
            eprintln!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

fn process_single_file(
    path: &Path,
    parser: &EnergyInvoiceParser,
    pdf_config: &PdfConfig,
) -> anyhow::Result<ExtractionResult> {
    let text = read_text(path, pdf_config)?;
    Ok(parser.parse(&text)?)
}

fn write_summary(path: &Path, results: &[ProcessResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "client_number",
        "reference_month",
        "distributor",
        "consumo_total",
        "valor_total_sem_gd",
        "economia_gd",
        "warnings",
        "processing_time_ms",
        "error",
    ])?;

    for result in results {
        let processing_time_ms = result.processing_time_ms.to_string();

        if let Some(record) = &result.record {
            let warnings: Vec<String> = result.warnings.iter().map(|w| w.to_string()).collect();
            let status = if result.needs_review { "review" } else { "success" };

            wtr.write_record([
                result.file_name(),
                status,
                &record.data.client_number,
                &record.data.reference_month,
                &record
                    .data
                    .distributor_name
                    .map(|d| d.to_string())
                    .unwrap_or_default(),
                &record.totals.consumo_total.to_string(),
                &record.totals.valor_total_sem_gd.to_string(),
                &record.totals.economia_gd.to_string(),
                &warnings.join("; "),
                &processing_time_ms,
                "",
            ])?;
        } else {
            wtr.write_record([
                result.file_name(),
                "error",
                "",
                "",
                "",
                "",
                "",
                "",
                "",
                &processing_time_ms,
                result.error.as_deref().unwrap_or(""),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}
