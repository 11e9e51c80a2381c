//! Batch command - generate emails for many ticket files.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, warn};

use ticketmail_core::models::config::TicketmailConfig;
use ticketmail_core::{EmailRequest, GeneratedEmail, RenderMode, TicketPipeline};

use super::config::load_config;
use super::generate::{format_output, resolve_sign_off, OutputFormat};
use crate::input::{load_ticket, SUPPORTED_EXTENSIONS};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input glob pattern, e.g. "tickets/*.docx"
    #[arg(required = true)]
    input: String,

    /// Output directory (default: next to each input)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Name to sign the emails with
    #[arg(short, long)]
    sign_off: Option<String>,

    /// Output format for each email
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Prepend a "Subject:" line to each email
    #[arg(long)]
    subject: bool,

    /// Also write a summary CSV
    #[arg(long)]
    summary: bool,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Result of processing a single file.
struct BatchResult {
    path: PathBuf,
    generated: Option<GeneratedEmail>,
    output: Option<PathBuf>,
    error: Option<String>,
    processing_time_ms: u64,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let sign_off = resolve_sign_off(args.sign_off.as_deref(), &config)?;
    let mode = args.format.map(RenderMode::from).unwrap_or(config.rendering.mode);
    let include_subject = args.subject || config.rendering.include_subject;

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            let ext = p.extension().and_then(|e| e.to_str()).unwrap_or("");
            SUPPORTED_EXTENSIONS.contains(&ext.to_lowercase().as_str())
        })
        .filter(|p| !is_generated_email(p))
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!("{} Found {} tickets to process", style("ℹ").blue(), files.len());

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} tickets")?
            .progress_chars("=>-"),
    );

    let pipeline = TicketPipeline::from_config(&config.extraction);
    let mut results = Vec::with_capacity(files.len());

    for path in files {
        let file_start = Instant::now();
        let result = process_single_file(&path, &pipeline, &config, &sign_off, mode, include_subject, &args).await;
        let processing_time_ms = file_start.elapsed().as_millis() as u64;

        match result {
            Ok((generated, output)) => results.push(BatchResult {
                path,
                generated: Some(generated),
                output: Some(output),
                error: None,
                processing_time_ms,
            }),
            Err(e) => {
                let error_msg = format!("{:#}", e);
                if args.continue_on_error {
                    warn!("Failed to process {}: {}", path.display(), error_msg);
                    results.push(BatchResult {
                        path,
                        generated: None,
                        output: None,
                        error: Some(error_msg),
                        processing_time_ms,
                    });
                } else {
                    pb.abandon();
                    error!("Failed to process {}: {}", path.display(), error_msg);
                    anyhow::bail!("Processing failed: {}", error_msg);
                }
            }
        }

        pb.inc(1);
    }

    pb.finish_with_message("Complete");

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        println!("{} Summary written to {}", style("✓").green(), summary_path.display());
    }

    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();
    let with_placeholders = results
        .iter()
        .filter_map(|r| r.generated.as_ref())
        .filter(|g| !g.extraction.warnings.is_empty())
        .count();

    println!();
    println!(
        "{} Processed {} tickets in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed, {} need review (placeholders left)",
        style(results.len() - failed.len()).green(),
        style(failed.len()).red(),
        style(with_placeholders).yellow()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for result in &failed {
            println!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
async fn process_single_file(
    path: &Path,
    pipeline: &TicketPipeline,
    config: &TicketmailConfig,
    sign_off: &str,
    mode: RenderMode,
    include_subject: bool,
    args: &BatchArgs,
) -> anyhow::Result<(GeneratedEmail, PathBuf)> {
    let ticket = load_ticket(path, config).await?;
    let request = EmailRequest::new(sign_off).with_hint(ticket.hint).with_mode(mode);
    let generated = pipeline.run_paragraphs(&ticket.paragraphs, &request);

    let output_path = output_path_for(path, args.output_dir.as_deref(), mode);
    fs::write(&output_path, format_output(&generated, include_subject))?;
    debug!("Wrote email to {}", output_path.display());

    Ok((generated, output_path))
}

/// Emails written by an earlier run next to their inputs.
fn is_generated_email(path: &Path) -> bool {
    path.file_stem()
        .and_then(|s| s.to_str())
        .is_some_and(|stem| stem.to_lowercase().ends_with(".email"))
}

/// `<stem>.email.txt` / `<stem>.email.html`, in the output directory or next to the input.
fn output_path_for(input: &Path, output_dir: Option<&Path>, mode: RenderMode) -> PathBuf {
    let stem = input.file_stem().and_then(|s| s.to_str()).unwrap_or("ticket");
    let extension = match mode {
        RenderMode::Plain => "txt",
        RenderMode::Html => "html",
    };
    let name = format!("{}.email.{}", stem, extension);

    match output_dir {
        Some(dir) => dir.join(name),
        None => input.with_file_name(name),
    }
}

fn write_summary(path: &Path, results: &[BatchResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "kind",
        "supplier",
        "invoice_number",
        "placeholders",
        "output",
        "processing_time_ms",
        "error",
    ])?;

    for result in results {
        let filename = result.path.file_name().and_then(|s| s.to_str()).unwrap_or("");
        let output = result
            .output
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        let time_ms = result.processing_time_ms.to_string();

        if let Some(generated) = &result.generated {
            let fields = &generated.extraction.fields;
            let placeholders = generated
                .email
                .kind
                .fields()
                .iter()
                .filter(|f| !fields.is_present(**f))
                .map(|f| f.placeholder())
                .collect::<Vec<_>>();
            let placeholders = placeholders.join(" ");

            wtr.write_record([
                filename,
                "success",
                generated.email.kind.as_str(),
                fields.supplier.as_deref().unwrap_or(""),
                fields.invoice_number.as_deref().unwrap_or(""),
                placeholders.as_str(),
                output.as_str(),
                time_ms.as_str(),
                "",
            ])?;
        } else {
            wtr.write_record([
                filename,
                "error",
                "",
                "",
                "",
                "",
                "",
                time_ms.as_str(),
                result.error.as_deref().unwrap_or(""),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}
