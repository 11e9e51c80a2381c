//! Convert command - turn a legacy .doc file into .docx.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use ticketmail_core::DocumentFormat;

use super::config::load_config;
use crate::cloudconvert::{CloudConvertClient, DocumentConverter};
use crate::input::file_name;

/// Arguments for the convert command.
#[derive(Args)]
pub struct ConvertArgs {
    /// Legacy .doc file
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: input with a .docx extension)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Convert even if the input already looks like .docx
    #[arg(long)]
    force: bool,
}

pub async fn run(args: ConvertArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let data = fs::read(&args.input)?;
    let format = DocumentFormat::detect(&data);
    if format != DocumentFormat::LegacyDoc && !args.force {
        anyhow::bail!(
            "{} is not a legacy .doc file (detected {:?}). Use --force to convert anyway.",
            args.input.display(),
            format
        );
    }

    let output_path = args
        .output
        .clone()
        .unwrap_or_else(|| args.input.with_extension("docx"));

    let client = CloudConvertClient::from_env(&config.conversion)?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.enable_steady_tick(std::time::Duration::from_millis(120));
    pb.set_message(format!("Converting {}...", file_name(&args.input)));

    let converted = client.convert(&data, &file_name(&args.input)).await;
    pb.finish_and_clear();
    let converted = converted?;

    fs::write(&output_path, &converted)?;
    info!("Wrote {} bytes to {}", converted.len(), output_path.display());

    println!(
        "{} Converted {} -> {}",
        style("✓").green(),
        args.input.display(),
        output_path.display()
    );

    Ok(())
}
