//! Inspect command - show what was extracted from a ticket.

use std::path::PathBuf;

use clap::Args;
use serde::Serialize;

use ticketmail_core::ticket::{ExtractionResult, RuleTicketParser, TicketParser};
use ticketmail_core::{DocumentFormat, TemplateKind};

use super::config::load_config;
use super::generate::KindArg;
use crate::input::load_ticket;

/// Arguments for the inspect command.
#[derive(Args)]
pub struct InspectArgs {
    /// Ticket file (.doc, .docx or extracted .txt)
    #[arg(required = true)]
    input: PathBuf,

    /// Force a template instead of detecting it
    #[arg(short, long, value_enum)]
    kind: Option<KindArg>,

    /// Include the normalized paragraphs
    #[arg(long)]
    paragraphs: bool,

    /// Compact JSON instead of pretty-printed
    #[arg(long)]
    compact: bool,
}

#[derive(Serialize)]
struct InspectReport<'a> {
    format: DocumentFormat,
    #[serde(flatten)]
    extraction: &'a ExtractionResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    paragraphs: Option<&'a [String]>,
}

pub async fn run(args: InspectArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let ticket = load_ticket(&args.input, &config).await?;

    let hint = args.kind.map(TemplateKind::from).or(ticket.hint);
    let extraction = RuleTicketParser::new()
        .with_header_window(config.extraction.header_window)
        .parse(&ticket.paragraphs, hint);

    let report = InspectReport {
        format: ticket.format,
        extraction: &extraction,
        paragraphs: args.paragraphs.then(|| ticket.paragraphs.as_slice()),
    };

    let json = if args.compact {
        serde_json::to_string(&report)?
    } else {
        serde_json::to_string_pretty(&report)?
    };
    println!("{}", json);

    Ok(())
}
