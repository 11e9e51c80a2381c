//! Generate command - turn a single ticket into an email.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::{Args, ValueEnum};
use console::style;
use tracing::{debug, info};

use ticketmail_core::models::config::TicketmailConfig;
use ticketmail_core::{EmailRequest, GeneratedEmail, RenderMode, TemplateKind, TicketPipeline};

use super::config::load_config;
use crate::input::load_ticket;

/// Arguments for the generate command.
#[derive(Args)]
pub struct GenerateArgs {
    /// Ticket file (.doc, .docx or extracted .txt)
    #[arg(required = true)]
    input: PathBuf,

    /// Name to sign the email with (default: rendering.sign_off from config)
    #[arg(short, long)]
    sign_off: Option<String>,

    /// Output format (default: rendering.mode from config)
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Force a template instead of detecting it
    #[arg(short, long, value_enum)]
    kind: Option<KindArg>,

    /// Prepend a "Subject:" line
    #[arg(long)]
    subject: bool,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    /// Plain text with literal line breaks
    Plain,
    /// Inline HTML with <br> line breaks and an HTML price table
    Html,
}

impl From<OutputFormat> for RenderMode {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Plain => RenderMode::Plain,
            OutputFormat::Html => RenderMode::Html,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum KindArg {
    /// Invoice price deviation email
    PriceVariance,
    /// Articles delivered without order email
    ArticleNotOrdered,
}

impl From<KindArg> for TemplateKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::PriceVariance => TemplateKind::PriceVariance,
            KindArg::ArticleNotOrdered => TemplateKind::ArticleNotOrdered,
        }
    }
}

/// Sign-off name from the command line, falling back to the config.
pub fn resolve_sign_off(arg: Option<&str>, config: &TicketmailConfig) -> anyhow::Result<String> {
    arg.map(str::to_string)
        .or_else(|| config.rendering.sign_off.clone())
        .filter(|name| !name.trim().is_empty())
        .ok_or_else(|| {
            anyhow::anyhow!(
                "No sign-off name given. Pass --sign-off or run 'ticketmail config set rendering.sign_off \"Your Name\"'."
            )
        })
}

/// Email text as written to the output, with the optional subject line.
pub fn format_output(generated: &GeneratedEmail, include_subject: bool) -> String {
    let email = &generated.email;
    if !include_subject {
        return email.body.clone();
    }
    match email.mode {
        RenderMode::Plain => format!("Subject: {}\n\n{}", email.subject, email.body),
        RenderMode::Html => format!(
            "Subject: {}<br>\n<br>\n{}",
            ticketmail_core::render::escape_html(&email.subject),
            email.body
        ),
    }
}

pub async fn run(args: GenerateArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let sign_off = resolve_sign_off(args.sign_off.as_deref(), &config)?;
    let mode = args.format.map(RenderMode::from).unwrap_or(config.rendering.mode);

    info!("Processing ticket: {}", args.input.display());
    let ticket = load_ticket(&args.input, &config).await?;

    let hint = args.kind.map(TemplateKind::from).or(ticket.hint);
    let request = EmailRequest::new(sign_off).with_hint(hint).with_mode(mode);

    let generated = TicketPipeline::from_config(&config.extraction).run_paragraphs(&ticket.paragraphs, &request);

    for warning in &generated.extraction.warnings {
        eprintln!("{} {}", style("!").yellow(), warning);
    }

    let output = format_output(&generated, args.subject || config.rendering.include_subject);

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} {} email written to {}",
            style("✓").green(),
            generated.email.kind,
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}
