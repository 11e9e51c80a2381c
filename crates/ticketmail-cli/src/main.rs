//! CLI application turning ticket documents into supplier emails.

mod cloudconvert;
mod commands;
mod input;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{batch, config, convert, generate, inspect};

/// Ticketmail - Draft supplier emails from price variance and unordered article tickets
#[derive(Parser)]
#[command(name = "ticketmail")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate an email from a single ticket
    Generate(generate::GenerateArgs),

    /// Show the fields extracted from a ticket as JSON
    Inspect(inspect::InspectArgs),

    /// Generate emails for multiple ticket files
    Batch(batch::BatchArgs),

    /// Convert a legacy .doc ticket to .docx via CloudConvert
    Convert(convert::ConvertArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    // stdout carries the email or JSON report
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Generate(args) => generate::run(args, config_path).await,
        Commands::Inspect(args) => inspect::run(args, config_path).await,
        Commands::Batch(args) => batch::run(args, config_path).await,
        Commands::Convert(args) => convert::run(args, config_path).await,
        Commands::Config(args) => config::run(args, config_path).await,
    }
}
