//! Loading ticket files from disk, converting legacy ones on the way.

use std::fs;
use std::path::Path;

use tracing::{debug, info};

use ticketmail_core::models::config::TicketmailConfig;
use ticketmail_core::{read_paragraphs, DocumentFormat, Paragraphs, TemplateKind};

use crate::cloudconvert::{CloudConvertClient, DocumentConverter};

/// A ticket ready for the pipeline.
pub struct LoadedTicket {
    pub paragraphs: Paragraphs,
    pub format: DocumentFormat,
    /// Classification hint taken from the file name, when enabled.
    pub hint: Option<TemplateKind>,
}

/// Input extensions accepted by `batch`.
pub const SUPPORTED_EXTENSIONS: [&str; 3] = ["doc", "docx", "txt"];

pub fn file_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("ticket")
        .to_string()
}

/// Read a ticket file into paragraphs.
///
/// Legacy `.doc` files go through CloudConvert first; a conversion failure
/// aborts the load instead of yielding partial results.
pub async fn load_ticket(path: &Path, config: &TicketmailConfig) -> anyhow::Result<LoadedTicket> {
    if !path.exists() {
        anyhow::bail!("Input file not found: {}", path.display());
    }

    let name = file_name(path);
    let data = fs::read(path)?;
    let format = DocumentFormat::detect(&data);
    debug!("{} detected as {:?}", name, format);

    let data = match format {
        DocumentFormat::LegacyDoc => {
            info!("Converting {} to .docx", name);
            let client = CloudConvertClient::from_env(&config.conversion)?;
            client.convert(&data, &name).await?
        }
        DocumentFormat::Docx | DocumentFormat::PlainText => data,
    };

    let paragraphs = read_paragraphs(&data)?;
    let hint = if config.extraction.hint_from_file_name {
        TemplateKind::hint_from_file_name(&name)
    } else {
        None
    };

    Ok(LoadedTicket {
        paragraphs,
        format,
        hint,
    })
}
