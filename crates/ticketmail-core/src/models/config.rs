//! Configuration structures for the ticket pipeline.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::email::RenderMode;
use crate::error::{Result, TicketError};

/// Main configuration for ticketmail.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TicketmailConfig {
    /// Field extraction configuration.
    pub extraction: ExtractionConfig,

    /// Email rendering configuration.
    pub rendering: RenderingConfig,

    /// Legacy document conversion service configuration.
    pub conversion: ConversionConfig,
}

/// Field extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Paragraphs after the price table header searched for the "PO Price" column.
    pub header_window: usize,

    /// Use the file name as a classification hint.
    pub hint_from_file_name: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            header_window: 10,
            hint_from_file_name: true,
        }
    }
}

/// Email rendering configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderingConfig {
    /// Default output encoding.
    pub mode: RenderMode,

    /// Name used to sign the email when none is given on the command line.
    pub sign_off: Option<String>,

    /// Prepend a "Subject:" line to the output.
    pub include_subject: bool,
}

impl Default for RenderingConfig {
    fn default() -> Self {
        Self {
            mode: RenderMode::Plain,
            sign_off: None,
            include_subject: false,
        }
    }
}

/// CloudConvert service settings. The API key itself is never stored here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionConfig {
    /// REST API base URL.
    pub api_url: String,

    /// Synchronous API base URL used to wait for job completion.
    pub sync_api_url: String,

    /// Environment variable holding the API key.
    pub api_key_env: String,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.cloudconvert.com/v2".to_string(),
            sync_api_url: "https://sync.api.cloudconvert.com/v2".to_string(),
            api_key_env: "CLOUDCONVERT_API_KEY".to_string(),
            timeout_secs: 120,
        }
    }
}

impl TicketmailConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| TicketError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| TicketError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
