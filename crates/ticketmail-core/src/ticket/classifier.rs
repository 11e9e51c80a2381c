//! Template classification from marker phrases.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::ticket::TemplateKind;
use crate::text::Paragraphs;

/// Each group is a set of phrases that must all appear somewhere in the
/// ticket; any complete group marks a price-variance ticket.
const PRICE_MARKER_GROUPS: [&[&str]; 2] = [
    &["po price", "invoiced price", "% deviation"],
    &["total position difference", "invoiced qty"],
];

const ARTICLE_MARKERS: [&str; 2] = ["quarantine storage", "not ordered"];

/// How the template kind was decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationSource {
    /// Caller-supplied hint.
    Hint,
    /// A complete group of price-variance markers.
    PriceMarkers,
    /// Quarantine / not-ordered wording.
    ArticleMarkers,
    /// Nothing matched; article-not-ordered is the default.
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub kind: TemplateKind,
    pub source: ClassificationSource,
}

/// Decide which template a ticket gets. A hint always wins.
pub fn classify(paragraphs: &Paragraphs, hint: Option<TemplateKind>) -> Classification {
    if let Some(kind) = hint {
        debug!("Using classification hint {}", kind);
        return Classification {
            kind,
            source: ClassificationSource::Hint,
        };
    }

    let lowered: Vec<String> = paragraphs.iter().map(str::to_lowercase).collect();
    let contains = |needle: &str| lowered.iter().any(|p| p.contains(needle));

    let classification = if PRICE_MARKER_GROUPS
        .iter()
        .any(|group| group.iter().all(|marker| contains(*marker)))
    {
        Classification {
            kind: TemplateKind::PriceVariance,
            source: ClassificationSource::PriceMarkers,
        }
    } else if ARTICLE_MARKERS.iter().any(|marker| contains(*marker)) {
        Classification {
            kind: TemplateKind::ArticleNotOrdered,
            source: ClassificationSource::ArticleMarkers,
        }
    } else {
        Classification {
            kind: TemplateKind::ArticleNotOrdered,
            source: ClassificationSource::Fallback,
        }
    };

    debug!(
        "Classified ticket as {} ({:?})",
        classification.kind, classification.source
    );
    classification
}
