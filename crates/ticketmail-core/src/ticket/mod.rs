//! Ticket classification and field extraction.

mod classifier;
mod parser;
pub mod rules;

pub use classifier::{classify, Classification, ClassificationSource};
pub use parser::{ExtractionResult, MatchRecord, RuleTicketParser, TicketParser};
