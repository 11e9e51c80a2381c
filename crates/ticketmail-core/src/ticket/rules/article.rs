//! Article description extraction for not-ordered tickets.

use super::{first_match, FieldExtractor, FieldMatch, LabelRule};
use crate::models::ticket::Field;
use crate::text::Paragraphs;

const ARTICLE_RULES: [LabelRule; 3] = [
    LabelRule::next("article_information", "article information"),
    LabelRule::next("article_number", "article number"),
    LabelRule::next("article_colon", "article:"),
];

pub struct ArticleInfoExtractor;

impl FieldExtractor for ArticleInfoExtractor {
    type Output = String;

    fn extract(&self, paragraphs: &Paragraphs) -> Option<FieldMatch<String>> {
        first_match(&ARTICLE_RULES, paragraphs)
    }
}

/// Extract the article description, or `[Article Info]`.
pub fn extract_article_info(paragraphs: &Paragraphs) -> String {
    ArticleInfoExtractor
        .extract(paragraphs)
        .map(|m| m.value)
        .unwrap_or_else(|| Field::ArticleInfo.placeholder().to_string())
}
