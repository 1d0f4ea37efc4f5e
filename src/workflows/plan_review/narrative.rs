//! Fact scraping over the free-text AHJ narrative.
//!
//! The narrative generator marks governing codes as `**NEC 2020**`, cites sources inline
//! as `[1]`, and closes with a "Trusted sources" sentence listing `[https://..]` links.
//! Structured `code_mentions`/`sources` fields take precedence when the generator sends them.

use super::payload::AhjValidation;
use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;
use tracing::debug;

/// Phrase separating the narrative summary from its source listing.
pub const TRUSTED_SOURCES_MARKER: &str = "Trusted sources for validation include:";

fn bold_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\*\*(.*?)\*\*").expect("bold pattern compiles"))
}

fn citation_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\[[0-9]\]").expect("citation pattern compiles"))
}

fn source_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\[(https://.*?)\]").expect("source pattern compiles"))
}

/// Where the code mentions and sources of an [`AhjFacts`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FactSource {
    Structured,
    Narrative,
}

/// Display-ready facts about the AHJ check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AhjFacts {
    pub code_mentions: Vec<String>,
    pub sources: Vec<String>,
    pub summary: String,
    pub source: FactSource,
}

/// Every `**bold**` span in order of appearance, markers removed, duplicates kept.
pub fn code_mentions(narrative: &str) -> Vec<String> {
    bold_pattern()
        .captures_iter(narrative)
        .map(|captures| captures[1].to_string())
        .collect()
}

/// Every bracketed `https://` URL anywhere in the narrative, brackets removed.
pub fn trusted_sources(narrative: &str) -> Vec<String> {
    source_pattern()
        .captures_iter(narrative)
        .map(|captures| captures[1].to_string())
        .collect()
}

/// Text before the trusted-sources sentence, with bold spans rendered as `<strong>` and
/// single-digit citation markers removed.
pub fn narrative_summary(narrative: &str) -> String {
    let before_sources = narrative
        .split(TRUSTED_SOURCES_MARKER)
        .next()
        .unwrap_or_default();
    let emphasized = bold_pattern().replace_all(before_sources, "<strong>$1</strong>");
    let uncited = citation_pattern().replace_all(&emphasized, "");

    uncited.trim().to_string()
}

pub fn extract_facts(ahj: &AhjValidation) -> AhjFacts {
    let summary = narrative_summary(&ahj.details);

    match (&ahj.code_mentions, &ahj.sources) {
        (Some(code_mentions), Some(sources)) => AhjFacts {
            code_mentions: code_mentions.clone(),
            sources: sources.clone(),
            summary,
            source: FactSource::Structured,
        },
        (mentions, cited) => {
            debug!("scraping AHJ facts from narrative text");
            AhjFacts {
                code_mentions: mentions
                    .clone()
                    .unwrap_or_else(|| code_mentions(&ahj.details)),
                sources: cited
                    .clone()
                    .unwrap_or_else(|| trusted_sources(&ahj.details)),
                summary,
                source: FactSource::Narrative,
            }
        }
    }
}
