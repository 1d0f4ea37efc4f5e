use super::payload::{value_text, ComparisonResults, ComparisonRow, StructuredData, WebData};
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::OnceLock;

const NOT_FOUND: &str = "Not found";
const REFERENCE_LINK_LIMIT: usize = 3;

fn url_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r#"https?://[^\s()<>]+(?:\.[^\s()<>]+)+(?:\([^\s()<>]*\)|[^\s`!()\[\]{};:'".,<>?«»])*"#,
        )
        .expect("url pattern compiles")
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ComparisonStatus {
    Match,
    Mismatch,
}

impl ComparisonStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Match => "Match",
            Self::Mismatch => "Mismatch",
        }
    }
}

/// Cross-checks each extracted spec value against the web research summary.
///
/// A value matches when it occurs, case-insensitively, anywhere in the summary.
pub fn compare_specifications(structured: &StructuredData, web_summary: &str) -> ComparisonResults {
    let haystack = web_summary.to_lowercase();

    structured
        .iter()
        .filter_map(|(category, specs)| match specs {
            Value::Object(specs) => Some((category, specs)),
            _ => None,
        })
        .map(|(category, specs)| {
            let rows = specs
                .iter()
                .map(|(specification, value)| {
                    let extracted = value_text(value);
                    let matched = extracted
                        .as_deref()
                        .is_some_and(|text| haystack.contains(&text.to_lowercase()));
                    let status = if matched {
                        ComparisonStatus::Match
                    } else {
                        ComparisonStatus::Mismatch
                    };

                    ComparisonRow {
                        specification: specification.clone(),
                        validated_value: if matched {
                            extracted.clone()
                        } else {
                            Some(NOT_FOUND.to_string())
                        },
                        extracted_value: extracted,
                        status: status.label().to_string(),
                    }
                })
                .collect();
            (category.clone(), rows)
        })
        .collect()
}

/// Matched/total rows for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTally {
    pub matched: usize,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonReport {
    pub derived: bool,
    pub categories: BTreeMap<String, CategoryTally>,
    pub rows: ComparisonResults,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reference_links: Vec<String>,
}

impl ComparisonReport {
    pub fn new(rows: ComparisonResults, derived: bool, reference_links: Vec<String>) -> Self {
        let categories = rows
            .iter()
            .map(|(category, rows)| {
                let matched = rows.iter().filter(|row| is_match(&row.status)).count();
                (
                    category.clone(),
                    CategoryTally {
                        matched,
                        total: rows.len(),
                    },
                )
            })
            .collect();

        Self {
            derived,
            categories,
            rows,
            reference_links,
        }
    }

    pub fn matched(&self) -> usize {
        self.categories.values().map(|tally| tally.matched).sum()
    }

    pub fn total(&self) -> usize {
        self.categories.values().map(|tally| tally.total).sum()
    }
}

/// Upstream statuses arrive decorated (e.g. "✅ Match"), so only the word is compared.
fn is_match(status: &str) -> bool {
    status
        .trim_start_matches(|c: char| !c.is_alphanumeric())
        .trim()
        .eq_ignore_ascii_case(ComparisonStatus::Match.label())
}

/// Every `http(s)` URL with a dotted host in the text, trailing punctuation trimmed.
pub fn extract_urls(text: &str) -> Vec<String> {
    url_pattern()
        .find_iter(text)
        .map(|found| {
            found
                .as_str()
                .trim_end_matches(['.', ',', ';', ':', '!', '?', '\'', '"', ']'])
                .to_string()
        })
        .collect()
}

impl WebData {
    /// The supplied top links, or the first few URLs quoted in the summary.
    pub fn reference_links(&self) -> Vec<String> {
        if !self.top_links.is_empty() {
            return self.top_links.clone();
        }

        extract_urls(&self.summary)
            .into_iter()
            .take(REFERENCE_LINK_LIMIT)
            .collect()
    }
}
