use super::common::*;
use crate::workflows::plan_review::narrative::FactSource;
use crate::workflows::plan_review::{
    code_mentions, extract_facts, narrative_summary, trusted_sources, AhjVerdict,
};

#[test]
fn extracts_bold_codes_and_bracketed_sources() {
    let narrative = "**UL 1741** governs inverters. Trusted sources for validation include: [https://example.com]";

    assert_eq!(code_mentions(narrative), vec!["UL 1741".to_string()]);
    assert_eq!(trusted_sources(narrative), vec!["https://example.com".to_string()]);

    let summary = narrative_summary(narrative);
    assert_eq!(summary, "<strong>UL 1741</strong> governs inverters.");
    assert!(!summary.contains("https://example.com"));
}

#[test]
fn code_mentions_keep_order_and_duplicates() {
    assert_eq!(
        code_mentions(ahj_narrative()),
        vec![
            "2020 NEC".to_string(),
            "2023 Florida Building Code".to_string(),
            "2020 NEC".to_string(),
        ]
    );
}

#[test]
fn sources_are_read_from_the_whole_narrative() {
    let narrative = "See [https://a.example/one] early on. Trusted sources for validation include: [https://b.example/two] and [http://insecure.example]";

    assert_eq!(
        trusted_sources(narrative),
        vec![
            "https://a.example/one".to_string(),
            "https://b.example/two".to_string(),
        ]
    );
}

#[test]
fn summary_strips_single_digit_citations_only() {
    let summary = narrative_summary("Adopted in 2021[1] and amended[2] per ordinance [12].");

    assert_eq!(summary, "Adopted in 2021 and amended per ordinance [12].");
}

#[test]
fn summary_without_marker_keeps_whole_text() {
    let summary = narrative_summary("Codes are current for **Lee County**.");

    assert_eq!(summary, "Codes are current for <strong>Lee County</strong>.");
}

#[test]
fn no_matches_yield_empty_lists() {
    let narrative = "No code references were found in the plan set.";

    assert!(code_mentions(narrative).is_empty());
    assert!(trusted_sources(narrative).is_empty());
    assert!(code_mentions("").is_empty());
}

#[test]
fn structured_fields_take_precedence() {
    let mut record = ahj(AhjVerdict::Yes);
    record.code_mentions = Some(vec!["NFPA 70".to_string()]);
    record.sources = Some(Vec::new());

    let facts = extract_facts(&record);

    assert_eq!(facts.source, FactSource::Structured);
    assert_eq!(facts.code_mentions, vec!["NFPA 70".to_string()]);
    assert!(facts.sources.is_empty());
    assert!(facts.summary.contains("<strong>2020 NEC</strong>"));
}

#[test]
fn partial_structured_fields_fall_back_per_list() {
    let mut record = ahj(AhjVerdict::No);
    record.code_mentions = Some(vec!["IFC 2021".to_string()]);

    let facts = extract_facts(&record);

    assert_eq!(facts.source, FactSource::Narrative);
    assert_eq!(facts.code_mentions, vec!["IFC 2021".to_string()]);
    assert_eq!(
        facts.sources,
        vec![
            "https://www.leegov.com/dcd".to_string(),
            "https://floridabuilding.org".to_string(),
        ]
    );
    assert!(!facts.summary.contains("Trusted sources"));
    assert!(!facts.summary.contains("[1]"));
}
