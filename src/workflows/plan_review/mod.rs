//! Reduces the independent plan-set checks (system rating, AHJ governing codes and
//! geolocation) into one scored pass/warn/fail review.
//!
//! The engine is a pure transformation: no I/O, no state between calls.

pub mod comparison;
pub mod criteria;
pub mod location;
pub mod narrative;
pub mod payload;
pub mod percent;
pub mod scoring;
pub mod views;

#[cfg(test)]
mod tests;

pub use comparison::{
    compare_specifications, extract_urls, CategoryTally, ComparisonReport, ComparisonStatus,
};
pub use criteria::{assess_ahj, assess_rating, AhjAssessment, RatingAssessment};
pub use location::{aggregate_samples, assess_location, LocationBand, LocationMatch};
pub use narrative::{code_mentions, extract_facts, narrative_summary, trusted_sources, AhjFacts};
pub use payload::{
    AhjValidation, AhjVerdict, ComparisonResults, ComparisonRow, Coordinates, ExtractedData,
    LocationValidation, MatchKind, MatchResults, MatchSample, PayloadError, RatingField,
    StructuredData, SystemRatingValidation, ValidationPayload, ValidationResults, WebData,
};
pub use percent::parse_percentage;
pub use scoring::{AggregateScore, Criterion, CriterionOutcomes, CriterionScore, ScoreBand};
pub use views::{AhjView, LocationView, PlanReview, RatingDetail, RatingView, SampleView};

use tracing::info;

/// Stateless evaluator turning a validation payload into a [`PlanReview`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ReviewEngine;

impl ReviewEngine {
    pub fn new() -> Self {
        Self
    }

    pub fn review(&self, payload: &ValidationPayload) -> PlanReview {
        let rating = payload.system_rating_validation.as_ref().map(|record| {
            let assessment = assess_rating(record);
            (assessment, rating_view(record, assessment))
        });
        let ahj = payload.ahj_validation.as_ref().map(|record| {
            let assessment = assess_ahj(record);
            (assessment, ahj_view(record, assessment))
        });
        let location = payload.location_validation.as_ref().map(|record| {
            let assessment = assess_location(record);
            (assessment, location_view(record, assessment))
        });

        let outcomes = CriterionOutcomes {
            rating_passed: rating
                .as_ref()
                .map_or(true, |(assessment, _)| assessment.passed()),
            ahj_credited: ahj
                .as_ref()
                .is_some_and(|(assessment, _)| assessment.credited),
            location_average: location
                .as_ref()
                .map_or(0.0, |(assessment, _)| assessment.average),
        };
        let (score, criteria) = scoring::score_criteria(&outcomes);

        info!(
            achieved = score.achieved,
            max = score.max,
            band = score.band.label(),
            "plan set review scored"
        );

        PlanReview {
            score,
            criteria,
            location: location.map(|(_, view)| view),
            rating: rating.map(|(_, view)| view),
            ahj: ahj.map(|(_, view)| view),
            project: payload.extracted_data.clone(),
            comparisons: comparison_report(payload),
        }
    }
}

fn rating_view(record: &SystemRatingValidation, assessment: RatingAssessment) -> RatingView {
    let details = record
        .fields
        .iter()
        .filter_map(|(field, value)| {
            field.display_label().map(|label| RatingDetail {
                label,
                value: value.clone(),
            })
        })
        .collect();

    RatingView {
        discrepancy: assessment.discrepancy,
        status: assessment.label(),
        progress: assessment.progress(),
        details,
        error: record.error.clone(),
    }
}

fn ahj_view(record: &AhjValidation, assessment: AhjAssessment) -> AhjView {
    let facts = extract_facts(record);

    AhjView {
        is_correct: assessment.verdict,
        progress: assessment.progress,
        code_mentions: facts.code_mentions,
        sources: facts.sources,
        summary: facts.summary,
        extracted_from: facts.source,
    }
}

fn location_view(record: &LocationValidation, assessment: LocationMatch) -> LocationView {
    if assessment.band == LocationBand::Error {
        return LocationView {
            average: assessment.average,
            band: assessment.band,
            counted_samples: 0,
            excluded_samples: 0,
            error: Some(
                record
                    .error
                    .clone()
                    .unwrap_or_else(|| "Failed to validate location".to_string()),
            ),
            address: record.address.clone(),
            coordinates: None,
            samples: Vec::new(),
        };
    }

    let samples = record
        .validation_results
        .as_ref()
        .map(|results| {
            sample_views(MatchKind::Map, &results.map_validations)
                .chain(sample_views(
                    MatchKind::Satellite,
                    &results.satellite_validations,
                ))
                .collect()
        })
        .unwrap_or_default();

    LocationView {
        average: assessment.average,
        band: assessment.band,
        counted_samples: assessment.counted,
        excluded_samples: assessment.excluded,
        error: None,
        address: record.address.clone(),
        coordinates: record.coordinates,
        samples,
    }
}

fn sample_views(
    kind: MatchKind,
    samples: &[MatchSample],
) -> impl Iterator<Item = SampleView> + '_ {
    samples.iter().enumerate().map(move |(position, sample)| {
        let raw = sample.match_percent(kind);
        SampleView {
            kind,
            index: position + 1,
            pdf_image: sample.pdf_image.clone(),
            google_image: sample.google_image.clone(),
            match_percent: raw.map(str::to_string),
            parsed_percent: raw.and_then(parse_percentage),
            confidence: sample.results.confidence.clone(),
            conclusion: sample.results.conclusion.clone(),
            key_differences: sample.results.key_differences.clone(),
            key_similarities: sample.results.key_similarities.clone(),
        }
    })
}

fn comparison_report(payload: &ValidationPayload) -> Option<ComparisonReport> {
    let reference_links = payload
        .web_data
        .as_ref()
        .map(WebData::reference_links)
        .unwrap_or_default();

    if let Some(rows) = &payload.comparison_results {
        return Some(ComparisonReport::new(rows.clone(), false, reference_links));
    }

    match (&payload.structured_data, &payload.web_data) {
        (Some(structured), Some(web)) => {
            let rows = compare_specifications(structured, &web.summary);
            Some(ComparisonReport::new(rows, true, reference_links))
        }
        _ => None,
    }
}
