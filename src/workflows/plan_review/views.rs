use super::comparison::ComparisonReport;
use super::location::LocationBand;
use super::narrative::FactSource;
use super::payload::{AhjVerdict, Coordinates, ExtractedData, MatchKind};
use super::scoring::{AggregateScore, CriterionScore};
use serde::Serialize;

/// Scored verdict for one plan set, ready for rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanReview {
    #[serde(flatten)]
    pub score: AggregateScore,
    pub criteria: Vec<CriterionScore>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<LocationView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<RatingView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ahj: Option<AhjView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<ExtractedData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparisons: Option<ComparisonReport>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationView {
    pub average: f64,
    pub band: LocationBand,
    pub counted_samples: usize,
    pub excluded_samples: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub samples: Vec<SampleView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampleView {
    pub kind: MatchKind,
    /// 1-based position within its kind.
    pub index: usize,
    pub pdf_image: String,
    pub google_image: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_percent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parsed_percent: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conclusion: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_differences: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_similarities: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RatingView {
    pub discrepancy: bool,
    pub status: &'static str,
    pub progress: u8,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<RatingDetail>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RatingDetail {
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AhjView {
    pub is_correct: AhjVerdict,
    pub progress: u8,
    pub code_mentions: Vec<String>,
    pub sources: Vec<String>,
    pub summary: String,
    pub extracted_from: FactSource,
}
