use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::Path;

/// Per-category spec values extracted from the plan set, e.g. module or inverter data sheets.
pub type StructuredData = BTreeMap<String, Value>;

/// Spec rows cross-checked against web research, grouped by category.
pub type ComparisonResults = BTreeMap<String, Vec<ComparisonRow>>;

/// Everything the upstream validation pipeline produced for one plan set.
///
/// Every record is optional: a missing record means "not evaluated", never "failed".
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ValidationPayload {
    #[serde(default)]
    pub extracted_data: Option<ExtractedData>,
    #[serde(default)]
    pub system_rating_validation: Option<SystemRatingValidation>,
    #[serde(default)]
    pub ahj_validation: Option<AhjValidation>,
    #[serde(default)]
    pub location_validation: Option<LocationValidation>,
    #[serde(default)]
    pub comparison_results: Option<ComparisonResults>,
    #[serde(default)]
    pub structured_data: Option<StructuredData>,
    #[serde(default)]
    pub web_data: Option<WebData>,
}

impl ValidationPayload {
    pub fn from_slice(bytes: &[u8]) -> Result<Self, PayloadError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, PayloadError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| PayloadError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_slice(&bytes)
    }
}

/// Failure to obtain a payload from disk or a request body.
#[derive(Debug, thiserror::Error)]
pub enum PayloadError {
    #[error("payload is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("failed to read payload from {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Title-block facts pulled out of the plan set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedData {
    #[serde(default, deserialize_with = "lenient_text")]
    pub company_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub company_address: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub project_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub project_address: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub email_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub phone_number: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub sheet_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub sheet_size: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub sheet_number: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub dc_system_size: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub ac_system_size: Option<String>,
}

/// Labels the system-rating check is known to emit.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RatingField {
    SystemRatingCheck,
    NewlyInstalledModules,
    StatedDcRating,
    ExpectedDcCalculation,
    StatedAcRating,
    Efficiency,
    Unrecognized(String),
}

impl RatingField {
    /// Labels are matched exactly; padded or re-cased variants stay unrecognized.
    pub fn from_label(label: &str) -> Self {
        match label {
            "System Rating Check" => Self::SystemRatingCheck,
            "Newly Installed Modules" => Self::NewlyInstalledModules,
            "Stated DC System Rating (kWDC)" => Self::StatedDcRating,
            "Expected kWDC Calculation" => Self::ExpectedDcCalculation,
            "Stated AC System Rating (kWAC)" => Self::StatedAcRating,
            "Efficiency" => Self::Efficiency,
            other => Self::Unrecognized(other.to_string()),
        }
    }

    /// Label shown next to the value in reports; unrecognized labels are not displayed.
    pub fn display_label(&self) -> Option<&'static str> {
        match self {
            Self::SystemRatingCheck => Some("System Rating Check"),
            Self::NewlyInstalledModules => Some("Newly Installed Modules"),
            Self::StatedDcRating => Some("Stated DC System Rating"),
            Self::ExpectedDcCalculation => Some("Calculated kWDC"),
            Self::StatedAcRating => Some("Stated AC System Rating"),
            Self::Efficiency => Some("Efficiency (%)"),
            Self::Unrecognized(_) => None,
        }
    }
}

/// Result of the DC/AC system-rating check.
///
/// Upstream returns either a labeled object, an `{ "error": .. }` object, or the
/// same object encoded as a JSON string; all three decode into this shape.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SystemRatingValidation {
    pub fields: BTreeMap<RatingField, String>,
    pub error: Option<String>,
    pub raw: Option<String>,
}

impl SystemRatingValidation {
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => Self::from_object(map),
            Value::String(text) => match serde_json::from_str::<Value>(strip_code_fence(&text)) {
                Ok(Value::Object(map)) => Self::from_object(map),
                _ => Self {
                    raw: Some(text),
                    ..Self::default()
                },
            },
            Value::Null => Self::default(),
            other => Self {
                raw: Some(other.to_string()),
                ..Self::default()
            },
        }
    }

    pub fn field(&self, field: &RatingField) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    fn from_object(map: Map<String, Value>) -> Self {
        let mut fields = BTreeMap::new();
        let mut error = None;

        for (label, value) in map {
            let Some(text) = value_text(&value) else {
                continue;
            };
            if label == "error" {
                error = Some(text);
            } else {
                fields.insert(RatingField::from_label(&label), text);
            }
        }

        Self {
            fields,
            error,
            raw: None,
        }
    }
}

impl<'de> Deserialize<'de> for SystemRatingValidation {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer).map(Self::from_value)
    }
}

/// Whether the governing codes cited on the plan set are right for the AHJ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum AhjVerdict {
    Yes,
    No,
    #[default]
    Uncertain,
}

impl AhjVerdict {
    /// Anything other than yes/no is treated as uncertain.
    pub fn from_label(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "yes" => Self::Yes,
            "no" => Self::No,
            _ => Self::Uncertain,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Yes => "Yes",
            Self::No => "No",
            Self::Uncertain => "Uncertain",
        }
    }
}

impl<'de> Deserialize<'de> for AhjVerdict {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().map(Self::from_label).unwrap_or_default())
    }
}

/// Authority Having Jurisdiction code check.
///
/// `code_mentions` and `sources` are only present when the narrative generator
/// returns them as structured fields; otherwise they are scraped from `details`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AhjValidation {
    #[serde(default, deserialize_with = "null_as_default")]
    pub details: String,
    #[serde(default)]
    pub is_correct: AhjVerdict,
    #[serde(default)]
    pub code_mentions: Option<Vec<String>>,
    #[serde(default)]
    pub sources: Option<Vec<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Geolocation check comparing plan-set maps against reference imagery.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocationValidation {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
    #[serde(default)]
    pub validation_results: Option<ValidationResults>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ValidationResults {
    #[serde(default, deserialize_with = "null_as_default")]
    pub map_validations: Vec<MatchSample>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub satellite_validations: Vec<MatchSample>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    Map,
    Satellite,
}

impl MatchKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Map => "Map",
            Self::Satellite => "Satellite",
        }
    }
}

/// One plan-set image compared against its reference image.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MatchSample {
    #[serde(default, deserialize_with = "null_as_default")]
    pub pdf_image: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub google_image: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub results: MatchResults,
}

impl MatchSample {
    /// The percent field that applies to this kind of comparison.
    pub fn match_percent(&self, kind: MatchKind) -> Option<&str> {
        match kind {
            MatchKind::Map => self.results.map_match.as_deref(),
            MatchKind::Satellite => self.results.satellite_match.as_deref(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MatchResults {
    #[serde(rename = "Map Match (%)", default, deserialize_with = "lenient_text")]
    pub map_match: Option<String>,
    #[serde(
        rename = "Satellite Match (%)",
        default,
        deserialize_with = "lenient_text"
    )]
    pub satellite_match: Option<String>,
    #[serde(rename = "Key Differences", default, deserialize_with = "lenient_text")]
    pub key_differences: Option<String>,
    #[serde(rename = "Key Similarities", default, deserialize_with = "lenient_text")]
    pub key_similarities: Option<String>,
    #[serde(rename = "Confidence", default, deserialize_with = "lenient_text")]
    pub confidence: Option<String>,
    #[serde(rename = "Conclusion", default, deserialize_with = "lenient_text")]
    pub conclusion: Option<String>,
}

impl MatchResults {
    /// Parses the line-oriented answer of the image-comparison step:
    ///
    /// ```text
    /// Map View Match: 85%
    /// Satellite View Match: 70%
    /// Confidence Level: High
    /// Conclusion: Street layout matches.
    /// ```
    ///
    /// The first line starting with a label wins and its value is whatever follows the last `:`.
    pub fn from_response_text(text: &str) -> Self {
        let lines: Vec<&str> = text.lines().collect();
        let lookup = |label: &str, default: &str| -> Option<String> {
            let label = label.to_lowercase();
            let value = lines
                .iter()
                .find(|line| line.to_lowercase().starts_with(&label))
                .copied()
                .map(|line| line.rsplit(':').next().unwrap_or(line).trim())
                .filter(|value| !value.is_empty())
                .unwrap_or(default);
            Some(value.to_string())
        };

        Self {
            map_match: lookup("Map View Match", "Unknown"),
            satellite_match: lookup("Satellite View Match", "Unknown"),
            key_differences: lookup("Key Differences", "Not provided"),
            key_similarities: lookup("Key Similarities", "Not provided"),
            confidence: lookup("Confidence Level", "Unknown"),
            conclusion: lookup("Conclusion", "Not provided"),
        }
    }
}

/// One spec row from the web cross-check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonRow {
    #[serde(rename = "Specification", default, deserialize_with = "null_as_default")]
    pub specification: String,
    #[serde(
        rename = "Extracted Data Value",
        default,
        deserialize_with = "lenient_text"
    )]
    pub extracted_value: Option<String>,
    #[serde(
        rename = "Validated Data from Search",
        default,
        deserialize_with = "lenient_text"
    )]
    pub validated_value: Option<String>,
    #[serde(rename = "Status", default, deserialize_with = "null_as_default")]
    pub status: String,
}

/// Web research summary used to cross-check spec values.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebData {
    #[serde(default, deserialize_with = "null_as_default")]
    pub summary: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub top_links: Vec<String>,
}

/// Display text for a JSON value; `null` and blank strings carry nothing.
pub(crate) fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) if text.trim().is_empty() => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(value_text))
}

/// `null` reads the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(body) = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
    else {
        return trimmed;
    };
    body.strip_suffix("```").unwrap_or(body).trim()
}
