use super::payload::{LocationValidation, MatchKind, MatchSample};
use super::percent::parse_percentage;
use serde::Serialize;
use tracing::debug;

/// Display cut-off for a location match considered verified.
pub const LOCATION_PASSED_THRESHOLD: f64 = 80.0;
/// Display cut-off below which a location match is reported as failed.
pub const LOCATION_WARNING_THRESHOLD: f64 = 50.0;

/// Display band for the pooled location match score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LocationBand {
    Passed,
    Warning,
    Failed,
    /// The geolocation step itself failed upstream; samples were not consulted.
    Error,
}

impl LocationBand {
    pub fn from_average(average: f64) -> Self {
        if average >= LOCATION_PASSED_THRESHOLD {
            Self::Passed
        } else if average >= LOCATION_WARNING_THRESHOLD {
            Self::Warning
        } else {
            Self::Failed
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Passed => "Passed",
            Self::Warning => "Warning",
            Self::Failed => "Failed",
            Self::Error => "Error",
        }
    }
}

/// Pooled outcome of every map and satellite comparison.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocationMatch {
    pub average: f64,
    pub band: LocationBand,
    pub counted: usize,
    pub excluded: usize,
}

impl LocationMatch {
    fn upstream_failure() -> Self {
        Self {
            average: 0.0,
            band: LocationBand::Error,
            counted: 0,
            excluded: 0,
        }
    }
}

/// Averages every parseable percentage across both sample lists, unweighted by kind.
///
/// Unparseable or missing percentages are excluded rather than counted as zero; an
/// empty pool averages to 0.
pub fn aggregate_samples(map: &[MatchSample], satellite: &[MatchSample]) -> LocationMatch {
    let tagged = map
        .iter()
        .map(|sample| (MatchKind::Map, sample))
        .chain(satellite.iter().map(|sample| (MatchKind::Satellite, sample)));

    let mut total = 0.0;
    let mut counted = 0usize;
    let mut excluded = 0usize;

    for (kind, sample) in tagged {
        match sample.match_percent(kind).and_then(parse_percentage) {
            Some(percent) => {
                total += percent;
                counted += 1;
            }
            None => {
                debug!(
                    kind = kind.label(),
                    pdf_image = %sample.pdf_image,
                    raw = ?sample.match_percent(kind),
                    "excluding location sample without a readable match percentage"
                );
                excluded += 1;
            }
        }
    }

    let average = if counted > 0 {
        total / counted as f64
    } else {
        0.0
    };

    LocationMatch {
        average,
        band: LocationBand::from_average(average),
        counted,
        excluded,
    }
}

/// Scores a location record; an upstream failure short-circuits to [`LocationBand::Error`].
pub fn assess_location(location: &LocationValidation) -> LocationMatch {
    if !location.success {
        debug!(
            error = location.error.as_deref().unwrap_or_default(),
            "location validation failed upstream"
        );
        return LocationMatch::upstream_failure();
    }

    match &location.validation_results {
        Some(results) => aggregate_samples(
            &results.map_validations,
            &results.satellite_validations,
        ),
        None => aggregate_samples(&[], &[]),
    }
}
