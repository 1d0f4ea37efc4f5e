use serde_json::{json, Value};

use crate::workflows::plan_review::{
    AhjValidation, AhjVerdict, LocationValidation, MatchResults, MatchSample, ReviewEngine,
    SystemRatingValidation, ValidationPayload, ValidationResults,
};

pub(super) fn map_sample(percent: &str) -> MatchSample {
    MatchSample {
        pdf_image: "uploads/extracted_image_0.png".to_string(),
        google_image: "uploads/google_map_view.png".to_string(),
        results: MatchResults {
            map_match: Some(percent.to_string()),
            satellite_match: Some("Unknown".to_string()),
            confidence: Some("High".to_string()),
            conclusion: Some("Street grid lines up with the site plan.".to_string()),
            ..MatchResults::default()
        },
    }
}

pub(super) fn satellite_sample(percent: &str) -> MatchSample {
    MatchSample {
        pdf_image: "uploads/extracted_image_1.jpeg".to_string(),
        google_image: "uploads/google_satellite_view.png".to_string(),
        results: MatchResults {
            map_match: Some("Unknown".to_string()),
            satellite_match: Some(percent.to_string()),
            confidence: Some("Medium".to_string()),
            conclusion: Some("Roof outline is consistent.".to_string()),
            ..MatchResults::default()
        },
    }
}

pub(super) fn location(map: &[&str], satellite: &[&str]) -> LocationValidation {
    LocationValidation {
        success: true,
        error: None,
        address: Some("3312 DELANA WAY, ALVA, FL 33920, USA".to_string()),
        coordinates: None,
        validation_results: Some(ValidationResults {
            map_validations: map.iter().map(|percent| map_sample(percent)).collect(),
            satellite_validations: satellite
                .iter()
                .map(|percent| satellite_sample(percent))
                .collect(),
        }),
    }
}

pub(super) fn failed_location(error: Option<&str>) -> LocationValidation {
    LocationValidation {
        success: false,
        error: error.map(str::to_string),
        ..location(&["95%"], &["92%"])
    }
}

pub(super) fn rating_check(check: &str) -> SystemRatingValidation {
    SystemRatingValidation::from_value(json!({
        "System Rating Check": check,
        "Newly Installed Modules": "18",
        "Stated DC System Rating (kWDC)": "8.010 kWDC",
        "Expected kWDC Calculation": "(18 x 445) / 1000 = 8.010 kWDC",
        "Stated AC System Rating (kWAC)": "7.600 kWAC",
        "Efficiency": "94.88%"
    }))
}

pub(super) fn ahj(verdict: AhjVerdict) -> AhjValidation {
    AhjValidation {
        details: ahj_narrative().to_string(),
        is_correct: verdict,
        code_mentions: None,
        sources: None,
    }
}

pub(super) fn ahj_narrative() -> &'static str {
    "The plan set cites **2020 NEC** and **2023 Florida Building Code**[1], which the \
Lee County AHJ currently enforces[2]. The **2020 NEC** rapid shutdown rules apply. \
Trusted sources for validation include: [https://www.leegov.com/dcd] and \
[https://floridabuilding.org]."
}

pub(super) fn payload(
    rating: Option<SystemRatingValidation>,
    ahj: Option<AhjValidation>,
    location: Option<LocationValidation>,
) -> ValidationPayload {
    ValidationPayload {
        system_rating_validation: rating,
        ahj_validation: ahj,
        location_validation: location,
        ..ValidationPayload::default()
    }
}

pub(super) fn decode(value: Value) -> ValidationPayload {
    serde_json::from_value(value).expect("payload decodes")
}

pub(super) fn engine() -> ReviewEngine {
    ReviewEngine::new()
}
