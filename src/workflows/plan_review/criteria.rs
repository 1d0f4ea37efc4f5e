use super::payload::{AhjValidation, AhjVerdict, RatingField, SystemRatingValidation};

const DISCREPANCY_TOKEN: &str = "discrepancy";

/// Outcome of the system-rating consistency check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RatingAssessment {
    pub discrepancy: bool,
}

impl RatingAssessment {
    pub const fn passed(self) -> bool {
        !self.discrepancy
    }

    pub const fn progress(self) -> u8 {
        if self.discrepancy {
            0
        } else {
            100
        }
    }

    pub const fn label(self) -> &'static str {
        if self.discrepancy {
            "Failed"
        } else {
            "Passed"
        }
    }
}

/// Flags a discrepancy when the "System Rating Check" value mentions one.
///
/// Only that label decides; the stated and calculated ratings are informational.
pub fn assess_rating(rating: &SystemRatingValidation) -> RatingAssessment {
    let discrepancy = rating.fields.iter().any(|(field, value)| match field {
        RatingField::SystemRatingCheck => value.to_lowercase().contains(DISCREPANCY_TOKEN),
        RatingField::NewlyInstalledModules
        | RatingField::StatedDcRating
        | RatingField::ExpectedDcCalculation
        | RatingField::StatedAcRating
        | RatingField::Efficiency
        | RatingField::Unrecognized(_) => false,
    });

    RatingAssessment { discrepancy }
}

/// Outcome of the AHJ governing-code check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AhjAssessment {
    pub verdict: AhjVerdict,
    /// Position on the 0-100 display scale.
    pub progress: u8,
    /// Whether the check earns its point; uncertainty is not credited.
    pub credited: bool,
}

pub fn assess_ahj(ahj: &AhjValidation) -> AhjAssessment {
    let (progress, credited) = match ahj.is_correct {
        AhjVerdict::Yes => (100, true),
        AhjVerdict::No => (0, false),
        AhjVerdict::Uncertain => (50, false),
    };

    AhjAssessment {
        verdict: ahj.is_correct,
        progress,
        credited,
    }
}
