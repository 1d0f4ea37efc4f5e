use serde::Serialize;

/// Number of criteria a plan set is judged on: rating, AHJ and location.
pub const MAX_SCORE: u8 = 3;

/// Average location match needed for the location point.
///
/// Deliberately lower than the 80-point display cut-off used for the location band.
pub const LOCATION_SCORING_THRESHOLD: f64 = 70.0;

/// Percentage needed for [`ScoreBand::Warnings`].
pub const WARNINGS_THRESHOLD: f64 = 66.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Criterion {
    SystemRating,
    AhjCodes,
    Location,
}

impl Criterion {
    pub const fn label(self) -> &'static str {
        match self {
            Self::SystemRating => "System Rating",
            Self::AhjCodes => "AHJ Codes",
            Self::Location => "Location",
        }
    }
}

/// Consolidated status band for a whole plan set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScoreBand {
    Passed,
    Warnings,
    Failed,
}

impl ScoreBand {
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage == 100.0 {
            Self::Passed
        } else if percentage >= WARNINGS_THRESHOLD {
            Self::Warnings
        } else {
            Self::Failed
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Passed => "Passed",
            Self::Warnings => "Warnings",
            Self::Failed => "Failed",
        }
    }
}

/// Per-criterion inputs to the aggregate score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CriterionOutcomes {
    pub rating_passed: bool,
    pub ahj_credited: bool,
    /// Pooled location match; 0 when the check failed upstream or was not run.
    pub location_average: f64,
}

/// One criterion's contribution, kept so a report can explain the total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CriterionScore {
    pub criterion: Criterion,
    pub points: u8,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateScore {
    pub achieved: u8,
    pub max: u8,
    pub percentage: f64,
    pub band: ScoreBand,
}

/// Each criterion contributes at most one point against the fixed denominator.
pub fn score_criteria(outcomes: &CriterionOutcomes) -> (AggregateScore, Vec<CriterionScore>) {
    let location_passed = outcomes.location_average >= LOCATION_SCORING_THRESHOLD;

    let components = vec![
        CriterionScore {
            criterion: Criterion::SystemRating,
            points: u8::from(outcomes.rating_passed),
            notes: if outcomes.rating_passed {
                "no system rating discrepancy reported".to_string()
            } else {
                "system rating discrepancy reported".to_string()
            },
        },
        CriterionScore {
            criterion: Criterion::AhjCodes,
            points: u8::from(outcomes.ahj_credited),
            notes: if outcomes.ahj_credited {
                "governing codes confirmed for the AHJ".to_string()
            } else {
                "governing codes not confirmed for the AHJ".to_string()
            },
        },
        CriterionScore {
            criterion: Criterion::Location,
            points: u8::from(location_passed),
            notes: format!(
                "average location match {:.1}% against threshold {:.0}%",
                outcomes.location_average, LOCATION_SCORING_THRESHOLD
            ),
        },
    ];

    let achieved: u8 = components.iter().map(|component| component.points).sum();
    let percentage = f64::from(achieved) / f64::from(MAX_SCORE) * 100.0;

    let score = AggregateScore {
        achieved,
        max: MAX_SCORE,
        percentage,
        band: ScoreBand::from_percentage(percentage),
    };

    (score, components)
}
