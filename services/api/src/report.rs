use crate::routes::ReviewResponse;
use chrono::Utc;
use clap::Args;
use planset_qa::error::AppError;
use planset_qa::workflows::plan_review::{
    AhjView, ComparisonReport, ExtractedData, LocationBand, LocationView, PlanReview, RatingView,
    ReviewEngine, ScoreBand, ValidationPayload,
};
use std::fmt::{self, Write};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct ReviewArgs {
    /// JSON validation payload produced by the extraction pipeline
    pub(crate) payload: PathBuf,
    /// Print the review as JSON instead of a text report
    #[arg(long)]
    pub(crate) json: bool,
    /// Plan-set file name shown in the report (defaults to the payload file name)
    #[arg(long)]
    pub(crate) file_name: Option<String>,
}

pub(crate) fn run_review(args: ReviewArgs) -> Result<(), AppError> {
    let ReviewArgs {
        payload,
        json,
        file_name,
    } = args;

    let file_name = file_name.or_else(|| {
        payload
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
    });
    let validation = ValidationPayload::from_path(&payload)?;
    let review = ReviewEngine::new().review(&validation);

    if json {
        let response = ReviewResponse {
            evaluated_at: Utc::now(),
            file_name,
            review,
        };
        let rendered = serde_json::to_string_pretty(&response).map_err(AppError::Render)?;
        println!("{rendered}");
    } else {
        print!("{}", render_review(&review, file_name.as_deref()));
    }

    Ok(())
}

fn status_badge(band: ScoreBand) -> &'static str {
    match band {
        ScoreBand::Passed => "[PASSED]",
        ScoreBand::Warnings => "[WARNINGS]",
        ScoreBand::Failed => "[FAILED]",
    }
}

pub(crate) fn render_review(review: &PlanReview, file_name: Option<&str>) -> String {
    let mut out = String::new();
    write_review(&mut out, review, file_name).expect("write review report");
    out
}

fn write_review(out: &mut impl Write, review: &PlanReview, file_name: Option<&str>) -> fmt::Result {
    let score = &review.score;

    writeln!(out, "Plan set validation results")?;
    writeln!(out, "File: {}", file_name.unwrap_or("Unnamed File"))?;
    writeln!(
        out,
        "{} {}/{} ({:.0}%)",
        status_badge(score.band),
        score.achieved,
        score.max,
        score.percentage
    )?;

    writeln!(out, "\nCriteria")?;
    for component in &review.criteria {
        writeln!(
            out,
            "- {}: {} point(s), {}",
            component.criterion.label(),
            component.points,
            component.notes
        )?;
    }

    if let Some(project) = &review.project {
        write_project(out, project)?;
    }
    if let Some(rating) = &review.rating {
        write_rating(out, rating)?;
    }
    if let Some(ahj) = &review.ahj {
        write_ahj(out, ahj)?;
    }
    if let Some(location) = &review.location {
        write_location(out, location)?;
    }
    if let Some(comparisons) = &review.comparisons {
        write_comparisons(out, comparisons)?;
    }

    Ok(())
}

fn write_project(out: &mut impl Write, project: &ExtractedData) -> fmt::Result {
    writeln!(out, "\nProject information")?;
    writeln!(
        out,
        "- Company: {} ({})",
        project.company_name.as_deref().unwrap_or("Not found"),
        project
            .company_address
            .as_deref()
            .unwrap_or("Address not found")
    )?;
    writeln!(
        out,
        "- Project: {} ({})",
        project.project_name.as_deref().unwrap_or("Not found"),
        project
            .project_address
            .as_deref()
            .unwrap_or("Address not found")
    )?;
    writeln!(
        out,
        "- Contact: {} / {}",
        project.email_id.as_deref().unwrap_or("No email found"),
        project.phone_number.as_deref().unwrap_or("No phone found")
    )?;
    writeln!(
        out,
        "- System size: DC {} / AC {}",
        project.dc_system_size.as_deref().unwrap_or("Not specified"),
        project.ac_system_size.as_deref().unwrap_or("Not specified")
    )
}

fn write_rating(out: &mut impl Write, rating: &RatingView) -> fmt::Result {
    writeln!(out, "\nSystem rating validation: {}", rating.status)?;
    for detail in &rating.details {
        writeln!(out, "- {}: {}", detail.label, detail.value)?;
    }
    if let Some(error) = &rating.error {
        writeln!(out, "- Error: {error}")?;
    }
    Ok(())
}

fn write_ahj(out: &mut impl Write, ahj: &AhjView) -> fmt::Result {
    writeln!(out, "\nAHJ code validation: {}", ahj.is_correct.label())?;
    if ahj.code_mentions.is_empty() {
        writeln!(out, "Mentioned governing codes: none")?;
    } else {
        writeln!(out, "Mentioned governing codes")?;
        for code in &ahj.code_mentions {
            writeln!(out, "- {code}")?;
        }
    }
    if !ahj.summary.is_empty() {
        writeln!(out, "Summary: {}", ahj.summary)?;
    }
    for source in &ahj.sources {
        writeln!(out, "- Source: {source}")?;
    }
    Ok(())
}

fn write_location(out: &mut impl Write, location: &LocationView) -> fmt::Result {
    if location.band == LocationBand::Error {
        writeln!(out, "\nLocation validation: Error")?;
        return writeln!(
            out,
            "{}",
            location
                .error
                .as_deref()
                .unwrap_or("Failed to validate location")
        );
    }

    writeln!(
        out,
        "\nLocation validation: {} (average match {:.1}%)",
        location.band.label(),
        location.average
    )?;
    writeln!(
        out,
        "Extracted address: {}",
        location.address.as_deref().unwrap_or("Not found")
    )?;
    if let Some(coordinates) = &location.coordinates {
        writeln!(
            out,
            "Coordinates: {:.6}, {:.6}",
            coordinates.latitude, coordinates.longitude
        )?;
    }
    for sample in &location.samples {
        writeln!(
            out,
            "- {} comparison #{}: {} (confidence {}) {}",
            sample.kind.label(),
            sample.index,
            sample.match_percent.as_deref().unwrap_or("Unknown"),
            sample.confidence.as_deref().unwrap_or("Unknown"),
            sample.conclusion.as_deref().unwrap_or_default()
        )?;
    }
    Ok(())
}

fn write_comparisons(out: &mut impl Write, comparisons: &ComparisonReport) -> fmt::Result {
    writeln!(
        out,
        "\nSpecification comparison: {}/{} matched",
        comparisons.matched(),
        comparisons.total()
    )?;
    for (category, tally) in &comparisons.categories {
        writeln!(out, "- {category}: {}/{}", tally.matched, tally.total)?;
    }
    for link in &comparisons.reference_links {
        writeln!(out, "- Reference: {link}")?;
    }
    Ok(())
}
