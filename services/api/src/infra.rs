use metrics_exporter_prometheus::PrometheusHandle;
use planset_qa::config::MediaConfig;
use planset_qa::workflows::plan_review::PlanReview;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) media: MediaConfig,
}

/// Maps an `uploads/`-relative image path to the URL it is served from.
pub(crate) fn resolve_upload_url(media: &MediaConfig, path: &str) -> String {
    let relative = path.trim_start_matches('/');
    let relative = relative.strip_prefix("uploads/").unwrap_or(relative);
    format!("{}/uploads/{}", media.uploads_base_url, relative)
}

/// Rewrites every comparison image path in the review into a fetchable URL.
pub(crate) fn resolve_sample_images(review: &mut PlanReview, media: &MediaConfig) {
    let Some(location) = review.location.as_mut() else {
        return;
    };

    for sample in &mut location.samples {
        sample.pdf_image = resolve_upload_url(media, &sample.pdf_image);
        sample.google_image = resolve_upload_url(media, &sample.google_image);
    }
}
