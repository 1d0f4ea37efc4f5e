use crate::infra::{resolve_sample_images, AppState};
use axum::extract::DefaultBodyLimit;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use chrono::{DateTime, Utc};
use planset_qa::workflows::plan_review::{PlanReview, ReviewEngine, ValidationPayload};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

#[derive(Debug, Deserialize)]
pub(crate) struct ReviewRequest {
    #[serde(default)]
    pub(crate) file_name: Option<String>,
    #[serde(flatten)]
    pub(crate) payload: ValidationPayload,
}

#[derive(Debug, Serialize)]
pub(crate) struct ReviewResponse {
    pub(crate) evaluated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) file_name: Option<String>,
    #[serde(flatten)]
    pub(crate) review: PlanReview,
}

pub(crate) fn review_router(state: AppState, max_payload_bytes: usize) -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/reviews", post(review_endpoint))
        .layer(DefaultBodyLimit::max(max_payload_bytes))
        .layer(Extension(state))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn review_endpoint(
    Extension(state): Extension<AppState>,
    Json(request): Json<ReviewRequest>,
) -> Json<ReviewResponse> {
    let ReviewRequest { file_name, payload } = request;

    let mut review = ReviewEngine::new().review(&payload);
    resolve_sample_images(&mut review, &state.media);

    info!(
        file_name = file_name.as_deref().unwrap_or("unnamed"),
        achieved = review.score.achieved,
        band = review.score.band.label(),
        "served plan set review"
    );

    Json(ReviewResponse {
        evaluated_at: Utc::now(),
        file_name,
        review,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use planset_qa::config::MediaConfig;
    use serde_json::Value;
    use std::sync::atomic::AtomicBool;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn state(ready: bool) -> AppState {
        AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
            media: MediaConfig {
                uploads_base_url: "https://qa.example.com".to_string(),
            },
        }
    }

    fn router(ready: bool) -> Router {
        review_router(state(ready), 64 * 1024)
    }

    async fn read_json_body(response: axum::response::Response) -> Value {
        let body = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("read body");
        serde_json::from_slice(&body).expect("json payload")
    }

    fn review_request(body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/v1/reviews")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body).expect("serialize body")))
            .expect("request")
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let response = router(true)
            .oneshot(Request::get("/health").body(Body::empty()).expect("request"))
            .await
            .expect("router dispatch");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(read_json_body(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn readiness_is_unavailable_until_bound() {
        let response = router(false)
            .oneshot(Request::get("/ready").body(Body::empty()).expect("request"))
            .await
            .expect("router dispatch");

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(read_json_body(response).await["status"], "initializing");
    }

    #[tokio::test]
    async fn review_route_scores_payload_and_resolves_images() {
        let body = json!({
            "file_name": "Machuca, Naomi-1.pdf",
            "system_rating_validation": {
                "System Rating Check": "✅ System rating is correct: 8.010 kWDC"
            },
            "ahj_validation": {
                "details": "**2020 NEC** applies. Trusted sources for validation include: [https://www.nfpa.org]",
                "is_correct": "No"
            },
            "location_validation": {
                "success": true,
                "validation_results": {
                    "map_validations": [{
                        "pdf_image": "uploads/extracted_image_0.png",
                        "google_image": "uploads/google_map_view.png",
                        "results": { "Map Match (%)": "85%" }
                    }],
                    "satellite_validations": []
                }
            }
        });

        let response = router(true)
            .oneshot(review_request(body))
            .await
            .expect("router dispatch");

        assert_eq!(response.status(), StatusCode::OK);
        let payload = read_json_body(response).await;
        assert_eq!(payload["achieved"], 2);
        assert_eq!(payload["max"], 3);
        assert_eq!(payload["band"], "Warnings");
        assert_eq!(payload["file_name"], "Machuca, Naomi-1.pdf");
        assert!(payload["evaluated_at"].is_string());
        assert_eq!(payload["location"]["band"], "Passed");
        assert_eq!(
            payload["location"]["samples"][0]["pdf_image"],
            "https://qa.example.com/uploads/extracted_image_0.png"
        );
        assert_eq!(payload["ahj"]["code_mentions"][0], "2020 NEC");
        assert_eq!(payload["ahj"]["sources"][0], "https://www.nfpa.org");
    }

    #[tokio::test]
    async fn review_route_rejects_malformed_json() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/reviews")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{\"ahj_validation\": "))
            .expect("request");

        let response = router(true)
            .oneshot(request)
            .await
            .expect("router dispatch");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn review_endpoint_accepts_empty_payload() {
        let Json(body) = review_endpoint(
            Extension(state(true)),
            Json(ReviewRequest {
                file_name: None,
                payload: ValidationPayload::default(),
            }),
        )
        .await;

        assert_eq!(body.review.score.achieved, 1);
        assert!(body.file_name.is_none());
        assert!(body.review.location.is_none());
    }
}
