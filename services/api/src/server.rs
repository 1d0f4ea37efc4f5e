use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::review_router;
use axum_prometheus::PrometheusMetricLayer;
use planset_qa::config::AppConfig;
use planset_qa::error::AppError;
use planset_qa::telemetry;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        media: config.media.clone(),
    };

    let app = review_router(app_state, config.server.max_payload_bytes).layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "plan set review service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
