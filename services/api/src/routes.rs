use crate::infra::{Adapters, AppState};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::{Extension, Json, Router};
use launchpad::config::AppConfig;
use launchpad::dashboard::{dashboard_router, DashboardService};
use launchpad::directory::{directory_router, DirectoryService};
use launchpad::media::{media_router, MediaService};
use launchpad::profiles::Sessions;
use launchpad::workflows::approval::{approval_router, ApprovalService};
use launchpad::workflows::registration::{registration_router, RegistrationService};
use serde_json::json;
use std::sync::Arc;

/// Every feature router merged with the operational endpoints.
pub(crate) fn build_router(config: &AppConfig, adapters: &Adapters, sessions: Sessions) -> Router {
    let registration =
        RegistrationService::new(adapters.profiles.clone(), adapters.drafts.clone());
    let approval = ApprovalService::new(adapters.profiles.clone(), adapters.notifier.clone());
    let directory = DirectoryService::new(adapters.profiles.clone(), config.directory.page_size);
    let dashboard = DashboardService::new(adapters.profiles.clone());
    let media = MediaService::new(adapters.storage.clone(), config.media.max_upload_bytes);

    Router::new()
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .merge(registration_router(Arc::new(registration)))
        .merge(approval_router(Arc::new(approval)))
        .merge(directory_router(Arc::new(directory)))
        .merge(dashboard_router(Arc::new(dashboard)))
        .merge(media_router(Arc::new(media)))
        .layer(Extension(sessions))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    if ready {
        (StatusCode::OK, Json(json!({ "status": "ready" })))
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "initializing" })),
        )
    }
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
