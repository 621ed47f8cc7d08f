use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;
use tracing::error;

use super::notifier::ReviewNotifier;
use super::service::{ApprovalError, ApprovalService, QueueFilter};
use super::transition::ReviewAction;
use crate::profiles::{AdminIdentity, ProfileId, ProfileRepository, RepositoryError};

/// Router builder exposing the admin moderation endpoints.
pub fn approval_router<R, N>(service: Arc<ApprovalService<R, N>>) -> Router
where
    R: ProfileRepository + 'static,
    N: ReviewNotifier + 'static,
{
    Router::new()
        .route("/api/v1/admin/profiles", get(queue_handler::<R, N>))
        .route(
            "/api/v1/admin/profiles/:id/review",
            post(review_handler::<R, N>),
        )
        .route(
            "/api/v1/admin/profiles/:id/history",
            get(history_handler::<R, N>),
        )
        .with_state(service)
}

pub(crate) async fn queue_handler<R, N>(
    State(service): State<Arc<ApprovalService<R, N>>>,
    _admin: AdminIdentity,
    Query(filter): Query<QueueFilter>,
) -> Response
where
    R: ProfileRepository + 'static,
    N: ReviewNotifier + 'static,
{
    match service.queue(&filter) {
        Ok(records) => {
            let payload = json!({ "total": records.len(), "profiles": records });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn review_handler<R, N>(
    State(service): State<Arc<ApprovalService<R, N>>>,
    AdminIdentity(admin): AdminIdentity,
    Path(id): Path<String>,
    axum::Json(action): axum::Json<ReviewAction>,
) -> Response
where
    R: ProfileRepository + 'static,
    N: ReviewNotifier + 'static,
{
    match service.review(&admin, &ProfileId(id), action) {
        Ok(record) => (StatusCode::OK, axum::Json(record)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn history_handler<R, N>(
    State(service): State<Arc<ApprovalService<R, N>>>,
    _admin: AdminIdentity,
    Path(id): Path<String>,
) -> Response
where
    R: ProfileRepository + 'static,
    N: ReviewNotifier + 'static,
{
    match service.history(&ProfileId(id)) {
        Ok(events) => (StatusCode::OK, axum::Json(events)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) fn error_response(err: ApprovalError) -> Response {
    let status = match &err {
        ApprovalError::Transition(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ApprovalError::NotFound(_) | ApprovalError::Repository(RepositoryError::NotFound) => {
            StatusCode::NOT_FOUND
        }
        ApprovalError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        ApprovalError::Repository(RepositoryError::Unavailable(_)) => {
            error!(error = %err, "approval storage failure");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (status, axum::Json(json!({ "error": err.to_string() }))).into_response()
}
