use std::sync::Arc;

use axum::{
    extract::{Path, RawQuery, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde_json::json;
use tracing::error;

use super::query::DirectoryQuery;
use super::service::{DirectoryError, DirectoryService};
use crate::profiles::{EntityKind, ProfileId, ProfileRepository, RepositoryError};

/// Router builder exposing the public directory endpoints.
pub fn directory_router<R>(service: Arc<DirectoryService<R>>) -> Router
where
    R: ProfileRepository + 'static,
{
    Router::new()
        .route("/api/v1/directory/startups", get(startups_handler::<R>))
        .route(
            "/api/v1/directory/startups/export",
            get(export_startups_handler::<R>),
        )
        .route("/api/v1/directory/incubators", get(incubators_handler::<R>))
        .route(
            "/api/v1/directory/incubators/export",
            get(export_incubators_handler::<R>),
        )
        .route("/api/v1/profiles/:id", get(profile_handler::<R>))
        .with_state(service)
}

fn parse_query(raw: Option<String>) -> DirectoryQuery {
    DirectoryQuery::from_query_string(raw.as_deref().unwrap_or_default())
}

pub(crate) async fn startups_handler<R>(
    State(service): State<Arc<DirectoryService<R>>>,
    RawQuery(raw): RawQuery,
) -> Response
where
    R: ProfileRepository + 'static,
{
    match service.startups(&parse_query(raw)) {
        Ok(page) => (StatusCode::OK, axum::Json(page)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn incubators_handler<R>(
    State(service): State<Arc<DirectoryService<R>>>,
    RawQuery(raw): RawQuery,
) -> Response
where
    R: ProfileRepository + 'static,
{
    match service.incubators(&parse_query(raw)) {
        Ok(page) => (StatusCode::OK, axum::Json(page)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn export_startups_handler<R>(
    State(service): State<Arc<DirectoryService<R>>>,
    RawQuery(raw): RawQuery,
) -> Response
where
    R: ProfileRepository + 'static,
{
    export(&service, EntityKind::Startup, raw)
}

pub(crate) async fn export_incubators_handler<R>(
    State(service): State<Arc<DirectoryService<R>>>,
    RawQuery(raw): RawQuery,
) -> Response
where
    R: ProfileRepository + 'static,
{
    export(&service, EntityKind::Incubator, raw)
}

fn export<R>(service: &DirectoryService<R>, kind: EntityKind, raw: Option<String>) -> Response
where
    R: ProfileRepository + 'static,
{
    match service.export(kind, &parse_query(raw)) {
        Ok(body) => {
            let disposition = format!("attachment; filename=\"{}s.csv\"", kind.label());
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                body,
            )
                .into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn profile_handler<R>(
    State(service): State<Arc<DirectoryService<R>>>,
    Path(id): Path<String>,
) -> Response
where
    R: ProfileRepository + 'static,
{
    match service.profile(&ProfileId(id)) {
        Ok(profile) => (StatusCode::OK, axum::Json(profile)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) fn error_response(err: DirectoryError) -> Response {
    let status = match &err {
        DirectoryError::NotFound(_)
        | DirectoryError::NotListed(_)
        | DirectoryError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        DirectoryError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        DirectoryError::Export(_) | DirectoryError::Repository(RepositoryError::Unavailable(_)) => {
            error!(error = %err, "directory read failure");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (status, axum::Json(json!({ "error": err.to_string() }))).into_response()
}
