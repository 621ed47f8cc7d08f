use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, put},
    Router,
};
use serde_json::json;
use tracing::{error, warn};

use super::service::{MediaError, MediaService};
use super::storage::{Bucket, ObjectStorage};
use crate::profiles::Identity;

/// Upload endpoint for signed-in members plus public reads of stored objects.
pub fn media_router<S>(service: Arc<MediaService<S>>) -> Router
where
    S: ObjectStorage + 'static,
{
    let limit = DefaultBodyLimit::max(service.max_upload_bytes());
    Router::new()
        .route(
            "/api/v1/media/:bucket/:file",
            put(upload_handler::<S>).layer(limit),
        )
        .route("/media/:bucket/*path", get(fetch_handler::<S>))
        .with_state(service)
}

fn parse_bucket(raw: &str) -> Result<Bucket, Response> {
    raw.parse::<Bucket>().map_err(|err| {
        (
            StatusCode::NOT_FOUND,
            axum::Json(json!({ "error": err.to_string() })),
        )
            .into_response()
    })
}

pub(crate) async fn upload_handler<S>(
    State(service): State<Arc<MediaService<S>>>,
    identity: Identity,
    Path((bucket, file)): Path<(String, String)>,
    body: Bytes,
) -> Response
where
    S: ObjectStorage + 'static,
{
    let bucket = match parse_bucket(&bucket) {
        Ok(bucket) => bucket,
        Err(response) => return response,
    };
    match service.upload(&identity.user_id, bucket, &file, body.to_vec()) {
        Ok(receipt) => (StatusCode::CREATED, axum::Json(receipt)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn fetch_handler<S>(
    State(service): State<Arc<MediaService<S>>>,
    Path((bucket, path)): Path<(String, String)>,
) -> Response
where
    S: ObjectStorage + 'static,
{
    let bucket = match parse_bucket(&bucket) {
        Ok(bucket) => bucket,
        Err(response) => return response,
    };
    match service.fetch(bucket, &path) {
        Ok(object) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, object.content_type)],
            object.bytes,
        )
            .into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) fn error_response(err: MediaError) -> Response {
    let status = match &err {
        MediaError::Empty | MediaError::InvalidName(_) => StatusCode::BAD_REQUEST,
        MediaError::TooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
        MediaError::UnsupportedType { .. } => {
            warn!(error = %err, "rejected upload");
            StatusCode::UNSUPPORTED_MEDIA_TYPE
        }
        MediaError::NotFound(_) => StatusCode::NOT_FOUND,
        MediaError::Storage(_) => {
            error!(error = %err, "object storage failure");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (status, axum::Json(json!({ "error": err.to_string() }))).into_response()
}
