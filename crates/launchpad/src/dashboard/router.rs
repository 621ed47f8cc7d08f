use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde_json::json;
use tracing::error;

use super::service::{DashboardError, DashboardService};
use crate::profiles::{Identity, ProfileRepository};

pub fn dashboard_router<R>(service: Arc<DashboardService<R>>) -> Router
where
    R: ProfileRepository + 'static,
{
    Router::new()
        .route("/api/v1/me/profiles", get(my_profiles_handler::<R>))
        .with_state(service)
}

pub(crate) async fn my_profiles_handler<R>(
    State(service): State<Arc<DashboardService<R>>>,
    identity: Identity,
) -> Response
where
    R: ProfileRepository + 'static,
{
    match service.for_owner(&identity.user_id) {
        Ok(dashboard) => (StatusCode::OK, axum::Json(dashboard)).into_response(),
        Err(err) => {
            error!(error = %err, user = %identity.user_id, "dashboard read failure");
            error_response(err)
        }
    }
}

pub(crate) fn error_response(err: DashboardError) -> Response {
    let payload = json!({ "error": err.to_string() });
    (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
}
