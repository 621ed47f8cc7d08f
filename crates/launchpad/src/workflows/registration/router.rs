use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;
use tracing::{error, warn};

use super::catalog::definition;
use super::draft::{DraftProgress, WizardDraft, WizardError};
use super::repository::DraftStore;
use super::service::{DraftPatch, RegistrationError, RegistrationService};
use crate::profiles::{EntityKind, Identity, ProfileId, ProfileRepository, RepositoryError};

/// Router builder exposing the wizard endpoints.
pub fn registration_router<R, D>(service: Arc<RegistrationService<R, D>>) -> Router
where
    R: ProfileRepository + 'static,
    D: DraftStore + 'static,
{
    Router::new()
        .route("/api/v1/wizard/:kind", get(definition_handler))
        .route(
            "/api/v1/wizard/:kind/draft",
            get(draft_handler::<R, D>)
                .put(update_handler::<R, D>)
                .delete(discard_handler::<R, D>),
        )
        .route("/api/v1/wizard/:kind/draft/next", post(next_handler::<R, D>))
        .route("/api/v1/wizard/:kind/draft/back", post(back_handler::<R, D>))
        .route("/api/v1/wizard/:kind/submit", post(submit_handler::<R, D>))
        .route("/api/v1/profiles/:id/edit", post(edit_handler::<R, D>))
        .with_state(service)
}

fn parse_kind(raw: &str) -> Result<EntityKind, Response> {
    raw.parse::<EntityKind>().map_err(|err| {
        (
            StatusCode::NOT_FOUND,
            axum::Json(json!({ "error": err.to_string() })),
        )
            .into_response()
    })
}

fn progress(draft: &WizardDraft) -> Response {
    let view = DraftProgress::new(draft, definition(draft.kind));
    (StatusCode::OK, axum::Json(view)).into_response()
}

pub(crate) async fn definition_handler(Path(kind): Path<String>) -> Response {
    match parse_kind(&kind) {
        Ok(kind) => (StatusCode::OK, axum::Json(definition(kind))).into_response(),
        Err(response) => response,
    }
}

pub(crate) async fn draft_handler<R, D>(
    State(service): State<Arc<RegistrationService<R, D>>>,
    identity: Identity,
    Path(kind): Path<String>,
) -> Response
where
    R: ProfileRepository + 'static,
    D: DraftStore + 'static,
{
    let kind = match parse_kind(&kind) {
        Ok(kind) => kind,
        Err(response) => return response,
    };
    match service.draft(&identity.user_id, kind) {
        Ok(draft) => progress(&draft),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn update_handler<R, D>(
    State(service): State<Arc<RegistrationService<R, D>>>,
    identity: Identity,
    Path(kind): Path<String>,
    axum::Json(patch): axum::Json<DraftPatch>,
) -> Response
where
    R: ProfileRepository + 'static,
    D: DraftStore + 'static,
{
    let kind = match parse_kind(&kind) {
        Ok(kind) => kind,
        Err(response) => return response,
    };
    match service.update_draft(&identity.user_id, kind, patch) {
        Ok(draft) => progress(&draft),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn discard_handler<R, D>(
    State(service): State<Arc<RegistrationService<R, D>>>,
    identity: Identity,
    Path(kind): Path<String>,
) -> Response
where
    R: ProfileRepository + 'static,
    D: DraftStore + 'static,
{
    let kind = match parse_kind(&kind) {
        Ok(kind) => kind,
        Err(response) => return response,
    };
    match service.discard(&identity.user_id, kind) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn next_handler<R, D>(
    State(service): State<Arc<RegistrationService<R, D>>>,
    identity: Identity,
    Path(kind): Path<String>,
) -> Response
where
    R: ProfileRepository + 'static,
    D: DraftStore + 'static,
{
    let kind = match parse_kind(&kind) {
        Ok(kind) => kind,
        Err(response) => return response,
    };
    match service.next(&identity.user_id, kind) {
        Ok(draft) => progress(&draft),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn back_handler<R, D>(
    State(service): State<Arc<RegistrationService<R, D>>>,
    identity: Identity,
    Path(kind): Path<String>,
) -> Response
where
    R: ProfileRepository + 'static,
    D: DraftStore + 'static,
{
    let kind = match parse_kind(&kind) {
        Ok(kind) => kind,
        Err(response) => return response,
    };
    match service.back(&identity.user_id, kind) {
        Ok(draft) => progress(&draft),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn submit_handler<R, D>(
    State(service): State<Arc<RegistrationService<R, D>>>,
    identity: Identity,
    Path(kind): Path<String>,
) -> Response
where
    R: ProfileRepository + 'static,
    D: DraftStore + 'static,
{
    let kind = match parse_kind(&kind) {
        Ok(kind) => kind,
        Err(response) => return response,
    };
    match service.submit(&identity.user_id, kind) {
        Ok(record) => {
            let payload = json!({
                "id": record.id,
                "kind": record.kind,
                "status": record.status.label(),
                "updated_at": record.updated_at,
            });
            (StatusCode::ACCEPTED, axum::Json(payload)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn edit_handler<R, D>(
    State(service): State<Arc<RegistrationService<R, D>>>,
    identity: Identity,
    Path(id): Path<String>,
) -> Response
where
    R: ProfileRepository + 'static,
    D: DraftStore + 'static,
{
    match service.edit(&identity.user_id, &ProfileId(id)) {
        Ok(draft) => progress(&draft),
        Err(err) => error_response(err),
    }
}

pub(crate) fn error_response(err: RegistrationError) -> Response {
    match err {
        RegistrationError::Wizard(WizardError::StepIncomplete { step, issues }) => {
            let payload = json!({
                "error": format!("complete the '{step}' step before continuing"),
                "step": step,
                "issues": issues,
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        RegistrationError::Incomplete { first_step, issues } => {
            let payload = json!({
                "error": "profile is incomplete",
                "first_step": first_step,
                "issues": issues,
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        RegistrationError::Wizard(other) => {
            let payload = json!({ "error": other.to_string() });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        RegistrationError::UnknownIncubator(_) | RegistrationError::KindMismatch { .. } => {
            let payload = json!({ "error": err.to_string() });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        RegistrationError::NoDraft(_)
        | RegistrationError::NotFound(_)
        | RegistrationError::Repository(RepositoryError::NotFound) => {
            let payload = json!({ "error": err.to_string() });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        RegistrationError::NotOwner(_) => {
            warn!(error = %err, "wizard access to a foreign profile");
            let payload = json!({ "error": err.to_string() });
            (StatusCode::FORBIDDEN, axum::Json(payload)).into_response()
        }
        RegistrationError::LockedForReview(_)
        | RegistrationError::AlreadyUnderReview(_)
        | RegistrationError::Repository(RepositoryError::Conflict) => {
            let payload = json!({ "error": err.to_string() });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        RegistrationError::Repository(RepositoryError::Unavailable(_)) => {
            error!(error = %err, "registration storage failure");
            let payload = json!({ "error": err.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
