use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use super::catalogue::FormKind;
use super::repository::{RepositoryError, SubmissionId, SubmissionRepository};
use super::service::{FormServiceError, FormSubmissionService};
use crate::workflows::wizard::FormValues;

/// Router builder exposing step checks and submissions for every catalogued form.
pub fn form_router<R>(service: Arc<FormSubmissionService<R>>) -> Router
where
    R: SubmissionRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/forms/:kind/steps/:step/check",
            post(check_handler::<R>),
        )
        .route("/api/v1/forms/:kind/submissions", post(submit_handler::<R>))
        .route(
            "/api/v1/forms/submissions/:submission_id",
            get(fetch_handler::<R>),
        )
        .with_state(service)
}

pub(crate) async fn check_handler<R>(
    State(service): State<Arc<FormSubmissionService<R>>>,
    Path((kind, step)): Path<(String, usize)>,
    Json(values): Json<FormValues>,
) -> Response
where
    R: SubmissionRepository + 'static,
{
    let kind = match kind.parse::<FormKind>() {
        Ok(kind) => kind,
        Err(err) => return error_response(StatusCode::NOT_FOUND, err.to_string()),
    };

    match service.check_step(kind, step, values) {
        Ok(check) => (StatusCode::OK, Json(check)).into_response(),
        Err(err) => service_error_response(err),
    }
}

pub(crate) async fn submit_handler<R>(
    State(service): State<Arc<FormSubmissionService<R>>>,
    Path(kind): Path<String>,
    Json(values): Json<FormValues>,
) -> Response
where
    R: SubmissionRepository + 'static,
{
    let kind = match kind.parse::<FormKind>() {
        Ok(kind) => kind,
        Err(err) => return error_response(StatusCode::NOT_FOUND, err.to_string()),
    };

    match service.submit(kind, values) {
        Ok(record) => (StatusCode::CREATED, Json(record.view())).into_response(),
        Err(err) => service_error_response(err),
    }
}

pub(crate) async fn fetch_handler<R>(
    State(service): State<Arc<FormSubmissionService<R>>>,
    Path(submission_id): Path<String>,
) -> Response
where
    R: SubmissionRepository + 'static,
{
    match service.get(&SubmissionId(submission_id)) {
        Ok(record) => (StatusCode::OK, Json(record.view())).into_response(),
        Err(err) => service_error_response(err),
    }
}

fn error_response(status: StatusCode, message: String) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

fn service_error_response(err: FormServiceError) -> Response {
    match err {
        FormServiceError::Incomplete {
            step,
            ref label,
            ref missing,
        } => {
            let payload = json!({
                "error": err.to_string(),
                "step": step,
                "step_label": label,
                "missing": missing,
            });
            (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response()
        }
        FormServiceError::UnknownStep { .. }
        | FormServiceError::Repository(RepositoryError::NotFound) => {
            error_response(StatusCode::NOT_FOUND, err.to_string())
        }
        FormServiceError::Repository(RepositoryError::Conflict) => {
            error_response(StatusCode::CONFLICT, err.to_string())
        }
        other => error_response(StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
    }
}
