use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use super::domain::{ApprovalDecision, ApprovalError, ApprovalId, ApprovalRequest};
use super::repository::ApprovalRepository;
use super::service::{ApprovalService, ApprovalServiceError};
use crate::workflows::repository::RepositoryError;

pub fn approval_router<R>(service: Arc<ApprovalService<R>>) -> Router
where
    R: ApprovalRepository + 'static,
{
    Router::new()
        .route("/api/v1/approvals", post(open_handler::<R>))
        .route("/api/v1/approvals/:approval_id", get(progress_handler::<R>))
        .route(
            "/api/v1/approvals/:approval_id/approve",
            post(approve_handler::<R>),
        )
        .route(
            "/api/v1/approvals/:approval_id/reject",
            post(reject_handler::<R>),
        )
        .with_state(service)
}

pub(crate) async fn open_handler<R>(
    State(service): State<Arc<ApprovalService<R>>>,
    Json(request): Json<ApprovalRequest>,
) -> Response
where
    R: ApprovalRepository + 'static,
{
    match service.open(request) {
        Ok(approval) => (StatusCode::CREATED, Json(approval.progress())).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn progress_handler<R>(
    State(service): State<Arc<ApprovalService<R>>>,
    Path(approval_id): Path<String>,
) -> Response
where
    R: ApprovalRepository + 'static,
{
    match service.get(&ApprovalId(approval_id)) {
        Ok(approval) => (StatusCode::OK, Json(approval.progress())).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn approve_handler<R>(
    State(service): State<Arc<ApprovalService<R>>>,
    Path(approval_id): Path<String>,
    Json(decision): Json<ApprovalDecision>,
) -> Response
where
    R: ApprovalRepository + 'static,
{
    match service.approve(&ApprovalId(approval_id), decision) {
        Ok(approval) => (StatusCode::OK, Json(approval.progress())).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn reject_handler<R>(
    State(service): State<Arc<ApprovalService<R>>>,
    Path(approval_id): Path<String>,
    Json(decision): Json<ApprovalDecision>,
) -> Response
where
    R: ApprovalRepository + 'static,
{
    match service.reject(&ApprovalId(approval_id), decision) {
        Ok(approval) => (StatusCode::OK, Json(approval.progress())).into_response(),
        Err(err) => error_response(err),
    }
}

fn error_response(err: ApprovalServiceError) -> Response {
    let status = match &err {
        ApprovalServiceError::Approval(
            ApprovalError::MissingField(_)
            | ApprovalError::ApproverCount { .. }
            | ApprovalError::BlankApproverEmail { .. },
        ) => StatusCode::BAD_REQUEST,
        ApprovalServiceError::Approval(ApprovalError::NotCurrentApprover { .. }) => {
            StatusCode::FORBIDDEN
        }
        ApprovalServiceError::Approval(ApprovalError::Finalized { .. })
        | ApprovalServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        ApprovalServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        ApprovalServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    (status, Json(json!({ "error": err.to_string() }))).into_response()
}
